//! # Cart Locks
//!
//! Serializes mutations per cart identifier.
//!
//! ## Why Per-Cart?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Without a lock, two add_product calls on the same cart race:          │
//! │                                                                         │
//! │   Task A: read {p: 1} ────────────── write {p: 2}                       │
//! │   Task B:        read {p: 1} ──────────────────── write {p: 2}  ❌      │
//! │                                                                         │
//! │  With CartLocks, read → mutate → write is one critical section:       │
//! │                                                                         │
//! │   Task A: [lock c1] read {p: 1} write {p: 2} [unlock]                   │
//! │   Task B:                                    [lock c1] read {p: 2}      │
//! │                                              write {p: 3} [unlock] ✅   │
//! │                                                                         │
//! │  Different carts never wait on each other.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The registry map sits behind a `std::sync::Mutex` held only for the
//! lookup. The per-cart lock is a `tokio::sync::Mutex` because it is held
//! across store `.await`s.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Exclusive hold on one cart until dropped.
pub type CartGuard = OwnedMutexGuard<()>;

/// Registry of per-cart async locks.
///
/// Cloning is cheap: clones share the same registry.
#[derive(Debug, Clone, Default)]
pub struct CartLocks {
    inner: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl CartLocks {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `cart_id`.
    ///
    /// Entries nobody holds or waits on are pruned on each call, so the
    /// registry stays proportional to the carts currently being written.
    pub async fn lock(&self, cart_id: &str) -> CartGuard {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            map.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(map.entry(cart_id.to_string()).or_default())
        };

        lock.lock_owned().await
    }

    /// Number of carts with a live lock entry.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Checks if no cart has a live lock entry.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
