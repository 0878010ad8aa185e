//! # State Module
//!
//! Process-wide state shared by the services.
//!
//! - [`CartLocks`] - per-cart write serialization

mod cart_locks;

pub use cart_locks::CartLocks;
