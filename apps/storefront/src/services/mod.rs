//! # Services Module
//!
//! The two storefront components, wired over one database.
//!
//! ## Service Organization
//! ```text
//! services/
//! ├── mod.rs      ◄─── You are here (Storefront wiring)
//! ├── catalog.rs  ◄─── listProducts, getProduct, createProduct
//! └── cart.rs     ◄─── createCart, getCart, add/remove/replace/update/clear
//! ```
//!
//! Both services hold a cloned [`Database`] handle. Clones share one pool.

pub mod cart;
pub mod catalog;

pub use cart::CartService;
pub use catalog::CatalogService;

use crate::config::CatalogSettings;
use crate::state::CartLocks;
use storefront_db::Database;

/// The Catalog Query Engine and the Cart Aggregator.
#[derive(Debug, Clone)]
pub struct Storefront {
    pub catalog: CatalogService,
    pub carts: CartService,
}

impl Storefront {
    /// Builds both services over `db`.
    pub fn new(db: Database, settings: CatalogSettings) -> Self {
        Storefront {
            catalog: CatalogService::new(db.clone(), settings),
            carts: CartService::new(db, CartLocks::new()),
        }
    }
}
