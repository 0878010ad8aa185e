//! # Repository Module
//!
//! Repository implementations for the Product Store and the Cart store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Layout                                    │
//! │                                                                         │
//! │  CatalogService                    CartService                         │
//! │       │                                 │                               │
//! │       ▼                                 ▼                               │
//! │  ProductRepository                 CartRepository                      │
//! │  ├── query_page(&CatalogQuery)     ├── create()                        │
//! │  ├── get_by_id(id)                 ├── get_by_id(id)                   │
//! │  ├── get_by_code(code)             └── save_items(id, &[LineItem])     │
//! │  ├── get_many(ids)                                                     │
//! │  └── insert(&Product)                                                  │
//! │       │                                 │                               │
//! │       └──────────────┬──────────────────┘                               │
//! │                      ▼                                                  │
//! │                SQLite Database                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Catalog reads and inserts
//! - [`CartRepository`](cart::CartRepository) - Cart rows and ordered line items

pub mod cart;
pub mod product;
