//! # storefront-core: Pure Catalog & Cart Logic
//!
//! This crate holds the rules of the storefront as pure functions with zero
//! I/O dependencies. The database layer and the services call into it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          Presentation Adapter (JSON / HTML, external)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        CatalogService / CartService (apps/storefront)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  catalog  │  │   cart    │  │ validation│  │   │
//! │  │   │  Product  │  │  Filter   │  │  merge    │  │  required │  │   │
//! │  │   │  Cart     │  │  Sort     │  │  expand   │  │  fields   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 storefront-db (Database Layer)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Cart, LineItem, ExpandedCart)
//! - [`catalog`] - Filter/sort/page derivation and the page envelope
//! - [`cart`] - Line-item rules (merge on add, remove, set quantity, expand)
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::catalog::{CatalogQuery, PageParams, PageDefaults, PriceSort, ProductFilter};
//!
//! let params = PageParams {
//!     limit: Some("5".to_string()),
//!     page: None,
//!     sort: Some("desc".to_string()),
//!     query: Some("available".to_string()),
//! };
//!
//! let query = CatalogQuery::from_params(&params, PageDefaults::default());
//! assert_eq!(query.page.limit, 5);
//! assert_eq!(query.page.page, 1);
//! assert_eq!(query.sort, PriceSort::Descending);
//! assert_eq!(query.filter, ProductFilter::Status(true));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Page size used when `limit` is absent or not a positive integer.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound applied to a requested `limit` unless configured otherwise.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page number used when `page` is absent or not a positive integer.
pub const DEFAULT_PAGE: u32 = 1;

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
