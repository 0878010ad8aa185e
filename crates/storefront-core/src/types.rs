//! # Domain Types
//!
//! Core domain types used throughout the storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Cart       │   │  ExpandedCart   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id             │       │
//! │  │  code (unique)  │◄──│  products[]     │──►│  products[]     │       │
//! │  │  price_cents    │   │   LineItem      │   │   product|null  │       │
//! │  │  stock, status  │   │   {product,qty} │   │   quantity      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Names
//! Field names follow the presentation contract: camelCase, a cart's line
//! items are `products`, and a line item's reference is `product`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A catalog record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4), assigned by the store.
    pub id: String,

    /// Display title.
    pub title: String,

    /// Free-form description, empty when not supplied.
    pub description: String,

    /// Price in cents (smallest currency unit), never negative.
    /// Sent and received as `price`.
    #[serde(rename = "price")]
    pub price_cents: i64,

    /// Unique business code.
    pub code: String,

    /// Units in stock, never negative.
    pub stock: i64,

    /// Category used by the catalog's exact-match filter.
    pub category: String,

    /// Availability flag: `true` is "available".
    pub status: bool,

    /// Ordered thumbnail references.
    pub thumbnails: Vec<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Product creation request as supplied by the caller.
///
/// Every field is optional at this stage so that validation can report all
/// missing required fields at once (see [`crate::validation::validate_new_product`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct NewProduct {
    pub title: Option<String>,
    pub description: Option<String>,
    /// In cents.
    #[serde(rename = "price")]
    pub price_cents: Option<i64>,
    pub code: Option<String>,
    pub stock: Option<i64>,
    pub category: Option<String>,
    /// Defaults to available when omitted.
    pub status: Option<bool>,
    pub thumbnails: Option<Vec<String>>,
}

// =============================================================================
// Cart
// =============================================================================

/// A (product reference, quantity) pair inside a cart.
///
/// The reference may dangle if the product was removed from the catalog
/// after the item was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    #[serde(rename = "product", alias = "productId")]
    pub product_id: String,

    /// Always >= 1 at rest.
    pub quantity: i64,
}

impl LineItem {
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        LineItem {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// A stored cart: ordered line items, unique by product reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    /// Unique identifier (UUID v4), assigned by the store.
    pub id: String,

    #[serde(rename = "products")]
    pub items: Vec<LineItem>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Checks if the cart has no line items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Finds the line item for a product.
    pub fn item(&self, product_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }
}

// =============================================================================
// Expanded Cart
// =============================================================================

/// A line item with its product reference resolved against the catalog.
///
/// `product` is `None` when the reference no longer resolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ExpandedLineItem {
    pub product_id: String,
    pub product: Option<Product>,
    pub quantity: i64,
}

impl ExpandedLineItem {
    /// Checks if the product reference resolved.
    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.product.is_some()
    }

    /// Unit price × quantity, zero for an unresolved reference.
    pub fn line_total(&self) -> Money {
        self.product
            .as_ref()
            .map(|p| p.price().multiply_quantity(self.quantity))
            .unwrap_or_default()
    }
}

/// Cart view where every line item carries full product data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ExpandedCart {
    pub id: String,

    pub products: Vec<ExpandedLineItem>,

    /// Sum of quantities across all line items.
    pub total_quantity: i64,

    /// Sum of line totals across resolved line items, in cents.
    pub subtotal_cents: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl ExpandedCart {
    /// Returns the line items whose product no longer resolves.
    pub fn unresolved(&self) -> impl Iterator<Item = &ExpandedLineItem> {
        self.products.iter().filter(|i| !i.is_resolved())
    }

    /// Finds the expanded line item for a product.
    pub fn item(&self, product_id: &str) -> Option<&ExpandedLineItem> {
        self.products.iter().find(|i| i.product_id == product_id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_item_wire_names() {
        let item = LineItem::new("p-1", 3);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json, serde_json::json!({ "product": "p-1", "quantity": 3 }));

        let parsed: LineItem =
            serde_json::from_value(serde_json::json!({ "productId": "p-2", "quantity": 1 }))
                .unwrap();
        assert_eq!(parsed.product_id, "p-2");
    }

    #[test]
    fn test_new_product_defaults_missing_fields_to_none() {
        let parsed: NewProduct =
            serde_json::from_value(serde_json::json!({ "title": "Widget", "price": 0 }))
                .unwrap();
        assert_eq!(parsed.title.as_deref(), Some("Widget"));
        assert_eq!(parsed.price_cents, Some(0));
        assert!(parsed.category.is_none());
        assert!(parsed.status.is_none());
    }

    #[test]
    fn test_missing_price_is_reported_under_its_wire_name() {
        let body = serde_json::json!({
            "title": "Widget",
            "code": "W1",
            "stock": 1,
            "category": "tools"
        });
        let parsed: NewProduct = serde_json::from_value(body).unwrap();

        let err = crate::validation::validate_new_product(parsed).unwrap_err();
        assert_eq!(err.fields(), vec!["price"]);

        let wire = serde_json::to_value(NewProduct {
            price_cents: Some(250),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(wire["price"], 250);
        assert!(wire.get("priceCents").is_none());
    }

    #[test]
    fn test_unresolved_line_total_is_zero() {
        let item = ExpandedLineItem {
            product_id: "gone".to_string(),
            product: None,
            quantity: 4,
        };
        assert!(!item.is_resolved());
        assert_eq!(item.line_total().cents(), 0);
    }
}
