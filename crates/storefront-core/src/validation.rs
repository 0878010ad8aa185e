//! # Validation Module
//!
//! Input validation for catalog and cart operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front end (CLI / HTTP adapter)                               │
//! │  └── Type validation (argument parsing, deserialization)               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Service boundary                                             │
//! │  └── THIS MODULE: required fields, quantities, item shapes             │
//! │      Runs before any store access: no partial mutation on failure      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── UNIQUE (products.code, cart_items(cart_id, product_id))           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::validation::{validate_new_product, validate_quantity};
//! use storefront_core::NewProduct;
//!
//! let fields = validate_new_product(NewProduct {
//!     title: Some("Widget".into()),
//!     price_cents: Some(0),
//!     code: Some("W1".into()),
//!     stock: Some(0),
//!     category: Some("tools".into()),
//!     ..Default::default()
//! })
//! .unwrap();
//! assert_eq!(fields.price_cents, 0);
//!
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::ValidationError;
use crate::types::{LineItem, NewProduct, Product};
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Required product fields, in the order they are reported when missing.
pub const REQUIRED_PRODUCT_FIELDS: [&str; 5] = ["title", "price", "code", "stock", "category"];

// =============================================================================
// Product Validators
// =============================================================================

/// A product creation request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub title: String,
    pub description: String,
    pub price_cents: i64,
    pub code: String,
    pub stock: i64,
    pub category: String,
    pub status: bool,
    pub thumbnails: Vec<String>,
}

impl ProductFields {
    /// Builds the stored record once the store has assigned an identifier.
    pub fn into_product(self, id: String, now: DateTime<Utc>) -> Product {
        Product {
            id,
            title: self.title,
            description: self.description,
            price_cents: self.price_cents,
            code: self.code,
            stock: self.stock,
            category: self.category,
            status: self.status,
            thumbnails: self.thumbnails,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Validates a product creation request.
///
/// ## Rules
/// - `title`, `code`, `category`: present and not blank
/// - `price`, `stock`: present; `0` is a valid value, negatives are not
/// - Every missing field is reported, in [`REQUIRED_PRODUCT_FIELDS`] order
/// - `status` defaults to available, `description` to empty
pub fn validate_new_product(input: NewProduct) -> ValidationResult<ProductFields> {
    let NewProduct {
        title,
        description,
        price_cents,
        code,
        stock,
        category,
        status,
        thumbnails,
    } = input;

    let title = non_blank(title);
    let code = non_blank(code);
    let category = non_blank(category);

    let present = [
        title.is_some(),
        price_cents.is_some(),
        code.is_some(),
        stock.is_some(),
        category.is_some(),
    ];

    let missing: Vec<String> = REQUIRED_PRODUCT_FIELDS
        .iter()
        .zip(present)
        .filter(|(_, ok)| !ok)
        .map(|(field, _)| (*field).to_string())
        .collect();

    let (Some(title), Some(price_cents), Some(code), Some(stock), Some(category)) =
        (title, price_cents, code, stock, category)
    else {
        return Err(ValidationError::MissingFields { fields: missing });
    };

    validate_price_cents(price_cents)?;
    validate_stock(stock)?;

    Ok(ProductFields {
        title,
        description: description.unwrap_or_default(),
        price_cents,
        code,
        stock,
        category,
        status: status.unwrap_or(true),
        thumbnails: thumbnails.unwrap_or_default(),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Validates a price in cents. Zero is allowed (free items).
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a stock level. Zero is allowed (sold out).
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Cart Validators
// =============================================================================

/// Validates a line-item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_ITEM_QUANTITY`]
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates an identifier supplied by the caller.
///
/// Only blankness is checked: an unknown identifier is a lookup miss, not
/// malformed input.
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a full replacement line-item sequence.
///
/// ## Rules
/// - Every product reference is non-blank
/// - Every quantity passes [`validate_quantity`]
/// - No product appears twice (the at-rest uniqueness invariant)
///
/// Product existence is not checked here; see the cart service.
pub fn validate_line_items(items: &[LineItem]) -> ValidationResult<()> {
    let mut seen = HashSet::with_capacity(items.len());

    for item in items {
        validate_id("product", &item.product_id)?;
        validate_quantity(item.quantity)?;

        if !seen.insert(item.product_id.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "products".to_string(),
                value: item.product_id.clone(),
            });
        }
    }

    Ok(())
}

/// Parses a replace-all request body into line items.
///
/// ## Accepted Shapes
/// ```text
/// [ { "product": "<id>", "quantity": 2 }, ... ]
/// { "products": [ { "product": "<id>", "quantity": 2 }, ... ] }
/// ```
/// `quantity` defaults to 1 when omitted. Anything else is rejected with
/// "products must be an array". The parsed sequence is also checked with
/// [`validate_line_items`].
pub fn parse_line_items(body: &Value) -> ValidationResult<Vec<LineItem>> {
    let entries = match body {
        Value::Array(entries) => entries,
        Value::Object(map) => match map.get("products") {
            Some(Value::Array(entries)) => entries,
            _ => return Err(not_an_array()),
        },
        _ => return Err(not_an_array()),
    };

    let items = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_line_item(index, entry))
        .collect::<ValidationResult<Vec<_>>>()?;

    validate_line_items(&items)?;

    Ok(items)
}

fn parse_line_item(index: usize, entry: &Value) -> ValidationResult<LineItem> {
    let Value::Object(map) = entry else {
        return Err(ValidationError::InvalidFormat {
            field: format!("products[{index}]"),
            reason: "must be an object with a product reference".to_string(),
        });
    };

    let product_id = map
        .get("product")
        .or_else(|| map.get("productId"))
        .and_then(Value::as_str)
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: format!("products[{index}].product"),
            reason: "must be a product identifier string".to_string(),
        })?;

    let quantity = match map.get("quantity") {
        None | Some(Value::Null) => 1,
        Some(value) => value.as_i64().ok_or_else(|| ValidationError::InvalidFormat {
            field: format!("products[{index}].quantity"),
            reason: "must be an integer".to_string(),
        })?,
    };

    Ok(LineItem::new(product_id, quantity))
}

fn not_an_array() -> ValidationError {
    ValidationError::InvalidFormat {
        field: "products".to_string(),
        reason: "products must be an array".to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn widget() -> NewProduct {
        NewProduct {
            title: Some("Widget".to_string()),
            description: None,
            price_cents: Some(1000),
            code: Some("W1".to_string()),
            stock: Some(5),
            category: Some("tools".to_string()),
            status: None,
            thumbnails: None,
        }
    }

    #[test]
    fn test_valid_product_applies_defaults() {
        let fields = validate_new_product(widget()).unwrap();
        assert_eq!(fields.title, "Widget");
        assert_eq!(fields.description, "");
        assert!(fields.status);
        assert!(fields.thumbnails.is_empty());
    }

    #[test]
    fn test_zero_price_and_stock_are_accepted() {
        let input = NewProduct {
            price_cents: Some(0),
            stock: Some(0),
            ..widget()
        };
        let fields = validate_new_product(input).unwrap();
        assert_eq!(fields.price_cents, 0);
        assert_eq!(fields.stock, 0);
    }

    #[test]
    fn test_missing_category_is_named() {
        let input = NewProduct {
            category: None,
            ..widget()
        };
        let err = validate_new_product(input).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingFields {
                fields: vec!["category".to_string()]
            }
        );
    }

    #[test]
    fn test_all_missing_fields_in_declaration_order() {
        let input = NewProduct {
            description: Some("only a description".to_string()),
            title: Some("   ".to_string()),
            ..Default::default()
        };
        let err = validate_new_product(input).unwrap_err();
        assert_eq!(err.fields(), vec!["title", "price", "code", "stock", "category"]);
    }

    #[test]
    fn test_negative_price_or_stock_rejected() {
        let input = NewProduct {
            price_cents: Some(-1),
            ..widget()
        };
        assert!(matches!(
            validate_new_product(input),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "price"
        ));

        let input = NewProduct {
            stock: Some(-3),
            ..widget()
        };
        assert!(matches!(
            validate_new_product(input),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "stock"
        ));
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(5).is_ok());
        assert!(validate_quantity(MAX_ITEM_QUANTITY).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_ITEM_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("cart", "abc").is_ok());
        assert_eq!(
            validate_id("cart", "  "),
            Err(ValidationError::Required {
                field: "cart".to_string()
            })
        );
    }

    #[test]
    fn test_parse_line_items_accepts_both_shapes() {
        let bare = json!([{ "product": "a", "quantity": 2 }, { "product": "b" }]);
        let items = parse_line_items(&bare).unwrap();
        assert_eq!(items, vec![LineItem::new("a", 2), LineItem::new("b", 1)]);

        let wrapped = json!({ "products": [{ "productId": "c", "quantity": 7 }] });
        let items = parse_line_items(&wrapped).unwrap();
        assert_eq!(items, vec![LineItem::new("c", 7)]);

        let empty = json!({ "products": [] });
        assert!(parse_line_items(&empty).unwrap().is_empty());
    }

    #[test]
    fn test_parse_line_items_rejects_non_arrays() {
        for body in [json!({}), json!({ "products": "a" }), json!("a"), json!(3), Value::Null] {
            let err = parse_line_items(&body).unwrap_err();
            assert_eq!(err.fields(), vec!["products"], "body: {body}");
        }
    }

    #[test]
    fn test_parse_line_items_rejects_bad_entries() {
        assert!(parse_line_items(&json!([42])).is_err());
        assert!(parse_line_items(&json!([{ "quantity": 1 }])).is_err());
        assert!(parse_line_items(&json!([{ "product": "a", "quantity": "two" }])).is_err());
        assert!(parse_line_items(&json!([{ "product": "a", "quantity": 0 }])).is_err());
    }

    #[test]
    fn test_duplicate_products_rejected() {
        let items = vec![LineItem::new("a", 1), LineItem::new("a", 2)];
        assert_eq!(
            validate_line_items(&items),
            Err(ValidationError::Duplicate {
                field: "products".to_string(),
                value: "a".to_string()
            })
        );
    }
}
