//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  ├── CoreError        - Unresolved identifiers, cart rule violations   │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  storefront-db errors (separate crate)                                 │
//! │  └── DbError          - Store operation failures                       │
//! │                                                                         │
//! │  apps/storefront errors                                                │
//! │  └── ApiError         - NOT_FOUND | VALIDATION_ERROR | STORE_FAILURE   │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ─┐                                  │
//! │                           DbError ──┴→ ApiError → Presentation Adapter │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, cart id, product id)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent identifiers that do not resolve or cart rules that the
/// requested mutation would break.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The cart identifier does not resolve.
    #[error("Cart not found: {0}")]
    CartNotFound(String),

    /// The product identifier does not resolve in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The cart exists but has no line item for the product.
    ///
    /// ## When This Occurs
    /// - `update_quantity` on a product that was never added
    /// - `update_quantity` after the item was removed
    ///
    /// Kept apart from [`CoreError::CartNotFound`] so callers can tell an
    /// absent cart from an absent line item.
    #[error("Product {product_id} is not in cart {cart_id}")]
    ProductNotInCart { cart_id: String, product_id: String },

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Raised before any store access.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A single required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Several required fields are missing; listed in declaration order.
    #[error("Missing required fields: {}", fields.join(", "))]
    MissingFields { fields: Vec<String> },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be a number greater than 0")]
    MustBePositive { field: String },

    /// Invalid format (e.g., body is not an array).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate product code).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    /// Returns the names of the fields this error is about.
    pub fn fields(&self) -> Vec<String> {
        match self {
            ValidationError::MissingFields { fields } => fields.clone(),
            ValidationError::Required { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::Duplicate { field, .. } => vec![field.clone()],
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ProductNotInCart {
            cart_id: "c1".to_string(),
            product_id: "p1".to_string(),
        };
        assert_eq!(err.to_string(), "Product p1 is not in cart c1");

        let err = CoreError::CartNotFound("c9".to_string());
        assert_eq!(err.to_string(), "Cart not found: c9");
    }

    #[test]
    fn test_missing_fields_message_keeps_order() {
        let err = ValidationError::MissingFields {
            fields: vec!["title".to_string(), "code".to_string(), "category".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Missing required fields: title, code, category"
        );
        assert_eq!(err.fields(), vec!["title", "code", "category"]);
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
