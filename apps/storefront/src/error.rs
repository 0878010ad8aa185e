//! # API Error Type
//!
//! Unified error type returned by the catalog and cart services.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront                         │
//! │                                                                         │
//! │  ValidationError ──────────────────────────► VALIDATION_ERROR          │
//! │                                                target: { fields }      │
//! │                                                                         │
//! │  CoreError::CartNotFound / ProductNotFound ─► NOT_FOUND                │
//! │  CoreError::ProductNotInCart ──────────────► NOT_FOUND                 │
//! │                                                target: { entity, id }  │
//! │                                                                         │
//! │  DbError::NotFound ────────────────────────► NOT_FOUND                 │
//! │  DbError::* (anything else) ───────────────► STORE_FAILURE             │
//! │                                                message carries cause   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An absent cart and an absent line item are told apart by
//! `target.entity`: `"Cart"` versus `"CartItem"`.

use serde::Serialize;
use storefront_core::{CoreError, ValidationError};
use storefront_db::DbError;

/// Error returned from service operations.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product p-1 is not in cart c-1",
///   "target": { "entity": "CartItem", "id": "p-1" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// What the error is about, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<ErrorTarget>,
}

/// Error codes for service responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A cart, product or line item identifier does not resolve
    NotFound,

    /// Malformed or missing caller input
    ValidationError,

    /// The underlying store operation failed
    StoreFailure,
}

/// The identifier or fields an error refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorTarget {
    Resource { entity: String, id: String },
    Fields { fields: Vec<String> },
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            target: None,
        }
    }

    /// Creates a not found error.
    pub fn not_found(entity: &str, id: &str) -> Self {
        ApiError {
            target: Some(ErrorTarget::Resource {
                entity: entity.to_string(),
                id: id.to_string(),
            }),
            ..ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", entity, id))
        }
    }

    /// Creates a store failure carrying the underlying cause.
    pub fn store_failure(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::StoreFailure, message)
    }

    /// Returns the entity of a not-found target, if any.
    pub fn entity(&self) -> Option<&str> {
        match &self.target {
            Some(ErrorTarget::Resource { entity, .. }) => Some(entity),
            _ => None,
        }
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            other => {
                tracing::error!(error = %other, "Store operation failed");
                ApiError::store_failure(other.to_string())
            }
        }
    }
}

/// Converts validation errors to API errors.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError {
            target: Some(ErrorTarget::Fields {
                fields: err.fields(),
            }),
            ..ApiError::new(ErrorCode::ValidationError, err.to_string())
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::CartNotFound(id) => ApiError::not_found("Cart", &id),
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::ProductNotInCart {
                cart_id,
                product_id,
            } => ApiError {
                message: format!("Product {} is not in cart {}", product_id, cart_id),
                code: ErrorCode::NotFound,
                target: Some(ErrorTarget::Resource {
                    entity: "CartItem".to_string(),
                    id: product_id,
                }),
            },
            CoreError::QuantityTooLarge { requested, max } => ApiError {
                target: Some(ErrorTarget::Fields {
                    fields: vec!["quantity".to_string()],
                }),
                ..ApiError::new(
                    ErrorCode::ValidationError,
                    format!("Quantity {} exceeds maximum allowed ({})", requested, max),
                )
            },
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for service operations.
pub type ApiResult<T> = Result<T, ApiError>;
