//! # Response Envelope
//!
//! The JSON shape every operation result is rendered in.
//!
//! ```text
//! success  {"status": "success", "payload": <Product | Cart | ExpandedCart>}
//! page     {"status": "success", "payload": [...], "totalDocs": 42, "page": 1, ...}
//! error    {"status": "error", "code": "NOT_FOUND", "message": "...", "target": {...}}
//! ```

use serde::Serialize;
use storefront_core::catalog::PageResult;
use storefront_core::{Cart, ExpandedCart, Product};

use crate::error::ApiError;

/// Outcome marker at the top of every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Single-record payloads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Product(Product),
    Cart(Cart),
    ExpandedCart(ExpandedCart),
}

impl From<Product> for Payload {
    fn from(product: Product) -> Self {
        Payload::Product(product)
    }
}

impl From<Cart> for Payload {
    fn from(cart: Cart) -> Self {
        Payload::Cart(cart)
    }
}

impl From<ExpandedCart> for Payload {
    fn from(cart: ExpandedCart) -> Self {
        Payload::ExpandedCart(cart)
    }
}

/// A rendered operation result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    /// Catalog page, navigation fields flat beside `status`
    Page {
        status: Status,
        #[serde(flatten)]
        page: PageResult,
    },

    Success {
        status: Status,
        payload: Payload,
    },

    Error {
        status: Status,
        #[serde(flatten)]
        error: ApiError,
    },
}

impl Response {
    pub fn page(page: PageResult) -> Self {
        Response::Page {
            status: Status::Success,
            page,
        }
    }

    pub fn success(payload: impl Into<Payload>) -> Self {
        Response::Success {
            status: Status::Success,
            payload: payload.into(),
        }
    }

    pub fn error(error: ApiError) -> Self {
        Response::Error {
            status: Status::Error,
            error,
        }
    }

    /// Checks if this is an error envelope.
    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error { .. })
    }
}

impl From<ApiError> for Response {
    fn from(error: ApiError) -> Self {
        Response::error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use storefront_core::catalog::{CatalogQuery, PageDefaults, PageParams};

    #[test]
    fn test_error_envelope_is_flat() {
        let response = Response::error(ApiError::not_found("Cart", "c1"));

        assert!(response.is_error());
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "status": "error",
                "code": "NOT_FOUND",
                "message": "Cart not found: c1",
                "target": { "entity": "Cart", "id": "c1" }
            })
        );
    }

    #[test]
    fn test_page_envelope_carries_navigation_beside_status() {
        let query = CatalogQuery::from_params(&PageParams::default(), PageDefaults::default());
        let page = PageResult::build(Vec::new(), 0, &query, "http://localhost:8080/api/products");

        let value = serde_json::to_value(Response::page(page)).unwrap();

        assert_eq!(value["status"], "success");
        assert_eq!(value["payload"], json!([]));
        assert_eq!(value["totalDocs"], 0);
        assert_eq!(value["totalPages"], 0);
        assert_eq!(value["page"], 1);
        assert_eq!(value["hasPrevPage"], false);
        assert_eq!(value["hasNextPage"], false);
        assert_eq!(value["prevLink"], serde_json::Value::Null);
    }

    #[test]
    fn test_success_envelope_wraps_payload() {
        let now = Utc::now();
        let cart = Cart {
            id: "c1".to_string(),
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(Response::success(cart)).unwrap();

        assert_eq!(value["status"], "success");
        assert_eq!(value["payload"]["id"], "c1");
        assert_eq!(value["payload"]["products"], json!([]));
    }
}
