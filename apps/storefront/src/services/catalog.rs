//! # Catalog Service
//!
//! The Catalog Query Engine: list, fetch and create products.
//!
//! ## List Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PageParams { limit, page, sort, query }   (raw strings)               │
//! │       │                                                                 │
//! │       ▼  CatalogQuery::from_params(params, settings.page_defaults)     │
//! │  CatalogQuery                                                          │
//! │       │                                                                 │
//! │       ▼  db.products().query_page(&query)                              │
//! │  (records, totalDocs)                                                  │
//! │       │                                                                 │
//! │       ▼  PageResult::build(.., settings.link_base)                     │
//! │  PageResult { payload, totalPages, hasNextPage, nextLink, ... }        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::CatalogSettings;
use crate::error::{ApiError, ApiResult};
use storefront_core::catalog::{CatalogQuery, PageParams, PageResult};
use storefront_core::validation::{validate_id, validate_new_product};
use storefront_core::{CoreError, NewProduct, Product, ValidationError};
use storefront_db::Database;

/// Catalog reads and product creation.
#[derive(Debug, Clone)]
pub struct CatalogService {
    db: Database,
    settings: CatalogSettings,
}

impl CatalogService {
    /// Creates a catalog service over `db`.
    pub fn new(db: Database, settings: CatalogSettings) -> Self {
        CatalogService { db, settings }
    }

    /// Lists one page of products.
    ///
    /// Never fails on parameter values: invalid ones fall back to defaults
    /// and a page past the end is an empty payload.
    pub async fn list_products(&self, params: &PageParams) -> ApiResult<PageResult> {
        let query = CatalogQuery::from_params(params, self.settings.page_defaults);

        let (payload, total_docs) = self.db.products().query_page(&query).await?;
        let page = PageResult::build(payload, total_docs, &query, &self.settings.link_base);

        debug!(
            page = page.page,
            total_pages = page.total_pages,
            total_docs,
            "Listed products"
        );

        Ok(page)
    }

    /// Fetches a single product.
    pub async fn get_product(&self, id: &str) -> ApiResult<Product> {
        validate_id("productId", id)?;

        self.db
            .products()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::from(CoreError::ProductNotFound(id.to_string())))
    }

    /// Validates and stores a new product.
    ///
    /// ## Errors
    /// - `VALIDATION_ERROR` naming every missing required field
    /// - `VALIDATION_ERROR` on `code` when the code is already taken
    pub async fn create_product(&self, input: NewProduct) -> ApiResult<Product> {
        let fields = validate_new_product(input)?;

        if self.db.products().get_by_code(&fields.code).await?.is_some() {
            return Err(ValidationError::Duplicate {
                field: "code".to_string(),
                value: fields.code,
            }
            .into());
        }

        let product = fields.into_product(Uuid::new_v4().to_string(), Utc::now());
        let product = self.db.products().insert(&product).await?;

        info!(id = %product.id, code = %product.code, "Product created");
        Ok(product)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
