//! # Product Repository
//!
//! Database operations for the catalog.
//!
//! ## Key Operations
//! - Filtered, sorted, paginated page queries
//! - Lookup by id, by code, and batch lookup for cart expansion
//! - Insert
//!
//! ## Page Query
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How a Page Is Fetched                                │
//! │                                                                         │
//! │  CatalogQuery { filter: Category("tools"), sort: Ascending,            │
//! │                 page: { page: 2, limit: 5 } }                          │
//! │       │                                                                 │
//! │       ├──► SELECT COUNT(*) FROM products WHERE category = ?            │
//! │       │         → totalDocs                                            │
//! │       │                                                                 │
//! │       └──► SELECT ... FROM products WHERE category = ?                 │
//! │                 ORDER BY price_cents ASC, rowid ASC                    │
//! │                 LIMIT 5 OFFSET 5                                       │
//! │                 → payload                                              │
//! │                                                                         │
//! │  rowid is insertion order: the natural order, and the tie-break        │
//! │  under a price sort so page boundaries are stable.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use storefront_core::catalog::{CatalogQuery, PriceSort, ProductFilter};
use storefront_core::Product;

const PRODUCT_COLUMNS: &str =
    "id, title, description, price_cents, code, stock, category, status, thumbnails, created_at, updated_at";

/// Ids bound per `IN (...)` lookup.
const LOOKUP_CHUNK: usize = 500;

/// Row shape of the `products` table.
#[derive(Debug, FromRow)]
struct ProductRow {
    id: String,
    title: String,
    description: String,
    price_cents: i64,
    code: String,
    stock: i64,
    category: String,
    status: bool,
    thumbnails: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = DbError;

    fn try_from(row: ProductRow) -> DbResult<Self> {
        let thumbnails: Vec<String> = serde_json::from_str(&row.thumbnails)
            .map_err(|e| DbError::Internal(format!("product {} thumbnails: {e}", row.id)))?;

        Ok(Product {
            id: row.id,
            title: row.title,
            description: row.description,
            price_cents: row.price_cents,
            code: row.code,
            stock: row.stock,
            category: row.category,
            status: row.status,
            thumbnails,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_products(rows: Vec<ProductRow>) -> DbResult<Vec<Product>> {
    rows.into_iter().map(Product::try_from).collect()
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let (page, total) = repo.query_page(&query).await?;
/// let product = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Fetches one page of products matching `query`.
    ///
    /// ## Returns
    /// The page's records plus the total number of matching records.
    /// A page past the end yields an empty sequence, never an error.
    pub async fn query_page(&self, query: &CatalogQuery) -> DbResult<(Vec<Product>, u64)> {
        debug!(
            filter = ?query.filter,
            sort = ?query.sort,
            page = query.page.page,
            limit = query.page.limit,
            "Querying catalog page"
        );

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM products");
        push_filter(&mut count, &query.filter);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        let total = u64::try_from(total).unwrap_or_default();

        let offset = query.page.offset();
        if offset >= total {
            debug!(total, offset, "Requested page is past the last match");
            return Ok((Vec::new(), total));
        }

        let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT {PRODUCT_COLUMNS} FROM products"));
        push_filter(&mut select, &query.filter);
        select.push(match query.sort {
            PriceSort::Ascending => " ORDER BY price_cents ASC, rowid ASC",
            PriceSort::Descending => " ORDER BY price_cents DESC, rowid ASC",
            PriceSort::Natural => " ORDER BY rowid ASC",
        });
        select.push(" LIMIT ").push_bind(i64::from(query.page.limit));
        select
            .push(" OFFSET ")
            .push_bind(i64::try_from(offset).unwrap_or(i64::MAX));

        let rows: Vec<ProductRow> = select.build_query_as().fetch_all(&self.pool).await?;
        let products = into_products(rows)?;

        debug!(count = products.len(), total, "Catalog page fetched");
        Ok((products, total))
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let row: Option<ProductRow> =
            sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Product::try_from).transpose()
    }

    /// Gets a product by its unique code.
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<Product>> {
        let row: Option<ProductRow> =
            sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE code = ?1"))
                .bind(code)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Product::try_from).transpose()
    }

    /// Looks up several products at once, keyed by id.
    ///
    /// Ids that don't resolve are simply absent from the map. Ids are bound
    /// `LOOKUP_CHUNK` at a time so a cart of any length stays under
    /// SQLite's bound-variable limit.
    pub async fn get_many(&self, ids: &[String]) -> DbResult<HashMap<String, Product>> {
        let mut found = HashMap::with_capacity(ids.len());

        for chunk in ids.chunks(LOOKUP_CHUNK) {
            let mut builder = QueryBuilder::<Sqlite>::new(format!(
                "SELECT {PRODUCT_COLUMNS} FROM products WHERE id IN ("
            ));
            let mut separated = builder.separated(", ");
            for id in chunk {
                separated.push_bind(id.clone());
            }
            separated.push_unseparated(")");

            let rows: Vec<ProductRow> = builder.build_query_as().fetch_all(&self.pool).await?;
            found.extend(into_products(rows)?.into_iter().map(|p| (p.id.clone(), p)));
        }

        Ok(found)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The stored product
    /// * `Err(DbError::UniqueViolation)` - Code already exists
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        debug!(code = %product.code, "Inserting product");

        let thumbnails = serde_json::to_string(&product.thumbnails)
            .map_err(|e| DbError::Internal(format!("thumbnails: {e}")))?;

        sqlx::query(
            r#"
            INSERT INTO products (
                id, title, description, price_cents, code, stock,
                category, status, thumbnails, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&product.id)
        .bind(&product.title)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(&product.code)
        .bind(product.stock)
        .bind(&product.category)
        .bind(product.status)
        .bind(thumbnails)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &product.code),
            other => other,
        })?;

        Ok(product.clone())
    }

    /// Counts all products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: &ProductFilter) {
    match filter {
        ProductFilter::All => {}
        ProductFilter::Status(status) => {
            builder.push(" WHERE status = ").push_bind(*status);
        }
        ProductFilter::Category(category) => {
            builder.push(" WHERE category = ").push_bind(category.clone());
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
