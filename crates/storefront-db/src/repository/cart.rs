//! # Cart Repository
//!
//! Database operations for carts and their ordered line items.
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  carts                          cart_items                              │
//! │  ┌──────────┬─────────────┐     ┌─────────┬────────────┬─────┬────────┐ │
//! │  │ id       │ updated_at  │◄────│ cart_id │ product_id │ qty │ pos    │ │
//! │  └──────────┴─────────────┘     └─────────┴────────────┴─────┴────────┘ │
//! │                                  PRIMARY KEY (cart_id, product_id)      │
//! │                                                                         │
//! │  save_items(cart, items) in ONE transaction:                           │
//! │    1. UPDATE carts SET updated_at      (0 rows → NotFound)             │
//! │    2. DELETE FROM cart_items WHERE cart_id = ?                         │
//! │    3. INSERT each item with its position                               │
//! │    4. COMMIT                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The repository stores whatever sequence it is given. Merge rules live in
//! `storefront_core::cart`; write ordering per cart lives in the service.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use storefront_core::{Cart, LineItem};

#[derive(Debug, FromRow)]
struct CartRow {
    id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct LineItemRow {
    product_id: String,
    quantity: i64,
}

/// Repository for cart database operations.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Creates a new, empty cart with a store-assigned id.
    pub async fn create(&self) -> DbResult<Cart> {
        let now = Utc::now();
        let cart = Cart {
            id: Uuid::new_v4().to_string(),
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        debug!(cart_id = %cart.id, "Creating cart");

        sqlx::query("INSERT INTO carts (id, created_at, updated_at) VALUES (?1, ?2, ?3)")
            .bind(&cart.id)
            .bind(cart.created_at)
            .bind(cart.updated_at)
            .execute(&self.pool)
            .await?;

        Ok(cart)
    }

    /// Gets a cart with its line items in stored order.
    ///
    /// ## Returns
    /// * `Ok(Some(Cart))` - Cart found
    /// * `Ok(None)` - Cart not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Cart>> {
        let row: Option<CartRow> =
            sqlx::query_as("SELECT id, created_at, updated_at FROM carts WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items: Vec<LineItemRow> = sqlx::query_as(
            r#"
            SELECT product_id, quantity
            FROM cart_items
            WHERE cart_id = ?1
            ORDER BY position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(Cart {
            id: row.id,
            items: items
                .into_iter()
                .map(|i| LineItem::new(i.product_id, i.quantity))
                .collect(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }))
    }

    /// Replaces a cart's stored line items with `items`, in order.
    ///
    /// ## Returns
    /// * `Ok(updated_at)` - New modification time of the cart
    /// * `Err(DbError::NotFound)` - No cart with this id
    /// * `Err(DbError::UniqueViolation)` - `items` repeats a product
    pub async fn save_items(&self, cart_id: &str, items: &[LineItem]) -> DbResult<DateTime<Utc>> {
        debug!(cart_id = %cart_id, count = items.len(), "Saving cart items");

        let now = Utc::now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let result = sqlx::query("UPDATE carts SET updated_at = ?2 WHERE id = ?1")
            .bind(cart_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Cart", cart_id));
        }

        sqlx::query("DELETE FROM cart_items WHERE cart_id = ?1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;

        for (position, item) in items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO cart_items (cart_id, product_id, quantity, position)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(cart_id)
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(i64::try_from(position).unwrap_or(i64::MAX))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(now)
    }

    /// Counts all carts.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM carts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_empty_cart() {
        let db = test_db().await;

        let cart = db.carts().create().await.unwrap();
        assert!(cart.is_empty());

        let found = db.carts().get_by_id(&cart.id).await.unwrap().unwrap();
        assert_eq!(found.id, cart.id);
        assert!(found.is_empty());
        assert_eq!(db.carts().count().await.unwrap(), 1);

        assert!(db.carts().get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_items_keeps_order_and_replaces() {
        let db = test_db().await;
        let cart = db.carts().create().await.unwrap();

        let first = vec![LineItem::new("p1", 1), LineItem::new("p2", 2)];
        db.carts().save_items(&cart.id, &first).await.unwrap();

        let second = vec![LineItem::new("p3", 4), LineItem::new("p1", 1)];
        let updated_at = db.carts().save_items(&cart.id, &second).await.unwrap();

        let found = db.carts().get_by_id(&cart.id).await.unwrap().unwrap();
        assert_eq!(found.items, second);
        assert!(updated_at >= cart.updated_at);
    }

    #[tokio::test]
    async fn test_save_items_unknown_cart() {
        let db = test_db().await;

        let err = db
            .carts()
            .save_items("missing", &[LineItem::new("p1", 1)])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { ref entity, .. } if entity == "Cart"));
    }

    #[tokio::test]
    async fn test_failed_save_rolls_back() {
        let db = test_db().await;
        let cart = db.carts().create().await.unwrap();
        db.carts()
            .save_items(&cart.id, &[LineItem::new("p1", 3)])
            .await
            .unwrap();

        let duplicate = vec![LineItem::new("p2", 1), LineItem::new("p2", 1)];
        let err = db.carts().save_items(&cart.id, &duplicate).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        let found = db.carts().get_by_id(&cart.id).await.unwrap().unwrap();
        assert_eq!(found.items, vec![LineItem::new("p1", 3)]);
    }

    #[tokio::test]
    async fn test_unknown_product_references_are_storable() {
        let db = test_db().await;
        let cart = db.carts().create().await.unwrap();

        db.carts()
            .save_items(&cart.id, &[LineItem::new("not-in-catalog", 2)])
            .await
            .unwrap();

        let found = db.carts().get_by_id(&cart.id).await.unwrap().unwrap();
        assert_eq!(found.item("not-in-catalog").map(|i| i.quantity), Some(2));
    }
}
