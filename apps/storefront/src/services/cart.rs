//! # Cart Service
//!
//! The Cart Aggregator: cart mutations and read-time expansion.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Every Mutating Operation                             │
//! │                                                                         │
//! │  1. Validate caller input            (no store access yet)             │
//! │  2. locks.lock(cart_id).await        (per-cart critical section)       │
//! │  3. carts().get_by_id     ──────────► None → NOT_FOUND (Cart)          │
//! │  4. apply storefront_core::cart rule                                   │
//! │  5. carts().save_items    (one transaction, skipped for no-ops)        │
//! │  6. re-read + expand      ──────────► ExpandedCart                     │
//! │  7. guard dropped                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Unresolved References
//! A line item whose product no longer exists is expanded with
//! `product: null` and logged at `warn`. `replace_all` does not check that
//! referenced products exist.

use tracing::{debug, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::state::CartLocks;
use storefront_core::error::CoreResult;
use storefront_core::validation::{validate_id, validate_line_items, validate_quantity};
use storefront_core::{Cart, CoreError, ExpandedCart, LineItem};
use storefront_db::Database;

/// Cart operations over the Cart store and the Product Store.
#[derive(Debug, Clone)]
pub struct CartService {
    db: Database,
    locks: CartLocks,
}

impl CartService {
    /// Creates a cart service over `db`.
    pub fn new(db: Database, locks: CartLocks) -> Self {
        CartService { db, locks }
    }

    /// Creates a new, empty cart.
    pub async fn create_cart(&self) -> ApiResult<Cart> {
        let cart = self.db.carts().create().await?;
        info!(cart_id = %cart.id, "Cart created");
        Ok(cart)
    }

    /// Fetches a cart with every line item resolved to full product data.
    pub async fn get_cart(&self, cart_id: &str) -> ApiResult<ExpandedCart> {
        validate_id("cartId", cart_id)?;

        let cart = self.load(cart_id).await?;
        self.expand(&cart).await
    }

    /// Adds one unit of a product, merging into an existing line item.
    ///
    /// ## Errors
    /// - `NOT_FOUND` (Product) when the product doesn't exist
    /// - `NOT_FOUND` (Cart) when the cart doesn't exist
    /// - `VALIDATION_ERROR` when the line item is already at the maximum
    pub async fn add_product(&self, cart_id: &str, product_id: &str) -> ApiResult<ExpandedCart> {
        validate_id("cartId", cart_id)?;
        validate_id("productId", product_id)?;

        if self.db.products().get_by_id(product_id).await?.is_none() {
            return Err(CoreError::ProductNotFound(product_id.to_string()).into());
        }

        self.mutate(cart_id, "add_product", |cart| {
            let quantity = cart.add_one(product_id)?;
            debug!(cart_id = %cart.id, product_id, quantity, "Product added");
            Ok(true)
        })
        .await
    }

    /// Removes a product's line item. Removing an absent product is a no-op.
    pub async fn remove_product(&self, cart_id: &str, product_id: &str) -> ApiResult<ExpandedCart> {
        validate_id("cartId", cart_id)?;
        validate_id("productId", product_id)?;

        self.mutate(cart_id, "remove_product", |cart| {
            let removed = cart.remove_product(product_id);
            if !removed {
                debug!(cart_id = %cart.id, product_id, "Product not in cart, nothing to remove");
            }
            Ok(removed)
        })
        .await
    }

    /// Replaces every line item with `items`, verbatim.
    ///
    /// Items are checked for shape, quantity range and duplicate products,
    /// but not for product existence.
    pub async fn replace_all(&self, cart_id: &str, items: Vec<LineItem>) -> ApiResult<ExpandedCart> {
        validate_id("cartId", cart_id)?;
        validate_line_items(&items)?;

        self.mutate(cart_id, "replace_all", move |cart| {
            cart.replace_items(items)?;
            Ok(true)
        })
        .await
    }

    /// Sets a line item's quantity to exactly `quantity`.
    ///
    /// ## Errors
    /// - `VALIDATION_ERROR` when `quantity` is not in `1..=999`
    /// - `NOT_FOUND` (Cart) when the cart doesn't exist
    /// - `NOT_FOUND` (CartItem) when the product is not in the cart
    pub async fn update_quantity(
        &self,
        cart_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> ApiResult<ExpandedCart> {
        validate_id("cartId", cart_id)?;
        validate_id("productId", product_id)?;
        validate_quantity(quantity)?;

        self.mutate(cart_id, "update_quantity", |cart| {
            cart.set_quantity(product_id, quantity)?;
            Ok(true)
        })
        .await
    }

    /// Empties the cart.
    pub async fn clear(&self, cart_id: &str) -> ApiResult<ExpandedCart> {
        validate_id("cartId", cart_id)?;

        self.mutate(cart_id, "clear", |cart| {
            let changed = !cart.is_empty();
            cart.clear();
            Ok(changed)
        })
        .await
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Runs `apply` on the stored cart under the cart's lock.
    ///
    /// `apply` returns whether it changed anything; unchanged carts are not
    /// written back.
    async fn mutate<F>(&self, cart_id: &str, operation: &'static str, apply: F) -> ApiResult<ExpandedCart>
    where
        F: FnOnce(&mut Cart) -> CoreResult<bool>,
    {
        let _guard = self.locks.lock(cart_id).await;

        let mut cart = self.load(cart_id).await?;

        if apply(&mut cart)? {
            self.db.carts().save_items(&cart.id, &cart.items).await?;
            debug!(cart_id = %cart.id, operation, items = cart.items.len(), "Cart saved");
        }

        let cart = self.load(cart_id).await?;
        self.expand(&cart).await
    }

    async fn load(&self, cart_id: &str) -> ApiResult<Cart> {
        self.db
            .carts()
            .get_by_id(cart_id)
            .await?
            .ok_or_else(|| ApiError::from(CoreError::CartNotFound(cart_id.to_string())))
    }

    async fn expand(&self, cart: &Cart) -> ApiResult<ExpandedCart> {
        let ids: Vec<String> = cart.items.iter().map(|i| i.product_id.clone()).collect();
        let catalog = self.db.products().get_many(&ids).await?;

        let expanded = cart.expand(&catalog);

        for item in expanded.unresolved() {
            warn!(
                cart_id = %expanded.id,
                product_id = %item.product_id,
                "Cart references a product that no longer exists"
            );
        }

        Ok(expanded)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::Utc;
    use storefront_core::{Product, MAX_ITEM_QUANTITY};
    use storefront_db::DbConfig;
    use uuid::Uuid;

    async fn setup() -> (CartService, Database) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        (CartService::new(db.clone(), CartLocks::new()), db)
    }

    async fn insert_product(db: &Database, code: &str, price_cents: i64) -> Product {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            title: format!("Product {code}"),
            description: String::new(),
            price_cents,
            code: code.to_string(),
            stock: 5,
            category: "tools".to_string(),
            status: true,
            thumbnails: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap()
    }

    #[tokio::test]
    async fn test_widget_scenario() {
        let (service, db) = setup().await;
        let cart = service.create_cart().await.unwrap();
        let widget = insert_product(&db, "W1", 1000).await;

        let expanded = service.add_product(&cart.id, &widget.id).await.unwrap();
        assert_eq!(expanded.products.len(), 1);
        assert_eq!(expanded.products[0].quantity, 1);
        assert_eq!(expanded.products[0].product.as_ref().map(|p| p.code.as_str()), Some("W1"));

        let expanded = service.add_product(&cart.id, &widget.id).await.unwrap();
        assert_eq!(expanded.products.len(), 1);
        assert_eq!(expanded.products[0].quantity, 2);

        let expanded = service.update_quantity(&cart.id, &widget.id, 7).await.unwrap();
        assert_eq!(expanded.products[0].quantity, 7);
        assert_eq!(expanded.subtotal_cents, 7000);

        let expanded = service.remove_product(&cart.id, &widget.id).await.unwrap();
        assert!(expanded.products.is_empty());
    }

    #[tokio::test]
    async fn test_get_unknown_cart() {
        let (service, _) = setup().await;

        let err = service.get_cart("missing").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.entity(), Some("Cart"));
    }

    #[tokio::test]
    async fn test_add_requires_cart_and_product() {
        let (service, db) = setup().await;
        let cart = service.create_cart().await.unwrap();
        let widget = insert_product(&db, "W1", 1000).await;

        let err = service.add_product(&cart.id, "missing").await.unwrap_err();
        assert_eq!(err.entity(), Some("Product"));

        let err = service.add_product("missing", &widget.id).await.unwrap_err();
        assert_eq!(err.entity(), Some("Cart"));
    }

    #[tokio::test]
    async fn test_remove_absent_product_returns_cart_unchanged() {
        let (service, db) = setup().await;
        let cart = service.create_cart().await.unwrap();
        let widget = insert_product(&db, "W1", 1000).await;
        let before = service.add_product(&cart.id, &widget.id).await.unwrap();

        let after = service.remove_product(&cart.id, "never-added").await.unwrap();
        assert_eq!(after, before);

        let err = service.remove_product("missing", &widget.id).await.unwrap_err();
        assert_eq!(err.entity(), Some("Cart"));
    }

    #[tokio::test]
    async fn test_update_quantity_errors() {
        let (service, db) = setup().await;
        let cart = service.create_cart().await.unwrap();
        let widget = insert_product(&db, "W1", 1000).await;
        service.add_product(&cart.id, &widget.id).await.unwrap();

        for quantity in [0, -1, MAX_ITEM_QUANTITY + 1] {
            let err = service
                .update_quantity(&cart.id, &widget.id, quantity)
                .await
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationError);
        }

        let err = service.update_quantity(&cart.id, "other", 2).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.entity(), Some("CartItem"));

        let err = service.update_quantity("missing", &widget.id, 2).await.unwrap_err();
        assert_eq!(err.entity(), Some("Cart"));

        let cart = service.get_cart(&cart.id).await.unwrap();
        assert_eq!(cart.products[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_clear_then_get_is_empty() {
        let (service, db) = setup().await;
        let cart = service.create_cart().await.unwrap();
        let a = insert_product(&db, "A", 100).await;
        let b = insert_product(&db, "B", 200).await;
        service.add_product(&cart.id, &a.id).await.unwrap();
        service.add_product(&cart.id, &b.id).await.unwrap();

        let cleared = service.clear(&cart.id).await.unwrap();
        assert!(cleared.products.is_empty());

        let fetched = service.get_cart(&cart.id).await.unwrap();
        assert!(fetched.products.is_empty());
        assert_eq!(fetched.total_quantity, 0);
    }

    #[tokio::test]
    async fn test_replace_all_keeps_order_and_tolerates_unknown_products() {
        let (service, db) = setup().await;
        let cart = service.create_cart().await.unwrap();
        let a = insert_product(&db, "A", 100).await;

        let expanded = service
            .replace_all(
                &cart.id,
                vec![LineItem::new("ghost", 2), LineItem::new(a.id.clone(), 3)],
            )
            .await
            .unwrap();

        let ids: Vec<&str> = expanded.products.iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, vec!["ghost", a.id.as_str()]);
        assert!(expanded.products[0].product.is_none());
        assert!(expanded.products[1].product.is_some());
        assert_eq!(expanded.total_quantity, 5);
        assert_eq!(expanded.subtotal_cents, 300);
    }

    #[tokio::test]
    async fn test_replace_all_with_very_long_sequence_stays_readable() {
        let (service, db) = setup().await;
        let cart = service.create_cart().await.unwrap();
        let a = insert_product(&db, "A", 100).await;

        let mut items: Vec<LineItem> = (0..40_000)
            .map(|i| LineItem::new(format!("ghost-{i}"), 1))
            .collect();
        items.push(LineItem::new(a.id.clone(), 2));

        let replaced = service.replace_all(&cart.id, items).await.unwrap();
        assert_eq!(replaced.products.len(), 40_001);
        assert_eq!(replaced.total_quantity, 40_002);
        assert_eq!(replaced.subtotal_cents, 200);

        let fetched = service.get_cart(&cart.id).await.unwrap();
        assert_eq!(fetched.products.len(), 40_001);
        assert!(fetched.item(&a.id).unwrap().is_resolved());
        assert_eq!(fetched.unresolved().count(), 40_000);
    }

    #[tokio::test]
    async fn test_replace_all_rejects_bad_items_without_writing() {
        let (service, db) = setup().await;
        let cart = service.create_cart().await.unwrap();
        let a = insert_product(&db, "A", 100).await;
        service.add_product(&cart.id, &a.id).await.unwrap();

        let bad = [
            vec![LineItem::new("x", 0)],
            vec![LineItem::new("x", 1), LineItem::new("x", 2)],
            vec![LineItem::new(" ", 1)],
        ];
        for items in bad {
            let err = service.replace_all(&cart.id, items).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationError);
        }

        let err = service.replace_all("missing", Vec::new()).await.unwrap_err();
        assert_eq!(err.entity(), Some("Cart"));

        let unchanged = service.get_cart(&cart.id).await.unwrap();
        assert_eq!(unchanged.products.len(), 1);
    }

    #[tokio::test]
    async fn test_add_past_maximum_quantity() {
        let (service, db) = setup().await;
        let cart = service.create_cart().await.unwrap();
        let a = insert_product(&db, "A", 100).await;
        service
            .replace_all(&cart.id, vec![LineItem::new(a.id.clone(), MAX_ITEM_QUANTITY)])
            .await
            .unwrap();

        let err = service.add_product(&cart.id, &a.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_concurrent_adds_are_serialized() {
        let (service, db) = setup().await;
        let cart = service.create_cart().await.unwrap();
        let widget = insert_product(&db, "W1", 1000).await;

        let tasks: Vec<_> = (0..20)
            .map(|_| {
                let service = service.clone();
                let cart_id = cart.id.clone();
                let product_id = widget.id.clone();
                tokio::spawn(async move { service.add_product(&cart_id, &product_id).await })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let expanded = service.get_cart(&cart.id).await.unwrap();
        assert_eq!(expanded.products.len(), 1);
        assert_eq!(expanded.products[0].quantity, 20);
    }
}
