//! # Cart Rules
//!
//! Line-item mutations on a [`Cart`] and read-time expansion into an
//! [`ExpandedCart`].
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Line-Item Mutations                                │
//! │                                                                         │
//! │  add_one(p)          p present? ──yes──► quantity += 1 (cap 999)       │
//! │                                 └─no───► push { p, 1 }                 │
//! │                                                                         │
//! │  remove_product(p)   retain(!= p)        absent p is a no-op           │
//! │                                                                         │
//! │  set_quantity(p, n)  validate n ──► items[p].quantity = n              │
//! │                                     absent p ──► ProductNotInCart      │
//! │                                                                         │
//! │  replace_items(v)    validate v ──► items = v (verbatim order)         │
//! │                                                                         │
//! │  clear()             items = []                                        │
//! │                                                                         │
//! │  INVARIANT: product references are unique, every quantity >= 1         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these touch a store. The cart service reads the cart, applies one
//! of these under the cart's lock, then writes the result back.

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Cart, ExpandedCart, ExpandedLineItem, LineItem, Product};
use crate::validation::{validate_line_items, validate_quantity};
use crate::MAX_ITEM_QUANTITY;

impl Cart {
    /// Adds exactly one unit of a product.
    ///
    /// Merges into the existing line item when the product is already in
    /// the cart, otherwise appends a new line item with quantity 1.
    ///
    /// ## Returns
    /// The line item's quantity after the add.
    ///
    /// ## Errors
    /// [`CoreError::QuantityTooLarge`] if the merge would pass
    /// [`MAX_ITEM_QUANTITY`]; the cart is left unchanged.
    pub fn add_one(&mut self, product_id: &str) -> CoreResult<i64> {
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            let new_qty = item.quantity + 1;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            item.quantity = new_qty;
            return Ok(new_qty);
        }

        self.items.push(LineItem::new(product_id, 1));
        Ok(1)
    }

    /// Removes the line item for a product.
    ///
    /// Returns `false` when the product was not in the cart, which callers
    /// treat as a no-op rather than an error.
    pub fn remove_product(&mut self, product_id: &str) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        self.items.len() != initial_len
    }

    /// Sets a line item's quantity to exactly `quantity`.
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        let item = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product_id)
            .ok_or_else(|| CoreError::ProductNotInCart {
                cart_id: self.id.clone(),
                product_id: product_id.to_string(),
            })?;

        item.quantity = quantity;
        Ok(())
    }

    /// Replaces every line item with `items`, keeping their order.
    pub fn replace_items(&mut self, items: Vec<LineItem>) -> CoreResult<()> {
        validate_line_items(&items)?;
        self.items = items;
        Ok(())
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns the total quantity of all items.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Resolves every line item against `catalog`.
    ///
    /// A reference missing from `catalog` is kept with `product: None`
    /// instead of failing the whole read.
    pub fn expand(&self, catalog: &HashMap<String, Product>) -> ExpandedCart {
        let products: Vec<ExpandedLineItem> = self
            .items
            .iter()
            .map(|item| ExpandedLineItem {
                product_id: item.product_id.clone(),
                product: catalog.get(&item.product_id).cloned(),
                quantity: item.quantity,
            })
            .collect();

        let subtotal: Money = products.iter().map(ExpandedLineItem::line_total).sum();

        ExpandedCart {
            id: self.id.clone(),
            total_quantity: self.total_quantity(),
            subtotal_cents: subtotal.cents(),
            products,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
