//! # Money Module
//!
//! Provides the `Money` type for cart totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌                                  │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Product.price_cents ──► line total ──► ExpandedCart.subtotal_cents   │
//! │    Sorting by price compares integers, never floats                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::money::Money;
//!
//! let line = Money::from_cents(1099).multiply_quantity(3);
//! let subtotal: Money = [line, Money::from_cents(3)].into_iter().sum();
//! assert_eq!(subtotal.cents(), 3300);
//! ```

use std::iter::Sum;
use std::ops::Add;

/// A monetary value in the smallest currency unit (cents).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Multiplies a unit price by a line-item quantity.
    ///
    /// Saturates instead of overflowing; quantities are capped at
    /// [`crate::MAX_ITEM_QUANTITY`] so this only matters for corrupt data.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

/// Subtotal of line totals.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::default(), |acc, m| acc + m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_of_lines() {
        let total: Money = [Money::from_cents(199), Money::from_cents(1), Money::default()]
            .into_iter()
            .sum();
        assert_eq!(total.cents(), 200);
    }

    #[test]
    fn test_multiply_quantity_saturates() {
        let huge = Money::from_cents(i64::MAX);
        assert_eq!(huge.multiply_quantity(2).cents(), i64::MAX);
        assert_eq!(Money::from_cents(0).multiply_quantity(7).cents(), 0);
        assert_eq!(Money::from_cents(250).multiply_quantity(4).cents(), 1000);
    }
}
