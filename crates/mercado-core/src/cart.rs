//! # Cart
//!
//! In-memory cart for the current sale session.
//!
//! ## Invariants
//! - Lines are unique by `product_id`; adding the same product again
//!   increments its quantity.
//! - Quantity is always > 0; a decrement that reaches zero deletes the line.
//! - Name and price are snapshotted when the line is created. A price edit
//!   mid-session does not retroactively change lines already in the cart:
//!   once an item is rung up, its price is fixed. This is intentional.
//!
//! Stock is checked against the product row the caller just re-read from
//! the store, never against anything cached in the cart itself. The final
//! authority on stock remains the checkout transaction in mercado-db,
//! which re-validates every line against live stock.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;

// =============================================================================
// Cart Line
// =============================================================================

/// A line in the cart: one product and how many units of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product id (for the stock re-check at checkout).
    pub product_id: i64,

    /// Product name at time of first add (frozen).
    pub name: String,

    /// Unit price in centavos at time of first add (frozen).
    pub unit_price_cents: i64,

    /// Units in the cart; always > 0.
    pub quantity: i64,
}

impl CartLine {
    /// Creates a new line from a product, with quantity one.
    fn from_product(product: &Product) -> Self {
        CartLine {
            product_id: product.id,
            name: product.name.clone(),
            unit_price_cents: product.price_cents,
            quantity: 1,
        }
    }

    /// Line subtotal (unit price × quantity) in centavos.
    #[inline]
    pub fn subtotal_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }

    /// Line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents())
    }
}

// =============================================================================
// Remove Outcome
// =============================================================================

/// Result of removing one unit from the cart.
///
/// Removing a product that is not in the cart is a no-op the caller
/// reports as a warning, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// Quantity decremented, line still present.
    Decremented,
    /// Quantity reached zero, line deleted.
    LineCleared,
    /// Product was not in the cart; nothing changed.
    NotInCart,
}

// =============================================================================
// Cart
// =============================================================================

/// The cart for one sale session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds one unit of `product`, which the caller has just re-read from
    /// the inventory store.
    ///
    /// Fails with [`CoreError::InsufficientStock`] when the quantity
    /// already in the cart has reached the product's persisted stock; a
    /// failed add leaves the cart untouched.
    pub fn add_unit(&mut self, product: &Product) -> CoreResult<()> {
        let in_cart = self.quantity_of(product.id);

        if product.stock_quantity <= in_cart {
            return Err(CoreError::InsufficientStock {
                name: product.name.clone(),
                available: product.stock_quantity,
                requested: in_cart + 1,
            });
        }

        match self.lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => line.quantity += 1,
            None => self.lines.push(CartLine::from_product(product)),
        }

        Ok(())
    }

    /// Removes one unit of the given product.
    ///
    /// A quantity that reaches zero deletes the line.
    pub fn remove_unit(&mut self, product_id: i64) -> RemoveOutcome {
        let Some(pos) = self.lines.iter().position(|l| l.product_id == product_id) else {
            return RemoveOutcome::NotInCart;
        };

        if self.lines[pos].quantity > 1 {
            self.lines[pos].quantity -= 1;
            RemoveOutcome::Decremented
        } else {
            self.lines.remove(pos);
            RemoveOutcome::LineCleared
        }
    }

    /// Quantity of a product currently in the cart (0 if absent).
    pub fn quantity_of(&self, product_id: i64) -> i64 {
        self.lines
            .iter()
            .find(|l| l.product_id == product_id)
            .map(|l| l.quantity)
            .unwrap_or(0)
    }

    /// Sum of price × quantity over all lines, in centavos. Pure.
    pub fn subtotal_cents(&self) -> i64 {
        self.lines.iter().map(|l| l.subtotal_cents()).sum()
    }

    /// Cart subtotal as Money.
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents())
    }

    /// Empties all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// The current lines, in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, price_cents: i64, stock: i64) -> Product {
        Product {
            id,
            name: format!("Produto {}", id),
            price_cents,
            stock_quantity: stock,
        }
    }

    #[test]
    fn test_add_creates_line_with_snapshot() {
        let mut cart = Cart::new();
        let p = product(1, 1050, 5);

        cart.add_unit(&p).unwrap();

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].name, "Produto 1");
        assert_eq!(cart.lines()[0].unit_price_cents, 1050);
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn test_add_same_product_increments_quantity() {
        let mut cart = Cart::new();
        let p = product(1, 1050, 5);

        cart.add_unit(&p).unwrap();
        cart.add_unit(&p).unwrap();

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.quantity_of(1), 2);
        assert_eq!(cart.subtotal_cents(), 2100);
    }

    #[test]
    fn test_add_fails_when_cart_reaches_stock() {
        let mut cart = Cart::new();
        let p = product(1, 1050, 2);

        cart.add_unit(&p).unwrap();
        cart.add_unit(&p).unwrap();

        let err = cart.add_unit(&p).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                available: 2,
                requested: 3,
                ..
            }
        ));

        // The failed add must not mutate the cart.
        assert_eq!(cart.quantity_of(1), 2);
        assert_eq!(cart.subtotal_cents(), 2100);
    }

    #[test]
    fn test_add_fails_on_zero_stock() {
        let mut cart = Cart::new();
        let p = product(1, 1050, 0);

        assert!(cart.add_unit(&p).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_price_snapshot_survives_price_change() {
        let mut cart = Cart::new();
        let mut p = product(1, 1050, 5);

        cart.add_unit(&p).unwrap();

        // Price edited mid-session: already-added line keeps the old price,
        // further adds of the same line do too.
        p.price_cents = 9999;
        cart.add_unit(&p).unwrap();

        assert_eq!(cart.lines()[0].unit_price_cents, 1050);
        assert_eq!(cart.subtotal_cents(), 2100);
    }

    #[test]
    fn test_remove_decrements_then_clears_line() {
        let mut cart = Cart::new();
        let p = product(1, 500, 5);

        cart.add_unit(&p).unwrap();
        cart.add_unit(&p).unwrap();

        assert_eq!(cart.remove_unit(1), RemoveOutcome::Decremented);
        assert_eq!(cart.quantity_of(1), 1);

        assert_eq!(cart.remove_unit(1), RemoveOutcome::LineCleared);
        assert_eq!(cart.quantity_of(1), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_absent_product_is_reported_noop() {
        let mut cart = Cart::new();
        let p = product(1, 500, 5);
        cart.add_unit(&p).unwrap();

        assert_eq!(cart.remove_unit(42), RemoveOutcome::NotInCart);
        assert_eq!(cart.quantity_of(1), 1);
    }

    /// Subtotal stays equal to the sum over positive-quantity lines for an
    /// arbitrary add/remove sequence, and no line ever holds quantity <= 0.
    #[test]
    fn test_subtotal_invariant_over_mixed_sequence() {
        let mut cart = Cart::new();
        let a = product(1, 1050, 10);
        let b = product(2, 299, 10);

        cart.add_unit(&a).unwrap();
        cart.add_unit(&b).unwrap();
        cart.add_unit(&a).unwrap();
        cart.remove_unit(2);
        cart.add_unit(&b).unwrap();
        cart.remove_unit(1);
        cart.add_unit(&a).unwrap();

        let expected: i64 = cart
            .lines()
            .iter()
            .map(|l| l.unit_price_cents * l.quantity)
            .sum();
        assert_eq!(cart.subtotal_cents(), expected);
        assert!(cart.lines().iter().all(|l| l.quantity > 0));
        assert_eq!(cart.quantity_of(1), 2);
        assert_eq!(cart.quantity_of(2), 1);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_unit(&product(1, 500, 5)).unwrap();
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal_cents(), 0);
    }
}
