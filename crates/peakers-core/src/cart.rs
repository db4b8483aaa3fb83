//! # Cart
//!
//! Ordered, in-memory collection of line items for the sale in progress.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Cashier Action          Method                  Cart Change            │
//! │  ──────────────          ──────                  ───────────            │
//! │                                                                         │
//! │  Tap product ──────────► add(&product) ────────► qty + 1 or push line  │
//! │                           stock < 1 ─────────────► OutOfStock, no-op    │
//! │                                                                         │
//! │  Change quantity ──────► set_quantity(id, n) ──► lines[i].qty = n      │
//! │                           n < 1 / n > stock ─────► error, no-op         │
//! │                                                                         │
//! │  Tap remove ───────────► remove(id) ───────────► lines.remove(i)       │
//! │                                                                         │
//! │  Sale completed ───────► clear() ──────────────► lines.clear()         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per [`ItemId`]
//! - `quantity >= 1` on every line
//! - `subtotal == unit_price × quantity`, recomputed on every change
//! - Every rejected operation leaves the cart exactly as it was

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{ItemId, SaleProduct};

// =============================================================================
// Cart Line
// =============================================================================

/// One product (or bundle) in the cart.
///
/// ## Design Notes
/// Name, unit price and stock are frozen from the product listing when the
/// line is created. Fields are private so the subtotal can never drift from
/// `unit_price × quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    product_id: i64,
    name: String,
    unit_price: Money,
    quantity: i64,
    subtotal: Money,
    is_bundle: bool,
    /// Stock the listing reported when the line was created.
    known_stock: i64,
}

impl CartLine {
    fn from_product(product: &SaleProduct) -> Self {
        CartLine {
            product_id: product.product_id,
            name: product.product_name.clone(),
            unit_price: product.product_price,
            quantity: 1,
            subtotal: product.product_price,
            is_bundle: product.is_bundle,
            known_stock: product.product_stock,
        }
    }

    fn set_quantity_unchecked(&mut self, quantity: i64) {
        self.quantity = quantity;
        self.subtotal = self.unit_price.multiply_quantity(quantity);
    }

    pub fn item_id(&self) -> ItemId {
        ItemId::new(self.product_id, self.is_bundle)
    }

    pub fn product_id(&self) -> i64 {
        self.product_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn is_bundle(&self) -> bool {
        self.is_bundle
    }

    pub fn known_stock(&self) -> i64 {
        self.known_stock
    }
}

// =============================================================================
// Cart
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit of `product`.
    ///
    /// ## Behavior
    /// - Already in the cart: quantity + 1, subtotal recomputed
    /// - Not in the cart: appended with quantity 1
    /// - Listing stock below 1: `OutOfStock`, cart unchanged
    ///
    /// Incrementing an existing line does not re-check stock; the quantity
    /// editor is where the stock ceiling is enforced.
    pub fn add(&mut self, product: &SaleProduct) -> CoreResult<&CartLine> {
        if !product.in_stock() {
            return Err(CoreError::OutOfStock {
                product: product.product_name.clone(),
            });
        }

        let id = product.item_id();
        let index = match self.lines.iter().position(|l| l.item_id() == id) {
            Some(i) => {
                let line = &mut self.lines[i];
                line.set_quantity_unchecked(line.quantity + 1);
                i
            }
            None => {
                self.lines.push(CartLine::from_product(product));
                self.lines.len() - 1
            }
        };

        Ok(&self.lines[index])
    }

    /// Sets the quantity of an existing line.
    ///
    /// ## Returns
    /// - `QuantityBelowOne` if `quantity < 1`
    /// - `StockLimit` if `quantity` exceeds the line's known stock
    /// - `NotInCart` if there is no such line
    pub fn set_quantity(&mut self, id: ItemId, quantity: i64) -> CoreResult<&CartLine> {
        if quantity < 1 {
            return Err(CoreError::QuantityBelowOne);
        }

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.item_id() == id)
            .ok_or_else(|| CoreError::NotInCart(id.to_string()))?;

        if quantity > line.known_stock {
            return Err(CoreError::StockLimit {
                available: line.known_stock,
            });
        }

        line.set_quantity_unchecked(quantity);
        Ok(line)
    }

    /// Removes the line for `id`.
    pub fn remove(&mut self, id: ItemId) -> CoreResult<CartLine> {
        let index = self
            .lines
            .iter()
            .position(|l| l.item_id() == id)
            .ok_or_else(|| CoreError::NotInCart(id.to_string()))?;
        Ok(self.lines.remove(index))
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn get(&self, id: ItemId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.item_id() == id)
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total quantity across all lines (the cart badge).
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Σ line subtotals.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(|l| l.subtotal).sum()
    }

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

    fn product(id: i64, price_major: i64, stock: i64) -> SaleProduct {
        SaleProduct {
            product_id: id,
            product_name: format!("Product {id}"),
            product_price: Money::from_major(price_major),
            product_stock: stock,
            is_bundle: false,
        }
    }

    #[test]
    fn test_add_appends_then_increments() {
        let mut cart = Cart::new();
        let soda = product(1, 60, 10);

        cart.add(&soda).unwrap();
        let line = cart.add(&soda).unwrap();

        assert_eq!(line.quantity(), 2);
        assert_eq!(line.subtotal(), Money::from_major(120));
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_add_out_of_stock_is_rejected() {
        let mut cart = Cart::new();
        let err = cart.add(&product(1, 60, 0)).unwrap_err();

        assert!(matches!(err, CoreError::OutOfStock { .. }));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_bundle_and_product_with_same_id_are_separate_lines() {
        let mut cart = Cart::new();
        let mut bundle = product(1, 500, 3);
        bundle.is_bundle = true;

        cart.add(&product(1, 60, 10)).unwrap();
        cart.add(&bundle).unwrap();

        assert_eq!(cart.line_count(), 2);
        assert!(cart.get(ItemId::Bundle(1)).unwrap().is_bundle());
    }

    #[test]
    fn test_set_quantity_above_stock_keeps_previous_quantity() {
        let mut cart = Cart::new();
        let p = product(1, 100, 5);
        cart.add(&p).unwrap();
        cart.set_quantity(p.item_id(), 3).unwrap();

        let err = cart.set_quantity(p.item_id(), 6).unwrap_err();

        assert_eq!(err, CoreError::StockLimit { available: 5 });
        assert_eq!(cart.get(p.item_id()).unwrap().quantity(), 3);
        assert_eq!(cart.subtotal(), Money::from_major(300));
    }

    #[test]
    fn test_set_quantity_below_one_is_rejected() {
        let mut cart = Cart::new();
        let p = product(1, 100, 5);
        cart.add(&p).unwrap();

        assert_eq!(
            cart.set_quantity(p.item_id(), 0).unwrap_err(),
            CoreError::QuantityBelowOne
        );
        assert_eq!(cart.get(p.item_id()).unwrap().quantity(), 1);
    }

    #[test]
    fn test_set_quantity_recomputes_subtotal() {
        let mut cart = Cart::new();
        let p = product(1, 100, 5);
        cart.add(&p).unwrap();

        let line = cart.set_quantity(p.item_id(), 4).unwrap();
        assert_eq!(line.subtotal(), Money::from_major(400));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::new();
        cart.add(&product(1, 100, 5)).unwrap();
        cart.add(&product(2, 50, 5)).unwrap();
        cart.add(&product(2, 50, 5)).unwrap();
        assert_eq!(cart.total_quantity(), 3);

        let removed = cart.remove(ItemId::Product(1)).unwrap();
        assert_eq!(removed.product_id(), 1);
        assert!(matches!(
            cart.remove(ItemId::Product(1)),
            Err(CoreError::NotInCart(_))
        ));

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Money::zero());
    }

    #[test]
    fn test_subtotal_is_exact_sum_of_lines() {
        let mut cart = Cart::new();
        let a = SaleProduct {
            product_price: Money::from_cents(3333),
            ..product(1, 0, 10)
        };
        let b = SaleProduct {
            product_price: Money::from_cents(1),
            ..product(2, 0, 10)
        };
        cart.add(&a).unwrap();
        cart.set_quantity(a.item_id(), 3).unwrap();
        cart.add(&b).unwrap();

        assert_eq!(cart.subtotal().cents(), 3333 * 3 + 1);
    }
}
