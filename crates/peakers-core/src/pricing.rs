//! # Pricing Calculator
//!
//! Pure totals for the cart: subtotal, VAT, discount and final total.
//!
//! ```text
//!   subtotal = Σ line.subtotal
//!   vat      = subtotal × rate         (rounded half away from zero)
//!   total    = subtotal + vat − discount
//! ```
//!
//! Nothing here validates its inputs. A negative rate, a negative discount,
//! or a discount larger than the subtotal all flow straight through, so the
//! total can go below zero.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartLine;
use crate::money::Money;
use crate::types::VatRate;

/// Computed totals for a set of cart lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceBreakdown {
    pub subtotal: Money,
    pub vat: Money,
    pub discount: Money,
    pub total: Money,
}

impl PriceBreakdown {
    /// Computes totals for `lines` at `rate` with a flat `discount`.
    ///
    /// ## Example
    /// ```rust
    /// use peakers_core::money::Money;
    /// use peakers_core::pricing::PriceBreakdown;
    /// use peakers_core::types::VatRate;
    ///
    /// let t = PriceBreakdown::from_subtotal(
    ///     Money::from_major(200),
    ///     VatRate::from_fraction(0.16),
    ///     Money::from_major(10),
    /// );
    /// assert_eq!(t.vat, Money::from_major(32));
    /// assert_eq!(t.total, Money::from_major(222));
    /// ```
    pub fn compute(lines: &[CartLine], rate: VatRate, discount: Money) -> Self {
        let subtotal = lines.iter().map(CartLine::subtotal).sum();
        Self::from_subtotal(subtotal, rate, discount)
    }

    pub fn from_subtotal(subtotal: Money, rate: VatRate, discount: Money) -> Self {
        let vat = subtotal.calculate_vat(rate);
        PriceBreakdown {
            subtotal,
            vat,
            discount,
            total: subtotal + vat - discount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::Cart;
    use crate::types::SaleProduct;

    fn cart_with(price_major: i64, qty: i64) -> Cart {
        let p = SaleProduct {
            product_id: 1,
            product_name: "Item".to_string(),
            product_price: Money::from_major(price_major),
            product_stock: 100,
            is_bundle: false,
        };
        let mut cart = Cart::new();
        cart.add(&p).unwrap();
        cart.set_quantity(p.item_id(), qty).unwrap();
        cart
    }

    #[test]
    fn test_checkout_scenario() {
        let cart = cart_with(100, 2);
        let t = PriceBreakdown::compute(
            cart.lines(),
            VatRate::from_fraction(0.16),
            Money::from_major(10),
        );

        assert_eq!(t.subtotal, Money::from_major(200));
        assert_eq!(t.vat, Money::from_major(32));
        assert_eq!(t.total, Money::from_major(222));
    }

    #[test]
    fn test_empty_cart_totals_are_minus_discount() {
        let t = PriceBreakdown::compute(&[], VatRate::default(), Money::from_major(5));
        assert_eq!(t.subtotal, Money::zero());
        assert_eq!(t.total, Money::from_major(-5));
    }

    #[test]
    fn test_out_of_range_inputs_pass_through() {
        let t = PriceBreakdown::from_subtotal(
            Money::from_major(100),
            VatRate::from_bps(-1000),
            Money::from_major(200),
        );
        assert_eq!(t.vat, Money::from_major(-10));
        assert_eq!(t.total, Money::from_major(-110));
    }

    #[test]
    fn test_total_identity_for_non_negative_inputs() {
        for (sub, bps, disc) in [(0, 0, 0), (1999, 1600, 0), (123_456, 825, 5_000)] {
            let subtotal = Money::from_cents(sub);
            let rate = VatRate::from_bps(bps);
            let discount = Money::from_cents(disc);
            let t = PriceBreakdown::from_subtotal(subtotal, rate, discount);
            assert_eq!(t.total, subtotal + subtotal.calculate_vat(rate) - discount);
        }
    }
}
