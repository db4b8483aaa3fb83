//! # Checkout
//!
//! The per-session sales state and the payload sent to `POST /process-sale`.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SalesSession ──► prepare_checkout() ──► PendingSale                    │
//! │       │               │                     │                           │
//! │       │               ├─ empty cart ───────► EmptyCart           (stop) │
//! │       │               └─ no customer ──────► NoCustomerSelected  (stop) │
//! │       │                                     │                           │
//! │       │                        request ─────┘──► backend (client crate) │
//! │       │                                              │                  │
//! │       │◄──── complete_sale(order_number) ◄── success ┘                  │
//! │       │        clear cart, deselect customer,                           │
//! │       │        VAT → default, discount → 0, build Receipt               │
//! │       │                                                                 │
//! │       └──── failure: nothing is touched                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartLine};
use crate::error::{CoreError, CoreResult};
use crate::money::{self, Money};
use crate::pricing::PriceBreakdown;
use crate::receipt::{Receipt, ReceiptLine};
use crate::types::{CompanyDetails, Customer, PaymentType, VatRate};

// =============================================================================
// Wire Payload
// =============================================================================

/// One entry of `cart_items` in the checkout body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub product_id: i64,
    pub quantity: i64,
    #[serde(with = "money::major_units")]
    pub subtotal: Money,
    pub is_bundle: bool,
}

impl From<&CartLine> for CheckoutItem {
    fn from(line: &CartLine) -> Self {
        CheckoutItem {
            product_id: line.product_id(),
            quantity: line.quantity(),
            subtotal: line.subtotal(),
            is_bundle: line.is_bundle(),
        }
    }
}

/// Body of `POST /process-sale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub customer_id: i64,
    pub payment_type: PaymentType,
    pub cart_items: Vec<CheckoutItem>,
    #[serde(with = "money::major_units")]
    pub vat: Money,
    #[serde(with = "money::major_units")]
    pub discount: Money,
}

/// Successful `POST /process-sale` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutResponse {
    #[serde(deserialize_with = "order_number")]
    pub order_number: String,
}

/// Order numbers are strings, but some backends send a bare integer.
fn order_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
    }
    let raw: Option<Raw> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(Raw::Text(s)) => s,
        Some(Raw::Int(i)) => i.to_string(),
        None => String::new(),
    })
}

// =============================================================================
// Pending Sale
// =============================================================================

/// A validated checkout, frozen at the moment it was submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSale {
    pub request: CheckoutRequest,
    pub breakdown: PriceBreakdown,
    pub vat_rate: VatRate,
    pub customer: Customer,
    pub lines: Vec<CartLine>,
}

// =============================================================================
// Sales Session
// =============================================================================

/// Values a session falls back to after each completed sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleDefaults {
    pub vat_rate: VatRate,
    pub payment_type: PaymentType,
}

impl Default for SaleDefaults {
    fn default() -> Self {
        SaleDefaults {
            vat_rate: VatRate::default(),
            payment_type: PaymentType::Mpesa,
        }
    }
}

/// Everything the sales screen holds between taps.
#[derive(Debug, Clone, Default)]
pub struct SalesSession {
    pub cart: Cart,
    customer: Option<Customer>,
    vat_rate: VatRate,
    discount: Money,
    payment_type: PaymentType,
    defaults: SaleDefaults,
}

impl SalesSession {
    pub fn new(defaults: SaleDefaults) -> Self {
        SalesSession {
            cart: Cart::new(),
            customer: None,
            vat_rate: defaults.vat_rate,
            discount: Money::zero(),
            payment_type: defaults.payment_type.clone(),
            defaults,
        }
    }

    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    pub fn select_customer(&mut self, customer: Customer) {
        self.customer = Some(customer);
    }

    pub fn deselect_customer(&mut self) {
        self.customer = None;
    }

    pub fn vat_rate(&self) -> VatRate {
        self.vat_rate
    }

    pub fn set_vat_rate(&mut self, rate: VatRate) {
        self.vat_rate = rate;
    }

    pub fn discount(&self) -> Money {
        self.discount
    }

    pub fn set_discount(&mut self, discount: Money) {
        self.discount = discount;
    }

    pub fn payment_type(&self) -> &PaymentType {
        &self.payment_type
    }

    pub fn set_payment_type(&mut self, payment_type: PaymentType) {
        self.payment_type = payment_type;
    }

    /// Live totals for the cart view.
    pub fn totals(&self) -> PriceBreakdown {
        PriceBreakdown::compute(self.cart.lines(), self.vat_rate, self.discount)
    }

    /// Validates the session and freezes the checkout payload.
    ///
    /// ## Returns
    /// - `EmptyCart` if there are no lines
    /// - `NoCustomerSelected` if no customer is attached
    pub fn prepare_checkout(&self) -> CoreResult<PendingSale> {
        if self.cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        let customer = self
            .customer
            .clone()
            .ok_or(CoreError::NoCustomerSelected)?;

        let breakdown = self.totals();
        let request = CheckoutRequest {
            customer_id: customer.id,
            payment_type: self.payment_type.clone(),
            cart_items: self.cart.lines().iter().map(CheckoutItem::from).collect(),
            vat: breakdown.vat,
            discount: breakdown.discount,
        };

        Ok(PendingSale {
            request,
            breakdown,
            vat_rate: self.vat_rate,
            customer,
            lines: self.cart.lines().to_vec(),
        })
    }

    /// Applies a successful checkout: resets the session and returns the
    /// receipt for `pending`.
    pub fn complete_sale(
        &mut self,
        pending: PendingSale,
        order_number: String,
        company: &CompanyDetails,
        printed_at: NaiveDateTime,
    ) -> Receipt {
        self.reset_after_sale();

        Receipt {
            company: company.company.clone(),
            company_phone: company.company_phone.clone(),
            order_number,
            printed_at,
            customer_name: pending.customer.name,
            lines: pending.lines.iter().map(ReceiptLine::from).collect(),
            vat_rate: pending.vat_rate,
            breakdown: pending.breakdown,
            payment_type: pending.request.payment_type,
        }
    }

    /// Clears the cart, deselects the customer and restores VAT/discount.
    pub fn reset_after_sale(&mut self) {
        self.cart.clear();
        self.customer = None;
        self.vat_rate = self.defaults.vat_rate;
        self.discount = Money::zero();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
