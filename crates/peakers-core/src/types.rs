//! # Domain Types
//!
//! Shared vocabulary of the sales screen and everything around it.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    VatRate      │   │   PaymentType   │   │   OrderStatus   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (i32)      │   │  Mpesa / Cash   │   │  completed      │       │
//! │  │  1600 = 16%     │   │  Bank / Card    │   │  voided         │       │
//! │  └─────────────────┘   │  Other(String)  │   │  refunded       │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     ItemId      │   │  SaleProduct    │   │    Customer     │       │
//! │  │  Product(42)    │   │  id/name/price  │   │  id + name      │       │
//! │  │  Bundle(7)      │   │  stock, bundle  │   │  contact info   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Backend ids are plain integers. Products and bundles live in separate
//! tables, so the pair (id, bundle flag) is what identifies a sellable item.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::{self, Money};
use crate::serde_helpers::{lenient_i64, null_as_default};

// =============================================================================
// VAT Rate
// =============================================================================

/// VAT rate represented in basis points (bps).
///
/// ## Why Signed?
/// The pricing calculator accepts any rate as-is, including negative ones.
/// 1600 bps = 16% (Kenyan standard rate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VatRate(i32);

impl VatRate {
    /// Creates a VAT rate from basis points.
    #[inline]
    pub const fn from_bps(bps: i32) -> Self {
        VatRate(bps)
    }

    /// Creates a VAT rate from a fraction (`0.16` → 16%).
    pub fn from_fraction(fraction: f64) -> Self {
        VatRate((fraction * 10_000.0).round() as i32)
    }

    /// Creates a VAT rate from a whole or decimal percentage (`16` → 16%).
    ///
    /// Rounds to the nearest basis point, so `16.125` becomes 1613 bps.
    /// Use [`VatRate::parse_percent`] for typed input, which refuses
    /// percentages finer than a basis point.
    pub fn from_percent(pct: f64) -> Self {
        VatRate((pct * 100.0).round() as i32)
    }

    /// Parses what a cashier types into the VAT field (`"16"`, `"7.5"`).
    ///
    /// At most two decimal places are accepted, the precision of a basis point.
    pub fn parse_percent(input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();
        if input.split_once('.').is_some_and(|(_, frac)| frac.len() > 2) {
            return Err(ValidationError::InvalidFormat {
                field: "VAT".to_string(),
                reason: format!("'{input}' has more than two decimal places"),
            });
        }
        let pct: f64 = input
            .parse()
            .map_err(|_| ValidationError::InvalidFormat {
                field: "VAT".to_string(),
                reason: format!("'{input}' is not a percentage"),
            })?;
        if !pct.is_finite() {
            return Err(ValidationError::InvalidFormat {
                field: "VAT".to_string(),
                reason: "percentage must be a finite number".to_string(),
            });
        }
        Ok(VatRate::from_percent(pct))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> i32 {
        self.0
    }

    /// Returns the rate as a fraction (`0.16`).
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / 10_000.0
    }

    /// Percentage rounded to a whole number, as printed on receipts.
    pub fn percent_label(&self) -> String {
        format!("{:.0}", self.0 as f64 / 100.0)
    }

    #[inline]
    pub const fn zero() -> Self {
        VatRate(0)
    }
}

impl Default for VatRate {
    fn default() -> Self {
        VatRate(crate::DEFAULT_VAT_BPS)
    }
}

// =============================================================================
// Item Identity
// =============================================================================

/// Identifies a sellable item: a plain product or a bundle.
///
/// Displays as `42` or `bundle-7`, which is also how the catalog keys
/// merged entries and what the CLI accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemId {
    Product(i64),
    Bundle(i64),
}

impl ItemId {
    pub const BUNDLE_PREFIX: &'static str = "bundle-";

    pub fn new(id: i64, is_bundle: bool) -> Self {
        if is_bundle {
            ItemId::Bundle(id)
        } else {
            ItemId::Product(id)
        }
    }

    /// The raw backend id, without the bundle prefix.
    pub fn raw(&self) -> i64 {
        match self {
            ItemId::Product(id) | ItemId::Bundle(id) => *id,
        }
    }

    pub fn is_bundle(&self) -> bool {
        matches!(self, ItemId::Bundle(_))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Product(id) => write!(f, "{id}"),
            ItemId::Bundle(id) => write!(f, "{}{id}", Self::BUNDLE_PREFIX),
        }
    }
}

impl FromStr for ItemId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (digits, bundle) = match s.strip_prefix(Self::BUNDLE_PREFIX) {
            Some(rest) => (rest, true),
            None => (s, false),
        };
        let id = digits.parse().map_err(|_| ValidationError::InvalidFormat {
            field: "item id".to_string(),
            reason: format!("'{s}' is not a product or bundle id"),
        })?;
        Ok(ItemId::new(id, bundle))
    }
}

// =============================================================================
// Payment Type
// =============================================================================

/// How a sale was paid.
///
/// The sales screen offers Mpesa, Cash and Bank; historic orders also carry
/// "Credit Card". Anything else round-trips untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentType {
    #[default]
    Mpesa,
    Cash,
    Bank,
    CreditCard,
    Other(String),
}

impl PaymentType {
    /// Options shown at checkout.
    pub const CHECKOUT_OPTIONS: [PaymentType; 3] =
        [PaymentType::Mpesa, PaymentType::Cash, PaymentType::Bank];

    pub fn as_str(&self) -> &str {
        match self {
            PaymentType::Mpesa => "Mpesa",
            PaymentType::Cash => "Cash",
            PaymentType::Bank => "Bank",
            PaymentType::CreditCard => "Credit Card",
            PaymentType::Other(s) => s,
        }
    }
}

impl From<String> for PaymentType {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "mpesa" | "m-pesa" => PaymentType::Mpesa,
            "cash" => PaymentType::Cash,
            "bank" => PaymentType::Bank,
            "credit card" | "credit_card" | "card" => PaymentType::CreditCard,
            _ => PaymentType::Other(s),
        }
    }
}

impl From<&str> for PaymentType {
    fn from(s: &str) -> Self {
        PaymentType::from(s.to_string())
    }
}

impl From<PaymentType> for String {
    fn from(p: PaymentType) -> Self {
        match p {
            PaymentType::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Order Status
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Completed,
    Voided,
    Refunded,
    /// Any status this client does not know how to act on.
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Statuses an order can be moved to.
    pub const SETTABLE: [OrderStatus; 3] = [
        OrderStatus::Completed,
        OrderStatus::Voided,
        OrderStatus::Refunded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Completed => "completed",
            OrderStatus::Voided => "voided",
            OrderStatus::Refunded => "refunded",
            OrderStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "completed" => Ok(OrderStatus::Completed),
            "voided" => Ok(OrderStatus::Voided),
            "refunded" => Ok(OrderStatus::Refunded),
            other => Err(ValidationError::InvalidFormat {
                field: "status".to_string(),
                reason: format!("'{other}' is not one of completed, voided, refunded"),
            }),
        }
    }
}

// =============================================================================
// Sales Screen Records
// =============================================================================

/// A product as listed on the sales screen (`GET /get-sales-products`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleProduct {
    #[serde(deserialize_with = "lenient_i64")]
    pub product_id: i64,
    pub product_name: String,
    #[serde(with = "money::major_units")]
    pub product_price: Money,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub product_stock: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_bundle: bool,
}

impl SaleProduct {
    pub fn item_id(&self) -> ItemId {
        ItemId::new(self.product_id, self.is_bundle)
    }

    pub fn in_stock(&self) -> bool {
        self.product_stock >= 1
    }

    /// Sales-screen search: name (case-insensitive), price text or id text.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return true;
        }
        self.product_name
            .to_lowercase()
            .contains(&query.to_lowercase())
            || self.product_price.to_string().contains(query)
            || self.product_id.to_string().contains(query)
    }
}

/// A customer that can be attached to a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(deserialize_with = "lenient_i64")]
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
}

impl Customer {
    pub fn matches(&self, query: &str) -> bool {
        self.name
            .to_lowercase()
            .contains(&query.trim().to_lowercase())
    }
}

/// Shape returned by `POST /add-sales-customer`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedCustomer {
    #[serde(deserialize_with = "lenient_i64")]
    pub customer_id: i64,
    pub customer_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
}

impl From<CreatedCustomer> for Customer {
    fn from(c: CreatedCustomer) -> Self {
        Customer {
            id: c.customer_id,
            name: c.customer_name,
            phone: c.phone,
            email: c.email,
            address: c.address,
        }
    }
}

/// "Add customer" form body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewCustomer {
    pub customer_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl NewCustomer {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.customer_name.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "Customer name".to_string(),
            });
        }
        Ok(())
    }
}

/// Header lines of the receipt (`GET /get-company-details`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyDetails {
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company_phone: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
