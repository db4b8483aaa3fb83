//! # peakers-core: Pure Business Logic for Peakers POS
//!
//! Everything the POS client decides on its own, with zero I/O. The client
//! crate fetches and posts; this crate computes.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Peakers POS Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/cli (`peakers`)                         │   │
//! │  │    connect ──► login ──► sell / orders / products / suppliers   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    peakers-client                               │   │
//! │  │    REST calls, config, stored database name, checkout submit    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ peakers-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐  │   │
//! │  │   │  money   │ │   cart   │ │ checkout │ │ orders/dashboard │  │   │
//! │  │   │  Money   │ │  Cart    │ │ Session  │ │ catalog/suppliers│  │   │
//! │  │   │ VatRate  │ │ pricing  │ │ Receipt  │ │   validation     │  │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO CLOCK • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic and wire adapters
//! - [`types`] - VAT rate, item ids, payment types, customers
//! - [`cart`] - The cart state holder
//! - [`pricing`] - Subtotal / VAT / discount / total
//! - [`checkout`] - Sales session and checkout payload
//! - [`receipt`] - Text receipt
//! - [`orders`] - Order history filtering and paging
//! - [`dashboard`] - Metrics, trend, recent orders
//! - [`catalog`] - Products, bundles, categories, recipes
//! - [`suppliers`] - Suppliers, supplied stock, payments
//! - [`validation`] - Form input checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use peakers_core::money::Money;
//! use peakers_core::pricing::PriceBreakdown;
//! use peakers_core::types::VatRate;
//!
//! // 2 × Ksh 100 at 16% VAT with Ksh 10 off
//! let totals = PriceBreakdown::from_subtotal(
//!     Money::from_major(200),
//!     VatRate::from_fraction(0.16),
//!     Money::from_major(10),
//! );
//! assert_eq!(totals.total.to_string(), "222.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod dashboard;
pub mod error;
pub mod money;
pub mod orders;
pub mod pricing;
pub mod receipt;
pub mod serde_helpers;
pub mod suppliers;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine};
pub use checkout::{CheckoutRequest, PendingSale, SaleDefaults, SalesSession};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::PriceBreakdown;
pub use receipt::Receipt;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Standard VAT rate applied to new sales: 16%.
pub const DEFAULT_VAT_BPS: i32 = 1600;

/// Database used when none has been selected yet.
pub const DEFAULT_DB_NAME: &str = "peakers_pos_test";

/// Monthly sales target in whole shillings when the backend has none.
pub const DEFAULT_MONTHLY_TARGET: i64 = 125_000;

/// Label for sales without a named customer (orders, receipts).
pub const GUEST_CUSTOMER: &str = "Guest";

/// Label for sales without a named customer on the dashboard.
pub const WALK_IN_CUSTOMER: &str = "Walk-in";

pub const CURRENCY_LABEL: &str = "Ksh";
