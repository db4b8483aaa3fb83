//! # Error Types
//!
//! Domain-specific error types for peakers-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  peakers-core errors (this file)                                       │
//! │  ├── CoreError        - Cart / checkout rule violations                │
//! │  └── ValidationError  - Form input failures                            │
//! │                                                                         │
//! │  peakers-client errors (separate crate)                                │
//! │  └── ClientError      - Transport, server status, config, disk         │
//! │                                                                         │
//! │  CLI (in app)                                                          │
//! │  └── Notice           - What the cashier sees (title + message)        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → Notice → Terminal   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant here is raised *before* a request is sent. A `CoreError`
//! means no network call happened.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations for the cart and checkout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// The product has nothing left to sell.
    ///
    /// ## When This Occurs
    /// - `Cart::add` on a product whose cached stock is below 1
    #[error("{product} is out of stock.")]
    OutOfStock { product: String },

    /// Requested quantity is above the cached stock for the line.
    ///
    /// ## User Workflow
    /// ```text
    /// qty 7 on a line with stock 5
    ///      │
    ///      ▼
    /// StockLimit { available: 5 }
    ///      │
    ///      ▼
    /// "Only 5 items available in stock"   (line keeps its old quantity)
    /// ```
    #[error("Only {available} items available in stock")]
    StockLimit { available: i64 },

    /// Quantities are always at least one; removing a line is explicit.
    #[error("Quantity must be at least 1")]
    QuantityBelowOne,

    /// No cart line for the given product.
    #[error("Product {0} is not in the cart")]
    NotInCart(String),

    #[error("Cart is empty.")]
    EmptyCart,

    #[error("Please select a customer.")]
    NoCustomerSelected,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Short dialog title for this error.
    pub fn title(&self) -> &'static str {
        match self {
            CoreError::OutOfStock { .. } => "Out of Stock",
            CoreError::StockLimit { .. } => "Stock Limit",
            CoreError::QuantityBelowOne | CoreError::NotInCart(_) => "Cart",
            CoreError::EmptyCart | CoreError::NoCustomerSelected => "Error",
            CoreError::Validation(_) => "Validation Error",
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the form validators in [`crate::validation`] and the catalog /
/// supplier form builders.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., "abc" where a number was expected).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// A list input had no usable entries (e.g. recipe with no valid rows).
    #[error("No valid {field} entries")]
    NoValidEntries { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::StockLimit { available: 5 };
        assert_eq!(err.to_string(), "Only 5 items available in stock");
        assert_eq!(err.title(), "Stock Limit");

        let err = CoreError::OutOfStock {
            product: "Soda".to_string(),
        };
        assert_eq!(err.to_string(), "Soda is out of stock.");
        assert_eq!(CoreError::EmptyCart.to_string(), "Cart is empty.");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "Customer name".to_string(),
        };
        assert_eq!(err.to_string(), "Customer name is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "amount".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.title(), "Validation Error");
    }
}
