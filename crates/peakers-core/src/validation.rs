//! # Validation
//!
//! Input checks that run before any request is sent.
//!
//! ## Validation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Validation Pipeline                                  │
//! │                                                                         │
//! │  Typed text ──► validate ──► Result<T, ValidationError>                 │
//! │                    │                                                    │
//! │                    ├── Ok(value) ──► build request ──► send             │
//! │                    │                                                    │
//! │                    └── Err(e)    ──► notice, nothing sent               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Fails with `Required` when `value` is empty after trimming.
pub fn require(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Database (tenant) name for the connect screen, trimmed.
pub fn validate_db_name(name: &str) -> Result<String, ValidationError> {
    require("Database name", name)?;
    Ok(name.trim().to_string())
}

/// Both login fields must be filled in.
pub fn validate_credentials(username: &str, password: &str) -> Result<(), ValidationError> {
    require("Username", username)?;
    require("Password", password)
}

/// Amount that must be present and strictly positive.
pub fn parse_positive_amount(field: &str, input: &str) -> Result<Money, ValidationError> {
    require(field, input)?;
    let amount = Money::parse(input).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: format!("'{}' is not an amount", input.trim()),
    })?;
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(amount)
}

/// Whole number that must be present and strictly positive.
pub fn parse_positive_int(field: &str, input: &str) -> Result<i64, ValidationError> {
    require(field, input)?;
    let value: i64 = input
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("'{}' is not a whole number", input.trim()),
        })?;
    if value <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(value)
}

/// Quantity boxes: anything that is not a positive whole number reads as 1.
pub fn parse_positive_int_or_one(input: &str) -> i64 {
    match input.trim().parse::<i64>() {
        Ok(n) if n > 0 => n,
        _ => 1,
    }
}

/// Discount box: blank or unparsable text reads as zero.
pub fn parse_discount(input: &str) -> Money {
    Money::parse(input).unwrap_or_default()
}

/// Cart quantity box: the number as typed, `None` when not a whole number.
///
/// Range checks belong to the cart.
pub fn parse_quantity(input: &str) -> Option<i64> {
    input.trim().parse().ok()
}
