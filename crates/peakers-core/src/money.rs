//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The backend sends prices as "100.00" (string) or 99.9 (number).       │
//! │  Summing those as floats drifts:                                        │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌                                  │
//! │                                                                         │
//! │  OUR SOLUTION: parse once at the boundary into integer cents           │
//! │    "100.00" ──► Money(10000)                                            │
//! │    every cart/VAT/discount sum is then exact                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Internally `Money` serializes as cents (that is what the TypeScript
//! bindings see). The REST backend speaks major units, so wire structs use
//! `#[serde(with = "crate::money::major_units")]`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::VatRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: a discount larger than the subtotal yields a negative
///   total, which must be representable
/// - **Single field tuple struct**: zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use peakers_core::money::Money;
    ///
    /// let price = Money::from_cents(10050); // Ksh 100.50
    /// assert_eq!(price.cents(), 10050);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole major units.
    ///
    /// `units` must fit in cents (`|units| <= i64::MAX / 100`); use
    /// [`Money::checked_from_major`] for values from the wire.
    #[inline]
    pub const fn from_major(units: i64) -> Self {
        Money(units * 100)
    }

    /// Like [`Money::from_major`], returning `None` when the cents overflow.
    #[inline]
    pub const fn checked_from_major(units: i64) -> Option<Self> {
        match units.checked_mul(100) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Converts a floating point amount in major units, rounding to the cent.
    ///
    /// Only used at the wire boundary. Returns `None` for NaN/infinite input.
    pub fn from_major_f64(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }
        Some(Money((amount * 100.0).round() as i64))
    }

    /// Parses a decimal string in major units (`"100"`, `"99.5"`, `"-3.25"`).
    ///
    /// More than two fractional digits are rounded half away from zero.
    ///
    /// ```rust
    /// use peakers_core::money::Money;
    ///
    /// assert_eq!(Money::parse("100.00").unwrap().cents(), 10000);
    /// assert_eq!(Money::parse(" 12.345 ").unwrap().cents(), 1235);
    /// assert!(Money::parse("abc").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: format!("'{}' is not a number", input.trim()),
        };

        let text = input.trim();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };

        let (whole, frac) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let whole_value: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };

        let mut frac_digits = frac.bytes().map(|b| i64::from(b - b'0'));
        let tenths = frac_digits.next().unwrap_or(0);
        let hundredths = frac_digits.next().unwrap_or(0);
        let round_up = frac_digits.next().is_some_and(|d| d >= 5);

        let mut cents = whole_value
            .checked_mul(100)
            .and_then(|c| c.checked_add(tenths * 10 + hundredths))
            .ok_or_else(invalid)?;
        if round_up {
            cents += 1;
        }

        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the value in major units as a float (wire output only).
    #[inline]
    pub fn to_major_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// Cart quantities are bounded by stock, so the product stays far below
    /// `i64::MAX` cents; overflow is not checked.
    ///
    /// ```rust
    /// use peakers_core::money::Money;
    ///
    /// let unit_price = Money::from_major(100);
    /// assert_eq!(unit_price.multiply_quantity(2), Money::from_major(200));
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Calculates VAT on this amount.
    ///
    /// ## Implementation
    /// Integer math in basis points: `amount * bps / 10000`, rounded half
    /// away from zero so that a negative rate mirrors a positive one.
    ///
    /// ```rust
    /// use peakers_core::money::Money;
    /// use peakers_core::types::VatRate;
    ///
    /// let subtotal = Money::from_major(200);
    /// let vat = subtotal.calculate_vat(VatRate::from_bps(1600)); // 16%
    /// assert_eq!(vat, Money::from_major(32));
    /// ```
    pub fn calculate_vat(&self, rate: VatRate) -> Money {
        let product = self.0 as i128 * rate.bps() as i128;
        let rounded = if product >= 0 {
            (product + 5000) / 10000
        } else {
            (product - 5000) / 10000
        };
        Money(rounded as i64)
    }

    /// Formats as whole major units with thousands separators (`12,345`).
    ///
    /// Used by the dashboard where cents are noise.
    pub fn format_whole_grouped(&self) -> String {
        let rounded = if self.0 >= 0 {
            (self.0 + 50) / 100
        } else {
            (self.0 - 50) / 100
        };
        let digits = rounded.unsigned_abs().to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        if rounded < 0 {
            format!("-{grouped}")
        } else {
            grouped
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================
//
// Arithmetic is unchecked i64 on cents, bounded by i64::MAX cents. Amounts
// decoded from the wire are range-checked in `RawAmount::into_money`.

/// Shows the amount in major units with two decimals (`200.00`, `-5.50`).
///
/// The currency label ("Ksh") is added by callers.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Wire (major unit) serde adapters
// =============================================================================

/// Accepts anything the backend has been seen to send for an amount.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawAmount {
    fn into_money<E: serde::de::Error>(self) -> Result<Money, E> {
        match self {
            RawAmount::Int(units) => Money::checked_from_major(units)
                .ok_or_else(|| E::custom(format!("amount {units} out of range"))),
            RawAmount::Float(f) => Money::from_major_f64(f)
                .ok_or_else(|| E::custom(format!("amount {f} is not finite"))),
            RawAmount::Text(s) if s.trim().is_empty() => Ok(Money::zero()),
            RawAmount::Text(s) => Money::parse(&s).map_err(E::custom),
        }
    }
}

/// `#[serde(with = "major_units")]`: amount as a JSON number in major units.
///
/// Deserialization accepts integers, floats and decimal strings.
pub mod major_units {
    use super::{Money, RawAmount};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.to_major_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        Option::<RawAmount>::deserialize(deserializer)?
            .map(RawAmount::into_money)
            .unwrap_or(Ok(Money::zero()))
    }
}

/// Optional variant of [`major_units`]; `null` and missing map to `None`.
///
/// Pair with `#[serde(default)]` on the field.
pub mod major_units_opt {
    use super::{Money, RawAmount};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Money>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(m) => serializer.serialize_some(&m.to_major_f64()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Money>, D::Error> {
        Option::<RawAmount>::deserialize(deserializer)?
            .map(RawAmount::into_money)
            .transpose()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_strings() {
        assert_eq!(Money::parse("100").unwrap().cents(), 10000);
        assert_eq!(Money::parse("100.5").unwrap().cents(), 10050);
        assert_eq!(Money::parse(".75").unwrap().cents(), 75);
        assert_eq!(Money::parse("-5.50").unwrap().cents(), -550);
        assert_eq!(Money::parse("0.005").unwrap().cents(), 1);
        assert_eq!(Money::parse("0.004").unwrap().cents(), 0);

        assert!(Money::parse("").is_err());
        assert!(Money::parse(".").is_err());
        assert!(Money::parse("1.2.3").is_err());
        assert!(Money::parse("12abc").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(22200).to_string(), "222.00");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
    }

    #[test]
    fn test_vat_calculation() {
        let subtotal = Money::from_major(200);
        assert_eq!(subtotal.calculate_vat(VatRate::from_bps(1600)).cents(), 3200);

        // 0.125 rounds away from zero in both directions
        let odd = Money::from_cents(125);
        assert_eq!(odd.calculate_vat(VatRate::from_bps(1000)).cents(), 13);
        assert_eq!(odd.calculate_vat(VatRate::from_bps(-1000)).cents(), -13);
    }

    #[test]
    fn test_grouped_whole_units() {
        assert_eq!(Money::from_major(125000).format_whole_grouped(), "125,000");
        assert_eq!(Money::from_cents(99949).format_whole_grouped(), "999");
        assert_eq!(Money::from_cents(99950).format_whole_grouped(), "1,000");
        assert_eq!(Money::from_major(1234567).format_whole_grouped(), "1,234,567");
        assert_eq!(Money::zero().format_whole_grouped(), "0");
    }

    #[test]
    fn test_sum() {
        let total: Money = [Money::from_major(1), Money::from_cents(50)].iter().sum();
        assert_eq!(total.cents(), 150);
    }

    #[derive(Debug, Deserialize, Serialize)]
    struct Priced {
        #[serde(with = "major_units")]
        price: Money,
        #[serde(default, with = "major_units_opt")]
        profit: Option<Money>,
    }

    #[test]
    fn test_major_units_accepts_numbers_and_strings() {
        let a: Priced = serde_json::from_str(r#"{"price": "100.00"}"#).unwrap();
        assert_eq!(a.price.cents(), 10000);
        assert_eq!(a.profit, None);

        let b: Priced = serde_json::from_str(r#"{"price": 99.9, "profit": 12}"#).unwrap();
        assert_eq!(b.price.cents(), 9990);
        assert_eq!(b.profit, Some(Money::from_major(12)));

        let c: Priced = serde_json::from_str(r#"{"price": null, "profit": null}"#).unwrap();
        assert_eq!(c.price, Money::zero());
        assert_eq!(c.profit, None);
    }

    #[test]
    fn test_major_units_rejects_out_of_range_integers() {
        let err = serde_json::from_str::<Priced>(r#"{"price": 922337203685477581}"#).unwrap_err();
        assert!(err.to_string().contains("out of range"));

        let err = serde_json::from_str::<Priced>(r#"{"price": 1, "profit": -922337203685477581}"#)
            .unwrap_err();
        assert!(err.to_string().contains("out of range"));

        assert_eq!(
            Money::checked_from_major(92_233_720_368_547_758),
            Some(Money::from_cents(9_223_372_036_854_775_800))
        );
        assert_eq!(Money::checked_from_major(i64::MAX), None);
    }

    #[test]
    fn test_major_units_serializes_as_number() {
        let p = Priced {
            price: Money::from_cents(22250),
            profit: None,
        };
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["price"], serde_json::json!(222.5));
    }
}
