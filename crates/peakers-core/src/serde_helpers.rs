//! Lenient deserializers for backend JSON.
//!
//! The backend is loose about types: ids and counts sometimes arrive as
//! strings, optional text as `null`, and dates in whichever format the
//! serializer on the other side picked.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Treats `null` as `T::default()`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInt {
    Int(i64),
    Float(f64),
    Text(String),
}

fn raw_to_i64<E: serde::de::Error>(raw: RawInt) -> Result<i64, E> {
    match raw {
        RawInt::Int(i) => Ok(i),
        RawInt::Float(f) if f.is_finite() && f.fract() == 0.0 => Ok(f as i64),
        RawInt::Float(f) => Err(E::custom(format!("expected an integer, got {f}"))),
        RawInt::Text(s) if s.trim().is_empty() => Ok(0),
        RawInt::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| E::custom(format!("expected an integer, got '{s}'"))),
    }
}

/// Integer that may arrive as a number, a numeric string or `null` (→ 0).
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawInt>::deserialize(deserializer)? {
        Some(raw) => raw_to_i64(raw),
        None => Ok(0),
    }
}

/// Optional variant of [`lenient_i64`]; pair with `#[serde(default)]`.
pub fn lenient_i64_opt<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawInt>::deserialize(deserializer)?
        .map(raw_to_i64)
        .transpose()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPoint {
    Num(f64),
    Text(String),
}

/// Chart series of numbers or numeric strings (`[1500, "20.50"]`).
///
/// `null` and text that is not a number plot as 0 instead of failing the
/// whole body.
pub fn lenient_f64_vec<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let points = Option::<Vec<Option<RawPoint>>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(points
        .into_iter()
        .map(|point| match point {
            Some(RawPoint::Num(n)) => n,
            Some(RawPoint::Text(s)) => s.trim().parse().unwrap_or(0.0),
            None => 0.0,
        })
        .collect())
}

/// Parses the date formats the backend has been seen to emit.
///
/// Naive values are taken as UTC.
pub fn parse_datetime(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `DateTime<Utc>` from any format [`parse_datetime`] understands.
pub fn flexible_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_datetime(&s).ok_or_else(|| serde::de::Error::custom(format!("unrecognised date '{s}'")))
}

/// Optional variant of [`flexible_datetime`]; unparseable text maps to `None`.
pub fn flexible_datetime_opt<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.and_then(|s| parse_datetime(&s)))
}
