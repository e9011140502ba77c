//! Lenient decimal handling for user-entered and persisted figures.
//!
//! Malformed numbers never reject a record: required decimals collapse to
//! `0.0` and optional ones to `None`. Persisted blobs may carry numbers as
//! JSON numbers or as numeric strings, and both are accepted.

use serde::{Deserialize, Deserializer};

/// Parse free text as a decimal, yielding `0.0` for anything unusable.
pub fn parse_decimal(input: &str) -> f64 {
    input
        .trim()
        .parse::<f64>()
        .map(coerce_decimal)
        .unwrap_or(0.0)
}

/// Replace NaN and infinities with `0.0`.
pub fn coerce_decimal(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

fn parse_optional(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RawNumber {
    fn required(self) -> f64 {
        match self {
            RawNumber::Number(n) => coerce_decimal(n),
            RawNumber::Text(s) => parse_decimal(&s),
            RawNumber::Other(_) => 0.0,
        }
    }

    fn optional(self) -> Option<f64> {
        match self {
            RawNumber::Number(n) => Some(n).filter(|v| v.is_finite()),
            RawNumber::Text(s) => parse_optional(&s),
            RawNumber::Other(_) => None,
        }
    }
}

/// Serde adapter for a required decimal field.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(RawNumber::deserialize(deserializer)?.required())
}

/// Serde adapter for an optional decimal field. Pair with `#[serde(default)]`.
pub fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(RawNumber::deserialize(deserializer)?.optional())
}

/// Serde adapter for a non-negative whole number such as a duration in minutes.
pub fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = RawNumber::deserialize(deserializer)?.required();
    if value <= 0.0 {
        Ok(0)
    } else if value >= u32::MAX as f64 {
        Ok(u32::MAX)
    } else {
        Ok(value.trunc() as u32)
    }
}

fn clamp_scale(value: f64, min: u8, max: u8) -> u8 {
    value.trunc().clamp(min as f64, max as f64) as u8
}

/// Serde adapter for a 1-10 psychology level.
pub fn lenient_level<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = RawNumber::deserialize(deserializer)?.required();
    Ok(clamp_scale(value, 1, 10))
}

/// Serde adapter for a 1-5 setup rating.
pub fn lenient_rating<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = RawNumber::deserialize(deserializer)?.required();
    Ok(clamp_scale(value, 1, 5))
}
