//! Lenient number decoding.
//!
//! The commerce backend is loose with numeric fields: the same field may come
//! back as a number, a numeric string, `null`, or not at all. These helpers
//! accept all of them and leave the final coercion to
//! [`cartage::amounts`].

use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode a loosely typed number into `Option<f64>`.
pub(crate) fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(value.and_then(|value| match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }))
}

/// Decode a loosely typed non-negative whole number, such as an amount already
/// expressed in gateway minor units.
pub(crate) fn whole<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(deserializer)?
        .and_then(Decimal::from_f64)
        .filter(|value| value.fract().is_zero())
        .and_then(|value| value.to_u64()))
}

/// Decode a loosely typed flag: booleans, `"true"`/`"false"` and `0`/`1`.
pub(crate) fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(value.and_then(|value| match value {
        Value::Bool(flag) => Some(flag),
        Value::String(text) => text.trim().parse::<bool>().ok(),
        Value::Number(number) => number.as_u64().map(|n| n != 0),
        _ => None,
    }))
}
