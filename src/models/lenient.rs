//! Forgiving numeric deserializers.
//!
//! Plan records come from a coach-facing form where a cleared field arrives as
//! `""`, `null`, or `NaN`. Those values count as zero instead of failing the
//! whole record. Numeric strings such as `"80.5"` are accepted as numbers.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::MealMacros;

/// Interpret an arbitrary JSON value as a finite number, zero otherwise.
pub fn value_to_f64(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|x| x.is_finite()).unwrap_or(0.0)
}

/// Replace NaN and infinities with zero.
#[inline]
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Parse free-form text the same way: anything unparsable is zero.
pub fn parse_f64(text: &str) -> f64 {
    value_to_f64(&Value::String(text.to_string()))
}

pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(value_to_f64).unwrap_or(0.0))
}

pub fn int<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    // `as` saturates at the integer bounds.
    Ok(number(deserializer)?.round() as i32)
}

pub fn uint<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(deserializer)?.round() as u32)
}

pub fn small_uint<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(deserializer)?.round() as u8)
}

pub fn numbers<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(values
        .unwrap_or_default()
        .iter()
        .map(value_to_f64)
        .collect())
}

pub fn macro_rows<'de, D>(deserializer: D) -> Result<Vec<MealMacros>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<MealMacros>>::deserialize(deserializer)?.unwrap_or_default())
}
