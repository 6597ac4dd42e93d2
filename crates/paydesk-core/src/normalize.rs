//! Field normalization for documents that arrive in loosely-typed shapes.
//!
//! Catalog documents are maintained by hand outside this service, so a price
//! may show up as `500`, `"500"`, `"₹500"`, `500.0` or an extended-JSON
//! wrapper such as `{"$numberInt": "500"}`. Free-text fields sometimes carry
//! the literal string `"null"`. Everything here maps those shapes onto plain
//! `Option<i64>` / `Option<String>` values.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Extended-JSON wrapper keys that hold a number as a string.
const NUMBER_WRAPPER_KEYS: [&str; 3] = ["$numberInt", "$numberLong", "$numberDouble"];

/// Normalize a stored price into whole major currency units.
///
/// Returns `None` for anything that does not carry a number, including the
/// `"null"` sentinel.
#[must_use]
pub fn normalize_price(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().and_then(|u| i64::try_from(u).ok()))
            .or_else(|| n.as_f64().and_then(float_to_units)),
        Value::String(s) => parse_price_text(s),
        Value::Object(map) => NUMBER_WRAPPER_KEYS
            .iter()
            .find_map(|key| map.get(*key))
            .and_then(normalize_price),
        _ => None,
    }
}

fn parse_price_text(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if is_null_sentinel(trimmed) {
        return None;
    }
    if let Ok(units) = trimmed.parse::<i64>() {
        return Some(units);
    }

    // Skip currency prefixes ("₹", "Rs.", "INR") and read the first number;
    // thousands separators are dropped.
    let start = trimmed.find(|c: char| c.is_ascii_digit())?;
    let numeric: String = trimmed[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .filter(|c| *c != ',')
        .collect();
    numeric.parse::<f64>().ok().and_then(float_to_units)
}

#[allow(clippy::cast_possible_truncation)]
fn float_to_units(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    let truncated = value.trunc();
    #[allow(clippy::cast_precision_loss)]
    let in_range = truncated >= i64::MIN as f64 && truncated <= i64::MAX as f64;
    in_range.then_some(truncated as i64)
}

/// Clean a free-text field: trims whitespace and maps empty strings and the
/// `"null"` sentinel to `None`.
#[must_use]
pub fn clean_text(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() || is_null_sentinel(trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Clean a JSON value that should hold free text. Numbers are rendered as
/// strings; single-element lists are unwrapped.
#[must_use]
pub fn text_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => clean_text(Some(s.as_str())),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) if items.len() == 1 => text_from_value(&items[0]),
        _ => None,
    }
}

/// Case-insensitive equality used for every catalog comparison.
#[must_use]
pub fn fold_eq(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

fn is_null_sentinel(s: &str) -> bool {
    s.eq_ignore_ascii_case("null") || s.eq_ignore_ascii_case("none")
}

/// Serde adapter for price fields that accept any of the shapes handled by
/// [`normalize_price`].
///
/// # Errors
///
/// Only fails when the underlying deserializer cannot produce a value at all.
pub fn deserialize_price<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(normalize_price))
}

/// Serde adapter for free-text fields, see [`text_from_value`].
///
/// # Errors
///
/// Only fails when the underlying deserializer cannot produce a value at all.
pub fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(text_from_value))
}
