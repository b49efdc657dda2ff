//! Lenient numeric parsing and conversion helpers.

use num_traits::cast::cast;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// Value substituted for catalog numbers that are not plain integers
/// (variable-cost pilots list `"?"` as their points, for example).
pub const NUMERIC_SENTINEL: i32 = -1;

/// Parse raw JSON text as an integer, falling back to [`NUMERIC_SENTINEL`].
///
/// Only bare integer literals are accepted: quoted numbers, fractions and
/// `null` all coerce to the sentinel.
#[must_use]
pub fn parse_int_or_sentinel(raw: &str) -> i32 {
    raw.trim().parse::<i32>().unwrap_or(NUMERIC_SENTINEL)
}

/// Serde adapter applying [`parse_int_or_sentinel`] to whatever JSON value is
/// present, so a single bad field never rejects the whole record.
///
/// # Errors
///
/// Only fails when the underlying deserializer cannot produce a JSON value.
pub fn lenient_int<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(parse_int_or_sentinel(&value.to_string()))
}

/// Deserialize a value that may be `null`, treating `null` as the default.
///
/// # Errors
///
/// Fails when the value is present but not a `T`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize a possibly-`null` sequence whose elements may also be `null`;
/// `null` elements become `T::default()` and keep their position.
///
/// # Errors
///
/// Fails when an element is present but not a `T`.
pub fn null_elements_as_default<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let items = Option::<Vec<Option<T>>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(items.into_iter().map(Option::unwrap_or_default).collect())
}

/// Deserialize a possibly-`null` map whose values may also be `null`;
/// `null` values become `V::default()`.
///
/// # Errors
///
/// Fails when a value is present but not a `V`.
pub fn null_values_as_default<'de, D, V>(
    deserializer: D,
) -> Result<BTreeMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de> + Default,
{
    let entries =
        Option::<BTreeMap<String, Option<V>>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries
        .into_iter()
        .map(|(key, value)| (key, value.unwrap_or_default()))
        .collect())
}

/// Convert a collection length to an `i64`, saturating on overflow.
#[must_use]
pub fn len_to_i64(len: usize) -> i64 {
    cast::<usize, i64>(len).unwrap_or(i64::MAX)
}
