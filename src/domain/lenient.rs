//! Lenient deserialization for hand-exported JSON
//!
//! Exports written by other tools carry explicit `null`s and the odd
//! malformed element. These helpers let a record absorb both instead of
//! failing the whole document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserializes `T`, mapping an explicit `null` to `T::default()`
///
/// Pair with `#[serde(default)]` so a missing key behaves the same way.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Deserializes a list element by element, dropping elements that do not
/// fit `T`
///
/// `null` or a non-list value yields an empty list. Every dropped element
/// is logged.
pub fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(collect_valid(value.unwrap_or(Value::Null), std::any::type_name::<T>()))
}

/// Elements of `value` that deserialize into `T`, in order
///
/// A value that is not an array yields nothing.
pub fn collect_valid<T: DeserializeOwned>(value: Value, resource: &str) -> Vec<T> {
    let items = match value {
        Value::Array(items) => items,
        Value::Null => return Vec::new(),
        _ => {
            tracing::warn!(resource, "Expected a list, ignoring value");
            return Vec::new();
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value(item) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(resource, index, error = %e, "Skipping malformed record");
            }
        }
    }
    records
}
