//! JSON value helpers
//!
//! Scope and event metadata is held as string-keyed JSON maps. This module
//! provides the container operations the scope relies on: recursive copy,
//! key-wise merge and type naming for diagnostics.

pub use serde_json::Value;

/// String-keyed metadata map
pub type Map = serde_json::Map<String, Value>;

/// Recursively copy a value
///
/// Objects and arrays are rebuilt element by element so the result shares
/// no storage with `value`.
#[must_use]
pub fn deep_copy(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(deep_copy_map(map)),
        Value::Array(items) => Value::Array(items.iter().map(deep_copy).collect()),
        Value::String(s) => Value::String(s.as_str().to_owned()),
        Value::Number(n) => Value::Number(n.clone()),
        Value::Bool(b) => Value::Bool(*b),
        Value::Null => Value::Null,
    }
}

/// Recursively copy a map
#[must_use]
pub fn deep_copy_map(map: &Map) -> Map {
    map.iter()
        .map(|(key, value)| (key.as_str().to_owned(), deep_copy(value)))
        .collect()
}

/// Copy a sequence of strings
#[must_use]
pub fn deep_copy_strings(items: &[String]) -> Vec<String> {
    items.iter().map(|s| s.as_str().to_owned()).collect()
}

/// Merge `overlay` on top of a copy of `base`
///
/// Keys present in both take the value from `overlay`. Keys unique to
/// either side are kept.
#[must_use]
pub fn merge_maps(base: &Map, overlay: Map) -> Map {
    let mut merged = deep_copy_map(base);
    for (key, value) in overlay {
        merged.insert(key, value);
    }
    merged
}

/// Short JSON type name used in error messages
#[must_use]
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Object(_) => "object",
        Value::Array(_) => "array",
        Value::String(_) => "string",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::Bool(_) => "boolean",
        Value::Null => "null",
    }
}
