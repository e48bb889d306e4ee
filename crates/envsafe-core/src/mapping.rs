//! # Raw Mappings
//!
//! The untyped key-value data a source hands to a schema. Keys are unique
//! strings; values are JSON values so that in-memory sources can carry
//! non-string data (a number where a string is expected must be
//! representable in order to be rejected).

use std::collections::BTreeMap;

use serde_json::Value;

/// Raw key-value data produced by a source on every fetch.
///
/// A `BTreeMap` keeps iteration order sorted, which makes violation lists
/// and log output deterministic.
pub type RawMapping = BTreeMap<String, Value>;

/// Build a [`RawMapping`] from any iterator of key/value pairs.
pub fn mapping_from_pairs<I, K, V>(pairs: I) -> RawMapping
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Name of a JSON value's type, as used in violation messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
