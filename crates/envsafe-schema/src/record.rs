//! The validated record held by the container.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Read-only mapping from declared field name to its validated value.
///
/// Only schemas in this crate construct records; consumers get shared
/// references, so a record cannot change after validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidatedRecord {
    fields: BTreeMap<String, Value>,
}

impl ValidatedRecord {
    pub(crate) fn from_fields(fields: BTreeMap<String, Value>) -> Self {
        Self { fields }
    }

    /// Value of `field`, if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns true if `field` is present.
    pub fn contains_key(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record holds no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Iterate over `(field, value)` pairs, sorted by field.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The record as a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone().into_iter().collect())
    }

    /// Consume the record into a JSON object.
    pub fn into_value(self) -> Value {
        Value::Object(self.fields.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ValidatedRecord {
        ValidatedRecord::from_fields(
            [("b".to_string(), json!(2)), ("a".to_string(), json!("x"))]
                .into_iter()
                .collect(),
        )
    }

    #[test]
    fn accessors() {
        let record = sample();
        assert_eq!(record.len(), 2);
        assert!(!record.is_empty());
        assert_eq!(record.get("a"), Some(&json!("x")));
        assert!(record.get("c").is_none());
        assert!(record.contains_key("b"));
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn value_conversions_agree() {
        let record = sample();
        assert_eq!(record.to_value(), json!({"a": "x", "b": 2}));
        assert_eq!(record.clone().into_value(), record.to_value());
        assert_eq!(serde_json::to_value(&record).unwrap(), record.to_value());
    }
}
