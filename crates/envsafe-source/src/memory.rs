//! In-memory source, mainly for tests and programmatic defaults.

use serde_json::Value;

use crate::{EnvSource, RawMapping};

/// Source backed by a literal mapping.
///
/// `fetch` returns a copy of the stored mapping, so nothing a caller does
/// with the result can alter what later fetches return.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySource {
    record: RawMapping,
}

impl MemorySource {
    /// Build from any iterator of key/value pairs.
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            record: envsafe_core::mapping_from_pairs(pairs),
        }
    }

    /// The stored mapping.
    pub fn record(&self) -> &RawMapping {
        &self.record
    }
}

impl From<RawMapping> for MemorySource {
    fn from(record: RawMapping) -> Self {
        Self { record }
    }
}

impl EnvSource for MemorySource {
    fn fetch(&self) -> RawMapping {
        self.record.clone()
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fetch_returns_literal_mapping() {
        let source = MemorySource::new([("key", json!("value")), ("n", json!(1))]);
        let fetched = source.fetch();
        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched["key"], json!("value"));
        assert_eq!(fetched["n"], json!(1));
    }

    #[test]
    fn fetch_is_unaffected_by_mutating_a_previous_result() {
        let source = MemorySource::new([("key", "value")]);
        let mut first = source.fetch();
        first.insert("extra".to_string(), json!(true));
        first.remove("key");
        assert_eq!(source.fetch(), *source.record());
        assert_eq!(source.fetch()["key"], json!("value"));
    }

    #[test]
    fn empty_default() {
        assert!(MemorySource::default().fetch().is_empty());
    }
}
