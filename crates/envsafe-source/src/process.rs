//! Process environment source.

use serde_json::Value;

use crate::{EnvSource, RawMapping};

/// Source that snapshots the process environment at fetch time.
///
/// Every value is a JSON string. Variables whose name or value is not valid
/// Unicode cannot be represented and are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvSource {
    _private: (),
}

impl ProcessEnvSource {
    /// Create a new process environment source.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl EnvSource for ProcessEnvSource {
    fn fetch(&self) -> RawMapping {
        let mut mapping = RawMapping::new();
        for (key, value) in std::env::vars_os() {
            match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => {
                    mapping.insert(key, Value::String(value));
                }
                (key, _) => {
                    let key = match key {
                        Ok(key) => key,
                        Err(raw) => raw.to_string_lossy().into_owned(),
                    };
                    tracing::debug!(%key, "skipping non-unicode environment variable");
                }
            }
        }
        tracing::trace!(keys = mapping.len(), "fetched process environment");
        mapping
    }

    fn describe(&self) -> String {
        "process environment".to_string()
    }
}
