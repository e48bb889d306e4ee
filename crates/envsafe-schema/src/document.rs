//! Loading schema documents from disk.

use std::path::Path;

use envsafe_core::SchemaError;
use serde_json::Value;

/// Read a JSON or YAML document. The format is chosen by extension:
/// `.yaml`/`.yml` parse as YAML, anything else as JSON.
pub(crate) fn load_document(path: &Path) -> Result<Value, SchemaError> {
    let content = std::fs::read_to_string(path).map_err(|e| SchemaError::Load {
        path: path.display().to_string(),
        reason: format!("cannot read file: {e}"),
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext {
        "yaml" | "yml" => parse_yaml(&content).map_err(|reason| SchemaError::Load {
            path: path.display().to_string(),
            reason,
        }),
        _ => serde_json::from_str(&content).map_err(|e| SchemaError::Load {
            path: path.display().to_string(),
            reason: format!("invalid JSON: {e}"),
        }),
    }
}

/// Parse YAML text into a JSON value.
pub(crate) fn parse_yaml(content: &str) -> Result<Value, String> {
    serde_yaml::from_str(content).map_err(|e| format!("invalid YAML: {e}"))
}
