//! # JSON Schema Validation
//!
//! Applies a JSON Schema (Draft 2020-12) document to a raw mapping, treating
//! the mapping as a JSON object. Use this when the expected configuration is
//! already described by a schema file shared with other tooling.
//!
//! ## Resolution
//!
//! No network requests are made. Internal `$ref`s of the form
//! `#/$defs/<name>` are resolved by the jsonschema crate natively; any
//! external `$ref` resolves to a permissive empty schema.
//!
//! ## Coercion
//!
//! Environment values are strings. With [`JsonSchema::with_coercion`], a
//! string value whose top-level property declares `"type": "integer"`,
//! `"number"` or `"boolean"` is parsed before validation. A value that does
//! not parse is left as a string, so the schema reports the type mismatch.
//!
//! ## Violations
//!
//! Instance paths are reported as dotted field paths (`/db/port` becomes
//! `db.port`). A missing `required` property is reported under the property
//! name rather than under its parent object.
//!
//! ## Projection
//!
//! The record keeps the top-level `properties` keys together with every
//! top-level `required` name. A document without `properties` keeps every
//! key.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use envsafe_core::{RawMapping, SchemaError, ValidationViolations, Violation};
use jsonschema::error::ValidationErrorKind;
use jsonschema::{Retrieve, Uri, ValidationError, Validator};
use serde_json::Value;

use crate::document;
use crate::record::ValidatedRecord;
use crate::rule::{parse_bool, parse_integer, parse_number};
use crate::Schema;

/// Retriever that keeps validation offline.
struct OfflineRetriever;

impl Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        tracing::debug!(uri = uri.as_str(), "external $ref resolved to permissive schema");
        Ok(serde_json::json!({}))
    }
}

/// A schema backed by the `jsonschema` crate.
///
/// The document is compiled once at construction; validation reuses the
/// compiled validator.
pub struct JsonSchema {
    document: Value,
    validator: Validator,
    /// Top-level `properties`, mapped to their declared `type` if it is a
    /// single string. `None` when the document declares no properties.
    properties: Option<BTreeMap<String, Option<String>>>,
    /// Top-level `required` names.
    required: BTreeSet<String>,
    coerce: bool,
}

impl JsonSchema {
    /// Compile a schema document.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Compile` if the document is not a valid schema.
    pub fn new(document: Value) -> Result<Self, SchemaError> {
        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft202012);
        opts.with_retriever(OfflineRetriever);

        let validator = opts.build(&document).map_err(|e| SchemaError::Compile {
            reason: e.to_string(),
        })?;

        let properties = document
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .iter()
                    .map(|(name, prop)| {
                        let declared = prop.get("type").and_then(Value::as_str).map(str::to_string);
                        (name.clone(), declared)
                    })
                    .collect()
            });

        let required = document
            .get("required")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            document,
            validator,
            properties,
            required,
            coerce: false,
        })
    }

    /// Load and compile a schema from a `.json`, `.yaml` or `.yml` file.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Load` if the file cannot be read or parsed and
    /// `SchemaError::Compile` if it is not a valid schema.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let document = document::load_document(path.as_ref())?;
        Self::new(document)
    }

    /// Parse string values of integer, number and boolean properties before
    /// validating.
    pub fn with_coercion(mut self, coerce: bool) -> Self {
        self.coerce = coerce;
        self
    }

    /// The schema document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Names of the top-level properties the document declares, sorted.
    pub fn property_names(&self) -> Vec<&str> {
        self.properties
            .as_ref()
            .map(|props| props.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn is_declared(&self, name: &str) -> bool {
        self.properties
            .as_ref()
            .map_or(true, |props| props.contains_key(name) || self.required.contains(name))
    }

    fn coerce_value(&self, name: &str, value: &Value) -> Value {
        let declared = self
            .properties
            .as_ref()
            .and_then(|props| props.get(name))
            .and_then(Option::as_deref);

        let Value::String(s) = value else {
            return value.clone();
        };

        let parsed = match declared {
            Some("integer") => parse_integer(s).map(Value::Number),
            Some("number") => parse_number(s).map(Value::Number),
            Some("boolean") => parse_bool(s).map(Value::Bool),
            _ => None,
        };
        parsed.unwrap_or_else(|| value.clone())
    }
}

impl fmt::Debug for JsonSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchema")
            .field("document", &self.document)
            .field("coerce", &self.coerce)
            .finish_non_exhaustive()
    }
}

impl Schema for JsonSchema {
    type Record = ValidatedRecord;

    fn validate(&self, raw: &RawMapping) -> Result<ValidatedRecord, ValidationViolations> {
        let instance: serde_json::Map<String, Value> = raw
            .iter()
            .map(|(name, value)| {
                let value = if self.coerce {
                    self.coerce_value(name, value)
                } else {
                    value.clone()
                };
                (name.clone(), value)
            })
            .collect();
        let instance = Value::Object(instance);

        let violations: ValidationViolations = self
            .validator
            .iter_errors(&instance)
            .map(violation_from_error)
            .collect();

        if !violations.is_empty() {
            return Err(violations);
        }

        let Value::Object(instance) = instance else {
            return Err(Violation::root("mapping did not convert to an object").into());
        };

        let fields = instance
            .into_iter()
            .filter(|(name, _)| self.is_declared(name))
            .collect();

        Ok(ValidatedRecord::from_fields(fields))
    }
}

fn violation_from_error(err: ValidationError<'_>) -> Violation {
    let parent = pointer_to_path(&err.instance_path.to_string());
    let path = match &err.kind {
        ValidationErrorKind::Required { property } => {
            let name = property
                .as_str()
                .map_or_else(|| property.to_string(), str::to_string);
            if parent.is_empty() {
                name
            } else {
                format!("{parent}.{name}")
            }
        }
        _ => parent,
    };

    Violation::field(path, err.to_string()).with_schema_path(err.schema_path.to_string())
}

/// Convert a JSON Pointer (`/db/port`) into a dotted path (`db.port`).
fn pointer_to_path(pointer: &str) -> String {
    pointer
        .split('/')
        .skip(1)
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(pairs: Value) -> RawMapping {
        match pairs {
            Value::Object(map) => map.into_iter().collect(),
            _ => panic!("expected object"),
        }
    }

    fn server_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "HOST": {"type": "string", "minLength": 1},
                "PORT": {"type": "integer", "minimum": 1, "maximum": 65535},
                "TLS": {"type": "boolean"}
            },
            "required": ["HOST", "PORT"]
        })
    }

    #[test]
    fn test_validate_valid_mapping() {
        let schema = JsonSchema::new(server_schema()).unwrap();
        let record = schema
            .validate(&raw(json!({"HOST": "localhost", "PORT": 8080, "PATH": "/usr/bin"})))
            .unwrap();
        assert_eq!(record.get("HOST"), Some(&json!("localhost")));
        assert_eq!(record.get("PORT"), Some(&json!(8080)));
        assert!(record.get("PATH").is_none(), "undeclared keys are not projected");
        assert!(record.get("TLS").is_none());
    }

    #[test]
    fn test_missing_required_reported_under_property_name() {
        let schema = JsonSchema::new(server_schema()).unwrap();
        let violations = schema.validate(&raw(json!({"PORT": 80}))).unwrap_err();
        assert_eq!(violations.paths(), vec!["HOST"]);
        assert!(violations.violations()[0].message.contains("HOST"));
        assert_eq!(violations.violations()[0].schema_path, "/required");
    }

    #[test]
    fn test_every_violation_reported() {
        let schema = JsonSchema::new(server_schema()).unwrap();
        let violations = schema
            .validate(&raw(json!({"HOST": "", "PORT": 70000, "TLS": "yes"})))
            .unwrap_err();
        assert_eq!(violations.len(), 3, "got: {violations}");
        assert!(violations.contains_path("HOST"));
        assert!(violations.contains_path("PORT"));
        assert!(violations.contains_path("TLS"));
    }

    #[test]
    fn test_strings_rejected_without_coercion() {
        let schema = JsonSchema::new(server_schema()).unwrap();
        let violations = schema
            .validate(&raw(json!({"HOST": "h", "PORT": "8080"})))
            .unwrap_err();
        assert_eq!(violations.paths(), vec!["PORT"]);
    }

    #[test]
    fn test_coercion_parses_declared_types() {
        let schema = JsonSchema::new(server_schema()).unwrap().with_coercion(true);
        let record = schema
            .validate(&raw(json!({"HOST": "h", "PORT": "8080", "TLS": "true"})))
            .unwrap();
        assert_eq!(record.get("PORT"), Some(&json!(8080)));
        assert_eq!(record.get("TLS"), Some(&json!(true)));
        assert_eq!(record.get("HOST"), Some(&json!("h")));
    }

    #[test]
    fn test_coercion_leaves_unparseable_values_for_the_schema() {
        let schema = JsonSchema::new(server_schema()).unwrap().with_coercion(true);
        let violations = schema
            .validate(&raw(json!({"HOST": "h", "PORT": "eighty"})))
            .unwrap_err();
        assert_eq!(violations.paths(), vec!["PORT"]);
    }

    #[test]
    fn test_required_name_outside_properties_is_projected() {
        let schema = JsonSchema::new(json!({
            "type": "object",
            "properties": {"HOST": {"type": "string"}},
            "required": ["HOST", "TOKEN"]
        }))
        .unwrap();
        let record = schema
            .validate(&raw(json!({"HOST": "h", "TOKEN": "t", "PATH": "/bin"})))
            .unwrap();
        assert_eq!(record.get("HOST"), Some(&json!("h")));
        assert_eq!(record.get("TOKEN"), Some(&json!("t")));
        assert!(record.get("PATH").is_none());

        let violations = schema.validate(&raw(json!({"HOST": "h"}))).unwrap_err();
        assert_eq!(violations.paths(), vec!["TOKEN"]);
    }

    #[test]
    fn test_schema_without_properties_projects_everything() {
        let schema = JsonSchema::new(json!({"type": "object"})).unwrap();
        let record = schema.validate(&raw(json!({"A": "1", "B": "2"}))).unwrap();
        assert_eq!(record.len(), 2);
        assert!(schema.property_names().is_empty());
    }

    #[test]
    fn test_nested_paths_are_dotted() {
        let schema = JsonSchema::new(json!({
            "type": "object",
            "properties": {
                "db": {
                    "type": "object",
                    "properties": {"port": {"type": "integer"}},
                    "required": ["host"]
                }
            }
        }))
        .unwrap();
        let violations = schema
            .validate(&raw(json!({"db": {"port": "x"}})))
            .unwrap_err();
        assert!(violations.contains_path("db.port"), "got: {violations}");
        assert!(violations.contains_path("db.host"), "got: {violations}");
    }

    #[test]
    fn test_invalid_schema_is_compile_error() {
        let err = JsonSchema::new(json!({"type": "not-a-type"})).unwrap_err();
        assert!(
            matches!(err, SchemaError::Compile { .. }),
            "Expected Compile, got: {err}"
        );
    }

    #[test]
    fn test_external_ref_does_not_fetch() {
        let schema = JsonSchema::new(json!({
            "type": "object",
            "properties": {
                "A": {"$ref": "https://schemas.example.invalid/anything.json"}
            }
        }))
        .unwrap();
        assert!(schema.validate(&raw(json!({"A": 1}))).is_ok());
    }

    #[test]
    fn test_from_yaml_file() {
        use std::io::Write;
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(
            b"type: object\nproperties:\n  KEY:\n    type: string\nrequired: [KEY]\n",
        )
        .unwrap();
        let schema = JsonSchema::from_file(file.path()).unwrap();
        assert_eq!(schema.property_names(), vec!["KEY"]);
        assert!(schema.validate(&raw(json!({"KEY": 1}))).is_err());
        assert!(schema.validate(&raw(json!({"KEY": "v"}))).is_ok());
    }

    #[test]
    fn test_pointer_to_path() {
        assert_eq!(pointer_to_path(""), "");
        assert_eq!(pointer_to_path("/PORT"), "PORT");
        assert_eq!(pointer_to_path("/db/port"), "db.port");
        assert_eq!(pointer_to_path("/a~1b/c~0d"), "a/b.c~d");
    }

    #[test]
    fn test_debug_does_not_require_validator_debug() {
        let schema = JsonSchema::new(json!({"type": "object"})).unwrap();
        assert!(format!("{schema:?}").contains("JsonSchema"));
    }
}
