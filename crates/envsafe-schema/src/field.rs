//! # Declarative Field Schemas
//!
//! A [`FieldSchema`] maps field names to [`FieldRule`]s. Validation checks
//! every declared field against the raw mapping, collects one violation
//! per failing field, and ignores undeclared keys.
//!
//! Schemas can be declared in code:
//!
//! ```
//! use envsafe_schema::{FieldRule, FieldSchema};
//!
//! let schema = FieldSchema::new()
//!     .field("DATABASE_URL", FieldRule::url())
//!     .field("PORT", FieldRule::integer().coerce().default(8080));
//! assert_eq!(schema.len(), 2);
//! ```
//!
//! or loaded from YAML/JSON with the same shape as the serialized rules:
//!
//! ```yaml
//! DATABASE_URL:
//!   type: url
//! PORT:
//!   type: integer
//!   coerce: true
//!   default: 8080
//! ```
//!
//! A declared rule may only carry `type`, `values`, `optional`, `coerce`
//! and `default`; any other key is rejected as an invalid rule.

use std::collections::BTreeMap;
use std::path::Path;

use envsafe_core::{RawMapping, SchemaError, ValidationViolations, Violation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document;
use crate::record::ValidatedRecord;
use crate::rule::{FieldRule, RULE_KEYS};
use crate::Schema;

/// Declarative mapping from field name to validation rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSchema {
    fields: BTreeMap<String, FieldRule>,
}

impl FieldSchema {
    /// Schema with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name` with `rule`. Redeclaring a field replaces its rule.
    pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.fields.insert(name.into(), rule);
        self
    }

    /// Rule declared for `name`.
    pub fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.fields.get(name)
    }

    /// Declared field names, sorted.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no field is declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check that every declared default satisfies its own rule.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::InvalidRule` for the first field whose default
    /// is rejected.
    pub fn verify(&self) -> Result<(), SchemaError> {
        for (name, rule) in &self.fields {
            if rule.default_value().is_some() {
                rule.check(None).map_err(|reason| SchemaError::InvalidRule {
                    field: name.clone(),
                    reason,
                })?;
            }
        }
        Ok(())
    }

    /// Build from a JSON object of `field -> rule`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Load` if the value is not a valid rule map and
    /// `SchemaError::InvalidRule` if a rule carries an unknown key or a
    /// default violates its rule.
    pub fn from_json_value(value: Value) -> Result<Self, SchemaError> {
        let schema: Self =
            serde_json::from_value(value.clone()).map_err(|e| SchemaError::Load {
                path: "(inline)".to_string(),
                reason: format!("invalid field schema: {e}"),
            })?;
        reject_unknown_keys(&value)?;
        schema.verify()?;
        Ok(schema)
    }

    /// Build from YAML text.
    ///
    /// # Errors
    ///
    /// Same as [`FieldSchema::from_json_value`], plus YAML syntax errors.
    pub fn from_yaml_str(content: &str) -> Result<Self, SchemaError> {
        let value = document::parse_yaml(content).map_err(|reason| SchemaError::Load {
            path: "(inline)".to_string(),
            reason,
        })?;
        Self::from_json_value(value)
    }

    /// Load from a `.yaml`, `.yml` or `.json` file.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Load` if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let value = document::load_document(path)?;
        Self::from_json_value(value).map_err(|e| match e {
            SchemaError::Load { reason, .. } => SchemaError::Load {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }
}

fn reject_unknown_keys(value: &Value) -> Result<(), SchemaError> {
    let Some(fields) = value.as_object() else {
        return Ok(());
    };
    for (name, rule) in fields {
        let Some(rule) = rule.as_object() else {
            continue;
        };
        if let Some(key) = rule.keys().find(|k| !RULE_KEYS.contains(&k.as_str())) {
            return Err(SchemaError::InvalidRule {
                field: name.clone(),
                reason: format!("unknown key '{key}'"),
            });
        }
    }
    Ok(())
}

impl Schema for FieldSchema {
    type Record = ValidatedRecord;

    fn validate(&self, raw: &RawMapping) -> Result<ValidatedRecord, ValidationViolations> {
        let mut fields = BTreeMap::new();
        let mut violations = ValidationViolations::new();

        for (name, rule) in &self.fields {
            match rule.check(raw.get(name)) {
                Ok(Some(value)) => {
                    fields.insert(name.clone(), value);
                }
                Ok(None) => {}
                Err(message) => violations.push(Violation::field(name.clone(), message)),
            }
        }

        violations.into_result(ValidatedRecord::from_fields(fields))
    }
}
