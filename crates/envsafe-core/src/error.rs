//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used throughout envsafe. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Validation errors carry the full aggregated violation list, rendered as
//!   a header line with the violation count followed by one indented
//!   `path: message` line per violation.
//! - Key lookup errors name the missing key.
//! - Schema construction errors name the file or rule that could not be
//!   loaded.
//! - Source read failures are not represented here: the dotenv source
//!   returns an empty mapping instead, and validation reports what is
//!   missing.

use thiserror::Error;

use crate::violation::ValidationViolations;

/// Top-level error type for envsafe.
#[derive(Error, Debug)]
pub enum EnvError {
    /// The fetched mapping did not satisfy the schema.
    #[error(
        "environment validation failed for source '{origin}' ({count} violation(s)):\n{lines}",
        count = .violations.len(),
        lines = indented(.violations)
    )]
    Validation {
        /// Description of the source the mapping came from.
        origin: String,
        /// Every violation found, in field order.
        violations: ValidationViolations,
    },

    /// A key was requested that is not present in the validated record.
    #[error("key {key} not found")]
    KeyNotFound {
        /// The requested key.
        key: String,
    },

    /// A stored value could not be converted to the requested type.
    #[error("key {key} has an unexpected type: {reason}")]
    TypeMismatch {
        /// The requested key.
        key: String,
        /// Why the conversion failed.
        reason: String,
    },

    /// The schema itself could not be built.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
}

impl EnvError {
    /// The violation list, if this is a validation failure.
    pub fn violations(&self) -> Option<&ValidationViolations> {
        match self {
            Self::Validation { violations, .. } => Some(violations),
            _ => None,
        }
    }
}

/// Error while building a schema.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A schema document could not be read or parsed.
    #[error("schema load error for '{path}': {reason}")]
    Load {
        /// Path or identifier of the schema document.
        path: String,
        /// Reason the document could not be loaded.
        reason: String,
    },

    /// A JSON Schema document could not be compiled into a validator.
    #[error("schema compile error: {reason}")]
    Compile {
        /// Reason reported by the validator backend.
        reason: String,
    },

    /// A field rule is inconsistent, e.g. its default violates the rule.
    #[error("invalid rule for field '{field}': {reason}")]
    InvalidRule {
        /// Field the rule is declared for.
        field: String,
        /// What is wrong with the rule.
        reason: String,
    },
}

fn indented(violations: &ValidationViolations) -> String {
    violations
        .iter()
        .map(|v| format!("  {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}
