//! # envsafe-schema — Schema Validation
//!
//! A schema turns a [`RawMapping`] into a record or reports every way the
//! mapping fails to conform. Implementations evaluate all declared fields
//! and aggregate failures into [`ValidationViolations`]; they never stop at
//! the first problem. Keys the schema does not declare are ignored.
//!
//! ## Implementations
//!
//! - [`FieldSchema`] — declarative mapping of field name to [`FieldRule`].
//!   Declared in code with a builder, or loaded from YAML/JSON.
//! - [`JsonSchema`] — a JSON Schema (Draft 2020-12) document applied to the
//!   mapping as a JSON object, backed by the `jsonschema` crate.
//! - [`Typed`] — wraps either of the above and deserializes the validated
//!   record into a caller-declared struct, so field access is checked at
//!   compile time.

pub use envsafe_core::{RawMapping, ValidationViolations, Violation};

mod document;
pub mod field;
pub mod json;
pub mod record;
pub mod rule;
pub mod typed;

pub use field::FieldSchema;
pub use json::JsonSchema;
pub use record::ValidatedRecord;
pub use rule::{FieldKind, FieldRule};
pub use typed::Typed;

/// Capability that validates a raw mapping into a record.
pub trait Schema {
    /// Record produced on success.
    type Record;

    /// Validate `raw`, returning the record or every violation found.
    fn validate(&self, raw: &RawMapping) -> Result<Self::Record, ValidationViolations>;
}

impl<S: Schema + ?Sized> Schema for &S {
    type Record = S::Record;

    fn validate(&self, raw: &RawMapping) -> Result<Self::Record, ValidationViolations> {
        (**self).validate(raw)
    }
}
