//! # envsafe — Validated Configuration Loading
//!
//! Fetches raw key-value data from a pluggable source, validates it against
//! a declared schema, and exposes the result through an immutable
//! container that never hands out an invalid or missing value.
//!
//! ```
//! use envsafe::{from_memory, FieldRule, FieldSchema};
//!
//! let schema = FieldSchema::new()
//!     .field("HOST", FieldRule::string())
//!     .field("PORT", FieldRule::integer().coerce().default(8080));
//!
//! let env = from_memory(&schema, [("HOST", "localhost")]).unwrap();
//! assert_eq!(env.get_str("HOST").unwrap(), "localhost");
//! assert_eq!(env.get_as::<u16>("PORT").unwrap(), 8080);
//! ```
//!
//! ## Calling Convention
//!
//! Every constructor returns an [`Env`]. Callers that only want the record
//! use [`Env::into_record`].
//!
//! ## Crate Layout
//!
//! - `envsafe-core` — raw mappings, violations, errors.
//! - `envsafe-source` — the [`EnvSource`] capability and its variants.
//! - `envsafe-schema` — the [`Schema`] capability, [`FieldSchema`],
//!   [`JsonSchema`], and [`Typed`].
//! - this crate — [`Env`], the convenience constructors, and
//!   [`SourceOption`] dispatch.

use std::path::PathBuf;

use serde_json::Value;

pub mod env;
pub mod option;

pub use env::Env;
pub use option::{FetchFn, SourceOption};

// ─── Re-exports ─────────────────────────────────────────────────────

pub use envsafe_core::{EnvError, RawMapping, SchemaError, ValidationViolations, Violation};
pub use envsafe_schema::{
    FieldKind, FieldRule, FieldSchema, JsonSchema, Schema, Typed, ValidatedRecord,
};
pub use envsafe_source::{
    DotEnvFileSource, EnvSource, FnSource, MemorySource, ProcessEnvSource, DEFAULT_DOTENV_PATH,
};

// ─── Convenience constructors ───────────────────────────────────────

/// Validate the process environment against `schema`.
///
/// # Errors
///
/// Returns `EnvError::Validation` if the environment does not satisfy the
/// schema.
pub fn from_process_env<S: Schema + ?Sized>(schema: &S) -> Result<Env<S::Record>, EnvError> {
    Env::create(&ProcessEnvSource::new(), schema)
}

/// Validate a literal mapping against `schema`.
///
/// # Errors
///
/// Returns `EnvError::Validation` if the mapping does not satisfy the schema.
pub fn from_memory<S, I, K, V>(schema: &S, record: I) -> Result<Env<S::Record>, EnvError>
where
    S: Schema + ?Sized,
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    Env::create(&MemorySource::new(record), schema)
}

/// Validate the dotenv file at `path` against `schema`.
///
/// A missing or unparseable file is read as an empty mapping, so the error
/// lists every required field.
///
/// # Errors
///
/// Returns `EnvError::Validation` if the file contents do not satisfy the
/// schema.
pub fn from_dotenv<S: Schema + ?Sized>(
    path: impl Into<PathBuf>,
    schema: &S,
) -> Result<Env<S::Record>, EnvError> {
    Env::create(&DotEnvFileSource::new(path), schema)
}

/// Validate the source named by `option` against `schema`.
///
/// # Errors
///
/// Returns `EnvError::Validation` if the fetched mapping does not satisfy
/// the schema.
pub fn create<S: Schema + ?Sized>(
    option: SourceOption,
    schema: &S,
) -> Result<Env<S::Record>, EnvError> {
    match option {
        SourceOption::Process => from_process_env(schema),
        SourceOption::Memory { record } => Env::create(&MemorySource::from(record), schema),
        SourceOption::DotEnv { path } => from_dotenv(
            path.unwrap_or_else(|| PathBuf::from(DEFAULT_DOTENV_PATH)),
            schema,
        ),
        custom @ SourceOption::Custom(_) => Env::create(&custom.into_source(), schema),
    }
}
