//! # The Env Container
//!
//! [`Env`] holds exactly one validated record. [`Env::create`] is the only
//! way to obtain one: it fetches from the source once, validates once, and
//! either returns a fully built container or an error. There is no
//! partially constructed container and no way to mutate one afterwards, so
//! an `Env` can be shared across threads behind an `Arc` without locking.

use envsafe_core::EnvError;
use envsafe_schema::{Schema, ValidatedRecord};
use envsafe_source::EnvSource;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Immutable container for a validated configuration record.
#[derive(Debug, Clone, PartialEq)]
pub struct Env<R = ValidatedRecord> {
    record: R,
    origin: String,
}

impl<R> Env<R> {
    /// Fetch from `source`, validate against `schema`, and wrap the record.
    ///
    /// # Errors
    ///
    /// Returns `EnvError::Validation` carrying every violation when the
    /// fetched mapping does not satisfy the schema.
    pub fn create<Src, S>(source: &Src, schema: &S) -> Result<Self, EnvError>
    where
        Src: EnvSource + ?Sized,
        S: Schema<Record = R> + ?Sized,
    {
        let origin = source.describe();
        let raw = source.fetch();
        tracing::debug!(origin = %origin, keys = raw.len(), "fetched raw mapping");

        match schema.validate(&raw) {
            Ok(record) => {
                tracing::info!(origin = %origin, "environment validated");
                Ok(Self { record, origin })
            }
            Err(violations) => {
                tracing::warn!(
                    origin = %origin,
                    violations = violations.len(),
                    fields = ?violations.paths(),
                    "environment validation failed"
                );
                Err(EnvError::Validation { origin, violations })
            }
        }
    }

    /// The validated record.
    pub fn record(&self) -> &R {
        &self.record
    }

    /// Consume the container and return the bare record.
    pub fn into_record(self) -> R {
        self.record
    }

    /// Description of the source this container was built from.
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

impl Env<ValidatedRecord> {
    /// Value stored at `key`.
    ///
    /// # Errors
    ///
    /// Returns `EnvError::KeyNotFound` if `key` is not in the record, which
    /// happens for keys the schema never declared and for optional fields
    /// that were absent.
    pub fn get(&self, key: &str) -> Result<&Value, EnvError> {
        self.record.get(key).ok_or_else(|| EnvError::KeyNotFound {
            key: key.to_string(),
        })
    }

    /// String value stored at `key`.
    ///
    /// # Errors
    ///
    /// `KeyNotFound` as for [`Env::get`]; `TypeMismatch` if the value is not
    /// a string.
    pub fn get_str(&self, key: &str) -> Result<&str, EnvError> {
        let value = self.get(key)?;
        value.as_str().ok_or_else(|| EnvError::TypeMismatch {
            key: key.to_string(),
            reason: format!("expected string, found {}", envsafe_core::value_kind(value)),
        })
    }

    /// Value stored at `key`, deserialized into `T`.
    ///
    /// # Errors
    ///
    /// `KeyNotFound` as for [`Env::get`]; `TypeMismatch` if the value does
    /// not deserialize into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T, EnvError> {
        let value = self.get(key)?;
        T::deserialize(value).map_err(|e| EnvError::TypeMismatch {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }
}
