//! # Typed Records
//!
//! [`Typed`] validates with an inner schema and then deserializes the
//! validated record into a caller-declared struct. Field access on the
//! result is an ordinary struct field access, checked at compile time.
//!
//! ```
//! use envsafe_schema::{FieldRule, FieldSchema, Schema, Typed};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Server {
//!     #[serde(rename = "HOST")]
//!     host: String,
//!     #[serde(rename = "PORT")]
//!     port: u16,
//! }
//!
//! let schema: Typed<Server> = Typed::new(
//!     FieldSchema::new()
//!         .field("HOST", FieldRule::string())
//!         .field("PORT", FieldRule::integer().coerce().default(8080)),
//! );
//! let raw: envsafe_schema::RawMapping =
//!     [("HOST".to_string(), "localhost".into())].into_iter().collect();
//! let server = schema.validate(&raw).unwrap();
//! assert_eq!(server.host, "localhost");
//! assert_eq!(server.port, 8080);
//! ```

use std::fmt;
use std::marker::PhantomData;

use envsafe_core::{RawMapping, ValidationViolations, Violation};
use serde::de::DeserializeOwned;

use crate::field::FieldSchema;
use crate::record::ValidatedRecord;
use crate::Schema;

/// Schema adapter producing a `T` instead of a [`ValidatedRecord`].
pub struct Typed<T, S = FieldSchema> {
    inner: S,
    _record: PhantomData<fn() -> T>,
}

impl<T, S> Typed<T, S> {
    /// Wrap `inner`.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            _record: PhantomData,
        }
    }

    /// The wrapped schema.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<T, S: Clone> Clone for Typed<T, S> {
    fn clone(&self) -> Self {
        Self::new(self.inner.clone())
    }
}

impl<T, S: fmt::Debug> fmt::Debug for Typed<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Typed")
            .field("record", &std::any::type_name::<T>())
            .field("inner", &self.inner)
            .finish()
    }
}

impl<T, S> Schema for Typed<T, S>
where
    S: Schema<Record = ValidatedRecord>,
    T: DeserializeOwned,
{
    type Record = T;

    fn validate(&self, raw: &RawMapping) -> Result<T, ValidationViolations> {
        let record = self.inner.validate(raw)?;
        serde_json::from_value(record.into_value()).map_err(|e| {
            Violation::root(format!(
                "record does not match {}: {e}",
                std::any::type_name::<T>()
            ))
            .into()
        })
    }
}
