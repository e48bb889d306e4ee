//! # envsafe-source — Raw Configuration Sources
//!
//! A source is anything that can produce a [`RawMapping`] on demand. The
//! container calls [`EnvSource::fetch`] exactly once, while it is being
//! built, and never caches the result across constructions.
//!
//! ## Variants
//!
//! - [`MemorySource`] — a literal mapping, returned unchanged on every fetch.
//! - [`ProcessEnvSource`] — a snapshot of the process environment at call time.
//! - [`DotEnvFileSource`] — `KEY=VALUE` lines parsed from a file (default `.env`).
//! - [`FnSource`] — a caller-supplied closure.
//!
//! Fetching is infallible. The dotenv variant treats a missing or
//! unparseable file as an empty mapping; validation then reports which
//! declared fields are absent.

use std::sync::Arc;

pub use envsafe_core::RawMapping;

pub mod dotenv;
pub mod func;
pub mod memory;
pub mod process;

pub use dotenv::{DotEnvFileSource, DEFAULT_DOTENV_PATH};
pub use func::FnSource;
pub use memory::MemorySource;
pub use process::ProcessEnvSource;

/// Capability that yields a fresh raw key-value mapping on demand.
pub trait EnvSource: Send + Sync {
    /// Produce the current raw mapping.
    fn fetch(&self) -> RawMapping;

    /// Human-readable description of where the mapping comes from. Used in
    /// error headers and log fields.
    fn describe(&self) -> String {
        "custom".to_string()
    }
}

impl<S: EnvSource + ?Sized> EnvSource for &S {
    fn fetch(&self) -> RawMapping {
        (**self).fetch()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<S: EnvSource + ?Sized> EnvSource for Box<S> {
    fn fetch(&self) -> RawMapping {
        (**self).fetch()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<S: EnvSource + ?Sized> EnvSource for Arc<S> {
    fn fetch(&self) -> RawMapping {
        (**self).fetch()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Serializes tests that read or mutate the process environment.
#[cfg(test)]
pub(crate) fn env_test_lock() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock, PoisonError};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn boxed_and_shared_sources_delegate() {
        let boxed: Box<dyn EnvSource> = Box::new(MemorySource::new([("A", "1")]));
        assert_eq!(boxed.fetch()["A"], json!("1"));
        assert_eq!(boxed.describe(), "memory");

        let shared: Arc<dyn EnvSource> = Arc::new(ProcessEnvSource::new());
        assert_eq!(shared.describe(), "process environment");

        let by_ref = &boxed;
        assert_eq!(by_ref.fetch().len(), 1);
    }
}
