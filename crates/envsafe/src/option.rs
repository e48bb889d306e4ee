//! # Source Selection
//!
//! [`SourceOption`] names a source variant at runtime, so the choice of
//! source can live in configuration rather than code. It deserializes from
//! an object tagged by `source`:
//!
//! ```yaml
//! source: dotenv
//! path: config/.env
//! ```
//!
//! `node` is accepted as an alias of `process`. The `custom` variant wraps a
//! closure and can only be built in code.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use envsafe_core::RawMapping;
use envsafe_source::{
    DotEnvFileSource, EnvSource, FnSource, MemorySource, ProcessEnvSource, DEFAULT_DOTENV_PATH,
};
use serde::Deserialize;

/// Shared fetch closure for [`SourceOption::Custom`].
pub type FetchFn = Arc<dyn Fn() -> RawMapping + Send + Sync>;

/// Runtime choice of source.
#[derive(Clone, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum SourceOption {
    /// The process environment.
    #[serde(alias = "node")]
    Process,
    /// A literal mapping.
    Memory {
        /// Entries returned on every fetch.
        #[serde(default)]
        record: RawMapping,
    },
    /// A dotenv file; `.env` when no path is given.
    #[serde(rename = "dotenv")]
    DotEnv {
        /// File to read.
        #[serde(default)]
        path: Option<PathBuf>,
    },
    /// A caller-supplied fetch closure.
    #[serde(skip)]
    Custom(FetchFn),
}

impl SourceOption {
    /// Wrap a fetch closure.
    pub fn custom<F>(fetch: F) -> Self
    where
        F: Fn() -> RawMapping + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(fetch))
    }

    /// Build the source this option names.
    pub fn into_source(self) -> Box<dyn EnvSource> {
        match self {
            Self::Process => Box::new(ProcessEnvSource::new()),
            Self::Memory { record } => Box::new(MemorySource::from(record)),
            Self::DotEnv { path } => Box::new(DotEnvFileSource::new(
                path.unwrap_or_else(|| PathBuf::from(DEFAULT_DOTENV_PATH)),
            )),
            Self::Custom(fetch) => Box::new(FnSource::new(move || fetch())),
        }
    }
}

impl fmt::Debug for SourceOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Process => f.write_str("Process"),
            Self::Memory { record } => f.debug_struct("Memory").field("record", record).finish(),
            Self::DotEnv { path } => f.debug_struct("DotEnv").field("path", path).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
