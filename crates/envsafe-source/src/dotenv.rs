//! # Dotenv File Source
//!
//! Parses `KEY=VALUE` lines from a file using the `dotenvy` parser (comments,
//! `export` prefixes, quoting, `${VAR}` substitution). The process
//! environment is never modified.
//!
//! ## Leniency
//!
//! [`EnvSource::fetch`] never fails. A missing file, an unreadable file, or
//! a file containing a line that does not parse all yield an empty mapping,
//! and validation reports the declared fields as missing. A missing file is
//! logged at `debug` (it is the expected case for optional overrides); any
//! other failure is logged at `warn`. Callers that need to tell the two
//! apart use [`DotEnvFileSource::try_fetch`].

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::{EnvSource, RawMapping};

/// Conventional dotenv path, relative to the working directory.
pub const DEFAULT_DOTENV_PATH: &str = ".env";

/// Source that reads a dotenv-formatted file on every fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotEnvFileSource {
    path: PathBuf,
}

impl DotEnvFileSource {
    /// Source reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this source reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the file, surfacing any failure.
    ///
    /// # Errors
    ///
    /// Returns the `dotenvy` error if the file cannot be opened or any line
    /// fails to parse. A partial mapping is never returned.
    pub fn try_fetch(&self) -> Result<RawMapping, dotenvy::Error> {
        dotenvy::from_path_iter(&self.path)?
            .map(|item| item.map(|(key, value)| (key, Value::String(value))))
            .collect()
    }
}

impl Default for DotEnvFileSource {
    fn default() -> Self {
        Self::new(DEFAULT_DOTENV_PATH)
    }
}

impl EnvSource for DotEnvFileSource {
    fn fetch(&self) -> RawMapping {
        match self.try_fetch() {
            Ok(mapping) => {
                tracing::trace!(
                    path = %self.path.display(),
                    keys = mapping.len(),
                    "parsed dotenv file"
                );
                mapping
            }
            Err(e) if e.not_found() => {
                tracing::debug!(path = %self.path.display(), "dotenv file not found, using empty mapping");
                RawMapping::new()
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "dotenv file unreadable, using empty mapping"
                );
                RawMapping::new()
            }
        }
    }

    fn describe(&self) -> String {
        format!("dotenv file {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn write_env(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn default_path_is_dot_env() {
        assert_eq!(DotEnvFileSource::default().path(), Path::new(".env"));
    }

    #[test]
    fn parses_key_value_lines() {
        let file = write_env("HOST=localhost\nPORT=8080\n");
        let fetched = DotEnvFileSource::new(file.path()).fetch();
        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched["HOST"], json!("localhost"));
        assert_eq!(fetched["PORT"], json!("8080"));
    }

    #[test]
    fn handles_comments_quotes_and_export() {
        let file = write_env(
            "# database settings\n\
             DATABASE_URL=\"postgres://localhost/app\"\n\
             export MODE=production\n\
             \n\
             GREETING='hello world'\n",
        );
        let fetched = DotEnvFileSource::new(file.path()).fetch();
        assert_eq!(fetched.len(), 3);
        assert_eq!(fetched["DATABASE_URL"], json!("postgres://localhost/app"));
        assert_eq!(fetched["MODE"], json!("production"));
        assert_eq!(fetched["GREETING"], json!("hello world"));
    }

    #[test]
    fn missing_file_yields_empty_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let source = DotEnvFileSource::new(dir.path().join("does-not-exist.env"));
        assert!(source.fetch().is_empty());
        assert!(source.try_fetch().unwrap_err().not_found());
    }

    #[test]
    fn unparseable_file_yields_empty_mapping() {
        let file = write_env("GOOD=1\nBROKEN LINE\n");
        let source = DotEnvFileSource::new(file.path());
        assert!(source.fetch().is_empty());
        let err = source.try_fetch().unwrap_err();
        assert!(!err.not_found());
    }

    #[test]
    fn fetch_does_not_touch_process_environment() {
        let _guard = crate::env_test_lock();
        let file = write_env("ENVSAFE_DOTENV_ISOLATION_CHECK=1\n");
        let fetched = DotEnvFileSource::new(file.path()).fetch();
        assert_eq!(fetched["ENVSAFE_DOTENV_ISOLATION_CHECK"], json!("1"));
        assert!(std::env::var("ENVSAFE_DOTENV_ISOLATION_CHECK").is_err());
    }

    #[test]
    fn substitutes_earlier_values() {
        let _guard = crate::env_test_lock();
        let file = write_env(
            "ENVSAFE_DOTENV_SUBST_A=x\nENVSAFE_DOTENV_SUBST_B=${ENVSAFE_DOTENV_SUBST_A}y\n",
        );
        let fetched = DotEnvFileSource::new(file.path()).fetch();
        assert_eq!(fetched["ENVSAFE_DOTENV_SUBST_B"], json!("xy"));
    }

    #[test]
    fn fetch_rereads_the_file() {
        let mut file = write_env("A=1\n");
        let source = DotEnvFileSource::new(file.path());
        assert_eq!(source.fetch().len(), 1);
        file.write_all(b"B=2\n").unwrap();
        file.flush().unwrap();
        assert_eq!(source.fetch().len(), 2);
    }

    #[test]
    fn describe_names_the_path() {
        let source = DotEnvFileSource::new("config/.env");
        assert_eq!(source.describe(), "dotenv file config/.env");
    }
}
