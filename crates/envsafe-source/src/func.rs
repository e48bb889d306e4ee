//! Closure-backed source for data that lives somewhere envsafe does not know
//! about.

use std::fmt;

use crate::{EnvSource, RawMapping};

/// Source that calls a closure on every fetch.
pub struct FnSource<F> {
    fetch: F,
    name: String,
}

impl<F> FnSource<F>
where
    F: Fn() -> RawMapping + Send + Sync,
{
    /// Wrap `fetch`. The source describes itself as `"custom"`.
    pub fn new(fetch: F) -> Self {
        Self::named("custom", fetch)
    }

    /// Wrap `fetch` under a descriptive name used in errors and logs.
    pub fn named(name: impl Into<String>, fetch: F) -> Self {
        Self {
            fetch,
            name: name.into(),
        }
    }
}

impl<F> fmt::Debug for FnSource<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSource")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<F> EnvSource for FnSource<F>
where
    F: Fn() -> RawMapping + Send + Sync,
{
    fn fetch(&self) -> RawMapping {
        (self.fetch)()
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}
