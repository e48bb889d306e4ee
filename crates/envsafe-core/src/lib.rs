//! # envsafe-core — Foundational Types for envsafe
//!
//! Leaf crate of the envsafe workspace. Defines the types every other crate
//! agrees on: the raw mapping a source produces, the structured violations a
//! schema reports, and the error hierarchy the container surfaces.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `envsafe-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod mapping;
pub mod violation;

// Re-export primary types for ergonomic imports.
pub use error::{EnvError, SchemaError};
pub use mapping::{mapping_from_pairs, value_kind, RawMapping};
pub use violation::{ValidationViolations, Violation, ROOT_PATH};
