//! Testing infrastructure shared across adapter, engine, and SDK tests.
//!
//! - `fixtures`: temporary results-tree construction and sample tool output
//! - `assertions`: schema, fingerprint, and uniqueness assertions for findings

pub mod assertions;
pub mod fixtures;

pub use fixtures::ResultsTree;
