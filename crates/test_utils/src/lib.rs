//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! claims test suite.
//!
//! # Modules
//!
//! - `fixtures`: Canonical instants and claim sets (RFC 7519 examples)
//! - `builders`: Builder patterns for test claim maps and registries
//! - `logging`: One-time tracing subscriber for tests
//! - `assertions`: Custom assertion helpers for claims and dates
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod logging;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use logging::*;
pub use assertions::*;
pub use generators::*;
