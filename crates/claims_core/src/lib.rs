//! Claims Core - JWT claim sets and NumericDate handling
//!
//! This crate provides the claim-level building blocks of a JWT toolkit:
//! - An ordered claim map with null-removes-key semantics
//! - Date adapters converting host temporal types to and from NumericDate seconds
//! - A registry that lets embedders plug in additional date types at runtime
//! - Coercion rules for permissive and RFC 7519 NumericDate claim values
//! - Key-management boundary contracts consumed by the encryption layer

pub mod claims;
pub mod config;
pub mod error;
pub mod key_management;
pub mod registry;
pub mod temporal;

pub use claims::{names, ClaimMap, ClaimValue, OpaqueValue};
pub use config::TemporalConfig;
pub use error::{ClaimError, ConfigError, DateOperation, KeyManagementError};
pub use registry::DateAdapterRegistry;
pub use temporal::{DateGetter, DateSetter, DateType, LegacyDateAdapter};
#[cfg(feature = "extended-time")]
pub use temporal::ExtendedDateAdapter;
