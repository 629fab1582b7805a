//! Error types for claim handling, adapter lookup and key management

use thiserror::Error;

/// Which side of the adapter registry a lookup was made against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOperation {
    /// Converting a temporal value into seconds (write path)
    Set,
    /// Reconstructing a temporal value from seconds (read path)
    Get,
}

impl std::fmt::Display for DateOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateOperation::Set => f.write_str("DateSetter"),
            DateOperation::Get => f.write_str("DateGetter"),
        }
    }
}

/// Errors raised by the claim map, its coercion rules and the date adapters
#[derive(Debug, Error)]
pub enum ClaimError {
    /// An adapter was invoked on a type it does not handle.
    ///
    /// Callers are expected to consult `accepts`/`generates` first, so this
    /// indicates a bug at the call site rather than bad input.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// No registered adapter handles the requested type
    #[error("No {operation} for type {type_name} found")]
    UnsupportedTemporalType {
        type_name: &'static str,
        operation: DateOperation,
    },

    /// A claim value cannot be coerced into the expected shape
    #[error("Malformed '{claim}' claim: {message}")]
    MalformedClaim {
        claim: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A value of a type with no coercion rule reached generic date coercion
    #[error("Invalid state: {message}")]
    InvalidState { message: String },
}

impl ClaimError {
    /// Creates an InvalidArgument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ClaimError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates an UnsupportedTemporalType error
    pub fn unsupported(type_name: &'static str, operation: DateOperation) -> Self {
        ClaimError::UnsupportedTemporalType {
            type_name,
            operation,
        }
    }

    /// Creates a MalformedClaim error without an underlying cause
    pub fn malformed(claim: impl Into<String>, message: impl Into<String>) -> Self {
        ClaimError::MalformedClaim {
            claim: claim.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a MalformedClaim error wrapping the failure that caused it
    pub fn malformed_with_source<E>(
        claim: impl Into<String>,
        message: impl Into<String>,
        source: E,
    ) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ClaimError::MalformedClaim {
            claim: claim.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates an InvalidState error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        ClaimError::InvalidState {
            message: message.into(),
        }
    }

    /// Returns true if this error indicates a defect in the calling code
    /// rather than in the data being processed
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            ClaimError::InvalidArgument { .. } | ClaimError::InvalidState { .. }
        )
    }

    /// Returns the offending claim name, if the error is tied to one
    pub fn claim_name(&self) -> Option<&str> {
        match self {
            ClaimError::MalformedClaim { claim, .. } => Some(claim),
            _ => None,
        }
    }
}

/// Errors raised while resolving key material for encryption
#[derive(Debug, Error)]
pub enum KeyManagementError {
    #[error("No key available for encryption algorithm {algorithm}")]
    KeyUnavailable { algorithm: String },
}

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_claim_names_claim() {
        let error = ClaimError::malformed("iat", "not a number");
        assert_eq!(error.claim_name(), Some("iat"));
        assert!(error.to_string().contains("'iat'"));
        assert!(!error.is_contract_violation());
    }

    #[test]
    fn test_unsupported_message() {
        let error = ClaimError::unsupported("std::time::Instant", DateOperation::Set);
        assert_eq!(
            error.to_string(),
            "No DateSetter for type std::time::Instant found"
        );
        assert!(error.claim_name().is_none());
    }

    #[test]
    fn test_contract_violations() {
        assert!(ClaimError::invalid_argument("bad").is_contract_violation());
        assert!(ClaimError::invalid_state("bad").is_contract_violation());
        assert!(!ClaimError::unsupported("x", DateOperation::Get).is_contract_violation());
    }

    #[test]
    fn test_malformed_keeps_source() {
        use std::error::Error as _;

        let parse = "abc".parse::<i64>().unwrap_err();
        let error = ClaimError::malformed_with_source("exp", "bad seconds", parse);
        assert!(error.source().is_some());
    }
}
