//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for claims and dates that give
//! more meaningful error messages than standard assertions.

use std::fmt::Debug;
use std::time::SystemTime;

use claims_core::temporal::epoch_millis;
use claims_core::{ClaimError, ClaimMap, ClaimValue};

/// Asserts that two instants fall in the same whole second
///
/// # Panics
///
/// Panics if the instants differ once truncated to seconds
pub fn assert_same_second(actual: SystemTime, expected: SystemTime) {
    let actual_secs = epoch_millis(actual) / 1000;
    let expected_secs = epoch_millis(expected) / 1000;
    assert_eq!(
        actual_secs, expected_secs,
        "Instants differ at second granularity: actual={:?}, expected={:?}",
        actual, expected
    );
}

/// Asserts that a claim is stored as the given NumericDate seconds
pub fn assert_numeric_date(claims: &ClaimMap, name: &str, seconds: i64) {
    let value = claims.get(name);
    assert_eq!(
        value.and_then(ClaimValue::as_i64),
        Some(seconds),
        "Claim '{}' is {:?}, expected {} seconds",
        name,
        value,
        seconds
    );
}

/// Asserts that a claim is not present
pub fn assert_claim_absent(claims: &ClaimMap, name: &str) {
    assert!(
        !claims.contains_key(name),
        "Expected claim '{}' to be absent, found {:?}",
        name,
        claims.get(name)
    );
}

/// Asserts that a result is a MalformedClaim error naming `claim`
pub fn assert_malformed_claim<T: Debug>(result: Result<T, ClaimError>, claim: &str) {
    match result {
        Err(error @ ClaimError::MalformedClaim { .. }) => {
            assert_eq!(
                error.claim_name(),
                Some(claim),
                "MalformedClaim names the wrong claim: {}",
                error
            );
        }
        other => panic!("Expected MalformedClaim for '{}', got {:?}", claim, other),
    }
}

/// Asserts that a result is an UnsupportedTemporalType error
pub fn assert_unsupported<T: Debug>(result: Result<T, ClaimError>) {
    assert!(
        matches!(result, Err(ClaimError::UnsupportedTemporalType { .. })),
        "Expected UnsupportedTemporalType, got {:?}",
        result
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_same_second_ignores_millis() {
        let base = UNIX_EPOCH + Duration::from_secs(100);
        assert_same_second(base + Duration::from_millis(999), base);
    }

    #[test]
    #[should_panic(expected = "second granularity")]
    fn test_same_second_detects_difference() {
        let base = UNIX_EPOCH + Duration::from_secs(100);
        assert_same_second(base + Duration::from_secs(1), base);
    }

    #[test]
    fn test_malformed_claim_helper() {
        assert_malformed_claim::<()>(Err(ClaimError::malformed("exp", "bad")), "exp");
    }
}
