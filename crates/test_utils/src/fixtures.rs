//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for claim sets and NumericDate instants.
//! Values come from the RFC 7519 and jwt.io examples so failures are easy to
//! cross-check by hand.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use claims_core::{names, ClaimMap};
use serde_json::json;

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// `iat` of the jwt.io example token, in seconds
    pub const ISSUED_AT_SECS: i64 = 1_516_239_022;

    /// `exp` of the RFC 7519 section 3.1 example, in seconds
    pub const EXPIRATION_SECS: i64 = 1_300_819_380;

    /// ISO-8601 rendering of [`Self::ISSUED_AT_SECS`]
    pub const ISSUED_AT_ISO: &'static str = "2018-01-18T01:30:22Z";

    /// The jwt.io `iat` as a SystemTime
    pub fn issued_at() -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(Self::ISSUED_AT_SECS as u64)
    }

    /// The jwt.io `iat` plus 750ms, for truncation tests
    pub fn issued_at_with_millis() -> SystemTime {
        Self::issued_at() + Duration::from_millis(750)
    }

    /// The RFC 7519 `exp` as a SystemTime
    pub fn expiration() -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(Self::EXPIRATION_SECS as u64)
    }

    /// The jwt.io `iat` as a UTC instant
    pub fn issued_at_utc() -> DateTime<Utc> {
        Utc.timestamp_opt(Self::ISSUED_AT_SECS, 0).unwrap()
    }

    /// The jwt.io `iat` with nanoseconds, for truncation tests
    pub fn issued_at_utc_with_nanos() -> DateTime<Utc> {
        Utc.timestamp_opt(Self::ISSUED_AT_SECS, 123_456_789).unwrap()
    }

    /// The jwt.io `iat` seen from UTC-05:00
    pub fn issued_at_offset() -> DateTime<FixedOffset> {
        Self::issued_at_utc().with_timezone(&FixedOffset::west_opt(5 * 3600).unwrap())
    }

    /// The jwt.io `iat` seen from Europe/Berlin
    pub fn issued_at_zoned() -> DateTime<chrono_tz::Tz> {
        Self::issued_at_utc().with_timezone(&chrono_tz::Europe::Berlin)
    }
}

/// Fixture for claim sets
pub struct ClaimFixtures;

impl ClaimFixtures {
    /// The RFC 7519 section 3.1 example claim set
    pub fn rfc7519_example() -> ClaimMap {
        let json = json!({
            "iss": "joe",
            "exp": TemporalFixtures::EXPIRATION_SECS,
            "http://example.com/is_root": true
        });
        match json {
            serde_json::Value::Object(map) => ClaimMap::from(map),
            _ => unreachable!("fixture is an object"),
        }
    }

    /// The jwt.io example claim set
    pub fn jwt_io_example() -> ClaimMap {
        let mut claims = ClaimMap::new();
        claims.put(names::SUBJECT, "1234567890");
        claims.put("name", "John Doe");
        claims.put(names::ISSUED_AT, TemporalFixtures::ISSUED_AT_SECS);
        claims
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_fixture_matches_seconds() {
        let parsed = DateTime::parse_from_rfc3339(TemporalFixtures::ISSUED_AT_ISO).unwrap();
        assert_eq!(parsed.timestamp(), TemporalFixtures::ISSUED_AT_SECS);
    }

    #[test]
    fn test_all_variants_share_the_instant() {
        assert_eq!(TemporalFixtures::issued_at_offset().timestamp(), TemporalFixtures::ISSUED_AT_SECS);
        assert_eq!(TemporalFixtures::issued_at_zoned().timestamp(), TemporalFixtures::ISSUED_AT_SECS);
    }

    #[test]
    fn test_rfc7519_example_order() {
        let claims = ClaimFixtures::rfc7519_example();
        assert_eq!(
            claims.keys().collect::<Vec<_>>(),
            vec!["iss", "exp", "http://example.com/is_root"]
        );
    }
}
