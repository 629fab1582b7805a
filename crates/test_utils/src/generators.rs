//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating NumericDate values, host
//! temporal instances and claim names.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use proptest::prelude::*;

/// Upper bound for generated instants (2100-01-01T00:00:00Z)
pub const MAX_EPOCH_SECS: i64 = 4_102_444_800;

/// Strategy for NumericDate seconds between the epoch and 2100
pub fn epoch_seconds_strategy() -> impl Strategy<Value = i64> {
    0i64..MAX_EPOCH_SECS
}

/// Strategy for sub-second millisecond offsets
pub fn sub_second_millis_strategy() -> impl Strategy<Value = u64> {
    0u64..1000u64
}

/// Strategy for SystemTime values with millisecond precision
pub fn system_time_strategy() -> impl Strategy<Value = SystemTime> {
    (epoch_seconds_strategy(), sub_second_millis_strategy()).prop_map(|(seconds, millis)| {
        UNIX_EPOCH + Duration::from_secs(seconds as u64) + Duration::from_millis(millis)
    })
}

/// Strategy for UTC instants with nanosecond precision
pub fn utc_datetime_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (epoch_seconds_strategy(), 0u32..1_000_000_000u32)
        .prop_map(|(seconds, nanos)| Utc.timestamp_opt(seconds, nanos).unwrap())
}

/// Strategy for fixed-offset instants, offsets within +/-14h on 15 minute steps
pub fn offset_datetime_strategy() -> impl Strategy<Value = DateTime<FixedOffset>> {
    (utc_datetime_strategy(), -56i32..=56i32).prop_map(|(instant, quarters)| {
        instant.with_timezone(&FixedOffset::east_opt(quarters * 15 * 60).unwrap())
    })
}

/// Strategy for zone-aware instants in a handful of real zones
pub fn zoned_datetime_strategy() -> impl Strategy<Value = DateTime<chrono_tz::Tz>> {
    let zones = prop_oneof![
        Just(chrono_tz::UTC),
        Just(chrono_tz::Europe::Berlin),
        Just(chrono_tz::America::New_York),
        Just(chrono_tz::Asia::Kolkata),
        Just(chrono_tz::Australia::Lord_Howe),
    ];
    (utc_datetime_strategy(), zones).prop_map(|(instant, zone)| instant.with_timezone(&zone))
}

/// Strategy for custom claim names (private-use, never registered names)
pub fn claim_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{2,15}".prop_filter("registered claim name", |name| {
        !matches!(name.as_str(), "iss" | "sub" | "aud" | "exp" | "nbf" | "iat" | "jti")
    })
}
