//! Date coercion rules
//!
//! Two paths exist and deliberately disagree on units:
//!
//! - [`to_date`] treats numbers as **milliseconds** since the epoch. It is the
//!   permissive path for claims whose at-rest form is not governed by RFC 7519.
//! - [`to_spec_date`] treats numbers (and bare-integer strings) as
//!   **seconds**, as RFC 7519 mandates for NumericDate claims, then scales them
//!   to milliseconds and defers to [`to_date`].
//!
//! Reusing [`to_date`] on `exp`, `nbf` or `iat` reads seconds as milliseconds
//! and lands a few weeks after 1970. Keep the two paths separate.
//!
//! Text timestamps are accepted only in the UTC form
//! `yyyy-MM-ddTHH:mm:ss[.fraction]Z`. Offsets, a space separator and
//! lowercase `t`/`z` are rejected.

use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDateTime};
use serde_json::Number;

use super::value::{number_as_i64, ClaimValue};
use crate::error::ClaimError;
use crate::temporal::system_time_from_millis;

/// Coerces a claim value into a `SystemTime`
///
/// | input | result |
/// |---|---|
/// | absent or `Null` | `Ok(None)` |
/// | opaque `SystemTime` | passed through |
/// | opaque `DateTime<Local>` | its instant |
/// | number | milliseconds since the epoch |
/// | string | UTC ISO-8601 timestamp, `yyyy-MM-ddTHH:mm:ss[.fraction]Z` |
///
/// # Errors
///
/// - [`ClaimError::MalformedClaim`] if a string is not ISO-8601, or a number
///   is outside the representable range
/// - [`ClaimError::InvalidState`] for any other kind of value
pub fn to_date(value: Option<&ClaimValue>, name: &str) -> Result<Option<SystemTime>, ClaimError> {
    let value = match value {
        None | Some(ClaimValue::Null) => return Ok(None),
        Some(value) => value,
    };

    match value {
        ClaimValue::Object(object) => {
            if let Some(time) = object.downcast_ref::<SystemTime>() {
                Ok(Some(*time))
            } else if let Some(calendar) = object.downcast_ref::<DateTime<Local>>() {
                Ok(Some(SystemTime::from(*calendar)))
            } else {
                Err(cannot_create(value, name))
            }
        }
        ClaimValue::Number(n) => from_millis(whole_number(n, name)?, name).map(Some),
        ClaimValue::String(s) => parse_iso8601(s, name).map(Some),
        _ => Err(cannot_create(value, name)),
    }
}

/// Coerces a NumericDate claim value into a `SystemTime`
///
/// Numbers are seconds. Strings are first read as bare integer seconds; if
/// that fails they fall through to the ISO-8601 parsing of [`to_date`], which
/// accommodates producers that emit timestamps as text.
///
/// # Errors
///
/// Same as [`to_date`], plus [`ClaimError::MalformedClaim`] when scaling
/// seconds to milliseconds overflows.
pub fn to_spec_date(
    value: Option<&ClaimValue>,
    name: &str,
) -> Result<Option<SystemTime>, ClaimError> {
    match value {
        Some(ClaimValue::Number(n)) => seconds_to_date(whole_number(n, name)?, name),
        Some(ClaimValue::String(s)) => match s.parse::<i64>() {
            Ok(seconds) => seconds_to_date(seconds, name),
            Err(_) => to_date(value, name),
        },
        _ => to_date(value, name),
    }
}

fn whole_number(n: &Number, name: &str) -> Result<i64, ClaimError> {
    number_as_i64(n).ok_or_else(|| ClaimError::malformed(name, format!("{n} is out of range")))
}

fn seconds_to_date(seconds: i64, name: &str) -> Result<Option<SystemTime>, ClaimError> {
    let millis = seconds.checked_mul(1000).ok_or_else(|| {
        ClaimError::malformed(name, format!("{seconds} seconds is out of range"))
    })?;
    to_date(Some(&ClaimValue::from(millis)), name)
}

fn from_millis(millis: i64, name: &str) -> Result<SystemTime, ClaimError> {
    system_time_from_millis(millis)
        .ok_or_else(|| ClaimError::malformed(name, format!("{millis} milliseconds is out of range")))
}

const ISO8601_UTC: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

fn parse_iso8601(s: &str, name: &str) -> Result<SystemTime, ClaimError> {
    let parsed = NaiveDateTime::parse_from_str(s, ISO8601_UTC)
        .map_err(|e| ClaimError::malformed_with_source(name, not_iso8601(s), e))?;
    // chrono skips leading whitespace and may match literals loosely
    if !is_canonical_utc(s) {
        return Err(ClaimError::malformed(name, not_iso8601(s)));
    }
    Ok(SystemTime::from(parsed.and_utc()))
}

fn is_canonical_utc(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.first().is_some_and(u8::is_ascii_digit)
        && bytes.get(10) == Some(&b'T')
        && bytes.last() == Some(&b'Z')
}

fn not_iso8601(s: &str) -> String {
    format!("value does not appear to be ISO-8601-formatted: {s}")
}

fn cannot_create(value: &ClaimValue, name: &str) -> ClaimError {
    ClaimError::invalid_state(format!("Cannot create date from '{name}' value '{value}'"))
}
