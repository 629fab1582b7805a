//! Adapter for the timezone-aware chrono family
//!
//! The family covers three variants:
//!
//! - instant: `DateTime<Utc>`
//! - offset-aware: `DateTime<FixedOffset>`
//! - zone-aware: `DateTime<chrono_tz::Tz>`
//!
//! Widening from seconds to the offset- and zone-aware variants needs the
//! process default zone. Zone resolution never fails: a name that cannot be
//! mapped falls back to the host zone and then to UTC. Constructing the
//! adapter is still a capability probe, failing only if epoch-based
//! construction itself does not work.

use std::any::Any;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use tracing::{debug, warn};

use super::{DateGetter, DateSetter, DateType};
use crate::error::ClaimError;

static INSTANCE: Lazy<Option<Arc<ExtendedDateAdapter>>> =
    Lazy::new(|| ExtendedDateAdapter::probe(None).map(Arc::new));

/// Resolves the process default zone
///
/// Tried in order:
///
/// 1. the `TZ` environment variable, as an IANA name (`Europe/Paris`,
///    `:Europe/Paris`, `/usr/share/zoneinfo/Europe/Paris`) or a POSIX rule
///    with a whole-hour offset and no daylight saving part (`JST-9`, `UTC0`).
///    An empty `TZ` means UTC.
/// 2. the host zone reported by the operating system
/// 3. UTC
pub fn system_default_zone() -> Tz {
    match std::env::var("TZ") {
        Ok(raw) if raw.trim().is_empty() => return Tz::UTC,
        Ok(raw) => match parse_zone(&raw) {
            Some(zone) => return zone,
            None => warn!(tz = %raw, "TZ names no known zone, using the host zone"),
        },
        Err(_) => {}
    }
    host_zone()
}

fn host_zone() -> Tz {
    match iana_time_zone::get_timezone() {
        Ok(name) => Tz::from_str(&name).unwrap_or_else(|_| {
            debug!(zone = %name, "Host zone unknown to chrono-tz, using UTC");
            Tz::UTC
        }),
        Err(e) => {
            debug!(error = %e, "Host zone unavailable, using UTC");
            Tz::UTC
        }
    }
}

fn parse_zone(raw: &str) -> Option<Tz> {
    let name = raw.trim().trim_start_matches(':');
    let name = match name.find("zoneinfo/") {
        Some(index) => &name[index + "zoneinfo/".len()..],
        None => name,
    };
    Tz::from_str(name).ok().or_else(|| posix_fixed_offset(name))
}

/// Maps a POSIX `TZ` rule such as `JST-9` onto the matching `Etc/GMT` zone
///
/// POSIX offsets and `Etc/GMT` names share the inverted sign convention, so
/// `JST-9` (UTC+09:00) is `Etc/GMT-9`.
fn posix_fixed_offset(rule: &str) -> Option<Tz> {
    let split = rule.find(|c: char| c == '+' || c == '-' || c.is_ascii_digit())?;
    let (abbreviation, offset) = rule.split_at(split);
    if abbreviation.len() < 3 || !abbreviation.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    match offset.parse::<i32>().ok()? {
        0 => Some(Tz::UTC),
        hours @ -14..=12 => Tz::from_str(&format!("Etc/GMT{hours:+}")).ok(),
        _ => None,
    }
}

/// Adapter for `DateTime<Utc>`, `DateTime<FixedOffset>` and `DateTime<Tz>`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtendedDateAdapter {
    default_zone: Tz,
}

impl ExtendedDateAdapter {
    /// Runs the capability probe
    ///
    /// Resolves the default zone (from `default_zone_override` if it names a
    /// known zone, otherwise from the process environment) and checks that
    /// epoch-based construction works. Returns `None` only if the latter
    /// fails; this is a normal "feature absent" outcome, not an error.
    pub fn probe(default_zone_override: Option<&str>) -> Option<Self> {
        let default_zone = match default_zone_override {
            Some(name) => parse_zone(name).unwrap_or_else(|| {
                warn!(zone = %name, "Configured default zone is unknown, using the process default");
                system_default_zone()
            }),
            None => system_default_zone(),
        };

        if DateTime::<Utc>::from_timestamp(0, 0).is_none() {
            debug!("Extended date adapter unavailable: epoch construction failed");
            return None;
        }

        debug!(zone = %default_zone.name(), "Extended date adapter available");
        Some(Self { default_zone })
    }

    /// Returns the adapter built from the default probe, cached for the
    /// lifetime of the process
    pub fn instance() -> Option<Arc<Self>> {
        INSTANCE.as_ref().map(Arc::clone)
    }

    /// Returns the zone used when widening instants to offset- or zone-aware values
    pub fn default_zone(&self) -> Tz {
        self.default_zone
    }

    fn is_family(date_type: &DateType) -> bool {
        date_type.is::<DateTime<Utc>>()
            || date_type.is::<DateTime<FixedOffset>>()
            || date_type.is::<DateTime<Tz>>()
    }
}

impl DateSetter for ExtendedDateAdapter {
    fn accepts(&self, date_type: &DateType) -> bool {
        Self::is_family(date_type)
    }

    fn date_as_seconds(&self, date: &dyn Any) -> Result<i64, ClaimError> {
        if let Some(instant) = date.downcast_ref::<DateTime<Utc>>() {
            Ok(instant.timestamp())
        } else if let Some(offset) = date.downcast_ref::<DateTime<FixedOffset>>() {
            Ok(offset.timestamp())
        } else if let Some(zoned) = date.downcast_ref::<DateTime<Tz>>() {
            Ok(zoned.timestamp())
        } else {
            Err(ClaimError::invalid_argument(
                "ExtendedDateAdapter only accepts DateTime<Utc>, DateTime<FixedOffset> or DateTime<Tz>",
            ))
        }
    }
}

impl DateGetter for ExtendedDateAdapter {
    fn generates(&self, date_type: &DateType) -> bool {
        Self::is_family(date_type)
    }

    fn seconds_as_date(
        &self,
        seconds: i64,
        date_type: &DateType,
    ) -> Result<Box<dyn Any + Send>, ClaimError> {
        if !self.generates(date_type) {
            return Err(ClaimError::invalid_argument(format!(
                "ExtendedDateAdapter cannot generate {date_type}"
            )));
        }

        let instant = DateTime::<Utc>::from_timestamp(seconds, 0).ok_or_else(|| {
            ClaimError::invalid_argument(format!(
                "{seconds} seconds cannot be represented as {date_type}"
            ))
        })?;

        if date_type.is::<DateTime<Utc>>() {
            Ok(Box::new(instant))
        } else if date_type.is::<DateTime<FixedOffset>>() {
            Ok(Box::new(instant.with_timezone(&self.default_zone).fixed_offset()))
        } else {
            Ok(Box::new(instant.with_timezone(&self.default_zone)))
        }
    }
}
