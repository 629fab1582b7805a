//! `SystemTime` adapter

use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use once_cell::sync::Lazy;

use super::{DateGetter, DateSetter, DateType};
use crate::error::ClaimError;

static INSTANCE: Lazy<Arc<LegacyDateAdapter>> = Lazy::new(|| Arc::new(LegacyDateAdapter));

/// Returns milliseconds since the epoch, truncated toward zero
///
/// Instants before the epoch yield negative values. Values beyond the `i64`
/// range saturate.
pub fn epoch_millis(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_millis()).unwrap_or(i64::MAX),
        Err(before) => i64::try_from(before.duration().as_millis())
            .map(|millis| -millis)
            .unwrap_or(i64::MIN),
    }
}

/// Builds a `SystemTime` from milliseconds since the epoch
///
/// Returns `None` if the platform cannot represent the instant.
pub fn system_time_from_millis(millis: i64) -> Option<SystemTime> {
    let offset = Duration::from_millis(millis.unsigned_abs());
    if millis >= 0 {
        UNIX_EPOCH.checked_add(offset)
    } else {
        UNIX_EPOCH.checked_sub(offset)
    }
}

/// Adapter for the always-available `std::time::SystemTime`
///
/// Works through a millisecond representation: seconds are derived as
/// `millis / 1000` and reconstructed as `seconds * 1000` milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LegacyDateAdapter;

impl LegacyDateAdapter {
    /// Returns the shared adapter instance
    pub fn instance() -> Arc<Self> {
        Arc::clone(&INSTANCE)
    }

    /// Returns whole seconds since the epoch for `time`
    pub fn seconds_of(&self, time: SystemTime) -> i64 {
        epoch_millis(time) / 1000
    }

    /// Builds a `SystemTime` for the given seconds since the epoch
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::InvalidArgument`] if the instant cannot be
    /// represented.
    pub fn system_time_of(&self, seconds: i64) -> Result<SystemTime, ClaimError> {
        seconds
            .checked_mul(1000)
            .and_then(system_time_from_millis)
            .ok_or_else(|| {
                ClaimError::invalid_argument(format!(
                    "{seconds} seconds cannot be represented as a SystemTime"
                ))
            })
    }
}

impl DateSetter for LegacyDateAdapter {
    fn accepts(&self, date_type: &DateType) -> bool {
        date_type.is::<SystemTime>()
    }

    fn date_as_seconds(&self, date: &dyn Any) -> Result<i64, ClaimError> {
        date.downcast_ref::<SystemTime>()
            .map(|time| self.seconds_of(*time))
            .ok_or_else(|| ClaimError::invalid_argument("LegacyDateAdapter only accepts SystemTime"))
    }
}

impl DateGetter for LegacyDateAdapter {
    fn generates(&self, date_type: &DateType) -> bool {
        date_type.is::<SystemTime>()
    }

    fn seconds_as_date(
        &self,
        seconds: i64,
        date_type: &DateType,
    ) -> Result<Box<dyn Any + Send>, ClaimError> {
        if !self.generates(date_type) {
            return Err(ClaimError::invalid_argument(format!(
                "LegacyDateAdapter cannot generate {date_type}"
            )));
        }
        Ok(Box::new(self.system_time_of(seconds)?))
    }
}
