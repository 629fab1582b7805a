//! Temporal adapters
//!
//! JWT NumericDate values are integer seconds since the epoch. Host code,
//! however, works with whatever date types it has at hand. Adapters bridge
//! the two directions:
//!
//! - A [`DateSetter`] turns a temporal instance into seconds
//! - A [`DateGetter`] builds a temporal instance of a requested type from seconds
//!
//! Adapters are looked up by predicate (`accepts` / `generates`) rather than
//! by a closed match over known types, so new date families can be plugged in
//! through the [`crate::registry::DateAdapterRegistry`] without touching the
//! claim map.
//!
//! # Built-in adapters
//!
//! - [`LegacyDateAdapter`]: `std::time::SystemTime`, always present
//! - [`ExtendedDateAdapter`]: `chrono::DateTime<Utc>`, `DateTime<FixedOffset>`
//!   and `DateTime<chrono_tz::Tz>`, present only with the `extended-time`
//!   feature and a successful capability probe
//!
//! Both adapters work at one-second resolution. Sub-second precision is
//! dropped on write and never reconstructed on read.

use std::any::{Any, TypeId};
use std::fmt;

use crate::error::ClaimError;

mod legacy;
#[cfg(feature = "extended-time")]
mod extended;

pub use legacy::{epoch_millis, system_time_from_millis, LegacyDateAdapter};
#[cfg(feature = "extended-time")]
pub use extended::{system_default_zone, ExtendedDateAdapter};

/// Runtime identity of a date type
///
/// Pairs a [`TypeId`] with the type's name so lookups can be keyed on the
/// former and errors can report the latter.
#[derive(Clone, Copy)]
pub struct DateType {
    id: TypeId,
    name: &'static str,
}

impl DateType {
    /// Returns the date type descriptor for `T`
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Returns the date type descriptor for the type of `value`
    pub fn of_val<T: Any>(_value: &T) -> Self {
        Self::of::<T>()
    }

    /// Returns the underlying type id
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the fully qualified type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true if this descriptor names `T`
    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for DateType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for DateType {}

impl fmt::Debug for DateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for DateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Converts temporal instances into NumericDate seconds
pub trait DateSetter: fmt::Debug + Send + Sync {
    /// Returns true if instances of `date_type` can be converted
    fn accepts(&self, date_type: &DateType) -> bool;

    /// Returns the number of whole seconds since the epoch represented by `date`
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::InvalidArgument`] if `date` is not of a type this
    /// setter accepts.
    fn date_as_seconds(&self, date: &dyn Any) -> Result<i64, ClaimError>;
}

/// Reconstructs temporal instances from NumericDate seconds
pub trait DateGetter: fmt::Debug + Send + Sync {
    /// Returns true if this getter can produce instances of `date_type`
    fn generates(&self, date_type: &DateType) -> bool;

    /// Builds an instance of `date_type` for the given seconds since the epoch
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::InvalidArgument`] if `date_type` is not generated
    /// by this getter, or if `seconds` is outside its representable range.
    fn seconds_as_date(
        &self,
        seconds: i64,
        date_type: &DateType,
    ) -> Result<Box<dyn Any + Send>, ClaimError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    #[test]
    fn test_date_type_identity() {
        let a = DateType::of::<SystemTime>();
        let b = DateType::of_val(&SystemTime::now());
        assert_eq!(a, b);
        assert!(a.is::<SystemTime>());
        assert!(!a.is::<String>());
        assert!(a.name().ends_with("SystemTime"));
    }

    #[test]
    fn test_date_type_distinguishes_types() {
        assert_ne!(DateType::of::<SystemTime>(), DateType::of::<i64>());
    }
}
