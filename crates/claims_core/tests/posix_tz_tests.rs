//! Process default zone given as a POSIX `TZ` rule
//!
//! Lives in its own test binary with a single test: it sets `TZ` before the
//! process-wide registry is first touched, and no other test may observe
//! that change.

#![cfg(feature = "extended-time")]

use chrono::{DateTime, FixedOffset, Offset, Utc};
use claims_core::registry;
use claims_core::temporal::system_default_zone;
use claims_core::{names, ClaimMap, ExtendedDateAdapter};
use test_utils::TemporalFixtures;

#[test]
fn test_posix_tz_keeps_extended_family_in_global_registry() {
    std::env::set_var("TZ", "JST-9");

    assert_eq!(system_default_zone(), chrono_tz::Etc::GMTMinus9);
    assert!(ExtendedDateAdapter::instance().is_some());
    assert!(registry::is_supported_date_type_for_set::<DateTime<Utc>>());
    assert!(registry::is_supported_date_type_for_get::<DateTime<Utc>>());

    let mut claims = ClaimMap::new();
    claims
        .set_date_via_setter(names::ISSUED_AT, Some(&TemporalFixtures::issued_at_utc()))
        .unwrap();
    let read: DateTime<FixedOffset> = claims
        .get_date_via_getter(names::ISSUED_AT)
        .unwrap()
        .unwrap();

    assert_eq!(read.timestamp(), TemporalFixtures::ISSUED_AT_SECS);
    assert_eq!(read.offset().fix().local_minus_utc(), 9 * 3600);
}
