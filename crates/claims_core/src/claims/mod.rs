//! Claim map
//!
//! An ordered, string-keyed collection of [`ClaimValue`]s representing a
//! token's claim set, with typed helpers for NumericDate claims layered over
//! raw get/put.
//!
//! Temporal claims are always stored as integer seconds. Writing goes through
//! a [`DateSetter`](crate::temporal::DateSetter) matching the value's type;
//! reading goes through a [`DateGetter`](crate::temporal::DateGetter) matching
//! the requested type. Both are looked up in the map's
//! [`DateAdapterRegistry`], which defaults to the process-wide one.
//!
//! A `Null` value is never stored: `put(name, Null)` is `remove(name)`.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ClaimError, DateOperation};
use crate::registry::DateAdapterRegistry;
use crate::temporal::{DateType, LegacyDateAdapter};

mod coerce;
mod registered;
mod value;

pub use registered::names;
pub use value::{ClaimValue, OpaqueClaim, OpaqueValue};

/// Ordered claim set
#[derive(Clone)]
pub struct ClaimMap {
    claims: IndexMap<String, ClaimValue>,
    registry: Arc<DateAdapterRegistry>,
}

impl Default for ClaimMap {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimMap {
    /// Creates an empty map backed by the process-wide adapter registry
    pub fn new() -> Self {
        Self::with_registry(DateAdapterRegistry::global())
    }

    /// Creates an empty map backed by the given adapter registry
    pub fn with_registry(registry: Arc<DateAdapterRegistry>) -> Self {
        Self {
            claims: IndexMap::new(),
            registry,
        }
    }

    /// Returns the adapter registry used for temporal claims
    pub fn registry(&self) -> &Arc<DateAdapterRegistry> {
        &self.registry
    }

    pub fn get(&self, name: &str) -> Option<&ClaimValue> {
        self.claims.get(name)
    }

    /// Returns the claim rendered as a string
    pub fn get_string(&self, name: &str) -> Option<String> {
        self.get(name).map(ToString::to_string)
    }

    /// Sets a claim, returning the previous value
    ///
    /// A `Null` value removes the claim.
    pub fn put(&mut self, name: impl Into<String>, value: impl Into<ClaimValue>) -> Option<ClaimValue> {
        let name = name.into();
        match value.into() {
            ClaimValue::Null => self.claims.shift_remove(&name),
            value => self.claims.insert(name, value),
        }
    }

    /// Removes a claim, preserving the order of the remaining ones
    pub fn remove(&mut self, name: &str) -> Option<ClaimValue> {
        self.claims.shift_remove(name)
    }

    /// Copies every entry of `claims` into this map, dropping nulls
    pub fn put_all<K, V, I>(&mut self, claims: I)
    where
        K: Into<String>,
        V: Into<ClaimValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (name, value) in claims {
            self.put(name, value);
        }
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.claims.contains_key(name)
    }

    pub fn contains_value(&self, value: &ClaimValue) -> bool {
        self.claims.values().any(|v| v == value)
    }

    pub fn clear(&mut self) {
        self.claims.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.claims.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &ClaimValue> {
        self.claims.values()
    }

    /// Iterates claims in insertion order
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, ClaimValue> {
        self.claims.iter()
    }

    /// Stores `date` as NumericDate seconds using the legacy adapter directly
    ///
    /// `None` removes the claim. Returns the previous value.
    pub fn set_date_as_seconds(&mut self, name: &str, date: Option<SystemTime>) -> Option<ClaimValue> {
        match date {
            None => self.remove(name),
            Some(date) => {
                let seconds = LegacyDateAdapter::instance().seconds_of(date);
                self.put(name, seconds)
            }
        }
    }

    /// Stores `date` as NumericDate seconds using the first matching setter
    ///
    /// `None` removes the claim. Returns the previous value.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::UnsupportedTemporalType`] if no registered setter
    /// accepts `D`.
    pub fn set_date_via_setter<D: Any>(
        &mut self,
        name: &str,
        date: Option<&D>,
    ) -> Result<Option<ClaimValue>, ClaimError> {
        let Some(date) = date else {
            return Ok(self.remove(name));
        };

        let date_type = DateType::of::<D>();
        let setter = self
            .registry
            .find_setter(&date_type)
            .ok_or_else(|| ClaimError::unsupported(date_type.name(), DateOperation::Set))?;
        let seconds = setter.date_as_seconds(date)?;
        Ok(self.put(name, seconds))
    }

    /// Reads a NumericDate claim back as a `D` using the first matching getter
    ///
    /// # Errors
    ///
    /// - [`ClaimError::MalformedClaim`] if the stored value is not numeric
    /// - [`ClaimError::UnsupportedTemporalType`] if no registered getter generates `D`
    /// - [`ClaimError::InvalidArgument`] if the getter breaks its contract
    pub fn get_date_via_getter<D: Any>(&self, name: &str) -> Result<Option<D>, ClaimError> {
        let Some(value) = self.get(name) else {
            return Ok(None);
        };
        let seconds = value.as_i64().ok_or_else(|| {
            ClaimError::malformed(name, format!("expected NumericDate seconds, found '{value}'"))
        })?;

        let date_type = DateType::of::<D>();
        let getter = self
            .registry
            .find_getter(&date_type)
            .ok_or_else(|| ClaimError::unsupported(date_type.name(), DateOperation::Get))?;

        getter
            .seconds_as_date(seconds, &date_type)?
            .downcast::<D>()
            .map(|date| Some(*date))
            .map_err(|_| {
                ClaimError::invalid_argument(format!(
                    "{getter:?} did not produce a {date_type} for '{name}'"
                ))
            })
    }

    /// Permissive date coercion; numbers are milliseconds
    ///
    /// Absent and `Null` values give `Ok(None)`. Opaque `SystemTime` values
    /// pass through, opaque `DateTime<Local>` values yield their instant,
    /// strings are parsed as strict ISO-8601.
    ///
    /// # Errors
    ///
    /// [`ClaimError::MalformedClaim`] for unparsable strings or out-of-range
    /// numbers, [`ClaimError::InvalidState`] for any other kind of value.
    pub fn to_date(value: Option<&ClaimValue>, name: &str) -> Result<Option<SystemTime>, ClaimError> {
        coerce::to_date(value, name)
    }

    /// NumericDate coercion; numbers and integer strings are seconds
    ///
    /// Strings that are not bare integers fall back to ISO-8601 parsing.
    ///
    /// # Errors
    ///
    /// Same as [`ClaimMap::to_date`].
    pub fn to_spec_date(
        value: Option<&ClaimValue>,
        name: &str,
    ) -> Result<Option<SystemTime>, ClaimError> {
        coerce::to_spec_date(value, name)
    }
}

impl PartialEq for ClaimMap {
    fn eq(&self, other: &Self) -> bool {
        self.claims == other.claims
    }
}

impl fmt::Debug for ClaimMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.claims.iter()).finish()
    }
}

impl fmt::Display for ClaimMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        value::write_entries(f, self.claims.iter())
    }
}

impl<K: Into<String>, V: Into<ClaimValue>> FromIterator<(K, V)> for ClaimMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ClaimMap::new();
        map.put_all(iter);
        map
    }
}

impl<K: Into<String>, V: Into<ClaimValue>> Extend<(K, V)> for ClaimMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.put_all(iter);
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for ClaimMap {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a ClaimMap {
    type Item = (&'a String, &'a ClaimValue);
    type IntoIter = indexmap::map::Iter<'a, String, ClaimValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.claims.iter()
    }
}

impl Serialize for ClaimMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.claims.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ClaimMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        IndexMap::<String, ClaimValue>::deserialize(deserializer)
            .map(|claims| claims.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_put_null_removes() {
        let mut claims = ClaimMap::new();
        claims.put("sub", "joe");
        let previous = claims.put("sub", ClaimValue::Null);
        assert_eq!(previous, Some(ClaimValue::from("joe")));
        assert!(!claims.contains_key("sub"));
        assert!(claims.is_empty());
    }

    #[test]
    fn test_put_all_drops_nulls() {
        let mut claims = ClaimMap::new();
        claims.put_all([("a", ClaimValue::Null), ("b", ClaimValue::from(1))]);
        assert_eq!(claims.len(), 1);
        assert!(!claims.contains_key("a"));
        assert!(claims.contains_key("b"));
    }

    #[test]
    fn test_insertion_order_preserved_after_remove() {
        let mut claims: ClaimMap = [("iss", "a"), ("sub", "b"), ("aud", "c")].into_iter().collect();
        claims.remove("sub");
        claims.put("jti", "d");
        assert_eq!(claims.keys().collect::<Vec<_>>(), vec!["iss", "aud", "jti"]);
    }

    #[test]
    fn test_get_string_renders_values() {
        let mut claims = ClaimMap::new();
        claims.put("n", 42);
        claims.put("s", "text");
        assert_eq!(claims.get_string("n").as_deref(), Some("42"));
        assert_eq!(claims.get_string("s").as_deref(), Some("text"));
        assert_eq!(claims.get_string("missing"), None);
    }

    #[test]
    fn test_set_date_as_seconds() {
        let mut claims = ClaimMap::new();
        let date = UNIX_EPOCH + Duration::from_millis(1_516_239_022_750);
        claims.set_date_as_seconds("iat", Some(date));
        assert_eq!(claims.get("iat").and_then(ClaimValue::as_i64), Some(1_516_239_022));

        claims.set_date_as_seconds("iat", None);
        assert!(!claims.contains_key("iat"));
    }

    #[test]
    fn test_set_and_get_via_adapters() {
        let mut claims = ClaimMap::new();
        let date = UNIX_EPOCH + Duration::from_secs(1_516_239_022);
        claims.set_date_via_setter("exp", Some(&date)).unwrap();
        assert_eq!(claims.get("exp").and_then(ClaimValue::as_i64), Some(1_516_239_022));
        assert_eq!(claims.get_date_via_getter::<SystemTime>("exp").unwrap(), Some(date));
    }

    #[test]
    fn test_set_via_setter_none_removes() {
        let mut claims = ClaimMap::new();
        claims.put("exp", 1);
        claims.set_date_via_setter::<SystemTime>("exp", None).unwrap();
        assert!(!claims.contains_key("exp"));
    }

    #[test]
    fn test_unsupported_setter_type() {
        let mut claims = ClaimMap::new();
        let result = claims.set_date_via_setter("exp", Some(&std::time::Instant::now()));
        assert!(matches!(
            result,
            Err(ClaimError::UnsupportedTemporalType { operation: DateOperation::Set, .. })
        ));
        assert!(!claims.contains_key("exp"));
    }

    #[test]
    fn test_getter_absent_claim_is_none() {
        let claims = ClaimMap::new();
        assert_eq!(claims.get_date_via_getter::<SystemTime>("exp").unwrap(), None);
    }

    #[test]
    fn test_getter_non_numeric_is_malformed() {
        let mut claims = ClaimMap::new();
        claims.put("exp", "tomorrow");
        let error = claims.get_date_via_getter::<SystemTime>("exp").unwrap_err();
        assert!(matches!(error, ClaimError::MalformedClaim { .. }));
        assert_eq!(error.claim_name(), Some("exp"));
    }

    #[test]
    fn test_getter_unsupported_type() {
        let mut claims = ClaimMap::new();
        claims.put("exp", 1);
        assert!(matches!(
            claims.get_date_via_getter::<std::time::Instant>("exp"),
            Err(ClaimError::UnsupportedTemporalType { operation: DateOperation::Get, .. })
        ));
    }

    #[test]
    fn test_isolated_registry() {
        let mut claims = ClaimMap::with_registry(Arc::new(DateAdapterRegistry::empty()));
        let result = claims.set_date_via_setter("exp", Some(&SystemTime::now()));
        assert!(matches!(result, Err(ClaimError::UnsupportedTemporalType { .. })));
    }

    #[test]
    fn test_from_json_map_drops_nulls() {
        let json = json!({"iss": "joe", "nbf": null, "exp": 1300819380});
        let serde_json::Value::Object(map) = json else {
            unreachable!()
        };
        let claims = ClaimMap::from(map);
        assert_eq!(claims.keys().collect::<Vec<_>>(), vec!["iss", "exp"]);
    }

    #[test]
    fn test_serde_round_trip() {
        let claims: ClaimMap =
            serde_json::from_str(r#"{"iss":"joe","exp":1300819380,"x":null}"#).unwrap();
        assert_eq!(claims.len(), 2);
        assert_eq!(
            serde_json::to_string(&claims).unwrap(),
            r#"{"iss":"joe","exp":1300819380}"#
        );
    }

    #[test]
    fn test_display_and_equality() {
        let a: ClaimMap = [("iss", ClaimValue::from("joe")), ("exp", ClaimValue::from(1))]
            .into_iter()
            .collect();
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "{iss=joe, exp=1}");
        assert!(a.contains_value(&ClaimValue::from("joe")));
    }
}
