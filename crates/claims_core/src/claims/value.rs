//! Claim values

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use indexmap::IndexMap;
use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Number;

/// Object-safe view of an arbitrary host value stored in a claim
pub trait OpaqueClaim: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn type_name(&self) -> &'static str;
}

impl<T: Any + fmt::Debug + Send + Sync> OpaqueClaim for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// A host value carried verbatim in a claim map
///
/// Opaque values have no wire form; they exist so callers can hand a
/// `SystemTime` (or anything else) to the map and have the coercion rules
/// deal with it later. Equality is identity.
#[derive(Clone)]
pub struct OpaqueValue(Arc<dyn OpaqueClaim>);

impl OpaqueValue {
    pub fn new<T: Any + fmt::Debug + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Returns the wrapped value if it is a `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.0).as_any().downcast_ref::<T>()
    }

    /// Returns true if the wrapped value is a `T`
    pub fn is<T: Any>(&self) -> bool {
        (*self.0).as_any().is::<T>()
    }

    /// Returns the type name of the wrapped value
    pub fn type_name(&self) -> &'static str {
        // Deref first: Arc<dyn OpaqueClaim> is itself an OpaqueClaim
        (*self.0).type_name()
    }
}

impl PartialEq for OpaqueValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::as_ptr(&self.0) as *const () == Arc::as_ptr(&other.0) as *const ()
    }
}

impl fmt::Debug for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// A single claim value
///
/// Mirrors the JSON data model, plus [`ClaimValue::Object`] for host values
/// that have not been converted yet. `Null` only ever appears nested inside
/// arrays or maps: putting `Null` at the top level of a
/// [`ClaimMap`](super::ClaimMap) removes the claim instead.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ClaimValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<ClaimValue>),
    Map(IndexMap<String, ClaimValue>),
    Object(OpaqueValue),
}

impl ClaimValue {
    /// Wraps an arbitrary host value
    pub fn object<T: Any + fmt::Debug + Send + Sync>(value: T) -> Self {
        ClaimValue::Object(OpaqueValue::new(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ClaimValue::Null)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, ClaimValue::Number(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ClaimValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ClaimValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns a numeric value as a whole `i64`
    ///
    /// Floats truncate toward zero and saturate at the `i64` bounds.
    /// Integers above `i64::MAX` give `None` rather than wrapping negative.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ClaimValue::Number(n) => number_as_i64(n),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&OpaqueValue> {
        match self {
            ClaimValue::Object(o) => Some(o),
            _ => None,
        }
    }
}

pub(crate) fn number_as_i64(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        Some(i)
    } else if n.is_u64() {
        None
    } else {
        n.as_f64().map(|f| f as i64)
    }
}

impl fmt::Display for ClaimValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimValue::Null => f.write_str("null"),
            ClaimValue::Bool(b) => write!(f, "{b}"),
            ClaimValue::Number(n) => write!(f, "{n}"),
            ClaimValue::String(s) => f.write_str(s),
            ClaimValue::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            ClaimValue::Map(entries) => write_entries(f, entries.iter()),
            ClaimValue::Object(o) => write!(f, "{o:?}"),
        }
    }
}

pub(crate) fn write_entries<'a>(
    f: &mut fmt::Formatter<'_>,
    entries: impl Iterator<Item = (&'a String, &'a ClaimValue)>,
) -> fmt::Result {
    f.write_str("{")?;
    for (i, (key, value)) in entries.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{key}={value}")?;
    }
    f.write_str("}")
}

impl Serialize for ClaimValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ClaimValue::Null => serializer.serialize_unit(),
            ClaimValue::Bool(b) => serializer.serialize_bool(*b),
            ClaimValue::Number(n) => n.serialize(serializer),
            ClaimValue::String(s) => serializer.serialize_str(s),
            ClaimValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ClaimValue::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            ClaimValue::Object(o) => Err(S::Error::custom(format!(
                "opaque claim value of type {} has no wire representation",
                o.type_name()
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for ClaimValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(ClaimValue::from)
    }
}

impl From<serde_json::Value> for ClaimValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => ClaimValue::Null,
            Value::Bool(b) => ClaimValue::Bool(b),
            Value::Number(n) => ClaimValue::Number(n),
            Value::String(s) => ClaimValue::String(s),
            Value::Array(items) => ClaimValue::Array(items.into_iter().map(Into::into).collect()),
            Value::Object(entries) => ClaimValue::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, value.into()))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for ClaimValue {
    fn from(value: &str) -> Self {
        ClaimValue::String(value.to_string())
    }
}

impl From<String> for ClaimValue {
    fn from(value: String) -> Self {
        ClaimValue::String(value)
    }
}

impl From<bool> for ClaimValue {
    fn from(value: bool) -> Self {
        ClaimValue::Bool(value)
    }
}

impl From<Number> for ClaimValue {
    fn from(value: Number) -> Self {
        ClaimValue::Number(value)
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ClaimValue {
                fn from(value: $ty) -> Self {
                    ClaimValue::Number(Number::from(value))
                }
            }
        )*
    };
}

from_integer!(i32, i64, u32, u64);

impl From<Vec<ClaimValue>> for ClaimValue {
    fn from(value: Vec<ClaimValue>) -> Self {
        ClaimValue::Array(value)
    }
}

impl From<IndexMap<String, ClaimValue>> for ClaimValue {
    fn from(value: IndexMap<String, ClaimValue>) -> Self {
        ClaimValue::Map(value)
    }
}

impl From<SystemTime> for ClaimValue {
    fn from(value: SystemTime) -> Self {
        ClaimValue::object(value)
    }
}

impl From<OpaqueValue> for ClaimValue {
    fn from(value: OpaqueValue) -> Self {
        ClaimValue::Object(value)
    }
}

impl<T: Into<ClaimValue>> From<Option<T>> for ClaimValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_preserves_structure() {
        let value = ClaimValue::from(json!({"roles": ["admin", null], "n": 3}));
        let ClaimValue::Map(entries) = &value else {
            panic!("expected map, got {value:?}");
        };
        assert_eq!(entries.keys().collect::<Vec<_>>(), vec!["roles", "n"]);
        assert_eq!(
            entries["roles"],
            ClaimValue::Array(vec!["admin".into(), ClaimValue::Null])
        );
        assert_eq!(entries["n"].as_i64(), Some(3));
    }

    #[test]
    fn test_as_i64_truncates_and_rejects_unsigned_overflow() {
        assert_eq!(ClaimValue::from(42i64).as_i64(), Some(42));
        assert_eq!(ClaimValue::from(json!(1.9)).as_i64(), Some(1));
        assert_eq!(ClaimValue::from(json!(-1.9)).as_i64(), Some(-1));
        assert_eq!(ClaimValue::from(i64::MAX as u64).as_i64(), Some(i64::MAX));
        assert_eq!(ClaimValue::from(u64::MAX).as_i64(), None);
        assert_eq!(ClaimValue::from("42").as_i64(), None);
    }

    #[test]
    fn test_display() {
        let value = ClaimValue::from(json!({"a": [1, true], "b": "x"}));
        assert_eq!(value.to_string(), "{a=[1, true], b=x}");
    }

    #[test]
    fn test_serialize_round_trips_json() {
        let original = json!({"iss": "joe", "exp": 1300819380, "aud": ["a", "b"]});
        let value = ClaimValue::from(original.clone());
        assert_eq!(serde_json::to_value(&value).unwrap(), original);

        let parsed: ClaimValue = serde_json::from_value(original).unwrap();
        assert_eq!(parsed, value);
    }

    #[test]
    fn test_opaque_values_do_not_serialize() {
        let value = ClaimValue::from(SystemTime::UNIX_EPOCH);
        assert!(serde_json::to_string(&value).is_err());
    }

    #[test]
    fn test_opaque_equality_is_identity() {
        let a = OpaqueValue::new(SystemTime::UNIX_EPOCH);
        let b = OpaqueValue::new(SystemTime::UNIX_EPOCH);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert!(a.is::<SystemTime>());
        assert_eq!(a.downcast_ref::<SystemTime>(), Some(&SystemTime::UNIX_EPOCH));
        assert!(a.type_name().ends_with("SystemTime"));
    }

    #[test]
    fn test_option_conversion() {
        assert!(ClaimValue::from(None::<String>).is_null());
        assert_eq!(ClaimValue::from(Some("x")), ClaimValue::from("x"));
    }
}
