//! Native Datastore values.
//!
//! [`Value`] is the tagged wrapper the store persists. It pairs a
//! [`ValueData`] payload with the per-value exclude-from-indexes flag.

use crate::entity::{FullEntity, Key};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A geographic point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLng {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// An opaque byte sequence, serialized as base64.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Blob(#[serde(with = "base64_bytes")] Vec<u8>);

impl Blob {
    pub fn copy_from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Blob {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(serde::de::Error::custom)
    }
}

/// A point in time, stored in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Timestamp from microseconds since the Unix epoch.
    pub fn of_micros(micros: i64) -> Option<Self> {
        DateTime::from_timestamp_micros(micros).map(Self)
    }

    pub fn to_micros(&self) -> i64 {
        self.0.timestamp_micros()
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339())
    }
}

/// Payload of a native value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ValueData {
    Null,
    Boolean(bool),
    Long(i64),
    Double(f64),
    String(String),
    Blob(Blob),
    Timestamp(Timestamp),
    LatLng(LatLng),
    Key(Key),
    Entity(FullEntity),
    List(Vec<Value>),
}

/// Tag of a native value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Null,
    Boolean,
    Long,
    Double,
    String,
    Blob,
    Timestamp,
    LatLng,
    Key,
    Entity,
    List,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Null => "NULL",
            ValueType::Boolean => "BOOLEAN",
            ValueType::Long => "LONG",
            ValueType::Double => "DOUBLE",
            ValueType::String => "STRING",
            ValueType::Blob => "BLOB",
            ValueType::Timestamp => "TIMESTAMP",
            ValueType::LatLng => "LAT_LNG",
            ValueType::Key => "KEY",
            ValueType::Entity => "ENTITY",
            ValueType::List => "LIST",
        };
        f.write_str(name)
    }
}

/// A native Datastore value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Value {
    data: ValueData,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    exclude_from_indexes: bool,
}

impl Value {
    pub fn new(data: ValueData) -> Self {
        Self {
            data,
            exclude_from_indexes: false,
        }
    }

    /// The null value.
    pub fn null() -> Self {
        Self::new(ValueData::Null)
    }

    pub fn data(&self) -> &ValueData {
        &self.data
    }

    pub fn into_data(self) -> ValueData {
        self.data
    }

    pub fn value_type(&self) -> ValueType {
        match &self.data {
            ValueData::Null => ValueType::Null,
            ValueData::Boolean(_) => ValueType::Boolean,
            ValueData::Long(_) => ValueType::Long,
            ValueData::Double(_) => ValueType::Double,
            ValueData::String(_) => ValueType::String,
            ValueData::Blob(_) => ValueType::Blob,
            ValueData::Timestamp(_) => ValueType::Timestamp,
            ValueData::LatLng(_) => ValueType::LatLng,
            ValueData::Key(_) => ValueType::Key,
            ValueData::Entity(_) => ValueType::Entity,
            ValueData::List(_) => ValueType::List,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.data, ValueData::Null)
    }

    pub fn exclude_from_indexes(&self) -> bool {
        self.exclude_from_indexes
    }

    /// Copy of this value with the exclude-from-indexes flag set to `exclude`.
    pub fn with_exclude_from_indexes(mut self, exclude: bool) -> Self {
        self.exclude_from_indexes = exclude;
        self
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.data {
            ValueData::Boolean(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self.data {
            ValueData::Long(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self.data {
            ValueData::Double(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.data {
            ValueData::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&Blob> {
        match &self.data {
            ValueData::Blob(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_key(&self) -> Option<&Key> {
        match &self.data {
            ValueData::Key(k) => Some(k),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&FullEntity> {
        match &self.data {
            ValueData::Entity(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match &self.data {
            ValueData::List(values) => Some(values),
            _ => None,
        }
    }
}

impl From<ValueData> for Value {
    fn from(data: ValueData) -> Self {
        Self::new(data)
    }
}

macro_rules! impl_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::new(ValueData::$variant(v))
                }
            }
        )*
    };
}

impl_value_from! {
    bool => Boolean,
    i64 => Long,
    f64 => Double,
    String => String,
    Blob => Blob,
    Timestamp => Timestamp,
    LatLng => LatLng,
    Key => Key,
    FullEntity => Entity,
    Vec<Value> => List,
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::new(ValueData::String(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type_tags() {
        assert_eq!(Value::null().value_type(), ValueType::Null);
        assert_eq!(Value::from(true).value_type(), ValueType::Boolean);
        assert_eq!(Value::from(7i64).value_type(), ValueType::Long);
        assert_eq!(Value::from("x").value_type(), ValueType::String);
        assert_eq!(
            Value::from(vec![Value::from(1i64)]).value_type(),
            ValueType::List
        );
        assert_eq!(ValueType::LatLng.to_string(), "LAT_LNG");
    }

    #[test]
    fn test_exclude_from_indexes_flag() {
        let value = Value::from(1i64);
        assert!(!value.exclude_from_indexes());

        let value = value.with_exclude_from_indexes(true);
        assert!(value.exclude_from_indexes());
        assert_eq!(value.as_long(), Some(1));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::from("abc").as_str(), Some("abc"));
        assert_eq!(Value::from("abc").as_long(), None);
        assert_eq!(Value::from(2.5f64).as_double(), Some(2.5));
        assert!(Value::null().is_null());
        assert_eq!(
            Value::from(Blob::copy_from(&[1, 2])).as_blob().map(Blob::len),
            Some(2)
        );
    }

    #[test]
    fn test_timestamp_micros() {
        let ts = Timestamp::of_micros(1_700_000_000_123_456).unwrap();
        assert_eq!(ts.to_micros(), 1_700_000_000_123_456);
    }

    #[test]
    fn test_blob_serializes_as_base64() {
        let value = Value::from(Blob::copy_from(b"hello"));
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["data"]["type"], "blob");
        assert_eq!(json["data"]["value"], "aGVsbG8=");
        assert!(json.get("exclude_from_indexes").is_none());

        let back: Value = serde_json::from_value(json).unwrap();
        assert_eq!(back, value);
    }
}
