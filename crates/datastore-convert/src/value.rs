//! Application-side property values.

use crate::error::{DataError, Result};
use crate::type_info::CollectionKind;
use datastore_types::Object;
use std::any::Any;

/// Value of a mapped property as seen by the application.
///
/// Scalars are erased objects; collections and maps nest freely. Sets keep
/// insertion order but hold no duplicates. Map entries keep insertion order.
#[derive(Debug)]
pub enum PropertyValue {
    Null,
    Scalar(Box<dyn Object>),
    Array(Vec<PropertyValue>),
    List(Vec<PropertyValue>),
    Set(Vec<PropertyValue>),
    Map(Vec<(PropertyValue, PropertyValue)>),
}

impl PropertyValue {
    pub fn scalar<T: Object>(value: T) -> Self {
        PropertyValue::Scalar(Box::new(value))
    }

    /// `Null` for `None`, a scalar otherwise.
    pub fn from_option<T: Object>(value: Option<T>) -> Self {
        value.map_or(PropertyValue::Null, Self::scalar)
    }

    pub fn list<T: Object>(values: impl IntoIterator<Item = T>) -> Self {
        PropertyValue::List(values.into_iter().map(Self::scalar).collect())
    }

    pub fn array<T: Object>(values: impl IntoIterator<Item = T>) -> Self {
        PropertyValue::Array(values.into_iter().map(Self::scalar).collect())
    }

    pub fn set<T: Object>(values: impl IntoIterator<Item = T>) -> Self {
        Self::collection(
            CollectionKind::Set,
            values.into_iter().map(Self::scalar).collect(),
        )
    }

    pub fn map<K: Object, V: Object>(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        PropertyValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (Self::scalar(k), Self::scalar(v)))
                .collect(),
        )
    }

    /// Collection of the given kind. Duplicate elements are dropped for sets.
    pub fn collection(kind: CollectionKind, elements: Vec<PropertyValue>) -> Self {
        match kind {
            CollectionKind::Array => PropertyValue::Array(elements),
            CollectionKind::List => PropertyValue::List(elements),
            CollectionKind::Set => {
                let mut unique: Vec<PropertyValue> = Vec::with_capacity(elements.len());
                for element in elements {
                    if !unique.contains(&element) {
                        unique.push(element);
                    }
                }
                PropertyValue::Set(unique)
            }
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    /// Elements of an array, list or set.
    pub fn elements(&self) -> Option<&[PropertyValue]> {
        match self {
            PropertyValue::Array(v) | PropertyValue::List(v) | PropertyValue::Set(v) => Some(v),
            _ => None,
        }
    }

    pub fn collection_kind(&self) -> Option<CollectionKind> {
        match self {
            PropertyValue::Array(_) => Some(CollectionKind::Array),
            PropertyValue::List(_) => Some(CollectionKind::List),
            PropertyValue::Set(_) => Some(CollectionKind::Set),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&dyn Object> {
        match self {
            PropertyValue::Scalar(object) => Some(object.as_ref()),
            _ => None,
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_scalar().and_then(|object| object.downcast_ref::<T>())
    }

    pub fn into_scalar(self) -> Option<Box<dyn Object>> {
        match self {
            PropertyValue::Scalar(object) => Some(object),
            _ => None,
        }
    }

    /// Human-readable name of the runtime shape, used in errors.
    pub fn type_name(&self) -> String {
        match self {
            PropertyValue::Null => "null".to_string(),
            PropertyValue::Scalar(object) => object.type_name().to_string(),
            PropertyValue::Array(_) => "Array".to_string(),
            PropertyValue::List(_) => "List".to_string(),
            PropertyValue::Set(_) => "Set".to_string(),
            PropertyValue::Map(_) => "Map".to_string(),
        }
    }

    /// Typed scalar, `None` for null.
    pub fn into_option<T: Any>(self) -> Result<Option<T>> {
        match self {
            PropertyValue::Null => Ok(None),
            PropertyValue::Scalar(object) => object.downcast::<T>().map(Some).map_err(|object| {
                DataError::UnexpectedValue {
                    expected: std::any::type_name::<T>().to_string(),
                    found: object.type_name().to_string(),
                }
            }),
            other => Err(DataError::UnexpectedValue {
                expected: std::any::type_name::<T>().to_string(),
                found: other.type_name(),
            }),
        }
    }

    /// Typed elements of a collection. Null yields an empty vector; null
    /// elements are rejected.
    pub fn into_vec<T: Any>(self) -> Result<Vec<T>> {
        match self {
            PropertyValue::Null => Ok(Vec::new()),
            PropertyValue::Array(elements)
            | PropertyValue::List(elements)
            | PropertyValue::Set(elements) => elements
                .into_iter()
                .map(|element| {
                    element
                        .into_option::<T>()?
                        .ok_or_else(|| DataError::UnexpectedValue {
                            expected: std::any::type_name::<T>().to_string(),
                            found: "null".to_string(),
                        })
                })
                .collect(),
            other => Err(DataError::UnexpectedValue {
                expected: format!("collection of {}", std::any::type_name::<T>()),
                found: other.type_name(),
            }),
        }
    }

    /// Typed entries of a map. Null yields no entries; null values are skipped.
    pub fn into_entries<K: Any, V: Any>(self) -> Result<Vec<(K, V)>> {
        match self {
            PropertyValue::Null => Ok(Vec::new()),
            PropertyValue::Map(entries) => {
                let mut typed = Vec::with_capacity(entries.len());
                for (key, value) in entries {
                    let key = key.into_option::<K>()?.ok_or_else(|| DataError::UnexpectedValue {
                        expected: std::any::type_name::<K>().to_string(),
                        found: "null".to_string(),
                    })?;
                    if let Some(value) = value.into_option::<V>()? {
                        typed.push((key, value));
                    }
                }
                Ok(typed)
            }
            other => Err(DataError::UnexpectedValue {
                expected: "Map".to_string(),
                found: other.type_name(),
            }),
        }
    }
}

impl Clone for PropertyValue {
    fn clone(&self) -> Self {
        match self {
            PropertyValue::Null => PropertyValue::Null,
            PropertyValue::Scalar(object) => PropertyValue::Scalar(object.clone_object()),
            PropertyValue::Array(v) => PropertyValue::Array(v.clone()),
            PropertyValue::List(v) => PropertyValue::List(v.clone()),
            PropertyValue::Set(v) => PropertyValue::Set(v.clone()),
            PropertyValue::Map(entries) => PropertyValue::Map(entries.clone()),
        }
    }
}

impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropertyValue::Null, PropertyValue::Null) => true,
            (PropertyValue::Scalar(a), PropertyValue::Scalar(b)) => a.eq_object(b.as_ref()),
            (PropertyValue::Array(a), PropertyValue::Array(b))
            | (PropertyValue::List(a), PropertyValue::List(b)) => a == b,
            (PropertyValue::Set(a), PropertyValue::Set(b)) => {
                a.len() == b.len() && a.iter().all(|x| b.contains(x))
            }
            (PropertyValue::Map(a), PropertyValue::Map(b)) => {
                a.len() == b.len() && a.iter().all(|entry| b.contains(entry))
            }
            _ => false,
        }
    }
}

impl From<Box<dyn Object>> for PropertyValue {
    fn from(object: Box<dyn Object>) -> Self {
        PropertyValue::Scalar(object)
    }
}
