//! The closed set of store-native types.
//!
//! A value whose runtime type is in this set can be wrapped into a [`Value`]
//! without any conversion. Membership is an O(1) set lookup; the ordered
//! list drives the compatible-type scan in the conversion engine.

use crate::entity::{FullEntity, Key};
use crate::object::{Object, TypeKey};
use crate::value::{Blob, LatLng, Timestamp, Value, ValueData};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Error type for native value wrapping.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueError {
    /// Runtime type has no native representation
    #[error("Unable to convert {0} to Datastore supported type.")]
    Unsupported(&'static str),
}

static NATIVE_TYPES: OnceLock<Vec<TypeKey>> = OnceLock::new();
static NATIVE_TYPE_SET: OnceLock<HashSet<TypeKey>> = OnceLock::new();

/// Native types, in scan order.
pub fn native_types() -> &'static [TypeKey] {
    NATIVE_TYPES.get_or_init(|| {
        vec![
            TypeKey::of::<bool>(),
            TypeKey::of::<i64>(),
            TypeKey::of::<f64>(),
            TypeKey::of::<LatLng>(),
            TypeKey::of::<Timestamp>(),
            TypeKey::of::<String>(),
            TypeKey::of::<Blob>(),
            TypeKey::of::<Key>(),
            TypeKey::of::<FullEntity>(),
            TypeKey::of::<Vec<Value>>(),
        ]
    })
}

pub fn is_native_type(type_key: TypeKey) -> bool {
    NATIVE_TYPE_SET
        .get_or_init(|| native_types().iter().copied().collect())
        .contains(&type_key)
}

/// Wrap a native-typed value (or null) into its tagged [`Value`].
pub fn wrap_value(value: Option<&dyn Object>) -> Result<Value, ValueError> {
    let Some(value) = value else {
        return Ok(Value::null());
    };

    macro_rules! wrap_as {
        ($($ty:ty),* $(,)?) => {
            $(
                if let Some(v) = value.downcast_ref::<$ty>() {
                    return Ok(Value::from(v.clone()));
                }
            )*
        };
    }

    wrap_as!(bool, i64, f64, LatLng, Timestamp, String, Blob, Key, FullEntity, Vec<Value>);

    Err(ValueError::Unsupported(value.type_name()))
}

/// Payload of a native value as an erased object. Null yields `None`.
pub fn unwrap_value(value: &Value) -> Option<Box<dyn Object>> {
    let object: Box<dyn Object> = match value.data() {
        ValueData::Null => return None,
        ValueData::Boolean(b) => Box::new(*b),
        ValueData::Long(l) => Box::new(*l),
        ValueData::Double(d) => Box::new(*d),
        ValueData::String(s) => Box::new(s.clone()),
        ValueData::Blob(b) => Box::new(b.clone()),
        ValueData::Timestamp(t) => Box::new(*t),
        ValueData::LatLng(p) => Box::new(*p),
        ValueData::Key(k) => Box::new(k.clone()),
        ValueData::Entity(e) => Box::new(e.clone()),
        ValueData::List(values) => Box::new(values.clone()),
    };
    Some(object)
}
