//! Application converters plus the built-in store converters.
//!
//! Simple types are the types the store layer knows how to handle after at
//! most one more internal conversion: the native types plus the narrower
//! numeric types, `char`, byte vectors, UTC date-times and UUIDs. A converter
//! whose target is a simple type is a writing converter; its target becomes
//! the first-step target for its source type.

use crate::conversion_service::{converter, ConversionService, Converter};
use chrono::{DateTime, Utc};
use datastore_types::{native_types, TypeKey};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct CustomConversions {
    converters: Vec<Arc<dyn Converter>>,
    store_converters: Vec<Arc<dyn Converter>>,
    simple_types: HashSet<TypeKey>,
}

impl CustomConversions {
    /// Registry with the given application converters.
    pub fn new(converters: Vec<Arc<dyn Converter>>) -> Self {
        let mut simple_types: HashSet<TypeKey> = native_types().iter().copied().collect();
        simple_types.extend([
            TypeKey::of::<i8>(),
            TypeKey::of::<i16>(),
            TypeKey::of::<i32>(),
            TypeKey::of::<u8>(),
            TypeKey::of::<u16>(),
            TypeKey::of::<u32>(),
            TypeKey::of::<u64>(),
            TypeKey::of::<f32>(),
            TypeKey::of::<char>(),
            TypeKey::of::<Vec<u8>>(),
            TypeKey::of::<DateTime<Utc>>(),
            TypeKey::of::<Uuid>(),
        ]);

        Self {
            converters,
            store_converters: store_converters(),
            simple_types,
        }
    }

    pub fn is_simple_type(&self, type_key: TypeKey) -> bool {
        self.simple_types.contains(&type_key)
    }

    /// Application converters, in registration order.
    pub fn converters(&self) -> &[Arc<dyn Converter>] {
        &self.converters
    }

    /// Target of the first writing converter for `source`. Application
    /// converters take precedence over store converters.
    pub fn get_custom_write_target(&self, source: TypeKey) -> Option<TypeKey> {
        self.converters
            .iter()
            .chain(&self.store_converters)
            .filter(|c| c.source_type() == source && c.target_type() != source)
            .map(|c| c.target_type())
            .find(|target| self.is_simple_type(*target))
    }

    pub fn has_custom_write_target(&self, source: TypeKey) -> bool {
        self.get_custom_write_target(source).is_some()
    }

    /// Register store converters, then application converters, into `service`.
    pub fn register_converters_in(&self, service: &mut ConversionService) {
        for c in self.store_converters.iter().chain(&self.converters) {
            service.add_converter(Arc::clone(c));
        }
    }
}

impl Default for CustomConversions {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

macro_rules! widen_to {
    ($wide:ty; $($narrow:ty),*) => {
        vec![
            $(
                converter(|v: &$narrow| Some(<$wide>::from(*v))),
                converter(|v: &$wide| <$narrow>::try_from(*v).ok()),
            )*
        ]
    };
}

fn store_converters() -> Vec<Arc<dyn Converter>> {
    let mut converters = widen_to!(i64; i8, i16, i32, u8, u16, u32);
    converters.push(converter(|v: &f32| Some(f64::from(*v))));
    converters.push(converter(|v: &f64| Some(*v as f32)));
    converters
}
