//! Converter registry keyed by source and target type.
//!
//! A [`ConversionService`] holds at most one converter per `(source, target)`
//! pair. Registering a converter for a pair that already has one replaces it,
//! which is how application converters override the defaults.

use crate::error::{DataError, Result};
use datastore_types::{Object, TypeKey};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use uuid::Uuid;

/// Converts values of one type into another.
pub trait Converter: Send + Sync {
    fn source_type(&self) -> TypeKey;

    fn target_type(&self) -> TypeKey;

    /// Convert `source`, which must be of [`Converter::source_type`].
    /// `None` means the converter declined the value.
    fn convert(&self, source: &dyn Object) -> Option<Box<dyn Object>>;
}

/// A [`Converter`] backed by a closure.
pub struct FnConverter<S, T, F> {
    f: F,
    _types: PhantomData<fn(&S) -> T>,
}

impl<S, T, F> Converter for FnConverter<S, T, F>
where
    S: Object,
    T: Object,
    F: Fn(&S) -> Option<T> + Send + Sync,
{
    fn source_type(&self) -> TypeKey {
        TypeKey::of::<S>()
    }

    fn target_type(&self) -> TypeKey {
        TypeKey::of::<T>()
    }

    fn convert(&self, source: &dyn Object) -> Option<Box<dyn Object>> {
        let source = source.downcast_ref::<S>()?;
        (self.f)(source).map(|target| Box::new(target) as Box<dyn Object>)
    }
}

/// Build a converter from a closure.
pub fn converter<S, T, F>(f: F) -> Arc<dyn Converter>
where
    S: Object,
    T: Object,
    F: Fn(&S) -> Option<T> + Send + Sync + 'static,
{
    Arc::new(FnConverter {
        f,
        _types: PhantomData,
    })
}

#[derive(Clone, Default)]
pub struct ConversionService {
    converters: HashMap<(TypeKey, TypeKey), Arc<dyn Converter>>,
}

impl ConversionService {
    /// Empty service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Service with the default scalar conversions.
    pub fn with_defaults() -> Self {
        let mut service = Self::new();
        add_default_converters(&mut service);
        service
    }

    pub fn add_converter(&mut self, converter: Arc<dyn Converter>) {
        let pair = (converter.source_type(), converter.target_type());
        tracing::trace!("Registering converter {} -> {}", pair.0, pair.1);
        self.converters.insert(pair, converter);
    }

    pub fn can_convert(&self, source: TypeKey, target: TypeKey) -> bool {
        source == target || self.converters.contains_key(&(source, target))
    }

    /// Convert `value` to `target`. A value that already has the target type
    /// is cloned. `Ok(None)` means the converter declined the value.
    pub fn convert(&self, value: &dyn Object, target: TypeKey) -> Result<Option<Box<dyn Object>>> {
        let source = value.type_key();
        if source == target {
            return Ok(Some(value.clone_object()));
        }
        let converter =
            self.converters
                .get(&(source, target))
                .ok_or_else(|| DataError::ConverterNotFound {
                    source_type: source.name().to_string(),
                    target_type: target.name().to_string(),
                })?;
        Ok(converter.convert(value))
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

impl fmt::Debug for ConversionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionService")
            .field("converters", &self.converters.len())
            .finish()
    }
}

macro_rules! integer_conversions {
    ($service:ident; $($from:ty),*) => {
        $(
            integer_conversions!(@to $service, $from; i8, i16, i32, i64, u8, u16, u32, u64);
            $service.add_converter(converter(|v: &$from| Some(*v as f64)));
            string_conversions!($service; $from);
        )*
    };
    (@to $service:ident, $from:ty; $($to:ty),*) => {
        $(
            if TypeKey::of::<$from>() != TypeKey::of::<$to>() {
                $service.add_converter(converter(|v: &$from| <$to>::try_from(*v).ok()));
            }
        )*
    };
}

macro_rules! string_conversions {
    ($service:ident; $($ty:ty),*) => {
        $(
            $service.add_converter(converter(|s: &String| s.trim().parse::<$ty>().ok()));
            $service.add_converter(converter(|v: &$ty| Some(v.to_string())));
        )*
    };
}

fn add_default_converters(service: &mut ConversionService) {
    integer_conversions!(service; i8, i16, i32, i64, u8, u16, u32, u64);

    service.add_converter(converter(|v: &f32| Some(f64::from(*v))));
    service.add_converter(converter(|v: &f64| Some(*v as f32)));
    string_conversions!(service; f32, f64, Uuid);

    service.add_converter(converter(|s: &String| {
        match s.trim().to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => Some(true),
            "false" | "off" | "no" | "0" => Some(false),
            _ => None,
        }
    }));
    service.add_converter(converter(|b: &bool| Some(b.to_string())));

    service.add_converter(converter(|s: &String| {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }));
    service.add_converter(converter(|c: &char| Some(c.to_string())));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert<T: Object + Clone>(service: &ConversionService, value: &dyn Object) -> Option<T> {
        service
            .convert(value, TypeKey::of::<T>())
            .unwrap()
            .and_then(|converted| converted.downcast_ref::<T>().cloned())
    }

    #[test]
    fn test_integer_conversions_are_range_checked() {
        let service = ConversionService::with_defaults();
        assert_eq!(convert::<i64>(&service, &42i32), Some(42));
        assert_eq!(convert::<i32>(&service, &42i64), Some(42));
        assert_eq!(convert::<u8>(&service, &300i64), None);
        assert_eq!(convert::<u64>(&service, &-1i64), None);
    }

    #[test]
    fn test_string_conversions() {
        let service = ConversionService::with_defaults();
        assert_eq!(convert::<i32>(&service, &"512".to_string()), Some(512));
        assert_eq!(convert::<String>(&service, &3i64), Some("3".to_string()));
        assert_eq!(convert::<bool>(&service, &"yes".to_string()), Some(true));
        assert_eq!(convert::<char>(&service, &"x".to_string()), Some('x'));
        assert_eq!(convert::<char>(&service, &"xy".to_string()), None);
        assert_eq!(convert::<f64>(&service, &"not a number".to_string()), None);
    }

    #[test]
    fn test_same_type_is_cloned() {
        let service = ConversionService::new();
        assert!(service.can_convert(TypeKey::of::<String>(), TypeKey::of::<String>()));
        assert_eq!(
            convert::<String>(&service, &"same".to_string()),
            Some("same".to_string())
        );
    }

    #[test]
    fn test_missing_converter() {
        let service = ConversionService::new();
        assert!(!service.can_convert(TypeKey::of::<i32>(), TypeKey::of::<String>()));
        let result = service.convert(&1i32, TypeKey::of::<String>());
        assert!(matches!(result, Err(DataError::ConverterNotFound { .. })));
    }

    #[test]
    fn test_later_registration_overrides() {
        let mut service = ConversionService::with_defaults();
        service.add_converter(converter(|v: &i64| Some(format!("#{v}"))));
        assert_eq!(convert::<String>(&service, &7i64), Some("#7".to_string()));
    }

    #[test]
    fn test_converter_declines_wrong_source_type() {
        let c = converter(|v: &i32| Some(*v + 1));
        assert!(c.convert(&1i64).is_none());
        assert_eq!(c.source_type(), TypeKey::of::<i32>());
        assert_eq!(c.target_type(), TypeKey::of::<i32>());
    }
}
