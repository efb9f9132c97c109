//! The two-step conversion engine.
//!
//! Writing takes an application value through at most two hops: a custom
//! converter to a simple type, then an internal converter to a native type.
//! Reading recomputes the hops from the requested target type and undoes
//! them in reverse order.
//!
//! - [`forward`] - application value → native value
//! - [`reverse`] - native value → application value

mod forward;
mod reverse;

use crate::conversion_service::{converter, ConversionService, Converter};
use crate::conversions::ReadWriteConversions;
use crate::custom_conversions::CustomConversions;
use crate::entity_converter::EntityConverter;
use crate::error::{DataError, Result};
use crate::key_factory::ObjectToKeyFactory;
use crate::mapping::{EmbeddedType, MappingContext, PersistentProperty};
use crate::type_info::{CollectionKind, TypeInfo};
use crate::type_targets::{TypeTargets, WriteTargetCache};
use crate::value::PropertyValue;
use chrono::{DateTime, Utc};
use datastore_types::{is_native_type, native_types, Blob, Object, Timestamp, TypeKey, Value};
use std::sync::{Arc, OnceLock, Weak};

/// Engine implementing [`ReadWriteConversions`].
pub struct TwoStepsConversions {
    /// Defaults plus store and application converters
    conversion_service: ConversionService,

    /// Defaults plus the native bridges
    internal_conversion_service: ConversionService,

    custom_conversions: CustomConversions,
    object_to_key_factory: Arc<dyn ObjectToKeyFactory>,
    mapping_context: Arc<MappingContext>,

    /// Memo of `get_datastore_compatible_type`
    write_converters: Arc<WriteTargetCache>,

    entity_converter: OnceLock<Weak<dyn EntityConverter>>,
}

/// Builder for [`TwoStepsConversions`].
pub struct TwoStepsConversionsBuilder {
    custom_conversions: CustomConversions,
    object_to_key_factory: Arc<dyn ObjectToKeyFactory>,
    mapping_context: Arc<MappingContext>,
    internal_converters: Vec<Arc<dyn Converter>>,
    write_converters: Option<Arc<WriteTargetCache>>,
}

impl TwoStepsConversionsBuilder {
    /// Add a converter to the internal (second step) service.
    pub fn internal_converter(mut self, converter: Arc<dyn Converter>) -> Self {
        self.internal_converters.push(converter);
        self
    }

    /// Use `cache` as the write-target memo. A cache must only be shared by
    /// engines with identical internal converters.
    pub fn write_target_cache(mut self, cache: Arc<WriteTargetCache>) -> Self {
        self.write_converters = Some(cache);
        self
    }

    pub fn build(self) -> TwoStepsConversions {
        let mut conversion_service = ConversionService::with_defaults();
        self.custom_conversions
            .register_converters_in(&mut conversion_service);

        let mut internal_conversion_service = ConversionService::with_defaults();
        for c in native_bridges().into_iter().chain(self.internal_converters) {
            internal_conversion_service.add_converter(c);
        }

        TwoStepsConversions {
            conversion_service,
            internal_conversion_service,
            custom_conversions: self.custom_conversions,
            object_to_key_factory: self.object_to_key_factory,
            mapping_context: self.mapping_context,
            write_converters: self.write_converters.unwrap_or_default(),
            entity_converter: OnceLock::new(),
        }
    }
}

fn native_bridges() -> Vec<Arc<dyn Converter>> {
    vec![
        converter(|bytes: &Vec<u8>| Some(Blob::copy_from(bytes))),
        converter(|blob: &Blob| Some(blob.as_bytes().to_vec())),
        converter(|dt: &DateTime<Utc>| Some(Timestamp::from(*dt))),
        converter(|ts: &Timestamp| Some(ts.to_datetime())),
    ]
}

impl TwoStepsConversions {
    pub fn new(
        custom_conversions: CustomConversions,
        object_to_key_factory: Arc<dyn ObjectToKeyFactory>,
        mapping_context: Arc<MappingContext>,
    ) -> Self {
        Self::builder(custom_conversions, object_to_key_factory, mapping_context).build()
    }

    pub fn builder(
        custom_conversions: CustomConversions,
        object_to_key_factory: Arc<dyn ObjectToKeyFactory>,
        mapping_context: Arc<MappingContext>,
    ) -> TwoStepsConversionsBuilder {
        TwoStepsConversionsBuilder {
            custom_conversions,
            object_to_key_factory,
            mapping_context,
            internal_converters: Vec::new(),
            write_converters: None,
        }
    }

    pub fn mapping_context(&self) -> &Arc<MappingContext> {
        &self.mapping_context
    }

    /// Conversion chain for values of type `source`.
    pub fn compute_type_targets(&self, source: TypeKey) -> TypeTargets {
        if is_native_type(source) {
            return TypeTargets::default();
        }
        let first_step_target = self.custom_conversions.get_custom_write_target(source);
        let effective = first_step_target.unwrap_or(source);
        let second_step_target = self.get_custom_write_target(effective);
        TypeTargets::new(first_step_target, second_step_target)
    }

    fn get_custom_write_target(&self, source: TypeKey) -> Option<TypeKey> {
        if is_native_type(source) {
            return None;
        }
        self.write_converters
            .get_or_compute(source, |source| self.get_datastore_compatible_type(source))
    }

    /// Shape read elements into the requested collection.
    fn convert_collection(
        &self,
        elements: Vec<PropertyValue>,
        kind: CollectionKind,
    ) -> PropertyValue {
        PropertyValue::collection(kind, elements)
    }

    fn entity_converter(&self) -> Result<Arc<dyn EntityConverter>> {
        self.entity_converter
            .get()
            .and_then(Weak::upgrade)
            .ok_or(DataError::NoEntityConverter)
    }
}

/// Convert through `service`, treating a declined value as unconvertible.
fn convert_with(
    service: &ConversionService,
    value: &dyn Object,
    target: TypeKey,
) -> Result<Box<dyn Object>> {
    service
        .convert(value, target)?
        .ok_or_else(|| DataError::unconvertible(value.type_name(), target.name()))
}

impl ReadWriteConversions for TwoStepsConversions {
    fn convert_on_read(
        &self,
        value: &Value,
        target_collection: Option<CollectionKind>,
        target_component: TypeKey,
    ) -> Result<PropertyValue> {
        self.read_value(
            value,
            EmbeddedType::NotEmbedded,
            target_collection,
            &TypeInfo::Scalar(target_component),
        )
    }

    fn convert_on_read_typed(
        &self,
        value: &Value,
        embedded_type: EmbeddedType,
        target: &TypeInfo,
    ) -> Result<PropertyValue> {
        match target {
            TypeInfo::Collection { kind, component } => {
                self.read_value(value, embedded_type, Some(*kind), component)
            }
            other => self.read_value(value, embedded_type, None, other),
        }
    }

    fn convert_on_write(
        &self,
        value: &PropertyValue,
        property: &PersistentProperty,
    ) -> Result<Value> {
        self.write_value(
            value,
            property.embedded_type(),
            property.field_name(),
            property.type_info(),
        )
        .map_err(|e| DataError::UnconvertibleValue {
            type_name: value.type_name(),
            field: property.field_name().to_string(),
            source: Box::new(e),
        })
    }

    fn convert_on_write_single(&self, value: Option<&dyn Object>) -> Result<Value> {
        self.write_single_value(value)
    }

    fn get_datastore_compatible_type(&self, input: TypeKey) -> Option<TypeKey> {
        if is_native_type(input) {
            return Some(input);
        }
        native_types().iter().copied().find(|native| {
            self.internal_conversion_service.can_convert(input, *native)
                && self.internal_conversion_service.can_convert(*native, input)
        })
    }

    fn register_entity_converter(&self, converter: Weak<dyn EntityConverter>) -> Result<()> {
        self.entity_converter
            .set(converter)
            .map_err(|_| DataError::EntityConverterAlreadyRegistered)
    }
}

#[cfg(test)]
mod tests;
