//! Read path: native values to application values.

use super::{convert_with, TwoStepsConversions};
use crate::error::{DataError, Result};
use crate::mapping::EmbeddedType;
use crate::type_info::{CollectionKind, TypeInfo};
use crate::value::PropertyValue;
use datastore_types::{is_native_type, unwrap_value, Object, TypeKey, Value};

impl TwoStepsConversions {
    /// Read `value` as `target`, or as a collection of `target` when a
    /// collection kind is requested and the value is a list.
    pub(super) fn read_value(
        &self,
        value: &Value,
        embedded_type: EmbeddedType,
        target_collection: Option<CollectionKind>,
        target: &TypeInfo,
    ) -> Result<PropertyValue> {
        if value.is_null() {
            return Ok(PropertyValue::Null);
        }
        match (target_collection, value.as_list()) {
            (Some(kind), Some(elements)) => {
                let items = elements
                    .iter()
                    .map(|element| self.read_element(element, embedded_type, target))
                    .collect::<Result<Vec<_>>>()
                    .map_err(|e| DataError::CollectionElements(Box::new(e)))?;
                Ok(self.convert_collection(items, kind))
            }
            _ => self.read_element(value, embedded_type, target),
        }
    }

    fn read_element(
        &self,
        value: &Value,
        embedded_type: EmbeddedType,
        target: &TypeInfo,
    ) -> Result<PropertyValue> {
        if value.is_null() {
            return Ok(PropertyValue::Null);
        }
        match embedded_type {
            EmbeddedType::NotEmbedded => {
                let target = scalar_target(target)?;
                Ok(self
                    .read_single_value(value, target)?
                    .map_or(PropertyValue::Null, PropertyValue::Scalar))
            }
            EmbeddedType::EmbeddedEntity => {
                let entity = value.as_entity().ok_or_else(|| {
                    DataError::EmbeddedEntityExpected(value.value_type().to_string())
                })?;
                let target = scalar_target(target)?;
                let object = self.entity_converter()?.read(target, entity)?;
                Ok(PropertyValue::Scalar(object))
            }
            EmbeddedType::EmbeddedMap => {
                let entity = value
                    .as_entity()
                    .ok_or_else(|| DataError::EmbeddedMapExpected(value.value_type().to_string()))?;
                self.entity_converter()?.read_as_map(entity, target)
            }
        }
    }

    /// Read a single native value as `target`, undoing whatever steps a
    /// write of `target` would have applied. `None` for the null value.
    pub(super) fn read_single_value(
        &self,
        value: &Value,
        target: TypeKey,
    ) -> Result<Option<Box<dyn Object>>> {
        let Some(unwrapped) = unwrap_value(value) else {
            return Ok(None);
        };
        let source = unwrapped.type_key();
        let targets = self.compute_type_targets(target);

        let converted = match (targets.first_step_target(), targets.second_step_target()) {
            (None, None) if source == target => Ok(unwrapped),
            (None, Some(_)) => {
                convert_with(&self.internal_conversion_service, unwrapped.as_ref(), target)
            }
            (Some(_), None) => convert_with(&self.conversion_service, unwrapped.as_ref(), target),
            (Some(first), Some(_)) => {
                convert_with(&self.internal_conversion_service, unwrapped.as_ref(), first)
                    .and_then(|simple| {
                        convert_with(&self.conversion_service, simple.as_ref(), target)
                    })
            }
            _ if is_native_type(source) && self.conversion_service.can_convert(source, target) => {
                convert_with(&self.conversion_service, unwrapped.as_ref(), target)
            }
            _ if is_native_type(source)
                && self.internal_conversion_service.can_convert(source, target) =>
            {
                convert_with(&self.internal_conversion_service, unwrapped.as_ref(), target)
            }
            _ => Err(DataError::unconvertible(source.name(), target.name())),
        };

        converted.map(Some).map_err(|e| {
            tracing::debug!("Read of {} as {} failed: {}", source, target, e);
            DataError::unconvertible(source.name(), target.name())
        })
    }
}

fn scalar_target(target: &TypeInfo) -> Result<TypeKey> {
    target.type_key().ok_or_else(|| DataError::UnexpectedValue {
        expected: "single value type".to_string(),
        found: target.to_string(),
    })
}
