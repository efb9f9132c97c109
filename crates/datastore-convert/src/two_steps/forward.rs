//! Write path: application values to native values.

use super::{convert_with, TwoStepsConversions};
use crate::error::{DataError, Result};
use crate::mapping::EmbeddedType;
use crate::type_info::TypeInfo;
use crate::value::PropertyValue;
use datastore_types::{wrap_value, FullEntityBuilder, Object, TypeKey, Value};

impl TwoStepsConversions {
    /// Write a property value of the declared type. Collections become list
    /// values, element by element.
    pub(super) fn write_value(
        &self,
        value: &PropertyValue,
        embedded_type: EmbeddedType,
        field_name: &str,
        type_info: &TypeInfo,
    ) -> Result<Value> {
        let Some(elements) = value.elements() else {
            return self.write_element(value, embedded_type, field_name, type_info);
        };
        let element_type = match type_info {
            TypeInfo::Collection { component, .. } => component.as_ref(),
            other => other,
        };
        let values = elements
            .iter()
            .map(|element| self.write_element(element, embedded_type, field_name, element_type))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::from(values))
    }

    fn write_element(
        &self,
        value: &PropertyValue,
        embedded_type: EmbeddedType,
        field_name: &str,
        type_info: &TypeInfo,
    ) -> Result<Value> {
        match (embedded_type, value) {
            (_, PropertyValue::Null) => Ok(Value::null()),
            (EmbeddedType::NotEmbedded, PropertyValue::Scalar(object)) => {
                self.write_single_value(Some(object.as_ref()))
            }
            (EmbeddedType::EmbeddedEntity, PropertyValue::Scalar(object)) => {
                self.write_single_embedded(object.as_ref(), field_name)
            }
            (EmbeddedType::EmbeddedMap, PropertyValue::Map(entries)) => {
                let value_type =
                    type_info
                        .map_value_type()
                        .ok_or_else(|| DataError::UnexpectedValue {
                            expected: "Map type".to_string(),
                            found: type_info.to_string(),
                        })?;
                self.write_single_embedded_map(entries, value_type)
            }
            (EmbeddedType::EmbeddedMap, other) => {
                Err(DataError::EmbeddedMapExpected(other.type_name()))
            }
            (_, other) => Err(DataError::UnexpectedValue {
                expected: "single value".to_string(),
                found: other.type_name(),
            }),
        }
    }

    /// Write a map as a key-less entity. Keys go through the write path and
    /// are read back as strings to become property names. Each value is
    /// written under its own property name.
    fn write_single_embedded_map(
        &self,
        entries: &[(PropertyValue, PropertyValue)],
        value_type: &TypeInfo,
    ) -> Result<Value> {
        let value_embedded_type = self.mapping_context.embedded_type_of(value_type);
        let mut builder = FullEntityBuilder::new();
        for (key, value) in entries {
            let key = key.as_scalar().ok_or_else(|| DataError::UnexpectedValue {
                expected: "map key".to_string(),
                found: key.type_name(),
            })?;
            let written_key = self.write_single_value(Some(key))?;
            let name = self
                .read_single_value(&written_key, TypeKey::of::<String>())?
                .and_then(|name| name.downcast::<String>().ok())
                .ok_or_else(|| DataError::unconvertible(key.type_name(), "String"))?;

            let value = self.write_value(value, value_embedded_type, &name, value_type)?;
            builder.set(name, value);
        }
        Ok(Value::from(builder.build()))
    }

    /// Write an embedded entity. Its key has kind `field_name`, complete when
    /// the entity's id is set and incomplete otherwise.
    fn write_single_embedded(&self, value: &dyn Object, field_name: &str) -> Result<Value> {
        let entity_converter = self.entity_converter()?;
        let id = self
            .mapping_context
            .persistent_entity(value.type_key())
            .and_then(|entity| {
                entity
                    .id_property()
                    .map(|id_property| entity.get_property(value, id_property))
            })
            .transpose()?;
        let key = match id {
            Some(PropertyValue::Scalar(id)) => self
                .object_to_key_factory
                .get_key_from_id(id.as_ref(), field_name)?,
            _ => self.object_to_key_factory.get_incomplete_key(field_name),
        };

        let mut builder = FullEntityBuilder::with_key(key);
        entity_converter.write(value, &mut builder)?;
        Ok(Value::from(builder.build()))
    }

    /// Apply the custom step, then the internal step, then wrap the result
    /// in its native value.
    pub(super) fn write_single_value(&self, value: Option<&dyn Object>) -> Result<Value> {
        let Some(value) = value else {
            return Ok(Value::null());
        };
        let targets = self.compute_type_targets(value.type_key());

        let first = targets
            .first_step_target()
            .map(|target| convert_with(&self.conversion_service, value, target))
            .transpose()?;
        let value = first.as_deref().unwrap_or(value);

        let second = targets
            .second_step_target()
            .map(|target| convert_with(&self.internal_conversion_service, value, target))
            .transpose()?;
        let value = second.as_deref().unwrap_or(value);

        Ok(wrap_value(Some(value))?)
    }
}
