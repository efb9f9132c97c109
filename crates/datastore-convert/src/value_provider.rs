use crate::conversions::ReadWriteConversions;
use crate::error::{DataError, Result};
use crate::mapping::{EmbeddedType, PersistentProperty};
use crate::type_info::TypeInfo;
use crate::value::PropertyValue;
use datastore_types::FullEntity;

/// Reads property values out of a stored entity.
pub struct EntityPropertyValueProvider<'a> {
    entity: &'a FullEntity,
    conversions: &'a dyn ReadWriteConversions,
}

impl<'a> EntityPropertyValueProvider<'a> {
    pub fn new(entity: &'a FullEntity, conversions: &'a dyn ReadWriteConversions) -> Self {
        Self {
            entity,
            conversions,
        }
    }

    pub fn get_property_value(&self, property: &PersistentProperty) -> Result<PropertyValue> {
        self.get_field_value(
            property.field_name(),
            property.embedded_type(),
            property.type_info(),
        )
    }

    /// Read `field` as `type_info`. A missing field reads as null.
    pub fn get_field_value(
        &self,
        field: &str,
        embedded_type: EmbeddedType,
        type_info: &TypeInfo,
    ) -> Result<PropertyValue> {
        let Some(value) = self.entity.get(field) else {
            return Ok(PropertyValue::Null);
        };
        self.conversions
            .convert_on_read_typed(value, embedded_type, type_info)
            .map_err(|e| DataError::ReadProperty {
                field: field.to_string(),
                source: Box::new(e),
            })
    }
}
