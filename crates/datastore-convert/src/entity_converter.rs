//! Whole-object conversion between mapped types and stored entities.
//!
//! The conversion engine calls back into an [`EntityConverter`] for embedded
//! entities and embedded maps, and the converter calls the engine for every
//! property. [`DefaultEntityConverter::new`] wires both directions at once.

use crate::conversions::ReadWriteConversions;
use crate::custom_conversions::CustomConversions;
use crate::error::{DataError, Result};
use crate::key_factory::ObjectToKeyFactory;
use crate::mapping::{EmbeddedType, MappingContext, PersistentEntity};
use crate::two_steps::TwoStepsConversions;
use crate::type_info::TypeInfo;
use crate::value::PropertyValue;
use crate::value_provider::EntityPropertyValueProvider;
use datastore_types::{FullEntity, FullEntityBuilder, Key, KeyId, Object, TypeKey, Value, ValueData};
use std::sync::{Arc, Weak};

/// Writes mapped objects into entity builders and reads them back.
pub trait EntityConverter: Send + Sync {
    /// Write every non-id property of `source` into `sink`.
    fn write(&self, source: &dyn Object, sink: &mut FullEntityBuilder) -> Result<()>;

    /// Read an instance of `type_key` from `entity`.
    fn read(&self, type_key: TypeKey, entity: &FullEntity) -> Result<Box<dyn Object>>;

    /// Read `entity` as a map of the given map type, one entry per property.
    fn read_as_map(&self, entity: &FullEntity, map_type: &TypeInfo) -> Result<PropertyValue>;
}

/// [`EntityConverter`] driven by a [`MappingContext`].
pub struct DefaultEntityConverter {
    mapping_context: Arc<MappingContext>,
    conversions: Arc<dyn ReadWriteConversions>,
}

impl DefaultEntityConverter {
    /// Converter over a default [`TwoStepsConversions`] engine.
    pub fn new(
        mapping_context: Arc<MappingContext>,
        object_to_key_factory: Arc<dyn ObjectToKeyFactory>,
    ) -> Result<Arc<Self>> {
        let conversions = TwoStepsConversions::new(
            CustomConversions::default(),
            object_to_key_factory,
            mapping_context.clone(),
        );
        Self::with_conversions(mapping_context, Arc::new(conversions))
    }

    /// Converter over `conversions`, registered as its entity converter.
    /// Fails when `conversions` already has one.
    pub fn with_conversions(
        mapping_context: Arc<MappingContext>,
        conversions: Arc<dyn ReadWriteConversions>,
    ) -> Result<Arc<Self>> {
        let mut registration = Ok(());
        let converter = Arc::new_cyclic(|weak: &Weak<Self>| {
            let weak: Weak<dyn EntityConverter> = weak.clone();
            registration = conversions.register_entity_converter(weak);
            Self {
                mapping_context,
                conversions: conversions.clone(),
            }
        });
        registration.map(|()| converter)
    }

    pub fn conversions(&self) -> &Arc<dyn ReadWriteConversions> {
        &self.conversions
    }

    pub fn mapping_context(&self) -> &Arc<MappingContext> {
        &self.mapping_context
    }

    fn persistent_entity(&self, type_key: TypeKey) -> Result<&dyn PersistentEntity> {
        self.mapping_context
            .persistent_entity(type_key)
            .ok_or_else(|| DataError::UnknownEntity(type_key.name().to_string()))
    }

    fn read_properties(
        &self,
        persistent_entity: &dyn PersistentEntity,
        entity: &FullEntity,
    ) -> Result<Vec<(String, PropertyValue)>> {
        let provider = EntityPropertyValueProvider::new(entity, self.conversions.as_ref());
        let mut values = Vec::with_capacity(persistent_entity.properties().len());
        for property in persistent_entity.properties() {
            if property.is_id_property() {
                continue;
            }
            values.push((property.name().to_string(), provider.get_property_value(property)?));
        }

        if let (Some(id_property), Some(key)) = (persistent_entity.id_property(), entity.key()) {
            if key.is_complete() {
                let id = self.read_id(key, id_property.type_info())?;
                values.push((id_property.name().to_string(), id));
            }
        }
        Ok(values)
    }

    /// Id property value from a complete key.
    fn read_id(&self, key: &Key, id_type: &TypeInfo) -> Result<PropertyValue> {
        let target = id_type.type_key();
        if target == Some(TypeKey::of::<Key>()) {
            return Ok(PropertyValue::scalar(key.clone()));
        }
        if target == Some(TypeKey::of::<String>()) {
            return key
                .name()
                .map(|name| PropertyValue::scalar(name.to_string()))
                .ok_or(DataError::KeyIdMismatch {
                    expected: "String name value",
                    target: id_type.to_string(),
                });
        }
        if target == Some(TypeKey::of::<i64>()) {
            return key
                .numeric_id()
                .map(PropertyValue::scalar)
                .ok_or(DataError::KeyIdMismatch {
                    expected: "numeric ID",
                    target: id_type.to_string(),
                });
        }

        let raw = match key.id() {
            Some(KeyId::Name(name)) => Value::from(name.as_str()),
            Some(KeyId::Id(id)) => Value::from(*id),
            None => Value::null(),
        };
        self.conversions
            .convert_on_read_typed(&raw, EmbeddedType::NotEmbedded, id_type)
    }
}

/// Mark every leaf of `value` as excluded from indexes. List and entity
/// wrappers are rebuilt unmarked; entity keys are kept.
fn set_exclude_from_indexes(value: Value) -> Value {
    match value.into_data() {
        ValueData::Entity(entity) => {
            let (key, properties) = entity.into_parts();
            let mut builder = FullEntityBuilder::new();
            builder.set_key(key);
            for (name, property) in properties {
                builder.set(name, set_exclude_from_indexes(property));
            }
            Value::from(builder.build())
        }
        ValueData::List(values) => Value::from(
            values
                .into_iter()
                .map(set_exclude_from_indexes)
                .collect::<Vec<_>>(),
        ),
        leaf => Value::new(leaf).with_exclude_from_indexes(true),
    }
}

impl EntityConverter for DefaultEntityConverter {
    fn write(&self, source: &dyn Object, sink: &mut FullEntityBuilder) -> Result<()> {
        let persistent_entity = self.persistent_entity(source.type_key())?;
        for property in persistent_entity.properties() {
            if property.is_id_property() {
                continue;
            }
            let converted = persistent_entity
                .get_property(source, property)
                .and_then(|value| self.conversions.convert_on_write(&value, property))
                .map_err(|e| DataError::WriteProperty {
                    kind: persistent_entity.kind_name().to_string(),
                    field: property.field_name().to_string(),
                    source: Box::new(e),
                })?;
            let converted = if property.is_unindexed() {
                set_exclude_from_indexes(converted)
            } else {
                converted
            };
            sink.set(property.field_name(), converted);
        }
        tracing::trace!(
            "Wrote {} as {} entity",
            source.type_name(),
            persistent_entity.kind_name()
        );
        Ok(())
    }

    fn read(&self, type_key: TypeKey, entity: &FullEntity) -> Result<Box<dyn Object>> {
        let persistent_entity = self.persistent_entity(type_key)?;
        tracing::trace!("Reading {} entity as {}", persistent_entity.kind_name(), type_key);
        self.read_properties(persistent_entity, entity)
            .and_then(|values| persistent_entity.instantiate(values))
            .map_err(|e| DataError::ReadEntity {
                kind: persistent_entity.kind_name().to_string(),
                source: Box::new(e),
            })
    }

    fn read_as_map(&self, entity: &FullEntity, map_type: &TypeInfo) -> Result<PropertyValue> {
        let TypeInfo::Map { key, value } = map_type else {
            return Err(DataError::UnexpectedValue {
                expected: "Map type".to_string(),
                found: map_type.to_string(),
            });
        };
        let value_embedded_type = self.mapping_context.embedded_type_of(value);
        let provider = EntityPropertyValueProvider::new(entity, self.conversions.as_ref());

        let mut entries = Vec::with_capacity(entity.len());
        for field in entity.names() {
            let map_key = self.conversions.convert_on_read_typed(
                &Value::from(field),
                EmbeddedType::NotEmbedded,
                key,
            )?;
            let map_value = provider.get_field_value(field, value_embedded_type, value)?;
            entries.push((map_key, map_value));
        }
        Ok(PropertyValue::Map(entries))
    }
}
