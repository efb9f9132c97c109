//! Conversion contract used by entity mappers.

use crate::entity_converter::EntityConverter;
use crate::error::Result;
use crate::mapping::{EmbeddedType, PersistentProperty};
use crate::type_info::{CollectionKind, TypeInfo};
use crate::value::PropertyValue;
use datastore_types::{Object, TypeKey, Value};
use std::sync::Weak;

/// Reads native values into application values and writes them back.
pub trait ReadWriteConversions: Send + Sync {
    /// Read `value` as `target_component`, or as a collection of it when
    /// `target_collection` is given and the value is a list.
    fn convert_on_read(
        &self,
        value: &Value,
        target_collection: Option<CollectionKind>,
        target_component: TypeKey,
    ) -> Result<PropertyValue>;

    /// Read `value` as the declared type, with the given storage shape.
    fn convert_on_read_typed(
        &self,
        value: &Value,
        embedded_type: EmbeddedType,
        target: &TypeInfo,
    ) -> Result<PropertyValue>;

    /// Write a property value.
    fn convert_on_write(&self, value: &PropertyValue, property: &PersistentProperty)
        -> Result<Value>;

    /// Write a single non-embedded value. `None` writes the null value.
    fn convert_on_write_single(&self, value: Option<&dyn Object>) -> Result<Value>;

    /// Native type that `input` converts to and from, if any.
    fn get_datastore_compatible_type(&self, input: TypeKey) -> Option<TypeKey>;

    /// Bind the converter used for embedded entities. Binds at most once.
    fn register_entity_converter(&self, converter: Weak<dyn EntityConverter>) -> Result<()>;
}
