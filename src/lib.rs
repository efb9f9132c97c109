//! Datastore Mapping Library
//!
//! Converts application values to Google Cloud Datastore native values and
//! back. Every write goes through at most two conversion steps:
//!
//! 1. a custom converter from the application type to a simple type
//! 2. an internal converter from the simple type to a native type
//!
//! Reads recompute the same steps from the requested type and apply them in
//! reverse.
//!
//! # Crates
//!
//! - `datastore_types` - native values, entities, keys and the runtime type identity
//! - `datastore_convert` - the conversion engine, mapping metadata and entity conversion
//!
//! # Usage
//!
//! ```ignore
//! let context = MappingContext::builder()
//!     .register(EntityMapping::<Person>::new("person")
//!         .id("id", |p: &Person| p.id, |p, id| p.id = Some(id))
//!         .scalar("name", |p: &Person| p.name.clone(), |p, name| p.name = name))
//!     .build();
//!
//! let converter = entity_converter(DatastoreOptions::from_env()?, context)?;
//! let mut builder = FullEntityBuilder::new();
//! converter.write(&person, &mut builder)?;
//! ```

use std::sync::Arc;

pub use datastore_convert::{
    converter, CollectionKind, ConfigError, ConversionService, Converter, CustomConversions,
    DataError, DatastoreKeyFactory, DatastoreOptions, DefaultEntityConverter, EmbeddedType,
    EntityConverter, EntityMapping, EntityPropertyValueProvider, MappingContext,
    MappingContextBuilder, ObjectToKeyFactory, PersistentEntity, PersistentProperty,
    PropertyValue, ReadWriteConversions, Result, TwoStepsConversions, TypeInfo, TypeTargets,
    WriteTargetCache,
};
pub use datastore_types::{
    Blob, FullEntity, FullEntityBuilder, Key, KeyFactory, KeyId, LatLng, Object, Timestamp,
    TypeKey, Value, ValueData, ValueType,
};

/// Entity converter over the default conversions, with keys scoped to `options`.
pub fn entity_converter(
    options: DatastoreOptions,
    mapping_context: MappingContext,
) -> Result<Arc<DefaultEntityConverter>> {
    entity_converter_with(options, mapping_context, CustomConversions::default())
}

/// Entity converter over `custom_conversions`, with keys scoped to `options`.
pub fn entity_converter_with(
    options: DatastoreOptions,
    mapping_context: MappingContext,
    custom_conversions: CustomConversions,
) -> Result<Arc<DefaultEntityConverter>> {
    tracing::debug!(
        "Creating entity converter for project {} with {} mapped types and {} custom converters",
        options.project_id,
        mapping_context.len(),
        custom_conversions.converters().len()
    );
    let mapping_context = Arc::new(mapping_context);
    let conversions = TwoStepsConversions::new(
        custom_conversions,
        Arc::new(DatastoreKeyFactory::new(options)),
        mapping_context.clone(),
    );
    DefaultEntityConverter::with_conversions(mapping_context, Arc::new(conversions))
}
