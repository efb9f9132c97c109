//! Application ⇄ Datastore value conversions.
//!
//! Values are written in at most two steps. A custom converter first turns
//! an application type into a simple type, then an internal converter turns
//! the simple type into a native Datastore type. Reads undo the same steps in
//! reverse, driven by the requested target type.
//!
//! Embedded entities and maps are handed to an [`EntityConverter`], which in
//! turn uses the conversion engine for every property.
//!
//! # Modules
//!
//! - [`conversion_service`] - converter registry and the default converters
//! - [`custom_conversions`] - application and store converters, simple types
//! - [`type_targets`] - per-type conversion chain and the write-target cache
//! - [`two_steps`] - the conversion engine
//! - [`entity_converter`] - whole-object conversion
//! - [`mapping`] - mapping metadata for entity types
//! - [`key_factory`] - keys from ids and mapped objects
//! - [`config`] - project and namespace options

pub mod config;
pub mod conversion_service;
pub mod conversions;
pub mod custom_conversions;
pub mod entity_converter;
pub mod error;
pub mod key_factory;
pub mod mapping;
pub mod two_steps;
pub mod type_info;
pub mod type_targets;
pub mod value;
pub mod value_provider;

pub use config::{ConfigError, DatastoreOptions};
pub use conversion_service::{converter, ConversionService, Converter, FnConverter};
pub use conversions::ReadWriteConversions;
pub use custom_conversions::CustomConversions;
pub use entity_converter::{DefaultEntityConverter, EntityConverter};
pub use error::{DataError, Result};
pub use key_factory::{DatastoreKeyFactory, ObjectToKeyFactory};
pub use mapping::{
    EmbeddedType, EntityMapping, MappingContext, MappingContextBuilder, PersistentEntity,
    PersistentProperty,
};
pub use two_steps::{TwoStepsConversions, TwoStepsConversionsBuilder};
pub use type_info::{CollectionKind, TypeInfo};
pub use type_targets::{TypeTargets, WriteTargetCache};
pub use value::PropertyValue;
pub use value_provider::EntityPropertyValueProvider;
