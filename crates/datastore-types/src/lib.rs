//! Native Datastore types for datastore-mapping.
//!
//! This crate holds the store side of the mapping layer: the tagged native
//! [`Value`] wrapper, entities and keys, and the closed set of native types
//! the store can persist without further conversion.
//!
//! It also defines the runtime type identity used across the workspace.
//! Application values travel as `Box<dyn Object>` and are identified by a
//! [`TypeKey`], which plays the role a runtime class plays in a reflective
//! object mapper.
//!
//! # Modules
//!
//! - [`object`] - `TypeKey` and the `Object` trait
//! - [`value`] - `Value`, `ValueData` and the native leaf types
//! - [`entity`] - `Key`, `KeyFactory` and `FullEntity`
//! - [`native`] - native type registry, `wrap_value` and `unwrap_value`

pub mod entity;
pub mod native;
pub mod object;
pub mod value;

pub use entity::{FullEntity, FullEntityBuilder, Key, KeyFactory, KeyId, PathElement};
pub use native::{is_native_type, native_types, unwrap_value, wrap_value, ValueError};
pub use object::{Object, TypeKey};
pub use value::{Blob, LatLng, Timestamp, Value, ValueData, ValueType};
