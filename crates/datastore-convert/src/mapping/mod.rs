//! Mapping metadata: which types are entities, how their properties are
//! declared, and how instances are read and built.
//!
//! Rust has no reflection, so every mapped type is described once by an
//! [`EntityMapping`] holding typed getter and setter closures. The
//! [`MappingContext`] collects these descriptions and resolves the
//! [`EmbeddedType`] of every property against the set of registered entities.

mod context;
mod embedded_type;
mod entity;
mod property;

pub use context::{MappingContext, MappingContextBuilder};
pub use embedded_type::EmbeddedType;
pub use entity::{EntityMapping, PersistentEntity};
pub use property::PersistentProperty;
