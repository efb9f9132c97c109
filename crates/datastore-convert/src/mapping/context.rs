use super::{EmbeddedType, PersistentEntity};
use crate::type_info::TypeInfo;
use datastore_types::TypeKey;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Registry of mapped entity types. Immutable once built.
#[derive(Default)]
pub struct MappingContext {
    entities: HashMap<TypeKey, Box<dyn PersistentEntity>>,
}

impl MappingContext {
    pub fn builder() -> MappingContextBuilder {
        MappingContextBuilder::default()
    }

    pub fn persistent_entity(&self, type_key: TypeKey) -> Option<&dyn PersistentEntity> {
        self.entities.get(&type_key).map(|entity| entity.as_ref())
    }

    pub fn is_entity(&self, type_key: TypeKey) -> bool {
        self.entities.contains_key(&type_key)
    }

    /// Storage shape for a value of the declared type.
    pub fn embedded_type_of(&self, type_info: &TypeInfo) -> EmbeddedType {
        EmbeddedType::of(type_info, |key| self.is_entity(key))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl fmt::Debug for MappingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.entities.values().map(|entity| entity.kind_name()))
            .finish()
    }
}

#[derive(Default)]
pub struct MappingContextBuilder {
    entities: Vec<Box<dyn PersistentEntity>>,
}

impl MappingContextBuilder {
    /// Add an entity. A later registration for the same type replaces an earlier one.
    pub fn register<E: PersistentEntity + 'static>(mut self, entity: E) -> Self {
        self.entities.push(Box::new(entity));
        self
    }

    /// Resolve embedded types against the registered entities and freeze the registry.
    pub fn build(self) -> MappingContext {
        let entity_types: HashSet<TypeKey> = self.entities.iter().map(|e| e.type_key()).collect();
        let is_entity = |key: TypeKey| entity_types.contains(&key);

        let mut entities = HashMap::with_capacity(self.entities.len());
        for mut entity in self.entities {
            entity.resolve_embedded_types(&is_entity);
            tracing::trace!(
                "Registered persistent entity {} as kind {}",
                entity.type_key(),
                entity.kind_name()
            );
            entities.insert(entity.type_key(), entity);
        }
        tracing::debug!("Mapping context built with {} entities", entities.len());

        MappingContext { entities }
    }
}
