use super::{EmbeddedType, PersistentProperty};
use crate::error::{DataError, Result};
use crate::type_info::TypeInfo;
use crate::value::PropertyValue;
use datastore_types::{Object, TypeKey};
use std::collections::HashMap;
use std::fmt;

/// Metadata and accessors of a mapped entity type.
pub trait PersistentEntity: Send + Sync {
    fn type_key(&self) -> TypeKey;

    /// Kind the entity is stored under.
    fn kind_name(&self) -> &str;

    fn properties(&self) -> &[PersistentProperty];

    fn id_property(&self) -> Option<&PersistentProperty> {
        self.properties().iter().find(|p| p.is_id_property())
    }

    fn persistent_property(&self, name: &str) -> Option<&PersistentProperty> {
        self.properties().iter().find(|p| p.name() == name)
    }

    /// Current value of `property` on `object`.
    fn get_property(&self, object: &dyn Object, property: &PersistentProperty)
        -> Result<PropertyValue>;

    /// Build an instance from property values keyed by property name.
    /// Null values leave the property at its default.
    fn instantiate(&self, values: Vec<(String, PropertyValue)>) -> Result<Box<dyn Object>>;

    /// Classify every property that is still `NotEmbedded`.
    fn resolve_embedded_types(&mut self, is_entity: &dyn Fn(TypeKey) -> bool);
}

type Getter<T> = Box<dyn Fn(&T) -> PropertyValue + Send + Sync>;
type Setter<T> = Box<dyn Fn(&mut T, PropertyValue) -> Result<()> + Send + Sync>;

struct Accessor<T> {
    getter: Getter<T>,
    setter: Setter<T>,
}

/// [`PersistentEntity`] for a concrete type, built from typed closures.
///
/// ```ignore
/// let mapping = EntityMapping::<Person>::new("person")
///     .id("id", |p: &Person| p.id.clone(), |p, id| p.id = Some(id))
///     .scalar("name", |p: &Person| p.name.clone(), |p, name| p.name = name)
///     .list("tags", |p: &Person| p.tags.clone(), |p, tags| p.tags = tags);
/// ```
pub struct EntityMapping<T> {
    kind_name: String,
    properties: Vec<PersistentProperty>,
    accessors: HashMap<String, Accessor<T>>,
}

impl<T: Object + Default> EntityMapping<T> {
    pub fn new(kind_name: impl Into<String>) -> Self {
        Self {
            kind_name: kind_name.into(),
            properties: Vec::new(),
            accessors: HashMap::new(),
        }
    }

    /// Register a property with raw accessors. Replaces a property of the same name.
    pub fn property<G, S>(mut self, property: PersistentProperty, getter: G, setter: S) -> Self
    where
        G: Fn(&T) -> PropertyValue + Send + Sync + 'static,
        S: Fn(&mut T, PropertyValue) -> Result<()> + Send + Sync + 'static,
    {
        self.accessors.insert(
            property.name().to_string(),
            Accessor {
                getter: Box::new(getter),
                setter: Box::new(setter),
            },
        );
        self.properties.retain(|p| p.name() != property.name());
        self.properties.push(property);
        self
    }

    pub fn scalar<V, G, S>(self, name: &str, get: G, set: S) -> Self
    where
        V: Object,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.property(
            PersistentProperty::new(name, TypeInfo::of::<V>()),
            move |instance| PropertyValue::scalar(get(instance)),
            move |instance, value| {
                if let Some(value) = value.into_option::<V>()? {
                    set(instance, value);
                }
                Ok(())
            },
        )
    }

    pub fn optional<V, G, S>(self, name: &str, get: G, set: S) -> Self
    where
        V: Object,
        G: Fn(&T) -> Option<V> + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.property(
            PersistentProperty::new(name, TypeInfo::of::<V>()),
            move |instance| PropertyValue::from_option(get(instance)),
            move |instance, value| {
                if let Some(value) = value.into_option::<V>()? {
                    set(instance, value);
                }
                Ok(())
            },
        )
    }

    pub fn list<V, G, S>(self, name: &str, get: G, set: S) -> Self
    where
        V: Object,
        G: Fn(&T) -> Vec<V> + Send + Sync + 'static,
        S: Fn(&mut T, Vec<V>) + Send + Sync + 'static,
    {
        self.property(
            PersistentProperty::new(name, TypeInfo::list_of::<V>()),
            move |instance| PropertyValue::list(get(instance)),
            move |instance, value| {
                set(instance, value.into_vec::<V>()?);
                Ok(())
            },
        )
    }

    /// Map property, stored as an embedded entity keyed by the map keys.
    pub fn map<K, V, G, S>(self, name: &str, get: G, set: S) -> Self
    where
        K: Object,
        V: Object,
        G: Fn(&T) -> Vec<(K, V)> + Send + Sync + 'static,
        S: Fn(&mut T, Vec<(K, V)>) + Send + Sync + 'static,
    {
        self.property(
            PersistentProperty::new(name, TypeInfo::map_of::<K, V>()),
            move |instance| PropertyValue::map(get(instance)),
            move |instance, value| {
                set(instance, value.into_entries::<K, V>()?);
                Ok(())
            },
        )
    }

    /// Register the id property. Its value becomes the key of the stored entity.
    pub fn id<V, G, S>(self, name: &str, get: G, set: S) -> Self
    where
        V: Object,
        G: Fn(&T) -> Option<V> + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.property(
            PersistentProperty::new(name, TypeInfo::of::<V>()).as_id_property(),
            move |instance| PropertyValue::from_option(get(instance)),
            move |instance, value| {
                if let Some(value) = value.into_option::<V>()? {
                    set(instance, value);
                }
                Ok(())
            },
        )
    }

    fn accessor(&self, name: &str) -> Result<&Accessor<T>> {
        self.accessors
            .get(name)
            .ok_or_else(|| DataError::UnknownProperty {
                type_name: std::any::type_name::<T>().to_string(),
                property: name.to_string(),
            })
    }
}

impl<T: Object + Default> PersistentEntity for EntityMapping<T> {
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<T>()
    }

    fn kind_name(&self) -> &str {
        &self.kind_name
    }

    fn properties(&self) -> &[PersistentProperty] {
        &self.properties
    }

    fn get_property(
        &self,
        object: &dyn Object,
        property: &PersistentProperty,
    ) -> Result<PropertyValue> {
        let instance =
            object
                .downcast_ref::<T>()
                .ok_or_else(|| DataError::UnexpectedValue {
                    expected: std::any::type_name::<T>().to_string(),
                    found: object.type_name().to_string(),
                })?;
        Ok((self.accessor(property.name())?.getter)(instance))
    }

    fn instantiate(&self, values: Vec<(String, PropertyValue)>) -> Result<Box<dyn Object>> {
        let mut instance = T::default();
        for (name, value) in values {
            if value.is_null() {
                continue;
            }
            (self.accessor(&name)?.setter)(&mut instance, value)?;
        }
        Ok(Box::new(instance))
    }

    fn resolve_embedded_types(&mut self, is_entity: &dyn Fn(TypeKey) -> bool) {
        for property in &mut self.properties {
            if property.embedded_type() == EmbeddedType::NotEmbedded {
                let embedded_type = EmbeddedType::of(property.type_info(), is_entity);
                property.set_embedded_type(embedded_type);
            }
        }
    }
}

impl<T> fmt::Debug for EntityMapping<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityMapping")
            .field("type", &std::any::type_name::<T>())
            .field("kind_name", &self.kind_name)
            .field("properties", &self.properties)
            .finish()
    }
}
