//! Keys for mapped objects.

use crate::config::DatastoreOptions;
use crate::error::{DataError, Result};
use crate::mapping::PersistentEntity;
use crate::value::PropertyValue;
use datastore_types::{Key, KeyId, Object};

/// Builds keys from id values and mapped objects.
pub trait ObjectToKeyFactory: Send + Sync {
    /// Complete key of `kind` for an id value. Keys are returned unchanged;
    /// only `String` and `i64` ids are accepted otherwise.
    fn get_key_from_id(&self, id: &dyn Object, kind: &str) -> Result<Key>;

    fn get_incomplete_key(&self, kind: &str) -> Key;

    /// Key of a mapped object, `None` when its id is null.
    fn get_key_from_object(
        &self,
        object: &dyn Object,
        entity: &dyn PersistentEntity,
    ) -> Result<Option<Key>> {
        let id_property = entity
            .id_property()
            .ok_or_else(|| DataError::MissingIdProperty(object.type_name().to_string()))?;
        match entity.get_property(object, id_property)? {
            PropertyValue::Null => Ok(None),
            PropertyValue::Scalar(id) => self
                .get_key_from_id(id.as_ref(), entity.kind_name())
                .map(Some),
            _ => Err(DataError::InvalidKeyId),
        }
    }
}

/// [`ObjectToKeyFactory`] scoped to a project and namespace.
#[derive(Debug, Clone)]
pub struct DatastoreKeyFactory {
    options: DatastoreOptions,
}

impl DatastoreKeyFactory {
    pub fn new(options: DatastoreOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DatastoreOptions {
        &self.options
    }
}

impl ObjectToKeyFactory for DatastoreKeyFactory {
    fn get_key_from_id(&self, id: &dyn Object, kind: &str) -> Result<Key> {
        if let Some(key) = id.downcast_ref::<Key>() {
            return Ok(key.clone());
        }
        let key_id = if let Some(name) = id.downcast_ref::<String>() {
            KeyId::Name(name.clone())
        } else if let Some(numeric) = id.downcast_ref::<i64>() {
            KeyId::Id(*numeric)
        } else {
            return Err(DataError::InvalidKeyId);
        };
        Ok(self.options.key_factory(kind).new_key(key_id))
    }

    fn get_incomplete_key(&self, kind: &str) -> Key {
        self.options.key_factory(kind).new_incomplete_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::EntityMapping;
    use datastore_types::KeyFactory;

    #[derive(Debug, Clone, PartialEq, Default)]
    struct WithId {
        id: Option<i64>,
    }

    #[derive(Debug, Clone, PartialEq, Default)]
    struct NoId {
        name: String,
    }

    fn factory() -> DatastoreKeyFactory {
        DatastoreKeyFactory::new(DatastoreOptions::new("p"))
    }

    #[test]
    fn test_key_from_key_is_returned_unchanged() {
        let key = KeyFactory::new("project")
            .set_kind("kind")
            .new_key(KeyId::Name("key".to_string()));
        assert_eq!(factory().get_key_from_id(&key, "other").unwrap(), key);
    }

    #[test]
    fn test_key_from_string_and_long() {
        let expected = KeyFactory::new("p").set_kind("custom_test_kind");
        assert_eq!(
            factory().get_key_from_id(&"key".to_string(), "custom_test_kind").unwrap(),
            expected.new_key(KeyId::Name("key".to_string()))
        );
        assert_eq!(
            factory().get_key_from_id(&3i64, "custom_test_kind").unwrap(),
            expected.new_key(KeyId::Id(3))
        );
    }

    #[test]
    fn test_key_from_unsupported_id() {
        let err = factory().get_key_from_id(&true, "custom_test_kind").unwrap_err();
        assert_eq!(err.to_string(), "Keys can only be created using String or long values.");
    }

    #[test]
    fn test_key_from_object() {
        let mapping = EntityMapping::<WithId>::new("custom_test_kind").id(
            "id",
            |w: &WithId| w.id,
            |w, id| w.id = Some(id),
        );

        let key = factory()
            .get_key_from_object(&WithId { id: Some(1) }, &mapping)
            .unwrap();
        assert_eq!(
            key,
            Some(KeyFactory::new("p").set_kind("custom_test_kind").new_key(KeyId::Id(1)))
        );

        let key = factory().get_key_from_object(&WithId::default(), &mapping).unwrap();
        assert_eq!(key, None);
    }

    #[test]
    fn test_key_from_object_without_id_property() {
        let mapping = EntityMapping::<NoId>::new("no_id").scalar(
            "name",
            |n: &NoId| n.name.clone(),
            |n, name| n.name = name,
        );
        let err = factory()
            .get_key_from_object(&NoId::default(), &mapping)
            .unwrap_err();
        assert!(err
            .to_string()
            .starts_with("An ID property was required but does not exist for the type: "));
        assert!(err.to_string().ends_with("NoId"));
    }

    #[test]
    fn test_incomplete_key() {
        let key = DatastoreKeyFactory::new(DatastoreOptions::new("p").with_namespace("ns"))
            .get_incomplete_key("items");
        assert!(!key.is_complete());
        assert_eq!(key.kind(), "items");
        assert_eq!(key.namespace(), Some("ns"));
    }
}
