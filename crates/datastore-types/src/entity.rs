//! Keys and entities.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier part of a key: a name or a numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyId {
    Name(String),
    Id(i64),
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyId::Name(name) => write!(f, "\"{name}\""),
            KeyId::Id(id) => write!(f, "{id}"),
        }
    }
}

/// One ancestor in a key path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathElement {
    pub kind: String,
    pub id: KeyId,
}

impl PathElement {
    pub fn new(kind: impl Into<String>, id: KeyId) -> Self {
        Self {
            kind: kind.into(),
            id,
        }
    }
}

/// A Datastore key. A key without an id is incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
    kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    ancestors: Vec<PathElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<KeyId>,
}

impl Key {
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn ancestors(&self) -> &[PathElement] {
        &self.ancestors
    }

    pub fn id(&self) -> Option<&KeyId> {
        self.id.as_ref()
    }

    /// Name component, if the key is named.
    pub fn name(&self) -> Option<&str> {
        match &self.id {
            Some(KeyId::Name(name)) => Some(name),
            _ => None,
        }
    }

    /// Numeric component, if the key has a numeric id.
    pub fn numeric_id(&self) -> Option<i64> {
        match self.id {
            Some(KeyId::Id(id)) => Some(id),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.id.is_some()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ancestor in &self.ancestors {
            write!(f, "{}({})/", ancestor.kind, ancestor.id)?;
        }
        match &self.id {
            Some(id) => write!(f, "{}({})", self.kind, id),
            None => write!(f, "{}(?)", self.kind),
        }
    }
}

/// Creates keys for a project, namespace and kind.
#[derive(Debug, Clone)]
pub struct KeyFactory {
    project_id: String,
    namespace: Option<String>,
    kind: String,
    ancestors: Vec<PathElement>,
}

impl KeyFactory {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            namespace: None,
            kind: String::new(),
            ancestors: Vec::new(),
        }
    }

    pub fn set_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace;
        self
    }

    pub fn set_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn add_ancestor(mut self, ancestor: PathElement) -> Self {
        self.ancestors.push(ancestor);
        self
    }

    pub fn new_key(&self, id: KeyId) -> Key {
        self.build(Some(id))
    }

    pub fn new_incomplete_key(&self) -> Key {
        self.build(None)
    }

    fn build(&self, id: Option<KeyId>) -> Key {
        Key {
            project_id: self.project_id.clone(),
            namespace: self.namespace.clone(),
            kind: self.kind.clone(),
            ancestors: self.ancestors.clone(),
            id,
        }
    }
}

/// An entity: an optional key plus named property values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FullEntity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key: Option<Key>,
    properties: BTreeMap<String, Value>,
}

impl FullEntity {
    pub fn builder() -> FullEntityBuilder {
        FullEntityBuilder::default()
    }

    pub fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Property names, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn into_parts(self) -> (Option<Key>, BTreeMap<String, Value>) {
        (self.key, self.properties)
    }

    /// Builder seeded with this entity's key and properties.
    pub fn to_builder(&self) -> FullEntityBuilder {
        FullEntityBuilder {
            key: self.key.clone(),
            properties: self.properties.clone(),
        }
    }
}

/// Mutable sink for entity properties.
#[derive(Debug, Clone, Default)]
pub struct FullEntityBuilder {
    key: Option<Key>,
    properties: BTreeMap<String, Value>,
}

impl FullEntityBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(key: Key) -> Self {
        Self {
            key: Some(key),
            properties: BTreeMap::new(),
        }
    }

    pub fn set_key(&mut self, key: Option<Key>) -> &mut Self {
        self.key = key;
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn remove(&mut self, name: &str) -> &mut Self {
        self.properties.remove(name);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn build(self) -> FullEntity {
        FullEntity {
            key: self.key,
            properties: self.properties,
        }
    }
}
