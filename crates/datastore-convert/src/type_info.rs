//! Declared types of mapped properties.

use datastore_types::TypeKey;
use std::fmt;

/// Concrete collection shape requested on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Array,
    List,
    Set,
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionKind::Array => f.write_str("Array"),
            CollectionKind::List => f.write_str("List"),
            CollectionKind::Set => f.write_str("Set"),
        }
    }
}

/// Declared type of a property: a scalar, a collection of some component
/// type, or a map from key type to value type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeInfo {
    Scalar(TypeKey),
    Collection {
        kind: CollectionKind,
        component: Box<TypeInfo>,
    },
    Map {
        key: Box<TypeInfo>,
        value: Box<TypeInfo>,
    },
}

impl TypeInfo {
    pub fn of<T: 'static>() -> Self {
        TypeInfo::Scalar(TypeKey::of::<T>())
    }

    pub fn collection(kind: CollectionKind, component: TypeInfo) -> Self {
        TypeInfo::Collection {
            kind,
            component: Box::new(component),
        }
    }

    pub fn list(component: TypeInfo) -> Self {
        Self::collection(CollectionKind::List, component)
    }

    pub fn set(component: TypeInfo) -> Self {
        Self::collection(CollectionKind::Set, component)
    }

    pub fn array(component: TypeInfo) -> Self {
        Self::collection(CollectionKind::Array, component)
    }

    pub fn map(key: TypeInfo, value: TypeInfo) -> Self {
        TypeInfo::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// `List<T>`.
    pub fn list_of<T: 'static>() -> Self {
        Self::list(Self::of::<T>())
    }

    /// `Set<T>`.
    pub fn set_of<T: 'static>() -> Self {
        Self::set(Self::of::<T>())
    }

    /// `Map<K, V>`.
    pub fn map_of<K: 'static, V: 'static>() -> Self {
        Self::map(Self::of::<K>(), Self::of::<V>())
    }

    /// Type key of a scalar type.
    pub fn type_key(&self) -> Option<TypeKey> {
        match self {
            TypeInfo::Scalar(key) => Some(*key),
            _ => None,
        }
    }

    pub fn is_collection_like(&self) -> bool {
        matches!(self, TypeInfo::Collection { .. })
    }

    pub fn is_map(&self) -> bool {
        matches!(self, TypeInfo::Map { .. })
    }

    pub fn collection_kind(&self) -> Option<CollectionKind> {
        match self {
            TypeInfo::Collection { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Element type of a collection, or key type of a map.
    pub fn component_type(&self) -> Option<&TypeInfo> {
        match self {
            TypeInfo::Collection { component, .. } => Some(component),
            TypeInfo::Map { key, .. } => Some(key),
            TypeInfo::Scalar(_) => None,
        }
    }

    pub fn map_value_type(&self) -> Option<&TypeInfo> {
        match self {
            TypeInfo::Map { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Element type for collections, value type for maps, the type itself otherwise.
    pub fn actual_type(&self) -> &TypeInfo {
        match self {
            TypeInfo::Collection { component, .. } => component,
            TypeInfo::Map { value, .. } => value,
            TypeInfo::Scalar(_) => self,
        }
    }
}

impl From<TypeKey> for TypeInfo {
    fn from(key: TypeKey) -> Self {
        TypeInfo::Scalar(key)
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeInfo::Scalar(key) => write!(f, "{key}"),
            TypeInfo::Collection { kind, component } => write!(f, "{kind}<{component}>"),
            TypeInfo::Map { key, value } => write!(f, "Map<{key}, {value}>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_type_info() {
        let info = TypeInfo::set_of::<i32>();
        assert!(info.is_collection_like());
        assert_eq!(info.collection_kind(), Some(CollectionKind::Set));
        assert_eq!(info.component_type(), Some(&TypeInfo::of::<i32>()));
        assert_eq!(info.actual_type(), &TypeInfo::of::<i32>());
        assert_eq!(info.type_key(), None);
    }

    #[test]
    fn test_map_type_info() {
        let info = TypeInfo::map_of::<String, i64>();
        assert!(info.is_map());
        assert!(!info.is_collection_like());
        assert_eq!(info.component_type(), Some(&TypeInfo::of::<String>()));
        assert_eq!(info.map_value_type(), Some(&TypeInfo::of::<i64>()));
        assert_eq!(info.actual_type(), &TypeInfo::of::<i64>());
    }

    #[test]
    fn test_display() {
        let info = TypeInfo::list(TypeInfo::map_of::<String, bool>());
        assert_eq!(info.to_string(), "List<Map<alloc::string::String, bool>>");
    }
}
