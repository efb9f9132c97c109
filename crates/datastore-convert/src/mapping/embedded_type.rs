use crate::type_info::TypeInfo;
use datastore_types::TypeKey;

/// How a property value is stored: as a single value, as a nested entity,
/// or as a nested entity keyed by the map's stringified keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EmbeddedType {
    #[default]
    NotEmbedded,
    EmbeddedEntity,
    EmbeddedMap,
}

impl EmbeddedType {
    /// Classify a declared type. Collections are classified by their element type.
    pub fn of(type_info: &TypeInfo, is_entity: impl Fn(TypeKey) -> bool) -> Self {
        let element = match type_info {
            TypeInfo::Collection { component, .. } => component.as_ref(),
            other => other,
        };
        match element {
            TypeInfo::Map { .. } => EmbeddedType::EmbeddedMap,
            TypeInfo::Scalar(key) if is_entity(*key) => EmbeddedType::EmbeddedEntity,
            _ => EmbeddedType::NotEmbedded,
        }
    }
}
