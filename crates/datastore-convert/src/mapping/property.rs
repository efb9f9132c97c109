use super::EmbeddedType;
use crate::type_info::TypeInfo;

/// Metadata of one mapped property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistentProperty {
    /// Property name on the application type
    name: String,

    /// Name of the field in the stored entity
    field_name: String,

    /// Declared type
    type_info: TypeInfo,

    /// Storage shape, resolved by the mapping context
    embedded_type: EmbeddedType,

    /// Whether the property holds the entity id
    id: bool,

    /// Whether stored values are excluded from indexes
    unindexed: bool,
}

impl PersistentProperty {
    /// Property stored under its own name.
    pub fn new(name: impl Into<String>, type_info: TypeInfo) -> Self {
        let name = name.into();
        Self {
            field_name: name.clone(),
            name,
            type_info,
            embedded_type: EmbeddedType::NotEmbedded,
            id: false,
            unindexed: false,
        }
    }

    pub fn with_field_name(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = field_name.into();
        self
    }

    pub fn with_embedded_type(mut self, embedded_type: EmbeddedType) -> Self {
        self.embedded_type = embedded_type;
        self
    }

    pub fn as_id_property(mut self) -> Self {
        self.id = true;
        self
    }

    pub fn as_unindexed(mut self) -> Self {
        self.unindexed = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    pub fn embedded_type(&self) -> EmbeddedType {
        self.embedded_type
    }

    pub fn is_id_property(&self) -> bool {
        self.id
    }

    pub fn is_unindexed(&self) -> bool {
        self.unindexed
    }

    pub(crate) fn set_embedded_type(&mut self, embedded_type: EmbeddedType) {
        self.embedded_type = embedded_type;
    }
}
