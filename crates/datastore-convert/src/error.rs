//! Error type for conversion and mapping operations.

use datastore_types::ValueError;

/// Error type for conversion and mapping operations.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// No conversion path between two types
    #[error("Unable to convert {source_type} to {target_type}")]
    Unconvertible {
        source_type: String,
        target_type: String,
    },

    /// A conversion service has no converter for the pair
    #[error("No converter found capable of converting from {source_type} to {target_type}")]
    ConverterNotFound {
        source_type: String,
        target_type: String,
    },

    /// Value has no native representation
    #[error(transparent)]
    UnsupportedValue(#[from] ValueError),

    /// Write of a property value failed
    #[error("Unable to convert value of type {type_name} for field '{field}'")]
    UnconvertibleValue {
        type_name: String,
        field: String,
        #[source]
        source: Box<DataError>,
    },

    /// An element of a collection failed to convert
    #[error("Unable to process elements of a collection")]
    CollectionElements(#[source] Box<DataError>),

    /// Embedded entity strategy applied to a non-entity value
    #[error("Embedded entity was expected, but {0} found")]
    EmbeddedEntityExpected(String),

    /// Embedded map strategy applied to a non-map value
    #[error("Embedded map was expected, but {0} found")]
    EmbeddedMapExpected(String),

    /// Value has a different shape than the operation needs
    #[error("Expected {expected}, but {found} found")]
    UnexpectedValue { expected: String, found: String },

    #[error("Unable to write {kind}.{field}")]
    WriteProperty {
        kind: String,
        field: String,
        #[source]
        source: Box<DataError>,
    },

    #[error("Unable to read property {field}")]
    ReadProperty {
        field: String,
        #[source]
        source: Box<DataError>,
    },

    #[error("Unable to read {kind} entity")]
    ReadEntity {
        kind: String,
        #[source]
        source: Box<DataError>,
    },

    /// Type is not registered in the mapping context
    #[error("Unable to convert Datastore Entity to {0}")]
    UnknownEntity(String),

    /// Type has no property with the given name
    #[error("Property '{property}' not found on {type_name}")]
    UnknownProperty { type_name: String, property: String },

    #[error("Keys can only be created using String or long values.")]
    InvalidKeyId,

    /// Key id kind does not match the id property type
    #[error("The given key doesn't have a {expected} but a conversion to {target} was attempted")]
    KeyIdMismatch {
        expected: &'static str,
        target: String,
    },

    #[error("An ID property was required but does not exist for the type: {0}")]
    MissingIdProperty(String),

    /// Embedded entity conversion before a bridge was bound
    #[error("No entity converter is registered")]
    NoEntityConverter,

    #[error("An entity converter is already registered")]
    EntityConverterAlreadyRegistered,
}

impl DataError {
    pub fn unconvertible(source_type: impl Into<String>, target_type: impl Into<String>) -> Self {
        DataError::Unconvertible {
            source_type: source_type.into(),
            target_type: target_type.into(),
        }
    }

    /// Innermost cause in the chain of wrapped errors.
    pub fn root_cause(&self) -> &DataError {
        match self {
            DataError::UnconvertibleValue { source, .. }
            | DataError::WriteProperty { source, .. }
            | DataError::ReadProperty { source, .. }
            | DataError::ReadEntity { source, .. }
            | DataError::CollectionElements(source) => source.root_cause(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
