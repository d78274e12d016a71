//! Schema error types.

use keel_core::ModelType;
use thiserror::Error;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur while building or querying the schema store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Duplicate type name: {0}")]
    DuplicateType(ModelType),

    #[error("Duplicate property '{property}' on type {model_type}")]
    DuplicateProperty {
        model_type: ModelType,
        property: String,
    },

    #[error("Property '{property}' of type {model_type} has unknown type {property_type}")]
    UnknownPropertyType {
        model_type: ModelType,
        property: String,
        property_type: ModelType,
    },

    #[error("No schema registered for type {0}")]
    UnknownType(ModelType),
}

impl SchemaError {
    pub fn duplicate_property(model_type: &ModelType, property: impl Into<String>) -> Self {
        Self::DuplicateProperty {
            model_type: model_type.clone(),
            property: property.into(),
        }
    }

    pub fn unknown_property_type(
        model_type: &ModelType,
        property: impl Into<String>,
        property_type: &ModelType,
    ) -> Self {
        Self::UnknownPropertyType {
            model_type: model_type.clone(),
            property: property.into(),
            property_type: property_type.clone(),
        }
    }
}
