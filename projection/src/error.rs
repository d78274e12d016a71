//! View error types.

use keel_core::{ModelPath, ModelType, RuleDescriptor};
use keel_graph::GraphError;
use keel_schema::SchemaError;
use thiserror::Error;

/// Result type for view operations.
pub type ViewResult<T> = Result<T, ViewError>;

/// Errors that can occur while accessing the model through views.
#[derive(Debug, Error)]
pub enum ViewError {
    /// Write through a read-only view, or through a view that has been closed.
    #[error("Attempt to modify a closed view of model element '{path}' of type '{model_type}' given to rule '{rule}'")]
    ViewClosed {
        model_type: ModelType,
        path: ModelPath,
        rule: RuleDescriptor,
    },

    /// A plain value was assigned to a property of managed type.
    #[error("Only managed model instances can be set as property '{property}' of class '{model_type}'")]
    InvalidPropertyValue {
        property: String,
        model_type: ModelType,
    },

    #[error("Property '{property}' is not declared by type '{model_type}'")]
    UnknownProperty {
        property: String,
        model_type: ModelType,
    },

    #[error("Type '{0}' is not a managed type")]
    NotManaged(ModelType),

    #[error("Property '{property}' holds {actual}, which cannot be read as {expected}")]
    UnexpectedValue {
        property: String,
        expected: &'static str,
        actual: String,
    },

    /// Graph failure, including unresolved links and type mismatches.
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl ViewError {
    pub fn view_closed(model_type: &ModelType, path: &ModelPath, rule: &RuleDescriptor) -> Self {
        Self::ViewClosed {
            model_type: model_type.clone(),
            path: path.clone(),
            rule: rule.clone(),
        }
    }

    pub fn invalid_property_value(property: impl Into<String>, model_type: &ModelType) -> Self {
        Self::InvalidPropertyValue {
            property: property.into(),
            model_type: model_type.clone(),
        }
    }

    pub fn unknown_property(property: impl Into<String>, model_type: &ModelType) -> Self {
        Self::UnknownProperty {
            property: property.into(),
            model_type: model_type.clone(),
        }
    }

    pub fn unexpected_value(
        property: impl Into<String>,
        expected: &'static str,
        actual: impl Into<String>,
    ) -> Self {
        Self::UnexpectedValue {
            property: property.into(),
            expected,
            actual: actual.into(),
        }
    }

    pub fn is_view_closed(&self) -> bool {
        matches!(self, ViewError::ViewClosed { .. })
    }

    pub fn is_invalid_property_value(&self) -> bool {
        matches!(self, ViewError::InvalidPropertyValue { .. })
    }

    pub fn is_link_unresolved(&self) -> bool {
        matches!(self, ViewError::Graph(err) if err.is_link_unresolved())
    }

    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, ViewError::Graph(err) if err.is_type_mismatch())
    }
}
