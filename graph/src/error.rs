//! Graph error types.

use keel_core::{ModelPath, ModelType, NodeId};
use keel_schema::SchemaError;
use thiserror::Error;

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors that can occur during graph operations.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Node not found, or the id is stale.
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// A node is already registered at this path.
    #[error("Duplicate model path: {0}")]
    DuplicatePath(ModelPath),

    /// The parent already has a link with this name.
    #[error("Duplicate link '{name}' on {path}")]
    DuplicateLink { path: ModelPath, name: String },

    /// A required link is missing or its target cannot become usable.
    #[error("Link {path} cannot be resolved: {reason}")]
    LinkUnresolved { path: ModelPath, reason: String },

    /// Stored data or requested type is incompatible with the node's type.
    #[error("Type mismatch at {path}: expected {expected}, got {actual}")]
    TypeMismatch {
        path: ModelPath,
        expected: ModelType,
        actual: String,
    },

    /// Too many references followed while resolving a node.
    #[error("Reference chain from {path} exceeds {depth} hops")]
    ReferenceDepthExceeded { path: ModelPath, depth: usize },

    /// Schema lookup failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl GraphError {
    pub fn link_unresolved(path: ModelPath, reason: impl Into<String>) -> Self {
        Self::LinkUnresolved {
            path,
            reason: reason.into(),
        }
    }

    pub fn type_mismatch(path: &ModelPath, expected: &ModelType, actual: impl Into<String>) -> Self {
        Self::TypeMismatch {
            path: path.clone(),
            expected: expected.clone(),
            actual: actual.into(),
        }
    }

    pub fn is_link_unresolved(&self) -> bool {
        matches!(self, GraphError::LinkUnresolved { .. })
    }

    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, GraphError::TypeMismatch { .. })
    }
}
