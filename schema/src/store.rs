//! The SchemaStore - immutable schema lookup.

use crate::{Schema, SchemaError, SchemaKind, SchemaResult};
use keel_core::ModelType;
use std::collections::HashMap;
use std::sync::Arc;

/// The SchemaStore provides runtime lookup of schemas by type.
/// It is immutable after construction; schemas are shared, never copied.
#[derive(Debug, Default)]
pub struct SchemaStore {
    schemas: HashMap<ModelType, Arc<Schema>>,
}

impl SchemaStore {
    pub(crate) fn new(schemas: HashMap<ModelType, Arc<Schema>>) -> Self {
        Self { schemas }
    }

    /// Get the schema of a type.
    pub fn schema(&self, model_type: &ModelType) -> SchemaResult<Arc<Schema>> {
        self.schemas
            .get(model_type)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownType(model_type.clone()))
    }

    /// Get the kind of a type.
    pub fn kind(&self, model_type: &ModelType) -> SchemaResult<SchemaKind> {
        self.schema(model_type).map(|s| s.kind())
    }

    /// Check if a type has a schema.
    pub fn contains(&self, model_type: &ModelType) -> bool {
        self.schemas.contains_key(model_type)
    }

    /// All registered types.
    pub fn types(&self) -> impl Iterator<Item = &ModelType> {
        self.schemas.keys()
    }

    /// Get the number of registered types, built-in scalars included.
    pub fn type_count(&self) -> usize {
        self.schemas.len()
    }
}
