//! SchemaStoreBuilder for constructing an immutable SchemaStore.

use crate::{PropertyDescriptor, ScalarType, Schema, SchemaError, SchemaResult, SchemaStore};
use indexmap::IndexMap;
use keel_core::ModelType;
use std::collections::HashMap;
use std::sync::Arc;

/// Builder for constructing an immutable SchemaStore.
///
/// The built-in scalar types are registered up front.
#[derive(Debug)]
pub struct SchemaStoreBuilder {
    schemas: HashMap<ModelType, Schema>,
}

impl Default for SchemaStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaStoreBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        let schemas = ScalarType::ALL
            .iter()
            .map(|s| (s.model_type(), Schema::unmanaged(s.model_type(), Some(*s))))
            .collect();
        Self { schemas }
    }

    /// Add a managed type definition.
    pub fn add_managed(&mut self, name: impl Into<ModelType>) -> ManagedTypeBuilder<'_> {
        ManagedTypeBuilder {
            builder: self,
            model_type: name.into(),
            properties: Vec::new(),
        }
    }

    /// Add an unmanaged value type, optionally constrained to a scalar type.
    pub fn add_unmanaged(
        &mut self,
        name: impl Into<ModelType>,
        scalar: Option<ScalarType>,
    ) -> SchemaResult<ModelType> {
        let model_type = name.into();
        if self.schemas.contains_key(&model_type) {
            return Err(SchemaError::DuplicateType(model_type));
        }
        self.schemas.insert(
            model_type.clone(),
            Schema::unmanaged(model_type.clone(), scalar),
        );
        Ok(model_type)
    }

    /// Build the immutable SchemaStore.
    ///
    /// Every property type must resolve to a registered schema. Managed types
    /// may refer to each other (and to themselves) freely.
    pub fn build(self) -> SchemaResult<SchemaStore> {
        for schema in self.schemas.values() {
            for property in schema.properties().values() {
                if !self.schemas.contains_key(&property.model_type) {
                    return Err(SchemaError::unknown_property_type(
                        schema.model_type(),
                        &property.name,
                        &property.model_type,
                    ));
                }
            }
        }

        let schemas = self
            .schemas
            .into_iter()
            .map(|(model_type, schema)| (model_type, Arc::new(schema)))
            .collect();
        Ok(SchemaStore::new(schemas))
    }
}

/// Builder for a managed type definition.
pub struct ManagedTypeBuilder<'a> {
    builder: &'a mut SchemaStoreBuilder,
    model_type: ModelType,
    properties: Vec<PropertyDescriptor>,
}

impl<'a> ManagedTypeBuilder<'a> {
    /// Declare a property. Declaration order is preserved.
    pub fn property(mut self, name: impl Into<String>, model_type: impl Into<ModelType>) -> Self {
        self.properties.push(PropertyDescriptor::new(name, model_type));
        self
    }

    /// Finish building this type.
    pub fn done(self) -> SchemaResult<ModelType> {
        if self.builder.schemas.contains_key(&self.model_type) {
            return Err(SchemaError::DuplicateType(self.model_type));
        }

        let mut properties = IndexMap::with_capacity(self.properties.len());
        for property in self.properties {
            if properties.contains_key(&property.name) {
                return Err(SchemaError::duplicate_property(
                    &self.model_type,
                    property.name,
                ));
            }
            properties.insert(property.name.clone(), property);
        }

        let schema = Schema::managed(self.model_type.clone(), properties);
        self.builder.schemas.insert(self.model_type.clone(), schema);
        Ok(self.model_type)
    }
}
