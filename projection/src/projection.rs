//! Projections: strategies turning a node into a view of a given type.

use crate::lifecycle::ViewLifecycle;
use crate::state::PropertyAccessState;
use crate::{ModelView, ProjectionRegistry, ViewError, ViewResult};
use keel_core::{GraphId, ModelPath, ModelType, NodeId, RuleDescriptor};
use keel_schema::{Schema, SchemaStore};
use std::rc::Rc;
use std::sync::Arc;

/// Projection of managed types: views whose properties are child nodes.
#[derive(Debug)]
pub struct ManagedProjection {
    schema: Arc<Schema>,
}

impl ManagedProjection {
    /// Resolve the schema of `model_type` once, up front.
    pub fn new(model_type: &ModelType, schemas: &SchemaStore) -> ViewResult<Self> {
        let schema = schemas.schema(model_type)?;
        if !schema.kind().is_managed() {
            return Err(ViewError::NotManaged(model_type.clone()));
        }
        Ok(Self { schema })
    }

    pub fn model_type(&self) -> &ModelType {
        self.schema.model_type()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Create a view of `node` of `graph`. The view owns fresh property
    /// access state.
    pub fn to_view(
        &self,
        registry: &ProjectionRegistry,
        graph: GraphId,
        node: NodeId,
        path: ModelPath,
        rule: RuleDescriptor,
        writable: bool,
    ) -> ModelView {
        let lifecycle = ViewLifecycle::new(writable);
        let state = PropertyAccessState::new(
            graph,
            node,
            path.clone(),
            self.schema.clone(),
            rule.clone(),
            lifecycle.clone(),
            registry.clone(),
        );
        ModelView::managed(
            self.schema.model_type().clone(),
            path,
            rule,
            lifecycle,
            Rc::new(state),
        )
    }
}

/// Projection of plain value types: leaf views over a node's private data.
#[derive(Debug)]
pub struct UnmanagedProjection {
    schema: Arc<Schema>,
}

impl UnmanagedProjection {
    pub fn new(model_type: &ModelType, schemas: &SchemaStore) -> ViewResult<Self> {
        Ok(Self {
            schema: schemas.schema(model_type)?,
        })
    }

    pub fn model_type(&self) -> &ModelType {
        self.schema.model_type()
    }

    pub fn to_view(
        &self,
        node: NodeId,
        path: ModelPath,
        rule: RuleDescriptor,
        writable: bool,
    ) -> ModelView {
        ModelView::unmanaged(
            self.schema.model_type().clone(),
            node,
            path,
            rule,
            ViewLifecycle::new(writable),
        )
    }
}
