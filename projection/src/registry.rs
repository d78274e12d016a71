//! ProjectionRegistry - the entry point handing out views.

use crate::{InstanceFactory, ManagedProjection, ModelView, UnmanagedProjection, ViewResult};
use keel_core::{ModelType, NodeId, RuleDescriptor};
use keel_graph::{GraphError, ModelGraph};
use keel_schema::SchemaStore;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use tracing::debug;

struct RegistryInner {
    schemas: Arc<SchemaStore>,
    factory: InstanceFactory,
    managed: RefCell<HashMap<ModelType, Rc<ManagedProjection>>>,
    unmanaged: RefCell<HashMap<ModelType, Rc<UnmanagedProjection>>>,
}

/// Selects a projection per requested type and hands out views.
///
/// Cloning is cheap; clones share projections and dispatch tables.
#[derive(Clone)]
pub struct ProjectionRegistry {
    inner: Rc<RegistryInner>,
}

impl ProjectionRegistry {
    pub fn new(schemas: Arc<SchemaStore>) -> Self {
        Self {
            inner: Rc::new(RegistryInner {
                schemas,
                factory: InstanceFactory::new(),
                managed: RefCell::new(HashMap::new()),
                unmanaged: RefCell::new(HashMap::new()),
            }),
        }
    }

    pub fn schemas(&self) -> &Arc<SchemaStore> {
        &self.inner.schemas
    }

    pub fn factory(&self) -> &InstanceFactory {
        &self.inner.factory
    }

    /// Projection for a managed type, created once per type.
    pub fn managed_projection(&self, model_type: &ModelType) -> ViewResult<Rc<ManagedProjection>> {
        if let Some(projection) = self.inner.managed.borrow().get(model_type) {
            return Ok(projection.clone());
        }
        let projection = Rc::new(ManagedProjection::new(model_type, &self.inner.schemas)?);
        self.inner
            .managed
            .borrow_mut()
            .insert(model_type.clone(), projection.clone());
        Ok(projection)
    }

    /// Projection for a plain value type, created once per type.
    pub fn unmanaged_projection(
        &self,
        model_type: &ModelType,
    ) -> ViewResult<Rc<UnmanagedProjection>> {
        if let Some(projection) = self.inner.unmanaged.borrow().get(model_type) {
            return Ok(projection.clone());
        }
        let projection = Rc::new(UnmanagedProjection::new(model_type, &self.inner.schemas)?);
        self.inner
            .unmanaged
            .borrow_mut()
            .insert(model_type.clone(), projection.clone());
        Ok(projection)
    }

    /// Number of projections created so far.
    pub fn projection_count(&self) -> usize {
        self.inner.managed.borrow().len() + self.inner.unmanaged.borrow().len()
    }

    // ==================== Views ====================

    /// Get a read-only view of `node` at `model_type`.
    pub fn as_read_only(
        &self,
        graph: &mut ModelGraph,
        node: NodeId,
        model_type: &ModelType,
        rule: &RuleDescriptor,
    ) -> ViewResult<ModelView> {
        self.view(graph, node, model_type, rule, false)
    }

    /// Get a writable view of `node` at `model_type`.
    pub fn as_writable(
        &self,
        graph: &mut ModelGraph,
        node: NodeId,
        model_type: &ModelType,
        rule: &RuleDescriptor,
    ) -> ViewResult<ModelView> {
        self.view(graph, node, model_type, rule, true)
    }

    /// Run `f` with a writable view that is closed afterwards, whatever `f`
    /// returns.
    pub fn with_writable<R>(
        &self,
        graph: &mut ModelGraph,
        node: NodeId,
        model_type: &ModelType,
        rule: &RuleDescriptor,
        f: impl FnOnce(&mut ModelGraph, &ModelView) -> ViewResult<R>,
    ) -> ViewResult<R> {
        let view = self.as_writable(graph, node, model_type, rule)?;
        let result = f(graph, &view);
        view.close();
        result
    }

    /// Run `f` with a read-only view that is closed afterwards.
    pub fn with_read_only<R>(
        &self,
        graph: &mut ModelGraph,
        node: NodeId,
        model_type: &ModelType,
        rule: &RuleDescriptor,
        f: impl FnOnce(&mut ModelGraph, &ModelView) -> ViewResult<R>,
    ) -> ViewResult<R> {
        let view = self.as_read_only(graph, node, model_type, rule)?;
        let result = f(graph, &view);
        view.close();
        result
    }

    fn view(
        &self,
        graph: &mut ModelGraph,
        node: NodeId,
        model_type: &ModelType,
        rule: &RuleDescriptor,
        writable: bool,
    ) -> ViewResult<ModelView> {
        let managed = self.inner.schemas.kind(model_type)?.is_managed();

        // The node's own initializer may store a reference, so it runs first
        graph.ensure_usable(node)?;
        let target = graph.resolve(node)?;
        graph.ensure_usable(target)?;

        let actual = graph.model_type(target)?;
        if actual != model_type {
            return Err(
                GraphError::type_mismatch(graph.path(target)?, model_type, actual.name()).into(),
            );
        }
        let path = graph.path(target)?.clone();

        let view = if managed {
            self.managed_projection(model_type)?
                .to_view(self, graph.id(), target, path, rule.clone(), writable)
        } else {
            self.unmanaged_projection(model_type)?
                .to_view(target, path, rule.clone(), writable)
        };

        debug!(
            path = %view.path(),
            model_type = %model_type,
            rule = %rule,
            writable,
            "view created"
        );
        Ok(view)
    }
}

impl fmt::Debug for ProjectionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectionRegistry")
            .field("types", &self.inner.schemas.type_count())
            .field("projections", &self.projection_count())
            .field("dispatch_tables", &self.inner.factory.table_count())
            .finish()
    }
}
