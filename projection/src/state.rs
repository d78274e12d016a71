//! Per-view property access.
//!
//! A [`PropertyAccessState`] backs exactly one managed view. Reads walk the
//! node's links lazily and cache the resulting instance by property name;
//! writes go straight to the child node's private data and evict the cached
//! entry.

use crate::lifecycle::ViewLifecycle;
use crate::{ProjectionRegistry, PropertyValue, ViewError, ViewResult};
use keel_core::{GraphId, ModelPath, ModelType, NodeId, RuleDescriptor};
use keel_graph::{ModelGraph, PrivateData};
use keel_schema::Schema;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use tracing::trace;

/// Property access state of one managed view.
pub struct PropertyAccessState {
    graph: GraphId,
    node: NodeId,
    path: ModelPath,
    schema: Arc<Schema>,
    rule: RuleDescriptor,
    lifecycle: Rc<ViewLifecycle>,
    registry: ProjectionRegistry,
    /// Values handed out by this view, keyed by property name.
    cache: RefCell<HashMap<String, PropertyValue>>,
}

impl PropertyAccessState {
    pub(crate) fn new(
        graph: GraphId,
        node: NodeId,
        path: ModelPath,
        schema: Arc<Schema>,
        rule: RuleDescriptor,
        lifecycle: Rc<ViewLifecycle>,
        registry: ProjectionRegistry,
    ) -> Self {
        Self {
            graph,
            node,
            path,
            schema,
            rule,
            lifecycle,
            registry,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Graph the node belongs to.
    pub fn graph(&self) -> GraphId {
        self.graph
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn path(&self) -> &ModelPath {
        &self.path
    }

    pub fn model_type(&self) -> &ModelType {
        self.schema.model_type()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn rule(&self) -> &RuleDescriptor {
        &self.rule
    }

    pub fn is_writable(&self) -> bool {
        self.lifecycle.is_writable()
    }

    pub fn is_closed(&self) -> bool {
        self.lifecycle.is_closed()
    }

    /// Declared property names, in declaration order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.schema.properties().keys().map(String::as_str)
    }

    /// Human-readable description, e.g. `Toolchain 'model.gcc'`.
    pub fn display_name(&self) -> String {
        format!("{} '{}'", self.schema.model_type(), self.path)
    }

    pub(crate) fn registry(&self) -> &ProjectionRegistry {
        &self.registry
    }

    #[cfg(test)]
    pub(crate) fn is_cached(&self, name: &str) -> bool {
        self.cache.borrow().contains_key(name)
    }

    fn declared_type(&self, name: &str) -> ViewResult<ModelType> {
        self.schema
            .property(name)
            .map(|p| p.model_type.clone())
            .ok_or_else(|| ViewError::unknown_property(name, self.schema.model_type()))
    }

    /// Read a property.
    ///
    /// The first read resolves the child node through its pre-established
    /// link and projects it at the declared type; later reads through this
    /// view are served from the cache.
    pub fn get(&self, graph: &mut ModelGraph, name: &str) -> ViewResult<PropertyValue> {
        if let Some(value) = self.cache.borrow().get(name) {
            trace!(path = %self.path, property = name, "property cache hit");
            return Ok(value.clone());
        }

        let declared = self.declared_type(name)?;
        let child = graph.get_link(self.node, name)?;
        graph.ensure_usable(child)?;

        let value = if self.lifecycle.is_writable() {
            let view = self.registry.as_writable(graph, child, &declared, &self.rule)?;
            if view.is_managed() {
                self.lifecycle.adopt(name, view.lifecycle().clone());
            }
            view.instance(graph)?
        } else {
            let view = self.registry.as_read_only(graph, child, &declared, &self.rule)?;
            view.instance(graph)?
        };

        trace!(path = %self.path, property = name, "property cache miss");
        self.cache
            .borrow_mut()
            .insert(name.to_string(), value.clone());
        Ok(value)
    }

    /// Write a property.
    ///
    /// Fails on read-only or closed views before touching the graph.
    /// Properties of managed type only accept managed instances of the same
    /// graph, which are stored as references to the instance's node.
    pub fn set(&self, graph: &mut ModelGraph, name: &str, value: PropertyValue) -> ViewResult<()> {
        if !self.lifecycle.allows_writes() {
            return Err(ViewError::view_closed(
                self.schema.model_type(),
                &self.path,
                &self.rule,
            ));
        }

        let declared = self.declared_type(name)?;
        let property_schema = self.registry.schemas().schema(&declared)?;
        let rejected = match &value {
            PropertyValue::Managed(instance) => instance.state().graph() != graph.id(),
            PropertyValue::Value(_) => property_schema.kind().is_managed(),
        };
        if rejected {
            return Err(ViewError::invalid_property_value(
                name,
                self.schema.model_type(),
            ));
        }

        let child = graph.get_link(self.node, name)?;
        let data = match value {
            PropertyValue::Value(value) => Some(PrivateData::Value(value)),
            // An instance of the property itself is already its own value
            PropertyValue::Managed(instance) if instance.node() == child => None,
            PropertyValue::Managed(instance) => Some(PrivateData::Reference(instance.node())),
        };

        graph.ensure_usable(child)?;
        if let Some(data) = data {
            graph.set_private_data(child, &declared, data)?;
        }

        self.cache.borrow_mut().remove(name);
        trace!(path = %self.path, property = name, "property written");
        Ok(())
    }
}

impl fmt::Debug for PropertyAccessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyAccessState")
            .field("graph", &self.graph)
            .field("node", &self.node)
            .field("path", &self.path)
            .field("model_type", self.schema.model_type())
            .field("rule", &self.rule)
            .field("lifecycle", &self.lifecycle)
            .field("cached", &self.cache.borrow().len())
            .finish()
    }
}
