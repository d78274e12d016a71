//! Core graph storage implementation.

use crate::index::PathIndex;
use crate::node::{Initializer, ModelNode, NodeState, PrivateData};
use crate::{GraphConfig, GraphError, GraphResult};
use keel_core::{GraphId, ModelPath, ModelType, NodeId, Value};
use keel_schema::SchemaStore;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Arena slot. The generation is bumped every time the slot is vacated.
#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    node: Option<ModelNode>,
}

/// The in-memory model graph.
///
/// Nodes live in an arena and are addressed by [`NodeId`]s that carry the
/// generation of their slot, so ids outliving a removed subtree never alias a
/// newer node.
#[derive(Debug)]
pub struct ModelGraph {
    /// Identity of this graph
    id: GraphId,
    /// Graph configuration
    config: GraphConfig,
    /// Schema store shared with projections
    schemas: Arc<SchemaStore>,
    /// Node arena
    slots: Vec<Slot>,
    /// Vacated slot indices
    free: Vec<u32>,
    /// Path index
    path_index: PathIndex,
}

impl ModelGraph {
    /// Create a new empty graph.
    pub fn new(schemas: Arc<SchemaStore>) -> Self {
        Self::with_config(schemas, GraphConfig::default())
    }

    /// Create a new empty graph with custom configuration.
    pub fn with_config(schemas: Arc<SchemaStore>, config: GraphConfig) -> Self {
        Self {
            id: GraphId::new(),
            config,
            schemas,
            slots: Vec::new(),
            free: Vec::new(),
            path_index: PathIndex::new(),
        }
    }

    /// Identity of this graph. Node ids are only meaningful to the graph
    /// that issued them.
    pub fn id(&self) -> GraphId {
        self.id
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn schemas(&self) -> &Arc<SchemaStore> {
        &self.schemas
    }

    // ==================== Builder Phase ====================

    /// Register a node at the given path.
    pub fn add_node(&mut self, path: ModelPath, model_type: ModelType) -> GraphResult<NodeId> {
        self.schemas.schema(&model_type)?;
        if self.path_index.contains(&path) {
            return Err(GraphError::DuplicatePath(path));
        }

        let id = self.alloc(ModelNode::new(path.clone(), model_type));
        trace!(path = %path, node = %id, "node registered");
        self.path_index.insert(path, id);
        Ok(id)
    }

    /// Register a node below `parent` and link it under `name`.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: &str,
        model_type: ModelType,
    ) -> GraphResult<NodeId> {
        let path = {
            let parent_node = self.node(parent)?;
            if parent_node.links.contains_key(name) {
                return Err(GraphError::DuplicateLink {
                    path: parent_node.path.clone(),
                    name: name.to_string(),
                });
            }
            parent_node.path.child(name)
        };

        let child = self.add_node(path, model_type)?;
        self.node_mut(parent)?.links.insert(name.to_string(), child);
        Ok(child)
    }

    /// Link an existing node under `name` of `parent`.
    pub fn link(&mut self, parent: NodeId, name: &str, target: NodeId) -> GraphResult<()> {
        self.node(target)?;
        let parent_node = self.node_mut(parent)?;
        if parent_node.links.contains_key(name) {
            return Err(GraphError::DuplicateLink {
                path: parent_node.path.clone(),
                name: name.to_string(),
            });
        }
        parent_node.links.insert(name.to_string(), target);
        Ok(())
    }

    /// Register a node and, for managed types, defer the creation of one
    /// linked child per schema property until the node is made usable.
    pub fn instantiate(&mut self, path: ModelPath, model_type: ModelType) -> GraphResult<NodeId> {
        let id = self.add_node(path, model_type)?;
        self.defer_properties(id)?;
        Ok(id)
    }

    /// Like [`instantiate`](Self::instantiate), linked under `name` of `parent`.
    pub fn instantiate_child(
        &mut self,
        parent: NodeId,
        name: &str,
        model_type: ModelType,
    ) -> GraphResult<NodeId> {
        let id = self.add_child(parent, name, model_type)?;
        self.defer_properties(id)?;
        Ok(id)
    }

    /// Append a deferred initializer. Initializers run in the order added.
    pub fn add_initializer(&mut self, id: NodeId, initializer: Initializer) -> GraphResult<()> {
        let node = self.node_mut(id)?;
        let existing = match std::mem::replace(&mut node.state, NodeState::Initializing) {
            NodeState::Registered(existing) => existing,
            other => {
                let path = node.path.clone();
                node.state = other;
                return Err(GraphError::link_unresolved(
                    path,
                    "node is no longer registered",
                ));
            }
        };

        let combined = match existing {
            None => initializer,
            Some(mut first) => {
                let mut then = initializer;
                Box::new(move |graph: &mut ModelGraph, id: NodeId| {
                    first(graph, id)?;
                    then(graph, id)
                }) as Initializer
            }
        };
        node.state = NodeState::Registered(Some(combined));
        Ok(())
    }

    fn defer_properties(&mut self, id: NodeId) -> GraphResult<()> {
        let model_type = self.node(id)?.model_type.clone();
        if self.schemas.kind(&model_type)?.is_managed() {
            self.add_initializer(
                id,
                Box::new(|graph: &mut ModelGraph, id: NodeId| graph.create_property_nodes(id)),
            )?;
        }
        Ok(())
    }

    fn create_property_nodes(&mut self, id: NodeId) -> GraphResult<()> {
        let model_type = self.node(id)?.model_type.clone();
        let schema = self.schemas.schema(&model_type)?;
        for property in schema.properties().values() {
            if self.node(id)?.links.contains_key(&property.name) {
                continue;
            }
            self.instantiate_child(id, &property.name, property.model_type.clone())?;
        }
        Ok(())
    }

    // ==================== Node Access ====================

    /// Get a node by ID.
    pub fn node(&self, id: NodeId) -> GraphResult<&ModelNode> {
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_ref())
            .ok_or(GraphError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> GraphResult<&mut ModelNode> {
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_mut())
            .ok_or(GraphError::NodeNotFound(id))
    }

    /// Check if an id refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_ok()
    }

    /// Find a node by path.
    pub fn node_at(&self, path: &ModelPath) -> Option<NodeId> {
        self.path_index.get(path)
    }

    pub fn path(&self, id: NodeId) -> GraphResult<&ModelPath> {
        self.node(id).map(|n| &n.path)
    }

    pub fn model_type(&self, id: NodeId) -> GraphResult<&ModelType> {
        self.node(id).map(|n| &n.model_type)
    }

    pub fn is_usable(&self, id: NodeId) -> bool {
        self.node(id).map(|n| n.state.is_usable()).unwrap_or(false)
    }

    /// Named links of a node, in the order they were established.
    pub fn links(&self, id: NodeId) -> GraphResult<impl Iterator<Item = (&str, NodeId)> + '_> {
        Ok(self
            .node(id)?
            .links
            .iter()
            .map(|(name, target)| (name.as_str(), *target)))
    }

    /// Fetch a pre-established link. Links are never created here.
    pub fn get_link(&self, id: NodeId, name: &str) -> GraphResult<NodeId> {
        let node = self.node(id)?;
        let target = node.link(name).ok_or_else(|| {
            GraphError::link_unresolved(
                node.path.child(name),
                format!("no link '{}' established on {}", name, node.path),
            )
        })?;
        if !self.contains(target) {
            return Err(GraphError::link_unresolved(
                node.path.child(name),
                "link target has been removed",
            ));
        }
        Ok(target)
    }

    /// Make a node usable, running its deferred initializer at most once.
    pub fn ensure_usable(&mut self, id: NodeId) -> GraphResult<()> {
        let node = self.node_mut(id)?;
        match std::mem::replace(&mut node.state, NodeState::Initializing) {
            NodeState::Usable | NodeState::Registered(None) => {
                node.state = NodeState::Usable;
                Ok(())
            }
            NodeState::Initializing => Err(GraphError::link_unresolved(
                node.path.clone(),
                "node is already being initialized",
            )),
            NodeState::Broken(reason) => {
                let path = node.path.clone();
                node.state = NodeState::Broken(reason.clone());
                Err(GraphError::link_unresolved(path, reason))
            }
            NodeState::Registered(Some(mut initializer)) => {
                let path = node.path.clone();
                debug!(path = %path, "running deferred initializer");
                match initializer(self, id) {
                    Ok(()) => {
                        self.node_mut(id)?.state = NodeState::Usable;
                        Ok(())
                    }
                    Err(err) => {
                        warn!(path = %path, error = %err, "deferred initializer failed");
                        let reason = err.to_string();
                        let retain = self.config.retain_failed_initializers;
                        if let Ok(node) = self.node_mut(id) {
                            node.state = if retain {
                                NodeState::Registered(Some(initializer))
                            } else {
                                NodeState::Broken(reason.clone())
                            };
                        }
                        Err(GraphError::link_unresolved(path, reason))
                    }
                }
            }
        }
    }

    // ==================== Private Data ====================

    pub fn private_data(&self, id: NodeId) -> GraphResult<Option<&PrivateData>> {
        self.node(id).map(|n| n.private_data.as_ref())
    }

    /// Stored leaf value of a node, if any.
    pub fn value(&self, id: NodeId) -> GraphResult<Option<&Value>> {
        self.node(id).map(|n| n.value())
    }

    /// Store opaque data on a node, checked against `model_type`.
    ///
    /// Values must be accepted by the type's schema; references must point at
    /// a live node of exactly `model_type`, which must be managed.
    pub fn set_private_data(
        &mut self,
        id: NodeId,
        model_type: &ModelType,
        data: PrivateData,
    ) -> GraphResult<()> {
        let schema = self.schemas.schema(model_type)?;
        let node = self.node(id)?;
        if &node.model_type != model_type {
            return Err(GraphError::type_mismatch(
                &node.path,
                &node.model_type,
                model_type.name(),
            ));
        }

        match &data {
            PrivateData::Value(value) => {
                if !schema.accepts_value(value) {
                    return Err(GraphError::type_mismatch(
                        &node.path,
                        model_type,
                        value.type_name(),
                    ));
                }
            }
            PrivateData::Reference(target) => {
                if !schema.kind().is_managed() {
                    return Err(GraphError::type_mismatch(
                        &node.path,
                        model_type,
                        "managed reference",
                    ));
                }
                let target_type = self.model_type(*target)?;
                if target_type != model_type {
                    return Err(GraphError::type_mismatch(
                        &node.path,
                        model_type,
                        target_type.name(),
                    ));
                }
            }
        }

        let node = self.node_mut(id)?;
        trace!(path = %node.path, data = ?data, "private data stored");
        node.private_data = Some(data);
        Ok(())
    }

    /// Follow references from `id` to the node that holds the actual state.
    pub fn resolve(&self, id: NodeId) -> GraphResult<NodeId> {
        let depth = self.config.max_reference_depth;
        let mut current = id;
        let mut hops = 0;
        while let Some(PrivateData::Reference(target)) = &self.node(current)?.private_data {
            if hops == depth {
                return Err(GraphError::ReferenceDepthExceeded {
                    path: self.path(id)?.clone(),
                    depth,
                });
            }
            current = *target;
            hops += 1;
        }
        Ok(current)
    }

    // ==================== Teardown ====================

    /// Remove a node and every node registered below its path.
    ///
    /// Linked nodes that live elsewhere in the tree are left alone. Returns
    /// the number of nodes removed.
    pub fn remove_subtree(&mut self, id: NodeId) -> GraphResult<usize> {
        let path = self.path(id)?.clone();

        if let (Some(parent_path), Some(name)) = (path.parent(), path.name()) {
            if let Some(parent) = self.path_index.get(&parent_path) {
                if let Ok(parent_node) = self.node_mut(parent) {
                    if parent_node.links.get(name) == Some(&id) {
                        parent_node.links.shift_remove(name);
                    }
                }
            }
        }

        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.take(current) else {
                continue;
            };
            for child in node.links.values() {
                if let Ok(child_node) = self.node(*child) {
                    if node.path.is_ancestor_of(&child_node.path) {
                        stack.push(*child);
                    }
                }
            }
            self.path_index.remove(&node.path);
            removed += 1;
        }

        debug!(path = %path, removed, "subtree removed");
        Ok(removed)
    }

    fn alloc(&mut self, node: ModelNode) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId::new(index, 0)
        }
    }

    fn take(&mut self, id: NodeId) -> Option<ModelNode> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index());
        Some(node)
    }

    // ==================== Statistics ====================

    /// Get the number of live nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.path_index.len()
    }
}
