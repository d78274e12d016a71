//! Node structures for the model graph.

use crate::{GraphResult, ModelGraph};
use indexmap::IndexMap;
use keel_core::{ModelPath, ModelType, NodeId, Value};
use std::fmt;

/// Deferred initialization run the first time a node is made usable.
///
/// It may establish links, create child nodes and store private data.
pub type Initializer = Box<dyn FnMut(&mut ModelGraph, NodeId) -> GraphResult<()>>;

/// Lifecycle state of a node.
pub enum NodeState {
    /// Created by the builder phase, not yet usable.
    Registered(Option<Initializer>),
    /// Initializer currently running.
    Initializing,
    /// Ready for access.
    Usable,
    /// Initializer failed and was discarded.
    Broken(String),
}

impl NodeState {
    pub fn is_usable(&self) -> bool {
        matches!(self, NodeState::Usable)
    }
}

impl fmt::Debug for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeState::Registered(init) => f
                .debug_tuple("Registered")
                .field(&init.as_ref().map(|_| "<initializer>"))
                .finish(),
            NodeState::Initializing => write!(f, "Initializing"),
            NodeState::Usable => write!(f, "Usable"),
            NodeState::Broken(reason) => f.debug_tuple("Broken").field(reason).finish(),
        }
    }
}

/// Opaque data held by a node.
#[derive(Debug, Clone, PartialEq)]
pub enum PrivateData {
    /// Plain leaf value.
    Value(Value),
    /// The node stands for another composite node of the same type.
    Reference(NodeId),
}

/// A node in the model graph.
#[derive(Debug)]
pub struct ModelNode {
    /// Path of this node.
    pub path: ModelPath,
    /// Declared type of this node.
    pub model_type: ModelType,
    /// Named child links, in the order they were established.
    pub links: IndexMap<String, NodeId>,
    /// Lifecycle state.
    pub state: NodeState,
    /// Private data, if any has been stored.
    pub private_data: Option<PrivateData>,
}

impl ModelNode {
    pub fn new(path: ModelPath, model_type: ModelType) -> Self {
        Self {
            path,
            model_type,
            links: IndexMap::new(),
            state: NodeState::Registered(None),
            private_data: None,
        }
    }

    /// Get a link target by name.
    pub fn link(&self, name: &str) -> Option<NodeId> {
        self.links.get(name).copied()
    }

    /// Get the stored leaf value, if the private data is a value.
    pub fn value(&self) -> Option<&Value> {
        match &self.private_data {
            Some(PrivateData::Value(value)) => Some(value),
            _ => None,
        }
    }
}
