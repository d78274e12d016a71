//! Indexes for efficient graph lookups.

use keel_core::{ModelPath, NodeId};
use std::collections::HashMap;

/// Path index: ModelPath -> NodeId
#[derive(Debug, Default)]
pub struct PathIndex {
    index: HashMap<ModelPath, NodeId>,
}

impl PathIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &ModelPath) -> bool {
        self.index.contains_key(path)
    }

    pub fn insert(&mut self, path: ModelPath, node_id: NodeId) {
        self.index.insert(path, node_id);
    }

    pub fn remove(&mut self, path: &ModelPath) {
        self.index.remove(path);
    }

    pub fn get(&self, path: &ModelPath) -> Option<NodeId> {
        self.index.get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }
}
