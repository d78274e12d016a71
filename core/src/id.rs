//! Identity types for model nodes.
//!
//! A [`NodeId`] addresses a slot in the graph arena. Slots can be reused after
//! a subtree is torn down, so every id also carries the generation of the slot
//! it was issued for. An id whose generation no longer matches its slot is
//! stale and never resolves.
//!
//! A [`GraphId`] tells graphs apart, so ids issued by one graph are never
//! taken for nodes of another.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a node in the model graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// Create a new NodeId from a slot index and generation.
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Arena slot index.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot this id was issued for.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}v{}", self.index, self.generation)
    }
}

/// Process-unique identifier of a model graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphId(u64);

static GRAPH_COUNTER: AtomicU64 = AtomicU64::new(1);

impl GraphId {
    /// Allocate a fresh graph id.
    pub fn new() -> Self {
        Self(GRAPH_COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for GraphId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}
