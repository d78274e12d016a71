//! Keel Graph Storage
//!
//! This crate provides the addressable node graph the model lives in:
//! - Arena storage of nodes addressed by generation-checked ids
//! - Path index: find a node by its model path
//! - Named child links, established during the builder phase
//! - Deferred initialization (registered -> usable)
//! - Opaque private data on leaf nodes and references between composites

mod config;
mod error;
mod graph;
mod index;
mod node;

pub use config::GraphConfig;
pub use error::{GraphError, GraphResult};
pub use graph::*;
pub use node::{Initializer, ModelNode, NodeState, PrivateData};
