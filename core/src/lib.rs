//! Keel Core Types
//!
//! This crate provides the foundational types shared by the configuration model:
//! - Identity types (NodeId with slot generation, GraphId per graph)
//! - Addressing (ModelPath)
//! - Type descriptors (ModelType) and rule descriptors (RuleDescriptor)
//! - Leaf values (the Value enum)

mod descriptor;
mod id;
mod path;
mod value;

pub use descriptor::*;
pub use id::*;
pub use path::*;
pub use value::*;
