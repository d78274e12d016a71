//! Keel Integration Tests
//!
//! Shared fixtures for the scenario and property tests under `tests/`.
//!
//! # Module Structure
//!
//! - `model` - Typed facades and the schema store used by every scenario
//! - `fixture` - Graph, registry and rule bundled for one test

mod model;

pub use fixture::Fixture;
pub use model::{schemas, Binary, Platform, Toolchain};

use tracing_subscriber::EnvFilter;

/// Install a test subscriber honouring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub mod prelude {
    pub use crate::{init_tracing, schemas, Binary, Fixture, Platform, Toolchain};
    pub use keel_core::{ModelPath, ModelType, NodeId, RuleDescriptor, Value};
    pub use keel_graph::{GraphConfig, GraphError, GraphResult, ModelGraph, PrivateData};
    pub use keel_projection::{
        FromPropertyValue, ManagedInstance, ManagedType, ModelView, ProjectionRegistry,
        PropertyValue, ViewError, ViewResult,
    };
    pub use keel_schema::{SchemaError, SchemaStore, SchemaStoreBuilder};
    pub use pretty_assertions::{assert_eq, assert_ne};
}
