//! Keel Managed Projections
//!
//! Typed, live views over nodes of the model graph.
//!
//! Responsibilities:
//! - Select a projection for a requested type (managed or plain value)
//! - Hand out views with read-only/writable access and an open/closed lifecycle
//! - Resolve properties lazily by traversing node links, caching per view
//! - Enforce managed-type assignment and write protection
//!
//! # Module Structure
//!
//! - `registry` - ProjectionRegistry, the entry point handing out views
//! - `projection` - Managed and unmanaged projections
//! - `view` - ModelView and its lifecycle
//! - `state` - Per-view property access state
//! - `instance` - Dispatch tables and delegating instances
//! - `facade` - Typed wrappers generated by the `managed!` macro
//! - `error` - Error types for view failures

mod error;
mod facade;
mod instance;
mod lifecycle;
mod projection;
mod registry;
mod state;
mod value;
mod view;

pub use error::{ViewError, ViewResult};
pub use facade::ManagedType;
pub use instance::{DispatchTable, InstanceFactory, ManagedInstance, PropertySlot};
pub use projection::{ManagedProjection, UnmanagedProjection};
pub use registry::ProjectionRegistry;
pub use state::PropertyAccessState;
pub use value::{FromPropertyValue, PropertyValue};
pub use view::ModelView;

/// Support items for the `managed!` macro. Not part of the public API.
#[doc(hidden)]
pub mod __private {
    pub use keel_core::ModelType;
    pub use keel_graph::ModelGraph;
    pub use keel_schema::{SchemaResult, SchemaStoreBuilder};
}
