//! Keel Schema Store
//!
//! Runtime schema lookup for model types. A schema is the ordered set of
//! named, typed properties of a managed type, or the value constraint of an
//! unmanaged one. The store is immutable after construction via
//! SchemaStoreBuilder and is shared between the graph and the projections.

mod builder;
mod error;
mod store;
mod types;

pub use builder::{ManagedTypeBuilder, SchemaStoreBuilder};
pub use error::{SchemaError, SchemaResult};
pub use store::SchemaStore;
pub use types::*;
