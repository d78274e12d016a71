//! The build model exercised by the integration tests.

use keel_core::Value;
use keel_projection::{managed, ManagedType};
use keel_schema::{SchemaResult, SchemaStore, SchemaStoreBuilder};

managed! {
    /// A compiler toolchain.
    pub struct Toolchain: "Toolchain" {
        name, set_name: Option<String> => "String";
        version, set_version: Option<i64> => "Int";
    }
}

managed! {
    /// A target platform.
    pub struct Platform: "Platform" {
        name, set_name: Option<String> => "String";
        architecture, set_architecture: Option<String> => "String";
    }
}

managed! {
    /// A linked executable.
    pub struct Binary: "Binary" {
        name, set_name: Option<String> => "String";
        toolchain, set_toolchain: Toolchain => "Toolchain";
        platform, set_platform: Platform => "Platform";
        /// Free-form linker flags.
        flags, set_flags: Value => "Flags";
        optimize, set_optimize: Option<bool> => "Bool";
    }
}

/// Schema store with every test type registered.
pub fn schemas() -> SchemaResult<SchemaStore> {
    let mut builder = SchemaStoreBuilder::new();
    builder.add_unmanaged("Flags", None)?;
    Toolchain::declare(&mut builder)?;
    Platform::declare(&mut builder)?;
    Binary::declare(&mut builder)?;
    builder.build()
}
