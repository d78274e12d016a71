//! How views traverse the graph: links, initializers, references and teardown.

use keel_tests::prelude::*;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

fn path(s: &str) -> ModelPath {
    s.parse().unwrap()
}

mod links {
    use super::*;
    use keel_tests::prelude::assert_eq;

    // ========== TEST: missing_link_is_unresolved ==========
    #[test]
    fn test_missing_link_is_unresolved() {
        // GIVEN a Toolchain registered without property nodes
        let mut fx = Fixture::new().unwrap();
        let id = fx.graph.add_node(path("gcc"), "Toolchain".into()).unwrap();
        let gcc: Toolchain = fx.writable(id).unwrap();

        // WHEN a property is read or written
        let read = gcc.name(&mut fx.graph).unwrap_err();
        let write = gcc.set_name(&mut fx.graph, "gcc").unwrap_err();

        // THEN both fail AND no link was created
        assert!(read.is_link_unresolved());
        assert!(write.is_link_unresolved());
        assert_eq!(fx.graph.links(id).unwrap().count(), 0);
    }

    #[test]
    fn test_hand_built_links_are_followed() {
        let mut fx = Fixture::new().unwrap();
        let id = fx.graph.add_node(path("gcc"), "Toolchain".into()).unwrap();
        let shared = fx.graph.add_node(path("names.gnu"), "String".into()).unwrap();
        fx.graph.link(id, "name", shared).unwrap();
        fx.graph
            .set_private_data(shared, &"String".into(), PrivateData::Value("gnu".into()))
            .unwrap();

        let gcc: Toolchain = fx.read_only(id).unwrap();
        assert_eq!(gcc.name(&mut fx.graph).unwrap(), Some("gnu".to_string()));
    }

    #[test]
    fn test_unknown_property() {
        let mut fx = Fixture::new().unwrap();
        let id = fx.instantiate(path("gcc"), "Toolchain").unwrap();
        let gcc = fx.writable_view(id, "Toolchain").unwrap().managed_instance().unwrap();

        let err = gcc.get(&mut fx.graph, "linker").unwrap_err();
        assert!(matches!(err, ViewError::UnknownProperty { .. }));
        assert_eq!(
            err.to_string(),
            "Property 'linker' is not declared by type 'Toolchain'"
        );
    }

    #[test]
    fn test_property_names_follow_declaration_order() {
        let mut fx = Fixture::new().unwrap();
        let id = fx.instantiate(path("app"), "Binary").unwrap();
        let app = fx.read_only_view(id, "Binary").unwrap().managed_instance().unwrap();

        let names: Vec<_> = app.property_names().collect();
        assert_eq!(names, vec!["name", "toolchain", "platform", "flags", "optimize"]);
    }

    #[test]
    fn test_requesting_wrong_type_is_type_mismatch() {
        let mut fx = Fixture::new().unwrap();
        let id = fx.instantiate(path("gcc"), "Toolchain").unwrap();

        let err = fx.writable_view(id, "Platform").unwrap_err();
        assert!(err.is_type_mismatch());
        let err = fx.read_only::<Binary>(id).unwrap_err();
        assert!(err.is_type_mismatch());
    }

    #[test]
    fn test_requesting_unknown_type() {
        let mut fx = Fixture::new().unwrap();
        let id = fx.instantiate(path("gcc"), "Toolchain").unwrap();

        let err = fx.writable_view(id, "Linker").unwrap_err();
        assert!(matches!(err, ViewError::Schema(SchemaError::UnknownType(_))));
        assert_eq!(err.to_string(), "No schema registered for type Linker");
    }
}

mod deferred_initialization {
    use super::*;
    use keel_tests::prelude::assert_eq;

    // ========== TEST: initializer_runs_once_on_first_access ==========
    #[test]
    fn test_initializer_runs_once_on_first_access() {
        // GIVEN a name node whose value is computed lazily
        let mut fx = Fixture::new().unwrap();
        let id = fx.instantiate(path("gcc"), "Toolchain").unwrap();
        fx.graph.ensure_usable(id).unwrap();
        let name = fx.graph.get_link(id, "name").unwrap();
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        fx.graph
            .add_initializer(
                name,
                Box::new(move |graph: &mut ModelGraph, id: NodeId| {
                    counter.set(counter.get() + 1);
                    graph.set_private_data(id, &"String".into(), PrivateData::Value("gcc".into()))
                }),
            )
            .unwrap();
        assert!(!fx.graph.is_usable(name));

        // WHEN read through two different views
        let first: Toolchain = fx.read_only(id).unwrap();
        let second: Toolchain = fx.writable(id).unwrap();
        assert_eq!(first.name(&mut fx.graph).unwrap(), Some("gcc".to_string()));
        assert_eq!(second.name(&mut fx.graph).unwrap(), Some("gcc".to_string()));

        // THEN the initializer ran exactly once
        assert_eq!(runs.get(), 1);
        assert!(fx.graph.is_usable(name));
    }

    #[test]
    fn test_failing_initializer_surfaces_as_unresolved_link() {
        let mut fx = Fixture::new().unwrap();
        let id = fx.instantiate(path("gcc"), "Toolchain").unwrap();
        fx.graph.ensure_usable(id).unwrap();
        let version = fx.graph.get_link(id, "version").unwrap();
        let attempts = Rc::new(Cell::new(0));
        let counter = attempts.clone();
        fx.graph
            .add_initializer(
                version,
                Box::new(move |graph: &mut ModelGraph, id: NodeId| -> GraphResult<()> {
                    counter.set(counter.get() + 1);
                    if counter.get() == 1 {
                        return Err(GraphError::link_unresolved(
                            graph.path(id)?.clone(),
                            "version not probed yet",
                        ));
                    }
                    graph.set_private_data(id, &"Int".into(), PrivateData::Value(Value::Int(13)))
                }),
            )
            .unwrap();
        let gcc: Toolchain = fx.read_only(id).unwrap();

        // First attempt fails and is not cached
        assert!(gcc.version(&mut fx.graph).unwrap_err().is_link_unresolved());
        // The initializer is retained, so the next read retries it
        assert_eq!(gcc.version(&mut fx.graph).unwrap(), Some(13));
        assert_eq!(attempts.get(), 2);
    }

    #[test]
    fn test_strict_config_breaks_node_after_failure() {
        let mut fx = Fixture::with_config(GraphConfig::strict()).unwrap();
        let id = fx.instantiate(path("gcc"), "Toolchain").unwrap();
        fx.graph.ensure_usable(id).unwrap();
        let version = fx.graph.get_link(id, "version").unwrap();
        fx.graph
            .add_initializer(
                version,
                Box::new(|graph: &mut ModelGraph, id: NodeId| -> GraphResult<()> {
                    Err(GraphError::link_unresolved(graph.path(id)?.clone(), "probe failed"))
                }),
            )
            .unwrap();
        let gcc: Toolchain = fx.read_only(id).unwrap();

        assert!(gcc.version(&mut fx.graph).unwrap_err().is_link_unresolved());
        let err = gcc.version(&mut fx.graph).unwrap_err();
        assert!(err.to_string().contains("probe failed"));
    }

    #[test]
    fn test_self_referencing_type_is_created_lazily() {
        let mut builder = SchemaStoreBuilder::new();
        builder
            .add_managed("Module")
            .property("name", "String")
            .property("parent", "Module")
            .done()
            .unwrap();
        let schemas = Arc::new(builder.build().unwrap());
        let mut graph = ModelGraph::new(schemas.clone());
        let registry = ProjectionRegistry::new(schemas);
        let rule = RuleDescriptor::new("configure");
        let module = graph.instantiate(path("core"), "Module".into()).unwrap();

        let core = registry
            .as_writable(&mut graph, module, &"Module".into(), &rule)
            .unwrap()
            .managed_instance()
            .unwrap();
        let parent = core.get_as::<ManagedInstance>(&mut graph, "parent").unwrap();
        let grandparent = parent.get_as::<ManagedInstance>(&mut graph, "parent").unwrap();
        grandparent.set(&mut graph, "name", "root").unwrap();

        assert_eq!(grandparent.display_name(), "Module 'core.parent.parent'");
        assert_eq!(graph.node_count(), 7);
    }
}

mod references {
    use super::*;
    use keel_tests::prelude::{assert_eq, assert_ne};

    #[test]
    fn test_reassignment_is_observed_after_eviction() {
        // GIVEN two toolchains AND a binary using the first
        let mut fx = Fixture::new().unwrap();
        let gcc = fx.instantiate(path("toolchains.gcc"), "Toolchain").unwrap();
        let clang = fx.instantiate(path("toolchains.clang"), "Toolchain").unwrap();
        let app = fx.instantiate(path("app"), "Binary").unwrap();
        let gcc: Toolchain = fx.writable(gcc).unwrap();
        let clang: Toolchain = fx.writable(clang).unwrap();
        gcc.set_name(&mut fx.graph, "gcc").unwrap();
        clang.set_name(&mut fx.graph, "clang").unwrap();
        let app: Binary = fx.writable(app).unwrap();
        app.set_toolchain(&mut fx.graph, &gcc).unwrap();
        let before = app.toolchain(&mut fx.graph).unwrap();

        // WHEN the toolchain is reassigned
        app.set_toolchain(&mut fx.graph, &clang).unwrap();

        // THEN the next read sees the new toolchain
        let after = app.toolchain(&mut fx.graph).unwrap();
        assert_eq!(before.name(&mut fx.graph).unwrap(), Some("gcc".to_string()));
        assert_eq!(after.name(&mut fx.graph).unwrap(), Some("clang".to_string()));
        assert_ne!(before, after);
    }

    #[test]
    fn test_assigning_a_property_its_own_instance_is_a_no_op() {
        let mut fx = Fixture::new().unwrap();
        let app = fx.instantiate(path("app"), "Binary").unwrap();
        let app: Binary = fx.writable(app).unwrap();
        let own = app.platform(&mut fx.graph).unwrap();
        own.set_architecture(&mut fx.graph, "x86_64").unwrap();

        app.set_platform(&mut fx.graph, &own).unwrap();

        let platform = app.platform(&mut fx.graph).unwrap();
        assert_eq!(platform.instance().node(), own.instance().node());
        assert_eq!(
            platform.architecture(&mut fx.graph).unwrap(),
            Some("x86_64".to_string())
        );
    }

    #[test]
    fn test_reference_chain_depth_is_bounded() {
        let mut fx = Fixture::with_config(GraphConfig::new().with_max_reference_depth(1)).unwrap();
        let a = fx.instantiate(path("a"), "Toolchain").unwrap();
        let b = fx.instantiate(path("b"), "Toolchain").unwrap();
        let c = fx.instantiate(path("c"), "Toolchain").unwrap();
        let toolchain = Toolchain::model_type();
        fx.graph.set_private_data(a, &toolchain, PrivateData::Reference(b)).unwrap();
        fx.graph.set_private_data(b, &toolchain, PrivateData::Reference(c)).unwrap();

        assert_eq!(fx.read_only_view(b, "Toolchain").unwrap().node(), c);
        let err = fx.read_only_view(a, "Toolchain").unwrap_err();
        assert!(matches!(
            err,
            ViewError::Graph(GraphError::ReferenceDepthExceeded { depth: 1, .. })
        ));
    }
}

mod teardown {
    use super::*;
    use keel_tests::prelude::{assert_eq, assert_ne};

    #[test]
    fn test_stale_ids_fail_after_removal() {
        let mut fx = Fixture::new().unwrap();
        let id = fx.instantiate(path("gcc"), "Toolchain").unwrap();
        let gcc: Toolchain = fx.writable(id).unwrap();
        gcc.set_name(&mut fx.graph, "gcc").unwrap();

        fx.graph.remove_subtree(id).unwrap();
        let replacement = fx.instantiate(path("gcc"), "Toolchain").unwrap();

        assert_ne!(replacement, id);
        let err = fx.writable_view(id, "Toolchain").unwrap_err();
        assert!(matches!(err, ViewError::Graph(GraphError::NodeNotFound(_))));
        // The old view cannot reach the new node's children either
        assert!(gcc.version(&mut fx.graph).is_err());
    }

    #[test]
    fn test_cached_values_survive_removal() {
        let mut fx = Fixture::new().unwrap();
        let id = fx.instantiate(path("gcc"), "Toolchain").unwrap();
        let gcc: Toolchain = fx.writable(id).unwrap();
        gcc.set_name(&mut fx.graph, "gcc").unwrap();
        assert_eq!(gcc.name(&mut fx.graph).unwrap(), Some("gcc".to_string()));

        fx.graph.remove_subtree(id).unwrap();

        assert_eq!(gcc.name(&mut fx.graph).unwrap(), Some("gcc".to_string()));
        assert!(gcc.set_name(&mut fx.graph, "clang").is_err());
    }
}
