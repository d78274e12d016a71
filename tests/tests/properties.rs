//! Property tests: cache coherence, invalidation, write protection, type
//! enforcement and close propagation.

use keel_tests::prelude::*;
use proptest::prelude::*;
use std::sync::Arc;

fn path(s: &str) -> ModelPath {
    s.parse().unwrap()
}

fn plain_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-1.0e6..1.0e6f64).prop_map(Value::Float),
        "[a-z0-9_-]{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(2, 8, 4, |inner| {
        prop::collection::vec(inner, 0..4).prop_map(Value::List)
    })
}

/// Fixture with one instantiated toolchain and a writable facade over it.
fn toolchain() -> (Fixture, NodeId, Toolchain) {
    let mut fx = Fixture::new().unwrap();
    let id = fx.instantiate(path("toolchains.gcc"), "Toolchain").unwrap();
    let gcc = fx.writable(id).unwrap();
    (fx, id, gcc)
}

mod cache_coherence {
    use super::*;

    proptest! {
        #[test]
        fn test_repeated_reads_agree(name in "[a-z]{1,12}") {
            let (mut fx, _, gcc) = toolchain();
            gcc.set_name(&mut fx.graph, name.as_str()).unwrap();

            let first = gcc.name(&mut fx.graph).unwrap();
            let second = gcc.name(&mut fx.graph).unwrap();
            prop_assert_eq!(first.clone(), second);
            prop_assert_eq!(first, Some(name));
        }

        #[test]
        fn test_views_do_not_share_cache_entries(old in "[a-z]{1,8}", new in "[a-z]{1,8}") {
            let (mut fx, id, gcc) = toolchain();
            gcc.set_name(&mut fx.graph, old.as_str()).unwrap();
            let reader: Toolchain = fx.read_only(id).unwrap();
            prop_assert_eq!(reader.name(&mut fx.graph).unwrap(), Some(old.clone()));

            // A write through another view is not seen through the reader's cache
            gcc.set_name(&mut fx.graph, new.as_str()).unwrap();
            prop_assert_eq!(reader.name(&mut fx.graph).unwrap(), Some(old));
            prop_assert_eq!(gcc.name(&mut fx.graph).unwrap(), Some(new.clone()));

            // A fresh view traverses again
            let fresh: Toolchain = fx.read_only(id).unwrap();
            prop_assert_eq!(fresh.name(&mut fx.graph).unwrap(), Some(new));
        }
    }
}

mod invalidation {
    use super::*;

    proptest! {
        #[test]
        fn test_reads_observe_the_last_write(versions in prop::collection::vec(any::<i64>(), 1..16)) {
            let (mut fx, _, gcc) = toolchain();
            for version in &versions {
                gcc.set_version(&mut fx.graph, *version).unwrap();
                prop_assert_eq!(gcc.version(&mut fx.graph).unwrap(), Some(*version));
            }
            prop_assert_eq!(gcc.version(&mut fx.graph).unwrap(), versions.last().copied());
        }

        #[test]
        fn test_opaque_property_round_trips(flags in plain_value()) {
            let mut fx = Fixture::new().unwrap();
            let id = fx.instantiate(path("app"), "Binary").unwrap();
            let app: Binary = fx.writable(id).unwrap();
            app.flags(&mut fx.graph).unwrap();

            app.set_flags(&mut fx.graph, flags.clone()).unwrap();
            prop_assert_eq!(app.flags(&mut fx.graph).unwrap(), flags);
        }
    }
}

mod write_protection {
    use super::*;

    proptest! {
        #[test]
        fn test_read_only_writes_always_fail(value in plain_value()) {
            let (mut fx, id, gcc) = toolchain();
            gcc.set_name(&mut fx.graph, "gcc").unwrap();
            let reader = fx.read_only_view(id, "Toolchain").unwrap().managed_instance().unwrap();

            for property in ["name", "version"] {
                let err = reader.set(&mut fx.graph, property, value.clone()).unwrap_err();
                prop_assert!(err.is_view_closed());
            }
            let name = fx.graph.node_at(&path("toolchains.gcc.name")).unwrap();
            prop_assert_eq!(fx.graph.value(name).unwrap(), Some(&Value::from("gcc")));
        }

        #[test]
        fn test_closed_writes_always_fail(value in any::<i64>(), reads in 0usize..3) {
            let (mut fx, id, _) = toolchain();
            let view = fx.writable_view(id, "Toolchain").unwrap();
            let gcc: Toolchain = view.typed().unwrap();
            for _ in 0..reads {
                gcc.version(&mut fx.graph).unwrap();
            }
            view.close();

            prop_assert!(gcc.set_version(&mut fx.graph, value).unwrap_err().is_view_closed());
            prop_assert_eq!(gcc.version(&mut fx.graph).unwrap(), None);
        }
    }
}

mod type_enforcement {
    use super::*;

    proptest! {
        #[test]
        fn test_plain_values_never_fill_managed_properties(value in plain_value()) {
            let mut fx = Fixture::new().unwrap();
            let id = fx.instantiate(path("app"), "Binary").unwrap();
            let app = fx.writable_view(id, "Binary").unwrap().managed_instance().unwrap();

            for property in ["toolchain", "platform"] {
                let err = app.set(&mut fx.graph, property, value.clone()).unwrap_err();
                prop_assert!(err.is_invalid_property_value());
            }
        }

        #[test]
        fn test_scalar_properties_accept_only_their_type(value in plain_value()) {
            let (mut fx, _, gcc) = toolchain();
            let accepted = matches!(value, Value::Int(_) | Value::Null);

            let result = gcc.set_version(&mut fx.graph, value.clone());
            prop_assert_eq!(result.is_ok(), accepted);
            if let Err(err) = result {
                prop_assert!(err.is_type_mismatch());
            } else {
                let read = gcc.instance().get(&mut fx.graph, "version").unwrap();
                prop_assert_eq!(read, PropertyValue::Value(value));
            }
        }
    }
}

mod close_propagation {
    use super::*;

    fn modules() -> (ModelGraph, ProjectionRegistry, NodeId) {
        let mut builder = SchemaStoreBuilder::new();
        builder
            .add_managed("Module")
            .property("name", "String")
            .property("parent", "Module")
            .done()
            .unwrap();
        let schemas = Arc::new(builder.build().unwrap());
        let mut graph = ModelGraph::new(schemas.clone());
        let root = graph.instantiate(path("core"), "Module".into()).unwrap();
        (graph, ProjectionRegistry::new(schemas), root)
    }

    proptest! {
        #[test]
        fn test_closing_reaches_every_materialised_sub_view(depth in 1usize..6) {
            let (mut graph, registry, root) = modules();
            let view = registry
                .as_writable(&mut graph, root, &"Module".into(), &"configure".into())
                .unwrap();

            let mut chain = vec![view.managed_instance().unwrap()];
            for _ in 0..depth {
                let next = chain
                    .last()
                    .unwrap()
                    .get_as::<ManagedInstance>(&mut graph, "parent")
                    .unwrap();
                chain.push(next);
            }
            prop_assert!(chain.iter().all(|m| m.is_writable() && !m.is_closed()));

            view.close();

            for module in &chain {
                prop_assert!(module.is_closed());
                let err = module.set(&mut graph, "name", "renamed").unwrap_err();
                prop_assert!(err.is_view_closed());
                prop_assert!(module.get(&mut graph, "name").is_ok());
            }
        }
    }

    #[test]
    fn test_sub_views_taken_after_close_are_closed() {
        let (mut graph, registry, root) = modules();
        let view = registry
            .as_writable(&mut graph, root, &"Module".into(), &"configure".into())
            .unwrap();
        let core = view.managed_instance().unwrap();
        view.close();

        let parent = core.get_as::<ManagedInstance>(&mut graph, "parent").unwrap();
        assert!(parent.is_writable());
        assert!(parent.is_closed());
        assert!(parent.set(&mut graph, "name", "root").unwrap_err().is_view_closed());
    }

    #[test]
    fn test_closing_a_sub_view_leaves_the_parent_open() {
        let (mut graph, registry, root) = modules();
        let view = registry
            .as_writable(&mut graph, root, &"Module".into(), &"configure".into())
            .unwrap();
        let core = view.managed_instance().unwrap();
        let parent = core.get_as::<ManagedInstance>(&mut graph, "parent").unwrap();

        let sub = registry
            .as_writable(&mut graph, parent.node(), &"Module".into(), &"other".into())
            .unwrap();
        sub.close();

        assert!(!core.is_closed());
        assert!(!parent.is_closed());
        core.set(&mut graph, "name", "core").unwrap();
    }
}
