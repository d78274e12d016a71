//! Delegating instances.
//!
//! Every managed type gets one [`DispatchTable`], built from its schema the
//! first time an instance of the type is created and shared by all later
//! instances. A [`ManagedInstance`] is a thin handle pairing that table with
//! the property access state of one view.

use crate::state::PropertyAccessState;
use crate::{FromPropertyValue, PropertyValue, ViewError, ViewResult};
use indexmap::IndexMap;
use keel_core::{ModelType, NodeId};
use keel_graph::ModelGraph;
use keel_schema::Schema;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

// ==================== Dispatch Table ====================

/// A dispatchable property of a managed type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySlot {
    /// Position in declaration order.
    pub index: usize,
    pub name: String,
    pub model_type: ModelType,
}

/// Property dispatch for one managed type.
#[derive(Debug)]
pub struct DispatchTable {
    model_type: ModelType,
    slots: IndexMap<String, PropertySlot>,
}

impl DispatchTable {
    pub fn from_schema(schema: &Schema) -> Self {
        let slots = schema
            .properties()
            .values()
            .enumerate()
            .map(|(index, property)| {
                let slot = PropertySlot {
                    index,
                    name: property.name.clone(),
                    model_type: property.model_type.clone(),
                };
                (property.name.clone(), slot)
            })
            .collect();
        Self {
            model_type: schema.model_type().clone(),
            slots,
        }
    }

    pub fn model_type(&self) -> &ModelType {
        &self.model_type
    }

    pub fn slot(&self, name: &str) -> Option<&PropertySlot> {
        self.slots.get(name)
    }

    pub fn slots(&self) -> impl Iterator<Item = &PropertySlot> + '_ {
        self.slots.values()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

// ==================== Factory ====================

/// Creates delegating instances, caching one dispatch table per type.
#[derive(Debug, Default)]
pub struct InstanceFactory {
    tables: RefCell<HashMap<ModelType, Rc<DispatchTable>>>,
}

impl InstanceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the dispatch table for a schema, building it on first use.
    pub fn dispatch_table(&self, schema: &Schema) -> Rc<DispatchTable> {
        self.tables
            .borrow_mut()
            .entry(schema.model_type().clone())
            .or_insert_with(|| Rc::new(DispatchTable::from_schema(schema)))
            .clone()
    }

    /// Create an instance over `state`. No validation happens here.
    pub fn create(&self, state: Rc<PropertyAccessState>) -> ManagedInstance {
        let dispatch = self.dispatch_table(state.schema());
        ManagedInstance { dispatch, state }
    }

    /// Number of dispatch tables built so far.
    pub fn table_count(&self) -> usize {
        self.tables.borrow().len()
    }
}

// ==================== Instance ====================

/// Live, typed facade over a managed node.
///
/// Cloning is cheap. Clones share the same view state and therefore the
/// same property cache. Two instances are equal when they share state.
#[derive(Clone)]
pub struct ManagedInstance {
    dispatch: Rc<DispatchTable>,
    state: Rc<PropertyAccessState>,
}

impl ManagedInstance {
    pub fn model_type(&self) -> &ModelType {
        self.dispatch.model_type()
    }

    /// Node holding this instance's properties.
    pub fn node(&self) -> NodeId {
        self.state.node()
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.dispatch.slots().map(|slot| slot.name.as_str())
    }

    pub fn display_name(&self) -> String {
        self.state.display_name()
    }

    pub fn is_writable(&self) -> bool {
        self.state.is_writable()
    }

    pub fn is_closed(&self) -> bool {
        self.state.is_closed()
    }

    pub fn state(&self) -> &Rc<PropertyAccessState> {
        &self.state
    }

    fn slot(&self, name: &str) -> ViewResult<&PropertySlot> {
        self.dispatch
            .slot(name)
            .ok_or_else(|| ViewError::unknown_property(name, self.dispatch.model_type()))
    }

    pub fn get(&self, graph: &mut ModelGraph, name: &str) -> ViewResult<PropertyValue> {
        let slot = self.slot(name)?;
        self.state.get(graph, &slot.name)
    }

    /// Read a property and convert it.
    pub fn get_as<T: FromPropertyValue>(&self, graph: &mut ModelGraph, name: &str) -> ViewResult<T> {
        let value = self.get(graph, name)?;
        T::from_property_value(value)
            .map_err(|actual| ViewError::unexpected_value(name, T::EXPECTED, actual.describe()))
    }

    pub fn set(
        &self,
        graph: &mut ModelGraph,
        name: &str,
        value: impl Into<PropertyValue>,
    ) -> ViewResult<()> {
        let slot = self.slot(name)?;
        self.state.set(graph, &slot.name, value.into())
    }
}

impl PartialEq for ManagedInstance {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl fmt::Debug for ManagedInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedInstance")
            .field("model_type", self.dispatch.model_type())
            .field("node", &self.state.node())
            .field("path", self.state.path())
            .finish()
    }
}
