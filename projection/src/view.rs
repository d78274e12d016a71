//! Model views.

use crate::lifecycle::ViewLifecycle;
use crate::state::PropertyAccessState;
use crate::{ManagedInstance, ManagedType, PropertyValue, ViewError, ViewResult};
use keel_core::{ModelPath, ModelType, NodeId, RuleDescriptor, Value};
use keel_graph::{GraphError, ModelGraph, PrivateData};
use std::fmt;
use std::rc::Rc;
use tracing::debug;

enum ViewKind {
    Managed(Rc<PropertyAccessState>),
    Unmanaged,
}

/// A view of one node, handed to one rule, with fixed mutability.
///
/// Views start open. Once closed no mutation is accepted through the view or
/// through any sub-view it produced while writable; reads stay legal.
pub struct ModelView {
    model_type: ModelType,
    node: NodeId,
    path: ModelPath,
    rule: RuleDescriptor,
    lifecycle: Rc<ViewLifecycle>,
    kind: ViewKind,
}

impl ModelView {
    pub(crate) fn managed(
        model_type: ModelType,
        path: ModelPath,
        rule: RuleDescriptor,
        lifecycle: Rc<ViewLifecycle>,
        state: Rc<PropertyAccessState>,
    ) -> Self {
        Self {
            model_type,
            node: state.node(),
            path,
            rule,
            lifecycle,
            kind: ViewKind::Managed(state),
        }
    }

    pub(crate) fn unmanaged(
        model_type: ModelType,
        node: NodeId,
        path: ModelPath,
        rule: RuleDescriptor,
        lifecycle: Rc<ViewLifecycle>,
    ) -> Self {
        Self {
            model_type,
            node,
            path,
            rule,
            lifecycle,
            kind: ViewKind::Unmanaged,
        }
    }

    pub fn model_type(&self) -> &ModelType {
        &self.model_type
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn path(&self) -> &ModelPath {
        &self.path
    }

    pub fn rule(&self) -> &RuleDescriptor {
        &self.rule
    }

    pub fn is_managed(&self) -> bool {
        matches!(self.kind, ViewKind::Managed(_))
    }

    pub fn is_writable(&self) -> bool {
        self.lifecycle.is_writable()
    }

    pub fn is_closed(&self) -> bool {
        self.lifecycle.is_closed()
    }

    /// Property access state, for managed views.
    pub fn state(&self) -> Option<&Rc<PropertyAccessState>> {
        match &self.kind {
            ViewKind::Managed(state) => Some(state),
            ViewKind::Unmanaged => None,
        }
    }

    pub(crate) fn lifecycle(&self) -> &Rc<ViewLifecycle> {
        &self.lifecycle
    }

    /// The value this view stands for.
    ///
    /// Managed views yield a delegating instance; every call returns an
    /// instance sharing this view's state. Unmanaged views yield the node's
    /// stored value, `Null` when nothing has been stored.
    pub fn instance(&self, graph: &ModelGraph) -> ViewResult<PropertyValue> {
        match &self.kind {
            ViewKind::Managed(state) => {
                let factory = state.registry().factory();
                Ok(PropertyValue::Managed(factory.create(state.clone())))
            }
            ViewKind::Unmanaged => {
                let value = graph.value(self.node)?.cloned().unwrap_or(Value::Null);
                Ok(PropertyValue::Value(value))
            }
        }
    }

    /// The delegating instance of a managed view.
    pub fn managed_instance(&self) -> ViewResult<ManagedInstance> {
        match &self.kind {
            ViewKind::Managed(state) => Ok(state.registry().factory().create(state.clone())),
            ViewKind::Unmanaged => Err(ViewError::NotManaged(self.model_type.clone())),
        }
    }

    /// The instance wrapped in a typed facade.
    pub fn typed<T: ManagedType>(&self) -> ViewResult<T> {
        let instance = self.managed_instance()?;
        if instance.model_type().name() != T::TYPE_NAME {
            return Err(GraphError::type_mismatch(
                &self.path,
                &T::model_type(),
                instance.model_type().name(),
            )
            .into());
        }
        Ok(T::from_instance(instance))
    }

    /// Store a plain value through an unmanaged view.
    pub fn set_value(&self, graph: &mut ModelGraph, value: impl Into<Value>) -> ViewResult<()> {
        if !self.lifecycle.allows_writes() {
            return Err(ViewError::view_closed(&self.model_type, &self.path, &self.rule));
        }
        if self.is_managed() {
            return Err(GraphError::type_mismatch(&self.path, &self.model_type, "plain value").into());
        }
        graph.set_private_data(self.node, &self.model_type, PrivateData::Value(value.into()))?;
        Ok(())
    }

    /// Close the view and every sub-view obtained through it. Idempotent.
    pub fn close(&self) {
        if !self.lifecycle.is_closed() {
            debug!(path = %self.path, model_type = %self.model_type, rule = %self.rule, "view closed");
        }
        self.lifecycle.close();
    }
}

impl fmt::Debug for ModelView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelView")
            .field("model_type", &self.model_type)
            .field("node", &self.node)
            .field("path", &self.path)
            .field("rule", &self.rule)
            .field("managed", &self.is_managed())
            .field("writable", &self.is_writable())
            .field("closed", &self.is_closed())
            .finish()
    }
}
