//! Open/closed lifecycle of views.
//!
//! Every view owns one [`ViewLifecycle`]. Managed sub-views handed out by a
//! writable view while it is open are adopted as children, keyed by the
//! property they were read from, so closing a view walks the tree and closes
//! everything reached through it so far.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug)]
pub(crate) struct ViewLifecycle {
    writable: bool,
    closed: Cell<bool>,
    children: RefCell<HashMap<String, Rc<ViewLifecycle>>>,
}

impl ViewLifecycle {
    pub(crate) fn new(writable: bool) -> Rc<Self> {
        Rc::new(Self {
            writable,
            closed: Cell::new(false),
            children: RefCell::new(HashMap::new()),
        })
    }

    pub(crate) fn is_writable(&self) -> bool {
        self.writable
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.get()
    }

    /// Writes are allowed only through open writable views.
    pub(crate) fn allows_writes(&self) -> bool {
        self.writable && !self.closed.get()
    }

    /// Register the sub-view read from `property`, to be closed together
    /// with this one. A sub-view previously adopted for the same property is
    /// closed and released.
    pub(crate) fn adopt(&self, property: &str, child: Rc<ViewLifecycle>) {
        if self.is_closed() {
            child.close();
            return;
        }
        let replaced = self
            .children
            .borrow_mut()
            .insert(property.to_string(), child.clone());
        if let Some(replaced) = replaced {
            if !Rc::ptr_eq(&replaced, &child) {
                replaced.close();
            }
        }
    }

    /// Close this view and every adopted sub-view. Idempotent.
    pub(crate) fn close(&self) {
        self.closed.set(true);
        let children = std::mem::take(&mut *self.children.borrow_mut());
        for child in children.into_values() {
            child.close();
        }
    }

    #[cfg(test)]
    pub(crate) fn child_count(&self) -> usize {
        self.children.borrow().len()
    }
}
