//! Registry of attached views.
//!
//! Views are shared with the UI layer through `Rc<RefCell<V>>`; the model
//! never outlives the editor session that owns both, so no weak references
//! are needed. Iteration follows attach order. Identity is the `Rc`
//! allocation: attaching the same view twice returns the original handle.

use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// Stable handle of an attached view. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(pub usize);

pub struct ViewRegistry<V: ?Sized> {
    views: Vec<(ViewId, Rc<RefCell<V>>)>,
    next: usize,
}

impl<V: ?Sized> Default for ViewRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: ?Sized> ViewRegistry<V> {
    pub fn new() -> Self {
        Self {
            views: Vec::new(),
            next: 0,
        }
    }

    pub fn attach(&mut self, view: Rc<RefCell<V>>) -> ViewId {
        if let Some(id) = self.id_of(&view) {
            return id;
        }
        let id = ViewId(self.next);
        self.next += 1;
        self.views.push((id, view));
        debug!(target: "model.views", view = id.0, count = self.views.len(), "attach");
        id
    }

    pub fn detach(&mut self, id: ViewId) -> bool {
        let before = self.views.len();
        self.views.retain(|(v, _)| *v != id);
        let removed = self.views.len() != before;
        if removed {
            debug!(target: "model.views", view = id.0, count = self.views.len(), "detach");
        }
        removed
    }

    pub fn detach_view(&mut self, view: &Rc<RefCell<V>>) -> bool {
        match self.id_of(view) {
            Some(id) => self.detach(id),
            None => false,
        }
    }

    pub fn id_of(&self, view: &Rc<RefCell<V>>) -> Option<ViewId> {
        self.views
            .iter()
            .find(|(_, v)| std::ptr::addr_eq(Rc::as_ptr(v), Rc::as_ptr(view)))
            .map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ViewId, &Rc<RefCell<V>>)> {
        self.views.iter().map(|(id, v)| (*id, v))
    }
}
