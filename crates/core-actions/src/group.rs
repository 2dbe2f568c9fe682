use crate::{Action, ActionKind, ActionScope, ActionTarget};
use tracing::trace;

/// Inserts `values[i]` under `ids[i]`.
pub type AddFn<T, S> = fn(&mut T, &[<T as ActionTarget>::Id], Vec<S>);

/// Removes the sub-models under `ids`, returning them in the same order.
pub type RemoveFn<T, S> = fn(&mut T, &[<T as ActionTarget>::Id]) -> Vec<S>;

/// Adds a group of sub-models. Dual of [`Remover`].
pub struct Adder<T: ActionTarget, S> {
    message: &'static str,
    kind: ActionKind,
    ids: Vec<T::Id>,
    values: Vec<S>,
    add: AddFn<T, S>,
    remove: RemoveFn<T, S>,
}

impl<T: ActionTarget, S> Adder<T, S> {
    pub fn new(
        message: &'static str,
        add: AddFn<T, S>,
        remove: RemoveFn<T, S>,
        ids: Vec<T::Id>,
        values: Vec<S>,
    ) -> Self {
        debug_assert_eq!(ids.len(), values.len(), "one value per id");
        Self {
            message,
            kind: ActionKind::Group,
            ids,
            values,
            add,
            remove,
        }
    }

    pub fn with_kind(mut self, kind: ActionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn ids(&self) -> &[T::Id] {
        &self.ids
    }
}

impl<T: ActionTarget, S> Action<T> for Adder<T, S> {
    fn execute(&mut self, target: &mut T) {
        let values = std::mem::take(&mut self.values);
        trace!(target: "actions.group", property = self.message, count = values.len(), "add");
        (self.add)(target, &self.ids, values);
    }

    fn reverse(&mut self, target: &mut T) {
        self.values = (self.remove)(target, &self.ids);
        trace!(target: "actions.group", property = self.message, count = self.values.len(), "add_reversed");
    }

    fn kind(&self) -> ActionKind {
        self.kind
    }

    fn message(&self) -> &'static str {
        self.message
    }

    fn scope(&self) -> ActionScope<'_, T::Id> {
        ActionScope::Group(&self.ids)
    }
}

/// Removes a group of sub-models, keeping them so `reverse` can put them back.
pub struct Remover<T: ActionTarget, S> {
    message: &'static str,
    kind: ActionKind,
    ids: Vec<T::Id>,
    values: Vec<S>,
    remove: RemoveFn<T, S>,
    add: AddFn<T, S>,
}

impl<T: ActionTarget, S> Remover<T, S> {
    pub fn new(
        message: &'static str,
        remove: RemoveFn<T, S>,
        add: AddFn<T, S>,
        ids: Vec<T::Id>,
    ) -> Self {
        Self {
            message,
            kind: ActionKind::Group,
            ids,
            values: Vec::new(),
            remove,
            add,
        }
    }

    pub fn with_kind(mut self, kind: ActionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn ids(&self) -> &[T::Id] {
        &self.ids
    }
}

impl<T: ActionTarget, S> Action<T> for Remover<T, S> {
    fn execute(&mut self, target: &mut T) {
        self.values = (self.remove)(target, &self.ids);
        trace!(target: "actions.group", property = self.message, count = self.values.len(), "remove");
    }

    fn reverse(&mut self, target: &mut T) {
        let values = std::mem::take(&mut self.values);
        trace!(target: "actions.group", property = self.message, count = values.len(), "remove_reversed");
        (self.add)(target, &self.ids, values);
    }

    fn kind(&self) -> ActionKind {
        self.kind
    }

    fn message(&self) -> &'static str {
        self.message
    }

    fn scope(&self) -> ActionScope<'_, T::Id> {
        ActionScope::Group(&self.ids)
    }
}
