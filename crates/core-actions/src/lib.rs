//! Reversible actions applied to a resource document.
//!
//! An action is a small command object that knows how to apply a change to a
//! target (`execute`) and how to take it back (`reverse`). The model that owns
//! the history (see `core-model`) never inspects the target itself; it only
//! drives actions forward and backward and forwards notifications.
//!
//! Variants are generic over the target and are bound to it through plain
//! function values (`fn(&mut T, ..) -> ..`) supplied by the domain at
//! construction time:
//! * [`Setter`] swaps one property value.
//! * [`SubModelSetter`] replaces the sub-model stored under one id.
//! * [`Adder`] / [`Remover`] insert or remove a group of sub-models.
//! * [`SubModelRename`] moves a sub-model from one id to another.
//!
//! Invariants shared by every variant:
//! * `reverse` after `execute` restores the originating state; the pair can be
//!   replayed any number of times in alternation.
//! * Actions never validate and never fail. Domain mutators check
//!   preconditions before building an action so a rejected edit leaves no
//!   trace in the history.

mod group;
mod rename;
mod setter;

pub use group::{AddFn, Adder, RemoveFn, Remover};
pub use rename::{RenameFn, SubModelRename};
pub use setter::{SetFn, Setter, SubModelSetFn, SubModelSetter};

use std::fmt;

/// Notification class of an action.
///
/// `Basic` actions are reported to views through the generic
/// `simple_refresh(message)` path. Every other kind is routed to the
/// document, which decides which fine-grained view callback applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Basic,
    Group,
    Rename,
    /// Domain-defined discriminant (e.g. "animation replaced").
    Custom(u16),
}

impl ActionKind {
    pub fn is_basic(self) -> bool {
        matches!(self, ActionKind::Basic)
    }
}

/// Sub-model ids an action touches, borrowed from the action.
#[derive(Debug, PartialEq, Eq)]
pub enum ActionScope<'a, Id> {
    /// A plain property of the target.
    Property,
    /// One sub-model, addressed by id.
    SubModel(&'a Id),
    /// A group of sub-models (add / remove).
    Group(&'a [Id]),
    /// The rename that was applied last (after an undo this is the inverse rename).
    Rename { old: &'a Id, new: &'a Id },
}

impl<Id> Clone for ActionScope<'_, Id> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Id> Copy for ActionScope<'_, Id> {}

/// Something actions can be applied to.
pub trait ActionTarget {
    /// Key type of the target's sub-models.
    type Id: Clone + fmt::Debug + PartialEq;
}

/// A reversible, tagged unit of change.
pub trait Action<T: ActionTarget> {
    /// Apply forward.
    fn execute(&mut self, target: &mut T);
    /// Apply backward.
    fn reverse(&mut self, target: &mut T);
    fn kind(&self) -> ActionKind;
    /// Property tag used for `simple_refresh` and view dispatch.
    fn message(&self) -> &'static str;
    fn scope(&self) -> ActionScope<'_, T::Id>;
}

impl<T: ActionTarget> fmt::Debug for dyn Action<T> + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("kind", &self.kind())
            .field("message", &self.message())
            .field("scope", &self.scope())
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_basic_kind_is_basic() {
        assert!(ActionKind::Basic.is_basic());
        assert!(!ActionKind::Group.is_basic());
        assert!(!ActionKind::Rename.is_basic());
        assert!(!ActionKind::Custom(0).is_basic());
    }

    #[test]
    fn boxed_action_debug_lists_kind_and_message() {
        let action: Box<dyn Action<fixture::Palette>> = Box::new(Setter::new(
            "title",
            fixture::Palette::swap_title,
            "warm".to_string(),
        ));
        let rendered = format!("{action:?}");
        assert!(rendered.contains("Basic"));
        assert!(rendered.contains("title"));
    }
}
