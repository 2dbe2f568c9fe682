use crate::{Action, ActionKind, ActionScope, ActionTarget};
use tracing::trace;

/// Stores `value` into the target and returns the value it replaced.
pub type SetFn<T, P> = fn(&mut T, P) -> P;

/// Stores `value` under `id` and returns the sub-model it replaced.
pub type SubModelSetFn<T, S> = fn(&mut T, &<T as ActionTarget>::Id, S) -> S;

/// Swaps one property of the target. Always reported as [`ActionKind::Basic`].
///
/// The action holds whichever value is *not* currently stored in the target:
/// the new value before `execute`, the previous one after it.
pub struct Setter<T, P> {
    message: &'static str,
    value: Option<P>,
    set: SetFn<T, P>,
}

impl<T, P> Setter<T, P> {
    pub fn new(message: &'static str, set: SetFn<T, P>, value: P) -> Self {
        Self {
            message,
            value: Some(value),
            set,
        }
    }

    fn swap(&mut self, target: &mut T) {
        if let Some(value) = self.value.take() {
            trace!(target: "actions.setter", property = self.message, "swap");
            self.value = Some((self.set)(target, value));
        }
    }
}

impl<T: ActionTarget, P> Action<T> for Setter<T, P> {
    fn execute(&mut self, target: &mut T) {
        self.swap(target);
    }

    fn reverse(&mut self, target: &mut T) {
        self.swap(target);
    }

    fn kind(&self) -> ActionKind {
        ActionKind::Basic
    }

    fn message(&self) -> &'static str {
        self.message
    }

    fn scope(&self) -> ActionScope<'_, T::Id> {
        ActionScope::Property
    }
}

/// Replaces the sub-model stored under one id, remembering the id so the
/// document can tell "the focused sub-model changed" from "another one did".
pub struct SubModelSetter<T: ActionTarget, S> {
    message: &'static str,
    kind: ActionKind,
    id: T::Id,
    value: Option<S>,
    set: SubModelSetFn<T, S>,
}

impl<T: ActionTarget, S> SubModelSetter<T, S> {
    pub fn new(message: &'static str, set: SubModelSetFn<T, S>, id: T::Id, value: S) -> Self {
        Self {
            message,
            kind: ActionKind::Basic,
            id,
            value: Some(value),
            set,
        }
    }

    pub fn with_kind(mut self, kind: ActionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn id(&self) -> &T::Id {
        &self.id
    }

    fn swap(&mut self, target: &mut T) {
        if let Some(value) = self.value.take() {
            trace!(target: "actions.setter", property = self.message, id = ?self.id, "swap_sub_model");
            self.value = Some((self.set)(target, &self.id, value));
        }
    }
}

impl<T: ActionTarget, S> Action<T> for SubModelSetter<T, S> {
    fn execute(&mut self, target: &mut T) {
        self.swap(target);
    }

    fn reverse(&mut self, target: &mut T) {
        self.swap(target);
    }

    fn kind(&self) -> ActionKind {
        self.kind
    }

    fn message(&self) -> &'static str {
        self.message
    }

    fn scope(&self) -> ActionScope<'_, T::Id> {
        ActionScope::SubModel(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::Palette;
    use pretty_assertions::assert_eq;

    #[test]
    fn setter_swaps_back_and_forth() {
        let mut palette = Palette::with_colors(&[]);
        let mut action = Setter::new("title", Palette::swap_title, "cold".to_string());

        action.execute(&mut palette);
        assert_eq!(palette.title, "cold");
        action.reverse(&mut palette);
        assert_eq!(palette.title, "palette");
        action.execute(&mut palette);
        assert_eq!(palette.title, "cold");
    }

    #[test]
    fn setter_is_basic_property_action() {
        let action = Setter::new("title", Palette::swap_title, String::new());
        assert_eq!(Action::<Palette>::kind(&action), ActionKind::Basic);
        assert_eq!(Action::<Palette>::message(&action), "title");
        assert_eq!(Action::<Palette>::scope(&action), ActionScope::Property);
    }

    #[test]
    fn sub_model_setter_restores_previous_value() {
        let mut palette = Palette::with_colors(&[(1, "red"), (2, "blue")]);
        let before = palette.clone();
        let mut action = SubModelSetter::new("color", Palette::swap_color, 2, "green".to_string())
            .with_kind(ActionKind::Custom(7));

        action.execute(&mut palette);
        assert_eq!(palette.colors[&2], "green");
        assert_eq!(palette.colors[&1], "red");
        action.reverse(&mut palette);
        assert_eq!(palette, before);

        assert_eq!(action.kind(), ActionKind::Custom(7));
        assert_eq!(action.scope(), ActionScope::SubModel(&2));
        assert_eq!(*action.id(), 2);
    }
}
