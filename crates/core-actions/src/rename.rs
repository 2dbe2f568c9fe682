use crate::{Action, ActionKind, ActionScope, ActionTarget};

/// Moves the sub-model stored under `from` to `to`.
pub type RenameFn<T> = fn(&mut T, &<T as ActionTarget>::Id, &<T as ActionTarget>::Id);

/// Renames a sub-model. Executing and reversing are the same toggle: swap the
/// id pair, then apply the rename it now describes.
///
/// The pair is stored pre-swapped so the first toggle applies `old -> new`.
/// Afterwards [`old_id`](Self::old_id) / [`new_id`](Self::new_id) always
/// describe the rename applied last, which is what views need to hear about.
pub struct SubModelRename<T: ActionTarget> {
    message: &'static str,
    kind: ActionKind,
    old: T::Id,
    new: T::Id,
    rename: RenameFn<T>,
}

impl<T: ActionTarget> SubModelRename<T> {
    pub fn new(message: &'static str, rename: RenameFn<T>, old_id: T::Id, new_id: T::Id) -> Self {
        Self {
            message,
            kind: ActionKind::Rename,
            old: new_id,
            new: old_id,
            rename,
        }
    }

    pub fn with_kind(mut self, kind: ActionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn old_id(&self) -> &T::Id {
        &self.old
    }

    pub fn new_id(&self) -> &T::Id {
        &self.new
    }

    fn toggle(&mut self, target: &mut T) {
        std::mem::swap(&mut self.old, &mut self.new);
        (self.rename)(target, &self.old, &self.new);
    }
}

impl<T: ActionTarget> Action<T> for SubModelRename<T> {
    fn execute(&mut self, target: &mut T) {
        self.toggle(target);
    }

    fn reverse(&mut self, target: &mut T) {
        self.toggle(target);
    }

    fn kind(&self) -> ActionKind {
        self.kind
    }

    fn message(&self) -> &'static str {
        self.message
    }

    fn scope(&self) -> ActionScope<'_, T::Id> {
        ActionScope::Rename {
            old: &self.old,
            new: &self.new,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::Palette;
    use pretty_assertions::assert_eq;

    #[test]
    fn rename_toggles_and_reports_applied_direction() {
        let mut palette = Palette::with_colors(&[(1, "red")]);
        let mut action = SubModelRename::new("color", Palette::move_color, 1, 9);

        action.execute(&mut palette);
        assert_eq!(palette.colors.get(&9).map(String::as_str), Some("red"));
        assert!(!palette.colors.contains_key(&1));
        assert_eq!((*action.old_id(), *action.new_id()), (1, 9));

        action.reverse(&mut palette);
        assert_eq!(palette.colors.get(&1).map(String::as_str), Some("red"));
        assert!(!palette.colors.contains_key(&9));
        assert_eq!((*action.old_id(), *action.new_id()), (9, 1));

        action.execute(&mut palette);
        assert!(palette.colors.contains_key(&9));
        assert_eq!(action.scope(), ActionScope::Rename { old: &1, new: &9 });
    }

    #[test]
    fn rename_defaults_to_rename_kind() {
        let action = SubModelRename::new("color", Palette::move_color, 1, 2);
        assert_eq!(action.kind(), ActionKind::Rename);
        assert_eq!(action.message(), "color");
    }
}
