//! Generic undoable document model.
//!
//! `Model<D>` couples three things:
//! * the document `D` (resource data the actions mutate),
//! * a linear [`History`] of reversible actions with a save point,
//! * a [`ViewRegistry`] of observers notified after every change.
//!
//! Notification dispatch: for every attached view, a `Basic` action is
//! reported through [`View::simple_refresh`] with the action message; any
//! other kind is handed to [`Document::on_action_notify`], which picks the
//! fine-grained callback (sub-model changed, added, removed, renamed).
//! Non-undoable state such as selection goes through [`Model::user_notify`]
//! and never touches the history.
//!
//! Core invariants (after every public call):
//! * `0 <= cursor <= history_len`.
//! * `can_undo() == cursor > 0` and `can_redo() == cursor < history_len`.
//! * Undo/redo past either end is a silent no-op.
//!
//! Everything runs synchronously on the owning thread. Views are borrowed
//! mutably while notified; a view that is already borrowed (a callback
//! re-entering the model) is skipped with a warning instead of panicking.

pub mod history;
mod views;

pub use core_actions::{Action, ActionKind, ActionScope, ActionTarget};
pub use history::History;
pub use views::{ViewId, ViewRegistry};

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::{trace, warn};

/// Minimal capability of every observer.
pub trait View {
    fn simple_refresh(&mut self, message: &str);
}

/// Resource data hosted by a [`Model`].
pub trait Document: ActionTarget + Sized + 'static {
    type View: View + ?Sized;
    /// Discriminant of non-undoable notifications (e.g. selection changed).
    type UserEvent: Copy + fmt::Debug;

    /// Route a non-basic action to the matching view callback.
    fn on_action_notify(&mut self, action: &dyn Action<Self>, view: &mut Self::View);

    fn on_user_notify(&mut self, event: Self::UserEvent, view: &mut Self::View);
}

pub struct Model<D: Document> {
    document: D,
    history: History<D>,
    views: ViewRegistry<D::View>,
}

impl<D: Document> Model<D> {
    pub fn new(document: D) -> Self {
        Self {
            document,
            history: History::new(),
            views: ViewRegistry::new(),
        }
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    /// Direct access for non-undoable state (selection). Changes made here are
    /// invisible to the history; follow them with [`Model::user_notify`].
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn history(&self) -> &History<D> {
        &self.history
    }

    pub fn set_history_limit(&mut self, limit: Option<usize>) {
        self.history.set_limit(limit);
    }

    pub fn attach(&mut self, view: Rc<RefCell<D::View>>) -> ViewId {
        self.views.attach(view)
    }

    pub fn detach(&mut self, id: ViewId) -> bool {
        self.views.detach(id)
    }

    pub fn detach_view(&mut self, view: &Rc<RefCell<D::View>>) -> bool {
        self.views.detach_view(view)
    }

    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Record, execute and broadcast `action`. Any pending redo is discarded.
    pub fn do_action(&mut self, action: Box<dyn Action<D>>) {
        let action = self.history.record(action);
        action.execute(&mut self.document);
        trace!(target: "model.history", kind = ?action.kind(), property = action.message(), "do_action");
        Self::notify_action(&mut self.document, &self.views, action);
    }

    /// Returns `false` (and does nothing) when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(action) = self.history.step_back() else {
            return false;
        };
        action.reverse(&mut self.document);
        trace!(target: "model.history", kind = ?action.kind(), property = action.message(), "undo");
        Self::notify_action(&mut self.document, &self.views, action);
        true
    }

    /// Returns `false` (and does nothing) when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(action) = self.history.step_forward() else {
            return false;
        };
        action.execute(&mut self.document);
        trace!(target: "model.history", kind = ?action.kind(), property = action.message(), "redo");
        Self::notify_action(&mut self.document, &self.views, action);
        true
    }

    pub fn clear_actions(&mut self) {
        self.history.clear();
    }

    /// Mark the current history position as persisted.
    pub fn reset_save_reference(&mut self) {
        self.history.mark_saved();
    }

    pub fn is_saved(&self) -> bool {
        self.history.is_saved()
    }

    /// Broadcast a non-undoable notification to every view.
    pub fn user_notify(&mut self, event: D::UserEvent) {
        trace!(target: "model.views", ?event, views = self.views.len(), "user_notify");
        for (id, view) in self.views.iter() {
            match view.try_borrow_mut() {
                Ok(mut view) => self.document.on_user_notify(event, &mut view),
                Err(_) => warn!(target: "model.views", view = id.0, "view_busy_skipped"),
            }
        }
    }

    fn notify_action(document: &mut D, views: &ViewRegistry<D::View>, action: &dyn Action<D>) {
        let basic = action.kind().is_basic();
        for (id, view) in views.iter() {
            let Ok(mut view) = view.try_borrow_mut() else {
                warn!(target: "model.views", view = id.0, "view_busy_skipped");
                continue;
            };
            if basic {
                view.simple_refresh(action.message());
            } else {
                document.on_action_notify(action, &mut view);
            }
        }
    }
}

impl<D: Document + fmt::Debug> fmt::Debug for Model<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("document", &self.document)
            .field("history_len", &self.history.len())
            .field("cursor", &self.history.cursor())
            .field("views", &self.views.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_actions::{Adder, Remover, Setter, SubModelRename};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Board {
        title: String,
        cards: BTreeMap<u8, String>,
        focus: Option<u8>,
    }

    #[derive(Debug, Clone, Copy)]
    enum BoardEvent {
        Focus,
    }

    trait BoardView: View {
        fn cards_changed(&mut self, ids: &[u8]);
        fn card_renamed(&mut self, old: u8, new: u8);
        fn focus_changed(&mut self, focus: Option<u8>);
    }

    impl ActionTarget for Board {
        type Id = u8;
    }

    impl Document for Board {
        type View = dyn BoardView;
        type UserEvent = BoardEvent;

        fn on_action_notify(&mut self, action: &dyn Action<Self>, view: &mut Self::View) {
            match action.scope() {
                ActionScope::Group(ids) => view.cards_changed(ids),
                ActionScope::Rename { old, new } => view.card_renamed(*old, *new),
                _ => {}
            }
        }

        fn on_user_notify(&mut self, event: BoardEvent, view: &mut Self::View) {
            match event {
                BoardEvent::Focus => view.focus_changed(self.focus),
            }
        }
    }

    impl Board {
        fn swap_title(&mut self, title: String) -> String {
            std::mem::replace(&mut self.title, title)
        }
        fn add_cards(&mut self, ids: &[u8], cards: Vec<String>) {
            for (id, card) in ids.iter().zip(cards) {
                self.cards.insert(*id, card);
            }
        }
        fn remove_cards(&mut self, ids: &[u8]) -> Vec<String> {
            ids.iter().filter_map(|id| self.cards.remove(id)).collect()
        }
        fn move_card(&mut self, from: &u8, to: &u8) {
            if let Some(card) = self.cards.remove(from) {
                self.cards.insert(*to, card);
            }
        }
    }

    #[derive(Default)]
    struct Recorder {
        log: Vec<String>,
    }

    impl View for Recorder {
        fn simple_refresh(&mut self, message: &str) {
            self.log.push(format!("refresh:{message}"));
        }
    }

    impl BoardView for Recorder {
        fn cards_changed(&mut self, ids: &[u8]) {
            self.log.push(format!("cards:{ids:?}"));
        }
        fn card_renamed(&mut self, old: u8, new: u8) {
            self.log.push(format!("rename:{old}->{new}"));
        }
        fn focus_changed(&mut self, focus: Option<u8>) {
            self.log.push(format!("focus:{focus:?}"));
        }
    }

    fn model_with_recorder() -> (Model<Board>, Rc<RefCell<Recorder>>) {
        let mut model = Model::new(Board::default());
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        model.attach(recorder.clone());
        (model, recorder)
    }

    fn add(ids: Vec<u8>, cards: Vec<&str>) -> Box<dyn Action<Board>> {
        Box::new(Adder::new(
            "cards",
            Board::add_cards,
            Board::remove_cards,
            ids,
            cards.into_iter().map(String::from).collect(),
        ))
    }

    #[test]
    fn basic_actions_use_simple_refresh() {
        let (mut model, recorder) = model_with_recorder();
        model.do_action(Box::new(Setter::new("title", Board::swap_title, "todo".into())));
        assert_eq!(model.document().title, "todo");
        model.undo();
        assert_eq!(model.document().title, "");
        assert_eq!(recorder.borrow().log, vec!["refresh:title", "refresh:title"]);
    }

    #[test]
    fn group_and_rename_actions_route_through_document() {
        let (mut model, recorder) = model_with_recorder();
        model.do_action(add(vec![1, 2], vec!["a", "b"]));
        model.do_action(Box::new(SubModelRename::new("cards", Board::move_card, 2, 5)));
        model.do_action(Box::new(Remover::new(
            "cards",
            Board::remove_cards,
            Board::add_cards,
            vec![1],
        )));
        model.undo();
        model.undo();
        assert_eq!(
            recorder.borrow().log,
            vec!["cards:[1, 2]", "rename:2->5", "cards:[1]", "cards:[1]", "rename:5->2"]
        );
        assert_eq!(model.document().cards.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn undo_redo_bounds_are_no_ops() {
        let (mut model, recorder) = model_with_recorder();
        assert!(!model.undo());
        assert!(!model.redo());
        model.do_action(add(vec![1], vec!["a"]));
        assert!(!model.redo());
        assert!(model.undo());
        assert!(!model.undo());
        assert_eq!(recorder.borrow().log.len(), 2);
    }

    #[test]
    fn new_action_discards_redo_tail() {
        let (mut model, _recorder) = model_with_recorder();
        model.do_action(add(vec![1], vec!["a"]));
        model.do_action(add(vec![2], vec!["b"]));
        model.undo();
        assert!(model.can_redo());
        model.do_action(add(vec![3], vec!["c"]));
        assert!(!model.can_redo());
        assert!(!model.redo());
        assert_eq!(model.document().cards.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn save_point_follows_cursor() {
        let (mut model, _recorder) = model_with_recorder();
        assert!(model.is_saved());
        model.do_action(add(vec![1], vec!["a"]));
        assert!(!model.is_saved());
        model.reset_save_reference();
        assert!(model.is_saved());
        model.do_action(add(vec![2], vec!["b"]));
        assert!(!model.is_saved());
        model.undo();
        assert!(model.is_saved());
        model.undo();
        assert!(!model.is_saved());
        model.redo();
        assert!(model.is_saved());
    }

    #[test]
    fn user_notify_bypasses_history() {
        let (mut model, recorder) = model_with_recorder();
        model.document_mut().focus = Some(3);
        model.user_notify(BoardEvent::Focus);
        assert!(!model.can_undo());
        assert!(model.is_saved());
        assert_eq!(recorder.borrow().log, vec!["focus:Some(3)"]);
    }

    #[test]
    fn detached_views_stop_receiving() {
        let (mut model, recorder) = model_with_recorder();
        let other = Rc::new(RefCell::new(Recorder::default()));
        let other_id = model.attach(other.clone());
        model.attach(other.clone());
        assert_eq!(model.view_count(), 2);
        model.do_action(add(vec![1], vec!["a"]));
        assert!(model.detach(other_id));
        let dyn_recorder: Rc<RefCell<dyn BoardView>> = recorder.clone();
        assert!(model.detach_view(&dyn_recorder));
        model.undo();
        assert_eq!(recorder.borrow().log.len(), 1);
        assert_eq!(other.borrow().log.len(), 1);
    }

    #[test]
    fn busy_view_is_skipped_not_panicking() {
        let (mut model, recorder) = model_with_recorder();
        let guard = recorder.borrow_mut();
        model.do_action(add(vec![1], vec!["a"]));
        drop(guard);
        assert!(recorder.borrow().log.is_empty());
        assert_eq!(model.document().cards.len(), 1);
    }
}
