//! Linear action history with a cursor and a version-based save point.
//!
//! Entries left of the cursor are *done*, entries right of it are waiting for
//! a redo. Recording a new action discards the redo tail.
//!
//! Save tracking: every recorded action receives a version from a counter that
//! only ever increases, so a version is never reused even after truncation or
//! trimming. The history is "saved" when the version left of the cursor equals
//! the version captured by [`History::mark_saved`]. Version 0 stands for "no
//! action applied" (fresh or cleared history).

use core_actions::{Action, ActionTarget};
use tracing::trace;

struct Entry<T: ActionTarget> {
    action: Box<dyn Action<T>>,
    version: u64,
}

pub struct History<T: ActionTarget> {
    entries: Vec<Entry<T>>,
    cursor: usize,
    next_version: u64,
    /// Version of the newest entry dropped by trimming (state at cursor 0).
    base_version: u64,
    saved_version: u64,
    limit: Option<usize>,
}

impl<T: ActionTarget> Default for History<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActionTarget> History<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            next_version: 1,
            base_version: 0,
            saved_version: 0,
            limit: None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn cursor(&self) -> usize {
        self.cursor
    }
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }
    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    /// Cap the number of retained actions; `None` or `Some(0)` means unbounded.
    pub fn set_limit(&mut self, limit: Option<usize>) {
        self.limit = limit.filter(|l| *l > 0);
        self.trim();
    }

    /// Drop the redo tail, append `action` and move the cursor past it.
    /// Returns the recorded action so the caller can execute it.
    pub fn record(&mut self, action: Box<dyn Action<T>>) -> &mut dyn Action<T> {
        if self.can_redo() {
            let dropped = self.entries.len() - self.cursor;
            self.entries.truncate(self.cursor);
            trace!(target: "model.history", dropped, "redo_tail_dropped");
        }
        let version = self.next_version;
        self.next_version += 1;
        self.entries.push(Entry { action, version });
        self.cursor = self.entries.len();
        self.trim();
        trace!(target: "model.history", depth = self.entries.len(), version, "record");
        let last = self.cursor - 1;
        self.entries[last].action.as_mut()
    }

    /// Move the cursor one step back, yielding the action to reverse.
    pub fn step_back(&mut self) -> Option<&mut dyn Action<T>> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        trace!(target: "model.history", cursor = self.cursor, depth = self.entries.len(), "step_back");
        Some(self.entries[self.cursor].action.as_mut())
    }

    /// Move the cursor one step forward, yielding the action to re-execute.
    pub fn step_forward(&mut self) -> Option<&mut dyn Action<T>> {
        if !self.can_redo() {
            return None;
        }
        let index = self.cursor;
        self.cursor += 1;
        trace!(target: "model.history", cursor = self.cursor, depth = self.entries.len(), "step_forward");
        Some(self.entries[index].action.as_mut())
    }

    /// Discard every action. The saved version is kept as is, so the history
    /// only reports saved afterwards if it was saved while empty.
    pub fn clear(&mut self) {
        let dropped = self.entries.len();
        self.entries.clear();
        self.cursor = 0;
        self.base_version = 0;
        trace!(target: "model.history", dropped, "cleared");
    }

    pub fn current_version(&self) -> u64 {
        match self.cursor {
            0 => self.base_version,
            n => self.entries[n - 1].version,
        }
    }

    pub fn mark_saved(&mut self) {
        self.saved_version = self.current_version();
        trace!(target: "model.history", version = self.saved_version, "save_point_reset");
    }

    pub fn is_saved(&self) -> bool {
        self.saved_version == self.current_version()
    }

    fn trim(&mut self) {
        let Some(limit) = self.limit else {
            return;
        };
        if self.entries.len() <= limit {
            return;
        }
        let excess = self.entries.len() - limit;
        // Never trim actions that are waiting for a redo.
        let excess = excess.min(self.cursor);
        if excess == 0 {
            return;
        }
        self.base_version = self.entries[excess - 1].version;
        self.entries.drain(..excess);
        self.cursor -= excess;
        trace!(target: "model.history", excess, limit, "history_trimmed");
    }
}
