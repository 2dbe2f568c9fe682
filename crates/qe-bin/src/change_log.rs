//! Observer that reports every notification of an edited resource.

use core_model::View;
use core_quest::{QuestView, ResourceType, SpriteSelection, SpriteView, TilesetView};
use tracing::info;

/// Attached to the resources a command edits; each notification is logged
/// under the `view` target and kept so the command can echo it.
#[derive(Debug, Default)]
pub struct ChangeLog {
    entries: Vec<String>,
}

impl ChangeLog {
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    fn push(&mut self, entry: String) {
        info!(target: "view", change = entry.as_str(), "notified");
        self.entries.push(entry);
    }
}

fn join_ids(ids: &[i32]) -> String {
    ids.iter().map(i32::to_string).collect::<Vec<_>>().join(",")
}

impl View for ChangeLog {
    fn simple_refresh(&mut self, message: &str) {
        self.push(format!("refresh: {message}"));
    }
}

impl SpriteView for ChangeLog {
    fn refresh_selection(&mut self, selection: &SpriteSelection) {
        let name = selection.animation_name().unwrap_or("-");
        self.push(format!("selection: {name}"));
    }

    fn refresh_animation(&mut self, name: &str) {
        self.push(format!("animation changed: {name}"));
    }

    fn add_animation(&mut self, name: &str) {
        self.push(format!("animation added: {name}"));
    }

    fn remove_animation(&mut self, name: &str) {
        self.push(format!("animation removed: {name}"));
    }

    fn rename_animation(&mut self, old: &str, new: &str) {
        self.push(format!("animation renamed: {old} -> {new}"));
    }
}

impl TilesetView for ChangeLog {
    fn refresh_selection(&mut self, selection: &[i32]) {
        self.push(format!("selection: [{}]", join_ids(selection)));
    }

    fn refresh_pattern(&mut self, id: i32) {
        self.push(format!("pattern changed: {id}"));
    }

    fn add_patterns(&mut self, ids: &[i32]) {
        self.push(format!("patterns added: [{}]", join_ids(ids)));
    }

    fn remove_patterns(&mut self, ids: &[i32]) {
        self.push(format!("patterns removed: [{}]", join_ids(ids)));
    }
}

impl QuestView for ChangeLog {
    fn add_resource(&mut self, kind: ResourceType, id: &str) {
        self.push(format!("{kind} registered: {id}"));
    }

    fn refresh_resource(&mut self, kind: ResourceType, id: &str) {
        self.push(format!("{kind} updated: {id}"));
    }

    fn remove_resource(&mut self, kind: ResourceType, id: &str) {
        self.push(format!("{kind} unregistered: {id}"));
    }
}
