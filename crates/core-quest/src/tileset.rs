//! Tileset resource: background color plus tile patterns keyed by id.
//!
//! Pattern ids come from a per-tileset counter that only moves forward, so an
//! id freed by a removal (or by undoing an add) is never handed out again.

use crate::error::{ParseError, QuestError, Result, ValidationError};
use crate::fs;
use crate::lua::{self, LuaCall, LuaValue};
use crate::tile_pattern::TilePattern;
use crate::types::{Color, Ground, Layer, Point, Scrolling};
use core_actions::{Adder, Remover, Setter, SubModelSetter};
use core_model::{Action, ActionKind, ActionScope, ActionTarget, Document, Model, View, ViewId};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, info};

pub const SET_PATTERN: ActionKind = ActionKind::Custom(12);
pub const ADD_PATTERN: ActionKind = ActionKind::Custom(13);
pub const REMOVE_PATTERN: ActionKind = ActionKind::Custom(14);

const NAME: &str = "name";
const BACKGROUND_COLOR: &str = "background_color";
const TILE_PATTERN: &str = "tile_pattern";

pub trait TilesetView: View {
    fn refresh_selection(&mut self, selection: &[i32]);
    fn refresh_pattern(&mut self, id: i32);
    fn add_patterns(&mut self, ids: &[i32]);
    fn remove_patterns(&mut self, ids: &[i32]);
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum TilesetEvent {
    Selection,
}

#[derive(Debug, Clone)]
pub(crate) struct TilesetData {
    id: String,
    name: String,
    background: Color,
    patterns: BTreeMap<i32, TilePattern>,
    selection: Vec<i32>,
    last_pattern_id: i32,
}

impl ActionTarget for TilesetData {
    type Id = i32;
}

impl Document for TilesetData {
    type View = dyn TilesetView;
    type UserEvent = TilesetEvent;

    fn on_action_notify(&mut self, action: &dyn Action<Self>, view: &mut Self::View) {
        match (action.kind(), action.scope()) {
            (SET_PATTERN, ActionScope::SubModel(id)) => view.refresh_pattern(*id),
            (ADD_PATTERN | REMOVE_PATTERN, ActionScope::Group(ids)) => {
                let (present, absent): (Vec<i32>, Vec<i32>) =
                    ids.iter().partition(|id| self.patterns.contains_key(*id));
                if !present.is_empty() {
                    view.add_patterns(&present);
                }
                if !absent.is_empty() {
                    view.remove_patterns(&absent);
                }
            }
            _ => {}
        }
    }

    fn on_user_notify(&mut self, event: TilesetEvent, view: &mut Self::View) {
        match event {
            TilesetEvent::Selection => view.refresh_selection(&self.selection),
        }
    }
}

impl TilesetData {
    fn swap_name(&mut self, name: String) -> String {
        std::mem::replace(&mut self.name, name)
    }

    fn swap_background(&mut self, color: Color) -> Color {
        std::mem::replace(&mut self.background, color)
    }

    fn swap_pattern(&mut self, id: &i32, pattern: TilePattern) -> TilePattern {
        let previous = self.patterns.insert(*id, pattern).unwrap_or_default();
        self.selection = vec![*id];
        previous
    }

    fn insert_patterns(&mut self, ids: &[i32], patterns: Vec<TilePattern>) {
        for (id, pattern) in ids.iter().zip(patterns) {
            self.patterns.insert(*id, pattern);
        }
        self.selection = ids.to_vec();
    }

    fn take_patterns(&mut self, ids: &[i32]) -> Vec<TilePattern> {
        self.selection.retain(|id| !ids.contains(id));
        ids.iter().filter_map(|id| self.patterns.remove(id)).collect()
    }

    /// Reserves `count` consecutive ids after the highest one ever used.
    fn reserve_pattern_ids(
        &mut self,
        count: usize,
    ) -> std::result::Result<Vec<i32>, ValidationError> {
        let last = i32::try_from(count)
            .ok()
            .and_then(|count| self.last_pattern_id.checked_add(count))
            .ok_or(ValidationError::PatternIdsExhausted)?;
        let ids = (self.last_pattern_id + 1..=last).collect();
        self.last_pattern_id = last;
        Ok(ids)
    }
}

fn rejected(id: &str, err: ValidationError) -> ValidationError {
    debug!(target: "quest.tileset", tileset = id, error = %err, "edit_rejected");
    err
}

pub struct Tileset {
    model: Model<TilesetData>,
}

impl Tileset {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::from_parts(id.into(), name.into(), Color::default(), BTreeMap::new())
    }

    fn from_parts(
        id: String,
        name: String,
        background: Color,
        patterns: BTreeMap<i32, TilePattern>,
    ) -> Self {
        let last_pattern_id = patterns.keys().next_back().copied().unwrap_or(0);
        Self {
            model: Model::new(TilesetData {
                id,
                name,
                background,
                patterns,
                selection: Vec::new(),
                last_pattern_id,
            }),
        }
    }

    fn data(&self) -> &TilesetData {
        self.model.document()
    }

    pub fn id(&self) -> &str {
        &self.data().id
    }

    pub fn name(&self) -> &str {
        &self.data().name
    }

    pub fn background_color(&self) -> Color {
        self.data().background
    }

    pub fn file_name(&self) -> String {
        format!("tilesets/{}.dat", self.id())
    }

    /// Copy of the data with an empty history and no views.
    pub fn duplicate(&self) -> Tileset {
        let data = self.data();
        let mut copy = Self::from_parts(
            data.id.clone(),
            data.name.clone(),
            data.background,
            data.patterns.clone(),
        );
        copy.model.document_mut().last_pattern_id = data.last_pattern_id;
        copy
    }

    pub fn attach(&mut self, view: Rc<RefCell<dyn TilesetView>>) -> ViewId {
        self.model.attach(view)
    }

    pub fn detach(&mut self, id: ViewId) -> bool {
        self.model.detach(id)
    }

    pub fn can_undo(&self) -> bool {
        self.model.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.model.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        self.model.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.model.redo()
    }

    pub fn is_saved(&self) -> bool {
        self.model.is_saved()
    }

    pub fn clear_actions(&mut self) {
        self.model.clear_actions();
    }

    pub fn set_history_limit(&mut self, limit: Option<usize>) {
        self.model.set_history_limit(limit);
    }

    pub fn pattern_exists(&self, id: i32) -> bool {
        self.data().patterns.contains_key(&id)
    }

    pub fn pattern(&self, id: i32) -> std::result::Result<&TilePattern, ValidationError> {
        self.data()
            .patterns
            .get(&id)
            .ok_or(ValidationError::PatternNotFound(id))
    }

    /// Patterns among `ids` that exist, in the given order.
    pub fn patterns(&self, ids: &[i32]) -> Vec<&TilePattern> {
        ids.iter().filter_map(|id| self.data().patterns.get(id)).collect()
    }

    pub fn pattern_ids(&self) -> Vec<i32> {
        self.data().patterns.keys().copied().collect()
    }

    pub fn all_patterns(&self) -> impl Iterator<Item = &TilePattern> {
        self.data().patterns.values()
    }

    pub fn selection(&self) -> &[i32] {
        &self.data().selection
    }

    pub fn has_selection(&self) -> bool {
        !self.data().selection.is_empty()
    }

    pub fn pattern_selection(&self) -> Vec<&TilePattern> {
        self.patterns(self.selection())
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        if name != self.data().name {
            self.model
                .do_action(Box::new(Setter::new(NAME, TilesetData::swap_name, name)));
        }
    }

    pub fn set_background_color(&mut self, color: Color) {
        if color != self.data().background {
            self.model.do_action(Box::new(Setter::new(
                BACKGROUND_COLOR,
                TilesetData::swap_background,
                color,
            )));
        }
    }

    pub fn add_pattern(
        &mut self,
        pattern: TilePattern,
    ) -> std::result::Result<i32, ValidationError> {
        let ids = self.add_patterns(vec![pattern])?;
        ids.first().copied().ok_or(ValidationError::PatternIdsExhausted)
    }

    /// Stores `patterns` under fresh ids, which become the selection.
    pub fn add_patterns(
        &mut self,
        patterns: Vec<TilePattern>,
    ) -> std::result::Result<Vec<i32>, ValidationError> {
        if patterns.is_empty() {
            return Ok(Vec::new());
        }
        let reserved = self.model.document_mut().reserve_pattern_ids(patterns.len());
        let ids = match reserved {
            Ok(ids) => ids,
            Err(err) => return Err(rejected(self.id(), err)),
        };
        let patterns = ids
            .iter()
            .zip(patterns)
            .map(|(id, pattern)| pattern.with_id(*id))
            .collect();
        self.model.do_action(Box::new(
            Adder::new(
                TILE_PATTERN,
                TilesetData::insert_patterns,
                TilesetData::take_patterns,
                ids.clone(),
                patterns,
            )
            .with_kind(ADD_PATTERN),
        ));
        Ok(ids)
    }

    pub fn remove_pattern(&mut self, id: i32) -> bool {
        if !self.pattern_exists(id) {
            return false;
        }
        self.push_remover(vec![id]);
        true
    }

    /// Removes every pattern of `ids`; fails without change when one is absent.
    pub fn remove_patterns(&mut self, ids: &[i32]) -> std::result::Result<(), ValidationError> {
        if let Some(&missing) = ids.iter().find(|id| !self.pattern_exists(**id)) {
            return Err(rejected(self.id(), ValidationError::PatternNotFound(missing)));
        }
        let mut unique = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(id) {
                unique.push(*id);
            }
        }
        if !unique.is_empty() {
            self.push_remover(unique);
        }
        Ok(())
    }

    /// Returns `false` when nothing is selected.
    pub fn remove_selection_patterns(&mut self) -> std::result::Result<bool, ValidationError> {
        if !self.has_selection() {
            return Ok(false);
        }
        let selection = self.data().selection.clone();
        self.remove_patterns(&selection)?;
        Ok(true)
    }

    fn push_remover(&mut self, ids: Vec<i32>) {
        self.model.do_action(Box::new(
            Remover::new(
                TILE_PATTERN,
                TilesetData::take_patterns,
                TilesetData::insert_patterns,
                ids,
            )
            .with_kind(REMOVE_PATTERN),
        ));
    }

    /// Replaces the pattern under `id`, or adds it under that id when absent.
    pub fn set_pattern(&mut self, id: i32, pattern: TilePattern) {
        let pattern = pattern.with_id(id);
        if self.pattern_exists(id) {
            self.model.do_action(Box::new(
                SubModelSetter::new(TILE_PATTERN, TilesetData::swap_pattern, id, pattern)
                    .with_kind(SET_PATTERN),
            ));
            return;
        }
        let document = self.model.document_mut();
        document.last_pattern_id = document.last_pattern_id.max(id);
        self.model.do_action(Box::new(
            Adder::new(
                TILE_PATTERN,
                TilesetData::insert_patterns,
                TilesetData::take_patterns,
                vec![id],
                vec![pattern],
            )
            .with_kind(ADD_PATTERN),
        ));
    }

    /// Adds `id` to the selection when it names an unselected pattern.
    pub fn select_pattern(&mut self, id: i32) {
        if self.pattern_exists(id) && !self.data().selection.contains(&id) {
            self.model.document_mut().selection.push(id);
            self.model.user_notify(TilesetEvent::Selection);
        }
    }

    pub fn unselect_pattern(&mut self, id: i32) {
        if self.data().selection.contains(&id) {
            self.model.document_mut().selection.retain(|s| *s != id);
            self.model.user_notify(TilesetEvent::Selection);
        }
    }

    pub fn clear_selection(&mut self) {
        if self.has_selection() {
            self.model.document_mut().selection.clear();
            self.model.user_notify(TilesetEvent::Selection);
        }
    }

    pub fn to_lua(&self) -> String {
        let Color { red, green, blue } = self.background_color();
        let mut lua = format!("background_color{{ {red}, {green}, {blue} }}\n\n");
        for pattern in self.all_patterns() {
            lua.push_str(&pattern.to_lua());
            lua.push_str("\n\n");
        }
        lua
    }

    /// Writes `<data_dir>/tilesets/<id>.dat` unless there is nothing to save.
    pub fn save(&mut self, data_dir: &Path) -> Result<()> {
        if self.is_saved() {
            return Ok(());
        }
        let path = data_dir.join(self.file_name());
        fs::write_file(&path, &self.to_lua())?;
        self.model.reset_save_reference();
        info!(target: "quest.tileset", tileset = self.id(), path = %path.display(), "saved");
        Ok(())
    }

    pub fn load(data_dir: &Path, id: &str, name: &str) -> Result<Tileset> {
        let path = data_dir.join(format!("tilesets/{id}.dat"));
        let text = fs::read_file(&path)?;
        let tileset = Self::from_lua(id, name, &text).map_err(|source| QuestError::Parse {
            path: path.clone(),
            source,
        })?;
        info!(
            target: "quest.tileset",
            tileset = id,
            patterns = tileset.data().patterns.len(),
            path = %path.display(),
            "loaded"
        );
        Ok(tileset)
    }

    pub fn from_lua(id: &str, name: &str, text: &str) -> std::result::Result<Tileset, ParseError> {
        let mut background = Color::default();
        let mut patterns = BTreeMap::new();
        for call in lua::parse_calls(text)? {
            match call.name.as_str() {
                "background_color" => background = parse_color(&call)?,
                "tile_pattern" => {
                    let pattern = parse_pattern(&call)?;
                    patterns.insert(pattern.id(), pattern);
                }
                other => return Err(call.error(format!("unknown function '{other}'"))),
            }
        }
        Ok(Self::from_parts(id.to_owned(), name.to_owned(), background, patterns))
    }
}

fn parse_color(call: &LuaCall) -> std::result::Result<Color, ParseError> {
    let channel = |value: &LuaValue| match value {
        LuaValue::Int(v) => u8::try_from(*v).map_err(|_| call.error(format!("color component {v} is out of range"))),
        _ => Err(call.error("color components must be integers")),
    };
    match call.table.items.as_slice() {
        [r, g, b] => Ok(Color::rgb(channel(r)?, channel(g)?, channel(b)?)),
        _ => Err(call.error("expected three color components")),
    }
}

fn to_i32(call: &LuaCall, key: &str, value: i64) -> std::result::Result<i32, ParseError> {
    i32::try_from(value).map_err(|_| call.error(format!("'{key}' is out of range")))
}

fn required(call: &LuaCall, key: &str) -> std::result::Result<i32, ParseError> {
    let value = call
        .int(key)?
        .ok_or_else(|| call.error(format!("missing {key} for this tile pattern")))?;
    to_i32(call, key, value)
}

fn parse_pattern(call: &LuaCall) -> std::result::Result<TilePattern, ParseError> {
    let id = required(call, "id")?;
    let layer = call
        .int("default_layer")?
        .ok_or_else(|| call.error("missing default_layer for this tile pattern"))?;
    let width = required(call, "width")?;
    let height = required(call, "height")?;
    let xs = call.int_list("x")?.unwrap_or_default();
    let ys = call.int_list("y")?.unwrap_or_default();
    for (key, values) in [("x", &xs), ("y", &ys)] {
        if !matches!(values.len(), 1 | 3 | 4) {
            return Err(call.error(format!("invalid number of frames for {key}")));
        }
    }
    if xs.len() != ys.len() {
        return Err(call.error("the length of x and y must match"));
    }
    let points = xs
        .iter()
        .zip(&ys)
        .map(|(x, y)| Ok(Point::new(to_i32(call, "x", *x)?, to_i32(call, "y", *y)?)))
        .collect::<std::result::Result<Vec<_>, ParseError>>()?;

    let invalid = |err: ValidationError| call.error(err.to_string());
    let mut pattern = TilePattern::default().with_id(id);
    pattern.set_size(width, height).map_err(invalid)?;
    if let [a, b, c, ..] = points[..] {
        pattern.set_positions([a, b, c], points.len() == 4).map_err(invalid)?;
    } else if let Some(single) = points.first() {
        pattern.set_position(*single).map_err(invalid)?;
    }
    pattern.set_default_layer(
        Layer::from_code(layer).ok_or_else(|| call.error(format!("invalid layer {layer}")))?,
    );
    if let Some(ground) = call.string("ground")? {
        pattern.set_ground(
            Ground::parse_lenient(ground)
                .ok_or_else(|| call.error(format!("invalid ground '{ground}'")))?,
        );
    }
    if let Some(scrolling) = call.string("scrolling")? {
        pattern.set_scrolling(
            Scrolling::parse(scrolling)
                .ok_or_else(|| call.error(format!("invalid scrolling '{scrolling}'")))?,
        );
    }
    Ok(pattern)
}

impl std::fmt::Debug for Tileset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tileset")
            .field("id", &self.id())
            .field("patterns", &self.data().patterns.len())
            .field("model", &self.model)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Log(Vec<String>);

    impl View for Log {
        fn simple_refresh(&mut self, message: &str) {
            self.0.push(format!("refresh {message}"));
        }
    }

    impl TilesetView for Log {
        fn refresh_selection(&mut self, selection: &[i32]) {
            self.0.push(format!("selection {selection:?}"));
        }
        fn refresh_pattern(&mut self, id: i32) {
            self.0.push(format!("pattern {id}"));
        }
        fn add_patterns(&mut self, ids: &[i32]) {
            self.0.push(format!("add {ids:?}"));
        }
        fn remove_patterns(&mut self, ids: &[i32]) {
            self.0.push(format!("remove {ids:?}"));
        }
    }

    fn observed() -> (Tileset, Rc<RefCell<Log>>) {
        let mut tileset = Tileset::new("house", "House");
        let log = Rc::new(RefCell::new(Log::default()));
        tileset.attach(log.clone());
        (tileset, log)
    }

    #[test]
    fn ids_are_never_reused() {
        let (mut tileset, log) = observed();
        let first = tileset.add_pattern(TilePattern::default()).unwrap();
        let more = tileset
            .add_patterns(vec![TilePattern::default(), TilePattern::default()])
            .unwrap();
        assert_eq!((first, more.clone()), (1, vec![2, 3]));
        assert_eq!(tileset.selection(), &[2, 3]);
        assert_eq!(tileset.pattern(2).unwrap().id(), 2);
        tileset.undo();
        assert_eq!(tileset.pattern_ids(), vec![1]);
        assert_eq!(tileset.add_pattern(TilePattern::default()), Ok(4));
        assert_eq!(log.borrow().0, vec!["add [1]", "add [2, 3]", "remove [2, 3]", "add [4]"]);
    }

    #[test]
    fn remove_patterns_is_all_or_nothing() {
        let (mut tileset, _log) = observed();
        tileset
            .add_patterns(vec![TilePattern::default(), TilePattern::default()])
            .unwrap();
        assert_eq!(
            tileset.remove_patterns(&[1, 7]),
            Err(ValidationError::PatternNotFound(7))
        );
        assert_eq!(tileset.pattern_ids(), vec![1, 2]);
        assert!(!tileset.remove_pattern(9));
        tileset.remove_patterns(&[2, 1, 2]).unwrap();
        assert!(tileset.pattern_ids().is_empty());
        assert!(!tileset.has_selection());
        tileset.undo();
        assert_eq!(tileset.pattern_ids(), vec![1, 2]);
    }

    #[test]
    fn set_pattern_selects_and_refreshes() {
        let (mut tileset, log) = observed();
        let id = tileset.add_pattern(TilePattern::default()).unwrap();
        tileset.add_pattern(TilePattern::default()).unwrap();
        let wide = TilePattern::new(Point::new(8, 8), 16, 8).unwrap();
        tileset.set_pattern(id, wide);
        assert_eq!(tileset.selection(), &[id]);
        assert_eq!(tileset.pattern(id).unwrap().width(), 16);
        assert_eq!(tileset.pattern(id).unwrap().id(), id);
        tileset.undo();
        assert_eq!(tileset.pattern(id).unwrap().width(), 8);
        assert_eq!(log.borrow().0[2..], ["pattern 1", "pattern 1"]);
    }

    #[test]
    fn set_pattern_on_new_id_moves_counter_past_it() {
        let (mut tileset, _log) = observed();
        tileset.set_pattern(10, TilePattern::default());
        assert!(tileset.pattern_exists(10));
        assert_eq!(tileset.add_pattern(TilePattern::default()), Ok(11));
    }

    #[test]
    fn selection_toggles_and_bypasses_history() {
        let (mut tileset, log) = observed();
        tileset
            .add_patterns(vec![TilePattern::default(), TilePattern::default()])
            .unwrap();
        tileset.clear_selection();
        tileset.select_pattern(2);
        tileset.select_pattern(2);
        tileset.select_pattern(5);
        tileset.unselect_pattern(1);
        assert_eq!(tileset.selection(), &[2]);
        tileset.unselect_pattern(2);
        assert_eq!(tileset.model.history().len(), 1);
        assert_eq!(
            log.borrow().0[1..],
            ["selection []", "selection [2]", "selection []"]
        );
    }

    #[test]
    fn remove_selection_patterns() {
        let (mut tileset, _log) = observed();
        assert_eq!(tileset.remove_selection_patterns(), Ok(false));
        tileset
            .add_patterns(vec![TilePattern::default(), TilePattern::default()])
            .unwrap();
        tileset.add_pattern(TilePattern::default()).unwrap();
        assert_eq!(tileset.remove_selection_patterns(), Ok(true));
        assert_eq!(tileset.pattern_ids(), vec![1, 2]);
    }

    #[test]
    fn background_color_is_a_basic_setter() {
        let (mut tileset, log) = observed();
        assert_eq!(tileset.background_color(), Color::WHITE);
        tileset.set_background_color(Color::WHITE);
        assert!(!tileset.can_undo());
        tileset.set_background_color(Color::rgb(48, 8, 120));
        tileset.undo();
        tileset.redo();
        assert_eq!(tileset.background_color(), Color::rgb(48, 8, 120));
        assert_eq!(log.borrow().0, vec!["refresh background_color"; 3]);
    }

    #[test]
    fn exhausted_ids_reject_new_patterns() {
        let (mut tileset, log) = observed();
        tileset.set_pattern(i32::MAX, TilePattern::default());
        assert_eq!(
            tileset.add_pattern(TilePattern::default()),
            Err(ValidationError::PatternIdsExhausted)
        );
        assert_eq!(
            tileset.add_patterns(vec![TilePattern::default()]),
            Err(ValidationError::PatternIdsExhausted)
        );
        assert_eq!(tileset.pattern_ids(), vec![i32::MAX]);
        assert_eq!(tileset.model.history().len(), 1);
        assert_eq!(log.borrow().0.len(), 1);
    }

    #[test]
    fn batch_that_would_pass_the_last_id_adds_nothing() {
        let (mut tileset, _log) = observed();
        tileset.set_pattern(i32::MAX - 1, TilePattern::default());
        assert_eq!(
            tileset.add_patterns(vec![TilePattern::default(), TilePattern::default()]),
            Err(ValidationError::PatternIdsExhausted)
        );
        assert_eq!(tileset.add_pattern(TilePattern::default()), Ok(i32::MAX));
        assert_eq!(tileset.pattern_ids(), vec![i32::MAX - 1, i32::MAX]);
    }

    #[test]
    fn lua_round_trip_restores_patterns_and_counter() {
        let mut tileset = Tileset::new("house", "House");
        tileset.set_background_color(Color::rgb(1, 2, 3));
        let mut animated = TilePattern::default();
        animated
            .set_positions([Point::new(0, 0), Point::new(8, 0), Point::new(16, 0)], true)
            .unwrap();
        animated.set_scrolling(Scrolling::OnSelf);
        tileset
            .add_pattern(TilePattern::new(Point::new(8, 16), 16, 16).unwrap())
            .unwrap();
        tileset.add_pattern(animated).unwrap();
        tileset.remove_pattern(1);

        let loaded = Tileset::from_lua("house", "House", &tileset.to_lua()).unwrap();
        assert_eq!(loaded.background_color(), Color::rgb(1, 2, 3));
        assert_eq!(
            loaded.all_patterns().collect::<Vec<_>>(),
            tileset.all_patterns().collect::<Vec<_>>()
        );
        let mut loaded = loaded;
        assert_eq!(loaded.add_pattern(TilePattern::default()), Ok(3));
    }

    #[test]
    fn malformed_pattern_reports_its_line() {
        let text = "background_color{ 0, 0, 0 }\n\ntile_pattern{\n  id = 1,\n  default_layer = 0,\n  x = {0, 8},\n  y = {0, 8},\n  width = 8,\n  height = 8\n}";
        let err = Tileset::from_lua("t", "t", text).unwrap_err();
        assert_eq!(err, ParseError::new(3, "invalid number of frames for x"));

        let err = Tileset::from_lua("t", "t", "tile_pattern{ id = 1, default_layer = 0, x = 0, y = 0, width = 10, height = 8 }").unwrap_err();
        assert_eq!(err.message, "width must be a multiple of 8 and greater than 0 (got 10)");

        let err = Tileset::from_lua("t", "t", "tile_pattern{ default_layer = 0, x = 0, y = 0, width = 8, height = 8 }").unwrap_err();
        assert_eq!(err.message, "missing id for this tile pattern");

        let err = Tileset::from_lua("t", "t", "background_color{ 300, 0, 0 }").unwrap_err();
        assert_eq!(err.message, "color component 300 is out of range");
    }
}
