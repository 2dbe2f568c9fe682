//! Sprite resource: named animations plus a selection.
//!
//! Every persistent change goes through the undoable [`Model`]; the
//! selection is UI state and is only broadcast.
//!
//! Data file layout (`sprites/<id>.dat`), animations in name order and
//! separated by a blank line:
//!
//! ```text
//! walking hero.png 4 100 0
//! 0	0	16	24	8	21	8	8
//! ...
//! ```

use crate::error::{ParseError, QuestError, Result, ValidationError};
use crate::fs;
use crate::sprite_animation::SpriteAnimation;
use crate::sprite_direction::SpriteDirection;
use crate::sprite_selection::SpriteSelection;
use crate::types::{Point, Rect};
use core_actions::{Adder, Remover, Setter, SubModelRename, SubModelSetter};
use core_model::{Action, ActionKind, ActionScope, ActionTarget, Document, Model, View, ViewId};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, info};

pub const SET_ANIMATION: ActionKind = ActionKind::Custom(12);
pub const ADD_ANIMATION: ActionKind = ActionKind::Custom(13);
pub const REMOVE_ANIMATION: ActionKind = ActionKind::Custom(14);

const NAME: &str = "name";
const ANIMATION: &str = "animation";

/// Observer of a [`Sprite`].
pub trait SpriteView: View {
    fn refresh_selection(&mut self, selection: &SpriteSelection);
    fn refresh_animation(&mut self, name: &str);
    fn add_animation(&mut self, name: &str);
    fn remove_animation(&mut self, name: &str);
    fn rename_animation(&mut self, old: &str, new: &str);
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum SpriteEvent {
    Selection,
}

#[derive(Debug, Clone)]
pub(crate) struct SpriteData {
    id: String,
    name: String,
    animations: BTreeMap<String, SpriteAnimation>,
    selection: SpriteSelection,
}

impl ActionTarget for SpriteData {
    type Id = String;
}

impl Document for SpriteData {
    type View = dyn SpriteView;
    type UserEvent = SpriteEvent;

    fn on_action_notify(&mut self, action: &dyn Action<Self>, view: &mut Self::View) {
        match (action.kind(), action.scope()) {
            (SET_ANIMATION, ActionScope::SubModel(name)) => {
                if self.selection.animation_name() == Some(name.as_str()) {
                    view.refresh_animation(name);
                } else {
                    self.selection = SpriteSelection::animation(name.as_str());
                    view.refresh_selection(&self.selection);
                }
            }
            (ADD_ANIMATION | REMOVE_ANIMATION, ActionScope::Group(names)) => {
                for name in names {
                    if self.animations.contains_key(name) {
                        view.add_animation(name);
                    } else {
                        view.remove_animation(name);
                    }
                }
            }
            (ActionKind::Rename, ActionScope::Rename { old, new }) => {
                view.rename_animation(old, new);
            }
            _ => {}
        }
    }

    fn on_user_notify(&mut self, event: SpriteEvent, view: &mut Self::View) {
        match event {
            SpriteEvent::Selection => view.refresh_selection(&self.selection),
        }
    }
}

impl SpriteData {
    fn swap_name(&mut self, name: String) -> String {
        std::mem::replace(&mut self.name, name)
    }

    fn swap_animation(&mut self, name: &String, animation: SpriteAnimation) -> SpriteAnimation {
        let directions = animation.direction_count();
        let previous = self
            .animations
            .insert(name.clone(), animation)
            .unwrap_or_default();
        if self.selection.animation_name() == Some(name.as_str())
            && self.selection.direction_index().is_some_and(|i| i >= directions)
        {
            self.selection = SpriteSelection::animation(name.as_str());
        }
        previous
    }

    fn insert_animations(&mut self, names: &[String], animations: Vec<SpriteAnimation>) {
        for (name, animation) in names.iter().zip(animations) {
            self.animations.insert(name.clone(), animation);
        }
        if let Some(first) = names.first() {
            self.selection = SpriteSelection::animation(first.as_str());
        }
    }

    fn take_animations(&mut self, names: &[String]) -> Vec<SpriteAnimation> {
        let removed = names
            .iter()
            .filter_map(|name| self.animations.remove(name))
            .collect();
        if let Some(selected) = self.selection.animation_name()
            && names.iter().any(|n| n == selected)
        {
            self.selection = SpriteSelection::Empty;
        }
        removed
    }

    fn move_animation(&mut self, from: &String, to: &String) {
        if let Some(animation) = self.animations.remove(from) {
            self.animations.insert(to.clone(), animation.renamed(to.as_str()));
        }
        if self.selection.animation_name() == Some(from.as_str()) {
            self.selection = self.selection.with_animation(to);
        }
    }

    fn check_animation_exists(&self, name: &str) -> std::result::Result<(), ValidationError> {
        if self.animations.contains_key(name) {
            Ok(())
        } else {
            Err(ValidationError::AnimationNotFound(name.to_owned()))
        }
    }

    fn check_selection(&self, selection: &SpriteSelection) -> std::result::Result<(), ValidationError> {
        let Some(name) = selection.animation_name() else {
            return Ok(());
        };
        let animation = self
            .animations
            .get(name)
            .ok_or_else(|| ValidationError::AnimationNotFound(name.to_owned()))?;
        match selection.direction_index() {
            Some(index) if !animation.has_direction(index) => {
                Err(ValidationError::SelectedDirectionNotFound {
                    animation: name.to_owned(),
                    direction: index,
                })
            }
            _ => Ok(()),
        }
    }
}

fn rejected(id: &str, err: ValidationError) -> ValidationError {
    debug!(target: "quest.sprite", sprite = id, error = %err, "edit_rejected");
    err
}

pub struct Sprite {
    model: Model<SpriteData>,
}

impl Sprite {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::from_parts(id.into(), name.into(), BTreeMap::new())
    }

    fn from_parts(id: String, name: String, animations: BTreeMap<String, SpriteAnimation>) -> Self {
        Self {
            model: Model::new(SpriteData {
                id,
                name,
                animations,
                selection: SpriteSelection::Empty,
            }),
        }
    }

    fn data(&self) -> &SpriteData {
        self.model.document()
    }

    pub fn id(&self) -> &str {
        &self.data().id
    }

    pub fn name(&self) -> &str {
        &self.data().name
    }

    /// Path of the data file, relative to the quest data directory.
    pub fn file_name(&self) -> String {
        format!("sprites/{}.dat", self.id())
    }

    /// Copy of the data with an empty history and no views.
    pub fn duplicate(&self) -> Sprite {
        let data = self.data();
        Self::from_parts(data.id.clone(), data.name.clone(), data.animations.clone())
    }

    pub fn attach(&mut self, view: Rc<RefCell<dyn SpriteView>>) -> ViewId {
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

    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        if name != self.data().name {
            self.model
                .do_action(Box::new(Setter::new(NAME, SpriteData::swap_name, name)));
        }
    }

    pub fn animation_exists(&self, name: &str) -> bool {
        self.data().animations.contains_key(name)
    }

    pub fn animation(&self, name: &str) -> std::result::Result<&SpriteAnimation, ValidationError> {
        self.data()
            .animations
            .get(name)
            .ok_or_else(|| ValidationError::AnimationNotFound(name.to_owned()))
    }

    /// Animations among `names` that exist, in the given order.
    pub fn animations<'a>(&'a self, names: &[&str]) -> Vec<&'a SpriteAnimation> {
        names
            .iter()
            .filter_map(|name| self.data().animations.get(*name))
            .collect()
    }

    pub fn animation_names(&self) -> Vec<&str> {
        self.data().animations.keys().map(String::as_str).collect()
    }

    pub fn all_animations(&self) -> impl Iterator<Item = &SpriteAnimation> {
        self.data().animations.values()
    }

    pub fn selection(&self) -> &SpriteSelection {
        &self.data().selection
    }

    /// Replaces the animation stored under `name`, or adds it when absent.
    /// The stored copy always carries `name`.
    pub fn set_animation(
        &mut self,
        name: &str,
        animation: &SpriteAnimation,
    ) -> std::result::Result<(), ValidationError> {
        if name.is_empty() {
            return Err(rejected(self.id(), ValidationError::EmptyAnimationName));
        }
        let stored = animation.renamed(name);
        let action: Box<dyn Action<SpriteData>> = if self.animation_exists(name) {
            Box::new(
                SubModelSetter::new(ANIMATION, SpriteData::swap_animation, name.to_owned(), stored)
                    .with_kind(SET_ANIMATION),
            )
        } else {
            Box::new(
                Adder::new(
                    ANIMATION,
                    SpriteData::insert_animations,
                    SpriteData::take_animations,
                    vec![name.to_owned()],
                    vec![stored],
                )
                .with_kind(ADD_ANIMATION),
            )
        };
        self.model.do_action(action);
        Ok(())
    }

    pub fn remove_animation(&mut self, name: &str) -> bool {
        if !self.animation_exists(name) {
            return false;
        }
        self.model.do_action(Box::new(
            Remover::new(
                ANIMATION,
                SpriteData::take_animations,
                SpriteData::insert_animations,
                vec![name.to_owned()],
            )
            .with_kind(REMOVE_ANIMATION),
        ));
        true
    }

    pub fn rename_animation(
        &mut self,
        name: &str,
        new_name: &str,
    ) -> std::result::Result<(), ValidationError> {
        if new_name.is_empty() {
            return Err(rejected(self.id(), ValidationError::EmptyAnimationName));
        }
        if name == new_name {
            return Ok(());
        }
        if let Err(err) = self.data().check_animation_exists(name) {
            return Err(rejected(self.id(), err));
        }
        if self.animation_exists(new_name) {
            return Err(rejected(
                self.id(),
                ValidationError::AnimationExists(new_name.to_owned()),
            ));
        }
        self.model.do_action(Box::new(SubModelRename::new(
            ANIMATION,
            SpriteData::move_animation,
            name.to_owned(),
            new_name.to_owned(),
        )));
        Ok(())
    }

    pub fn set_selection(
        &mut self,
        selection: SpriteSelection,
    ) -> std::result::Result<(), ValidationError> {
        if let Err(err) = self.data().check_selection(&selection) {
            return Err(rejected(self.id(), err));
        }
        self.model.document_mut().selection = selection;
        self.model.user_notify(SpriteEvent::Selection);
        Ok(())
    }

    pub fn to_data(&self) -> String {
        self.all_animations()
            .map(|animation| animation.to_data() + "\n\n")
            .collect()
    }

    /// Writes `<data_dir>/sprites/<id>.dat`. Nothing is written when the
    /// sprite has no unsaved change.
    pub fn save(&mut self, data_dir: &Path) -> Result<()> {
        if self.is_saved() {
            return Ok(());
        }
        let path = data_dir.join(self.file_name());
        fs::write_file(&path, &self.to_data())?;
        self.model.reset_save_reference();
        info!(target: "quest.sprite", sprite = self.id(), path = %path.display(), "saved");
        Ok(())
    }

    pub fn load(data_dir: &Path, id: &str, name: &str) -> Result<Sprite> {
        let path = data_dir.join(format!("sprites/{id}.dat"));
        let text = fs::read_file(&path)?;
        let sprite = Self::from_data(id, name, &text).map_err(|source| QuestError::Parse {
            path: path.clone(),
            source,
        })?;
        info!(
            target: "quest.sprite",
            sprite = id,
            animations = sprite.data().animations.len(),
            path = %path.display(),
            "loaded"
        );
        Ok(sprite)
    }

    pub fn from_data(id: &str, name: &str, text: &str) -> std::result::Result<Sprite, ParseError> {
        let mut animations = BTreeMap::new();
        let mut lines = text.lines().enumerate().map(|(n, line)| (n + 1, line));
        while let Some((line_no, line)) = lines.next() {
            if line.trim().is_empty() {
                continue;
            }
            let (mut animation, directions) = parse_header(line_no, line)?;
            for _ in 0..directions {
                let (line_no, line) = lines.next().ok_or_else(|| {
                    ParseError::new(line_no, format!("animation '{}' is missing directions", animation.name()))
                })?;
                animation.add_direction(parse_direction(line_no, line)?);
            }
            let key = animation.name().to_owned();
            if animations.insert(key.clone(), animation).is_some() {
                return Err(ParseError::new(line_no, format!("animation '{key}' is defined twice")));
            }
        }
        Ok(Self::from_parts(id.to_owned(), name.to_owned(), animations))
    }
}

fn parse_int<T: std::str::FromStr>(line_no: usize, field: &str) -> std::result::Result<T, ParseError> {
    field
        .parse()
        .map_err(|_| ParseError::new(line_no, format!("'{field}' is not a valid number")))
}

fn parse_header(line_no: usize, line: &str) -> std::result::Result<(SpriteAnimation, usize), ParseError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [name, image, directions, delay, on_loop] = fields[..] else {
        return Err(ParseError::new(
            line_no,
            "expected 'name image directions frame_delay frame_on_loop'",
        ));
    };
    let animation = SpriteAnimation::new(
        name,
        image,
        parse_int(line_no, delay)?,
        parse_int(line_no, on_loop)?,
    )
    .map_err(|err| ParseError::new(line_no, err.to_string()))?;
    Ok((animation, parse_int(line_no, directions)?))
}

fn parse_direction(line_no: usize, line: &str) -> std::result::Result<SpriteDirection, ParseError> {
    let values = line
        .split_whitespace()
        .map(|field| parse_int::<i32>(line_no, field))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let [x, y, width, height, origin_x, origin_y, frames, columns] = values[..] else {
        return Err(ParseError::new(line_no, "expected 8 direction fields"));
    };
    SpriteDirection::new(
        Rect::new(x, y, width, height),
        Point::new(origin_x, origin_y),
        frames,
        columns,
    )
    .map_err(|err| ParseError::new(line_no, err.to_string()))
}

impl std::fmt::Debug for Sprite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sprite")
            .field("id", &self.id())
            .field("animations", &self.animation_names())
            .field("model", &self.model)
            .finish()
    }
}
