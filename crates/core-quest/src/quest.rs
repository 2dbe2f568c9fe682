//! Quest project: the resource registry plus a cache of loaded resources.
//!
//! On disk a quest is a directory whose `data/` subdirectory holds
//! `project_db.dat` (one `type<TAB>id<TAB>name` line per resource) and
//! `quest.dat` (a `quest{ .. }` table). Resource data files live below
//! `data/` as well, see [`Sprite::file_name`] and [`Tileset::file_name`].
//!
//! Loaded sprites and tilesets are cached; callers always receive an
//! independent copy with its own history, and hand edited copies back
//! through [`Quest::set_sprite`] / [`Quest::set_tileset`].

use crate::error::{IoError, ParseError, QuestError, Result};
use crate::fs;
use crate::lua;
use crate::sprite::Sprite;
use crate::tileset::Tileset;
use crate::types::ResourceType;
use core_model::{ViewId, ViewRegistry};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, error, info, warn};

const PROJECT_DB: &str = "project_db.dat";
const QUEST_DAT: &str = "quest.dat";

/// Observer of the resource registry.
pub trait QuestView {
    fn add_resource(&mut self, kind: ResourceType, id: &str);
    fn refresh_resource(&mut self, kind: ResourceType, id: &str);
    fn remove_resource(&mut self, kind: ResourceType, id: &str);
}

#[derive(Clone, Copy)]
enum Change {
    Added,
    Refreshed,
    Removed,
}

pub struct Quest {
    directory: PathBuf,
    write_dir: String,
    title_bar: String,
    names: BTreeMap<ResourceType, BTreeMap<String, String>>,
    sprites: BTreeMap<String, Sprite>,
    tilesets: BTreeMap<String, Tileset>,
    history_limit: Option<usize>,
    views: ViewRegistry<dyn QuestView>,
}

impl Quest {
    /// Empty quest rooted at `directory`. Nothing is read or written.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        let directory = directory.into();
        Self {
            directory: std::path::absolute(&directory).unwrap_or(directory),
            write_dir: String::new(),
            title_bar: String::new(),
            names: BTreeMap::new(),
            sprites: BTreeMap::new(),
            tilesets: BTreeMap::new(),
            history_limit: None,
            views: ViewRegistry::new(),
        }
    }

    pub fn load(directory: impl Into<PathBuf>) -> Result<Quest> {
        let mut quest = Quest::new(directory);
        quest
            .read_data()
            .map_err(|err| {
                error!(target: "quest.io", directory = %quest.directory.display(), error = %err, "quest_load_failed");
                QuestError::Load(Box::new(err))
            })?;
        info!(
            target: "quest.io",
            directory = %quest.directory.display(),
            resources = quest.names.values().map(BTreeMap::len).sum::<usize>(),
            "quest_loaded"
        );
        Ok(quest)
    }

    fn read_data(&mut self) -> Result<()> {
        let data_dir = self.data_directory();
        if !data_dir.is_dir() {
            return Err(IoError::DirNotExists(data_dir).into());
        }
        let db_path = data_dir.join(PROJECT_DB);
        let db = fs::read_file(&db_path)?;
        self.names = parse_project_db(&db).map_err(|source| QuestError::Parse {
            path: db_path,
            source,
        })?;

        let dat_path = data_dir.join(QUEST_DAT);
        let dat = fs::read_file(&dat_path)?;
        let (write_dir, title_bar) =
            parse_quest_dat(&dat).map_err(|source| QuestError::Parse {
                path: dat_path,
                source,
            })?;
        self.write_dir = write_dir;
        self.title_bar = title_bar;
        Ok(())
    }

    /// Writes `quest.dat` and `project_db.dat`. Resource files are saved by
    /// the resources themselves.
    pub fn save(&self) -> Result<()> {
        let data_dir = self.data_directory();
        let quest_dat = format!(
            "quest{{\n  write_dir = {},\n  title_bar = {}\n}}\n",
            lua::quote(&self.write_dir),
            lua::quote(&self.title_bar)
        );
        fs::write_file(&data_dir.join(QUEST_DAT), &quest_dat)?;
        let mut db = String::new();
        for (kind, names) in &self.names {
            for (id, name) in names {
                db.push_str(&format!("{}\t{id}\t{name}\n", kind.code()));
            }
        }
        fs::write_file(&data_dir.join(PROJECT_DB), &db)?;
        info!(target: "quest.io", directory = %self.directory.display(), "quest_saved");
        Ok(())
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn data_directory(&self) -> PathBuf {
        self.directory.join("data")
    }

    pub fn write_dir(&self) -> &str {
        &self.write_dir
    }

    pub fn set_write_dir(&mut self, write_dir: impl Into<String>) {
        self.write_dir = write_dir.into();
    }

    pub fn title_bar(&self) -> &str {
        &self.title_bar
    }

    pub fn set_title_bar(&mut self, title_bar: impl Into<String>) {
        self.title_bar = title_bar.into();
    }

    /// Limit applied to the history of every resource handed out.
    pub fn set_history_limit(&mut self, limit: Option<usize>) {
        self.history_limit = limit;
    }

    pub fn resource_exists(&self, kind: ResourceType, id: &str) -> bool {
        self.names.get(&kind).is_some_and(|names| names.contains_key(id))
    }

    /// Ids of `kind`, sorted.
    pub fn resource_ids(&self, kind: ResourceType) -> Vec<&str> {
        self.names
            .get(&kind)
            .map(|names| names.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn resource_name(&self, kind: ResourceType, id: &str) -> Option<&str> {
        self.names.get(&kind)?.get(id).map(String::as_str)
    }

    /// `(id, name)` pairs of `kind`, sorted by id.
    pub fn resource_names(&self, kind: ResourceType) -> Vec<(&str, &str)> {
        self.names
            .get(&kind)
            .map(|names| {
                names
                    .iter()
                    .map(|(id, name)| (id.as_str(), name.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn sprite_ids(&self) -> Vec<&str> {
        self.resource_ids(ResourceType::Sprite)
    }

    pub fn tileset_ids(&self) -> Vec<&str> {
        self.resource_ids(ResourceType::Tileset)
    }

    /// Registers or renames a resource. Views hear `add_resource` for a new
    /// id and `refresh_resource` for a known one.
    pub fn set_resource(&mut self, kind: ResourceType, id: &str, name: &str) {
        let names = self.names.entry(kind).or_default();
        let change = match names.insert(id.to_owned(), name.to_owned()) {
            Some(_) => Change::Refreshed,
            None => Change::Added,
        };
        self.notify(change, kind, id);
    }

    /// Unregisters a resource and drops its cached data; false when unknown.
    pub fn remove_resource(&mut self, kind: ResourceType, id: &str) -> bool {
        let removed = self
            .names
            .get_mut(&kind)
            .is_some_and(|names| names.remove(id).is_some());
        if !removed {
            return false;
        }
        match kind {
            ResourceType::Sprite => {
                self.sprites.remove(id);
            }
            ResourceType::Tileset => {
                self.tilesets.remove(id);
            }
            _ => {}
        }
        self.notify(Change::Removed, kind, id);
        true
    }

    fn registered_name(&self, kind: ResourceType, id: &str) -> Result<String> {
        self.resource_name(kind, id)
            .map(str::to_owned)
            .ok_or_else(|| QuestError::ResourceNotFound {
                kind,
                id: id.to_owned(),
            })
    }

    /// Copy of sprite `id`, read from disk on first access.
    pub fn load_sprite(&mut self, id: &str) -> Result<Sprite> {
        let name = self.registered_name(ResourceType::Sprite, id)?;
        if !self.sprites.contains_key(id) {
            let sprite = Sprite::load(&self.data_directory(), id, &name)?;
            self.sprites.insert(id.to_owned(), sprite);
        }
        let mut sprite = self
            .sprites
            .get(id)
            .map(Sprite::duplicate)
            .ok_or_else(|| QuestError::ResourceNotFound {
                kind: ResourceType::Sprite,
                id: id.to_owned(),
            })?;
        sprite.set_history_limit(self.history_limit);
        Ok(sprite)
    }

    /// Copy of tileset `id`, read from disk on first access.
    pub fn load_tileset(&mut self, id: &str) -> Result<Tileset> {
        let name = self.registered_name(ResourceType::Tileset, id)?;
        if !self.tilesets.contains_key(id) {
            let tileset = Tileset::load(&self.data_directory(), id, &name)?;
            self.tilesets.insert(id.to_owned(), tileset);
        }
        let mut tileset = self
            .tilesets
            .get(id)
            .map(Tileset::duplicate)
            .ok_or_else(|| QuestError::ResourceNotFound {
                kind: ResourceType::Tileset,
                id: id.to_owned(),
            })?;
        tileset.set_history_limit(self.history_limit);
        Ok(tileset)
    }

    /// Stores an edited sprite as the cached version and registers its name.
    pub fn set_sprite(&mut self, sprite: &Sprite) {
        let id = sprite.id().to_owned();
        self.sprites.insert(id.clone(), sprite.duplicate());
        self.set_resource(ResourceType::Sprite, &id, sprite.name());
    }

    pub fn set_tileset(&mut self, tileset: &Tileset) {
        let id = tileset.id().to_owned();
        self.tilesets.insert(id.clone(), tileset.duplicate());
        self.set_resource(ResourceType::Tileset, &id, tileset.name());
    }

    pub fn attach(&mut self, view: Rc<RefCell<dyn QuestView>>) -> ViewId {
        self.views.attach(view)
    }

    pub fn detach(&mut self, id: ViewId) -> bool {
        self.views.detach(id)
    }

    fn notify(&self, change: Change, kind: ResourceType, id: &str) {
        debug!(target: "quest.io", kind = kind.name(), id, views = self.views.len(), "resource_changed");
        for (view_id, view) in self.views.iter() {
            let Ok(mut view) = view.try_borrow_mut() else {
                warn!(target: "model.views", view = view_id.0, "view_busy_skipped");
                continue;
            };
            match change {
                Change::Added => view.add_resource(kind, id),
                Change::Refreshed => view.refresh_resource(kind, id),
                Change::Removed => view.remove_resource(kind, id),
            }
        }
    }
}

fn parse_project_db(
    text: &str,
) -> std::result::Result<BTreeMap<ResourceType, BTreeMap<String, String>>, ParseError> {
    let mut names: BTreeMap<ResourceType, BTreeMap<String, String>> = BTreeMap::new();
    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        let [code, id, name] = fields[..] else {
            return Err(ParseError::new(line_no, "expected 'type<TAB>id<TAB>name'"));
        };
        let kind = code
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(ResourceType::from_code)
            .ok_or_else(|| ParseError::new(line_no, format!("unknown resource type '{code}'")))?;
        names
            .entry(kind)
            .or_default()
            .insert(id.to_owned(), name.to_owned());
    }
    Ok(names)
}

fn parse_quest_dat(text: &str) -> std::result::Result<(String, String), ParseError> {
    let mut write_dir = String::new();
    let mut title_bar = String::new();
    for call in lua::parse_calls(text)? {
        if call.name != "quest" {
            return Err(call.error(format!("unknown function '{}'", call.name)));
        }
        if let Some(dir) = call.string("write_dir")? {
            write_dir = dir.to_owned();
        }
        if let Some(title) = call.string("title_bar")? {
            title_bar = title.to_owned();
        }
    }
    Ok((write_dir, title_bar))
}

impl std::fmt::Debug for Quest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Quest")
            .field("directory", &self.directory)
            .field("write_dir", &self.write_dir)
            .field("title_bar", &self.title_bar)
            .field("names", &self.names)
            .field("views", &self.views.len())
            .finish()
    }
}
