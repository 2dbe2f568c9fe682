use anyhow::Result;
use core_quest::{
    Color, Quest, QuestError, QuestView, ResourceType, Sprite, SpriteAnimation, TilePattern,
    Tileset,
};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use tempfile::tempdir;

#[derive(Default)]
struct Tree {
    events: Vec<String>,
}

impl QuestView for Tree {
    fn add_resource(&mut self, kind: ResourceType, id: &str) {
        self.events.push(format!("+{kind}:{id}"));
    }
    fn refresh_resource(&mut self, kind: ResourceType, id: &str) {
        self.events.push(format!("~{kind}:{id}"));
    }
    fn remove_resource(&mut self, kind: ResourceType, id: &str) {
        self.events.push(format!("-{kind}:{id}"));
    }
}

/// Writes a small quest with one sprite and one tileset.
fn seed_quest(dir: &Path) -> Result<()> {
    let mut quest = Quest::new(dir);
    quest.set_write_dir("demo");
    quest.set_title_bar("Demo \"quest\"");
    quest.set_resource(ResourceType::Map, "outside", "Outside");

    let mut hero = Sprite::new("hero", "Hero");
    hero.set_animation("walk", &SpriteAnimation::new("walk", "hero.png", 100, 0)?)?;
    hero.save(&quest.data_directory())?;
    quest.set_sprite(&hero);

    let mut house = Tileset::new("house", "House");
    house.set_background_color(Color::rgb(10, 20, 30));
    house.add_pattern(TilePattern::default())?;
    house.save(&quest.data_directory())?;
    quest.set_tileset(&house);

    quest.save()?;
    Ok(())
}

#[test]
fn project_files_round_trip() -> Result<()> {
    let dir = tempdir()?;
    seed_quest(dir.path())?;

    let db = std::fs::read_to_string(dir.path().join("data/project_db.dat"))?;
    assert_eq!(db, "0\toutside\tOutside\n1\thouse\tHouse\n3\thero\tHero\n");

    let mut quest = Quest::load(dir.path())?;
    assert_eq!(quest.write_dir(), "demo");
    assert_eq!(quest.title_bar(), "Demo \"quest\"");
    assert_eq!(quest.sprite_ids(), vec!["hero"]);
    assert_eq!(quest.tileset_ids(), vec!["house"]);
    assert_eq!(quest.resource_name(ResourceType::Map, "outside"), Some("Outside"));
    assert!(quest.resource_exists(ResourceType::Sprite, "hero"));
    assert!(!quest.resource_exists(ResourceType::Enemy, "hero"));

    let hero = quest.load_sprite("hero")?;
    assert_eq!(hero.name(), "Hero");
    assert_eq!(hero.animation("walk")?.frame_delay(), 100);
    let house = quest.load_tileset("house")?;
    assert_eq!(house.background_color(), Color::rgb(10, 20, 30));
    assert_eq!(house.pattern_ids(), vec![1]);
    Ok(())
}

#[test]
fn copies_are_independent_until_handed_back() -> Result<()> {
    let dir = tempdir()?;
    seed_quest(dir.path())?;
    let mut quest = Quest::load(dir.path())?;
    let tree = Rc::new(RefCell::new(Tree::default()));
    quest.attach(tree.clone());

    let mut hero = quest.load_sprite("hero")?;
    hero.rename_animation("walk", "run")?;
    assert!(quest.load_sprite("hero")?.animation_exists("walk"));

    hero.set_name("Link");
    quest.set_sprite(&hero);
    let cached = quest.load_sprite("hero")?;
    assert!(cached.animation_exists("run"));
    assert!(!cached.can_undo());
    assert_eq!(quest.resource_name(ResourceType::Sprite, "hero"), Some("Link"));

    quest.set_resource(ResourceType::Sprite, "enemy", "Enemy");
    assert!(quest.remove_resource(ResourceType::Sprite, "enemy"));
    assert_eq!(tree.borrow().events, vec!["~sprite:hero", "+sprite:enemy", "-sprite:enemy"]);
    Ok(())
}

#[test]
fn history_limit_applies_to_loaded_resources() -> Result<()> {
    let dir = tempdir()?;
    seed_quest(dir.path())?;
    let mut quest = Quest::load(dir.path())?;
    quest.set_history_limit(Some(1));
    let mut house = quest.load_tileset("house")?;
    house.add_pattern(TilePattern::default())?;
    house.add_pattern(TilePattern::default())?;
    assert!(house.undo());
    assert!(!house.undo());
    assert_eq!(house.pattern_ids(), vec![1, 2]);
    Ok(())
}

#[test]
fn missing_project_db_fails_the_load() -> Result<()> {
    let dir = tempdir()?;
    std::fs::create_dir_all(dir.path().join("data"))?;
    let err = Quest::load(dir.path()).unwrap_err();
    assert!(matches!(err, QuestError::Load(_)));
    let message = err.to_string();
    assert!(message.starts_with("cannot load the quest, file '"));
    assert!(message.ends_with("data/project_db.dat' does not exist"));

    let empty = tempdir()?;
    let err = Quest::load(empty.path()).unwrap_err();
    assert!(err.to_string().contains("directory"));
    Ok(())
}

#[test]
fn registered_sprite_without_file_reports_io_error() -> Result<()> {
    let dir = tempdir()?;
    seed_quest(dir.path())?;
    let mut quest = Quest::load(dir.path())?;
    quest.set_resource(ResourceType::Sprite, "ghost", "Ghost");
    let err = quest.load_sprite("ghost").unwrap_err();
    assert!(matches!(err, QuestError::Io(_)));
    Ok(())
}
