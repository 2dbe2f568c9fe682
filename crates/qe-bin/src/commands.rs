//! Subcommand execution over a loaded [`Quest`].

use crate::change_log::ChangeLog;
use crate::cli::Command;
use anyhow::{Context, Result};
use core_quest::{Color, PatternFrames, Quest, ResourceType};
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use tracing::info;

pub fn execute(command: &Command, quest: &mut Quest, out: &mut impl Write) -> Result<()> {
    match command {
        Command::List => list(quest, out),
        Command::Sprite { id } => sprite(quest, id, out),
        Command::Tileset { id } => tileset(quest, id, out),
        Command::RenameAnimation { sprite, old, new } => {
            rename_animation(quest, sprite, old, new, out)
        }
        Command::Background {
            tileset,
            red,
            green,
            blue,
        } => background(quest, tileset, Color::rgb(*red, *green, *blue), out),
    }
}

fn list(quest: &Quest, out: &mut impl Write) -> Result<()> {
    for kind in ResourceType::ALL {
        let names = quest.resource_names(kind);
        if names.is_empty() {
            continue;
        }
        writeln!(out, "{kind} ({})", names.len())?;
        for (id, name) in names {
            writeln!(out, "  {id}\t{name}")?;
        }
    }
    Ok(())
}

fn sprite(quest: &mut Quest, id: &str, out: &mut impl Write) -> Result<()> {
    let sprite = quest.load_sprite(id)?;
    writeln!(out, "sprite {} ({})", sprite.id(), sprite.name())?;
    for animation in sprite.all_animations() {
        writeln!(
            out,
            "  {}\t{}\tdirections {}\tdelay {}\tloop {}",
            animation.name(),
            animation.image(),
            animation.direction_count(),
            animation.frame_delay(),
            animation.frame_on_loop()
        )?;
    }
    Ok(())
}

fn tileset(quest: &mut Quest, id: &str, out: &mut impl Write) -> Result<()> {
    let tileset = quest.load_tileset(id)?;
    let Color { red, green, blue } = tileset.background_color();
    writeln!(
        out,
        "tileset {} ({}) background {red} {green} {blue}",
        tileset.id(),
        tileset.name()
    )?;
    for pattern in tileset.all_patterns() {
        let frames = match pattern.frames() {
            PatternFrames::Single(_) => "single",
            PatternFrames::Animated { seq_0121: true, .. } => "0-1-2-1",
            PatternFrames::Animated { .. } => "0-1-2",
        };
        let position = pattern.position();
        writeln!(
            out,
            "  {}\t{}\tlayer {}\t{}x{} at {},{}\t{frames}",
            pattern.id(),
            pattern.ground().as_str(),
            pattern.default_layer().code(),
            pattern.width(),
            pattern.height(),
            position.x,
            position.y
        )?;
    }
    Ok(())
}

fn rename_animation(
    quest: &mut Quest,
    id: &str,
    old: &str,
    new: &str,
    out: &mut impl Write,
) -> Result<()> {
    let log = Rc::new(RefCell::new(ChangeLog::default()));
    let mut sprite = quest.load_sprite(id)?;
    sprite.attach(log.clone());
    sprite
        .rename_animation(old, new)
        .with_context(|| format!("cannot rename animation '{old}' of sprite '{id}'"))?;
    sprite.save(&quest.data_directory())?;
    quest.set_sprite(&sprite);
    info!(target: "runtime", sprite = id, old, new, "animation_renamed");
    echo(&log.borrow(), out)
}

fn background(quest: &mut Quest, id: &str, color: Color, out: &mut impl Write) -> Result<()> {
    let log = Rc::new(RefCell::new(ChangeLog::default()));
    let mut tileset = quest.load_tileset(id)?;
    tileset.attach(log.clone());
    tileset.set_background_color(color);
    tileset.save(&quest.data_directory())?;
    quest.set_tileset(&tileset);
    info!(target: "runtime", tileset = id, ?color, "background_changed");
    echo(&log.borrow(), out)
}

fn echo(log: &ChangeLog, out: &mut impl Write) -> Result<()> {
    if log.entries().is_empty() {
        writeln!(out, "nothing to change")?;
    }
    for entry in log.entries() {
        writeln!(out, "{entry}")?;
    }
    Ok(())
}
