use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "quest-editor", version, about = "Quest resource editor")]
pub struct Args {
    /// Optional configuration file path (overrides discovery of `quest-editor.toml`).
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,
    /// Quest directory (the one holding `data/`). Defaults to `[quest] directory`.
    #[arg(long = "quest", global = true)]
    pub quest: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// List the registered resources of every type.
    List,
    /// Summarize the animations of a sprite.
    Sprite { id: String },
    /// Summarize the patterns of a tileset.
    Tileset { id: String },
    /// Rename an animation of a sprite and save it.
    RenameAnimation {
        sprite: String,
        old: String,
        new: String,
    },
    /// Change the background color of a tileset and save it.
    Background {
        tileset: String,
        red: u8,
        green: u8,
        blue: u8,
    },
}
