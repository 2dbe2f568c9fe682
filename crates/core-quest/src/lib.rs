//! Quest resources edited through the undoable document model.
//!
//! [`Sprite`] and [`Tileset`] wrap a `core_model::Model` over their data.
//! Public mutators validate first and fail with a [`ValidationError`]
//! before any action is recorded; everything they accept becomes one
//! undoable action broadcast to the attached views. [`Quest`] ties the
//! resources to a project directory.

pub mod error;
mod fs;
pub mod lua;
pub mod quest;
pub mod sprite;
pub mod sprite_animation;
pub mod sprite_direction;
pub mod sprite_selection;
pub mod tile_pattern;
pub mod tileset;
pub mod types;

pub use core_model::{View, ViewId};
pub use error::{IoError, ParseError, QuestError, Result, ValidationError};
pub use quest::{Quest, QuestView};
pub use sprite::{Sprite, SpriteView};
pub use sprite_animation::SpriteAnimation;
pub use sprite_direction::SpriteDirection;
pub use sprite_selection::SpriteSelection;
pub use tile_pattern::{PatternFrames, TilePattern};
pub use tileset::{Tileset, TilesetView};
pub use types::{Color, Ground, Layer, Point, Rect, ResourceType, Scrolling};
