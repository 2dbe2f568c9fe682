//! Small value enums and geometry shared by the resource types.

use std::fmt;

/// Kind of a quest resource. Codes are stable and written to `project_db.dat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceType {
    Map = 0,
    Tileset = 1,
    Music = 2,
    Sprite = 3,
    Sound = 4,
    Item = 5,
    Enemy = 6,
    Language = 7,
}

impl ResourceType {
    pub const ALL: [ResourceType; 8] = [
        ResourceType::Map,
        ResourceType::Tileset,
        ResourceType::Music,
        ResourceType::Sprite,
        ResourceType::Sound,
        ResourceType::Item,
        ResourceType::Enemy,
        ResourceType::Language,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            ResourceType::Map => "map",
            ResourceType::Tileset => "tileset",
            ResourceType::Music => "music",
            ResourceType::Sprite => "sprite",
            ResourceType::Sound => "sound",
            ResourceType::Item => "item",
            ResourceType::Enemy => "enemy",
            ResourceType::Language => "language",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Non-negative position and strictly positive size.
    pub fn is_valid(&self) -> bool {
        self.x >= 0 && self.y >= 0 && self.width > 0 && self.height > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Draw layer of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layer {
    #[default]
    Low = 0,
    Intermediate = 1,
    High = 2,
}

impl Layer {
    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Layer::Low),
            1 => Some(Layer::Intermediate),
            2 => Some(Layer::High),
            _ => None,
        }
    }
}

macro_rules! named_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            pub fn parse(text: &str) -> Option<Self> {
                match text {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

named_enum! {
    /// Terrain behavior of a tile.
    Ground {
        Traversable => "traversable",
        Wall => "wall",
        WallTopRight => "wall_top_right",
        WallTopLeft => "wall_top_left",
        WallBottomLeft => "wall_bottom_left",
        WallBottomRight => "wall_bottom_right",
        Empty => "empty",
        WaterFull => "water_full",
        WaterTopRight => "water_top_right",
        WaterTopLeft => "water_top_left",
        WaterBottomLeft => "water_bottom_left",
        WaterBottomRight => "water_bottom_right",
        DeepWater => "deep_water",
        ShallowWater => "shallow_water",
        Hole => "hole",
        Ladder => "ladder",
        Prickles => "prickles",
        Lava => "lava",
    }
}

impl Ground {
    /// Also accepts spellings found in older data files.
    pub fn parse_lenient(text: &str) -> Option<Self> {
        Self::parse(text).or(match text {
            "wall_empty" => Some(Ground::Empty),
            "pickles" => Some(Ground::Prickles),
            _ => None,
        })
    }
}

impl Default for Ground {
    fn default() -> Self {
        Ground::Traversable
    }
}

named_enum! {
    /// Scrolling mode of a tile. `Static` is never written to files.
    Scrolling {
        Static => "none",
        OnSelf => "self",
        Parallax => "parallax",
    }
}

impl Default for Scrolling {
    fn default() -> Self {
        Scrolling::Static
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_codes_are_stable() {
        for (code, kind) in ResourceType::ALL.iter().enumerate() {
            assert_eq!(usize::from(kind.code()), code);
            assert_eq!(ResourceType::from_code(kind.code()), Some(*kind));
        }
        assert_eq!(ResourceType::from_code(8), None);
        assert_eq!(ResourceType::Sprite.code(), 3);
    }

    #[test]
    fn ground_accepts_legacy_spellings() {
        assert_eq!(Ground::parse("wall_top_left"), Some(Ground::WallTopLeft));
        assert_eq!(Ground::parse_lenient("wall_empty"), Some(Ground::Empty));
        assert_eq!(Ground::parse_lenient("pickles"), Some(Ground::Prickles));
        assert_eq!(Ground::parse("mud"), None);
        assert_eq!(Ground::Prickles.as_str(), "prickles");
    }

    #[test]
    fn rect_validity() {
        assert!(Rect::new(0, 0, 1, 1).is_valid());
        assert!(!Rect::new(-1, 0, 1, 1).is_valid());
        assert!(!Rect::new(0, 0, 0, 4).is_valid());
    }

    #[test]
    fn layer_codes_round_trip() {
        assert_eq!(Layer::from_code(Layer::High.code()), Some(Layer::High));
        assert_eq!(Layer::from_code(3), None);
    }
}
