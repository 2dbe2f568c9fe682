use crate::error::ValidationError;
use crate::types::{Ground, Layer, Point, Scrolling};

/// Id of a pattern not yet stored in a tileset.
pub const UNASSIGNED_ID: i32 = -1;

/// Where a pattern's frames sit on the tileset image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternFrames {
    Single(Point),
    /// Three frames, played 0-1-2 or 0-1-2-1.
    Animated { positions: [Point; 3], seq_0121: bool },
}

/// One reusable tile of a tileset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilePattern {
    id: i32,
    ground: Ground,
    default_layer: Layer,
    scrolling: Scrolling,
    width: i32,
    height: i32,
    frames: PatternFrames,
}

impl Default for TilePattern {
    fn default() -> Self {
        Self {
            id: UNASSIGNED_ID,
            ground: Ground::default(),
            default_layer: Layer::default(),
            scrolling: Scrolling::default(),
            width: 8,
            height: 8,
            frames: PatternFrames::Single(Point::default()),
        }
    }
}

impl TilePattern {
    pub fn new(position: Point, width: i32, height: i32) -> Result<Self, ValidationError> {
        let mut pattern = Self::default();
        pattern.set_size(width, height)?;
        pattern.set_position(position)?;
        Ok(pattern)
    }

    pub(crate) fn with_id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn ground(&self) -> Ground {
        self.ground
    }

    pub fn default_layer(&self) -> Layer {
        self.default_layer
    }

    pub fn scrolling(&self) -> Scrolling {
        self.scrolling
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn frames(&self) -> PatternFrames {
        self.frames
    }

    /// Position of the first frame.
    pub fn position(&self) -> Point {
        match self.frames {
            PatternFrames::Single(p) => p,
            PatternFrames::Animated { positions, .. } => positions[0],
        }
    }

    pub fn is_animated(&self) -> bool {
        matches!(self.frames, PatternFrames::Animated { .. })
    }

    pub fn is_seq_0121(&self) -> bool {
        matches!(self.frames, PatternFrames::Animated { seq_0121: true, .. })
    }

    pub fn set_ground(&mut self, ground: Ground) {
        self.ground = ground;
    }

    pub fn set_default_layer(&mut self, layer: Layer) {
        self.default_layer = layer;
    }

    pub fn set_scrolling(&mut self, scrolling: Scrolling) {
        self.scrolling = scrolling;
    }

    pub fn set_size(&mut self, width: i32, height: i32) -> Result<(), ValidationError> {
        if width <= 0 || width % 8 != 0 {
            return Err(ValidationError::InvalidPatternWidth(width));
        }
        if height <= 0 || height % 8 != 0 {
            return Err(ValidationError::InvalidPatternHeight(height));
        }
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Makes the pattern static at `position`.
    pub fn set_position(&mut self, position: Point) -> Result<(), ValidationError> {
        check_position(position)?;
        self.frames = PatternFrames::Single(position);
        Ok(())
    }

    /// Makes the pattern animated over three frames.
    pub fn set_positions(
        &mut self,
        positions: [Point; 3],
        seq_0121: bool,
    ) -> Result<(), ValidationError> {
        for position in positions {
            check_position(position)?;
        }
        self.frames = PatternFrames::Animated {
            positions,
            seq_0121,
        };
        Ok(())
    }

    /// `tile_pattern { .. }` block of the tileset data file.
    pub fn to_lua(&self) -> String {
        let mut lua = String::from("tile_pattern {\n");
        lua.push_str(&format!("  id = {},\n", self.id));
        lua.push_str(&format!("  ground = \"{}\",\n", self.ground.as_str()));
        lua.push_str(&format!("  default_layer = {},\n", self.default_layer.code()));
        match self.frames {
            PatternFrames::Single(p) => {
                lua.push_str(&format!("  x = {},\n  y = {},\n", p.x, p.y));
            }
            PatternFrames::Animated {
                positions,
                seq_0121,
            } => {
                let list = |coord: fn(&Point) -> i32| {
                    let mut values: Vec<String> =
                        positions.iter().map(|p| coord(p).to_string()).collect();
                    if seq_0121 {
                        values.push(coord(&positions[1]).to_string());
                    }
                    values.join(", ")
                };
                lua.push_str(&format!("  x = {{{}}},\n", list(|p: &Point| p.x)));
                lua.push_str(&format!("  y = {{{}}},\n", list(|p: &Point| p.y)));
            }
        }
        lua.push_str(&format!("  width = {},\n", self.width));
        lua.push_str(&format!("  height = {}", self.height));
        if self.scrolling != Scrolling::Static {
            lua.push_str(&format!(",\n  scrolling = \"{}\"", self.scrolling.as_str()));
        }
        lua.push_str("\n}");
        lua
    }
}

fn check_position(position: Point) -> Result<(), ValidationError> {
    if position.x < 0 || position.y < 0 {
        return Err(ValidationError::NegativePosition);
    }
    if position.x % 8 != 0 || position.y % 8 != 0 {
        return Err(ValidationError::UnalignedPosition);
    }
    Ok(())
}
