use crate::error::ValidationError;
use crate::types::{Point, Rect};

/// Frames of one facing direction on the animation's source image.
///
/// The first frame sits at `rect`; further frames follow left to right,
/// wrapping after `columns` frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteDirection {
    rect: Rect,
    origin: Point,
    frames: i32,
    columns: i32,
}

impl Default for SpriteDirection {
    fn default() -> Self {
        Self {
            rect: Rect::new(0, 0, 24, 24),
            origin: Point::new(12, 12),
            frames: 1,
            columns: 1,
        }
    }
}

impl SpriteDirection {
    pub fn new(
        rect: Rect,
        origin: Point,
        frames: i32,
        columns: i32,
    ) -> Result<Self, ValidationError> {
        let mut direction = Self {
            origin,
            ..Self::default()
        };
        direction.set_rect(rect)?;
        direction.set_frames(frames)?;
        direction.set_columns(columns)?;
        Ok(direction)
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn position(&self) -> Point {
        Point::new(self.rect.x, self.rect.y)
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn frames(&self) -> i32 {
        self.frames
    }

    pub fn columns(&self) -> i32 {
        self.columns
    }

    pub fn set_rect(&mut self, rect: Rect) -> Result<(), ValidationError> {
        check_position(rect.x, rect.y)?;
        check_size(rect.width, rect.height)?;
        self.rect = rect;
        Ok(())
    }

    pub fn set_position(&mut self, position: Point) -> Result<(), ValidationError> {
        check_position(position.x, position.y)?;
        self.rect.x = position.x;
        self.rect.y = position.y;
        Ok(())
    }

    pub fn set_size(&mut self, width: i32, height: i32) -> Result<(), ValidationError> {
        check_size(width, height)?;
        self.rect.width = width;
        self.rect.height = height;
        Ok(())
    }

    /// The origin may lie outside the frame.
    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    pub fn set_frames(&mut self, frames: i32) -> Result<(), ValidationError> {
        if frames < 1 {
            return Err(ValidationError::NoFrames);
        }
        self.frames = frames;
        Ok(())
    }

    pub fn set_columns(&mut self, columns: i32) -> Result<(), ValidationError> {
        if columns < 1 {
            return Err(ValidationError::NoColumns);
        }
        self.columns = columns;
        Ok(())
    }

    /// Source rectangle of every frame, in playing order. Coordinates past
    /// `i32::MAX` are clamped to it.
    pub fn frame_rects(&self) -> Vec<Rect> {
        let Rect {
            x,
            y,
            width,
            height,
        } = self.rect;
        (0..self.frames)
            .map(|n| {
                let row = n / self.columns;
                let col = n % self.columns;
                Rect::new(
                    x.saturating_add(col.saturating_mul(width)),
                    y.saturating_add(row.saturating_mul(height)),
                    width,
                    height,
                )
            })
            .collect()
    }

    /// One tab-separated line of the sprite data file.
    pub fn to_data(&self) -> String {
        [
            self.rect.x,
            self.rect.y,
            self.rect.width,
            self.rect.height,
            self.origin.x,
            self.origin.y,
            self.frames,
            self.columns,
        ]
        .map(|v| v.to_string())
        .join("\t")
    }
}

fn check_position(x: i32, y: i32) -> Result<(), ValidationError> {
    if x < 0 {
        return Err(ValidationError::NegativeX);
    }
    if y < 0 {
        return Err(ValidationError::NegativeY);
    }
    Ok(())
}

fn check_size(width: i32, height: i32) -> Result<(), ValidationError> {
    if width <= 0 {
        return Err(ValidationError::NonPositiveWidth);
    }
    if height <= 0 {
        return Err(ValidationError::NonPositiveHeight);
    }
    Ok(())
}
