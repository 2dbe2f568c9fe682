use crate::types::Rect;

/// What the user has selected in a sprite editor. Not undoable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SpriteSelection {
    #[default]
    Empty,
    Animation(String),
    Direction { animation: String, index: usize },
    /// A rectangle being drawn to become a new direction of `animation`.
    NewDirection { animation: String, rect: Rect },
}

impl SpriteSelection {
    pub fn animation(name: impl Into<String>) -> Self {
        SpriteSelection::Animation(name.into())
    }

    pub fn direction(name: impl Into<String>, index: usize) -> Self {
        SpriteSelection::Direction {
            animation: name.into(),
            index,
        }
    }

    /// An invalid rectangle is dropped, leaving only the animation selected.
    pub fn new_direction(name: impl Into<String>, rect: Rect) -> Self {
        let animation = name.into();
        if rect.is_valid() {
            SpriteSelection::NewDirection { animation, rect }
        } else {
            SpriteSelection::Animation(animation)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SpriteSelection::Empty)
    }

    pub fn animation_name(&self) -> Option<&str> {
        match self {
            SpriteSelection::Empty => None,
            SpriteSelection::Animation(animation)
            | SpriteSelection::Direction { animation, .. }
            | SpriteSelection::NewDirection { animation, .. } => Some(animation),
        }
    }

    pub fn direction_index(&self) -> Option<usize> {
        match self {
            SpriteSelection::Direction { index, .. } => Some(*index),
            _ => None,
        }
    }

    pub fn new_direction_rect(&self) -> Option<Rect> {
        match self {
            SpriteSelection::NewDirection { rect, .. } => Some(*rect),
            _ => None,
        }
    }

    /// Same selection, pointing at `name` instead.
    pub(crate) fn with_animation(&self, name: &str) -> Self {
        match self {
            SpriteSelection::Empty => SpriteSelection::Empty,
            SpriteSelection::Animation(_) => SpriteSelection::animation(name),
            SpriteSelection::Direction { index, .. } => SpriteSelection::direction(name, *index),
            SpriteSelection::NewDirection { rect, .. } => SpriteSelection::NewDirection {
                animation: name.to_owned(),
                rect: *rect,
            },
        }
    }
}
