//! Error taxonomy for quest resources.
//!
//! * [`ValidationError`]: an invariant would be violated. Raised before any
//!   action is built, so model state and history stay untouched. Callers
//!   surface these as transient status messages.
//! * [`IoError`]: a file or directory is missing or not writable.
//! * [`ParseError`]: a data file does not follow its format.
//!
//! [`QuestError`] wraps all of them for operations that can hit several kinds.

use crate::types::ResourceType;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("animation name cannot be empty")]
    EmptyAnimationName,
    #[error("animation '{0}' does not exist")]
    AnimationNotFound(String),
    #[error("animation '{0}' already exists")]
    AnimationExists(String),
    #[error("direction {direction} does not exist in animation '{animation}'")]
    SelectedDirectionNotFound { animation: String, direction: usize },
    #[error("direction {0} does not exist")]
    DirectionNotFound(usize),
    #[error("frame delay must be greater or equal to 0")]
    NegativeFrameDelay,
    #[error("frame on loop must be -1 when frame delay is 0")]
    FrameOnLoopWithoutDelay,
    #[error("frame on loop must be greater or equal to -1")]
    FrameOnLoopBelowMinimum,
    #[error("x must be greater or equal to 0")]
    NegativeX,
    #[error("y must be greater or equal to 0")]
    NegativeY,
    #[error("width must be greater than 0")]
    NonPositiveWidth,
    #[error("height must be greater than 0")]
    NonPositiveHeight,
    #[error("number of frames must be greater than 0")]
    NoFrames,
    #[error("number of columns must be greater than 0")]
    NoColumns,
    #[error("width must be a multiple of 8 and greater than 0 (got {0})")]
    InvalidPatternWidth(i32),
    #[error("height must be a multiple of 8 and greater than 0 (got {0})")]
    InvalidPatternHeight(i32),
    #[error("positions must be greater or equal to 0")]
    NegativePosition,
    #[error("positions must be multiples of 8")]
    UnalignedPosition,
    #[error("tile pattern {0} does not exist")]
    PatternNotFound(i32),
    #[error("no tile pattern id left in this tileset")]
    PatternIdsExhausted,
}

#[derive(Debug, Error)]
pub enum IoError {
    #[error("file '{}' does not exist", .0.display())]
    FileNotExists(PathBuf),
    #[error("cannot read file '{}'", .path.display())]
    FileNotRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot create file '{}'", .path.display())]
    FileNotWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("directory '{}' does not exist", .0.display())]
    DirNotExists(PathBuf),
    #[error("cannot create directory '{}'", .path.display())]
    DirNotWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Format violation at a 1-based line of a data file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum QuestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Io(#[from] IoError),
    #[error("invalid data in '{}', {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    #[error("{} {id} does not exist", .kind.name())]
    ResourceNotFound { kind: ResourceType, id: String },
    #[error("cannot load the quest, {0}")]
    Load(#[source] Box<QuestError>),
}

pub type Result<T> = std::result::Result<T, QuestError>;
