use crate::{contour::IslandIdx, event::VertexRef, num::Float};

/// Which of the two shorelines we're talking about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shore {
    North,
    South,
}

impl std::fmt::Display for Shore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shore::North => f.write_str("north"),
            Shore::South => f.write_str("south"),
        }
    }
}

/// The reason a river configuration was rejected.
///
/// The checks run in the order the variants are listed, and only the first
/// failure gets reported.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRiver {
    #[error("vertex {0:?} has a coordinate that isn't finite")]
    NonFiniteCoordinate(VertexRef),

    #[error("the {shore} shoreline needs at least two points, but it has {len}")]
    ShorelineTooShort { shore: Shore, len: usize },

    #[error("the {shore} shoreline doubles back at vertex {idx}")]
    ShorelineNotMonotone { shore: Shore, idx: usize },

    #[error("the shorelines start at different x coordinates")]
    StartMismatch,

    #[error("the shorelines end at different x coordinates")]
    EndMismatch,

    #[error("the north shoreline does not start strictly above the south shoreline")]
    NotNorthOfSouth,

    #[error("island {island:?} needs at least three points, but it has {len}")]
    IslandTooSmall { island: IslandIdx, len: usize },

    #[error("island {0:?} is not x-monotone")]
    IslandNotMonotone(IslandIdx),

    #[error("island {0:?} is oriented clockwise")]
    IslandClockwise(IslandIdx),

    #[error("vertices {0:?} and {1:?} have the same x coordinate")]
    SharedEventX(VertexRef, VertexRef),

    #[error("the width overflows near vertex {0:?}")]
    Overflow(VertexRef),
}

/// A width was requested outside of the river.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("position {t:?} is outside [0, 1]")]
pub struct OutOfRange<F: Float> {
    pub t: F,
}

/// Problems reading a river file.
///
/// Line numbers start at 1.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: expected two coordinates, found {found} tokens")]
    TokenCount { line: usize, found: usize },

    #[error("line {line}: could not parse {token:?} as a number")]
    Number { line: usize, token: String },

    #[error("line {line}: {token:?} is not a finite number")]
    NonFinite { line: usize, token: String },
}
