//! Errors reported by the maze engine

use thiserror::Error;

use crate::grid::Coord;

/// Everything that can go wrong while building, solving or reading a maze
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    /// Malformed or out-of-range parameters; generation never starts.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Coordinate outside of the grid.
    #[error("cell ({x}, {y}) is outside of the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// Wall query between two cells that do not share an edge.
    #[error("cells {a} and {b} are not adjacent")]
    NotAdjacent { a: Coord, b: Coord },

    /// Entry and exit lie in different components of the grid.
    #[error("no path from entry {entry} to exit {exit}")]
    NoPathFound { entry: Coord, exit: Coord },

    /// Output dump could not be read back.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl MazeError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MazeError>;
