//! Error types raised while building or persisting grids.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("collision grid has no tiles")]
    Empty,

    #[error("collision grid row {row} has {found} tiles, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("collision grid is {width}x{height} but holds {tiles} tiles")]
    Dimensions {
        width: usize,
        height: usize,
        tiles: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("grid encoding error: {0}")]
    Encoding(#[from] bincode::Error),
}
