use super::state::{MAX_SIZE, MIN_SIZE, Tile};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("board size {0} is outside the playable range {min}..={max}", min = MIN_SIZE, max = MAX_SIZE)]
    InvalidSize(usize),
    #[error("row {row} has {len} cells, expected {size}")]
    NotSquare { row: usize, len: usize, size: usize },
    #[error("cell ({row}, {col}) holds {value}, which is not a power of two")]
    InvalidTile { row: usize, col: usize, value: Tile },
    #[error("winning tile {0} must be a power of two no smaller than 4")]
    InvalidWinTile(Tile),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized direction {0:?}, expected one of LEFT, RIGHT, UP, DOWN")]
pub struct ParseMoveError(pub String);
