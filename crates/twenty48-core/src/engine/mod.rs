//! Engine module: N x N 2048 board, direction-agnostic move resolution,
//! random spawns and terminal-state detection.
//!
//! - `Board` is the validated square grid with useful methods.
//! - `Rules` carries the winning tile and drives `new_game`/`play`.
//! - Free functions mirror the methods when convenient (e.g., `shift`).
//!
//! Nothing in here holds process state: every operation takes a snapshot
//! and returns a new one.

mod error;
mod ops;
mod rules;
pub mod state;

pub use error::{EngineError, ParseMoveError};
pub use rules::{DEFAULT_WIN_TILE, Rules};
pub use state::{Board, GameState, MAX_SIZE, MIN_SIZE, Move, MoveOutcome, Position, Score, Tile};

pub use ops::{
    LineShift, Shifted, has_any_move, inverse_transform, is_won, make_move, merge_line, new_game,
    shift, spawn_random_tile, transform,
};
