use rand::Rng;
use std::fmt;
use std::str::FromStr;

use super::error::{EngineError, ParseMoveError};
use super::ops;
use serde::{Deserialize, Serialize};

pub type Tile = u32;
pub type Score = u64;

/// Smallest playable board edge. A 1x1 board cannot hold the two opening tiles.
pub const MIN_SIZE: usize = 2;
/// Largest accepted board edge.
pub const MAX_SIZE: usize = 16;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            Move::Up => "UP",
            Move::Down => "DOWN",
            Move::Left => "LEFT",
            Move::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive: `"left"`, `"LEFT"` and `"Left"` all parse to [`Move::Left`].
///
/// ```
/// use twenty48_core::engine::Move;
/// assert_eq!("down".parse::<Move>().unwrap(), Move::Down);
/// assert!("sideways".parse::<Move>().is_err());
/// ```
impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "UP" => Ok(Move::Up),
            "DOWN" => Ok(Move::Down),
            "LEFT" => Ok(Move::Left),
            "RIGHT" => Ok(Move::Right),
            _ => Err(ParseMoveError(s.to_string())),
        }
    }
}

/// A `(row, col)` cell coordinate. Serializes as `[row, col]`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub struct Position(pub usize, pub usize);

impl Position {
    #[inline]
    pub fn row(self) -> usize {
        self.0
    }

    #[inline]
    pub fn col(self) -> usize {
        self.1
    }
}

/// Square N x N grid of tile values, stored row-major. `0` is an empty cell.
///
/// Serializes as N rows of N integers; deserializing goes through
/// [`Board::from_rows`], so shape and tile values are validated.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Tile>>", into = "Vec<Vec<Tile>>")]
pub struct Board {
    size: usize,
    cells: Vec<Tile>,
}

impl Board {
    /// An all-empty `size` x `size` board.
    pub fn empty(size: usize) -> Result<Self, EngineError> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(EngineError::InvalidSize(size));
        }
        Ok(Board {
            size,
            cells: vec![0; size * size],
        })
    }

    /// Build a board from nested rows, checking that it is square and that
    /// every cell is `0` or a power of two no smaller than 2.
    ///
    /// ```
    /// use twenty48_core::engine::Board;
    /// let b = Board::from_rows(vec![vec![2, 0], vec![0, 4]]).unwrap();
    /// assert_eq!(b.get(1, 1), 4);
    /// assert!(Board::from_rows(vec![vec![3, 0], vec![0, 0]]).is_err());
    /// ```
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Result<Self, EngineError> {
        let size = rows.len();
        let mut board = Board::empty(size)?;
        for (r, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(EngineError::NotSquare {
                    row: r,
                    len: row.len(),
                    size,
                });
            }
            for (c, value) in row.into_iter().enumerate() {
                if value != 0 && (value < 2 || !value.is_power_of_two()) {
                    return Err(EngineError::InvalidTile {
                        row: r,
                        col: c,
                        value,
                    });
                }
                board.set(r, c, value);
            }
        }
        Ok(board)
    }

    /// Edge length N.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Value at `(row, col)`. Panics when out of range, like slice indexing.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Tile {
        self.cells[row * self.size + col]
    }

    #[inline]
    pub(crate) fn set(&mut self, row: usize, col: usize, value: Tile) {
        self.cells[row * self.size + col] = value;
    }

    /// Borrow one row.
    #[inline]
    pub fn row(&self, row: usize) -> &[Tile] {
        &self.cells[row * self.size..(row + 1) * self.size]
    }

    #[inline]
    pub(crate) fn row_mut(&mut self, row: usize) -> &mut [Tile] {
        &mut self.cells[row * self.size..(row + 1) * self.size]
    }

    /// Iterate over rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> + '_ {
        self.cells.chunks(self.size)
    }

    /// Tile values in row-major order.
    pub fn cells(&self) -> &[Tile] {
        &self.cells
    }

    /// Empty cells in row-major order.
    pub fn empty_cells(&self) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v == 0)
            .map(|(idx, _)| Position(idx / self.size, idx % self.size))
            .collect()
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|&&v| v == 0).count()
    }

    /// Highest tile value on the board (0 for an empty board).
    pub fn highest_tile(&self) -> Tile {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Sum of all tile values.
    pub fn tile_sum(&self) -> Score {
        self.cells.iter().map(|&v| Score::from(v)).sum()
    }

    /// Return the board resulting from sliding/merging tiles in `dir` (no random insert).
    ///
    /// ```
    /// use twenty48_core::engine::{Board, Move};
    /// let b = Board::from_rows(vec![vec![2, 2], vec![0, 4]]).unwrap();
    /// let shifted = b.shift(Move::Left);
    /// assert_eq!(shifted.board.row(0), &[4, 0]);
    /// assert_eq!(shifted.gained, 4);
    /// ```
    #[inline]
    pub fn shift(&self, dir: Move) -> ops::Shifted {
        ops::shift(self, dir)
    }

    /// Place a 2 (90%) or 4 (10%) on a uniformly chosen empty cell.
    /// Returns `None` and leaves the board untouched when it is full.
    #[inline]
    pub fn spawn_random_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Position> {
        ops::spawn_random_tile(self, rng)
    }

    /// True if some direction can still change the board.
    #[inline]
    pub fn has_any_move(&self) -> bool {
        ops::has_any_move(self)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rows()).finish()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(self.size * 8 - 1);
        for (r, row) in self.rows().enumerate() {
            if r > 0 {
                writeln!(f, "{rule}")?;
            }
            let cells: Vec<String> = row.iter().map(|&v| ops::format_val(v)).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

impl TryFrom<Vec<Vec<Tile>>> for Board {
    type Error = EngineError;

    fn try_from(rows: Vec<Vec<Tile>>) -> Result<Self, Self::Error> {
        Board::from_rows(rows)
    }
}

impl From<Board> for Vec<Vec<Tile>> {
    fn from(b: Board) -> Self {
        b.rows().map(<[Tile]>::to_vec).collect()
    }
}

/// Immutable snapshot of one game after a `new_game` or a move.
///
/// Serializes as `{"size", "board", "score", "won", "over", "newTiles"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    size: usize,
    board: Board,
    score: Score,
    won: bool,
    over: bool,
    new_tiles: Vec<Position>,
}

impl GameState {
    pub(crate) fn new(
        board: Board,
        score: Score,
        won: bool,
        over: bool,
        new_tiles: Vec<Position>,
    ) -> Self {
        Self {
            size: board.size(),
            board,
            score,
            won,
            over,
            new_tiles,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn won(&self) -> bool {
        self.won
    }

    pub fn over(&self) -> bool {
        self.over
    }

    /// Cells spawned by the move (or new game) that produced this state.
    pub fn new_tiles(&self) -> &[Position] {
        &self.new_tiles
    }
}

/// Result of applying one direction to a [`GameState`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub state: GameState,
    /// Whether any tile slid or merged.
    pub moved: bool,
    /// Score gained from merges during this move.
    pub gained: Score,
}
