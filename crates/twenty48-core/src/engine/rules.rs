use rand::Rng;

use super::error::EngineError;
use super::ops;
use super::state::{Board, GameState, Move, MoveOutcome, Position, Score, Tile};

pub const DEFAULT_WIN_TILE: Tile = 2048;

/// Game rules shared by every state of a game.
///
/// The engine holds no other state: each call takes a snapshot and returns a
/// new one, so a `Rules` value can be shared freely across threads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rules {
    win_tile: Tile,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            win_tile: DEFAULT_WIN_TILE,
        }
    }
}

impl Rules {
    pub fn new(win_tile: Tile) -> Result<Self, EngineError> {
        if win_tile < 4 || !win_tile.is_power_of_two() {
            return Err(EngineError::InvalidWinTile(win_tile));
        }
        Ok(Self { win_tile })
    }

    pub fn win_tile(&self) -> Tile {
        self.win_tile
    }

    /// Empty `size` x `size` board with two tiles spawned one after the other.
    ///
    /// ```
    /// use twenty48_core::engine::Rules;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let game = Rules::default().new_game(4, &mut rng).unwrap();
    /// assert_eq!(game.new_tiles().len(), 2);
    /// assert_eq!(game.board().count_empty(), 14);
    /// assert_eq!(game.score(), 0);
    /// ```
    pub fn new_game<R: Rng + ?Sized>(
        &self,
        size: usize,
        rng: &mut R,
    ) -> Result<GameState, EngineError> {
        let mut board = Board::empty(size)?;
        let new_tiles: Vec<Position> = (0..2)
            .filter_map(|_| board.spawn_random_tile(rng))
            .collect();
        Ok(GameState::new(board, 0, false, false, new_tiles))
    }

    /// Slide/merge in `direction`, then spawn one tile if anything moved.
    ///
    /// `state` is left untouched. A move that changes nothing returns the
    /// same board and score with no new tiles.
    ///
    /// ```
    /// use twenty48_core::engine::{Board, Move, Rules};
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let rules = Rules::default();
    /// let board = Board::from_rows(vec![vec![2, 2], vec![0, 0]]).unwrap();
    /// let state = rules.evaluate(board, 0);
    /// let out = rules.play(&state, Move::Left, &mut StdRng::seed_from_u64(1));
    /// assert!(out.moved);
    /// assert_eq!(out.state.score(), 4);
    /// assert_eq!(out.state.new_tiles().len(), 1);
    /// ```
    pub fn play<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        direction: Move,
        rng: &mut R,
    ) -> MoveOutcome {
        let ops::Shifted {
            mut board,
            gained,
            moved,
        } = ops::shift(state.board(), direction);

        let new_tiles = if moved {
            board.spawn_random_tile(rng).into_iter().collect()
        } else {
            Vec::new()
        };
        let (won, over) = self.terminal_flags(&board);
        MoveOutcome {
            state: GameState::new(board, state.score() + gained, won, over, new_tiles),
            moved,
            gained,
        }
    }

    /// Snapshot of an arbitrary board with `won`/`over` computed and no new tiles.
    pub fn evaluate(&self, board: Board, score: Score) -> GameState {
        let (won, over) = self.terminal_flags(&board);
        GameState::new(board, score, won, over, Vec::new())
    }

    fn terminal_flags(&self, board: &Board) -> (bool, bool) {
        let won = ops::is_won(board, self.win_tile);
        let over = !won && !ops::has_any_move(board);
        (won, over)
    }
}
