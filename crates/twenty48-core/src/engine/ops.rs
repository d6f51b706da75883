use rand::Rng;

use super::rules::Rules;
use super::state::{Board, GameState, Move, MoveOutcome, Position, Score, Tile};

/// Board after sliding/merging in one direction, before any spawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shifted {
    pub board: Board,
    pub gained: Score,
    pub moved: bool,
}

/// One line after compress-and-merge toward index 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineShift {
    pub values: Vec<Tile>,
    pub gained: Score,
    pub changed: bool,
}

/// Start a game with the default rules, using thread-local RNG.
///
/// For reproducible games, prefer `Rules::new_game(size, &mut impl Rng)`.
pub fn new_game(size: usize) -> Result<GameState, super::EngineError> {
    let mut rng = rand::thread_rng();
    Rules::default().new_game(size, &mut rng)
}

/// Apply one move with the default rules, using thread-local RNG.
pub fn make_move(state: &GameState, direction: Move) -> MoveOutcome {
    let mut rng = rand::thread_rng();
    Rules::default().play(state, direction, &mut rng)
}

/// Slide/merge tiles in the given direction. No randomness.
///
/// Every direction is resolved as "collapse each line toward index 0" on the
/// transformed board, then mapped back.
pub fn shift(board: &Board, direction: Move) -> Shifted {
    let mut lines = transform(board, direction);
    let mut gained = 0;
    let mut moved = false;
    for idx in 0..lines.size() {
        let res = merge_line(lines.row(idx));
        moved |= res.changed;
        gained += res.gained;
        lines.row_mut(idx).copy_from_slice(&res.values);
    }
    Shifted {
        board: inverse_transform(&lines, direction),
        gained,
        moved,
    }
}

/// Board cell that feeds position `pos` of line `line` when collapsing in `direction`.
#[inline]
fn source_cell(direction: Move, n: usize, line: usize, pos: usize) -> (usize, usize) {
    match direction {
        Move::Left => (line, pos),
        Move::Right => (line, n - 1 - pos),
        Move::Up => (pos, line),
        Move::Down => (n - 1 - pos, line),
    }
}

fn remap(board: &Board, direction: Move, inverse: bool) -> Board {
    let n = board.size();
    let mut out = board.clone();
    for line in 0..n {
        for pos in 0..n {
            let (row, col) = source_cell(direction, n, line, pos);
            if inverse {
                out.set(row, col, board.get(line, pos));
            } else {
                out.set(line, pos, board.get(row, col));
            }
        }
    }
    out
}

/// Reorient `board` so that `direction` becomes "rows collapsing toward column 0".
pub fn transform(board: &Board, direction: Move) -> Board {
    remap(board, direction, false)
}

/// Exact inverse of [`transform`] for the same direction.
pub fn inverse_transform(board: &Board, direction: Move) -> Board {
    remap(board, direction, true)
}

/// Compress a line toward index 0 and merge equal neighbours once each.
///
/// A freshly merged tile is never merged again in the same pass, so
/// `[2, 0, 2, 2]` becomes `[4, 2, 0, 0]`.
pub fn merge_line(line: &[Tile]) -> LineShift {
    let compressed: Vec<Tile> = line.iter().copied().filter(|&v| v != 0).collect();
    let mut values = Vec::with_capacity(line.len());
    let mut gained: Score = 0;
    let mut i = 0;
    while i < compressed.len() {
        let cur = compressed[i];
        // Tiles at the top of the u32 range stay put instead of overflowing.
        match cur.checked_mul(2) {
            Some(merged) if compressed.get(i + 1) == Some(&cur) => {
                values.push(merged);
                gained += Score::from(merged);
                i += 2;
            }
            _ => {
                values.push(cur);
                i += 1;
            }
        }
    }
    values.resize(line.len(), 0);
    let changed = values.as_slice() != line;
    LineShift {
        values,
        gained,
        changed,
    }
}

/// Insert a random 2 (90%) or 4 (10%) tile into a uniformly chosen empty cell.
///
/// Candidates are enumerated row-major. A full board is left untouched.
pub fn spawn_random_tile<R: Rng + ?Sized>(board: &mut Board, rng: &mut R) -> Option<Position> {
    let empties = board.empty_cells();
    if empties.is_empty() {
        return None;
    }
    let pos = empties[rng.gen_range(0..empties.len())];
    board.set(pos.row(), pos.col(), generate_random_tile(rng));
    Some(pos)
}

pub(crate) fn generate_random_tile<R: Rng + ?Sized>(rng: &mut R) -> Tile {
    if rng.gen_range(0..10) < 9 { 2 } else { 4 }
}

/// True if an empty cell exists or two orthogonal neighbours hold equal values.
pub fn has_any_move(board: &Board) -> bool {
    if board.count_empty() > 0 {
        return true;
    }
    let n = board.size();
    (0..n).any(|r| {
        (0..n).any(|c| {
            let v = board.get(r, c);
            (r + 1 < n && board.get(r + 1, c) == v) || (c + 1 < n && board.get(r, c + 1) == v)
        })
    })
}

pub fn is_won(board: &Board, win_tile: Tile) -> bool {
    board.cells().contains(&win_tile)
}

pub(crate) fn format_val(val: Tile) -> String {
    match val {
        0 => " ".repeat(7),
        v => format!("{v:^7}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineError;
    use rand::{SeedableRng, rngs::StdRng};

    fn board(rows: &[&[Tile]]) -> Board {
        Board::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn it_merge_line() {
        assert_eq!(merge_line(&[0, 0, 0, 0]).values, vec![0, 0, 0, 0]);
        assert_eq!(merge_line(&[2, 4, 2, 4]).values, vec![2, 4, 2, 4]);
        assert_eq!(merge_line(&[2, 2, 4, 4]).values, vec![4, 8, 0, 0]);
        assert_eq!(merge_line(&[2, 0, 0, 2]).values, vec![4, 0, 0, 0]);
        assert_eq!(merge_line(&[4, 4, 4, 4]).values, vec![8, 8, 0, 0]);
    }

    #[test]
    fn merge_line_reports_gain_and_change() {
        let res = merge_line(&[2, 2, 4, 0]);
        assert_eq!(res.values, vec![4, 4, 0, 0]);
        assert_eq!(res.gained, 4);
        assert!(res.changed);

        let res = merge_line(&res.values);
        assert_eq!(res.values, vec![8, 0, 0, 0]);
        assert_eq!(res.gained, 8);
        assert!(res.changed);

        let res = merge_line(&[8, 4, 2, 0]);
        assert_eq!(res.gained, 0);
        assert!(!res.changed);
    }

    #[test]
    fn merged_tile_does_not_merge_again() {
        let res = merge_line(&[2, 0, 2, 2]);
        assert_eq!(res.values, vec![4, 2, 0, 0]);
        assert_eq!(res.gained, 4);
    }

    #[test]
    fn compress_without_merge_counts_as_change() {
        let res = merge_line(&[0, 2, 0, 4]);
        assert_eq!(res.values, vec![2, 4, 0, 0]);
        assert_eq!(res.gained, 0);
        assert!(res.changed);
    }

    #[test]
    fn largest_tiles_do_not_overflow() {
        let top = 1u32 << 31;
        let res = merge_line(&[top, top]);
        assert_eq!(res.values, vec![top, top]);
        assert!(!res.changed);
    }

    #[test]
    fn test_shift_left() {
        let b = board(&[&[2, 4, 8, 16], &[2, 8, 8, 4], &[4, 0, 0, 4], &[2, 0, 0, 4]]);
        let s = shift(&b, Move::Left);
        assert_eq!(
            s.board,
            board(&[&[2, 4, 8, 16], &[2, 16, 4, 0], &[8, 0, 0, 0], &[2, 4, 0, 0]])
        );
        assert_eq!(s.gained, 24);
        assert!(s.moved);
    }

    #[test]
    fn test_shift_right() {
        let b = board(&[&[2, 4, 8, 16], &[2, 8, 8, 4], &[4, 0, 0, 4], &[2, 0, 0, 4]]);
        let s = shift(&b, Move::Right);
        assert_eq!(
            s.board,
            board(&[&[2, 4, 8, 16], &[0, 2, 16, 4], &[0, 0, 0, 8], &[0, 0, 2, 4]])
        );
        assert_eq!(s.gained, 24);
    }

    #[test]
    fn test_shift_up() {
        let b = board(&[&[2, 2, 4, 2], &[4, 8, 0, 0], &[8, 8, 0, 0], &[16, 4, 4, 4]]);
        let s = shift(&b, Move::Up);
        assert_eq!(
            s.board,
            board(&[&[2, 2, 8, 2], &[4, 16, 0, 4], &[8, 4, 0, 0], &[16, 0, 0, 0]])
        );
        assert_eq!(s.gained, 24);
    }

    #[test]
    fn test_shift_down() {
        let b = board(&[&[2, 2, 4, 2], &[4, 8, 0, 0], &[8, 8, 0, 0], &[16, 4, 4, 4]]);
        let s = shift(&b, Move::Down);
        assert_eq!(
            s.board,
            board(&[&[2, 0, 0, 0], &[4, 2, 0, 0], &[8, 16, 0, 2], &[16, 4, 8, 4]])
        );
        assert_eq!(s.gained, 24);
    }

    #[test]
    fn blocked_shift_is_noop() {
        let b = board(&[&[2, 0, 0, 0], &[4, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0]]);
        let s = shift(&b, Move::Left);
        assert_eq!(s.board, b);
        assert_eq!(s.gained, 0);
        assert!(!s.moved);
    }

    #[test]
    fn transform_round_trip() {
        let b = board(&[&[2, 4, 8], &[16, 32, 64], &[128, 256, 512]]);
        for dir in Move::ALL {
            assert_eq!(inverse_transform(&transform(&b, dir), dir), b, "{dir}");
        }
    }

    #[test]
    fn transform_orientation() {
        let b = board(&[&[2, 4], &[8, 16]]);
        assert_eq!(transform(&b, Move::Left), b);
        assert_eq!(transform(&b, Move::Right), board(&[&[4, 2], &[16, 8]]));
        assert_eq!(transform(&b, Move::Up), board(&[&[2, 8], &[4, 16]]));
        assert_eq!(transform(&b, Move::Down), board(&[&[8, 2], &[16, 4]]));
    }

    #[test]
    fn it_spawn_random_tile_fills_board() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut b = Board::empty(4).unwrap();
        for _ in 0..16 {
            let pos = spawn_random_tile(&mut b, &mut rng).expect("empty cell");
            assert!(matches!(b.get(pos.row(), pos.col()), 2 | 4));
        }
        assert_eq!(b.count_empty(), 0);
        let before = b.clone();
        assert_eq!(spawn_random_tile(&mut b, &mut rng), None);
        assert_eq!(b, before);
    }

    #[test]
    fn spawn_targets_only_empty_cell() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..32 {
            let mut b = board(&[&[2, 4], &[0, 8]]);
            assert_eq!(spawn_random_tile(&mut b, &mut rng), Some(Position(1, 0)));
            assert_eq!(b.get(0, 0), 2);
            assert_eq!(b.get(0, 1), 4);
            assert_eq!(b.get(1, 1), 8);
        }
    }

    #[test]
    fn spawn_values_are_mostly_twos() {
        let mut rng = StdRng::seed_from_u64(2048);
        let fours = (0..10_000)
            .filter(|_| generate_random_tile(&mut rng) == 4)
            .count();
        assert!((700..1300).contains(&fours), "fours = {fours}");
    }

    #[test]
    fn spawn_picks_empty_cells_uniformly() {
        let mut rng = StdRng::seed_from_u64(4096);
        let start = board(&[&[2, 0, 4], &[0, 8, 16], &[32, 0, 0]]);
        let candidates = start.empty_cells();
        assert_eq!(candidates.len(), 4);
        let mut counts = [0usize; 4];
        for _ in 0..40_000 {
            let mut b = start.clone();
            let pos = spawn_random_tile(&mut b, &mut rng).expect("empty cell");
            let idx = candidates.iter().position(|&c| c == pos).expect("candidate");
            counts[idx] += 1;
        }
        for count in counts {
            assert!((9_400..10_600).contains(&count), "counts = {counts:?}");
        }
    }

    #[test]
    fn test_new_game_thread_rng() {
        let game = new_game(4).unwrap();
        assert_eq!(game.size(), 4);
        assert_eq!(game.new_tiles().len(), 2);
        assert_eq!(game.board().count_empty(), 14);
        assert_eq!(game.score(), 0);
        assert_eq!(new_game(1), Err(EngineError::InvalidSize(1)));
    }

    #[test]
    fn test_make_move_thread_rng() {
        let state = Rules::default().evaluate(board(&[&[2, 2, 0], &[0, 0, 0], &[0, 0, 4]]), 0);
        let out = make_move(&state, Move::Left);
        assert!(out.moved);
        assert_eq!(out.gained, 4);
        assert_eq!(out.state.new_tiles().len(), 1);
        assert_eq!(out.state.board().get(0, 0), 4);
        assert_eq!(out.state.board().get(2, 0), 4);
        assert_eq!(out.state.score(), 4);
        assert_eq!(state.board().get(0, 0), 2);
    }

    #[test]
    fn it_has_any_move() {
        assert!(has_any_move(&board(&[&[2, 4], &[4, 0]])));
        assert!(has_any_move(&board(&[&[2, 2], &[4, 8]])));
        assert!(has_any_move(&board(&[&[2, 4], &[2, 8]])));
        assert!(!has_any_move(&board(&[&[2, 4], &[4, 2]])));
        // no wraparound between the ends of a row or column
        assert!(!has_any_move(&board(&[&[2, 4, 2], &[4, 8, 4], &[2, 4, 2]])));
    }

    #[test]
    fn it_is_won() {
        assert!(is_won(&board(&[&[2048, 0], &[0, 0]]), 2048));
        assert!(is_won(&board(&[&[2, 4], &[8, 2048]]), 2048));
        assert!(!is_won(&board(&[&[1024, 1024], &[0, 0]]), 2048));
        assert!(is_won(&board(&[&[2, 4], &[8, 16]]), 16));
    }

    #[test]
    fn it_format_val() {
        assert_eq!(format_val(0), "       ");
        assert_eq!(format_val(2048), " 2048  ");
        assert_eq!(format_val(2).len(), 7);
    }
}
