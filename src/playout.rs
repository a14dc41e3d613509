//! Monte Carlo rollouts (random game simulation).
//!
//! A rollout plays uniformly random legal stones from a position for a
//! bounded number of plies, passing now and then, and scores the final
//! board with a rough area count. Rollouts work on private board copies
//! and a private copy of the superko set, so the real game is never touched.

use fastrand::Rng;

use crate::board::{Board, Color, Point, points};
use crate::rules::{PositionKey, PositionSet, is_legal_move};
use crate::scoring::territory_score;

/// Rollout parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RolloutParams {
    /// Maximum plies before the rollout is scored.
    pub max_plies: usize,
    /// Probability of trying a stone instead of passing on each ply.
    pub play_probability: f64,
}

/// Play a random continuation from `board` with `to_move` to play.
///
/// Returns the approximate area difference of the final board, positive
/// when Black is ahead.
pub fn random_playout(
    board: &Board,
    to_move: Color,
    seen: &PositionSet,
    params: RolloutParams,
    rng: &mut Rng,
) -> i32 {
    let (last, _) = play_out(board, to_move, seen, params, rng);
    approximate_area_diff(&last)
}

/// The rollout itself: returns the final board and the number of plies played.
fn play_out(
    board: &Board,
    to_move: Color,
    seen: &PositionSet,
    params: RolloutParams,
    rng: &mut Rng,
) -> (Board, usize) {
    let mut board = *board;
    let mut color = to_move;
    let mut local = seen.clone();
    let mut passes = 0;
    let mut plies = 0;

    while plies < params.max_plies {
        let chosen = if rng.f64() < params.play_probability {
            choose_random_move(&board, color, &local, rng)
        } else {
            None
        };
        plies += 1;

        match chosen {
            Some((next, key)) => {
                board = next;
                local.insert(key);
                passes = 0;
            }
            None => {
                passes += 1;
                if passes >= 2 {
                    break;
                }
            }
        }
        color = color.opponent();
    }

    (board, plies)
}

/// Pick a uniformly random legal placement for `color`.
///
/// Candidates are shuffled lazily and tried in order until one is legal,
/// which picks uniformly among the legal ones without testing them all.
fn choose_random_move(
    board: &Board,
    color: Color,
    seen: &PositionSet,
    rng: &mut Rng,
) -> Option<(Board, PositionKey)> {
    let mut candidates: Vec<Point> = points().filter(|&p| board.get(p).is_none()).collect();
    let n = candidates.len();
    for i in 0..n {
        let j = i + rng.usize(..n - i);
        candidates.swap(i, j);
        if let Ok(placement) = is_legal_move(board, candidates[i], color, seen) {
            return Some((placement.board, placement.key));
        }
    }
    None
}

/// Stones plus surrounded territory for Black, minus the same for White.
pub fn approximate_area_diff(board: &Board) -> i32 {
    let terr = territory_score(board);
    let black = board.stone_count(Color::Black) + terr.of(Color::Black);
    let white = board.stone_count(Color::White) + terr.of(Color::White);
    black as i32 - white as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::N;

    fn params() -> RolloutParams {
        RolloutParams {
            max_plies: 18,
            play_probability: 0.92,
        }
    }

    #[test]
    fn test_area_diff_empty_board() {
        assert_eq!(approximate_area_diff(&Board::new()), 0);
    }

    #[test]
    fn test_area_diff_counts_stones_and_territory() {
        let mut board = Board::new();
        board.set((4, 4), Some(Color::Black));
        // One black stone surrounds the whole board
        assert_eq!(approximate_area_diff(&board), (N * N) as i32);
        board.set((0, 0), Some(Color::White));
        // Empty region now touches both colors
        assert_eq!(approximate_area_diff(&board), 0);
    }

    #[test]
    fn test_playout_is_reproducible_with_seed() {
        let board = Board::new();
        let seen = PositionSet::new();
        let a = random_playout(&board, Color::Black, &seen, params(), &mut Rng::with_seed(7));
        let b = random_playout(&board, Color::Black, &seen, params(), &mut Rng::with_seed(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_never_playing_stops_after_two_passes() {
        let mut board = Board::new();
        board.set((2, 1), Some(Color::Black));
        board.set((6, 7), Some(Color::Black));
        board.set((4, 4), Some(Color::White));
        let never = RolloutParams {
            play_probability: 0.0,
            ..params()
        };
        let mut rng = Rng::with_seed(4);
        let (last, plies) = play_out(&board, Color::White, &PositionSet::new(), never, &mut rng);
        assert_eq!(last, board);
        assert_eq!(plies, 2);
        let diff = random_playout(&board, Color::White, &PositionSet::new(), never, &mut rng);
        assert_eq!(diff, approximate_area_diff(&board));
    }

    #[test]
    fn test_ply_cap_bounds_new_stones() {
        let seen = PositionSet::new();
        for max_plies in [0, 1, 5, 18] {
            let always = RolloutParams {
                max_plies,
                play_probability: 1.0,
            };
            let mut rng = Rng::with_seed(max_plies as u64);
            let (last, plies) = play_out(&Board::new(), Color::Black, &seen, always, &mut rng);
            assert_eq!(plies, max_plies);
            // Early captures are unlikely but possible, so only bound the count
            assert!(last.total_stones() <= max_plies);
        }
    }

    #[test]
    fn test_playout_leaves_callers_set_alone() {
        let board = Board::new();
        let mut seen = PositionSet::new();
        seen.insert(PositionKey::new(&board, Color::Black));
        let before = seen.clone();
        let mut rng = Rng::with_seed(9);
        random_playout(&board, Color::Black, &seen, params(), &mut rng);
        assert_eq!(seen, before);
    }

    #[test]
    fn test_random_moves_add_one_stone_each() {
        let mut rng = Rng::with_seed(1);
        let mut board = Board::new();
        let mut seen = PositionSet::new();
        // With no white stones there is nothing to capture
        for _ in 0..4 {
            let (next, key) = choose_random_move(&board, Color::Black, &seen, &mut rng).unwrap();
            board = next;
            seen.insert(key);
        }
        assert_eq!(board.total_stones(), 4);
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_no_legal_move_means_pass() {
        // Black fills the board except one point; filling it would be suicide
        let mut board = Board::new();
        for p in points() {
            if p != (0, 0) {
                board.set(p, Some(Color::Black));
            }
        }
        let mut rng = Rng::with_seed(3);
        assert!(choose_random_move(&board, Color::Black, &PositionSet::new(), &mut rng).is_none());
    }
}
