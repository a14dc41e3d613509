//! Property tests for the rules, scoring and session invariants.

use proptest::prelude::*;

use go9::board::{Board, Color, points};
use go9::constants::{BOARD_CELLS, N};
use go9::group::groups_with_liberties;
use go9::rules::{MoveError, PositionKey, PositionSet, is_legal_move};
use go9::scoring::{Captures, DeadMask, GameResult, calc_final_score, territory_score, toggle_dead_group_at};
use go9::search::{Level, SearchConfig};
use go9::session::GameSession;

fn to_point(i: usize) -> (usize, usize) {
    (i % N, i / N)
}

/// Play the attempted points alternately from Black, skipping illegal ones.
/// Each step yields the board before, the move, and its outcome.
fn replay<F>(attempts: &[usize], mut check: F) -> Result<(Board, PositionSet), TestCaseError>
where
    F: FnMut(&Board, (usize, usize), Color, &PositionSet) -> Result<(), TestCaseError>,
{
    let mut board = Board::new();
    let mut seen = PositionSet::new();
    let mut color = Color::Black;
    seen.insert(PositionKey::new(&board, color));
    for &i in attempts {
        let p = to_point(i);
        check(&board, p, color, &seen)?;
        if let Ok(placement) = is_legal_move(&board, p, color, &seen) {
            prop_assert!(seen.insert(placement.key), "accepted move repeated a position");
            board = placement.board;
            color = color.opponent();
        }
    }
    Ok((board, seen))
}

fn attempts() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..BOARD_CELLS, 0..120)
}

proptest! {
    #[test]
    fn prop_stone_count_is_conserved(moves in attempts()) {
        replay(&moves, |board, p, color, seen| {
            if let Ok(placement) = is_legal_move(board, p, color, seen) {
                let before = board.total_stones();
                prop_assert_eq!(
                    placement.board.total_stones(),
                    before + 1 - placement.captured_count()
                );
                prop_assert_eq!(
                    placement.board.stone_count(color.opponent()),
                    board.stone_count(color.opponent()) - placement.captured_count()
                );
            }
            Ok(())
        })?;
    }

    #[test]
    fn prop_no_group_without_liberties(moves in attempts()) {
        let (board, _) = replay(&moves, |_, _, _, _| Ok(()))?;
        for color in [Color::Black, Color::White] {
            for (group, libs) in groups_with_liberties(&board, color) {
                prop_assert!(libs > 0, "group at {:?} has no liberties", group.stones[0]);
            }
        }
    }

    #[test]
    fn prop_capture_touches_only_opponent_stones(moves in attempts()) {
        replay(&moves, |board, p, color, seen| {
            if let Ok(placement) = is_legal_move(board, p, color, seen) {
                for q in points() {
                    if q == p {
                        prop_assert_eq!(placement.board.get(q), Some(color));
                    } else if placement.board.get(q) != board.get(q) {
                        prop_assert_eq!(board.get(q), Some(color.opponent()));
                        prop_assert_eq!(placement.board.get(q), None);
                        prop_assert!(placement.captured.contains(&q));
                    }
                }
            }
            Ok(())
        })?;
    }

    #[test]
    fn prop_occupied_points_are_rejected(moves in attempts()) {
        let (board, seen) = replay(&moves, |_, _, _, _| Ok(()))?;
        for p in points().filter(|&p| board.get(p).is_some()) {
            for color in [Color::Black, Color::White] {
                prop_assert_eq!(is_legal_move(&board, p, color, &seen), Err(MoveError::Occupied));
            }
        }
    }

    #[test]
    fn prop_territory_partitions_empty_points(moves in attempts()) {
        let (board, _) = replay(&moves, |_, _, _, _| Ok(()))?;
        let terr = territory_score(&board);
        prop_assert_eq!(terr.black + terr.white + terr.neutral, board.empty_count());
    }

    #[test]
    fn prop_dead_toggle_twice_is_identity(moves in attempts(), at in 0usize..BOARD_CELLS) {
        let (board, _) = replay(&moves, |_, _, _, _| Ok(()))?;
        let p = to_point(at);
        let once = toggle_dead_group_at(&board, p, &DeadMask::new());
        let twice = toggle_dead_group_at(&board, p, &once);
        prop_assert_eq!(twice, DeadMask::new());
        if board.get(p).is_none() {
            prop_assert_eq!(once, DeadMask::new());
        } else {
            prop_assert!(once.is_dead(p));
        }
    }

    #[test]
    fn prop_empty_board_goes_to_komi(komi in 0.5f64..20.0) {
        let score = calc_final_score(&Board::new(), &DeadMask::new(), Captures::default(), komi);
        prop_assert_eq!(score.black_score, 0.0);
        prop_assert_eq!(score.white_score, komi);
        prop_assert_eq!(score.result, GameResult::Win { winner: Color::White, margin: komi });
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_undo_restores_previous_state(
        moves in prop::collection::vec(0usize..BOARD_CELLS, 1..8),
        seed in any::<u64>(),
    ) {
        let config = SearchConfig { level: Level::Basic, ..SearchConfig::default() };
        let mut game = GameSession::with_seed(config, seed);
        let mut states = Vec::new();
        for i in moves {
            let (x, y) = to_point(i);
            let before = (*game.board(), game.captures(), game.seen_positions().clone());
            if game.attempt_placement(x, y).is_err() {
                continue;
            }
            states.push(before);
            let before = (*game.board(), game.captures(), game.seen_positions().clone());
            if game.ai_take_turn().is_err() {
                break;
            }
            states.push(before);
        }
        while let Some((board, captures, seen)) = states.pop() {
            prop_assert!(game.undo());
            prop_assert_eq!(*game.board(), board);
            prop_assert_eq!(game.captures(), captures);
            prop_assert_eq!(game.seen_positions(), &seen);
        }
        prop_assert!(!game.undo());
    }
}
