//! Move validation: captures, suicide and positional superko.
//!
//! [`apply_move`] resolves a tentative placement on a copy of the board.
//! [`is_legal_move`] wraps it with the bounds check and the superko test.
//! The checks always run in the same order: bounds, occupancy,
//! capture/suicide resolution, superko. Reordering them changes which
//! reason a move is rejected for.

use std::collections::HashSet;

use thiserror::Error;

use crate::board::{Board, Color, Point, in_bounds, neighbors};
use crate::constants::BOARD_CELLS;
use crate::group::{Group, count_liberties, flood_group, groups_with_liberties};

/// Why a placement was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("illegal move: outside the board")]
    OutOfBounds,
    #[error("illegal move: point not empty")]
    Occupied,
    #[error("illegal move: suicide")]
    Suicide,
    #[error("illegal move: repeats an earlier position (superko)")]
    SuperkoRepeat,
}

impl MoveError {
    /// Short reason code.
    pub fn reason(self) -> &'static str {
        match self {
            MoveError::OutOfBounds => "out-of-bounds",
            MoveError::Occupied => "occupied",
            MoveError::Suicide => "suicide",
            MoveError::SuperkoRepeat => "superko-repeat",
        }
    }
}

const KEY_WORDS: usize = (BOARD_CELLS * 2 + 1).div_ceil(64);

/// Exact encoding of a board plus the side to move next.
///
/// Two bits per point and one bit for the side to move, packed into a
/// fixed number of words. Equal keys mean equal positions; there are no
/// collisions to worry about.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PositionKey([u64; KEY_WORDS]);

impl PositionKey {
    pub fn new(board: &Board, to_move: Color) -> Self {
        let mut words = [0u64; KEY_WORDS];
        for (i, cell) in board.cells().iter().enumerate() {
            let code: u64 = match cell {
                None => 0,
                Some(Color::Black) => 1,
                Some(Color::White) => 2,
            };
            let bit = i * 2;
            words[bit / 64] |= code << (bit % 64);
        }
        if to_move == Color::White {
            let bit = BOARD_CELLS * 2;
            words[bit / 64] |= 1u64 << (bit % 64);
        }
        PositionKey(words)
    }
}

/// Positions seen so far in a game.
pub type PositionSet = HashSet<PositionKey>;

/// A successfully resolved placement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    /// The board after the stone is placed and captures are removed.
    pub board: Board,
    /// Points whose stones were captured.
    pub captured: Vec<Point>,
    /// Key of the resulting board with the opponent to move.
    pub key: PositionKey,
}

impl Placement {
    pub fn captured_count(&self) -> usize {
        self.captured.len()
    }
}

/// Place a stone and resolve captures.
///
/// Opponent groups left without liberties are removed first; the placed
/// stone's group is checked afterwards, so a move is only legal if it has a
/// liberty once the captures are gone.
pub fn apply_move(board: &Board, p: Point, color: Color) -> Result<Placement, MoveError> {
    if !in_bounds(p) {
        return Err(MoveError::OutOfBounds);
    }
    if board.get(p).is_some() {
        return Err(MoveError::Occupied);
    }

    let mut next = *board;
    next.set(p, Some(color));

    let opp = color.opponent();
    let mut captured = Vec::new();
    for n in neighbors(p) {
        // A group reached through two neighbors is already gone the second time
        if next.get(n) != Some(opp) {
            continue;
        }
        let Some(group) = flood_group(&next, n) else {
            continue;
        };
        if count_liberties(&next, &group) == 0 {
            for &s in &group.stones {
                next.set(s, None);
            }
            captured.extend(group.stones);
        }
    }

    let own = flood_group(&next, p).ok_or(MoveError::Suicide)?;
    if count_liberties(&next, &own) == 0 {
        return Err(MoveError::Suicide);
    }

    Ok(Placement {
        board: next,
        captured,
        key: PositionKey::new(&next, opp),
    })
}

/// Full legality check of a placement against the positions already seen.
pub fn is_legal_move(
    board: &Board,
    p: Point,
    color: Color,
    seen: &PositionSet,
) -> Result<Placement, MoveError> {
    if !in_bounds(p) {
        return Err(MoveError::OutOfBounds);
    }
    if board.get(p).is_some() {
        return Err(MoveError::Occupied);
    }
    let placement = apply_move(board, p, color)?;
    if seen.contains(&placement.key) {
        return Err(MoveError::SuperkoRepeat);
    }
    Ok(placement)
}

/// Groups of each color that are in atari.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AtariInfo {
    pub black: Vec<Group>,
    pub white: Vec<Group>,
}

impl AtariInfo {
    pub fn of(&self, color: Color) -> &[Group] {
        match color {
            Color::Black => &self.black,
            Color::White => &self.white,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.black.is_empty() && self.white.is_empty()
    }
}

/// Find every group with exactly one liberty. Advisory only.
pub fn compute_atari_info(board: &Board) -> AtariInfo {
    let in_atari = |color| {
        groups_with_liberties(board, color)
            .into_iter()
            .filter(|(_, libs)| *libs == 1)
            .map(|(g, _)| g)
            .collect()
    };
    AtariInfo {
        black: in_atari(Color::Black),
        white: in_atari(Color::White),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::N;

    fn board_with(black: &[Point], white: &[Point]) -> Board {
        let mut board = Board::new();
        for &p in black {
            board.set(p, Some(Color::Black));
        }
        for &p in white {
            board.set(p, Some(Color::White));
        }
        board
    }

    #[test]
    fn test_occupied_rejected() {
        let board = board_with(&[(3, 3)], &[]);
        assert_eq!(apply_move(&board, (3, 3), Color::White), Err(MoveError::Occupied));
        assert_eq!(
            is_legal_move(&board, (3, 3), Color::Black, &PositionSet::new()),
            Err(MoveError::Occupied)
        );
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let board = Board::new();
        assert_eq!(
            is_legal_move(&board, (N, 0), Color::Black, &PositionSet::new()),
            Err(MoveError::OutOfBounds)
        );
    }

    #[test]
    fn test_corner_suicide() {
        let board = board_with(&[(1, 0), (0, 1)], &[]);
        assert_eq!(apply_move(&board, (0, 0), Color::White), Err(MoveError::Suicide));
        // Black filling its own eye still has liberties
        assert!(apply_move(&board, (0, 0), Color::Black).is_ok());
    }

    #[test]
    fn test_multi_stone_suicide() {
        // White (0,0) next to empty (1,0); black surrounds both
        let board = board_with(&[(2, 0), (1, 1), (0, 1)], &[(0, 0)]);
        assert_eq!(apply_move(&board, (1, 0), Color::White), Err(MoveError::Suicide));
    }

    #[test]
    fn test_capture_removes_group() {
        // White stone at (1,1) surrounded on three sides
        let board = board_with(&[(0, 1), (1, 0), (2, 1)], &[(1, 1)]);
        let placement = apply_move(&board, (1, 2), Color::Black).unwrap();
        assert_eq!(placement.captured, vec![(1, 1)]);
        assert_eq!(placement.board.get((1, 1)), None);
        assert_eq!(placement.board.stone_count(Color::Black), 4);
    }

    #[test]
    fn test_capture_makes_otherwise_suicidal_move_legal() {
        let board = board_with(&[(0, 0), (2, 0), (1, 1)], &[(0, 1)]);
        // (1,0) has no empty neighbor but captures black (0,0)
        let placement = apply_move(&board, (1, 0), Color::White).unwrap();
        assert_eq!(placement.captured, vec![(0, 0)]);
    }

    #[test]
    fn test_superko_rejects_seen_position() {
        let board = Board::new();
        let mut seen = PositionSet::new();
        let placement = is_legal_move(&board, (4, 4), Color::Black, &seen).unwrap();
        seen.insert(placement.key);
        assert_eq!(
            is_legal_move(&board, (4, 4), Color::Black, &seen),
            Err(MoveError::SuperkoRepeat)
        );
    }

    #[test]
    fn test_position_key_depends_on_side_to_move() {
        let board = board_with(&[(4, 4)], &[]);
        assert_ne!(
            PositionKey::new(&board, Color::Black),
            PositionKey::new(&board, Color::White)
        );
        let other = board_with(&[], &[(4, 4)]);
        assert_ne!(
            PositionKey::new(&board, Color::White),
            PositionKey::new(&other, Color::White)
        );
    }

    #[test]
    fn test_atari_info() {
        let board = board_with(&[(0, 0)], &[(1, 0), (5, 5)]);
        let info = compute_atari_info(&board);
        assert_eq!(info.black.len(), 1);
        assert!(info.white.is_empty());
        assert_eq!(info.of(Color::Black)[0].stones, vec![(0, 0)]);
    }

    #[test]
    fn test_reason_codes() {
        assert_eq!(MoveError::Occupied.reason(), "occupied");
        assert_eq!(MoveError::SuperkoRepeat.reason(), "superko-repeat");
        assert_eq!(MoveError::Suicide.to_string(), "illegal move: suicide");
    }
}
