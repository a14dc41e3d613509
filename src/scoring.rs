//! End-of-game scoring: dead stones, territory and prisoners.
//!
//! Scoring is territory plus prisoners with komi for White. Dead stones are
//! marked by hand and removed before territory is counted; each removed
//! stone becomes a prisoner for the other side.

use std::fmt;

use crate::board::{Board, Color, Point, index, neighbors, points};
use crate::constants::BOARD_CELLS;
use crate::group::flood_group;

/// Stones captured during play, per capturing color.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Captures {
    pub black: u32,
    pub white: u32,
}

impl Captures {
    pub fn get(&self, color: Color) -> u32 {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }

    pub fn add(&mut self, color: Color, n: u32) {
        match color {
            Color::Black => self.black += n,
            Color::White => self.white += n,
        }
    }
}

/// Per-point dead flags. Only meaningful while scoring.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DeadMask([bool; BOARD_CELLS]);

impl Default for DeadMask {
    fn default() -> Self {
        Self([false; BOARD_CELLS])
    }
}

impl DeadMask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dead(&self, p: Point) -> bool {
        self.0[index(p)]
    }

    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&d| d).count()
    }
}

/// Toggle the dead status of the whole group at `p`.
///
/// If any stone of the group is marked dead, the group is revived; otherwise
/// every stone is marked dead. Empty points leave the mask unchanged.
pub fn toggle_dead_group_at(board: &Board, p: Point, mask: &DeadMask) -> DeadMask {
    let mut next = *mask;
    let Some(group) = flood_group(board, p) else {
        return next;
    };
    let any_dead = group.stones.iter().any(|&s| mask.is_dead(s));
    for &s in &group.stones {
        next.0[index(s)] = !any_dead;
    }
    next
}

/// The board used for counting, with dead stones lifted off.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScoringBoard {
    pub board: Board,
    /// Dead white stones, credited to Black.
    pub black_extra: u32,
    /// Dead black stones, credited to White.
    pub white_extra: u32,
}

pub fn scoring_board_and_prisoners(board: &Board, mask: &DeadMask) -> ScoringBoard {
    let mut derived = *board;
    let mut dead_black = 0;
    let mut dead_white = 0;
    for p in points() {
        if !mask.is_dead(p) {
            continue;
        }
        match board.get(p) {
            Some(Color::Black) => dead_black += 1,
            Some(Color::White) => dead_white += 1,
            None => {}
        }
        derived.set(p, None);
    }
    ScoringBoard {
        board: derived,
        black_extra: dead_white,
        white_extra: dead_black,
    }
}

/// Empty points split by who surrounds them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Territory {
    pub black: usize,
    pub white: usize,
    pub neutral: usize,
}

impl Territory {
    pub fn of(&self, color: Color) -> usize {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }
}

/// Flood-fill every empty region and credit it to the single color that
/// borders it. Regions touching both colors, or none, are neutral.
pub fn territory_score(board: &Board) -> Territory {
    let mut seen = [false; BOARD_CELLS];
    let mut terr = Territory::default();

    for start in points() {
        if board.get(start).is_some() || seen[index(start)] {
            continue;
        }
        seen[index(start)] = true;
        let mut stack = vec![start];
        let mut size = 0;
        let mut black_border = false;
        let mut white_border = false;

        while let Some(pt) = stack.pop() {
            size += 1;
            for n in neighbors(pt) {
                match board.get(n) {
                    None if !seen[index(n)] => {
                        seen[index(n)] = true;
                        stack.push(n);
                    }
                    None => {}
                    Some(Color::Black) => black_border = true,
                    Some(Color::White) => white_border = true,
                }
            }
        }

        match (black_border, white_border) {
            (true, false) => terr.black += size,
            (false, true) => terr.white += size,
            _ => terr.neutral += size,
        }
    }
    terr
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GameResult {
    Win { winner: Color, margin: f64 },
    Draw,
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::Win { winner, margin } => write!(f, "{}+{:.1}", winner.letter(), margin),
            GameResult::Draw => write!(f, "Draw"),
        }
    }
}

/// Full breakdown of a scored game.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FinalScore {
    pub komi: f64,
    pub black_territory: usize,
    pub white_territory: usize,
    pub neutral: usize,
    pub black_prisoners: u32,
    pub white_prisoners: u32,
    pub black_score: f64,
    pub white_score: f64,
    pub result: GameResult,
}

impl fmt::Display for FinalScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Black: {} territory + {} prisoners = {:.1}",
            self.black_territory, self.black_prisoners, self.black_score
        )?;
        writeln!(
            f,
            "White: {} territory + {} prisoners + {:.1} komi = {:.1}",
            self.white_territory, self.white_prisoners, self.komi, self.white_score
        )?;
        write!(f, "Neutral: {}  Result: {}", self.neutral, self.result)
    }
}

/// Score the position: territory after dead-stone removal plus in-play
/// captures plus dead stones, with komi added to White.
pub fn calc_final_score(board: &Board, mask: &DeadMask, captures: Captures, komi: f64) -> FinalScore {
    let scoring = scoring_board_and_prisoners(board, mask);
    let terr = territory_score(&scoring.board);

    let black_prisoners = captures.black + scoring.black_extra;
    let white_prisoners = captures.white + scoring.white_extra;

    let black_score = terr.black as f64 + black_prisoners as f64;
    let white_score = terr.white as f64 + white_prisoners as f64 + komi;

    let result = if black_score > white_score {
        GameResult::Win {
            winner: Color::Black,
            margin: black_score - white_score,
        }
    } else if white_score > black_score {
        GameResult::Win {
            winner: Color::White,
            margin: white_score - black_score,
        }
    } else {
        GameResult::Draw
    };

    FinalScore {
        komi,
        black_territory: terr.black,
        white_territory: terr.white,
        neutral: terr.neutral,
        black_prisoners,
        white_prisoners,
        black_score,
        white_score,
        result,
    }
}
