//! Move selection for the computer player.
//!
//! Two levels are available:
//! - **Basic**: score every legal move (pass included) with a one-ply
//!   heuristic and play the best one.
//! - **Advanced**: keep the best few heuristic candidates, run random
//!   rollouts from each, and blend the rollout average with the heuristic.
//!
//! All randomness comes from the caller's [`Rng`], so a seeded generator
//! gives reproducible choices.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use fastrand::Rng;
use thiserror::Error;
use tracing::debug;

use crate::board::{Board, Color, Move, Point, neighbors, points};
use crate::constants::{
    ATARI_BONUS, CAPTURE_WEIGHT, CENTER_WEIGHT, FRIENDLY_ADJACENCY_BONUS, HEURISTIC_BLEND,
    N, N_ROLLOUTS, PASS_SCORE, PROB_ROLLOUT_PLAY, ROLLOUT_PLIES, SELF_ATARI_PENALTY,
    TOP_CANDIDATES, TWO_LIBERTY_PENALTY,
};
use crate::group::{Group, count_liberties, flood_group, liberties_at};
use crate::playout::{RolloutParams, random_playout};
use crate::rules::{Placement, PositionSet, is_legal_move};

/// Search strength.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Level {
    Basic,
    #[default]
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown level '{0}' (expected basic or advanced)")]
pub struct UnknownLevel(String);

impl FromStr for Level {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Ok(Level::Basic),
            "advanced" => Ok(Level::Advanced),
            _ => Err(UnknownLevel(s.to_string())),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Basic => write!(f, "basic"),
            Level::Advanced => write!(f, "advanced"),
        }
    }
}

/// Search configuration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SearchConfig {
    pub level: Level,
    /// Candidates kept after heuristic ranking.
    pub candidates: usize,
    /// Rollouts per candidate.
    pub rollouts: usize,
    pub rollout: RolloutParams,
    /// Weight of the heuristic in the blended value.
    pub blend: f64,
    /// Stop evaluating further candidates once this much time has passed.
    pub time_budget: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            level: Level::Advanced,
            candidates: TOP_CANDIDATES,
            rollouts: N_ROLLOUTS,
            rollout: RolloutParams {
                max_plies: ROLLOUT_PLIES,
                play_probability: PROB_ROLLOUT_PLAY,
            },
            blend: HEURISTIC_BLEND,
            time_budget: None,
        }
    }
}

/// Every legal placement for `color` in board order, followed by a pass.
pub fn legal_moves(board: &Board, color: Color, seen: &PositionSet) -> Vec<Move> {
    points()
        .filter(|&p| is_legal_move(board, p, color, seen).is_ok())
        .map(Move::Place)
        .chain(std::iter::once(Move::Pass))
        .collect()
}

/// One-ply heuristic value of a move. Illegal placements score `-inf`.
pub fn heuristic_evaluate_move(board: &Board, color: Color, mv: Move, seen: &PositionSet) -> f64 {
    match mv {
        Move::Pass => PASS_SCORE,
        Move::Place(p) => match is_legal_move(board, p, color, seen) {
            Ok(placement) => evaluate_placement(board, color, p, &placement),
            Err(_) => f64::NEG_INFINITY,
        },
    }
}

fn evaluate_placement(board: &Board, color: Color, p: Point, placement: &Placement) -> f64 {
    let after = &placement.board;
    let mut score = CAPTURE_WEIGHT * placement.captured_count() as f64;

    // Linear decay with Manhattan distance from the center
    let center = (N - 1) as f64 / 2.0;
    let dist = (p.0 as f64 - center).abs() + (p.1 as f64 - center).abs();
    score += CENTER_WEIGHT * (1.0 - dist / (N - 1) as f64);

    match liberties_at(after, p) {
        1 => score -= SELF_ATARI_PENALTY,
        2 => score -= TWO_LIBERTY_PENALTY,
        _ => {}
    }

    let opp = color.opponent();
    let mut touched: Vec<Group> = Vec::new();
    for n in neighbors(p) {
        if after.get(n) != Some(opp) || touched.iter().any(|g| g.contains(n)) {
            continue;
        }
        if let Some(group) = flood_group(after, n) {
            if count_liberties(after, &group) == 1 {
                score += ATARI_BONUS;
            }
            touched.push(group);
        }
    }

    let friends = neighbors(p).filter(|&n| board.get(n) == Some(color)).count();
    score + FRIENDLY_ADJACENCY_BONUS * friends as f64
}

/// Choose a move for `color` according to `config.level`.
pub fn choose_move(
    board: &Board,
    color: Color,
    seen: &PositionSet,
    config: &SearchConfig,
    rng: &mut Rng,
) -> Move {
    match config.level {
        Level::Basic => choose_basic(board, color, seen),
        Level::Advanced => choose_advanced(board, color, seen, config, rng),
    }
}

/// Best heuristic move; the first one found wins ties.
fn choose_basic(board: &Board, color: Color, seen: &PositionSet) -> Move {
    let mut best = Move::Pass;
    let mut best_score = f64::NEG_INFINITY;
    for mv in legal_moves(board, color, seen) {
        let s = heuristic_evaluate_move(board, color, mv, seen);
        if s > best_score {
            best_score = s;
            best = mv;
        }
    }
    best
}

fn choose_advanced(
    board: &Board,
    color: Color,
    seen: &PositionSet,
    config: &SearchConfig,
    rng: &mut Rng,
) -> Move {
    let mut ranked: Vec<(Point, f64, Placement)> = points()
        .filter_map(|p| {
            let placement = is_legal_move(board, p, color, seen).ok()?;
            let h = evaluate_placement(board, color, p, &placement);
            Some((p, h, placement))
        })
        .collect();
    // Stable sort keeps board order among equal scores
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(config.candidates);

    if ranked.is_empty() {
        return Move::Pass;
    }

    let started = Instant::now();
    let opp = color.opponent();
    let sign = match color {
        Color::Black => 1.0,
        Color::White => -1.0,
    };
    let mut best = Move::Place(ranked[0].0);
    let mut best_value = f64::NEG_INFINITY;

    for (p, h, placement) in &ranked {
        let mut local = seen.clone();
        local.insert(placement.key);

        let mut sum = 0i64;
        for _ in 0..config.rollouts {
            sum += random_playout(&placement.board, opp, &local, config.rollout, rng) as i64;
        }
        let mean = if config.rollouts == 0 {
            0.0
        } else {
            sum as f64 / config.rollouts as f64
        };
        let value = sign * mean + config.blend * h;
        debug!(
            candidate = %Move::Place(*p),
            heuristic = h,
            rollout_mean = mean,
            value,
            "evaluated candidate"
        );

        if value > best_value {
            best_value = value;
            best = Move::Place(*p);
        }

        if config.time_budget.is_some_and(|budget| started.elapsed() >= budget) {
            debug!(elapsed = ?started.elapsed(), "search time budget exhausted");
            break;
        }
    }
    best
}
