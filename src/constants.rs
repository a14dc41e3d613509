//! Constants for board geometry, search parameters and heuristic weights.
//!
//! # Board Size Configuration
//!
//! The board size is controlled by Cargo features:
//! - `board9x9` (default): 9x9 board
//! - `board13x13`: 13x13 board
//!
//! ```sh
//! cargo build                                               # 9x9 (default)
//! cargo build --no-default-features --features board13x13  # 13x13
//! ```

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN).
#[cfg(feature = "board9x9")]
pub const N: usize = 9;

#[cfg(feature = "board13x13")]
pub const N: usize = 13;

#[cfg(all(feature = "board9x9", feature = "board13x13"))]
compile_error!("Cannot enable both 'board9x9' and 'board13x13' features at the same time");

#[cfg(not(any(feature = "board9x9", feature = "board13x13")))]
compile_error!("Must enable exactly one board size feature: 'board9x9' or 'board13x13'");

/// Number of intersections on the board.
pub const BOARD_CELLS: usize = N * N;

// =============================================================================
// Session Parameters
// =============================================================================

/// Default komi added to White's score.
pub const DEFAULT_KOMI: f64 = 6.5;

/// Maximum number of undo snapshots kept; the oldest is evicted first.
pub const MAX_UNDO: usize = 200;

// =============================================================================
// Search Parameters
// =============================================================================

/// Candidates kept after heuristic ranking in advanced search.
pub const TOP_CANDIDATES: usize = 10;

/// Rollouts per candidate in advanced search.
pub const N_ROLLOUTS: usize = 50;

/// Maximum plies per rollout.
pub const ROLLOUT_PLIES: usize = 18;

/// Probability that a rollout ply plays a stone rather than passing.
pub const PROB_ROLLOUT_PLAY: f64 = 0.92;

/// Weight of the heuristic score when blended with the rollout average.
pub const HEURISTIC_BLEND: f64 = 0.35;

// =============================================================================
// Heuristic Weights
// =============================================================================

/// Score of a pass: discouraged but never forbidden.
pub const PASS_SCORE: f64 = -0.5;

/// Bonus per captured stone.
pub const CAPTURE_WEIGHT: f64 = 4.0;

/// Maximum bonus for playing at the center; decays linearly to 0 in the corners.
pub const CENTER_WEIGHT: f64 = 1.2;

/// Penalty when the placed group is left with one liberty.
pub const SELF_ATARI_PENALTY: f64 = 3.5;

/// Penalty when the placed group is left with two liberties.
pub const TWO_LIBERTY_PENALTY: f64 = 0.6;

/// Bonus per adjacent opponent group put into atari.
pub const ATARI_BONUS: f64 = 2.0;

/// Bonus per adjacent friendly stone (measured before the move).
pub const FRIENDLY_ADJACENCY_BONUS: f64 = 0.35;
