//! A single game between a human (Black) and the engine (White).
//!
//! [`GameSession`] owns the board, side to move, capture tallies, the set
//! of positions seen for superko, undo snapshots and the dead-stone mask.
//! Every mutating action pushes a snapshot first, and no action leaves
//! the state half-updated: rejected actions change nothing.
//!
//! The AI turn can run synchronously through [`GameSession::ai_take_turn`]
//! or be split in two: take a [`SearchRequest`], run it elsewhere, and hand
//! the resulting [`PendingMove`] back to [`GameSession::apply_ai_move`].
//! Any mutation in between makes the pending result stale.

use std::collections::VecDeque;

use fastrand::Rng;
use thiserror::Error;
use tracing::{info, warn};

use crate::board::{Board, Color, Move, Point, in_bounds};
use crate::constants::MAX_UNDO;
use crate::rules::{AtariInfo, MoveError, PositionKey, PositionSet, compute_atari_info, is_legal_move};
use crate::scoring::{Captures, DeadMask, FinalScore, calc_final_score, toggle_dead_group_at};
use crate::search::{SearchConfig, choose_move};

/// The human always plays Black.
pub const HUMAN: Color = Color::Black;
/// The engine always plays White.
pub const ENGINE: Color = Color::White;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Playing,
    /// Game over; dead stones may be marked and the game scored.
    Scoring,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EndReason {
    TwoPasses,
    Resignation(Color),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LastMove {
    pub color: Color,
    pub mv: Move,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("the game is over")]
    GameOver,
    #[error("dead stones can only be marked after the game ends")]
    NotInScoring,
    #[error("it is not {0}'s turn")]
    NotYourTurn(Color),
    #[error(transparent)]
    Illegal(#[from] MoveError),
    #[error("search result is stale")]
    StaleSearch,
}

/// Everything undo needs to restore.
#[derive(Clone, Debug, PartialEq, Eq)]
struct GameState {
    board: Board,
    to_play: Color,
    phase: Phase,
    end: Option<EndReason>,
    last_move: Option<LastMove>,
    consecutive_passes: u32,
    captures: Captures,
    seen: PositionSet,
    dead: DeadMask,
}

impl GameState {
    fn new() -> Self {
        let board = Board::new();
        let mut seen = PositionSet::new();
        seen.insert(PositionKey::new(&board, Color::Black));
        Self {
            board,
            to_play: Color::Black,
            phase: Phase::Playing,
            end: None,
            last_move: None,
            consecutive_passes: 0,
            captures: Captures::default(),
            seen,
            dead: DeadMask::new(),
        }
    }
}

/// Result of a successful placement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacementReport {
    pub captured: Vec<Point>,
    /// Groups left in atari after the move, for advisory warnings.
    pub atari: AtariInfo,
}

/// What the engine did on its turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AiTurn {
    Placed { point: Point, report: PlacementReport },
    Passed,
    /// The chosen move failed the final legality check and was replaced by a pass.
    FallbackPass(MoveError),
}

/// A detached copy of what the search needs.
#[derive(Clone, Debug)]
pub struct SearchRequest {
    generation: u64,
    board: Board,
    color: Color,
    seen: PositionSet,
    config: SearchConfig,
}

impl SearchRequest {
    pub fn run(&self, rng: &mut Rng) -> PendingMove {
        PendingMove {
            generation: self.generation,
            mv: choose_move(&self.board, self.color, &self.seen, &self.config, rng),
        }
    }
}

/// A search result waiting to be applied.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PendingMove {
    generation: u64,
    pub mv: Move,
}

pub struct GameSession {
    state: GameState,
    history: VecDeque<GameState>,
    generation: u64,
    config: SearchConfig,
    rng: Rng,
}

impl GameSession {
    pub fn new(config: SearchConfig) -> Self {
        Self::with_rng(config, Rng::new())
    }

    pub fn with_seed(config: SearchConfig, seed: u64) -> Self {
        Self::with_rng(config, Rng::with_seed(seed))
    }

    pub fn with_rng(config: SearchConfig, rng: Rng) -> Self {
        Self {
            state: GameState::new(),
            history: VecDeque::new(),
            generation: 0,
            config,
            rng,
        }
    }

    /// Reset to an empty board with Black to move.
    pub fn new_game(&mut self) {
        self.state = GameState::new();
        self.history.clear();
        self.generation += 1;
        info!("new game");
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn to_play(&self) -> Color {
        self.state.to_play
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.state.end
    }

    pub fn last_move(&self) -> Option<LastMove> {
        self.state.last_move
    }

    pub fn consecutive_passes(&self) -> u32 {
        self.state.consecutive_passes
    }

    pub fn captures(&self) -> Captures {
        self.state.captures
    }

    pub fn seen_positions(&self) -> &PositionSet {
        &self.state.seen
    }

    pub fn dead_mask(&self) -> &DeadMask {
        &self.state.dead
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Bumped by every mutation; used to detect stale search results.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SearchConfig {
        &mut self.config
    }

    pub fn atari_info(&self) -> AtariInfo {
        compute_atari_info(&self.state.board)
    }

    fn snapshot_push(&mut self) {
        self.history.push_back(self.state.clone());
        if self.history.len() > MAX_UNDO {
            self.history.pop_front();
        }
        self.generation += 1;
    }

    fn ensure_turn(&self, color: Color) -> Result<(), SessionError> {
        if self.state.phase != Phase::Playing {
            return Err(SessionError::GameOver);
        }
        if self.state.to_play != color {
            return Err(SessionError::NotYourTurn(color));
        }
        Ok(())
    }

    /// Validate and play a stone for `color`. Nothing changes on failure.
    fn place(&mut self, p: Point, color: Color) -> Result<PlacementReport, MoveError> {
        let placement = is_legal_move(&self.state.board, p, color, &self.state.seen)?;

        self.snapshot_push();
        let state = &mut self.state;
        state.board = placement.board;
        state.captures.add(color, placement.captured_count() as u32);
        state.last_move = Some(LastMove {
            color,
            mv: Move::Place(p),
        });
        state.consecutive_passes = 0;
        state.to_play = color.opponent();
        state.seen.insert(placement.key);

        Ok(PlacementReport {
            captured: placement.captured,
            atari: compute_atari_info(&state.board),
        })
    }

    fn pass_for(&mut self, color: Color) {
        self.snapshot_push();
        let state = &mut self.state;
        state.last_move = Some(LastMove {
            color,
            mv: Move::Pass,
        });
        state.consecutive_passes += 1;
        state.to_play = color.opponent();
        state.seen.insert(PositionKey::new(&state.board, state.to_play));

        if state.consecutive_passes >= 2 {
            state.phase = Phase::Scoring;
            state.end = Some(EndReason::TwoPasses);
            info!("both sides passed, game over");
        }
    }

    /// Play the human's stone at `(x, y)`.
    ///
    /// Off-board and occupied points are rejected with their rule reason in
    /// any phase and on either side's turn.
    pub fn attempt_placement(&mut self, x: usize, y: usize) -> Result<PlacementReport, SessionError> {
        if !in_bounds((x, y)) {
            return Err(MoveError::OutOfBounds.into());
        }
        if !self.state.board.is_empty_at((x, y)) {
            return Err(MoveError::Occupied.into());
        }
        self.ensure_turn(HUMAN)?;
        Ok(self.place((x, y), HUMAN)?)
    }

    /// The human passes.
    pub fn pass(&mut self) -> Result<(), SessionError> {
        self.ensure_turn(HUMAN)?;
        self.pass_for(HUMAN);
        Ok(())
    }

    /// The human resigns; allowed on either side's turn.
    pub fn resign(&mut self) -> Result<(), SessionError> {
        if self.state.phase != Phase::Playing {
            return Err(SessionError::GameOver);
        }
        self.snapshot_push();
        self.state.phase = Phase::Scoring;
        self.state.end = Some(EndReason::Resignation(HUMAN));
        info!("{HUMAN} resigned");
        Ok(())
    }

    /// Restore the previous snapshot. Returns `false` if there is none.
    pub fn undo(&mut self) -> bool {
        match self.history.pop_back() {
            Some(prev) => {
                self.state = prev;
                self.generation += 1;
                true
            }
            None => false,
        }
    }

    /// Undo, and undo once more if that leaves the engine to move, so the
    /// human gets the turn back.
    pub fn undo_to_human(&mut self) -> bool {
        if !self.undo() {
            return false;
        }
        if self.state.phase == Phase::Playing && self.state.to_play == ENGINE && !self.history.is_empty() {
            self.undo();
        }
        true
    }

    /// Toggle the dead status of the group at `(x, y)`.
    ///
    /// Returns `Ok(false)` without touching anything on an empty point.
    pub fn toggle_dead_stone_at(&mut self, x: usize, y: usize) -> Result<bool, SessionError> {
        if self.state.phase != Phase::Scoring {
            return Err(SessionError::NotInScoring);
        }
        if self.state.board.get((x, y)).is_none() {
            return Ok(false);
        }
        let dead = toggle_dead_group_at(&self.state.board, (x, y), &self.state.dead);
        self.snapshot_push();
        self.state.dead = dead;
        Ok(true)
    }

    pub fn compute_final_score(&self, komi: f64) -> FinalScore {
        calc_final_score(&self.state.board, &self.state.dead, self.state.captures, komi)
    }

    /// Snapshot the inputs of an engine search.
    pub fn search_request(&self) -> Result<SearchRequest, SessionError> {
        self.ensure_turn(ENGINE)?;
        Ok(SearchRequest {
            generation: self.generation,
            board: self.state.board,
            color: ENGINE,
            seen: self.state.seen.clone(),
            config: self.config,
        })
    }

    /// Apply a search result computed from [`GameSession::search_request`].
    pub fn apply_ai_move(&mut self, pending: PendingMove) -> Result<AiTurn, SessionError> {
        if pending.generation != self.generation {
            return Err(SessionError::StaleSearch);
        }
        self.ensure_turn(ENGINE)?;

        match pending.mv {
            Move::Pass => {
                self.pass_for(ENGINE);
                Ok(AiTurn::Passed)
            }
            Move::Place(point) => match self.place(point, ENGINE) {
                Ok(report) => Ok(AiTurn::Placed { point, report }),
                Err(err) => {
                    warn!(%err, mv = %pending.mv, "engine move failed re-validation, passing");
                    self.pass_for(ENGINE);
                    Ok(AiTurn::FallbackPass(err))
                }
            },
        }
    }

    /// Search and play the engine's move.
    pub fn ai_take_turn(&mut self) -> Result<AiTurn, SessionError> {
        let request = self.search_request()?;
        let pending = request.run(&mut self.rng);
        self.apply_ai_move(pending)
    }

    /// Apply a move chosen outside this session, bypassing the stale check.
    #[cfg(test)]
    pub(crate) fn force_ai_move(&mut self, mv: Move) -> Result<AiTurn, SessionError> {
        let pending = PendingMove {
            generation: self.generation,
            mv,
        };
        self.apply_ai_move(pending)
    }
}
