//! go9: a 9x9 Go rules engine with a Monte Carlo move search.
//!
//! The engine validates moves under capture, suicide and positional
//! superko rules, scores finished games by territory and prisoners with
//! hand-marked dead stones, and picks computer moves with a heuristic
//! optionally refined by random rollouts.
//!
//! ## Modules
//!
//! - [`constants`] - Board dimensions, weights and search parameters
//! - [`board`] - Board value, colors and coordinates
//! - [`group`] - Connected groups and liberties
//! - [`rules`] - Move validation, captures, superko
//! - [`scoring`] - Dead stones, territory and final score
//! - [`playout`] - Random rollouts for position evaluation
//! - [`search`] - Heuristic and Monte Carlo move selection
//! - [`session`] - A game between a human and the engine, with undo
//! - [`gtp`] - Go Text Protocol front-end
//!
//! ## Example
//!
//! ```
//! use go9::search::SearchConfig;
//! use go9::session::{AiTurn, GameSession};
//!
//! let mut game = GameSession::with_seed(SearchConfig::default(), 42);
//! game.attempt_placement(2, 2).unwrap();
//! match game.ai_take_turn().unwrap() {
//!     AiTurn::Placed { point, .. } => println!("engine played {point:?}"),
//!     _ => println!("engine passed"),
//! }
//! println!("{}", game.board());
//! ```

pub mod board;
pub mod constants;
pub mod group;
pub mod gtp;
pub mod playout;
pub mod rules;
pub mod scoring;
pub mod search;
pub mod session;
