//! go9: a 9x9 Go engine.
//!
//! ## Usage
//!
//! - `go9` - Show a demo
//! - `go9 gtp` - Start the GTP server for GUI integration
//! - `go9 demo` - Play a short scripted game against the engine
//! - `go9 selfplay --moves 60` - Let the engine play both sides

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fastrand::Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use go9::board::{Board, Color, Move, str_move};
use go9::constants::DEFAULT_KOMI;
use go9::gtp::GtpEngine;
use go9::rules::{PositionKey, PositionSet, is_legal_move};
use go9::scoring::{Captures, DeadMask, calc_final_score};
use go9::search::{Level, SearchConfig, choose_move};
use go9::session::{AiTurn, GameSession};

/// go9: a 9x9 Go engine with Monte Carlo move search
#[derive(Parser)]
#[command(name = "go9")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Search strength
    #[arg(long, global = true, value_enum, default_value_t = Level::Advanced)]
    level: Level,

    /// Komi added to White's score
    #[arg(long, global = true, default_value_t = DEFAULT_KOMI)]
    komi: f64,

    /// Rollouts per candidate move
    #[arg(long, global = true)]
    rollouts: Option<usize>,

    /// Seed for reproducible engine play
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Soft time budget per engine move, in milliseconds
    #[arg(long, global = true)]
    budget_ms: Option<u64>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "go9=info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the GTP (Go Text Protocol) server for use with GUI applications
    Gtp,
    /// Play a short scripted game against the engine
    Demo,
    /// Let the engine play both sides
    Selfplay {
        /// Maximum number of moves
        #[arg(long, default_value_t = 60)]
        moves: usize,
    },
}

impl Cli {
    fn search_config(&self) -> SearchConfig {
        let mut config = SearchConfig {
            level: self.level,
            time_budget: self.budget_ms.map(Duration::from_millis),
            ..SearchConfig::default()
        };
        if let Some(rollouts) = self.rollouts {
            config.rollouts = rollouts;
        }
        config
    }

    fn rng(&self) -> Rng {
        self.seed.map_or_else(Rng::new, Rng::with_seed)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so GTP output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = cli.search_config();
    let mut rng = cli.rng();
    match cli.command {
        Some(Commands::Gtp) => {
            let session = GameSession::with_rng(config, rng);
            GtpEngine::new(session).with_komi(cli.komi).run()
        }
        Some(Commands::Selfplay { moves }) => {
            run_selfplay(&config, cli.komi, moves, &mut rng);
            Ok(())
        }
        Some(Commands::Demo) | None => {
            run_demo(GameSession::with_rng(config, rng), cli.komi);
            Ok(())
        }
    }
}

fn run_demo(mut game: GameSession, komi: f64) {
    println!("go9: 9x9 Go engine\n");

    for (x, y) in [(2, 2), (6, 2), (2, 6), (6, 6), (4, 4)] {
        match game.attempt_placement(x, y) {
            Ok(report) => {
                println!(
                    "Black plays {} (captured {})",
                    str_move(Move::Place((x, y))),
                    report.captured.len()
                );
                if !report.atari.is_empty() {
                    for color in [Color::Black, Color::White] {
                        for group in report.atari.of(color) {
                            println!("  {color} group at {} is in atari", str_move(Move::Place(group.stones[0])));
                        }
                    }
                }
            }
            Err(e) => {
                println!("Black cannot play {}: {e}", str_move(Move::Place((x, y))));
                if game.pass().is_err() {
                    break;
                }
            }
        }
        match game.ai_take_turn() {
            Ok(AiTurn::Placed { point, .. }) => println!("White plays {}", str_move(Move::Place(point))),
            Ok(AiTurn::Passed) => println!("White passes"),
            Ok(AiTurn::FallbackPass(err)) => println!("White passes ({err})"),
            Err(e) => {
                println!("{e}");
                break;
            }
        }
    }

    let captures = game.captures();
    println!("\n{}", game.board());
    println!(
        "Captures: Black {}, White {}",
        captures.get(Color::Black),
        captures.get(Color::White)
    );
    println!("{}", game.compute_final_score(komi));
}

fn run_selfplay(config: &SearchConfig, komi: f64, max_moves: usize, rng: &mut Rng) {
    let mut board = Board::new();
    let mut seen = PositionSet::new();
    let mut captures = Captures::default();
    let mut color = Color::Black;
    let mut passes = 0;
    seen.insert(PositionKey::new(&board, color));

    for n in 0..max_moves {
        let mv = choose_move(&board, color, &seen, config, rng);
        let played = match mv {
            Move::Place(p) => match is_legal_move(&board, p, color, &seen) {
                Ok(placement) => {
                    captures.add(color, placement.captured_count() as u32);
                    board = placement.board;
                    seen.insert(placement.key);
                    passes = 0;
                    mv
                }
                Err(_) => Move::Pass,
            },
            Move::Pass => Move::Pass,
        };
        if played == Move::Pass {
            passes += 1;
            seen.insert(PositionKey::new(&board, color.opponent()));
        }
        println!("{:>3}. {} {}", n + 1, color.letter(), str_move(played));
        if passes >= 2 {
            info!("both sides passed after {} moves", n + 1);
            break;
        }
        color = color.opponent();
    }

    println!("\n{board}");
    println!("{}", calc_final_score(&board, &DeadMask::new(), captures, komi));
}
