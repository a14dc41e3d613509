//! Go Text Protocol (GTP) front-end.
//!
//! Drives a [`GameSession`] from text commands so the engine can be used
//! from a terminal or a GTP-speaking GUI. The human side is Black, so
//! `play` only accepts Black moves and `genmove` only White.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`, `list_commands`, `known_command`, `quit`
//! - `boardsize <size>` - only the compiled board size is accepted
//! - `clear_board` - start a new game
//! - `komi <value>` - komi used by `final_score`
//! - `play black <vertex|pass>` - the human's move
//! - `genmove white` - the engine's move
//! - `undo` - take back one action
//! - `showboard` - print the board
//! - `final_score` - score the game (dead stones removed)
//!
//! Engine extensions:
//!
//! - `level <basic|advanced>` - search strength
//! - `resign` - the human resigns
//! - `toggle_dead <vertex>` - mark or unmark a group as dead while scoring
//! - `atari` - list the groups currently in atari
//! - `captures <color>` - stones captured by that color so far

use std::io::{self, BufRead, Write};

use anyhow::Result;
use tracing::debug;

use crate::board::{Color, Move, parse_move, str_move};
use crate::constants::{DEFAULT_KOMI, N};
use crate::scoring::GameResult;
use crate::search::{Level, SearchConfig};
use crate::session::{AiTurn, ENGINE, GameSession, HUMAN};

const KNOWN_COMMANDS: &[&str] = &[
    "atari",
    "boardsize",
    "captures",
    "clear_board",
    "final_score",
    "genmove",
    "known_command",
    "komi",
    "level",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "resign",
    "showboard",
    "toggle_dead",
    "undo",
    "version",
];

pub struct GtpEngine {
    session: GameSession,
    komi: f64,
}

impl Default for GtpEngine {
    fn default() -> Self {
        Self::new(GameSession::new(SearchConfig::default()))
    }
}

impl GtpEngine {
    pub fn new(session: GameSession) -> Self {
        Self {
            session,
            komi: DEFAULT_KOMI,
        }
    }

    pub fn with_komi(mut self, komi: f64) -> Self {
        self.komi = komi;
        self
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Run the command loop on stdin/stdout.
    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.serve(stdin.lock(), stdout.lock())
    }

    /// Run the command loop until `quit` or end of input.
    pub fn serve<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();
            debug!(%command, ?args, "gtp command");

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            write!(output, "{prefix}{id_str} {message}\n\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let end = line
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(line.len());
        if end == 0 {
            return (None, line);
        }
        match line[..end].parse::<u32>() {
            Ok(id) => (Some(id), line[end..].trim()),
            Err(_) => (None, line),
        }
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "2".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => match args.first() {
                Some(cmd) => {
                    let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                    (true, known.to_string())
                }
                None => (false, "missing argument".to_string()),
            },

            "quit" => (true, String::new()),

            "boardsize" => match args.first().map(|a| a.parse::<usize>()) {
                Some(Ok(size)) if size == N => (true, String::new()),
                Some(Ok(size)) => (
                    false,
                    format!("unacceptable size, only {N} is supported (got {size})"),
                ),
                Some(Err(_)) => (false, "invalid size".to_string()),
                None => (false, "missing argument".to_string()),
            },

            "clear_board" => {
                self.session.new_game();
                (true, String::new())
            }

            "komi" => match args.first().map(|a| a.parse::<f64>()) {
                Some(Ok(komi)) => {
                    self.komi = komi;
                    (true, String::new())
                }
                Some(Err(_)) => (false, "invalid komi".to_string()),
                None => (false, "missing argument".to_string()),
            },

            "level" => match args.first().map(|a| a.parse::<Level>()) {
                Some(Ok(level)) => {
                    self.session.config_mut().level = level;
                    (true, String::new())
                }
                Some(Err(e)) => (false, e.to_string()),
                None => (true, self.session.config().level.to_string()),
            },

            "play" => {
                if args.len() < 2 {
                    return (false, "missing arguments".to_string());
                }
                match Color::parse(args[0]) {
                    Some(color) if color == HUMAN => {}
                    Some(_) => return (false, format!("only {HUMAN} is played through play")),
                    None => return (false, "invalid color".to_string()),
                }
                let result = match parse_move(args[1]) {
                    Some(Move::Pass) => self.session.pass(),
                    Some(Move::Place((x, y))) => self.session.attempt_placement(x, y).map(|_| ()),
                    None => return (false, "invalid vertex".to_string()),
                };
                match result {
                    Ok(()) => (true, String::new()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "genmove" => {
                match args.first().and_then(|a| Color::parse(a)) {
                    Some(color) if color == ENGINE => {}
                    Some(_) => return (false, format!("the engine only plays {ENGINE}")),
                    None => return (false, "missing or invalid color".to_string()),
                }
                match self.session.ai_take_turn() {
                    Ok(AiTurn::Placed { point, .. }) => (true, str_move(Move::Place(point))),
                    Ok(AiTurn::Passed | AiTurn::FallbackPass(_)) => (true, "pass".to_string()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "undo" => {
                if self.session.undo() {
                    (true, String::new())
                } else {
                    (false, "cannot undo".to_string())
                }
            }

            "resign" => match self.session.resign() {
                Ok(()) => (true, String::new()),
                Err(e) => (false, e.to_string()),
            },

            "toggle_dead" => {
                let Some(Move::Place((x, y))) = args.first().and_then(|a| parse_move(a)) else {
                    return (false, "invalid vertex".to_string());
                };
                match self.session.toggle_dead_stone_at(x, y) {
                    Ok(true) => (true, String::new()),
                    Ok(false) => (true, "empty point".to_string()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "atari" => {
                let info = self.session.atari_info();
                let vertices: Vec<String> = info
                    .of(Color::Black)
                    .iter()
                    .chain(info.of(Color::White))
                    .flat_map(|g| g.stones.iter().map(|&p| str_move(Move::Place(p))))
                    .collect();
                (true, vertices.join(" "))
            }

            "captures" => match args.first().and_then(|a| Color::parse(a)) {
                Some(color) => (true, self.session.captures().get(color).to_string()),
                None => (false, "missing or invalid color".to_string()),
            },

            "showboard" => (true, format!("\n{}", self.session.board())),

            "final_score" => {
                let score = self.session.compute_final_score(self.komi);
                let response = match score.result {
                    GameResult::Draw => "0".to_string(),
                    result => result.to_string(),
                };
                (true, response)
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }
}
