//! Board value, stone colors and coordinates.
//!
//! A [`Board`] is a small `Copy` value: every validated move produces a new
//! board rather than mutating the old one, so snapshots are plain copies.
//! Points are `(x, y)` with `(0, 0)` in the top-left corner.

use std::fmt;

use crate::constants::{BOARD_CELLS, N};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Parse a GTP color argument (`b`, `black`, `w`, `white`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "b" | "black" => Some(Color::Black),
            "w" | "white" => Some(Color::White),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Color::Black => 'B',
            Color::White => 'W',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "Black"),
            Color::White => write!(f, "White"),
        }
    }
}

pub type Point = (usize, usize);

/// A move is either a stone placement or a pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    Place(Point),
    Pass,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&str_move(*self))
    }
}

#[inline]
pub fn in_bounds((x, y): Point) -> bool {
    x < N && y < N
}

/// Row-major index of an on-board point.
#[inline]
pub fn index((x, y): Point) -> usize {
    y * N + x
}

/// The orthogonal neighbors of a point that lie on the board.
pub fn neighbors((x, y): Point) -> impl Iterator<Item = Point> {
    [
        (x.wrapping_sub(1), y),
        (x + 1, y),
        (x, y.wrapping_sub(1)),
        (x, y + 1),
    ]
    .into_iter()
    .filter(|&p| in_bounds(p))
}

/// Every point of the board, row by row from the top.
pub fn points() -> impl Iterator<Item = Point> {
    (0..N).flat_map(|y| (0..N).map(move |x| (x, y)))
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Board {
    cells: [Option<Color>; BOARD_CELLS],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_CELLS],
        }
    }

    /// Build a board from diagram rows: `X` black, `O` white, `.` empty.
    /// Whitespace inside a row is ignored. Returns `None` if the diagram is
    /// not exactly N rows of N cells.
    pub fn from_rows(rows: &[&str]) -> Option<Self> {
        if rows.len() != N {
            return None;
        }
        let mut board = Board::new();
        for (y, row) in rows.iter().enumerate() {
            let cells: Vec<char> = row.chars().filter(|c| !c.is_whitespace()).collect();
            if cells.len() != N {
                return None;
            }
            for (x, ch) in cells.into_iter().enumerate() {
                let stone = match ch {
                    'X' | 'x' | 'B' => Some(Color::Black),
                    'O' | 'o' | 'W' => Some(Color::White),
                    '.' | '+' => None,
                    _ => return None,
                };
                board.cells[index((x, y))] = stone;
            }
        }
        Some(board)
    }

    /// Contents of a point; off-board points read as empty.
    pub fn get(&self, p: Point) -> Option<Color> {
        if !in_bounds(p) {
            return None;
        }
        self.cells[index(p)]
    }

    /// Write a point. Only used on private copies while resolving a move.
    pub(crate) fn set(&mut self, p: Point, stone: Option<Color>) {
        self.cells[index(p)] = stone;
    }

    pub fn is_empty_at(&self, p: Point) -> bool {
        in_bounds(p) && self.cells[index(p)].is_none()
    }

    pub fn stone_count(&self, color: Color) -> usize {
        self.cells.iter().filter(|&&c| c == Some(color)).count()
    }

    pub fn total_stones(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn empty_count(&self) -> usize {
        BOARD_CELLS - self.total_stones()
    }

    pub(crate) fn cells(&self) -> &[Option<Color>; BOARD_CELLS] {
        &self.cells
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for x in 0..N {
            write!(f, " {}", column_letter(x))?;
        }
        writeln!(f)?;
        for y in 0..N {
            write!(f, "{:>2}", N - y)?;
            for x in 0..N {
                let ch = match self.get((x, y)) {
                    Some(Color::Black) => 'X',
                    Some(Color::White) => 'O',
                    None => '.',
                };
                write!(f, " {ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Column letter, skipping 'I' by Go convention.
fn column_letter(x: usize) -> char {
    let c = (b'A' + x as u8) as char;
    if c >= 'I' { (c as u8 + 1) as char } else { c }
}

/// Parse a vertex such as "D4" or "pass".
///
/// Rows count from 1 at the bottom edge, so "A1" is `(0, N - 1)`.
pub fn parse_move(s: &str) -> Option<Move> {
    if s.eq_ignore_ascii_case("pass") {
        return Some(Move::Pass);
    }
    let mut chars = s.chars();
    let col_char = chars.next()?.to_ascii_uppercase();
    if !col_char.is_ascii_uppercase() || col_char == 'I' {
        return None;
    }
    let mut col = (col_char as u8 - b'A') as usize;
    if col_char > 'I' {
        col -= 1;
    }
    let row: usize = chars.as_str().parse().ok()?;
    if col >= N || row == 0 || row > N {
        return None;
    }
    Some(Move::Place((col, N - row)))
}

/// Convert a move to a vertex string ("D4", "pass").
pub fn str_move(mv: Move) -> String {
    match mv {
        Move::Pass => "pass".into(),
        Move::Place((x, y)) => format!("{}{}", column_letter(x), N - y),
    }
}
