//! Connected groups and liberties.
//!
//! All functions here are pure reads of a [`Board`]. Flooding a group and
//! counting its liberties are both linear in the size of the group; visited
//! points are tracked in a bitset of a few words rather than a cell array.

use crate::board::{Board, Color, Point, index, neighbors, points};
use crate::constants::BOARD_CELLS;

const MARK_WORDS: usize = BOARD_CELLS.div_ceil(64);

/// Visited set over board points.
#[derive(Copy, Clone, Default)]
struct Marks([u64; MARK_WORDS]);

impl Marks {
    /// Mark `p`; returns `false` if it was already marked.
    fn insert(&mut self, p: Point) -> bool {
        let i = index(p);
        let bit = 1u64 << (i % 64);
        let fresh = (self.0[i / 64] & bit) == 0;
        self.0[i / 64] |= bit;
        fresh
    }
}

/// A maximal set of orthogonally connected stones of one color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub color: Color,
    pub stones: Vec<Point>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.stones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stones.is_empty()
    }

    pub fn contains(&self, p: Point) -> bool {
        self.stones.contains(&p)
    }
}

/// Collect the group containing `start`.
///
/// Returns `None` if `start` is empty or off the board.
pub fn flood_group(board: &Board, start: Point) -> Option<Group> {
    let color = board.get(start)?;
    let mut stack = vec![start];
    let mut visited = Marks::default();
    visited.insert(start);
    let mut stones = Vec::new();

    while let Some(pt) = stack.pop() {
        stones.push(pt);
        for n in neighbors(pt) {
            if board.get(n) == Some(color) && visited.insert(n) {
                stack.push(n);
            }
        }
    }
    Some(Group { color, stones })
}

/// Count the distinct empty points adjacent to any stone of the group.
pub fn count_liberties(board: &Board, group: &Group) -> usize {
    let mut seen = Marks::default();
    let mut libs = 0;
    for &pt in &group.stones {
        for n in neighbors(pt) {
            if board.get(n).is_none() && seen.insert(n) {
                libs += 1;
            }
        }
    }
    libs
}

/// Liberties of the group at `p`, or 0 if `p` is empty.
pub fn liberties_at(board: &Board, p: Point) -> usize {
    flood_group(board, p).map_or(0, |g| count_liberties(board, &g))
}

/// Every group of `color` on the board with its liberty count, in scan order.
pub fn groups_with_liberties(board: &Board, color: Color) -> Vec<(Group, usize)> {
    let mut seen = Marks::default();
    let mut out = Vec::new();
    for p in points() {
        if board.get(p) != Some(color) || !seen.insert(p) {
            continue;
        }
        if let Some(group) = flood_group(board, p) {
            for &s in &group.stones {
                seen.insert(s);
            }
            let libs = count_liberties(board, &group);
            out.push((group, libs));
        }
    }
    out
}
