//! Cell coordinates on a Minesweeper grid

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A (row, column) position on the board.
///
/// Ordering is row-major, which is what move selection uses to break ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Whether the cell lies on a `height` x `width` grid
    #[inline]
    pub fn in_bounds(&self, height: usize, width: usize) -> bool {
        self.row < height && self.col < width
    }

    /// In-bounds cells within one row and column of this one, excluding itself
    pub fn neighbors(self, height: usize, width: usize) -> impl Iterator<Item = Cell> {
        [-1isize, 0, 1].into_iter().flat_map(move |dr| {
            [-1isize, 0, 1].into_iter().filter_map(move |dc| {
                if dr == 0 && dc == 0 {
                    return None;
                }

                let r = self.row as isize + dr;
                let c = self.col as isize + dc;

                if r >= 0 && r < height as isize && c >= 0 && c < width as isize {
                    Some(Cell::new(r as usize, c as usize))
                } else {
                    None
                }
            })
        })
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Parses `row,col`
impl FromStr for Cell {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, col) = s
            .split_once(',')
            .ok_or_else(|| anyhow::anyhow!("Expected coordinates as row,col but got '{}'", s))?;

        let row = row.trim().parse::<usize>()
            .map_err(|e| anyhow::anyhow!("Invalid row '{}': {}", row.trim(), e))?;
        let col = col.trim().parse::<usize>()
            .map_err(|e| anyhow::anyhow!("Invalid column '{}': {}", col.trim(), e))?;

        Ok(Self::new(row, col))
    }
}
