//! Mine layout and neighbour counts (the board oracle)

use super::Cell;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// A Minesweeper board with a fixed mine layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub height: usize,
    pub width: usize,
    /// Row-major mine flags
    pub cells: Vec<bool>,
}

impl Board {
    /// Create a board with no mines
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            cells: vec![false; width * height],
        }
    }

    /// Create a board from a 2D mine mask
    pub fn from_cells(cells: Vec<Vec<bool>>) -> Result<Self> {
        if cells.is_empty() {
            anyhow::bail!("Board cannot be empty");
        }

        let height = cells.len();
        let width = cells[0].len();

        if width == 0 {
            anyhow::bail!("Board width cannot be zero");
        }

        for (i, row) in cells.iter().enumerate() {
            if row.len() != width {
                anyhow::bail!("Row {} has length {}, expected {}", i, row.len(), width);
            }
        }

        Ok(Self {
            height,
            width,
            cells: cells.into_iter().flatten().collect(),
        })
    }

    /// Create a board from explicit mine positions
    pub fn with_mines(height: usize, width: usize, mines: &[Cell]) -> Result<Self> {
        let mut board = Self::new(height, width);
        for &mine in mines {
            board.set_mine(mine, true)?;
        }
        Ok(board)
    }

    #[inline]
    pub fn index(&self, cell: Cell) -> usize {
        cell.row * self.width + cell.col
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.in_bounds(self.height, self.width)
    }

    /// Whether the cell holds a mine. Out of bounds cells are never mines.
    pub fn is_mine(&self, cell: Cell) -> bool {
        self.contains(cell) && self.cells[self.index(cell)]
    }

    pub fn set_mine(&mut self, cell: Cell, mine: bool) -> Result<()> {
        if !self.contains(cell) {
            anyhow::bail!("Cell {} out of bounds for {}x{} board", cell, self.height, self.width);
        }
        let idx = self.index(cell);
        self.cells[idx] = mine;
        Ok(())
    }

    /// Number of mines among the up-to-8 neighbours of `cell`
    pub fn nearby_mines(&self, cell: Cell) -> usize {
        cell.neighbors(self.height, self.width)
            .filter(|&n| self.is_mine(n))
            .count()
    }

    pub fn mine_count(&self) -> usize {
        self.cells.iter().filter(|&&mine| mine).count()
    }

    pub fn safe_count(&self) -> usize {
        self.cells.len() - self.mine_count()
    }

    /// All mine positions in row-major order
    pub fn mines(&self) -> Vec<Cell> {
        self.all_cells().filter(|&cell| self.is_mine(cell)).collect()
    }

    /// Every cell on the board in row-major order
    pub fn all_cells(&self) -> impl Iterator<Item = Cell> {
        let width = self.width;
        (0..self.height).flat_map(move |row| (0..width).map(move |col| Cell::new(row, col)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_creation() {
        let board = Board::new(3, 4);
        assert_eq!(board.height, 3);
        assert_eq!(board.width, 4);
        assert_eq!(board.cells.len(), 12);
        assert_eq!(board.mine_count(), 0);
    }

    #[test]
    fn test_board_from_cells() {
        let cells = vec![
            vec![true, false, false],
            vec![false, false, true],
        ];
        let board = Board::from_cells(cells).unwrap();
        assert_eq!(board.height, 2);
        assert_eq!(board.width, 3);
        assert_eq!(board.mines(), vec![Cell::new(0, 0), Cell::new(1, 2)]);
        assert_eq!(board.safe_count(), 4);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let cells = vec![vec![true, false], vec![false]];
        assert!(Board::from_cells(cells).is_err());
        assert!(Board::from_cells(vec![]).is_err());
    }

    #[test]
    fn test_nearby_mines() {
        let board = Board::with_mines(3, 3, &[Cell::new(0, 0), Cell::new(2, 2)]).unwrap();
        assert_eq!(board.nearby_mines(Cell::new(1, 1)), 2);
        assert_eq!(board.nearby_mines(Cell::new(0, 1)), 1);
        assert_eq!(board.nearby_mines(Cell::new(0, 2)), 0);
        // A mine does not count itself
        assert_eq!(board.nearby_mines(Cell::new(0, 0)), 0);
    }

    #[test]
    fn test_set_mine_out_of_bounds() {
        let mut board = Board::new(2, 2);
        assert!(board.set_mine(Cell::new(2, 0), true).is_err());
        assert!(!board.is_mine(Cell::new(5, 5)));
    }
}
