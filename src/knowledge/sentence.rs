//! Cardinality constraints over board cells

use super::error::{InferenceError, InferenceResult};
use crate::board::Cell;
use std::collections::BTreeSet;
use std::fmt;

/// "Exactly `count` of these cells are mines."
///
/// Cells are kept in an ordered set so that equality, hashing and iteration
/// order are all independent of insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sentence {
    cells: BTreeSet<Cell>,
    count: usize,
}

impl Sentence {
    /// Build a sentence, rejecting a count larger than the number of cells
    pub fn new(cells: impl IntoIterator<Item = Cell>, count: usize) -> InferenceResult<Self> {
        let cells: BTreeSet<Cell> = cells.into_iter().collect();
        if count > cells.len() {
            return Err(InferenceError::contradiction(format!(
                "{} mines cannot fit in {} cells",
                count,
                cells.len()
            )));
        }
        Ok(Self { cells, count })
    }

    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.cells.contains(cell)
    }

    /// Cells known to be mines: all of them when every cell must be a mine
    pub fn known_mines(&self) -> BTreeSet<Cell> {
        if self.count == self.cells.len() {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// Cells known to be safe: all of them when the count is zero
    pub fn known_safe(&self) -> BTreeSet<Cell> {
        if self.count == 0 {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// Project out a cell known to be a mine. Returns whether the sentence changed.
    pub fn remove_as_mine(&mut self, cell: &Cell) -> InferenceResult<bool> {
        if !self.cells.contains(cell) {
            return Ok(false);
        }
        if self.count == 0 {
            return Err(InferenceError::contradiction(format!(
                "{} is a mine but {} says it has no mines",
                cell, self
            )));
        }
        self.cells.remove(cell);
        self.count -= 1;
        Ok(true)
    }

    /// Project out a cell known to be safe. Returns whether the sentence changed.
    pub fn remove_as_safe(&mut self, cell: &Cell) -> InferenceResult<bool> {
        if !self.cells.contains(cell) {
            return Ok(false);
        }
        if self.count == self.cells.len() {
            return Err(InferenceError::contradiction(format!(
                "{} is safe but {} needs every cell to be a mine",
                cell, self
            )));
        }
        self.cells.remove(cell);
        Ok(true)
    }

    /// Strict subset test on the cell sets
    pub fn is_strict_subset_of(&self, other: &Sentence) -> bool {
        self.cells.len() < other.cells.len() && self.cells.is_subset(&other.cells)
    }

    /// Subset resolution: if either sentence's cells are a strict subset of
    /// the other's, the cells only in the larger one hold the difference in
    /// counts. Returns `None` when neither is a strict subset.
    pub fn resolve(&self, other: &Sentence) -> InferenceResult<Option<Sentence>> {
        let (subset, superset) = if self.is_strict_subset_of(other) {
            (self, other)
        } else if other.is_strict_subset_of(self) {
            (other, self)
        } else {
            return Ok(None);
        };

        let count = superset.count.checked_sub(subset.count).ok_or_else(|| {
            InferenceError::contradiction(format!(
                "{} requires more mines than its superset {}",
                subset, superset
            ))
        })?;

        let cells = superset.cells.difference(&subset.cells).copied();
        Sentence::new(cells, count).map(Some)
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", cell)?;
        }
        write!(f, "}} = {}", self.count)
    }
}
