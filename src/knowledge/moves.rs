//! Move selection on top of the knowledge base

use super::base::KnowledgeBase;
use crate::board::Cell;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a move was chosen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MoveKind {
    /// Proven safe
    Safe,
    /// Taken from the sentence with the lowest mine ratio
    Estimated { risk: f64 },
    /// Uniform pick among all eligible cells
    Random,
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveKind::Safe => write!(f, "safe"),
            MoveKind::Estimated { risk } => write!(f, "estimated (risk {:.2})", risk),
            MoveKind::Random => write!(f, "random"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveChoice {
    pub cell: Cell,
    pub kind: MoveKind,
}

impl KnowledgeBase {
    /// Lowest row-major cell proven safe and not yet played
    pub fn safe_move(&self) -> Option<Cell> {
        self.confirmed_safe().difference(self.moves_made()).next().copied()
    }

    fn is_eligible(&self, cell: &Cell) -> bool {
        !self.moves_made().contains(cell) && !self.confirmed_mines().contains(cell)
    }

    /// The sentence with the lowest mine ratio below 1.0 that still has an
    /// eligible cell, with that cell and the ratio. Earlier sentences win ties.
    fn least_risky_candidate(&self) -> Option<(Cell, f64)> {
        let mut best_risk = 1.0;
        let mut chosen = None;

        for sentence in self.sentences() {
            let risk = sentence.count() as f64 / sentence.len() as f64;
            if risk >= best_risk {
                continue;
            }
            if let Some(&cell) = sentence.cells().iter().find(|c| self.is_eligible(c)) {
                best_risk = risk;
                chosen = Some((cell, risk));
            }
        }

        chosen
    }

    /// A move avoiding known mines, preferring the cell with the lowest
    /// estimated risk and otherwise a uniform pick among every eligible
    /// cell. `None` once no cell is left to play.
    pub fn riskiest_avoiding_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Cell> {
        self.guess(rng).map(|choice| choice.cell)
    }

    fn guess<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<MoveChoice> {
        if let Some((cell, risk)) = self.least_risky_candidate() {
            return Some(MoveChoice {
                cell,
                kind: MoveKind::Estimated { risk },
            });
        }

        let eligible: Vec<Cell> = self.all_cells().filter(|c| self.is_eligible(c)).collect();
        eligible.choose(rng).map(|&cell| MoveChoice {
            cell,
            kind: MoveKind::Random,
        })
    }

    /// A proven-safe move when there is one, otherwise a guess
    pub fn next_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<MoveChoice> {
        match self.safe_move() {
            Some(cell) => Some(MoveChoice {
                cell,
                kind: MoveKind::Safe,
            }),
            None => self.guess(rng),
        }
    }
}
