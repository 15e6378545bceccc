//! The knowledge base: observations in, confirmed mines and safe cells out

use super::error::{InferenceError, InferenceResult};
use super::sentence::Sentence;
use crate::board::Cell;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, trace, warn};

/// What the knowledge base knows about a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKnowledge {
    /// Observed by the game loop
    Revealed,
    /// Proven to hold a mine
    Mine,
    /// Proven safe but not yet played
    Safe,
    Unknown,
}

/// Cumulative counters for one knowledge base
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceStatistics {
    pub observations: usize,
    pub propagation_rounds: usize,
    pub sentences_derived: usize,
    pub sentence_count: usize,
}

impl std::fmt::Display for InferenceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Inference Statistics:")?;
        writeln!(f, "  Observations: {}", self.observations)?;
        writeln!(f, "  Propagation rounds: {}", self.propagation_rounds)?;
        writeln!(f, "  Sentences derived: {}", self.sentences_derived)?;
        writeln!(f, "  Live sentences: {}", self.sentence_count)?;
        Ok(())
    }
}

/// Facts learned by one call to `propagate` or `observe`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropagationSummary {
    /// Rounds run, including the final round that found nothing new
    pub rounds: usize,
    pub new_mines: BTreeSet<Cell>,
    pub new_safe: BTreeSet<Cell>,
    pub sentences_derived: usize,
}

impl PropagationSummary {
    pub fn learned_anything(&self) -> bool {
        !self.new_mines.is_empty() || !self.new_safe.is_empty() || self.sentences_derived > 0
    }
}

/// Result of a single propagation round
#[derive(Debug, Default)]
struct RoundOutcome {
    new_mines: BTreeSet<Cell>,
    new_safe: BTreeSet<Cell>,
    derived: usize,
    changed: bool,
}

/// Cardinality constraints gathered over one game, kept closed under
/// subset resolution.
///
/// Invariants, re-established after every round:
/// - no cell is both a confirmed mine and confirmed safe
/// - no sentence mentions a confirmed cell
/// - no sentence is empty and no two sentences are equal
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    height: usize,
    width: usize,
    sentences: BTreeSet<Sentence>,
    moves_made: BTreeSet<Cell>,
    mines: BTreeSet<Cell>,
    safes: BTreeSet<Cell>,
    /// Set once a contradiction is found; inference stops for the rest of the game
    poisoned: Option<String>,
    stats: InferenceStatistics,
}

impl KnowledgeBase {
    /// Create an empty knowledge base for a `height` x `width` board
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            sentences: BTreeSet::new(),
            moves_made: BTreeSet::new(),
            mines: BTreeSet::new(),
            safes: BTreeSet::new(),
            poisoned: None,
            stats: InferenceStatistics::default(),
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn sentences(&self) -> &BTreeSet<Sentence> {
        &self.sentences
    }

    pub fn moves_made(&self) -> &BTreeSet<Cell> {
        &self.moves_made
    }

    pub fn confirmed_mines(&self) -> &BTreeSet<Cell> {
        &self.mines
    }

    pub fn confirmed_safe(&self) -> &BTreeSet<Cell> {
        &self.safes
    }

    pub fn is_consistent(&self) -> bool {
        self.poisoned.is_none()
    }

    pub fn statistics(&self) -> InferenceStatistics {
        InferenceStatistics {
            sentence_count: self.sentences.len(),
            ..self.stats.clone()
        }
    }

    /// Every cell of the grid in row-major order
    pub fn all_cells(&self) -> impl Iterator<Item = Cell> {
        let width = self.width;
        (0..self.height).flat_map(move |row| (0..width).map(move |col| Cell::new(row, col)))
    }

    pub fn knowledge_of(&self, cell: Cell) -> CellKnowledge {
        if self.moves_made.contains(&cell) {
            CellKnowledge::Revealed
        } else if self.mines.contains(&cell) {
            CellKnowledge::Mine
        } else if self.safes.contains(&cell) {
            CellKnowledge::Safe
        } else {
            CellKnowledge::Unknown
        }
    }

    /// Record that `cell` was revealed with `count` neighbouring mines, then
    /// propagate to a fixpoint.
    ///
    /// Out-of-bounds and repeated observations are rejected without touching
    /// the knowledge base. A contradiction leaves it poisoned.
    pub fn observe(&mut self, cell: Cell, count: usize) -> InferenceResult<PropagationSummary> {
        self.ensure_consistent()?;

        if !cell.in_bounds(self.height, self.width) {
            return Err(InferenceError::OutOfBounds {
                cell,
                height: self.height,
                width: self.width,
            });
        }
        if self.moves_made.contains(&cell) {
            return Err(InferenceError::DuplicateObservation(cell));
        }

        let result = self.apply_observation(cell, count);
        self.poison_on_error(result)
    }

    /// Run propagation rounds until nothing changes
    pub fn propagate(&mut self) -> InferenceResult<PropagationSummary> {
        self.ensure_consistent()?;
        let result = self.run_to_fixpoint();
        self.poison_on_error(result)
    }

    fn ensure_consistent(&self) -> InferenceResult<()> {
        match &self.poisoned {
            Some(reason) => Err(InferenceError::Inconsistent(reason.clone())),
            None => Ok(()),
        }
    }

    fn poison_on_error<T>(&mut self, result: InferenceResult<T>) -> InferenceResult<T> {
        if let Err(e) = &result {
            if e.is_fatal() && self.poisoned.is_none() {
                warn!(error = %e, "knowledge base poisoned");
                self.poisoned = Some(e.to_string());
            }
        }
        result
    }

    fn apply_observation(&mut self, cell: Cell, count: usize) -> InferenceResult<PropagationSummary> {
        if self.mines.contains(&cell) {
            return Err(InferenceError::contradiction(format!(
                "{} was revealed but is a confirmed mine",
                cell
            )));
        }

        self.moves_made.insert(cell);
        self.stats.observations += 1;

        let newly_safe = self.safes.insert(cell);
        if newly_safe {
            self.sentences = self.project(self.sentences.iter())?;
        }

        let mut unresolved = Vec::with_capacity(8);
        let mut known_mines = 0;
        for neighbor in cell.neighbors(self.height, self.width) {
            if self.moves_made.contains(&neighbor) || self.safes.contains(&neighbor) {
                continue;
            }
            if self.mines.contains(&neighbor) {
                known_mines += 1;
                continue;
            }
            unresolved.push(neighbor);
        }

        let remaining = count.checked_sub(known_mines).ok_or_else(|| {
            InferenceError::contradiction(format!(
                "{} reports {} mines but {} neighbours are confirmed mines",
                cell, count, known_mines
            ))
        })?;

        let sentence = Sentence::new(unresolved, remaining)?;
        debug!(%cell, count, %sentence, "observed");
        if !sentence.is_empty() {
            self.sentences.insert(sentence);
        }

        let mut summary = self.run_to_fixpoint()?;
        if newly_safe {
            summary.new_safe.insert(cell);
        }
        Ok(summary)
    }

    fn run_to_fixpoint(&mut self) -> InferenceResult<PropagationSummary> {
        let mut summary = PropagationSummary::default();

        loop {
            let outcome = self.run_round()?;
            summary.rounds += 1;
            summary.sentences_derived += outcome.derived;
            summary.new_mines.extend(outcome.new_mines);
            summary.new_safe.extend(outcome.new_safe);

            if !outcome.changed {
                break;
            }
        }

        self.stats.propagation_rounds += summary.rounds;
        self.stats.sentences_derived += summary.sentences_derived;

        debug!(
            rounds = summary.rounds,
            mines = summary.new_mines.len(),
            safe = summary.new_safe.len(),
            sentences = self.sentences.len(),
            "propagation reached fixpoint"
        );

        Ok(summary)
    }

    /// One round over a snapshot of the current sentences: extract direct
    /// facts, resolve every subset pair, then apply everything at once.
    fn run_round(&mut self) -> InferenceResult<RoundOutcome> {
        let snapshot: Vec<Sentence> = self.sentences.iter().cloned().collect();
        let mut outcome = RoundOutcome::default();

        for sentence in &snapshot {
            outcome.new_mines.extend(
                sentence.known_mines().into_iter().filter(|c| !self.mines.contains(c)),
            );
            outcome.new_safe.extend(
                sentence.known_safe().into_iter().filter(|c| !self.safes.contains(c)),
            );
        }

        let mut derived = BTreeSet::new();
        for (a, b) in snapshot.iter().tuple_combinations() {
            if let Some(sentence) = a.resolve(b)? {
                if !sentence.is_empty() && !self.sentences.contains(&sentence) {
                    trace!(%a, %b, %sentence, "subset resolution");
                    derived.insert(sentence);
                }
            }
        }
        outcome.derived = derived.len();

        if let Some(cell) = outcome.new_mines.intersection(&outcome.new_safe).next() {
            return Err(InferenceError::contradiction(format!(
                "{} is forced to be both a mine and safe",
                cell
            )));
        }

        self.mines.extend(outcome.new_mines.iter().copied());
        self.safes.extend(outcome.new_safe.iter().copied());

        if let Some(cell) = self.mines.intersection(&self.safes).next() {
            return Err(InferenceError::contradiction(format!(
                "{} is confirmed as both a mine and safe",
                cell
            )));
        }

        let next = self.project(self.sentences.iter().chain(derived.iter()))?;
        outcome.changed = !outcome.new_mines.is_empty()
            || !outcome.new_safe.is_empty()
            || next != self.sentences;
        self.sentences = next;

        Ok(outcome)
    }

    /// Remove every confirmed cell from the given sentences, dropping the
    /// ones left empty and collapsing duplicates.
    fn project<'a>(
        &self,
        sentences: impl Iterator<Item = &'a Sentence>,
    ) -> InferenceResult<BTreeSet<Sentence>> {
        let mut projected = BTreeSet::new();

        for sentence in sentences {
            let mut sentence = sentence.clone();

            let resolved_mines: Vec<Cell> = sentence.cells().intersection(&self.mines).copied().collect();
            for cell in &resolved_mines {
                sentence.remove_as_mine(cell)?;
            }
            let resolved_safe: Vec<Cell> = sentence.cells().intersection(&self.safes).copied().collect();
            for cell in &resolved_safe {
                sentence.remove_as_safe(cell)?;
            }

            if sentence.is_empty() {
                if sentence.count() != 0 {
                    return Err(InferenceError::contradiction(format!(
                        "no cells left to hold {} mines",
                        sentence.count()
                    )));
                }
                continue;
            }

            projected.insert(sentence);
        }

        Ok(projected)
    }
}
