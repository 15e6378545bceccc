//! Game outcomes and per-game reports

use crate::board::{Board, Cell};
use crate::knowledge::{InferenceStatistics, KnowledgeBase, MoveKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// How a game ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum GameOutcome {
    Won,
    /// Revealed a mine
    Lost { cell: Cell },
    /// No eligible cell was left to play
    Exhausted,
    TurnLimit,
    /// The knowledge base found the clues inconsistent
    Contradiction { reason: String },
}

impl GameOutcome {
    pub fn is_win(&self) -> bool {
        matches!(self, GameOutcome::Won)
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::Won => write!(f, "won"),
            GameOutcome::Lost { cell } => write!(f, "lost on {}", cell),
            GameOutcome::Exhausted => write!(f, "no moves left"),
            GameOutcome::TurnLimit => write!(f, "turn limit reached"),
            GameOutcome::Contradiction { reason } => write!(f, "{}", reason),
        }
    }
}

/// Where a move came from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveSource {
    /// Configured opening move
    Opening,
    Engine(MoveKind),
}

impl fmt::Display for MoveSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveSource::Opening => write!(f, "opening"),
            MoveSource::Engine(kind) => write!(f, "{}", kind),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn: usize,
    pub cell: Cell,
    pub source: MoveSource,
    /// Clue revealed; `None` when the move hit a mine
    pub nearby_mines: Option<usize>,
    pub new_mines: usize,
    pub new_safe: usize,
}

/// Everything worth keeping from a finished game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameReport {
    pub name: String,
    pub height: usize,
    pub width: usize,
    pub mine_count: usize,
    pub outcome: GameOutcome,
    pub turns: Vec<TurnRecord>,
    pub revealed: usize,
    pub confirmed_mines: usize,
    pub confirmed_safe: usize,
    /// Cells the knowledge base proved to be mines
    pub flagged: Vec<Cell>,
    pub guesses: usize,
    pub statistics: InferenceStatistics,
    #[serde(skip)]
    pub duration: Duration,
}

impl GameReport {
    pub fn new(
        name: String,
        board: &Board,
        knowledge: &KnowledgeBase,
        outcome: GameOutcome,
        turns: Vec<TurnRecord>,
        duration: Duration,
    ) -> Self {
        let guesses = turns.iter()
            .filter(|t| matches!(t.source, MoveSource::Engine(MoveKind::Estimated { .. } | MoveKind::Random)))
            .count();

        Self {
            name,
            height: board.height,
            width: board.width,
            mine_count: board.mine_count(),
            outcome,
            revealed: knowledge.moves_made().len(),
            confirmed_mines: knowledge.confirmed_mines().len(),
            confirmed_safe: knowledge.confirmed_safe().len(),
            flagged: knowledge.confirmed_mines().iter().copied().collect(),
            guesses,
            statistics: knowledge.statistics(),
            turns,
            duration,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            name: self.name.clone(),
            outcome: self.outcome.clone(),
            turns: self.turns.len(),
            guesses: self.guesses,
            confirmed_mines: self.confirmed_mines,
            mine_count: self.mine_count,
            duration_ms: self.duration.as_millis() as u64,
        }
    }
}

/// One line per game, for batch tables and JSON summaries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSummary {
    pub name: String,
    pub outcome: GameOutcome,
    pub turns: usize,
    pub guesses: usize,
    pub confirmed_mines: usize,
    pub mine_count: usize,
    pub duration_ms: u64,
}

impl fmt::Display for GameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} after {} turns ({} guesses, {}/{} mines flagged)",
            self.name, self.outcome, self.turns, self.guesses, self.confirmed_mines, self.mine_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> GameReport {
        let board = Board::with_mines(1, 3, &[Cell::new(0, 1)]).unwrap();
        let mut knowledge = KnowledgeBase::new(1, 3);
        knowledge.observe(Cell::new(0, 0), 1).unwrap();

        let turns = vec![
            TurnRecord {
                turn: 1,
                cell: Cell::new(0, 0),
                source: MoveSource::Engine(MoveKind::Random),
                nearby_mines: Some(1),
                new_mines: 1,
                new_safe: 1,
            },
        ];

        GameReport::new("row".to_string(), &board, &knowledge, GameOutcome::Won, turns, Duration::from_millis(3))
    }

    #[test]
    fn test_report_counts() {
        let report = sample_report();
        assert_eq!(report.mine_count, 1);
        assert_eq!(report.revealed, 1);
        assert_eq!(report.confirmed_mines, 1);
        assert_eq!(report.flagged, vec![Cell::new(0, 1)]);
        assert_eq!(report.guesses, 1);
        assert_eq!(report.statistics.observations, 1);
    }

    #[test]
    fn test_report_json() {
        let report = sample_report();
        let json = report.to_json().unwrap();
        assert!(json.contains("\"result\": \"won\""));

        let parsed = GameReport::from_json(&json).unwrap();
        assert_eq!(parsed.outcome, GameOutcome::Won);
        assert_eq!(parsed.turns, report.turns);
    }

    #[test]
    fn test_summary_display() {
        let summary = sample_report().summary();
        assert_eq!(summary.to_string(), "row: won after 1 turns (1 guesses, 1/1 mines flagged)");
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(GameOutcome::Lost { cell: Cell::new(2, 3) }.to_string(), "lost on (2, 3)");
        assert!(!GameOutcome::TurnLimit.is_win());
    }
}
