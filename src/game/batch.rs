//! Playing many boards at once

use super::report::{GameOutcome, GameReport};
use super::rng::GameRng;
use super::session::GameSession;
use crate::board::{load_boards_from_directory, Board};
use crate::config::Settings;
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Aggregate results over a batch of games
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub games: usize,
    pub won: usize,
    pub lost: usize,
    pub unfinished: usize,
    pub contradictions: usize,
    pub total_turns: usize,
    pub total_guesses: usize,
    pub elapsed_ms: u64,
}

impl BatchSummary {
    pub fn from_reports(reports: &[GameReport]) -> Self {
        let mut summary = Self {
            games: reports.len(),
            ..Default::default()
        };

        for report in reports {
            match report.outcome {
                GameOutcome::Won => summary.won += 1,
                GameOutcome::Lost { .. } => summary.lost += 1,
                GameOutcome::Contradiction { .. } => summary.contradictions += 1,
                GameOutcome::Exhausted | GameOutcome::TurnLimit => summary.unfinished += 1,
            }
            summary.total_turns += report.turns.len();
            summary.total_guesses += report.guesses;
        }

        summary
    }

    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.won as f64 / self.games as f64
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Batch Summary:")?;
        writeln!(f, "  Games: {}", self.games)?;
        writeln!(f, "  Won: {} ({:.1}%)", self.won, self.win_rate() * 100.0)?;
        writeln!(f, "  Lost: {}", self.lost)?;
        writeln!(f, "  Unfinished: {}", self.unfinished)?;
        writeln!(f, "  Contradictions: {}", self.contradictions)?;
        writeln!(f, "  Turns: {} ({} guesses)", self.total_turns, self.total_guesses)?;
        writeln!(f, "  Elapsed: {}ms", self.elapsed_ms)?;
        Ok(())
    }
}

/// Play every board in parallel. Each game gets its own RNG stream derived
/// from the configured seed and the board name.
pub fn play_boards(boards: Vec<(String, Board)>, settings: &Settings) -> Result<Vec<GameReport>> {
    boards
        .into_par_iter()
        .map(|(name, board)| {
            let rng = GameRng::for_context(settings.game.seed, &name);
            GameSession::with_rng(name.clone(), board, &settings.game, rng)
                .and_then(GameSession::play)
                .with_context(|| format!("Failed to play board {}", name))
        })
        .collect()
}

/// Load and play every board in the configured batch directory
pub fn play_directory(settings: &Settings) -> Result<(Vec<GameReport>, BatchSummary)> {
    let start_time = Instant::now();

    let boards = load_boards_from_directory(&settings.batch.board_directory)
        .context("Failed to load batch boards")?;

    let reports = play_boards(boards, settings)?;

    let mut summary = BatchSummary::from_reports(&reports);
    summary.elapsed_ms = start_time.elapsed().as_millis() as u64;

    Ok((reports, summary))
}
