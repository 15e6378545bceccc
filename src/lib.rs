//! Minesweeper inference agent
//!
//! This library keeps a knowledge base of cardinality constraints ("exactly
//! `n` of these cells are mines") built from revealed clues, closes it under
//! subset resolution, and picks the next cell to reveal.

pub mod board;
pub mod config;
pub mod game;
pub mod knowledge;
pub mod utils;

pub use board::{Board, Cell};
pub use config::Settings;
pub use game::{GameReport, GameSession};
pub use knowledge::{InferenceError, KnowledgeBase, Sentence};

use anyhow::{Context, Result};

/// Main entry point for playing the configured board to completion
pub fn play_board(settings: &Settings) -> Result<GameReport> {
    let board_file = &settings.board.board_file;
    let board = board::load_board_from_file(board_file)?;

    GameSession::new(board::board_name(board_file), board, &settings.game)
        .context("Failed to start game")?
        .play()
}
