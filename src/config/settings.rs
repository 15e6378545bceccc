//! Configuration settings for the Minesweeper inference agent

use crate::board::Cell;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub board: BoardConfig,
    pub game: GameConfig,
    pub output: OutputConfig,
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    pub board_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Seed for the fallback move RNG
    pub seed: u64,
    /// Opening move; chosen like any other move when absent
    #[serde(default)]
    pub first_move: Option<Cell>,
    #[serde(default)]
    pub max_turns: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub save_reports: bool,
    pub output_directory: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    pub board_directory: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board: BoardConfig {
                board_file: PathBuf::from("input/boards/beginner.txt"),
            },
            game: GameConfig {
                seed: 42,
                first_move: Some(Cell::new(0, 0)),
                max_turns: None,
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                save_reports: false,
                output_directory: PathBuf::from("output/reports"),
            },
            batch: BatchConfig {
                board_directory: PathBuf::from("input/boards"),
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings needed to play a single board
    pub fn validate(&self) -> Result<()> {
        if self.game.max_turns == Some(0) {
            anyhow::bail!("Maximum turns must be positive");
        }

        if !self.board.board_file.exists() {
            anyhow::bail!("Board file does not exist: {}", self.board.board_file.display());
        }

        Ok(())
    }

    /// Validate the settings needed to play a directory of boards
    pub fn validate_batch(&self) -> Result<()> {
        if self.game.max_turns == Some(0) {
            anyhow::bail!("Maximum turns must be positive");
        }

        if !self.batch.board_directory.is_dir() {
            anyhow::bail!("Board directory does not exist: {}", self.batch.board_directory.display());
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(ref board_file) = cli_overrides.board_file {
            self.board.board_file = board_file.clone();
        }
        if let Some(seed) = cli_overrides.seed {
            self.game.seed = seed;
        }
        if let Some(first_move) = cli_overrides.first_move {
            self.game.first_move = Some(first_move);
        }
        if let Some(max_turns) = cli_overrides.max_turns {
            self.game.max_turns = Some(max_turns);
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.output_directory = output_dir.clone();
            self.output.save_reports = true;
        }
        if let Some(ref board_directory) = cli_overrides.board_directory {
            self.batch.board_directory = board_directory.clone();
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub board_file: Option<PathBuf>,
    pub seed: Option<u64>,
    pub first_move: Option<Cell>,
    pub max_turns: Option<usize>,
    pub output_dir: Option<PathBuf>,
    pub board_directory: Option<PathBuf>,
}
