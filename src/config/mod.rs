//! Configuration management for the Minesweeper inference agent

pub mod settings;

pub use settings::{
    Settings, BoardConfig, GameConfig, OutputConfig, BatchConfig, OutputFormat, CliOverrides
};
