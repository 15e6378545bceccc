//! Main CLI application for the Minesweeper inference agent

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use minesweeper_inference::{
    board::{board_name, create_example_boards, load_board_from_file, Cell},
    config::{CliOverrides, Settings},
    game::{play_directory, GameSession},
    knowledge::{InferenceError, KnowledgeBase},
    utils::{ColorOutput, ReportFormatter},
};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "minesweeper_inference")]
#[command(about = "Minesweeper inference agent")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single board to completion
    Play {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Board file (overrides config)
        #[arg(short, long)]
        board: Option<PathBuf>,

        /// Seed for fallback moves (overrides config)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Opening move as row,col (overrides config)
        #[arg(short, long)]
        first_move: Option<Cell>,

        /// Maximum number of turns (overrides config)
        #[arg(short, long)]
        max_turns: Option<usize>,

        /// Save the report to this directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the final knowledge map
        #[arg(long)]
        show_knowledge: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Play every board in a directory in parallel
    Batch {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Board directory (overrides config)
        #[arg(short, long)]
        directory: Option<PathBuf>,

        /// Seed for fallback moves (overrides config)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Save reports to this directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Reveal cells on a board and show what can be deduced
    Analyze {
        /// Board file
        #[arg(short, long)]
        board: PathBuf,

        /// Cells to reveal, in order, as row,col
        #[arg(short, long, num_args = 1..)]
        reveal: Vec<Cell>,
    },

    /// Create example configuration and board files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let verbose = matches!(
        cli.command,
        Commands::Play { verbose: true, .. } | Commands::Batch { verbose: true, .. }
    );
    init_tracing(verbose);

    match cli.command {
        Commands::Play {
            config, board, seed, first_move, max_turns, output,
            show_knowledge, verbose
        } => {
            let overrides = CliOverrides {
                board_file: board,
                seed,
                first_move,
                max_turns,
                output_dir: output,
                ..Default::default()
            };
            play_command(config, overrides, show_knowledge, verbose)
        }
        Commands::Batch { config, directory, seed, output, verbose } => {
            let overrides = CliOverrides {
                seed,
                output_dir: output,
                board_directory: directory,
                ..Default::default()
            };
            batch_command(config, overrides, verbose)
        }
        Commands::Analyze { board, reveal } => {
            analyze_command(board, reveal)
        }
        Commands::Setup { directory, force } => {
            setup_command(directory, force)
        }
    }
}

/// Log to stderr; `RUST_LOG` wins over the verbose flag
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(config_path: &Path) -> Result<Settings> {
    if config_path.exists() {
        Settings::from_file(&config_path.to_path_buf())
            .with_context(|| format!("Failed to load config from {}", config_path.display()))
    } else {
        println!("{}", ColorOutput::warning(&format!(
            "Config file {} not found, using defaults", config_path.display()
        )));
        Ok(Settings::default())
    }
}

fn play_command(
    config_path: PathBuf,
    overrides: CliOverrides,
    show_knowledge: bool,
    verbose: bool,
) -> Result<()> {
    println!("{}", ColorOutput::info("💣 Starting Minesweeper inference agent"));

    let mut settings = load_settings(&config_path)?;
    settings.merge_with_cli(&overrides);

    if verbose {
        println!("Configuration:");
        println!("  Board file: {}", settings.board.board_file.display());
        println!("  Seed: {}", settings.game.seed);
        match settings.game.first_move {
            Some(cell) => println!("  Opening move: {}", cell),
            None => println!("  Opening move: engine choice"),
        }
        if let Some(max_turns) = settings.game.max_turns {
            println!("  Max turns: {}", max_turns);
        }
        println!();
    }

    settings.validate()
        .context("Configuration validation failed")?;

    let board = load_board_from_file(&settings.board.board_file)?;
    let name = board_name(&settings.board.board_file);

    let mut session = GameSession::new(name, board, &settings.game)
        .context("Failed to start game")?;

    session.run()?;
    let report = session.report()
        .context("Game ended without an outcome")?;

    if report.outcome.is_win() {
        println!("{}", ColorOutput::success(&format!("✅ {}", report.summary())));
    } else {
        println!("{}", ColorOutput::error(&format!("❌ {}", report.summary())));
    }

    println!("\n{}", ReportFormatter::format_report(&report, verbose));

    if show_knowledge {
        println!("{}", ColorOutput::info("Knowledge:"));
        println!("{}", ReportFormatter::format_knowledge_map(session.knowledge()));
    }

    if settings.output.save_reports {
        ReportFormatter::save_reports(
            std::slice::from_ref(&report),
            &settings.output.output_directory,
            &settings.output.format,
        )
        .context("Failed to save report")?;

        println!("{}", ColorOutput::success(&format!(
            "Report saved to {}",
            settings.output.output_directory.display()
        )));
    }

    Ok(())
}

fn batch_command(config_path: PathBuf, overrides: CliOverrides, verbose: bool) -> Result<()> {
    println!("{}", ColorOutput::info("💣 Playing board directory"));

    let mut settings = load_settings(&config_path)?;
    settings.merge_with_cli(&overrides);

    settings.validate_batch()
        .context("Configuration validation failed")?;

    info!(directory = %settings.batch.board_directory.display(), "starting batch");
    let (reports, summary) = play_directory(&settings)?;

    if reports.is_empty() {
        println!("{}", ColorOutput::warning("No boards found"));
        return Ok(());
    }

    println!("\n{}", ReportFormatter::format_batch_table(&reports, &summary));

    if verbose {
        for report in &reports {
            println!("{}", ReportFormatter::format_report(report, false));
        }
    }

    if settings.output.save_reports {
        ReportFormatter::save_reports(&reports, &settings.output.output_directory, &settings.output.format)
            .context("Failed to save reports")?;

        println!("{}", ColorOutput::success(&format!(
            "Reports saved to {}",
            settings.output.output_directory.display()
        )));
    }

    Ok(())
}

fn analyze_command(board_path: PathBuf, reveal: Vec<Cell>) -> Result<()> {
    println!("{}", ColorOutput::info("🔬 Analyzing board..."));

    let board = load_board_from_file(&board_path)?;
    let mut knowledge = KnowledgeBase::new(board.height, board.width);

    println!("Board ({}x{}, {} mines)", board.height, board.width, board.mine_count());

    for cell in reveal {
        if !board.contains(cell) {
            anyhow::bail!("Cell {} is outside the {}x{} board", cell, board.height, board.width);
        }
        if board.is_mine(cell) {
            println!("{}", ColorOutput::error(&format!("{} is a mine, stopping", cell)));
            break;
        }

        let count = board.nearby_mines(cell);
        match knowledge.observe(cell, count) {
            Ok(summary) => {
                println!(
                    "Revealed {} = {}: {} new mines, {} new safe cells",
                    cell, count, summary.new_mines.len(), summary.new_safe.len()
                );
            }
            Err(InferenceError::DuplicateObservation(cell)) => {
                println!("{}", ColorOutput::warning(&format!("{} already revealed, skipping", cell)));
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to observe {}", cell)),
        }
    }

    println!("\n{}", ReportFormatter::format_knowledge_map(&knowledge));

    if !knowledge.sentences().is_empty() {
        println!("Open constraints:");
        for sentence in knowledge.sentences() {
            println!("  {}", sentence);
        }
        println!();
    }

    match knowledge.safe_move() {
        Some(cell) => println!("{}", ColorOutput::success(&format!("Next safe move: {}", cell))),
        None => println!("{}", ColorOutput::warning("No cell is known to be safe")),
    }

    println!("\n{}", knowledge.statistics());

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("🛠️  Setting up project structure..."));

    let config_dir = directory.join("config");
    let input_dir = directory.join("input/boards");
    let output_dir = directory.join("output/reports");

    for dir in [&config_dir, &input_dir, &output_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default().to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_boards(&input_dir)
        .context("Failed to create example boards")?;
    println!("Created example boards in: {}", input_dir.display());

    let examples_dir = config_dir.join("presets");
    std::fs::create_dir_all(&examples_dir)?;

    // Engine picks every move, including the first
    let mut blind = Settings::default();
    blind.game.first_move = None;
    blind.board.board_file = PathBuf::from("input/boards/corridor.txt");
    blind.to_file(&examples_dir.join("blind.yaml"))?;

    let mut reporting = Settings::default();
    reporting.output.save_reports = true;
    reporting.output.format = minesweeper_inference::config::OutputFormat::Json;
    reporting.to_file(&examples_dir.join("reporting.yaml"))?;

    println!("Created preset configurations in: {}", examples_dir.display());

    println!("\n{}", ColorOutput::success("✅ Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Add your boards to {}", input_dir.display());
    println!("3. Run: cargo run -- play --config config/default.yaml");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "minesweeper_inference",
            "play",
            "--config", "test.yaml",
            "--seed", "5",
            "--first-move", "2,3",
        ]);

        match cli.unwrap().command {
            Commands::Play { seed, first_move, .. } => {
                assert_eq!(seed, Some(5));
                assert_eq!(first_move, Some(Cell::new(2, 3)));
            }
            _ => panic!("expected play command"),
        }
    }

    #[test]
    fn test_analyze_parsing() {
        let cli = Cli::try_parse_from([
            "minesweeper_inference",
            "analyze",
            "--board", "b.txt",
            "--reveal", "0,0", "1,2",
        ]);

        match cli.unwrap().command {
            Commands::Analyze { reveal, .. } => {
                assert_eq!(reveal, vec![Cell::new(0, 0), Cell::new(1, 2)]);
            }
            _ => panic!("expected analyze command"),
        }

        assert!(Cli::try_parse_from(["minesweeper_inference", "analyze", "--board", "b.txt", "--reveal", "x"]).is_err());
    }

    #[test]
    fn test_setup_command() {
        let temp_dir = tempdir().unwrap();
        let result = setup_command(temp_dir.path().to_path_buf(), false);

        assert!(result.is_ok());
        assert!(temp_dir.path().join("config/default.yaml").exists());
        assert!(temp_dir.path().join("input/boards/beginner.txt").exists());
    }

    #[test]
    fn test_analyze_command() {
        let temp_dir = tempdir().unwrap();
        create_example_boards(temp_dir.path()).unwrap();

        let board = temp_dir.path().join("sparse.txt");
        assert!(analyze_command(board.clone(), vec![Cell::new(0, 0), Cell::new(0, 0)]).is_ok());
        assert!(analyze_command(board, vec![Cell::new(9, 9)]).is_err());
    }
}
