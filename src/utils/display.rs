//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::game::{BatchSummary, GameReport};
use crate::knowledge::{CellKnowledge, KnowledgeBase};
use anyhow::Result;
use std::path::Path;

/// Format reports and knowledge for display
pub struct ReportFormatter;

impl ReportFormatter {
    /// Render the knowledge base's view of the board.
    ///
    /// `#` revealed, `*` confirmed mine, `o` confirmed safe but unrevealed,
    /// `?` unknown.
    pub fn format_knowledge_map(knowledge: &KnowledgeBase) -> String {
        let mut output = String::new();

        output.push_str("   ");
        for col in 0..knowledge.width() {
            output.push_str(&format!("{:2}", col % 10));
        }
        output.push('\n');

        for row in 0..knowledge.height() {
            output.push_str(&format!("{:2} ", row));
            for col in 0..knowledge.width() {
                let symbol = match knowledge.knowledge_of((row, col).into()) {
                    CellKnowledge::Revealed => '#',
                    CellKnowledge::Mine => '*',
                    CellKnowledge::Safe => 'o',
                    CellKnowledge::Unknown => '?',
                };
                output.push(' ');
                output.push(symbol);
            }
            output.push('\n');
        }

        output
    }

    /// Format a single game report for console output
    pub fn format_report(report: &GameReport, show_turns: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!("=== Game {} ===\n", report.name));
        output.push_str(&format!("Board: {}x{} with {} mines\n", report.height, report.width, report.mine_count));
        output.push_str(&format!("Outcome: {}\n", report.outcome));
        output.push_str(&format!("Turns: {} ({} guesses)\n", report.turns.len(), report.guesses));
        output.push_str(&format!("Revealed: {}\n", report.revealed));
        output.push_str(&format!("Confirmed: {} mines, {} safe\n", report.confirmed_mines, report.confirmed_safe));
        output.push_str(&format!("Play Time: {:.3}s\n", report.duration.as_secs_f64()));
        output.push_str(&format!("{}\n", report.statistics));

        if show_turns {
            output.push_str("\nTurns:\n");
            for turn in &report.turns {
                let clue = match turn.nearby_mines {
                    Some(count) => count.to_string(),
                    None => "MINE".to_string(),
                };
                output.push_str(&format!(
                    "{:4}. {:10} {:14} clue {:4} (+{} mines, +{} safe)\n",
                    turn.turn,
                    turn.cell.to_string(),
                    turn.source.to_string(),
                    clue,
                    turn.new_mines,
                    turn.new_safe
                ));
            }
        }

        output
    }

    /// Format a batch as one row per game
    pub fn format_batch_table(reports: &[GameReport], summary: &BatchSummary) -> String {
        let mut output = String::new();

        output.push_str("Board            | Outcome              | Turns | Guesses | Mines\n");
        output.push_str("-----------------|----------------------|-------|---------|-------\n");

        for report in reports {
            output.push_str(&format!(
                "{:16} | {:20} | {:5} | {:7} | {}/{}\n",
                report.name,
                report.outcome.to_string(),
                report.turns.len(),
                report.guesses,
                report.confirmed_mines,
                report.mine_count
            ));
        }

        output.push('\n');
        output.push_str(&summary.to_string());
        output
    }

    /// Save reports to files based on output format
    pub fn save_reports<P: AsRef<Path>>(
        reports: &[GameReport],
        output_dir: P,
        format: &OutputFormat,
    ) -> Result<()> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)?;

        match format {
            OutputFormat::Text => {
                for report in reports {
                    let filepath = output_dir.join(format!("{}.txt", report.name));
                    std::fs::write(filepath, Self::format_report(report, true))?;
                }
            }
            OutputFormat::Json => {
                for report in reports {
                    let filepath = output_dir.join(format!("{}.json", report.name));
                    report.save_to_file(filepath)?;
                }

                let summaries: Vec<_> = reports.iter().map(GameReport::summary).collect();
                let summary_json = serde_json::to_string_pretty(&summaries)?;
                std::fs::write(output_dir.join("games_summary.json"), summary_json)?;
            }
        }

        Ok(())
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() &&
        (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}
