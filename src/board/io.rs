//! File I/O for Minesweeper boards

use super::{Board, Cell};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::warn;

/// Load a board from a text file.
/// Format: one row per line, '*' for a mine and '.' for a safe cell
pub fn load_board_from_file<P: AsRef<Path>>(path: P) -> Result<Board> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read board file: {}", path.as_ref().display()))?;

    parse_board_from_string(&content)
        .with_context(|| format!("Failed to parse board from file: {}", path.as_ref().display()))
}

/// Parse a board from its text representation
pub fn parse_board_from_string(content: &str) -> Result<Board> {
    let lines: Vec<&str> = content.lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        anyhow::bail!("Board file is empty or contains no valid rows");
    }

    let width = lines[0].chars().count();
    let mut cells = Vec::with_capacity(lines.len());

    for (row_idx, line) in lines.iter().enumerate() {
        let mut row = Vec::with_capacity(width);
        for (col_idx, ch) in line.chars().enumerate() {
            match ch {
                '.' => row.push(false),
                '*' => row.push(true),
                _ => anyhow::bail!("Invalid character '{}' at position ({}, {}). Only '.' and '*' are allowed",
                                 ch, row_idx, col_idx),
            }
        }
        if row.len() != width {
            anyhow::bail!("Row {} has length {}, expected {} (all rows must have the same length)",
                         row_idx, row.len(), width);
        }
        cells.push(row);
    }

    Board::from_cells(cells)
}

/// Convert a board to its text representation
pub fn board_to_string(board: &Board) -> String {
    let mut result = String::with_capacity(board.height * (board.width + 1));

    for row in 0..board.height {
        for col in 0..board.width {
            result.push(if board.cells[row * board.width + col] { '*' } else { '.' });
        }
        result.push('\n');
    }

    result
}

/// Save a board to a text file
pub fn save_board_to_file<P: AsRef<Path>>(board: &Board, path: P) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, board_to_string(board))
        .with_context(|| format!("Failed to write board to file: {}", path.as_ref().display()))?;

    Ok(())
}

/// Name a board after its file stem
pub fn board_name<P: AsRef<Path>>(path: P) -> String {
    path.as_ref()
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}

/// Load every `.txt` board in a directory, sorted by file stem.
/// Files that fail to parse are skipped with a warning.
pub fn load_boards_from_directory<P: AsRef<Path>>(dir_path: P) -> Result<Vec<(String, Board)>> {
    let dir = std::fs::read_dir(&dir_path)
        .with_context(|| format!("Failed to read directory: {}", dir_path.as_ref().display()))?;

    let mut boards = Vec::new();

    for entry in dir {
        let entry = entry.context("Failed to read directory entry")?;
        let path = entry.path();

        if !path.is_file() || path.extension().map_or(true, |ext| ext != "txt") {
            continue;
        }

        let name = board_name(&path);

        match load_board_from_file(&path) {
            Ok(board) => boards.push((name, board)),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable board"),
        }
    }

    boards.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(boards)
}

/// Write a few fixed example boards
pub fn create_example_boards<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let examples: [(&str, usize, usize, &[(usize, usize)]); 4] = [
        // Classic beginner layout, 8x8 with 8 mines
        ("beginner.txt", 8, 8, &[(1, 1), (2, 6), (3, 3), (4, 4), (5, 0), (5, 5), (7, 2), (7, 6)]),
        // Single row, solvable by subset resolution from the left edge
        ("corridor.txt", 1, 8, &[(0, 2), (0, 5)]),
        ("sparse.txt", 5, 5, &[(2, 2)]),
        ("corner.txt", 4, 4, &[(0, 0), (3, 3)]),
    ];

    for (name, height, width, mines) in examples {
        let mines: Vec<Cell> = mines.iter().map(|&m| Cell::from(m)).collect();
        let board = Board::with_mines(height, width, &mines)
            .with_context(|| format!("Invalid example board {}", name))?;
        save_board_to_file(&board, dir.join(name))?;
    }

    Ok(())
}
