//! End-to-end inference scenarios through the public API

use minesweeper_inference::board::{create_example_boards, load_boards_from_directory, parse_board_from_string};
use minesweeper_inference::config::{GameConfig, Settings};
use minesweeper_inference::game::{play_boards, GameOutcome, GameSession, MoveSource};
use minesweeper_inference::knowledge::{InferenceError, MoveKind};
use minesweeper_inference::{Cell, KnowledgeBase, Sentence};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;
use tempfile::tempdir;

fn cells(list: &[(usize, usize)]) -> BTreeSet<Cell> {
    list.iter().map(|&c| Cell::from(c)).collect()
}

#[test]
fn subset_of_pair_leaves_third_cell_as_mine() {
    let ab = Sentence::new(cells(&[(0, 0), (0, 1)]), 1).unwrap();
    let abc = Sentence::new(cells(&[(0, 0), (0, 1), (0, 2)]), 2).unwrap();

    let derived = ab.resolve(&abc).unwrap().unwrap();
    assert_eq!(derived.cells(), &cells(&[(0, 2)]));
    assert_eq!(derived.count(), 1);
    assert_eq!(derived.known_mines(), cells(&[(0, 2)]));
}

#[test]
fn count_larger_than_cells_is_rejected() {
    let result = Sentence::new(cells(&[(0, 0)]), 2);
    assert!(matches!(result, Err(InferenceError::Contradiction { .. })));
}

#[test]
fn one_two_pattern_along_an_edge() {
    // .  .  .
    // .  *  *
    let board = parse_board_from_string("...\n.**\n").unwrap();
    let mut kb = KnowledgeBase::new(2, 3);

    for cell in [Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 2)] {
        kb.observe(cell, board.nearby_mines(cell)).unwrap();
    }

    assert_eq!(kb.confirmed_mines(), &cells(&[(1, 1), (1, 2)]));
    assert!(kb.confirmed_safe().contains(&Cell::new(1, 0)));
    assert_eq!(kb.safe_move(), Some(Cell::new(1, 0)));
    assert!(kb.sentences().is_empty());
}

#[test]
fn pair_and_single_clear_the_other_cell() {
    // {(0,2), (1,1)} = 1 from (1,2) sits inside the five-cell sentence
    // from (0,1), which clears the left column.
    let board = parse_board_from_string("...\n.*.\n").unwrap();
    let mut kb = KnowledgeBase::new(2, 3);

    kb.observe(Cell::new(0, 1), board.nearby_mines(Cell::new(0, 1))).unwrap();
    kb.observe(Cell::new(1, 2), board.nearby_mines(Cell::new(1, 2))).unwrap();
    kb.observe(Cell::new(0, 2), board.nearby_mines(Cell::new(0, 2))).unwrap();

    assert_eq!(kb.confirmed_mines(), &cells(&[(1, 1)]));
    assert!(kb.confirmed_safe().is_superset(&cells(&[(0, 0), (1, 0)])));
}

#[test]
fn rejected_observations_leave_knowledge_untouched() {
    let mut kb = KnowledgeBase::new(3, 3);
    kb.observe(Cell::new(0, 0), 1).unwrap();
    let before = kb.sentences().clone();

    assert_eq!(
        kb.observe(Cell::new(0, 0), 1),
        Err(InferenceError::DuplicateObservation(Cell::new(0, 0)))
    );
    assert!(matches!(kb.observe(Cell::new(3, 0), 0), Err(InferenceError::OutOfBounds { .. })));

    assert_eq!(kb.sentences(), &before);
    assert!(kb.is_consistent());
}

#[test]
fn contradiction_poisons_later_calls() {
    let mut kb = KnowledgeBase::new(1, 3);
    kb.observe(Cell::new(0, 0), 1).unwrap();

    // (0,1) is now a confirmed mine, so claiming (0,2) has no mine
    // next to it is impossible.
    assert!(matches!(kb.observe(Cell::new(0, 2), 0), Err(InferenceError::Contradiction { .. })));
    assert!(!kb.is_consistent());
    assert!(matches!(kb.propagate(), Err(InferenceError::Inconsistent(_))));
}

#[test]
fn guesses_avoid_confirmed_mines() {
    let mut kb = KnowledgeBase::new(1, 3);
    kb.observe(Cell::new(0, 0), 1).unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(11);
    for _ in 0..20 {
        let choice = kb.next_move(&mut rng).unwrap();
        assert_eq!(choice.cell, Cell::new(0, 2));
        assert_eq!(choice.kind, MoveKind::Random);
    }
}

#[test]
fn no_move_once_every_cell_is_resolved() {
    let mut kb = KnowledgeBase::new(1, 2);
    kb.observe(Cell::new(0, 0), 1).unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(0);
    assert_eq!(kb.safe_move(), None);
    assert_eq!(kb.riskiest_avoiding_move(&mut rng), None);
}

#[test]
fn corridor_is_solved_from_the_left_edge() {
    let board = parse_board_from_string("..*..*..\n").unwrap();
    let config = GameConfig {
        seed: 3,
        first_move: Some(Cell::new(0, 0)),
        max_turns: None,
    };

    let report = GameSession::new("corridor", board.clone(), &config).unwrap().play().unwrap();

    // After the opening, (0,1) is safe and its clue pins (0,2) as a mine.
    assert_eq!(report.turns[1].cell, Cell::new(0, 1));
    assert_eq!(report.turns[1].source, MoveSource::Engine(MoveKind::Safe));
    assert!(report.flagged.contains(&Cell::new(0, 2)));
    for cell in &report.flagged {
        assert!(board.is_mine(*cell));
    }
}

#[test]
fn example_boards_never_flag_a_safe_cell() {
    let temp_dir = tempdir().unwrap();
    create_example_boards(temp_dir.path()).unwrap();
    let boards = load_boards_from_directory(temp_dir.path()).unwrap();

    for seed in 0..8 {
        let mut settings = Settings::default();
        settings.game.seed = seed;
        settings.game.first_move = None;

        let reports = play_boards(boards.clone(), &settings).unwrap();
        for (report, (_, board)) in reports.iter().zip(&boards) {
            assert!(!matches!(report.outcome, GameOutcome::Contradiction { .. }));
            for cell in &report.flagged {
                assert!(board.is_mine(*cell), "{} flagged {} on seed {}", report.name, cell, seed);
            }
        }
    }
}
