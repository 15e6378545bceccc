//! A single game: board oracle, knowledge base and move loop

use super::report::{GameOutcome, GameReport, MoveSource, TurnRecord};
use super::rng::GameRng;
use crate::board::{Board, Cell};
use crate::config::GameConfig;
use crate::knowledge::{KnowledgeBase, MoveChoice};
use anyhow::{Context, Result};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Plays one board to completion.
///
/// The session owns its knowledge base for the whole game and drops it with
/// the session, so nothing learned on one board leaks into another.
pub struct GameSession {
    name: String,
    board: Board,
    knowledge: KnowledgeBase,
    rng: GameRng,
    first_move: Option<Cell>,
    max_turns: Option<usize>,
    turns: Vec<TurnRecord>,
    outcome: Option<GameOutcome>,
    /// Time spent inside `step`
    elapsed: Duration,
}

impl GameSession {
    /// Start a game with the RNG seeded straight from the configuration
    pub fn new(name: impl Into<String>, board: Board, config: &GameConfig) -> Result<Self> {
        let rng = GameRng::new(config.seed);
        Self::with_rng(name, board, config, rng)
    }

    pub fn with_rng(
        name: impl Into<String>,
        board: Board,
        config: &GameConfig,
        rng: GameRng,
    ) -> Result<Self> {
        if let Some(first_move) = config.first_move {
            if !board.contains(first_move) {
                anyhow::bail!(
                    "Opening move {} is outside the {}x{} board",
                    first_move, board.height, board.width
                );
            }
        }

        let knowledge = KnowledgeBase::new(board.height, board.width);

        Ok(Self {
            name: name.into(),
            board,
            knowledge,
            rng,
            first_move: config.first_move,
            max_turns: config.max_turns,
            turns: Vec::new(),
            outcome: None,
            elapsed: Duration::ZERO,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn turns(&self) -> &[TurnRecord] {
        &self.turns
    }

    pub fn outcome(&self) -> Option<&GameOutcome> {
        self.outcome.as_ref()
    }

    /// Every mine confirmed, or every safe cell revealed
    pub fn is_won(&self) -> bool {
        self.knowledge.confirmed_mines().len() == self.board.mine_count()
            || self.knowledge.moves_made().len() == self.board.safe_count()
    }

    fn choose_move(&mut self) -> Option<(Cell, MoveSource)> {
        if self.turns.is_empty() {
            if let Some(cell) = self.first_move {
                return Some((cell, MoveSource::Opening));
            }
        }

        self.knowledge
            .next_move(&mut self.rng)
            .map(|MoveChoice { cell, kind }| (cell, MoveSource::Engine(kind)))
    }

    /// Play one turn. Returns the outcome once the game is over.
    pub fn step(&mut self) -> Result<Option<GameOutcome>> {
        if let Some(outcome) = &self.outcome {
            return Ok(Some(outcome.clone()));
        }

        let start_time = Instant::now();
        let outcome = self.play_turn();
        self.elapsed += start_time.elapsed();

        let outcome = outcome?;
        if let Some(outcome) = &outcome {
            info!(game = %self.name, turns = self.turns.len(), %outcome, "game over");
            self.outcome = Some(outcome.clone());
        }
        Ok(outcome)
    }

    fn play_turn(&mut self) -> Result<Option<GameOutcome>> {
        if self.is_won() {
            return Ok(Some(GameOutcome::Won));
        }
        if self.max_turns.is_some_and(|max| self.turns.len() >= max) {
            return Ok(Some(GameOutcome::TurnLimit));
        }

        let Some((cell, source)) = self.choose_move() else {
            return Ok(Some(GameOutcome::Exhausted));
        };

        let turn = self.turns.len() + 1;
        debug!(game = %self.name, turn, %cell, %source, "move");

        if self.board.is_mine(cell) {
            self.turns.push(TurnRecord {
                turn,
                cell,
                source,
                nearby_mines: None,
                new_mines: 0,
                new_safe: 0,
            });
            return Ok(Some(GameOutcome::Lost { cell }));
        }

        let nearby_mines = self.board.nearby_mines(cell);
        let summary = match self.knowledge.observe(cell, nearby_mines) {
            Ok(summary) => summary,
            Err(e) if e.is_fatal() => {
                return Ok(Some(GameOutcome::Contradiction { reason: e.to_string() }));
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to observe {} on turn {}", cell, turn));
            }
        };

        self.turns.push(TurnRecord {
            turn,
            cell,
            source,
            nearby_mines: Some(nearby_mines),
            new_mines: summary.new_mines.len(),
            new_safe: summary.new_safe.len(),
        });

        if self.is_won() {
            return Ok(Some(GameOutcome::Won));
        }
        Ok(None)
    }

    /// Step until the game ends
    pub fn run(&mut self) -> Result<GameOutcome> {
        loop {
            if let Some(outcome) = self.step()? {
                return Ok(outcome);
            }
        }
    }

    /// Report on a finished game, `None` while it is still running
    pub fn report(&self) -> Option<GameReport> {
        let outcome = self.outcome.clone()?;
        Some(GameReport::new(
            self.name.clone(),
            &self.board,
            &self.knowledge,
            outcome,
            self.turns.clone(),
            self.elapsed,
        ))
    }

    /// Play until the game ends and report on it
    pub fn play(mut self) -> Result<GameReport> {
        let outcome = self.run()?;
        Ok(GameReport::new(
            self.name,
            &self.board,
            &self.knowledge,
            outcome,
            self.turns,
            self.elapsed,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::parse_board_from_string;
    use crate::knowledge::MoveKind;

    fn config(first_move: Option<Cell>) -> GameConfig {
        GameConfig {
            seed: 1,
            first_move,
            max_turns: None,
        }
    }

    #[test]
    fn test_single_center_mine_is_solved_without_guessing() {
        let board = parse_board_from_string(".....\n.....\n..*..\n.....\n.....\n").unwrap();
        let session = GameSession::new("sparse", board, &config(Some(Cell::new(0, 0)))).unwrap();

        let report = session.play().unwrap();

        assert_eq!(report.outcome, GameOutcome::Won);
        assert!(report.turns.iter().skip(1).all(|t| t.source == MoveSource::Engine(MoveKind::Safe)));
        assert_eq!(report.confirmed_mines, 1);
    }

    #[test]
    fn test_hitting_a_mine_loses() {
        let board = parse_board_from_string("*.\n..\n").unwrap();
        let session = GameSession::new("mine", board, &config(Some(Cell::new(0, 0)))).unwrap();

        let report = session.play().unwrap();

        assert_eq!(report.outcome, GameOutcome::Lost { cell: Cell::new(0, 0) });
        assert_eq!(report.turns.len(), 1);
        assert_eq!(report.turns[0].nearby_mines, None);
    }

    #[test]
    fn test_turn_limit() {
        let board = parse_board_from_string("....\n....\n...*\n").unwrap();
        let mut cfg = config(Some(Cell::new(0, 0)));
        cfg.max_turns = Some(1);

        let report = GameSession::new("limited", board, &cfg).unwrap().play().unwrap();
        assert_eq!(report.outcome, GameOutcome::TurnLimit);
        assert_eq!(report.turns.len(), 1);
    }

    #[test]
    fn test_opening_move_out_of_bounds_is_rejected() {
        let board = Board::new(2, 2);
        assert!(GameSession::new("bad", board, &config(Some(Cell::new(5, 5)))).is_err());
    }

    #[test]
    fn test_report_only_after_game_over() {
        let board = parse_board_from_string("....\n....\n...*\n").unwrap();
        let mut session = GameSession::new("partial", board, &config(Some(Cell::new(0, 0)))).unwrap();
        assert!(session.report().is_none());

        let outcome = session.run().unwrap();
        let report = session.report().unwrap();
        assert_eq!(report.outcome, outcome);
        assert_eq!(report.turns.len(), session.turns().len());
    }

    #[test]
    fn test_step_after_game_over_returns_same_outcome() {
        let board = parse_board_from_string("*.\n").unwrap();
        let mut session = GameSession::new("tiny", board, &config(Some(Cell::new(0, 1)))).unwrap();

        let first = session.step().unwrap();
        assert_eq!(first, Some(GameOutcome::Won));
        assert_eq!(session.step().unwrap(), first);
        assert_eq!(session.turns().len(), 1);
        assert_eq!(session.report().map(|r| r.outcome), first);
    }

    #[test]
    fn test_same_seed_replays_identically() {
        let board = parse_board_from_string("..*..*..\n").unwrap();
        let a = GameSession::new("corridor", board.clone(), &config(None)).unwrap().play().unwrap();
        let b = GameSession::new("corridor", board, &config(None)).unwrap().play().unwrap();

        let cells_a: Vec<Cell> = a.turns.iter().map(|t| t.cell).collect();
        let cells_b: Vec<Cell> = b.turns.iter().map(|t| t.cell).collect();
        assert_eq!(cells_a, cells_b);
        assert_eq!(a.outcome, b.outcome);
    }

    #[test]
    fn test_confirmed_mines_are_real_mines() {
        let board = parse_board_from_string("........\n.*......\n......*.\n...*....\n....*...\n*....*..\n........\n..*...*.\n").unwrap();
        let report = GameSession::new("beginner", board.clone(), &config(Some(Cell::new(7, 0))))
            .unwrap()
            .play()
            .unwrap();

        assert_ne!(report.outcome, GameOutcome::Exhausted);
        assert!(!matches!(report.outcome, GameOutcome::Contradiction { .. }));
        assert_eq!(report.flagged.len(), report.confirmed_mines);
        for cell in &report.flagged {
            assert!(board.is_mine(*cell));
        }
    }
}
