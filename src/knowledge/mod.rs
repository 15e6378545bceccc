//! Constraint inference over revealed Minesweeper clues

pub mod base;
pub mod error;
pub mod moves;
pub mod sentence;

pub use base::{CellKnowledge, InferenceStatistics, KnowledgeBase, PropagationSummary};
pub use error::{InferenceError, InferenceResult};
pub use moves::{MoveChoice, MoveKind};
pub use sentence::Sentence;
