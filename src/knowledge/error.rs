//! Error types for the inference engine

use crate::board::Cell;
use thiserror::Error;

/// Result type for knowledge-base operations
pub type InferenceResult<T> = Result<T, InferenceError>;

/// Errors raised while updating or propagating the knowledge base
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    /// The accumulated constraints cannot all hold at once
    #[error("contradiction: {reason}")]
    Contradiction { reason: String },

    /// A cell was observed more than once
    #[error("cell {0} has already been observed")]
    DuplicateObservation(Cell),

    /// An observation referenced a cell outside the grid
    #[error("cell {cell} is outside the {height}x{width} grid")]
    OutOfBounds {
        cell: Cell,
        height: usize,
        width: usize,
    },

    /// An earlier contradiction halted inference for this game
    #[error("knowledge base is inconsistent after an earlier contradiction: {0}")]
    Inconsistent(String),
}

impl InferenceError {
    pub fn contradiction(reason: impl Into<String>) -> Self {
        InferenceError::Contradiction {
            reason: reason.into(),
        }
    }

    /// Whether this error invalidates the knowledge base it came from
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            InferenceError::Contradiction { .. } | InferenceError::Inconsistent(_)
        )
    }
}
