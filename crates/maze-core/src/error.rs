//! Error types for the maze workspace

use thiserror::Error;

use crate::types::Position;

/// Main error type for maze operations
#[derive(Error, Debug)]
pub enum MazeError {
    #[error("Grid error: multiple starts are not permitted")]
    MultipleStarts,

    #[error("Grid error: multiple goals are not permitted")]
    MultipleGoals,

    #[error("Grid error: no start marker found")]
    NoStart,

    #[error("Grid error: no goal marker found")]
    NoGoal,

    #[error("Invalid state: the agent cannot occupy {0}")]
    InvalidState(Position),

    #[error("Invalid action: {0:?} (expected R, L, D or U)")]
    InvalidAction(String),

    #[error("No effective action from {0}")]
    NoEffectiveAction(Position),

    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for maze operations
pub type Result<T> = std::result::Result<T, MazeError>;
