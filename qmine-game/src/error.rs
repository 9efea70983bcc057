//! Error types for the game engine

use crate::board::Cell;
use qmine_backend::BackendError;
use qmine_core::{CliffordGate, QuantumError};
use qmine_state::StateError;
use thiserror::Error;

/// Result type for game operations
pub type Result<T> = std::result::Result<T, GameError>;

/// Errors that can occur while configuring or playing a game
///
/// Every variant except the fatal ones is raised before any mutation, so a
/// rejected move leaves the game exactly as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    /// Move not allowed by the moveset, the target cell or the game status
    #[error("Illegal move: {0}")]
    IllegalMove(String),

    /// Coordinates outside the board
    #[error("Cell {cell} is outside the {rows}x{cols} board")]
    OutOfBounds { cell: Cell, rows: usize, cols: usize },

    /// The active backend cannot realise the gate
    #[error("Gate {gate} is not supported by the {backend} backend")]
    UnsupportedGate {
        gate: CliffordGate,
        backend: &'static str,
    },

    /// Two-qubit gate on cells that are not grid neighbours
    #[error("Cells {first} and {second} are not adjacent")]
    NonAdjacent { first: Cell, second: Cell },

    /// Textual move that does not follow the grammar
    #[error("Invalid command '{input}': {reason}")]
    InvalidCommand { input: String, reason: String },

    /// Configuration rejected at game creation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Saving or restoring a game failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Failure reported by the simulation backend
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl GameError {
    /// Create an illegal-move error
    pub fn illegal(reason: impl Into<String>) -> Self {
        GameError::IllegalMove(reason.into())
    }

    /// Create an invalid-command error
    pub fn invalid_command(input: &str, reason: impl Into<String>) -> Self {
        GameError::InvalidCommand {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the session cannot continue after this error
    ///
    /// Rule violations are recoverable; a backend that cannot realise a gate
    /// or a register that failed mid-move is not.
    pub fn is_fatal(&self) -> bool {
        matches!(self, GameError::UnsupportedGate { .. } | GameError::Backend(_))
    }
}

impl From<StateError> for GameError {
    fn from(err: StateError) -> Self {
        GameError::Backend(BackendError::from(err))
    }
}

impl From<QuantumError> for GameError {
    fn from(err: QuantumError) -> Self {
        GameError::Backend(BackendError::from(err))
    }
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        GameError::Persistence(err.to_string())
    }
}

impl From<bincode::Error> for GameError {
    fn from(err: bincode::Error) -> Self {
        GameError::Persistence(err.to_string())
    }
}
