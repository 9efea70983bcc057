//! Error types for backend operations

use qmine_core::{CliffordGate, QuantumError};
use qmine_state::StateError;
use thiserror::Error;

/// Result type for backend operations
pub type Result<T> = std::result::Result<T, BackendError>;

/// Errors that can occur during backend operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// The backend cannot realise this gate
    #[error("Backend '{backend}' does not support gate {gate}")]
    UnsupportedGate {
        backend: &'static str,
        gate: CliffordGate,
    },

    /// Backend capabilities exceeded
    #[error("Backend capability exceeded: {0}")]
    CapabilityExceeded(String),

    /// A register created by one backend was handed to another
    #[error("Register held by the {actual} engine passed to the {expected} backend")]
    StateMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Failure inside the register itself
    #[error(transparent)]
    State(#[from] StateError),

    /// Malformed gate or circuit
    #[error(transparent)]
    Core(#[from] QuantumError),
}

impl BackendError {
    /// Whether the error means the backend and configuration disagree, as
    /// opposed to a bad argument
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            BackendError::UnsupportedGate { .. }
                | BackendError::CapabilityExceeded(_)
                | BackendError::StateMismatch { .. }
                | BackendError::InvalidConfiguration(_)
        )
    }
}
