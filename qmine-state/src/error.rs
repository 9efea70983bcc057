//! Error types for quantum register operations

use thiserror::Error;

/// Errors that can occur while manipulating a quantum register
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    /// Invalid qubit index
    #[error("Invalid qubit index {index} for {num_qubits}-qubit state")]
    InvalidQubitIndex { index: usize, num_qubits: usize },

    /// The same qubit was named twice in one operation
    #[error("Qubit {index} used twice in one operation")]
    DuplicateQubit { index: usize },

    /// Zero-qubit registers are not representable
    #[error("A register needs at least one qubit")]
    EmptyRegister,

    /// Dense representation would not fit in memory
    #[error("{num_qubits} qubits exceed the dense limit of {max}")]
    TooManyQubits { num_qubits: usize, max: usize },

    /// Gate arity does not match the number of qubits supplied
    #[error("Gate '{gate}' acts on {expected} qubits, got {actual}")]
    ArityMismatch {
        gate: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Pauli string length does not match the register
    #[error("Pauli string has length {actual}, register has {expected} qubits")]
    PauliLength { expected: usize, actual: usize },

    /// A deserialized register does not have the shape its header claims
    #[error("Malformed register: {0}")]
    Malformed(String),

    /// A measurement branch with vanishing probability was selected
    #[error("Measurement collapsed onto a branch with norm {norm}")]
    DegenerateOutcome { norm: f64 },
}

impl StateError {
    /// Create an invalid qubit index error
    pub fn invalid_qubit(index: usize, num_qubits: usize) -> Self {
        Self::InvalidQubitIndex { index, num_qubits }
    }
}

/// Result type for register operations
pub type Result<T> = std::result::Result<T, StateError>;
