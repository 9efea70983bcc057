//! Error types for qmine-core

use crate::QubitId;
use thiserror::Error;

/// Errors raised while building gate operations and circuits
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuantumError {
    /// Invalid qubit index used
    #[error("Invalid qubit index {0}: register has only {1} qubits")]
    InvalidQubit(usize, usize),

    /// Gate applied to wrong number of qubits
    #[error("Gate '{gate}' requires {expected} qubits, but {actual} were provided")]
    InvalidQubitCount {
        gate: String,
        expected: usize,
        actual: usize,
    },

    /// Register has no qubits
    #[error("Register must have at least one qubit")]
    EmptyRegister,

    /// Duplicate qubit in gate operation
    #[error("Duplicate qubit {0} in gate operation")]
    DuplicateQubit(QubitId),

    /// Gate name not part of the Clifford set
    #[error("Unknown gate '{0}'")]
    UnknownGate(String),

    /// Pauli label not one of I, X, Y, Z
    #[error("Invalid Pauli label '{0}'")]
    InvalidPauli(char),
}

impl QuantumError {
    /// Create an invalid qubit error
    pub fn invalid_qubit(qubit: usize, num_qubits: usize) -> Self {
        Self::InvalidQubit(qubit, num_qubits)
    }

    /// Create an invalid qubit count error
    pub fn invalid_qubit_count(gate: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::InvalidQubitCount {
            gate: gate.into(),
            expected,
            actual,
        }
    }
}
