//! Core types for the quantum minesweeper engine
//!
//! This crate provides the vocabulary shared by every other `qmine` crate:
//! - [`QubitId`]: Type-safe qubit addressing
//! - [`CliffordGate`]: The closed set of gates a board can be manipulated with
//! - [`GateOp`]: A gate bound to concrete qubits
//! - [`Circuit`]: A recorded gate sequence (used to replay board preparation)
//! - [`Pauli`] / [`PauliString`]: Pauli operators for expectation values
//!
//! # Example
//! ```
//! use qmine_core::{Circuit, CliffordGate};
//!
//! let mut bell = Circuit::new(2).unwrap();
//! bell.push(CliffordGate::H, &[0]).unwrap();
//! bell.push(CliffordGate::CX, &[0, 1]).unwrap();
//! assert_eq!(bell.two_qubit_count(), 1);
//! ```

pub mod circuit;
pub mod error;
pub mod gate;
pub mod pauli;
pub mod qubit;

// Re-exports for convenience
pub use circuit::Circuit;
pub use error::QuantumError;
pub use gate::{CliffordGate, GateOp};
pub use pauli::{Pauli, PauliString};
pub use qubit::QubitId;

/// Type alias for results in qmine-core
pub type Result<T> = std::result::Result<T, QuantumError>;
