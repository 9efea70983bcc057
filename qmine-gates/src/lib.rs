//! Unitary matrices for the qmine Clifford gate set
//!
//! The dense state-vector backend needs explicit matrices; the stabilizer
//! backend never touches this crate. All matrices are `const` so looking one
//! up costs nothing at runtime.
//!
//! # Example
//!
//! ```
//! use qmine_core::CliffordGate;
//! use qmine_gates::{matrices, single_qubit_matrix};
//!
//! let h = single_qubit_matrix(CliffordGate::H).unwrap();
//! assert_eq!(h, &matrices::HADAMARD);
//! ```

pub mod matrices;
pub mod standard;

pub use standard::{gate_matrix, single_qubit_matrix, two_qubit_matrix, GateMatrix};
