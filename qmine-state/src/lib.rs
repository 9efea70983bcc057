//! Quantum register representations for the minesweeper board
//!
//! Two interchangeable ways to hold the joint state of every cell:
//!
//! - [`StabilizerState`]: Aaronson-Gottesman tableau, polynomial in the
//!   number of qubits, exact for Clifford circuits and Z measurements
//! - [`DenseState`]: full `2^n` amplitude vector, the general-purpose
//!   reference engine for small boards
//!
//! Both take their randomness as an injected `&mut dyn FnMut() -> f64` and
//! follow the same outcome rule (see [`measurement`]), so a recorded stream of
//! draws reproduces a game on either representation.
//!
//! # Example
//!
//! ```
//! use qmine_core::CliffordGate;
//! use qmine_state::StabilizerState;
//!
//! let mut state = StabilizerState::new(3).unwrap();
//! state.apply_gate(CliffordGate::X, &[1]).unwrap();
//!
//! let mut rng = || 0.5;
//! let m = state.measure_z(1, &mut rng).unwrap();
//! assert!(m.deterministic);
//! assert_eq!(m.outcome, 1);
//! ```

pub mod dense_state;
pub mod error;
pub mod measurement;
pub mod stabilizer;

pub use dense_state::{DenseState, MAX_DENSE_QUBITS};
pub use error::{Result, StateError};
pub use measurement::MeasurementOutcome;
pub use stabilizer::StabilizerState;
