//! Simulation backends for the quantum minesweeper engine
//!
//! This crate puts the two register representations from `qmine-state`
//! behind one contract:
//! - [`StabilizerBackend`]: fast dedicated tableau engine
//! - [`StateVectorBackend`]: general dense engine, small boards only
//! - [`AnyBackend`]: enum dispatch between the two, chosen at configuration time
//!
//! # Architecture
//!
//! Backends are stateless strategy objects implementing [`QuantumBackend`].
//! The register is an associated type owned by the caller; every primitive
//! takes it by reference. Randomness is injected per call as a
//! `&mut dyn FnMut() -> f64`, which is what lets a seeded game replay exactly
//! and lets both engines be driven by the same stream of draws.
//!
//! Clue readouts ([`ClueReadout`]) are built only from the primitive
//! operations, so the engines share one implementation.

pub mod any;
pub mod backend;
pub mod capabilities;
pub mod clue;
pub mod error;
pub mod random_clifford;
pub mod stabilizer_backend;
pub mod state_vector_backend;

pub use any::{AnyBackend, BackendState};
pub use backend::{BackendKind, QuantumBackend, RandomSource};
pub use capabilities::{BackendCapabilities, GateSet};
pub use clue::{read_clue, ClueReading, ClueReadout, WeakMeasurement, ZERO_TOLERANCE};
pub use error::{BackendError, Result};
pub use random_clifford::{leaves_all_zero, random_clifford_circuit, random_nontrivial_clifford};
pub use stabilizer_backend::StabilizerBackend;
pub use state_vector_backend::{StateVectorBackend, StateVectorConfig};
