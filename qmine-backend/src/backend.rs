//! Core backend trait and types

use crate::clue::{read_clue, ClueReadout, ClueReading};
use crate::{BackendCapabilities, BackendError, Result};
use qmine_core::{Circuit, CliffordGate, Pauli, PauliString, QubitId};
use qmine_state::MeasurementOutcome;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Uniform random source on `[0, 1)` threaded into every measurement
pub type RandomSource<'a> = dyn FnMut() -> f64 + 'a;

/// Uniform contract over the two simulation engines
///
/// A backend is a stateless strategy: the register it operates on is owned by
/// the caller and passed in by reference. Implementations must agree on every
/// observable: the same gate/measurement sequence with the same random draws
/// yields the same outcomes and the same expectation values.
///
/// # Example
///
/// ```
/// use qmine_backend::{QuantumBackend, StabilizerBackend};
/// use qmine_core::{CliffordGate, QubitId};
///
/// let backend = StabilizerBackend::new();
/// let mut register = backend.allocate(2).unwrap();
/// backend.apply_unitary(&mut register, CliffordGate::X, &[QubitId::new(0)]).unwrap();
/// assert_eq!(backend.p_mine(&register, QubitId::new(0)).unwrap(), 1.0);
/// ```
pub trait QuantumBackend {
    /// Register type this backend operates on
    type State: Clone + fmt::Debug;

    /// Which engine this is
    fn kind(&self) -> BackendKind;

    /// Get the backend name
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Get backend capabilities
    fn capabilities(&self) -> &BackendCapabilities;

    /// Create a register of `num_qubits` qubits in `|0...0⟩`
    fn allocate(&self, num_qubits: usize) -> Result<Self::State>;

    /// Number of qubits held by `state`
    fn num_qubits(&self, state: &Self::State) -> usize;

    /// Apply a one- or two-qubit Clifford gate
    ///
    /// # Errors
    /// [`BackendError::UnsupportedGate`] if the gate is outside
    /// [`BackendCapabilities::supported_gates`]; nothing is applied in that case
    fn apply_unitary(
        &self,
        state: &mut Self::State,
        gate: CliffordGate,
        qubits: &[QubitId],
    ) -> Result<()>;

    /// Projective Z measurement
    ///
    /// Determined outcomes do not call `rng`; random ones call it exactly
    /// once and read `0` iff the draw is below `P(0)`.
    fn measure_z(
        &self,
        state: &mut Self::State,
        qubit: QubitId,
        rng: &mut RandomSource<'_>,
    ) -> Result<MeasurementOutcome>;

    /// `⟨Z_qubit⟩` without touching the state
    fn expectation_z(&self, state: &Self::State, qubit: QubitId) -> Result<f64>;

    /// Expectation of an arbitrary Pauli string without touching the state
    fn expectation_pauli(&self, state: &Self::State, pauli: &PauliString) -> Result<f64>;

    /// Expectation of a single-qubit Pauli on `qubit`
    fn expectation_single(&self, state: &Self::State, qubit: QubitId, pauli: Pauli) -> Result<f64> {
        match pauli {
            Pauli::I => Ok(1.0),
            Pauli::Z => self.expectation_z(state, qubit),
            other => {
                let string = PauliString::single(self.num_qubits(state), qubit, other)?;
                self.expectation_pauli(state, &string)
            }
        }
    }

    /// Mine probability `(1 - ⟨Z⟩) / 2`, clamped to `[0, 1]`
    fn p_mine(&self, state: &Self::State, qubit: QubitId) -> Result<f64> {
        let ez = self.expectation_z(state, qubit)?;
        Ok(((1.0 - ez) / 2.0).clamp(0.0, 1.0))
    }

    /// Clue over a neighbour set
    ///
    /// See [`ClueReadout`] for the three readout modes.
    fn clue_value(
        &self,
        state: &mut Self::State,
        qubits: &[QubitId],
        readout: &ClueReadout,
        rng: &mut RandomSource<'_>,
    ) -> Result<ClueReading> {
        read_clue(self, state, qubits, readout, rng)
    }

    /// Fail with [`BackendError::UnsupportedGate`] unless `gate` is supported
    fn validate_gate(&self, gate: CliffordGate) -> Result<()> {
        if self.capabilities().supports_gate(gate) {
            Ok(())
        } else {
            Err(BackendError::UnsupportedGate {
                backend: self.name(),
                gate,
            })
        }
    }

    /// Apply every operation of `circuit` in order
    ///
    /// The whole circuit is checked against the supported gate set first, so
    /// an unsupported gate leaves the register untouched.
    fn run_circuit(&self, state: &mut Self::State, circuit: &Circuit) -> Result<()> {
        if circuit.num_qubits() > self.num_qubits(state) {
            return Err(BackendError::CapabilityExceeded(format!(
                "circuit spans {} qubits, register has {}",
                circuit.num_qubits(),
                self.num_qubits(state)
            )));
        }
        for op in circuit.operations() {
            self.validate_gate(op.gate())?;
        }
        for op in circuit.operations() {
            self.apply_unitary(state, op.gate(), op.qubits())?;
        }
        Ok(())
    }
}

/// Which simulation engine backs a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Aaronson-Gottesman tableau
    #[default]
    Stabilizer,
    /// Dense state vector
    StateVector,
}

impl BackendKind {
    /// Stable lower-case name
    pub const fn name(self) -> &'static str {
        match self {
            BackendKind::Stabilizer => "stabilizer",
            BackendKind::StateVector => "state-vector",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Convert board qubit ids to raw register indices
pub(crate) fn indices(qubits: &[QubitId]) -> smallvec::SmallVec<[usize; 2]> {
    qubits.iter().map(|q| q.index()).collect()
}
