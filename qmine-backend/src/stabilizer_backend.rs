//! Tableau-backed backend

use crate::backend::{indices, BackendKind, QuantumBackend, RandomSource};
use crate::{BackendCapabilities, Result};
use qmine_core::{CliffordGate, PauliString, QubitId};
use qmine_state::{MeasurementOutcome, StabilizerState};
use tracing::{debug, trace};

/// Fast dedicated stabilizer engine
///
/// Gates cost `O(n)` and measurements `O(n²)`, so full-size boards are
/// cheap. Expectation values are exactly `-1`, `0` or `+1`.
#[derive(Debug, Clone, PartialEq)]
pub struct StabilizerBackend {
    capabilities: BackendCapabilities,
}

impl StabilizerBackend {
    /// Create a stabilizer backend supporting the whole gate set
    pub fn new() -> Self {
        Self {
            capabilities: BackendCapabilities::stabilizer(),
        }
    }
}

impl Default for StabilizerBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl QuantumBackend for StabilizerBackend {
    type State = StabilizerState;

    fn kind(&self) -> BackendKind {
        BackendKind::Stabilizer
    }

    fn capabilities(&self) -> &BackendCapabilities {
        &self.capabilities
    }

    fn allocate(&self, num_qubits: usize) -> Result<StabilizerState> {
        self.capabilities.check_qubits(num_qubits)?;
        Ok(StabilizerState::new(num_qubits)?)
    }

    fn num_qubits(&self, state: &StabilizerState) -> usize {
        state.num_qubits()
    }

    fn apply_unitary(
        &self,
        state: &mut StabilizerState,
        gate: CliffordGate,
        qubits: &[QubitId],
    ) -> Result<()> {
        self.validate_gate(gate)?;
        state.apply_gate(gate, &indices(qubits))?;
        trace!(%gate, ?qubits, "tableau gate");
        Ok(())
    }

    fn measure_z(
        &self,
        state: &mut StabilizerState,
        qubit: QubitId,
        rng: &mut RandomSource<'_>,
    ) -> Result<MeasurementOutcome> {
        let outcome = state.measure_z(qubit.index(), rng)?;
        debug!(
            qubit = qubit.index(),
            outcome = outcome.outcome,
            deterministic = outcome.deterministic,
            "tableau measurement"
        );
        Ok(outcome)
    }

    fn expectation_z(&self, state: &StabilizerState, qubit: QubitId) -> Result<f64> {
        Ok(state.expectation_z(qubit.index())?)
    }

    fn expectation_pauli(&self, state: &StabilizerState, pauli: &PauliString) -> Result<f64> {
        Ok(state.expectation_pauli(pauli)?)
    }
}
