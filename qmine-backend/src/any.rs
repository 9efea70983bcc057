//! Runtime selection between the two engines

use crate::backend::{BackendKind, QuantumBackend, RandomSource};
use crate::{
    BackendCapabilities, BackendError, Result, StabilizerBackend, StateVectorBackend,
    StateVectorConfig,
};
use qmine_core::{CliffordGate, PauliString, QubitId};
use qmine_state::{DenseState, MeasurementOutcome, StabilizerState};
use serde::{Deserialize, Serialize};

/// Either backend, chosen when a game is configured
#[derive(Debug, Clone, PartialEq)]
pub enum AnyBackend {
    /// Tableau engine
    Stabilizer(StabilizerBackend),
    /// Dense engine
    StateVector(StateVectorBackend),
}

/// Register produced by an [`AnyBackend`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BackendState {
    /// Tableau register
    Stabilizer(StabilizerState),
    /// Amplitude register
    StateVector(DenseState),
}

impl BackendState {
    /// Engine the register belongs to
    pub fn kind(&self) -> BackendKind {
        match self {
            BackendState::Stabilizer(_) => BackendKind::Stabilizer,
            BackendState::StateVector(_) => BackendKind::StateVector,
        }
    }
}

impl AnyBackend {
    /// Default-configured backend of the given kind
    pub fn from_kind(kind: BackendKind) -> Self {
        match kind {
            BackendKind::Stabilizer => AnyBackend::Stabilizer(StabilizerBackend::new()),
            BackendKind::StateVector => AnyBackend::StateVector(StateVectorBackend::new()),
        }
    }

    /// State-vector backend with a custom configuration
    pub fn state_vector(config: StateVectorConfig) -> Result<Self> {
        Ok(AnyBackend::StateVector(StateVectorBackend::with_config(
            config,
        )?))
    }

    fn mismatch(&self, state: &BackendState) -> BackendError {
        BackendError::StateMismatch {
            expected: self.kind().name(),
            actual: state.kind().name(),
        }
    }
}

impl Default for AnyBackend {
    fn default() -> Self {
        AnyBackend::from_kind(BackendKind::default())
    }
}

impl QuantumBackend for AnyBackend {
    type State = BackendState;

    fn kind(&self) -> BackendKind {
        match self {
            AnyBackend::Stabilizer(b) => b.kind(),
            AnyBackend::StateVector(b) => b.kind(),
        }
    }

    fn capabilities(&self) -> &BackendCapabilities {
        match self {
            AnyBackend::Stabilizer(b) => b.capabilities(),
            AnyBackend::StateVector(b) => b.capabilities(),
        }
    }

    fn allocate(&self, num_qubits: usize) -> Result<BackendState> {
        Ok(match self {
            AnyBackend::Stabilizer(b) => BackendState::Stabilizer(b.allocate(num_qubits)?),
            AnyBackend::StateVector(b) => BackendState::StateVector(b.allocate(num_qubits)?),
        })
    }

    fn num_qubits(&self, state: &BackendState) -> usize {
        match state {
            BackendState::Stabilizer(s) => s.num_qubits(),
            BackendState::StateVector(s) => s.num_qubits(),
        }
    }

    fn apply_unitary(
        &self,
        state: &mut BackendState,
        gate: CliffordGate,
        qubits: &[QubitId],
    ) -> Result<()> {
        match (self, state) {
            (AnyBackend::Stabilizer(b), BackendState::Stabilizer(s)) => {
                b.apply_unitary(s, gate, qubits)
            }
            (AnyBackend::StateVector(b), BackendState::StateVector(s)) => {
                b.apply_unitary(s, gate, qubits)
            }
            (_, state) => Err(self.mismatch(state)),
        }
    }

    fn measure_z(
        &self,
        state: &mut BackendState,
        qubit: QubitId,
        rng: &mut RandomSource<'_>,
    ) -> Result<MeasurementOutcome> {
        match (self, state) {
            (AnyBackend::Stabilizer(b), BackendState::Stabilizer(s)) => b.measure_z(s, qubit, rng),
            (AnyBackend::StateVector(b), BackendState::StateVector(s)) => {
                b.measure_z(s, qubit, rng)
            }
            (_, state) => Err(self.mismatch(state)),
        }
    }

    fn expectation_z(&self, state: &BackendState, qubit: QubitId) -> Result<f64> {
        match (self, state) {
            (AnyBackend::Stabilizer(b), BackendState::Stabilizer(s)) => b.expectation_z(s, qubit),
            (AnyBackend::StateVector(b), BackendState::StateVector(s)) => {
                b.expectation_z(s, qubit)
            }
            (_, state) => Err(self.mismatch(state)),
        }
    }

    fn expectation_pauli(&self, state: &BackendState, pauli: &PauliString) -> Result<f64> {
        match (self, state) {
            (AnyBackend::Stabilizer(b), BackendState::Stabilizer(s)) => {
                b.expectation_pauli(s, pauli)
            }
            (AnyBackend::StateVector(b), BackendState::StateVector(s)) => {
                b.expectation_pauli(s, pauli)
            }
            (_, state) => Err(self.mismatch(state)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_kind() {
        for kind in [BackendKind::Stabilizer, BackendKind::StateVector] {
            let backend = AnyBackend::from_kind(kind);
            assert_eq!(backend.kind(), kind);
            let state = backend.allocate(3).unwrap();
            assert_eq!(state.kind(), kind);
            assert_eq!(backend.num_qubits(&state), 3);
        }
    }

    #[test]
    fn test_mismatched_register_rejected() {
        let stab = AnyBackend::from_kind(BackendKind::Stabilizer);
        let dense = AnyBackend::from_kind(BackendKind::StateVector);
        let mut foreign = dense.allocate(2).unwrap();
        let err = stab
            .apply_unitary(&mut foreign, CliffordGate::X, &[QubitId::new(0)])
            .unwrap_err();
        assert_eq!(
            err,
            BackendError::StateMismatch {
                expected: "stabilizer",
                actual: "state-vector"
            }
        );
    }

    #[test]
    fn test_backend_state_serde() {
        let backend = AnyBackend::default();
        let mut state = backend.allocate(2).unwrap();
        backend
            .apply_unitary(&mut state, CliffordGate::H, &[QubitId::new(1)])
            .unwrap();
        let json = serde_json::to_string(&state).unwrap();
        let back: BackendState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
