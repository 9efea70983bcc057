//! Dense state-vector backend
//!
//! The general-purpose engine: every gate is applied as an explicit unitary
//! from `qmine-gates`, measurements collapse the amplitude vector. Memory
//! grows as `2^n`, so the register size is capped by
//! [`StateVectorConfig::max_qubits`].

use crate::backend::{indices, BackendKind, QuantumBackend, RandomSource};
use crate::{BackendCapabilities, BackendError, GateSet, Result};
use qmine_core::{CliffordGate, PauliString, QubitId};
use qmine_gates::{gate_matrix, GateMatrix};
use qmine_state::{DenseState, MeasurementOutcome, MAX_DENSE_QUBITS};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Configuration for the state-vector backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateVectorConfig {
    /// Maximum number of qubits (default: 20, 16 MiB of amplitudes)
    pub max_qubits: usize,

    /// Gates this instance accepts
    pub supported_gates: GateSet,
}

impl Default for StateVectorConfig {
    fn default() -> Self {
        Self {
            max_qubits: 20,
            supported_gates: GateSet::all(),
        }
    }
}

impl StateVectorConfig {
    /// Create a default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the qubit limit
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Restrict the accepted gates
    pub fn with_supported_gates(mut self, gates: GateSet) -> Self {
        self.supported_gates = gates;
        self
    }

    /// Check the limit is representable
    pub fn validate(&self) -> Result<()> {
        if self.max_qubits == 0 || self.max_qubits > MAX_DENSE_QUBITS {
            return Err(BackendError::InvalidConfiguration(format!(
                "max_qubits must be in 1..={}, got {}",
                MAX_DENSE_QUBITS, self.max_qubits
            )));
        }
        Ok(())
    }
}

/// General Clifford-capable dense simulator
#[derive(Debug, Clone, PartialEq)]
pub struct StateVectorBackend {
    config: StateVectorConfig,
    capabilities: BackendCapabilities,
}

impl StateVectorBackend {
    /// Create a backend with default configuration
    pub fn new() -> Self {
        Self::from_parts(StateVectorConfig::default())
    }

    /// Create a backend with custom configuration
    ///
    /// # Errors
    /// Returns [`BackendError::InvalidConfiguration`] if the limit is out of
    /// range
    pub fn with_config(config: StateVectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config))
    }

    fn from_parts(config: StateVectorConfig) -> Self {
        let capabilities = BackendCapabilities {
            max_qubits: config.max_qubits,
            supported_gates: config.supported_gates,
            exact_expectations: false,
        };
        Self {
            config,
            capabilities,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &StateVectorConfig {
        &self.config
    }
}

impl Default for StateVectorBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl QuantumBackend for StateVectorBackend {
    type State = DenseState;

    fn kind(&self) -> BackendKind {
        BackendKind::StateVector
    }

    fn capabilities(&self) -> &BackendCapabilities {
        &self.capabilities
    }

    fn allocate(&self, num_qubits: usize) -> Result<DenseState> {
        self.capabilities.check_qubits(num_qubits)?;
        Ok(DenseState::new(num_qubits)?)
    }

    fn num_qubits(&self, state: &DenseState) -> usize {
        state.num_qubits()
    }

    fn apply_unitary(
        &self,
        state: &mut DenseState,
        gate: CliffordGate,
        qubits: &[QubitId],
    ) -> Result<()> {
        self.validate_gate(gate)?;
        let raw = indices(qubits);
        match (gate_matrix(gate), raw.as_slice()) {
            (GateMatrix::Single(m), &[q]) => state.apply_single_qubit_gate(m, q)?,
            (GateMatrix::Two(m), &[a, b]) => state.apply_two_qubit_gate(m, a, b)?,
            _ => {
                return Err(qmine_core::QuantumError::invalid_qubit_count(
                    gate.name(),
                    gate.num_qubits(),
                    qubits.len(),
                )
                .into())
            }
        }
        trace!(%gate, ?qubits, "dense gate");
        Ok(())
    }

    fn measure_z(
        &self,
        state: &mut DenseState,
        qubit: QubitId,
        rng: &mut RandomSource<'_>,
    ) -> Result<MeasurementOutcome> {
        let outcome = state.measure_z(qubit.index(), rng)?;
        debug!(
            qubit = qubit.index(),
            outcome = outcome.outcome,
            deterministic = outcome.deterministic,
            "dense measurement"
        );
        Ok(outcome)
    }

    fn expectation_z(&self, state: &DenseState, qubit: QubitId) -> Result<f64> {
        Ok(state.expectation_z(qubit.index())?)
    }

    fn expectation_pauli(&self, state: &DenseState, pauli: &PauliString) -> Result<f64> {
        Ok(state.expectation_pauli(pauli)?)
    }
}
