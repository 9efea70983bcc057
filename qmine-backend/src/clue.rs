//! Clue readouts over a neighbour set
//!
//! A clue is the value of `C = Σ_j (I - Z_j)/2` over the neighbours `j` of a
//! cell. Three readouts are supported:
//!
//! - **Projective**: each neighbour is measured in Z in ascending qubit order
//!   and the outcomes are summed. The state collapses onto the measured
//!   sector.
//! - **Expectation**: `Σ_j (1 - ⟨P_j⟩)/2` for a chosen basis `P` (Z by
//!   default, giving `Σ_j p_mine(j)`). Never mutates the state.
//! - **Weak**: see [`WeakMeasurement`].

use crate::backend::{QuantumBackend, RandomSource};
use crate::{BackendError, Result};
use qmine_core::{Pauli, QubitId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

/// Mine probabilities at or below this count as exactly zero
pub const ZERO_TOLERANCE: f64 = 1e-6;

/// Parameters of the weak clue readout
///
/// With strength `s` and noise `σ`:
///
/// 1. One uniform draw `u`. If `u < s` the neighbours are read projectively
///    (collapse), otherwise the state is left alone. Averaged over runs the
///    back-action is `(1-s)·ρ + s·D(ρ)` with `D` full dephasing in the
///    mine-number basis.
/// 2. The centre value is the projective count when collapsed, the
///    expectation sum otherwise.
/// 3. Gaussian noise with standard deviation `(1-s)·σ` is added (Box-Muller,
///    two further draws, skipped when the deviation is zero) and the result
///    is clamped to `[0, |N|]`.
///
/// `s = 1` is the projective readout without noise and `s = 0` never
/// disturbs the state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeakMeasurement {
    /// Collapse probability `s ∈ [0, 1]`
    pub strength: f64,
    /// Pointer noise scale `σ ≥ 0`
    pub noise: f64,
}

impl Default for WeakMeasurement {
    fn default() -> Self {
        Self {
            strength: 0.5,
            noise: 0.5,
        }
    }
}

impl WeakMeasurement {
    /// Create weak-measurement parameters
    pub fn new(strength: f64, noise: f64) -> Self {
        Self { strength, noise }
    }

    /// Reject strengths outside `[0, 1]` and negative or non-finite noise
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.strength) {
            return Err(BackendError::InvalidConfiguration(format!(
                "weak measurement strength {} outside [0, 1]",
                self.strength
            )));
        }
        if !self.noise.is_finite() || self.noise < 0.0 {
            return Err(BackendError::InvalidConfiguration(format!(
                "weak measurement noise {} must be a finite non-negative number",
                self.noise
            )));
        }
        Ok(())
    }

    /// Standard deviation of the added noise, `(1-s)·σ`
    pub fn noise_std(&self) -> f64 {
        (1.0 - self.strength) * self.noise
    }
}

/// How a clue is read out
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ClueReadout {
    /// Integer count through successive Z measurements
    Projective,
    /// Noisy partial readout
    Weak(WeakMeasurement),
    /// Expectation sum in the given single-qubit basis, no back-action
    Expectation {
        /// Basis each neighbour is read in
        basis: Pauli,
    },
}

impl Default for ClueReadout {
    fn default() -> Self {
        ClueReadout::Projective
    }
}

/// Value returned by a clue readout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClueReading {
    /// Clue value in `[0, |N|]`
    pub value: f64,
    /// Whether `value` is an exact integer count
    pub exact: bool,
    /// Whether the readout collapsed the neighbours
    pub collapsed: bool,
    /// Whether, after the readout, every neighbour is certainly mine-free
    pub resolves_to_zero: bool,
}

/// Sorted, de-duplicated copy of a neighbour list
fn ascending(qubits: &[QubitId]) -> SmallVec<[QubitId; 8]> {
    let mut ordered: SmallVec<[QubitId; 8]> = SmallVec::from_slice(qubits);
    ordered.sort_unstable();
    ordered.dedup();
    ordered
}

fn projective_count<B: QuantumBackend + ?Sized>(
    backend: &B,
    state: &mut B::State,
    qubits: &[QubitId],
    rng: &mut RandomSource<'_>,
) -> Result<u32> {
    let mut count = 0;
    for &q in qubits {
        count += u32::from(backend.measure_z(state, q, rng)?.outcome);
    }
    Ok(count)
}

fn expectation_sum<B: QuantumBackend + ?Sized>(
    backend: &B,
    state: &B::State,
    qubits: &[QubitId],
    basis: Pauli,
) -> Result<f64> {
    let mut sum = 0.0;
    for &q in qubits {
        let e = backend.expectation_single(state, q, basis)?;
        sum += ((1.0 - e) / 2.0).clamp(0.0, 1.0);
    }
    Ok(sum)
}

fn mine_free<B: QuantumBackend + ?Sized>(
    backend: &B,
    state: &B::State,
    qubits: &[QubitId],
) -> Result<bool> {
    for &q in qubits {
        if backend.p_mine(state, q)? > ZERO_TOLERANCE {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Standard normal sample from two uniform draws
fn standard_normal(rng: &mut RandomSource<'_>) -> f64 {
    // 1 - u lies in (0, 1], keeping the logarithm finite
    let u1 = 1.0 - rng();
    let u2 = rng();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Read the clue of `qubits` with the given readout
///
/// This is the default body of [`QuantumBackend::clue_value`]; it only uses
/// the four primitive operations, so both engines share it.
///
/// # Errors
/// Propagates register errors; weak parameters are validated first
pub fn read_clue<B: QuantumBackend + ?Sized>(
    backend: &B,
    state: &mut B::State,
    qubits: &[QubitId],
    readout: &ClueReadout,
    rng: &mut RandomSource<'_>,
) -> Result<ClueReading> {
    let ordered = ascending(qubits);

    let reading = match *readout {
        ClueReadout::Projective => {
            let count = projective_count(backend, state, &ordered, rng)?;
            ClueReading {
                value: f64::from(count),
                exact: true,
                collapsed: true,
                resolves_to_zero: count == 0,
            }
        }
        ClueReadout::Expectation { basis } => ClueReading {
            value: expectation_sum(backend, state, &ordered, basis)?,
            exact: false,
            collapsed: false,
            resolves_to_zero: mine_free(backend, state, &ordered)?,
        },
        ClueReadout::Weak(weak) => {
            weak.validate()?;
            let collapsed = rng() < weak.strength;
            let centre = if collapsed {
                f64::from(projective_count(backend, state, &ordered, rng)?)
            } else {
                expectation_sum(backend, state, &ordered, Pauli::Z)?
            };
            let sigma = weak.noise_std();
            let noisy = if sigma > 0.0 {
                centre + sigma * standard_normal(rng)
            } else {
                centre
            };
            ClueReading {
                value: noisy.clamp(0.0, ordered.len() as f64),
                exact: collapsed && sigma == 0.0,
                collapsed,
                resolves_to_zero: mine_free(backend, state, &ordered)?,
            }
        }
    };

    debug!(
        backend = backend.name(),
        neighbours = ordered.len(),
        value = reading.value,
        collapsed = reading.collapsed,
        "clue read"
    );
    Ok(reading)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StabilizerBackend;
    use approx::assert_relative_eq;
    use qmine_core::CliffordGate;

    fn ids(raw: &[usize]) -> Vec<QubitId> {
        raw.iter().map(|&q| QubitId::new(q)).collect()
    }

    #[test]
    fn test_projective_counts_classical_mines() {
        let backend = StabilizerBackend::new();
        let mut state = backend.allocate(4).unwrap();
        for q in [1, 3] {
            backend
                .apply_unitary(&mut state, CliffordGate::X, &ids(&[q]))
                .unwrap();
        }
        let mut rng = || -> f64 { panic!("classical clue must not draw") };
        let reading = backend
            .clue_value(&mut state, &ids(&[3, 0, 1]), &ClueReadout::Projective, &mut rng)
            .unwrap();
        assert_eq!(reading.value, 2.0);
        assert!(reading.exact);
        assert!(!reading.resolves_to_zero);
    }

    #[test]
    fn test_projective_collapses_superposition() {
        let backend = StabilizerBackend::new();
        let mut state = backend.allocate(2).unwrap();
        backend
            .apply_unitary(&mut state, CliffordGate::H, &ids(&[0]))
            .unwrap();
        let mut rng = || 0.2;
        let reading = backend
            .clue_value(&mut state, &ids(&[0, 1]), &ClueReadout::Projective, &mut rng)
            .unwrap();
        assert_eq!(reading.value, 0.0);
        assert!(reading.resolves_to_zero);
        assert_eq!(backend.p_mine(&state, QubitId::new(0)).unwrap(), 0.0);
    }

    #[test]
    fn test_expectation_does_not_mutate() {
        let backend = StabilizerBackend::new();
        let mut state = backend.allocate(3).unwrap();
        backend
            .apply_unitary(&mut state, CliffordGate::H, &ids(&[0]))
            .unwrap();
        backend
            .apply_unitary(&mut state, CliffordGate::X, &ids(&[2]))
            .unwrap();
        let before = state.clone();
        let mut rng = || -> f64 { panic!("expectation readout must not draw") };
        let readout = ClueReadout::Expectation { basis: Pauli::Z };
        let reading = backend
            .clue_value(&mut state, &ids(&[0, 1, 2]), &readout, &mut rng)
            .unwrap();
        assert_relative_eq!(reading.value, 1.5);
        assert!(!reading.resolves_to_zero);
        assert_eq!(state, before);
    }

    #[test]
    fn test_expectation_in_x_basis() {
        let backend = StabilizerBackend::new();
        let mut state = backend.allocate(2).unwrap();
        backend
            .apply_unitary(&mut state, CliffordGate::H, &ids(&[0]))
            .unwrap();
        let mut rng = || 0.0;
        let readout = ClueReadout::Expectation { basis: Pauli::X };
        let reading = backend
            .clue_value(&mut state, &ids(&[0, 1]), &readout, &mut rng)
            .unwrap();
        // |+⟩ reads 0 in X, |0⟩ reads 1/2
        assert_relative_eq!(reading.value, 0.5);
    }

    #[test]
    fn test_weak_zero_strength_never_disturbs() {
        let backend = StabilizerBackend::new();
        let mut state = backend.allocate(1).unwrap();
        backend
            .apply_unitary(&mut state, CliffordGate::H, &ids(&[0]))
            .unwrap();
        let before = state.clone();
        let mut draws = [0.0, 0.5, 0.25].into_iter();
        let mut rng = || draws.next().unwrap();
        let readout = ClueReadout::Weak(WeakMeasurement::new(0.0, 0.0));
        let reading = backend
            .clue_value(&mut state, &ids(&[0]), &readout, &mut rng)
            .unwrap();
        assert!(!reading.collapsed);
        assert_relative_eq!(reading.value, 0.5);
        assert_eq!(state, before);
    }

    #[test]
    fn test_weak_full_strength_is_projective() {
        let backend = StabilizerBackend::new();
        let mut state = backend.allocate(1).unwrap();
        backend
            .apply_unitary(&mut state, CliffordGate::H, &ids(&[0]))
            .unwrap();
        // collapse decision, then the measurement draw
        let mut draws = [0.3, 0.9].into_iter();
        let mut rng = || draws.next().unwrap();
        let readout = ClueReadout::Weak(WeakMeasurement::new(1.0, 3.0));
        let reading = backend
            .clue_value(&mut state, &ids(&[0]), &readout, &mut rng)
            .unwrap();
        assert!(reading.collapsed);
        assert!(reading.exact);
        assert_eq!(reading.value, 1.0);
        assert_eq!(backend.p_mine(&state, QubitId::new(0)).unwrap(), 1.0);
    }

    #[test]
    fn test_weak_noise_is_clamped() {
        let backend = StabilizerBackend::new();
        let mut state = backend.allocate(2).unwrap();
        // no collapse, then a large Box-Muller radius
        let mut draws = [0.9, 0.999, 0.5].into_iter();
        let mut rng = || draws.next().unwrap();
        let readout = ClueReadout::Weak(WeakMeasurement::new(0.1, 10.0));
        let reading = backend
            .clue_value(&mut state, &ids(&[0, 1]), &readout, &mut rng)
            .unwrap();
        // cos(π) = -1 pushes far below zero
        assert_eq!(reading.value, 0.0);
        assert!(reading.resolves_to_zero);
    }

    #[test]
    fn test_weak_rejects_bad_parameters() {
        let backend = StabilizerBackend::new();
        let mut state = backend.allocate(1).unwrap();
        let mut rng = || 0.5;
        let readout = ClueReadout::Weak(WeakMeasurement::new(1.5, 0.0));
        assert!(matches!(
            backend.clue_value(&mut state, &ids(&[0]), &readout, &mut rng),
            Err(BackendError::InvalidConfiguration(_))
        ));
    }
}
