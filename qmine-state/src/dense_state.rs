//! Dense state-vector representation
//!
//! Holds all `2^n` amplitudes. Qubit `q` corresponds to bit `q` of the basis
//! index. This is the general-purpose engine: it does not exploit the
//! stabilizer structure and is therefore limited to small registers.

use crate::error::{Result, StateError};
use crate::measurement::{select_outcome, MeasurementOutcome};
use num_complex::Complex64;
use qmine_core::{Pauli, PauliString};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest register [`DenseState::new`] will allocate
pub const MAX_DENSE_QUBITS: usize = 24;

/// Dense quantum state
///
/// # Example
///
/// ```
/// use qmine_gates::matrices;
/// use qmine_state::DenseState;
///
/// let mut state = DenseState::new(2).unwrap();
/// state.apply_single_qubit_gate(&matrices::HADAMARD, 0).unwrap();
/// state.apply_two_qubit_gate(&matrices::CNOT, 0, 1).unwrap();
///
/// assert_eq!(state.num_qubits(), 2);
/// assert!(state.is_normalized(1e-10));
/// assert!(state.expectation_z(1).unwrap().abs() < 1e-12);
/// ```
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AmplitudesRepr")]
pub struct DenseState {
    num_qubits: usize,
    amplitudes: Vec<Complex64>,
}

/// Unchecked wire form of a [`DenseState`]
#[derive(Deserialize)]
struct AmplitudesRepr {
    num_qubits: usize,
    amplitudes: Vec<Complex64>,
}

/// Largest norm drift accepted when loading amplitudes
const LOAD_NORM_TOLERANCE: f64 = 1e-6;

impl TryFrom<AmplitudesRepr> for DenseState {
    type Error = StateError;

    fn try_from(repr: AmplitudesRepr) -> Result<Self> {
        if repr.num_qubits == 0 {
            return Err(StateError::EmptyRegister);
        }
        if repr.num_qubits > MAX_DENSE_QUBITS {
            return Err(StateError::TooManyQubits {
                num_qubits: repr.num_qubits,
                max: MAX_DENSE_QUBITS,
            });
        }
        if repr.amplitudes.len() != 1 << repr.num_qubits {
            return Err(StateError::Malformed(format!(
                "{} amplitudes for {} qubits",
                repr.amplitudes.len(),
                repr.num_qubits
            )));
        }
        let state = Self {
            num_qubits: repr.num_qubits,
            amplitudes: repr.amplitudes,
        };
        if !state.is_normalized(LOAD_NORM_TOLERANCE) {
            return Err(StateError::Malformed(format!(
                "amplitudes have squared norm {}",
                state.norm_sqr()
            )));
        }
        Ok(state)
    }
}

impl DenseState {
    /// Create a new dense state initialized to |0...0⟩
    ///
    /// # Arguments
    /// * `num_qubits` - Number of qubits
    ///
    /// # Errors
    /// Returns error if the register is empty or larger than
    /// [`MAX_DENSE_QUBITS`]
    pub fn new(num_qubits: usize) -> Result<Self> {
        if num_qubits == 0 {
            return Err(StateError::EmptyRegister);
        }
        if num_qubits > MAX_DENSE_QUBITS {
            return Err(StateError::TooManyQubits {
                num_qubits,
                max: MAX_DENSE_QUBITS,
            });
        }
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Ok(Self {
            num_qubits,
            amplitudes,
        })
    }

    /// Get the number of qubits
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Get the state dimension (2^num_qubits)
    #[inline]
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    /// Read-only access to the amplitudes
    #[inline]
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Squared norm of the state
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Check if the state is normalized within `epsilon`
    pub fn is_normalized(&self, epsilon: f64) -> bool {
        (self.norm_sqr() - 1.0).abs() < epsilon
    }

    /// Return to |0...0⟩
    pub fn reset(&mut self) {
        self.amplitudes.fill(Complex64::new(0.0, 0.0));
        self.amplitudes[0] = Complex64::new(1.0, 0.0);
    }

    fn check_qubit(&self, qubit: usize) -> Result<()> {
        if qubit >= self.num_qubits {
            return Err(StateError::invalid_qubit(qubit, self.num_qubits));
        }
        Ok(())
    }

    /// Apply a 2x2 unitary to `qubit`
    ///
    /// # Errors
    /// Returns error if qubit index is invalid
    pub fn apply_single_qubit_gate(
        &mut self,
        matrix: &[[Complex64; 2]; 2],
        qubit: usize,
    ) -> Result<()> {
        self.check_qubit(qubit)?;
        let mask = 1usize << qubit;
        for i0 in 0..self.dimension() {
            if i0 & mask != 0 {
                continue;
            }
            let i1 = i0 | mask;
            let a0 = self.amplitudes[i0];
            let a1 = self.amplitudes[i1];
            self.amplitudes[i0] = matrix[0][0] * a0 + matrix[0][1] * a1;
            self.amplitudes[i1] = matrix[1][0] * a0 + matrix[1][1] * a1;
        }
        Ok(())
    }

    /// Apply a 4x4 unitary to `(first, second)`
    ///
    /// The matrix is indexed by `2 * bit(first) + bit(second)`, so for
    /// controlled gates `first` is the control.
    ///
    /// # Errors
    /// Returns error if either index is invalid or both are equal
    pub fn apply_two_qubit_gate(
        &mut self,
        matrix: &[[Complex64; 4]; 4],
        first: usize,
        second: usize,
    ) -> Result<()> {
        self.check_qubit(first)?;
        self.check_qubit(second)?;
        if first == second {
            return Err(StateError::DuplicateQubit { index: first });
        }
        let m_first = 1usize << first;
        let m_second = 1usize << second;
        for base in 0..self.dimension() {
            if base & (m_first | m_second) != 0 {
                continue;
            }
            let idx = [base, base | m_second, base | m_first, base | m_first | m_second];
            let old = idx.map(|i| self.amplitudes[i]);
            for (row, &target) in idx.iter().enumerate() {
                self.amplitudes[target] = (0..4).map(|col| matrix[row][col] * old[col]).sum();
            }
        }
        Ok(())
    }

    /// Probability of reading `0` on `qubit`
    pub fn probability_zero(&self, qubit: usize) -> Result<f64> {
        self.check_qubit(qubit)?;
        let mask = 1usize << qubit;
        Ok(self
            .amplitudes
            .iter()
            .enumerate()
            .filter(|(idx, _)| idx & mask == 0)
            .map(|(_, amp)| amp.norm_sqr())
            .sum())
    }

    /// Projective Z measurement of `qubit`, collapsing the state
    ///
    /// Certain outcomes do not call `rng`; otherwise one draw `u` decides
    /// the outcome (`0` iff `u < P(0)`).
    ///
    /// # Errors
    /// Returns error if qubit index is invalid
    pub fn measure_z(
        &mut self,
        qubit: usize,
        rng: &mut dyn FnMut() -> f64,
    ) -> Result<MeasurementOutcome> {
        let prob_zero = self.probability_zero(qubit)?;
        let outcome = select_outcome(prob_zero, rng);

        let branch = if outcome.outcome == 0 {
            prob_zero
        } else {
            1.0 - prob_zero
        };
        let norm = branch.sqrt();
        if norm < 1e-10 {
            return Err(StateError::DegenerateOutcome { norm });
        }

        let inv_norm = 1.0 / norm;
        for (idx, amp) in self.amplitudes.iter_mut().enumerate() {
            if ((idx >> qubit) & 1) as u8 != outcome.outcome {
                *amp = Complex64::new(0.0, 0.0);
            } else {
                *amp *= inv_norm;
            }
        }
        Ok(outcome)
    }

    /// `⟨Z_qubit⟩`
    pub fn expectation_z(&self, qubit: usize) -> Result<f64> {
        Ok(2.0 * self.probability_zero(qubit)? - 1.0)
    }

    /// Expectation of a Pauli string, `⟨ψ|P|ψ⟩`
    ///
    /// `P|b⟩ = i^{#Y} (-1)^{popcount(b & zmask)} |b ⊕ xmask⟩` where `xmask`
    /// covers X and Y factors and `zmask` covers Z and Y factors.
    ///
    /// # Errors
    /// Returns [`StateError::PauliLength`] on a length mismatch
    pub fn expectation_pauli(&self, pauli: &PauliString) -> Result<f64> {
        if pauli.num_qubits() != self.num_qubits {
            return Err(StateError::PauliLength {
                expected: self.num_qubits,
                actual: pauli.num_qubits(),
            });
        }
        let mut xmask = 0usize;
        let mut zmask = 0usize;
        let mut y_count = 0u32;
        for (q, p) in pauli.support() {
            let (x, z) = p.xz_bits();
            if x {
                xmask |= 1 << q;
            }
            if z {
                zmask |= 1 << q;
            }
            if p == Pauli::Y {
                y_count += 1;
            }
        }
        let global = Complex64::i().powu(y_count);

        let mut total = Complex64::new(0.0, 0.0);
        for (b, amp) in self.amplitudes.iter().enumerate() {
            let sign = if (b & zmask).count_ones() % 2 == 1 {
                -1.0
            } else {
                1.0
            };
            total += self.amplitudes[b ^ xmask].conj() * *amp * sign;
        }
        Ok((global * total).re)
    }
}

impl fmt::Debug for DenseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DenseState")
            .field("num_qubits", &self.num_qubits)
            .field("dimension", &self.dimension())
            .finish()
    }
}
