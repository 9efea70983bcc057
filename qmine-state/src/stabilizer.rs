//! Aaronson-Gottesman stabilizer tableau
//!
//! An `n`-qubit stabilizer state is stored as `2n` Pauli rows: rows `0..n`
//! are destabilizers and rows `n..2n` are the stabilizer generators. Every
//! row is a pair of bit-packed `u64` vectors (X part and Z part) plus a sign
//! bit, laid out contiguously so a row is a slice of `words` words. A `Y` on
//! qubit `q` is represented by both bits set.
//!
//! Clifford gates update single columns of the tableau in `O(n)`. A Z
//! measurement is `O(n²)` in the worst case.

use crate::error::{Result, StateError};
use crate::measurement::{select_outcome, MeasurementOutcome};
use qmine_core::{CliffordGate, Pauli, PauliString};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Word index and bit mask of qubit `q` within a row
#[inline]
fn locate(q: usize) -> (usize, u64) {
    (q / 64, 1u64 << (q % 64))
}

/// Sum of the Aaronson-Gottesman `g` function over the 64 qubits of a word
///
/// `(x1, z1)` is the source row, `(x2, z2)` the row being multiplied into.
/// The result is the exponent of `i` picked up when the two Pauli products
/// are multiplied qubit by qubit.
#[inline]
fn phase_exponent(x1: u64, z1: u64, x2: u64, z2: u64) -> i32 {
    let src_x = x1 & !z1;
    let src_y = x1 & z1;
    let src_z = !x1 & z1;
    let dst_x = x2 & !z2;
    let dst_y = x2 & z2;
    let dst_z = !x2 & z2;

    let plus = (src_y & dst_z) | (src_x & dst_y) | (src_z & dst_x);
    let minus = (src_y & dst_x) | (src_x & dst_z) | (src_z & dst_y);
    plus.count_ones() as i32 - minus.count_ones() as i32
}

/// Running Pauli product used for read-only queries
struct PauliAccumulator {
    xs: Vec<u64>,
    zs: Vec<u64>,
    phase: i32,
}

impl PauliAccumulator {
    fn identity(words: usize) -> Self {
        Self {
            xs: vec![0; words],
            zs: vec![0; words],
            phase: 0,
        }
    }

    /// `self <- row * self`
    fn multiply(&mut self, xs: &[u64], zs: &[u64], sign: bool) {
        let mut exponent = 2 * i32::from(sign);
        for k in 0..self.xs.len() {
            exponent += phase_exponent(xs[k], zs[k], self.xs[k], self.zs[k]);
            self.xs[k] ^= xs[k];
            self.zs[k] ^= zs[k];
        }
        self.phase = (self.phase + exponent).rem_euclid(4);
    }

    fn is_negative(&self) -> bool {
        self.phase == 2
    }
}

/// Stabilizer state of an `n`-qubit register
///
/// # Example
///
/// ```
/// use qmine_core::CliffordGate;
/// use qmine_state::StabilizerState;
///
/// let mut state = StabilizerState::new(2).unwrap();
/// state.apply_gate(CliffordGate::H, &[0]).unwrap();
/// state.apply_gate(CliffordGate::CX, &[0, 1]).unwrap();
///
/// // Bell pair: both marginals are maximally uncertain, ZZ is fixed
/// assert_eq!(state.expectation_z(0).unwrap(), 0.0);
/// assert_eq!(state.expectation_pauli(&"ZZ".parse().unwrap()).unwrap(), 1.0);
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TableauRepr")]
pub struct StabilizerState {
    num_qubits: usize,
    words: usize,
    xs: Vec<u64>,
    zs: Vec<u64>,
    signs: Vec<bool>,
}

/// Unchecked wire form of a [`StabilizerState`]
#[derive(Deserialize)]
struct TableauRepr {
    num_qubits: usize,
    words: usize,
    xs: Vec<u64>,
    zs: Vec<u64>,
    signs: Vec<bool>,
}

impl TryFrom<TableauRepr> for StabilizerState {
    type Error = StateError;

    fn try_from(repr: TableauRepr) -> Result<Self> {
        if repr.num_qubits == 0 {
            return Err(StateError::EmptyRegister);
        }
        let words = repr.num_qubits.div_ceil(64);
        let rows = repr
            .num_qubits
            .checked_mul(2)
            .ok_or_else(|| StateError::Malformed("qubit count overflows".to_string()))?;
        let cells = rows.checked_mul(words);
        if repr.words != words
            || cells != Some(repr.xs.len())
            || cells != Some(repr.zs.len())
            || repr.signs.len() != rows
        {
            return Err(StateError::Malformed(format!(
                "tableau for {} qubits has {} words per row, {} x words, {} z words and {} signs",
                repr.num_qubits,
                repr.words,
                repr.xs.len(),
                repr.zs.len(),
                repr.signs.len()
            )));
        }
        Ok(Self {
            num_qubits: repr.num_qubits,
            words,
            xs: repr.xs,
            zs: repr.zs,
            signs: repr.signs,
        })
    }
}

impl StabilizerState {
    /// Create the all-zero state `|0...0⟩`
    ///
    /// # Errors
    /// Returns [`StateError::EmptyRegister`] for a zero-qubit register
    pub fn new(num_qubits: usize) -> Result<Self> {
        if num_qubits == 0 {
            return Err(StateError::EmptyRegister);
        }
        let words = num_qubits.div_ceil(64);
        let rows = 2 * num_qubits;
        let mut state = Self {
            num_qubits,
            words,
            xs: vec![0; rows * words],
            zs: vec![0; rows * words],
            signs: vec![false; rows],
        };
        state.reset();
        Ok(state)
    }

    /// Number of qubits in the register
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Return to `|0...0⟩` without reallocating
    pub fn reset(&mut self) {
        let n = self.num_qubits;
        self.xs.fill(0);
        self.zs.fill(0);
        self.signs.fill(false);
        for q in 0..n {
            let (w, m) = locate(q);
            self.xs[q * self.words + w] |= m;
            self.zs[(n + q) * self.words + w] |= m;
        }
    }

    fn check_qubit(&self, qubit: usize) -> Result<()> {
        if qubit >= self.num_qubits {
            return Err(StateError::invalid_qubit(qubit, self.num_qubits));
        }
        Ok(())
    }

    #[inline]
    fn row_x(&self, row: usize) -> &[u64] {
        &self.xs[row * self.words..(row + 1) * self.words]
    }

    #[inline]
    fn row_z(&self, row: usize) -> &[u64] {
        &self.zs[row * self.words..(row + 1) * self.words]
    }

    #[inline]
    fn has_x(&self, row: usize, qubit: usize) -> bool {
        let (w, m) = locate(qubit);
        self.xs[row * self.words + w] & m != 0
    }

    /// `row[target] <- row[source] * row[target]`
    fn row_mul(&mut self, target: usize, source: usize) {
        let w = self.words;
        let mut exponent = 2 * i32::from(self.signs[target]) + 2 * i32::from(self.signs[source]);
        for k in 0..w {
            let (x1, z1) = (self.xs[source * w + k], self.zs[source * w + k]);
            let (x2, z2) = (self.xs[target * w + k], self.zs[target * w + k]);
            exponent += phase_exponent(x1, z1, x2, z2);
            self.xs[target * w + k] = x1 ^ x2;
            self.zs[target * w + k] = z1 ^ z2;
        }
        self.signs[target] = exponent.rem_euclid(4) == 2;
    }

    fn copy_row(&mut self, from: usize, to: usize) {
        let w = self.words;
        self.xs.copy_within(from * w..(from + 1) * w, to * w);
        self.zs.copy_within(from * w..(from + 1) * w, to * w);
        self.signs[to] = self.signs[from];
    }

    // Column primitives. Callers validate indices.

    fn h(&mut self, q: usize) {
        let (w, m) = locate(q);
        for row in 0..2 * self.num_qubits {
            let idx = row * self.words + w;
            let x = self.xs[idx] & m != 0;
            let z = self.zs[idx] & m != 0;
            if x && z {
                self.signs[row] ^= true;
            }
            if x != z {
                self.xs[idx] ^= m;
                self.zs[idx] ^= m;
            }
        }
    }

    fn s(&mut self, q: usize) {
        let (w, m) = locate(q);
        for row in 0..2 * self.num_qubits {
            let idx = row * self.words + w;
            let x = self.xs[idx] & m != 0;
            let z = self.zs[idx] & m != 0;
            if x && z {
                self.signs[row] ^= true;
            }
            if x {
                self.zs[idx] ^= m;
            }
        }
    }

    /// Pauli gates only touch signs: a row picks up `-1` when it
    /// anticommutes with the applied Pauli
    fn pauli(&mut self, q: usize, pauli: Pauli) {
        let (w, m) = locate(q);
        let (px, pz) = pauli.xz_bits();
        for row in 0..2 * self.num_qubits {
            let idx = row * self.words + w;
            let x = self.xs[idx] & m != 0;
            let z = self.zs[idx] & m != 0;
            if (x && pz) != (z && px) {
                self.signs[row] ^= true;
            }
        }
    }

    fn cx(&mut self, control: usize, target: usize) {
        let (wc, mc) = locate(control);
        let (wt, mt) = locate(target);
        for row in 0..2 * self.num_qubits {
            let ic = row * self.words + wc;
            let it = row * self.words + wt;
            let xc = self.xs[ic] & mc != 0;
            let zc = self.zs[ic] & mc != 0;
            let xt = self.xs[it] & mt != 0;
            let zt = self.zs[it] & mt != 0;
            if xc && zt && (xt == zc) {
                self.signs[row] ^= true;
            }
            if xc {
                self.xs[it] ^= mt;
            }
            if zt {
                self.zs[ic] ^= mc;
            }
        }
    }

    /// Apply a Clifford gate
    ///
    /// Everything outside H, S, CX and the Paulis is decomposed:
    /// `SDG = S·Z`, `SX = H·S·H`, `SY ∝ H·Z`, `CY = S·CX·SDG` on the target,
    /// `CZ = H·CX·H` on the target, `SWAP` = three CX.
    ///
    /// # Errors
    /// Returns an error if the qubit count does not match the gate, an index
    /// is out of range, or a qubit is repeated
    pub fn apply_gate(&mut self, gate: CliffordGate, qubits: &[usize]) -> Result<()> {
        if qubits.len() != gate.num_qubits() {
            return Err(StateError::ArityMismatch {
                gate: gate.name(),
                expected: gate.num_qubits(),
                actual: qubits.len(),
            });
        }
        for &q in qubits {
            self.check_qubit(q)?;
        }
        if qubits.len() == 2 && qubits[0] == qubits[1] {
            return Err(StateError::DuplicateQubit { index: qubits[0] });
        }

        let a = qubits[0];
        match gate {
            CliffordGate::X => self.pauli(a, Pauli::X),
            CliffordGate::Y => self.pauli(a, Pauli::Y),
            CliffordGate::Z => self.pauli(a, Pauli::Z),
            CliffordGate::H => self.h(a),
            CliffordGate::S => self.s(a),
            CliffordGate::Sdg => {
                self.s(a);
                self.pauli(a, Pauli::Z);
            }
            CliffordGate::SX => {
                self.h(a);
                self.s(a);
                self.h(a);
            }
            CliffordGate::SXdg => {
                self.h(a);
                self.s(a);
                self.pauli(a, Pauli::Z);
                self.h(a);
            }
            CliffordGate::SY => {
                self.pauli(a, Pauli::Z);
                self.h(a);
            }
            CliffordGate::SYdg => {
                self.h(a);
                self.pauli(a, Pauli::Z);
            }
            CliffordGate::CX => self.cx(a, qubits[1]),
            CliffordGate::CY => {
                let t = qubits[1];
                self.s(t);
                self.pauli(t, Pauli::Z);
                self.cx(a, t);
                self.s(t);
            }
            CliffordGate::CZ => {
                let t = qubits[1];
                self.h(t);
                self.cx(a, t);
                self.h(t);
            }
            CliffordGate::Swap => {
                let b = qubits[1];
                self.cx(a, b);
                self.cx(b, a);
                self.cx(a, b);
            }
        }
        Ok(())
    }

    /// First stabilizer row with an X component on `qubit`, if any
    fn anticommuting_stabilizer(&self, qubit: usize) -> Option<usize> {
        (self.num_qubits..2 * self.num_qubits).find(|&row| self.has_x(row, qubit))
    }

    /// Sign of the stabilizer product equal to `±Z_qubit`
    ///
    /// Only meaningful when `Z_qubit` commutes with every stabilizer.
    fn z_product_is_negative(&self, qubit: usize) -> bool {
        let n = self.num_qubits;
        let mut acc = PauliAccumulator::identity(self.words);
        for row in 0..n {
            if self.has_x(row, qubit) {
                let stab = row + n;
                acc.multiply(self.row_x(stab), self.row_z(stab), self.signs[stab]);
            }
        }
        acc.is_negative()
    }

    /// Projective Z measurement of `qubit`
    ///
    /// If `Z_qubit` commutes with every generator the outcome is read off the
    /// tableau and `rng` is not called. Otherwise `rng` is called once, the
    /// outcome is chosen with `P(0) = 1/2`, and one generator is replaced by
    /// `±Z_qubit` while the others are made to commute with it.
    ///
    /// # Arguments
    /// * `qubit` - Index of the qubit to measure
    /// * `rng` - Uniform source on `[0, 1)`
    ///
    /// # Errors
    /// Returns error if qubit index is invalid
    pub fn measure_z(
        &mut self,
        qubit: usize,
        rng: &mut dyn FnMut() -> f64,
    ) -> Result<MeasurementOutcome> {
        self.check_qubit(qubit)?;
        let n = self.num_qubits;

        let Some(pivot) = self.anticommuting_stabilizer(qubit) else {
            let outcome = u8::from(self.z_product_is_negative(qubit));
            return Ok(MeasurementOutcome::determined(outcome));
        };

        let outcome = select_outcome(0.5, rng);

        for row in 0..2 * n {
            if row != pivot && self.has_x(row, qubit) {
                self.row_mul(row, pivot);
            }
        }

        self.copy_row(pivot, pivot - n);

        let w = self.words;
        self.xs[pivot * w..(pivot + 1) * w].fill(0);
        self.zs[pivot * w..(pivot + 1) * w].fill(0);
        let (wq, mq) = locate(qubit);
        self.zs[pivot * w + wq] |= mq;
        self.signs[pivot] = outcome.is_one();

        Ok(outcome)
    }

    /// `⟨Z_qubit⟩`, which for a stabilizer state is always `-1`, `0` or `+1`
    ///
    /// # Errors
    /// Returns error if qubit index is invalid
    pub fn expectation_z(&self, qubit: usize) -> Result<f64> {
        self.check_qubit(qubit)?;
        if self.anticommuting_stabilizer(qubit).is_some() {
            return Ok(0.0);
        }
        Ok(if self.z_product_is_negative(qubit) {
            -1.0
        } else {
            1.0
        })
    }

    /// Probability of reading `1` on `qubit`, i.e. `(1 - ⟨Z⟩) / 2`
    pub fn probability_one(&self, qubit: usize) -> Result<f64> {
        Ok((1.0 - self.expectation_z(qubit)?) / 2.0)
    }

    fn pauli_words(&self, pauli: &PauliString) -> Result<(Vec<u64>, Vec<u64>)> {
        if pauli.num_qubits() != self.num_qubits {
            return Err(StateError::PauliLength {
                expected: self.num_qubits,
                actual: pauli.num_qubits(),
            });
        }
        let mut xs = vec![0; self.words];
        let mut zs = vec![0; self.words];
        for (q, p) in pauli.support() {
            let (w, m) = locate(q);
            let (x, z) = p.xz_bits();
            if x {
                xs[w] |= m;
            }
            if z {
                zs[w] |= m;
            }
        }
        Ok((xs, zs))
    }

    fn row_anticommutes(&self, row: usize, xs: &[u64], zs: &[u64]) -> bool {
        let rx = self.row_x(row);
        let rz = self.row_z(row);
        let parity: u32 = (0..self.words)
            .map(|k| ((rx[k] & zs[k]) ^ (rz[k] & xs[k])).count_ones())
            .sum();
        parity % 2 == 1
    }

    /// Expectation of an arbitrary Pauli string
    ///
    /// Zero if the string anticommutes with some generator, otherwise the
    /// string is `±` a product of generators and the sign is returned.
    ///
    /// # Errors
    /// Returns [`StateError::PauliLength`] if the string length differs from
    /// the register size
    pub fn expectation_pauli(&self, pauli: &PauliString) -> Result<f64> {
        let (px, pz) = self.pauli_words(pauli)?;
        let n = self.num_qubits;

        if (n..2 * n).any(|row| self.row_anticommutes(row, &px, &pz)) {
            return Ok(0.0);
        }

        let mut acc = PauliAccumulator::identity(self.words);
        for row in 0..n {
            if self.row_anticommutes(row, &px, &pz) {
                let stab = row + n;
                acc.multiply(self.row_x(stab), self.row_z(stab), self.signs[stab]);
            }
        }
        debug_assert!(acc.xs == px && acc.zs == pz);
        Ok(if acc.is_negative() { -1.0 } else { 1.0 })
    }

    fn row_string(&self, row: usize) -> String {
        let mut out = String::with_capacity(self.num_qubits + 1);
        out.push(if self.signs[row] { '-' } else { '+' });
        for q in 0..self.num_qubits {
            let (w, m) = locate(q);
            let x = self.xs[row * self.words + w] & m != 0;
            let z = self.zs[row * self.words + w] & m != 0;
            out.push(Pauli::from_xz_bits(x, z).to_char());
        }
        out
    }

    /// Stabilizer generators as signed strings, e.g. `"+XX"`, `"-ZI"`
    pub fn stabilizers(&self) -> Vec<String> {
        (self.num_qubits..2 * self.num_qubits)
            .map(|row| self.row_string(row))
            .collect()
    }

    /// Destabilizer rows as signed strings
    pub fn destabilizers(&self) -> Vec<String> {
        (0..self.num_qubits).map(|row| self.row_string(row)).collect()
    }

    /// Check the tableau invariants: generators pairwise commute and each
    /// destabilizer anticommutes with exactly its own generator
    pub fn is_consistent(&self) -> bool {
        let n = self.num_qubits;
        for i in 0..n {
            let (dx, dz) = (self.row_x(i).to_vec(), self.row_z(i).to_vec());
            let (sx, sz) = (self.row_x(i + n).to_vec(), self.row_z(i + n).to_vec());
            for j in 0..n {
                if self.row_anticommutes(j + n, &sx, &sz) {
                    return false;
                }
                if self.row_anticommutes(j + n, &dx, &dz) != (i == j) {
                    return false;
                }
            }
        }
        true
    }
}

impl fmt::Debug for StabilizerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StabilizerState")
            .field("num_qubits", &self.num_qubits)
            .field("stabilizers", &self.stabilizers())
            .finish()
    }
}
