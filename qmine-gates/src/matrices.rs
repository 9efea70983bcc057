//! Constant unitary matrices for the Clifford gate set
//!
//! Single-qubit matrices are indexed `[row][col]` over the basis `|0⟩, |1⟩`.
//! Two-qubit matrices use the basis `|q0 q1⟩` where `q0` is the FIRST qubit
//! of the operation (the control for CX and CY), so basis index
//! `2 * bit(q0) + bit(q1)`.

use num_complex::Complex64;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const NEG_ONE: Complex64 = Complex64::new(-1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);
const NEG_I: Complex64 = Complex64::new(0.0, -1.0);

const R: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// (1+i)/2
const P: Complex64 = Complex64::new(0.5, 0.5);
/// (1-i)/2
const M: Complex64 = Complex64::new(0.5, -0.5);
/// -(1+i)/2
const NEG_P: Complex64 = Complex64::new(-0.5, -0.5);
/// -(1-i)/2
const NEG_M: Complex64 = Complex64::new(-0.5, 0.5);

/// 2x2 complex matrix
pub type Matrix2 = [[Complex64; 2]; 2];
/// 4x4 complex matrix
pub type Matrix4 = [[Complex64; 4]; 4];

/// Pauli-X, `[[0, 1], [1, 0]]`
pub const PAULI_X: Matrix2 = [[ZERO, ONE], [ONE, ZERO]];

/// Pauli-Y, `[[0, -i], [i, 0]]`
pub const PAULI_Y: Matrix2 = [[ZERO, NEG_I], [I, ZERO]];

/// Pauli-Z, `[[1, 0], [0, -1]]`
pub const PAULI_Z: Matrix2 = [[ONE, ZERO], [ZERO, NEG_ONE]];

/// Hadamard, `1/√2 [[1, 1], [1, -1]]`
pub const HADAMARD: Matrix2 = [
    [Complex64::new(R, 0.0), Complex64::new(R, 0.0)],
    [Complex64::new(R, 0.0), Complex64::new(-R, 0.0)],
];

/// S = √Z, `[[1, 0], [0, i]]`
pub const S_GATE: Matrix2 = [[ONE, ZERO], [ZERO, I]];

/// S†, `[[1, 0], [0, -i]]`
pub const S_DAGGER: Matrix2 = [[ONE, ZERO], [ZERO, NEG_I]];

/// √X, `1/2 [[1+i, 1-i], [1-i, 1+i]]`
pub const SQRT_X: Matrix2 = [[P, M], [M, P]];

/// √X†, `1/2 [[1-i, 1+i], [1+i, 1-i]]`
pub const SQRT_X_DAGGER: Matrix2 = [[M, P], [P, M]];

/// √Y, `1/2 [[1+i, -1-i], [1+i, 1+i]]`
pub const SQRT_Y: Matrix2 = [[P, NEG_P], [P, P]];

/// √Y†, `1/2 [[1-i, 1-i], [-1+i, 1-i]]`
pub const SQRT_Y_DAGGER: Matrix2 = [[M, M], [NEG_M, M]];

/// 2x2 identity
pub const IDENTITY: Matrix2 = [[ONE, ZERO], [ZERO, ONE]];

/// Controlled-X: flips q1 when q0 is |1⟩
pub const CNOT: Matrix4 = [
    [ONE, ZERO, ZERO, ZERO],
    [ZERO, ONE, ZERO, ZERO],
    [ZERO, ZERO, ZERO, ONE],
    [ZERO, ZERO, ONE, ZERO],
];

/// Controlled-Y: applies Y to q1 when q0 is |1⟩
pub const CY: Matrix4 = [
    [ONE, ZERO, ZERO, ZERO],
    [ZERO, ONE, ZERO, ZERO],
    [ZERO, ZERO, ZERO, NEG_I],
    [ZERO, ZERO, I, ZERO],
];

/// Controlled-Z, symmetric in its qubits
pub const CZ: Matrix4 = [
    [ONE, ZERO, ZERO, ZERO],
    [ZERO, ONE, ZERO, ZERO],
    [ZERO, ZERO, ONE, ZERO],
    [ZERO, ZERO, ZERO, NEG_ONE],
];

/// SWAP
pub const SWAP: Matrix4 = [
    [ONE, ZERO, ZERO, ZERO],
    [ZERO, ZERO, ONE, ZERO],
    [ZERO, ONE, ZERO, ZERO],
    [ZERO, ZERO, ZERO, ONE],
];
