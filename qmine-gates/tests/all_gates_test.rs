//! Algebraic checks for every gate matrix in the Clifford set

use approx::assert_relative_eq;
use num_complex::Complex64;
use qmine_core::CliffordGate;
use qmine_gates::{gate_matrix, matrices, GateMatrix};

const EPSILON: f64 = 1e-10;

// Flattened row-major n x n matrices
fn mult(a: &[Complex64], b: &[Complex64], n: usize) -> Vec<Complex64> {
    let mut out = vec![Complex64::new(0.0, 0.0); n * n];
    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                out[i * n + j] += a[i * n + k] * b[k * n + j];
            }
        }
    }
    out
}

fn dagger(m: &[Complex64], n: usize) -> Vec<Complex64> {
    let mut out = vec![Complex64::new(0.0, 0.0); n * n];
    for i in 0..n {
        for j in 0..n {
            out[j * n + i] = m[i * n + j].conj();
        }
    }
    out
}

fn flat2(m: &matrices::Matrix2) -> Vec<Complex64> {
    m.iter().flatten().copied().collect()
}

fn flat(gate: CliffordGate) -> Vec<Complex64> {
    match gate_matrix(gate) {
        GateMatrix::Single(m) => flat2(m),
        GateMatrix::Two(m) => m.iter().flatten().copied().collect(),
    }
}

fn assert_matrix_eq(a: &[Complex64], b: &[Complex64]) {
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b) {
        assert_relative_eq!(x.re, y.re, epsilon = EPSILON);
        assert_relative_eq!(x.im, y.im, epsilon = EPSILON);
    }
}

fn identity(n: usize) -> Vec<Complex64> {
    let mut out = vec![Complex64::new(0.0, 0.0); n * n];
    for i in 0..n {
        out[i * n + i] = Complex64::new(1.0, 0.0);
    }
    out
}

// U P U†
fn conjugate(u: &[Complex64], p: &[Complex64], n: usize) -> Vec<Complex64> {
    mult(&mult(u, p, n), &dagger(u, n), n)
}

fn scaled(m: &[Complex64], s: f64) -> Vec<Complex64> {
    m.iter().map(|c| c * s).collect()
}

#[test]
fn test_every_gate_is_unitary() {
    for gate in CliffordGate::ALL {
        let n = gate_matrix(gate).dimension();
        let u = flat(gate);
        assert_matrix_eq(&mult(&dagger(&u, n), &u, n), &identity(n));
    }
}

#[test]
fn test_inverse_pairs_multiply_to_identity() {
    let pairs = [
        (CliffordGate::S, CliffordGate::Sdg),
        (CliffordGate::SX, CliffordGate::SXdg),
        (CliffordGate::SY, CliffordGate::SYdg),
    ];
    for (gate, inverse) in pairs {
        assert_matrix_eq(&mult(&flat(gate), &flat(inverse), 2), &identity(2));
    }
    // every remaining gate is its own inverse
    for gate in CliffordGate::ALL {
        if pairs.iter().any(|&(a, b)| gate == a || gate == b) {
            continue;
        }
        let n = gate_matrix(gate).dimension();
        let u = flat(gate);
        assert_matrix_eq(&mult(&u, &u, n), &identity(n));
    }
}

#[test]
fn test_square_roots() {
    let s = flat2(&matrices::S_GATE);
    assert_matrix_eq(&mult(&s, &s, 2), &flat2(&matrices::PAULI_Z));

    let sx = flat2(&matrices::SQRT_X);
    assert_matrix_eq(&mult(&sx, &sx, 2), &flat2(&matrices::PAULI_X));

    let sy = flat2(&matrices::SQRT_Y);
    assert_matrix_eq(&mult(&sy, &sy, 2), &flat2(&matrices::PAULI_Y));
}

#[test]
fn test_single_qubit_conjugation_table() {
    let x = flat2(&matrices::PAULI_X);
    let y = flat2(&matrices::PAULI_Y);
    let z = flat2(&matrices::PAULI_Z);

    // (gate, image of X, image of Z)
    let table: [(CliffordGate, Vec<Complex64>, Vec<Complex64>); 10] = [
        (CliffordGate::X, x.clone(), scaled(&z, -1.0)),
        (CliffordGate::Y, scaled(&x, -1.0), scaled(&z, -1.0)),
        (CliffordGate::Z, scaled(&x, -1.0), z.clone()),
        (CliffordGate::H, z.clone(), x.clone()),
        (CliffordGate::S, y.clone(), z.clone()),
        (CliffordGate::Sdg, scaled(&y, -1.0), z.clone()),
        (CliffordGate::SX, x.clone(), scaled(&y, -1.0)),
        (CliffordGate::SXdg, x.clone(), y.clone()),
        (CliffordGate::SY, scaled(&z, -1.0), x.clone()),
        (CliffordGate::SYdg, z.clone(), scaled(&x, -1.0)),
    ];

    for (gate, x_image, z_image) in table {
        let u = flat(gate);
        assert_matrix_eq(&conjugate(&u, &x, 2), &x_image);
        assert_matrix_eq(&conjugate(&u, &z, 2), &z_image);
    }
}

#[test]
fn test_controlled_gates_use_first_qubit_as_control() {
    let one = Complex64::new(1.0, 0.0);
    // CX |10⟩ = |11⟩, basis index 2 -> 3
    assert_eq!(matrices::CNOT[3][2], one);
    assert_eq!(matrices::CNOT[1][1], one);
    // CY |10⟩ = i|11⟩
    assert_eq!(matrices::CY[3][2], Complex64::new(0.0, 1.0));
}

#[test]
fn test_cy_is_phase_conjugated_cx() {
    // CY = (I ⊗ S) CX (I ⊗ S†)
    let mut s_on_target = identity(4);
    let mut sdg_on_target = identity(4);
    for block in [0, 2] {
        s_on_target[(block + 1) * 4 + block + 1] = matrices::S_GATE[1][1];
        sdg_on_target[(block + 1) * 4 + block + 1] = matrices::S_DAGGER[1][1];
    }
    let cx: Vec<Complex64> = matrices::CNOT.iter().flatten().copied().collect();
    let cy: Vec<Complex64> = matrices::CY.iter().flatten().copied().collect();
    let composed = mult(&mult(&s_on_target, &cx, 4), &sdg_on_target, 4);
    assert_matrix_eq(&composed, &cy);
}

#[test]
fn test_swap_is_three_cnots() {
    let cx: Vec<Complex64> = matrices::CNOT.iter().flatten().copied().collect();
    // CNOT with the roles of the qubits exchanged
    let swap: Vec<Complex64> = matrices::SWAP.iter().flatten().copied().collect();
    let xc = mult(&mult(&swap, &cx, 4), &swap, 4);
    let three = mult(&mult(&cx, &xc, 4), &cx, 4);
    assert_matrix_eq(&three, &swap);
}
