//! Random Clifford circuits for entangled mine groups
//!
//! Circuits are built from layers of random single-qubit Cliffords followed
//! by random two-qubit entanglers on a shuffled pairing. With `2k + 2` layers
//! on `k` qubits the output scrambles the group well, though it is not an
//! exactly uniform sample of the Clifford group.

use crate::Result;
use qmine_core::{Circuit, CliffordGate};
use qmine_state::StabilizerState;
use rand::seq::SliceRandom;
use rand::Rng;

const LAYER_GATES: [Option<CliffordGate>; 9] = [
    None,
    Some(CliffordGate::H),
    Some(CliffordGate::S),
    Some(CliffordGate::Sdg),
    Some(CliffordGate::SX),
    Some(CliffordGate::SY),
    Some(CliffordGate::X),
    Some(CliffordGate::Y),
    Some(CliffordGate::Z),
];

const ENTANGLERS: [CliffordGate; 3] = [CliffordGate::CX, CliffordGate::CZ, CliffordGate::CY];

/// Sample a random Clifford circuit on `num_qubits` qubits
///
/// # Example
/// ```
/// use qmine_backend::random_clifford_circuit;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let mut rng = ChaCha8Rng::seed_from_u64(3);
/// let circuit = random_clifford_circuit(3, &mut rng).unwrap();
/// assert_eq!(circuit.num_qubits(), 3);
/// ```
pub fn random_clifford_circuit<R: Rng + ?Sized>(num_qubits: usize, rng: &mut R) -> Result<Circuit> {
    let mut circuit = Circuit::new(num_qubits)?;
    let mut order: Vec<usize> = (0..num_qubits).collect();

    for _ in 0..(2 * num_qubits + 2) {
        for q in 0..num_qubits {
            if let Some(gate) = LAYER_GATES[rng.gen_range(0..LAYER_GATES.len())] {
                circuit.push(gate, &[q])?;
            }
        }
        order.shuffle(rng);
        for pair in order.chunks_exact(2) {
            let gate = ENTANGLERS[rng.gen_range(0..ENTANGLERS.len())];
            circuit.push(gate, pair)?;
        }
    }
    Ok(circuit)
}

/// Whether `circuit` maps `|0...0⟩` back to `|0...0⟩` with certainty
pub fn leaves_all_zero(circuit: &Circuit) -> Result<bool> {
    let mut state = StabilizerState::new(circuit.num_qubits())?;
    for op in circuit.operations() {
        let raw: Vec<usize> = op.qubits().iter().map(|q| q.index()).collect();
        state.apply_gate(op.gate(), &raw)?;
    }
    for q in 0..circuit.num_qubits() {
        if state.expectation_z(q)? < 1.0 {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Random Clifford circuit that leaves at least one qubit possibly in |1⟩
///
/// Resamples until [`leaves_all_zero`] is false. Only 4 of the 24
/// single-qubit Cliffords fix |0⟩, so few attempts are needed.
pub fn random_nontrivial_clifford<R: Rng + ?Sized>(
    num_qubits: usize,
    rng: &mut R,
) -> Result<Circuit> {
    loop {
        let circuit = random_clifford_circuit(num_qubits, rng)?;
        if !leaves_all_zero(&circuit)? {
            return Ok(circuit);
        }
    }
}
