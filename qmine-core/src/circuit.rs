//! Recorded Clifford circuits

use crate::{CliffordGate, GateOp, QuantumError, QubitId, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A sequence of Clifford gate operations on a fixed-size register
///
/// The game records its state preparation as a `Circuit` so a board can be
/// rewound by replaying it on a fresh register.
///
/// # Example
/// ```
/// use qmine_core::{Circuit, CliffordGate};
///
/// let mut circuit = Circuit::new(2).unwrap();
/// circuit.push(CliffordGate::H, &[0]).unwrap();
/// circuit.push(CliffordGate::CX, &[0, 1]).unwrap();
/// assert_eq!(circuit.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circuit {
    num_qubits: usize,
    operations: Vec<GateOp>,
}

impl Circuit {
    /// Create an empty circuit over `num_qubits` qubits
    ///
    /// # Errors
    /// Returns [`QuantumError::EmptyRegister`] if `num_qubits` is 0
    pub fn new(num_qubits: usize) -> Result<Self> {
        if num_qubits == 0 {
            return Err(QuantumError::EmptyRegister);
        }
        Ok(Self {
            num_qubits,
            operations: Vec::new(),
        })
    }

    /// Get the number of qubits in the circuit
    #[inline]
    pub const fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Get the number of operations in the circuit
    #[inline]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if the circuit is empty (no operations)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Add a gate operation to the circuit
    ///
    /// # Errors
    /// Returns error if any qubit index is out of bounds or the operation
    /// itself is malformed
    pub fn add_op(&mut self, op: GateOp) -> Result<()> {
        for &qubit in op.qubits() {
            if qubit.index() >= self.num_qubits {
                return Err(QuantumError::invalid_qubit(qubit.index(), self.num_qubits));
            }
        }
        self.operations.push(op);
        Ok(())
    }

    /// Add `gate` on the given raw qubit indices
    pub fn push(&mut self, gate: CliffordGate, qubits: &[usize]) -> Result<()> {
        self.add_op(GateOp::on(gate, qubits)?)
    }

    /// Append every operation of `other`, which must not be wider than `self`
    pub fn extend_from(&mut self, other: &Circuit) -> Result<()> {
        for op in other.operations() {
            self.add_op(op.clone())?;
        }
        Ok(())
    }

    /// Get an iterator over the operations
    pub fn operations(&self) -> impl Iterator<Item = &GateOp> {
        self.operations.iter()
    }

    /// Qubits touched by at least one operation, ascending
    pub fn touched_qubits(&self) -> Vec<QubitId> {
        let mut seen = vec![false; self.num_qubits];
        for op in &self.operations {
            for q in op.qubits() {
                seen[q.index()] = true;
            }
        }
        seen.iter()
            .enumerate()
            .filter(|(_, s)| **s)
            .map(|(i, _)| QubitId::new(i))
            .collect()
    }

    /// Number of two-qubit operations
    pub fn two_qubit_count(&self) -> usize {
        self.operations.iter().filter(|op| op.num_qubits() == 2).count()
    }

    /// Clear all operations from the circuit
    pub fn clear(&mut self) {
        self.operations.clear();
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Circuit ({} qubits, {} ops)", self.num_qubits, self.len())?;
        for (i, op) in self.operations.iter().enumerate() {
            writeln!(f, "  {}: {}", i, op)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_register_rejected() {
        assert_eq!(Circuit::new(0), Err(QuantumError::EmptyRegister));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut circuit = Circuit::new(2).unwrap();
        let err = circuit.push(CliffordGate::CX, &[0, 2]).unwrap_err();
        assert_eq!(err, QuantumError::InvalidQubit(2, 2));
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_touched_qubits_and_counts() {
        let mut circuit = Circuit::new(5).unwrap();
        circuit.push(CliffordGate::H, &[3]).unwrap();
        circuit.push(CliffordGate::CZ, &[3, 1]).unwrap();
        circuit.push(CliffordGate::X, &[1]).unwrap();
        assert_eq!(
            circuit.touched_qubits(),
            vec![QubitId::new(1), QubitId::new(3)]
        );
        assert_eq!(circuit.two_qubit_count(), 1);
    }

    #[test]
    fn test_extend_from() {
        let mut a = Circuit::new(3).unwrap();
        a.push(CliffordGate::X, &[0]).unwrap();
        let mut b = Circuit::new(3).unwrap();
        b.push(CliffordGate::Swap, &[0, 2]).unwrap();
        a.extend_from(&b).unwrap();
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut circuit = Circuit::new(2).unwrap();
        circuit.push(CliffordGate::SYdg, &[1]).unwrap();
        circuit.push(CliffordGate::CY, &[1, 0]).unwrap();
        let json = serde_json::to_string(&circuit).unwrap();
        let back: Circuit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, circuit);
    }
}
