//! Gate-to-matrix lookup for the Clifford gate set

use crate::matrices::{self, Matrix2, Matrix4};
use qmine_core::CliffordGate;

/// The unitary of a gate, sized by its arity
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateMatrix {
    /// 2x2 unitary of a one-qubit gate
    Single(&'static Matrix2),
    /// 4x4 unitary of a two-qubit gate, first qubit most significant
    Two(&'static Matrix4),
}

impl GateMatrix {
    /// Matrix dimension (2 or 4)
    pub fn dimension(&self) -> usize {
        match self {
            GateMatrix::Single(_) => 2,
            GateMatrix::Two(_) => 4,
        }
    }
}

/// Pre-computed unitary for `gate`
///
/// # Example
/// ```
/// use qmine_core::CliffordGate;
/// use qmine_gates::{gate_matrix, GateMatrix};
///
/// assert!(matches!(gate_matrix(CliffordGate::H), GateMatrix::Single(_)));
/// assert_eq!(gate_matrix(CliffordGate::Swap).dimension(), 4);
/// ```
pub fn gate_matrix(gate: CliffordGate) -> GateMatrix {
    match gate {
        CliffordGate::X => GateMatrix::Single(&matrices::PAULI_X),
        CliffordGate::Y => GateMatrix::Single(&matrices::PAULI_Y),
        CliffordGate::Z => GateMatrix::Single(&matrices::PAULI_Z),
        CliffordGate::H => GateMatrix::Single(&matrices::HADAMARD),
        CliffordGate::S => GateMatrix::Single(&matrices::S_GATE),
        CliffordGate::Sdg => GateMatrix::Single(&matrices::S_DAGGER),
        CliffordGate::SX => GateMatrix::Single(&matrices::SQRT_X),
        CliffordGate::SXdg => GateMatrix::Single(&matrices::SQRT_X_DAGGER),
        CliffordGate::SY => GateMatrix::Single(&matrices::SQRT_Y),
        CliffordGate::SYdg => GateMatrix::Single(&matrices::SQRT_Y_DAGGER),
        CliffordGate::CX => GateMatrix::Two(&matrices::CNOT),
        CliffordGate::CY => GateMatrix::Two(&matrices::CY),
        CliffordGate::CZ => GateMatrix::Two(&matrices::CZ),
        CliffordGate::Swap => GateMatrix::Two(&matrices::SWAP),
    }
}

/// 2x2 unitary of a one-qubit gate, `None` for two-qubit gates
#[inline]
pub fn single_qubit_matrix(gate: CliffordGate) -> Option<&'static Matrix2> {
    match gate_matrix(gate) {
        GateMatrix::Single(m) => Some(m),
        GateMatrix::Two(_) => None,
    }
}

/// 4x4 unitary of a two-qubit gate, `None` for one-qubit gates
#[inline]
pub fn two_qubit_matrix(gate: CliffordGate) -> Option<&'static Matrix4> {
    match gate_matrix(gate) {
        GateMatrix::Single(_) => None,
        GateMatrix::Two(m) => Some(m),
    }
}
