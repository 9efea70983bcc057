//! The Clifford gate set and gate operations

use crate::{QuantumError, QubitId, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// A gate from the restricted Clifford set the board can be manipulated with
///
/// Every gate maps Pauli operators to Pauli operators under conjugation, so
/// applying it to a stabilizer state keeps the state inside the stabilizer
/// formalism.
///
/// # Example
/// ```
/// use qmine_core::CliffordGate;
///
/// let gate: CliffordGate = "sdg".parse().unwrap();
/// assert_eq!(gate, CliffordGate::Sdg);
/// assert_eq!(gate.name(), "SDG");
/// assert_eq!(gate.num_qubits(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CliffordGate {
    /// Pauli-X (bit flip)
    X,
    /// Pauli-Y
    Y,
    /// Pauli-Z (phase flip)
    Z,
    /// Hadamard
    H,
    /// Phase gate, √Z
    S,
    /// Adjoint phase gate
    Sdg,
    /// √X
    SX,
    /// Adjoint √X
    SXdg,
    /// √Y
    SY,
    /// Adjoint √Y
    SYdg,
    /// Controlled-X, first qubit is the control
    CX,
    /// Controlled-Y, first qubit is the control
    CY,
    /// Controlled-Z
    CZ,
    /// Swap the two qubits
    Swap,
}

impl CliffordGate {
    /// Every gate in the set, single-qubit gates first
    pub const ALL: [CliffordGate; 14] = [
        CliffordGate::X,
        CliffordGate::Y,
        CliffordGate::Z,
        CliffordGate::H,
        CliffordGate::S,
        CliffordGate::Sdg,
        CliffordGate::SX,
        CliffordGate::SXdg,
        CliffordGate::SY,
        CliffordGate::SYdg,
        CliffordGate::CX,
        CliffordGate::CY,
        CliffordGate::CZ,
        CliffordGate::Swap,
    ];

    /// Canonical upper-case name, as used in the move grammar
    pub const fn name(self) -> &'static str {
        match self {
            CliffordGate::X => "X",
            CliffordGate::Y => "Y",
            CliffordGate::Z => "Z",
            CliffordGate::H => "H",
            CliffordGate::S => "S",
            CliffordGate::Sdg => "SDG",
            CliffordGate::SX => "SX",
            CliffordGate::SXdg => "SXDG",
            CliffordGate::SY => "SY",
            CliffordGate::SYdg => "SYDG",
            CliffordGate::CX => "CX",
            CliffordGate::CY => "CY",
            CliffordGate::CZ => "CZ",
            CliffordGate::Swap => "SWAP",
        }
    }

    /// Look up a gate by name, case-insensitively
    ///
    /// Besides the canonical names, the common spellings `CNOT`, `S_DAG`,
    /// `SQRT_X`, `SQRT_X_DAG`, `SQRT_Y` and `SQRT_Y_DAG` are accepted.
    pub fn from_name(name: &str) -> Result<Self> {
        let upper = name.trim().to_ascii_uppercase();
        let gate = match upper.as_str() {
            "X" => CliffordGate::X,
            "Y" => CliffordGate::Y,
            "Z" => CliffordGate::Z,
            "H" => CliffordGate::H,
            "S" => CliffordGate::S,
            "SDG" | "S_DAG" => CliffordGate::Sdg,
            "SX" | "SQRT_X" => CliffordGate::SX,
            "SXDG" | "SQRT_X_DAG" => CliffordGate::SXdg,
            "SY" | "SQRT_Y" => CliffordGate::SY,
            "SYDG" | "SQRT_Y_DAG" => CliffordGate::SYdg,
            "CX" | "CNOT" => CliffordGate::CX,
            "CY" => CliffordGate::CY,
            "CZ" => CliffordGate::CZ,
            "SWAP" => CliffordGate::Swap,
            _ => return Err(QuantumError::UnknownGate(name.to_string())),
        };
        Ok(gate)
    }

    /// Number of qubits this gate acts on
    pub const fn num_qubits(self) -> usize {
        match self {
            CliffordGate::CX | CliffordGate::CY | CliffordGate::CZ | CliffordGate::Swap => 2,
            _ => 1,
        }
    }

    /// Whether the gate commutes with the total mine-number operator
    ///
    /// Diagonal gates and SWAP only permute or rephase computational basis
    /// states without changing how many qubits are in |1⟩, so they leave
    /// `Σ p_mine` unchanged. Every other gate can move amplitude between
    /// mine sectors.
    pub const fn preserves_mine_count(self) -> bool {
        matches!(
            self,
            CliffordGate::Z | CliffordGate::S | CliffordGate::Sdg | CliffordGate::CZ | CliffordGate::Swap
        )
    }

    /// Position of the gate in [`CliffordGate::ALL`]
    pub const fn ordinal(self) -> usize {
        self as usize
    }
}

impl fmt::Display for CliffordGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CliffordGate {
    type Err = QuantumError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

/// A gate applied to specific qubits
///
/// # Example
/// ```
/// use qmine_core::{CliffordGate, GateOp, QubitId};
///
/// let op = GateOp::new(CliffordGate::CX, &[QubitId::new(0), QubitId::new(1)]).unwrap();
/// assert_eq!(op.to_string(), "CX(q0, q1)");
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateOp {
    gate: CliffordGate,
    qubits: SmallVec<[QubitId; 2]>,
}

impl GateOp {
    /// Create a new gate operation
    ///
    /// # Errors
    /// Returns error if:
    /// - Qubit count doesn't match the gate's arity
    /// - Duplicate qubits are specified
    pub fn new(gate: CliffordGate, qubits: &[QubitId]) -> Result<Self> {
        if qubits.len() != gate.num_qubits() {
            return Err(QuantumError::invalid_qubit_count(
                gate.name(),
                gate.num_qubits(),
                qubits.len(),
            ));
        }

        for i in 0..qubits.len() {
            for j in (i + 1)..qubits.len() {
                if qubits[i] == qubits[j] {
                    return Err(QuantumError::DuplicateQubit(qubits[i]));
                }
            }
        }

        Ok(Self {
            gate,
            qubits: SmallVec::from_slice(qubits),
        })
    }

    /// Convenience constructor from raw indices
    pub fn on(gate: CliffordGate, qubits: &[usize]) -> Result<Self> {
        let ids: SmallVec<[QubitId; 2]> = qubits.iter().map(|&q| QubitId::new(q)).collect();
        Self::new(gate, &ids)
    }

    /// Get the gate
    #[inline]
    pub fn gate(&self) -> CliffordGate {
        self.gate
    }

    /// Get the qubits this operation acts on
    #[inline]
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Get the number of qubits
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }
}

impl fmt::Debug for GateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.gate.name())?;
        for (i, q) in self.qubits.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", q)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for GateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for gate in CliffordGate::ALL {
            assert_eq!(CliffordGate::from_name(gate.name()).unwrap(), gate);
            assert_eq!(CliffordGate::from_name(&gate.name().to_lowercase()).unwrap(), gate);
        }
    }

    #[test]
    fn test_aliases() {
        assert_eq!(CliffordGate::from_name("cnot").unwrap(), CliffordGate::CX);
        assert_eq!(CliffordGate::from_name("S_DAG").unwrap(), CliffordGate::Sdg);
        assert_eq!(CliffordGate::from_name("sqrt_y_dag").unwrap(), CliffordGate::SYdg);
        assert!(matches!(
            CliffordGate::from_name("T"),
            Err(QuantumError::UnknownGate(_))
        ));
    }

    #[test]
    fn test_ordinal_matches_all() {
        for (i, gate) in CliffordGate::ALL.iter().enumerate() {
            assert_eq!(gate.ordinal(), i);
        }
    }

    #[test]
    fn test_mine_preserving_gates() {
        let preserving: Vec<_> = CliffordGate::ALL
            .into_iter()
            .filter(|g| g.preserves_mine_count())
            .collect();
        assert_eq!(
            preserving,
            vec![
                CliffordGate::Z,
                CliffordGate::S,
                CliffordGate::Sdg,
                CliffordGate::CZ,
                CliffordGate::Swap
            ]
        );
    }

    #[test]
    fn test_gate_op_invalid_qubit_count() {
        let result = GateOp::on(CliffordGate::CX, &[0]);
        if let Err(QuantumError::InvalidQubitCount {
            gate,
            expected,
            actual,
        }) = result
        {
            assert_eq!(gate, "CX");
            assert_eq!(expected, 2);
            assert_eq!(actual, 1);
        } else {
            panic!("Expected InvalidQubitCount error");
        }
    }

    #[test]
    fn test_gate_op_duplicate_qubits() {
        let result = GateOp::on(CliffordGate::Swap, &[3, 3]);
        assert!(matches!(result, Err(QuantumError::DuplicateQubit(_))));
    }

    #[test]
    fn test_gate_op_display() {
        let op = GateOp::on(CliffordGate::Swap, &[2, 7]).unwrap();
        assert_eq!(format!("{}", op), "SWAP(q2, q7)");
    }
}
