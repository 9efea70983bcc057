//! Pauli operators and Pauli strings

use crate::{QuantumError, QubitId, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Single-qubit Pauli operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Pauli {
    /// Identity operator
    #[default]
    I,
    /// Pauli X (bit flip)
    X,
    /// Pauli Y (bit and phase flip)
    Y,
    /// Pauli Z (phase flip)
    Z,
}

impl Pauli {
    /// Parse a Pauli operator from a character
    pub fn from_char(c: char) -> Result<Self> {
        match c.to_ascii_uppercase() {
            'I' => Ok(Pauli::I),
            'X' => Ok(Pauli::X),
            'Y' => Ok(Pauli::Y),
            'Z' => Ok(Pauli::Z),
            _ => Err(QuantumError::InvalidPauli(c)),
        }
    }

    /// Convert to character representation
    pub fn to_char(self) -> char {
        match self {
            Pauli::I => 'I',
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        }
    }

    /// Symplectic `(x, z)` bits: X = (1,0), Z = (0,1), Y = (1,1)
    #[inline]
    pub fn xz_bits(self) -> (bool, bool) {
        match self {
            Pauli::I => (false, false),
            Pauli::X => (true, false),
            Pauli::Y => (true, true),
            Pauli::Z => (false, true),
        }
    }

    /// Inverse of [`Pauli::xz_bits`]
    #[inline]
    pub fn from_xz_bits(x: bool, z: bool) -> Self {
        match (x, z) {
            (false, false) => Pauli::I,
            (true, false) => Pauli::X,
            (true, true) => Pauli::Y,
            (false, true) => Pauli::Z,
        }
    }

    /// Check if this Pauli is diagonal (I or Z)
    pub fn is_diagonal(self) -> bool {
        matches!(self, Pauli::I | Pauli::Z)
    }

    /// Whether two single-qubit Paulis commute
    pub fn commutes_with(self, other: Pauli) -> bool {
        self == Pauli::I || other == Pauli::I || self == other
    }
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A tensor product of Pauli operators over a register, e.g. `"XZI"`
///
/// Character `k` of the textual form acts on qubit `k`.
///
/// # Example
/// ```
/// use qmine_core::{Pauli, PauliString};
///
/// let zz: PauliString = "ZZ".parse().unwrap();
/// assert_eq!(zz.num_qubits(), 2);
/// assert_eq!(zz.get(1), Pauli::Z);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PauliString {
    paulis: Vec<Pauli>,
}

impl PauliString {
    /// The identity string on `num_qubits` qubits
    pub fn identity(num_qubits: usize) -> Self {
        Self {
            paulis: vec![Pauli::I; num_qubits],
        }
    }

    /// A single Pauli on one qubit, identity elsewhere
    ///
    /// # Errors
    /// Returns [`QuantumError::InvalidQubit`] if `qubit` is outside the register
    pub fn single(num_qubits: usize, qubit: QubitId, pauli: Pauli) -> Result<Self> {
        if qubit.index() >= num_qubits {
            return Err(QuantumError::invalid_qubit(qubit.index(), num_qubits));
        }
        let mut s = Self::identity(num_qubits);
        s.paulis[qubit.index()] = pauli;
        Ok(s)
    }

    /// Build from an explicit list of operators
    pub fn from_paulis(paulis: Vec<Pauli>) -> Self {
        Self { paulis }
    }

    /// Number of qubits the string is defined on
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.paulis.len()
    }

    /// Operator acting on `qubit` (identity past the end)
    #[inline]
    pub fn get(&self, qubit: usize) -> Pauli {
        self.paulis.get(qubit).copied().unwrap_or(Pauli::I)
    }

    /// Set the operator on `qubit`
    ///
    /// # Errors
    /// Returns [`QuantumError::InvalidQubit`] if `qubit` is outside the register
    pub fn set(&mut self, qubit: usize, pauli: Pauli) -> Result<()> {
        let n = self.paulis.len();
        let slot = self
            .paulis
            .get_mut(qubit)
            .ok_or_else(|| QuantumError::invalid_qubit(qubit, n))?;
        *slot = pauli;
        Ok(())
    }

    /// Number of non-identity factors
    pub fn weight(&self) -> usize {
        self.paulis.iter().filter(|p| **p != Pauli::I).count()
    }

    /// Iterate over `(qubit, pauli)` for the non-identity factors
    pub fn support(&self) -> impl Iterator<Item = (usize, Pauli)> + '_ {
        self.paulis
            .iter()
            .enumerate()
            .filter(|(_, p)| **p != Pauli::I)
            .map(|(i, p)| (i, *p))
    }

    /// Whether the two strings commute as operators
    pub fn commutes_with(&self, other: &PauliString) -> bool {
        let n = self.num_qubits().max(other.num_qubits());
        let anti = (0..n)
            .filter(|&q| !self.get(q).commutes_with(other.get(q)))
            .count();
        anti % 2 == 0
    }
}

impl FromStr for PauliString {
    type Err = QuantumError;

    fn from_str(s: &str) -> Result<Self> {
        let paulis = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(Pauli::from_char)
            .collect::<Result<Vec<_>>>()?;
        if paulis.is_empty() {
            return Err(QuantumError::EmptyRegister);
        }
        Ok(Self { paulis })
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in &self.paulis {
            write!(f, "{}", p)?;
        }
        Ok(())
    }
}
