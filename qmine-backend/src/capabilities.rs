//! Backend capabilities and gate sets

use crate::{BackendError, Result};
use qmine_core::CliffordGate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A set of gates from the Clifford gate set, stored as a bitmask
///
/// # Example
/// ```
/// use qmine_backend::GateSet;
/// use qmine_core::CliffordGate;
///
/// let set = GateSet::from_gates(&[CliffordGate::H, CliffordGate::CX]);
/// assert!(set.contains(CliffordGate::H));
/// assert!(!set.contains(CliffordGate::S));
/// assert_eq!(set.len(), 2);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GateSet {
    bits: u16,
}

impl GateSet {
    /// The empty set
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Every gate in [`CliffordGate::ALL`]
    pub const fn all() -> Self {
        Self::from_gates(&CliffordGate::ALL)
    }

    /// Build a set from a slice of gates
    pub const fn from_gates(gates: &[CliffordGate]) -> Self {
        let mut bits = 0u16;
        let mut i = 0;
        while i < gates.len() {
            bits |= 1 << gates[i].ordinal();
            i += 1;
        }
        Self { bits }
    }

    /// Check membership
    #[inline]
    pub const fn contains(&self, gate: CliffordGate) -> bool {
        self.bits & (1 << gate.ordinal()) != 0
    }

    /// Add a gate
    pub fn insert(&mut self, gate: CliffordGate) {
        self.bits |= 1 << gate.ordinal();
    }

    /// Remove a gate
    pub fn remove(&mut self, gate: CliffordGate) {
        self.bits &= !(1 << gate.ordinal());
    }

    /// Copy of `self` without `gate`
    pub const fn without(self, gate: CliffordGate) -> Self {
        Self {
            bits: self.bits & !(1 << gate.ordinal()),
        }
    }

    /// Union of two sets
    pub const fn union(self, other: GateSet) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Whether every gate of `self` is in `other`
    pub const fn is_subset(&self, other: &GateSet) -> bool {
        self.bits & !other.bits == 0
    }

    /// Number of gates in the set
    pub const fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Check if the set is empty
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Members in [`CliffordGate::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = CliffordGate> + '_ {
        CliffordGate::ALL.into_iter().filter(move |g| self.contains(*g))
    }
}

impl FromIterator<CliffordGate> for GateSet {
    fn from_iter<I: IntoIterator<Item = CliffordGate>>(iter: I) -> Self {
        let mut set = GateSet::empty();
        for gate in iter {
            set.insert(gate);
        }
        set
    }
}

impl fmt::Debug for GateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|g| g.name())).finish()
    }
}

/// Capabilities of a simulation backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendCapabilities {
    /// Maximum number of qubits supported
    pub max_qubits: usize,

    /// Supported gate set
    pub supported_gates: GateSet,

    /// Whether expectation values are exact rather than floating-point sums
    pub exact_expectations: bool,
}

impl Default for BackendCapabilities {
    fn default() -> Self {
        Self::stabilizer()
    }
}

impl BackendCapabilities {
    /// Capabilities of the tableau engine: every Clifford gate, boards of
    /// any practical size
    pub fn stabilizer() -> Self {
        Self {
            max_qubits: 1 << 16,
            supported_gates: GateSet::all(),
            exact_expectations: true,
        }
    }

    /// Check if a gate is supported
    pub fn supports_gate(&self, gate: CliffordGate) -> bool {
        self.supported_gates.contains(gate)
    }

    /// Reject registers wider than `max_qubits`
    pub fn check_qubits(&self, num_qubits: usize) -> Result<()> {
        if num_qubits > self.max_qubits {
            return Err(BackendError::CapabilityExceeded(format!(
                "register of {} qubits, backend supports max {}",
                num_qubits, self.max_qubits
            )));
        }
        Ok(())
    }
}
