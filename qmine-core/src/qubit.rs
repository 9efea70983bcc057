//! Qubit addressing and identification

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-safe identifier for a qubit on the board register
///
/// A board with `rows x cols` cells owns exactly `rows * cols` qubits, and
/// cell `(row, col)` is backed by qubit `row * cols + col`.
///
/// # Example
/// ```
/// use qmine_core::QubitId;
///
/// let q0 = QubitId::new(0);
/// let q1 = QubitId::new(1);
/// assert!(q0 < q1);
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QubitId(usize);

impl QubitId {
    /// Create a new qubit identifier
    #[inline]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the underlying index
    ///
    /// # Example
    /// ```
    /// use qmine_core::QubitId;
    /// let q = QubitId::new(5);
    /// assert_eq!(q.index(), 5);
    /// ```
    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<usize> for QubitId {
    #[inline]
    fn from(id: usize) -> Self {
        Self::new(id)
    }
}

impl From<QubitId> for usize {
    #[inline]
    fn from(qid: QubitId) -> Self {
        qid.index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_ordering() {
        let q0 = QubitId::new(0);
        let q1 = QubitId::new(1);
        let q2 = QubitId::new(2);

        assert!(q0 < q1);
        assert!(q1 < q2);
        assert!(q2 > q0);
    }

    #[test]
    fn test_qubit_display() {
        assert_eq!(format!("{}", QubitId::new(5)), "q5");
    }

    #[test]
    fn test_qubit_conversions() {
        let q: QubitId = 7.into();
        assert_eq!(q.index(), 7);
        let i: usize = q.into();
        assert_eq!(i, 7);
    }

    #[test]
    fn test_qubit_serializes_as_plain_index() {
        let json = serde_json::to_string(&QubitId::new(12)).unwrap();
        assert_eq!(json, "12");
        let back: QubitId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, QubitId::new(12));
    }
}
