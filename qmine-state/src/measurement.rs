//! Z-basis measurement outcomes and the shared outcome-selection rule
//!
//! Both register representations decide random outcomes the same way: a
//! measurement whose result is already fixed by the state returns it without
//! touching the random source, otherwise exactly one uniform draw `u ∈ [0,1)`
//! is consumed and the outcome is `0` iff `u < P(0)`. Replaying the same draws
//! against either representation therefore yields the same outcomes.

use serde::{Deserialize, Serialize};

/// Probabilities this close to 0 or 1 count as certain
pub const CERTAINTY_EPSILON: f64 = 1e-9;

/// Result of a single-qubit Z measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeasurementOutcome {
    /// Measured bit, `1` means the qubit was found in |1⟩
    pub outcome: u8,
    /// Whether the outcome was fixed before measuring (no randomness consumed)
    pub deterministic: bool,
}

impl MeasurementOutcome {
    /// Outcome that was determined by the state
    #[inline]
    pub const fn determined(outcome: u8) -> Self {
        Self {
            outcome,
            deterministic: true,
        }
    }

    /// Outcome that required a random draw
    #[inline]
    pub const fn sampled(outcome: u8) -> Self {
        Self {
            outcome,
            deterministic: false,
        }
    }

    /// `true` if the qubit was found in |1⟩
    #[inline]
    pub const fn is_one(&self) -> bool {
        self.outcome == 1
    }
}

/// Pick an outcome given `P(0)`
///
/// # Arguments
/// * `prob_zero` - Probability of reading `0`
/// * `rng` - Uniform source on `[0, 1)`, called at most once
///
/// # Example
/// ```
/// use qmine_state::measurement::select_outcome;
///
/// let mut calls = 0;
/// let mut rng = || { calls += 1; 0.3 };
/// assert_eq!(select_outcome(1.0, &mut rng).outcome, 0);
/// assert_eq!(select_outcome(0.5, &mut rng).outcome, 0);
/// drop(rng);
/// assert_eq!(calls, 1);
/// ```
pub fn select_outcome(prob_zero: f64, rng: &mut dyn FnMut() -> f64) -> MeasurementOutcome {
    if prob_zero >= 1.0 - CERTAINTY_EPSILON {
        return MeasurementOutcome::determined(0);
    }
    if prob_zero <= CERTAINTY_EPSILON {
        return MeasurementOutcome::determined(1);
    }
    let u = rng();
    MeasurementOutcome::sampled(if u < prob_zero { 0 } else { 1 })
}
