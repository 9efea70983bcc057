//! Board statistics derived from the register
//!
//! These read the quantum state directly and are meant for analysis, tests
//! and tooling. Rendering layers should use the [`GameView`](crate::GameView)
//! instead, which only exposes what the player has uncovered.

use super::GameState;
use crate::board::Cell;
use crate::error::Result;
use qmine_backend::{QuantumBackend, ZERO_TOLERANCE};
use qmine_core::Pauli;

/// Binary entropy in bits
fn binary_entropy(p: f64) -> f64 {
    if p <= 0.0 || p >= 1.0 {
        return 0.0;
    }
    -p * p.log2() - (1.0 - p) * (1.0 - p).log2()
}

impl GameState {
    /// Probability that `cell` holds a mine
    pub fn mine_probability(&self, cell: Cell) -> Result<f64> {
        let index = self.locate(cell)?;
        self.p_mine(index)
    }

    pub(crate) fn p_mine(&self, index: usize) -> Result<f64> {
        Ok(self
            .backend
            .p_mine(&self.register, self.board.qubit(index))?)
    }

    pub(crate) fn certainly_safe(&self, index: usize) -> Result<bool> {
        Ok(self.p_mine(index)? <= ZERO_TOLERANCE)
    }

    /// Expected number of mines on the board, `Σ p_mine`
    pub fn expected_mines(&self) -> Result<f64> {
        let mut total = 0.0;
        for index in 0..self.board.len() {
            total += self.p_mine(index)?;
        }
        Ok(total)
    }

    /// Entanglement entropy of one cell with the rest of the board, in bits
    ///
    /// The reduced state of a qubit has Bloch vector `(⟨X⟩, ⟨Y⟩, ⟨Z⟩)`; its
    /// eigenvalues are `(1 ± |r|)/2`. For stabilizer states `|r|` is 0 or 1,
    /// so the entropy is 1 or 0.
    pub fn entropy(&self, cell: Cell) -> Result<f64> {
        let index = self.locate(cell)?;
        self.entropy_at(index)
    }

    fn entropy_at(&self, index: usize) -> Result<f64> {
        let r2: f64 = self.bloch_at(index)?.iter().map(|e| e * e).sum();
        let r = r2.sqrt().min(1.0);
        Ok(binary_entropy((1.0 + r) / 2.0))
    }

    /// Unclamped Bloch vector `[⟨X⟩, ⟨Y⟩, ⟨Z⟩]` of one cell
    pub fn bloch(&self, cell: Cell) -> Result<[f64; 3]> {
        let index = self.locate(cell)?;
        self.bloch_at(index)
    }

    fn bloch_at(&self, index: usize) -> Result<[f64; 3]> {
        let qubit = self.board.qubit(index);
        let mut vector = [0.0; 3];
        for (slot, basis) in vector.iter_mut().zip([Pauli::X, Pauli::Y, Pauli::Z]) {
            *slot = self.backend.expectation_single(&self.register, qubit, basis)?;
        }
        Ok(vector)
    }

    /// Row-major entropy of every cell
    pub fn entropy_map(&self) -> Result<Vec<f64>> {
        (0..self.board.len()).map(|i| self.entropy_at(i)).collect()
    }

    /// Mean single-cell entropy over the board
    pub fn entanglement_score(&self) -> Result<f64> {
        let map = self.entropy_map()?;
        Ok(map.iter().sum::<f64>() / map.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EntanglementPattern, GameConfig, LocalMinePreset};
    use approx::assert_relative_eq;

    #[test]
    fn test_binary_entropy() {
        assert_eq!(binary_entropy(0.0), 0.0);
        assert_eq!(binary_entropy(1.0), 0.0);
        assert_relative_eq!(binary_entropy(0.5), 1.0);
    }

    #[test]
    fn test_product_states_have_no_entropy() {
        let config = GameConfig::classic(2, 3, 0)
            .with_layout([(0, 0), (1, 2)])
            .with_entanglement_level(1)
            .with_local_mines(LocalMinePreset::Equatorial);
        let game = GameState::new(config, Some(1)).unwrap();
        assert_relative_eq!(game.expected_mines().unwrap(), 1.0);
        assert_relative_eq!(game.mine_probability(Cell::new(0, 0)).unwrap(), 0.5);
        assert_eq!(game.entanglement_score().unwrap(), 0.0);
    }

    #[test]
    fn test_bell_pair_is_maximally_entangled() {
        let config = GameConfig::classic(1, 4, 0)
            .with_layout([(0, 1), (0, 2)])
            .with_entanglement_level(2)
            .with_entanglement_pattern(EntanglementPattern::Ghz);
        let game = GameState::new(config, Some(2)).unwrap();
        let map = game.entropy_map().unwrap();
        assert_relative_eq!(map[0], 0.0);
        assert_relative_eq!(map[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(map[2], 1.0, epsilon = 1e-12);
        assert_relative_eq!(game.entanglement_score().unwrap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(game.entropy(Cell::new(0, 3)).unwrap(), 0.0);
    }
}
