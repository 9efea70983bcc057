//! Read-only projection of a game for rendering layers
//!
//! A [`GameView`] carries exactly what the player has uncovered: exploration
//! and pin flags, revealed clues and where a mine went off. It never holds
//! stabilizer generators or probabilities of unexplored cells.

use crate::board::Cell;
use crate::config::ClueReadoutMode;
use crate::engine::{GameState, GameStatus};
use crate::error::Result;
use qmine_backend::QuantumBackend;
use qmine_core::Pauli;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Grid code for an unexplored cell
pub const GRID_UNEXPLORED: f64 = -1.0;
/// Grid code for a pinned cell
pub const GRID_PINNED: f64 = -2.0;
/// Grid code for a cell where a mine went off
pub const GRID_EXPLODED: f64 = 9.0;

/// What the player sees of one cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CellView {
    pub explored: bool,
    pub pinned: bool,
    /// Clue of an explored cell
    pub clue: Option<f64>,
    /// A probe found a mine here
    pub loss_here: bool,
}

/// Snapshot of a game for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameView {
    pub rows: usize,
    pub cols: usize,
    pub status: GameStatus,
    /// Row-major cells
    pub cells: Vec<CellView>,
}

impl GameView {
    pub fn cell(&self, cell: Cell) -> Option<&CellView> {
        (cell.row < self.rows && cell.col < self.cols)
            .then(|| &self.cells[cell.row * self.cols + cell.col])
    }

    /// Numeric grid for UIs: `-1` unexplored, `-2` pinned, `9` exploded,
    /// otherwise the clue
    pub fn numeric_grid(&self) -> Vec<Vec<f64>> {
        self.cells
            .chunks(self.cols)
            .map(|row| {
                row.iter()
                    .map(|c| {
                        if c.loss_here {
                            GRID_EXPLODED
                        } else if c.explored {
                            c.clue.unwrap_or(0.0)
                        } else if c.pinned {
                            GRID_PINNED
                        } else {
                            GRID_UNEXPLORED
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

impl fmt::Display for GameView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols) {
            let line: Vec<String> = row
                .iter()
                .map(|c| match (c.loss_here, c.explored, c.pinned, c.clue) {
                    (true, ..) => "*".to_string(),
                    (_, true, _, Some(v)) if v.fract() == 0.0 => format!("{}", v as u32),
                    (_, true, _, Some(v)) => format!("{:.1}", v),
                    (_, true, _, None) => "?".to_string(),
                    (_, _, true, _) => "P".to_string(),
                    _ => ".".to_string(),
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        write!(f, "status: {}", self.status)
    }
}

impl GameState {
    /// Player-facing snapshot
    ///
    /// In expectation mode explored cells show the live clue, recomputed
    /// from the current register.
    pub fn snapshot(&self) -> Result<GameView> {
        let live = self.config.clue_readout == ClueReadoutMode::Expectation;
        let mut cells = Vec::with_capacity(self.board.len());
        for index in 0..self.board.len() {
            let explored = self.board.is_explored(index);
            let clue = match (explored, live) {
                (false, _) => None,
                (true, true) => Some(self.live_clue(index, self.config.clue_basis)?),
                (true, false) => self.readings[index].map(|r| r.value),
            };
            cells.push(CellView {
                explored,
                pinned: self.board.is_pinned(index),
                clue,
                loss_here: self.board.is_detonated(index),
            });
        }
        Ok(GameView {
            rows: self.board.rows(),
            cols: self.board.cols(),
            status: self.status,
            cells,
        })
    }

    /// `Σ (1 - ⟨P⟩)/2` over the neighbours, without touching the register
    pub(crate) fn live_clue(&self, index: usize, basis: Pauli) -> Result<f64> {
        let mut sum = 0.0;
        for q in self.board.neighbour_qubits(index) {
            let e = self.backend.expectation_single(&self.register, q, basis)?;
            sum += ((1.0 - e) / 2.0).clamp(0.0, 1.0);
        }
        Ok(sum)
    }
}

/// Player-facing snapshot of `state`
pub fn snapshot(state: &GameState) -> Result<GameView> {
    state.snapshot()
}
