//! Initial state preparation
//!
//! Preparation picks the mine cells and records, as a gate circuit over the
//! whole board, how their qubits are brought out of |0⟩. The circuit is kept
//! with the game so [`GameState::reset`](crate::GameState::reset) can replay
//! it on a fresh register.

use crate::config::{EntanglementPattern, GameConfig, LocalMinePreset, MineLayout};
use crate::error::Result;
use qmine_backend::random_nontrivial_clifford;
use qmine_core::{Circuit, CliffordGate};
use rand::seq::index;
use rand::Rng;
use smallvec::SmallVec;
use tracing::debug;

/// Gate sequences taking |0⟩ to |1⟩, |+⟩, |-⟩, |+i⟩ and |-i⟩
const NONZERO_EIGENSTATES: [&[CliffordGate]; 5] = [
    &[CliffordGate::X],
    &[CliffordGate::H],
    &[CliffordGate::X, CliffordGate::H],
    &[CliffordGate::H, CliffordGate::S],
    &[CliffordGate::H, CliffordGate::Sdg],
];

/// Mine cells and the circuit that prepares them
#[derive(Debug, Clone, PartialEq)]
pub struct Preparation {
    /// Selected cell indices, in grouping order
    pub mines: Vec<usize>,
    /// Gates to apply to `|0...0⟩`
    pub circuit: Circuit,
}

/// Choose the mine cells and build the preparation circuit
///
/// The configuration must already be validated.
pub fn prepare<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Result<Preparation> {
    let num_cells = config.num_cells();
    let mines = match &config.layout {
        MineLayout::Random => index::sample(rng, num_cells, config.mine_count).into_vec(),
        MineLayout::Fixed(cells) => cells
            .iter()
            .map(|cell| cell.row * config.cols + cell.col)
            .collect(),
    };

    let mut circuit = Circuit::new(num_cells)?;
    match config.entanglement_level {
        0 => {
            for &q in &mines {
                circuit.push(CliffordGate::X, &[q])?;
            }
        }
        1 => {
            for &q in &mines {
                match config.local_mines {
                    LocalMinePreset::Excited => circuit.push(CliffordGate::X, &[q])?,
                    LocalMinePreset::Equatorial => circuit.push(CliffordGate::H, &[q])?,
                    LocalMinePreset::AnyNonZero => {
                        let choice = rng.gen_range(0..NONZERO_EIGENSTATES.len());
                        for &gate in NONZERO_EIGENSTATES[choice] {
                            circuit.push(gate, &[q])?;
                        }
                    }
                }
            }
        }
        k => {
            for group in mines.chunks(k) {
                match config.entanglement_pattern {
                    EntanglementPattern::Ghz => ghz(&mut circuit, group)?,
                    EntanglementPattern::RandomClifford => {
                        let local = random_nontrivial_clifford(group.len(), rng)?;
                        embed(&mut circuit, group, &local)?;
                    }
                }
            }
        }
    }

    debug!(
        mines = mines.len(),
        level = config.entanglement_level,
        gates = circuit.len(),
        "prepared board"
    );
    Ok(Preparation { mines, circuit })
}

/// `H` on the first qubit, then CX from each qubit to the next
fn ghz(circuit: &mut Circuit, group: &[usize]) -> Result<()> {
    let Some(&first) = group.first() else {
        return Ok(());
    };
    circuit.push(CliffordGate::H, &[first])?;
    for pair in group.windows(2) {
        circuit.push(CliffordGate::CX, pair)?;
    }
    Ok(())
}

/// Append `local`, written on qubits `0..group.len()`, onto the board qubits
/// in `group`
fn embed(circuit: &mut Circuit, group: &[usize], local: &Circuit) -> Result<()> {
    for op in local.operations() {
        let targets: SmallVec<[usize; 2]> = op.qubits().iter().map(|q| group[q.index()]).collect();
        circuit.push(op.gate(), &targets)?;
    }
    Ok(())
}
