//! Game configuration

use crate::board::Cell;
use crate::error::{GameError, Result};
use qmine_backend::{BackendKind, ClueReadout, GateSet, StateVectorConfig, WeakMeasurement};
use qmine_core::{CliffordGate, Pauli};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How clues are read from the register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClueReadoutMode {
    /// Integer counts from Z measurements of the neighbours
    #[default]
    Projective,
    /// Noisy partial readout, see [`WeakMeasurement`]
    Weak,
    /// Expectation sums, no back-action
    Expectation,
}

/// Which moves a player may make
///
/// Probe and pin are always allowed; the moveset controls the gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveSet {
    /// Probe and pin only
    #[default]
    Classical,
    /// Plus X, Y, Z, H, S
    SingleQubitCore,
    /// Plus every single-qubit gate
    SingleQubitComplete,
    /// Core single-qubit gates plus CX, CZ, SWAP
    TwoQubit,
    /// Every single-qubit gate plus CX, CY, CZ, SWAP
    TwoQubitExtended,
}

const CORE_SINGLE: [CliffordGate; 5] = [
    CliffordGate::X,
    CliffordGate::Y,
    CliffordGate::Z,
    CliffordGate::H,
    CliffordGate::S,
];

const COMPLETE_SINGLE: [CliffordGate; 10] = [
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
];

const CORE_TWO: [CliffordGate; 3] = [CliffordGate::CX, CliffordGate::CZ, CliffordGate::Swap];

impl MoveSet {
    /// Gates the moveset permits
    pub const fn allowed_gates(self) -> GateSet {
        match self {
            MoveSet::Classical => GateSet::empty(),
            MoveSet::SingleQubitCore => GateSet::from_gates(&CORE_SINGLE),
            MoveSet::SingleQubitComplete => GateSet::from_gates(&COMPLETE_SINGLE),
            MoveSet::TwoQubit => {
                GateSet::from_gates(&CORE_SINGLE).union(GateSet::from_gates(&CORE_TWO))
            }
            MoveSet::TwoQubitExtended => GateSet::all(),
        }
    }

    /// Whether `gate` may be played
    pub const fn allows(self, gate: CliffordGate) -> bool {
        self.allowed_gates().contains(gate)
    }

    /// Command tokens a prompt can offer, probe and pin first
    pub fn allowed_tokens(self) -> Vec<&'static str> {
        let mut tokens = vec!["M", "P"];
        tokens.extend(self.allowed_gates().iter().map(CliffordGate::name));
        tokens
    }
}

/// When a game ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinMode {
    /// Won once every certainly-safe cell is explored
    #[default]
    Identify,
    /// Won once no cell can hold a mine
    Clear,
    /// Never ends
    Sandbox,
}

/// Structure of the entangled mine groups for levels `k >= 2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntanglementPattern {
    /// Random Clifford circuit per group
    #[default]
    RandomClifford,
    /// `H` on the first qubit then a CX ladder
    Ghz,
}

/// Single-qubit state given to each mine at level 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalMinePreset {
    /// Any Pauli eigenstate other than |0⟩
    #[default]
    AnyNonZero,
    /// |+⟩, a mine with probability one half
    Equatorial,
    /// |1⟩, a certain mine
    Excited,
}

/// Where the mines are placed
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MineLayout {
    /// Drawn uniformly from the seeded generator
    #[default]
    Random,
    /// Exactly these cells
    Fixed(Vec<Cell>),
}

/// Configuration for a game
///
/// # Example
///
/// ```
/// use qmine_game::{GameConfig, MoveSet, WinMode};
///
/// let config = GameConfig::new()
///     .with_board(6, 6)
///     .with_mines(5)
///     .with_entanglement_level(2)
///     .with_moveset(MoveSet::TwoQubit)
///     .with_win_mode(WinMode::Clear);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board height
    ///
    /// Default: 8
    pub rows: usize,

    /// Board width
    ///
    /// Default: 8
    pub cols: usize,

    /// Number of cells given a mine state at preparation
    ///
    /// Default: 10
    pub mine_count: usize,

    /// 0 classical, 1 independent single-qubit states, `k >= 2` entangled
    /// groups of `k` qubits
    ///
    /// Default: 0
    pub entanglement_level: usize,

    /// Clue readout
    pub clue_readout: ClueReadoutMode,

    /// Basis for expectation clues
    ///
    /// Default: Z
    pub clue_basis: Pauli,

    /// Parameters of the weak readout
    pub weak: WeakMeasurement,

    pub moveset: MoveSet,

    pub win_mode: WinMode,

    /// Simulation engine
    pub backend: BackendKind,

    pub entanglement_pattern: EntanglementPattern,

    pub local_mines: LocalMinePreset,

    /// Cascade reveals from zero clues
    ///
    /// Default: true
    pub flood_fill: bool,

    /// After a gate, explore cells that became certainly safe with a zero
    /// clue
    ///
    /// Default: false
    pub auto_reveal: bool,

    /// Two-qubit gates only on neighbouring cells
    ///
    /// Default: false
    pub require_adjacent: bool,

    pub layout: MineLayout,

    /// Limits for the state-vector engine
    pub state_vector: StateVectorConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 8,
            cols: 8,
            mine_count: 10,
            entanglement_level: 0,
            clue_readout: ClueReadoutMode::default(),
            clue_basis: Pauli::Z,
            weak: WeakMeasurement::default(),
            moveset: MoveSet::default(),
            win_mode: WinMode::default(),
            backend: BackendKind::default(),
            entanglement_pattern: EntanglementPattern::default(),
            local_mines: LocalMinePreset::default(),
            flood_fill: true,
            auto_reveal: false,
            require_adjacent: false,
            layout: MineLayout::default(),
            state_vector: StateVectorConfig::default(),
        }
    }
}

impl GameConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Classical minesweeper on a `rows x cols` board
    pub fn classic(rows: usize, cols: usize, mine_count: usize) -> Self {
        Self::default()
            .with_board(rows, cols)
            .with_mines(mine_count)
    }

    /// Open-ended play with every gate available
    pub fn sandbox(rows: usize, cols: usize, mine_count: usize) -> Self {
        Self::classic(rows, cols, mine_count)
            .with_entanglement_level(2)
            .with_moveset(MoveSet::TwoQubitExtended)
            .with_win_mode(WinMode::Sandbox)
    }

    /// Set the board dimensions
    pub fn with_board(mut self, rows: usize, cols: usize) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    /// Set the number of mines
    pub fn with_mines(mut self, mine_count: usize) -> Self {
        self.mine_count = mine_count;
        self
    }

    pub fn with_entanglement_level(mut self, level: usize) -> Self {
        self.entanglement_level = level;
        self
    }

    pub fn with_clue_readout(mut self, mode: ClueReadoutMode) -> Self {
        self.clue_readout = mode;
        self
    }

    pub fn with_clue_basis(mut self, basis: Pauli) -> Self {
        self.clue_basis = basis;
        self
    }

    /// Use weak clues with the given strength and noise
    pub fn with_weak(mut self, strength: f64, noise: f64) -> Self {
        self.clue_readout = ClueReadoutMode::Weak;
        self.weak = WeakMeasurement::new(strength, noise);
        self
    }

    pub fn with_moveset(mut self, moveset: MoveSet) -> Self {
        self.moveset = moveset;
        self
    }

    pub fn with_win_mode(mut self, win_mode: WinMode) -> Self {
        self.win_mode = win_mode;
        self
    }

    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_entanglement_pattern(mut self, pattern: EntanglementPattern) -> Self {
        self.entanglement_pattern = pattern;
        self
    }

    pub fn with_local_mines(mut self, preset: LocalMinePreset) -> Self {
        self.local_mines = preset;
        self
    }

    pub fn with_flood_fill(mut self, enabled: bool) -> Self {
        self.flood_fill = enabled;
        self
    }

    pub fn with_auto_reveal(mut self, enabled: bool) -> Self {
        self.auto_reveal = enabled;
        self
    }

    pub fn with_require_adjacent(mut self, enabled: bool) -> Self {
        self.require_adjacent = enabled;
        self
    }

    /// Place mines on exactly these cells; also sets the mine count
    pub fn with_layout<I, C>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        let cells: Vec<Cell> = cells.into_iter().map(Into::into).collect();
        self.mine_count = cells.len();
        self.layout = MineLayout::Fixed(cells);
        self
    }

    pub fn with_state_vector(mut self, config: StateVectorConfig) -> Self {
        self.state_vector = config;
        self
    }

    /// Number of cells on the board
    pub fn num_cells(&self) -> usize {
        self.rows * self.cols
    }

    /// Readout handed to the backend for clues
    pub fn clue_readout(&self) -> ClueReadout {
        match self.clue_readout {
            ClueReadoutMode::Projective => ClueReadout::Projective,
            ClueReadoutMode::Weak => ClueReadout::Weak(self.weak),
            ClueReadoutMode::Expectation => ClueReadout::Expectation {
                basis: self.clue_basis,
            },
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(invalid(format!(
                "board must have at least one row and column, got {}x{}",
                self.rows, self.cols
            )));
        }

        let cells = self.rows.checked_mul(self.cols).ok_or_else(|| {
            invalid(format!(
                "a {}x{} board has more cells than can be addressed",
                self.rows, self.cols
            ))
        })?;
        if self.mine_count > cells {
            return Err(invalid(format!(
                "{} mines do not fit on {} cells",
                self.mine_count, cells
            )));
        }

        if let MineLayout::Fixed(layout) = &self.layout {
            if layout.len() != self.mine_count {
                return Err(invalid(format!(
                    "fixed layout has {} cells but mine_count is {}",
                    layout.len(),
                    self.mine_count
                )));
            }
            let mut seen = HashSet::with_capacity(layout.len());
            for cell in layout {
                if cell.row >= self.rows || cell.col >= self.cols {
                    return Err(invalid(format!("layout cell {} is off the board", cell)));
                }
                if !seen.insert(*cell) {
                    return Err(invalid(format!("layout cell {} listed twice", cell)));
                }
            }
        }

        if self.clue_readout == ClueReadoutMode::Weak {
            self.weak
                .validate()
                .map_err(|e| invalid(e.to_string()))?;
        }

        if self.clue_readout == ClueReadoutMode::Expectation && self.clue_basis == Pauli::I {
            return Err(invalid("clue basis must be X, Y or Z".to_string()));
        }

        if self.backend == BackendKind::StateVector {
            self.state_vector
                .validate()
                .map_err(|e| invalid(e.to_string()))?;
            if cells > self.state_vector.max_qubits {
                return Err(invalid(format!(
                    "{} cells exceed the state-vector limit of {} qubits",
                    cells, self.state_vector.max_qubits
                )));
            }
        }

        Ok(())
    }
}

fn invalid(reason: String) -> GameError {
    GameError::InvalidConfig(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!((config.rows, config.cols, config.mine_count), (8, 8, 10));
        assert_eq!(config.clue_basis, Pauli::Z);
        assert!(config.flood_fill);
        assert!(!config.auto_reveal);
        assert_eq!(config.clue_readout(), ClueReadout::Projective);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GameConfig::new()
            .with_board(3, 4)
            .with_weak(0.25, 0.1)
            .with_layout([(0, 0), (2, 3)]);
        assert_eq!(config.mine_count, 2);
        assert_eq!(
            config.clue_readout(),
            ClueReadout::Weak(WeakMeasurement::new(0.25, 0.1))
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        assert!(GameConfig::classic(0, 3, 0).validate().is_err());
        assert!(GameConfig::classic(2, 2, 5).validate().is_err());
        assert!(GameConfig::classic(2, 2, 1)
            .with_layout([(2, 0)])
            .validate()
            .is_err());
        assert!(GameConfig::classic(2, 2, 2)
            .with_layout([(1, 1), (1, 1)])
            .validate()
            .is_err());
        assert!(GameConfig::classic(3, 3, 1)
            .with_weak(1.5, 0.0)
            .validate()
            .is_err());
        assert!(GameConfig::classic(3, 3, 1)
            .with_clue_readout(ClueReadoutMode::Expectation)
            .with_clue_basis(Pauli::I)
            .validate()
            .is_err());
        let too_big = GameConfig::classic(5, 5, 3).with_backend(BackendKind::StateVector);
        assert!(matches!(too_big.validate(), Err(GameError::InvalidConfig(_))));
        assert!(GameConfig::classic(4, 4, 3)
            .with_backend(BackendKind::StateVector)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_overflowing_dimensions_rejected() {
        let huge = GameConfig::classic(usize::MAX / 2, 3, 0);
        assert!(matches!(huge.validate(), Err(GameError::InvalidConfig(_))));
        assert!(matches!(
            crate::engine::GameState::new(GameConfig::classic(usize::MAX, 2, 0), Some(1)),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_moveset_gates() {
        assert!(MoveSet::Classical.allowed_gates().is_empty());
        assert_eq!(MoveSet::SingleQubitCore.allowed_gates().len(), 5);
        assert_eq!(MoveSet::SingleQubitComplete.allowed_gates().len(), 10);
        assert!(MoveSet::TwoQubit.allows(CliffordGate::Swap));
        assert!(!MoveSet::TwoQubit.allows(CliffordGate::CY));
        assert!(!MoveSet::TwoQubit.allows(CliffordGate::Sdg));
        assert!(MoveSet::TwoQubitExtended.allows(CliffordGate::CY));
        assert!(!MoveSet::SingleQubitComplete.allows(CliffordGate::CX));
        assert_eq!(MoveSet::Classical.allowed_tokens(), vec!["M", "P"]);
        assert_eq!(
            MoveSet::SingleQubitCore.allowed_tokens(),
            vec!["M", "P", "X", "Y", "Z", "H", "S"]
        );
    }

    #[test]
    fn test_serde_fills_missing_fields() {
        let config: GameConfig =
            serde_json::from_str(r#"{"rows": 4, "cols": 5, "mine_count": 2}"#).unwrap();
        assert_eq!(config.rows, 4);
        assert_eq!(config.clue_basis, Pauli::Z);
        assert!(config.flood_fill);

        let json = serde_json::to_string(&config).unwrap();
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
