//! Game state and move dispatch

use crate::board::{Board, Cell, FloodStep};
use crate::config::{ClueReadoutMode, GameConfig};
use crate::error::{GameError, Result};
use crate::moves::Move;
use crate::preparation::prepare;
use qmine_backend::{
    AnyBackend, BackendKind, BackendState, ClueReading, ClueReadout, QuantumBackend,
};
use qmine_core::{Circuit, CliffordGate, QubitId};
use qmine_state::MeasurementOutcome;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use tracing::{debug, info, warn};

/// Smallest live clue movement reported as a change
const LIVE_CLUE_EPSILON: f64 = 1e-12;

/// Where a game stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    /// Won or lost; no further moves are accepted
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GameStatus::InProgress => "in progress",
            GameStatus::Won => "won",
            GameStatus::Lost => "lost",
        })
    }
}

/// Raw result of one Z measurement made by a probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    pub cell: Cell,
    /// 1 means a mine
    pub outcome: u8,
    /// The outcome was certain before measuring
    pub deterministic: bool,
}

/// Clue revealed on a newly explored cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevealedClue {
    pub cell: Cell,
    pub reading: ClueReading,
}

/// What an accepted move did
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveResult {
    /// Status after the move
    pub status: GameStatus,
    /// Cells whose displayed state changed
    pub changed: Vec<Cell>,
    /// Clues revealed, in reveal order
    pub clues: Vec<RevealedClue>,
    /// Every probe measurement, flood fill included
    pub probes: Vec<ProbeOutcome>,
}

impl MoveResult {
    /// Whether any probe of this move hit a mine
    pub fn hit_mine(&self) -> bool {
        self.probes.iter().any(|p| p.outcome == 1)
    }
}

/// One game session
///
/// Owns the register, the board and the seeded RNG. A fixed seed and move
/// sequence always replay to the same game.
///
/// # Example
///
/// ```
/// use qmine_game::{new_game, parse_move, GameConfig, GameStatus};
///
/// let mut game = new_game(GameConfig::classic(2, 2, 0), Some(1)).unwrap();
/// let result = game.apply_move(parse_move("1,1").unwrap()).unwrap();
/// assert_eq!(result.status, GameStatus::Won);
/// ```
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) config: GameConfig,
    pub(crate) seed: u64,
    pub(crate) backend: AnyBackend,
    pub(crate) register: BackendState,
    pub(crate) board: Board,
    pub(crate) readings: Vec<Option<ClueReading>>,
    pub(crate) preparation: Circuit,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) status: GameStatus,
    pub(crate) loss_cell: Option<usize>,
    pub(crate) moves_played: usize,
}

/// Disjoint borrows of the parts of a game a probe needs
struct Session<'a> {
    backend: &'a AnyBackend,
    register: &'a mut BackendState,
    rng: &'a mut ChaCha8Rng,
    readout: ClueReadout,
}

impl Session<'_> {
    /// Measure `index`, then read its clue when it is safe
    fn reveal(
        &mut self,
        board: &Board,
        index: usize,
    ) -> Result<(MeasurementOutcome, Option<ClueReading>)> {
        let rng = &mut *self.rng;
        let mut draw = || rng.gen::<f64>();

        let outcome = self
            .backend
            .measure_z(self.register, board.qubit(index), &mut draw)?;
        debug!(
            cell = %board.cell(index),
            outcome = outcome.outcome,
            deterministic = outcome.deterministic,
            "probe measured"
        );
        if outcome.is_one() {
            return Ok((outcome, None));
        }

        let neighbours = board.neighbour_qubits(index);
        let reading = self
            .backend
            .clue_value(self.register, &neighbours, &self.readout, &mut draw)?;
        Ok((outcome, Some(reading)))
    }
}

pub(crate) fn backend_for(config: &GameConfig) -> Result<AnyBackend> {
    Ok(match config.backend {
        BackendKind::Stabilizer => AnyBackend::from_kind(BackendKind::Stabilizer),
        BackendKind::StateVector => AnyBackend::state_vector(config.state_vector.clone())?,
    })
}

impl GameState {
    /// Validate `config`, prepare the board and start a game
    pub fn new(config: GameConfig, seed: Option<u64>) -> Result<Self> {
        config.validate()?;
        let seed = seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let backend = backend_for(&config)?;

        let preparation = prepare(&config, &mut rng)?;
        let mut register = backend.allocate(config.num_cells())?;
        backend.run_circuit(&mut register, &preparation.circuit)?;

        info!(
            rows = config.rows,
            cols = config.cols,
            mines = config.mine_count,
            level = config.entanglement_level,
            backend = %backend.kind(),
            seed,
            "new game"
        );

        Ok(Self {
            board: Board::new(config.rows, config.cols),
            readings: vec![None; config.num_cells()],
            preparation: preparation.circuit,
            config,
            seed,
            backend,
            register,
            rng,
            status: GameStatus::InProgress,
            loss_cell: None,
            moves_played: 0,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Seed the game was started with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Circuit that prepared the register
    pub fn preparation(&self) -> &Circuit {
        &self.preparation
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Accepted moves since the start or the last reset
    pub fn moves_played(&self) -> usize {
        self.moves_played
    }

    /// Cell whose probe ended the game
    pub fn loss_cell(&self) -> Option<Cell> {
        self.loss_cell.map(|i| self.board.cell(i))
    }

    /// Clue recorded when `cell` was explored
    pub fn reading(&self, cell: Cell) -> Option<ClueReading> {
        self.board.index(cell).and_then(|i| self.readings[i])
    }

    /// Rewind to the prepared board
    ///
    /// The preparation circuit is replayed on a fresh register. The RNG is
    /// not rewound, so random outcomes after a reset differ from the first
    /// run.
    pub fn reset(&mut self) -> Result<()> {
        let mut register = self.backend.allocate(self.board.len())?;
        self.backend.run_circuit(&mut register, &self.preparation)?;
        self.register = register;
        self.board.clear();
        self.readings.fill(None);
        self.status = GameStatus::InProgress;
        self.loss_cell = None;
        self.moves_played = 0;
        info!(seed = self.seed, "game reset");
        Ok(())
    }

    /// Validate and play one move
    ///
    /// A rejected move leaves the game untouched. Terminal games reject
    /// every move until [`reset`](Self::reset).
    pub fn apply_move(&mut self, mv: Move) -> Result<MoveResult> {
        match self.dispatch(mv) {
            Ok(result) => {
                debug!(
                    %mv,
                    status = %result.status,
                    changed = result.changed.len(),
                    "move applied"
                );
                Ok(result)
            }
            Err(err) => {
                if err.is_fatal() {
                    warn!(%mv, error = %err, "backend failed during move");
                } else {
                    warn!(%mv, error = %err, "move rejected");
                }
                Err(err)
            }
        }
    }

    fn dispatch(&mut self, mv: Move) -> Result<MoveResult> {
        if self.status.is_terminal() {
            return Err(GameError::illegal(format!("the game is already {}", self.status)));
        }

        let mut result = match mv {
            Move::Probe(cell) => self.probe(cell)?,
            Move::Pin(cell) => self.pin(cell)?,
            Move::Gate1 { gate, cell } => self.gate(gate, &[cell])?,
            Move::Gate2 {
                gate,
                first,
                second,
            } => self.gate(gate, &[first, second])?,
        };
        self.moves_played += 1;

        if self.status == GameStatus::InProgress {
            self.status = self.evaluate()?;
        }
        if self.status.is_terminal() {
            info!(
                status = %self.status,
                moves = self.moves_played,
                explored = self.board.explored_count(),
                "game over"
            );
        }
        result.status = self.status;
        Ok(result)
    }

    pub(crate) fn locate(&self, cell: Cell) -> Result<usize> {
        self.board.index(cell).ok_or(GameError::OutOfBounds {
            cell,
            rows: self.board.rows(),
            cols: self.board.cols(),
        })
    }

    fn probe(&mut self, cell: Cell) -> Result<MoveResult> {
        let index = self.locate(cell)?;
        if self.board.is_revealed(index) {
            return Err(GameError::illegal(format!("cell {} is already explored", cell)));
        }
        if self.board.is_pinned(index) {
            return Err(GameError::illegal(format!("cell {} is pinned", cell)));
        }
        let before = self.live_clues()?;
        let mut result = MoveResult::default();
        self.probe_index(index, &mut result)?;
        self.report_moved_clues(&before, &mut result)?;
        Ok(result)
    }

    /// Mine check, then clue, then flood fill from a zero clue
    fn probe_index(&mut self, index: usize, result: &mut MoveResult) -> Result<()> {
        let mut session = Session {
            backend: &self.backend,
            register: &mut self.register,
            rng: &mut self.rng,
            readout: self.config.clue_readout(),
        };
        let (outcome, reading) = session.reveal(&self.board, index)?;
        let cell = self.board.cell(index);
        result.probes.push(probe_outcome(cell, outcome));
        result.changed.push(cell);

        let Some(reading) = reading else {
            self.board.mark_detonated(index);
            self.detonate(index);
            return Ok(());
        };
        self.board.mark_explored(index);
        self.readings[index] = Some(reading);
        result.clues.push(RevealedClue { cell, reading });

        if !(self.config.flood_fill && reading.resolves_to_zero) {
            return Ok(());
        }

        let readings = &mut self.readings;
        let flood = self.board.flood_fill(index, |board, next| {
            let (outcome, reading) = session.reveal(board, next)?;
            let cell = board.cell(next);
            result.probes.push(probe_outcome(cell, outcome));
            result.changed.push(cell);
            Ok::<_, GameError>(match reading {
                None => FloodStep::Detonate,
                Some(reading) => {
                    readings[next] = Some(reading);
                    result.clues.push(RevealedClue { cell, reading });
                    if reading.resolves_to_zero {
                        FloodStep::Expand
                    } else {
                        FloodStep::Reveal
                    }
                }
            })
        })?;
        if let Some(hit) = flood.detonated {
            self.detonate(hit);
        }
        Ok(())
    }

    fn pin(&mut self, cell: Cell) -> Result<MoveResult> {
        let index = self.locate(cell)?;
        if self.board.is_revealed(index) {
            return Err(GameError::illegal(format!(
                "cell {} is explored and cannot be pinned",
                cell
            )));
        }
        self.board.toggle_pin(index);
        Ok(MoveResult {
            changed: vec![cell],
            ..MoveResult::default()
        })
    }

    fn gate(&mut self, gate: CliffordGate, cells: &[Cell]) -> Result<MoveResult> {
        let indices = cells
            .iter()
            .map(|&cell| self.locate(cell))
            .collect::<Result<SmallVec<[usize; 2]>>>()?;

        if !self.config.moveset.allows(gate) {
            return Err(GameError::illegal(format!(
                "{} is not allowed with the {:?} moveset",
                gate, self.config.moveset
            )));
        }
        if gate.num_qubits() != cells.len() {
            return Err(GameError::illegal(format!(
                "{} acts on {} cell(s), got {}",
                gate,
                gate.num_qubits(),
                cells.len()
            )));
        }
        for (&cell, &index) in cells.iter().zip(&indices) {
            if self.board.is_revealed(index) {
                return Err(GameError::illegal(format!(
                    "cell {} is explored and cannot be manipulated",
                    cell
                )));
            }
        }
        if let [a, b] = indices[..] {
            if a == b {
                return Err(GameError::illegal(format!(
                    "{} needs two different cells",
                    gate
                )));
            }
            if self.config.require_adjacent && !self.board.adjacent(a, b) {
                return Err(GameError::NonAdjacent {
                    first: cells[0],
                    second: cells[1],
                });
            }
        }
        if !self.backend.capabilities().supports_gate(gate) {
            return Err(GameError::UnsupportedGate {
                gate,
                backend: self.backend.name(),
            });
        }

        let before = self.live_clues()?;
        let qubits: SmallVec<[QubitId; 2]> = indices.iter().map(|&i| self.board.qubit(i)).collect();
        self.backend
            .apply_unitary(&mut self.register, gate, &qubits)?;

        let mut result = MoveResult::default();
        if self.config.auto_reveal {
            self.auto_reveal(&mut result)?;
        }
        self.report_moved_clues(&before, &mut result)?;
        Ok(result)
    }

    /// Live clue of every explored cell; empty unless clues are live
    fn live_clues(&self) -> Result<Vec<(usize, f64)>> {
        if self.config.clue_readout != ClueReadoutMode::Expectation {
            return Ok(Vec::new());
        }
        self.board
            .explored()
            .iter()
            .map(|i| Ok((i, self.live_clue(i, self.config.clue_basis)?)))
            .collect()
    }

    /// Add explored cells whose live clue moved away from `before`
    ///
    /// Measuring or rotating one qubit can move the clues around its
    /// entangled partners too, so every explored cell is compared.
    fn report_moved_clues(&self, before: &[(usize, f64)], result: &mut MoveResult) -> Result<()> {
        for &(index, old) in before {
            let cell = self.board.cell(index);
            if result.changed.contains(&cell) {
                continue;
            }
            let now = self.live_clue(index, self.config.clue_basis)?;
            if (now - old).abs() > LIVE_CLUE_EPSILON {
                result.changed.push(cell);
            }
        }
        Ok(())
    }

    /// Explore every unexplored, unpinned cell that is certainly safe and
    /// whose neighbours are all certainly safe
    ///
    /// Runs until a pass explores nothing. A flood fill started from a
    /// revealed cell may collapse superposed neighbours and make further
    /// cells certainly safe.
    fn auto_reveal(&mut self, result: &mut MoveResult) -> Result<()> {
        loop {
            let mut progressed = false;
            for index in 0..self.board.len() {
                if self.board.is_revealed(index) || self.board.is_pinned(index) {
                    continue;
                }
                if !self.certainly_safe(index)? {
                    continue;
                }
                let mut clear = true;
                for n in self.board.neighbours(index) {
                    if !self.certainly_safe(n)? {
                        clear = false;
                        break;
                    }
                }
                if clear {
                    debug!(cell = %self.board.cell(index), "auto reveal");
                    self.probe_index(index, result)?;
                    progressed = true;
                    if self.status.is_terminal() {
                        return Ok(());
                    }
                }
            }
            if !progressed {
                return Ok(());
            }
        }
    }
}

fn probe_outcome(cell: Cell, outcome: MeasurementOutcome) -> ProbeOutcome {
    ProbeOutcome {
        cell,
        outcome: outcome.outcome,
        deterministic: outcome.deterministic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MoveSet, WinMode};
    use crate::parse_move;

    fn play(game: &mut GameState, command: &str) -> Result<MoveResult> {
        game.apply_move(parse_move(command).unwrap())
    }

    #[test]
    fn test_game_state_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<GameState>();
    }

    #[test]
    fn test_seed_recorded() {
        let game = GameState::new(GameConfig::classic(3, 3, 1), Some(99)).unwrap();
        assert_eq!(game.seed(), 99);
        let random = GameState::new(GameConfig::classic(3, 3, 1), None).unwrap();
        let replay = GameState::new(GameConfig::classic(3, 3, 1), Some(random.seed())).unwrap();
        assert_eq!(random.preparation(), replay.preparation());
    }

    #[test]
    fn test_rejected_moves_do_not_mutate() {
        let config = GameConfig::classic(3, 3, 0).with_layout([(0, 0)]);
        let mut game = GameState::new(config, Some(1)).unwrap();
        play(&mut game, "P 2,2").unwrap();

        assert!(matches!(play(&mut game, "2,2"), Err(GameError::IllegalMove(_))));
        assert!(matches!(play(&mut game, "4,1"), Err(GameError::OutOfBounds { .. })));
        assert!(matches!(play(&mut game, "X 1,2"), Err(GameError::IllegalMove(_))));
        assert_eq!(game.moves_played(), 1);
        assert_eq!(game.board().explored_count(), 0);
        assert!(game.board().is_pinned(4));
    }

    #[test]
    fn test_pin_toggles_and_rejects_explored() {
        let config = GameConfig::classic(3, 3, 0)
            .with_layout([(0, 0)])
            .with_flood_fill(false)
            .with_win_mode(WinMode::Sandbox);
        let mut game = GameState::new(config, Some(2)).unwrap();
        play(&mut game, "P 3,3").unwrap();
        assert!(game.board().is_pinned(8));
        play(&mut game, "P 3,3").unwrap();
        assert!(!game.board().is_pinned(8));

        play(&mut game, "2,2").unwrap();
        assert!(matches!(play(&mut game, "P 2,2"), Err(GameError::IllegalMove(_))));
    }

    #[test]
    fn test_gate_checks() {
        let config = GameConfig::classic(3, 3, 0)
            .with_layout([(0, 0)])
            .with_moveset(MoveSet::TwoQubit)
            .with_require_adjacent(true)
            .with_flood_fill(false)
            .with_win_mode(WinMode::Sandbox);
        let mut game = GameState::new(config, Some(3)).unwrap();

        assert!(matches!(play(&mut game, "CX 1,1 1,1"), Err(GameError::IllegalMove(_))));
        assert!(matches!(play(&mut game, "CX 1,1 3,3"), Err(GameError::NonAdjacent { .. })));
        assert!(matches!(play(&mut game, "CY 1,1 1,2"), Err(GameError::IllegalMove(_))));
        play(&mut game, "CX 1,1 1,2").unwrap();

        play(&mut game, "3,3").unwrap();
        assert!(matches!(play(&mut game, "X 3,3"), Err(GameError::IllegalMove(_))));
    }

    #[test]
    fn test_unsupported_gate_is_fatal() {
        use qmine_backend::{GateSet, StateVectorConfig};
        let restricted = StateVectorConfig::new()
            .with_supported_gates(GateSet::all().without(CliffordGate::H));
        let config = GameConfig::classic(2, 2, 0)
            .with_backend(BackendKind::StateVector)
            .with_state_vector(restricted)
            .with_moveset(MoveSet::SingleQubitCore);
        let mut game = GameState::new(config, Some(4)).unwrap();
        let err = play(&mut game, "H 1,1").unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, GameError::UnsupportedGate { gate: CliffordGate::H, .. }));
    }

    #[test]
    fn test_terminal_game_rejects_moves_until_reset() {
        let config = GameConfig::classic(3, 3, 0).with_layout([(0, 0)]);
        let mut game = GameState::new(config, Some(5)).unwrap();
        let result = play(&mut game, "1,1").unwrap();
        assert_eq!(result.status, GameStatus::Lost);
        assert!(result.clues.is_empty());
        assert_eq!(game.loss_cell(), Some(Cell::new(0, 0)));
        assert!(matches!(play(&mut game, "3,3"), Err(GameError::IllegalMove(_))));

        game.reset().unwrap();
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.loss_cell(), None);
        assert!(play(&mut game, "3,3").is_ok());
    }

    #[test]
    fn test_sandbox_survives_mines() {
        let config = GameConfig::classic(2, 2, 0)
            .with_layout([(0, 0)])
            .with_win_mode(WinMode::Sandbox);
        let mut game = GameState::new(config, Some(6)).unwrap();
        let result = play(&mut game, "1,1").unwrap();
        assert!(result.hit_mine());
        assert_eq!(result.status, GameStatus::InProgress);
        assert!(game.board().is_detonated(0));
        assert!(matches!(play(&mut game, "1,1"), Err(GameError::IllegalMove(_))));
    }

    #[test]
    fn test_auto_reveal_after_clearing_gate() {
        let config = GameConfig::classic(1, 3, 0)
            .with_layout([(0, 2)])
            .with_moveset(MoveSet::SingleQubitCore)
            .with_auto_reveal(true)
            .with_win_mode(WinMode::Sandbox);
        let mut game = GameState::new(config, Some(7)).unwrap();
        let result = play(&mut game, "X 1,3").unwrap();
        assert_eq!(game.board().explored_count(), 3);
        assert_eq!(result.probes.len(), 3);
        assert!(result.probes.iter().all(|p| p.deterministic && p.outcome == 0));
    }

    #[test]
    fn test_probe_reports_moved_live_clues() {
        use crate::config::{ClueReadoutMode, LocalMinePreset};
        for seed in 0..8 {
            let config = GameConfig::classic(1, 2, 0)
                .with_layout([(0, 0)])
                .with_entanglement_level(1)
                .with_local_mines(LocalMinePreset::Equatorial)
                .with_clue_readout(ClueReadoutMode::Expectation)
                .with_win_mode(WinMode::Sandbox);
            let mut game = GameState::new(config, Some(seed)).unwrap();
            play(&mut game, "1,2").unwrap();
            assert_eq!(game.snapshot().unwrap().cells[1].clue, Some(0.5));

            // either outcome moves the clue shown on (0,1) away from 0.5
            let result = play(&mut game, "1,1").unwrap();
            assert_eq!(result.changed, vec![Cell::new(0, 0), Cell::new(0, 1)]);
            assert_ne!(game.snapshot().unwrap().cells[1].clue, Some(0.5));
        }
    }

    #[test]
    fn test_probe_reports_entangled_partner_clues() {
        use crate::config::{ClueReadoutMode, EntanglementPattern};
        // Bell pair on (0,0) and (0,3); (0,4) shows the clue of (0,3)
        let config = GameConfig::classic(1, 5, 0)
            .with_layout([(0, 0), (0, 3)])
            .with_entanglement_level(2)
            .with_entanglement_pattern(EntanglementPattern::Ghz)
            .with_clue_readout(ClueReadoutMode::Expectation)
            .with_flood_fill(false)
            .with_win_mode(WinMode::Sandbox);
        let mut game = GameState::new(config, Some(9)).unwrap();
        play(&mut game, "1,5").unwrap();
        let result = play(&mut game, "1,1").unwrap();
        assert_eq!(result.changed, vec![Cell::new(0, 0), Cell::new(0, 4)]);
    }

    #[test]
    fn test_auto_reveal_reaches_a_fixed_point() {
        let commands = [
            "H 2,2", "CX 2,2 2,3", "S 1,1", "SWAP 3,3 4,4", "X 1,4", "CZ 2,1 3,1", "H 4,2",
            "Y 3,3", "CY 1,2 2,2", "Z 4,4", "SX 2,4", "H 1,1",
        ];
        for seed in 0..24 {
            let config = GameConfig::sandbox(4, 4, 5).with_auto_reveal(true);
            let mut game = GameState::new(config, Some(seed)).unwrap();
            for command in commands {
                if play(&mut game, command).is_err() {
                    continue;
                }
                for index in 0..game.board().len() {
                    if game.board().is_revealed(index) || game.board().is_pinned(index) {
                        continue;
                    }
                    let clear = game.certainly_safe(index).unwrap()
                        && game
                            .board()
                            .neighbours(index)
                            .iter()
                            .all(|&n| game.certainly_safe(n).unwrap());
                    assert!(!clear, "seed {}: cell {} left unexplored", seed, index);
                }
            }
        }
    }
}
