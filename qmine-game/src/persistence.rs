//! Saving and restoring games
//!
//! A saved game holds everything needed to resume exactly: configuration,
//! register, board bitsets, recorded clues, preparation circuit, status and
//! the RNG state. The backend itself is rebuilt from the configuration on
//! load. Two encodings are provided: JSON for inspection and bincode for
//! compact storage.

use crate::board::Board;
use crate::config::GameConfig;
use crate::engine::{backend_for, GameState, GameStatus};
use crate::error::{GameError, Result};
use qmine_backend::{BackendState, ClueReading, QuantumBackend};
use qmine_core::Circuit;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Serialized form of a [`GameState`]
#[derive(Serialize, Deserialize)]
struct SavedGame {
    config: GameConfig,
    seed: u64,
    register: BackendState,
    board: Board,
    readings: Vec<Option<ClueReading>>,
    preparation: Circuit,
    rng: ChaCha8Rng,
    status: GameStatus,
    loss_cell: Option<usize>,
    moves_played: usize,
}

impl SavedGame {
    fn capture(state: &GameState) -> Self {
        Self {
            config: state.config.clone(),
            seed: state.seed,
            register: state.register.clone(),
            board: state.board.clone(),
            readings: state.readings.clone(),
            preparation: state.preparation.clone(),
            rng: state.rng.clone(),
            status: state.status,
            loss_cell: state.loss_cell,
            moves_played: state.moves_played,
        }
    }

    fn restore(self) -> Result<GameState> {
        self.config.validate()?;
        let backend = backend_for(&self.config)?;

        let cells = self.config.num_cells();
        if self.register.kind() != self.config.backend {
            return Err(GameError::Persistence(format!(
                "register belongs to the {} engine but the game is configured for {}",
                self.register.kind(),
                self.config.backend
            )));
        }
        let consistent = backend.num_qubits(&self.register) == cells
            && self.board.rows() == self.config.rows
            && self.board.cols() == self.config.cols
            && self.readings.len() == cells
            && self.preparation.num_qubits() == cells
            && self.loss_cell.map_or(true, |i| i < cells);
        if !consistent {
            return Err(GameError::Persistence(
                "saved game does not match its board dimensions".to_string(),
            ));
        }

        Ok(GameState {
            config: self.config,
            seed: self.seed,
            backend,
            register: self.register,
            board: self.board,
            readings: self.readings,
            preparation: self.preparation,
            rng: self.rng,
            status: self.status,
            loss_cell: self.loss_cell,
            moves_played: self.moves_played,
        })
    }
}

impl Serialize for GameState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        SavedGame::capture(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GameState {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        SavedGame::deserialize(deserializer)?
            .restore()
            .map_err(serde::de::Error::custom)
    }
}

/// Encode a game as JSON
pub fn to_json(state: &GameState) -> Result<String> {
    let json = serde_json::to_string(state)?;
    debug!(bytes = json.len(), "saved game as json");
    Ok(json)
}

/// Restore a game from JSON
pub fn from_json(json: &str) -> Result<GameState> {
    Ok(serde_json::from_str(json)?)
}

/// Encode a game with bincode
pub fn to_bytes(state: &GameState) -> Result<Vec<u8>> {
    let bytes = bincode::serialize(state)?;
    debug!(bytes = bytes.len(), "saved game as bincode");
    Ok(bytes)
}

/// Restore a game from bincode
pub fn from_bytes(bytes: &[u8]) -> Result<GameState> {
    Ok(bincode::deserialize(bytes)?)
}
