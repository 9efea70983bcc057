//! Game engine: state, move dispatch and rules

mod game;
mod rules;
mod stats;

pub use game::{GameState, GameStatus, MoveResult, ProbeOutcome, RevealedClue};
pub(crate) use game::backend_for;

use crate::config::GameConfig;
use crate::error::Result;
use crate::moves::Move;

/// Start a game
///
/// With `seed = None` a seed is drawn from the thread RNG; it is recorded on
/// the returned state either way.
pub fn new_game(config: GameConfig, seed: Option<u64>) -> Result<GameState> {
    GameState::new(config, seed)
}

/// Validate and play one move
pub fn apply_move(state: &mut GameState, mv: Move) -> Result<MoveResult> {
    state.apply_move(mv)
}
