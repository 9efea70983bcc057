//! Quantum minesweeper rules engine
//!
//! The board is a register of qubits, one per cell, prepared in a stabilizer
//! state. Probing a cell measures its qubit; clues are read from the
//! neighbours; gates let the player move mines around before committing.
//!
//! # Features
//!
//! - **Preparation**: classical mines, independent single-qubit states or
//!   entangled groups ([`preparation`])
//! - **Rules**: probe, pin and gate moves with identify, clear and sandbox
//!   win modes ([`GameState`])
//! - **Two engines**: tableau or state vector, chosen by [`GameConfig::backend`]
//! - **Move grammar**: textual commands such as `"H 2,3"` ([`parse_move`])
//! - **Snapshots and persistence**: [`GameView`] for display, JSON and
//!   bincode for saving ([`persistence`])
//!
//! # Example
//!
//! ```
//! use qmine_game::{new_game, parse_move, GameConfig, GameStatus};
//!
//! let config = GameConfig::classic(3, 3, 0).with_layout([(0, 0)]);
//! let mut game = new_game(config, Some(7)).unwrap();
//!
//! let result = game.apply_move(parse_move("3,3").unwrap()).unwrap();
//! assert_eq!(result.status, GameStatus::Won);
//! println!("{}", game.snapshot().unwrap());
//! ```

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod moves;
pub mod persistence;
pub mod preparation;
pub mod view;

pub use board::{Board, Cell, CellSet};
pub use config::{
    ClueReadoutMode, EntanglementPattern, GameConfig, LocalMinePreset, MineLayout, MoveSet,
    WinMode,
};
pub use engine::{
    apply_move, new_game, GameState, GameStatus, MoveResult, ProbeOutcome, RevealedClue,
};
pub use error::{GameError, Result};
pub use moves::{parse_move, Move};
pub use persistence::{from_bytes, from_json, to_bytes, to_json};
pub use view::{snapshot, CellView, GameView};
