//! Win and loss rules

use super::{GameState, GameStatus};
use crate::config::WinMode;
use crate::error::Result;
use tracing::debug;

impl GameState {
    /// Status implied by the register and board after an accepted move
    ///
    /// Only called while the game is in progress; a loss is recorded by
    /// [`detonate`](Self::detonate) as it happens.
    pub(crate) fn evaluate(&self) -> Result<GameStatus> {
        match self.config.win_mode {
            WinMode::Sandbox => Ok(GameStatus::InProgress),
            WinMode::Clear => {
                for index in 0..self.board.len() {
                    if !self.certainly_safe(index)? {
                        return Ok(GameStatus::InProgress);
                    }
                }
                Ok(GameStatus::Won)
            }
            WinMode::Identify => {
                for index in 0..self.board.len() {
                    if !self.board.is_explored(index) && self.certainly_safe(index)? {
                        return Ok(GameStatus::InProgress);
                    }
                }
                Ok(GameStatus::Won)
            }
        }
    }

    /// Record a probe that found a mine
    pub(crate) fn detonate(&mut self, index: usize) {
        debug!(cell = %self.board.cell(index), "mine hit");
        if self.loss_cell.is_none() {
            self.loss_cell = Some(index);
        }
        if self.config.win_mode != WinMode::Sandbox {
            self.status = GameStatus::Lost;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ClueReadoutMode, GameConfig, LocalMinePreset, MoveSet, WinMode};
    use crate::{parse_move, GameState, GameStatus};

    #[test]
    fn test_identify_ignores_pins_and_mines() {
        let config = GameConfig::classic(1, 3, 0)
            .with_layout([(0, 0)])
            .with_flood_fill(false);
        let mut game = GameState::new(config, Some(1)).unwrap();
        game.apply_move(parse_move("P 1,1").unwrap()).unwrap();
        let r = game.apply_move(parse_move("1,2").unwrap()).unwrap();
        assert_eq!(r.status, GameStatus::InProgress);
        let r = game.apply_move(parse_move("1,3").unwrap()).unwrap();
        assert_eq!(r.status, GameStatus::Won);
    }

    #[test]
    fn test_identify_counts_uncertain_cells_as_unsafe() {
        let config = GameConfig::classic(1, 2, 0)
            .with_layout([(0, 0)])
            .with_entanglement_level(1)
            .with_local_mines(LocalMinePreset::Equatorial)
            .with_clue_readout(ClueReadoutMode::Expectation)
            .with_flood_fill(false);
        let mut game = GameState::new(config, Some(2)).unwrap();
        let r = game.apply_move(parse_move("1,2").unwrap()).unwrap();
        // (1,1) is a mine with probability one half: not certainly safe
        assert_eq!(r.status, GameStatus::Won);
    }

    #[test]
    fn test_clear_needs_every_cell_safe() {
        let config = GameConfig::classic(2, 2, 0)
            .with_layout([(1, 1)])
            .with_moveset(MoveSet::SingleQubitCore)
            .with_win_mode(WinMode::Clear);
        let mut game = GameState::new(config, Some(3)).unwrap();
        let r = game.apply_move(parse_move("P 1,1").unwrap()).unwrap();
        assert_eq!(r.status, GameStatus::InProgress);
        let r = game.apply_move(parse_move("X 2,2").unwrap()).unwrap();
        assert_eq!(r.status, GameStatus::Won);
    }
}
