//! Saved games resume exactly where they left off

use qmine_backend::BackendKind;
use qmine_game::{
    from_bytes, from_json, parse_move, to_bytes, to_json, ClueReadoutMode, GameConfig, GameState,
    Move, MoveResult,
};

const OPENING: [&str; 5] = ["H 2,2", "CX 2,2 3,3", "1,1", "P 4,4", "S 3,3"];
const CONTINUATION: [&str; 6] = ["2,3", "SWAP 1,2 2,2", "4,1", "P 4,4", "Y 3,1", "3,4"];

fn script(commands: &[&str]) -> Vec<Move> {
    commands.iter().map(|c| parse_move(c).unwrap()).collect()
}

fn play(game: &mut GameState, moves: &[Move]) -> Vec<qmine_game::Result<MoveResult>> {
    moves.iter().map(|&mv| game.apply_move(mv)).collect()
}

fn resumed_game_matches(config: GameConfig, restore: impl Fn(&GameState) -> GameState) {
    let mut game = GameState::new(config, Some(2024)).unwrap();
    play(&mut game, &script(&OPENING));

    let mut restored = restore(&game);
    assert_eq!(restored.seed(), game.seed());
    assert_eq!(restored.moves_played(), game.moves_played());
    assert_eq!(restored.snapshot().unwrap(), game.snapshot().unwrap());

    let tail = script(&CONTINUATION);
    assert_eq!(play(&mut restored, &tail), play(&mut game, &tail));
    assert_eq!(restored.snapshot().unwrap(), game.snapshot().unwrap());
    assert_eq!(restored.status(), game.status());
}

#[test]
fn json_resume_on_stabilizer_engine() {
    let config = GameConfig::sandbox(4, 4, 5);
    resumed_game_matches(config, |game| from_json(&to_json(game).unwrap()).unwrap());
}

#[test]
fn bincode_resume_on_state_vector_engine() {
    let config = GameConfig::sandbox(4, 4, 5)
        .with_backend(BackendKind::StateVector)
        .with_weak(0.3, 0.2);
    resumed_game_matches(config, |game| from_bytes(&to_bytes(game).unwrap()).unwrap());
}

#[test]
fn bincode_resume_with_expectation_clues() {
    let config = GameConfig::sandbox(3, 4, 3).with_clue_readout(ClueReadoutMode::Expectation);
    resumed_game_matches(config, |game| from_bytes(&to_bytes(game).unwrap()).unwrap());
}

#[test]
fn finished_game_stays_finished_after_reload() {
    let config = GameConfig::classic(2, 2, 1).with_layout([(0, 0)]);
    let mut game = GameState::new(config, Some(1)).unwrap();
    game.apply_move(parse_move("1,1").unwrap()).unwrap();
    assert!(game.status().is_terminal());

    let mut restored = from_json(&to_json(&game).unwrap()).unwrap();
    assert_eq!(restored.loss_cell(), game.loss_cell());
    assert!(restored.apply_move(parse_move("2,2").unwrap()).is_err());
}
