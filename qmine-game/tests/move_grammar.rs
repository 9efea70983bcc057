//! A game driven entirely by typed commands

use qmine_game::{parse_move, Cell, GameConfig, GameError, GameState, GameStatus, Move, MoveSet};

#[test]
fn scripted_session() {
    let config = GameConfig::classic(3, 3, 0)
        .with_layout([(0, 2)])
        .with_moveset(MoveSet::SingleQubitCore);
    let mut game = GameState::new(config, Some(8)).unwrap();

    let script: [(&str, Result<(), fn(&GameError) -> bool>); 8] = [
        ("p 1 , 3", Ok(())),
        ("M 1,3", Err(|e| matches!(e, GameError::IllegalMove(_)))),
        ("CX 1,1 1,2", Err(|e| matches!(e, GameError::IllegalMove(_)))),
        ("H 0,1", Err(|e| matches!(e, GameError::InvalidCommand { .. }))),
        ("3,4", Err(|e| matches!(e, GameError::OutOfBounds { .. }))),
        ("fire 1,1", Err(|e| matches!(e, GameError::InvalidCommand { .. }))),
        ("m 3,1", Ok(())),
        ("2,2", Err(|e| matches!(e, GameError::IllegalMove(_)))),
    ];

    for (command, expected) in script {
        let outcome = parse_move(command).and_then(|mv| game.apply_move(mv));
        match (outcome, expected) {
            (Ok(_), Ok(())) => {}
            (Err(err), Err(check)) => assert!(check(&err), "{}: unexpected {}", command, err),
            (outcome, _) => panic!("{}: unexpected {:?}", command, outcome),
        }
    }

    // the cascade from (3,1) opens everything but the pinned mine
    assert_eq!(game.board().explored_count(), 8);
    assert_eq!(game.reading(Cell::new(0, 1)).unwrap().value, 1.0);
    assert_eq!(game.reading(Cell::new(0, 0)).unwrap().value, 0.0);
    assert!(game.board().is_pinned(2));
    assert_eq!(game.status(), GameStatus::Won);
    assert_eq!(game.moves_played(), 2);
}

#[test]
fn every_allowed_token_parses() {
    for moveset in [
        MoveSet::Classical,
        MoveSet::SingleQubitCore,
        MoveSet::SingleQubitComplete,
        MoveSet::TwoQubit,
        MoveSet::TwoQubitExtended,
    ] {
        let tokens = moveset.allowed_tokens();
        assert_eq!(&tokens[..2], &["M", "P"]);

        for gate in moveset.allowed_gates().iter() {
            assert!(tokens.contains(&gate.name()));
            let command = match gate.num_qubits() {
                1 => format!("{} 2,2", gate.name().to_lowercase()),
                _ => format!("{} 2,2  2,3", gate.name()),
            };
            let mv = parse_move(&command).unwrap();
            assert!(moveset.allows(gate));
            assert_eq!(mv.to_string().parse::<Move>().unwrap(), mv);
        }
    }
}
