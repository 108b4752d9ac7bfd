//! Check, exposure, and game-ending tests.

use crate::board::types::{Color, MoveFilter, MoveSpec, Square};
use crate::board::{Game, Position};

fn sq(name: &str) -> Square {
    name.parse().unwrap()
}

#[test]
fn test_check_detection() {
    // blue tank on e6 bears down on the red commander on e4
    let pos = Position::from_fen("11/11/11/11/11/11/4t6/11/4C6/11/11/11 r - - 0 1").unwrap();
    assert!(pos.is_check(Color::Red));
    assert!(!pos.is_check(Color::Blue));
}

#[test]
fn test_moves_must_resolve_check() {
    let mut pos =
        Position::from_fen("11/11/11/11/11/11/4t6/11/4C6/11/11/11 r - - 0 1").unwrap();
    for m in pos.generate_moves() {
        let mut probe = pos.clone();
        probe.make_move_permanent(&m);
        assert!(!probe.is_check(Color::Red), "move {m} leaves check");
    }
}

#[test]
fn test_commander_exposure() {
    // scenario: red commander e6, blue commander e8, empty e-file between
    let pos = Position::from_fen("11/11/11/11/4c6/11/4C6/11/11/11/11/11 r - - 0 1").unwrap();
    assert!(pos.is_commander_exposed(Color::Red));
    assert!(pos.is_commander_exposed(Color::Blue));
}

#[test]
fn test_interposed_piece_cures_exposure() {
    for blocker in ["4i6", "4I6"] {
        let fen = format!("11/11/11/11/4c6/{blocker}/4C6/11/11/11/11/11 r - - 0 1");
        let pos = Position::from_fen(&fen).unwrap();
        assert!(!pos.is_commander_exposed(Color::Red), "blocker {blocker}");
    }
}

#[test]
fn test_exposed_position_restricts_moves() {
    // red to move while the commanders stare at each other: every legal
    // move must end the exposure
    let mut pos =
        Position::from_fen("11/11/11/11/4c6/11/4C6/5T5/11/11/11/11 r - - 0 1").unwrap();
    let moves = pos.generate_moves();
    assert!(!moves.is_empty());
    for m in &moves {
        let mut probe = pos.clone();
        probe.make_move_permanent(m);
        assert!(
            !probe.is_commander_exposed(Color::Red),
            "move {m} leaves the commanders facing"
        );
    }
    // the tank stepping onto the file between them is one of the cures
    assert!(moves
        .iter()
        .any(|m| m.from == sq("f5") && m.to == sq("e5")));
}

#[test]
fn test_commander_capture_only_at_range_one() {
    // heroic commander: move range stays unlimited, capture stays 1
    let mut pos =
        Position::from_fen("11/11/11/11/11/11/11/4i6/11/11/4+C6/11 r - - 0 1").unwrap();
    let moves = pos.moves_filtered(MoveFilter::from_square(sq("e2")));
    // e5 is three steps up the file: reachable would mean capture at
    // range 3, which commanders never do
    assert!(!moves.iter().any(|m| m.to == sq("e5") && m.is_capture()));
}

#[test]
fn test_checkmate_scenario() {
    // red commander cornered on k1: checked by the tank on i1, every
    // flight square covered
    let mut game =
        Game::from_fen("2c8/11/11/11/11/11/11/11/11/8m1t/11/8t1C r - - 0 1").unwrap();
    assert!(game.is_check());
    assert!(game.is_checkmate());
    assert!(game.is_game_over());
    assert!(game.moves(MoveFilter::ALL).is_empty());
    assert!(!game.is_stalemate());
}

#[test]
fn test_stalemate_scenario() {
    // red commander on k1, not in check, with every reachable square
    // covered or blocked
    let mut game =
        Game::from_fen("2c8/11/11/11/11/11/11/11/10t/9m1/11/7t2C r - - 0 1").unwrap();
    assert!(!game.is_check());
    assert!(game.is_stalemate());
    assert!(!game.is_checkmate());
    assert!(game.moves(MoveFilter::ALL).is_empty());
}

#[test]
fn test_fifty_move_rule() {
    let game = Game::from_fen("2c8/11/11/11/11/11/11/11/11/11/11/6C4 r - - 100 60").unwrap();
    assert!(game.is_draw());
}

#[test]
fn test_threefold_repetition() {
    let mut game =
        Game::from_fen("2c8/11/11/11/11/11/11/11/11/11/11/6C4 r - - 0 1").unwrap();

    // shuffle both commanders back and forth twice
    for _ in 0..2 {
        assert!(game
            .make_move_spec(MoveSpec::new(sq("g1"), sq("g2")))
            .is_some());
        assert!(game
            .make_move_spec(MoveSpec::new(sq("c12"), sq("c11")))
            .is_some());
        assert!(game
            .make_move_spec(MoveSpec::new(sq("g2"), sq("g1")))
            .is_some());
        assert!(game
            .make_move_spec(MoveSpec::new(sq("c11"), sq("c12")))
            .is_some());
    }
    assert!(game.is_draw());
    assert!(game.is_game_over());
}

#[test]
fn test_commander_capture_ends_game() {
    let mut game = Game::from_fen("2c8/11/11/11/11/11/11/11/11/11/11/11 r - - 0 1").unwrap();
    // red's commander is already gone
    assert!(game.is_game_over());
}
