//! Engine invariants exercised through the public API.

use cotulenh_engine::board::{
    is_land, is_water, Bitboard, Color, Game, MoveFilter, Piece, PieceType, Position, Square,
    PIECE_TYPES, START_FEN, WATER,
};

fn sq(name: &str) -> Square {
    name.parse().unwrap()
}

/// occupied(s) <=> red(s) xor blue(s), and exactly one type plane bit.
fn assert_planes_coherent(pos: &Position) {
    for idx in 0..Square::COUNT {
        let square = Square::from_index(idx);
        let occupied = pos.occupied().contains(square);
        let red = pos.color_plane(Color::Red).contains(square);
        let blue = pos.color_plane(Color::Blue).contains(square);
        assert_eq!(occupied, red ^ blue, "color planes off at {square}");

        let type_bits = PIECE_TYPES
            .iter()
            .filter(|kind| pos.piece_plane(**kind).contains(square))
            .count();
        assert_eq!(type_bits, usize::from(occupied), "type planes off at {square}");
    }
}

fn assert_terrain_respected(pos: &Position) {
    for (square, piece) in pos.all_pieces() {
        if piece.kind == PieceType::Navy {
            assert!(is_water(square), "navy aground on {square}");
        } else {
            assert!(is_land(square), "{:?} adrift on {square}", piece.kind);
        }
    }
}

#[test]
fn test_invariants_hold_in_start_position() {
    let pos = Position::new();
    assert_planes_coherent(&pos);
    assert_terrain_respected(&pos);
    assert!(pos.heroic_plane().and(pos.occupied().not()).is_empty());
}

#[test]
fn test_invariants_hold_through_play() {
    use rand::prelude::*;
    let mut rng = StdRng::seed_from_u64(42);
    let mut game = Game::new();

    for _ in 0..40 {
        let moves = game.moves(MoveFilter::ALL);
        if moves.is_empty() {
            break;
        }
        let m = moves[rng.gen_range(0..moves.len())].clone();
        game.make_move(&m).unwrap();

        assert_planes_coherent(game.position());
        assert_terrain_respected(game.position());
        let pos = game.position();
        assert!(pos.heroic_plane().and(pos.occupied().not()).is_empty());
        // every carrier square holds a stack record
        for square in pos.carriers().iter() {
            assert!(pos.stack_at(square).is_some());
        }
    }
}

#[test]
fn test_bitboard_algebra() {
    let bb = Bitboard::file_mask(2).or(Bitboard::rank_mask(4));
    assert_eq!(bb.not().not(), bb);
    assert_eq!(bb.xor(bb), Bitboard::EMPTY);
    assert_eq!(bb.or(Bitboard::EMPTY), bb);
    assert_eq!(bb.and(Bitboard::FULL), bb);
}

#[test]
fn test_bitboard_set_then_clear() {
    let bb = Bitboard::EMPTY.set(99);
    assert!(bb.test(99));
    assert!(!bb.clear(99).test(99));
}

#[test]
fn test_water_mask_matches_spec_count() {
    assert_eq!(WATER.popcount(), 40);
    assert!(is_water(sq("d5")) && is_water(sq("e5")));
    assert!(is_water(sq("d6")) && is_water(sq("e6")));
    assert!(is_land(sq("d5")));
}

#[test]
fn test_fen_round_trip_through_game() {
    let game = Game::new();
    assert_eq!(game.fen(), START_FEN);

    let mut reloaded = Game::new();
    reloaded.load(&game.fen()).unwrap();
    assert_eq!(reloaded.fen(), START_FEN);
}

#[test]
fn test_put_remove_and_get() {
    let mut game = Game::new();
    game.clear();
    assert!(game.get(sq("e4")).is_none());

    let tank = Piece::new(PieceType::Tank, Color::Red);
    game.put(&tank, sq("e4"), false).unwrap();
    assert_eq!(game.get(sq("e4")).unwrap().kind, PieceType::Tank);

    // occupied without combine is refused
    assert!(game
        .put(&Piece::new(PieceType::Infantry, Color::Red), sq("e4"), false)
        .is_err());
    // with combine the tank takes the infantry aboard
    game.put(&Piece::new(PieceType::Infantry, Color::Red), sq("e4"), true)
        .unwrap();
    let stack = game.get(sq("e4")).unwrap();
    assert_eq!(stack.kind, PieceType::Tank);
    assert_eq!(stack.carrying.len(), 1);
    assert_eq!(
        game.get_by_type(sq("e4"), PieceType::Infantry).unwrap().kind,
        PieceType::Infantry
    );

    let removed = game.remove(sq("e4")).unwrap();
    assert_eq!(removed.carrying.len(), 1);
    assert!(game.get(sq("e4")).is_none());
}

#[test]
fn test_put_refuses_second_commander() {
    let mut game = Game::new();
    game.clear();
    let commander = Piece::new(PieceType::Commander, Color::Red);
    game.put(&commander, sq("e4"), false).unwrap();
    assert!(game.put(&commander, sq("f4"), false).is_err());
}

#[test]
fn test_headers_and_comments() {
    let mut game = Game::new();
    game.set_header("Event", "Casual");
    assert_eq!(game.header("Event"), Some("Casual"));
    assert_eq!(game.header("Site"), None);

    game.set_comment("opening position");
    assert_eq!(game.comment(), Some("opening position"));
    assert_eq!(game.delete_comment().as_deref(), Some("opening position"));
    assert_eq!(game.comment(), None);
}

#[cfg(feature = "serde")]
#[test]
fn test_value_types_serialize() {
    let square = sq("e6");
    let json = serde_json::to_string(&square).unwrap();
    let back: Square = serde_json::from_str(&json).unwrap();
    assert_eq!(square, back);

    let piece = Piece::new(PieceType::Navy, Color::Red)
        .carrying(vec![Piece::new(PieceType::Infantry, Color::Red)]);
    let json = serde_json::to_string(&piece).unwrap();
    let back: Piece = serde_json::from_str(&json).unwrap();
    assert_eq!(piece, back);
}
