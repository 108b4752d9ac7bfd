//! Static terrain masks.
//!
//! Water covers files a-c plus the four river squares d5, e5, d6, e6;
//! land covers files c-k. File c and the river squares are mixed terrain,
//! standing in both masks. Navies live on water, everything else on land.

use super::types::{Bitboard, PieceType, Square};

/// Water squares: files a, b, c plus d5, e5, d6, e6 (40 squares).
pub const WATER: Bitboard = {
    let mut bb = Bitboard::EMPTY;
    let mut rank = 0;
    while rank < Square::RANKS {
        let mut file = 0;
        while file <= 2 {
            bb = bb.set(rank * Square::FILES + file);
            file += 1;
        }
        rank += 1;
    }
    // river squares
    bb = bb.set(4 * Square::FILES + 3); // d5
    bb = bb.set(4 * Square::FILES + 4); // e5
    bb = bb.set(5 * Square::FILES + 3); // d6
    bb = bb.set(5 * Square::FILES + 4); // e6
    bb
};

/// Land squares: files c through k (108 squares).
pub const LAND: Bitboard = {
    let mut bb = Bitboard::EMPTY;
    let mut rank = 0;
    while rank < Square::RANKS {
        let mut file = 2;
        while file < Square::FILES {
            bb = bb.set(rank * Square::FILES + file);
            file += 1;
        }
        rank += 1;
    }
    bb
};

/// Mixed terrain: file c plus the river squares.
pub const MIXED: Bitboard = WATER.and(LAND);

/// Returns true if the square is water
#[inline]
#[must_use]
pub fn is_water(sq: Square) -> bool {
    WATER.contains(sq)
}

/// Returns true if the square is land
#[inline]
#[must_use]
pub fn is_land(sq: Square) -> bool {
    LAND.contains(sq)
}

/// The squares a piece of this kind may stand on
#[inline]
#[must_use]
pub const fn terrain_for(kind: PieceType) -> Bitboard {
    match kind {
        PieceType::Navy => WATER,
        _ => LAND,
    }
}

/// Restrict a square set to the terrain the piece kind accepts
#[inline]
#[must_use]
pub fn mask_to_terrain_for(kind: PieceType, bb: Bitboard) -> Bitboard {
    bb.and(terrain_for(kind))
}

/// Returns true if a piece of this kind may stand on the square
#[inline]
#[must_use]
pub fn can_stand_on(kind: PieceType, sq: Square) -> bool {
    terrain_for(kind).contains(sq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_counts() {
        assert_eq!(WATER.popcount(), 40);
        assert_eq!(LAND.popcount(), 108);
        assert_eq!(MIXED.popcount(), 16);
        assert_eq!(WATER.or(LAND), Bitboard::FULL);
    }

    #[test]
    fn test_river_squares_are_mixed() {
        for name in ["d5", "e5", "d6", "e6"] {
            let sq: Square = name.parse().unwrap();
            assert!(is_water(sq), "{name} should be water");
            assert!(is_land(sq), "{name} should be land");
        }
        // neighbours of the river are land only
        for name in ["d4", "e4", "d7", "e7", "f5", "f6"] {
            let sq: Square = name.parse().unwrap();
            assert!(!is_water(sq), "{name} should not be water");
        }
    }

    #[test]
    fn test_file_c_is_mixed() {
        for rank in 1..=12 {
            let sq: Square = format!("c{rank}").parse().unwrap();
            assert!(is_water(sq) && is_land(sq));
        }
    }

    #[test]
    fn test_terrain_for() {
        let a1: Square = "a1".parse().unwrap();
        let e4: Square = "e4".parse().unwrap();
        assert!(can_stand_on(PieceType::Navy, a1));
        assert!(!can_stand_on(PieceType::Navy, e4));
        assert!(can_stand_on(PieceType::Tank, e4));
        assert!(!can_stand_on(PieceType::Tank, a1));

        // mixed accepts both
        let c7: Square = "c7".parse().unwrap();
        assert!(can_stand_on(PieceType::Navy, c7));
        assert!(can_stand_on(PieceType::Infantry, c7));
    }

    #[test]
    fn test_mask_to_terrain_for() {
        let all = Bitboard::FULL;
        assert_eq!(mask_to_terrain_for(PieceType::Navy, all), WATER);
        assert_eq!(mask_to_terrain_for(PieceType::Artillery, all), LAND);
    }
}
