//! Air-defense zones and the air-force transit closure.
//!
//! Anti-air pieces project a circular zone (squared Euclidean distance in
//! rank/file space) whose radius is the piece's level: anti-air 1,
//! missile 2, navy 1, plus one when heroic. Air-force paths are walked
//! square by square through a [`TransitChecker`], which decides between
//! a safe pass, a kamikaze run (one zone, never left), and destruction.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::types::{Bitboard, Color, Piece, PieceType, Square};

/// Highest reachable level: heroic missile (2 + 1).
const MAX_LEVEL: usize = 3;

/// (rank, file) deltas within each radius, by level. Level 0 is unused.
static ZONE_DELTAS: Lazy<[Vec<(i32, i32)>; MAX_LEVEL + 1]> = Lazy::new(|| {
    let mut levels: [Vec<(i32, i32)>; MAX_LEVEL + 1] = Default::default();
    for (level, deltas) in levels.iter_mut().enumerate() {
        let r = level as i32;
        for dr in -r..=r {
            for df in -r..=r {
                if dr * dr + df * df <= r * r {
                    deltas.push((dr, df));
                }
            }
        }
    }
    levels
});

/// Zone level of a piece, zero when the kind projects none.
#[inline]
#[must_use]
pub fn level_of(kind: PieceType, heroic: bool) -> u32 {
    let base = kind.air_defense_level();
    if base == 0 {
        0
    } else if heroic {
        base + 1
    } else {
        base
    }
}

/// The on-board squares within the level's radius of `sq`.
#[must_use]
pub fn zone_for(sq: Square, level: u32) -> Bitboard {
    let mut bb = Bitboard::EMPTY;
    for &(dr, df) in &ZONE_DELTAS[level.min(MAX_LEVEL as u32) as usize] {
        if let Some(target) = sq.offset(dr, df) {
            bb = bb.with(target);
        }
    }
    bb
}

/// Per-color zone maps plus the bitboards of zone-projecting pieces.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AirDefense {
    zones: [HashMap<Square, Bitboard>; 2],
    pieces: [Bitboard; 2],
}

impl AirDefense {
    #[must_use]
    pub fn new() -> Self {
        AirDefense::default()
    }

    /// Drop all state and rebuild from the given pieces.
    pub fn recompute_all<'a, I>(&mut self, pieces: I)
    where
        I: IntoIterator<Item = (Square, &'a Piece)>,
    {
        self.zones = [HashMap::new(), HashMap::new()];
        self.pieces = [Bitboard::EMPTY, Bitboard::EMPTY];
        for (sq, piece) in pieces {
            self.add_zone_for(piece.kind, piece.heroic, piece.color, sq);
        }
    }

    /// Register one piece's zone. Pieces without a level are ignored.
    pub fn add_zone_for(&mut self, kind: PieceType, heroic: bool, color: Color, sq: Square) {
        let level = level_of(kind, heroic);
        if level == 0 {
            return;
        }
        let c = color.index();
        self.zones[c].insert(sq, zone_for(sq, level));
        self.pieces[c] = self.pieces[c].with(sq);
    }

    /// Drop the zone projected from a square, if any.
    pub fn remove_zone(&mut self, sq: Square, color: Color) {
        let c = color.index();
        if self.zones[c].remove(&sq).is_some() {
            self.pieces[c] = self.pieces[c].without(sq);
        }
    }

    /// Move a piece's zone from one square to another.
    pub fn update_zone(
        &mut self,
        old_sq: Square,
        new_sq: Square,
        kind: PieceType,
        heroic: bool,
        color: Color,
    ) {
        self.remove_zone(old_sq, color);
        self.add_zone_for(kind, heroic, color, new_sq);
    }

    /// Squares holding a zone-projecting piece of the color
    #[inline]
    #[must_use]
    pub fn pieces(&self, color: Color) -> Bitboard {
        self.pieces[color.index()]
    }

    /// True when any zone of `defender` covers the square
    #[must_use]
    pub fn is_in_zone(&self, sq: Square, defender: Color) -> bool {
        self.zones[defender.index()]
            .values()
            .any(|zone| zone.contains(sq))
    }

    /// Squares of `defender`'s pieces whose zones cover `sq`
    #[must_use]
    pub fn influencers(&self, sq: Square, defender: Color) -> Vec<Square> {
        self.zones[defender.index()]
            .iter()
            .filter(|(_, zone)| zone.contains(sq))
            .map(|(&owner, _)| owner)
            .collect()
    }
}

/// Outcome of stepping an air-force path through enemy zones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitState {
    /// Not inside any zone so far.
    SafePass,
    /// Inside exactly one zone and never out the other side: the move is
    /// legal but the air force is lost on arrival.
    Kamikaze,
    /// Crossed into a second zone, or re-entered after leaving: the move
    /// is rejected.
    Destroyed,
}

/// Stateful step checker for one directional air-force move.
#[derive(Debug)]
pub struct TransitChecker {
    defender: Color,
    encountered: Vec<Square>,
    left_first_zone: bool,
    result: TransitState,
}

impl TransitChecker {
    #[must_use]
    pub fn new(defender: Color) -> Self {
        TransitChecker {
            defender,
            encountered: Vec::new(),
            left_first_zone: false,
            result: TransitState::SafePass,
        }
    }

    /// Advance one path square and return the running verdict. Once
    /// `Destroyed`, the checker latches.
    pub fn step(&mut self, sq: Square, ad: &AirDefense) -> TransitState {
        if self.result == TransitState::Destroyed {
            return TransitState::Destroyed;
        }

        let influencers = ad.influencers(sq, self.defender);
        if influencers.is_empty() {
            if !self.encountered.is_empty() {
                self.left_first_zone = true;
            }
        } else {
            for owner in influencers {
                if !self.encountered.contains(&owner) {
                    self.encountered.push(owner);
                }
            }
        }

        self.result = if self.encountered.is_empty() {
            TransitState::SafePass
        } else if self.encountered.len() == 1 && !self.left_first_zone {
            TransitState::Kamikaze
        } else {
            TransitState::Destroyed
        };
        self.result
    }

    /// The latest verdict
    #[inline]
    #[must_use]
    pub fn result(&self) -> TransitState {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn test_levels() {
        assert_eq!(level_of(PieceType::AntiAir, false), 1);
        assert_eq!(level_of(PieceType::Missile, false), 2);
        assert_eq!(level_of(PieceType::Navy, false), 1);
        assert_eq!(level_of(PieceType::Missile, true), 3);
        assert_eq!(level_of(PieceType::Tank, false), 0);
        assert_eq!(level_of(PieceType::Tank, true), 0);
    }

    #[test]
    fn test_zone_radius_one() {
        let zone = zone_for(sq("e6"), 1);
        // centre plus four orthogonal neighbours
        assert_eq!(zone.popcount(), 5);
        assert!(zone.contains(sq("e6")));
        assert!(zone.contains(sq("e7")));
        assert!(zone.contains(sq("d6")));
        assert!(!zone.contains(sq("d7"))); // distance sqrt(2) > 1
    }

    #[test]
    fn test_zone_radius_two() {
        let zone = zone_for(sq("e6"), 2);
        assert_eq!(zone.popcount(), 13);
        assert!(zone.contains(sq("d7")));
        assert!(zone.contains(sq("e8")));
        assert!(!zone.contains(sq("d8"))); // distance sqrt(5) > 2
    }

    #[test]
    fn test_zone_clips_at_edges() {
        let zone = zone_for(sq("a1"), 1);
        assert_eq!(zone.popcount(), 3); // a1, a2, b1
    }

    #[test]
    fn test_add_remove_update() {
        let mut ad = AirDefense::new();
        ad.add_zone_for(PieceType::AntiAir, false, Color::Blue, sq("f6"));
        assert!(ad.is_in_zone(sq("f6"), Color::Blue));
        assert!(ad.is_in_zone(sq("f7"), Color::Blue));
        assert!(!ad.is_in_zone(sq("f6"), Color::Red));
        assert_eq!(ad.influencers(sq("f7"), Color::Blue), vec![sq("f6")]);

        ad.update_zone(sq("f6"), sq("h6"), PieceType::AntiAir, false, Color::Blue);
        assert!(!ad.is_in_zone(sq("f7"), Color::Blue));
        assert!(ad.is_in_zone(sq("h7"), Color::Blue));

        ad.remove_zone(sq("h6"), Color::Blue);
        assert!(!ad.is_in_zone(sq("h7"), Color::Blue));
        assert!(ad.pieces(Color::Blue).is_empty());
    }

    #[test]
    fn test_heroic_widens_zone() {
        let mut ad = AirDefense::new();
        ad.add_zone_for(PieceType::AntiAir, true, Color::Red, sq("e6"));
        assert!(ad.is_in_zone(sq("e8"), Color::Red)); // distance 2
    }

    #[test]
    fn test_transit_safe_path() {
        let ad = AirDefense::new();
        let mut checker = TransitChecker::new(Color::Blue);
        assert_eq!(checker.step(sq("e7"), &ad), TransitState::SafePass);
        assert_eq!(checker.step(sq("e8"), &ad), TransitState::SafePass);
    }

    #[test]
    fn test_transit_single_zone_is_kamikaze() {
        let mut ad = AirDefense::new();
        ad.add_zone_for(PieceType::AntiAir, false, Color::Blue, sq("e8"));
        let mut checker = TransitChecker::new(Color::Blue);
        assert_eq!(checker.step(sq("e6"), &ad), TransitState::SafePass);
        assert_eq!(checker.step(sq("e7"), &ad), TransitState::Kamikaze);
        assert_eq!(checker.step(sq("e8"), &ad), TransitState::Kamikaze);
    }

    #[test]
    fn test_transit_two_zones_destroys() {
        let mut ad = AirDefense::new();
        ad.add_zone_for(PieceType::AntiAir, false, Color::Blue, sq("e7"));
        ad.add_zone_for(PieceType::AntiAir, false, Color::Blue, sq("e10"));
        let mut checker = TransitChecker::new(Color::Blue);
        assert_eq!(checker.step(sq("e6"), &ad), TransitState::Kamikaze);
        assert_eq!(checker.step(sq("e7"), &ad), TransitState::Kamikaze);
        assert_eq!(checker.step(sq("e8"), &ad), TransitState::Kamikaze);
        // e9 is covered by the second zone only
        assert_eq!(checker.step(sq("e9"), &ad), TransitState::Destroyed);
    }

    #[test]
    fn test_transit_leaving_a_zone_destroys() {
        // diving into a zone is a kamikaze run; flying out the far side
        // is not survivable
        let mut ad = AirDefense::new();
        ad.add_zone_for(PieceType::AntiAir, false, Color::Blue, sq("e6"));
        let mut checker = TransitChecker::new(Color::Blue);
        assert_eq!(checker.step(sq("e6"), &ad), TransitState::Kamikaze);
        assert_eq!(checker.step(sq("e8"), &ad), TransitState::Destroyed);
        // latched even when stepping back inside
        assert_eq!(checker.step(sq("e6"), &ad), TransitState::Destroyed);
        assert_eq!(checker.result(), TransitState::Destroyed);
    }
}
