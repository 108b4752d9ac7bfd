//! Piece and color types.

use std::fmt;

/// The eleven piece kinds of the game.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PieceType {
    Commander,
    Infantry,
    Tank,
    Militia,
    Engineer,
    Artillery,
    AntiAir,
    Missile,
    AirForce,
    Navy,
    Headquarter,
}

/// All piece kinds, in plane order.
pub const PIECE_TYPES: [PieceType; 11] = [
    PieceType::Commander,
    PieceType::Infantry,
    PieceType::Tank,
    PieceType::Militia,
    PieceType::Engineer,
    PieceType::Artillery,
    PieceType::AntiAir,
    PieceType::Missile,
    PieceType::AirForce,
    PieceType::Navy,
    PieceType::Headquarter,
];

impl PieceType {
    #[inline]
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        match self {
            PieceType::Commander => 0,
            PieceType::Infantry => 1,
            PieceType::Tank => 2,
            PieceType::Militia => 3,
            PieceType::Engineer => 4,
            PieceType::Artillery => 5,
            PieceType::AntiAir => 6,
            PieceType::Missile => 7,
            PieceType::AirForce => 8,
            PieceType::Navy => 9,
            PieceType::Headquarter => 10,
        }
    }

    /// Parse a piece kind from its letter, either case
    #[must_use]
    pub fn from_char(c: char) -> Option<PieceType> {
        match c.to_ascii_lowercase() {
            'c' => Some(PieceType::Commander),
            'i' => Some(PieceType::Infantry),
            't' => Some(PieceType::Tank),
            'm' => Some(PieceType::Militia),
            'e' => Some(PieceType::Engineer),
            'a' => Some(PieceType::Artillery),
            'g' => Some(PieceType::AntiAir),
            's' => Some(PieceType::Missile),
            'f' => Some(PieceType::AirForce),
            'n' => Some(PieceType::Navy),
            'h' => Some(PieceType::Headquarter),
            _ => None,
        }
    }

    /// Convert to the lowercase letter used in FEN
    #[inline]
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            PieceType::Commander => 'c',
            PieceType::Infantry => 'i',
            PieceType::Tank => 't',
            PieceType::Militia => 'm',
            PieceType::Engineer => 'e',
            PieceType::Artillery => 'a',
            PieceType::AntiAir => 'g',
            PieceType::Missile => 's',
            PieceType::AirForce => 'f',
            PieceType::Navy => 'n',
            PieceType::Headquarter => 'h',
        }
    }

    /// Convert to the FEN letter with case based on color (uppercase for Red)
    #[inline]
    #[must_use]
    pub fn to_fen_char(self, color: Color) -> char {
        let c = self.to_char();
        if color == Color::Red {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }

    /// Air-defense level of this kind, before the heroic bonus. Zero
    /// means the piece projects no zone.
    #[inline]
    #[must_use]
    pub(crate) const fn air_defense_level(self) -> u32 {
        match self {
            PieceType::AntiAir => 1,
            PieceType::Missile => 2,
            PieceType::Navy => 1,
            _ => 0,
        }
    }
}

/// The two sides. Red moves first.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Color {
    Red,
    Blue,
}

impl Color {
    #[inline]
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        match self {
            Color::Red => 0,
            Color::Blue => 1,
        }
    }

    /// Returns the opposite color
    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Color {
        match self {
            Color::Red => Color::Blue,
            Color::Blue => Color::Red,
        }
    }

    /// FEN turn-field letter ('r' or 'b')
    #[inline]
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            Color::Red => 'r',
            Color::Blue => 'b',
        }
    }

    /// Parse the FEN turn-field letter
    #[must_use]
    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'r' => Some(Color::Red),
            'b' => Some(Color::Blue),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => write!(f, "Red"),
            Color::Blue => write!(f, "Blue"),
        }
    }
}

/// A piece on the board: kind, side, heroic flag, and the pieces it is
/// carrying (at most three, none of which may carry anything itself).
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Piece {
    pub kind: PieceType,
    pub color: Color,
    pub heroic: bool,
    pub carrying: Vec<Piece>,
}

impl Piece {
    /// A plain, non-heroic piece with no cargo
    #[inline]
    #[must_use]
    pub fn new(kind: PieceType, color: Color) -> Self {
        Piece {
            kind,
            color,
            heroic: false,
            carrying: Vec::new(),
        }
    }

    /// Same piece with the heroic flag set
    #[inline]
    #[must_use]
    pub fn heroic(mut self) -> Self {
        self.heroic = true;
        self
    }

    /// Same piece carrying the given cargo
    #[inline]
    #[must_use]
    pub fn carrying(mut self, cargo: Vec<Piece>) -> Self {
        self.carrying = cargo;
        self
    }

    /// True when this record matches another by kind, color and heroic
    /// flag (cargo ignored) - the identity used by deploy sessions.
    #[inline]
    #[must_use]
    pub fn same_unit(&self, other: &Piece) -> bool {
        self.kind == other.kind && self.color == other.color && self.heroic == other.heroic
    }

    /// The piece stripped of its cargo
    #[must_use]
    pub fn without_cargo(&self) -> Piece {
        Piece {
            kind: self.kind,
            color: self.color,
            heroic: self.heroic,
            carrying: Vec::new(),
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.heroic {
            write!(f, "+")?;
        }
        write!(f, "{}", self.kind.to_fen_char(self.color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_round_trip() {
        for kind in PIECE_TYPES {
            assert_eq!(PieceType::from_char(kind.to_char()), Some(kind));
            assert_eq!(
                PieceType::from_char(kind.to_char().to_ascii_uppercase()),
                Some(kind)
            );
        }
        assert_eq!(PieceType::from_char('x'), None);
    }

    #[test]
    fn test_fen_case() {
        assert_eq!(PieceType::Navy.to_fen_char(Color::Red), 'N');
        assert_eq!(PieceType::Navy.to_fen_char(Color::Blue), 'n');
    }

    #[test]
    fn test_plane_indices_are_distinct() {
        let mut seen = [false; 11];
        for kind in PIECE_TYPES {
            assert!(!seen[kind.index()]);
            seen[kind.index()] = true;
        }
    }

    #[test]
    fn test_opponent() {
        assert_eq!(Color::Red.opponent(), Color::Blue);
        assert_eq!(Color::Blue.opponent(), Color::Red);
    }

    #[test]
    fn test_same_unit_ignores_cargo() {
        let bare = Piece::new(PieceType::Navy, Color::Red);
        let loaded = Piece::new(PieceType::Navy, Color::Red)
            .carrying(vec![Piece::new(PieceType::Infantry, Color::Red)]);
        assert!(bare.same_unit(&loaded));
        assert!(!bare.same_unit(&bare.clone().heroic()));
    }

    #[test]
    fn test_display() {
        assert_eq!(Piece::new(PieceType::Tank, Color::Red).to_string(), "T");
        assert_eq!(
            Piece::new(PieceType::Tank, Color::Blue).heroic().to_string(),
            "+t"
        );
    }
}
