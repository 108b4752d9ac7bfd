//! Move types and queries.

use std::fmt;

use super::piece::{Piece, PieceType};
use super::square::Square;

/// Move flag bits.
pub mod flags {
    /// The move removes an enemy piece (normal or stay capture).
    pub const CAPTURE: u8 = 1 << 0;
    /// The move merges the mover into a friendly stack on the target.
    pub const COMBINATION: u8 = 1 << 1;
    /// The move takes a piece out of a stack during a deploy session.
    pub const DEPLOY: u8 = 1 << 2;
    /// Air-force transit through a single enemy zone: legal, but the
    /// mover is lost when the move resolves.
    pub const KAMIKAZE: u8 = 1 << 3;
    /// The capture resolves with the attacker staying on its origin.
    pub const STAY_CAPTURE: u8 = 1 << 4;
}

/// A generated move. `to` is the target square; for a stay capture the
/// mover remains on `from` and `to` names the captured piece's square.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub flags: u8,
}

impl Move {
    #[inline]
    #[must_use]
    pub(crate) fn new(from: Square, to: Square, piece: Piece) -> Self {
        Move {
            from,
            to,
            piece,
            captured: None,
            flags: 0,
        }
    }

    #[inline]
    #[must_use]
    pub(crate) fn with_capture(mut self, captured: Piece) -> Self {
        self.captured = Some(captured);
        self.flags |= flags::CAPTURE;
        self
    }

    #[inline]
    #[must_use]
    pub(crate) fn with_flag(mut self, flag: u8) -> Self {
        self.flags |= flag;
        self
    }

    /// Returns true if this move captures a piece
    #[inline]
    #[must_use]
    pub const fn is_capture(&self) -> bool {
        self.flags & flags::CAPTURE != 0
    }

    /// Returns true if the attacker stays on its origin square
    #[inline]
    #[must_use]
    pub const fn is_stay_capture(&self) -> bool {
        self.flags & flags::STAY_CAPTURE != 0
    }

    /// Returns true if this move joins a friendly stack
    #[inline]
    #[must_use]
    pub const fn is_combination(&self) -> bool {
        self.flags & flags::COMBINATION != 0
    }

    /// Returns true if this move is part of a deploy session
    #[inline]
    #[must_use]
    pub const fn is_deploy(&self) -> bool {
        self.flags & flags::DEPLOY != 0
    }

    /// Returns true if the mover is lost when the move resolves
    #[inline]
    #[must_use]
    pub const fn is_kamikaze(&self) -> bool {
        self.flags & flags::KAMIKAZE != 0
    }

    /// Returns true if the mover relocates to `to`
    #[inline]
    #[must_use]
    pub const fn relocates(&self) -> bool {
        !self.is_stay_capture()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if self.is_stay_capture() {
            write!(f, "<")?;
        } else if self.is_capture() {
            write!(f, "x")?;
        }
        Ok(())
    }
}

/// Field filter for `moves()` queries and `move(spec)` matching.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MoveFilter {
    pub square: Option<Square>,
    pub piece_type: Option<PieceType>,
}

impl MoveFilter {
    pub const ALL: MoveFilter = MoveFilter {
        square: None,
        piece_type: None,
    };

    /// Only moves originating from one square
    #[must_use]
    pub fn from_square(sq: Square) -> Self {
        MoveFilter {
            square: Some(sq),
            piece_type: None,
        }
    }

    /// Only moves of one piece kind
    #[must_use]
    pub fn of_type(kind: PieceType) -> Self {
        MoveFilter {
            square: None,
            piece_type: Some(kind),
        }
    }

    #[inline]
    #[must_use]
    pub(crate) fn accepts(&self, m: &Move) -> bool {
        if let Some(sq) = self.square {
            if m.from != sq {
                return false;
            }
        }
        if let Some(kind) = self.piece_type {
            if m.piece.kind != kind {
                return false;
            }
        }
        true
    }
}

/// A `move(spec)` request: select among legal moves by fields.
#[derive(Clone, Copy, Debug)]
pub struct MoveSpec {
    pub from: Square,
    pub to: Square,
    pub piece: Option<PieceType>,
    /// When set, prefer the stay-capture or relocating variant.
    pub stay: Option<bool>,
}

impl MoveSpec {
    #[must_use]
    pub fn new(from: Square, to: Square) -> Self {
        MoveSpec {
            from,
            to,
            piece: None,
            stay: None,
        }
    }

    #[must_use]
    pub(crate) fn matches(&self, m: &Move) -> bool {
        if m.from != self.from || m.to != self.to {
            return false;
        }
        if let Some(kind) = self.piece {
            if m.piece.kind != kind {
                return false;
            }
        }
        if let Some(stay) = self.stay {
            if m.is_stay_capture() != stay {
                return false;
            }
        }
        true
    }
}
