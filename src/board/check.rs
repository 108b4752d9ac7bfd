//! Check detection, the commanders-face rule, and the legality filter.

use super::state::Position;
use super::types::{Color, Move, PieceType, Square};

impl Position {
    /// The square of a color's commander, when it stands in the open
    /// (a commander riding inside a stack is hidden and untargetable).
    #[must_use]
    pub fn find_commander(&self, color: Color) -> Option<Square> {
        self.pieces[PieceType::Commander.index()]
            .and(self.colors[color.index()])
            .lsb()
            .map(Square::from_index)
    }

    /// True when any pseudo-legal move of `by` captures on the square.
    #[must_use]
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        self.generate_pseudo_legal(by, false)
            .iter()
            .any(|m| m.is_capture() && m.to == sq)
    }

    /// The color's commander is under attack
    #[must_use]
    pub fn is_check(&self, color: Color) -> bool {
        let Some(sq) = self.find_commander(color) else {
            return false;
        };
        self.is_square_attacked(sq, color.opponent())
    }

    /// The commanders-face rule: both commanders on one file or rank
    /// with nothing between them.
    #[must_use]
    pub fn is_commander_exposed(&self, _color: Color) -> bool {
        let (Some(red), Some(blue)) = (
            self.find_commander(Color::Red),
            self.find_commander(Color::Blue),
        ) else {
            return false;
        };
        if red.rank() != blue.rank() && red.file() != blue.file() {
            return false;
        }
        let Some(path) = red.ray_path(blue) else {
            return false;
        };
        path.iter()
            .take_while(|sq| **sq != blue)
            .all(|sq| !self.occupied.contains(*sq))
    }

    /// Apply the move on the minimal-delta tier, test check and
    /// exposure for the mover, and revert.
    pub(crate) fn is_move_legal(&mut self, m: &Move) -> bool {
        let mover = self.turn;
        let info = self.make_move_temporary(m);
        let legal = !self.is_check(mover) && !self.is_commander_exposed(mover);
        self.undo_move_temporary(info);
        legal
    }

    /// Checked and out of moves
    #[must_use]
    pub fn is_checkmate(&mut self) -> bool {
        self.is_check(self.turn) && self.generate_moves().is_empty()
    }

    /// Not checked, but out of moves
    #[must_use]
    pub fn is_stalemate(&mut self) -> bool {
        !self.is_check(self.turn) && self.generate_moves().is_empty()
    }

    /// Checkmate, draw, or a captured commander
    #[must_use]
    pub fn is_game_over(&mut self) -> bool {
        self.commander_captured() || self.is_draw() || self.is_checkmate()
    }
}
