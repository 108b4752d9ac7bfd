//! Full-snapshot history entries for user-visible undo.

use super::state::Position;
use super::types::Move;

/// One history record: the complete position as it stood before the
/// operation, plus the move when the operation was a move (deploy
/// commits and cancels snapshot with no move).
#[derive(Clone, Debug)]
pub struct HistoryEntry {
    pub(crate) mv: Option<Move>,
    pub(crate) position: Position,
}

impl HistoryEntry {
    pub(crate) fn new(mv: Option<Move>, position: Position) -> Self {
        HistoryEntry { mv, position }
    }

    /// The move this entry precedes, if it was a move
    #[must_use]
    pub fn played(&self) -> Option<&Move> {
        self.mv.as_ref()
    }
}
