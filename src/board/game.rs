//! The game façade: position plus history, headers and comments.

use std::collections::HashMap;

use super::deploy::DeploySession;
use super::error::{FenError, OpError, StackError};
use super::history::HistoryEntry;
use super::stacks;
use super::state::Position;
use super::types::{Color, Move, MoveFilter, MoveSpec, Piece, PieceType, Square};

/// A playable game. Wraps a [`Position`] with a full-snapshot history
/// (user-visible undo), PGN-style headers, and per-position comments.
#[derive(Clone, Debug, Default)]
pub struct Game {
    position: Position,
    history: Vec<HistoryEntry>,
    headers: HashMap<String, String>,
    comments: HashMap<String, String>,
}

impl Game {
    /// A game from the starting position
    #[must_use]
    pub fn new() -> Self {
        Game::with_position(Position::new())
    }

    /// A game from a FEN string
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Game::with_position(Position::from_fen(fen)?))
    }

    fn with_position(position: Position) -> Self {
        Game {
            position,
            history: Vec::new(),
            headers: HashMap::new(),
            comments: HashMap::new(),
        }
    }

    /// Replace the position, dropping the history.
    pub fn load(&mut self, fen: &str) -> Result<(), FenError> {
        self.position = Position::from_fen(fen)?;
        self.history.clear();
        Ok(())
    }

    /// Empty the board. Headers survive; history and comments do not.
    pub fn clear(&mut self) {
        self.position = Position::empty();
        self.history.clear();
        self.comments.clear();
    }

    #[must_use]
    pub fn fen(&self) -> String {
        self.position.to_fen()
    }

    #[must_use]
    pub fn turn(&self) -> Color {
        self.position.turn()
    }

    #[must_use]
    pub fn move_number(&self) -> u32 {
        self.position.move_number()
    }

    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.position.halfmove_clock()
    }

    /// Read access to the underlying position
    #[must_use]
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// The piece on a square (the carrier, cargo attached)
    #[must_use]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.position.piece_at(sq)
    }

    /// A specific piece kind on a square, looking through the stack
    #[must_use]
    pub fn get_by_type(&self, sq: Square, kind: PieceType) -> Option<Piece> {
        let piece = self.position.piece_at(sq)?;
        if piece.kind == kind {
            return Some(piece);
        }
        piece.carrying.iter().find(|p| p.kind == kind).cloned()
    }

    /// Put a piece on the board. With `allow_combine`, putting onto an
    /// occupied square merges into a stack when the policy allows it.
    pub fn put(&mut self, piece: &Piece, sq: Square, allow_combine: bool) -> Result<(), OpError> {
        let Some(occupant) = self.position.piece_at(sq) else {
            return self.position.place_piece(piece, sq);
        };
        if !allow_combine {
            return Err(OpError::SquareOccupied { square: sq });
        }
        if occupant.color != piece.color {
            return Err(StackError::MixedColors.into());
        }
        let (carrier, cargo) =
            stacks::combine(&occupant, piece).ok_or(StackError::InvalidComposition {
                carrier: occupant.kind,
                cargo: vec![piece.kind],
            })?;
        if !self.position.can_place_on(carrier.kind, sq) {
            return Err(OpError::TerrainMismatch {
                kind: carrier.kind,
                square: sq,
            });
        }
        self.position.remove_piece(sq);
        match self.position.place_piece(&carrier.carrying(cargo), sq) {
            Ok(()) => Ok(()),
            Err(err) => {
                // put back what was there before failing
                self.position.place_piece_unchecked(&occupant, sq);
                Err(err)
            }
        }
    }

    /// Remove and return the piece on a square
    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        self.position.remove_piece(sq)
    }

    /// Legal moves, optionally narrowed to one square or piece kind
    #[must_use]
    pub fn moves(&mut self, filter: MoveFilter) -> Vec<Move> {
        self.position.moves_filtered(filter)
    }

    /// Legal moves as SAN strings
    #[must_use]
    pub fn moves_san(&mut self, filter: MoveFilter) -> Vec<String> {
        self.position
            .moves_filtered(filter)
            .iter()
            .map(|m| self.position.move_to_san(m))
            .collect()
    }

    /// Play a move given in SAN. Returns the move, or None when no
    /// legal move matches (never an error).
    pub fn make_move_san(&mut self, san: &str) -> Option<Move> {
        let m = self.position.parse_san(san).ok()?;
        self.commit_move(m)
    }

    /// Play a move object exactly as returned by [`Game::moves`].
    /// Returns None when it is not among the legal moves.
    pub fn make_move(&mut self, m: &Move) -> Option<Move> {
        if !self.position.generate_moves().contains(m) {
            return None;
        }
        self.commit_move(m.clone())
    }

    /// Play a move given as a from/to spec. Returns the move, or None
    /// when no legal move matches.
    pub fn make_move_spec(&mut self, spec: MoveSpec) -> Option<Move> {
        let m = self
            .position
            .generate_moves()
            .into_iter()
            .find(|m| spec.matches(m))?;
        self.commit_move(m)
    }

    fn commit_move(&mut self, m: Move) -> Option<Move> {
        self.history
            .push(HistoryEntry::new(Some(m.clone()), self.position.clone()));
        self.position.make_move_permanent(&m);
        Some(m)
    }

    /// Take back the latest operation (move, deploy step, commit or
    /// cancel). Returns the undone move when the operation was one.
    pub fn undo(&mut self) -> Option<Move> {
        let entry = self.history.pop()?;
        self.position = entry.position;
        // safer than inverting zone deltas across arbitrary operations
        self.position.recompute_air_defense();
        entry.mv
    }

    /// Number of recorded operations
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// The recorded operations, oldest first
    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    #[must_use]
    pub fn is_check(&self) -> bool {
        self.position.is_check(self.position.turn())
    }

    #[must_use]
    pub fn is_checkmate(&mut self) -> bool {
        self.position.is_checkmate()
    }

    #[must_use]
    pub fn is_stalemate(&mut self) -> bool {
        self.position.is_stalemate()
    }

    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.position.is_draw()
    }

    #[must_use]
    pub fn is_game_over(&mut self) -> bool {
        self.position.is_game_over()
    }

    /// Both commanders aligned with nothing between them
    #[must_use]
    pub fn is_commander_exposed(&self, color: Color) -> bool {
        self.position.is_commander_exposed(color)
    }

    // ---- deploy session surface ----

    #[must_use]
    pub fn deploy_session(&self) -> Option<&DeploySession> {
        self.position.deploy_session()
    }

    #[must_use]
    pub fn can_commit_deploy(&self) -> bool {
        self.position.deploy.can_commit()
    }

    /// Close the active deploy session; the turn passes unless
    /// `switch_turn` is false.
    pub fn commit_deploy_session(&mut self, switch_turn: bool) -> Result<DeploySession, OpError> {
        self.history
            .push(HistoryEntry::new(None, self.position.clone()));
        match self.position.commit_deploy(switch_turn) {
            Ok(session) => Ok(session),
            Err(err) => {
                self.history.pop();
                Err(err)
            }
        }
    }

    /// Abandon the active session, restoring the original stack.
    pub fn cancel_deploy_session(&mut self) -> Result<(), OpError> {
        if self.position.deploy_session().is_none() {
            return Err(OpError::SessionInactive);
        }
        self.history
            .push(HistoryEntry::new(None, self.position.clone()));
        self.position.cancel_deploy();
        Ok(())
    }

    /// Like cancel, but an in-place do-over: nothing is recorded in the
    /// history.
    pub fn reset_deploy_session(&mut self) -> Result<(), OpError> {
        if self.position.deploy_session().is_none() {
            return Err(OpError::SessionInactive);
        }
        self.position.cancel_deploy();
        Ok(())
    }

    // ---- headers and comments ----

    pub fn set_header(&mut self, key: &str, value: &str) {
        self.headers.insert(key.to_string(), value.to_string());
    }

    #[must_use]
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }

    /// Attach a comment to the current position (keyed by its FEN)
    pub fn set_comment(&mut self, text: &str) {
        self.comments.insert(self.fen(), text.to_string());
    }

    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comments.get(&self.fen()).map(String::as_str)
    }

    pub fn delete_comment(&mut self) -> Option<String> {
        let key = self.fen();
        self.comments.remove(&key)
    }
}
