//! Position state: planes, stacks, deploy session, air defense, clocks.

use std::collections::HashMap;

use super::air_defense::AirDefense;
use super::deploy::DeployManager;
use super::error::OpError;
use super::stacks::{self, StackManager};
use super::terrain;
use super::types::{Bitboard, Color, Move, Piece, PieceType, Square, PIECE_TYPES};

/// Counts position occurrences for the threefold-repetition rule. Keys
/// are FEN placement + turn (clock fields excluded so repeats collide).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct RepetitionTable {
    counts: HashMap<String, u32>,
}

impl RepetitionTable {
    pub(crate) fn new() -> Self {
        RepetitionTable::default()
    }

    pub(crate) fn get(&self, key: &str) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub(crate) fn set(&mut self, key: &str, count: u32) {
        if count == 0 {
            self.counts.remove(key);
        } else {
            self.counts.insert(key.to_string(), count);
        }
    }

    pub(crate) fn increment(&mut self, key: &str) -> u32 {
        let next = self.get(key).saturating_add(1);
        self.set(key, next);
        next
    }
}

/// Cache key for generated move lists; any mutation clears the cache.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct MoveCacheKey {
    pub turn: Color,
    pub occupied: Bitboard,
    pub red: Bitboard,
    pub blue: Bitboard,
    pub deploy_digest: Option<String>,
    pub filter: super::types::MoveFilter,
}

/// The complete game position.
#[derive(Clone, Debug)]
pub struct Position {
    pub(crate) pieces: [Bitboard; 11],
    pub(crate) colors: [Bitboard; 2],
    pub(crate) occupied: Bitboard,
    pub(crate) heroic: Bitboard,
    pub(crate) stacks: StackManager,
    pub(crate) deploy: DeployManager,
    pub(crate) air_defense: AirDefense,
    pub(crate) commanders: [Option<Square>; 2],
    pub(crate) turn: Color,
    pub(crate) halfmove_clock: u32,
    pub(crate) move_number: u32,
    pub(crate) repetition_counts: RepetitionTable,
    pub(crate) move_cache: HashMap<MoveCacheKey, Vec<Move>>,
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        // the move cache is an optimization, not part of the position
        self.pieces == other.pieces
            && self.colors == other.colors
            && self.occupied == other.occupied
            && self.heroic == other.heroic
            && self.stacks == other.stacks
            && self.deploy == other.deploy
            && self.air_defense == other.air_defense
            && self.commanders == other.commanders
            && self.turn == other.turn
            && self.halfmove_clock == other.halfmove_clock
            && self.move_number == other.move_number
            && self.repetition_counts == other.repetition_counts
    }
}

impl Eq for Position {}

impl Position {
    /// The starting position
    #[must_use]
    pub fn new() -> Self {
        Position::from_fen(super::fen::START_FEN).expect("start FEN is valid")
    }

    /// An empty board, red to move
    #[must_use]
    pub fn empty() -> Self {
        Position {
            pieces: [Bitboard::EMPTY; 11],
            colors: [Bitboard::EMPTY; 2],
            occupied: Bitboard::EMPTY,
            heroic: Bitboard::EMPTY,
            stacks: StackManager::new(),
            deploy: DeployManager::new(),
            air_defense: AirDefense::new(),
            commanders: [None, None],
            turn: Color::Red,
            halfmove_clock: 0,
            move_number: 1,
            repetition_counts: RepetitionTable::new(),
            move_cache: HashMap::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn turn(&self) -> Color {
        self.turn
    }

    #[inline]
    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    #[must_use]
    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    #[inline]
    #[must_use]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    #[inline]
    #[must_use]
    pub fn color_plane(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    #[inline]
    #[must_use]
    pub fn piece_plane(&self, kind: PieceType) -> Bitboard {
        self.pieces[kind.index()]
    }

    #[inline]
    #[must_use]
    pub fn heroic_plane(&self) -> Bitboard {
        self.heroic
    }

    #[inline]
    #[must_use]
    pub fn carriers(&self) -> Bitboard {
        self.stacks.carriers()
    }

    /// Forget cached move lists; called on every mutation.
    #[inline]
    pub(crate) fn invalidate_cache(&mut self) {
        self.move_cache.clear();
    }

    #[inline]
    #[must_use]
    pub fn is_occupied(&self, sq: Square) -> bool {
        self.occupied.contains(sq)
    }

    /// Color of the piece on a square, if any
    #[must_use]
    pub fn color_at(&self, sq: Square) -> Option<Color> {
        if self.colors[Color::Red.index()].contains(sq) {
            Some(Color::Red)
        } else if self.colors[Color::Blue.index()].contains(sq) {
            Some(Color::Blue)
        } else {
            None
        }
    }

    /// Kind of the (carrier) piece on a square, if any
    #[must_use]
    pub fn kind_at(&self, sq: Square) -> Option<PieceType> {
        if !self.occupied.contains(sq) {
            return None;
        }
        PIECE_TYPES
            .into_iter()
            .find(|kind| self.pieces[kind.index()].contains(sq))
    }

    /// A copy of the stack on a square, if one exists
    #[must_use]
    pub fn stack_at(&self, sq: Square) -> Option<super::stacks::StackData> {
        self.stacks.get(sq).cloned()
    }

    /// The active deploy session, if any
    #[must_use]
    pub fn deploy_session(&self) -> Option<&super::deploy::DeploySession> {
        self.deploy.session()
    }

    /// A copy of the piece on a square, cargo included for stacks.
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        if let Some(stack) = self.stacks.get(sq) {
            return Some(stack.to_piece());
        }
        let kind = self.kind_at(sq)?;
        let color = self.color_at(sq)?;
        let mut piece = Piece::new(kind, color);
        piece.heroic = self.heroic.contains(sq);
        Some(piece)
    }

    /// True if a piece of this kind may stand on the square's terrain
    #[inline]
    #[must_use]
    pub fn can_place_on(&self, kind: PieceType, sq: Square) -> bool {
        terrain::can_stand_on(kind, sq)
    }

    /// Put a piece on an empty square, updating every plane atomically.
    /// A `carrying` list creates a stack. Errors on occupied squares,
    /// wrong terrain, invalid stack composition, or a second commander.
    pub fn place_piece(&mut self, piece: &Piece, sq: Square) -> Result<(), OpError> {
        if self.occupied.contains(sq) {
            return Err(OpError::SquareOccupied { square: sq });
        }
        if !self.can_place_on(piece.kind, sq) {
            return Err(OpError::TerrainMismatch {
                kind: piece.kind,
                square: sq,
            });
        }
        if piece.kind == PieceType::Commander && self.commanders[piece.color.index()].is_some() {
            return Err(OpError::SecondCommander { color: piece.color });
        }

        if !piece.carrying.is_empty() {
            stacks::validate_composition(&piece.without_cargo(), &piece.carrying)?;
        }
        self.place_piece_unchecked(piece, sq);
        Ok(())
    }

    /// Placement without the policy checks. Used for deploy transients
    /// (the remaining pile at the origin is not a valid stack) and for
    /// replaying deploy tails from FEN.
    pub(crate) fn place_piece_unchecked(&mut self, piece: &Piece, sq: Square) {
        if !piece.carrying.is_empty() {
            let _ = self
                .stacks
                .create_stack(&piece.without_cargo(), &piece.carrying, sq);
        }

        let c = piece.color.index();
        self.pieces[piece.kind.index()] = self.pieces[piece.kind.index()].with(sq);
        self.colors[c] = self.colors[c].with(sq);
        self.occupied = self.occupied.with(sq);
        if piece.heroic {
            self.heroic = self.heroic.with(sq);
        }
        if piece.kind == PieceType::Commander {
            self.commanders[c] = Some(sq);
        }
        self.air_defense
            .add_zone_for(piece.kind, piece.heroic, piece.color, sq);
        self.invalidate_cache();
    }

    /// Remove and return the piece on a square (cargo included), undoing
    /// everything `place_piece` did.
    pub fn remove_piece(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.piece_at(sq)?;
        let c = piece.color.index();

        self.pieces[piece.kind.index()] = self.pieces[piece.kind.index()].without(sq);
        self.colors[c] = self.colors[c].without(sq);
        self.occupied = self.occupied.without(sq);
        self.heroic = self.heroic.without(sq);
        self.stacks.destroy_stack(sq);
        if self.commanders[c] == Some(sq) {
            self.commanders[c] = None;
        }
        self.air_defense.remove_zone(sq, piece.color);
        self.invalidate_cache();
        Some(piece)
    }

    /// Flip the heroic flag of the piece on a square. No-op when empty.
    pub fn set_heroic(&mut self, sq: Square, heroic: bool) {
        if !self.occupied.contains(sq) {
            return;
        }
        self.heroic = if heroic {
            self.heroic.with(sq)
        } else {
            self.heroic.without(sq)
        };
        if let Some(stack) = self.stacks.get_mut(sq) {
            stack.carrier.heroic = heroic;
        }
        if let Some(piece) = self.piece_at(sq) {
            // zone radius depends on the flag
            self.air_defense.remove_zone(sq, piece.color);
            self.air_defense
                .add_zone_for(piece.kind, heroic, piece.color, sq);
        }
        self.invalidate_cache();
    }

    /// All pieces on the board as (square, piece) pairs
    #[must_use]
    pub fn all_pieces(&self) -> Vec<(Square, Piece)> {
        self.occupied
            .iter()
            .filter_map(|sq| self.piece_at(sq).map(|p| (sq, p)))
            .collect()
    }

    /// Rebuild the air-defense maps from the board, used after snapshot
    /// restores.
    pub(crate) fn recompute_air_defense(&mut self) {
        let pieces = self.all_pieces();
        self.air_defense
            .recompute_all(pieces.iter().map(|(sq, p)| (*sq, p)));
    }

    /// 50-move rule or threefold repetition
    #[must_use]
    pub fn is_draw(&self) -> bool {
        if self.halfmove_clock >= 100 {
            return true;
        }
        self.repetition_counts.get(&self.repetition_key()) >= 3
    }

    /// Either commander has been captured. A commander riding inside a
    /// stack is hidden, not captured.
    #[must_use]
    pub fn commander_captured(&self) -> bool {
        self.commander_missing(Color::Red) || self.commander_missing(Color::Blue)
    }

    fn commander_hidden(&self, color: Color) -> bool {
        self.stacks.iter().any(|(_, stack)| {
            stack.carrier.color == color
                && stack
                    .carried
                    .iter()
                    .any(|p| p.kind == PieceType::Commander)
        })
    }

    fn commander_missing(&self, color: Color) -> bool {
        self.commanders[color.index()].is_none() && !self.commander_hidden(color)
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}
