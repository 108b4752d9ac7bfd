// Crate root - export modules
pub mod board;

pub use board::{
    Bitboard, Color, FenError, Game, Move, MoveFilter, MoveSpec, OpError, Piece, PieceType,
    Position, SanError, Square, StackError, START_FEN,
};
