//! CoTuLenh board representation and game logic.
//!
//! Bitboard planes over an 11x12 board, stacking carriers, terrain
//! masks, air-defense zones, and a deploy-session state machine, with
//! FEN and SAN codecs on the outside.
//!
//! # Example
//! ```
//! use cotulenh_engine::board::{Game, MoveFilter};
//!
//! let mut game = Game::new();
//! let moves = game.moves(MoveFilter::ALL);
//! assert!(!moves.is_empty());
//! ```

mod air_defense;
mod check;
#[cfg(debug_assertions)]
mod debug;
mod deploy;
mod error;
mod fen;
mod game;
mod history;
mod make_unmake;
mod movegen;
mod san;
mod stacks;
mod state;
mod terrain;
mod types;

#[cfg(test)]
mod tests;

// Public API - types users need
pub use air_defense::{AirDefense, TransitChecker, TransitState};
pub use deploy::{DeployManager, DeploySession, DeployedEntry};
pub use error::{FenError, OpError, SanError, SquareError, StackError};
pub use fen::START_FEN;
pub use game::Game;
pub use history::HistoryEntry;
pub use stacks::{StackData, StackManager, MAX_STACK_SIZE};
pub use state::Position;
pub use types::{
    flags, Bitboard, BitboardIter, Color, Move, MoveFilter, MoveSpec, Piece, PieceType, Square,
    PIECE_TYPES,
};

// Internal helpers exposed for advanced usage
pub use make_unmake::UndoInfo;
pub use stacks::{combine, validate_composition};
pub use terrain::{is_land, is_water, mask_to_terrain_for, LAND, MIXED, WATER};
