//! SAN emit and parse.
//!
//! The grammar is small: `Te3` moves, `Txd4` captures, and `Nc7<d8`
//! stay-captures (`N<d8` is accepted when unambiguous). Emission may
//! append `+`/`#`; parsing strips them.

use super::error::SanError;
use super::state::Position;
use super::types::{Move, PieceType, Square};

impl Position {
    /// Format a move in SAN.
    #[must_use]
    pub fn move_to_san(&self, m: &Move) -> String {
        let mut san = String::new();
        san.push(m.piece.kind.to_char().to_ascii_uppercase());
        if m.is_stay_capture() {
            san.push_str(&m.from.to_string());
            san.push('<');
        } else if m.is_capture() {
            san.push('x');
        }
        san.push_str(&m.to.to_string());

        // deploy steps keep the turn, so check suffixes only apply to
        // whole moves
        if !m.is_deploy() {
            let mut probe = self.clone();
            probe.make_move_permanent(m);
            if probe.is_checkmate() {
                san.push('#');
            } else if probe.is_check(probe.turn()) {
                san.push('+');
            }
        }
        san
    }

    /// Parse a SAN token against the current legal moves.
    pub fn parse_san(&mut self, san: &str) -> Result<Move, SanError> {
        let san = san.trim();
        if san.is_empty() {
            return Err(SanError::Empty);
        }
        let stripped = san.trim_end_matches(['+', '#']);

        let mut chars = stripped.chars();
        let piece_char = chars.next().ok_or(SanError::Empty)?;
        if !piece_char.is_ascii_uppercase() {
            return Err(SanError::InvalidPiece { char: piece_char });
        }
        let kind = PieceType::from_char(piece_char).ok_or(SanError::InvalidPiece {
            char: piece_char,
        })?;
        let rest = chars.as_str();

        let (stay, from, capture_marked, dest_str) = if let Some((before, after)) =
            rest.split_once('<')
        {
            let from = if before.is_empty() {
                None
            } else {
                Some(before.parse::<Square>().map_err(|_| {
                    SanError::InvalidSquare {
                        notation: before.to_string(),
                    }
                })?)
            };
            (true, from, false, after)
        } else if let Some(after) = rest.strip_prefix('x') {
            (false, None, true, after)
        } else {
            (false, None, false, rest)
        };

        let dest: Square = dest_str.parse().map_err(|_| SanError::InvalidSquare {
            notation: dest_str.to_string(),
        })?;

        let matching: Vec<Move> = self
            .generate_moves()
            .into_iter()
            .filter(|m| {
                m.piece.kind == kind
                    && m.to == dest
                    && m.is_stay_capture() == stay
                    && (stay || m.is_capture() == capture_marked)
                    && from.map_or(true, |f| m.from == f)
            })
            .collect();

        match matching.len() {
            0 => Err(SanError::NoMatchingMove {
                san: san.to_string(),
            }),
            1 => Ok(matching.into_iter().next().expect("one match")),
            _ => Err(SanError::AmbiguousMove {
                san: san.to_string(),
            }),
        }
    }
}
