//! Two-tier move execution.
//!
//! The temporary tier records only the squares a move touches and is
//! cheap enough for the legality filter to probe every candidate. The
//! permanent tier (driven by the game façade, which snapshots history
//! first) also advances clocks, the turn, and the repetition counter.

use super::deploy::{DeployedEntry, DeploySession};
use super::error::OpError;
use super::stacks;
use super::state::Position;
use super::types::{Color, Move, Piece, Square};

/// Minimal delta for reverting one temporarily-made move. Air-defense
/// zones revert for free: placement and removal maintain them, so
/// restoring the touched squares restores the zones.
#[derive(Debug)]
pub enum UndoInfo {
    Standard {
        from: Square,
        to: Square,
        prior_from: Option<Piece>,
        prior_to: Option<Piece>,
    },
    Deploy {
        /// The probed move opened the session, so undo must close it.
        initiated: bool,
    },
}

impl Position {
    /// Execute a move on the board only. Clocks, turn, and repetition
    /// state are untouched; pair with [`Position::undo_move_temporary`]
    /// on every exit path.
    pub(crate) fn make_move_temporary(&mut self, m: &Move) -> UndoInfo {
        if m.is_deploy() {
            let initiated = !self.deploy.is_active();
            if initiated {
                let stack = self
                    .stack_at(m.from)
                    .expect("deploy move from a square without a stack");
                self.deploy
                    .initiate(m.from, &stack, self.turn)
                    .expect("no session is active");
            }
            self.apply_deploy_step(&m.piece, m.to, m.is_kamikaze())
                .expect("generated deploy step applies");
            UndoInfo::Deploy { initiated }
        } else {
            let prior_from = self.piece_at(m.from);
            let prior_to = self.piece_at(m.to);
            self.execute_standard(m);
            UndoInfo::Standard {
                from: m.from,
                to: m.to,
                prior_from,
                prior_to,
            }
        }
    }

    /// Revert a temporarily-made move.
    pub(crate) fn undo_move_temporary(&mut self, info: UndoInfo) {
        match info {
            UndoInfo::Standard {
                from,
                to,
                prior_from,
                prior_to,
            } => {
                self.remove_piece(from);
                self.remove_piece(to);
                if let Some(piece) = prior_from {
                    self.place_piece_unchecked(&piece, from);
                }
                if let Some(piece) = prior_to {
                    self.place_piece_unchecked(&piece, to);
                }
            }
            UndoInfo::Deploy { initiated } => {
                self.undo_deploy_step();
                if initiated {
                    self.deploy.cancel();
                }
            }
        }
    }

    /// Board mechanics shared by both tiers.
    fn execute_standard(&mut self, m: &Move) {
        if m.is_stay_capture() {
            self.remove_piece(m.to);
            if m.is_kamikaze() {
                self.remove_piece(m.from);
            }
            return;
        }

        let moved = self
            .remove_piece(m.from)
            .expect("move origin holds a piece");
        let target = self.remove_piece(m.to);

        if m.is_kamikaze() {
            // the air force went down over the target square
            return;
        }
        if m.is_combination() {
            let occupant = target.expect("combination target is occupied");
            if let Some((carrier, cargo)) = stacks::combine(&occupant, &moved) {
                self.place_piece_unchecked(&carrier.carrying(cargo), m.to);
            }
            return;
        }
        self.place_piece_unchecked(&moved, m.to);
    }

    /// Execute a move for keeps: board, clocks, turn, repetition. The
    /// caller (the façade) pushes its history snapshot first. Deploy
    /// steps leave clocks and turn to the session commit.
    pub(crate) fn make_move_permanent(&mut self, m: &Move) {
        if m.is_deploy() {
            if !self.deploy.is_active() {
                if let Some(stack) = self.stack_at(m.from) {
                    let _ = self.deploy.initiate(m.from, &stack, self.turn);
                }
            }
            let _ = self.apply_deploy_step(&m.piece, m.to, m.is_kamikaze());
            return;
        }

        self.execute_standard(m);
        if m.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if self.turn == Color::Blue {
            self.move_number += 1;
        }
        self.turn = self.turn.opponent();
        let key = self.repetition_key();
        self.repetition_counts.increment(&key);
        self.invalidate_cache();
    }

    /// Apply one deploy step: record it in the session, capture, move
    /// the piece out, and re-seat what remains on the origin square.
    /// Returns the captured piece, if any.
    pub(crate) fn apply_deploy_step(
        &mut self,
        piece: &Piece,
        to: Square,
        kamikaze: bool,
    ) -> Result<Option<Piece>, OpError> {
        let origin = self
            .deploy
            .session()
            .ok_or(OpError::SessionInactive)?
            .origin;

        let captured = match self.color_at(to) {
            Some(color) if color != piece.color => self.piece_at(to),
            _ => None,
        };

        // session first: it validates and mutates nothing on the board
        self.deploy
            .deploy_piece(piece, to, captured.clone(), kamikaze)?;

        if captured.is_some() {
            self.remove_piece(to);
        }
        self.remove_piece(origin);
        if !kamikaze {
            self.place_piece_unchecked(piece, to);
        }
        self.reseat_origin_pile(origin);
        Ok(captured)
    }

    /// Revert the session's most recent step on board and session both.
    pub(crate) fn undo_deploy_step(&mut self) -> Option<DeployedEntry> {
        let origin = self.deploy.session()?.origin;
        let entry = self.deploy.undo_last_deploy()?;

        if !entry.kamikaze {
            self.remove_piece(entry.to);
        }
        if let Some(captured) = &entry.captured {
            self.place_piece_unchecked(captured, entry.to);
        }
        self.remove_piece(origin);
        self.reseat_origin_pile(origin);
        Some(entry)
    }

    /// Put the session's remaining pile back on the origin square. The
    /// pile is transient state, not a validated stack: the first piece
    /// fronts for the rest.
    fn reseat_origin_pile(&mut self, origin: Square) {
        let Some(session) = self.deploy.session() else {
            return;
        };
        let remaining = session.remaining.clone();
        if let Some((head, rest)) = remaining.split_first() {
            let pile = head.clone().carrying(rest.to_vec());
            self.place_piece_unchecked(&pile, origin);
        }
    }

    /// Close the active session. Clocks advance once for the whole
    /// session; the turn passes unless the caller keeps it.
    pub fn commit_deploy(&mut self, switch_turn: bool) -> Result<DeploySession, OpError> {
        let session = self.deploy.commit()?;
        if session.deployed.iter().any(|e| e.captured.is_some()) {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if switch_turn {
            if self.turn == Color::Blue {
                self.move_number += 1;
            }
            self.turn = self.turn.opponent();
        }
        let key = self.repetition_key();
        self.repetition_counts.increment(&key);
        self.invalidate_cache();

        #[cfg(feature = "logging")]
        log::debug!(
            "deploy session committed: {} pieces from {}",
            session.deployed.len(),
            session.origin
        );

        Ok(session)
    }

    /// Walk the session back step by step and drop it, leaving the
    /// original stack on its origin square.
    pub fn cancel_deploy(&mut self) -> Option<DeploySession> {
        self.deploy.session()?;
        while self.undo_deploy_step().is_some() {}
        let session = self.deploy.cancel();
        self.invalidate_cache();

        #[cfg(feature = "logging")]
        log::debug!("deploy session cancelled");

        session
    }
}
