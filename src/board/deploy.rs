//! Deploy session state machine.
//!
//! Disassembling a stack takes several same-turn steps: each step lifts
//! one piece (possibly carrying others) out of the remaining pile at the
//! origin square and lands it somewhere. The session tracks what left,
//! what remains, and can be committed only once nothing remains.

use super::error::OpError;
use super::stacks::StackData;
use super::types::{Color, Piece, Square};

/// One executed deploy step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployedEntry {
    /// The piece that left the origin, cargo included when it carried
    /// other remaining pieces along.
    pub piece: Piece,
    pub to: Square,
    pub captured: Option<Piece>,
    /// The piece was lost to air defense on arrival.
    pub kamikaze: bool,
    /// Remaining pile as it was before this step, for undo.
    prev_remaining: Vec<Piece>,
}

/// An in-progress stack disassembly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploySession {
    pub origin: Square,
    pub original: StackData,
    pub deployed: Vec<DeployedEntry>,
    pub remaining: Vec<Piece>,
    pub turn: Color,
    /// Whether the FEN tail carries the trailing `...` marker. Kept in
    /// sync with `remaining` during play, but preserved verbatim from a
    /// parsed FEN so emit reproduces its input.
    pub incomplete_marker: bool,
}

impl DeploySession {
    /// True once every piece of the original stack has been deployed
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.remaining.is_empty()
    }
}

/// Owns the at-most-one active session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeployManager {
    session: Option<DeploySession>,
}

impl DeployManager {
    #[must_use]
    pub fn new() -> Self {
        DeployManager::default()
    }

    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn session(&self) -> Option<&DeploySession> {
        self.session.as_ref()
    }

    pub(crate) fn session_mut(&mut self) -> Option<&mut DeploySession> {
        self.session.as_mut()
    }

    /// Open a session for the stack on `origin`. The remaining pile is
    /// carrier first, then cargo in stored order.
    pub fn initiate(
        &mut self,
        origin: Square,
        stack: &StackData,
        turn: Color,
    ) -> Result<(), OpError> {
        if self.session.is_some() {
            return Err(OpError::SessionActive);
        }
        self.session = Some(DeploySession {
            origin,
            original: stack.clone(),
            deployed: Vec::new(),
            remaining: stack.pieces(),
            turn,
            incomplete_marker: true,
        });
        Ok(())
    }

    /// Record a deploy step. The piece (and each piece it carries) must
    /// match the remaining pile by kind, color and heroic flag.
    pub fn deploy_piece(
        &mut self,
        piece: &Piece,
        to: Square,
        captured: Option<Piece>,
        kamikaze: bool,
    ) -> Result<(), OpError> {
        let session = self.session.as_mut().ok_or(OpError::SessionInactive)?;
        let prev_remaining = session.remaining.clone();

        let mut remaining = session.remaining.clone();
        for unit in std::iter::once(piece).chain(piece.carrying.iter()) {
            let idx = remaining
                .iter()
                .position(|r| r.same_unit(unit))
                .ok_or(OpError::PieceNotRemaining { kind: unit.kind })?;
            remaining.remove(idx);
        }

        session.remaining = remaining;
        session.incomplete_marker = !session.remaining.is_empty();
        session.deployed.push(DeployedEntry {
            piece: piece.clone(),
            to,
            captured,
            kamikaze,
            prev_remaining,
        });
        Ok(())
    }

    /// Pop the last deploy step, putting its pieces back in the pile.
    pub fn undo_last_deploy(&mut self) -> Option<DeployedEntry> {
        let session = self.session.as_mut()?;
        let entry = session.deployed.pop()?;
        session.remaining = entry.prev_remaining.clone();
        session.incomplete_marker = true;
        Some(entry)
    }

    /// True when every piece has been deployed
    #[must_use]
    pub fn can_commit(&self) -> bool {
        self.session.as_ref().is_some_and(DeploySession::is_complete)
    }

    /// Close a fully-deployed session, returning it.
    pub fn commit(&mut self) -> Result<DeploySession, OpError> {
        match &self.session {
            None => Err(OpError::SessionInactive),
            Some(session) if !session.is_complete() => Err(OpError::CommitIncomplete {
                remaining: session.remaining.len(),
            }),
            Some(_) => Ok(self.session.take().expect("session checked above")),
        }
    }

    /// Abandon the session, returning it so the caller can restore the
    /// original stack.
    pub fn cancel(&mut self) -> Option<DeploySession> {
        self.session.take()
    }
}
