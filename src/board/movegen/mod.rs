//! Move generation: per-piece scans, deploy integration, air-defense
//! gating, and the legality-filtered public entry points.

mod scan;
mod stats;

use crate::board::air_defense::{TransitChecker, TransitState};
use crate::board::deploy::DeploySession;
use crate::board::stacks;
use crate::board::state::{MoveCacheKey, Position};
use crate::board::types::{flags, Color, Move, MoveFilter, Piece, PieceType};

impl Position {
    /// All legal moves for the side to move.
    #[must_use]
    pub fn generate_moves(&mut self) -> Vec<Move> {
        self.moves_filtered(MoveFilter::ALL)
    }

    /// Legal moves matching the filter. Results are cached until the
    /// next mutation; correctness does not depend on the cache.
    #[must_use]
    pub fn moves_filtered(&mut self, filter: MoveFilter) -> Vec<Move> {
        let key = MoveCacheKey {
            turn: self.turn,
            occupied: self.occupied,
            red: self.colors[Color::Red.index()],
            blue: self.colors[Color::Blue.index()],
            deploy_digest: self.deploy_digest(),
            filter,
        };
        if let Some(cached) = self.move_cache.get(&key) {
            return cached.clone();
        }

        let pseudo = self.generate_pseudo_legal(self.turn, true);
        let mut legal = Vec::new();
        for m in pseudo {
            if filter.accepts(&m) && self.is_move_legal(&m) {
                legal.push(m);
            }
        }
        self.move_cache.insert(key, legal.clone());
        legal
    }

    fn deploy_digest(&self) -> Option<String> {
        self.deploy.session().map(|session| {
            let steps: Vec<String> = session
                .deployed
                .iter()
                .map(|e| format!("{}{}", e.piece, e.to))
                .collect();
            format!("{}:{}", session.origin, steps.join(","))
        })
    }

    /// Pseudo-legal generation for one color. With `respect_deploy`, an
    /// active session of that color replaces normal generation with
    /// deploy steps; without it (attack probes) the session is ignored.
    pub(crate) fn generate_pseudo_legal(&self, color: Color, respect_deploy: bool) -> Vec<Move> {
        let mut moves = Vec::new();

        if respect_deploy {
            if let Some(session) = self.deploy.session() {
                if session.turn == color {
                    self.generate_deploy_session_moves(session, &mut moves);
                    self.gate_air_force_moves(color, &mut moves);
                    return moves;
                }
            }
        }

        for sq in self.colors[color.index()].iter() {
            let Some(piece) = self.piece_at(sq) else {
                continue;
            };
            self.scan_piece_moves(sq, &piece, false, &mut moves);
        }

        // stacks threaten deploy steps even for attack probes: a carried
        // piece can step out and strike
        if !self.deploy.is_active() {
            self.generate_deploy_start_moves(color, &mut moves);
        }

        self.gate_air_force_moves(color, &mut moves);
        moves
    }

    /// Deploy steps for the active session: each distinct remaining
    /// piece alone, plus the carrier taking every other remaining piece
    /// along when the composition allows it.
    fn generate_deploy_session_moves(&self, session: &DeploySession, out: &mut Vec<Move>) {
        let origin = session.origin;
        let mut seen: Vec<&Piece> = Vec::new();
        for unit in &session.remaining {
            if seen.iter().any(|s| s.same_unit(unit)) {
                continue;
            }
            seen.push(unit);
            self.scan_piece_moves(origin, unit, true, out);

            if unit.same_unit(&session.original.carrier) && session.remaining.len() > 1 {
                let mut cargo = session.remaining.clone();
                let idx = cargo
                    .iter()
                    .position(|p| p.same_unit(unit))
                    .expect("unit is in remaining");
                cargo.remove(idx);
                if stacks::validate_composition(unit, &cargo).is_ok() {
                    let loaded = unit.clone().carrying(cargo);
                    self.scan_piece_moves(origin, &loaded, true, out);
                }
            }
        }
    }

    /// With no session active, every stack offers deploy steps that
    /// would open one: each of its pieces may step out alone. (The
    /// carrier leaving with its full cargo is the stack's normal move.)
    fn generate_deploy_start_moves(&self, color: Color, out: &mut Vec<Move>) {
        for sq in self.carriers().and(self.colors[color.index()]).iter() {
            let Some(stack) = self.stacks.get(sq) else {
                continue;
            };
            let units = stack.pieces();
            let mut seen: Vec<&Piece> = Vec::new();
            for unit in &units {
                if seen.iter().any(|s| s.same_unit(unit)) {
                    continue;
                }
                seen.push(unit);
                self.scan_piece_moves(sq, unit, true, out);
            }
        }
    }

    /// Walk every air-force move through the transit checker: drop
    /// `Destroyed` paths, tag `Kamikaze` ones.
    fn gate_air_force_moves(&self, mover: Color, moves: &mut Vec<Move>) {
        let defender = mover.opponent();
        moves.retain_mut(|m| {
            if m.piece.kind != PieceType::AirForce {
                return true;
            }
            let Some(path) = m.from.ray_path(m.to) else {
                return true;
            };
            let mut checker = TransitChecker::new(defender);
            let mut state = TransitState::SafePass;
            for sq in path {
                state = checker.step(sq, &self.air_defense);
            }
            match state {
                TransitState::SafePass => true,
                TransitState::Kamikaze => {
                    // a doomed air force cannot finish a combination
                    if m.is_combination() {
                        return false;
                    }
                    m.flags |= flags::KAMIKAZE;
                    true
                }
                TransitState::Destroyed => false,
            }
        });
    }

    /// Count leaf nodes of the legal move tree, a make/undo validator.
    #[must_use]
    pub fn perft(&mut self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.generate_moves();
        if depth == 1 {
            return moves.len() as u64;
        }
        let mut nodes = 0;
        for m in &moves {
            let mut child = self.clone();
            child.make_move_permanent(m);
            nodes += child.perft(depth - 1);
        }
        nodes
    }
}
