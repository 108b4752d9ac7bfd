//! Direction scan: walks each ray square by square, applying range,
//! blocking, terrain and capture rules for one piece.

use crate::board::stacks;
use crate::board::state::Position;
use crate::board::terrain;
use crate::board::types::{flags, Move, Piece, PieceType, Square};

use super::stats::{stats_for, PieceStats};

const ORTHOGONAL: [(i32, i32); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];
const DIAGONAL: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, 1), (1, -1)];

impl Position {
    /// Generate the pseudo-legal moves of one piece standing on (or, for
    /// deploy steps, leaving) `from`. Air-defense gating happens later.
    pub(crate) fn scan_piece_moves(
        &self,
        from: Square,
        piece: &Piece,
        deploy: bool,
        out: &mut Vec<Move>,
    ) {
        let stats = stats_for(piece.kind, piece.heroic);
        let max_reach = stats.move_range.max(stats.capture_range) as u32;
        if max_reach == 0 {
            return;
        }
        let deploy_flag = if deploy { flags::DEPLOY } else { 0 };

        let diagonals: &[(i32, i32)] = if stats.diagonal { &DIAGONAL } else { &[] };
        for &(dr, df) in ORTHOGONAL.iter().chain(diagonals) {
            let diagonal_dir = dr != 0 && df != 0;
            let mut current = from;
            let mut blocked = false;

            for range in 1..=max_reach {
                // missiles fold their diagonals in one step early
                if piece.kind == PieceType::Missile
                    && diagonal_dir
                    && range + 1 > stats.move_range as u32
                {
                    break;
                }
                let Some(next) = current.offset(dr, df) else {
                    break;
                };
                current = next;

                match self.color_at(current) {
                    None => {
                        if range <= stats.move_range as u32
                            && !blocked
                            && terrain::can_stand_on(piece.kind, current)
                        {
                            out.push(
                                Move::new(from, current, piece.clone()).with_flag(deploy_flag),
                            );
                        }
                    }
                    Some(color) if color == piece.color => {
                        if !deploy && range <= stats.move_range as u32 && !blocked {
                            self.try_combination(from, current, piece, out);
                        }
                        if !stats.move_through && !stats.slides_past_friends {
                            blocked = true;
                        }
                        if blocked && !stats.capture_through {
                            break;
                        }
                    }
                    Some(_) => {
                        self.emit_captures(
                            from,
                            current,
                            piece,
                            &stats,
                            range,
                            blocked,
                            deploy_flag,
                            out,
                        );
                        if !stats.move_through {
                            blocked = true;
                        }
                        if blocked && !stats.capture_through {
                            break;
                        }
                    }
                }
            }
        }
    }

    fn try_combination(&self, from: Square, to: Square, piece: &Piece, out: &mut Vec<Move>) {
        let Some(occupant) = self.piece_at(to) else {
            return;
        };
        if stacks::combine(&occupant, piece).is_some() {
            out.push(Move::new(from, to, piece.clone()).with_flag(flags::COMBINATION));
        }
    }

    /// Stay-vs-normal capture discrimination for one enemy target.
    #[allow(clippy::too_many_arguments)]
    fn emit_captures(
        &self,
        from: Square,
        target_sq: Square,
        piece: &Piece,
        stats: &PieceStats,
        range: u32,
        blocked: bool,
        deploy_flag: u8,
        out: &mut Vec<Move>,
    ) {
        if blocked && !stats.capture_through {
            return;
        }
        // commanders only ever strike an adjacent square
        if piece.kind == PieceType::Commander && range != 1 {
            return;
        }
        let Some(captured) = self.piece_at(target_sq) else {
            return;
        };

        // navies shell land targets one square shorter than they duel
        // other navies
        let mut capture_range = stats.capture_range;
        if piece.kind == PieceType::Navy && captured.kind != PieceType::Navy {
            capture_range = capture_range.saturating_sub(1);
        }
        if range > capture_range as u32 {
            return;
        }

        let in_deploy = deploy_flag != 0;
        if terrain::can_stand_on(piece.kind, target_sq) {
            out.push(
                Move::new(from, target_sq, piece.clone())
                    .with_capture(captured.clone())
                    .with_flag(deploy_flag),
            );
            // air force may also strike without relocating, a choice the
            // caller surfaces; not offered mid-deploy
            if piece.kind == PieceType::AirForce && !in_deploy {
                out.push(
                    Move::new(from, target_sq, piece.clone())
                        .with_capture(captured)
                        .with_flag(flags::STAY_CAPTURE),
                );
            }
        } else if !in_deploy {
            out.push(
                Move::new(from, target_sq, piece.clone())
                    .with_capture(captured)
                    .with_flag(flags::STAY_CAPTURE),
            );
        }
    }
}
