//! FEN parsing and emission.
//!
//! The placement field has 12 rank groups, top rank first. A `+` marks
//! the next piece heroic; `(...)` groups a stack, carrier first with its
//! case giving the stack's color and carried letters in lowercase. The
//! castling and en-passant fields are literal dashes kept for
//! compatibility. An optional `DEPLOY origin:moves` tail encodes an
//! in-progress deploy session; placement then shows the board as it was
//! before the session and the tail is replayed on parse.

use std::str::FromStr;

use super::air_defense::{TransitChecker, TransitState};
use super::error::FenError;
use super::state::Position;
use super::types::{Color, Piece, PieceType, Square};

/// The starting position.
pub const START_FEN: &str =
    "6c4/1n2fh1hf2/3a2s2a1/2n1gt1tg2/2ie2m2ei/11/11/2IE2M2EI/2N1GT1TG2/3A2S2A1/1N2FH1HF2/6C4 r - - 0 1";

impl Position {
    /// Parse a position from FEN notation.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 6 {
            return Err(FenError::TooFewFields { found: parts.len() });
        }

        let mut pos = Position::empty();
        parse_placement(&mut pos, parts[0])?;

        pos.turn = Color::from_char(parts[1].chars().next().unwrap_or(' '))
            .filter(|_| parts[1].len() == 1)
            .ok_or_else(|| FenError::InvalidSideToMove {
                found: parts[1].to_string(),
            })?;

        for placeholder in [parts[2], parts[3]] {
            if placeholder != "-" {
                return Err(FenError::InvalidPlaceholder {
                    found: placeholder.to_string(),
                });
            }
        }

        pos.halfmove_clock = parts[4].parse().map_err(|_| FenError::InvalidCounter {
            found: parts[4].to_string(),
        })?;
        pos.move_number = parts[5].parse().map_err(|_| FenError::InvalidCounter {
            found: parts[5].to_string(),
        })?;

        match parts.len() {
            6 => {}
            8 if parts[6] == "DEPLOY" => parse_deploy_tail(&mut pos, parts[7])?,
            _ => {
                return Err(FenError::BadDeployTail {
                    token: parts[6..].join(" "),
                })
            }
        }

        let key = pos.repetition_key();
        pos.repetition_counts.set(&key, 1);

        #[cfg(feature = "logging")]
        log::debug!("loaded position: {} to move", pos.turn());

        Ok(pos)
    }

    /// Convert the position to FEN notation. Round-trips byte-for-byte
    /// with `from_fen` for every accepted string.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let placement = match self.deploy.session() {
            Some(_) => self.pre_session_board().placement_string(),
            None => self.placement_string(),
        };
        let mut fen = format!(
            "{placement} {} - - {} {}",
            self.turn.to_char(),
            self.halfmove_clock,
            self.move_number
        );
        if let Some(tail) = self.deploy_tail_string() {
            fen.push(' ');
            fen.push_str(&tail);
        }
        fen
    }

    /// Placement + turn, the key used for repetition counting.
    pub(crate) fn repetition_key(&self) -> String {
        format!("{} {}", self.placement_string(), self.turn.to_char())
    }

    /// Emit the placement field for the current board.
    pub(crate) fn placement_string(&self) -> String {
        let mut rows: Vec<String> = Vec::with_capacity(Square::RANKS);
        for rank in (0..Square::RANKS).rev() {
            let mut row = String::new();
            let mut empty = 0usize;
            for file in 0..Square::FILES {
                let sq = Square::new(rank, file);
                let Some(piece) = self.piece_at(sq) else {
                    empty += 1;
                    continue;
                };
                if empty > 0 {
                    row.push_str(&empty.to_string());
                    empty = 0;
                }
                if piece.carrying.is_empty() {
                    if piece.heroic {
                        row.push('+');
                    }
                    row.push(piece.kind.to_fen_char(piece.color));
                } else {
                    row.push('(');
                    if piece.heroic {
                        row.push('+');
                    }
                    row.push(piece.kind.to_fen_char(piece.color));
                    for carried in &piece.carrying {
                        if carried.heroic {
                            row.push('+');
                        }
                        row.push(carried.kind.to_char());
                    }
                    row.push(')');
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }
        rows.join("/")
    }

    /// The board as it stood before the active deploy session: deployed
    /// pieces lifted back off, captures restored, the original stack on
    /// its origin square.
    fn pre_session_board(&self) -> Position {
        let mut base = self.clone();
        let Some(session) = self.deploy.session().cloned() else {
            return base;
        };
        for entry in session.deployed.iter().rev() {
            if !entry.kamikaze {
                base.remove_piece(entry.to);
            }
            if let Some(captured) = &entry.captured {
                base.place_piece_unchecked(captured, entry.to);
            }
        }
        base.remove_piece(session.origin);
        base.place_piece_unchecked(&session.original.to_piece(), session.origin);
        base
    }

    fn deploy_tail_string(&self) -> Option<String> {
        let session = self.deploy.session()?;
        let moves: Vec<String> = session
            .deployed
            .iter()
            .map(|entry| {
                let mut token = String::new();
                token.push(entry.piece.kind.to_char().to_ascii_uppercase());
                if !entry.piece.carrying.is_empty() {
                    token.push('(');
                    for carried in &entry.piece.carrying {
                        token.push(carried.kind.to_char().to_ascii_uppercase());
                    }
                    token.push(')');
                }
                if entry.captured.is_some() {
                    token.push('x');
                }
                token.push_str(&entry.to.to_string());
                token
            })
            .collect();
        let marker = if session.incomplete_marker { "..." } else { "" };
        Some(format!("DEPLOY {}:{}{}", session.origin, moves.join(","), marker))
    }
}

fn parse_placement(pos: &mut Position, placement: &str) -> Result<(), FenError> {
    let groups: Vec<&str> = placement.split('/').collect();
    if groups.len() != Square::RANKS {
        return Err(FenError::BadRankCount {
            found: groups.len(),
        });
    }

    for (group_idx, group) in groups.iter().enumerate() {
        let rank = Square::RANKS - 1 - group_idx;
        let label = rank + 1; // display rank for error messages
        let mut file = 0usize;
        let mut digit_run = 0usize;
        let mut in_run = false;
        let mut in_stack = false;
        let mut stack: Vec<Piece> = Vec::new();
        let mut heroic_pending = false;

        let mut place = |pos: &mut Position, piece: Piece, file: &mut usize| {
            if *file >= Square::FILES {
                return Err(FenError::BadRankWidth {
                    rank: label,
                    files: *file + 1,
                });
            }
            pos.place_piece(&piece, Square::new(rank, *file))
                .map_err(|err| FenError::InvalidPlacement {
                    rank: label,
                    reason: err.to_string(),
                })?;
            *file += 1;
            Ok(())
        };

        for c in group.chars() {
            if let Some(digit) = c.to_digit(10) {
                if in_stack {
                    return Err(FenError::DigitInStack { rank: label });
                }
                if heroic_pending {
                    return Err(FenError::HeroicWithoutPiece { rank: label });
                }
                if digit == 0 && !in_run {
                    return Err(FenError::InvalidPlacement {
                        rank: label,
                        reason: "empty-count run starts with 0".to_string(),
                    });
                }
                digit_run = digit_run * 10 + digit as usize;
                in_run = true;
                continue;
            }
            if in_run {
                file += digit_run;
                digit_run = 0;
                in_run = false;
            }

            match c {
                '+' => {
                    if heroic_pending {
                        return Err(FenError::HeroicWithoutPiece { rank: label });
                    }
                    heroic_pending = true;
                }
                '(' => {
                    if in_stack || heroic_pending {
                        return Err(if in_stack {
                            FenError::UnmatchedParen { rank: label }
                        } else {
                            FenError::HeroicWithoutPiece { rank: label }
                        });
                    }
                    in_stack = true;
                    stack.clear();
                }
                ')' => {
                    if !in_stack {
                        return Err(FenError::UnmatchedParen { rank: label });
                    }
                    if heroic_pending {
                        return Err(FenError::HeroicWithoutPiece { rank: label });
                    }
                    if stack.len() < 2 {
                        return Err(FenError::StackTooSmall { rank: label });
                    }
                    let carrier = stack[0].clone();
                    let carried = stack[1..].to_vec();
                    place(pos, carrier.carrying(carried), &mut file)?;
                    in_stack = false;
                }
                _ => {
                    let kind = PieceType::from_char(c).ok_or(FenError::InvalidPiece {
                        char: c,
                        rank: label,
                    })?;
                    if in_stack && !stack.is_empty() {
                        // carried letters are written in lowercase; the
                        // carrier's case fixes the color
                        if c.is_ascii_uppercase() {
                            return Err(FenError::InvalidPiece {
                                char: c,
                                rank: label,
                            });
                        }
                        let color = stack[0].color;
                        let mut piece = Piece::new(kind, color);
                        piece.heroic = heroic_pending;
                        stack.push(piece);
                    } else {
                        let color = if c.is_ascii_uppercase() {
                            Color::Red
                        } else {
                            Color::Blue
                        };
                        let mut piece = Piece::new(kind, color);
                        piece.heroic = heroic_pending;
                        if in_stack {
                            stack.push(piece);
                        } else {
                            place(pos, piece, &mut file)?;
                        }
                    }
                    heroic_pending = false;
                }
            }
        }

        if in_run {
            file += digit_run;
        }
        if in_stack {
            return Err(FenError::UnmatchedParen { rank: label });
        }
        if heroic_pending {
            return Err(FenError::HeroicWithoutPiece { rank: label });
        }
        if file != Square::FILES {
            return Err(FenError::BadRankWidth {
                rank: label,
                files: file,
            });
        }
    }
    Ok(())
}

fn parse_deploy_tail(pos: &mut Position, tail: &str) -> Result<(), FenError> {
    let bad = || FenError::BadDeployTail {
        token: tail.to_string(),
    };

    let (origin_str, moves_str) = tail.split_once(':').ok_or_else(bad)?;
    let origin: Square = origin_str.parse().map_err(|_| bad())?;

    let stack = pos
        .stack_at(origin)
        .ok_or(FenError::DeployOriginEmpty { origin })?;
    let turn = pos.turn;
    pos.deploy
        .initiate(origin, &stack, turn)
        .map_err(|_| bad())?;

    let incomplete = moves_str.ends_with("...");
    let moves_str = moves_str.strip_suffix("...").unwrap_or(moves_str);
    if moves_str.is_empty() {
        return Err(bad());
    }

    for token in moves_str.split(',') {
        replay_deploy_move(pos, token).map_err(|err| match err {
            FenError::BadDeployTail { .. } => FenError::BadDeployTail {
                token: token.to_string(),
            },
            other => other,
        })?;
    }

    if let Some(session) = pos.deploy.session_mut() {
        session.incomplete_marker = incomplete;
    }
    Ok(())
}

/// Parse and apply one `<Piece>[(Cargo)][x]<dest>` deploy token.
fn replay_deploy_move(pos: &mut Position, token: &str) -> Result<(), FenError> {
    let bad = || FenError::BadDeployTail {
        token: token.to_string(),
    };
    let missing = || FenError::DeployPieceMissing {
        token: token.to_string(),
    };

    let mut chars = token.chars().peekable();
    let piece_char = chars.next().ok_or_else(bad)?;
    if !piece_char.is_ascii_uppercase() {
        return Err(bad());
    }
    let kind = PieceType::from_char(piece_char).ok_or_else(bad)?;

    let mut cargo_kinds: Vec<PieceType> = Vec::new();
    if chars.peek() == Some(&'(') {
        chars.next();
        loop {
            match chars.next() {
                Some(')') => break,
                Some(c) if c.is_ascii_uppercase() => {
                    cargo_kinds.push(PieceType::from_char(c).ok_or_else(bad)?);
                }
                _ => return Err(bad()),
            }
        }
    }

    let expects_capture = if chars.peek() == Some(&'x') {
        chars.next();
        true
    } else {
        false
    };

    let dest: Square = chars.collect::<String>().parse().map_err(|_| bad())?;

    // rebuild the deployed piece out of the remaining pile so heroic
    // flags carry over
    let session = pos.deploy.session().ok_or_else(bad)?;
    let mut pool = session.remaining.clone();
    let mut take = |kind: PieceType| -> Option<Piece> {
        let idx = pool.iter().position(|p| p.kind == kind)?;
        Some(pool.remove(idx))
    };
    let mut piece = take(kind).ok_or_else(missing)?;
    for cargo_kind in cargo_kinds {
        let carried = take(cargo_kind).ok_or_else(missing)?;
        piece.carrying.push(carried);
    }

    let has_enemy = pos
        .color_at(dest)
        .is_some_and(|color| color != piece.color);
    if expects_capture != has_enemy {
        return Err(bad());
    }
    if !has_enemy && pos.is_occupied(dest) {
        // landing on a friendly piece is never a deploy step
        return Err(bad());
    }

    let kamikaze = deploy_transit_is_kamikaze(pos, &piece, dest)?;
    pos.apply_deploy_step(&piece, dest, kamikaze)
        .map_err(|_| bad())?;
    Ok(())
}

/// Walk the air-force transit for a replayed deploy move.
fn deploy_transit_is_kamikaze(
    pos: &Position,
    piece: &Piece,
    dest: Square,
) -> Result<bool, FenError> {
    if piece.kind != PieceType::AirForce {
        return Ok(false);
    }
    let origin = pos.deploy.session().map(|s| s.origin);
    let Some(origin) = origin else {
        return Ok(false);
    };
    let Some(path) = origin.ray_path(dest) else {
        return Ok(false);
    };
    let mut checker = TransitChecker::new(piece.color.opponent());
    let mut state = TransitState::SafePass;
    for sq in path {
        state = checker.step(sq, &pos.air_defense);
    }
    match state {
        TransitState::SafePass => Ok(false),
        TransitState::Kamikaze => Ok(true),
        TransitState::Destroyed => Err(FenError::BadDeployTail {
            token: format!("{piece}{dest}"),
        }),
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_position_round_trip() {
        let pos = Position::from_fen(START_FEN).unwrap();
        assert_eq!(pos.to_fen(), START_FEN);
        assert_eq!(pos.turn(), Color::Red);
        assert_eq!(pos.occupied().popcount(), 38);
    }

    #[test]
    fn test_empty_board_round_trip() {
        let fen = "11/11/11/11/11/11/11/11/11/11/11/11 r - - 0 1";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.to_fen(), fen);
        assert!(pos.occupied().is_empty());
    }

    #[test]
    fn test_heroic_round_trip() {
        let fen = "11/11/11/11/11/4+f6/11/11/11/11/11/6C4 b - - 3 7";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.to_fen(), fen);

        let af: Square = "e7".parse().unwrap();
        assert!(pos.piece_at(af).unwrap().heroic);
        assert!(!pos.piece_at("g1".parse().unwrap()).unwrap().heroic);
    }

    #[test]
    fn test_stack_round_trip() {
        let fen = "11/11/11/11/11/11/11/11/11/11/(Nif)10/11 r - - 0 1";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.to_fen(), fen);

        let a2: Square = "a2".parse().unwrap();
        let piece = pos.piece_at(a2).unwrap();
        assert_eq!(piece.kind, PieceType::Navy);
        assert_eq!(piece.color, Color::Red);
        assert_eq!(piece.carrying.len(), 2);
        assert!(pos.carriers().contains(a2));
    }

    #[test]
    fn test_heroic_inside_stack_round_trip() {
        let fen = "11/11/11/11/11/11/11/11/11/11/(+n+if)10/11 b - - 0 1";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.to_fen(), fen);

        let piece = pos.piece_at("a2".parse().unwrap()).unwrap();
        assert!(piece.heroic);
        assert!(piece.carrying[0].heroic);
        assert!(!piece.carrying[1].heroic);
    }

    #[test]
    fn test_deploy_tail_round_trip() {
        let fen = "11/11/11/11/11/11/11/11/11/11/(Nif)10/11 r - - 0 1 DEPLOY a2:Na3,Ib3";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.to_fen(), fen);

        let session = pos.deploy_session().unwrap();
        assert_eq!(session.origin, "a2".parse().unwrap());
        assert_eq!(session.deployed.len(), 2);
        assert_eq!(session.deployed[0].piece.kind, PieceType::Navy);
        assert_eq!(session.deployed[0].to, "a3".parse().unwrap());
        assert_eq!(session.deployed[1].piece.kind, PieceType::Infantry);
        assert_eq!(session.remaining.len(), 1);

        // the deployed navy actually stands on a3
        assert_eq!(
            pos.kind_at("a3".parse().unwrap()),
            Some(PieceType::Navy)
        );
    }

    #[test]
    fn test_deploy_tail_incomplete_marker_round_trip() {
        let fen = "11/11/11/11/11/11/11/11/11/11/(Nif)10/11 r - - 0 1 DEPLOY a2:Na3...";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.to_fen(), fen);
    }

    #[test]
    fn test_deploy_tail_with_cargo() {
        let fen = "11/11/11/11/11/11/11/11/11/11/(Nif)10/11 r - - 0 1 DEPLOY a2:N(F)a3,Ic2";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.to_fen(), fen);

        let session = pos.deploy_session().unwrap();
        assert!(session.is_complete());
        assert_eq!(session.deployed[0].piece.carrying.len(), 1);
    }

    #[test]
    fn test_rejects_malformed_placement() {
        // unbalanced parens
        assert!(Position::from_fen("11/11/11/11/11/11/11/11/11/11/(nif10/11 r - - 0 1").is_err());
        assert!(Position::from_fen("11/11/11/11/11/11/11/11/11/11/nif)10/11 r - - 0 1").is_err());
        // digit inside parens
        assert!(Position::from_fen("11/11/11/11/11/11/11/11/11/11/(n2f)9/11 r - - 0 1").is_err());
        // wrong rank counts
        assert!(Position::from_fen("11/11/11/11/11/11/11/11/11/11 r - - 0 1").is_err());
        assert!(Position::from_fen("11/11/11/11/11/11/11/11/11/11/11/11/11 r - - 0 1").is_err());
        // heroic with nothing to mark
        assert!(Position::from_fen("11/11/11/11/11/11/11/11/11/11/(+)11/11 r - - 0 1").is_err());
        assert!(Position::from_fen("11/11/11/11/11/11/11/11/11/10+/11/11 r - - 0 1").is_err());
        // rank width off by one
        assert!(Position::from_fen("11/11/11/11/11/11/11/11/11/11/10/11 r - - 0 1").is_err());
        assert!(Position::from_fen("11/11/11/11/11/11/11/11/11/11/12/11 r - - 0 1").is_err());
    }

    #[test]
    fn test_rejects_bad_fields() {
        assert!(Position::from_fen("11/11/11/11/11/11/11/11/11/11/11/11 w - - 0 1").is_err());
        assert!(Position::from_fen("11/11/11/11/11/11/11/11/11/11/11/11 r K - 0 1").is_err());
        assert!(Position::from_fen("11/11/11/11/11/11/11/11/11/11/11/11 r - - x 1").is_err());
        assert!(Position::from_fen("11/11/11/11/11/11/11/11/11/11/11/11 r - -").is_err());
    }

    #[test]
    fn test_rejects_malformed_deploy_moves() {
        // missing destination
        assert!(Position::from_fen(
            "11/11/11/11/11/11/11/11/11/11/(Nif)10/11 r - - 0 1 DEPLOY a2:Nx"
        )
        .is_err());
        // piece not in the stack
        assert!(Position::from_fen(
            "11/11/11/11/11/11/11/11/11/11/(Nif)10/11 r - - 0 1 DEPLOY a2:Ta3"
        )
        .is_err());
        // origin square is empty
        assert!(Position::from_fen(
            "11/11/11/11/11/11/11/11/11/11/(Nif)10/11 r - - 0 1 DEPLOY b2:Na3"
        )
        .is_err());
        // capture marker with nothing to capture
        assert!(Position::from_fen(
            "11/11/11/11/11/11/11/11/11/11/(Nif)10/11 r - - 0 1 DEPLOY a2:Nxa3"
        )
        .is_err());
    }

    #[test]
    fn test_rejects_navy_on_land_and_land_on_water() {
        assert!(Position::from_fen("11/11/11/11/11/5n5/11/11/11/11/11/11 r - - 0 1").is_err());
        assert!(Position::from_fen("11/11/11/11/11/11/i10/11/11/11/11/11 r - - 0 1").is_err());
    }

    #[test]
    fn test_from_str_impl() {
        let pos: Position = START_FEN.parse().unwrap();
        assert_eq!(pos.move_number(), 1);
    }
}
