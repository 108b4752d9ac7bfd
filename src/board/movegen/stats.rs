//! Per-piece movement characteristics.

use crate::board::types::PieceType;

/// Sentinel for edge-bounded sliding (the commander's move range).
pub(crate) const UNLIMITED: u8 = u8::MAX;

/// Movement numbers for one piece kind, heroic bonus already applied.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PieceStats {
    pub move_range: u8,
    pub capture_range: u8,
    pub diagonal: bool,
    /// Captures ignore intervening pieces.
    pub capture_through: bool,
    /// Movement ignores intervening pieces.
    pub move_through: bool,
    /// Friendly pieces do not block movement (navy sliding past its
    /// own fleet).
    pub slides_past_friends: bool,
}

/// Base table, before the heroic modifier.
fn base_stats(kind: PieceType) -> PieceStats {
    let plain = PieceStats {
        move_range: 1,
        capture_range: 1,
        diagonal: false,
        capture_through: false,
        move_through: false,
        slides_past_friends: false,
    };
    match kind {
        PieceType::Commander => PieceStats {
            move_range: UNLIMITED,
            ..plain
        },
        PieceType::Infantry | PieceType::Engineer | PieceType::AntiAir => plain,
        PieceType::Militia => PieceStats {
            diagonal: true,
            ..plain
        },
        PieceType::Tank => PieceStats {
            move_range: 2,
            capture_range: 2,
            ..plain
        },
        PieceType::Artillery => PieceStats {
            move_range: 3,
            capture_range: 3,
            diagonal: true,
            capture_through: true,
            ..plain
        },
        PieceType::Missile => PieceStats {
            move_range: 2,
            capture_range: 2,
            diagonal: true,
            capture_through: true,
            ..plain
        },
        PieceType::AirForce => PieceStats {
            move_range: 4,
            capture_range: 4,
            diagonal: true,
            capture_through: true,
            move_through: true,
            ..plain
        },
        PieceType::Navy => PieceStats {
            move_range: 4,
            capture_range: 4,
            diagonal: true,
            capture_through: true,
            slides_past_friends: true,
            ..plain
        },
        PieceType::Headquarter => PieceStats {
            move_range: 0,
            capture_range: 0,
            ..plain
        },
    }
}

/// Stats for a piece, with the heroic bonus: +1 move range (unlimited
/// stays unlimited), +1 capture range, diagonals enabled. A heroic
/// headquarter becomes barely mobile: both ranges clamp to 1.
pub(crate) fn stats_for(kind: PieceType, heroic: bool) -> PieceStats {
    let mut stats = base_stats(kind);
    if heroic {
        if kind == PieceType::Headquarter {
            stats.move_range = 1;
            stats.capture_range = 1;
        } else {
            stats.move_range = stats.move_range.saturating_add(1);
            stats.capture_range = stats.capture_range.saturating_add(1);
        }
        stats.diagonal = true;
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_table() {
        let commander = stats_for(PieceType::Commander, false);
        assert_eq!(commander.move_range, UNLIMITED);
        assert_eq!(commander.capture_range, 1);
        assert!(!commander.diagonal);

        let militia = stats_for(PieceType::Militia, false);
        assert_eq!(militia.move_range, 1);
        assert!(militia.diagonal);

        let navy = stats_for(PieceType::Navy, false);
        assert!(navy.slides_past_friends);
        assert!(navy.capture_through);
        assert!(!navy.move_through);

        let hq = stats_for(PieceType::Headquarter, false);
        assert_eq!(hq.move_range, 0);
    }

    #[test]
    fn test_heroic_bonus() {
        let tank = stats_for(PieceType::Tank, true);
        assert_eq!(tank.move_range, 3);
        assert_eq!(tank.capture_range, 3);
        assert!(tank.diagonal);

        // unlimited stays unlimited
        let commander = stats_for(PieceType::Commander, true);
        assert_eq!(commander.move_range, UNLIMITED);
        assert_eq!(commander.capture_range, 2);
    }

    #[test]
    fn test_heroic_headquarter_clamps_to_one() {
        let hq = stats_for(PieceType::Headquarter, true);
        assert_eq!(hq.move_range, 1);
        assert_eq!(hq.capture_range, 1);
        assert!(hq.diagonal);
    }
}
