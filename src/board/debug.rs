//! Debug-build board rendering.

use std::fmt::Write as _;

use super::state::Position;
use super::types::Square;

impl Position {
    /// Render the board as ASCII, top rank first. Stacks show their
    /// carrier with a trailing `*`, heroic pieces a leading `+`.
    #[must_use]
    pub fn ascii(&self) -> String {
        let mut out = String::new();
        for rank in (0..Square::RANKS).rev() {
            let _ = write!(out, "{:>2} ", rank + 1);
            for file in 0..Square::FILES {
                let sq = Square::new(rank, file);
                match self.piece_at(sq) {
                    Some(piece) => {
                        let c = piece.kind.to_fen_char(piece.color);
                        if piece.heroic {
                            let _ = write!(out, " +{c}");
                        } else if !piece.carrying.is_empty() {
                            let _ = write!(out, " {c}*");
                        } else {
                            let _ = write!(out, "  {c}");
                        }
                    }
                    None => out.push_str("  ."),
                }
            }
            out.push('\n');
        }
        out.push_str("    a  b  c  d  e  f  g  h  i  j  k\n");
        out
    }
}
