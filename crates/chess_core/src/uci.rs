use crate::{board::Position, movegen::legal_moves, moves::Move, types::*};

/// Coordinate notation, lowercase promotion letter (`e7e8q`).
pub fn move_to_uci(mv: Move) -> String {
    mv.to_string()
}

impl Position {
    /// Resolve `<from><to>[promotion]` against the legal moves here, so the
    /// returned move carries the right flags and pieces. The promotion letter
    /// may be upper- or lowercase and is required when promoting.
    pub fn parse_move(&self, txt: &str) -> Option<Move> {
        if !(4..=5).contains(&txt.len()) || !txt.is_ascii() {
            return None;
        }
        let from = coord_to_sq(&txt[0..2])?;
        let to = coord_to_sq(&txt[2..4])?;
        let promo = match txt.as_bytes().get(4) {
            None => None,
            Some(b) => match b.to_ascii_lowercase() {
                b'q' => Some(PieceKind::Queen),
                b'r' => Some(PieceKind::Rook),
                b'b' => Some(PieceKind::Bishop),
                b'n' => Some(PieceKind::Knight),
                _ => return None,
            },
        };

        legal_moves(self)
            .into_iter()
            .find(|m| m.from() == from && m.to() == to && m.promotion_piece() == promo)
    }
}
