//! Fifty-move, repetition and dead-material draws.

use crate::bitboard::Bitboard;
use crate::board::Position;
use crate::types::{Color, PieceKind};

impl Position {
    pub fn is_draw_by_50(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// True when the current position is (at least) its third occurrence.
    ///
    /// `history` holds the keys of the positions reached so far, oldest
    /// first, as maintained by [`Position::push_move`]. A trailing entry equal
    /// to the current key is taken to be the current position itself. Only
    /// the plies since the halfmove clock was last reset are scanned, since
    /// no earlier position can recur.
    pub fn is_draw_by_repetition(&self, history: &[u64]) -> bool {
        let key = self.key;
        let window = (self.halfmove_clock as usize + 1).min(history.len());
        let mut recent = &history[history.len() - window..];
        if recent.last() == Some(&key) {
            recent = &recent[..recent.len() - 1];
        }
        recent.iter().filter(|&&k| k == key).count() >= 2
    }

    /// Neither side can possibly mate: K v K, K+minor v K, or only
    /// same-coloured bishops besides the kings.
    pub fn is_insufficient_material(&self) -> bool {
        let heavy = self.pieces(Color::White, PieceKind::Pawn)
            | self.pieces(Color::Black, PieceKind::Pawn)
            | self.pieces(Color::White, PieceKind::Rook)
            | self.pieces(Color::Black, PieceKind::Rook)
            | self.pieces(Color::White, PieceKind::Queen)
            | self.pieces(Color::Black, PieceKind::Queen);
        if heavy.is_nonempty() {
            return false;
        }

        let knights =
            self.pieces(Color::White, PieceKind::Knight) | self.pieces(Color::Black, PieceKind::Knight);
        let bishops =
            self.pieces(Color::White, PieceKind::Bishop) | self.pieces(Color::Black, PieceKind::Bishop);
        let minors = (knights | bishops).popcount();

        if minors <= 1 {
            return true;
        }
        // Any number of bishops all on one square colour cannot mate.
        knights.is_empty()
            && ((bishops & Bitboard::LIGHT_SQUARES).is_empty()
                || (bishops & !Bitboard::LIGHT_SQUARES).is_empty())
    }
}
