//! Zobrist hashing for chess positions.
//!
//! The position key is the XOR of:
//! - one value per (piece, square) that is occupied (12 × 64 values),
//! - one value when black is to move,
//! - one value per castling right held (4 values, folded into a 16-entry
//!   table indexed by the rights mask),
//! - one value for the en-passant file, when set (8 values).
//!
//! [`crate::Position`] keeps its key up to date incrementally during
//! make/unmake; [`crate::Position::compute_zobrist`] recomputes it from scratch.

use crate::board::CastlingRights;
use crate::types::Piece;

pub struct ZobristKeys {
    /// Indexed by [color][piece_kind][square]
    pub pieces: [[[u64; 64]; 6]; 2],
    /// XORed in when black is to move.
    pub side_to_move: u64,
    /// Per-right values in mask bit order [wk, wq, bk, bq].
    pub castling: [u64; 4],
    /// Combined value for every 4-bit rights mask.
    pub castling_masks: [u64; 16],
    pub en_passant: [u64; 8],
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

/// xorshift64 stream; usable in const context so the table is built at
/// compile time.
struct KeyStream(u64);

impl KeyStream {
    const fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    const fn fill<const N: usize>(&mut self) -> [u64; N] {
        let mut out = [0u64; N];
        let mut i = 0;
        while i < N {
            out[i] = self.next();
            i += 1;
        }
        out
    }
}

impl ZobristKeys {
    /// Keys drawn in a fixed order from a fixed seed, so every build hashes
    /// identically.
    pub const fn new() -> Self {
        let mut rng = KeyStream(0x9E37_79B9_7F4A_7C15);

        let mut pieces = [[[0u64; 64]; 6]; 2];
        let mut slot = 0;
        while slot < 12 {
            pieces[slot / 6][slot % 6] = rng.fill::<64>();
            slot += 1;
        }
        let side_to_move = rng.next();
        let castling = rng.fill::<4>();
        let en_passant = rng.fill::<8>();

        // castling_masks[m] = XOR of castling[b] for each bit b set in m.
        let mut castling_masks = [0u64; 16];
        let mut mask: usize = 1;
        while mask < 16 {
            let low = mask.trailing_zeros() as usize;
            castling_masks[mask] = castling_masks[mask & (mask - 1)] ^ castling[low];
            mask += 1;
        }

        ZobristKeys {
            pieces,
            side_to_move,
            castling,
            castling_masks,
            en_passant,
        }
    }

    #[inline(always)]
    pub fn piece_key(&self, piece: Piece, sq: u8) -> u64 {
        self.pieces[piece.color.idx()][piece.kind.idx()][sq as usize]
    }

    /// Combined key for every right set in `rights`.
    #[inline(always)]
    pub fn castling_key(&self, rights: CastlingRights) -> u64 {
        self.castling_masks[rights.bits() as usize]
    }

    #[inline(always)]
    pub fn ep_key(&self, file: u8) -> u64 {
        self.en_passant[file as usize]
    }
}

pub static ZOBRIST: ZobristKeys = ZobristKeys::new();

#[cfg(test)]
#[path = "zobrist_tests.rs"]
mod zobrist_tests;
