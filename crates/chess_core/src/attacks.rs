//! Pre-computed attack tables for move generation and attack detection.
//!
//! All tables are `static` items evaluated at compile time, so they exist before
//! any position does and are shared read-only by every thread.
//!
//! - Knight and king attacks per square.
//! - Pawn attacks per colour and square.
//! - Sliding attacks: hyperbola quintessence on files and diagonals, and a
//!   first-rank lookup shifted into place for ranks. No loops or branches on
//!   the lookup path.

use crate::bitboard::Bitboard;
use crate::types::Color;

/// Pre-computed knight attacks for each square.
pub static KNIGHT_ATTACKS: [Bitboard; 64] = {
    let mut attacks = [Bitboard::EMPTY; 64];
    let mut sq = 0u8;
    while sq < 64 {
        let bb = 1u64 << sq;
        let mut result = 0u64;

        result |= (bb << 17) & Bitboard::NOT_FILE_A.0;
        result |= (bb << 15) & Bitboard::NOT_FILE_H.0;
        result |= (bb << 10) & Bitboard::NOT_FILE_AB.0;
        result |= (bb << 6) & Bitboard::NOT_FILE_GH.0;
        result |= (bb >> 6) & Bitboard::NOT_FILE_AB.0;
        result |= (bb >> 10) & Bitboard::NOT_FILE_GH.0;
        result |= (bb >> 15) & Bitboard::NOT_FILE_A.0;
        result |= (bb >> 17) & Bitboard::NOT_FILE_H.0;

        attacks[sq as usize] = Bitboard(result);
        sq += 1;
    }
    attacks
};

/// Pre-computed king attacks for each square.
pub static KING_ATTACKS: [Bitboard; 64] = {
    let mut attacks = [Bitboard::EMPTY; 64];
    let mut sq = 0u8;
    while sq < 64 {
        let bb = 1u64 << sq;
        let mut result = 0u64;

        result |= bb << 8;
        result |= bb >> 8;
        result |= (bb << 1) & Bitboard::NOT_FILE_A.0;
        result |= (bb >> 1) & Bitboard::NOT_FILE_H.0;
        result |= (bb << 9) & Bitboard::NOT_FILE_A.0;
        result |= (bb << 7) & Bitboard::NOT_FILE_H.0;
        result |= (bb >> 7) & Bitboard::NOT_FILE_A.0;
        result |= (bb >> 9) & Bitboard::NOT_FILE_H.0;

        attacks[sq as usize] = Bitboard(result);
        sq += 1;
    }
    attacks
};

/// Pawn captures indexed by `[color][square]`: white attacks north, black south.
pub static PAWN_ATTACKS: [[Bitboard; 64]; 2] = {
    let mut attacks = [[Bitboard::EMPTY; 64]; 2];
    let mut sq = 0u8;
    while sq < 64 {
        let bb = 1u64 << sq;
        attacks[0][sq as usize] = Bitboard(
            ((bb << 9) & Bitboard::NOT_FILE_A.0) | ((bb << 7) & Bitboard::NOT_FILE_H.0),
        );
        attacks[1][sq as usize] = Bitboard(
            ((bb >> 7) & Bitboard::NOT_FILE_A.0) | ((bb >> 9) & Bitboard::NOT_FILE_H.0),
        );
        sq += 1;
    }
    attacks
};

/// Line masks per square, excluding the square itself: `[file, diagonal, anti-diagonal]`.
static LINE_MASKS: [[u64; 3]; 64] = {
    let mut masks = [[0u64; 3]; 64];
    let mut sq = 0usize;
    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32;
        let mut other = 0usize;
        while other < 64 {
            let f = (other % 8) as i32;
            let r = (other / 8) as i32;
            if other != sq {
                if f == file {
                    masks[sq][0] |= 1u64 << other;
                }
                if f - r == file - rank {
                    masks[sq][1] |= 1u64 << other;
                }
                if f + r == file + rank {
                    masks[sq][2] |= 1u64 << other;
                }
            }
            other += 1;
        }
        sq += 1;
    }
    masks
};

/// Rank attacks for a slider on `[file]` of the first rank, indexed by the six
/// inner occupancy bits (files b..g). Edge squares never block anything beyond.
static FIRST_RANK_ATTACKS: [[u8; 64]; 8] = {
    let mut table = [[0u8; 64]; 8];
    let mut file = 0usize;
    while file < 8 {
        let mut inner = 0usize;
        while inner < 64 {
            let occ = (inner as u32) << 1;
            let mut result = 0u32;

            let mut f = file as i32 + 1;
            while f < 8 {
                result |= 1 << f;
                if occ & (1 << f) != 0 {
                    break;
                }
                f += 1;
            }
            let mut f = file as i32 - 1;
            while f >= 0 {
                result |= 1 << f;
                if occ & (1 << f) != 0 {
                    break;
                }
                f -= 1;
            }

            table[file][inner] = result as u8;
            inner += 1;
        }
        file += 1;
    }
    table
};

/// Attacks along a line that meets each rank at most once.
#[inline(always)]
fn hyperbola(sq: u8, occupied: u64, mask: u64) -> u64 {
    let o = occupied & mask;
    let s = 1u64 << sq;
    let forward = o.wrapping_sub(s.wrapping_mul(2));
    let reverse = o
        .swap_bytes()
        .wrapping_sub(s.swap_bytes().wrapping_mul(2))
        .swap_bytes();
    (forward ^ reverse) & mask
}

#[inline(always)]
fn rank_attacks(sq: u8, occupied: u64) -> u64 {
    let shift = (sq & !7) as u32;
    let inner = ((occupied >> (shift + 1)) & 63) as usize;
    (FIRST_RANK_ATTACKS[(sq & 7) as usize][inner] as u64) << shift
}

#[inline(always)]
pub fn pawn_attacks(sq: u8, color: Color) -> Bitboard {
    PAWN_ATTACKS[color.idx()][sq as usize]
}

#[inline(always)]
pub fn knight_attacks(sq: u8) -> Bitboard {
    KNIGHT_ATTACKS[sq as usize]
}

#[inline(always)]
pub fn king_attacks(sq: u8) -> Bitboard {
    KING_ATTACKS[sq as usize]
}

#[inline(always)]
pub fn bishop_attacks(sq: u8, occupied: Bitboard) -> Bitboard {
    let masks = &LINE_MASKS[sq as usize];
    Bitboard(hyperbola(sq, occupied.0, masks[1]) | hyperbola(sq, occupied.0, masks[2]))
}

#[inline(always)]
pub fn rook_attacks(sq: u8, occupied: Bitboard) -> Bitboard {
    let masks = &LINE_MASKS[sq as usize];
    Bitboard(hyperbola(sq, occupied.0, masks[0]) | rank_attacks(sq, occupied.0))
}

#[inline(always)]
pub fn queen_attacks(sq: u8, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

#[cfg(test)]
#[path = "attacks_tests.rs"]
mod attacks_tests;
