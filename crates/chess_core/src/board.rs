use std::fmt;

use crate::attacks::*;
use crate::bitboard::Bitboard;
use crate::types::*;
use crate::zobrist::ZOBRIST;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Castling rights as a 4-bit mask: `{WK, WQ, BK, BQ}` in bits 0..4.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KING: CastlingRights = CastlingRights(1);
    pub const WHITE_QUEEN: CastlingRights = CastlingRights(2);
    pub const BLACK_KING: CastlingRights = CastlingRights(4);
    pub const BLACK_QUEEN: CastlingRights = CastlingRights(8);
    pub const ALL: CastlingRights = CastlingRights(15);

    #[inline(always)]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline(always)]
    pub const fn from_bits(bits: u8) -> Self {
        CastlingRights(bits & 15)
    }

    #[inline(always)]
    pub const fn contains(self, other: CastlingRights) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    #[inline(always)]
    pub fn insert(&mut self, other: CastlingRights) {
        self.0 |= other.0;
    }

    #[inline(always)]
    pub fn remove(&mut self, other: CastlingRights) {
        self.0 &= !other.0;
    }

    pub const fn kingside(color: Color) -> Self {
        match color {
            Color::White => Self::WHITE_KING,
            Color::Black => Self::BLACK_KING,
        }
    }

    pub const fn queenside(color: Color) -> Self {
        match color {
            Color::White => Self::WHITE_QUEEN,
            Color::Black => Self::BLACK_QUEEN,
        }
    }
}

/// FEN form: `KQkq` subset, or `-`.
impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return write!(f, "-");
        }
        for (right, ch) in [
            (Self::WHITE_KING, 'K'),
            (Self::WHITE_QUEEN, 'Q'),
            (Self::BLACK_KING, 'k'),
            (Self::BLACK_QUEEN, 'q'),
        ] {
            if self.contains(right) {
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

/// Home squares for a castling right: `(king, rook)`.
pub(crate) fn castling_home(right: CastlingRights) -> (u8, u8) {
    match right {
        CastlingRights::WHITE_KING => (4, 7),
        CastlingRights::WHITE_QUEEN => (4, 0),
        CastlingRights::BLACK_KING => (60, 63),
        _ => (60, 56),
    }
}

/// Board state: mailbox and bitboards kept in lock-step, plus the game-state
/// fields and the running Zobrist key.
///
/// Mutated only through make/unmake (and the placement setters used while
/// parsing FEN), so the derived occupancy boards and the key never drift.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub(crate) mailbox: [Option<Piece>; 64],
    pub(crate) pieces: [[Bitboard; 6]; 2],
    pub(crate) occupancy: [Bitboard; 2],
    pub(crate) occupied: Bitboard,
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) ep_file: Option<u8>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) key: u64,
}

impl Position {
    /// An empty board, white to move, no rights. Not valid until kings are placed.
    pub(crate) fn empty() -> Self {
        Position {
            mailbox: [None; 64],
            pieces: [[Bitboard::EMPTY; 6]; 2],
            occupancy: [Bitboard::EMPTY; 2],
            occupied: Bitboard::EMPTY,
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            ep_file: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            key: 0,
        }
    }

    pub fn startpos() -> Self {
        let mut p = Position::empty();

        for f in 0..8 {
            p.put_piece(8 + f, Piece::new(Color::White, PieceKind::Pawn));
            p.put_piece(48 + f, Piece::new(Color::Black, PieceKind::Pawn));
        }
        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (f, &kind) in back.iter().enumerate() {
            p.put_piece(f as u8, Piece::new(Color::White, kind));
            p.put_piece(56 + f as u8, Piece::new(Color::Black, kind));
        }
        p.set_castling(CastlingRights::ALL);
        p
    }

    // ------------------------------------------------------------------
    // Low-level placement. Each keeps mailbox, bitboards and key in sync.
    // ------------------------------------------------------------------

    #[inline(always)]
    pub(crate) fn put_piece(&mut self, sq: u8, pc: Piece) {
        debug_assert!(self.mailbox[sq as usize].is_none());
        self.mailbox[sq as usize] = Some(pc);
        self.pieces[pc.color.idx()][pc.kind.idx()].toggle(sq);
        self.occupancy[pc.color.idx()].toggle(sq);
        self.occupied.toggle(sq);
        self.key ^= ZOBRIST.piece_key(pc, sq);
    }

    #[inline(always)]
    pub(crate) fn remove_piece(&mut self, sq: u8, pc: Piece) {
        debug_assert_eq!(self.mailbox[sq as usize], Some(pc));
        self.mailbox[sq as usize] = None;
        self.pieces[pc.color.idx()][pc.kind.idx()].toggle(sq);
        self.occupancy[pc.color.idx()].toggle(sq);
        self.occupied.toggle(sq);
        self.key ^= ZOBRIST.piece_key(pc, sq);
    }

    #[inline(always)]
    pub(crate) fn move_piece(&mut self, from: u8, to: u8, pc: Piece) {
        self.remove_piece(from, pc);
        self.put_piece(to, pc);
    }

    pub(crate) fn set_side_to_move(&mut self, color: Color) {
        if self.side_to_move != color {
            self.key ^= ZOBRIST.side_to_move;
            self.side_to_move = color;
        }
    }

    pub(crate) fn set_castling(&mut self, rights: CastlingRights) {
        self.key ^= ZOBRIST.castling_key(self.castling) ^ ZOBRIST.castling_key(rights);
        self.castling = rights;
    }

    pub(crate) fn set_ep_file(&mut self, file: Option<u8>) {
        if let Some(f) = self.ep_file {
            self.key ^= ZOBRIST.ep_key(f);
        }
        if let Some(f) = file {
            self.key ^= ZOBRIST.ep_key(f);
        }
        self.ep_file = file;
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    #[inline(always)]
    pub fn piece_at(&self, sq: u8) -> Option<Piece> {
        self.mailbox[sq as usize]
    }

    #[inline(always)]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline(always)]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    #[inline(always)]
    pub fn ep_file(&self) -> Option<u8> {
        self.ep_file
    }

    /// En-passant target square, derived from the file and the side to move.
    #[inline(always)]
    pub fn ep_square(&self) -> Option<u8> {
        let rank_base = match self.side_to_move {
            Color::White => 40,
            Color::Black => 16,
        };
        self.ep_file.map(|f| rank_base + f)
    }

    #[inline(always)]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline(always)]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    #[inline(always)]
    pub fn zobrist_key(&self) -> u64 {
        self.key
    }

    #[inline(always)]
    pub fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.pieces[color.idx()][kind.idx()]
    }

    #[inline(always)]
    pub fn occupancy(&self, color: Color) -> Bitboard {
        self.occupancy[color.idx()]
    }

    #[inline(always)]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    pub fn king_sq(&self, c: Color) -> Option<u8> {
        self.pieces(c, PieceKind::King).lsb()
    }

    /// Recompute the Zobrist key from the board and state fields.
    pub fn compute_zobrist(&self) -> u64 {
        let mut key = 0u64;
        for (sq, pc) in self.mailbox.iter().enumerate() {
            if let Some(pc) = pc {
                key ^= ZOBRIST.piece_key(*pc, sq as u8);
            }
        }
        if self.side_to_move == Color::Black {
            key ^= ZOBRIST.side_to_move;
        }
        key ^= ZOBRIST.castling_key(self.castling);
        if let Some(f) = self.ep_file {
            key ^= ZOBRIST.ep_key(f);
        }
        key
    }

    // ------------------------------------------------------------------
    // Attack queries
    // ------------------------------------------------------------------

    /// Every piece of either colour attacking `sq` through blockers `occ`.
    pub fn attackers_to(&self, sq: u8, occ: Bitboard) -> Bitboard {
        let [white, black] = &self.pieces;
        let diag = white[PieceKind::Bishop.idx()]
            | white[PieceKind::Queen.idx()]
            | black[PieceKind::Bishop.idx()]
            | black[PieceKind::Queen.idx()];
        let ortho = white[PieceKind::Rook.idx()]
            | white[PieceKind::Queen.idx()]
            | black[PieceKind::Rook.idx()]
            | black[PieceKind::Queen.idx()];

        (pawn_attacks(sq, Color::Black) & white[PieceKind::Pawn.idx()])
            | (pawn_attacks(sq, Color::White) & black[PieceKind::Pawn.idx()])
            | (knight_attacks(sq) & (white[PieceKind::Knight.idx()] | black[PieceKind::Knight.idx()]))
            | (king_attacks(sq) & (white[PieceKind::King.idx()] | black[PieceKind::King.idx()]))
            | (bishop_attacks(sq, occ) & diag)
            | (rook_attacks(sq, occ) & ortho)
    }

    /// True iff any piece of `by` attacks `sq` given blockers `occ`.
    #[inline]
    pub fn is_square_attacked_with(&self, sq: u8, by: Color, occ: Bitboard) -> bool {
        let p = &self.pieces[by.idx()];
        let queens = p[PieceKind::Queen.idx()];
        (pawn_attacks(sq, by.other()) & p[PieceKind::Pawn.idx()]).is_nonempty()
            || (knight_attacks(sq) & p[PieceKind::Knight.idx()]).is_nonempty()
            || (king_attacks(sq) & p[PieceKind::King.idx()]).is_nonempty()
            || (bishop_attacks(sq, occ) & (p[PieceKind::Bishop.idx()] | queens)).is_nonempty()
            || (rook_attacks(sq, occ) & (p[PieceKind::Rook.idx()] | queens)).is_nonempty()
    }

    #[inline]
    pub fn is_square_attacked(&self, sq: u8, by: Color) -> bool {
        self.is_square_attacked_with(sq, by, self.occupied)
    }

    pub fn in_check(&self, c: Color) -> bool {
        match self.king_sq(c) {
            Some(ksq) => self.is_square_attacked(ksq, c.other()),
            None => false,
        }
    }

    /// Enemy pieces giving check to the side to move.
    pub fn checkers(&self) -> Bitboard {
        match self.king_sq(self.side_to_move) {
            Some(ksq) => {
                self.attackers_to(ksq, self.occupied) & self.occupancy(self.side_to_move.other())
            }
            None => Bitboard::EMPTY,
        }
    }

    // ------------------------------------------------------------------
    // Invariants
    // ------------------------------------------------------------------

    /// Check every structural invariant. Intended for tests and debug builds.
    pub fn validate(&self) -> bool {
        // Bitboards rebuilt from the mailbox must match the stored ones exactly.
        let mut pieces = [[Bitboard::EMPTY; 6]; 2];
        for (sq, pc) in self.mailbox.iter().enumerate() {
            if let Some(pc) = pc {
                pieces[pc.color.idx()][pc.kind.idx()].set(sq as u8);
            }
        }
        if pieces != self.pieces {
            return false;
        }
        let mut occupancy = [Bitboard::EMPTY; 2];
        for c in 0..2 {
            for bb in pieces[c] {
                // Overlap between two piece boards would also break the mailbox mirror.
                if (occupancy[c] & bb).is_nonempty() {
                    return false;
                }
                occupancy[c] |= bb;
            }
        }
        if occupancy != self.occupancy
            || (occupancy[0] & occupancy[1]).is_nonempty()
            || self.occupied != (occupancy[0] | occupancy[1])
        {
            return false;
        }

        for c in Color::BOTH {
            if self.pieces(c, PieceKind::King).popcount() != 1 {
                return false;
            }
            if (self.pieces(c, PieceKind::Pawn) & Bitboard::BACK_RANKS).is_nonempty() {
                return false;
            }
        }

        if let Some(file) = self.ep_file
            && !self.ep_file_justified(file)
        {
            return false;
        }

        for right in [
            CastlingRights::WHITE_KING,
            CastlingRights::WHITE_QUEEN,
            CastlingRights::BLACK_KING,
            CastlingRights::BLACK_QUEEN,
        ] {
            if self.castling.contains(right) && !self.castling_pieces_home(right) {
                return false;
            }
        }

        self.fullmove_number >= 1
            && self.key == self.compute_zobrist()
            && !self.in_check(self.side_to_move.other())
    }

    /// The enemy pawn that just double-pushed on `file` stands in front of the
    /// target square, and the target and origin squares are empty.
    pub(crate) fn ep_file_justified(&self, file: u8) -> bool {
        if file > 7 {
            return false;
        }
        let them = self.side_to_move.other();
        let (origin, target, pawn_sq) = match them {
            Color::White => (8 + file, 16 + file, 24 + file),
            Color::Black => (48 + file, 40 + file, 32 + file),
        };
        self.piece_at(pawn_sq) == Some(Piece::new(them, PieceKind::Pawn))
            && self.piece_at(target).is_none()
            && self.piece_at(origin).is_none()
    }

    pub(crate) fn castling_pieces_home(&self, right: CastlingRights) -> bool {
        let color = if right.bits() & 3 != 0 {
            Color::White
        } else {
            Color::Black
        };
        let (king, rook) = castling_home(right);
        self.piece_at(king) == Some(Piece::new(color, PieceKind::King))
            && self.piece_at(rook) == Some(Piece::new(color, PieceKind::Rook))
    }
}

/// ASCII diagram with rank 8 on top, followed by the FEN.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                let c = self.piece_at(rank * 8 + file).map_or('.', |p| p.to_char());
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "   a b c d e f g h")?;
        write!(f, "FEN: {}", self.to_fen())
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
