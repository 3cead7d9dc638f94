//! Pseudo-legal generation with capture/quiet split, and the legality filter.
//!
//! Every `*_into` entry point appends to the caller's buffer and returns its
//! new length; nothing is allocated when the buffer already has room. A
//! capture is any move with a captured piece (en passant and capture
//! promotions included); everything else is a quiet move.

use crate::attacks::*;
use crate::bitboard::Bitboard;
use crate::board::{CastlingRights, Position, castling_home};
use crate::make_move::castle_rook_squares;
use crate::moves::Move;
use crate::types::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GenKind {
    All,
    Captures,
    Quiets,
}

/// Generate all legal moves, returning a freshly allocated vector.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    let mut out = Vec::with_capacity(64);
    legal_moves_into(pos, &mut out);
    out
}

/// Clear `out` and fill it with the legal moves, reusing its allocation.
pub fn legal_moves_into(pos: &Position, out: &mut Vec<Move>) {
    out.clear();
    generate_legal(pos, GenKind::All, out);
}

impl Position {
    pub fn generate_pseudo_moves_into(&self, buf: &mut Vec<Move>) -> usize {
        generate_pseudo(self, GenKind::All, buf);
        buf.len()
    }

    pub fn generate_pseudo_moves(&self) -> Vec<Move> {
        let mut buf = Vec::with_capacity(64);
        self.generate_pseudo_moves_into(&mut buf);
        buf
    }

    /// Pseudo-legal captures (en passant and capture promotions included).
    pub fn generate_pseudo_captures_into(&self, buf: &mut Vec<Move>) -> usize {
        generate_pseudo(self, GenKind::Captures, buf);
        buf.len()
    }

    /// Pseudo-legal non-captures, castling and quiet promotions included.
    pub fn generate_pseudo_quiets_into(&self, buf: &mut Vec<Move>) -> usize {
        generate_pseudo(self, GenKind::Quiets, buf);
        buf.len()
    }

    pub fn generate_moves_into(&self, buf: &mut Vec<Move>) -> usize {
        generate_legal(self, GenKind::All, buf)
    }

    pub fn generate_moves(&self) -> Vec<Move> {
        let mut buf = Vec::with_capacity(64);
        self.generate_moves_into(&mut buf);
        buf
    }

    pub fn generate_captures_into(&self, buf: &mut Vec<Move>) -> usize {
        generate_legal(self, GenKind::Captures, buf)
    }

    pub fn generate_captures(&self) -> Vec<Move> {
        let mut buf = Vec::with_capacity(32);
        self.generate_captures_into(&mut buf);
        buf
    }

    pub fn generate_quiets_into(&self, buf: &mut Vec<Move>) -> usize {
        generate_legal(self, GenKind::Quiets, buf)
    }

    pub fn generate_quiets(&self) -> Vec<Move> {
        let mut buf = Vec::with_capacity(64);
        self.generate_quiets_into(&mut buf);
        buf
    }

    /// Whether a pseudo-legal `mv` keeps the mover's king safe.
    ///
    /// Answers the same question as make + `in_check` + unmake, by replaying
    /// the occupancy change against the attack tables instead of touching the
    /// position. Castling moves come out of the generator already vetted.
    pub fn is_legal(&self, mv: Move) -> bool {
        let us = self.side_to_move;
        let them = us.other();
        let from = mv.from();
        let to = mv.to();

        if mv.is_castle() {
            return true;
        }

        let captured_sq = if mv.is_capture() {
            Bitboard::from_square(mv.capture_square())
        } else {
            Bitboard::EMPTY
        };
        let occ = (self.occupied ^ Bitboard::from_square(from) ^ captured_sq)
            | Bitboard::from_square(to);

        let king = if mv.moved().kind == PieceKind::King {
            to
        } else {
            match self.king_sq(us) {
                Some(k) => k,
                None => return true,
            }
        };
        !self.attacked_ignoring(king, them, occ, captured_sq)
    }

    /// Short-circuits on the first legal move found.
    pub fn has_legal_moves(&self) -> bool {
        let mut buf = Vec::with_capacity(64);
        generate_pseudo(self, GenKind::All, &mut buf);
        buf.iter().any(|&mv| self.is_legal(mv))
    }

    pub fn in_checkmate(&self) -> bool {
        self.in_check(self.side_to_move) && !self.has_legal_moves()
    }

    pub fn in_stalemate(&self) -> bool {
        !self.in_check(self.side_to_move) && !self.has_legal_moves()
    }

    /// Attack test with a hypothetical occupancy, treating enemy pieces on
    /// `removed` as already captured.
    #[inline]
    fn attacked_ignoring(&self, sq: u8, by: Color, occ: Bitboard, removed: Bitboard) -> bool {
        let live = !removed;
        let p = &self.pieces[by.idx()];
        let queens = p[PieceKind::Queen.idx()];
        (pawn_attacks(sq, by.other()) & p[PieceKind::Pawn.idx()] & live).is_nonempty()
            || (knight_attacks(sq) & p[PieceKind::Knight.idx()] & live).is_nonempty()
            || (king_attacks(sq) & p[PieceKind::King.idx()]).is_nonempty()
            || (bishop_attacks(sq, occ) & (p[PieceKind::Bishop.idx()] | queens) & live)
                .is_nonempty()
            || (rook_attacks(sq, occ) & (p[PieceKind::Rook.idx()] | queens) & live).is_nonempty()
    }
}

/// Append pseudo-legal moves, then drop the illegal ones from the appended tail.
fn generate_legal(pos: &Position, kind: GenKind, out: &mut Vec<Move>) -> usize {
    let start = out.len();
    generate_pseudo(pos, kind, out);

    let mut keep = start;
    for i in start..out.len() {
        let mv = out[i];
        if pos.is_legal(mv) {
            out[keep] = mv;
            keep += 1;
        }
    }
    out.truncate(keep);
    keep
}

fn generate_pseudo(pos: &Position, kind: GenKind, out: &mut Vec<Move>) {
    let us = pos.side_to_move();
    let own = pos.occupancy(us);
    let enemy = pos.occupancy(us.other());
    let occ = pos.occupied();
    let targets = match kind {
        GenKind::All => !own,
        GenKind::Captures => enemy,
        GenKind::Quiets => !occ,
    };

    gen_pawns(pos, kind, out);

    for from in pos.pieces(us, PieceKind::Knight) {
        gen_targets(pos, from, PieceKind::Knight, knight_attacks(from) & targets, out);
    }
    for from in pos.pieces(us, PieceKind::Bishop) {
        gen_targets(pos, from, PieceKind::Bishop, bishop_attacks(from, occ) & targets, out);
    }
    for from in pos.pieces(us, PieceKind::Rook) {
        gen_targets(pos, from, PieceKind::Rook, rook_attacks(from, occ) & targets, out);
    }
    for from in pos.pieces(us, PieceKind::Queen) {
        gen_targets(pos, from, PieceKind::Queen, queen_attacks(from, occ) & targets, out);
    }
    for from in pos.pieces(us, PieceKind::King) {
        gen_targets(pos, from, PieceKind::King, king_attacks(from) & targets, out);
    }

    if kind != GenKind::Captures {
        gen_castles(pos, out);
    }
}

#[inline(always)]
fn gen_targets(pos: &Position, from: u8, kind: PieceKind, targets: Bitboard, out: &mut Vec<Move>) {
    let pc = Piece::new(pos.side_to_move(), kind);
    for to in targets {
        out.push(Move::new(from, to, pc, pos.piece_at(to)));
    }
}

fn push_promotions(from: u8, to: u8, c: Color, captured: Option<Piece>, out: &mut Vec<Move>) {
    for kind in PieceKind::PROMOTIONS {
        out.push(Move::promotion(from, to, c, captured, kind));
    }
}

fn gen_pawns(pos: &Position, kind: GenKind, out: &mut Vec<Move>) {
    let c = pos.side_to_move();
    let pawns = pos.pieces(c, PieceKind::Pawn);
    if pawns.is_empty() {
        return;
    }
    let empty = !pos.occupied();
    let fwd = c.forward();
    let (promo_rank, double_rank) = match c {
        Color::White => (Bitboard::RANK_8, Bitboard::RANK_3),
        Color::Black => (Bitboard::RANK_1, Bitboard::RANK_6),
    };
    let push = |bb: Bitboard| match c {
        Color::White => bb.north(),
        Color::Black => bb.south(),
    };

    if kind != GenKind::Captures {
        let single = push(pawns) & empty;
        let pawn = Piece::new(c, PieceKind::Pawn);
        for to in single & !promo_rank {
            out.push(Move::new((to as i8 - fwd) as u8, to, pawn, None));
        }
        for to in single & promo_rank {
            push_promotions((to as i8 - fwd) as u8, to, c, None, out);
        }
        for to in push(single & double_rank) & empty {
            out.push(Move::double_push((to as i8 - 2 * fwd) as u8, to, c));
        }
    }

    if kind != GenKind::Quiets {
        let enemy = pos.occupancy(c.other());
        for from in pawns {
            for to in pawn_attacks(from, c) & enemy {
                let captured = pos.piece_at(to);
                if promo_rank.contains(to) {
                    push_promotions(from, to, c, captured, out);
                } else {
                    out.push(Move::new(from, to, Piece::new(c, PieceKind::Pawn), captured));
                }
            }
        }
        if let Some(ep) = pos.ep_square() {
            for from in pawn_attacks(ep, c.other()) & pawns {
                out.push(Move::en_passant(from, ep, c));
            }
        }
    }
}

/// Squares that must be empty for a castling right to be used.
fn castle_path(right: CastlingRights) -> Bitboard {
    match right {
        CastlingRights::WHITE_KING => Bitboard(0x60),
        CastlingRights::WHITE_QUEEN => Bitboard(0x0E),
        CastlingRights::BLACK_KING => Bitboard(0x60 << 56),
        _ => Bitboard(0x0E << 56),
    }
}

/// King two-square moves. Emptiness, check, transit and landing attacks are
/// all tested here, so castles need no further legality filtering.
fn gen_castles(pos: &Position, out: &mut Vec<Move>) {
    let c = pos.side_to_move();
    let rights = pos.castling();
    let candidates = [CastlingRights::kingside(c), CastlingRights::queenside(c)];
    if !candidates.iter().any(|&r| rights.contains(r)) || pos.in_check(c) {
        return;
    }
    let enemy = c.other();
    for right in candidates {
        if !rights.contains(right) || (castle_path(right) & pos.occupied()).is_nonempty() {
            continue;
        }
        let (king, rook) = castling_home(right);
        let king_to = if rook > king { king + 2 } else { king - 2 };
        let Some((_, transit, _)) = castle_rook_squares(king_to) else {
            continue;
        };
        if pos.is_square_attacked(transit, enemy) || pos.is_square_attacked(king_to, enemy) {
            continue;
        }
        out.push(Move::castle(king, king_to, c));
    }
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
