//! Make/unmake with O(1) incremental updates.
//!
//! [`Position::make_move`] is the primitive; [`Position::push_move`] and
//! [`Position::pop_move`] layer a caller-owned undo stack and key history on
//! top of it. Unmake restores the Zobrist key from the saved state instead of
//! re-deriving it.

use crate::attacks::*;
use crate::board::{CastlingRights, Position};
use crate::moves::{Move, MoveFlag};
use crate::types::*;
use crate::zobrist::ZOBRIST;

/// Everything make overwrites that cannot be derived from the move itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveState {
    /// Piece removed by the move; for en passant it stood behind `to`.
    pub captured: Option<Piece>,
    pub castling: CastlingRights,
    pub ep_file: Option<u8>,
    pub halfmove_clock: u32,
    pub key: u64,
}

/// Undo records paired with the move that produced them, newest last.
pub type UndoStack = Vec<(Move, MoveState)>;

/// Rights kept when a move touches a square: king and rook home squares drop
/// the matching rights, whether the piece moves away or is captured there.
static CASTLE_MASK: [u8; 64] = {
    let mut mask = [15u8; 64];
    mask[0] = 15 & !CastlingRights::WHITE_QUEEN.bits();
    mask[4] = 15 & !(CastlingRights::WHITE_KING.bits() | CastlingRights::WHITE_QUEEN.bits());
    mask[7] = 15 & !CastlingRights::WHITE_KING.bits();
    mask[56] = 15 & !CastlingRights::BLACK_QUEEN.bits();
    mask[60] = 15 & !(CastlingRights::BLACK_KING.bits() | CastlingRights::BLACK_QUEEN.bits());
    mask[63] = 15 & !CastlingRights::BLACK_KING.bits();
    mask
};

/// For a castling king destination: `(rook_from, rook_to, right)`.
#[inline(always)]
pub(crate) fn castle_rook_squares(king_to: u8) -> Option<(u8, u8, CastlingRights)> {
    match king_to {
        6 => Some((7, 5, CastlingRights::WHITE_KING)),
        2 => Some((0, 3, CastlingRights::WHITE_QUEEN)),
        62 => Some((63, 61, CastlingRights::BLACK_KING)),
        58 => Some((56, 59, CastlingRights::BLACK_QUEEN)),
        _ => None,
    }
}

impl Position {
    /// Apply `mv` if it is legal here. Returns `None` and leaves the position
    /// untouched when the move does not fit the board or leaves the mover's
    /// king attacked.
    pub fn make_move(&mut self, mv: Move) -> Option<MoveState> {
        if !self.move_fits_board(mv) {
            return None;
        }
        let mover = self.side_to_move;
        let undo = self.make_move_unchecked(mv);
        if self.in_check(mover) {
            self.unmake_move(mv, undo);
            return None;
        }
        #[cfg(feature = "verify")]
        debug_assert!(self.validate(), "invariants broken after {mv:?}");
        Some(undo)
    }

    /// Apply a move already known to be at least pseudo-legal for this
    /// position. The mover's king may be left in check.
    pub fn make_move_unchecked(&mut self, mv: Move) -> MoveState {
        let us = self.side_to_move;
        let from = mv.from();
        let to = mv.to();
        let moved = mv.moved();
        let captured = mv.captured();

        let undo = MoveState {
            captured,
            castling: self.castling,
            ep_file: self.ep_file,
            halfmove_clock: self.halfmove_clock,
            key: self.key,
        };

        self.remove_piece(from, moved);
        if let Some(cap) = captured {
            self.remove_piece(mv.capture_square(), cap);
        }
        let placed = match mv.promotion_piece() {
            Some(kind) => Piece::new(us, kind),
            None => moved,
        };
        self.put_piece(to, placed);

        if mv.flag() == MoveFlag::Castle
            && let Some((rook_from, rook_to, _)) = castle_rook_squares(to)
        {
            self.move_piece(rook_from, rook_to, Piece::new(us, PieceKind::Rook));
        }

        let rights = self.castling.bits() & CASTLE_MASK[from as usize] & CASTLE_MASK[to as usize];
        if rights != self.castling.bits() {
            self.set_castling(CastlingRights::from_bits(rights));
        }

        self.set_ep_file(if mv.is_double_push() {
            Some(file_of(from))
        } else {
            None
        });

        self.halfmove_clock = if moved.kind == PieceKind::Pawn || captured.is_some() {
            0
        } else {
            self.halfmove_clock.saturating_add(1)
        };

        if us == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.side_to_move = us.other();
        self.key ^= ZOBRIST.side_to_move;

        #[cfg(feature = "verify")]
        debug_assert_eq!(self.key, self.compute_zobrist(), "key drift after {mv:?}");
        undo
    }

    /// Reverse `mv`. Must be called with the state `make_move` returned for it,
    /// in strict LIFO order.
    pub fn unmake_move(&mut self, mv: Move, undo: MoveState) {
        let us = self.side_to_move.other();
        self.side_to_move = us;
        if us == Color::Black {
            self.fullmove_number -= 1;
        }

        let from = mv.from();
        let to = mv.to();

        if mv.flag() == MoveFlag::Castle
            && let Some((rook_from, rook_to, _)) = castle_rook_squares(to)
        {
            self.move_piece(rook_to, rook_from, Piece::new(us, PieceKind::Rook));
        }

        let placed = match mv.promotion_piece() {
            Some(kind) => Piece::new(us, kind),
            None => mv.moved(),
        };
        self.remove_piece(to, placed);
        self.put_piece(from, mv.moved());
        if let Some(cap) = undo.captured {
            self.put_piece(mv.capture_square(), cap);
        }

        self.castling = undo.castling;
        self.ep_file = undo.ep_file;
        self.halfmove_clock = undo.halfmove_clock;
        self.key = undo.key;

        #[cfg(feature = "verify")]
        debug_assert!(self.validate(), "invariants broken after undoing {mv:?}");
    }

    /// Make `mv`, record its undo state and append the new key to `history`.
    /// Returns false (and records nothing) when the move is illegal.
    pub fn push_move(&mut self, mv: Move, stack: &mut UndoStack, history: &mut Vec<u64>) -> bool {
        match self.make_move(mv) {
            Some(undo) => {
                stack.push((mv, undo));
                history.push(self.key);
                true
            }
            None => false,
        }
    }

    /// Undo the most recent [`Position::push_move`].
    pub fn pop_move(&mut self, stack: &mut UndoStack, history: &mut Vec<u64>) -> Option<Move> {
        let (mv, undo) = stack.pop()?;
        history.pop();
        self.unmake_move(mv, undo);
        Some(mv)
    }

    /// Consistency check of a move's encoding against the board: the pieces
    /// it names must stand where it says, and the moved piece must be able to
    /// reach `to` from `from` on the current occupancy.
    fn move_fits_board(&self, mv: Move) -> bool {
        let moved = mv.moved();
        if moved.color != self.side_to_move || self.piece_at(mv.from()) != Some(moved) {
            return false;
        }
        let captured = mv.captured();
        if let Some(cap) = captured
            && (cap.color == moved.color || cap.kind == PieceKind::King)
        {
            return false;
        }
        let last_rank = match moved.color {
            Color::White => 7,
            Color::Black => 0,
        };
        if moved.kind == PieceKind::Pawn && (rank_of(mv.to()) == last_rank) != mv.is_promotion() {
            return false;
        }

        match mv.flag() {
            MoveFlag::EnPassant => {
                moved.kind == PieceKind::Pawn
                    && self.ep_square() == Some(mv.to())
                    && pawn_attacks(mv.from(), moved.color).contains(mv.to())
                    && self.piece_at(mv.to()).is_none()
                    && self.piece_at(mv.capture_square()) == captured
            }
            MoveFlag::Castle => moved.kind == PieceKind::King && self.castle_fits_board(mv),
            MoveFlag::DoublePush => {
                let start_rank = match moved.color {
                    Color::White => 1,
                    Color::Black => 6,
                };
                let between = mv.from() as i8 + moved.color.forward();
                moved.kind == PieceKind::Pawn
                    && captured.is_none()
                    && rank_of(mv.from()) == start_rank
                    && mv.to() as i8 == between + moved.color.forward()
                    && self.piece_at(between as u8).is_none()
                    && self.piece_at(mv.to()).is_none()
            }
            MoveFlag::Promotion => {
                matches!(
                    mv.promotion_piece(),
                    Some(PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
                ) && self.piece_at(mv.to()) == captured
                    && self.pawn_reaches(mv)
            }
            MoveFlag::Normal => {
                if self.piece_at(mv.to()) != captured || mv.promotion_piece().is_some() {
                    return false;
                }
                let (from, to, occ) = (mv.from(), mv.to(), self.occupied());
                match moved.kind {
                    PieceKind::Pawn => self.pawn_reaches(mv),
                    PieceKind::Knight => knight_attacks(from).contains(to),
                    PieceKind::Bishop => bishop_attacks(from, occ).contains(to),
                    PieceKind::Rook => rook_attacks(from, occ).contains(to),
                    PieceKind::Queen => queen_attacks(from, occ).contains(to),
                    PieceKind::King => king_attacks(from).contains(to),
                }
            }
        }
    }

    /// Single push onto an empty square, or a diagonal step onto a capture.
    /// `to` is already known to hold exactly the move's captured piece.
    fn pawn_reaches(&self, mv: Move) -> bool {
        let color = mv.moved().color;
        match mv.captured() {
            Some(_) => pawn_attacks(mv.from(), color).contains(mv.to()),
            None => mv.to() as i8 == mv.from() as i8 + color.forward(),
        }
    }

    fn castle_fits_board(&self, mv: Move) -> bool {
        let us = self.side_to_move;
        let Some((rook_from, rook_to, right)) = castle_rook_squares(mv.to()) else {
            return false;
        };
        let (king_home, _) = crate::board::castling_home(right);
        if mv.from() != king_home || !self.castling.contains(right) || mv.captured().is_some() {
            return false;
        }
        // Everything strictly between king and rook must be empty.
        let (lo, hi) = (rook_from.min(king_home), rook_from.max(king_home));
        if (lo + 1..hi).any(|s| self.piece_at(s).is_some()) {
            return false;
        }
        !self.in_check(us) && !self.is_square_attacked(rook_to, us.other())
    }
}

#[cfg(test)]
#[path = "make_move_tests.rs"]
mod make_move_tests;
