//! Packed move encoding.
//!
//! Bit layout (LSB -> MSB):
//!
//! | bits    | field                                   |
//! |---------|-----------------------------------------|
//! | 0..6    | from square                             |
//! | 6..12   | to square                               |
//! | 12..16  | moved piece code                        |
//! | 16..20  | captured piece code (0 = none)          |
//! | 20..24  | promotion piece code (0 = none)         |
//! | 24..27  | [`MoveFlag`]                            |
//!
//! Piece codes are [`Piece::code`]. Castling stores only the king's from/to;
//! the rook squares are derived when the move is made.

use std::cmp::Ordering;
use std::fmt;

use crate::types::{Color, Piece, PieceKind, sq_to_coord};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveFlag {
    Normal = 0,
    DoublePush = 1,
    EnPassant = 2,
    Castle = 3,
    Promotion = 4,
}

impl MoveFlag {
    #[inline(always)]
    fn from_bits(bits: u32) -> MoveFlag {
        match bits & 7 {
            1 => MoveFlag::DoublePush,
            2 => MoveFlag::EnPassant,
            3 => MoveFlag::Castle,
            4 => MoveFlag::Promotion,
            _ => MoveFlag::Normal,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u32);

impl Move {
    const SQ_MASK: u32 = 0x3F;
    const PIECE_MASK: u32 = 0xF;

    const TO_SHIFT: u32 = 6;
    const MOVED_SHIFT: u32 = 12;
    const CAPTURED_SHIFT: u32 = 16;
    const PROMO_SHIFT: u32 = 20;
    const FLAG_SHIFT: u32 = 24;

    #[inline(always)]
    fn pack(
        from: u8,
        to: u8,
        moved: Piece,
        captured: Option<Piece>,
        promo: Option<PieceKind>,
        flag: MoveFlag,
    ) -> Self {
        debug_assert!(from < 64 && to < 64);
        let captured = captured.map_or(0, |p| p.code() as u32);
        let promo = promo.map_or(0, |k| Piece::new(moved.color, k).code() as u32);
        Move(
            from as u32
                | (to as u32) << Self::TO_SHIFT
                | (moved.code() as u32) << Self::MOVED_SHIFT
                | captured << Self::CAPTURED_SHIFT
                | promo << Self::PROMO_SHIFT
                | (flag as u32) << Self::FLAG_SHIFT,
        )
    }

    /// A plain move or capture.
    #[inline(always)]
    pub fn new(from: u8, to: u8, moved: Piece, captured: Option<Piece>) -> Self {
        Self::pack(from, to, moved, captured, None, MoveFlag::Normal)
    }

    #[inline(always)]
    pub fn double_push(from: u8, to: u8, color: Color) -> Self {
        let pawn = Piece::new(color, PieceKind::Pawn);
        Self::pack(from, to, pawn, None, None, MoveFlag::DoublePush)
    }

    /// En-passant capture; `to` is the empty target square.
    #[inline(always)]
    pub fn en_passant(from: u8, to: u8, color: Color) -> Self {
        let pawn = Piece::new(color, PieceKind::Pawn);
        let victim = Piece::new(color.other(), PieceKind::Pawn);
        Self::pack(from, to, pawn, Some(victim), None, MoveFlag::EnPassant)
    }

    #[inline(always)]
    pub fn castle(from: u8, to: u8, color: Color) -> Self {
        let king = Piece::new(color, PieceKind::King);
        Self::pack(from, to, king, None, None, MoveFlag::Castle)
    }

    #[inline(always)]
    pub fn promotion(
        from: u8,
        to: u8,
        color: Color,
        captured: Option<Piece>,
        promo: PieceKind,
    ) -> Self {
        let pawn = Piece::new(color, PieceKind::Pawn);
        Self::pack(from, to, pawn, captured, Some(promo), MoveFlag::Promotion)
    }

    #[inline(always)]
    pub fn raw(self) -> u32 {
        self.0
    }

    #[inline(always)]
    pub fn from(self) -> u8 {
        (self.0 & Self::SQ_MASK) as u8
    }

    #[inline(always)]
    pub fn to(self) -> u8 {
        ((self.0 >> Self::TO_SHIFT) & Self::SQ_MASK) as u8
    }

    #[inline(always)]
    pub fn moved(self) -> Piece {
        let code = ((self.0 >> Self::MOVED_SHIFT) & Self::PIECE_MASK) as u8;
        match Piece::from_code(code) {
            Some(p) => p,
            None => unreachable!("move constructed without a moved piece"),
        }
    }

    #[inline(always)]
    pub fn captured(self) -> Option<Piece> {
        Piece::from_code(((self.0 >> Self::CAPTURED_SHIFT) & Self::PIECE_MASK) as u8)
    }

    #[inline(always)]
    pub fn promotion_piece(self) -> Option<PieceKind> {
        PieceKind::from_bits(((self.0 >> Self::PROMO_SHIFT) & Self::PIECE_MASK) as u8)
    }

    #[inline(always)]
    pub fn flag(self) -> MoveFlag {
        MoveFlag::from_bits(self.0 >> Self::FLAG_SHIFT)
    }

    /// True for anything that removes an enemy piece, en passant included.
    #[inline(always)]
    pub fn is_capture(self) -> bool {
        (self.0 >> Self::CAPTURED_SHIFT) & Self::PIECE_MASK != 0
    }

    #[inline(always)]
    pub fn is_en_passant(self) -> bool {
        self.flag() == MoveFlag::EnPassant
    }

    #[inline(always)]
    pub fn is_castle(self) -> bool {
        self.flag() == MoveFlag::Castle
    }

    #[inline(always)]
    pub fn is_double_push(self) -> bool {
        self.flag() == MoveFlag::DoublePush
    }

    #[inline(always)]
    pub fn is_promotion(self) -> bool {
        self.flag() == MoveFlag::Promotion
    }

    /// Square of the piece being captured; differs from `to` only for en passant.
    #[inline(always)]
    pub fn capture_square(self) -> u8 {
        if self.is_en_passant() {
            (self.to() as i8 - self.moved().color.forward()) as u8
        } else {
            self.to()
        }
    }

    fn sort_key(self) -> (u8, u8, u8) {
        (self.from(), self.to(), self.promotion_piece().map_or(0, |k| k as u8))
    }
}

/// Orders moves by from-square, to-square, then promotion piece.
impl Ord for Move {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key()
            .cmp(&other.sort_key())
            .then(self.0.cmp(&other.0))
    }
}

impl PartialOrd for Move {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Lowercase coordinate notation: `e2e4`, `e1g1`, `a7a8q`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", sq_to_coord(self.from()), sq_to_coord(self.to()))?;
        if let Some(kind) = self.promotion_piece() {
            write!(f, "{}", kind.to_char())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {:?}", self, self.moved(), self.flag())?;
        if let Some(cap) = self.captured() {
            write!(f, ", x{cap}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_unpack() {
        let queen = Piece::new(Color::White, PieceKind::Queen);
        let rook = Piece::new(Color::Black, PieceKind::Rook);
        let mv = Move::new(3, 59, queen, Some(rook));
        assert_eq!(mv.from(), 3);
        assert_eq!(mv.to(), 59);
        assert_eq!(mv.moved(), queen);
        assert_eq!(mv.captured(), Some(rook));
        assert_eq!(mv.promotion_piece(), None);
        assert_eq!(mv.flag(), MoveFlag::Normal);
        assert!(mv.is_capture());
    }

    #[test]
    fn test_en_passant_capture_square() {
        // e5xd6 e.p. takes the pawn on d5
        let mv = Move::en_passant(36, 43, Color::White);
        assert!(mv.is_capture());
        assert_eq!(mv.capture_square(), 35);

        // d4xe3 e.p. takes the pawn on e4
        let mv = Move::en_passant(27, 20, Color::Black);
        assert_eq!(mv.capture_square(), 28);
        assert_eq!(
            mv.captured(),
            Some(Piece::new(Color::White, PieceKind::Pawn))
        );
    }

    #[test]
    fn test_promotion_display() {
        let mv = Move::promotion(48, 56, Color::White, None, PieceKind::Knight);
        assert_eq!(mv.to_string(), "a7a8n");
        assert!(!mv.is_capture());
        assert_eq!(mv.promotion_piece(), Some(PieceKind::Knight));

        let castle = Move::castle(60, 62, Color::Black);
        assert_eq!(castle.to_string(), "e8g8");
        assert!(castle.is_castle());
    }

    #[test]
    fn test_ordering_by_squares() {
        let pawn = Piece::new(Color::White, PieceKind::Pawn);
        let a = Move::new(8, 16, pawn, None);
        let b = Move::double_push(8, 24, Color::White);
        let c = Move::new(9, 17, pawn, None);
        assert!(a < b);
        assert!(b < c);
    }
}
