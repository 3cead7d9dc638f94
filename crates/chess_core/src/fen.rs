//! Forsyth-Edwards Notation parsing and printing.
//!
//! Parsing is strict: a FEN that describes an impossible or inconsistent
//! position is rejected with a [`FenError`] rather than patched up. The
//! halfmove and fullmove fields may be omitted and default to `0` and `1`.

use std::str::FromStr;

use tracing::debug;

use crate::bitboard::Bitboard;
use crate::board::{CastlingRights, Position};
use crate::error::FenError;
use crate::types::*;

/// Largest accepted halfmove clock or fullmove number. Leaves room for any
/// number of further plies without the counters overflowing.
const MAX_COUNTER: u32 = 1 << 24;

impl Position {
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        parse_fen(fen).inspect_err(|e| debug!(fen, error = %e, "rejected FEN"))
    }

    pub fn to_fen(&self) -> String {
        let mut out = String::with_capacity(90);
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                match self.piece_at(rank * 8 + file) {
                    Some(pc) => {
                        if empty > 0 {
                            out.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        out.push(pc.to_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push(char::from(b'0' + empty));
            }
            if rank > 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(match self.side_to_move() {
            Color::White => 'w',
            Color::Black => 'b',
        });
        out.push(' ');
        out.push_str(&self.castling().to_string());
        out.push(' ');
        match self.ep_square() {
            Some(s) => out.push_str(&sq_to_coord(s)),
            None => out.push('-'),
        }
        out.push_str(&format!(
            " {} {}",
            self.halfmove_clock(),
            self.fullmove_number()
        ));
        out
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}

fn parse_fen(fen: &str) -> Result<Position, FenError> {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    if !(4..=6).contains(&parts.len()) {
        return Err(FenError::FieldCount(parts.len()));
    }

    let mut pos = Position::empty();
    parse_placement(&mut pos, parts[0])?;

    let side = match parts[1] {
        "w" => Color::White,
        "b" => Color::Black,
        other => return Err(FenError::InvalidSideToMove(other.to_string())),
    };
    pos.set_side_to_move(side);

    for color in Color::BOTH {
        let count = pos.pieces(color, PieceKind::King).popcount();
        if count != 1 {
            let color = match color {
                Color::White => "white",
                Color::Black => "black",
            };
            return Err(FenError::KingCount { color, count });
        }
    }
    let pawns =
        pos.pieces(Color::White, PieceKind::Pawn) | pos.pieces(Color::Black, PieceKind::Pawn);
    if (pawns & Bitboard::BACK_RANKS).is_nonempty() {
        return Err(FenError::PawnOnBackRank);
    }

    pos.set_castling(parse_castling(&pos, parts[2])?);
    pos.set_ep_file(parse_en_passant(&pos, parts[3])?);

    if let Some(hm) = parts.get(4) {
        pos.halfmove_clock = match hm.parse::<u32>() {
            Ok(n) if n <= MAX_COUNTER => n,
            _ => return Err(FenError::InvalidHalfmoveClock(hm.to_string())),
        };
    }
    if let Some(fm) = parts.get(5) {
        pos.fullmove_number = match fm.parse::<u32>() {
            Ok(n) if (1..=MAX_COUNTER).contains(&n) => n,
            _ => return Err(FenError::InvalidFullmoveNumber(fm.to_string())),
        };
    }

    if pos.in_check(side.other()) {
        return Err(FenError::OpponentInCheck);
    }

    debug_assert!(pos.validate());
    Ok(pos)
}

fn parse_placement(pos: &mut Position, board: &str) -> Result<(), FenError> {
    let ranks: Vec<&str> = board.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::RankCount(ranks.len()));
    }

    for (rank_idx, rank_str) in ranks.iter().enumerate() {
        // FEN lists rank 8 first.
        let rank = 7 - rank_idx as u8;
        let mut file: u32 = 0;
        for ch in rank_str.chars() {
            match ch {
                '1'..='8' => file += ch as u32 - '0' as u32,
                _ => {
                    let pc = Piece::from_char(ch).ok_or(FenError::InvalidPiece(ch))?;
                    if file >= 8 {
                        return Err(FenError::RankLength {
                            rank: rank + 1,
                            files: file + 1,
                        });
                    }
                    pos.put_piece(rank * 8 + file as u8, pc);
                    file += 1;
                }
            }
        }
        if file != 8 {
            return Err(FenError::RankLength {
                rank: rank + 1,
                files: file,
            });
        }
    }
    Ok(())
}

fn parse_castling(pos: &Position, field: &str) -> Result<CastlingRights, FenError> {
    let mut rights = CastlingRights::NONE;
    if field == "-" {
        return Ok(rights);
    }
    if field.is_empty() {
        return Err(FenError::InvalidCastling(field.to_string()));
    }
    for c in field.chars() {
        let right = match c {
            'K' => CastlingRights::WHITE_KING,
            'Q' => CastlingRights::WHITE_QUEEN,
            'k' => CastlingRights::BLACK_KING,
            'q' => CastlingRights::BLACK_QUEEN,
            _ => return Err(FenError::InvalidCastling(field.to_string())),
        };
        if rights.contains(right) {
            return Err(FenError::InvalidCastling(field.to_string()));
        }
        if !pos.castling_pieces_home(right) {
            return Err(FenError::CastlingWithoutPieces(c));
        }
        rights.insert(right);
    }
    Ok(rights)
}

fn parse_en_passant(pos: &Position, field: &str) -> Result<Option<u8>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    let target = coord_to_sq(field).ok_or_else(|| FenError::InvalidEnPassant(field.to_string()))?;
    let expected_rank = match pos.side_to_move() {
        Color::White => 5,
        Color::Black => 2,
    };
    if rank_of(target) != expected_rank {
        return Err(FenError::InvalidEnPassant(field.to_string()));
    }
    let file = file_of(target);
    if !pos.ep_file_justified(file) {
        return Err(FenError::UnjustifiedEnPassant(field.to_string()));
    }
    Ok(Some(file))
}

#[cfg(test)]
#[path = "fen_tests.rs"]
mod fen_tests;
