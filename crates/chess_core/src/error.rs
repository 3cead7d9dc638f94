use thiserror::Error;

/// Why a FEN string was rejected. Nothing is ever repaired: any of these
/// means no position was produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("expected 4 to 6 space-separated fields, found {0}")]
    FieldCount(usize),
    #[error("piece placement must have 8 ranks, found {0}")]
    RankCount(usize),
    #[error("rank {rank} describes {files} files instead of 8")]
    RankLength { rank: u8, files: u32 },
    #[error("invalid piece character '{0}'")]
    InvalidPiece(char),
    #[error("invalid side to move '{0}'")]
    InvalidSideToMove(String),
    #[error("invalid castling field '{0}'")]
    InvalidCastling(String),
    #[error("castling right '{0}' requires king and rook on their home squares")]
    CastlingWithoutPieces(char),
    #[error("invalid en-passant square '{0}'")]
    InvalidEnPassant(String),
    #[error("en-passant square '{0}' has no pawn that just advanced two squares")]
    UnjustifiedEnPassant(String),
    #[error("invalid halfmove clock '{0}'")]
    InvalidHalfmoveClock(String),
    #[error("invalid fullmove number '{0}'")]
    InvalidFullmoveNumber(String),
    #[error("{color} must have exactly one king, found {count}")]
    KingCount { color: &'static str, count: u32 },
    #[error("pawn on the first or last rank")]
    PawnOnBackRank,
    #[error("the side not to move is in check")]
    OpponentInCheck,
}
