//! Chess position core: bitboard board representation, legal move
//! generation, make/unmake, draw detection and perft.
//!
//! Search, evaluation and protocol front-ends are consumers of this crate and
//! live elsewhere.

pub mod attacks;
pub mod bitboard;
pub mod board;
pub mod draw;
pub mod error;
pub mod fen;
pub mod make_move;
pub mod movegen;
pub mod moves;
pub mod perft;
pub mod types;
pub mod uci;
pub mod zobrist;

pub use attacks::*;
pub use bitboard::*;
pub use board::*;
pub use error::FenError;
pub use make_move::{MoveState, UndoStack};
pub use movegen::{legal_moves, legal_moves_into};
pub use moves::{Move, MoveFlag};
pub use perft::{perft, perft_divide};
pub use types::*;
pub use uci::*;
pub use zobrist::ZOBRIST;
