//! Draw detection: stalemate, fifty-move rule, repetition and dead material.

use chess_core::{Color, PieceKind, Position, UndoStack, legal_moves_into};

fn fen(s: &str) -> Position {
    Position::from_fen(s).unwrap_or_else(|e| panic!("bad test FEN {s}: {e}"))
}

// =============================================================================
// Stalemate
// =============================================================================

#[test]
fn test_stalemate_king_in_corner() {
    // Black king a8, white queen b6, white king c7
    let pos = fen("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1");

    let mut moves = Vec::new();
    legal_moves_into(&pos, &mut moves);

    assert!(moves.is_empty(), "Stalemate position should have no legal moves");
    assert!(!pos.in_check(Color::Black));
    assert!(pos.in_stalemate());
}

#[test]
fn test_stalemate_king_and_pawn_endgame() {
    let pos = fen("6k1/6P1/6K1/8/8/8/8/8 b - - 0 1");

    let mut moves = Vec::new();
    legal_moves_into(&pos, &mut moves);

    assert!(moves.is_empty(), "Stalemate position should have no legal moves");
    assert!(pos.in_stalemate());
}

// =============================================================================
// Fifty-move rule
// =============================================================================

#[test]
fn test_fifty_move_rule_at_100_halfmoves() {
    let pos = fen("8/8/8/4k3/8/4K3/8/8 w - - 100 60");
    assert!(pos.is_draw_by_50());
}

#[test]
fn test_fifty_move_rule_at_99_halfmoves() {
    let pos = fen("8/8/8/4k3/8/4K3/8/8 w - - 99 60");
    assert!(!pos.is_draw_by_50());
}

#[test]
fn test_fifty_move_rule_reached_by_quiet_move() {
    let mut pos = fen("8/8/8/4k3/8/4K3/8/8 w - - 99 60");
    let mv = pos.parse_move("e3d3").unwrap();
    pos.make_move(mv).unwrap();
    assert_eq!(pos.halfmove_clock(), 100);
    assert!(pos.is_draw_by_50());
}

#[test]
fn test_fifty_move_rule_reset_on_pawn_move() {
    let mut pos = fen("8/8/8/4k3/8/3K4/4P3/8 w - - 99 60");

    let mut moves = Vec::new();
    legal_moves_into(&pos, &mut moves);
    let pawn_move = moves
        .iter()
        .copied()
        .find(|m| m.moved().kind == PieceKind::Pawn)
        .expect("Should have a pawn move available");
    pos.make_move(pawn_move).unwrap();

    assert!(!pos.is_draw_by_50(), "Pawn move should reset halfmove clock");
    assert_eq!(pos.halfmove_clock(), 0);
}

#[test]
fn test_fifty_move_rule_reset_on_capture() {
    let mut pos = fen("8/8/8/4k3/8/3K4/4n3/8 w - - 99 60");
    let capture = pos.parse_move("d3e2").unwrap();
    assert!(capture.is_capture());
    pos.make_move(capture).unwrap();
    assert_eq!(pos.halfmove_clock(), 0);
}

// =============================================================================
// Insufficient material
// =============================================================================

#[test]
fn test_insufficient_material_king_vs_king() {
    assert!(fen("8/8/8/4k3/8/4K3/8/8 w - - 0 1").is_insufficient_material());
}

#[test]
fn test_insufficient_material_single_minor() {
    for s in [
        "8/8/8/4k3/8/4KB2/8/8 w - - 0 1",
        "8/8/8/4k3/8/N3K3/8/8 w - - 0 1",
        "8/8/4b3/4k3/8/4K3/8/8 w - - 0 1",
        "8/8/4n3/4k3/8/4K3/8/8 w - - 0 1",
    ] {
        assert!(fen(s).is_insufficient_material(), "{s}");
    }
}

#[test]
fn test_insufficient_material_same_color_bishops() {
    // c1 and f8 are both dark squares
    let pos = fen("5b2/8/8/4k3/8/4K3/8/2B5 w - - 0 1");
    assert!(pos.is_insufficient_material());
}

#[test]
fn test_sufficient_material_opposite_color_bishops() {
    // c1 dark, c8 light
    let pos = fen("2b5/8/8/4k3/8/4K3/8/2B5 w - - 0 1");
    assert!(!pos.is_insufficient_material());
}

#[test]
fn test_sufficient_material() {
    for s in [
        "8/8/8/4k3/8/4K3/4P3/8 w - - 0 1",
        "8/8/8/4k3/8/4K3/8/4R3 w - - 0 1",
        "8/8/8/4k3/8/4K3/8/4Q3 w - - 0 1",
        "8/8/8/4k3/8/4K3/3NN3/8 w - - 0 1",
        "8/8/4n3/4k3/8/4K3/8/2B5 w - - 0 1",
    ] {
        assert!(!fen(s).is_insufficient_material(), "{s}");
    }
}

// =============================================================================
// Zobrist key (repetition identity)
// =============================================================================

#[test]
fn test_key_same_position() {
    assert_eq!(
        Position::startpos().zobrist_key(),
        fen(chess_core::START_FEN).zobrist_key()
    );
}

#[test]
fn test_key_differs_by_side_castling_and_ep() {
    let base = fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
    let no_ep = fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1");
    let fewer_rights = fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b Kq e3 0 1");
    let white = fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 1");

    assert_ne!(base.zobrist_key(), no_ep.zobrist_key());
    assert_ne!(base.zobrist_key(), fewer_rights.zobrist_key());
    assert_ne!(no_ep.zobrist_key(), white.zobrist_key());
}

#[test]
fn test_key_ignores_move_counters() {
    let a = fen("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3");
    let b = fen("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 6 5");
    assert_eq!(a.zobrist_key(), b.zobrist_key());
}

#[test]
fn test_threefold_repetition_by_knight_shuffle() {
    let mut pos = fen("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3");
    let mut stack = UndoStack::new();
    let mut history = vec![pos.zobrist_key()];

    let cycle = ["f3g1", "c6b8", "g1f3", "b8c6"];
    for uci in cycle {
        let mv = pos.parse_move(uci).unwrap();
        assert!(pos.push_move(mv, &mut stack, &mut history));
        assert!(!pos.is_draw_by_repetition(&history), "early draw at {uci}");
    }
    for (i, uci) in cycle.iter().enumerate() {
        let mv = pos.parse_move(uci).unwrap();
        assert!(pos.push_move(mv, &mut stack, &mut history));
        assert_eq!(pos.is_draw_by_repetition(&history), i == 3, "after {uci}");
    }

    // Undoing the last move leaves only two occurrences.
    pos.pop_move(&mut stack, &mut history);
    assert!(!pos.is_draw_by_repetition(&history));
}

// =============================================================================
// Checkmate vs stalemate
// =============================================================================

#[test]
fn test_checkmate_is_not_stalemate() {
    let pos = fen("r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4");

    let mut moves = Vec::new();
    legal_moves_into(&pos, &mut moves);

    assert!(moves.is_empty(), "Checkmate position should have no legal moves");
    assert!(pos.in_check(Color::Black));
    assert!(pos.in_checkmate());
    assert!(!pos.in_stalemate());
}

#[test]
fn test_check_is_not_checkmate() {
    let pos = fen("rnbqkbnr/ppppp1pp/8/5p1Q/4P3/8/PPPP1PPP/RNB1KBNR b KQkq - 1 2");

    let mut moves = Vec::new();
    legal_moves_into(&pos, &mut moves);

    assert!(!moves.is_empty(), "Check position should have legal moves");
    assert!(pos.in_check(Color::Black));
    assert!(!pos.in_checkmate());
}
