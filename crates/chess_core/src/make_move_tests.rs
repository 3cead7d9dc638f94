use super::*;
use crate::movegen::legal_moves;
use crate::bitboard::Bitboard;

fn play(pos: &mut Position, uci: &str) -> MoveState {
    let mv = pos
        .parse_move(uci)
        .unwrap_or_else(|| panic!("{uci} not legal in {}", pos.to_fen()));
    pos.make_move(mv).expect("parsed move must be legal")
}

#[test]
fn test_make_unmake_restores_everything() {
    let fens = [
        crate::board::START_FEN,
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        "k7/8/8/3pP3/8/8/8/7K w - d6 0 2",
    ];
    for fen in fens {
        let mut pos = Position::from_fen(fen).unwrap();
        let before = pos.clone();
        for mv in legal_moves(&pos) {
            let undo = pos.make_move(mv).expect("generated move must be legal");
            assert!(pos.validate(), "{mv:?} from {fen}");
            assert_eq!(pos.zobrist_key(), pos.compute_zobrist(), "{mv:?} from {fen}");
            pos.unmake_move(mv, undo);
            assert_eq!(pos, before, "{mv:?} from {fen}");
        }
    }
}

#[test]
fn test_double_push_sets_and_clears_ep_file() {
    let mut pos = Position::startpos();
    play(&mut pos, "e2e4");
    assert_eq!(pos.ep_file(), Some(4));
    assert_eq!(pos.ep_square(), Some(20));
    assert_eq!(pos.halfmove_clock(), 0);
    play(&mut pos, "g8f6");
    assert_eq!(pos.ep_file(), None);
    assert_eq!(pos.zobrist_key(), pos.compute_zobrist());
}

#[test]
fn test_en_passant_removes_pawn_behind_target() {
    let mut pos = Position::from_fen("k7/8/8/3pP3/8/8/8/7K w - d6 0 2").unwrap();
    let before = pos.clone();
    let mv = pos.parse_move("e5d6").unwrap();
    let undo = pos.make_move(mv).unwrap();
    assert_eq!(undo.captured, Some(Piece::new(Color::Black, PieceKind::Pawn)));
    assert_eq!(pos.piece_at(35), None);
    assert_eq!(
        pos.piece_at(43),
        Some(Piece::new(Color::White, PieceKind::Pawn))
    );
    assert_eq!(pos.halfmove_clock(), 0);
    pos.unmake_move(mv, undo);
    assert_eq!(pos, before);
}

#[test]
fn test_castling_moves_rook_and_clears_rights() {
    let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 10").unwrap();
    play(&mut pos, "e1g1");
    assert_eq!(pos.piece_at(5), Some(Piece::new(Color::White, PieceKind::Rook)));
    assert_eq!(pos.piece_at(7), None);
    assert_eq!(pos.piece_at(6), Some(Piece::new(Color::White, PieceKind::King)));
    assert_eq!(
        pos.castling(),
        CastlingRights::from_bits(CastlingRights::BLACK_KING.bits() | CastlingRights::BLACK_QUEEN.bits())
    );
    assert_eq!(pos.halfmove_clock(), 4);

    play(&mut pos, "e8c8");
    assert_eq!(pos.piece_at(59), Some(Piece::new(Color::Black, PieceKind::Rook)));
    assert_eq!(pos.piece_at(56), None);
    assert_eq!(pos.castling(), CastlingRights::NONE);
    assert_eq!(pos.fullmove_number(), 11);
    assert!(pos.validate());
}

#[test]
fn test_rook_moves_and_captures_clear_corner_rights() {
    let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    play(&mut pos, "a1a8");
    // White loses Q (rook left a1), black loses q (rook captured on a8).
    assert_eq!(
        pos.castling(),
        CastlingRights::from_bits(CastlingRights::WHITE_KING.bits() | CastlingRights::BLACK_KING.bits())
    );
    assert_eq!(pos.zobrist_key(), pos.compute_zobrist());
}

#[test]
fn test_king_move_clears_both_rights() {
    let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1").unwrap();
    play(&mut pos, "e8d8");
    assert_eq!(
        pos.castling(),
        CastlingRights::from_bits(CastlingRights::WHITE_KING.bits() | CastlingRights::WHITE_QUEEN.bits())
    );
}

#[test]
fn test_promotion_and_unmake() {
    let mut pos = Position::from_fen("1n5k/P7/8/8/8/8/8/7K w - - 5 1").unwrap();
    let before = pos.clone();
    let mv = pos.parse_move("a7b8q").unwrap();
    let undo = pos.make_move(mv).unwrap();
    assert_eq!(pos.piece_at(57), Some(Piece::new(Color::White, PieceKind::Queen)));
    assert_eq!(pos.pieces(Color::White, PieceKind::Pawn), Bitboard::EMPTY);
    assert_eq!(pos.halfmove_clock(), 0);
    pos.unmake_move(mv, undo);
    assert_eq!(pos, before);
}

#[test]
fn test_illegal_move_leaves_position_unchanged() {
    // The e2 knight is pinned against the king by the e8 rook.
    let mut pos = Position::from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
    let before = pos.clone();
    let knight = Piece::new(Color::White, PieceKind::Knight);
    let pinned = Move::new(12, 29, knight, None);
    assert!(pos.generate_pseudo_moves().contains(&pinned));
    assert!(!pos.generate_moves().contains(&pinned));
    assert_eq!(pos.make_move(pinned), None);
    assert_eq!(pos, before);
}

#[test]
fn test_foreign_move_is_rejected() {
    let mut pos = Position::startpos();
    let before = pos.clone();
    // A black move while white is to move.
    let black_pawn = Piece::new(Color::Black, PieceKind::Pawn);
    assert_eq!(pos.make_move(Move::new(52, 44, black_pawn, None)), None);
    // Wrong captured piece recorded.
    let knight = Piece::new(Color::White, PieceKind::Knight);
    let bogus = Move::new(6, 21, knight, Some(black_pawn));
    assert_eq!(pos.make_move(bogus), None);
    // Castling through pieces.
    assert_eq!(pos.make_move(Move::castle(4, 6, Color::White)), None);
    assert_eq!(pos, before);
}

#[test]
fn test_unreachable_targets_are_rejected() {
    let white = |kind| Piece::new(Color::White, kind);

    let mut pos = Position::startpos();
    let before = pos.clone();
    let black_rook = Piece::new(Color::Black, PieceKind::Rook);
    for mv in [
        // Rook a1xh8 straight through both armies.
        Move::new(0, 63, white(PieceKind::Rook), Some(black_rook)),
        // Bishop c1-e3 through the d2 pawn.
        Move::new(2, 20, white(PieceKind::Bishop), None),
        // Knight g1-g3.
        Move::new(6, 22, white(PieceKind::Knight), None),
        // Pawn e2-d3 without a capture.
        Move::new(12, 19, white(PieceKind::Pawn), None),
        // Pawn e2-e5 flagged as a double push.
        Move::double_push(12, 36, Color::White),
    ] {
        assert_eq!(pos.make_move(mv), None, "{mv:?} accepted");
    }
    assert_eq!(pos, before);

    // Pawn stepping backwards onto the first rank.
    let mut pos = Position::from_fen("4k3/8/8/8/8/8/4P3/K7 w - - 0 1").unwrap();
    assert_eq!(pos.make_move(Move::new(12, 4, white(PieceKind::Pawn), None)), None);
    assert!(pos.validate());

    // Double push from a pawn that already left its start rank.
    let mut pos = Position::from_fen("4k3/8/8/8/8/4P3/8/K7 w - - 0 1").unwrap();
    assert_eq!(pos.make_move(Move::double_push(20, 36, Color::White)), None);

    // Promotion to a king; the queen promotion from the same square is fine.
    let mut pos = Position::from_fen("4k3/P7/8/8/8/8/8/K7 w - - 0 1").unwrap();
    assert_eq!(pos.make_move(Move::promotion(48, 56, Color::White, None, PieceKind::King)), None);
    assert!(pos.make_move(Move::promotion(48, 56, Color::White, None, PieceKind::Queen)).is_some());
    assert!(pos.validate());
}

#[test]
fn test_castle_through_attacked_square_rejected_by_make() {
    // Black rook on f8 covers f1.
    let mut pos = Position::from_fen("k4r2/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
    assert!(pos.parse_move("e1g1").is_none());
    assert_eq!(pos.make_move(Move::castle(4, 6, Color::White)), None);
}

#[test]
fn test_push_pop_maintain_stack_and_history() {
    let mut pos = Position::startpos();
    let mut stack = UndoStack::new();
    let mut history = vec![pos.zobrist_key()];

    for uci in ["e2e4", "e7e5", "g1f3"] {
        let mv = pos.parse_move(uci).unwrap();
        assert!(pos.push_move(mv, &mut stack, &mut history));
    }
    assert_eq!(stack.len(), 3);
    assert_eq!(history.len(), 4);
    assert_eq!(*history.last().unwrap(), pos.zobrist_key());

    let black_pawn = Piece::new(Color::Black, PieceKind::Pawn);
    assert!(!pos.push_move(Move::new(52, 44, black_pawn, None), &mut stack, &mut history));
    assert_eq!(stack.len(), 3);

    assert_eq!(pos.pop_move(&mut stack, &mut history).map(|m| m.to_string()), Some("g1f3".into()));
    pos.pop_move(&mut stack, &mut history);
    pos.pop_move(&mut stack, &mut history);
    assert_eq!(pos.pop_move(&mut stack, &mut history), None);
    assert_eq!(pos, Position::startpos());
    assert_eq!(history, vec![pos.zobrist_key()]);
}
