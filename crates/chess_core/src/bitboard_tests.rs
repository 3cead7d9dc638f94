use super::*;

#[test]
fn test_from_square() {
    assert_eq!(Bitboard::from_square(0).0, 1); // a1
    assert_eq!(Bitboard::from_square(7).0, 128); // h1
    assert_eq!(Bitboard::from_square(63).0, 1 << 63); // h8
}

#[test]
fn test_file_and_rank() {
    assert_eq!(Bitboard::file(0), Bitboard::FILE_A);
    assert_eq!(Bitboard::file(7), Bitboard::FILE_H);
    assert_eq!(Bitboard::rank(0), Bitboard::RANK_1);
    assert_eq!(Bitboard::rank(7), Bitboard::RANK_8);
    assert_eq!(Bitboard::BACK_RANKS.popcount(), 16);
}

#[test]
fn test_light_squares() {
    assert!(!Bitboard::LIGHT_SQUARES.contains(0)); // a1 dark
    assert!(Bitboard::LIGHT_SQUARES.contains(1)); // b1 light
    assert!(Bitboard::LIGHT_SQUARES.contains(7)); // h1 light
    assert!(Bitboard::LIGHT_SQUARES.contains(56)); // a8 light
    assert_eq!(Bitboard::LIGHT_SQUARES.popcount(), 32);
}

#[test]
fn test_more_than_one() {
    assert!(!Bitboard::EMPTY.more_than_one());
    assert!(!Bitboard::from_square(12).more_than_one());
    assert!((Bitboard::from_square(12) | Bitboard::from_square(40)).more_than_one());
}

#[test]
fn test_iterator() {
    let bb = Bitboard(0b1010);
    let squares: Vec<u8> = bb.collect();
    assert_eq!(squares, vec![1, 3]);
}

#[test]
fn test_toggle() {
    let mut bb = Bitboard::EMPTY;
    bb.toggle(9);
    assert!(bb.contains(9));
    bb.toggle(9);
    assert!(bb.is_empty());
}

#[test]
fn test_diagonal_shifts_do_not_wrap() {
    let a1 = Bitboard::from_square(0);
    assert_eq!(a1.north(), Bitboard::from_square(8));
    assert_eq!(a1.north_east(), Bitboard::from_square(9));
    assert_eq!(a1.north_west(), Bitboard::EMPTY);

    let h8 = Bitboard::from_square(63);
    assert_eq!(h8.south_west(), Bitboard::from_square(54));
    assert_eq!(h8.south_east(), Bitboard::EMPTY);
    assert_eq!(h8.north(), Bitboard::EMPTY);
}
