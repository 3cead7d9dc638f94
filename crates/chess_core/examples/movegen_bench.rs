//! Move generation benchmark for profiling with cargo-flamegraph.
//!
//! Runs many iterations of each generator entry point on positions covering
//! openings, middlegames, promotions and endgames.
//!
//! Usage:
//!   cargo flamegraph --example movegen_bench -p chess_core

use std::time::{Duration, Instant};

use chess_core::{Move, Position, START_FEN, legal_moves_into};

const TEST_POSITIONS: &[(&str, &str)] = &[
    ("Start", START_FEN),
    (
        "e4",
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
    ),
    (
        "Sicilian",
        "rnbqkbnr/pp1ppppp/8/2p5/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2",
    ),
    (
        "Kiwipete",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    ),
    (
        "Promotions",
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    ),
    ("Rook endgame", "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1"),
    (
        "Knight fork",
        "r1bqkb1r/pppp1Npp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K2R b KQkq - 0 1",
    ),
];

const ITERATIONS: usize = 100_000;

fn run(label: &str, generate: impl Fn(&Position, &mut Vec<Move>)) {
    println!("--- {label} ---");
    let mut buf = Vec::with_capacity(256);
    let mut total_time = Duration::ZERO;

    for (name, fen) in TEST_POSITIONS {
        let Ok(pos) = Position::from_fen(fen) else {
            eprintln!("{name}: unparsable FEN, skipped");
            continue;
        };

        print!("{name:.<20}");
        let start = Instant::now();
        let mut generated = 0usize;
        for _ in 0..ITERATIONS {
            buf.clear();
            generate(&pos, &mut buf);
            generated += buf.len();
        }
        let elapsed = start.elapsed();
        total_time += elapsed;

        let per_pos = generated as f64 / ITERATIONS as f64;
        let rate = ITERATIONS as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
        println!(" {per_pos:>5.1} moves/pos, {rate:>10.0} pos/sec ({elapsed:>8.3?})");
    }
    println!("total {total_time:.3?}");
    println!();
}

fn main() {
    println!("=== Move Generation Benchmark ===");
    println!("Iterations per position: {ITERATIONS}");
    println!();

    run("legal", |pos, buf| legal_moves_into(pos, buf));
    run("pseudo-legal", |pos, buf| {
        pos.generate_pseudo_moves_into(buf);
    });
    run("captures", |pos, buf| {
        pos.generate_captures_into(buf);
    });
    run("quiets", |pos, buf| {
        pos.generate_quiets_into(buf);
    });
}
