//! Perft CLI
//!
//! Count leaf nodes of the legal move tree, split by root move, or check a
//! whole suite of reference counts.

mod alloc;
mod args;
mod profile;
mod suite;

use std::env;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use chess_core::{Position, perft, perft_divide};
use tracing::{error, info};

use crate::alloc::{AllocStats, CountingAlloc};
use crate::args::{Command, Options};
use crate::profile::{MemoryProfile, RunSample, TimingProfile, nodes_per_second, write_json};
use crate::suite::Suite;

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

enum Outcome {
    Passed,
    Mismatch,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "perft=info,chess_core=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let argv: Vec<String> = env::args().skip(1).collect();
    let opts = match args::parse(&argv) {
        Ok(Command::Help) => {
            println!("{}", args::USAGE);
            return ExitCode::SUCCESS;
        }
        Ok(Command::Run(opts)) => opts,
        Err(e) => {
            eprintln!("perft: {e:#}");
            eprintln!();
            eprintln!("{}", args::USAGE);
            return ExitCode::from(2);
        }
    };

    let result = match &opts.suite {
        Some(path) => run_suite(&opts, path),
        None => run_single(&opts),
    };
    match result {
        Ok(Outcome::Passed) => ExitCode::SUCCESS,
        Ok(Outcome::Mismatch) => ExitCode::from(1),
        Err(e) => {
            error!("{e:#}");
            eprintln!("perft: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run_single(opts: &Options) -> Result<Outcome> {
    let prefix = opts.prefix();
    let pos = Position::from_fen(&opts.fen).with_context(|| format!("invalid -fen {:?}", opts.fen))?;
    info!(fen = %opts.fen, depth = opts.depth, repeat = opts.repeat, divide = opts.divide, "perft start");

    alloc::reset_peak();
    let before = AllocStats::snapshot();

    let mut samples = Vec::with_capacity(opts.repeat as usize);
    for run in 1..=opts.repeat {
        let mut pos = pos.clone();
        let start = Instant::now();
        let nodes = if opts.divide {
            let divide = perft_divide(&mut pos, opts.depth);
            for (mv, count) in &divide {
                println!("{prefix}{mv}: {count}");
            }
            divide.values().sum()
        } else {
            perft(&mut pos, opts.depth)
        };
        let elapsed = start.elapsed();

        if opts.divide {
            println!("{prefix}");
            println!("{prefix}Nodes searched: {nodes}");
        }
        println!(
            "{prefix}run {run}/{}: depth {} nodes {nodes} time {elapsed:.3?} ({:.0} nps)",
            opts.repeat,
            opts.depth,
            nodes_per_second(nodes, elapsed.as_secs_f64())
        );
        samples.push(RunSample::new(run, nodes, elapsed));
    }

    let allocs = AllocStats::snapshot().since(&before);
    let timing = TimingProfile::new(opts.label.clone(), opts.fen.clone(), opts.depth, samples);
    info!(
        nodes = timing.total_nodes,
        seconds = timing.total_seconds,
        nps = timing.nodes_per_second,
        "perft finished"
    );

    if let Some(path) = &opts.cpuprofile {
        write_json(path, &timing)?;
        info!(path = %path.display(), "timing profile written");
    }
    if let Some(path) = &opts.memprofile {
        write_json(path, &MemoryProfile::new(opts.label.clone(), allocs))?;
        info!(path = %path.display(), "allocation profile written");
    }
    Ok(Outcome::Passed)
}

fn run_suite(opts: &Options, path: &Path) -> Result<Outcome> {
    let prefix = opts.prefix();
    let suite = Suite::load(path)?;
    info!(path = %path.display(), cases = suite.cases.len(), "suite start");

    alloc::reset_peak();
    let before = AllocStats::snapshot();
    let mut failures = 0usize;
    let mut samples = Vec::new();

    for round in 1..=opts.repeat {
        let results = suite.run()?;
        let nodes: u64 = results.iter().map(|r| r.nodes).sum();
        let elapsed = results.iter().map(|r| r.elapsed).sum();
        for r in &results {
            let status = if r.passed() { "ok" } else { "MISMATCH" };
            println!(
                "{prefix}{:<24} depth {:>2} expected {:>12} got {:>12} {:>10.3?} {status}",
                r.name, r.depth, r.expected, r.nodes, r.elapsed
            );
        }
        failures += results.iter().filter(|r| !r.passed()).count();
        samples.push(RunSample::new(round, nodes, elapsed));
    }

    let allocs = AllocStats::snapshot().since(&before);
    let deepest = suite
        .cases
        .iter()
        .flat_map(|c| c.depths.iter().map(|&(d, _)| d))
        .max()
        .unwrap_or(0);
    let timing = TimingProfile::new(
        opts.label.clone(),
        path.display().to_string(),
        deepest,
        samples,
    );
    println!(
        "{prefix}{} nodes in {:.3}s ({:.0} nps), {failures} mismatches",
        timing.total_nodes, timing.total_seconds, timing.nodes_per_second
    );
    info!(failures, nodes = timing.total_nodes, "suite finished");

    if let Some(out) = &opts.cpuprofile {
        write_json(out, &timing)?;
    }
    if let Some(out) = &opts.memprofile {
        write_json(out, &MemoryProfile::new(opts.label.clone(), allocs))?;
    }

    Ok(if failures == 0 {
        Outcome::Passed
    } else {
        Outcome::Mismatch
    })
}
