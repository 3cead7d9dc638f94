//! JSON profiles written by `-cpuprofile` and `-memprofile`.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::alloc::AllocStats;

/// One timed perft run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSample {
    pub run: u32,
    pub nodes: u64,
    pub seconds: f64,
    pub nodes_per_second: f64,
}

impl RunSample {
    pub fn new(run: u32, nodes: u64, elapsed: Duration) -> Self {
        let seconds = elapsed.as_secs_f64();
        Self {
            run,
            nodes,
            seconds,
            nodes_per_second: nodes_per_second(nodes, seconds),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingProfile {
    pub label: Option<String>,
    pub fen: String,
    pub depth: u32,
    pub runs: Vec<RunSample>,
    pub total_nodes: u64,
    pub total_seconds: f64,
    pub nodes_per_second: f64,
}

impl TimingProfile {
    pub fn new(label: Option<String>, fen: String, depth: u32, runs: Vec<RunSample>) -> Self {
        let total_nodes = runs.iter().map(|r| r.nodes).sum();
        let total_seconds = runs.iter().map(|r| r.seconds).sum();
        Self {
            label,
            fen,
            depth,
            runs,
            total_nodes,
            total_seconds,
            nodes_per_second: nodes_per_second(total_nodes, total_seconds),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryProfile {
    pub label: Option<String>,
    pub allocations: u64,
    pub deallocations: u64,
    pub bytes_allocated: u64,
    pub peak_live_bytes: u64,
}

impl MemoryProfile {
    pub fn new(label: Option<String>, stats: AllocStats) -> Self {
        Self {
            label,
            allocations: stats.allocations,
            deallocations: stats.deallocations,
            bytes_allocated: stats.bytes_allocated,
            peak_live_bytes: stats.peak_live_bytes,
        }
    }
}

pub fn nodes_per_second(nodes: u64, seconds: f64) -> f64 {
    if seconds > 0.0 {
        nodes as f64 / seconds
    } else {
        0.0
    }
}

/// Pretty-printed JSON, like the rest of the workspace's result files.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize profile")?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}
