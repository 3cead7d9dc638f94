//! Perft suites described in TOML.
//!
//! ```toml
//! [[case]]
//! name = "kiwipete"
//! fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"
//! depths = [[1, 48], [2, 2039]]
//! ```

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use chess_core::{Position, perft};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Suite {
    #[serde(rename = "case")]
    pub cases: Vec<SuiteCase>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SuiteCase {
    pub name: String,
    pub fen: String,
    /// `(depth, expected nodes)` pairs.
    pub depths: Vec<(u32, u64)>,
}

/// Outcome of one `(case, depth)` check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseResult {
    pub name: String,
    pub depth: u32,
    pub expected: u64,
    pub nodes: u64,
    pub elapsed: Duration,
}

impl CaseResult {
    pub fn passed(&self) -> bool {
        self.nodes == self.expected
    }
}

impl Suite {
    pub fn parse(text: &str) -> Result<Self> {
        let suite: Suite = toml::from_str(text).context("malformed suite")?;
        if suite.cases.is_empty() {
            bail!("suite has no [[case]] entries");
        }
        for case in &suite.cases {
            Position::from_fen(&case.fen)
                .with_context(|| format!("case {:?} has an invalid FEN", case.name))?;
            if case.depths.is_empty() {
                bail!("case {:?} lists no depths", case.name);
            }
        }
        Ok(suite)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read suite {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("in suite {}", path.display()))
    }

    /// Run every case at every listed depth, mismatches included.
    pub fn run(&self) -> Result<Vec<CaseResult>> {
        let mut results = Vec::new();
        for case in &self.cases {
            let mut pos = Position::from_fen(&case.fen)
                .with_context(|| format!("case {:?} has an invalid FEN", case.name))?;
            for &(depth, expected) in &case.depths {
                let start = Instant::now();
                let nodes = perft(&mut pos, depth);
                let elapsed = start.elapsed();
                let result = CaseResult {
                    name: case.name.clone(),
                    depth,
                    expected,
                    nodes,
                    elapsed,
                };
                if result.passed() {
                    info!(case = %case.name, depth, nodes, ?elapsed, "suite case passed");
                } else {
                    warn!(case = %case.name, depth, expected, nodes, "suite case mismatch");
                }
                results.push(result);
            }
        }
        Ok(results)
    }
}

#[cfg(test)]
#[path = "suite_tests.rs"]
mod suite_tests;
