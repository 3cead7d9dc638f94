//! Command-line flags.
//!
//! Flags take a single dash (`-depth 5`); `--depth`, `-depth=5` and
//! `-divide=false` are accepted too.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use chess_core::START_FEN;

pub const USAGE: &str = "\
Usage: perft [flags]

Flags:
  -fen <FEN>          position to search (default: start position)
  -depth <N>          search depth (default: 5)
  -divide             print the node count under each root move
  -repeat <N>         run the search N times (default: 1)
  -label <TEXT>       prefix every output line with [TEXT]
  -cpuprofile <PATH>  write a JSON timing profile
  -memprofile <PATH>  write a JSON allocation profile
  -suite <PATH>       run every case of a TOML perft suite
  -h, -help           show this message

Exit status: 0 on success, 1 on a suite mismatch, 2 on bad arguments.";

pub const DEFAULT_DEPTH: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub fen: String,
    pub depth: u32,
    pub divide: bool,
    pub repeat: u32,
    pub label: Option<String>,
    pub cpuprofile: Option<PathBuf>,
    pub memprofile: Option<PathBuf>,
    pub suite: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            fen: START_FEN.to_string(),
            depth: DEFAULT_DEPTH,
            divide: false,
            repeat: 1,
            label: None,
            cpuprofile: None,
            memprofile: None,
            suite: None,
        }
    }
}

impl Options {
    /// `[label] ` or nothing.
    pub fn prefix(&self) -> String {
        match &self.label {
            Some(label) => format!("[{label}] "),
            None => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Run(Options),
}

pub fn parse(args: &[String]) -> Result<Command> {
    let mut opts = Options::default();
    let mut fen_given = false;
    let mut depth_given = false;

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        let Some(flag) = arg.strip_prefix("--").or_else(|| arg.strip_prefix('-')) else {
            bail!("unexpected argument {arg:?}");
        };
        let (name, inline) = match flag.split_once('=') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (flag, None),
        };

        // Value of a flag that requires one: inline or the next argument.
        let mut value = || -> Result<String> {
            if let Some(v) = inline.clone() {
                return Ok(v);
            }
            i += 1;
            args.get(i)
                .cloned()
                .ok_or_else(|| anyhow!("flag -{name} needs a value"))
        };

        match name {
            "h" | "help" => return Ok(Command::Help),
            "fen" => {
                opts.fen = value()?;
                fen_given = true;
            }
            "depth" => {
                let v = value()?;
                depth_given = true;
                opts.depth = v
                    .parse()
                    .with_context(|| format!("invalid -depth {v:?}"))?;
            }
            "divide" => {
                opts.divide = match inline.as_deref() {
                    None | Some("true") | Some("1") => true,
                    Some("false") | Some("0") => false,
                    Some(other) => bail!("invalid -divide value {other:?}"),
                };
            }
            "repeat" => {
                let v = value()?;
                opts.repeat = v
                    .parse()
                    .with_context(|| format!("invalid -repeat {v:?}"))?;
                if opts.repeat == 0 {
                    bail!("-repeat must be at least 1");
                }
            }
            "label" => opts.label = Some(value()?),
            "cpuprofile" => opts.cpuprofile = Some(PathBuf::from(value()?)),
            "memprofile" => opts.memprofile = Some(PathBuf::from(value()?)),
            "suite" => opts.suite = Some(PathBuf::from(value()?)),
            _ => bail!("unknown flag {arg:?}"),
        }
        i += 1;
    }

    if opts.suite.is_some() && (fen_given || depth_given || opts.divide) {
        bail!("-suite cannot be combined with -fen, -depth or -divide");
    }
    Ok(Command::Run(opts))
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod args_tests;
