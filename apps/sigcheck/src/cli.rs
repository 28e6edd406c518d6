//! Command line interface definition

use clap::Parser;
use sigcheck_hash::DigestAlgorithm;
use std::path::PathBuf;

/// sigcheck - verify a directory tree against its checksum manifest
#[derive(Parser, Debug)]
#[command(name = "sigcheck")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Verify a directory tree against its checksum manifest")]
#[command(long_about = None)]
pub struct Cli {
    /// Directory holding the manifest and the files it lists
    #[arg(value_name = "ROOT_DIR")]
    pub root_dir: PathBuf,

    /// Manifest file name inside ROOT_DIR [default: <algorithm>sum.txt]
    #[arg(short, long, value_name = "NAME")]
    pub manifest: Option<String>,

    /// Digest algorithm used by the manifest
    #[arg(short, long, value_name = "ALG")]
    pub algorithm: Option<DigestAlgorithm>,

    /// Number of files checked in parallel (0 = one per CPU)
    #[arg(short = 'j', long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Read buffer size in bytes
    #[arg(long, value_name = "BYTES")]
    pub chunk_size: Option<usize>,

    /// Give up after this many seconds (0 = never)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Use alternate config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the full report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Print one line per checked file
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable debug logging on stderr
    #[arg(long)]
    pub debug: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}
