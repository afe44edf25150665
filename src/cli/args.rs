//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// modsync - keep a mods folder on the latest release of every listed mod
///
/// Reads `.mods.txt` from the target folder, downloads the newest file for
/// each listed project, removes files that were replaced upstream and
/// records what it found in `.cache.json`.
#[derive(Parser, Debug)]
#[command(name = "modsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The mods folder to sync (e.g. ~/.minecraft/mods)
    #[arg(required_unless_present = "init_config")]
    pub target: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, env = "MODSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write the default configuration file and exit
    #[arg(long, conflicts_with = "target")]
    pub init_config: bool,

    /// Resolve and show what would change without touching any file
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Number of mods resolved in parallel
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Timeout for a single request in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Latest-file endpoint, `{id}` is replaced by the mod identifier
    #[arg(long, env = "MODSYNC_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Output format for the final report
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format for the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable steps
    Text,
    /// JSON report on stdout
    Json,
}
