//! CLI parse: clap types for whodunit. No behavior; definitions only.

use clap::Parser;
use std::path::PathBuf;

/// Whodunit - staged murder-mystery generation
#[derive(Parser, Debug)]
#[command(name = "whodunit")]
#[command(about = "Generate a self-consistent murder mystery, one stage at a time")]
pub struct Cli {
    /// Workspace root directory (where config/ is looked up)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
