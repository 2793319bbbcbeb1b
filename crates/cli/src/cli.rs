//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// streamfan - fan-out dispatch engine for ordered event-stream records
#[derive(Parser, Debug)]
#[command(
    name = "streamfan",
    author,
    version,
    about = "Fan-out dispatch engine for event-stream records",
    long_about = "Reads a batch of event-stream records, resolves the downstream \n\
                  destinations each record belongs to from a routing table, and \n\
                  delivers them under each destination's transport limits with \n\
                  bounded concurrency."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "STREAMFAN_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "STREAMFAN_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dispatch a batch of records to their configured destinations
    Run(RunArgs),

    /// Validate a routing configuration file without dispatching
    Validate(ValidateArgs),

    /// Display routing configuration and transport information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to routing configuration file (TOML or JSON)
    #[arg(short, long, default_value = "routing.toml", env = "STREAMFAN_CONFIG")]
    pub config: PathBuf,

    /// Path to the input batch file (one JSON record per line)
    #[arg(short, long, default_value = "batch.ndjson", env = "STREAMFAN_INPUT")]
    pub input: PathBuf,

    /// Split the input into sub-batches of this many records (0 = one batch)
    #[arg(long, default_value = "0", env = "STREAMFAN_BATCH_SIZE")]
    pub batch_size: usize,

    /// Sources/targets processed concurrently
    #[arg(long, default_value = "2", env = "STREAMFAN_TARGET_CONCURRENCY")]
    pub target_concurrency: usize,

    /// Blocks posted concurrently within a target marked parallel
    #[arg(long, default_value = "1", env = "STREAMFAN_POSTER_CONCURRENCY")]
    pub poster_concurrency: usize,

    /// Validate configuration and input, then exit without dispatching
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "STREAMFAN_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to routing configuration file to validate
    #[arg(short, long, default_value = "routing.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to routing configuration file
    #[arg(short, long, default_value = "routing.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show detailed target information
    #[arg(long)]
    pub targets: bool,

    /// Show registered transport limits
    #[arg(long)]
    pub transports: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
