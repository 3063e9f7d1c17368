use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::core::output::{OutputFormat, ResultFilter};

#[derive(Parser, Debug)]
#[command(
    name = "handle-check",
    version,
    about = "Check whether a handle looks free on Instagram, YouTube, X and LinkedIn"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to config file (TOML). Default: config/handle-check.toml
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Increase verbosity (info, debug, trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Optional log file path
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve POST /check over HTTP
    Serve {
        /// Listen address, e.g. 0.0.0.0:3000
        #[arg(long)]
        listen: Option<String>,
        #[command(flatten)]
        probe: ProbeArgs,
    },
    /// Check names from the command line or a file and print the results
    Check {
        /// Names to check
        names: Vec<String>,
        /// Read names from a text or CSV file (first column)
        #[arg(long)]
        file: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormatArg,
        /// Write results here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Keep only some records
        #[arg(long, value_enum, default_value = "all")]
        filter: FilterArg,
        #[command(flatten)]
        probe: ProbeArgs,
    },
}

/// Overrides shared by every command that probes.
#[derive(Args, Debug, Clone, Default)]
pub struct ProbeArgs {
    /// Comma-separated platforms to check (case-insensitive)
    #[arg(long, value_delimiter = ',')]
    pub platforms: Option<Vec<String>>,
    /// Per-probe timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,
    /// Maximum probes in flight
    #[arg(long)]
    pub concurrency: Option<usize>,
    /// Reuse verdicts for this many seconds (0 disables the cache)
    #[arg(long)]
    pub cache_ttl: Option<u64>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormatArg {
    Json,
    Jsonl,
    Markdown,
    Csv,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(value: OutputFormatArg) -> Self {
        match value {
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Jsonl => OutputFormat::Jsonl,
            OutputFormatArg::Markdown => OutputFormat::Markdown,
            OutputFormatArg::Csv => OutputFormat::Csv,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum FilterArg {
    All,
    AvailableAny,
    TakenAny,
}

impl From<FilterArg> for ResultFilter {
    fn from(value: FilterArg) -> Self {
        match value {
            FilterArg::All => ResultFilter::All,
            FilterArg::AvailableAny => ResultFilter::AvailableAny,
            FilterArg::TakenAny => ResultFilter::TakenAny,
        }
    }
}
