use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::parse_duration_value;

use super::types::StatsKind;

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Convert JMeter sample logs to a compact binary form and compute latency stats, histograms and response code counts."
)]
pub struct LoglensArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Path to config file (TOML/JSON)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Convert text logs to sample files and compute their stats
    Import(ImportArgs),
    /// Write a sample file back out as a text log
    Export(ExportArgs),
    /// Compute and print stats for a sample file
    Stats(StatsArgs),
    /// Print stats stored by an earlier import
    Cached(CachedArgs),
}

#[derive(Debug, Args, Clone)]
pub struct ImportArgs {
    /// Text logs to import
    #[arg(required = true)]
    pub sources: Vec<PathBuf>,

    /// Directory for the converted sample files (defaults to each source's directory)
    #[arg(long = "out-dir")]
    pub out_dir: Option<PathBuf>,

    /// SQLite database receiving the computed stats
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Log id given to the first source; later sources count up from it
    #[arg(long = "first-log-id", default_value_t = 1, value_parser = clap::value_parser!(i64).range(1..))]
    pub first_log_id: i64,

    /// Time series bucket width (supports ms/s/m/h)
    #[arg(long = "timeseries-span", value_parser = parse_duration_value)]
    pub timeseries_span: Option<Duration>,

    /// Code count bucket width (supports ms/s/m/h)
    #[arg(long = "code-counts-span", value_parser = parse_duration_value)]
    pub code_counts_span: Option<Duration>,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    /// Sample file to export
    pub source: PathBuf,

    /// Destination text log (streams to stdout when omitted)
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct StatsArgs {
    /// Sample file to read
    pub source: PathBuf,

    /// Only samples with this label
    #[arg(long)]
    pub label: Option<String>,

    /// Bucket width for time series and code counts (supports ms/s/m/h)
    #[arg(long, value_parser = parse_duration_value)]
    pub span: Option<Duration>,

    /// Result to print
    #[arg(long, value_enum, default_value_t = StatsKind::Aggregate)]
    pub kind: StatsKind,

    /// Also write the time series as CSV to this path
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct CachedArgs {
    /// SQLite database written by `import`
    #[arg(long)]
    pub db: Option<PathBuf>,

    #[arg(long = "log-id", value_parser = clap::value_parser!(i64).range(1..))]
    pub log_id: i64,

    /// Label id; 0 is the whole log
    #[arg(long = "label-id", default_value_t = 0, value_parser = clap::value_parser!(i64).range(0..))]
    pub label_id: i64,

    /// Result to print
    #[arg(long, value_enum, default_value_t = StatsKind::Aggregate)]
    pub kind: StatsKind,

    /// Span of the binned code counts to print (supports ms/s/m/h)
    #[arg(long, value_parser = parse_duration_value)]
    pub span: Option<Duration>,
}
