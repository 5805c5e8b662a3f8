//! CLI argument definitions for the sales pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "sales-etl",
    version,
    about = "Reconcile regional store sales into one canonical sales table",
    long_about = "Reconcile regional store sales into one canonical sales table.\n\n\
                  Source CSV files are copied into a staging store, every region is\n\
                  joined, cleaned and converted to USD, and the consolidated table\n\
                  is written to the transformation and presentation stores."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Root directory holding Source/, Staging/, Transformation/ and Presentation/.
    ///
    /// Overrides `data_dir` from the configuration file. Defaults to `data`.
    #[arg(long = "data-dir", value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// JSON pipeline configuration (regions, output table, data directory).
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run extract, transform and load in sequence.
    Run,

    /// Copy every configured source CSV into the staging store.
    Extract,

    /// Build the canonical sales table from the staging store.
    Transform,

    /// Copy the canonical sales table into the presentation store.
    Load,

    /// List staging tables with their columns and row counts.
    Diagnose,

    /// List the configured regions.
    Regions,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
