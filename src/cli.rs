//! CLI arguments for vm_stat2.
//!
//! This module defines the command-line interface using the clap library.
//! Unit flags override each other and repeated options override themselves,
//! so the last one given wins. Negative numbers
//! are accepted by the parser so that `-c` and `interval` reach validation in
//! [`crate::config::resolve_config`].

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "vm_stat2",
    about = "Show virtual memory statistics with app/wired/compressed breakdown",
    long_about = "Show virtual memory statistics with app/wired/compressed breakdown.\n\n\
                  Without an interval a single snapshot is printed. With a nonzero interval \
                  one compact row is printed every interval seconds, including page-in and \
                  page-out rates.",
    version,
    args_override_self = true,
    override_usage = "vm_stat2 [-b|-k|-m|-g] [-a] [[-c count] interval]"
)]
pub struct Args {
    /// Display values in bytes
    #[arg(short = 'b', overrides_with_all = ["kilobytes", "megabytes", "gigabytes"])]
    pub bytes: bool,

    /// Display values in kilobytes
    #[arg(short = 'k', overrides_with_all = ["bytes", "megabytes", "gigabytes"])]
    pub kilobytes: bool,

    /// Display values in megabytes
    #[arg(short = 'm', overrides_with_all = ["bytes", "kilobytes", "gigabytes"])]
    pub megabytes: bool,

    /// Display values in gigabytes
    #[arg(short = 'g', overrides_with_all = ["bytes", "kilobytes", "megabytes"])]
    pub gigabytes: bool,

    /// Show all details (verbose)
    #[arg(short = 'a', long = "all")]
    pub all: bool,

    /// Number of times to poll
    #[arg(short = 'c', value_name = "count", allow_negative_numbers = true)]
    pub count: Option<i64>,

    /// Log level (logs go to stderr)
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    /// Path to JSON test data file (uses recorded samples instead of the host)
    #[arg(short = 't', long)]
    pub test_data_file: Option<PathBuf>,

    /// Polling interval in seconds (enables polling mode)
    #[arg(value_name = "interval", allow_negative_numbers = true)]
    pub interval: Option<i64>,
}
