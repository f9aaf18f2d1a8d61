//! Run configuration resolved from command-line arguments.
//!
//! There is no configuration file; everything comes from [`Args`]. Validation
//! happens here, before any host statistics are read.

use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;

use crate::cli::Args;
use crate::poll::PollSettings;
use crate::units::UnitMode;

/// Configuration errors. Always fatal, reported with usage text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("count must be positive, got {0}")]
    NonPositiveCount(i64),

    #[error("interval must not be negative, got {0}")]
    NegativeInterval(i64),
}

/// Whether to print one snapshot or keep polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Snapshot,
    Polling {
        interval_secs: u64,
        count: Option<u64>,
    },
}

/// Validated run configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub unit_mode: UnitMode,
    pub verbose: bool,
    pub mode: RunMode,
    pub test_data_file: Option<PathBuf>,
}

impl Config {
    /// Polling parameters, if this configuration polls.
    pub fn poll_settings(&self) -> Option<PollSettings> {
        match self.mode {
            RunMode::Snapshot => None,
            RunMode::Polling {
                interval_secs,
                count,
            } => Some(PollSettings {
                interval_secs,
                count,
                unit_mode: self.unit_mode,
            }),
        }
    }
}

/// Unit mode selected by the flags. clap leaves at most one set.
fn resolve_unit_mode(args: &Args) -> UnitMode {
    if args.bytes {
        UnitMode::Byte
    } else if args.kilobytes {
        UnitMode::Kilobyte
    } else if args.megabytes {
        UnitMode::Megabyte
    } else if args.gigabytes {
        UnitMode::Gigabyte
    } else {
        UnitMode::Auto
    }
}

/// Validates parsed arguments and builds the run configuration.
///
/// An interval of 0 behaves exactly like no interval.
pub fn resolve_config(args: &Args) -> Result<Config, ConfigError> {
    let count = match args.count {
        Some(c) if c <= 0 => return Err(ConfigError::NonPositiveCount(c)),
        Some(c) => Some(c as u64),
        None => None,
    };

    let interval = match args.interval {
        Some(i) if i < 0 => return Err(ConfigError::NegativeInterval(i)),
        Some(i) => i as u64,
        None => 0,
    };

    let mode = if interval == 0 {
        if count.is_some() {
            warn!("-c has no effect without a polling interval");
        }
        RunMode::Snapshot
    } else {
        RunMode::Polling {
            interval_secs: interval,
            count,
        }
    };

    Ok(Config {
        unit_mode: resolve_unit_mode(args),
        verbose: args.all,
        mode,
        test_data_file: args.test_data_file.clone(),
    })
}
