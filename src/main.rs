//! vm_stat2 - version 0.1.0
//!
//! Virtual memory statistics with tracing logging.
//! This is the main entry point that resolves the configuration and runs
//! either a snapshot or the polling loop.

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};

use vmstat2::cli::{Args, LogLevel};
use vmstat2::config::{resolve_config, RunMode};
use vmstat2::{open_provider, run_polling, snapshot};

/// Initializes tracing logging subsystem with configured log level.
///
/// Logs are written to stderr so stdout carries only the report.
fn setup_logging(args: &Args) {
    let log_level = match args.log_level {
        LogLevel::Off => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    debug!("Logging initialized with level: {:?}", args.log_level);
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    setup_logging(&args);

    let config = match resolve_config(&args) {
        Ok(config) => config,
        Err(e) => Args::command()
            .error(ErrorKind::ValueValidation, e)
            .exit(),
    };

    debug!(
        "Config: unit_mode={} verbose={} mode={:?} test_data_file={:?}",
        config.unit_mode.as_str(),
        config.verbose,
        config.mode,
        config.test_data_file
    );

    let mut provider = open_provider(config.test_data_file.as_deref())
        .context("Failed to open host statistics")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match config.mode {
        RunMode::Snapshot => {
            snapshot(provider.as_mut(), config.unit_mode, config.verbose, &mut out)
                .context("Snapshot failed")?;
        }
        RunMode::Polling { .. } => {
            if config.verbose {
                debug!("-a has no effect in polling mode");
            }
            let settings = config
                .poll_settings()
                .context("Polling mode without polling settings")?;
            let rows = run_polling(provider.as_mut(), &settings, &mut out, std::thread::sleep)
                .context("Polling failed")?;
            info!("Emitted {} rows", rows);
        }
    }

    Ok(())
}
