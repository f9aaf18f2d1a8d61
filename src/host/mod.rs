//! Host statistics providers.
//!
//! This module provides:
//! - `mach`: Mach host statistics and sysctl (macOS)
//! - `procfs`: /proc/vmstat and /proc/meminfo mapping (Linux)
//! - `testdata`: JSON fixture replay for reproducible runs

#[cfg(target_os = "macos")]
pub mod mach;
#[cfg(target_os = "linux")]
pub mod procfs;
pub mod testdata;

use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::memory::{HostConstants, HostSample, RawCounters};

#[cfg(target_os = "macos")]
pub use mach::MachHostStats;
#[cfg(target_os = "linux")]
pub use procfs::ProcHostStats;
pub use testdata::{load_test_data_from_file, TestData, TestDataHostStats};

/// Source of raw memory statistics.
///
/// Any error is fatal to the caller; implementations do not retry.
pub trait HostStatsProvider {
    /// Page size in bytes.
    fn page_size(&mut self) -> Result<u64>;

    /// Current page and event counters.
    fn vm_statistics(&mut self) -> Result<RawCounters>;

    /// Installed physical memory in bytes.
    fn total_physical_memory(&mut self) -> Result<u64>;

    /// Swap currently in use, in bytes.
    fn swap_used(&mut self) -> Result<u64>;

    /// Fetches the values that stay fixed for the process lifetime.
    fn constants(&mut self) -> Result<HostConstants> {
        Ok(HostConstants {
            page_size: self.page_size()?,
            total_memory: self.total_physical_memory()?,
        })
    }

    /// Takes one sample: counters first, then swap usage.
    fn sample(&mut self) -> Result<HostSample> {
        let counters = self.vm_statistics()?;
        let swap_used = self.swap_used()?;
        Ok(HostSample {
            counters,
            swap_used,
        })
    }
}

/// Returns the native provider for this platform.
#[cfg(target_os = "macos")]
pub fn default_provider() -> Result<Box<dyn HostStatsProvider>> {
    debug!("Using Mach host statistics provider");
    Ok(Box::new(MachHostStats::new()))
}

/// Returns the native provider for this platform.
#[cfg(target_os = "linux")]
pub fn default_provider() -> Result<Box<dyn HostStatsProvider>> {
    debug!("Using /proc host statistics provider");
    Ok(Box::new(ProcHostStats::new()))
}

/// Returns the native provider for this platform.
#[cfg(not(any(target_os = "macos", target_os = "linux")))]
pub fn default_provider() -> Result<Box<dyn HostStatsProvider>> {
    Err(crate::error::VmStatError::retrieval(
        "host statistics",
        "unsupported platform; use --test-data-file",
    ))
}

/// Picks the fixture provider when a test data file is given, the native one otherwise.
pub fn open_provider(test_data_file: Option<&Path>) -> Result<Box<dyn HostStatsProvider>> {
    match test_data_file {
        Some(path) => {
            let provider = TestDataHostStats::from_file(path)?;
            debug!(
                "Replaying {} samples from {}",
                provider.sample_count(),
                path.display()
            );
            Ok(Box::new(provider))
        }
        None => default_provider(),
    }
}
