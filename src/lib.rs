//! vmstat2 library
//!
//! Turns raw kernel page counters into a human-readable virtual memory report,
//! either as a one-shot snapshot or as a polling table with page-in/page-out
//! rates.
//!
//! # Usage
//!
//! ```rust
//! use vmstat2::{render_report, HostConstants, HostSample, RawCounters, UnitMode};
//!
//! let constants = HostConstants {
//!     page_size: 4096,
//!     total_memory: 16 * 1024 * 1024 * 1024,
//! };
//! let sample = HostSample {
//!     counters: RawCounters {
//!         active: 1_000_000,
//!         inactive: 500_000,
//!         wired: 200_000,
//!         compressor: 10_000,
//!         ..Default::default()
//!     },
//!     swap_used: 0,
//! };
//!
//! let report = render_report(&constants, &sample, UnitMode::Auto, false);
//! assert!(report.contains("5.72 GB"));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod memory;
pub mod poll;
pub mod report;
pub mod table;
pub mod units;

// Re-export main types for convenience
pub use config::{resolve_config, Config, ConfigError, RunMode};
pub use error::{Result, VmStatError};
pub use host::{open_provider, HostStatsProvider, TestData, TestDataHostStats};
pub use memory::{classify, DerivedMemory, HostConstants, HostSample, RawCounters};
pub use poll::{run_polling, PollSettings, PollState};
pub use report::{render_report, snapshot};
pub use units::{format_bytes, UnitMode};
