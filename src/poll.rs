//! Polling mode: one compact row per interval with page-in/page-out rates.
//!
//! The engine is strictly sequential. Only the immediately preceding sample
//! is kept, and it is replaced on every iteration.

use std::io::Write;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::Result;
use crate::host::HostStatsProvider;
use crate::memory::{classify, rate_per_sec, HostConstants, HostSample, RawCounters};
use crate::table::{render_poll_header, render_poll_line, NO_RATE};
use crate::units::{format_bytes, UnitMode};

/// Resolved polling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Seconds between samples, at least 1
    pub interval_secs: u64,
    /// Number of rows to emit; `None` polls until interrupted
    pub count: Option<u64>,
    pub unit_mode: UnitMode,
}

/// Previous sample plus iteration counter, owned by the polling loop.
#[derive(Debug, Clone, Default)]
pub struct PollState {
    previous: Option<RawCounters>,
    iteration: u64,
}

impl PollState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows rendered so far.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Renders the row for `sample`, then makes it the previous sample.
    pub fn advance(
        &mut self,
        sample: &HostSample,
        constants: &HostConstants,
        settings: &PollSettings,
    ) -> String {
        let previous = if self.iteration == 0 {
            None
        } else {
            self.previous.as_ref()
        };
        let cells = poll_cells(sample, previous, constants, settings);
        self.previous = Some(sample.counters);
        self.iteration += 1;
        render_poll_line(cells.as_slice())
    }
}

/// Builds the eight cells of one polling row.
///
/// Without a previous sample both rate cells hold the `-` placeholder.
pub fn poll_cells(
    sample: &HostSample,
    previous: Option<&RawCounters>,
    constants: &HostConstants,
    settings: &PollSettings,
) -> Vec<String> {
    let mode = settings.unit_mode;
    let counters = &sample.counters;
    let derived = classify(counters);
    let bytes = |pages| format_bytes(constants.bytes(pages), mode);

    let (pagein_rate, pageout_rate) = match previous {
        None => (NO_RATE.to_string(), NO_RATE.to_string()),
        Some(prev) => {
            if counters.pageins < prev.pageins || counters.pageouts < prev.pageouts {
                warn!("Page-in/page-out counters went backwards; reporting zero rate");
            }
            let pagein = rate_per_sec(
                counters.pageins,
                prev.pageins,
                constants.page_size,
                settings.interval_secs,
            );
            let pageout = rate_per_sec(
                counters.pageouts,
                prev.pageouts,
                constants.page_size,
                settings.interval_secs,
            );
            (format_bytes(pagein, mode), format_bytes(pageout, mode))
        }
    };

    vec![
        bytes(counters.free_excluding_speculative()),
        bytes(derived.app_pages),
        bytes(derived.wired_pages),
        bytes(derived.compressed_pages),
        bytes(derived.cached_pages),
        format_bytes(sample.swap_used, mode),
        pagein_rate,
        pageout_rate,
    ]
}

/// Runs the polling loop and returns the number of data rows written.
///
/// The header is written once. `sleep` is called between rows but not after
/// the last row of a bounded run. Any provider or write error ends the loop.
pub fn run_polling<P, W, S>(
    provider: &mut P,
    settings: &PollSettings,
    out: &mut W,
    mut sleep: S,
) -> Result<u64>
where
    P: HostStatsProvider + ?Sized,
    W: Write,
    S: FnMut(Duration),
{
    let constants = provider.constants()?;
    let interval = Duration::from_secs(settings.interval_secs);
    debug!(
        "Polling every {}s, count={:?}, page_size={}",
        settings.interval_secs, settings.count, constants.page_size
    );

    writeln!(out, "{}", render_poll_header())?;

    let mut state = PollState::new();
    loop {
        let sample = provider.sample()?;
        let row = state.advance(&sample, &constants, settings);
        writeln!(out, "{}", row)?;
        out.flush()?;

        if settings.count.is_some_and(|count| state.iteration() >= count) {
            break;
        }
        sleep(interval);
    }

    debug!("Polling finished after {} rows", state.iteration());
    Ok(state.iteration())
}
