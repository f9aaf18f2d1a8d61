//! One-shot snapshot report.

use std::io::Write;

use tracing::{debug, warn};

use crate::error::Result;
use crate::host::HostStatsProvider;
use crate::memory::{app_underflows, classify, HostConstants, HostSample};
use crate::table::{render_summary, render_verbose, summary_rows, verbose_rows};
use crate::units::{format_bytes, UnitMode};

/// Renders the full snapshot report for one sample.
///
/// Header line, summary table and, when `verbose` is set, a separator and the
/// verbose counter table.
pub fn render_report(
    constants: &HostConstants,
    sample: &HostSample,
    mode: UnitMode,
    verbose: bool,
) -> String {
    let derived = classify(&sample.counters);
    debug!(
        "Classified sample: app={} wired={} compressed={} cached={} swap_delta={}",
        derived.app_pages,
        derived.wired_pages,
        derived.compressed_pages,
        derived.cached_pages,
        derived.swap_delta
    );

    let used_bytes = constants.bytes(derived.used_pages());
    if used_bytes > constants.total_memory {
        warn!(
            "Used memory ({} bytes) exceeds total memory ({} bytes); counters are inconsistent",
            used_bytes, constants.total_memory
        );
    }
    if app_underflows(&sample.counters) {
        warn!("Purgeable + file-backed pages exceed resident pages; app memory clamped to zero");
    }

    let mut out = format!(
        "Mach Virtual Memory Statistics: (page size of {})\n",
        format_bytes(constants.page_size, mode)
    );

    let summary = render_summary(&summary_rows(&derived, constants, sample.swap_used, mode));
    out.push_str(&summary);

    if verbose {
        let width = summary.lines().map(str::len).max().unwrap_or(0);
        out.push_str(&"-".repeat(width));
        out.push('\n');
        out.push_str(&render_verbose(&verbose_rows(&sample.counters, constants, mode)));
    }

    out
}

/// Takes one sample from `provider` and writes the snapshot report to `out`.
pub fn snapshot<P, W>(provider: &mut P, mode: UnitMode, verbose: bool, out: &mut W) -> Result<()>
where
    P: HostStatsProvider + ?Sized,
    W: Write,
{
    let constants = provider.constants()?;
    let sample = provider.sample()?;
    debug!(
        "Sampled page_size={} total_memory={} swap_used={}",
        constants.page_size, constants.total_memory, sample.swap_used
    );

    out.write_all(render_report(&constants, &sample, mode, verbose).as_bytes())?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::RawCounters;

    const GIB: u64 = 1024 * 1024 * 1024;

    fn scenario() -> (HostConstants, HostSample) {
        let constants = HostConstants {
            page_size: 4096,
            total_memory: 16 * GIB,
        };
        let sample = HostSample {
            counters: RawCounters {
                active: 1_000_000,
                inactive: 500_000,
                wired: 200_000,
                compressor: 10_000,
                ..Default::default()
            },
            swap_used: 0,
        };
        (constants, sample)
    }

    #[test]
    fn test_report_app_memory_in_auto_mode() {
        let (constants, sample) = scenario();
        let report = render_report(&constants, &sample, UnitMode::Auto, false);
        let app_line = report
            .lines()
            .find(|l| l.starts_with("  App Memory:"))
            .unwrap();
        // 1.5e6 pages * 4096 bytes = 6_144_000_000 bytes
        assert!(app_line.contains("5.72 GB"), "{}", app_line);
    }

    #[test]
    fn test_report_header_states_page_size() {
        let (constants, sample) = scenario();
        let report = render_report(&constants, &sample, UnitMode::Byte, false);
        assert_eq!(
            report.lines().next().unwrap(),
            "Mach Virtual Memory Statistics: (page size of 4096 B)"
        );
        let auto = render_report(&constants, &sample, UnitMode::Auto, false);
        assert!(auto.starts_with("Mach Virtual Memory Statistics: (page size of 4.00 KB)\n"));
    }

    #[test]
    fn test_verbose_table_only_when_requested() {
        let (constants, sample) = scenario();
        let plain = render_report(&constants, &sample, UnitMode::Auto, false);
        let verbose = render_report(&constants, &sample, UnitMode::Auto, true);

        assert_eq!(plain.lines().count(), 1 + 7);
        assert_eq!(verbose.lines().count(), 1 + 7 + 1 + 22);
        assert!(!plain.contains("Pages free:"));
        assert!(verbose.contains("Pages free:"));
        assert!(verbose.lines().nth(8).unwrap().chars().all(|c| c == '-'));
    }

    #[test]
    fn test_inconsistent_counters_still_render() {
        let (mut constants, sample) = scenario();
        constants.total_memory = GIB;
        let report = render_report(&constants, &sample, UnitMode::Auto, false);
        let used_line = report
            .lines()
            .find(|l| l.starts_with("Used Memory:"))
            .unwrap();
        assert!(used_line.contains("%)"));
        assert!(used_line.contains("6.52 GB"), "{}", used_line);
    }
}
