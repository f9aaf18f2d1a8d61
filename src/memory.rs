//! Memory accounting model.
//!
//! Raw page counters are captured once per sample and never mutated. One-shot
//! mode reads them as instantaneous values through [`classify`]; polling mode
//! diffs consecutive samples through [`rate_per_sec`].

use serde::{Deserialize, Serialize};

/// Page counters and cumulative event counters captured at one instant.
///
/// All values are page counts except the event counters (faults, cow_faults,
/// zero_fill, reactivations, purges, decompressions, compressions, pageins,
/// pageouts, swapins, swapouts), which count events since boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCounters {
    pub free: u64,
    pub active: u64,
    pub inactive: u64,
    pub speculative: u64,
    pub throttled: u64,
    pub wired: u64,
    pub purgeable: u64,
    /// File-backed pages
    pub external: u64,
    /// Anonymous pages
    pub internal: u64,
    pub compressor: u64,
    /// Uncompressed size of the compressor contents, in pages
    pub uncompressed_in_compressor: u64,
    pub faults: u64,
    pub cow_faults: u64,
    pub zero_fill: u64,
    pub reactivations: u64,
    pub purges: u64,
    pub decompressions: u64,
    pub compressions: u64,
    pub pageins: u64,
    pub pageouts: u64,
    pub swapins: u64,
    pub swapouts: u64,
}

impl RawCounters {
    /// Free pages, excluding speculative pages which are reported separately.
    pub fn free_excluding_speculative(&self) -> u64 {
        self.free.saturating_sub(self.speculative)
    }
}

/// One sample: the page counters plus the independently sampled swap usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostSample {
    pub counters: RawCounters,
    /// Swap in use, in bytes
    pub swap_used: u64,
}

/// Host-wide values that stay constant for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConstants {
    pub page_size: u64,
    pub total_memory: u64,
}

impl HostConstants {
    /// Scales a page count to bytes.
    pub fn bytes(&self, pages: u64) -> u64 {
        pages.saturating_mul(self.page_size)
    }
}

/// Higher-level categories derived from one [`RawCounters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DerivedMemory {
    pub app_pages: u64,
    pub wired_pages: u64,
    pub compressed_pages: u64,
    /// Reclaimable cache. Overlaps with pages excluded from `app_pages`.
    pub cached_pages: u64,
    /// Lifetime swapouts minus swapins. Negative is a valid state.
    pub swap_delta: i64,
}

impl DerivedMemory {
    /// App + wired + compressed. Never includes `cached_pages`.
    pub fn used_pages(&self) -> u64 {
        self.app_pages
            .saturating_add(self.wired_pages)
            .saturating_add(self.compressed_pages)
    }
}

/// Maps one counter snapshot to the derived report categories.
///
/// Purgeable and file-backed pages are subtracted out of app memory and
/// reported as cache instead. If they exceed the active/inactive pool the app
/// figure clamps at zero rather than wrapping.
pub fn classify(counters: &RawCounters) -> DerivedMemory {
    let resident = counters
        .active
        .saturating_add(counters.inactive)
        .saturating_add(counters.speculative)
        .saturating_add(counters.throttled);

    DerivedMemory {
        app_pages: resident
            .saturating_sub(counters.purgeable)
            .saturating_sub(counters.external),
        wired_pages: counters.wired,
        compressed_pages: counters.compressor,
        cached_pages: counters.external.saturating_add(counters.purgeable),
        swap_delta: (counters.swapouts as i64).wrapping_sub(counters.swapins as i64),
    }
}

/// True when the reclaimable pages exceed the resident pool, i.e. the app
/// figure from [`classify`] was clamped.
pub fn app_underflows(counters: &RawCounters) -> bool {
    let resident = counters.active as u128
        + counters.inactive as u128
        + counters.speculative as u128
        + counters.throttled as u128;
    (counters.purgeable as u128 + counters.external as u128) > resident
}

/// Converts the change of a cumulative page counter into bytes per second.
///
/// A counter that went backwards (reset or wrap) yields zero. Integer division.
pub fn rate_per_sec(current: u64, previous: u64, page_size: u64, interval_secs: u64) -> u64 {
    current
        .saturating_sub(previous)
        .saturating_mul(page_size)
        / interval_secs.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_counters() -> RawCounters {
        RawCounters {
            active: 1_000_000,
            inactive: 500_000,
            wired: 200_000,
            compressor: 10_000,
            ..Default::default()
        }
    }

    #[test]
    fn test_classify_basic() {
        let derived = classify(&sample_counters());
        assert_eq!(derived.app_pages, 1_500_000);
        assert_eq!(derived.wired_pages, 200_000);
        assert_eq!(derived.compressed_pages, 10_000);
        assert_eq!(derived.cached_pages, 0);
        assert_eq!(derived.swap_delta, 0);
        assert_eq!(derived.used_pages(), 1_710_000);
    }

    #[test]
    fn test_classify_subtracts_reclaimable_from_app() {
        let counters = RawCounters {
            active: 800,
            inactive: 300,
            speculative: 50,
            throttled: 10,
            purgeable: 40,
            external: 200,
            ..Default::default()
        };
        let derived = classify(&counters);
        assert_eq!(derived.app_pages, 800 + 300 + 50 + 10 - 40 - 200);
        assert_eq!(derived.cached_pages, 240);
    }

    #[test]
    fn test_purgeable_shift_is_conserved() {
        let base = RawCounters {
            active: 10_000,
            inactive: 4_000,
            purgeable: 100,
            external: 2_000,
            ..Default::default()
        };
        let shifted = RawCounters {
            purgeable: 350,
            ..base
        };

        let a = classify(&base);
        let b = classify(&shifted);
        assert_eq!(a.app_pages - b.app_pages, 250);
        assert_eq!(b.cached_pages - a.cached_pages, 250);
        assert_eq!(a.wired_pages, b.wired_pages);
        assert_eq!(a.compressed_pages, b.compressed_pages);
    }

    #[test]
    fn test_negative_swap_delta_is_valid() {
        let counters = RawCounters {
            swapins: 900,
            swapouts: 400,
            ..Default::default()
        };
        assert_eq!(classify(&counters).swap_delta, -500);
    }

    #[test]
    fn test_app_clamps_when_reclaimable_exceeds_resident() {
        let counters = RawCounters {
            active: 10,
            external: 25,
            ..Default::default()
        };
        assert!(app_underflows(&counters));
        assert_eq!(classify(&counters).app_pages, 0);
        assert!(!app_underflows(&sample_counters()));
    }

    #[test]
    fn test_free_excludes_speculative() {
        let counters = RawCounters {
            free: 5_000,
            speculative: 1_200,
            ..Default::default()
        };
        assert_eq!(counters.free_excluding_speculative(), 3_800);
    }

    #[test]
    fn test_rate_per_sec() {
        assert_eq!(rate_per_sec(1_100, 1_000, 4096, 2), 204_800);
        // Integer division truncates
        assert_eq!(rate_per_sec(1, 0, 4096, 3), 1365);
        // Counter reset yields zero instead of a negative rate
        assert_eq!(rate_per_sec(10, 1_000, 4096, 1), 0);
    }

    #[test]
    fn test_host_constants_bytes() {
        let constants = HostConstants {
            page_size: 16_384,
            total_memory: 0,
        };
        assert_eq!(constants.bytes(3), 49_152);
        assert_eq!(constants.bytes(u64::MAX), u64::MAX);
    }
}
