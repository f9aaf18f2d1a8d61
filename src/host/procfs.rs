//! Linux statistics from /proc/vmstat and /proc/meminfo.
//!
//! Linux has no speculative, throttled or purgeable page lists and does not
//! count copy-on-write or zero-fill faults, so those report as zero. The
//! remaining counters map as follows:
//!
//! | Counter        | Source                                    |
//! |----------------|-------------------------------------------|
//! | free           | `nr_free_pages`                           |
//! | active         | `nr_active_anon + nr_active_file`         |
//! | inactive       | `nr_inactive_anon + nr_inactive_file`     |
//! | wired          | `nr_unevictable`                          |
//! | external       | `nr_active_file + nr_inactive_file`       |
//! | internal       | `nr_active_anon + nr_inactive_anon`       |
//! | compressor     | meminfo `Zswap` / page size               |
//! | uncompressed   | meminfo `Zswapped` / page size            |
//! | faults         | `pgfault`                                 |
//! | reactivations  | `pgactivate`                              |
//! | (de)compress   | `zswpin` / `zswpout`                      |
//! | pageins/outs   | `pgpgin` / `pgpgout` (KiB) / page size    |
//! | swapins/outs   | `pswpin` / `pswpout`                      |

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use super::HostStatsProvider;
use crate::error::{Result, VmStatError};
use crate::memory::RawCounters;

/// Parses `/proc/vmstat` content into a name -> value map.
///
/// Format: one "name value" pair per line. Malformed lines are skipped.
pub fn parse_vmstat(content: &str) -> HashMap<String, u64> {
    let mut values = HashMap::new();
    for line in content.lines() {
        let mut parts = line.split_whitespace();
        if let (Some(name), Some(value)) = (parts.next(), parts.next()) {
            if let Ok(v) = value.parse::<u64>() {
                values.insert(name.to_string(), v);
            }
        }
    }
    values
}

/// Parses `/proc/meminfo` content into a name -> bytes map.
///
/// Format: "MemTotal:       16323984 kB". Values without a unit are kept as is.
pub fn parse_meminfo(content: &str) -> HashMap<String, u64> {
    let mut values = HashMap::new();
    for line in content.lines() {
        let Some((name, rest)) = line.split_once(':') else {
            continue;
        };
        let mut parts = rest.split_whitespace();
        let Some(Ok(v)) = parts.next().map(|v| v.parse::<u64>()) else {
            continue;
        };
        let bytes = match parts.next() {
            Some("kB") => v.saturating_mul(1024),
            _ => v,
        };
        values.insert(name.trim().to_string(), bytes);
    }
    values
}

/// Maps parsed vmstat and meminfo values onto the counter layout.
pub fn counters_from_proc(
    vmstat: &HashMap<String, u64>,
    meminfo: &HashMap<String, u64>,
    page_size: u64,
) -> Result<RawCounters> {
    let get = |name: &str| vmstat.get(name).copied().unwrap_or(0);
    let page_size = page_size.max(1);
    let kib_to_pages = |kib: u64| kib.saturating_mul(1024) / page_size;

    let free = vmstat.get("nr_free_pages").copied().ok_or_else(|| {
        VmStatError::retrieval("VM statistics", "nr_free_pages missing from /proc/vmstat")
    })?;

    let sum = |a: &str, b: &str| get(a).saturating_add(get(b));
    let file = sum("nr_active_file", "nr_inactive_file");
    let anon = sum("nr_active_anon", "nr_inactive_anon");

    Ok(RawCounters {
        free,
        active: sum("nr_active_anon", "nr_active_file"),
        inactive: sum("nr_inactive_anon", "nr_inactive_file"),
        wired: get("nr_unevictable"),
        external: file,
        internal: anon,
        compressor: meminfo.get("Zswap").copied().unwrap_or(0) / page_size,
        uncompressed_in_compressor: meminfo.get("Zswapped").copied().unwrap_or(0) / page_size,
        faults: get("pgfault"),
        reactivations: get("pgactivate"),
        decompressions: get("zswpin"),
        compressions: get("zswpout"),
        pageins: kib_to_pages(get("pgpgin")),
        pageouts: kib_to_pages(get("pgpgout")),
        swapins: get("pswpin"),
        swapouts: get("pswpout"),
        ..Default::default()
    })
}

/// Provider reading from a procfs mount.
#[derive(Debug, Clone)]
pub struct ProcHostStats {
    root: PathBuf,
    page_size: Option<u64>,
}

impl Default for ProcHostStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcHostStats {
    pub fn new() -> Self {
        Self::with_root("/proc")
    }

    /// Reads from an alternative procfs root.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            page_size: None,
        }
    }

    fn read(&self, name: &'static str, file: &str) -> Result<String> {
        let path = self.root.join(file);
        fs::read_to_string(&path)
            .map_err(|e| VmStatError::retrieval(name, format!("{}: {}", path.display(), e)))
    }

    fn meminfo(&self, name: &'static str) -> Result<HashMap<String, u64>> {
        Ok(parse_meminfo(&self.read(name, "meminfo")?))
    }
}

impl HostStatsProvider for ProcHostStats {
    fn page_size(&mut self) -> Result<u64> {
        if let Some(size) = self.page_size {
            return Ok(size);
        }
        // SAFETY: sysconf is safe to call with _SC_PAGESIZE
        // Returns -1 on error, handled by the > 0 check
        let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        if size <= 0 {
            return Err(VmStatError::retrieval(
                "page size",
                format!("sysconf(_SC_PAGESIZE) returned {}", size),
            ));
        }
        self.page_size = Some(size as u64);
        Ok(size as u64)
    }

    fn vm_statistics(&mut self) -> Result<RawCounters> {
        let page_size = self.page_size()?;
        let vmstat = parse_vmstat(&self.read("VM statistics", "vmstat")?);
        let meminfo = self.meminfo("VM statistics")?;
        counters_from_proc(&vmstat, &meminfo, page_size)
    }

    fn total_physical_memory(&mut self) -> Result<u64> {
        self.meminfo("total memory")?
            .get("MemTotal")
            .copied()
            .ok_or_else(|| VmStatError::retrieval("total memory", "MemTotal missing from meminfo"))
    }

    fn swap_used(&mut self) -> Result<u64> {
        let meminfo = self.meminfo("swap usage")?;
        match (meminfo.get("SwapTotal"), meminfo.get("SwapFree")) {
            (Some(total), Some(free)) => Ok(total.saturating_sub(*free)),
            _ => Err(VmStatError::retrieval(
                "swap usage",
                "SwapTotal/SwapFree missing from meminfo",
            )),
        }
    }
}
