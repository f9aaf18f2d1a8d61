//! Text table rendering for the summary, verbose and polling outputs.
//!
//! Each table computes its own column widths from the rows it renders. All
//! two-column lines go through [`render_row`].

use crate::memory::{DerivedMemory, HostConstants, RawCounters};
use crate::units::{format_bytes, UnitMode};

/// Gap between the label column and the value column.
const COLUMN_GAP: usize = 2;

/// Width of every column in the polling table.
pub const POLL_COLUMN_WIDTH: usize = 10;

/// Column names of the polling table, in output order.
pub const POLL_HEADERS: [&str; 8] = [
    "free",
    "app",
    "wired",
    "compressed",
    "cache",
    "swap",
    "pagein/s",
    "pageout/s",
];

/// Placeholder for rate columns when no previous sample exists.
pub const NO_RATE: &str = "-";

/// One label/value line of a report, with an optional percentage annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub label: &'static str,
    pub value: String,
    pub percent: Option<f64>,
}

impl ReportRow {
    pub fn new(label: &'static str, value: String) -> Self {
        Self {
            label,
            value,
            percent: None,
        }
    }

    pub fn with_percent(label: &'static str, value: String, percent: f64) -> Self {
        Self {
            label,
            value,
            percent: Some(percent),
        }
    }
}

/// Renders `label`, then spaces, then `value` so the line is `width` columns.
///
/// At least one space separates the two even when they overflow `width`.
pub fn render_row(label: &str, value: &str, width: usize) -> String {
    let spaces = width.saturating_sub(label.len() + value.len()).max(1);
    let mut line = String::with_capacity(label.len() + spaces + value.len());
    line.push_str(label);
    line.extend(std::iter::repeat(' ').take(spaces));
    line.push_str(value);
    line
}

/// Share of total memory, in percent. Zero total renders as 0.0.
pub fn percent_of(bytes: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    bytes as f64 * 100.0 / total as f64
}

/// Builds the seven summary rows.
pub fn summary_rows(
    derived: &DerivedMemory,
    constants: &HostConstants,
    swap_used: u64,
    mode: UnitMode,
) -> Vec<ReportRow> {
    let total = constants.total_memory;
    let app = constants.bytes(derived.app_pages);
    let wired = constants.bytes(derived.wired_pages);
    let compressed = constants.bytes(derived.compressed_pages);
    let used = app.saturating_add(wired).saturating_add(compressed);
    let cached = constants.bytes(derived.cached_pages);

    let row = |label, bytes| {
        ReportRow::with_percent(label, format_bytes(bytes, mode), percent_of(bytes, total))
    };

    vec![
        ReportRow::new("Total Memory:", format_bytes(total, mode)),
        row("Used Memory:", used),
        row("  App Memory:", app),
        row("  Wired Memory:", wired),
        row("  Compressed:", compressed),
        row("Cached Files:", cached),
        ReportRow::new("Swap Used:", format_bytes(swap_used, mode)),
    ]
}

/// Renders the summary table so every value string ends in the same column.
pub fn render_summary(rows: &[ReportRow]) -> String {
    let label_width = rows.iter().map(|r| r.label.len()).max().unwrap_or(0);
    let value_width = rows.iter().map(|r| r.value.len()).max().unwrap_or(0);
    let width = label_width + COLUMN_GAP + value_width;

    let mut out = String::new();
    for row in rows {
        let value = format!("{:>width$}", row.value, width = value_width);
        out.push_str(&render_row(row.label, &value, width));
        if let Some(percent) = row.percent {
            out.push_str(&format!("  ({:>4.1}%)", percent));
        }
        out.push('\n');
    }
    out
}

/// Builds the 22 verbose rows in their fixed order.
///
/// Translation faults, copy-on-write and zero-fill are event counts and are
/// printed unscaled. Everything else is a page count rendered as bytes.
pub fn verbose_rows(
    counters: &RawCounters,
    constants: &HostConstants,
    mode: UnitMode,
) -> Vec<ReportRow> {
    let pages =
        |label, count| ReportRow::new(label, format_bytes(constants.bytes(count), mode));
    let events = |label, count: u64| ReportRow::new(label, count.to_string());

    vec![
        pages("Pages free:", counters.free_excluding_speculative()),
        pages("Pages active:", counters.active),
        pages("Pages inactive:", counters.inactive),
        pages("Pages speculative:", counters.speculative),
        pages("Pages throttled:", counters.throttled),
        pages("Pages wired down:", counters.wired),
        pages("Pages purgeable:", counters.purgeable),
        events("\"Translation faults\":", counters.faults),
        events("Pages copy-on-write:", counters.cow_faults),
        events("Pages zero filled:", counters.zero_fill),
        pages("Pages reactivated:", counters.reactivations),
        pages("Pages purged:", counters.purges),
        pages("File-backed pages:", counters.external),
        pages("Anonymous pages:", counters.internal),
        pages("Pages stored in compressor:", counters.uncompressed_in_compressor),
        pages("Pages occupied by compressor:", counters.compressor),
        pages("Decompressions:", counters.decompressions),
        pages("Compressions:", counters.compressions),
        pages("Pageins:", counters.pageins),
        pages("Pageouts:", counters.pageouts),
        pages("Swapins:", counters.swapins),
        pages("Swapouts:", counters.swapouts),
    ]
}

/// Renders the verbose table. Width is the widest label plus the widest value
/// plus the gap; every line is exactly that wide.
pub fn render_verbose(rows: &[ReportRow]) -> String {
    let label_width = rows.iter().map(|r| r.label.len()).max().unwrap_or(0);
    let value_width = rows.iter().map(|r| r.value.len()).max().unwrap_or(0);
    let width = label_width + value_width + COLUMN_GAP;

    let mut out = String::new();
    for row in rows {
        out.push_str(&render_row(row.label, &row.value, width));
        out.push('\n');
    }
    out
}

/// Renders one polling line: fixed-width, right-justified, space-separated.
pub fn render_poll_line<S: AsRef<str>>(cells: &[S]) -> String {
    cells
        .iter()
        .map(|c| format!("{:>width$}", c.as_ref(), width = POLL_COLUMN_WIDTH))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders the polling header line.
pub fn render_poll_header() -> String {
    render_poll_line(&POLL_HEADERS)
}
