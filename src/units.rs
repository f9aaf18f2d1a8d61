//! Byte quantity formatting.
//!
//! Every byte value in a report goes through [`format_bytes`] with the unit
//! mode chosen on the command line, so a single report never mixes styles.

const KB: f64 = 1024.0;
const MB: f64 = 1024.0 * 1024.0;
const GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Unit suffixes indexed by the number of 1024 divisions applied.
const AUTO_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Selects how byte quantities are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitMode {
    /// Largest unit that keeps the magnitude below 1024, capped at TB
    #[default]
    Auto,
    Byte,
    Kilobyte,
    Megabyte,
    Gigabyte,
}

impl UnitMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitMode::Auto => "auto",
            UnitMode::Byte => "byte",
            UnitMode::Kilobyte => "kilobyte",
            UnitMode::Megabyte => "megabyte",
            UnitMode::Gigabyte => "gigabyte",
        }
    }
}

/// Returns the magnitude and unit index chosen by auto mode.
///
/// The index satisfies `bytes / 1024^i < 1024` unless it hit the TB ceiling.
pub fn auto_scale(bytes: u64) -> (f64, usize) {
    let mut size = bytes as f64;
    let mut i = 0;
    while size >= 1024.0 && i < AUTO_UNITS.len() - 1 {
        size /= 1024.0;
        i += 1;
    }
    (size, i)
}

/// Formats a byte count under the given unit mode.
///
/// Byte mode prints the exact integer; every other mode prints two fractional
/// digits. Output never exceeds 20 digits plus a short suffix.
pub fn format_bytes(bytes: u64, mode: UnitMode) -> String {
    match mode {
        UnitMode::Byte => format!("{} B", bytes),
        UnitMode::Kilobyte => format!("{:.2} KB", bytes as f64 / KB),
        UnitMode::Megabyte => format!("{:.2} MB", bytes as f64 / MB),
        UnitMode::Gigabyte => format!("{:.2} GB", bytes as f64 / GB),
        UnitMode::Auto => {
            let (size, i) = auto_scale(bytes);
            format!("{:.2} {}", size, AUTO_UNITS[i])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Fixed unit modes
    // -------------------------------------------------------------------------

    #[test]
    fn test_byte_mode_is_exact_integer() {
        assert_eq!(format_bytes(0, UnitMode::Byte), "0 B");
        assert_eq!(format_bytes(4096, UnitMode::Byte), "4096 B");
        assert_eq!(
            format_bytes(u64::MAX, UnitMode::Byte),
            "18446744073709551615 B"
        );
    }

    #[test]
    fn test_fixed_modes_use_two_decimals() {
        assert_eq!(format_bytes(1536, UnitMode::Kilobyte), "1.50 KB");
        assert_eq!(format_bytes(512, UnitMode::Kilobyte), "0.50 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024, UnitMode::Megabyte), "3.00 MB");
        assert_eq!(format_bytes(1024, UnitMode::Megabyte), "0.00 MB");
        assert_eq!(
            format_bytes(16 * 1024 * 1024 * 1024, UnitMode::Gigabyte),
            "16.00 GB"
        );
    }

    #[test]
    fn test_fixed_modes_scale_back_within_rounding() {
        for &bytes in &[1u64, 999, 123_456, 987_654_321, 17_179_869_184] {
            for (mode, factor) in [
                (UnitMode::Kilobyte, KB),
                (UnitMode::Megabyte, MB),
                (UnitMode::Gigabyte, GB),
            ] {
                let s = format_bytes(bytes, mode);
                let number: f64 = s.split_whitespace().next().unwrap().parse().unwrap();
                let restored = number * factor;
                assert!(
                    (restored - bytes as f64).abs() <= 0.005 * factor,
                    "{} in {:?} rendered as {}",
                    bytes,
                    mode,
                    s
                );
            }
        }
    }

    // -------------------------------------------------------------------------
    // Auto mode
    // -------------------------------------------------------------------------

    #[test]
    fn test_auto_picks_largest_unit_below_1024() {
        assert_eq!(format_bytes(0, UnitMode::Auto), "0.00 B");
        assert_eq!(format_bytes(1023, UnitMode::Auto), "1023.00 B");
        assert_eq!(format_bytes(1024, UnitMode::Auto), "1.00 KB");
        assert_eq!(format_bytes(4096, UnitMode::Auto), "4.00 KB");
        assert_eq!(format_bytes(204_800, UnitMode::Auto), "200.00 KB");
        assert_eq!(format_bytes(1024 * 1024, UnitMode::Auto), "1.00 MB");
        assert_eq!(
            format_bytes(16 * 1024 * 1024 * 1024, UnitMode::Auto),
            "16.00 GB"
        );
    }

    #[test]
    fn test_auto_caps_at_terabytes() {
        let pb = 1024u64.pow(5);
        assert_eq!(format_bytes(pb, UnitMode::Auto), "1024.00 TB");
        let (size, i) = auto_scale(u64::MAX);
        assert_eq!(i, 4);
        assert!(size > 1024.0);
    }

    #[test]
    fn test_auto_scale_bounds() {
        for &bytes in &[1u64, 1023, 1024, 1025, 1 << 20, (1 << 30) - 1, 1 << 40, 5 << 40] {
            let (_, i) = auto_scale(bytes);
            let b = bytes as f64;
            assert!(i == 4 || b / 1024f64.powi(i as i32) < 1024.0);
            if i > 0 {
                assert!(b / 1024f64.powi(i as i32 - 1) >= 1024.0);
            }
        }
    }

    #[test]
    fn test_format_is_deterministic() {
        let a = format_bytes(6_144_000_000, UnitMode::Auto);
        let b = format_bytes(6_144_000_000, UnitMode::Auto);
        assert_eq!(a, b);
        assert_eq!(a, "5.72 GB");
    }
}
