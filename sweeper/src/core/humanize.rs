//! Human-readable rendering of reclaimed space.

use crate::core::types::SweepReport;

const THRESHOLD: f64 = 1024.0;

/// Units above bytes. A `target` directory should never reach a TiB.
const UNITS: [&str; 3] = ["KiB", "MiB", "GiB"];

/// Render `bytes` with binary units and one decimal place.
///
/// Below 1 KiB the value is printed as whole bytes. Otherwise the value is
/// divided by 1024 until its one-decimal rounding drops below 1024 or GiB is
/// reached, so 1048575 bytes reads `1.0 MiB` rather than `1024.0 KiB`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    value /= THRESHOLD;
    while round_tenths(value) >= THRESHOLD && unit < UNITS.len() - 1 {
        value /= THRESHOLD;
        unit += 1;
    }

    format!("{:.1} {}", round_tenths(value), UNITS[unit])
}

/// One summary line for a finished sweep.
pub fn summarize(report: &SweepReport) -> String {
    format!(
        "{} of unused build artifacts have been cleaned.",
        format_bytes(report.bytes_freed())
    )
}

/// Round half away from zero to one decimal place.
fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{EntryOutcome, Outcome};
    use std::path::PathBuf;

    #[test]
    fn small_values_render_as_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(100), "100 B");
        assert_eq!(format_bytes(1023), "1023 B");
    }

    #[test]
    fn kibibytes() {
        assert_eq!(format_bytes(1024), "1.0 KiB");
        assert_eq!(format_bytes(1536), "1.5 KiB");
        assert_eq!(format_bytes(2048), "2.0 KiB");
    }

    #[test]
    fn ties_round_up() {
        // 1280 / 1024 = 1.25 exactly.
        assert_eq!(format_bytes(1280), "1.3 KiB");
    }

    #[test]
    fn mebibytes_and_gibibytes() {
        assert_eq!(format_bytes(1_048_576), "1.0 MiB");
        assert_eq!(format_bytes(5 * 1024 * 1024 + 512 * 1024), "5.5 MiB");
        assert_eq!(format_bytes(1024 * 1024 * 1024), "1.0 GiB");
    }

    #[test]
    fn promotes_when_rounding_reaches_next_unit() {
        assert_eq!(format_bytes(1_048_575), "1.0 MiB");
        assert_eq!(format_bytes(1_048_524), "1023.9 KiB");
    }

    #[test]
    fn largest_unit_caps_growth() {
        assert_eq!(format_bytes(2048 * 1024 * 1024 * 1024), "2048.0 GiB");
    }

    #[test]
    fn summary_reports_freed_bytes() {
        let report = SweepReport::new(vec![
            EntryOutcome {
                path: PathBuf::from("a"),
                outcome: Outcome::Deleted { bytes_freed: 1024 },
            },
            EntryOutcome {
                path: PathBuf::from("b"),
                outcome: Outcome::Deleted { bytes_freed: 1024 },
            },
        ]);
        assert_eq!(
            summarize(&report),
            "2.0 KiB of unused build artifacts have been cleaned."
        );
    }
}
