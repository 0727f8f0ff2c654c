//! Deterministic classification of a stat'ed entry.

use std::ffi::OsStr;

use crate::core::exemption::ExemptionPolicy;
use crate::core::types::{EntryKind, EntryStat, Timestamp};

/// What the sweep should do with one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    SkipDirectory,
    SkipExempt,
    SkipFresh,
    Delete,
}

/// Classify an entry against the reference timestamp `t0`.
///
/// - Directories are always skipped, even when empty and stale.
/// - Exempt basenames are skipped regardless of age.
/// - Otherwise the entry is deleted only if `accessed < t0`.
pub fn classify(
    stat: &EntryStat,
    basename: Option<&OsStr>,
    t0: Timestamp,
    policy: &ExemptionPolicy,
) -> Decision {
    if stat.kind == EntryKind::Directory {
        return Decision::SkipDirectory;
    }
    if basename.is_some_and(|name| policy.is_exempt(name)) {
        return Decision::SkipExempt;
    }
    if stat.accessed >= t0 {
        Decision::SkipFresh
    } else {
        Decision::Delete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: Timestamp = Timestamp::from_millis(10_000);

    fn file(size: u64, accessed: u64) -> EntryStat {
        EntryStat {
            kind: EntryKind::File,
            size,
            accessed: Timestamp::from_millis(accessed),
        }
    }

    fn classify_named(stat: &EntryStat, name: &str) -> Decision {
        classify(stat, Some(OsStr::new(name)), T0, &ExemptionPolicy::default())
    }

    #[test]
    fn stale_file_is_deleted() {
        assert_eq!(classify_named(&file(100, 9_999), "a"), Decision::Delete);
    }

    #[test]
    fn file_accessed_at_threshold_is_fresh() {
        assert_eq!(classify_named(&file(100, 10_000), "a"), Decision::SkipFresh);
        assert_eq!(classify_named(&file(100, 20_000), "a"), Decision::SkipFresh);
    }

    #[test]
    fn zero_byte_file_follows_age_rule() {
        assert_eq!(classify_named(&file(0, 1), "empty"), Decision::Delete);
        assert_eq!(classify_named(&file(0, 10_001), "empty"), Decision::SkipFresh);
    }

    #[test]
    fn stale_directory_is_skipped() {
        let dir = EntryStat {
            kind: EntryKind::Directory,
            size: 4096,
            accessed: Timestamp::from_millis(0),
        };
        assert_eq!(classify_named(&dir, "deps"), Decision::SkipDirectory);
    }

    #[test]
    fn directory_check_precedes_exemption() {
        let dir = EntryStat {
            kind: EntryKind::Directory,
            size: 0,
            accessed: Timestamp::from_millis(0),
        };
        assert_eq!(classify_named(&dir, "CACHEDIR.TAG"), Decision::SkipDirectory);
    }

    #[test]
    fn exempt_file_is_skipped_even_when_stale() {
        assert_eq!(
            classify_named(&file(177, 0), "CACHEDIR.TAG"),
            Decision::SkipExempt
        );
        assert_eq!(
            classify_named(&file(3_000, 0), ".rustc_info.json"),
            Decision::SkipExempt
        );
    }

    #[test]
    fn missing_basename_is_not_exempt() {
        let decision = classify(&file(1, 0), None, T0, &ExemptionPolicy::default());
        assert_eq!(decision, Decision::Delete);
    }
}
