//! Shared deterministic types for the sweep core.
//!
//! These types carry no I/O. Filesystem adapters produce [`EntryStat`] values
//! and the sweep turns each one into exactly one [`EntryOutcome`].

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{EntryFailure, ParseTimestampError};

/// Instant in epoch milliseconds.
///
/// Captured once before the build and compared against file access times after
/// it. Its string form (plain integer) is what crosses the phase boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Truncate a system time to millisecond precision. Instants before the
    /// epoch clamp to zero.
    pub fn from_system_time(time: SystemTime) -> Self {
        let millis = time
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0);
        Self(millis)
    }

    /// RFC 3339 rendering for log lines.
    pub fn to_rfc3339(self) -> String {
        i64::try_from(self.0)
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
            .unwrap_or_else(|| format!("{}ms", self.0))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Timestamp {
    type Err = ParseTimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ParseTimestampError(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// Metadata observed for one entry at stat time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryStat {
    pub kind: EntryKind,
    pub size: u64,
    pub accessed: Timestamp,
}

/// Result of processing a single enumerated entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// File removed; `bytes_freed` is its size at stat time.
    Deleted { bytes_freed: u64 },
    SkippedDirectory,
    SkippedExempt,
    /// Accessed at or after the reference timestamp.
    SkippedFresh,
    SkippedError { cause: EntryFailure },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryOutcome {
    pub path: PathBuf,
    pub outcome: Outcome,
}

/// Per-category tallies of a finished sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub deleted: usize,
    pub directories: usize,
    pub exempt: usize,
    pub fresh: usize,
    pub errors: usize,
}

/// Every outcome of one sweep. Only built after all entries are processed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub entries: Vec<EntryOutcome>,
}

impl SweepReport {
    pub fn new(entries: Vec<EntryOutcome>) -> Self {
        Self { entries }
    }

    /// Sum of stat-time sizes of the files that were actually removed.
    pub fn bytes_freed(&self) -> u64 {
        self.entries
            .iter()
            .map(|entry| match entry.outcome {
                Outcome::Deleted { bytes_freed } => bytes_freed,
                _ => 0,
            })
            .sum()
    }

    pub fn counts(&self) -> OutcomeCounts {
        let mut counts = OutcomeCounts::default();
        for entry in &self.entries {
            match entry.outcome {
                Outcome::Deleted { .. } => counts.deleted += 1,
                Outcome::SkippedDirectory => counts.directories += 1,
                Outcome::SkippedExempt => counts.exempt += 1,
                Outcome::SkippedFresh => counts.fresh += 1,
                Outcome::SkippedError { .. } => counts.errors += 1,
            }
        }
        counts
    }

    /// Look up the outcome recorded for `path`, if it was enumerated.
    pub fn outcome_for(&self, path: &std::path::Path) -> Option<&Outcome> {
        self.entries
            .iter()
            .find(|entry| entry.path == path)
            .map(|entry| &entry.outcome)
    }
}
