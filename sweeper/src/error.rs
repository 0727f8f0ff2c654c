//! Typed errors for the sweep pipeline.
//!
//! Only root-level failures are errors. Anything that goes wrong for a single
//! entry is recorded as data on its outcome and never aborts a sweep.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures that abort a sweep before (or instead of) any deletion.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("failed to locate target directory for {}", manifest.display())]
    Locate {
        manifest: PathBuf,
        #[source]
        failure: LocateFailure,
    },

    #[error("failed to enumerate {}", root.display())]
    Enumeration {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start sweep workers")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Ways the project-locate command can violate its contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocateFailure {
    #[error("could not run locate command: {0}")]
    Spawn(String),

    #[error("locate command timed out after {secs}s")]
    TimedOut { secs: u64 },

    #[error("locate command exited with {}: {stderr}", code.map_or_else(|| "signal".to_string(), |c| format!("code {c}")))]
    Status { code: Option<i32>, stderr: String },

    #[error("locate output has {lines} line(s), expected at least 2")]
    ShortTranscript { lines: usize },

    #[error("locate output has an empty manifest line")]
    EmptyManifestLine,

    #[error("locate output exceeded the capture limit ({bytes} bytes dropped)")]
    TruncatedOutput { bytes: usize },
}

/// Recoverable failure while processing one entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryFailure {
    #[error("stat failed: {0}")]
    Stat(String),

    #[error("delete failed: {0}")]
    Delete(String),
}

/// A stored timestamp that is not a non-negative integer of milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid timestamp {0:?}, expected epoch milliseconds")]
pub struct ParseTimestampError(pub String);
