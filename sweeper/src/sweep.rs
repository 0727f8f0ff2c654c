//! Concurrent sweep of a build-output tree.
//!
//! Enumeration is a single sequential pass. Every enumerated path then becomes
//! an independent stat → classify → delete unit on a bounded worker pool, and
//! the report is assembled only after all units have finished.
//!
//! Units touch disjoint paths, so no locking is needed between them. A file
//! changed by someone else between stat and delete is an accepted race: at
//! worst it shows up as a failed entry or a slightly wrong byte tally.

use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::core::classifier::{Decision, classify};
use crate::core::exemption::ExemptionPolicy;
use crate::core::types::{EntryOutcome, EntryStat, Outcome, SweepReport, Timestamp};
use crate::error::{EntryFailure, SweepError};
use crate::io::fs::Filesystem;

/// Sweep `root`, deleting every non-exempt file last accessed before `t0`.
///
/// At most `workers` entries are processed at once. Only a failure to
/// enumerate `root` (or to start the pool) is an error; per-entry failures are
/// recorded as [`Outcome::SkippedError`].
pub fn sweep<F: Filesystem>(
    fs: &F,
    root: &Path,
    t0: Timestamp,
    policy: &ExemptionPolicy,
    workers: usize,
) -> Result<SweepReport, SweepError> {
    let paths = fs.list(root)?;
    debug!(root = %root.display(), entries = paths.len(), workers, "sweeping");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .thread_name(|index| format!("sweep-{index}"))
        .build()?;

    let entries: Vec<EntryOutcome> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| process_entry(fs, path, t0, policy))
            .collect()
    });

    let report = SweepReport::new(entries);
    let counts = report.counts();
    debug!(
        deleted = counts.deleted,
        fresh = counts.fresh,
        exempt = counts.exempt,
        directories = counts.directories,
        errors = counts.errors,
        bytes_freed = report.bytes_freed(),
        "sweep finished"
    );
    Ok(report)
}

fn process_entry<F: Filesystem>(
    fs: &F,
    path: &Path,
    t0: Timestamp,
    policy: &ExemptionPolicy,
) -> EntryOutcome {
    let outcome = match fs.stat(path) {
        Ok(stat) => match classify(&stat, path.file_name(), t0, policy) {
            Decision::SkipDirectory => {
                debug!(path = %path.display(), "skipped directory");
                Outcome::SkippedDirectory
            }
            Decision::SkipExempt => {
                debug!(path = %path.display(), "skipped exempt file");
                Outcome::SkippedExempt
            }
            Decision::SkipFresh => {
                debug!(path = %path.display(), "skipped, accessed after timestamp");
                Outcome::SkippedFresh
            }
            Decision::Delete => delete_stale(fs, path, &stat),
        },
        // Some platforms fail metadata reads spuriously; never abort the sweep.
        Err(err) => {
            warn!(path = %path.display(), err = %err, "skipped, stat failed");
            Outcome::SkippedError {
                cause: EntryFailure::Stat(err.to_string()),
            }
        }
    };
    EntryOutcome {
        path: path.to_path_buf(),
        outcome,
    }
}

fn delete_stale<F: Filesystem>(fs: &F, path: &Path, stat: &EntryStat) -> Outcome {
    info!("Deleting {}.", path.display());
    debug!(
        path = %path.display(),
        atime = %stat.accessed.to_rfc3339(),
        size = stat.size,
        "stale file"
    );
    match fs.remove_file(path) {
        Ok(()) => Outcome::Deleted {
            bytes_freed: stat.size,
        },
        Err(err) => {
            warn!(path = %path.display(), err = %err, "failed to delete, leaving for a later sweep");
            Outcome::SkippedError {
                cause: EntryFailure::Delete(err.to_string()),
            }
        }
    }
}
