//! Phase 2: sweep the `target` directory after the build.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tracing::{info, warn};

use crate::core::exemption::ExemptionPolicy;
use crate::core::humanize::summarize;
use crate::core::types::{SweepReport, Timestamp};
use crate::io::fs::Filesystem;
use crate::io::locate::RootLocator;
use crate::io::state::{FAILED_KEY, StateStore, TIMESTAMP_KEY};
use crate::sweep::sweep;

/// Inputs for one sweep phase.
#[derive(Debug, Clone)]
pub struct PostRequest {
    pub manifest_path: PathBuf,
    pub workers: usize,
}

/// How the sweep phase ended when it did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    /// An upstream step recorded a failure; nothing was touched.
    UpstreamFailed,
    Swept {
        root: PathBuf,
        report: SweepReport,
        summary: String,
    },
}

/// Run the sweep phase: check the failure flag, load T0, locate `target`,
/// sweep it, and summarize.
///
/// Locate and enumeration failures abort before any file is deleted.
pub fn run_post<S, L, F>(
    store: &S,
    locator: &L,
    fs: &F,
    request: &PostRequest,
) -> Result<PostOutcome>
where
    S: StateStore,
    L: RootLocator,
    F: Filesystem,
{
    if upstream_failed(store)? {
        warn!("Main step failed, skipping sweep.");
        return Ok(PostOutcome::UpstreamFailed);
    }

    let t0 = load_timestamp(store)?;
    info!("Using timestamp: {}.", t0.to_rfc3339());

    info!(
        "Locating `target` folder from {}.",
        request.manifest_path.display()
    );
    let root = locator
        .resolve(&request.manifest_path)
        .context("locate target directory")?;

    info!("Sweeping files from {}.", root.display());
    let report = sweep(
        fs,
        &root,
        t0,
        &ExemptionPolicy::default(),
        request.workers,
    )
    .with_context(|| format!("sweep {}", root.display()))?;

    let summary = summarize(&report);
    info!("{summary}");
    Ok(PostOutcome::Swept {
        root,
        report,
        summary,
    })
}

fn upstream_failed<S: StateStore>(store: &S) -> Result<bool> {
    let flag = store.get(FAILED_KEY).context("read failure flag")?;
    Ok(flag.as_deref().map(str::trim) == Some("true"))
}

fn load_timestamp<S: StateStore>(store: &S) -> Result<Timestamp> {
    let raw = store
        .get(TIMESTAMP_KEY)
        .context("read timestamp")?
        .ok_or_else(|| anyhow!("no timestamp recorded (run `sweeper stamp` first)"))?;
    raw.parse::<Timestamp>().context("parse stored timestamp")
}
