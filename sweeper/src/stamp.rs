//! Phase 1: record the reference timestamp before the build runs.

use std::time::SystemTime;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::core::types::Timestamp;
use crate::io::state::{FAILED_KEY, StateStore, TIMESTAMP_KEY};

/// The current instant. Files accessed from here on count as used by the build.
pub fn stamp() -> Timestamp {
    Timestamp::from_system_time(SystemTime::now())
}

/// Capture a timestamp and persist it for the sweep phase, clearing any
/// failure left over from an earlier run.
pub fn record_stamp<S: StateStore>(store: &mut S) -> Result<Timestamp> {
    let timestamp = stamp();
    info!("Creating timestamp {}.", timestamp.to_rfc3339());
    store
        .set(TIMESTAMP_KEY, &timestamp.to_string())
        .context("save timestamp")?;
    store.set(FAILED_KEY, "false").context("save failure flag")?;
    Ok(timestamp)
}

/// Record that an upstream step failed so the sweep phase stands down.
pub fn mark_failed<S: StateStore>(store: &mut S) -> Result<()> {
    warn!("recording upstream failure, the sweep will be skipped");
    store.set(FAILED_KEY, "true").context("save failure flag")
}
