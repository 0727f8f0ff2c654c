//! Both phases around a build command: stamp, build, then sweep.

use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{info, warn};

use crate::io::fs::Filesystem;
use crate::io::locate::RootLocator;
use crate::io::process::run_inherited_with_timeout;
use crate::io::state::StateStore;
use crate::post::{PostOutcome, PostRequest, run_post};
use crate::stamp::{mark_failed, record_stamp};

/// Result of the guarded build command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStatus {
    Succeeded,
    Failed { code: Option<i32> },
    TimedOut,
}

pub trait BuildRunner {
    fn run(&self, command: &[String]) -> Result<BuildStatus>;
}

/// Runs the build as a child process sharing our stdout/stderr.
#[derive(Debug, Clone)]
pub struct CommandBuildRunner {
    pub timeout: Duration,
}

impl BuildRunner for CommandBuildRunner {
    fn run(&self, command: &[String]) -> Result<BuildStatus> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| anyhow!("build command must not be empty"))?;
        let mut cmd = Command::new(program);
        cmd.args(args);

        let outcome = run_inherited_with_timeout(cmd, self.timeout)
            .with_context(|| format!("run build command {program}"))?;
        if outcome.timed_out {
            return Ok(BuildStatus::TimedOut);
        }
        if outcome.status.success() {
            Ok(BuildStatus::Succeeded)
        } else {
            Ok(BuildStatus::Failed {
                code: outcome.status.code(),
            })
        }
    }
}

/// How a guarded run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardedOutcome {
    /// The build did not succeed; the failure flag is set and nothing was swept.
    BuildFailed(BuildStatus),
    Post(PostOutcome),
}

/// Stamp, run `command`, and sweep only if the build succeeded.
pub fn run_guarded<S, B, L, F>(
    store: &mut S,
    builder: &B,
    command: &[String],
    locator: &L,
    fs: &F,
    request: &PostRequest,
) -> Result<GuardedOutcome>
where
    S: StateStore,
    B: BuildRunner,
    L: RootLocator,
    F: Filesystem,
{
    record_stamp(store)?;

    info!(command = ?command, "running build");
    let status = match builder.run(command) {
        Ok(status) => status,
        Err(err) => {
            mark_failed(store)?;
            return Err(err);
        }
    };

    if status != BuildStatus::Succeeded {
        warn!(status = ?status, "build did not succeed");
        mark_failed(store)?;
        return Ok(GuardedOutcome::BuildFailed(status));
    }

    run_post(store, locator, fs, request).map(GuardedOutcome::Post)
}
