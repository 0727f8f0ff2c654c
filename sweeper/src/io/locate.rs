//! Resolve the `target` directory of a Cargo project.
//!
//! The locate transcript is line oriented: a command echo line followed by the
//! command's stdout. Line 2 is trusted as the manifest path, and the root to
//! sweep is its parent joined with [`TARGET_DIR_NAME`]. Anything shorter is a
//! contract violation, never a guess.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use tracing::debug;

use crate::error::{LocateFailure, SweepError};
use crate::io::config::SweepConfig;
use crate::io::process::run_command_with_timeout;

pub const TARGET_DIR_NAME: &str = "target";

pub trait RootLocator {
    fn resolve(&self, manifest_path: &Path) -> Result<PathBuf, SweepError>;
}

/// Runs `cargo locate-project --workspace` for the manifest.
#[derive(Debug, Clone)]
pub struct CargoLocator {
    command: Vec<String>,
    timeout: Duration,
    output_limit_bytes: usize,
}

impl CargoLocator {
    /// `command` is the program plus any leading arguments, e.g. `["cargo"]`.
    pub fn new(command: Vec<String>, timeout: Duration, output_limit_bytes: usize) -> Self {
        Self {
            command,
            timeout,
            output_limit_bytes,
        }
    }

    pub fn from_config(cfg: &SweepConfig) -> Self {
        Self::new(
            cfg.cargo.clone(),
            cfg.locate_timeout(),
            cfg.locate_output_limit_bytes,
        )
    }

    fn locate(&self, manifest_path: &Path) -> Result<PathBuf, LocateFailure> {
        let (program, prefix) = self
            .command
            .split_first()
            .ok_or_else(|| LocateFailure::Spawn("empty cargo command".to_string()))?;
        let mut args = prefix.to_vec();
        args.extend(locate_args(manifest_path));

        let mut cmd = Command::new(program);
        cmd.args(&args);
        let output = run_command_with_timeout(cmd, self.timeout, self.output_limit_bytes)
            .map_err(|err| LocateFailure::Spawn(format!("{err:#}")))?;

        if output.timed_out {
            return Err(LocateFailure::TimedOut {
                secs: self.timeout.as_secs(),
            });
        }
        if !output.status.success() {
            return Err(LocateFailure::Status {
                code: output.status.code(),
                stderr: output.stderr_lossy().trim().to_string(),
            });
        }

        if output.stdout_truncated > 0 {
            return Err(LocateFailure::TruncatedOutput {
                bytes: output.stdout_truncated,
            });
        }

        let transcript = format!(
            "[command]{} {}\n{}",
            program,
            args.join(" "),
            output.stdout_lossy()
        );
        debug!(transcript = %transcript, "locate-project output");
        parse_locate_transcript(&transcript)
    }
}

impl RootLocator for CargoLocator {
    fn resolve(&self, manifest_path: &Path) -> Result<PathBuf, SweepError> {
        let manifest = self
            .locate(manifest_path)
            .map_err(|failure| SweepError::Locate {
                manifest: manifest_path.to_path_buf(),
                failure,
            })?;
        Ok(target_dir_for(&manifest))
    }
}

/// Arguments for a plain, colour-free, workspace-level locate.
pub fn locate_args(manifest_path: &Path) -> Vec<String> {
    vec![
        "locate-project".to_string(),
        format!("--manifest-path={}", manifest_path.display()),
        "--workspace".to_string(),
        "--message-format=plain".to_string(),
        "--color=never".to_string(),
    ]
}

/// Extract the manifest path from line 2 of a locate transcript.
pub fn parse_locate_transcript(transcript: &str) -> Result<PathBuf, LocateFailure> {
    let lines: Vec<&str> = transcript.lines().collect();
    if lines.len() < 2 {
        return Err(LocateFailure::ShortTranscript { lines: lines.len() });
    }
    let manifest = lines[1].trim();
    if manifest.is_empty() {
        return Err(LocateFailure::EmptyManifestLine);
    }
    Ok(PathBuf::from(manifest))
}

pub fn target_dir_for(manifest: &Path) -> PathBuf {
    manifest
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(TARGET_DIR_NAME)
}
