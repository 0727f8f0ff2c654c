//! Sweeper configuration stored in `sweeper.toml`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_CONFIG_PATH: &str = "sweeper.toml";

/// Sweeper configuration (TOML).
///
/// Missing fields default to values suitable for a CI job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SweepConfig {
    /// Upper bound on concurrent stat/delete operations.
    pub workers: usize,

    /// Command used for `locate-project` (e.g. `["cargo"]` or `["cargo", "+nightly"]`).
    pub cargo: Vec<String>,

    /// Timeout for the locate command in seconds.
    pub locate_timeout_secs: u64,

    /// Truncate captured locate output beyond this many bytes.
    pub locate_output_limit_bytes: usize,

    /// Timeout for the `sweeper run` build command in seconds.
    pub build_timeout_secs: u64,

    /// Where phase state (timestamp, failure flag) is kept between phases.
    pub state_path: PathBuf,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            workers: 16,
            cargo: vec!["cargo".to_string()],
            locate_timeout_secs: 60,
            locate_output_limit_bytes: 64_000,
            build_timeout_secs: 6 * 60 * 60,
            state_path: PathBuf::from(".sweeper/state.json"),
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(anyhow!("workers must be > 0"));
        }
        if self.cargo.is_empty() || self.cargo[0].trim().is_empty() {
            return Err(anyhow!("cargo must be a non-empty array"));
        }
        if self.locate_timeout_secs == 0 {
            return Err(anyhow!("locate_timeout_secs must be > 0"));
        }
        if self.locate_output_limit_bytes == 0 {
            return Err(anyhow!("locate_output_limit_bytes must be > 0"));
        }
        if self.build_timeout_secs == 0 {
            return Err(anyhow!("build_timeout_secs must be > 0"));
        }
        if self.state_path.as_os_str().is_empty() {
            return Err(anyhow!("state_path must not be empty"));
        }
        Ok(())
    }

    pub fn locate_timeout(&self) -> Duration {
        Duration::from_secs(self.locate_timeout_secs)
    }

    pub fn build_timeout(&self) -> Duration {
        Duration::from_secs(self.build_timeout_secs)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `SweepConfig::default()`.
pub fn load_config(path: &Path) -> Result<SweepConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config missing, using defaults");
        let cfg = SweepConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: SweepConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
