//! Key-value state carried from the stamp phase to the sweep phase.
//!
//! The writer sets keys at the end of phase 1; the reader gets them at the start
//! of phase 2. Values live for exactly one pipeline run. A missing
//! [`FAILED_KEY`] means "proceed".

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

/// Reference timestamp in epoch milliseconds.
pub const TIMESTAMP_KEY: &str = "timestamp";
/// `"true"` when an upstream step failed and the sweep must not run.
pub const FAILED_KEY: &str = "failed";

pub trait StateStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// State persisted as a flat JSON object of strings.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("read state {}", self.path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("parse state {}", self.path.display()))
    }
}

impl StateStore for FileStateStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self.load()?.remove(key);
        debug!(path = %self.path.display(), key, found = value.is_some(), "read state");
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());
        debug!(path = %self.path.display(), key, value, "writing state");
        let mut buf = serde_json::to_string_pretty(&values)?;
        buf.push('\n');
        write_atomic(&self.path, &buf)
    }
}

/// In-process state, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    values: BTreeMap<String, String>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp state {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace state {}", path.display()))?;
    Ok(())
}
