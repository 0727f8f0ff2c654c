//! Test-only helpers for building trees and injecting filesystem faults.

use std::collections::HashSet;
use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};

use crate::core::types::EntryStat;
use crate::error::{LocateFailure, SweepError};
use crate::io::fs::{Filesystem, StdFilesystem};
use crate::io::locate::RootLocator;

/// Write `contents` to `path` (creating parents) and pin its access time.
pub fn write_file_with_atime(path: &Path, contents: &[u8], accessed: SystemTime) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("write {}", path.display()))?;
    let file = File::options()
        .write(true)
        .open(path)
        .with_context(|| format!("open {}", path.display()))?;
    file.set_times(FileTimes::new().set_accessed(accessed))
        .with_context(|| format!("set atime {}", path.display()))?;
    Ok(())
}

/// Real filesystem with scripted failures for chosen paths.
#[derive(Debug, Default)]
pub struct FaultyFs {
    fail_stat: HashSet<PathBuf>,
    fail_remove: HashSet<PathBuf>,
    extra_listing: Vec<PathBuf>,
}

impl FaultyFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `stat` fail with a permission error for `path`.
    pub fn fail_stat(mut self, path: &Path) -> Self {
        self.fail_stat.insert(path.to_path_buf());
        self
    }

    /// Make `remove_file` fail with a permission error for `path`.
    pub fn fail_remove(mut self, path: &Path) -> Self {
        self.fail_remove.insert(path.to_path_buf());
        self
    }

    /// Report `path` from `list` even though it does not exist on disk.
    pub fn with_extra_listing(mut self, path: &Path) -> Self {
        self.extra_listing.push(path.to_path_buf());
        self
    }
}

fn simulated(op: &str, path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::PermissionDenied,
        format!("simulated {op} failure for {}", path.display()),
    )
}

impl Filesystem for FaultyFs {
    fn list(&self, root: &Path) -> Result<Vec<PathBuf>, SweepError> {
        let mut paths = StdFilesystem.list(root)?;
        paths.extend(self.extra_listing.iter().cloned());
        Ok(paths)
    }

    fn stat(&self, path: &Path) -> io::Result<EntryStat> {
        if self.fail_stat.contains(path) {
            return Err(simulated("stat", path));
        }
        StdFilesystem.stat(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        if self.fail_remove.contains(path) {
            return Err(simulated("remove", path));
        }
        StdFilesystem.remove_file(path)
    }
}

/// Locator that returns a fixed root or a fixed failure.
#[derive(Debug, Clone)]
pub struct FakeLocator {
    result: Result<PathBuf, LocateFailure>,
}

impl FakeLocator {
    pub fn root(root: impl Into<PathBuf>) -> Self {
        Self {
            result: Ok(root.into()),
        }
    }

    pub fn failing(failure: LocateFailure) -> Self {
        Self {
            result: Err(failure),
        }
    }
}

impl RootLocator for FakeLocator {
    fn resolve(&self, manifest_path: &Path) -> Result<PathBuf, SweepError> {
        self.result.clone().map_err(|failure| SweepError::Locate {
            manifest: manifest_path.to_path_buf(),
            failure,
        })
    }
}
