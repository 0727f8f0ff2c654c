//! Filesystem adapter: recursive listing, metadata, and removal.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::core::types::{EntryKind, EntryStat, Timestamp};
use crate::error::SweepError;

/// Filesystem operations the sweep needs.
///
/// Implementations are shared across sweep workers, hence `Sync`.
pub trait Filesystem: Sync {
    /// Every path below `root` (files and directories, `root` excluded).
    ///
    /// Failing to read `root` itself is fatal. Unreadable subtrees are logged
    /// and left out.
    fn list(&self, root: &Path) -> Result<Vec<PathBuf>, SweepError>;

    fn stat(&self, path: &Path) -> io::Result<EntryStat>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;
}

/// `std::fs` + `walkdir` implementation. Symlinks are never followed; a link is
/// stat'ed and removed as a file in its own right.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFilesystem;

impl Filesystem for StdFilesystem {
    fn list(&self, root: &Path) -> Result<Vec<PathBuf>, SweepError> {
        fs::read_dir(root).map_err(|source| SweepError::Enumeration {
            root: root.to_path_buf(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
            match entry {
                Ok(entry) => paths.push(entry.into_path()),
                Err(err) if err.depth() == 0 => {
                    return Err(SweepError::Enumeration {
                        root: root.to_path_buf(),
                        source: err.into(),
                    });
                }
                Err(err) => {
                    warn!(err = %err, "skipping unreadable part of tree");
                }
            }
        }
        debug!(root = %root.display(), entries = paths.len(), "enumerated tree");
        Ok(paths)
    }

    fn stat(&self, path: &Path) -> io::Result<EntryStat> {
        let metadata = fs::symlink_metadata(path)?;
        let kind = if metadata.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        Ok(EntryStat {
            kind,
            size: metadata.len(),
            accessed: Timestamp::from_system_time(metadata.accessed()?),
        })
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}
