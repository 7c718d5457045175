//! Physical file identity, used to drop aliases when following symlinks.
//!
//! With symlink following on, one file can be reached under several paths
//! (a linked directory, or a link to the file itself). Those paths are the
//! same data, never duplicates of each other, and deleting "the copy" would
//! remove the only one. [`SeenFiles`] remembers every file it has been shown
//! and reports repeat sightings.
//!
//! # Platform Support
//!
//! - **Unix**: (device id, inode) from the followed metadata
//! - **Other**: the canonicalized path

use std::collections::HashSet;
use std::fs::Metadata;
use std::path::{Path, PathBuf};

/// Remembers the physical files seen during one walk.
///
/// Not thread-safe; the walker owns one per traversal.
#[derive(Debug, Default)]
pub struct SeenFiles {
    seen: HashSet<FileKey>,
}

impl SeenFiles {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a file and report whether this is its first sighting.
    ///
    /// `metadata` must be the followed (not `symlink_metadata`) metadata of
    /// `path`. When no identity can be derived the file counts as new.
    pub fn first_sighting(&mut self, path: &Path, metadata: &Metadata) -> bool {
        match FileKey::new(path, metadata) {
            Some(key) => self.seen.insert(key),
            None => true,
        }
    }

    /// Number of distinct files recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum FileKey {
    #[cfg_attr(not(unix), allow(dead_code))]
    Inode { dev: u64, ino: u64 },
    #[cfg_attr(unix, allow(dead_code))]
    Canonical(PathBuf),
}

impl FileKey {
    #[cfg(unix)]
    fn new(_path: &Path, metadata: &Metadata) -> Option<Self> {
        use std::os::unix::fs::MetadataExt;
        Some(Self::Inode {
            dev: metadata.dev(),
            ino: metadata.ino(),
        })
    }

    #[cfg(not(unix))]
    fn new(path: &Path, _metadata: &Metadata) -> Option<Self> {
        std::fs::canonicalize(path).ok().map(Self::Canonical)
    }
}
