//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Sequential directory walking using walkdir, with subtree pruning
//! - Streaming MD5 content hashing with cooperative cancellation
//! - Directory skip rules and extension filtering
//! - Advisory risk classification of paths
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`filter`]: Directory skip list and extension filter
//! - [`walker`]: Directory traversal and file discovery (stage 1 input)
//! - [`hasher`]: Chunked MD5 file hashing (stage 2)
//! - [`identity`]: Physical file identity for symlink-following walks
//! - [`risk`]: Sensitive-location classification for the presentation layer
//!
//! # Example
//!
//! ```no_run
//! use disktider::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod filter;
pub mod hasher;
pub mod identity;
pub mod risk;
pub mod walker;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use filter::{ExtensionFilter, PathFilter, DEFAULT_SKIP_PATTERNS, MUSIC_EXTENSIONS};
pub use hasher::{hash_to_hex, hex_to_hash, Hash, Hasher, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};
pub use risk::{classify, RiskLevel};
pub use walker::Walker;

/// A regular file discovered by the scanner.
///
/// Identity is the path. Entries are created once per scan and never
/// modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Path to the file
    pub path: PathBuf,
    /// Bare file name (last path component)
    pub name: String,
    /// File size in bytes at discovery time
    pub size: u64,
}

impl FileEntry {
    /// Create a new FileEntry, deriving `name` from the last path component.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        let name = file_name_of(&path);
        Self { path, name, size }
    }
}

/// Last component of a path as a (lossy) string.
pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Configuration for directory walking.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Descend into subdirectories. When false only direct children are listed.
    pub recursive: bool,

    /// Follow symbolic links during traversal.
    pub follow_symlinks: bool,

    /// Only include files whose name ends with one of these extensions.
    pub extensions: Option<ExtensionFilter>,

    /// Directories pruned during recursive descent.
    pub path_filter: PathFilter,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            recursive: true,
            follow_symlinks: false,
            extensions: None,
            path_filter: PathFilter::default(),
        }
    }
}

impl WalkerConfig {
    /// Set recursive descent.
    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Set symlink following.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Restrict the scan to the given extensions.
    #[must_use]
    pub fn with_extensions(mut self, extensions: Option<ExtensionFilter>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Replace the directory skip filter.
    #[must_use]
    pub fn with_path_filter(mut self, filter: PathFilter) -> Self {
        self.path_filter = filter;
        self
    }
}

/// Errors that can occur during directory scanning.
///
/// Per-entry errors are yielded by the walker and absorbed by the finder;
/// they never abort a scan.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The path vanished between listing and stat.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Classify an I/O error for `path`.
    pub(crate) fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Whether this error should count toward the skipped-for-permissions total.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// Hashing was abandoned because cancellation was requested.
    #[error("Hashing interrupted: {0}")]
    Interrupted(PathBuf),

    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
