//! Directory walker implementation using walkdir for sequential traversal.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory
//! and collecting file metadata for stage 1 (size bucketing). Traversal is
//! single-threaded and sorted by file name, so discovery order is stable
//! from one run to the next.
//!
//! # Features
//!
//! - Recursive or flat (direct children only) listing
//! - Subtree pruning through [`PathFilter`](super::PathFilter), recursive mode only
//! - Extension filtering and exclusion of empty files
//! - Optional symlink following, with aliases of one file reported once
//! - Cooperative cancellation via atomic flag
//!
//! # Cancellation
//!
//! The shutdown flag is polled at the start of every directory in
//! recursive mode and before every entry in flat mode. Once it is observed
//! the iterator ends; callers must check the flag themselves and discard
//! whatever was collected.
//!
//! # Example
//!
//! ```no_run
//! use disktider::scanner::{ExtensionFilter, Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig::default().with_extensions(Some(ExtensionFilter::music()));
//! let walker = Walker::new(Path::new("/home/user/Music"), config);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::{DirEntry, WalkDir};

use super::identity::SeenFiles;
use super::{FileEntry, ScanError, WalkerConfig};
use crate::logging::{default_reporter, Reporter};
use crate::progress::ProgressCallback;

/// Directory walker for file discovery.
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for cooperative cancellation
    shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback, told about every accepted file
    progress_callback: Option<Arc<dyn ProgressCallback>>,
    /// Logging collaborator
    reporter: Arc<dyn Reporter>,
}

impl std::fmt::Debug for Walker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walker")
            .field("root", &self.root)
            .field("config", &self.config)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish_non_exhaustive()
    }
}

impl Walker {
    /// Create a new walker for the given path.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            shutdown_flag: None,
            progress_callback: None,
            reporter: default_reporter(),
        }
    }

    /// Set the shutdown flag for cooperative cancellation.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Set the logging collaborator.
    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Whether a directory entry below the root must not be descended into.
    fn is_pruned(&self, entry: &DirEntry) -> bool {
        if !self.config.recursive || entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }

        let parent = entry.path().parent().unwrap_or(&self.root);
        let name = entry.file_name().to_string_lossy();
        let skip = self.config.path_filter.should_skip(parent, &name);
        if skip {
            self.reporter
                .debug(&format!("Skipping directory: {}", entry.path().display()));
        }
        skip
    }

    /// Walk the directory, yielding file entries.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration. The iterator ends early if the shutdown flag is set.
    ///
    /// When symlinks are followed, a file reachable under several paths is
    /// yielded only under the first one in traversal order.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        let recursive = self.config.recursive;
        let max_depth = if recursive { usize::MAX } else { 1 };

        let mut entries = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| !self.is_pruned(entry));

        let mut accepted = 0usize;
        let mut seen = SeenFiles::new();

        std::iter::from_fn(move || loop {
            let entry = match entries.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(self.handle_walk_error(e))),
            };

            let is_dir = entry.file_type().is_dir();
            let poll = if recursive { is_dir } else { true };
            if poll && self.is_shutdown_requested() {
                self.reporter
                    .info("Walker: cancellation requested, stopping traversal");
                return None;
            }
            if is_dir {
                continue;
            }

            if let Some(result) = self.process_entry(&entry, &mut seen) {
                if let (Ok(file), Some(callback)) = (&result, &self.progress_callback) {
                    accepted += 1;
                    callback.on_progress(accepted, file.path.to_string_lossy().as_ref());
                }
                return Some(result);
            }
        })
    }

    /// Apply the file-level filters and stat the entry.
    fn process_entry(
        &self,
        entry: &DirEntry,
        seen: &mut SeenFiles,
    ) -> Option<Result<FileEntry, ScanError>> {
        let path = entry.path();

        if entry.file_type().is_symlink() && !self.config.follow_symlinks {
            self.reporter
                .debug(&format!("Skipping symlink: {}", path.display()));
            return None;
        }

        let name = entry.file_name().to_string_lossy();
        if let Some(ref extensions) = self.config.extensions {
            if !extensions.matches(&name) {
                return None;
            }
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => return Some(Err(self.handle_walk_error(e))),
        };

        if !metadata.is_file() {
            return None;
        }

        let size = metadata.len();
        if size == 0 {
            self.reporter
                .debug(&format!("Skipping empty file: {}", path.display()));
            return None;
        }

        if self.config.follow_symlinks && !seen.first_sighting(path, &metadata) {
            self.reporter
                .debug(&format!("Skipping alias of an earlier file: {}", path.display()));
            return None;
        }

        Some(Ok(FileEntry {
            path: path.to_path_buf(),
            name: name.into_owned(),
            size,
        }))
    }

    /// Convert and report a walkdir error.
    fn handle_walk_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);
        let message = error.to_string();

        let scan_error = match error.into_io_error() {
            Some(io) => ScanError::from_io(&path, io),
            None => ScanError::Io {
                path,
                source: std::io::Error::other(message),
            },
        };

        match scan_error {
            ScanError::PermissionDenied(ref p) => {
                self.reporter
                    .warning(&format!("Permission denied: {}", p.display()));
            }
            ScanError::NotFound(ref p) => {
                self.reporter.debug(&format!(
                    "File not found (may have been deleted): {}",
                    p.display()
                ));
            }
            ScanError::Io { .. } => self.reporter.error(&scan_error.to_string()),
        }

        scan_error
    }
}
