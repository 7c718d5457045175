//! File deletion: system trash, permanent removal and dry runs.
//!
//! # Overview
//!
//! [`delete_batch`] removes a list of [`DeletionRequest`]s one by one. A
//! failure on one file is recorded as a message naming the path and the
//! batch carries on; the caller gets a [`DeletionOutcome`] summarizing what
//! happened.
//!
//! # Trash availability
//!
//! Whether the platform has a usable trash is resolved once, as a
//! [`TrashCapability`], and handed in through [`DeleteConfig`]. When trash is
//! requested but unavailable the [`TrashFallback`] setting decides: refuse
//! (each file becomes a per-file error) or delete permanently with a warning.
//! Nothing falls back silently.
//!
//! # Example
//!
//! ```no_run
//! use disktider::actions::delete::{delete_batch, DeleteConfig, DeletionRequest};
//! use std::path::PathBuf;
//!
//! let requests = vec![DeletionRequest::new(PathBuf::from("/music/song (1).mp3"), 4_200_000)];
//! let outcome = delete_batch(&requests, &DeleteConfig::trash().with_dry_run(true), None);
//! println!("{}", outcome.summary());
//! ```

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytesize::ByteSize;
use serde::Serialize;
use thiserror::Error;

use crate::duplicates::{split_keep, DuplicateGroup};
use crate::logging::{default_reporter, Reporter};
use crate::scanner::{file_name_of, FileEntry};

/// Error type for a single deletion.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Trash was requested, is unavailable, and the fallback is to refuse.
    #[error("trash is not available on this system, refusing to delete {0}")]
    TrashUnavailable(PathBuf),

    /// Trash operation failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed {
        /// File that could not be trashed
        path: PathBuf,
        /// Message from the platform trash implementation
        message: String,
    },

    /// Attempted to delete all copies (at least one must be preserved).
    #[error("cannot delete all copies - at least one file must be preserved")]
    AllCopiesWouldBeDeleted,

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// File that could not be removed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Get the path associated with this error (if any).
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::TrashUnavailable(p)
            | Self::TrashFailed { path: p, .. }
            | Self::Io { path: p, .. } => Some(p),
            Self::AllCopiesWouldBeDeleted => None,
        }
    }

    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// A file the caller wants removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionRequest {
    /// Path to remove
    pub path: PathBuf,
    /// Bare file name, for messages
    pub name: String,
    /// Size recorded at scan time; counted as freed on success
    pub size: u64,
}

impl DeletionRequest {
    /// Create a request, deriving the name from the path.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        let name = file_name_of(&path);
        Self { path, name, size }
    }
}

impl From<&FileEntry> for DeletionRequest {
    fn from(entry: &FileEntry) -> Self {
        Self {
            path: entry.path.clone(),
            name: entry.name.clone(),
            size: entry.size,
        }
    }
}

/// Result of a batch deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeletionOutcome {
    /// Files removed (or that would be removed, in a dry run)
    pub deleted_count: usize,
    /// Sum of the recorded sizes of those files
    pub freed_bytes: u64,
    /// One message per failed file, naming the path
    pub errors: Vec<String>,
}

impl DeletionOutcome {
    /// Check if all deletions succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.errors.is_empty()
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.all_succeeded() {
            format!(
                "Deleted {} file(s), freed {}",
                self.deleted_count,
                ByteSize(self.freed_bytes)
            )
        } else {
            format!(
                "Deleted {} file(s), {} failed, freed {}",
                self.deleted_count,
                self.errors.len(),
                ByteSize(self.freed_bytes)
            )
        }
    }
}

/// How files are removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMode {
    /// Move to the system trash (recoverable)
    #[default]
    Trash,
    /// Remove from the filesystem
    Permanent,
}

/// Whether the platform offers a system trash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrashCapability {
    /// Trash operations are supported
    Available,
    /// No trash on this platform
    Unavailable,
}

impl TrashCapability {
    /// Resolve the capability for the current platform.
    #[must_use]
    pub fn detect() -> Self {
        if cfg!(any(
            target_os = "windows",
            target_os = "macos",
            target_os = "linux",
            target_os = "freebsd",
            target_os = "openbsd",
            target_os = "netbsd",
            target_os = "dragonfly"
        )) {
            Self::Available
        } else {
            Self::Unavailable
        }
    }
}

/// What to do when trash is requested but unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrashFallback {
    /// Record a per-file error and leave the file alone
    #[default]
    Refuse,
    /// Delete permanently, logging a warning per file
    Permanent,
}

/// Configuration for deletion operations.
#[derive(Clone)]
pub struct DeleteConfig {
    /// Trash or permanent removal.
    pub mode: DeleteMode,
    /// Report what would happen without touching the filesystem.
    pub dry_run: bool,
    /// Trash availability, resolved once by the caller.
    pub trash: TrashCapability,
    /// Policy when trash is requested but unavailable.
    pub fallback: TrashFallback,
    /// Logging collaborator.
    pub reporter: Arc<dyn Reporter>,
}

impl std::fmt::Debug for DeleteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeleteConfig")
            .field("mode", &self.mode)
            .field("dry_run", &self.dry_run)
            .field("trash", &self.trash)
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

impl Default for DeleteConfig {
    fn default() -> Self {
        Self {
            mode: DeleteMode::Trash,
            dry_run: false,
            trash: TrashCapability::detect(),
            fallback: TrashFallback::Refuse,
            reporter: default_reporter(),
        }
    }
}

impl DeleteConfig {
    /// Create config for trash deletion.
    #[must_use]
    pub fn trash() -> Self {
        Self::default()
    }

    /// Create config for permanent deletion.
    #[must_use]
    pub fn permanent() -> Self {
        Self {
            mode: DeleteMode::Permanent,
            ..Self::default()
        }
    }

    /// Enable/disable dry run.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Override the detected trash capability.
    #[must_use]
    pub fn with_trash_capability(mut self, capability: TrashCapability) -> Self {
        self.trash = capability;
        self
    }

    /// Set the policy for unavailable trash.
    #[must_use]
    pub fn with_fallback(mut self, fallback: TrashFallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Set the logging collaborator.
    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }
}

/// Callback trait for deletion progress reporting.
pub trait DeleteProgressCallback: Send + Sync {
    /// Called before each file deletion; `index` is 0-based.
    fn on_before_delete(&self, path: &Path, index: usize, total: usize);

    /// Called after successful deletion.
    fn on_delete_success(&self, path: &Path, size: u64);

    /// Called after failed deletion.
    fn on_delete_failure(&self, path: &Path, error: &str);

    /// Called when batch operation completes.
    fn on_complete(&self, outcome: &DeletionOutcome);
}

/// Move a single file to the system trash.
///
/// # Errors
///
/// - `NotFound` / `PermissionDenied` if the file cannot be inspected
/// - `TrashFailed` if the platform trash rejects it
pub fn delete_to_trash(path: &Path) -> Result<(), DeleteError> {
    fs::symlink_metadata(path).map_err(|e| DeleteError::from_io(path, e))?;

    trash::delete(path).map_err(|e| DeleteError::TrashFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Permanently delete a single file.
///
/// **WARNING**: This operation cannot be undone.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if deletion is not allowed
/// - `Io` for anything else
pub fn permanent_delete(path: &Path) -> Result<(), DeleteError> {
    fs::remove_file(platform_path(path)).map_err(|e| DeleteError::from_io(path, e))
}

/// Convert an absolute Windows path to its extended-length form.
///
/// `C:\a\b` becomes `\\?\C:\a\b` and `\\server\share\x` becomes
/// `\\?\UNC\server\share\x`. The prefix disables Win32 path parsing, so
/// `.` and `..` segments are resolved here first and `/` is turned into `\`;
/// `..` never climbs above the drive or share. Relative and already-prefixed
/// paths are returned unchanged.
#[must_use]
pub fn to_long_path(path: &str) -> String {
    if path.starts_with(r"\\?\") {
        return path.to_string();
    }
    if let Some(unc) = path.strip_prefix(r"\\") {
        let mut parts = unc.splitn(3, ['\\', '/']);
        let server = parts.next().unwrap_or_default();
        let share = parts.next().unwrap_or_default();
        let tail = collapse_segments(parts.next().unwrap_or_default());

        let mut long = format!(r"\\?\UNC\{server}\{share}");
        if !tail.is_empty() {
            long.push('\\');
            long.push_str(&tail);
        }
        return long;
    }

    let bytes = path.as_bytes();
    let is_drive_absolute = bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'\\' || bytes[2] == b'/');
    if is_drive_absolute {
        format!(r"\\?\{}\{}", &path[..2], collapse_segments(&path[3..]))
    } else {
        path.to_string()
    }
}

/// Join the segments of `rest` with `\`, dropping empty and `.` segments
/// and letting `..` remove its predecessor.
fn collapse_segments(rest: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    for segment in rest.split(['\\', '/']) {
        match segment {
            "" | "." => {}
            ".." => {
                kept.pop();
            }
            other => kept.push(other),
        }
    }
    kept.join("\\")
}

/// Absolute, extended-length form used for removal on Windows.
#[cfg(windows)]
fn platform_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    PathBuf::from(to_long_path(&absolute.to_string_lossy()))
}

#[cfg(not(windows))]
fn platform_path(path: &Path) -> PathBuf {
    path.to_path_buf()
}

/// Remove one file according to the configured mode and fallback.
fn delete_one(request: &DeletionRequest, config: &DeleteConfig) -> Result<(), DeleteError> {
    match (config.mode, config.trash, config.fallback) {
        (DeleteMode::Permanent, _, _) => permanent_delete(&request.path),
        (DeleteMode::Trash, TrashCapability::Available, _) => delete_to_trash(&request.path),
        (DeleteMode::Trash, TrashCapability::Unavailable, TrashFallback::Refuse) => {
            Err(DeleteError::TrashUnavailable(request.path.clone()))
        }
        (DeleteMode::Trash, TrashCapability::Unavailable, TrashFallback::Permanent) => {
            config.reporter.warning(&format!(
                "Trash unavailable, deleting permanently: {}",
                request.path.display()
            ));
            permanent_delete(&request.path)
        }
    }
}

/// Delete multiple files in batch.
///
/// Every request is attempted; failures are collected, never raised. In a
/// dry run nothing is touched and every request counts as deleted.
///
/// # Example
///
/// ```no_run
/// use disktider::actions::delete::{delete_batch, DeleteConfig, DeletionRequest};
/// use std::path::PathBuf;
///
/// let requests = vec![
///     DeletionRequest::new(PathBuf::from("/dup1.txt"), 10),
///     DeletionRequest::new(PathBuf::from("/dup2.txt"), 10),
/// ];
///
/// let outcome = delete_batch(&requests, &DeleteConfig::permanent(), None);
/// println!("{}", outcome.summary());
/// ```
pub fn delete_batch(
    requests: &[DeletionRequest],
    config: &DeleteConfig,
    callback: Option<&dyn DeleteProgressCallback>,
) -> DeletionOutcome {
    let mut outcome = DeletionOutcome::default();
    let total = requests.len();
    let reporter = &config.reporter;

    reporter.info(&format!(
        "Deleting {} file(s) ({:?}{})",
        total,
        config.mode,
        if config.dry_run { ", dry run" } else { "" }
    ));

    for (index, request) in requests.iter().enumerate() {
        if let Some(cb) = callback {
            cb.on_before_delete(&request.path, index, total);
        }

        let result = if config.dry_run {
            reporter.info(&format!(
                "Dry run: would delete {} ({} bytes)",
                request.path.display(),
                request.size
            ));
            Ok(())
        } else {
            delete_one(request, config)
        };

        match result {
            Ok(()) => {
                outcome.deleted_count += 1;
                outcome.freed_bytes += request.size;
                if !config.dry_run {
                    reporter.info(&format!("Deleted: {}", request.path.display()));
                }
                if let Some(cb) = callback {
                    cb.on_delete_success(&request.path, request.size);
                }
            }
            Err(e) => {
                let message = e.to_string();
                reporter.error(&format!("Failed to delete {}: {}", request.name, message));
                if let Some(cb) = callback {
                    cb.on_delete_failure(&request.path, &message);
                }
                outcome.errors.push(message);
            }
        }
    }

    if let Some(cb) = callback {
        cb.on_complete(&outcome);
    }

    reporter.info(&outcome.summary());

    outcome
}

/// Validate that a selection doesn't delete all copies.
///
/// # Errors
///
/// Returns `AllCopiesWouldBeDeleted` if every member of the group is selected.
///
/// # Example
///
/// ```
/// use disktider::actions::delete::validate_preserves_copy;
/// use std::path::PathBuf;
///
/// let group = vec![
///     PathBuf::from("/original.txt"),
///     PathBuf::from("/copy1.txt"),
///     PathBuf::from("/copy2.txt"),
/// ];
///
/// let selected = vec![PathBuf::from("/copy1.txt"), PathBuf::from("/copy2.txt")];
/// assert!(validate_preserves_copy(&selected, &group).is_ok());
///
/// assert!(validate_preserves_copy(&group, &group).is_err());
/// ```
pub fn validate_preserves_copy(
    selected_paths: &[PathBuf],
    group_paths: &[PathBuf],
) -> Result<(), DeleteError> {
    let selected_set: HashSet<&PathBuf> = selected_paths.iter().collect();
    let preserved = group_paths.iter().any(|p| !selected_set.contains(p));

    if preserved {
        Ok(())
    } else {
        Err(DeleteError::AllCopiesWouldBeDeleted)
    }
}

/// Default selection over a scan result: everything but the best-ranked
/// member of each group.
#[must_use]
pub fn default_selection(groups: &[DuplicateGroup]) -> Vec<DeletionRequest> {
    groups
        .iter()
        .filter_map(split_keep)
        .flat_map(|(_, delete)| delete.into_iter().map(DeletionRequest::from))
        .collect()
}
