//! Duplicate finder implementation with two-stage detection.
//!
//! # Overview
//!
//! This module orchestrates the duplicate detection pipeline:
//! 1. **Stage 1 - Size grouping**: Walk the tree and bucket files by size
//!    (see [`crate::duplicates::groups`])
//! 2. **Stage 2 - Hash confirmation**: Hash every member of every surviving
//!    bucket, sequentially, and keep digests shared by two or more files
//!
//! # Cancellation
//!
//! The shutdown flag is polled by the walker (per directory, or per entry in
//! flat mode), after stage 1, before every file in stage 2 and by the hasher
//! before every chunk. Whenever it is observed the finder discards all work
//! and returns an empty result with [`ScanSummary::interrupted`] set.
//! Cancellation is never an error and never yields a partial result.
//!
//! # Errors
//!
//! Only problems with the scan root are hard errors. Per-file failures in
//! either stage are reported through the injected [`Reporter`], counted in
//! the [`ScanSummary`] and skipped.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use bytesize::ByteSize;

use super::{group_by_hash, group_by_size, DuplicateGroup};
use crate::logging::{default_reporter, Reporter};
use crate::progress::ProgressCallback;
use crate::scanner::{
    FileEntry, Hash, HashError, Hasher, Walker, WalkerConfig, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE,
};

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Optional shutdown flag for cooperative cancellation.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
    /// Logging collaborator.
    pub reporter: Arc<dyn Reporter>,
    /// Read size per chunk when hashing.
    pub chunk_size: usize,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("walker_config", &self.walker_config)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .field("chunk_size", &self.chunk_size)
            .finish_non_exhaustive()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            walker_config: WalkerConfig::default(),
            shutdown_flag: None,
            progress_callback: None,
            reporter: default_reporter(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl FinderConfig {
    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
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

    /// Set the hashing chunk size, clamped to `1..=MAX_CHUNK_SIZE`.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.clamp(1, MAX_CHUNK_SIZE);
        self
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Number of non-empty regular files that passed the filters
    pub total_files: usize,
    /// Total size of those files in bytes
    pub total_size: u64,
    /// Files in size buckets of two or more (stage 2 input)
    pub candidate_files: usize,
    /// Files successfully hashed in stage 2
    pub hashed_files: usize,
    /// Files dropped because hashing failed
    pub failed_hashes: usize,
    /// Entries skipped because access was denied, in either stage
    pub permission_errors: usize,
    /// Entries skipped for any other I/O reason, in either stage
    pub other_errors: usize,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding one original per group)
    pub duplicate_files: usize,
    /// Total space that can be reclaimed by removing duplicates
    pub reclaimable_space: u64,
    /// Duration of the entire scan
    pub scan_duration: std::time::Duration,
    /// Whether the scan was cancelled (the result is then empty)
    pub interrupted: bool,
}

impl ScanSummary {
    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize(self.reclaimable_space).to_string()
    }

    /// Format total size as human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        ByteSize(self.total_size).to_string()
    }

    /// Whether any entry was skipped because of an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.permission_errors > 0 || self.other_errors > 0
    }
}

/// Errors that can occur during duplicate finding.
///
/// Cancellation is not an error; see [`ScanSummary::interrupted`].
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The scan root exists but cannot be listed.
    #[error("Cannot read directory {path}: {source}")]
    RootUnreadable {
        /// The scan root
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Duplicate finder that orchestrates the two-stage detection pipeline.
///
/// # Example
///
/// ```no_run
/// use disktider::duplicates::{DuplicateFinder, FinderConfig};
/// use std::path::Path;
///
/// let finder = DuplicateFinder::new(FinderConfig::default());
/// let (groups, summary) = finder.find_duplicates(Path::new("/some/path")).unwrap();
///
/// println!("Found {} duplicate groups", groups.len());
/// println!("Reclaimable space: {}", summary.reclaimable_display());
/// ```
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let mut hasher = Hasher::new().with_chunk_size(config.chunk_size);
        if let Some(ref flag) = config.shutdown_flag {
            hasher = hasher.with_shutdown_flag(Arc::clone(flag));
        }
        Self { config, hasher }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Find all duplicate files under `path`.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if the path does not exist, is not a directory
    /// or cannot be listed. Everything below the root is best-effort.
    pub fn find_duplicates(
        &self,
        path: &Path,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let start_time = Instant::now();
        let mut summary = ScanSummary::default();
        let reporter = &self.config.reporter;

        if !path.exists() {
            return Err(FinderError::PathNotFound(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(FinderError::NotADirectory(path.to_path_buf()));
        }
        std::fs::read_dir(path).map_err(|source| FinderError::RootUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

        reporter.info(&format!("Starting duplicate scan of {}", path.display()));

        if self.config.is_shutdown_requested() {
            return Ok(self.cancelled(summary, start_time));
        }

        // Stage 1: walk
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("walking", 0);
            callback.on_message(&format!("Walking {}", path.display()));
        }

        let mut walker = Walker::new(path, self.config.walker_config.clone())
            .with_reporter(Arc::clone(reporter));
        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(Arc::clone(flag));
        }
        if let Some(ref callback) = self.config.progress_callback {
            walker = walker.with_progress_callback(Arc::clone(callback));
        }

        let mut files = Vec::new();
        for result in walker.walk() {
            match result {
                Ok(file) => files.push(file),
                Err(e) if e.is_permission_denied() => summary.permission_errors += 1,
                Err(_) => summary.other_errors += 1,
            }
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("walking");
        }

        if self.config.is_shutdown_requested() {
            return Ok(self.cancelled(summary, start_time));
        }

        Ok(self.confirm(files, summary, start_time))
    }

    /// Find duplicates from a pre-collected list of files.
    ///
    /// Runs size grouping and hash confirmation without walking. The result
    /// is the same as a scan that discovered exactly these files in this
    /// order. This never fails; the `Result` mirrors [`Self::find_duplicates`].
    ///
    /// # Errors
    ///
    /// Currently none.
    pub fn find_duplicates_from_files(
        &self,
        files: Vec<FileEntry>,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let start_time = Instant::now();
        let summary = ScanSummary::default();

        if self.config.is_shutdown_requested() {
            return Ok(self.cancelled(summary, start_time));
        }

        Ok(self.confirm(files, summary, start_time))
    }

    /// Stage 1 grouping and stage 2 hashing over a discovered file list.
    fn confirm(
        &self,
        files: Vec<FileEntry>,
        mut summary: ScanSummary,
        start_time: Instant,
    ) -> (Vec<DuplicateGroup>, ScanSummary) {
        let reporter = &self.config.reporter;

        summary.total_files = files.iter().filter(|f| f.size > 0).count();
        summary.total_size = files.iter().map(|f| f.size).sum();

        // Discovery position of every file, and of every size bucket.
        let discovery: HashMap<PathBuf, usize> = files
            .iter()
            .enumerate()
            .map(|(i, f)| (f.path.clone(), i))
            .collect();
        let mut seen_sizes = HashSet::new();
        let bucket_order: Vec<u64> = files
            .iter()
            .filter(|f| seen_sizes.insert(f.size))
            .map(|f| f.size)
            .collect();

        let (mut size_groups, size_stats) = group_by_size(files);
        summary.candidate_files = size_stats.potential_duplicates;

        reporter.info(&format!(
            "Stage 1 complete: {} files ({}) -> {} candidates in {} size groups",
            summary.total_files,
            summary.total_size_display(),
            size_stats.potential_duplicates,
            size_stats.duplicate_groups,
        ));

        if self.config.is_shutdown_requested() {
            return self.cancelled(summary, start_time);
        }

        if size_groups.is_empty() {
            reporter.info("No potential duplicates found after size grouping");
            summary.scan_duration = start_time.elapsed();
            return (Vec::new(), summary);
        }

        // Stage 2: hash
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("hashing", summary.candidate_files);
        }

        let mut groups = Vec::new();
        let mut current = 0usize;
        let mut interrupted = false;

        'buckets: for size in bucket_order {
            let Some(bucket) = size_groups.remove(&size) else {
                continue;
            };

            let mut hashed: Vec<(FileEntry, Hash)> = Vec::with_capacity(bucket.len());
            for file in bucket {
                if self.config.is_shutdown_requested() {
                    interrupted = true;
                    break 'buckets;
                }

                current += 1;
                if let Some(ref callback) = self.config.progress_callback {
                    callback.on_progress(current, file.path.to_string_lossy().as_ref());
                }

                match self.hasher.hash_file(&file.path) {
                    Ok(hash) => {
                        summary.hashed_files += 1;
                        if let Some(ref callback) = self.config.progress_callback {
                            callback.on_item_completed(file.size);
                        }
                        hashed.push((file, hash));
                    }
                    Err(HashError::Interrupted(_)) => {
                        interrupted = true;
                        break 'buckets;
                    }
                    Err(e) => {
                        summary.failed_hashes += 1;
                        if matches!(e, HashError::PermissionDenied(_)) {
                            summary.permission_errors += 1;
                            reporter.warning(&format!("Skipping file: {e}"));
                        } else {
                            summary.other_errors += 1;
                            reporter.error(&format!("Failed to hash file: {e}"));
                        }
                    }
                }
            }

            groups.extend(group_by_hash(size, hashed));
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("hashing");
        }

        if interrupted {
            return self.cancelled(summary, start_time);
        }

        groups.sort_by_key(|group| {
            group
                .files
                .first()
                .and_then(|f| discovery.get(&f.path))
                .copied()
                .unwrap_or(usize::MAX)
        });

        summary.duplicate_groups = groups.len();
        summary.duplicate_files = groups.iter().map(DuplicateGroup::duplicate_count).sum();
        summary.reclaimable_space = groups.iter().map(DuplicateGroup::wasted_space).sum();
        summary.scan_duration = start_time.elapsed();

        reporter.info(&format!(
            "Scan complete: {} duplicate groups, {} duplicate files, {} reclaimable",
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.reclaimable_display(),
        ));
        if summary.permission_errors > 0 {
            reporter.warning(&format!(
                "{} entries skipped: permission denied",
                summary.permission_errors
            ));
        }

        (groups, summary)
    }

    /// Discard everything and mark the summary as interrupted.
    fn cancelled(
        &self,
        mut summary: ScanSummary,
        start_time: Instant,
    ) -> (Vec<DuplicateGroup>, ScanSummary) {
        self.config
            .reporter
            .info("Scan cancelled, discarding partial results");
        summary.interrupted = true;
        summary.duplicate_groups = 0;
        summary.duplicate_files = 0;
        summary.reclaimable_space = 0;
        summary.scan_duration = start_time.elapsed();
        (Vec::new(), summary)
    }
}
