//! JSON output formatter for duplicate scan results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "duplicates": [
//!     {
//!       "hash": "9e107d9d372bb6826bd81d3542a419d6",
//!       "size": 1024,
//!       "reclaimable": 1024,
//!       "files": [
//!         { "path": "/m/a.txt", "name": "a.txt", "priority": 0.05, "risk": "safe", "keep": true },
//!         { "path": "/m/a (1).txt", "name": "a (1).txt", "priority": 10.09, "risk": "safe", "keep": false }
//!       ]
//!     }
//!   ],
//!   "summary": {
//!     "total_files": 100,
//!     "total_size": 1048576,
//!     "duplicate_groups": 1,
//!     "duplicate_files": 1,
//!     "reclaimable_space": 1024,
//!     "permission_errors": 0,
//!     "scan_duration_ms": 1234,
//!     "interrupted": false,
//!     "exit_code": 0,
//!     "exit_code_name": "DT000"
//!   },
//!   "deletion": { "dry_run": true, "mode": "trash", "deleted_count": 1, "freed_bytes": 1024, "errors": [] }
//! }
//! ```
//!
//! `deletion` is present only when a deletion pass ran.

use std::io::Write;

use serde::Serialize;

use super::{display_order, ranked_members};
use crate::actions::{DeleteMode, DeletionOutcome};
use crate::duplicates::{DuplicateGroup, ScanSummary};
use crate::scanner::RiskLevel;

/// A group member in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFile {
    /// Absolute path where it can be resolved
    pub path: String,
    /// Bare file name
    pub name: String,
    /// Keep-priority score (lower is kept first)
    pub priority: f64,
    /// Advisory location tag
    pub risk: RiskLevel,
    /// Whether the default selection keeps this file
    pub keep: bool,
}

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// MD5 digest as 32 hex characters
    pub hash: String,
    /// File size in bytes
    pub size: u64,
    /// Bytes freed by removing all but one member
    pub reclaimable: u64,
    /// Members in keep-priority order
    pub files: Vec<JsonFile>,
}

impl JsonDuplicateGroup {
    /// Create a JSON duplicate group from a DuplicateGroup.
    #[must_use]
    pub fn from_duplicate_group(group: &DuplicateGroup) -> Self {
        Self {
            hash: group.hash_hex(),
            size: group.size,
            reclaimable: group.wasted_space(),
            files: ranked_members(group)
                .into_iter()
                .map(|member| JsonFile {
                    path: normalize_path(&member.entry.path),
                    name: member.entry.name.clone(),
                    priority: member.priority,
                    risk: member.risk,
                    keep: member.keep,
                })
                .collect(),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Non-empty files that passed the filters
    pub total_files: usize,
    /// Total size of those files in bytes
    pub total_size: u64,
    /// Files that shared their size with another file
    pub candidate_files: usize,
    /// Files hashed successfully
    pub hashed_files: usize,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding one kept per group)
    pub duplicate_files: usize,
    /// Total space that can be reclaimed by removing duplicates (bytes)
    pub reclaimable_space: u64,
    /// Entries skipped because access was denied
    pub permission_errors: usize,
    /// Entries skipped for other I/O reasons
    pub other_errors: usize,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
    /// Whether the scan was interrupted
    pub interrupted: bool,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "DT000")
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Create a JSON summary from a ScanSummary.
    #[must_use]
    pub fn from_scan_summary(summary: &ScanSummary, exit_code: crate::error::ExitCode) -> Self {
        Self {
            total_files: summary.total_files,
            total_size: summary.total_size,
            candidate_files: summary.candidate_files,
            hashed_files: summary.hashed_files,
            duplicate_groups: summary.duplicate_groups,
            duplicate_files: summary.duplicate_files,
            reclaimable_space: summary.reclaimable_space,
            permission_errors: summary.permission_errors,
            other_errors: summary.other_errors,
            scan_duration_ms: u64::try_from(summary.scan_duration.as_millis()).unwrap_or(u64::MAX),
            interrupted: summary.interrupted,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Deletion pass in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDeletion {
    /// Whether the pass was a dry run
    pub dry_run: bool,
    /// Trash or permanent
    pub mode: DeleteMode,
    /// Counters and per-file errors
    #[serde(flatten)]
    pub outcome: DeletionOutcome,
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Duplicate groups, largest file size first
    pub duplicates: Vec<JsonDuplicateGroup>,
    /// Summary statistics
    pub summary: JsonSummary,
    /// Deletion pass, when one ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion: Option<JsonDeletion>,
}

impl JsonOutput {
    /// Create a new JSON output from scan results.
    ///
    /// # Example
    ///
    /// ```
    /// use disktider::duplicates::ScanSummary;
    /// use disktider::output::json::JsonOutput;
    /// use disktider::error::ExitCode;
    ///
    /// let output = JsonOutput::new(&[], &ScanSummary::default(), ExitCode::NoDuplicates);
    /// assert!(output.duplicates.is_empty());
    /// ```
    #[must_use]
    pub fn new(
        groups: &[DuplicateGroup],
        summary: &ScanSummary,
        exit_code: crate::error::ExitCode,
    ) -> Self {
        Self {
            duplicates: display_order(groups)
                .into_iter()
                .map(JsonDuplicateGroup::from_duplicate_group)
                .collect(),
            summary: JsonSummary::from_scan_summary(summary, exit_code),
            deletion: None,
        }
    }

    /// Attach the outcome of a deletion pass.
    #[must_use]
    pub fn with_deletion(mut self, outcome: &DeletionOutcome, mode: DeleteMode, dry_run: bool) -> Self {
        self.deletion = Some(JsonDeletion {
            dry_run,
            mode,
            outcome: outcome.clone(),
        });
        self
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Normalize a path to an absolute path string.
///
/// Falls back to the display form when the file can no longer be resolved
/// (for example after it was deleted).
fn normalize_path(path: &std::path::Path) -> String {
    match path.canonicalize() {
        Ok(canonical) => canonical.to_string_lossy().into_owned(),
        Err(_) => path.to_string_lossy().into_owned(),
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
