//! Structured error handling and exit codes.

use serde::Serialize;

use crate::actions::DeletionOutcome;
use crate::duplicates::ScanSummary;

/// Exit codes for the DiskTider binary.
///
/// - 0: Success (completed normally, duplicates found)
/// - 1: General error (bad root, unexpected failure)
/// - 2: No duplicates found
/// - 3: Partial success (files skipped during the scan or failed deletions)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Scan completed and duplicates were found.
    Success = 0,
    /// An unexpected error occurred.
    GeneralError = 1,
    /// Scan completed but no duplicates were found.
    NoDuplicates = 2,
    /// Completed, but some files were skipped or could not be deleted.
    PartialSuccess = 3,
    /// Interrupted by user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DT000",
            Self::GeneralError => "DT001",
            Self::NoDuplicates => "DT002",
            Self::PartialSuccess => "DT003",
            Self::Interrupted => "DT130",
        }
    }

    /// Exit code for a finished scan and an optional deletion pass.
    ///
    /// Interruption wins over errors, errors over an empty result.
    #[must_use]
    pub fn from_outcome(
        group_count: usize,
        summary: &ScanSummary,
        deletion: Option<&DeletionOutcome>,
    ) -> Self {
        let delete_failed = deletion.is_some_and(|d| !d.all_succeeded());

        if summary.interrupted {
            Self::Interrupted
        } else if summary.has_errors() || delete_failed {
            Self::PartialSuccess
        } else if group_count == 0 {
            Self::NoDuplicates
        } else {
            Self::Success
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DT001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
