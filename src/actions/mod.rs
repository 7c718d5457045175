//! File actions module.
//!
//! # Deletion
//!
//! The delete module removes a caller-chosen list of files with:
//! - Move to system trash (default, recoverable)
//! - Permanent deletion (explicit configuration)
//! - Dry run, which only reports
//! - Per-file error collection; one failure never aborts the batch
//!
//! ```no_run
//! use disktider::actions::delete::delete_to_trash;
//! use std::path::Path;
//!
//! let result = delete_to_trash(Path::new("/path/to/duplicate.txt"));
//! ```

pub mod delete;

pub use delete::{
    default_selection, delete_batch, delete_to_trash, permanent_delete, validate_preserves_copy,
    DeleteConfig, DeleteError, DeleteMode, DeleteProgressCallback, DeletionOutcome,
    DeletionRequest, TrashCapability, TrashFallback,
};
