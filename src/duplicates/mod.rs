//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based file grouping (stage 1)
//! - Hash confirmation of same-size candidates (stage 2)
//! - Keep-worthiness ranking of the members of a group

pub mod finder;
pub mod groups;
pub mod priority;

pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanSummary};
pub use groups::{group_by_hash, group_by_size, DuplicateGroup, GroupingStats};
pub use priority::{priority, sort_by_priority, split_keep};
