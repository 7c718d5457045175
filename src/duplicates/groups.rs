//! Duplicate grouping and size-based file organization.
//!
//! # Overview
//!
//! This module provides structures for grouping files by size (stage 1 of
//! duplicate detection) and for the confirmed groups produced by stage 2.
//!
//! ## Size Grouping (Stage 1)
//!
//! Files with different sizes cannot be duplicates, so every file is first
//! bucketed by its exact byte size. Buckets holding a single file are
//! discarded before any content is read.
//!
//! # Example
//!
//! ```
//! use disktider::scanner::FileEntry;
//! use disktider::duplicates::group_by_size;
//! use std::path::PathBuf;
//!
//! let files = vec![
//!     FileEntry::new(PathBuf::from("/file1.txt"), 1024),
//!     FileEntry::new(PathBuf::from("/file2.txt"), 1024),
//!     FileEntry::new(PathBuf::from("/file3.txt"), 2048),
//! ];
//!
//! let (groups, stats) = group_by_size(files);
//!
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.potential_duplicates, 2);
//! assert_eq!(groups.len(), 1);
//! ```

use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::scanner::{hash_to_hex, FileEntry, Hash};

/// Confirmed group of files with identical content.
///
/// Invariants: at least two files, every file has `size` bytes, and every
/// file's content hashed to `hash`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateGroup {
    /// MD5 digest of the shared content
    #[serde(serialize_with = "serialize_hash")]
    pub hash: Hash,
    /// File size in bytes (shared by all files)
    pub size: u64,
    /// Member files, in discovery order
    pub files: Vec<FileEntry>,
}

fn serialize_hash<S: serde::Serializer>(hash: &Hash, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hash_to_hex(hash))
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(hash: Hash, size: u64, files: Vec<FileEntry>) -> Self {
        Self { hash, size, files }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total wasted space (all copies minus one).
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Hash as hexadecimal string.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hash_to_hex(&self.hash)
    }

    /// Get just the paths of files in this group.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

/// Statistics from the size grouping stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of unique file sizes
    pub unique_sizes: usize,
    /// Number of files that could be duplicates (in groups of 2+)
    pub potential_duplicates: usize,
    /// Number of files eliminated as unique (singleton groups)
    pub eliminated_unique: usize,
    /// Number of empty files dropped before bucketing
    pub empty_files: usize,
    /// Number of size groups with 2+ files
    pub duplicate_groups: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Group files by size (stage 1 of duplicate detection).
///
/// Returns only buckets with two or more files. Within a bucket the input
/// order is preserved. Empty files are dropped and counted separately.
#[must_use]
pub fn group_by_size(
    files: impl IntoIterator<Item = FileEntry>,
) -> (HashMap<u64, Vec<FileEntry>>, GroupingStats) {
    let mut all_groups: HashMap<u64, Vec<FileEntry>> = HashMap::new();
    let mut stats = GroupingStats::default();

    for file in files {
        stats.total_files += 1;
        stats.total_size += file.size;

        if file.size == 0 {
            stats.empty_files += 1;
            continue;
        }

        all_groups.entry(file.size).or_default().push(file);
    }

    stats.unique_sizes = all_groups.len();

    let filtered_groups: HashMap<u64, Vec<FileEntry>> = all_groups
        .into_iter()
        .filter(|(_, files)| {
            if files.len() == 1 {
                stats.eliminated_unique += 1;
                false
            } else {
                stats.potential_duplicates += files.len();
                stats.duplicate_groups += 1;
                true
            }
        })
        .collect();

    (filtered_groups, stats)
}

/// Split one size bucket by content hash, keeping only hashes shared by 2+ files.
///
/// Groups come out in the order their first member appears in `hashed`, and
/// members keep their relative order.
#[must_use]
pub fn group_by_hash(size: u64, hashed: Vec<(FileEntry, Hash)>) -> Vec<DuplicateGroup> {
    let mut order: Vec<Hash> = Vec::new();
    let mut buckets: HashMap<Hash, Vec<FileEntry>> = HashMap::new();

    for (file, hash) in hashed {
        let bucket = buckets.entry(hash).or_insert_with(|| {
            order.push(hash);
            Vec::new()
        });
        bucket.push(file);
    }

    order
        .into_iter()
        .filter_map(|hash| {
            let files = buckets.remove(&hash)?;
            (files.len() > 1).then(|| DuplicateGroup::new(hash, size, files))
        })
        .collect()
}
