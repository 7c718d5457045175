//! Output formatters for duplicate scan results.
//!
//! This module provides two report formats:
//! - [`text`]: colored, human-readable listing with keep/delete markers
//! - [`json`]: machine-readable document for scripting
//!
//! Both list groups largest file size first (see [`display_order`]) and
//! present each group's members in keep-priority order, with the member the
//! default selection keeps listed first and flagged, and every member tagged
//! with its [`RiskLevel`].
//!
//! # Example
//!
//! ```no_run
//! use disktider::duplicates::DuplicateFinder;
//! use disktider::error::ExitCode;
//! use disktider::output::json::JsonOutput;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! let output = JsonOutput::new(&groups, &summary, ExitCode::Success);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod json;
pub mod text;

pub use json::JsonOutput;
pub use text::TextReport;

use crate::duplicates::{priority, DuplicateGroup};
use crate::scanner::{classify, FileEntry, RiskLevel};

/// A group member annotated for presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedFile<'a> {
    /// The file itself
    pub entry: &'a FileEntry,
    /// Keep-priority score (lower is kept first)
    pub priority: f64,
    /// Advisory location tag
    pub risk: RiskLevel,
    /// Whether the default selection keeps this member
    pub keep: bool,
}

/// Groups in report order: largest file size first.
///
/// The sort is stable, so groups of equal size stay in discovery order.
/// The scan result itself is left untouched.
#[must_use]
pub fn display_order(groups: &[DuplicateGroup]) -> Vec<&DuplicateGroup> {
    let mut ordered: Vec<&DuplicateGroup> = groups.iter().collect();
    ordered.sort_by(|a, b| b.size.cmp(&a.size));
    ordered
}

/// Members of `group` in keep-priority order, the first one marked as kept.
///
/// Ties keep discovery order, matching the default deletion selection.
#[must_use]
pub fn ranked_members(group: &DuplicateGroup) -> Vec<RankedFile<'_>> {
    let mut ranked: Vec<RankedFile<'_>> = group
        .files
        .iter()
        .map(|entry| RankedFile {
            entry,
            priority: priority(&entry.name),
            risk: classify(&entry.path),
            keep: false,
        })
        .collect();

    ranked.sort_by(|a, b| a.priority.total_cmp(&b.priority));
    if let Some(first) = ranked.first_mut() {
        first.keep = true;
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duplicates::split_keep;
    use std::path::PathBuf;

    fn group(paths: &[&str]) -> DuplicateGroup {
        let files = paths
            .iter()
            .map(|p| FileEntry::new(PathBuf::from(p), 10))
            .collect();
        DuplicateGroup::new([7u8; 16], 10, files)
    }

    #[test]
    fn test_ranked_members_orders_and_marks_keep() {
        let g = group(&["/m/a (1).txt", "/m/a - Copy.txt", "/m/a.txt"]);
        let ranked = ranked_members(&g);

        let names: Vec<&str> = ranked.iter().map(|r| r.entry.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "a (1).txt", "a - Copy.txt"]);
        assert!(ranked[0].keep);
        assert!(ranked[1..].iter().all(|r| !r.keep));
    }

    #[test]
    fn test_ranked_members_agrees_with_default_selection() {
        let g = group(&["/x/b.txt", "/y/b.txt", "/z/b copy.txt"]);
        let ranked = ranked_members(&g);
        let (keep, _) = split_keep(&g).unwrap();

        assert_eq!(ranked[0].entry, keep);
        assert_eq!(ranked[0].entry.path, PathBuf::from("/x/b.txt"));
    }

    #[test]
    fn test_display_order_largest_first_stable() {
        let small = DuplicateGroup::new([1u8; 16], 10, Vec::new());
        let big = DuplicateGroup::new([2u8; 16], 5_000, Vec::new());
        let mid_a = DuplicateGroup::new([3u8; 16], 300, Vec::new());
        let mid_b = DuplicateGroup::new([4u8; 16], 300, Vec::new());
        let groups = vec![small, mid_a, big, mid_b];

        let hashes: Vec<u8> = display_order(&groups).iter().map(|g| g.hash[0]).collect();
        assert_eq!(hashes, vec![2, 3, 4, 1]);
        assert_eq!(groups[0].size, 10);
    }

    #[test]
    fn test_ranked_members_tags_risk() {
        let g = group(&["/home/u/game.dat", "/d/SteamLibrary/game.dat"]);
        let ranked = ranked_members(&g);

        assert_eq!(ranked[0].risk, RiskLevel::Safe);
        assert_eq!(ranked[1].risk, RiskLevel::Risky);
    }
}
