//! Keep-worthiness ranking of duplicate file names.
//!
//! Among identical files, the one whose name looks least like a copy is the
//! one to keep. [`priority`] scores a file name; lower scores rank first.
//! Each copy marker found in the lowercased name adds a flat penalty and
//! every character adds a small one, so `a.txt` outranks `a (1).txt`, which
//! outranks `a (1) - copy.txt`.
//!
//! The score looks at the name only. Path, size and timestamps play no part.

use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;

use super::DuplicateGroup;
use crate::scanner::FileEntry;

/// Penalty per matched copy marker.
pub const MARKER_PENALTY: f64 = 10.0;

/// Penalty per character of the file name.
pub const LENGTH_PENALTY: f64 = 0.01;

static COPY_MARKERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\(\d+\)",
        r"\s+\d+$",
        r"copy",
        r"копия",
        r"\s-\scopy",
        r"\s-\sкопия",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Score a file name for keep-worthiness. Lower is better.
///
/// # Example
///
/// ```
/// use disktider::duplicates::priority;
///
/// assert!(priority("a.txt") < priority("a (1).txt"));
/// assert!(priority("song.mp3") < priority("song - copy.mp3"));
/// ```
#[must_use]
pub fn priority(file_name: &str) -> f64 {
    let lower = file_name.to_lowercase();
    let markers = COPY_MARKERS.iter().filter(|re| re.is_match(&lower)).count();

    markers as f64 * MARKER_PENALTY + file_name.chars().count() as f64 * LENGTH_PENALTY
}

fn compare(a: &FileEntry, b: &FileEntry) -> Ordering {
    priority(&a.name).total_cmp(&priority(&b.name))
}

/// Stable sort by ascending priority score; ties keep discovery order.
pub fn sort_by_priority(files: &mut [FileEntry]) {
    files.sort_by(compare);
}

/// Default selection for a group: the best-ranked member and the rest.
///
/// Returns `None` for an empty group.
#[must_use]
pub fn split_keep(group: &DuplicateGroup) -> Option<(&FileEntry, Vec<&FileEntry>)> {
    let mut ranked: Vec<&FileEntry> = group.files.iter().collect();
    ranked.sort_by(|a, b| compare(a, b));

    let mut ranked = ranked.into_iter();
    let keep = ranked.next()?;
    Some((keep, ranked.collect()))
}
