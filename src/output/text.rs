//! Human-readable report.
//!
//! ```text
//! Group 1: 3 files × 4.0 KiB, 8.0 KiB reclaimable (md5 9e107d9d…)
//!   KEEP    /music/song.mp3
//!   DELETE  /music/song (1).mp3
//!   DELETE  /backup/Program Files/song.mp3  [risky]
//!
//! Scanned 120 files (1.2 GiB) in 0.84s
//! 1 duplicate group, 2 duplicate files, 8.0 KiB reclaimable
//! ```
//!
//! Colors come from `yansi` and follow its global switch; call
//! `yansi::disable()` for plain output.

use std::fmt::Write as _;
use std::io::Write;

use bytesize::ByteSize;
use yansi::Paint;

use super::{display_order, ranked_members};
use crate::actions::DeletionOutcome;
use crate::duplicates::{DuplicateGroup, ScanSummary};

/// Rendered text report.
#[derive(Debug, Clone)]
pub struct TextReport<'a> {
    groups: &'a [DuplicateGroup],
    summary: &'a ScanSummary,
    deletion: Option<(&'a DeletionOutcome, bool)>,
}

impl<'a> TextReport<'a> {
    /// Report over a finished scan.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup], summary: &'a ScanSummary) -> Self {
        Self {
            groups,
            summary,
            deletion: None,
        }
    }

    /// Append the outcome of a deletion pass.
    #[must_use]
    pub fn with_deletion(mut self, outcome: &'a DeletionOutcome, dry_run: bool) -> Self {
        self.deletion = Some((outcome, dry_run));
        self
    }

    /// Render the whole report.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();

        if self.summary.interrupted {
            let _ = writeln!(out, "{}", "Scan interrupted; no results.".yellow().bold());
            return out;
        }

        for (index, group) in display_order(self.groups).into_iter().enumerate() {
            self.render_group(&mut out, index + 1, group);
        }
        self.render_summary(&mut out);

        if let Some((outcome, dry_run)) = self.deletion {
            render_deletion(&mut out, outcome, dry_run);
        }
        out
    }

    /// Render and write to `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(self.render().as_bytes())
    }

    fn render_group(&self, out: &mut String, number: usize, group: &DuplicateGroup) {
        let hex = group.hash_hex();
        let _ = writeln!(
            out,
            "{} {} files × {}, {} reclaimable (md5 {}…)",
            format!("Group {number}:").bold(),
            group.len(),
            ByteSize(group.size),
            ByteSize(group.wasted_space()).green(),
            &hex[..8].dim()
        );

        for member in ranked_members(group) {
            let marker = if member.keep {
                "KEEP  ".green().bold()
            } else {
                "DELETE".red()
            };
            let risk = if member.risk.is_risky() {
                format!("  {}", "[risky]".yellow())
            } else {
                String::new()
            };
            let _ = writeln!(out, "  {}  {}{}", marker, member.entry.path.display(), risk);
        }
        out.push('\n');
    }

    fn render_summary(&self, out: &mut String) {
        let s = self.summary;
        let _ = writeln!(
            out,
            "Scanned {} files ({}) in {:.2}s",
            s.total_files,
            s.total_size_display(),
            s.scan_duration.as_secs_f64()
        );

        if s.duplicate_groups == 0 {
            let _ = writeln!(out, "{}", "No duplicates found.".green());
        } else {
            let _ = writeln!(
                out,
                "{} duplicate group(s), {} duplicate file(s), {} reclaimable",
                s.duplicate_groups,
                s.duplicate_files,
                s.reclaimable_display().green().bold()
            );
        }

        if s.has_errors() {
            let _ = writeln!(
                out,
                "{}",
                format!(
                    "Skipped {} file(s): {} permission denied, {} other errors",
                    s.permission_errors + s.other_errors,
                    s.permission_errors,
                    s.other_errors
                )
                .yellow()
            );
        }
    }
}

fn render_deletion(out: &mut String, outcome: &DeletionOutcome, dry_run: bool) {
    out.push('\n');
    if dry_run {
        let _ = writeln!(
            out,
            "{} would delete {} file(s), freeing {}",
            "Dry run:".cyan().bold(),
            outcome.deleted_count,
            ByteSize(outcome.freed_bytes)
        );
        return;
    }

    let _ = writeln!(out, "{}", outcome.summary());
    for error in &outcome.errors {
        let _ = writeln!(out, "  {} {}", "error:".red().bold(), error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::FileEntry;
    use std::path::PathBuf;
    use std::time::Duration;

    fn sample() -> (Vec<DuplicateGroup>, ScanSummary) {
        let files = vec![
            FileEntry::new(PathBuf::from("/m/a (1).txt"), 2048),
            FileEntry::new(PathBuf::from("/m/a.txt"), 2048),
            FileEntry::new(PathBuf::from("/C/Program Files/a.txt"), 2048),
        ];
        let group = DuplicateGroup::new([0xab; 16], 2048, files);
        let summary = ScanSummary {
            total_files: 10,
            total_size: 100_000,
            duplicate_groups: 1,
            duplicate_files: 2,
            reclaimable_space: 4096,
            scan_duration: Duration::from_millis(250),
            ..ScanSummary::default()
        };
        (vec![group], summary)
    }

    fn plain(report: &TextReport<'_>) -> String {
        yansi::disable();
        report.render()
    }

    #[test]
    fn test_group_lists_keep_first() {
        let (groups, summary) = sample();
        let out = plain(&TextReport::new(&groups, &summary));

        let keep = out.find("KEEP").unwrap();
        let keep_line = &out[keep..out[keep..].find('\n').unwrap() + keep];
        assert!(keep_line.ends_with("/m/a.txt"));
        assert_eq!(out.matches("DELETE").count(), 2);
        assert!(out.contains("abababab"));
    }

    #[test]
    fn test_largest_group_is_numbered_first() {
        let (mut groups, summary) = sample();
        let small = DuplicateGroup::new(
            [0x11; 16],
            16,
            vec![
                FileEntry::new(PathBuf::from("/m/tiny.txt"), 16),
                FileEntry::new(PathBuf::from("/m/tiny (1).txt"), 16),
            ],
        );
        groups.insert(0, small);
        let out = plain(&TextReport::new(&groups, &summary));

        let first = out.lines().find(|l| l.starts_with("Group 1:")).unwrap();
        assert!(first.contains("abababab"));
        let second = out.lines().find(|l| l.starts_with("Group 2:")).unwrap();
        assert!(second.contains("11111111"));
    }

    #[test]
    fn test_risky_member_is_tagged() {
        let (groups, summary) = sample();
        let out = plain(&TextReport::new(&groups, &summary));

        let risky_line = out
            .lines()
            .find(|l| l.contains("Program Files"))
            .unwrap();
        assert!(risky_line.contains("[risky]"));
        assert_eq!(out.matches("[risky]").count(), 1);
    }

    #[test]
    fn test_summary_lines() {
        let (groups, mut summary) = sample();
        summary.permission_errors = 2;
        let out = plain(&TextReport::new(&groups, &summary));

        assert!(out.contains("Scanned 10 files"));
        assert!(out.contains("1 duplicate group(s), 2 duplicate file(s)"));
        assert!(out.contains("2 permission denied"));
    }

    #[test]
    fn test_no_duplicates_message() {
        let summary = ScanSummary::default();
        let out = plain(&TextReport::new(&[], &summary));
        assert!(out.contains("No duplicates found."));
    }

    #[test]
    fn test_interrupted_report_is_short() {
        let summary = ScanSummary {
            interrupted: true,
            ..ScanSummary::default()
        };
        let out = plain(&TextReport::new(&[], &summary));
        assert_eq!(out.trim(), "Scan interrupted; no results.");
    }

    #[test]
    fn test_deletion_section() {
        let (groups, summary) = sample();
        let outcome = DeletionOutcome {
            deleted_count: 1,
            freed_bytes: 2048,
            errors: vec!["File not found: /m/a (1).txt".to_string()],
        };

        let out = plain(&TextReport::new(&groups, &summary).with_deletion(&outcome, false));
        assert!(out.contains("1 failed"));
        assert!(out.contains("error: File not found: /m/a (1).txt"));

        let dry = plain(&TextReport::new(&groups, &summary).with_deletion(&outcome, true));
        assert!(dry.contains("Dry run: would delete 1 file(s)"));
    }
}
