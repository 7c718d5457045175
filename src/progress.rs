//! Progress reporting utilities using indicatif.
//!
//! The core reports progress through the [`ProgressCallback`] trait. The
//! finder uses the phases `"walking"` (file discovery, total unknown) and
//! `"hashing"` (stage 2, one item per candidate file); the deleter reports
//! `"deleting"` through its own callback, bridged here by [`Progress`] too.
//!
//! [`Progress`] renders those phases as terminal progress bars.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::actions::{DeleteProgressCallback, DeletionOutcome};

/// Progress callback for duplicate finding phases.
///
/// Implement this trait to receive progress updates during
/// the duplicate detection pipeline.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase (`"walking"`, `"hashing"`, `"deleting"`)
    /// * `total` - Total number of items to process, 0 when unknown
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called for each item processed.
    ///
    /// # Arguments
    ///
    /// * `current` - Current item number (1-based)
    /// * `path` - Path being processed
    fn on_progress(&self, current: usize, path: &str);

    /// Called when an item has been processed, providing its size.
    fn on_item_completed(&self, _bytes: u64) {}

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);

    /// Called to update the progress message.
    fn on_message(&self, _message: &str) {}
}

/// Progress reporter using indicatif.
pub struct Progress {
    multi: MultiProgress,
    walking: Mutex<Option<ProgressBar>>,
    active: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

fn lock(slot: &Mutex<Option<ProgressBar>>) -> MutexGuard<'_, Option<ProgressBar>> {
    slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Examples
    ///
    /// ```
    /// use disktider::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            walking: Mutex::new(None),
            active: Mutex::new(None),
            quiet,
        }
    }

    fn walking_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos} files")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} (ETA: {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }

        if phase == "walking" {
            let pb = self.multi.add(ProgressBar::new_spinner());
            pb.set_style(Self::walking_style());
            pb.set_message("Walking directory");
            pb.enable_steady_tick(Duration::from_millis(100));
            *lock(&self.walking) = Some(pb);
            return;
        }

        let pb = self.multi.add(ProgressBar::new(total as u64));
        pb.set_style(Self::bar_style());
        pb.set_message(match phase {
            "hashing" => "Hashing".to_string(),
            "deleting" => "Deleting".to_string(),
            other => other.to_string(),
        });
        *lock(&self.active) = Some(pb);
    }

    fn on_progress(&self, current: usize, path: &str) {
        if self.quiet {
            return;
        }

        let message = truncate_path(path, 30);
        if let Some(ref pb) = *lock(&self.active) {
            pb.set_position(current as u64);
            pb.set_message(message);
        } else if let Some(ref pb) = *lock(&self.walking) {
            pb.set_position(current as u64);
            pb.set_message(message);
        }
    }

    fn on_phase_end(&self, phase: &str) {
        if self.quiet {
            return;
        }

        let slot = if phase == "walking" {
            &self.walking
        } else {
            &self.active
        };
        if let Some(pb) = lock(slot).take() {
            pb.finish_with_message(format!("{phase} complete"));
        }
    }

    fn on_message(&self, message: &str) {
        if self.quiet {
            return;
        }

        if let Some(ref pb) = *lock(&self.active) {
            pb.set_message(message.to_string());
        } else if let Some(ref pb) = *lock(&self.walking) {
            pb.set_message(message.to_string());
        }
    }
}

impl DeleteProgressCallback for Progress {
    fn on_before_delete(&self, path: &std::path::Path, index: usize, total: usize) {
        if index == 0 {
            self.on_phase_start("deleting", total);
        }
        self.on_progress(index + 1, &path.to_string_lossy());
    }

    fn on_delete_success(&self, _path: &std::path::Path, _size: u64) {}

    fn on_delete_failure(&self, path: &std::path::Path, error: &str) {
        self.on_message(&format!("Failed {}: {}", path.display(), error));
    }

    fn on_complete(&self, outcome: &DeletionOutcome) {
        if !self.quiet {
            if let Some(ref pb) = *lock(&self.active) {
                pb.set_position(outcome.deleted_count as u64 + outcome.errors.len() as u64);
            }
        }
        self.on_phase_end("deleting");
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len >= max_len {
        let tail: String = file_name.chars().skip(name_len + 3 - max_len).collect();
        return format!("...{tail}");
    }

    format!(".../{file_name}")
}
