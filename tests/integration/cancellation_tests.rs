use disktider::duplicates::{DuplicateFinder, FinderConfig};
use disktider::progress::ProgressCallback;
use disktider::signal::ShutdownHandler;
use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

/// Requests cancellation once the given number of files has entered hashing.
struct CancelDuringHashing {
    flag: Arc<AtomicBool>,
    after: usize,
}

impl ProgressCallback for CancelDuringHashing {
    fn on_phase_start(&self, _phase: &str, _total: usize) {}

    fn on_progress(&self, current: usize, _path: &str) {
        if current >= self.after {
            self.flag.store(true, Ordering::SeqCst);
        }
    }

    fn on_phase_end(&self, _phase: &str) {}
}

fn populate(dir: &std::path::Path, pairs: usize) {
    for i in 0..pairs {
        let content = format!("pair number {i:04}");
        fs::write(dir.join(format!("a{i}.txt")), &content).unwrap();
        fs::write(dir.join(format!("b{i}.txt")), &content).unwrap();
    }
}

#[test]
fn test_cancel_before_scan_yields_empty_result() {
    let dir = tempdir().unwrap();
    populate(dir.path(), 3);

    let handler = ShutdownHandler::new();
    handler.request_shutdown();
    let finder = DuplicateFinder::new(FinderConfig::default().with_shutdown_flag(handler.flag()));

    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert!(summary.interrupted);
    assert_eq!(summary.duplicate_groups, 0);
}

#[test]
fn test_cancel_mid_hashing_discards_partial_groups() {
    let dir = tempdir().unwrap();
    populate(dir.path(), 4);

    let flag = Arc::new(AtomicBool::new(false));
    let callback = Arc::new(CancelDuringHashing {
        flag: Arc::clone(&flag),
        after: 3,
    });

    let files: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| {
            let e = e.unwrap();
            disktider::scanner::FileEntry::new(e.path(), e.metadata().unwrap().len())
        })
        .collect();

    let finder = DuplicateFinder::new(
        FinderConfig::default()
            .with_shutdown_flag(Arc::clone(&flag))
            .with_progress_callback(callback),
    );
    let (groups, summary) = finder.find_duplicates_from_files(files).unwrap();

    assert!(groups.is_empty());
    assert!(summary.interrupted);
    assert!(summary.hashed_files < 8);
    assert_eq!(summary.duplicate_files, 0);
    assert_eq!(summary.reclaimable_space, 0);
}

#[test]
fn test_handler_reset_allows_next_scan() {
    let dir = tempdir().unwrap();
    populate(dir.path(), 2);

    let handler = ShutdownHandler::new();
    let finder = DuplicateFinder::new(FinderConfig::default().with_shutdown_flag(handler.flag()));

    handler.request_shutdown();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();
    assert!(groups.is_empty() && summary.interrupted);

    handler.reset();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();
    assert_eq!(groups.len(), 2);
    assert!(!summary.interrupted);
}
