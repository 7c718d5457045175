use disktider::actions::{
    default_selection, delete_batch, validate_preserves_copy, DeleteConfig, DeletionRequest,
    TrashCapability, TrashFallback,
};
use disktider::duplicates::{split_keep, DuplicateFinder, FinderConfig};
use disktider::scanner::WalkerConfig;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn requests(dir: &std::path::Path, count: usize) -> Vec<DeletionRequest> {
    (1..=count)
        .map(|i| {
            let path = dir.join(format!("file{i}.dat"));
            fs::write(&path, vec![b'x'; i * 10]).unwrap();
            DeletionRequest::new(path, (i * 10) as u64)
        })
        .collect()
}

#[test]
fn test_end_to_end_keeps_original_name() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"hello").unwrap();
    fs::write(dir.path().join("a (1).txt"), b"hello").unwrap();
    fs::write(dir.path().join("b.txt"), b"world!").unwrap();

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(summary.duplicate_files, 1);

    let (keep, delete) = split_keep(&groups[0]).unwrap();
    assert_eq!(keep.name, "a.txt");
    assert_eq!(delete.len(), 1);
    assert_eq!(delete[0].name, "a (1).txt");

    let selection = default_selection(&groups);
    assert_eq!(selection.len(), 1);
    assert_eq!(selection[0].name, "a (1).txt");
    assert!(validate_preserves_copy(
        &selection.iter().map(|r| r.path.clone()).collect::<Vec<_>>(),
        &groups[0].paths()
    )
    .is_ok());

    let outcome = delete_batch(&selection, &DeleteConfig::permanent(), None);
    assert!(outcome.all_succeeded());
    assert_eq!(outcome.deleted_count, 1);
    assert_eq!(outcome.freed_bytes, 5);

    assert!(dir.path().join("a.txt").exists());
    assert!(!dir.path().join("a (1).txt").exists());
    assert!(dir.path().join("b.txt").exists());
}

#[test]
#[cfg(unix)]
fn test_linked_directory_never_loses_the_only_copy() {
    let dir = tempdir().unwrap();
    let real = dir.path().join("real");
    fs::create_dir(&real).unwrap();
    fs::write(real.join("song.mp3"), b"only copy of the data").unwrap();
    std::os::unix::fs::symlink(&real, dir.path().join("alias")).unwrap();

    let config = FinderConfig::default()
        .with_walker_config(WalkerConfig::default().with_follow_symlinks(true));
    let (groups, summary) = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 1);

    let outcome = delete_batch(&default_selection(&groups), &DeleteConfig::permanent(), None);
    assert_eq!(outcome.deleted_count, 0);
    assert!(real.join("song.mp3").exists());
}

#[test]
fn test_batch_isolates_single_failure() {
    let dir = tempdir().unwrap();
    let batch = requests(dir.path(), 5);
    fs::remove_file(&batch[2].path).unwrap();

    let outcome = delete_batch(&batch, &DeleteConfig::permanent(), None);

    assert_eq!(outcome.deleted_count, 4);
    assert_eq!(outcome.freed_bytes, 10 + 20 + 40 + 50);
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].contains("file3.dat"));
    assert!(batch.iter().all(|r| !r.path.exists()));
}

#[test]
fn test_dry_run_touches_nothing() {
    let dir = tempdir().unwrap();
    let batch = requests(dir.path(), 3);

    let outcome = delete_batch(&batch, &DeleteConfig::permanent().with_dry_run(true), None);

    assert_eq!(outcome.deleted_count, 3);
    assert_eq!(outcome.freed_bytes, 60);
    assert!(outcome.errors.is_empty());
    assert!(batch.iter().all(|r| r.path.exists()));
}

#[test]
fn test_dry_run_counts_missing_files_too() {
    let batch = vec![DeletionRequest::new(PathBuf::from("/nonexistent/x.bin"), 7)];
    let outcome = delete_batch(&batch, &DeleteConfig::trash().with_dry_run(true), None);

    assert_eq!(outcome.deleted_count, 1);
    assert_eq!(outcome.freed_bytes, 7);
}

#[test]
fn test_unavailable_trash_refuses_by_default() {
    let dir = tempdir().unwrap();
    let batch = requests(dir.path(), 2);
    let config = DeleteConfig::trash().with_trash_capability(TrashCapability::Unavailable);

    let outcome = delete_batch(&batch, &config, None);

    assert_eq!(outcome.deleted_count, 0);
    assert_eq!(outcome.errors.len(), 2);
    assert!(batch.iter().all(|r| r.path.exists()));
}

#[test]
fn test_unavailable_trash_with_permanent_fallback() {
    let dir = tempdir().unwrap();
    let batch = requests(dir.path(), 2);
    let config = DeleteConfig::trash()
        .with_trash_capability(TrashCapability::Unavailable)
        .with_fallback(TrashFallback::Permanent);

    let outcome = delete_batch(&batch, &config, None);

    assert_eq!(outcome.deleted_count, 2);
    assert!(outcome.all_succeeded());
    assert!(batch.iter().all(|r| !r.path.exists()));
}

#[test]
fn test_empty_batch() {
    let outcome = delete_batch(&[], &DeleteConfig::permanent(), None);
    assert_eq!(outcome.deleted_count, 0);
    assert_eq!(outcome.freed_bytes, 0);
    assert!(outcome.all_succeeded());
}
