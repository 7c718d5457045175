use disktider::duplicates::DuplicateFinder;
use disktider::scanner::FileEntry;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_find_duplicates_from_files_continues_on_error() {
    let finder = DuplicateFinder::with_defaults();
    let file1 = FileEntry::new(PathBuf::from("nonexistent_1.txt"), 100);
    let file2 = FileEntry::new(PathBuf::from("nonexistent_2.txt"), 100);

    let (groups, summary) = finder
        .find_duplicates_from_files(vec![file1, file2])
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.failed_hashes, 2);
    assert_eq!(summary.other_errors, 2);
    assert_eq!(summary.permission_errors, 0);
    assert!(!summary.interrupted);
}

#[test]
fn test_vanished_file_does_not_hide_other_duplicates() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    fs::write(&a, b"same bytes").unwrap();
    fs::write(&b, b"same bytes").unwrap();

    let files = vec![
        FileEntry::new(a, 10),
        FileEntry::new(dir.path().join("gone.txt"), 10),
        FileEntry::new(b, 10),
    ];

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates_from_files(files)
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
    assert_eq!(summary.hashed_files, 2);
    assert_eq!(summary.failed_hashes, 1);
    assert!(summary.has_errors());
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_counts_as_permission_error() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"twin").unwrap();
    fs::write(dir.path().join("b.txt"), b"twin").unwrap();
    let locked = dir.path().join("c.txt");
    fs::write(&locked, b"twin").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    if fs::File::open(&locked).is_ok() {
        return;
    }

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    assert_eq!(summary.permission_errors, 1);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
}
