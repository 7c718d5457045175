use disktider::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use disktider::scanner::{ExtensionFilter, PathFilter, WalkerConfig};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(dir: &Path, name: &str, content: &[u8]) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn finder_with(walker_config: WalkerConfig) -> DuplicateFinder {
    DuplicateFinder::new(FinderConfig::default().with_walker_config(walker_config))
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.duplicate_groups, 0);
    assert!(!summary.interrupted);
}

#[test]
fn test_all_distinct_sizes_yield_nothing() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"1");
    write(dir.path(), "b.txt", b"22");
    write(dir.path(), "c.txt", b"333");

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.candidate_files, 0);
    assert_eq!(summary.hashed_files, 0);
}

#[test]
fn test_same_size_different_content_not_grouped() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.bin", b"abcd");
    write(dir.path(), "b.bin", b"wxyz");
    write(dir.path(), "c.bin", b"abcd");

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(summary.candidate_files, 3);
    assert_eq!(summary.hashed_files, 3);
    assert_eq!(groups.len(), 1);

    let names: Vec<&str> = groups[0].files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["a.bin", "c.bin"]);
    assert_eq!(groups[0].size, 4);
}

#[test]
fn test_zero_byte_files_never_grouped() {
    let dir = tempdir().unwrap();
    write(dir.path(), "empty1", b"");
    write(dir.path(), "empty2", b"");
    write(dir.path(), "empty3", b"");

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 0);
}

#[test]
fn test_nested_duplicates_found_across_directories() {
    let dir = tempdir().unwrap();
    write(dir.path(), "top.txt", b"shared content");
    write(dir.path(), "sub/deeper/copy.txt", b"shared content");
    write(dir.path(), "sub/other.txt", b"different text");

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
    assert_eq!(summary.duplicate_files, 1);
    assert_eq!(summary.reclaimable_space, 14);
}

#[test]
fn test_non_recursive_ignores_subdirectories() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"same");
    write(dir.path(), "sub/b.txt", b"same");

    let finder = finder_with(WalkerConfig::default().with_recursive(false));
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 1);
}

#[test]
fn test_music_filter_limits_scan() {
    let dir = tempdir().unwrap();
    write(dir.path(), "one.mp3", b"audio");
    write(dir.path(), "two.MP3", b"audio");
    write(dir.path(), "one.txt", b"audio");

    let finder =
        finder_with(WalkerConfig::default().with_extensions(Some(ExtensionFilter::music())));
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(summary.total_files, 2);
    assert_eq!(groups.len(), 1);
    assert!(groups[0].files.iter().all(|f| !f.name.ends_with(".txt")));
}

#[test]
fn test_skipped_directories_are_not_descended() {
    let dir = tempdir().unwrap();
    write(dir.path(), "keep.js", b"module");
    write(dir.path(), "node_modules/pkg/index.js", b"module");
    write(dir.path(), "Archive/old.js", b"module");

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);

    let finder = finder_with(
        WalkerConfig::default().with_path_filter(PathFilter::default().with_patterns(["archive"])),
    );
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();
    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 1);

    let finder = finder_with(WalkerConfig::default().with_path_filter(PathFilter::empty()));
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();
    assert_eq!(groups[0].len(), 3);
}

#[test]
fn test_result_order_is_deterministic() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a1.txt", b"group one");
    write(dir.path(), "b1.txt", b"grp 2");
    write(dir.path(), "a2.txt", b"group one");
    write(dir.path(), "b2.txt", b"grp 2");

    let finder = DuplicateFinder::with_defaults();
    let (first, _) = finder.find_duplicates(dir.path()).unwrap();
    let (second, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].files[0].name, "a1.txt");
    assert_eq!(first[1].files[0].name, "b1.txt");
}

#[test]
fn test_root_errors_are_hard_failures() {
    let dir = tempdir().unwrap();
    write(dir.path(), "file.txt", b"x");

    let finder = DuplicateFinder::with_defaults();
    assert!(matches!(
        finder.find_duplicates(&dir.path().join("missing")),
        Err(FinderError::PathNotFound(_))
    ));
    assert!(matches!(
        finder.find_duplicates(&dir.path().join("file.txt")),
        Err(FinderError::NotADirectory(_))
    ));
}

#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_counts_permission_error() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"dup");
    write(dir.path(), "b.txt", b"dup");
    write(dir.path(), "locked/c.txt", b"dup");

    let locked = dir.path().join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users read through the mode bits; nothing to observe then.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let result = DuplicateFinder::with_defaults().find_duplicates(dir.path());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let (groups, summary) = result.unwrap();
    assert_eq!(summary.permission_errors, 1);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
}
