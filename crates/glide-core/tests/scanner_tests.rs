use glide_core::scanner::{DirectoryScanner, FolderSizeWalker, ScanOutcome, WalkStatus};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

fn no_cancel() -> Arc<AtomicBool> {
    Arc::new(AtomicBool::new(false))
}

fn scan(path: &Path, show_hidden: bool) -> ScanOutcome {
    DirectoryScanner::new(path.to_path_buf(), show_hidden, no_cancel()).run()
}

fn entry_names(outcome: &ScanOutcome) -> Vec<String> {
    match outcome {
        ScanOutcome::Completed(entries) => {
            let mut names: Vec<String> = entries.iter().map(|e| e.name.clone()).collect();
            names.sort();
            names
        }
        other => panic!("expected Completed, got {:?}", other),
    }
}

#[test]
fn test_hidden_entries_filtered_by_default() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".hidden"), "h").unwrap();
    fs::write(dir.path().join("visible.txt"), "v").unwrap();
    fs::create_dir(dir.path().join(".git")).unwrap();

    let outcome = scan(dir.path(), false);
    assert_eq!(entry_names(&outcome), vec!["visible.txt".to_string()]);
}

#[test]
fn test_hidden_entries_shown_when_requested() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".hidden"), "h").unwrap();
    fs::write(dir.path().join("visible.txt"), "v").unwrap();

    let outcome = scan(dir.path(), true);
    assert_eq!(
        entry_names(&outcome),
        vec![".hidden".to_string(), "visible.txt".to_string()]
    );
}

#[test]
fn test_empty_directory_completes_with_no_entries() {
    let dir = tempdir().unwrap();
    match scan(dir.path(), false) {
        ScanOutcome::Completed(entries) => assert!(entries.is_empty()),
        other => panic!("expected Completed, got {:?}", other),
    }
}

#[test]
fn test_missing_directory_fails_with_path() {
    let dir = tempdir().unwrap();
    let gone = dir.path().join("vanished");

    match scan(&gone, false) {
        ScanOutcome::Failed { path, message } => {
            assert_eq!(path, gone);
            assert!(!message.is_empty());
        }
        other => panic!("expected Failed, got {:?}", other),
    }
}

#[test]
fn test_precancelled_scan_reports_cancelled() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "a").unwrap();

    let cancel = Arc::new(AtomicBool::new(true));
    let scanner = DirectoryScanner::new(dir.path().to_path_buf(), false, cancel);
    assert!(matches!(scanner.run(), ScanOutcome::Cancelled));
}

#[test]
fn test_entry_fields_are_captured() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("notes.txt"), "hello world").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();

    let entries = match scan(dir.path(), false) {
        ScanOutcome::Completed(entries) => entries,
        other => panic!("expected Completed, got {:?}", other),
    };
    assert_eq!(entries.len(), 2);

    let file = entries.iter().find(|e| e.name == "notes.txt").unwrap();
    assert!(!file.is_dir);
    assert_eq!(file.size_bytes, 11);
    assert_eq!(file.path, dir.path().join("notes.txt"));
    assert!(file.modified > 0);

    let sub = entries.iter().find(|e| e.name == "sub").unwrap();
    assert!(sub.is_dir);
    assert_eq!(sub.size_bytes, 0);
}

// ── FolderSizeWalker ─────────────────────────────────────────────

#[test]
fn test_walker_sums_nested_tree() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("root");
    fs::create_dir_all(root.join("a/b")).unwrap();
    fs::write(root.join("top.bin"), vec![0u8; 25]).unwrap();
    fs::write(root.join("a/mid.bin"), vec![0u8; 100]).unwrap();
    fs::write(root.join("a/b/deep.bin"), vec![0u8; 50]).unwrap();
    // Hidden files still count toward a folder's size.
    fs::write(root.join(".hidden"), vec![0u8; 10]).unwrap();

    let walker = FolderSizeWalker::new(root, no_cancel());
    assert_eq!(walker.run(), WalkStatus::Completed { total_bytes: 185 });
}

#[test]
fn test_walker_empty_folder_is_zero() {
    let dir = tempdir().unwrap();
    let walker = FolderSizeWalker::new(dir.path().to_path_buf(), no_cancel());
    assert_eq!(walker.run(), WalkStatus::Completed { total_bytes: 0 });
}

#[cfg(unix)]
#[test]
fn test_walker_does_not_follow_symlinks() {
    let dir = tempdir().unwrap();
    let outside = dir.path().join("outside");
    fs::create_dir(&outside).unwrap();
    fs::write(outside.join("big.bin"), vec![0u8; 4096]).unwrap();

    let root = dir.path().join("root");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("own.bin"), vec![0u8; 64]).unwrap();
    std::os::unix::fs::symlink(&outside, root.join("link")).unwrap();

    let walker = FolderSizeWalker::new(root, no_cancel());
    assert_eq!(walker.run(), WalkStatus::Completed { total_bytes: 64 });
}

#[test]
fn test_precancelled_walk_reports_cancelled() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.bin"), vec![0u8; 128]).unwrap();

    let cancel = Arc::new(AtomicBool::new(true));
    let walker = FolderSizeWalker::new(dir.path().to_path_buf(), cancel.clone());
    assert_eq!(walker.run(), WalkStatus::Cancelled);
    assert!(cancel.load(Ordering::SeqCst));
}
