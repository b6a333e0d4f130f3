use assert_fs::prelude::*;
use filetime::{FileTime, set_file_times};
use fstree::{MatchSpec, copy_file_with, copy_tree, move_either, move_file, remove_matching_files};
use std::ffi::OsStr;
use std::fs;

#[test]
fn copy_can_carry_timestamps() {
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("old.txt").write_str("o").unwrap();
    let src = tmp.path().join("old.txt");
    let stamp = FileTime::from_unix_time(1_500_000_000, 0);
    set_file_times(&src, stamp, stamp).unwrap();

    let kept = copy_file_with(&src, &tmp.path().join("kept"), true).unwrap();
    let meta = fs::metadata(&kept).unwrap();
    assert_eq!(FileTime::from_last_modification_time(&meta), stamp);

    // other platforms' native copy keeps mtime on its own
    if cfg!(target_os = "linux") {
        let fresh = copy_file_with(&src, &tmp.path().join("fresh"), false).unwrap();
        let meta = fs::metadata(&fresh).unwrap();
        assert_ne!(FileTime::from_last_modification_time(&meta), stamp);
    }
}

#[test]
fn copy_tree_leaves_source() {
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("s/a/1").write_str("1").unwrap();
    tmp.child("s/2").write_str("2").unwrap();
    let n = copy_tree(&tmp.path().join("s"), &tmp.path().join("d")).unwrap();
    assert_eq!(n, 2);
    tmp.child("s/a/1").assert("1");
    tmp.child("d/a/1").assert("1");
    tmp.child("d/2").assert("2");
}

#[test]
fn move_file_renames_and_reports() {
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("raw.dat").write_str("r").unwrap();
    let dest = tmp.path().join("x").join("y");
    assert!(move_file(&tmp.path().join("raw.dat"), &dest, Some(OsStr::new("cooked.dat"))));
    tmp.child("x/y/cooked.dat").assert("r");
    assert!(!move_file(&tmp.path().join("raw.dat"), &dest, None));
}

#[test]
fn move_either_handles_both_kinds() {
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("one.txt").write_str("1").unwrap();
    tmp.child("dir/two.txt").write_str("2").unwrap();
    let dest = tmp.path().join("dest");
    assert!(move_either(&tmp.path().join("one.txt"), &dest));
    assert!(move_either(&tmp.path().join("dir"), &dest));
    tmp.child("dest/one.txt").assert("1");
    tmp.child("dest/dir/two.txt").assert("2");
}

#[test]
fn cleanup_by_pattern() {
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("a.part").touch().unwrap();
    tmp.child("deep/b.part").touch().unwrap();
    tmp.child("deep/keep.mkv").touch().unwrap();
    let removed = remove_matching_files(tmp.path(), &MatchSpec::glob("*.part"), true).unwrap();
    assert_eq!(removed, 2);
    assert!(tmp.child("deep/keep.mkv").path().is_file());
    assert!(!tmp.child("deep/b.part").path().exists());
}
