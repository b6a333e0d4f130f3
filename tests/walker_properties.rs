use assert_fs::prelude::*;
use fstree::{
    DirStat, MatchSpec, Recursion, enumerate_tree, find_first_match, is_empty_directory,
    list_tree, stat_tree,
};
use std::collections::HashSet;
use std::path::PathBuf;

fn set(paths: Vec<PathBuf>) -> HashSet<PathBuf> {
    paths.into_iter().collect()
}

#[test]
fn constrained_and_full_recursion_diverge() {
    let root = assert_fs::TempDir::new().unwrap();
    root.child("keep/match.txt").touch().unwrap();
    root.child("skip/match.txt").touch().unwrap();
    let spec = MatchSpec::regex(r"^(keep|match\.txt)$");

    let constrained = set(enumerate_tree(root.path(), &spec, Recursion::PatternConstrained));
    assert!(constrained.contains(&root.path().join("keep").join("match.txt")));
    assert!(!constrained.contains(&root.path().join("skip").join("match.txt")));

    let full = set(enumerate_tree(root.path(), &spec, Recursion::Full));
    assert!(full.contains(&root.path().join("keep").join("match.txt")));
    assert!(full.contains(&root.path().join("skip").join("match.txt")));
    assert!(!full.contains(&root.path().join("skip")));
}

#[test]
fn stat_counts_direct_and_nested() {
    let root = assert_fs::TempDir::new().unwrap();
    root.child("a.bin").write_binary(&[0u8; 10]).unwrap();
    root.child("b.bin").write_binary(&[0u8; 20]).unwrap();
    root.child("c.bin").write_binary(&[0u8; 30]).unwrap();
    root.child("d1").create_dir_all().unwrap();
    root.child("d2/nested.bin").write_binary(&[0u8; 5]).unwrap();

    let flat = stat_tree(root.path(), &MatchSpec::any(), false).unwrap();
    assert_eq!(
        flat,
        DirStat {
            subdirectories: 2,
            files: 3,
            bytes: 60
        }
    );

    let deep = stat_tree(root.path(), &MatchSpec::any(), true).unwrap();
    assert_eq!(deep.files, 4);
    assert_eq!(deep.bytes, 65);
    assert_eq!(deep.subdirectories, 2);
}

#[test]
fn empty_until_one_zero_byte_file() {
    let root = assert_fs::TempDir::new().unwrap();
    root.child("x/y/z").create_dir_all().unwrap();
    root.child("w").create_dir_all().unwrap();
    assert!(is_empty_directory(root.path()).unwrap());

    root.child("x/y/z/zero").touch().unwrap();
    assert!(!is_empty_directory(root.path()).unwrap());
    assert!(is_empty_directory(&root.path().join("w")).unwrap());
}

#[test]
fn breadth_first_search_returns_shallowest() {
    let root = assert_fs::TempDir::new().unwrap();
    root.child("a/b/c/needle.log").touch().unwrap();
    root.child("z/needle.log").touch().unwrap();

    let hit = find_first_match(root.path(), &MatchSpec::glob("*.log")).unwrap();
    assert_eq!(hit, root.path().join("z").join("needle.log"));
}

#[test]
fn listing_sees_changes_between_calls() {
    let root = assert_fs::TempDir::new().unwrap();
    root.child("one.txt").touch().unwrap();
    assert_eq!(list_tree(root.path(), &MatchSpec::glob("*.txt"), false).len(), 1);
    root.child("sub/two.txt").touch().unwrap();
    assert_eq!(list_tree(root.path(), &MatchSpec::glob("*.txt"), false).len(), 2);
}
