//! Deletion and housekeeping helpers.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use super::helpers::io_error;
use super::util::ensure_dir;
use crate::errors::Result;
use crate::matcher::MatchSpec;
use crate::normalize::sys_path;
use crate::platform::add_owner_write;
use crate::walker::{EntryKind, Recursion, enumerate_tree, is_file, list_entries, path_exists};

/// Delete a file; a missing path is not an error.
pub fn remove_file(path: &Path) -> Result<()> {
    if !path_exists(path) {
        return Ok(());
    }
    fs::remove_file(sys_path(path)).map_err(io_error("remove file", path))
}

/// Delete a directory and everything below it; a missing path is not an error.
pub fn remove_dir(path: &Path) -> Result<()> {
    if !path_exists(path) {
        return Ok(());
    }
    fs::remove_dir_all(sys_path(path)).map_err(io_error("remove directory", path))
}

/// Delete files under `root` whose names match `spec`, optionally at every depth.
///
/// Returns how many were removed.
pub fn remove_matching_files(root: &Path, spec: &MatchSpec, recurse: bool) -> Result<usize> {
    let recursion = if recurse { Recursion::Full } else { Recursion::None };
    let mut removed = 0;
    for path in enumerate_tree(root, spec, recursion) {
        if is_file(&path) {
            remove_file(&path)?;
            debug!(path = %path.display(), "removed file");
            removed += 1;
        }
    }
    Ok(removed)
}

/// Delete the immediate subdirectories of `root` whose names match `spec`.
pub fn remove_matching_dirs(root: &Path, spec: &MatchSpec) -> Result<usize> {
    let mut removed = 0;
    for entry in list_entries(root, spec) {
        if entry.kind() == Some(EntryKind::Directory) {
            remove_dir(&entry.path)?;
            debug!(path = %entry.path.display(), "removed directory");
            removed += 1;
        }
    }
    Ok(removed)
}

/// Give the owner write permission on every file below `root`.
///
/// Best-effort per file; returns how many files were updated.
pub fn make_tree_writable(root: &Path) -> usize {
    let mut changed = 0;
    for entry in WalkDir::new(sys_path(root)).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        match add_owner_write(entry.path()) {
            Ok(()) => changed += 1,
            Err(e) => warn!(path = %entry.path().display(), error = %e, "cannot make writable"),
        }
    }
    changed
}

/// Rename `old` to `new`, creating the parent of `new` when missing.
pub fn rename_path(old: &Path, new: &Path) -> Result<()> {
    if let Some(parent) = new.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    fs::rename(sys_path(old), sys_path(new)).map_err(io_error("rename", old))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn removing_missing_paths_is_ok() {
        let td = tempdir().unwrap();
        remove_file(&td.path().join("nope")).unwrap();
        remove_dir(&td.path().join("nope")).unwrap();
    }

    #[test]
    fn matching_files_shallow_and_deep() {
        let td = tempdir().unwrap();
        let sub = td.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(td.path().join("a.tmp"), b"").unwrap();
        fs::write(td.path().join("keep.txt"), b"").unwrap();
        fs::write(sub.join("b.tmp"), b"").unwrap();

        let spec = MatchSpec::glob("*.tmp");
        assert_eq!(remove_matching_files(td.path(), &spec, false).unwrap(), 1);
        assert!(sub.join("b.tmp").exists());
        assert_eq!(remove_matching_files(td.path(), &spec, true).unwrap(), 1);
        assert!(!sub.join("b.tmp").exists());
        assert!(td.path().join("keep.txt").exists());
    }

    #[test]
    fn matching_dirs_only() {
        let td = tempdir().unwrap();
        fs::create_dir_all(td.path().join("cache_1").join("x")).unwrap();
        fs::write(td.path().join("cache_file"), b"").unwrap();
        fs::create_dir(td.path().join("data")).unwrap();

        let n = remove_matching_dirs(td.path(), &MatchSpec::glob("cache*")).unwrap();
        assert_eq!(n, 1);
        assert!(td.path().join("cache_file").exists());
        assert!(td.path().join("data").exists());
    }

    #[test]
    fn rename_creates_parent() {
        let td = tempdir().unwrap();
        let old = td.path().join("f");
        fs::write(&old, b"1").unwrap();
        let new = td.path().join("n").join("m").join("f");
        rename_path(&old, &new).unwrap();
        assert!(new.exists());
    }

    #[cfg(unix)]
    #[test]
    fn writable_after_pass() {
        use std::os::unix::fs::PermissionsExt;
        let td = tempdir().unwrap();
        let f = td.path().join("ro");
        fs::write(&f, b"").unwrap();
        fs::set_permissions(&f, fs::Permissions::from_mode(0o444)).unwrap();
        assert_eq!(make_tree_writable(td.path()), 1);
        assert_ne!(fs::metadata(&f).unwrap().permissions().mode() & 0o200, 0);
    }
}
