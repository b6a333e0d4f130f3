//! Lock probe.
//!
//! A file counts as locked when it cannot be renamed to a sibling name
//! ("<path>_file_locked_test") because of a permission or sharing violation.
//! The probe renames straight back, so it needs write access to the parent
//! directory and briefly changes the file's name. Any other rename error
//! (missing file, bad path) means "not locked". If the sibling name is
//! already taken the probe is skipped and the file reported as not locked.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use super::remove::rename_path;
use super::util::lock_probe_sibling;
use crate::errors::TreeError;
use crate::normalize::sys_path;
use crate::platform::is_lock_error;
use crate::walker::path_exists;

fn locked_by(err: &TreeError) -> bool {
    match err {
        TreeError::Io { source, .. } => is_lock_error(source),
        _ => false,
    }
}

/// Probe whether `path` is held by another process.
pub fn is_locked(path: &Path) -> bool {
    let probe = lock_probe_sibling(path);
    if path_exists(&probe) {
        warn!(path = %path.display(), probe = %probe.display(), "probe name taken; lock not checked");
        return false;
    }
    if let Err(e) = rename_path(path, &probe) {
        let locked = locked_by(&e);
        debug!(path = %path.display(), locked, error = %e, "lock probe rename refused");
        return locked;
    }
    match rename_path(&probe, path) {
        Ok(()) => false,
        Err(e) => {
            warn!(path = %path.display(), probe = %probe.display(), error = %e, "file left under probe name");
            locked_by(&e)
        }
    }
}

/// Relative paths of every locked file below `root`.
pub fn find_locked_files(root: &Path) -> Vec<PathBuf> {
    let base = sys_path(root);
    WalkDir::new(&base)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| match e {
            Ok(e) => Some(e),
            Err(err) => {
                debug!(root = %root.display(), error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|e| !e.file_type().is_dir())
        .filter(|e| is_locked(e.path()))
        .map(|e| e.path().strip_prefix(&base).unwrap_or(e.path()).to_path_buf())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn free_file_is_not_locked_and_keeps_its_name() {
        let td = tempdir().unwrap();
        let f = td.path().join("free.bin");
        fs::write(&f, b"x").unwrap();
        assert!(!is_locked(&f));
        assert_eq!(fs::read(&f).unwrap(), b"x");
        assert!(!lock_probe_sibling(&f).exists());
    }

    #[test]
    fn taken_sibling_name_is_left_alone() {
        let td = tempdir().unwrap();
        let f = td.path().join("data.bin");
        fs::write(&f, b"mine").unwrap();
        let sibling = lock_probe_sibling(&f);
        fs::write(&sibling, b"someone else's").unwrap();

        assert!(!is_locked(&f));
        assert_eq!(fs::read(&f).unwrap(), b"mine");
        assert_eq!(fs::read(&sibling).unwrap(), b"someone else's");
    }

    #[test]
    fn missing_file_is_not_locked() {
        let td = tempdir().unwrap();
        assert!(!is_locked(&td.path().join("ghost")));
    }

    #[test]
    fn no_locked_files_in_plain_tree() {
        let td = tempdir().unwrap();
        fs::create_dir_all(td.path().join("a")).unwrap();
        fs::write(td.path().join("a").join("f"), b"").unwrap();
        assert!(find_locked_files(td.path()).is_empty());
    }
}
