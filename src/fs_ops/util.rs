use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::errors::{Result, TreeError};
use crate::normalize::sys_path;
use crate::walker::path_exists;

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Hidden temp name inside `dst_dir`: ".fstree.<pid>.<nanos>.<seq>.tmp".
pub(super) fn unique_temp_path(dst_dir: &Path) -> PathBuf {
    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    dst_dir.join(format!(".fstree.{pid}.{nanos}.{seq}.tmp"))
}

pub(super) fn is_cross_device(e: &io::Error) -> bool {
    // std::io::ErrorKind::CrossesDevices is still unstable,
    // so detect EXDEV / ERROR_NOT_SAME_DEVICE via raw OS error codes.
    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            if code == libc::EXDEV {
                return true;
            }
        }
        #[cfg(windows)]
        {
            // ERROR_NOT_SAME_DEVICE
            if code == 17 {
                return true;
            }
        }
    }
    false
}

/// Create `dir` (and parents) unless it already exists.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if path_exists(dir) {
        return Ok(());
    }
    fs::create_dir_all(sys_path(dir)).map_err(|source| TreeError::PathNotCreatable {
        path: dir.to_path_buf(),
        source,
    })?;
    if path_exists(dir) {
        Ok(())
    } else {
        Err(TreeError::PathNotCreatable {
            path: dir.to_path_buf(),
            source: io::Error::from(io::ErrorKind::NotFound),
        })
    }
}

/// Sibling used by the lock probe: "<path>_file_locked_test".
pub(super) fn lock_probe_sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push("_file_locked_test");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn ensure_dir_creates_nested() {
        let td = tempdir().unwrap();
        let d = td.path().join("a").join("b");
        ensure_dir(&d).unwrap();
        assert!(d.is_dir());
        ensure_dir(&d).unwrap();
    }

    #[test]
    fn ensure_dir_under_file_fails() {
        let td = tempdir().unwrap();
        let f = td.path().join("file");
        fs::write(&f, b"x").unwrap();
        let err = ensure_dir(&f.join("sub")).unwrap_err();
        assert!(matches!(err, TreeError::PathNotCreatable { .. }));
    }

    #[test]
    fn probe_sibling_appends_suffix() {
        let p = lock_probe_sibling(Path::new("/tmp/data.bin"));
        assert_eq!(p, PathBuf::from("/tmp/data.bin_file_locked_test"));
    }

    #[test]
    fn temp_paths_are_unique() {
        let d = Path::new("/x");
        assert_ne!(unique_temp_path(d), unique_temp_path(d));
    }

    #[cfg(unix)]
    #[test]
    fn exdev_is_cross_device() {
        assert!(is_cross_device(&io::Error::from_raw_os_error(libc::EXDEV)));
        assert!(!is_cross_device(&io::Error::from(io::ErrorKind::NotFound)));
    }
}
