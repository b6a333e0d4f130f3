//! Copy helpers:
//! - `copy_file` / `copy_tree` duplicate into a destination directory, creating it first
//! - `copy_via_temp` copies to a temp file in the destination directory, then renames into place
//! - `copy_tree_preserving_links` recreates symlinks instead of following them and
//!   merges into directories that already exist

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use super::helpers::io_error;
use super::metadata::{copy_permissions, copy_stat, copy_times};
use super::util::{ensure_dir, unique_temp_path};
use crate::errors::{Result, TreeError};
use crate::normalize::sys_path;
use crate::platform::create_symlink;

/// Copy `src` into `dest_dir` under its own name. Permission bits follow the source.
///
/// Returns the path of the new copy.
pub fn copy_file(src: &Path, dest_dir: &Path) -> Result<PathBuf> {
    copy_file_with(src, dest_dir, false)
}

/// [`copy_file`], also carrying access/modification times when `preserve_times` is set.
pub fn copy_file_with(src: &Path, dest_dir: &Path, preserve_times: bool) -> Result<PathBuf> {
    ensure_dir(dest_dir)?;
    let name = src.file_name().ok_or_else(|| TreeError::Io {
        op: "resolve file name",
        path: src.to_path_buf(),
        source: io::Error::from(io::ErrorKind::InvalidInput),
    })?;
    let target = dest_dir.join(name);
    let (from, to) = (sys_path(src), sys_path(&target));

    fs::copy(&from, &to).map_err(io_error("copy", src))?;
    match fs::metadata(&from) {
        Ok(meta) => {
            copy_permissions(&to, &meta);
            if preserve_times {
                copy_times(&to, &meta);
            }
        }
        Err(e) => warn!(path = %src.display(), error = %e, "cannot stat source; permissions not copied"),
    }
    debug!(src = %src.display(), dest = %target.display(), "copied file");
    Ok(target)
}

/// Copy every file below `src_dir` into the same relative place under `dest_dir`.
///
/// Returns the number of files copied. Symlinked files are copied by content;
/// symlinked directories are not descended.
pub fn copy_tree(src_dir: &Path, dest_dir: &Path) -> Result<u64> {
    copy_tree_with(src_dir, dest_dir, false)
}

/// [`copy_tree`] with optional timestamp preservation.
pub fn copy_tree_with(src_dir: &Path, dest_dir: &Path, preserve_times: bool) -> Result<u64> {
    ensure_dir(dest_dir)?;
    let root = sys_path(src_dir);
    let mut copied = 0u64;

    for entry in WalkDir::new(&root).min_depth(1) {
        let entry = entry.map_err(|e| TreeError::Io {
            op: "walk directory",
            path: src_dir.to_path_buf(),
            source: io::Error::from(e),
        })?;
        let path = entry.path();
        if entry.file_type().is_dir() || fs::metadata(path).is_ok_and(|m| m.is_dir()) {
            continue;
        }
        let rel_parent = path
            .parent()
            .and_then(|p| p.strip_prefix(&root).ok())
            .unwrap_or_else(|| Path::new(""));
        copy_file_with(path, &dest_dir.join(rel_parent), preserve_times)?;
        copied += 1;
    }

    debug!(src = %src_dir.display(), dest = %dest_dir.display(), files = copied, "copied tree");
    Ok(copied)
}

/// Copy `src` to a hidden temp file beside `dest`, carry its metadata, then rename over `dest`.
///
/// `dest` never holds a partial copy; the temp file is removed on failure.
pub(super) fn copy_via_temp(src: &Path, dest: &Path) -> io::Result<()> {
    let dest_dir = dest.parent().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("destination has no parent: {}", dest.display()),
        )
    })?;
    let tmp = unique_temp_path(dest_dir);

    let result = fs::copy(src, &tmp).and_then(|_| {
        let meta = fs::metadata(src)?;
        copy_stat(&tmp, &meta);
        fs::rename(&tmp, dest)
    });
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

/// Recreate the tree at `src` under `dst`, reproducing symlinks as symlinks.
///
/// Existing directories under `dst` are merged into; existing files are replaced.
pub(super) fn copy_tree_preserving_links(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst).map_err(|source| TreeError::PathNotCreatable {
        path: dst.to_path_buf(),
        source,
    })?;

    let mut dirs = Vec::new();
    for entry in WalkDir::new(src).min_depth(1).follow_links(false) {
        let entry = entry.map_err(|e| TreeError::Io {
            op: "walk directory",
            path: src.to_path_buf(),
            source: io::Error::from(e),
        })?;
        let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(rel);
        let ft = entry.file_type();

        if ft.is_symlink() {
            let link = fs::read_link(entry.path()).map_err(io_error("read link", entry.path()))?;
            let target_is_dir = fs::metadata(entry.path()).is_ok_and(|m| m.is_dir());
            if fs::symlink_metadata(&target).is_ok() {
                let _ = fs::remove_file(&target).or_else(|_| fs::remove_dir(&target));
            }
            create_symlink(&link, &target, target_is_dir)
                .map_err(io_error("create symlink", &target))?;
        } else if ft.is_dir() {
            fs::create_dir_all(&target).map_err(|source| TreeError::PathNotCreatable {
                path: target.clone(),
                source,
            })?;
            dirs.push((entry.path().to_path_buf(), target));
        } else {
            fs::copy(entry.path(), &target).map_err(io_error("copy", entry.path()))?;
            if let Ok(meta) = entry.metadata() {
                copy_stat(&target, &meta);
            }
        }
    }

    // Directory metadata last: a read-only copy would refuse its own children.
    for (from, to) in dirs.iter().rev() {
        if let Ok(meta) = fs::metadata(from) {
            copy_stat(to, &meta);
        }
    }
    if let Ok(meta) = fs::metadata(src) {
        copy_stat(dst, &meta);
    }
    Ok(())
}
