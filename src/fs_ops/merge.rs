//! Tree merge: move a directory's contents file by file.
//!
//! Every file is attempted even after a failure. Source subdirectories are
//! deleted only when no file failed, so a partial merge never loses data:
//! anything that could not be moved stays where it was.
//!
//! A destination equal to or inside the source is refused up front, and a
//! file whose target would land back inside the source is left in place and
//! reported, since the final subdirectory sweep would delete it.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use walkdir::WalkDir;

use super::atomic::{is_same_file, path_contains};
use super::file_move::move_file;
use super::helpers::io_error;
use super::util::ensure_dir;
use crate::errors::{Result, TreeError};
use crate::matcher::MatchSpec;
use crate::normalize::sys_path;
use crate::walker::{EntryKind, list_entries};

/// Result of a merge: the files that stayed behind, relative to the source root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    failures: Vec<PathBuf>,
}

impl MoveOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[PathBuf] {
        &self.failures
    }

    pub fn into_failures(self) -> Vec<PathBuf> {
        self.failures
    }
}

/// Move every file below `src_dir` to the same relative place below `dest_dir`.
///
/// On full success the (now file-less) subdirectories of `src_dir` are removed;
/// `src_dir` itself is kept. An unreadable subtree counts as a failure.
///
/// Fails with [`TreeError::SelfContainment`] before touching anything when
/// `dest_dir` is `src_dir` or lies below it.
pub fn merge_tree_into(src_dir: &Path, dest_dir: &Path) -> Result<MoveOutcome> {
    if path_contains(src_dir, dest_dir) || is_same_file(src_dir, dest_dir) {
        return Err(TreeError::SelfContainment {
            src: src_dir.to_path_buf(),
            dst: dest_dir.to_path_buf(),
        });
    }
    ensure_dir(dest_dir)?;
    let root = sys_path(src_dir);
    let mut outcome = MoveOutcome::default();

    // Collect first: moving while a directory is being read can skip entries.
    let mut files = Vec::new();
    for entry in WalkDir::new(&root).min_depth(1).follow_links(false) {
        match entry {
            Ok(e) if e.file_type().is_dir() => {}
            Ok(e) => files.push(e.into_path()),
            Err(e) => {
                let at = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone());
                let rel = at.strip_prefix(&root).unwrap_or(&at).to_path_buf();
                warn!(path = %at.display(), error = %e, "cannot read below source; recorded as failure");
                outcome.failures.push(rel);
            }
        }
    }

    for file in files {
        let rel = file.strip_prefix(&root).unwrap_or(&file).to_path_buf();
        let target_dir = match rel.parent() {
            Some(parent) => dest_dir.join(parent),
            None => dest_dir.to_path_buf(),
        };
        if path_contains(src_dir, &target_dir) {
            warn!(file = %rel.display(), dest = %target_dir.display(), "target lies inside the source; left in place");
            outcome.failures.push(rel);
            continue;
        }
        if !move_file(&file, &target_dir, None) {
            outcome.failures.push(rel);
        }
    }

    if !outcome.is_success() {
        warn!(
            src = %src_dir.display(),
            dest = %dest_dir.display(),
            failed = outcome.failures.len(),
            "merge incomplete; source directories kept"
        );
        return Ok(outcome);
    }

    for entry in list_entries(src_dir, &MatchSpec::any()) {
        if entry.kind() == Some(EntryKind::Directory) {
            fs::remove_dir_all(sys_path(&entry.path))
                .map_err(io_error("remove directory", &entry.path))?;
        }
    }
    info!(src = %src_dir.display(), dest = %dest_dir.display(), "merged tree");
    Ok(outcome)
}

/// Merge `src_dir` into `dest_dir/<name of src_dir>`, then delete `src_dir` if nothing failed.
pub fn replace_tree_with(src_dir: &Path, dest_dir: &Path) -> Result<MoveOutcome> {
    let name = src_dir.file_name().ok_or_else(|| TreeError::Io {
        op: "resolve directory name",
        path: src_dir.to_path_buf(),
        source: std::io::Error::from(std::io::ErrorKind::InvalidInput),
    })?;
    let target = dest_dir.join(name);

    let outcome = merge_tree_into(src_dir, &target)?;
    if outcome.is_success() {
        fs::remove_dir_all(sys_path(src_dir)).map_err(io_error("remove directory", src_dir))?;
        info!(src = %src_dir.display(), dest = %target.display(), "moved directory");
    }
    Ok(outcome)
}
