//! Rename with overwrite and fallback.
//! - Tries a plain rename first (replaces an existing file destination).
//! - A directory renamed onto itself under different case is a case change, not a move.
//! - On failure: symlinks are recreated, directories are copied with links preserved,
//!   files are copied with permissions and times. The source is then removed best-effort.
//! - A directory is never copied into its own subtree.

use std::fs;
use std::path::{MAIN_SEPARATOR, Path};

use tracing::{debug, info, warn};

use super::copy::copy_tree_preserving_links;
use super::helpers::{describe, io_error};
use super::metadata::copy_stat;
use crate::errors::{Result, TreeError};
use crate::normalize::{absolute_lexical, normalize, sys_path};
use crate::platform::{Platform, create_symlink};
use crate::walker::is_dir;

/// Move `src` to exactly `dst`, replacing `dst` when the platform allows.
pub fn rename_overwrite(src: &Path, dst: &Path) -> Result<()> {
    let (from, to) = (sys_path(src), sys_path(dst));

    if is_dir(dst) && is_same_file(src, dst) {
        fs::rename(&from, &to).map_err(io_error("rename", src))?;
        info!(src = %src.display(), dst = %dst.display(), "renamed (case change)");
        return Ok(());
    }

    let err = match fs::rename(&from, &to) {
        Ok(()) => {
            info!(src = %src.display(), dst = %dst.display(), "renamed");
            return Ok(());
        }
        Err(e) => e,
    };
    debug!(detail = %describe("rename", src, &err), "rename failed; falling back to copy");
    relocate_by_copy(src, dst)?;
    info!(src = %src.display(), dst = %dst.display(), "relocated by copy");
    Ok(())
}

/// Copy `src` onto `dst` by kind, then remove `src` best-effort.
fn relocate_by_copy(src: &Path, dst: &Path) -> Result<()> {
    let (from, to) = (sys_path(src), sys_path(dst));
    let meta = fs::symlink_metadata(&from).map_err(io_error("stat", src))?;
    if meta.file_type().is_symlink() {
        let link = fs::read_link(&from).map_err(io_error("read link", src))?;
        let target_is_dir = fs::metadata(&from).is_ok_and(|m| m.is_dir());
        create_symlink(&link, &to, target_is_dir).map_err(io_error("create symlink", dst))?;
        if let Err(e) = fs::remove_file(&from).or_else(|_| fs::remove_dir(&from)) {
            warn!(detail = %describe("remove link", src, &e), "link copied but original kept");
        }
    } else if meta.is_dir() {
        if path_contains(src, dst) {
            return Err(TreeError::SelfContainment {
                src: src.to_path_buf(),
                dst: dst.to_path_buf(),
            });
        }
        copy_tree_preserving_links(&from, &to)?;
        if let Err(e) = fs::remove_dir_all(&from) {
            warn!(detail = %describe("remove directory", src, &e), "tree copied but original kept");
        }
    } else {
        fs::copy(&from, &to).map_err(io_error("copy", src))?;
        copy_stat(&to, &meta);
        if let Err(e) = fs::remove_file(&from) {
            warn!(detail = %describe("remove file", src, &e), "file copied but original kept");
        }
    }
    Ok(())
}

/// True when `a` and `b` name the same filesystem object. Errors count as "different".
pub fn is_same_file(a: &Path, b: &Path) -> bool {
    #[cfg(any(unix, windows))]
    {
        use crate::platform::file_identity;
        match (file_identity(&sys_path(a)), file_identity(&sys_path(b))) {
            (Ok(x), Ok(y)) => x == y,
            _ => false,
        }
    }
    #[cfg(not(any(unix, windows)))]
    {
        same_path_text(Platform::current(), a, b)
    }
}

/// Textual comparison of the absolute forms, case-folded where `platform` ignores case.
pub fn same_path_text(platform: Platform, a: &Path, b: &Path) -> bool {
    let fold = |p: &Path| {
        let text = normalize(&absolute_lexical(p).to_string_lossy());
        if platform.is_case_insensitive() {
            text.to_lowercase()
        } else {
            text
        }
    };
    fold(a) == fold(b)
}

/// True if `child` is `parent` itself or lies below it (compared on absolute text).
pub fn path_contains(parent: &Path, child: &Path) -> bool {
    let with_sep = |p: &Path| {
        let mut s = absolute_lexical(p).to_string_lossy().into_owned();
        if !s.ends_with(MAIN_SEPARATOR) {
            s.push(MAIN_SEPARATOR);
        }
        s
    };
    with_sep(child).starts_with(&with_sep(parent))
}
