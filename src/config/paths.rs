//! Default path helpers and symlink checks.
//! Determines OS-appropriate config/log paths and detects symlinked ancestors for safety.

use dirs::{config_dir, data_dir};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::CONFIG_ENV;

/// Config file to read: `$FSTREE_CONFIG` when set, else `<config dir>/fstree/config.xml`.
pub fn config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(p));
    }
    if let Some(mut base) = config_dir() {
        base.push("fstree");
        base.push("config.xml");
        Some(base)
    } else {
        env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join(".config")
                .join("fstree")
                .join("config.xml")
        })
    }
}

/// OS-appropriate log file location (data dir). Nothing is created.
pub fn default_log_path() -> Option<PathBuf> {
    data_dir().map(|base| base.join("fstree").join("fstree.log"))
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        if !anc.as_os_str().is_empty() {
            match fs::symlink_metadata(anc) {
                Ok(meta) if meta.file_type().is_symlink() => return Ok(true),
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        p = anc.parent();
    }
    Ok(false)
}
