//! Unix implementations of platform helpers.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::os::unix::fs::{MetadataExt, OpenOptionsExt, PermissionsExt};
use std::path::Path;

use super::FileId;

/// Open log file for appending; set 0600 only when creating a new file.
/// If the file already exists, we preserve its existing permissions to avoid
/// clobbering administrator adjustments (e.g. group-readable for log shipping).
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let existed = path.exists();
    let f = OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o600) // applies on create
        .open(path)?;
    if !existed {
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(f)
}

/// (st_dev, st_ino) of `path`, following symlinks.
pub fn file_identity(path: &Path) -> io::Result<FileId> {
    let meta = fs::metadata(path)?;
    Ok(FileId {
        device: meta.dev(),
        index: meta.ino(),
    })
}

/// Create `link` pointing at `target`. Directory-ness is irrelevant on Unix.
pub fn create_symlink(target: &Path, link: &Path, _target_is_dir: bool) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

/// chmod u+w, keeping every other bit.
pub fn add_owner_write(path: &Path) -> io::Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o200);
    fs::set_permissions(path, perms)
}
