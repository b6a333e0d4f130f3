//! Metadata preservation.
//! - Copies permissions (mode on Unix, readonly on Windows) and optionally timestamps.
//! - Best-effort: failures are logged and ignored; the primary copy still counts as done.

use filetime::{FileTime, set_file_times};
use std::fs;
use std::path::Path;
use tracing::{trace, warn};

/// Mirror permission bits of `src_meta` onto `dest`.
pub(crate) fn copy_permissions(dest: &Path, src_meta: &fs::Metadata) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let src_mode = src_meta.permissions().mode() & 0o7777;
        if let Err(e) = fs::set_permissions(dest, fs::Permissions::from_mode(src_mode)) {
            warn!(path = %dest.display(), mode = format!("{:o}", src_mode), error = %e, "failed to copy permissions");
        } else {
            trace!(path = %dest.display(), mode = format!("{:o}", src_mode), "copied permissions");
        }
    }
    #[cfg(windows)]
    {
        let ro = src_meta.permissions().readonly();
        if let Ok(meta) = fs::metadata(dest) {
            let mut perms = meta.permissions();
            perms.set_readonly(ro);
            if let Err(e) = fs::set_permissions(dest, perms) {
                warn!(path = %dest.display(), readonly = ro, error = %e, "failed to copy readonly attribute");
            }
        }
    }
}

/// Mirror access/modification times of `src_meta` onto `dest`.
pub(crate) fn copy_times(dest: &Path, src_meta: &fs::Metadata) {
    let at = FileTime::from_last_access_time(src_meta);
    let mt = FileTime::from_last_modification_time(src_meta);
    if let Err(e) = set_file_times(dest, at, mt) {
        warn!(path = %dest.display(), error = %e, "failed to set atime/mtime");
    } else {
        trace!(path = %dest.display(), "set atime/mtime");
    }
}

/// Permissions and timestamps, the way `cp -p` would.
pub(crate) fn copy_stat(dest: &Path, src_meta: &fs::Metadata) {
    // Times first: on Windows a readonly destination refuses new timestamps.
    copy_times(dest, src_meta);
    copy_permissions(dest, src_meta);
}
