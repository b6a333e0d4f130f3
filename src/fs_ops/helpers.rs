//! I/O helper utilities.
//!
//! Provides small adapters that wrap io::Error into [`TreeError::Io`] and a
//! message builder with actionable, platform-aware hints for log lines.
//!
//! Usage:
//!   fs::create_dir_all(dir).map_err(io_error("create dir", dir))?;
//!   warn!(detail = %describe("rename", src, &e), "falling back to copy");

use std::io;
use std::path::Path;

use crate::errors::TreeError;

/// Format a human-friendly message with op/path plus platform-aware hints.
pub(crate) fn describe(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);

    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            match code {
                libc::EACCES | libc::EPERM => {
                    msg.push_str("; permission denied or file held by another process");
                }
                libc::EXDEV => {
                    msg.push_str("; cross-filesystem, atomic rename not possible");
                }
                libc::EBUSY => {
                    msg.push_str("; resource busy");
                }
                libc::ENOENT => {
                    msg.push_str("; path not found");
                }
                libc::ENOTEMPTY | libc::EEXIST => {
                    msg.push_str("; destination already exists and is not empty");
                }
                libc::EINVAL => {
                    msg.push_str("; invalid move (destination inside source?)");
                }
                libc::ENAMETOOLONG => {
                    msg.push_str("; filename or path too long");
                }
                _ => {}
            }
        }
        #[cfg(windows)]
        {
            match code {
                5 => msg.push_str("; access denied"),                   // ERROR_ACCESS_DENIED
                17 => msg.push_str("; not same device"),                // ERROR_NOT_SAME_DEVICE
                32 | 33 => msg.push_str("; file is in use"),            // SHARING / LOCK VIOLATION
                2 | 3 => msg.push_str("; path not found"),              // FILE / PATH NOT FOUND
                80 | 183 => msg.push_str("; already exists"),           // FILE_EXISTS / ALREADY_EXISTS
                206 => msg.push_str("; path too long (MAX_PATH)"),      // ERROR_FILENAME_EXCED_RANGE
                _ => {}
            }
        }
        msg.push_str(&format!(" [os code: {}]", code));
    }

    msg
}

/// Adapter for `.map_err(...)`: io::Error -> TreeError::Io tagged with op and path.
pub(crate) fn io_error<'a>(
    op: &'static str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> TreeError + 'a {
    move |source: io::Error| TreeError::Io {
        op,
        path: path.to_path_buf(),
        source,
    }
}
