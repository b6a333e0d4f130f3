//! Platform-specific helpers.
//! This module hides OS differences (Unix/Windows) behind a uniform API so
//! the rest of the codebase can remain platform-agnostic.
//!
//! `Platform` is the only OS identifier the tree engine consults; pure path
//! rewriting takes it as an argument so Windows rules can be exercised anywhere.

use std::io;

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
pub use unix::{add_owner_write, create_symlink, file_identity, open_log_file_secure_append};

#[cfg(windows)]
pub use windows::{add_owner_write, create_symlink, file_identity, open_log_file_secure_append};

/// OS family the engine is running on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Legacy MAX_PATH limits, `\\?\` escaping, case-insensitive names.
    Windows,
    /// Everything else: no escaping, case-sensitive names.
    Unix,
}

impl Platform {
    /// Platform of the running process.
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    /// True when native calls need long-path escaping.
    pub fn has_long_path_limit(self) -> bool {
        matches!(self, Platform::Windows)
    }

    /// True when names compare case-insensitively by convention.
    pub fn is_case_insensitive(self) -> bool {
        matches!(self, Platform::Windows)
    }

    /// Native separator.
    pub fn separator(self) -> char {
        match self {
            Platform::Windows => '\\',
            Platform::Unix => '/',
        }
    }
}

/// Filesystem identity of an existing path (device/volume + inode/file index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId {
    pub device: u64,
    pub index: u64,
}

/// True if `e` says another process holds the file (permission or sharing violation).
pub fn is_lock_error(e: &io::Error) -> bool {
    if e.kind() == io::ErrorKind::PermissionDenied {
        return true;
    }
    #[cfg(windows)]
    {
        // ERROR_SHARING_VIOLATION / ERROR_LOCK_VIOLATION
        if let Some(code) = e.raw_os_error() {
            return code == 32 || code == 33;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_matches_target() {
        let p = Platform::current();
        assert_eq!(p == Platform::Windows, cfg!(windows));
        assert_eq!(p.separator(), std::path::MAIN_SEPARATOR);
    }

    #[test]
    fn windows_rules() {
        assert!(Platform::Windows.has_long_path_limit());
        assert!(Platform::Windows.is_case_insensitive());
        assert!(!Platform::Unix.has_long_path_limit());
        assert!(!Platform::Unix.is_case_insensitive());
    }

    #[test]
    fn permission_denied_counts_as_lock() {
        assert!(is_lock_error(&io::Error::from(io::ErrorKind::PermissionDenied)));
        assert!(!is_lock_error(&io::Error::from(io::ErrorKind::NotFound)));
    }
}
