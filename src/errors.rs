//! Typed error definitions for fstree.
//! Provides a small set of well-known failure modes for better logs and tests.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Path is empty; nothing to resolve")]
    NullPath,

    #[error("Cannot create directory {}: {source}", path.display())]
    PathNotCreatable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "Cannot move '{}' into '{}': destination lies inside the source directory",
        src.display(),
        dst.display()
    )]
    SelfContainment { src: PathBuf, dst: PathBuf },

    #[error("{op} '{}': {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TreeError {
    /// Stable numeric code for structured logs.
    pub fn code(&self) -> u8 {
        match self {
            TreeError::NullPath => 1,
            TreeError::PathNotCreatable { .. } => 2,
            TreeError::SelfContainment { .. } => 3,
            TreeError::Io { .. } => 4,
        }
    }

    /// Underlying io::Error kind, when there is one.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            TreeError::PathNotCreatable { source, .. } | TreeError::Io { source, .. } => {
                Some(source.kind())
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TreeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_containment_message_names_both_paths() {
        let e = TreeError::SelfContainment {
            src: PathBuf::from("/a"),
            dst: PathBuf::from("/a/sub"),
        };
        let msg = e.to_string();
        assert!(msg.contains("/a/sub"));
        assert_eq!(e.code(), 3);
        assert!(e.io_kind().is_none());
    }

    #[test]
    fn io_kind_is_exposed() {
        let e = TreeError::Io {
            op: "rename",
            path: PathBuf::from("x"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert_eq!(e.io_kind(), Some(io::ErrorKind::PermissionDenied));
    }
}
