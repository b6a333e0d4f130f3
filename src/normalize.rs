//! Path normalization and long-path escaping.
//!
//! Paths are kept with `/` as the one canonical separator; the native form is
//! produced only at the filesystem boundary. On Windows every native call goes
//! through [`escape_for_long_path`] so that paths longer than MAX_PATH work:
//! - `\\?\...` is already escaped and left alone
//! - `\\server\share\...` (or `//server/...`) becomes `\\?\UNC\server\share\...`
//! - anything else becomes `\\?\C:\...`
//!
//! The escaped form is never stored; callers escape right before a syscall.

use std::path::{Component, Path, PathBuf};

use crate::errors::{Result, TreeError};
use crate::platform::Platform;

/// Canonical separator used for every in-memory path.
pub const SEPARATOR: char = '/';

const VERBATIM: &str = r"\\?\";
const VERBATIM_UNC: &str = r"\\?\UNC\";

/// Replace every `\` with `/`. Idempotent.
pub fn normalize(path: &str) -> String {
    path.replace('\\', "/")
}

/// [`normalize`] for `Path` values; non UTF-8 paths are returned untouched.
pub fn normalize_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(normalize(s)),
        None => path.to_path_buf(),
    }
}

/// Rewrite an absolute path into its long-path-safe form for `platform`.
pub fn escape_long_path_str(platform: Platform, absolute: &str) -> String {
    if !platform.has_long_path_limit() {
        return absolute.to_string();
    }
    if absolute.starts_with(r"\\?") {
        return absolute.to_string();
    }
    if absolute.starts_with("//?/") {
        return absolute.replace('/', "\\");
    }
    if let Some(rest) = absolute
        .strip_prefix(r"\\")
        .or_else(|| absolute.strip_prefix("//"))
    {
        return format!("{VERBATIM_UNC}{rest}").replace('/', "\\");
    }
    format!("{VERBATIM}{absolute}").replace('/', "\\")
}

/// Undo [`escape_long_path_str`]. No-op for unescaped input or other platforms.
pub fn unescape_long_path_str(platform: Platform, path: &str) -> String {
    if !platform.has_long_path_limit() {
        return path.to_string();
    }
    if let Some(rest) = path.strip_prefix(VERBATIM_UNC) {
        return format!(r"\\{rest}");
    }
    if let Some(rest) = path.strip_prefix(VERBATIM) {
        return rest.to_string();
    }
    path.to_string()
}

/// Absolute, long-path-safe form of `path` for the running platform.
///
/// An empty path yields [`TreeError::NullPath`].
pub fn escape_for_long_path(path: &Path) -> Result<PathBuf> {
    escape_for_long_path_on(Platform::current(), path)
}

/// [`escape_for_long_path`] with an explicit platform.
pub fn escape_for_long_path_on(platform: Platform, path: &Path) -> Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(TreeError::NullPath);
    }
    let absolute = std::path::absolute(path).map_err(|source| TreeError::Io {
        op: "resolve absolute path",
        path: path.to_path_buf(),
        source,
    })?;
    if !platform.has_long_path_limit() {
        return Ok(absolute);
    }
    match absolute.to_str() {
        Some(s) => Ok(PathBuf::from(escape_long_path_str(platform, s))),
        None => Ok(absolute),
    }
}

/// Strip long-path escaping so tools that cannot read `\\?\` paths can consume `path`.
pub fn unescape_long_path(path: &Path) -> PathBuf {
    let platform = Platform::current();
    match path.to_str() {
        Some(s) => PathBuf::from(unescape_long_path_str(platform, s)),
        None => path.to_path_buf(),
    }
}

/// Native form for an immediate syscall; falls back to `path` itself when it cannot be resolved.
pub(crate) fn sys_path(path: &Path) -> PathBuf {
    escape_for_long_path(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Absolute form of `path` with `.` and `..` folded away lexically (no symlink resolution).
pub(crate) fn absolute_lexical(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Join `parts` onto `base` with the canonical separator.
/// A leading separator on a part is dropped and empty parts are skipped.
pub fn join_names<I, S>(base: &str, parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut result = base.trim_end_matches(['/', '\\']).to_string();
    for part in parts {
        let part = part.as_ref();
        let part = part
            .strip_prefix('/')
            .or_else(|| part.strip_prefix('\\'))
            .unwrap_or(part);
        if part.is_empty() {
            continue;
        }
        if result.is_empty() {
            result = part.to_string();
        } else {
            result.push(SEPARATOR);
            result.push_str(part);
        }
    }
    result
}

/// `path` relative to `root`, or `path` unchanged when it is not under `root`.
pub fn relative_to(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}

/// True if any component of `path` equals `segment`, ignoring ASCII case.
pub fn path_has_segment(path: &Path, segment: &str) -> bool {
    let normalized = normalize_path(path);
    normalized.components().any(|c| match c {
        Component::Normal(name) => name
            .to_str()
            .is_some_and(|n| n.eq_ignore_ascii_case(segment)),
        _ => false,
    })
}
