//! Tree enumeration and statistics.
//!
//! Every listing goes straight to the filesystem: nothing is cached, so each
//! call sees the tree as it is at call time. Children are visited in the
//! order the OS returns them. Descent is depth-first, except
//! [`find_first_match`] which is breadth-first.

use std::collections::VecDeque;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::errors::{Result, TreeError};
use crate::matcher::{MatchSpec, NameMatcher};
use crate::normalize::sys_path;

/// Classification of an existing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One immediate child of a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: OsString,
    pub path: PathBuf,
}

impl DirEntry {
    /// Stat the entry now (following symlinks). `None` if it vanished or cannot be read.
    pub fn kind(&self) -> Option<EntryKind> {
        probe_kind(&self.path)
    }
}

/// Ordered full paths produced by [`enumerate_tree`].
pub type TraversalResult = Vec<PathBuf>;

/// How [`enumerate_tree`] descends below the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Recursion {
    /// Immediate children only.
    #[default]
    None,
    /// Descend only into directories that themselves matched the pattern.
    PatternConstrained,
    /// Descend into every directory; the pattern only filters what is reported.
    Full,
}

/// Counts accumulated by [`stat_tree`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirStat {
    pub subdirectories: u64,
    pub files: u64,
    pub bytes: u64,
}

/// Stat `path` through its escaped form and classify it.
pub fn probe_kind(path: &Path) -> Option<EntryKind> {
    let meta = fs::metadata(sys_path(path)).ok()?;
    if meta.is_dir() {
        Some(EntryKind::Directory)
    } else {
        Some(EntryKind::File)
    }
}

/// True if anything exists at `path`.
pub fn path_exists(path: &Path) -> bool {
    !path.as_os_str().is_empty() && fs::metadata(sys_path(path)).is_ok()
}

pub fn is_dir(path: &Path) -> bool {
    probe_kind(path) == Some(EntryKind::Directory)
}

pub fn is_file(path: &Path) -> bool {
    fs::metadata(sys_path(path)).is_ok_and(|m| m.is_file())
}

/// Size in bytes of `path`.
pub fn file_size(path: &Path) -> Result<u64> {
    fs::metadata(sys_path(path))
        .map(|m| m.len())
        .map_err(|source| TreeError::Io {
            op: "stat",
            path: path.to_path_buf(),
            source,
        })
}

/// Immediate children of `path` whose names match `spec`.
///
/// A missing or unreadable directory yields an empty list.
pub fn list_entries(path: &Path, spec: &MatchSpec) -> Vec<DirEntry> {
    if !path_exists(path) {
        return Vec::new();
    }
    let rd = match fs::read_dir(sys_path(path)) {
        Ok(rd) => rd,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot list directory");
            return Vec::new();
        }
    };

    let names = rd.filter_map(|e| match e {
        Ok(e) => Some(e.file_name()),
        Err(err) => {
            debug!(path = %path.display(), error = %err, "skipping unreadable entry");
            None
        }
    });

    let to_entry = |name: OsString| DirEntry {
        path: path.join(&name),
        name,
    };

    if spec.is_any() {
        return names.map(to_entry).collect();
    }
    let matcher = spec.compile();
    names
        .filter(|n| matcher.is_match(n))
        .map(to_entry)
        .collect()
}

/// Bare names of the immediate children of `path` matching `spec`.
pub fn list_children(path: &Path, spec: &MatchSpec) -> Vec<OsString> {
    list_entries(path, spec)
        .into_iter()
        .map(|e| e.name)
        .collect()
}

/// True iff `path` has at least one child matching `spec`.
pub fn exists(path: &Path, spec: &MatchSpec) -> bool {
    !list_children(path, spec).is_empty()
}

/// Full paths of entries under `path` matching `spec`, using the given recursion policy.
///
/// Empty when `path` is not a directory.
pub fn enumerate_tree(path: &Path, spec: &MatchSpec, recursion: Recursion) -> TraversalResult {
    let mut out = Vec::new();
    if !is_dir(path) {
        return out;
    }
    match recursion {
        Recursion::None => collect_level(path, spec, &mut out),
        Recursion::PatternConstrained => collect_constrained(path, spec, &mut out),
        Recursion::Full => collect_full(path, spec, &mut out),
    }
    out
}

fn collect_level(path: &Path, spec: &MatchSpec, out: &mut TraversalResult) {
    out.extend(list_entries(path, spec).into_iter().map(|e| e.path));
}

fn collect_constrained(path: &Path, spec: &MatchSpec, out: &mut TraversalResult) {
    for entry in list_entries(path, spec) {
        let descend = entry.kind() == Some(EntryKind::Directory);
        out.push(entry.path.clone());
        if descend {
            collect_constrained(&entry.path, spec, out);
        }
    }
}

fn collect_full(path: &Path, spec: &MatchSpec, out: &mut TraversalResult) {
    collect_level(path, spec, out);
    for entry in list_entries(path, &MatchSpec::any()) {
        if entry.kind() == Some(EntryKind::Directory) {
            collect_full(&entry.path, spec, out);
        }
    }
}

/// Every entry matching `spec` at every depth, descending into all directories.
///
/// With `full_paths` false only bare names are returned.
pub fn list_tree(path: &Path, spec: &MatchSpec, full_paths: bool) -> Vec<PathBuf> {
    let found = enumerate_tree(path, spec, Recursion::Full);
    if full_paths {
        return found;
    }
    found
        .into_iter()
        .filter_map(|p| p.file_name().map(PathBuf::from))
        .collect()
}

/// Directory/file counts and byte total of the entries under `path` matching `spec`.
///
/// With `recurse`, matching subdirectories are descended (same rule as
/// [`Recursion::PatternConstrained`]). A plain file reports `(0, 1, size)`.
pub fn stat_tree(path: &Path, spec: &MatchSpec, recurse: bool) -> Result<DirStat> {
    if !is_dir(path) {
        return Ok(DirStat {
            subdirectories: 0,
            files: 1,
            bytes: file_size(path)?,
        });
    }
    let mut stat = DirStat::default();
    accumulate(path, spec, recurse, &mut stat)?;
    Ok(stat)
}

fn accumulate(path: &Path, spec: &MatchSpec, recurse: bool, stat: &mut DirStat) -> Result<()> {
    for entry in list_entries(path, spec) {
        match entry.kind() {
            Some(EntryKind::Directory) => {
                stat.subdirectories += 1;
                if recurse {
                    accumulate(&entry.path, spec, recurse, stat)?;
                }
            }
            Some(EntryKind::File) => match file_size(&entry.path) {
                Ok(len) => {
                    stat.files += 1;
                    stat.bytes += len;
                }
                Err(e) => debug!(path = %entry.path.display(), error = %e, "entry gone before stat; not counted"),
            },
            None => debug!(path = %entry.path.display(), "entry gone or dangling; not counted"),
        }
    }
    Ok(())
}

/// Shallowest entry under `path` matching `spec`.
///
/// Each level is checked across the whole frontier before any deeper level;
/// within a directory the first match in listing order wins.
pub fn find_first_match(path: &Path, spec: &MatchSpec) -> Option<PathBuf> {
    if spec.is_any() {
        return list_entries(path, spec).into_iter().next().map(|e| e.path);
    }
    let matcher: NameMatcher = spec.compile();
    let mut frontier: VecDeque<PathBuf> = VecDeque::new();
    if is_dir(path) {
        frontier.push_back(path.to_path_buf());
    }

    while !frontier.is_empty() {
        let mut next = VecDeque::new();
        for dir in frontier.drain(..) {
            let children = list_entries(&dir, &MatchSpec::any());
            if let Some(hit) = children.iter().find(|e| matcher.is_match(&e.name)) {
                debug!(root = %path.display(), found = %hit.path.display(), "first match");
                return Some(hit.path.clone());
            }
            next.extend(
                children
                    .into_iter()
                    .filter(|e| e.kind() == Some(EntryKind::Directory))
                    .map(|e| e.path),
            );
        }
        frontier = next;
    }
    None
}

/// True iff the tree under `path` holds no files at any depth.
pub fn is_empty_directory(path: &Path) -> Result<bool> {
    let rd = fs::read_dir(sys_path(path)).map_err(|source| TreeError::Io {
        op: "list directory",
        path: path.to_path_buf(),
        source,
    })?;
    for entry in rd {
        let entry = entry.map_err(|source| TreeError::Io {
            op: "read directory entry",
            path: path.to_path_buf(),
            source,
        })?;
        let child = path.join(entry.file_name());
        if !is_dir(&child) || !is_empty_directory(&child)? {
            return Ok(false);
        }
    }
    Ok(true)
}
