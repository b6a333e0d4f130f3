//! Core library for `fstree`.
//!
//! Cross-platform filesystem tree engine:
//! - [`normalize`]: canonical `/` separators and Windows long-path escaping
//! - [`matcher`]: glob / regex name matching
//! - [`walker`]: listing, recursive enumeration, statistics, breadth-first search
//! - [`fs_ops`]: single-file moves, tree merges, overwrite-renames, copies and lock probing
//!
//! Every operation goes straight to the filesystem; nothing is cached between calls.
//! The library only emits `tracing` events; installing a subscriber is up to the caller.

pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod matcher;
pub mod normalize;
pub mod platform;
pub mod walker;

pub use config::{Config, LogLevel, config_path, default_log_path, load_config, path_has_symlink_ancestor};
pub use errors::{Result, TreeError};
pub use fs_ops::{
    MoveOutcome, copy_file, copy_file_with, copy_tree, copy_tree_with, ensure_dir,
    find_locked_files, is_locked, is_same_file, make_tree_writable, merge_tree_into, move_either,
    move_file, path_contains, remove_dir, remove_file, remove_matching_dirs,
    remove_matching_files, rename_overwrite, rename_path, replace_tree_with, same_path_text,
};
pub use matcher::{MATCH_ALL, MatchKind, MatchSpec, NameMatcher, matches, matches_any};
pub use normalize::{
    SEPARATOR, escape_for_long_path, escape_for_long_path_on, escape_long_path_str, join_names,
    normalize, normalize_path, path_has_segment, relative_to, unescape_long_path,
    unescape_long_path_str,
};
pub use platform::Platform;
pub use walker::{
    DirEntry, DirStat, EntryKind, Recursion, TraversalResult, enumerate_tree, exists,
    file_size, find_first_match, is_dir, is_empty_directory, is_file, list_children,
    list_entries, list_tree, path_exists, stat_tree,
};
