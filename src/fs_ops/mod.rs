//! Filesystem operations: moving, merging, copying and probing trees.

mod atomic;
mod copy;
mod entry;
mod file_move;
mod helpers;
mod lock;
mod merge;
mod metadata;
mod remove;
mod util;

pub use atomic::{is_same_file, path_contains, rename_overwrite, same_path_text};
pub use copy::{copy_file, copy_file_with, copy_tree, copy_tree_with};
pub use entry::move_either;
pub use file_move::move_file;
pub use lock::{find_locked_files, is_locked};
pub use merge::{MoveOutcome, merge_tree_into, replace_tree_with};
pub use remove::{
    make_tree_writable, remove_dir, remove_file, remove_matching_dirs, remove_matching_files,
    rename_path,
};
pub use util::ensure_dir;
