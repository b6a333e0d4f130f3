//! Move a path of either kind into a destination directory.

use std::path::Path;

use tracing::warn;

use super::file_move::move_file;
use super::merge::replace_tree_with;
use crate::walker::is_dir;

/// Directories go through [`replace_tree_with`], everything else through [`move_file`].
///
/// True iff nothing was left behind.
pub fn move_either(path: &Path, dest_dir: &Path) -> bool {
    if !is_dir(path) {
        return move_file(path, dest_dir, None);
    }
    match replace_tree_with(path, dest_dir) {
        Ok(outcome) => {
            for rel in outcome.failures() {
                warn!(src = %path.display(), file = %rel.display(), "not moved");
            }
            outcome.is_success()
        }
        Err(e) => {
            warn!(src = %path.display(), dest = %dest_dir.display(), error = %e, "directory not moved");
            false
        }
    }
}
