//! Single-file move into a destination directory.
//! - Rename first; across filesystems, copy through a temp file and unlink the source.
//! - If the source cannot be unlinked after a copy, the copy is removed again so
//!   the file never exists in both places.
//! - One retry with explicitly escaped paths, then give up. Never raises.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info, warn};

use super::copy::copy_via_temp;
use super::helpers::describe;
use super::util::{ensure_dir, is_cross_device};
use crate::normalize::escape_for_long_path;
use crate::walker::path_exists;

/// Move `src` into `dest_dir`, keeping its name unless `new_name` is given.
///
/// Returns true iff the target exists afterwards.
pub fn move_file(src: &Path, dest_dir: &Path, new_name: Option<&OsStr>) -> bool {
    if let Err(e) = ensure_dir(dest_dir) {
        warn!(dest = %dest_dir.display(), error = %e, "destination unavailable; file not moved");
        return false;
    }
    let Some(name) = new_name.or_else(|| src.file_name()) else {
        warn!(src = %src.display(), "source has no file name");
        return false;
    };
    let target = dest_dir.join(name);
    if !path_exists(src) {
        debug!(src = %src.display(), "source vanished before move");
        return false;
    }

    match native_move(src, &target) {
        Ok(()) => return finish(src, &target),
        Err(e) => debug!(detail = %describe("move", src, &e), "retrying with escaped paths"),
    }

    let escaped = escape_for_long_path(src).and_then(|s| Ok((s, escape_for_long_path(&target)?)));
    let (esc_src, esc_target) = match escaped {
        Ok(pair) => pair,
        Err(e) => {
            warn!(src = %src.display(), error = %e, "cannot escape paths; file not moved");
            return false;
        }
    };
    match native_move(&esc_src, &esc_target) {
        Ok(()) => finish(src, &target),
        Err(e) => {
            warn!(detail = %describe("move", src, &e), dest = %target.display(), "file not moved");
            false
        }
    }
}

fn finish(src: &Path, target: &Path) -> bool {
    let ok = path_exists(target);
    if ok {
        info!(src = %src.display(), dest = %target.display(), "moved file");
    }
    ok
}

fn native_move(src: &Path, dst: &Path) -> io::Result<()> {
    let err = match fs::rename(src, dst) {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };
    if !is_cross_device(&err) {
        return Err(err);
    }

    debug!(src = %src.display(), dst = %dst.display(), "cross-device; copying");
    copy_via_temp(src, dst)?;
    if let Err(e) = fs::remove_file(src) {
        discard_copy(src, dst);
        return Err(e);
    }
    Ok(())
}

/// Remove the copy at `dst` after the source could not be unlinked.
fn discard_copy(src: &Path, dst: &Path) -> bool {
    match fs::remove_file(dst) {
        Ok(()) => true,
        Err(e) => {
            warn!(
                detail = %describe("remove copy", dst, &e),
                src = %src.display(),
                "source kept and copy could not be removed; file now exists twice"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use tempfile::tempdir;

    #[test]
    fn moves_into_new_directory() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.txt");
        fs::write(&src, b"payload").unwrap();
        let dest = td.path().join("x").join("y");

        assert!(move_file(&src, &dest, None));
        assert!(!src.exists());
        assert_eq!(fs::read(dest.join("a.txt")).unwrap(), b"payload");
    }

    #[test]
    fn renames_when_asked() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.txt");
        fs::write(&src, b"1").unwrap();
        let name = OsString::from("b.txt");
        assert!(move_file(&src, td.path(), Some(&name)));
        assert!(td.path().join("b.txt").exists());
    }

    #[test]
    fn missing_source_is_false() {
        let td = tempdir().unwrap();
        assert!(!move_file(&td.path().join("gone"), td.path(), None));
    }

    #[test]
    fn uncreatable_destination_is_false() {
        let td = tempdir().unwrap();
        let blocker = td.path().join("blocker");
        fs::write(&blocker, b"").unwrap();
        let src = td.path().join("s");
        fs::write(&src, b"1").unwrap();
        assert!(!move_file(&src, &blocker.join("sub"), None));
        assert!(src.exists());
    }

    #[test]
    fn discarding_a_copy_reports_failure() {
        let td = tempdir().unwrap();
        let src = td.path().join("s");
        let copy = td.path().join("c");
        fs::write(&copy, b"dup").unwrap();
        assert!(discard_copy(&src, &copy));
        assert!(!copy.exists());

        let stuck = td.path().join("dir");
        fs::create_dir(&stuck).unwrap();
        assert!(!discard_copy(&src, &stuck));
        assert!(stuck.is_dir());
    }

    #[test]
    fn overwrites_existing_target() {
        let td = tempdir().unwrap();
        let dest = td.path().join("d");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("f"), b"old").unwrap();
        let src = td.path().join("f");
        fs::write(&src, b"new").unwrap();
        assert!(move_file(&src, &dest, None));
        assert_eq!(fs::read(dest.join("f")).unwrap(), b"new");
    }
}
