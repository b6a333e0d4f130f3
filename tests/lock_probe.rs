use fstree::{find_locked_files, is_locked};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn unlocked_file_round_trips_its_name() {
    let td = tempdir().unwrap();
    let f = td.path().join("movie.mkv");
    fs::write(&f, b"frames").unwrap();
    assert!(!is_locked(&f));
    assert_eq!(fs::read(&f).unwrap(), b"frames");
    assert_eq!(fs::read_dir(td.path()).unwrap().count(), 1);
}

#[cfg(unix)]
#[test]
fn file_in_read_only_directory_is_locked() {
    use std::os::unix::fs::PermissionsExt;
    if unsafe { libc::geteuid() } == 0 {
        eprintln!("skipping: running as root");
        return;
    }
    let td = tempdir().unwrap();
    let dir = td.path().join("ro");
    fs::create_dir(&dir).unwrap();
    fs::write(dir.join("held.bin"), b"x").unwrap();
    fs::write(td.path().join("free.bin"), b"y").unwrap();
    fs::set_permissions(&dir, fs::Permissions::from_mode(0o555)).unwrap();

    assert!(is_locked(&dir.join("held.bin")));
    let locked = find_locked_files(td.path());
    assert_eq!(locked, vec![PathBuf::from("ro").join("held.bin")]);

    fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(windows)]
#[test]
fn file_open_without_sharing_is_locked() {
    use std::os::windows::fs::OpenOptionsExt;
    let td = tempdir().unwrap();
    let f = td.path().join("held.bin");
    fs::write(&f, b"x").unwrap();
    let _handle = fs::OpenOptions::new()
        .read(true)
        .share_mode(0)
        .open(&f)
        .unwrap();
    assert!(is_locked(&f));
    assert_eq!(find_locked_files(td.path()), vec![PathBuf::from("held.bin")]);
}
