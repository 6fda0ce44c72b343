//! Attribute mutators: ownership, permission bits and timestamps.
//!
//! Each helper changes exactly one attribute class so a test can restore
//! precisely what it touched from an `EntrySnapshot`.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use filetime::{set_file_times, FileTime};
use nix::unistd::{chown as nix_chown, Gid, Uid};

use crate::fs_op::error::{FsOpError, FsResult};
use crate::fs_op::snapshot::{EntrySnapshot, PERMISSION_BITS};

/// Change owner and/or group. `None` leaves that id untouched.
pub fn chown<P: AsRef<Path>>(path: P, uid: Option<u32>, gid: Option<u32>) -> FsResult<()> {
    let p = path.as_ref();
    tracing::debug!(path = %p.display(), ?uid, ?gid, "chown");
    nix_chown(p, uid.map(Uid::from_raw), gid.map(Gid::from_raw))
        .map_err(|errno| FsOpError::from(("chown", p, errno)))
}

/// Set the permission bits of `path` to exactly `mode`.
pub fn chmod<P: AsRef<Path>>(path: P, mode: u32) -> FsResult<()> {
    let p = path.as_ref();
    tracing::debug!(path = %p.display(), "chmod {:o}", mode);
    fs::set_permissions(p, fs::Permissions::from_mode(mode & PERMISSION_BITS))
        .map_err(FsOpError::with("chmod", p))
}

/// Set access and modification times.
pub fn set_times<P: AsRef<Path>>(path: P, atime: FileTime, mtime: FileTime) -> FsResult<()> {
    let p = path.as_ref();
    tracing::debug!(path = %p.display(), ?atime, ?mtime, "utime");
    set_file_times(p, atime, mtime).map_err(FsOpError::with("utime", p))
}

/// Write owner, group, mode and times from `snap` back onto `path`.
///
/// Ownership is only touched when it differs from what is on disk so an
/// unprivileged caller can restore mode and times without tripping over
/// `EPERM`.
pub fn restore<P: AsRef<Path>>(path: P, snap: &EntrySnapshot) -> FsResult<()> {
    let p = path.as_ref();
    let now = crate::fs_op::snapshot::snapshot(p)?;
    if now.uid != snap.uid || now.gid != snap.gid {
        chown(p, Some(snap.uid), Some(snap.gid))?;
    }
    if now.mode != snap.mode {
        chmod(p, snap.mode)?;
    }
    set_times(p, snap.atime, snap.mtime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs_op::snapshot::snapshot;
    use tempfile::tempdir;

    #[test]
    fn chmod_sets_exact_bits() {
        let td = tempdir().unwrap();
        let f = td.path().join("m");
        fs::write(&f, b"").unwrap();
        chmod(&f, 0o751).unwrap();
        assert_eq!(snapshot(&f).unwrap().mode, 0o751);
        chmod(&f, 0).unwrap();
        assert_eq!(snapshot(&f).unwrap().mode, 0);
    }

    #[test]
    fn set_times_to_epoch_and_back() {
        let td = tempdir().unwrap();
        let f = td.path().join("t");
        fs::write(&f, b"").unwrap();
        let before = snapshot(&f).unwrap();
        set_times(&f, FileTime::zero(), FileTime::zero()).unwrap();
        let zeroed = snapshot(&f).unwrap();
        assert_eq!(zeroed.mtime, FileTime::zero());
        assert_eq!(zeroed.atime, FileTime::zero());

        restore(&f, &before).unwrap();
        assert_eq!(snapshot(&f).unwrap(), before);
    }

    #[test]
    fn chown_to_self_is_allowed() {
        let td = tempdir().unwrap();
        let f = td.path().join("o");
        fs::write(&f, b"").unwrap();
        let snap = snapshot(&f).unwrap();
        chown(&f, Some(snap.uid), Some(snap.gid)).unwrap();
        chown(&f, None, None).unwrap();
        assert_eq!(snapshot(&f).unwrap().uid, snap.uid);
    }
}
