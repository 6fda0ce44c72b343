//! The probe: captures the attributes the atomic tests mutate so they can be
//! compared after a mutation and written back afterwards.

use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::Path;

use filetime::FileTime;

use crate::fs_op::error::{FsOpError, FsResult};

/// Mask selecting permission bits (including setuid/setgid/sticky) out of
/// `st_mode`.
pub const PERMISSION_BITS: u32 = 0o7777;

/// Owner, group, permission bits and timestamps of one entry at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntrySnapshot {
    pub uid: u32,
    pub gid: u32,
    /// Permission bits only; the file-type bits of `st_mode` are stripped.
    pub mode: u32,
    pub mtime: FileTime,
    pub atime: FileTime,
}

impl EntrySnapshot {
    pub fn from_metadata(meta: &fs::Metadata) -> Self {
        EntrySnapshot {
            uid: meta.uid(),
            gid: meta.gid(),
            mode: meta.mode() & PERMISSION_BITS,
            mtime: FileTime::from_last_modification_time(meta),
            atime: FileTime::from_last_access_time(meta),
        }
    }
}

/// Stat `path` (following symlinks) and capture its attributes.
pub fn snapshot<P: AsRef<Path>>(path: P) -> FsResult<EntrySnapshot> {
    let p = path.as_ref();
    let meta = fs::metadata(p).map_err(FsOpError::with("stat", p))?;
    Ok(EntrySnapshot::from_metadata(&meta))
}
