use std::fs;
use std::path::Path;

use crate::fs_op::error::{FsOpError, FsResult};

/// Unlink a single non-directory entry.
///
/// Unlike a recursive remove, a missing path is an error: the harness needs
/// to know when something it expected to delete was already gone.
pub fn unlink<P: AsRef<Path>>(path: P) -> FsResult<()> {
    let p = path.as_ref();
    tracing::debug!(path = %p.display(), "unlink");
    fs::remove_file(p).map_err(FsOpError::with("unlink", p))
}

/// Remove a single empty directory.
pub fn rmdir<P: AsRef<Path>>(path: P) -> FsResult<()> {
    let p = path.as_ref();
    tracing::debug!(path = %p.display(), "rmdir");
    fs::remove_dir(p).map_err(FsOpError::with("rmdir", p))
}
