use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::fs_op::error::{FsOpError, FsResult};

/// Return `path` with `suffix` appended to its final component
/// (`/dir/name` + `-moved` -> `/dir/name-moved`).
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_os_string();
    raw.push(suffix);
    PathBuf::from(raw)
}

/// Rename `src` to `dst` with a single `rename(2)`. No copy fallback: a
/// cross-device move is a failure for the harness, not something to paper
/// over.
pub fn rename<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> FsResult<()> {
    let s = src.as_ref();
    let d = dst.as_ref();
    tracing::debug!(from = %s.display(), to = %d.display(), "rename");
    fs::rename(s, d).map_err(FsOpError::with("rename", s))
}
