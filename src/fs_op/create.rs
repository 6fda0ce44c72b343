use std::fs;
use std::path::Path;

use crate::fs_op::error::{FsOpError, FsResult};

/// Create a zero-length file at `path`, truncating an existing one.
///
/// The parent directory is not created; a missing parent is reported as
/// `NotFound`.
pub fn create_file<P: AsRef<Path>>(path: P) -> FsResult<()> {
    let p = path.as_ref();
    tracing::debug!(path = %p.display(), "create file");
    fs::File::create(p).map_err(FsOpError::with("create", p))?;
    Ok(())
}

/// Create a single empty directory. Parents are not created.
pub fn create_dir<P: AsRef<Path>>(path: P) -> FsResult<()> {
    let p = path.as_ref();
    tracing::debug!(path = %p.display(), "mkdir");
    fs::create_dir(p).map_err(FsOpError::with("mkdir", p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs_op::error::FsErrorKind;
    use tempfile::tempdir;

    #[test]
    fn create_file_truncates() {
        let td = tempdir().unwrap();
        let file = td.path().join("f");
        fs::write(&file, b"payload").unwrap();
        create_file(&file).unwrap();
        assert_eq!(fs::metadata(&file).unwrap().len(), 0);
    }

    #[test]
    fn create_file_without_parent_fails() {
        let td = tempdir().unwrap();
        let err = create_file(td.path().join("a/b")).unwrap_err();
        assert_eq!(err.kind, FsErrorKind::NotFound);
    }

    #[test]
    fn create_dir_twice_reports_already_exists() {
        let td = tempdir().unwrap();
        let dir = td.path().join("d");
        create_dir(&dir).unwrap();
        let err = create_dir(&dir).unwrap_err();
        assert_eq!(err.kind, FsErrorKind::AlreadyExists);
        assert_eq!(err.op, "mkdir");
    }
}
