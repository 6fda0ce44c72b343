use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Classification of a failed filesystem operation.
///
/// Callers match on the kind rather than on the shape of the underlying
/// OS error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsErrorKind {
    NotFound,
    PermissionDenied,
    AlreadyExists,
    InvalidArgument,
    Unexpected,
}

impl FsErrorKind {
    /// Map a `std::io::ErrorKind` onto the harness taxonomy.
    pub fn classify(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => FsErrorKind::NotFound,
            io::ErrorKind::PermissionDenied => FsErrorKind::PermissionDenied,
            io::ErrorKind::AlreadyExists => FsErrorKind::AlreadyExists,
            io::ErrorKind::InvalidInput | io::ErrorKind::InvalidData => {
                FsErrorKind::InvalidArgument
            }
            _ => FsErrorKind::Unexpected,
        }
    }
}

/// Error produced by every primitive in `fs_op`.
#[derive(Error, Debug)]
#[error("{op} `{}`: {source}", path.display())]
pub struct FsOpError {
    pub kind: FsErrorKind,
    /// Name of the primitive that failed (`rename`, `chown`, ...).
    pub op: &'static str,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl FsOpError {
    pub fn new(op: &'static str, path: &Path, source: io::Error) -> Self {
        FsOpError {
            kind: FsErrorKind::classify(source.kind()),
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Adapter for `map_err` that captures the operation name and path.
    pub fn with<'a>(op: &'static str, path: &'a Path) -> impl FnOnce(io::Error) -> FsOpError + 'a {
        move |source| FsOpError::new(op, path, source)
    }
}

impl From<(&'static str, &Path, nix::errno::Errno)> for FsOpError {
    fn from((op, path, errno): (&'static str, &Path, nix::errno::Errno)) -> Self {
        FsOpError::new(op, path, io::Error::from(errno))
    }
}

pub type FsResult<T> = Result<T, FsOpError>;
