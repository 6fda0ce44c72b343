use std::fs;
use std::path::Path;

/// Kind of entry found at a path, following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathType {
    /// Nothing could be stat'ed at the path.
    Missing,
    Directory,
    File,
    /// Exists but is neither a regular file nor a directory (FIFO, socket,
    /// device node, ...).
    Other,
}

impl PathType {
    /// Classify `path` with a single `stat` call.
    pub fn of<P: AsRef<Path>>(path: P) -> Self {
        match fs::metadata(path.as_ref()) {
            Err(_) => PathType::Missing,
            Ok(meta) if meta.is_dir() => PathType::Directory,
            Ok(meta) if meta.is_file() => PathType::File,
            Ok(_) => PathType::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PathType::Missing => "missing",
            PathType::Directory => "directory",
            PathType::File => "file",
            PathType::Other => "other",
        }
    }
}

/// Return `true` if the provided `path` is a directory.
pub fn is_dir<P: AsRef<Path>>(path: P) -> bool {
    PathType::of(path) == PathType::Directory
}

/// Return `true` if the provided `path` is a regular file.
pub fn is_file<P: AsRef<Path>>(path: P) -> bool {
    PathType::of(path) == PathType::File
}
