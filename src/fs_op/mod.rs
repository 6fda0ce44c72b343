//! Filesystem primitives used by the atomic tests and the combined runner.
//!
//! Every helper performs exactly one system call worth of work and reports
//! failures as an `FsOpError` carrying a `FsErrorKind`.

pub mod attrs;
pub mod create;
pub mod error;
pub mod mv;
pub mod remove;
pub mod snapshot;
pub mod stat;

pub use error::{FsErrorKind, FsOpError, FsResult};
pub use snapshot::{snapshot, EntrySnapshot};
pub use stat::{is_dir, is_file, PathType};
