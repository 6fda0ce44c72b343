pub mod atomic;
pub mod combined;
pub mod config;
pub mod driver;
pub mod fs_op;
pub mod logging;
pub mod report;

pub use crate::atomic::{AtomicOp, AtomicTests, TestResult};
pub use crate::combined::{CombinedRunner, OperationMask};
pub use crate::config::{Cli, Config, ConfigError, Suite};
pub use crate::driver::{Driver, RunSummary};
pub use crate::fs_op::{EntrySnapshot, FsErrorKind, FsOpError};
