//! Collaborator capabilities the core talks to: result reporting, progress
//! and the append-only log. Console formatting lives only here.

pub mod logger;
pub mod progress;
pub mod reporter;

pub use logger::{FileLogger, Logger, MemoryLogger, NullLogger};
pub use progress::{BarProgress, NullProgress, ProgressIndicator};
pub use reporter::{ConsoleReporter, RecordingReporter, Reporter};
