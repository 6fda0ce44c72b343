use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// Append-only run log.
pub trait Logger {
    fn append(&mut self, line: &str);
}

/// `<timestamp>\t<line>` with a local ISO-8601 timestamp (microseconds).
pub fn timestamped(at: DateTime<Local>, line: &str) -> String {
    format!("{}\t{}", at.format("%Y-%m-%dT%H:%M:%S%.6f"), line)
}

/// Appends each line to a file, opening it per write so the log stays
/// readable while a long run is in progress.
#[derive(Debug, Clone)]
pub struct FileLogger {
    path: PathBuf,
}

impl FileLogger {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        FileLogger {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Logger for FileLogger {
    fn append(&mut self, line: &str) {
        let entry = timestamped(Local::now(), line);
        let res = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut f| writeln!(f, "{}", entry));
        if let Err(e) = res {
            tracing::warn!(path = %self.path.display(), "could not append to log: {}", e);
        }
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn append(&mut self, _line: &str) {}
}

/// Keeps lines in memory, untimestamped.
#[derive(Debug, Default, Clone)]
pub struct MemoryLogger {
    pub lines: Vec<String>,
}

impl Logger for MemoryLogger {
    fn append(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    #[test]
    fn timestamp_format() {
        let at = Local.with_ymd_and_hms(2011, 8, 12, 9, 30, 0).unwrap();
        assert_eq!(timestamped(at, "hello"), "2011-08-12T09:30:00.000000\thello");
    }

    #[test]
    fn file_logger_appends() {
        let td = tempdir().unwrap();
        let path = td.path().join("run.log");
        std::fs::write(&path, "existing\n").unwrap();

        let mut log = FileLogger::new(&path);
        log.append("[passed]\tcreate_empty_file");
        log.append("[failed]\tdelete_dir");

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "existing");
        assert!(lines[1].ends_with("\t[passed]\tcreate_empty_file"));
        assert!(lines[2].ends_with("\t[failed]\tdelete_dir"));
    }

    #[test]
    fn file_logger_unwritable_is_silent() {
        let td = tempdir().unwrap();
        let mut log = FileLogger::new(td.path().join("missing/dir/run.log"));
        log.append("ignored");
        assert!(!log.path().exists());
    }
}
