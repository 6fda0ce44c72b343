use std::io::{self, Write};

use console::style;

/// Sink for everything the harness wants a human to see.
///
/// The core never formats for the console itself; it only describes what
/// happened through these calls.
pub trait Reporter {
    /// Outcome of one named test.
    fn report(&mut self, name: &str, passed: bool);

    /// A failing operation and the text of the underlying error.
    fn report_error(&mut self, operation: &str, error: &str);

    /// Free-form line: run headers, verbose announcements.
    fn note(&mut self, line: &str);

    /// Timing of a phase. Advisory only.
    fn profile(&mut self, what: &str, seconds: f64) {
        self.note(&format_profile(what, seconds));
    }
}

pub fn format_profile(what: &str, seconds: f64) -> String {
    format!("[profiling]\t {} took {} seconds", what, seconds)
}

/// Plain-text form of a result line, as written to the log file.
pub fn format_result(name: &str, passed: bool) -> String {
    if passed {
        format!("[passed]\t{}", name)
    } else {
        format!("[failed]\t{}", name)
    }
}

/// Prints coloured pass/fail lines. Colours are dropped automatically when
/// the output is not a terminal.
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        ConsoleReporter { out: io::stdout() }
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        ConsoleReporter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text) {
            tracing::warn!("failed to write report line: {}", e);
        }
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn report(&mut self, name: &str, passed: bool) {
        let tag = if passed {
            style("[passed]").green()
        } else {
            style("[failed]").red()
        };
        self.line(&format!("{}\t{}", tag, name));
    }

    fn report_error(&mut self, operation: &str, error: &str) {
        self.line(&format!("{}: {}", operation, error));
    }

    fn note(&mut self, line: &str) {
        self.line(line);
    }
}

/// Keeps every call in memory. Used by tests and by embedders that want to
/// inspect results after a run.
#[derive(Debug, Default, Clone)]
pub struct RecordingReporter {
    pub results: Vec<(String, bool)>,
    pub errors: Vec<(String, String)>,
    pub notes: Vec<String>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors reported for `operation`, in order.
    pub fn errors_for(&self, operation: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|(op, _)| op == operation)
            .map(|(_, e)| e.as_str())
            .collect()
    }

    pub fn failed(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|(_, passed)| !passed)
            .map(|(n, _)| n.as_str())
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn report(&mut self, name: &str, passed: bool) {
        self.results.push((name.to_string(), passed));
    }

    fn report_error(&mut self, operation: &str, error: &str) {
        self.errors.push((operation.to_string(), error.to_string()));
    }

    fn note(&mut self, line: &str) {
        self.notes.push(line.to_string());
    }
}
