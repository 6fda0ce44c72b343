use std::collections::HashSet;
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::atomic::AtomicTests;
use crate::combined::mask::OperationMask;
use crate::config::Config;
use crate::fs_op::{FsOpError, FsResult};
use crate::report::{ProgressIndicator, Reporter};

/// A line is appended to the profiling stat file every this many creates.
pub const STAT_INTERVAL: usize = 1000;

/// Paths `<dir>/<base>1` .. `<dir>/<base>{n-1}`.
///
/// A requested size of `n` yields `n - 1` entries; numbering starts at one
/// and the count is kept that way so existing run scripts see the same
/// files.
pub fn file_set(dir: &Path, base: &str, n: usize) -> Vec<PathBuf> {
    (1..n).map(|i| dir.join(format!("{}{}", base, i))).collect()
}

/// Entries of `files` whose final component is absent from a single listing
/// of `dir`.
pub fn missing_from_listing(dir: &Path, files: &[PathBuf]) -> FsResult<Vec<PathBuf>> {
    let listing = fs::read_dir(dir)
        .and_then(|rd| {
            rd.map(|e| e.map(|e| e.file_name()))
                .collect::<std::io::Result<HashSet<OsString>>>()
        })
        .map_err(FsOpError::with("readdir", dir))?;

    Ok(files
        .iter()
        .filter(|f| match f.file_name() {
            Some(name) => !listing.contains(name),
            None => true,
        })
        .cloned()
        .collect())
}

/// Bulk create / list / delete over a generated file set.
pub struct CombinedRunner<'a> {
    config: &'a Config,
    reporter: &'a mut dyn Reporter,
    progress: &'a mut dyn ProgressIndicator,
}

impl<'a> CombinedRunner<'a> {
    pub fn new(
        config: &'a Config,
        reporter: &'a mut dyn Reporter,
        progress: &'a mut dyn ProgressIndicator,
    ) -> Self {
        CombinedRunner {
            config,
            reporter,
            progress,
        }
    }

    /// Run the phases selected by `mask`, always in create, readdir, delete
    /// order. Phases not in the mask count as passed; the result is the AND
    /// of the phases that ran.
    pub fn run(&mut self, working_dir: &Path, base: &str, n: usize, mask: OperationMask) -> bool {
        let files = file_set(working_dir, base, n);
        tracing::info!(dir = %working_dir.display(), files = files.len(), %mask, "combined run");

        let created = !mask.create || self.phase("create_files", |r| r.create_files(&files));
        let listed = !mask.readdir
            || self.phase("compare_with_dir_contents", |r| {
                r.compare_with_dir_contents(working_dir, &files)
            });
        let deleted = !mask.delete || self.phase("delete_files", |r| r.delete_files(&files));

        created && listed && deleted
    }

    fn phase<F>(&mut self, name: &str, f: F) -> bool
    where
        F: FnOnce(&mut Self) -> bool,
    {
        let passed = f(self);
        self.reporter.report(name, passed);
        passed
    }

    fn profile(&mut self, what: &str, started: Instant) {
        if self.config.profiling {
            self.reporter.profile(what, started.elapsed().as_secs_f64());
        }
    }

    fn start_progress(&mut self, verb: &str, total: usize) {
        if self.config.verbose {
            self.reporter
                .note(&format!("Trying to {} {} files", verb, total));
            self.progress.set_total(total as u64);
        }
    }

    fn step_progress(&mut self) {
        if self.config.verbose {
            self.progress.increment();
            tracing::trace!("{}", self.progress.render());
        }
    }

    fn finish_progress(&mut self) {
        if self.config.verbose {
            self.progress.finish();
        }
    }

    /// Create every file in order, stopping at the first failure.
    pub fn create_files(&mut self, files: &[PathBuf]) -> bool {
        self.start_progress("create", files.len());
        let started = Instant::now();
        let mut mark = started;

        for (i, file) in files.iter().enumerate() {
            let ok = AtomicTests::new(&mut *self.reporter).create_empty_file(file);
            self.step_progress();
            if !ok {
                self.finish_progress();
                self.reporter
                    .report_error("create_files", &format!("Failed to create file {}", file.display()));
                return false;
            }
            let count = i + 1;
            if self.config.profiling && count % STAT_INTERVAL == 0 {
                self.append_stat(count, mark.elapsed().as_secs_f64());
                mark = Instant::now();
            }
        }
        self.finish_progress();

        let secs = started.elapsed().as_secs_f64();
        let rate = if secs > 0.0 { files.len() as f64 / secs } else { 0.0 };
        self.profile(
            &format!("Creating {} files ({} per second)", files.len(), rate),
            started,
        );
        true
    }

    /// List the directory once and check every generated name is in it.
    /// All names are checked so every missing one gets reported.
    pub fn compare_with_dir_contents(&mut self, dir: &Path, files: &[PathBuf]) -> bool {
        let started = Instant::now();
        let missing = match missing_from_listing(dir, files) {
            Ok(m) => m,
            Err(e) => {
                self.reporter
                    .report_error("compare_with_dir_contents", &e.to_string());
                return false;
            }
        };
        self.profile("Reading dir contents", started);

        for f in &missing {
            self.reporter.report_error(
                "compare_with_dir_contents",
                &format!("{} was not found in the directory listing", f.display()),
            );
        }
        missing.is_empty()
    }

    /// Delete every file in order, stopping at the first failure.
    pub fn delete_files(&mut self, files: &[PathBuf]) -> bool {
        self.start_progress("delete", files.len());
        let started = Instant::now();

        for file in files {
            let ok = AtomicTests::new(&mut *self.reporter).delete_file(file);
            self.step_progress();
            if !ok {
                self.finish_progress();
                self.reporter
                    .report_error("delete_files", &format!("Failed to delete file {}", file.display()));
                return false;
            }
        }
        self.finish_progress();

        self.profile(&format!("Deleting {} files", files.len()), started);
        true
    }

    fn append_stat(&mut self, count: usize, seconds: f64) {
        let Some(path) = self.config.stat_file.as_deref() else {
            return;
        };
        let res = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut f| writeln!(f, "{},{}", count, seconds));
        if let Err(e) = res {
            tracing::warn!(path = %path.display(), "could not append profiling stats: {}", e);
        }
    }
}
