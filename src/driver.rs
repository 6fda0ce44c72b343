//! Sequences the suites, loops them and forwards every outcome to the
//! reporter and the run log.

use crate::atomic::{run_test, AtomicTests, TestResult, DIR_SEQUENCE, FILE_SEQUENCE};
use crate::combined::CombinedRunner;
use crate::config::{Config, Suite};
use crate::report::reporter::format_result;
use crate::report::{Logger, ProgressIndicator, Reporter};

/// Every result of a run, in execution order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub iterations: u32,
    pub results: Vec<TestResult>,
}

impl RunSummary {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }
}

pub struct Driver<'a> {
    config: &'a Config,
    reporter: &'a mut dyn Reporter,
    progress: &'a mut dyn ProgressIndicator,
    logger: &'a mut dyn Logger,
}

impl<'a> Driver<'a> {
    pub fn new(
        config: &'a Config,
        reporter: &'a mut dyn Reporter,
        progress: &'a mut dyn ProgressIndicator,
        logger: &'a mut dyn Logger,
    ) -> Self {
        Driver {
            config,
            reporter,
            progress,
            logger,
        }
    }

    /// Run the configured suite `loop_count` times. Iterations share
    /// nothing but the working directory.
    pub fn run(&mut self) -> RunSummary {
        let header = match self.config.suite {
            Suite::Quick => format!(
                "Performing quick run on: {}\n",
                self.config.directory.display()
            ),
            Suite::Combined { .. } => format!(
                "Performing combined test run on: {}\n",
                self.config.directory.display()
            ),
        };
        self.reporter.note(&header);
        self.logger.append(header.trim_end());

        let mut summary = RunSummary::default();
        for iteration in 0..self.config.loop_count {
            tracing::debug!(iteration, "starting iteration");
            match self.config.suite {
                Suite::Quick => summary.results.extend(self.basic_suite()),
                Suite::Combined { files } => summary.results.push(self.combined_suite(files)),
            }
            summary.iterations += 1;
        }

        tracing::info!(
            iterations = summary.iterations,
            passed = summary.passed(),
            failed = summary.failed(),
            "run finished"
        );
        summary
    }

    /// File sequence then directory sequence, both on `<dir>/<basename>`.
    pub fn basic_suite(&mut self) -> Vec<TestResult> {
        let target = self.config.directory.join(&self.config.basename);
        let mut results = Vec::with_capacity(FILE_SEQUENCE.len() + DIR_SEQUENCE.len());

        for op in FILE_SEQUENCE.iter().chain(DIR_SEQUENCE.iter()) {
            let result = run_test(&mut *self.reporter, op.name(), |rep| {
                op.run(&mut AtomicTests::new(rep), &target)
            });
            self.logger.append(&format_result(&result.name, result.passed));
            results.push(result);
        }
        results
    }

    /// One combined workload with the configured mask, reported as
    /// `combined_test_run(<n>)`.
    pub fn combined_suite(&mut self, n: usize) -> TestResult {
        let name = format!("combined_test_run({})", n);
        let passed = CombinedRunner::new(self.config, &mut *self.reporter, &mut *self.progress).run(
            &self.config.directory,
            &self.config.basename,
            n,
            self.config.mask,
        );
        self.reporter.report(&name, passed);
        self.logger.append(&format_result(&name, passed));
        TestResult { name, passed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{MemoryLogger, NullProgress, RecordingReporter};
    use tempfile::tempdir;

    #[test]
    fn zero_loops_runs_nothing() {
        let td = tempdir().unwrap();
        let cfg = Config {
            directory: td.path().to_path_buf(),
            loop_count: 0,
            ..Config::default()
        };
        let mut rep = RecordingReporter::new();
        let mut prog = NullProgress::default();
        let mut log = MemoryLogger::default();
        let summary = Driver::new(&cfg, &mut rep, &mut prog, &mut log).run();
        assert_eq!(summary.iterations, 0);
        assert!(summary.results.is_empty());
        assert!(rep.results.is_empty());
        assert_eq!(log.lines.len(), 1);
    }

    #[test]
    fn basic_suite_order_and_cleanup() {
        let td = tempdir().unwrap();
        let cfg = Config {
            directory: td.path().to_path_buf(),
            ..Config::default()
        };
        let mut rep = RecordingReporter::new();
        let mut prog = NullProgress::default();
        let mut log = MemoryLogger::default();
        let summary = Driver::new(&cfg, &mut rep, &mut prog, &mut log).run();

        let names: Vec<&str> = summary.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "create_empty_file",
                "move_file",
                "change_times",
                "change_owner",
                "change_group",
                "change_permissions",
                "delete_file",
                "create_empty_dir",
                "move_file",
                "change_times",
                "change_owner",
                "change_group",
                "change_permissions",
                "delete_dir",
            ]
        );
        for r in &summary.results {
            if !r.name.starts_with("change_owner") && !r.name.starts_with("change_group") {
                assert!(r.passed, "{} failed: {:?}", r.name, rep.errors);
            }
        }
        assert_eq!(std::fs::read_dir(td.path()).unwrap().count(), 0);
        assert_eq!(log.lines[0], format!("Performing quick run on: {}", td.path().display()));
        assert_eq!(log.lines[1], "[passed]\tcreate_empty_file");
        assert_eq!(log.lines.len(), 15);
    }

    #[test]
    fn combined_suite_loops() {
        let td = tempdir().unwrap();
        let cfg = Config {
            directory: td.path().to_path_buf(),
            suite: Suite::Combined { files: 5 },
            loop_count: 3,
            ..Config::default()
        };
        let mut rep = RecordingReporter::new();
        let mut prog = NullProgress::default();
        let mut log = MemoryLogger::default();
        let summary = Driver::new(&cfg, &mut rep, &mut prog, &mut log).run();
        assert_eq!(summary.iterations, 3);
        assert_eq!(summary.results.len(), 3);
        assert!(summary.all_passed());
        assert!(summary
            .results
            .iter()
            .all(|r| r.name == "combined_test_run(5)"));
        assert_eq!(rep.notes[0], format!("Performing combined test run on: {}\n", td.path().display()));
    }
}
