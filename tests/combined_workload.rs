use std::fs;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use fsbasics::combined::file_set;
use fsbasics::report::{NullProgress, RecordingReporter, Reporter};
use fsbasics::{CombinedRunner, Config, OperationMask};

fn config(dir: &Path) -> Config {
    Config {
        directory: dir.to_path_buf(),
        stat_file: None,
        ..Config::default()
    }
}

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Removes one file behind the runner's back as soon as the create phase
/// has been reported.
struct Tamper {
    inner: RecordingReporter,
    victim: PathBuf,
}

impl Reporter for Tamper {
    fn report(&mut self, name: &str, passed: bool) {
        if name == "create_files" && passed {
            fs::remove_file(&self.victim).unwrap();
        }
        self.inner.report(name, passed);
    }

    fn report_error(&mut self, operation: &str, error: &str) {
        self.inner.report_error(operation, error);
    }

    fn note(&mut self, line: &str) {
        self.inner.note(line);
    }
}

#[test]
fn crd_with_five_creates_four_files_and_cleans_up() {
    let tmp = tempdir().unwrap();
    let cfg = config(tmp.path());
    let mut rep = RecordingReporter::new();
    let mut prog = NullProgress::default();

    let ok = CombinedRunner::new(&cfg, &mut rep, &mut prog).run(
        tmp.path(),
        "testfile-",
        5,
        OperationMask::parse("CRD").unwrap(),
    );
    assert!(ok);
    assert!(rep.errors.is_empty(), "{:?}", rep.errors);
    assert!(entries(tmp.path()).is_empty());
}

#[test]
fn create_phase_produces_suffixes_one_to_n_minus_one() {
    let tmp = tempdir().unwrap();
    let cfg = config(tmp.path());
    let mut rep = RecordingReporter::new();
    let mut prog = NullProgress::default();

    assert!(CombinedRunner::new(&cfg, &mut rep, &mut prog).run(
        tmp.path(),
        "testfile-",
        5,
        OperationMask::parse("CR").unwrap(),
    ));
    assert_eq!(
        entries(tmp.path()),
        vec!["testfile-1", "testfile-2", "testfile-3", "testfile-4"]
    );
}

#[test]
fn external_removal_is_caught_by_readdir_phase() {
    let tmp = tempdir().unwrap();
    let cfg = config(tmp.path());
    let victim = tmp.path().join("testfile-2");
    let mut rep = Tamper {
        inner: RecordingReporter::new(),
        victim: victim.clone(),
    };
    let mut prog = NullProgress::default();

    let ok = CombinedRunner::new(&cfg, &mut rep, &mut prog).run(
        tmp.path(),
        "testfile-",
        5,
        OperationMask::parse("CR").unwrap(),
    );
    assert!(!ok);

    let missing = rep.inner.errors_for("compare_with_dir_contents");
    assert_eq!(
        missing,
        vec![format!("{} was not found in the directory listing", victim.display())]
    );
    assert_eq!(
        rep.inner.results,
        vec![
            ("create_files".to_string(), true),
            ("compare_with_dir_contents".to_string(), false),
        ]
    );
    // The remaining names were still checked and are still there.
    assert_eq!(entries(tmp.path()), vec!["testfile-1", "testfile-3", "testfile-4"]);
}

#[test]
fn readdir_only_reports_every_generated_name_missing() {
    let tmp = tempdir().unwrap();
    let cfg = config(tmp.path());
    let mut rep = RecordingReporter::new();
    let mut prog = NullProgress::default();

    let ok = CombinedRunner::new(&cfg, &mut rep, &mut prog).run(
        tmp.path(),
        "testfile-",
        5,
        OperationMask::parse("r").unwrap(),
    );
    assert!(!ok);
    let expected: Vec<String> = file_set(tmp.path(), "testfile-", 5)
        .iter()
        .map(|p| format!("{} was not found in the directory listing", p.display()))
        .collect();
    assert_eq!(rep.errors_for("compare_with_dir_contents"), expected);
    assert_eq!(rep.results, vec![("compare_with_dir_contents".to_string(), false)]);
}

#[test]
fn delete_only_on_empty_directory_fails_on_first_file() {
    let tmp = tempdir().unwrap();
    let cfg = config(tmp.path());
    let mut rep = RecordingReporter::new();
    let mut prog = NullProgress::default();

    let ok = CombinedRunner::new(&cfg, &mut rep, &mut prog).run(
        tmp.path(),
        "gone-",
        4,
        OperationMask::parse("D").unwrap(),
    );
    assert!(!ok);
    assert_eq!(rep.errors_for("Delete file").len(), 1);
    assert_eq!(
        rep.errors_for("delete_files"),
        vec![format!("Failed to delete file {}", tmp.path().join("gone-1").display())]
    );
}

#[test]
fn empty_mask_is_vacuously_true() {
    let tmp = tempdir().unwrap();
    let cfg = config(tmp.path());
    let mut rep = RecordingReporter::new();
    let mut prog = NullProgress::default();

    assert!(CombinedRunner::new(&cfg, &mut rep, &mut prog).run(
        tmp.path(),
        "x",
        10,
        OperationMask::NONE,
    ));
    assert!(rep.results.is_empty());
    assert!(entries(tmp.path()).is_empty());
}
