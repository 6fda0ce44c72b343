//! Atomic tests: one filesystem primitive each, with its pass/fail oracle and
//! the restore step that puts the entry back the way it was found.
//!
//! No test ever returns an error. Failures from the underlying call are
//! handed to the `Reporter` and turn into `false`.

use std::path::Path;

use filetime::FileTime;

use crate::fs_op::attrs::{self, chmod, chown, set_times};
use crate::fs_op::create::{create_dir, create_file};
use crate::fs_op::mv::{rename, with_suffix};
use crate::fs_op::remove::{rmdir, unlink};
use crate::fs_op::{is_dir, is_file, snapshot, EntrySnapshot, FsOpError, FsResult, PathType};
use crate::report::Reporter;

/// Owner id written by `change_owner`. Only used to prove the change sticks.
pub const SENTINEL_UID: u32 = 20;
/// Group id written by `change_owner` and `change_group`.
pub const SENTINEL_GID: u32 = 20;
/// Appended to the target name by `move_file`.
pub const MOVED_SUFFIX: &str = "-moved";
/// Permission bit `change_permissions` expects to be the only difference.
pub const EXEC_BY_OTHER: u32 = libc::S_IXOTH as u32;

/// Name and outcome of one executed test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
}

/// Run `test`, hand the outcome to the reporter under `name` and return it.
pub fn run_test<F>(reporter: &mut dyn Reporter, name: &str, test: F) -> TestResult
where
    F: FnOnce(&mut dyn Reporter) -> bool,
{
    let passed = test(&mut *reporter);
    reporter.report(name, passed);
    TestResult {
        name: name.to_string(),
        passed,
    }
}

/// One entry of a test sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomicOp {
    CreateEmptyFile,
    CreateEmptyDir,
    MoveFile,
    ChangeTimes,
    ChangeOwner,
    ChangeGroup,
    ChangePermissions,
    DeleteFile,
    DeleteDir,
}

/// Basic sequence for a regular file.
pub const FILE_SEQUENCE: [AtomicOp; 7] = [
    AtomicOp::CreateEmptyFile,
    AtomicOp::MoveFile,
    AtomicOp::ChangeTimes,
    AtomicOp::ChangeOwner,
    AtomicOp::ChangeGroup,
    AtomicOp::ChangePermissions,
    AtomicOp::DeleteFile,
];

/// Same sequence for a directory; only creation and deletion differ.
pub const DIR_SEQUENCE: [AtomicOp; 7] = [
    AtomicOp::CreateEmptyDir,
    AtomicOp::MoveFile,
    AtomicOp::ChangeTimes,
    AtomicOp::ChangeOwner,
    AtomicOp::ChangeGroup,
    AtomicOp::ChangePermissions,
    AtomicOp::DeleteDir,
];

impl AtomicOp {
    pub fn name(self) -> &'static str {
        match self {
            AtomicOp::CreateEmptyFile => "create_empty_file",
            AtomicOp::CreateEmptyDir => "create_empty_dir",
            AtomicOp::MoveFile => "move_file",
            AtomicOp::ChangeTimes => "change_times",
            AtomicOp::ChangeOwner => "change_owner",
            AtomicOp::ChangeGroup => "change_group",
            AtomicOp::ChangePermissions => "change_permissions",
            AtomicOp::DeleteFile => "delete_file",
            AtomicOp::DeleteDir => "delete_dir",
        }
    }

    pub fn run(self, tests: &mut AtomicTests<'_>, path: &Path) -> bool {
        match self {
            AtomicOp::CreateEmptyFile => tests.create_empty_file(path),
            AtomicOp::CreateEmptyDir => tests.create_empty_dir(path),
            AtomicOp::MoveFile => tests.move_file(path),
            AtomicOp::ChangeTimes => tests.change_times(path),
            AtomicOp::ChangeOwner => tests.change_owner(path),
            AtomicOp::ChangeGroup => tests.change_group(path),
            AtomicOp::ChangePermissions => tests.change_permissions(path),
            AtomicOp::DeleteFile => tests.delete_file(path),
            AtomicOp::DeleteDir => tests.delete_dir(path),
        }
    }
}

/// The set of atomic tests, bound to the reporter that receives their errors.
pub struct AtomicTests<'r> {
    reporter: &'r mut dyn Reporter,
}

impl<'r> AtomicTests<'r> {
    pub fn new(reporter: &'r mut dyn Reporter) -> Self {
        AtomicTests { reporter }
    }

    fn fail(&mut self, label: &str, err: &FsOpError) -> bool {
        tracing::debug!(kind = ?err.kind, "{}: {}", label, err);
        self.reporter.report_error(label, &err.to_string());
        false
    }

    // Restore failures are reported but never change the outcome.
    fn restore(&mut self, label: &str, res: FsResult<()>) {
        if let Err(e) = res {
            tracing::warn!("{} could not restore state: {}", label, e);
            self.reporter
                .report_error(&format!("{} (restore)", label), &e.to_string());
        }
    }

    fn expect_present(&mut self, label: &str, path: &Path, present: fn(&Path) -> bool) -> bool {
        if present(path) {
            true
        } else {
            self.reporter
                .report_error(label, &format!("{} is not existing", path.display()));
            false
        }
    }

    fn probe(&mut self, label: &str, path: &Path) -> Option<EntrySnapshot> {
        match snapshot(path) {
            Ok(s) => Some(s),
            Err(e) => {
                self.fail(label, &e);
                None
            }
        }
    }

    /// Create a zero-length file and check a regular file is there.
    pub fn create_empty_file(&mut self, path: &Path) -> bool {
        const LABEL: &str = "Create file";
        if let Err(e) = create_file(path) {
            return self.fail(LABEL, &e);
        }
        self.expect_present(LABEL, path, |p| is_file(p))
    }

    /// Create an empty directory and check a directory is there.
    pub fn create_empty_dir(&mut self, path: &Path) -> bool {
        const LABEL: &str = "Create empty dir";
        if let Err(e) = create_dir(path) {
            return self.fail(LABEL, &e);
        }
        self.expect_present(LABEL, path, |p| is_dir(p))
    }

    /// Rename `path` to `path-moved`, check the entry kept its kind, then
    /// rename it back.
    pub fn move_file(&mut self, path: &Path) -> bool {
        const LABEL: &str = "Move file";
        let before = PathType::of(path);
        let moved = with_suffix(path, MOVED_SUFFIX);
        if let Err(e) = rename(path, &moved) {
            return self.fail(LABEL, &e);
        }
        let after = PathType::of(&moved);
        let passed = after == before;
        if !passed {
            self.reporter.report_error(
                LABEL,
                &format!(
                    "{} was a {} but {} is a {}",
                    path.display(),
                    before.label(),
                    moved.display(),
                    after.label()
                ),
            );
        }
        self.restore(LABEL, rename(&moved, path));
        passed
    }

    /// Chown to the sentinel uid/gid, check both took effect, chown back.
    ///
    /// The whole snapshot is written back since a chown may clear the
    /// setuid/setgid bits.
    pub fn change_owner(&mut self, path: &Path) -> bool {
        const LABEL: &str = "Change owner";
        let Some(before) = self.probe(LABEL, path) else {
            return false;
        };
        if let Err(e) = chown(path, Some(SENTINEL_UID), Some(SENTINEL_GID)) {
            return self.fail(LABEL, &e);
        }
        let passed = self
            .probe(LABEL, path)
            .map(|s| s.uid == SENTINEL_UID && s.gid == SENTINEL_GID)
            .unwrap_or(false);
        self.restore(LABEL, attrs::restore(path, &before));
        passed
    }

    /// Change only the group to the sentinel gid; the owner must not move.
    pub fn change_group(&mut self, path: &Path) -> bool {
        const LABEL: &str = "Change group";
        let Some(before) = self.probe(LABEL, path) else {
            return false;
        };
        if let Err(e) = chown(path, None, Some(SENTINEL_GID)) {
            return self.fail(LABEL, &e);
        }
        let passed = self
            .probe(LABEL, path)
            .map(|s| s.uid == before.uid && s.gid == SENTINEL_GID)
            .unwrap_or(false);
        self.restore(LABEL, attrs::restore(path, &before));
        passed
    }

    /// Clear every permission bit, then set exactly execute-by-other. The
    /// second chmod must add that one bit and remove nothing.
    pub fn change_permissions(&mut self, path: &Path) -> bool {
        const LABEL: &str = "Change permission";
        let Some(before) = self.probe(LABEL, path) else {
            return false;
        };
        let passed = self.chmod_delta(LABEL, path);
        self.restore(LABEL, chmod(path, before.mode));
        passed
    }

    fn chmod_delta(&mut self, label: &str, path: &Path) -> bool {
        if let Err(e) = chmod(path, 0) {
            return self.fail(label, &e);
        }
        let Some(cleared) = self.probe(label, path) else {
            return false;
        };
        if let Err(e) = chmod(path, EXEC_BY_OTHER) {
            return self.fail(label, &e);
        }
        let Some(set) = self.probe(label, path) else {
            return false;
        };
        let added = set.mode & !cleared.mode;
        let removed = cleared.mode & !set.mode;
        if added == EXEC_BY_OTHER && removed == 0 {
            true
        } else {
            self.reporter.report_error(
                label,
                &format!("mode went from {:o} to {:o}", cleared.mode, set.mode),
            );
            false
        }
    }

    /// Set atime and mtime to the epoch, check both read back as zero,
    /// restore the captured times.
    pub fn change_times(&mut self, path: &Path) -> bool {
        const LABEL: &str = "Change timestamps";
        let Some(before) = self.probe(LABEL, path) else {
            return false;
        };
        let passed = match set_times(path, FileTime::zero(), FileTime::zero()) {
            Err(e) => self.fail(LABEL, &e),
            Ok(()) => self
                .probe(LABEL, path)
                .map(|s| s.mtime == FileTime::zero() && s.atime == FileTime::zero())
                .unwrap_or(false),
        };
        self.restore(LABEL, set_times(path, before.atime, before.mtime));
        passed
    }

    /// Unlink and check no regular file is left.
    pub fn delete_file(&mut self, path: &Path) -> bool {
        if let Err(e) = unlink(path) {
            return self.fail("Delete file", &e);
        }
        !is_file(path)
    }

    /// Remove the directory and check no directory is left.
    pub fn delete_dir(&mut self, path: &Path) -> bool {
        if let Err(e) = rmdir(path) {
            return self.fail("Delete dir", &e);
        }
        !is_dir(path)
    }
}
