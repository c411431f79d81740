//! Fixtures shared by the unit tests: throwaway git repositories and a
//! runner that counts the commands it executes.

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use crate::command::{CommandOutput, CommandRunner, SystemRunner};
use crate::error::HooklineError;

/// A git repository in a temporary directory, on branch `master`.
pub struct TestRepo {
    _tmp: TempDir,
    path: PathBuf,
}

impl TestRepo {
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().canonicalize().unwrap();
        let repo = Self { _tmp: tmp, path };

        repo.git(&["init", "-q"]);
        repo.git(&["symbolic-ref", "HEAD", "refs/heads/master"]);
        repo.git(&["config", "user.name", "Hookline Tests"]);
        repo.git(&["config", "user.email", "tests@example.com"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo.git(&["config", "core.autocrlf", "false"]);
        repo
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs git in the repository and panics if it fails.
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.path)
            .output()
            .expect("failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    /// Adds `other` as a submodule at `relative` (staged, not committed).
    pub fn add_submodule(&self, other: &TestRepo, relative: &str) {
        self.git(&[
            "-c",
            "protocol.file.allow=always",
            "submodule",
            "--quiet",
            "add",
            other.path().to_str().unwrap(),
            relative,
        ]);
    }

    /// Commits on a `child` branch via `setup`, then returns to `master`.
    pub fn on_child_branch(&self, setup: impl FnOnce(&TestRepo)) {
        self.git(&["checkout", "-q", "-b", "child"]);
        setup(self);
        self.git(&["checkout", "-q", "master"]);
    }
}

/// Delegates to [`SystemRunner`] and records every argv it runs.
#[derive(Default)]
pub struct CountingRunner {
    calls: Cell<usize>,
    log: RefCell<Vec<Vec<String>>>,
}

impl CountingRunner {
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn commands(&self) -> Vec<Vec<String>> {
        self.log.borrow().clone()
    }
}

impl CommandRunner for CountingRunner {
    fn execute(&self, argv: &[String], cwd: &Path) -> Result<CommandOutput, HooklineError> {
        self.calls.set(self.calls.get() + 1);
        self.log.borrow_mut().push(argv.to_vec());
        SystemRunner.execute(argv, cwd)
    }
}
