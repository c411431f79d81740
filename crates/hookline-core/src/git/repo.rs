//! Read-only queries against a git working tree.
//!
//! [`GitRepo`] is the repository inspector used by the hook context. Every
//! query shells out through the injected [`CommandRunner`] with the
//! repository root as the working directory. Nothing here checks out,
//! stashes or writes the index.
//!
//! Secondary queries (line counts, diffs) degrade to neutral values on
//! failure and log a warning. Only [`GitRepo::open`] fails hard, because
//! nothing sensible can be resolved outside a repository.

use std::cell::OnceCell;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::command::{argv, CommandOutput, CommandRunner};
use crate::error::HooklineError;
use crate::git::diff::added_lines;

/// Object name of the empty tree in SHA-1 repositories.
pub const EMPTY_TREE_SHA1: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

/// Index entry mode git uses for submodule (gitlink) entries.
const GITLINK_MODE: &str = "160000";

/// The "old" side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Base {
    Rev(String),
    /// Compare against nothing: every line of every file is new.
    EmptyTree,
}

/// The "new" side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Rev(String),
    /// The staged content (`git diff --cached`).
    Index,
}

/// Two git states whose difference defines what a hook should look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub base: Base,
    pub target: Target,
}

impl Comparison {
    pub fn revs(base: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            base: Base::Rev(base.into()),
            target: Target::Rev(target.into()),
        }
    }

    pub fn staged(base: Base) -> Self {
        Self {
            base,
            target: Target::Index,
        }
    }
}

/// Inspector for one repository, bound to its top-level directory.
pub struct GitRepo<R> {
    root: PathBuf,
    git_dir: PathBuf,
    runner: R,
    submodules: OnceCell<BTreeSet<PathBuf>>,
    empty_tree: OnceCell<String>,
}

impl<R: CommandRunner> GitRepo<R> {
    /// Locates the repository containing `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`HooklineError::InvalidRepo`] when `dir` is not inside a git
    /// working tree (including bare repositories) or git cannot be run.
    pub fn open(dir: &Path, runner: R) -> Result<Self, HooklineError> {
        let invalid = |reason: String| HooklineError::InvalidRepo {
            path: dir.to_path_buf(),
            reason,
        };

        let output = runner
            .execute(
                &argv(["git", "rev-parse", "--show-toplevel", "--absolute-git-dir"]),
                dir,
            )
            .map_err(|e| invalid(e.to_string()))?;

        if !output.success() {
            return Err(invalid(output.stderr.trim().to_string()));
        }

        let mut lines = output.stdout.lines();
        let root = lines
            .next()
            .filter(|l| !l.is_empty())
            .ok_or_else(|| invalid("git did not report a top-level directory".into()))?;
        let git_dir = lines
            .next()
            .filter(|l| !l.is_empty())
            .ok_or_else(|| invalid("git did not report a git directory".into()))?;

        Ok(Self {
            root: PathBuf::from(root),
            git_dir: PathBuf::from(git_dir),
            runner,
            submodules: OnceCell::new(),
            empty_tree: OnceCell::new(),
        })
    }

    /// Absolute path of the working tree root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of the `.git` directory.
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Resolves `path` against the repository root.
    pub fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn git<I, S>(&self, args: I) -> Option<CommandOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut command = vec!["git".to_string()];
        command.extend(args.into_iter().map(Into::into));
        match self.runner.execute(&command, &self.root) {
            Ok(output) => Some(output),
            Err(e) => {
                tracing::warn!(command = %command.join(" "), error = %e, "git query failed");
                None
            }
        }
    }

    /// Runs a git query and returns stdout only when it succeeded.
    fn git_stdout<I, S>(&self, args: I) -> Option<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.git(args)
            .filter(CommandOutput::success)
            .map(|output| output.stdout)
    }

    /// Every tracked file, as absolute paths, minus submodules.
    pub fn all_files(&self) -> Vec<PathBuf> {
        let Some(stdout) = self.git_stdout(["ls-files", "-z"]) else {
            tracing::warn!(root = %self.root.display(), "could not list tracked files");
            return Vec::new();
        };
        self.collect_paths(&stdout)
    }

    /// Paths registered as submodules, either as gitlinks in the index or in
    /// `.gitmodules`.
    pub fn submodule_paths(&self) -> &BTreeSet<PathBuf> {
        self.submodules.get_or_init(|| {
            let mut paths = BTreeSet::new();

            if let Some(stdout) = self.git_stdout(["ls-files", "--stage", "-z"]) {
                for entry in stdout.split('\0') {
                    let Some((meta, path)) = entry.split_once('\t') else {
                        continue;
                    };
                    if meta.split_whitespace().next() == Some(GITLINK_MODE) {
                        paths.insert(self.root.join(path));
                    }
                }
            }

            if self.root.join(".gitmodules").is_file() {
                if let Some(stdout) = self.git_stdout([
                    "config",
                    "--file",
                    ".gitmodules",
                    "--get-regexp",
                    r"^submodule\..*\.path$",
                ]) {
                    for line in stdout.lines() {
                        if let Some((_, path)) = line.split_once(' ') {
                            paths.insert(self.root.join(path.trim()));
                        }
                    }
                }
            }

            paths
        })
    }

    /// Whether `path` is a registered submodule of this repository.
    pub fn is_submodule(&self, path: &Path) -> bool {
        self.submodule_paths().contains(&self.absolute(path))
    }

    /// Number of newline-terminated lines in `path`, as `wc -l` counts them.
    ///
    /// Returns 0 when the file cannot be read or `wc` fails.
    pub fn line_count(&self, path: &Path) -> usize {
        let path = self.absolute(path);
        let command = argv(["wc".to_string(), "-l".to_string(), path.display().to_string()]);
        let count = match self.runner.execute(&command, &self.root) {
            Ok(output) if output.success() => output
                .stdout
                .split_whitespace()
                .next()
                .and_then(|n| n.parse().ok()),
            Ok(_) | Err(_) => None,
        };

        count.unwrap_or_else(|| {
            tracing::warn!(path = %path.display(), "could not count lines, assuming 0");
            0
        })
    }

    /// Whether a non-squash merge is in progress (`MERGE_HEAD` exists).
    pub fn merge_in_progress(&self) -> bool {
        self.git(["rev-parse", "--verify", "MERGE_HEAD"])
            .is_some_and(|output| output.success())
    }

    /// Whether git left a squash message behind (`git merge --squash`
    /// writes one and the next commit consumes it).
    pub fn squash_message_present(&self) -> bool {
        self.git_dir.join("SQUASH_MSG").is_file()
    }

    /// Resolves `rev` to a commit id, if it names a commit.
    pub fn resolve(&self, rev: &str) -> Option<String> {
        self.git_stdout(["rev-parse", "--verify", "--quiet", &format!("{rev}^{{commit}}")])
            .map(|stdout| stdout.trim().to_string())
            .filter(|sha| !sha.is_empty())
    }

    /// Parent commit ids of `rev`, in order. Empty for a root commit or an
    /// unresolvable rev.
    pub fn parents(&self, rev: &str) -> Vec<String> {
        self.git_stdout(["rev-list", "--parents", "-n", "1", rev])
            .map(|stdout| {
                stdout
                    .split_whitespace()
                    .skip(1)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Best common ancestor of all `revs`.
    pub fn merge_base(&self, revs: &[String]) -> Option<String> {
        let mut args = vec!["merge-base".to_string(), "--octopus".to_string()];
        args.extend(revs.iter().cloned());
        self.git_stdout(args)
            .map(|stdout| stdout.trim().to_string())
            .filter(|sha| !sha.is_empty())
    }

    /// Object name of the empty tree for this repository's hash algorithm.
    pub fn empty_tree(&self) -> &str {
        self.empty_tree.get_or_init(|| {
            self.git_stdout(["hash-object", "-t", "tree", "/dev/null"])
                .map(|stdout| stdout.trim().to_string())
                .filter(|sha| !sha.is_empty())
                .unwrap_or_else(|| EMPTY_TREE_SHA1.to_string())
        })
    }

    fn comparison_args(&self, comparison: &Comparison) -> Vec<String> {
        let base = match &comparison.base {
            Base::Rev(rev) => rev.clone(),
            Base::EmptyTree => self.empty_tree().to_string(),
        };
        match &comparison.target {
            Target::Rev(rev) => vec![base, rev.clone()],
            Target::Index => vec!["--cached".to_string(), base],
        }
    }

    /// Files added, copied, modified or renamed between the two sides of
    /// `comparison`. Deleted files and submodules never appear.
    pub fn modified_files(&self, comparison: &Comparison) -> Vec<PathBuf> {
        let mut args = argv([
            "diff",
            "--name-only",
            "-z",
            "--no-ext-diff",
            "--diff-filter=ACMR",
            "--ignore-submodules=all",
        ]);
        args.extend(self.comparison_args(comparison));

        let Some(stdout) = self.git_stdout(args) else {
            tracing::warn!(?comparison, "could not list modified files, assuming none");
            return Vec::new();
        };
        self.collect_paths(&stdout)
    }

    /// New-file line numbers added in `path` between the two sides of
    /// `comparison`.
    pub fn modified_lines(&self, comparison: &Comparison, path: &Path) -> BTreeSet<u32> {
        let path = self.absolute(path);
        let relative = path.strip_prefix(&self.root).unwrap_or(&path);

        let mut args = argv(["diff", "-U0", "--no-color", "--no-ext-diff"]);
        args.extend(self.comparison_args(comparison));
        args.push("--".to_string());
        args.push(format!(":(literal){}", relative.display()));

        match self.git_stdout(args) {
            Some(stdout) => added_lines(&stdout),
            None => {
                tracing::warn!(path = %path.display(), "could not diff file, assuming no lines");
                BTreeSet::new()
            }
        }
    }

    /// Turns NUL-separated, root-relative git output into sorted absolute
    /// paths, dropping submodules and directories.
    fn collect_paths(&self, stdout: &str) -> Vec<PathBuf> {
        let paths: BTreeSet<PathBuf> = stdout
            .split('\0')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| self.root.join(p))
            .filter(|p| !self.submodule_paths().contains(p) && !p.is_dir())
            .collect();
        paths.into_iter().collect()
    }
}
