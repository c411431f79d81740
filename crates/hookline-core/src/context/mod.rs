//! The hook context: which files and lines a hook invocation covers.
//!
//! A [`HookContext`] is built once per hook run. It picks a
//! [`DiffStrategy`] from the [`InvocationContext`] and answers two questions
//! for check drivers:
//!
//! - [`HookContext::modified_files`]: the sorted, de-duplicated absolute paths
//!   the hook should look at (never submodules, never deleted files).
//! - [`HookContext::modified_lines_in_file`]: the 1-based line numbers in one
//!   of those files that count as changed.
//!
//! Both answers are memoized: git state does not change during a hook run,
//! so every distinct query reaches git at most once per context.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::Path;
//! use hookline_core::{HookContext, HookEvent, InvocationContext};
//!
//! # fn main() -> Result<(), hookline_core::HooklineError> {
//! let invocation = InvocationContext::new(HookEvent::PostMerge, vec!["0".into()]);
//! let context = HookContext::open(invocation, Path::new("."))?;
//! for file in context.modified_files() {
//!     let lines = context.modified_lines_in_file(file)?;
//!     println!("{}: {} changed lines", file.display(), lines.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod refs;
pub mod strategy;

use std::cell::{OnceCell, RefCell};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use crate::command::{CommandRunner, SystemRunner};
use crate::error::HooklineError;
use crate::git::GitRepo;
use crate::types::{HookEvent, InvocationContext, PreMergeRef};

pub use refs::{PushedRef, RewrittenCommit};
pub use strategy::{DiffStrategy, MergeShape, Scope};

/// Per-invocation view of what changed.
pub struct HookContext<R = SystemRunner> {
    invocation: InvocationContext,
    strategy: DiffStrategy,
    repo: GitRepo<R>,
    pre_merge_ref: PreMergeRef,
    squash: OnceCell<bool>,
    merge_commit: OnceCell<bool>,
    scope: OnceCell<Scope>,
    modified_files: OnceCell<Vec<PathBuf>>,
    modified_lines: RefCell<HashMap<PathBuf, BTreeSet<u32>>>,
}

impl HookContext<SystemRunner> {
    /// Builds a context for the repository containing `dir`, running git
    /// as a child process.
    pub fn open(invocation: InvocationContext, dir: &Path) -> Result<Self, HooklineError> {
        Self::with_runner(invocation, dir, SystemRunner)
    }
}

impl<R: CommandRunner> HookContext<R> {
    /// Builds a context that runs every external command through `runner`.
    ///
    /// # Errors
    ///
    /// Fails with [`HooklineError::InvalidRepo`] when `dir` is not inside a
    /// git working tree, and with [`HooklineError::InvalidArgs`] when the
    /// hook arguments do not fit the event.
    pub fn with_runner(
        invocation: InvocationContext,
        dir: &Path,
        runner: R,
    ) -> Result<Self, HooklineError> {
        let strategy = DiffStrategy::select(&invocation)?;
        let repo = GitRepo::open(dir, runner)?;

        Ok(Self {
            invocation,
            strategy,
            repo,
            pre_merge_ref: PreMergeRef::default(),
            squash: OnceCell::new(),
            merge_commit: OnceCell::new(),
            scope: OnceCell::new(),
            modified_files: OnceCell::new(),
            modified_lines: RefCell::new(HashMap::new()),
        })
    }

    /// Chooses how the pre-merge commit is recovered for post-merge hooks.
    pub fn with_pre_merge_ref(mut self, pre_merge_ref: PreMergeRef) -> Self {
        self.pre_merge_ref = pre_merge_ref;
        self
    }

    pub fn invocation(&self) -> &InvocationContext {
        &self.invocation
    }

    pub fn event(&self) -> HookEvent {
        self.invocation.event()
    }

    pub fn strategy(&self) -> &DiffStrategy {
        &self.strategy
    }

    pub fn repo(&self) -> &GitRepo<R> {
        &self.repo
    }

    /// True iff this is a post-merge hook for a `--squash` merge.
    pub fn is_squash(&self) -> bool {
        *self.squash.get_or_init(|| self.strategy.is_squash(&self.repo))
    }

    /// True iff `HEAD` has two or more parents.
    ///
    /// Independent of [`is_squash`](Self::is_squash): a fast-forward merge is
    /// neither.
    pub fn is_merge_commit(&self) -> bool {
        *self
            .merge_commit
            .get_or_init(|| DiffStrategy::is_merge_commit(&self.repo))
    }

    /// For `post-checkout`: whether a branch (rather than files) was checked
    /// out.
    pub fn is_branch_checkout(&self) -> bool {
        matches!(
            self.strategy,
            DiffStrategy::PostCheckout {
                branch_checkout: true,
                ..
            }
        )
    }

    /// For `commit-msg`: the message file git passed, resolved against the
    /// repository root.
    pub fn commit_message_file(&self) -> Option<PathBuf> {
        if self.event() != HookEvent::CommitMsg {
            return None;
        }
        self.invocation
            .arg(0)
            .map(|file| self.repo.absolute(Path::new(file)))
    }

    /// For `commit-msg`: the message text with `#` comment lines removed.
    pub fn commit_message(&self) -> Result<String, HooklineError> {
        let file = self.commit_message_file().ok_or_else(|| HooklineError::InvalidArgs {
            event: self.event().to_string(),
            reason: "no commit message file".into(),
        })?;
        let raw = std::fs::read_to_string(file)?;
        let kept: Vec<&str> = raw.lines().filter(|line| !line.starts_with('#')).collect();
        Ok(kept.join("\n"))
    }

    fn scope(&self) -> &Scope {
        self.scope.get_or_init(|| {
            self.strategy
                .scope(&self.repo, self.pre_merge_ref, || MergeShape {
                    squash: self.is_squash(),
                    merge_commit: self.is_merge_commit(),
                })
        })
    }

    /// Files this invocation covers, sorted and without duplicates.
    pub fn modified_files(&self) -> &[PathBuf] {
        self.modified_files.get_or_init(|| {
            let files: Vec<PathBuf> = match self.scope() {
                Scope::Tree => self.repo.all_files(),
                Scope::Diff(comparisons) => comparisons
                    .iter()
                    .flat_map(|comparison| self.repo.modified_files(comparison))
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect(),
            };
            tracing::debug!(event = %self.event(), count = files.len(), "resolved modified files");
            files
        })
    }

    /// Whether `path` (absolute, or relative to the repository root) is in
    /// [`modified_files`](Self::modified_files).
    pub fn is_modified(&self, path: &Path) -> bool {
        let path = self.repo.absolute(path);
        self.modified_files().binary_search(&path).is_ok()
    }

    /// Changed 1-based line numbers in `path`.
    ///
    /// # Errors
    ///
    /// Returns [`HooklineError::NotModified`] when `path` is not one of the
    /// [`modified_files`](Self::modified_files); callers are expected to
    /// check membership first.
    pub fn modified_lines_in_file(&self, path: &Path) -> Result<BTreeSet<u32>, HooklineError> {
        let path = self.repo.absolute(path);
        if self.modified_files().binary_search(&path).is_err() {
            return Err(HooklineError::NotModified(path));
        }

        if let Some(lines) = self.modified_lines.borrow().get(&path) {
            return Ok(lines.clone());
        }

        let lines: BTreeSet<u32> = match self.scope() {
            Scope::Tree => {
                let count = u32::try_from(self.repo.line_count(&path)).unwrap_or(u32::MAX);
                (1..=count).collect()
            }
            Scope::Diff(comparisons) => comparisons
                .iter()
                .flat_map(|comparison| self.repo.modified_lines(comparison, &path))
                .collect(),
        };

        self.modified_lines
            .borrow_mut()
            .insert(path, lines.clone());
        Ok(lines)
    }
}
