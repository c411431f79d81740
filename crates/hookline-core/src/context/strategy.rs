//! Diff resolution strategies, one per hook event.
//!
//! A strategy is chosen once from the [`InvocationContext`] and decides which
//! git states get compared. It holds no state of its own; everything it
//! learns from git is memoized by the owning hook context.

use crate::command::CommandRunner;
use crate::context::refs::{is_null, PushedRef, RewrittenCommit};
use crate::error::HooklineError;
use crate::git::{Base, Comparison, GitRepo, Target};
use crate::types::{HookEvent, InvocationContext, PreMergeRef};

/// What a hook invocation should look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffStrategy {
    /// Every tracked file, every line.
    RunAll,
    /// Staged changes (`pre-commit`, `commit-msg`).
    Staged,
    /// The commit just created.
    PostCommit,
    /// Movement of `HEAD` from `previous` to `current`.
    PostCheckout {
        previous: String,
        current: String,
        branch_checkout: bool,
    },
    /// A completed merge. `squash_flag` is the flag git passes to the hook,
    /// absent when the context was built by hand.
    PostMerge { squash_flag: Option<bool> },
    /// Commits rewritten by `git commit --amend` or `git rebase`.
    PostRewrite { rewritten: Vec<RewrittenCommit> },
    /// Refs about to be pushed.
    PrePush { refs: Vec<PushedRef> },
}

/// Set of paths and lines a strategy resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// The whole tracked tree.
    Tree,
    /// The union of these comparisons.
    Diff(Vec<Comparison>),
}

/// Resolved merge shape; see [`DiffStrategy::PostMerge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeShape {
    pub squash: bool,
    pub merge_commit: bool,
}

impl DiffStrategy {
    /// Picks the strategy for an invocation.
    ///
    /// # Errors
    ///
    /// Returns [`HooklineError::InvalidArgs`] when git's hook arguments are
    /// missing or malformed.
    pub fn select(invocation: &InvocationContext) -> Result<Self, HooklineError> {
        let event = invocation.event();
        let invalid = |reason: &str| HooklineError::InvalidArgs {
            event: event.to_string(),
            reason: reason.to_string(),
        };

        let strategy = match event {
            HookEvent::RunAll => DiffStrategy::RunAll,
            HookEvent::PreCommit | HookEvent::CommitMsg => DiffStrategy::Staged,
            HookEvent::PostCommit => DiffStrategy::PostCommit,
            HookEvent::PostCheckout => {
                let previous = invocation
                    .arg(0)
                    .ok_or_else(|| invalid("expected <previous-head> <new-head> <flag>"))?;
                let current = invocation
                    .arg(1)
                    .ok_or_else(|| invalid("expected <previous-head> <new-head> <flag>"))?;
                DiffStrategy::PostCheckout {
                    previous: previous.to_string(),
                    current: current.to_string(),
                    branch_checkout: invocation.arg(2) == Some("1"),
                }
            }
            HookEvent::PostMerge => {
                let squash_flag = match invocation.arg(0) {
                    None => None,
                    Some(flag) => match flag.trim() {
                        "1" => Some(true),
                        "0" => Some(false),
                        _ => return Err(invalid("squash flag must be 0 or 1")),
                    },
                };
                DiffStrategy::PostMerge { squash_flag }
            }
            HookEvent::PostRewrite => DiffStrategy::PostRewrite {
                rewritten: RewrittenCommit::parse_all(invocation.input()),
            },
            HookEvent::PrePush => DiffStrategy::PrePush {
                refs: PushedRef::parse_all(invocation.input()),
            },
        };

        tracing::debug!(%event, ?strategy, "selected diff strategy");
        Ok(strategy)
    }

    /// Whether this post-merge was a squash: the hook flag when git gave
    /// one, otherwise a leftover `SQUASH_MSG` with no `MERGE_HEAD`.
    pub fn is_squash<R: CommandRunner>(&self, repo: &GitRepo<R>) -> bool {
        match self {
            DiffStrategy::PostMerge {
                squash_flag: Some(flag),
            } => *flag,
            DiffStrategy::PostMerge { squash_flag: None } => {
                !repo.merge_in_progress() && repo.squash_message_present()
            }
            _ => false,
        }
    }

    /// Whether `HEAD` is a merge commit (two or more parents).
    pub fn is_merge_commit<R: CommandRunner>(repo: &GitRepo<R>) -> bool {
        repo.parents("HEAD").len() >= 2
    }

    /// Computes the comparisons to run. `merge` is consulted only by
    /// [`DiffStrategy::PostMerge`].
    pub fn scope<R: CommandRunner>(
        &self,
        repo: &GitRepo<R>,
        pre_merge_ref: PreMergeRef,
        merge: impl FnOnce() -> MergeShape,
    ) -> Scope {
        let comparisons = match self {
            DiffStrategy::RunAll => return Scope::Tree,
            DiffStrategy::Staged => {
                let base = repo
                    .resolve("HEAD")
                    .map(Base::Rev)
                    .unwrap_or(Base::EmptyTree);
                vec![Comparison::staged(base)]
            }
            DiffStrategy::PostCommit => vec![Comparison {
                base: first_parent(repo, "HEAD"),
                target: Target::Rev("HEAD".into()),
            }],
            DiffStrategy::PostCheckout {
                previous, current, ..
            } => {
                let base = if is_null(previous) {
                    Base::EmptyTree
                } else {
                    Base::Rev(previous.clone())
                };
                vec![Comparison {
                    base,
                    target: Target::Rev(current.clone()),
                }]
            }
            DiffStrategy::PostMerge { .. } => post_merge(repo, pre_merge_ref, merge()),
            DiffStrategy::PostRewrite { rewritten } => match (rewritten.first(), rewritten.last()) {
                (Some(first), Some(last)) => vec![Comparison {
                    base: first_parent(repo, &first.new_sha),
                    target: Target::Rev(last.new_sha.clone()),
                }],
                _ => Vec::new(),
            },
            DiffStrategy::PrePush { refs } => refs
                .iter()
                .filter(|pushed| !pushed.deleted())
                .map(|pushed| Comparison {
                    base: if pushed.created() {
                        Base::EmptyTree
                    } else {
                        Base::Rev(pushed.remote_sha.clone())
                    },
                    target: Target::Rev(pushed.local_sha.clone()),
                })
                .collect(),
        };

        Scope::Diff(comparisons)
    }
}

fn first_parent<R: CommandRunner>(repo: &GitRepo<R>, rev: &str) -> Base {
    repo.parents(rev)
        .into_iter()
        .next()
        .map(Base::Rev)
        .unwrap_or(Base::EmptyTree)
}

/// The commit `HEAD` pointed at before the merge began.
fn pre_merge_head<R: CommandRunner>(repo: &GitRepo<R>, pre_merge_ref: PreMergeRef) -> String {
    for candidate in pre_merge_ref.candidates() {
        if let Some(sha) = repo.resolve(candidate) {
            tracing::debug!(candidate, %sha, "resolved pre-merge ref");
            return sha;
        }
    }
    tracing::warn!("no pre-merge ref resolved, comparing against HEAD");
    "HEAD".to_string()
}

fn post_merge<R: CommandRunner>(
    repo: &GitRepo<R>,
    pre_merge_ref: PreMergeRef,
    shape: MergeShape,
) -> Vec<Comparison> {
    let base = pre_merge_head(repo, pre_merge_ref);
    let head = repo.resolve("HEAD");
    let head_moved = head.as_deref().is_some_and(|sha| sha != base);

    if shape.merge_commit && !shape.squash {
        let parents = repo.parents("HEAD");
        // A fast-forward onto someone else's merge commit keeps the plain
        // range below; only a merge made on top of our old HEAD uses the
        // merge base.
        let made_here = !head_moved || parents.first().is_some_and(|p| *p == base);
        if made_here {
            return match repo.merge_base(&parents) {
                Some(merge_base) => vec![Comparison::revs(merge_base, "HEAD")],
                None => {
                    // Unrelated histories: everything the merge commit holds is new.
                    vec![Comparison {
                        base: Base::EmptyTree,
                        target: Target::Rev("HEAD".into()),
                    }]
                }
            };
        }
    }

    if shape.squash && (!head_moved || repo.squash_message_present()) {
        // Squash result still sitting in the index.
        vec![Comparison::staged(Base::Rev(base))]
    } else {
        vec![Comparison::revs(base, "HEAD")]
    }
}
