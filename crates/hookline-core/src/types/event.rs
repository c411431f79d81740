use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HooklineError;

/// The git hook being run, plus the synthetic `run-all` full-tree scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookEvent {
    PreCommit,
    CommitMsg,
    PostCommit,
    PostCheckout,
    PostMerge,
    PostRewrite,
    PrePush,
    RunAll,
}

impl HookEvent {
    pub const ALL: [HookEvent; 8] = [
        HookEvent::PreCommit,
        HookEvent::CommitMsg,
        HookEvent::PostCommit,
        HookEvent::PostCheckout,
        HookEvent::PostMerge,
        HookEvent::PostRewrite,
        HookEvent::PrePush,
        HookEvent::RunAll,
    ];

    /// Hook script name as git knows it.
    pub fn name(&self) -> &'static str {
        match self {
            HookEvent::PreCommit => "pre-commit",
            HookEvent::CommitMsg => "commit-msg",
            HookEvent::PostCommit => "post-commit",
            HookEvent::PostCheckout => "post-checkout",
            HookEvent::PostMerge => "post-merge",
            HookEvent::PostRewrite => "post-rewrite",
            HookEvent::PrePush => "pre-push",
            HookEvent::RunAll => "run-all",
        }
    }

    /// Whether git feeds this hook data on stdin.
    pub fn reads_stdin(&self) -> bool {
        matches!(self, HookEvent::PrePush | HookEvent::PostRewrite)
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for HookEvent {
    type Err = HooklineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HookEvent::ALL
            .into_iter()
            .find(|event| event.name() == s)
            .ok_or_else(|| HooklineError::UnknownEvent(s.to_string()))
    }
}

/// Everything git handed to a single hook invocation.
///
/// Built once and never mutated; strategy selection reads it and nothing
/// else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    event: HookEvent,
    args: Vec<String>,
    input: String,
}

impl InvocationContext {
    pub fn new(event: HookEvent, args: Vec<String>) -> Self {
        Self {
            event,
            args,
            input: String::new(),
        }
    }

    /// Attaches the text git wrote to the hook's stdin.
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = input.into();
        self
    }

    pub fn event(&self) -> HookEvent {
        self.event
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    pub fn input(&self) -> &str {
        &self.input
    }
}
