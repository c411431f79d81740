//! Runs configured checks against a hook context.
//!
//! A check is handed only the modified files that match its `include`
//! filter. Its findings are split into those on modified lines, which can
//! fail the hook, and those on untouched lines, which only warn.

use std::path::PathBuf;

use serde::Serialize;

use crate::check::finding::{ClassifiedFinding, Finding, FindingPattern, LineStatus, Severity};
use crate::command::CommandRunner;
use crate::context::HookContext;
use crate::types::{CheckDefinition, HookConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub name: String,
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub findings: Vec<ClassifiedFinding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckReport {
    fn new(name: &str, status: CheckStatus) -> Self {
        Self {
            name: name.to_string(),
            status,
            findings: Vec::new(),
            message: None,
        }
    }

    fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Results of every check that ran for one hook invocation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub reports: Vec<CheckReport>,
}

impl RunSummary {
    pub fn status(&self) -> CheckStatus {
        self.reports
            .iter()
            .map(|r| r.status)
            .max()
            .unwrap_or(CheckStatus::Pass)
    }

    /// The hook should be allowed to proceed.
    pub fn passed(&self) -> bool {
        self.status() < CheckStatus::Fail
    }

    pub fn count(&self, status: CheckStatus) -> usize {
        self.reports.iter().filter(|r| r.status == status).count()
    }
}

/// Modified files the check applies to.
fn applicable_files<R: CommandRunner>(
    context: &HookContext<R>,
    check: &CheckDefinition,
) -> Vec<PathBuf> {
    context
        .modified_files()
        .iter()
        .filter(|file| {
            file.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| check.applies_to_file(name))
        })
        .cloned()
        .collect()
}

fn classify<R: CommandRunner>(context: &HookContext<R>, finding: Finding) -> ClassifiedFinding {
    let status = if !context.is_modified(&finding.file) {
        LineStatus::Unmodified
    } else {
        match context.modified_lines_in_file(&finding.file) {
            Ok(lines) if lines.contains(&finding.line) => LineStatus::Modified,
            _ => LineStatus::Unmodified,
        }
    };
    ClassifiedFinding { finding, status }
}

fn status_for(findings: &[ClassifiedFinding], tool_succeeded: bool) -> CheckStatus {
    let on_modified = |severity: Severity| {
        findings
            .iter()
            .any(|f| f.status == LineStatus::Modified && f.finding.severity == severity)
    };

    if on_modified(Severity::Error) {
        CheckStatus::Fail
    } else if !findings.is_empty() {
        CheckStatus::Warn
    } else if tool_succeeded {
        CheckStatus::Pass
    } else {
        CheckStatus::Error
    }
}

/// Runs one check and classifies what it reports.
pub fn run_check<R: CommandRunner>(
    context: &HookContext<R>,
    check: &CheckDefinition,
) -> CheckReport {
    let pattern = match FindingPattern::new(&check.pattern, &check.warning_types) {
        Ok(p) => p,
        Err(e) => return CheckReport::new(&check.name, CheckStatus::Error).with_message(e.to_string()),
    };

    if check.command.is_empty() {
        return CheckReport::new(&check.name, CheckStatus::Error)
            .with_message("Check has an empty command");
    }

    let files = applicable_files(context, check);
    if files.is_empty() {
        return CheckReport::new(&check.name, CheckStatus::Pass)
            .with_message("No applicable files");
    }

    let mut argv = check.command.clone();
    argv.extend(files.iter().map(|f| f.display().to_string()));

    let root = context.repo().root();
    let output = match context.repo().runner().execute(&argv, root) {
        Ok(output) => output,
        Err(e) => {
            return CheckReport::new(&check.name, CheckStatus::Error).with_message(e.to_string())
        }
    };

    let mut raw = output.stdout.clone();
    raw.push_str(&output.stderr);
    let findings: Vec<ClassifiedFinding> = pattern
        .extract(&raw, root)
        .into_iter()
        .map(|finding| classify(context, finding))
        .collect();

    let status = status_for(&findings, output.success());
    tracing::debug!(check = %check.name, ?status, findings = findings.len(), "check finished");

    let mut report = CheckReport::new(&check.name, status);
    if status == CheckStatus::Error {
        report = report.with_message(raw.trim().to_string());
    }
    report.findings = findings;
    report
}

/// Runs every configured check that applies to the context's event.
pub fn run_checks<R: CommandRunner>(context: &HookContext<R>, config: &HookConfig) -> RunSummary {
    let reports = config
        .checks
        .iter()
        .filter(|check| check.applies_to_event(context.event()))
        .map(|check| run_check(context, check))
        .collect();
    RunSummary { reports }
}
