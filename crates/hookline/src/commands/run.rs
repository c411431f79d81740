use hookline_core::check::run_checks;
use hookline_core::HookEvent;

use crate::commands::open_context;
use crate::output::Reporter;

/// Runs the configured checks for `event`. Returns `false` when any check
/// fails or cannot run.
pub fn run_hook(
    event: HookEvent,
    args: &[String],
    repo: Option<&str>,
    reporter: &mut Reporter,
) -> bool {
    let Some((context, config)) = open_context(event, args, repo, reporter) else {
        return false;
    };

    reporter.section(&format!("hookline {event}"));

    if context.is_squash() {
        reporter.info("Squash merge: checking the staged result");
    }

    let summary = run_checks(&context, &config);
    if summary.reports.is_empty() {
        reporter.info(&format!("No checks configured for {event}"));
    }

    reporter.report_summary(&summary);
    summary.passed()
}
