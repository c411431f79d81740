use hookline_core::HookEvent;

use crate::commands::{display_path, open_context};
use crate::output::Reporter;

/// Prints every file the hook invocation covers, one per line.
pub fn run_files(
    event: HookEvent,
    args: &[String],
    repo: Option<&str>,
    reporter: &mut Reporter,
) -> bool {
    let Some((context, _)) = open_context(event, args, repo, reporter) else {
        return false;
    };

    let files: Vec<String> = context
        .modified_files()
        .iter()
        .map(|f| display_path(&context, f))
        .collect();

    for file in &files {
        reporter.item(file);
    }
    reporter.data(&files);
    true
}
