use std::path::Path;

use hookline_core::{HookEvent, HooklineError};
use serde::Serialize;

use crate::commands::{display_path, open_context};
use crate::output::Reporter;

#[derive(Serialize)]
struct FileLines {
    file: String,
    lines: Vec<u32>,
}

/// Prints the modified line numbers of `path`, one per line.
pub fn run_lines(
    event: HookEvent,
    path: &str,
    args: &[String],
    repo: Option<&str>,
    reporter: &mut Reporter,
) -> bool {
    let Some((context, _)) = open_context(event, args, repo, reporter) else {
        return false;
    };

    match context.modified_lines_in_file(Path::new(path)) {
        Ok(lines) => {
            for line in &lines {
                reporter.item(&line.to_string());
            }
            let file = context.repo().absolute(Path::new(path));
            reporter.data(&FileLines {
                file: display_path(&context, &file),
                lines: lines.into_iter().collect(),
            });
            true
        }
        Err(HooklineError::NotModified(file)) => {
            reporter.error(&format!(
                "{} is not modified by this {event} invocation",
                display_path(&context, &file)
            ));
            false
        }
        Err(e) => {
            reporter.error(&format!("{e}"));
            false
        }
    }
}
