pub mod files;
pub mod lines;
pub mod run;

use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};

use hookline_core::discovery::load_config_or_default;
use hookline_core::{HookConfig, HookContext, HookEvent, InvocationContext};

use crate::output::Reporter;

/// Resolves the directory commands operate in.
fn repo_dir(repo: Option<&str>, reporter: &mut Reporter) -> Option<PathBuf> {
    if let Some(dir) = repo {
        return Some(PathBuf::from(dir));
    }
    match std::env::current_dir() {
        Ok(c) => Some(c),
        Err(e) => {
            reporter.error(&format!("Cannot get current directory: {e}"));
            None
        }
    }
}

/// Reads what git piped to the hook. Nothing is read from a terminal.
fn read_hook_input(event: HookEvent, reporter: &mut Reporter) -> Option<String> {
    let mut input = String::new();
    if !event.reads_stdin() || std::io::stdin().is_terminal() {
        return Some(input);
    }
    match std::io::stdin().read_to_string(&mut input) {
        Ok(_) => Some(input),
        Err(e) => {
            reporter.error(&format!("Cannot read hook input: {e}"));
            None
        }
    }
}

/// Builds the hook context and loads the repository configuration,
/// reporting any failure.
pub fn open_context(
    event: HookEvent,
    args: &[String],
    repo: Option<&str>,
    reporter: &mut Reporter,
) -> Option<(HookContext, HookConfig)> {
    let dir = repo_dir(repo, reporter)?;
    let input = read_hook_input(event, reporter)?;

    let context = match HookContext::open(
        InvocationContext::new(event, args.to_vec()).with_input(input),
        &dir,
    ) {
        Ok(c) => c,
        Err(e) => {
            reporter.error(&format!("{e}"));
            return None;
        }
    };

    let config = match load_config_or_default(context.repo().root()) {
        Ok(c) => c,
        Err(e) => {
            reporter.error(&format!("Failed to load configuration: {e}"));
            return None;
        }
    };

    Some((context.with_pre_merge_ref(config.pre_merge_ref), config))
}

/// `path` relative to the repository root, for display.
pub fn display_path(context: &HookContext, path: &Path) -> String {
    path.strip_prefix(context.repo().root())
        .unwrap_or(path)
        .display()
        .to_string()
}
