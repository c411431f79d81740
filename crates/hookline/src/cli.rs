use clap::{Parser, Subcommand, ValueEnum};
use hookline_core::HookEvent;

#[derive(Parser, Debug)]
#[command(
    name = "hookline",
    version,
    about = "Run checks against exactly the files and lines a git hook touched"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Color mode
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorMode,

    /// Log git queries to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Repository directory (defaults to the current directory)
    #[arg(long, global = true)]
    pub repo: Option<String>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the files a hook invocation covers
    Files {
        /// Hook event (pre-commit, post-merge, run-all, ...)
        event: HookEvent,

        /// Arguments git passed to the hook
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// List the modified lines of one file
    Lines {
        /// Hook event (pre-commit, post-merge, run-all, ...)
        event: HookEvent,

        /// File to inspect, absolute or relative to the repository root
        path: String,

        /// Arguments git passed to the hook
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Run the configured checks for a hook event
    Run {
        /// Hook event (pre-commit, post-merge, run-all, ...)
        event: HookEvent,

        /// Arguments git passed to the hook
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}
