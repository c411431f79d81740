mod cli;
mod commands;
mod logging;
mod output;

use clap::{CommandFactory, Parser};
use cli::{Cli, ColorMode, Commands};
use output::{OutputMode, Reporter};

fn main() {
    let cli = Cli::parse();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Human
    };

    match cli.color {
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Auto => {}
    }

    logging::init(cli.verbose);

    let mut reporter = Reporter::new(mode);
    let repo = cli.repo.as_deref();

    let success = match cli.command {
        Commands::Files { event, args } => {
            commands::files::run_files(event, &args, repo, &mut reporter)
        }
        Commands::Lines { event, path, args } => {
            commands::lines::run_lines(event, &path, &args, repo, &mut reporter)
        }
        Commands::Run { event, args } => commands::run::run_hook(event, &args, repo, &mut reporter),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "hookline",
                &mut std::io::stdout(),
            );
            true
        }
    };

    reporter.finish();

    if !success {
        std::process::exit(1);
    }
}
