// ABOUTME: Entry point for the slipway CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use slipway::config::{self, Config};
use slipway::error::Result;
use slipway::output::{Output, OutputMode};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let output = Output::new(mode);

    match run(cli, output).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli, output: Output) -> Result<i32> {
    match cli.command {
        Commands::Init { force } => {
            let cwd = env::current_dir()?;
            config::init_config(&cwd, force)?;
            Ok(0)
        }
        Commands::Run {
            branch,
            revision,
            event,
        } => {
            let cwd = env::current_dir()?;
            let config = Config::discover(&cwd)?;
            let event =
                commands::parse_event(branch.as_deref(), revision.as_deref(), event.as_deref())?;

            commands::run(config, event, output).await
        }
        Commands::Status { run } => {
            let cwd = env::current_dir()?;
            let config = Config::discover(&cwd)?;
            commands::status(config, run.as_deref(), cli.json)?;
            Ok(0)
        }
        Commands::Targets { branch } => {
            let cwd = env::current_dir()?;
            let config = Config::discover(&cwd)?;
            commands::targets(config, branch.as_deref())?;
            Ok(0)
        }
    }
}
