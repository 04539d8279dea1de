// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "slipway")]
#[command(about = "Commit-driven build, publish, and rollout pipeline")]
#[command(version)]
pub struct Cli {
    /// Enable debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result (CI-friendly)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit machine-readable JSON output
    #[arg(long, global = true, conflicts_with = "quiet")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new slipway.yml configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Run the pipeline for one commit event
    Run {
        /// Source branch of the commit
        #[arg(short, long, required_unless_present = "event")]
        branch: Option<String>,

        /// Commit revision (hex hash)
        #[arg(short, long, required_unless_present = "event")]
        revision: Option<String>,

        /// Read a JSON commit event from a file ('-' for stdin) instead
        #[arg(long, conflicts_with_all = ["branch", "revision"])]
        event: Option<String>,
    },

    /// Show persisted pipeline runs
    Status {
        /// Show one run in full instead of the recent list
        #[arg(long)]
        run: Option<String>,
    },

    /// Print the branch-to-target mapping
    Targets {
        /// Limit to one branch
        #[arg(short, long)]
        branch: Option<String>,
    },
}
