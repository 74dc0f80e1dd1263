//! Tagmend CLI: the `tagmend` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Audit {
            config,
            log,
            csv,
            json,
        } => commands::audit::run(config, log, csv, json),

        Commands::Remediate {
            config,
            log,
            mode,
            settle_secs,
            skip_conflicts,
            json,
        } => commands::remediate::run(commands::remediate::Args {
            config,
            log,
            mode,
            settle_secs,
            skip_conflicts,
            json,
        }),

        Commands::Boundaries { json } => commands::boundaries::run(json),
    }
}
