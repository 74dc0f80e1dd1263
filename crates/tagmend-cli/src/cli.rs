use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tagmend",
    about = "Tagmend: tag-governance reconciliation over cloud resource inventories",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan every reachable boundary for non-canonical tag keys; never mutates
    Audit {
        /// Path to the run configuration TOML
        #[arg(long, default_value = "tagmend.toml")]
        config: String,

        /// Run-log path (overrides the configuration)
        #[arg(long)]
        log: Option<String>,

        /// Export findings as CSV into DIR
        #[arg(long, value_name = "DIR")]
        csv: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rewrite non-canonical tags to the canonical key
    Remediate {
        /// Path to the run configuration TOML
        #[arg(long, default_value = "tagmend.toml")]
        config: String,

        /// Run-log path (overrides the configuration)
        #[arg(long)]
        log: Option<String>,

        /// Confirmation mode: apply-all, confirm-each, or abort
        /// (selected interactively when omitted)
        #[arg(long)]
        mode: Option<String>,

        /// Settling delay between delete and merge, in seconds
        /// (overrides the configuration)
        #[arg(long)]
        settle_secs: Option<u64>,

        /// Skip items whose canonical tag already exists instead of
        /// overwriting its value
        #[arg(long)]
        skip_conflicts: bool,

        /// Output the final summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the boundaries the operator can reach
    Boundaries {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
