//! docsync: keep symbol documentation in step with source edits.
//!
//! # Usage
//!
//! ```text
//! docsync watch <path>... [--level minimal|standard|comprehensive] [--backend auto|notify|poll]
//! docsync status [--json]
//! docsync activity [--window <secs>] [--json]
//! docsync history [--symbol <name>] [--file <path>] [--since <secs>] [--limit <n>] [--diff]
//! docsync rollback <file> <symbol>
//! docsync export [<path>]
//! docsync stop
//! docsync config show|path|init
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    activity::ActivityArgs, config::ConfigCommand, export::ExportArgs, history::HistoryArgs,
    rollback::RollbackArgs, status::StatusArgs, watch::WatchArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "docsync",
    version,
    about = "Detect semantic code changes and keep symbol documentation in sync",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Watch paths in the foreground and synchronize documentation.
    Watch(WatchArgs),

    /// Show the running synchronizer's status.
    Status(StatusArgs),

    /// Summarize recent documentation changes.
    Activity(ActivityArgs),

    /// List change-log entries.
    History(HistoryArgs),

    /// Restore the documentation a symbol had before its last change.
    Rollback(RollbackArgs),

    /// Write the change log as JSON.
    Export(ExportArgs),

    /// Request a graceful shutdown of the running synchronizer.
    Stop,

    /// Inspect or create the configuration file.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Watch(args) => args.run(),
        Commands::Status(args) => args.run(),
        Commands::Activity(args) => args.run(),
        Commands::History(args) => args.run(),
        Commands::Rollback(args) => args.run(),
        Commands::Export(args) => args.run(),
        Commands::Stop => commands::stop::run(),
        Commands::Config { command } => commands::config::run(command),
    }
}
