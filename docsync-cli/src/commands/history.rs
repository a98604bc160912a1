//! `docsync history`: filtered change-log listing.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table};

use docsync_core::ChangeLogEntry;
use docsync_daemon::{request_history, DaemonError};
use docsync_sync::content_diff;

use super::activity::EntryRow;

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Only entries for this qualified symbol name.
    #[arg(long)]
    pub symbol: Option<String>,

    /// Only entries for this source file.
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Only entries from the last N seconds.
    #[arg(long)]
    pub since: Option<u64>,

    /// Maximum number of entries, newest first.
    #[arg(long, default_value_t = 20)]
    pub limit: usize,

    /// Show the documentation diff of each entry.
    #[arg(long)]
    pub diff: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl HistoryArgs {
    pub fn run(self) -> Result<()> {
        let home = super::home()?;
        let file = match &self.file {
            Some(file) => Some(file.canonicalize().or_else(|_| super::absolute(file))?),
            None => None,
        };

        let data = match request_history(&home, self.symbol, file, self.since, Some(self.limit)) {
            Ok(data) => data,
            Err(DaemonError::DaemonNotRunning { .. }) => bail!(super::not_running_message()),
            Err(err) => return Err(err).context("failed to query history"),
        };
        if self.json {
            return super::print_json(&data);
        }
        let entries: Vec<ChangeLogEntry> =
            serde_json::from_value(data).context("unexpected history response")?;
        if entries.is_empty() {
            println!("no matching changes");
            return Ok(());
        }

        if !self.diff {
            let rows: Vec<EntryRow> = entries.iter().map(EntryRow::of).collect();
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            println!("{table}");
            return Ok(());
        }

        for entry in &entries {
            let row = EntryRow::of(entry);
            println!(
                "{} {} {} ({})",
                row.time.bright_black(),
                row.kind,
                row.symbol.bold(),
                row.file
            );
            let diff = content_diff(entry);
            if diff.is_empty() {
                println!("  (no documentation change)");
            } else {
                print_diff(&diff);
            }
        }
        Ok(())
    }
}

fn print_diff(diff: &str) {
    for line in diff.lines() {
        if line.starts_with("+++") || line.starts_with("---") {
            println!("{}", line.bold());
        } else if line.starts_with('+') {
            println!("{}", line.green());
        } else if line.starts_with('-') {
            println!("{}", line.red());
        } else if line.starts_with("@@") {
            println!("{}", line.cyan());
        } else {
            println!("{line}");
        }
    }
}
