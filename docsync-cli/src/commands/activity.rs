//! `docsync activity`: what changed recently.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use docsync_core::{ChangeKind, ChangeLogEntry, Impact};
use docsync_daemon::{request_activity, DaemonError};
use docsync_sync::ActivitySummary;

#[derive(Args, Debug)]
pub struct ActivityArgs {
    /// Trailing window in seconds (default: one hour).
    #[arg(long)]
    pub window: Option<u64>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
pub(crate) struct EntryRow {
    #[tabled(rename = "time")]
    pub time: String,
    #[tabled(rename = "change")]
    pub kind: String,
    #[tabled(rename = "impact")]
    pub impact: String,
    #[tabled(rename = "symbol")]
    pub symbol: String,
    #[tabled(rename = "file")]
    pub file: String,
}

impl EntryRow {
    pub(crate) fn of(entry: &ChangeLogEntry) -> Self {
        Self {
            time: super::local_time(entry.timestamp),
            kind: kind_label(entry.kind),
            impact: impact_label(entry.semantic_change.impact),
            symbol: entry.symbol.as_str().to_string(),
            file: entry.file.display().to_string(),
        }
    }
}

#[derive(Tabled)]
struct FileRow {
    #[tabled(rename = "file")]
    file: String,
    #[tabled(rename = "changes")]
    changes: usize,
}

impl ActivityArgs {
    pub fn run(self) -> Result<()> {
        let home = super::home()?;
        let data = match request_activity(&home, self.window) {
            Ok(data) => data,
            Err(DaemonError::DaemonNotRunning { .. }) => bail!(super::not_running_message()),
            Err(err) => return Err(err).context("failed to query activity"),
        };
        if self.json {
            return super::print_json(&data);
        }
        let summary: ActivitySummary =
            serde_json::from_value(data).context("unexpected activity response")?;
        print_summary(&summary);
        Ok(())
    }
}

fn print_summary(summary: &ActivitySummary) {
    println!(
        "{} change(s) since {}",
        summary.total.to_string().bold(),
        super::local_time(summary.since)
    );
    if summary.total == 0 {
        return;
    }
    let by_kind: Vec<String> = summary
        .by_kind
        .iter()
        .map(|(kind, count)| format!("{} {count}", kind_label(*kind)))
        .collect();
    println!("{}", by_kind.join("  "));

    let files: Vec<FileRow> = summary
        .top_files
        .iter()
        .map(|f| FileRow {
            file: f.file.display().to_string(),
            changes: f.changes,
        })
        .collect();
    let mut table = Table::new(files);
    table.with(Style::rounded());
    println!("{table}");

    let rows: Vec<EntryRow> = summary.latest.iter().map(EntryRow::of).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

pub(crate) fn kind_label(kind: ChangeKind) -> String {
    let label = kind.to_string();
    match kind {
        ChangeKind::Added => label.green().to_string(),
        ChangeKind::Deleted => label.red().to_string(),
        ChangeKind::SignatureChanged => label.yellow().to_string(),
        ChangeKind::Modified => label.cyan().to_string(),
        ChangeKind::Moved => label.bright_black().to_string(),
    }
}

pub(crate) fn impact_label(impact: Impact) -> String {
    let label = impact.to_string();
    match impact {
        Impact::High => label.red().bold().to_string(),
        Impact::Medium => label.yellow().to_string(),
        Impact::Low => label,
    }
}
