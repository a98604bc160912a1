//! `docsync status`: snapshot of the running synchronizer.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use docsync_daemon::paths::socket_path;
use docsync_daemon::{request_status, DaemonError, StatusSnapshot};

/// Arguments for `docsync status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct CounterRow {
    #[tabled(rename = "counter")]
    name: &'static str,
    #[tabled(rename = "value")]
    value: String,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let home = super::home()?;
        let data = match request_status(&home) {
            Ok(data) => data,
            Err(DaemonError::DaemonNotRunning { .. }) => {
                if self.json {
                    return super::print_json(&serde_json::json!({
                        "running": false,
                        "socket": socket_path(&home).display().to_string(),
                    }));
                }
                println!("{} {}", "■".bright_black().bold(), super::not_running_message());
                return Ok(());
            }
            Err(err) => return Err(err).context("failed to query docsync status"),
        };

        if self.json {
            return super::print_json(&data);
        }
        let snapshot: StatusSnapshot =
            serde_json::from_value(data).context("unexpected status response")?;
        print_snapshot(&snapshot);
        Ok(())
    }
}

fn print_snapshot(snapshot: &StatusSnapshot) {
    let indicator = if snapshot.running {
        "■".green().bold()
    } else {
        "■".yellow().bold()
    };
    println!(
        "{indicator} docsync v{} | {} | backend: {}",
        env!("CARGO_PKG_VERSION"),
        if snapshot.running { "RUNNING" } else { "STOPPED" },
        snapshot.backend.as_deref().unwrap_or("none"),
    );
    for path in &snapshot.watched_paths {
        println!("  watching {}", path.display());
    }

    let mut rows = vec![CounterRow {
        name: "queue depth",
        value: snapshot.queue_depth.to_string(),
    }];
    if let Some(view) = &snapshot.pipeline {
        rows.extend([
            ("documentation level", view.documentation_level.to_string()),
            ("cached files", view.cached_files.to_string()),
            ("cached symbols", view.cached_symbols.to_string()),
            ("documented symbols", view.documented_symbols.to_string()),
            ("rollback slots", view.rollback_slots.to_string()),
            ("logged changes", view.logged_changes.to_string()),
            ("events processed", view.counts.events_processed.to_string()),
            ("duplicates skipped", view.counts.duplicates_skipped.to_string()),
            ("provider failures", view.counts.provider_failures.to_string()),
            ("updates failed", view.counts.updates_failed.to_string()),
        ]
        .into_iter()
        .map(|(name, value)| CounterRow { name, value }));
    }
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}
