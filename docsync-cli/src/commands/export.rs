//! `docsync export`: dump the change log as JSON.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use docsync_daemon::{request_export, DaemonError};

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output file; defaults to `~/.docsync/changes.json`.
    pub path: Option<PathBuf>,
}

impl ExportArgs {
    pub fn run(self) -> Result<()> {
        let home = super::home()?;
        let path = self.path.as_deref().map(super::absolute).transpose()?;

        let data = match request_export(&home, path) {
            Ok(data) => data,
            Err(DaemonError::DaemonNotRunning { .. }) => bail!(super::not_running_message()),
            Err(err) => return Err(err).context("export failed"),
        };
        let entries = data.get("entries").and_then(|v| v.as_u64()).unwrap_or(0);
        let written = data
            .get("path")
            .and_then(|v| v.as_str())
            .unwrap_or("<unknown>");
        println!("exported {entries} change-log entries to {written}");
        Ok(())
    }
}
