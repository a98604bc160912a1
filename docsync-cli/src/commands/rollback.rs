//! `docsync rollback`: restore a symbol's previous documentation.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use docsync_core::DocumentationRecord;
use docsync_daemon::{request_rollback, DaemonError};

#[derive(Args, Debug)]
pub struct RollbackArgs {
    /// Source file declaring the symbol.
    pub file: PathBuf,

    /// Qualified symbol name (`Stack.push`).
    pub symbol: String,
}

impl RollbackArgs {
    pub fn run(self) -> Result<()> {
        let home = super::home()?;
        // Records are keyed by canonical path; a deleted file can no longer
        // be canonicalized, so fall back to the absolute path.
        let file = match self.file.canonicalize() {
            Ok(path) => path,
            Err(_) => super::absolute(&self.file)?,
        };

        let data = match request_rollback(&home, file, self.symbol.clone()) {
            Ok(data) => data,
            Err(DaemonError::DaemonNotRunning { .. }) => bail!(super::not_running_message()),
            Err(err) => {
                return Err(err).with_context(|| format!("rollback of '{}' failed", self.symbol))
            }
        };
        let record: DocumentationRecord =
            serde_json::from_value(data).context("unexpected rollback response")?;

        println!(
            "{} restored documentation for {} ({})",
            "✓".green().bold(),
            record.key.symbol.as_str().bold(),
            record.key.file.display()
        );
        println!();
        print!("{}", record.content.to_text());
        Ok(())
    }
}
