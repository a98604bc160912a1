//! `docsync stop`

use anyhow::{Context, Result};

use docsync_daemon::{request_stop, DaemonError};

pub fn run() -> Result<()> {
    let home = super::home()?;
    match request_stop(&home) {
        Ok(()) => println!("docsync stop requested"),
        Err(DaemonError::DaemonNotRunning { .. }) => println!("docsync is not running"),
        Err(err) => return Err(err).context("failed to stop docsync"),
    }
    Ok(())
}
