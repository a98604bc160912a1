use std::path::PathBuf;

use thiserror::Error;

/// Error surface for the change sources, orchestrator, runtime and protocol.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("notify error: {0}")]
    Notify(#[from] notify::Error),

    #[error("config error: {0}")]
    Config(#[from] docsync_core::ConfigError),

    #[error("sync error: {0}")]
    Sync(#[from] docsync_sync::SyncError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The push backend could not be started; callers fall back to polling.
    #[error("file watch backend unavailable: {0}")]
    WatchUnavailable(String),

    /// Neither the push nor the poll backend could be started.
    #[error("no change source could be started: {0}")]
    NoChangeSource(String),

    #[error("synchronization is already running")]
    AlreadyRunning,

    #[error("channel closed: {0}")]
    ChannelClosed(&'static str),

    #[error("daemon protocol error: {0}")]
    Protocol(String),

    #[error("daemon is not running (socket missing: {socket})")]
    DaemonNotRunning { socket: PathBuf },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DaemonError {
    DaemonError::Io {
        path: path.into(),
        source,
    }
}
