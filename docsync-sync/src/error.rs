//! Error types for docsync-sync.

use std::path::PathBuf;

use thiserror::Error;

use docsync_core::{DocKey, ProviderError, SymbolName};

/// All errors that can arise from pipeline operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Symbol lookup or documentation generation failed.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// No snapshot exists for the requested key.
    #[error("no rollback snapshot for {key}")]
    RollbackNotFound { key: DocKey },

    /// A change referenced a symbol the provider did not return.
    #[error("symbol '{symbol}' missing from provider output for {file}")]
    SymbolMissing { file: PathBuf, symbol: SymbolName },

    /// Writing the change-log export failed.
    #[error("failed to export change log to {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error (export).
    #[error("export JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}

/// Convenience constructor for [`SyncError::Export`].
pub(crate) fn export_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Export {
        path: path.into(),
        source,
    }
}
