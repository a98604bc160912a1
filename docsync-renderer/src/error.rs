//! Error types for docsync-renderer.

use std::path::PathBuf;

use thiserror::Error;

use docsync_core::ProviderError;

/// All errors that can arise from template rendering operations.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Filesystem error while loading user templates.
    #[error("template io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
}

impl RenderError {
    /// Report as a per-symbol generation failure.
    pub fn into_provider_error(self, symbol: &str) -> ProviderError {
        let message = match &self {
            // Tera hides the useful part in the source chain.
            RenderError::Tera(err) => {
                let mut message = err.to_string();
                let mut source = std::error::Error::source(err);
                while let Some(inner) = source {
                    message.push_str(": ");
                    message.push_str(&inner.to_string());
                    source = inner.source();
                }
                message
            }
            other => other.to_string(),
        };
        ProviderError::Generation {
            symbol: symbol.to_string(),
            message,
        }
    }
}
