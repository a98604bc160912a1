use std::path::{Path, PathBuf};

use docsync_core::ProviderError;
use thiserror::Error;

/// Errors from symbol detection.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no grammar for '{path}'")]
    Unsupported { path: PathBuf },

    #[error("failed to load the {language} grammar: {message}")]
    Grammar {
        language: &'static str,
        message: String,
    },

    #[error("the {language} parser produced no tree")]
    NoTree { language: &'static str },

    /// The tree contains an `ERROR` or `MISSING` node.
    #[error("syntax error on line {line}, column {column}: {detail}")]
    Syntax {
        line: u32,
        column: u32,
        detail: String,
    },
}

impl DetectError {
    /// True when the source was read but could not be parsed cleanly.
    pub fn is_syntax(&self) -> bool {
        matches!(self, DetectError::Syntax { .. })
    }

    /// Attach `path` and convert into the provider error surface.
    pub fn into_provider_error(self, path: &Path) -> ProviderError {
        match self {
            DetectError::Io { path, source } => ProviderError::Io { path, source },
            DetectError::Unsupported { path } => ProviderError::Unsupported { path },
            other => ProviderError::Parse {
                path: path.to_path_buf(),
                message: other.to_string(),
            },
        }
    }
}
