//! Error types for docsync-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can arise while loading or saving the docsync configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (permission denied, read-only fs, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load; includes file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`; cannot locate `~/.docsync/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

/// Failures reported by a symbol provider or documentation generator.
///
/// Always per-file or per-symbol: the pipeline logs them and moves on.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The source file could not be parsed.
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// The source file could not be read.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No provider is able to handle this file type.
    #[error("no symbol provider for {path}")]
    Unsupported { path: PathBuf },

    /// Documentation generation for a single symbol failed.
    #[error("documentation generation failed for '{symbol}': {message}")]
    Generation { symbol: String, message: String },
}

impl ProviderError {
    /// `true` for syntax/parse failures, which are expected during editing.
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, ProviderError::Parse { .. })
    }
}
