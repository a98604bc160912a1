//! Seams to the external collaborators of the pipeline.
//!
//! Both are awaited from the dispatcher only, one call at a time.

use std::path::Path;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::types::{DocumentationContent, DocumentationLevel, Symbol};

/// Extracts the current symbol list of a source file.
#[async_trait]
pub trait SymbolProvider: Send + Sync {
    /// Return every symbol currently defined in `file`.
    ///
    /// Parse failures must be reported as [`ProviderError::Parse`], never by
    /// panicking or by returning an empty list.
    async fn symbols(&self, file: &Path) -> Result<Vec<Symbol>, ProviderError>;
}

/// Produces human-readable documentation for one symbol.
#[async_trait]
pub trait DocumentationGenerator: Send + Sync {
    async fn generate(
        &self,
        symbol: &Symbol,
        file: &Path,
        level: DocumentationLevel,
    ) -> Result<DocumentationContent, ProviderError>;
}
