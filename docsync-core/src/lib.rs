//! docsync core library: domain types, signatures, collaborator traits,
//! configuration and errors.
//!
//! - [`types`]: newtypes, events, symbols, documentation records
//! - [`signature`]: [`SymbolSignature`] and change classification
//! - [`traits`]: [`SymbolProvider`] / [`DocumentationGenerator`]
//! - [`config`]: YAML [`SyncConfig`] load / save
//! - [`error`]: [`ConfigError`], [`ProviderError`]

pub mod config;
pub mod error;
pub mod signature;
pub mod traits;
pub mod types;

pub use config::{SyncConfig, WatchBackend};
pub use error::{ConfigError, ProviderError};
pub use signature::SymbolSignature;
pub use traits::{DocumentationGenerator, SymbolProvider};
pub use types::{
    ChangeEvent, ChangeKind, ChangeLogEntry, DocKey, DocParameter, DocumentationContent,
    DocumentationLevel, DocumentationRecord, EventKind, Impact, Location, SemanticChange, Symbol,
    SymbolKind, SymbolName,
};
