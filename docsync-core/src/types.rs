//! Domain types for the docsync pipeline.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.
//! All types are serializable/deserializable via serde; timestamps serialize
//! as ISO-8601 through chrono.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::signature::SymbolSignature;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed name for a code symbol (function, class, variable, …).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolName(pub String);

impl SymbolName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SymbolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for SymbolName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SymbolName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Key of a documentation record and of its rollback slot: `(file, symbol)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocKey {
    pub file: PathBuf,
    pub symbol: SymbolName,
}

impl DocKey {
    pub fn new(file: impl Into<PathBuf>, symbol: impl Into<SymbolName>) -> Self {
        Self {
            file: file.into(),
            symbol: symbol.into(),
        }
    }
}

impl fmt::Display for DocKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.symbol)
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Kind of filesystem change reported by a change source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Created,
    Modified,
    Deleted,
    Moved,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Created => write!(f, "created"),
            EventKind::Modified => write!(f, "modified"),
            EventKind::Deleted => write!(f, "deleted"),
            EventKind::Moved => write!(f, "moved"),
        }
    }
}

/// Category of a code symbol as reported by a symbol provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Module,
    Class,
    Struct,
    Enum,
    Trait,
    Interface,
    #[default]
    Function,
    Method,
    Constant,
    Variable,
    TypeAlias,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SymbolKind::Module => "module",
            SymbolKind::Class => "class",
            SymbolKind::Struct => "struct",
            SymbolKind::Enum => "enum",
            SymbolKind::Trait => "trait",
            SymbolKind::Interface => "interface",
            SymbolKind::Function => "function",
            SymbolKind::Method => "method",
            SymbolKind::Constant => "constant",
            SymbolKind::Variable => "variable",
            SymbolKind::TypeAlias => "type_alias",
        };
        f.write_str(label)
    }
}

/// Classification of a symbol-level change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Deleted,
    Modified,
    SignatureChanged,
    Moved,
}

impl ChangeKind {
    /// Fixed impact table.
    pub fn impact(self) -> Impact {
        match self {
            ChangeKind::SignatureChanged => Impact::High,
            ChangeKind::Deleted => Impact::High,
            ChangeKind::Moved => Impact::Low,
            ChangeKind::Modified => Impact::Medium,
            ChangeKind::Added => Impact::Medium,
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Added => write!(f, "added"),
            ChangeKind::Deleted => write!(f, "deleted"),
            ChangeKind::Modified => write!(f, "modified"),
            ChangeKind::SignatureChanged => write!(f, "signature_changed"),
            ChangeKind::Moved => write!(f, "moved"),
        }
    }
}

/// Severity of a semantic change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Low,
    Medium,
    High,
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Impact::Low => write!(f, "low"),
            Impact::Medium => write!(f, "medium"),
            Impact::High => write!(f, "high"),
        }
    }
}

/// Verbosity requested from the documentation generator. The pipeline passes
/// it through without interpreting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DocumentationLevel {
    Minimal,
    #[default]
    Standard,
    Comprehensive,
}

impl fmt::Display for DocumentationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentationLevel::Minimal => write!(f, "minimal"),
            DocumentationLevel::Standard => write!(f, "standard"),
            DocumentationLevel::Comprehensive => write!(f, "comprehensive"),
        }
    }
}

impl FromStr for DocumentationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minimal" => Ok(Self::Minimal),
            "standard" => Ok(Self::Standard),
            "comprehensive" => Ok(Self::Comprehensive),
            other => Err(format!(
                "unknown documentation level '{other}'; expected: minimal, standard, comprehensive"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Events and symbols
// ---------------------------------------------------------------------------

/// One observed filesystem change. Consumed exactly once by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
    /// SHA-256 hex digest of the file content, when the source computed one.
    #[serde(default)]
    pub fingerprint: Option<String>,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>, kind: EventKind) -> Self {
        Self {
            path: path.into(),
            kind,
            timestamp: Utc::now(),
            fingerprint: None,
        }
    }

    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = Some(fingerprint.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Zero-based position of a symbol inside its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

/// A named code entity. Transient: fetched fresh from the provider on every
/// diff pass and never persisted on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: SymbolName,
    pub kind: SymbolKind,
    pub location: Location,
    /// Declaration text (e.g. `fn parse(input: &str) -> Ast`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Enclosing symbol, for methods and nested items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    /// Fingerprint of the symbol body, if the provider can compute one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_fingerprint: Option<String>,
}

impl Symbol {
    pub fn new(name: impl Into<SymbolName>, kind: SymbolKind, line: u32, column: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            location: Location { line, column },
            detail: None,
            container: None,
            body_fingerprint: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.container = Some(container.into());
        self
    }

    pub fn with_body_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.body_fingerprint = Some(fingerprint.into());
        self
    }

    pub fn signature(&self) -> SymbolSignature {
        SymbolSignature::of(self)
    }
}

/// A meaningful symbol-level change derived by the diff engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticChange {
    pub symbol: SymbolName,
    pub kind: ChangeKind,
    pub old_signature: Option<SymbolSignature>,
    pub new_signature: Option<SymbolSignature>,
    pub file: PathBuf,
    pub line: u32,
    pub impact: Impact,
}

impl SemanticChange {
    pub fn key(&self) -> DocKey {
        DocKey::new(self.file.clone(), self.symbol.clone())
    }
}

// ---------------------------------------------------------------------------
// Documentation
// ---------------------------------------------------------------------------

/// A documented parameter of a callable symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocParameter {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_hint: Option<String>,
    #[serde(default)]
    pub description: String,
}

/// Generated documentation for one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DocumentationContent {
    pub description: String,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub parameters: Vec<DocParameter>,
    #[serde(default)]
    pub returns: Option<String>,
    #[serde(default)]
    pub examples: Vec<String>,
}

impl DocumentationContent {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    /// Flat text rendering used for content diffs.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if let Some(signature) = &self.signature {
            out.push_str(signature);
            out.push('\n');
        }
        out.push_str(&self.description);
        out.push('\n');
        for param in &self.parameters {
            match &param.type_hint {
                Some(ty) => out.push_str(&format!("- {} ({ty}): {}\n", param.name, param.description)),
                None => out.push_str(&format!("- {}: {}\n", param.name, param.description)),
            }
        }
        if let Some(returns) = &self.returns {
            out.push_str(&format!("returns: {returns}\n"));
        }
        for example in &self.examples {
            out.push_str(example);
            out.push('\n');
        }
        out
    }
}

/// Stored documentation for one `(file, symbol)` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentationRecord {
    pub key: DocKey,
    pub content: DocumentationContent,
    pub last_updated: DateTime<Utc>,
}

impl DocumentationRecord {
    pub fn new(key: DocKey, content: DocumentationContent) -> Self {
        Self {
            key,
            content,
            last_updated: Utc::now(),
        }
    }

    pub fn file(&self) -> &Path {
        &self.key.file
    }
}

/// Immutable audit record of one applied change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeLogEntry {
    pub symbol: SymbolName,
    pub file: PathBuf,
    pub timestamp: DateTime<Utc>,
    pub kind: ChangeKind,
    pub old_content: Option<DocumentationContent>,
    pub new_content: Option<DocumentationContent>,
    pub triggered_by: ChangeEvent,
    pub semantic_change: SemanticChange,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
