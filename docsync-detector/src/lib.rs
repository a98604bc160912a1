//! Tree-sitter symbol detection for `docsync-detector`.
//!
//! [`extract_symbols`] parses a file with the grammar for its language and
//! reports the top-level and member declarations, each with its declaration
//! text and a fingerprint of its body. A tree containing `ERROR` or `MISSING`
//! nodes is reported as [`DetectError::Syntax`] rather than as a partial
//! symbol list, so a half-typed file never looks like a mass deletion.
//!
//! [`TreeSitterProvider`] wraps it as a [`SymbolProvider`].

mod error;
mod extractors;

use std::fs;
use std::path::Path;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tree_sitter::{Node, Parser, Tree};

use docsync_core::{ProviderError, Symbol, SymbolProvider};

pub use error::DetectError;

use extractors::Extractor;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Languages with a grammar and an extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    /// TypeScript with JSX.
    Tsx,
    Rust,
    Go,
    Java,
    C,
    Cpp,
}

impl Language {
    /// Pick the grammar from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        let language = match ext.as_str() {
            "py" | "pyi" => Language::Python,
            "js" | "jsx" | "mjs" | "cjs" => Language::JavaScript,
            "ts" | "mts" | "cts" => Language::TypeScript,
            "tsx" => Language::Tsx,
            "rs" => Language::Rust,
            "go" => Language::Go,
            "java" => Language::Java,
            "c" | "h" => Language::C,
            "cc" | "cpp" | "cxx" | "hh" | "hpp" | "hxx" => Language::Cpp,
            _ => return None,
        };
        Some(language)
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
            Language::Tsx => "TSX",
            Language::Rust => "Rust",
            Language::Go => "Go",
            Language::Java => "Java",
            Language::C => "C",
            Language::Cpp => "C++",
        }
    }

    fn grammar(self) -> tree_sitter::Language {
        match self {
            Language::Python => tree_sitter_python::LANGUAGE.into(),
            Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Language::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Language::Rust => tree_sitter_rust::LANGUAGE.into(),
            Language::Go => tree_sitter_go::LANGUAGE.into(),
            Language::Java => tree_sitter_java::LANGUAGE.into(),
            Language::C => tree_sitter_c::LANGUAGE.into(),
            Language::Cpp => tree_sitter_cpp::LANGUAGE.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse `source` and reject trees with syntax errors.
pub fn parse(language: Language, source: &str) -> Result<Tree, DetectError> {
    let mut parser = Parser::new();
    parser
        .set_language(&language.grammar())
        .map_err(|err| DetectError::Grammar {
            language: language.name(),
            message: err.to_string(),
        })?;
    let tree = parser
        .parse(source, None)
        .ok_or(DetectError::NoTree {
            language: language.name(),
        })?;

    if let Some(node) = first_error(tree.root_node()) {
        let at = node.start_position();
        let detail = if node.is_missing() {
            format!("missing `{}`", node.kind())
        } else {
            let text = node.utf8_text(source.as_bytes()).unwrap_or_default();
            let snippet: String = text.lines().next().unwrap_or_default().chars().take(24).collect();
            format!("unexpected `{}`", snippet.trim())
        };
        return Err(DetectError::Syntax {
            line: at.row as u32 + 1,
            column: at.column as u32 + 1,
            detail,
        });
    }
    Ok(tree)
}

/// Extract the symbols declared in `source`, in declaration order.
///
/// Member names are qualified by their container (`Stack.push`).
pub fn extract_symbols(language: Language, source: &str) -> Result<Vec<Symbol>, DetectError> {
    let tree = parse(language, source)?;
    let mut extractor = Extractor::new(source);
    let root = tree.root_node();
    match language {
        Language::Python => extractors::python::extract(&mut extractor, root),
        Language::JavaScript | Language::TypeScript | Language::Tsx => {
            extractors::javascript::extract(&mut extractor, root)
        }
        Language::Rust => extractors::rust::extract(&mut extractor, root),
        Language::Go => extractors::go::extract(&mut extractor, root),
        Language::Java => extractors::java::extract(&mut extractor, root),
        Language::C | Language::Cpp => extractors::c_family::extract(&mut extractor, root),
    }
    Ok(extractor.into_symbols())
}

/// Read `path` and extract its symbols.
pub fn detect_file(path: &Path) -> Result<Vec<Symbol>, DetectError> {
    let language = Language::from_path(path).ok_or_else(|| DetectError::Unsupported {
        path: path.to_path_buf(),
    })?;
    let source = fs::read_to_string(path).map_err(|source| DetectError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    extract_symbols(language, &source)
}

/// [`SymbolProvider`] backed by the tree-sitter extractors.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeSitterProvider;

impl TreeSitterProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SymbolProvider for TreeSitterProvider {
    async fn symbols(&self, file: &Path) -> Result<Vec<Symbol>, ProviderError> {
        detect_file(file).map_err(|err| err.into_provider_error(file))
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// First `ERROR` or `MISSING` node in document order.
fn first_error<'t>(node: Node<'t>) -> Option<Node<'t>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error(child) {
            return Some(found);
        }
    }
    None
}

/// Fingerprint of a body: the trimmed non-blank lines, hashed.
pub(crate) fn body_fingerprint<'a>(lines: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let mut hasher = Sha256::new();
    let mut any = false;
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
        any = true;
    }
    any.then(|| hex::encode(&hasher.finalize()[..8]))
}

/// Declaration text on one line, without the trailing block opener.
pub(crate) fn declaration_text(code: &str) -> String {
    let mut text = code.split_whitespace().collect::<Vec<_>>().join(" ");
    loop {
        let trimmed = text
            .trim_end()
            .trim_end_matches(['{', ':', ';', '='])
            .trim_end();
        let trimmed = trimmed.strip_suffix("=>").unwrap_or(trimmed).trim_end();
        if trimmed.len() == text.len() {
            return text;
        }
        text = trimmed.to_string();
    }
}
