//! Per-language symbol extractors over a tree-sitter syntax tree.
//!
//! Each language module walks the named children of the root and pushes one
//! symbol per declaration into an [`Extractor`]. Function bodies are not
//! descended into; container bodies (classes, impls, traits, modules,
//! namespaces) are, with the container's qualified name as the prefix.

pub(crate) mod c_family;
pub(crate) mod go;
pub(crate) mod java;
pub(crate) mod javascript;
pub(crate) mod python;
pub(crate) mod rust;

use tree_sitter::Node;

use docsync_core::{Symbol, SymbolKind};

use crate::{body_fingerprint, declaration_text};

/// Shared state for one extraction run: the source text and the symbols
/// found so far.
pub(crate) struct Extractor<'src> {
    source: &'src str,
    symbols: Vec<Symbol>,
}

impl<'src> Extractor<'src> {
    pub fn new(source: &'src str) -> Self {
        Extractor {
            source,
            symbols: Vec::new(),
        }
    }

    pub fn into_symbols(self) -> Vec<Symbol> {
        self.symbols
    }

    pub fn text(&self, node: Node<'_>) -> &'src str {
        node.utf8_text(self.source.as_bytes()).unwrap_or_default()
    }

    /// Text of the `field` child, if present and non-empty.
    pub fn field_text(&self, node: Node<'_>, field: &str) -> Option<&'src str> {
        node.child_by_field_name(field)
            .map(|child| self.text(child))
            .filter(|text| !text.is_empty())
    }

    /// Declaration text from the start of `outer` up to the start of `body`,
    /// or the whole of `outer` when there is no body.
    pub fn declaration(&self, outer: Node<'_>, body: Option<Node<'_>>) -> String {
        let end = body
            .map(|b| b.start_byte())
            .filter(|&end| end >= outer.start_byte())
            .unwrap_or(outer.end_byte());
        self.span(outer.start_byte(), end)
    }

    /// Declaration text of the byte range `start..end`.
    pub fn span(&self, start: usize, end: usize) -> String {
        declaration_text(self.source.get(start..end).unwrap_or_default())
    }

    pub fn fingerprint(&self, body: Option<Node<'_>>) -> Option<String> {
        body.and_then(|body| body_fingerprint(self.text(body).lines()))
    }

    /// Record a declaration found at `at`.
    pub fn push(&mut self, found: Found<'_>, at: Node<'_>) {
        let Found {
            kind,
            name,
            container,
            detail,
            body,
        } = found;
        let position = at.start_position();
        let mut symbol = Symbol::new(
            qualify(container, name),
            kind,
            position.row as u32,
            position.column as u32,
        )
        .with_detail(detail);
        if let Some(container) = container {
            symbol = symbol.with_container(container);
        }
        if let Some(body) = body {
            symbol = symbol.with_body_fingerprint(body);
        }
        self.symbols.push(symbol);
    }
}

/// One declaration, before qualification.
pub(crate) struct Found<'a> {
    pub kind: SymbolKind,
    pub name: &'a str,
    pub container: Option<&'a str>,
    pub detail: String,
    pub body: Option<String>,
}

/// `container.name`, or `name` at the top level.
pub(crate) fn qualify(container: Option<&str>, name: &str) -> String {
    match container {
        Some(container) => format!("{container}.{name}"),
        None => name.to_string(),
    }
}

/// `SCREAMING_CASE` names are constants in languages without a keyword for it.
pub(crate) fn is_constant_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_names() {
        assert!(is_constant_name("MAX_ITEMS"));
        assert!(is_constant_name("V2"));
        assert!(!is_constant_name("Max"));
        assert!(!is_constant_name("_HIDDEN"));
        assert!(!is_constant_name(""));
    }

    #[test]
    fn qualified_names() {
        assert_eq!(qualify(None, "run"), "run");
        assert_eq!(qualify(Some("Stack"), "push"), "Stack.push");
    }
}
