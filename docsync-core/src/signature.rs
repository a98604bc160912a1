//! Structural symbol signatures: the baseline the semantic diff compares.
//!
//! A signature has three parts:
//! - `shape`: kind, container and declaration text; position independent
//! - `body` : optional fingerprint of the symbol body
//! - `line` / `column`: position only
//!
//! Rendered as `shape[#body]@line:column`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{ChangeKind, Symbol};

/// Number of body-fingerprint characters shown by `Display`.
const BODY_PREVIEW_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolSignature {
    pub shape: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub line: u32,
    pub column: u32,
}

impl SymbolSignature {
    /// Build the signature of a provider symbol.
    pub fn of(symbol: &Symbol) -> Self {
        let declaration = symbol
            .detail
            .as_deref()
            .map(normalize_whitespace)
            .unwrap_or_else(|| symbol.name.0.clone());
        let shape = match &symbol.container {
            Some(container) => format!("{} {}::{}", symbol.kind, container, declaration),
            None => format!("{} {}", symbol.kind, declaration),
        };
        Self {
            shape,
            body: symbol.body_fingerprint.clone(),
            line: symbol.location.line,
            column: symbol.location.column,
        }
    }

    /// Classify the change from `self` (cached) to `current`.
    ///
    /// Returns `None` when both signatures are identical.
    pub fn classify(&self, current: &SymbolSignature) -> Option<ChangeKind> {
        if self == current {
            return None;
        }
        if self.shape != current.shape {
            return Some(ChangeKind::SignatureChanged);
        }
        if self.body != current.body {
            return Some(ChangeKind::Modified);
        }
        Some(ChangeKind::Moved)
    }

    pub fn position(&self) -> (u32, u32) {
        (self.line, self.column)
    }
}

impl fmt::Display for SymbolSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.shape)?;
        if let Some(body) = &self.body {
            let preview: String = body.chars().take(BODY_PREVIEW_LEN).collect();
            write!(f, "#{preview}")?;
        }
        write!(f, "@{}:{}", self.line, self.column)
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SymbolKind;

    fn parse_fn(line: u32) -> Symbol {
        Symbol::new("parse", SymbolKind::Function, line, 0).with_detail("fn parse(input: &str)")
    }

    #[test]
    fn identical_signatures_classify_as_none() {
        let sig = parse_fn(3).signature();
        assert_eq!(sig.classify(&parse_fn(3).signature()), None);
    }

    #[test]
    fn position_only_difference_is_moved() {
        let old = parse_fn(3).signature();
        let new = parse_fn(10).signature();
        assert_eq!(old.classify(&new), Some(ChangeKind::Moved));
    }

    #[test]
    fn declaration_difference_is_signature_changed() {
        let old = parse_fn(3).signature();
        let new = Symbol::new("parse", SymbolKind::Function, 3, 0)
            .with_detail("fn parse(input: &str, strict: bool)")
            .signature();
        assert_eq!(old.classify(&new), Some(ChangeKind::SignatureChanged));
    }

    #[test]
    fn body_difference_is_modified() {
        let old = parse_fn(3).with_body_fingerprint("aaaa").signature();
        let new = parse_fn(3).with_body_fingerprint("bbbb").signature();
        assert_eq!(old.classify(&new), Some(ChangeKind::Modified));
    }

    #[test]
    fn whitespace_in_declaration_is_not_structural() {
        let a = Symbol::new("parse", SymbolKind::Function, 1, 0)
            .with_detail("fn  parse(input:   &str)")
            .signature();
        let b = Symbol::new("parse", SymbolKind::Function, 1, 0)
            .with_detail("fn parse(input: &str)")
            .signature();
        assert_eq!(a, b);
    }

    #[test]
    fn display_includes_shape_body_and_position() {
        let sig = parse_fn(7)
            .with_container("Parser")
            .with_body_fingerprint("0123456789abcdef")
            .signature();
        assert_eq!(
            sig.to_string(),
            "function Parser::fn parse(input: &str)#0123456789ab@7:0"
        );
    }
}
