//! Template context: serializable rendering payload built from a [`Symbol`].
//!
//! Parameters and return types are recovered from the declaration text with
//! a small delimiter-aware splitter; no language grammar is involved.

use std::path::Path;

use serde::{Deserialize, Serialize};

use docsync_core::{DocumentationLevel, Symbol, SymbolKind};

use crate::error::RenderError;

/// Receivers that are never documented as parameters.
const RECEIVERS: &[&str] = &["self", "&self", "&mut self", "mut self", "cls", "this"];

/// Leading declaration keywords that are not part of a return type.
const MODIFIERS: &[&str] = &[
    "pub", "fn", "def", "func", "function", "async", "export", "default", "unsafe", "const",
    "extern", "public", "private", "protected", "static", "final", "abstract", "synchronized",
    "native", "inline", "virtual", "constexpr", "explicit", "override", "declare", "readonly",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateContext {
    /// Qualified name (`Stack.push`).
    pub name: String,
    /// Last path segment of `name`.
    pub short_name: String,
    pub kind: String,
    /// Human label for `kind` ("type alias").
    pub kind_label: String,
    pub container: Option<String>,
    pub file: String,
    pub file_name: String,
    /// One-based line of the declaration.
    pub line: u32,
    pub declaration: Option<String>,
    pub callable: bool,
    pub parameters: Vec<ParamCtx>,
    pub returns: Option<String>,
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamCtx {
    pub name: String,
    pub type_hint: Option<String>,
}

impl TemplateContext {
    /// Build a [`TemplateContext`] for `symbol` declared in `file`.
    pub fn from_symbol(symbol: &Symbol, file: &Path, level: DocumentationLevel) -> Self {
        let name = symbol.name.as_str().to_string();
        let short_name = name.rsplit('.').next().unwrap_or(&name).to_string();
        let callable = matches!(symbol.kind, SymbolKind::Function | SymbolKind::Method);
        let go = file.extension().and_then(|e| e.to_str()) == Some("go");

        let (parameters, returns) = match (symbol.detail.as_deref(), callable) {
            (Some(detail), true) if go => {
                let detail = without_receiver(detail);
                (parse_parameters(detail, go), parse_returns(detail, &short_name))
            }
            (Some(detail), true) => (
                parse_parameters(detail, go),
                parse_returns(detail, &short_name),
            ),
            _ => (Vec::new(), None),
        };

        TemplateContext {
            short_name,
            kind: symbol.kind.to_string(),
            kind_label: symbol.kind.to_string().replace('_', " "),
            container: symbol.container.clone(),
            file: file.display().to_string(),
            file_name: file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.display().to_string()),
            line: symbol.location.line + 1,
            declaration: symbol.detail.clone(),
            callable,
            parameters,
            returns,
            level: level.to_string(),
            name,
        }
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}

/// Text between the first `(` of `detail` and its matching `)`.
fn parameter_list(detail: &str) -> Option<(&str, &str)> {
    let open = detail.find('(')?;
    let mut depth = 0i32;
    for (at, c) in detail[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    let close = open + at;
                    return Some((&detail[open + 1..close], &detail[close + 1..]));
                }
            }
            _ => {}
        }
    }
    None
}

/// Drop the `(s *Server)` receiver of a Go method declaration.
fn without_receiver(detail: &str) -> &str {
    match detail.strip_prefix("func ") {
        Some(rest) if rest.trim_start().starts_with('(') => {
            parameter_list(rest).map(|(_, after)| after).unwrap_or(detail)
        }
        _ => detail,
    }
}

/// Split on commas that are not nested in brackets.
fn split_top_level(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    let mut previous = ' ';
    for (at, c) in list.char_indices() {
        match c {
            '(' | '[' | '{' | '<' => depth += 1,
            // `->` and `=>` are arrows, not closers.
            '>' if matches!(previous, '-' | '=') => {}
            ')' | ']' | '}' | '>' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&list[start..at]);
                start = at + 1;
            }
            _ => {}
        }
        previous = c;
    }
    parts.push(&list[start..]);
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

pub(crate) fn parse_parameters(detail: &str, go: bool) -> Vec<ParamCtx> {
    let Some((list, _)) = parameter_list(detail) else {
        return Vec::new();
    };
    split_top_level(list)
        .into_iter()
        .filter_map(|raw| {
            let raw = raw.split('=').next().unwrap_or(raw).trim();
            if raw == "void" || RECEIVERS.contains(&raw) || raw.starts_with("self:") {
                return None;
            }
            Some(parse_parameter(raw, go))
        })
        .collect()
}

fn parse_parameter(raw: &str, go: bool) -> ParamCtx {
    if let Some(at) = type_separator(raw) {
        let (name, ty) = (&raw[..at], &raw[at + 1..]);
        let name = name.trim().trim_start_matches("mut ").trim_end_matches('?');
        return ParamCtx {
            name: name.trim().to_string(),
            type_hint: Some(ty.trim().to_string()).filter(|t| !t.is_empty()),
        };
    }
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    match tokens.as_slice() {
        [] | [_] => ParamCtx {
            name: raw.trim_start_matches(['*', '&']).to_string(),
            type_hint: None,
        },
        [first, rest @ ..] if go => ParamCtx {
            name: first.to_string(),
            type_hint: Some(rest.join(" ")),
        },
        [head @ .., last] => {
            let stars: String = last.chars().take_while(|c| matches!(c, '*' | '&')).collect();
            ParamCtx {
                name: last.trim_start_matches(['*', '&']).to_string(),
                type_hint: Some(format!("{}{stars}", head.join(" "))),
            }
        }
    }
}

/// Byte offset of a `name: Type` colon, ignoring `::` paths.
fn type_separator(raw: &str) -> Option<usize> {
    let bytes = raw.as_bytes();
    (0..bytes.len()).find(|&at| {
        bytes[at] == b':'
            && bytes.get(at + 1) != Some(&b':')
            && (at == 0 || bytes[at - 1] != b':')
    })
}

pub(crate) fn parse_returns(detail: &str, short_name: &str) -> Option<String> {
    let (_, after) = parameter_list(detail)?;
    let after = after.split(" where ").next().unwrap_or(after).trim();
    let after = after.split("throws").next().unwrap_or(after).trim();
    let trailing = after
        .strip_prefix("->")
        .or_else(|| after.strip_prefix(':'))
        .unwrap_or(after)
        .trim();
    if !trailing.is_empty() && !trailing.starts_with("=>") {
        return Some(trailing.to_string()).filter(|t| t != "None" && t != "void");
    }

    // C-family: the return type precedes the name.
    let open = detail.find('(')?;
    let prefix = detail[..open].trim_end();
    let prefix = prefix
        .strip_suffix(short_name)?
        .trim_end_matches(|c: char| c.is_alphanumeric() || c == '_' || c == ':');
    let kept: Vec<&str> = prefix
        .split_whitespace()
        .filter(|token| !MODIFIERS.contains(token) && !token.starts_with('@'))
        .collect();
    let ty = kept.join(" ");
    (!ty.is_empty() && ty != "void").then_some(ty)
}
