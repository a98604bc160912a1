//! Rust: items, impl and trait members, inline modules.

use tree_sitter::Node;

use docsync_core::SymbolKind;

use super::{qualify, Extractor, Found};

/// Container scope: impl and trait bodies hold methods, modules hold
/// functions.
#[derive(Clone, Copy)]
struct Scope<'a> {
    name: &'a str,
    methods: bool,
}

pub(crate) fn extract(x: &mut Extractor<'_>, root: Node<'_>) {
    walk(x, root, None);
}

fn walk(x: &mut Extractor<'_>, list: Node<'_>, scope: Option<Scope<'_>>) {
    let container = scope.map(|s| s.name);
    let mut cursor = list.walk();
    for item in list.named_children(&mut cursor) {
        match item.kind() {
            "function_item" | "function_signature_item" => {
                let kind = match scope {
                    Some(Scope { methods: true, .. }) => SymbolKind::Method,
                    _ => SymbolKind::Function,
                };
                leaf(x, item, kind, container, true);
            }
            "struct_item" | "union_item" => {
                leaf(x, item, SymbolKind::Struct, container, true);
            }
            "enum_item" => {
                leaf(x, item, SymbolKind::Enum, container, true);
            }
            "const_item" | "static_item" => {
                leaf(x, item, SymbolKind::Constant, container, false);
            }
            "type_item" => {
                leaf(x, item, SymbolKind::TypeAlias, container, false);
            }
            "trait_item" => {
                if let Some(name) = leaf(x, item, SymbolKind::Trait, container, false) {
                    let qualified = qualify(container, name);
                    members(x, item, Scope { name: &qualified, methods: true });
                }
            }
            "mod_item" => {
                if let Some(name) = leaf(x, item, SymbolKind::Module, container, false) {
                    let qualified = qualify(container, name);
                    members(x, item, Scope { name: &qualified, methods: false });
                }
            }
            "impl_item" => {
                let Some(ty) = item.child_by_field_name("type") else {
                    continue;
                };
                let name = self_type_name(x.text(ty));
                if name.is_empty() {
                    continue;
                }
                let qualified = qualify(container, name);
                members(x, item, Scope { name: &qualified, methods: true });
            }
            _ => {}
        }
    }
}

fn members(x: &mut Extractor<'_>, item: Node<'_>, scope: Scope<'_>) {
    if let Some(body) = item.child_by_field_name("body") {
        walk(x, body, Some(scope));
    }
}

/// Push `item` and return its name.
fn leaf<'s>(
    x: &mut Extractor<'s>,
    item: Node<'_>,
    kind: SymbolKind,
    container: Option<&str>,
    fingerprint: bool,
) -> Option<&'s str> {
    let name = x.field_text(item, "name")?;
    let body = item.child_by_field_name("body");
    let found = Found {
        kind,
        name,
        container,
        detail: x.declaration(item, body),
        body: if fingerprint { x.fingerprint(body) } else { None },
    };
    x.push(found, item);
    Some(name)
}

/// `Stack` from `Stack<T>`, `crate::Stack` or `&'a Stack`.
fn self_type_name(ty: &str) -> &str {
    let ty = ty.split('<').next().unwrap_or(ty);
    let ty = ty.rsplit("::").next().unwrap_or(ty);
    ty.trim_start_matches(['&', '\'']).split_whitespace().last().unwrap_or_default()
}
