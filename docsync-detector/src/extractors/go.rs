//! Go: functions, methods qualified by their receiver type, type and const
//! declarations.

use tree_sitter::Node;

use docsync_core::SymbolKind;

use super::{Extractor, Found};

pub(crate) fn extract(x: &mut Extractor<'_>, root: Node<'_>) {
    let mut cursor = root.walk();
    for decl in root.named_children(&mut cursor) {
        match decl.kind() {
            "function_declaration" => function(x, decl, None),
            "method_declaration" => {
                let receiver = decl
                    .child_by_field_name("receiver")
                    .and_then(|list| receiver_type(x, list));
                function(x, decl, receiver);
            }
            "type_declaration" => specs(x, decl, "type", &["type_spec", "type_alias"]),
            "const_declaration" => specs(x, decl, "const", &["const_spec"]),
            _ => {}
        }
    }
}

fn function(x: &mut Extractor<'_>, decl: Node<'_>, receiver: Option<&str>) {
    let Some(name) = x.field_text(decl, "name") else {
        return;
    };
    let body = decl.child_by_field_name("body");
    let kind = if receiver.is_some() {
        SymbolKind::Method
    } else {
        SymbolKind::Function
    };
    let found = Found {
        kind,
        name,
        container: receiver,
        detail: x.declaration(decl, body),
        body: x.fingerprint(body),
    };
    x.push(found, decl);
}

/// Walk the specs of a `type` or `const` declaration, grouped or not.
fn specs(x: &mut Extractor<'_>, decl: Node<'_>, keyword: &str, kinds: &[&str]) {
    let mut cursor = decl.walk();
    for spec in decl.named_children(&mut cursor) {
        if !kinds.contains(&spec.kind()) {
            continue;
        }
        if keyword == "type" {
            type_spec(x, spec);
        } else {
            const_spec(x, spec);
        }
    }
}

fn type_spec(x: &mut Extractor<'_>, spec: Node<'_>) {
    let Some(name) = x.field_text(spec, "name") else {
        return;
    };
    let ty = spec.child_by_field_name("type");
    let (kind, body) = match ty.map(|t| t.kind()) {
        Some("struct_type") => (SymbolKind::Struct, ty.and_then(|t| t.named_child(0))),
        Some("interface_type") => (SymbolKind::Interface, ty),
        _ => (SymbolKind::TypeAlias, None),
    };
    let cut = match kind {
        SymbolKind::Interface => ty.and_then(|t| first_child_of_kind(t, "{")),
        _ => body,
    };
    let found = Found {
        kind,
        name,
        container: None,
        detail: format!("type {}", x.declaration(spec, cut)),
        body: x.fingerprint(body),
    };
    x.push(found, spec);
}

fn const_spec(x: &mut Extractor<'_>, spec: Node<'_>) {
    let detail = format!("const {}", x.declaration(spec, None));
    let mut cursor = spec.walk();
    let names: Vec<Node<'_>> = spec.children_by_field_name("name", &mut cursor).collect();
    for name in names {
        let found = Found {
            kind: SymbolKind::Constant,
            name: x.text(name),
            container: None,
            detail: detail.clone(),
            body: None,
        };
        x.push(found, name);
    }
}

/// `Server` from `(s *Server)` or `(s Server[T])`.
fn receiver_type<'s>(x: &Extractor<'s>, list: Node<'_>) -> Option<&'s str> {
    let param = list.named_child(0)?;
    let ty = x.text(param.child_by_field_name("type")?);
    let ty = ty.trim_start_matches('*');
    let ty = ty.split('[').next().unwrap_or(ty).trim();
    (!ty.is_empty()).then_some(ty)
}

fn first_child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|child| child.kind() == kind);
    found
}
