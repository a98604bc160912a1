//! JavaScript and TypeScript: functions, classes, interfaces, type aliases,
//! enums, and `const` bindings of function values.

use tree_sitter::Node;

use docsync_core::SymbolKind;

use super::{is_constant_name, Extractor, Found};

const FUNCTION_VALUES: &[&str] = &[
    "arrow_function",
    "function_expression",
    "function",
    "generator_function",
];

pub(crate) fn extract(x: &mut Extractor<'_>, root: Node<'_>) {
    let mut cursor = root.walk();
    for statement in root.named_children(&mut cursor) {
        if statement.kind() == "export_statement" {
            if let Some(declaration) = statement.child_by_field_name("declaration") {
                declaration_statement(x, declaration, statement);
            }
        } else {
            declaration_statement(x, statement, statement);
        }
    }
}

/// `outer` is the `export` statement when there is one, so that the
/// declaration text keeps the `export` keyword.
fn declaration_statement(x: &mut Extractor<'_>, node: Node<'_>, outer: Node<'_>) {
    match node.kind() {
        "function_declaration" | "generator_function_declaration" => {
            named(x, node, outer, SymbolKind::Function, true);
        }
        "class_declaration" | "abstract_class_declaration" => {
            if let Some(name) = named(x, node, outer, SymbolKind::Class, false) {
                members(x, node, name);
            }
        }
        "interface_declaration" => {
            if let Some(name) = named(x, node, outer, SymbolKind::Interface, false) {
                members(x, node, name);
            }
        }
        "type_alias_declaration" => {
            named(x, node, outer, SymbolKind::TypeAlias, false);
        }
        "enum_declaration" => {
            named(x, node, outer, SymbolKind::Enum, true);
        }
        "lexical_declaration" | "variable_declaration" => bindings(x, node, outer),
        _ => {}
    }
}

/// Push a declaration with a `name` field and return the name.
fn named<'s>(
    x: &mut Extractor<'s>,
    node: Node<'_>,
    outer: Node<'_>,
    kind: SymbolKind,
    fingerprint: bool,
) -> Option<&'s str> {
    let name = x.field_text(node, "name")?;
    let body = node.child_by_field_name("body");
    let found = Found {
        kind,
        name,
        container: None,
        detail: x.declaration(outer, body),
        body: if fingerprint { x.fingerprint(body) } else { None },
    };
    x.push(found, outer);
    Some(name)
}

fn members(x: &mut Extractor<'_>, node: Node<'_>, container: &str) {
    let Some(body) = node.child_by_field_name("body") else {
        return;
    };
    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        if !matches!(
            member.kind(),
            "method_definition" | "method_signature" | "abstract_method_signature"
        ) {
            continue;
        }
        let Some(name) = x.field_text(member, "name") else {
            continue;
        };
        let body = member.child_by_field_name("body");
        let found = Found {
            kind: SymbolKind::Method,
            name,
            container: Some(container),
            detail: x.declaration(member, body),
            body: x.fingerprint(body),
        };
        x.push(found, member);
    }
}

/// `const double = (x) => x * 2` is a function; `const LIMIT = 8` a constant.
fn bindings(x: &mut Extractor<'_>, declaration: Node<'_>, outer: Node<'_>) {
    let mut cursor = declaration.walk();
    let declarators: Vec<Node<'_>> = declaration
        .named_children(&mut cursor)
        .filter(|n| n.kind() == "variable_declarator")
        .collect();
    let Some(first) = declarators.first() else {
        return;
    };
    let prefix = x.span(outer.start_byte(), first.start_byte());

    for declarator in declarators {
        let Some(name_node) = declarator.child_by_field_name("name") else {
            continue;
        };
        if name_node.kind() != "identifier" {
            continue;
        }
        let name = x.text(name_node);
        let value = declarator.child_by_field_name("value");
        let (kind, body) = match value {
            Some(value) if FUNCTION_VALUES.contains(&value.kind()) => {
                (SymbolKind::Function, value.child_by_field_name("body"))
            }
            _ if is_constant_name(name) => (SymbolKind::Constant, None),
            _ => continue,
        };
        let found = Found {
            kind,
            name,
            container: None,
            detail: format!("{prefix} {}", x.declaration(declarator, body)),
            body: x.fingerprint(body),
        };
        x.push(found, declarator);
    }
}
