//! C and C++: function definitions, records, enums, namespaces and object-like
//! macros. Prototypes are skipped; out-of-line `Type::method` definitions are
//! qualified by their type.

use tree_sitter::Node;

use docsync_core::SymbolKind;

use super::{qualify, Extractor, Found};

/// Nodes whose children are walked as if they were at the enclosing level.
const TRANSPARENT: &[&str] = &[
    "preproc_if",
    "preproc_ifdef",
    "preproc_else",
    "preproc_elif",
    "linkage_specification",
    "template_declaration",
    "declaration_list",
];

/// Declarators wrapping the function declarator.
const WRAPPERS: &[&str] = &[
    "pointer_declarator",
    "reference_declarator",
    "parenthesized_declarator",
    "attributed_declarator",
];

pub(crate) fn extract(x: &mut Extractor<'_>, root: Node<'_>) {
    walk(x, root, None, false);
}

fn walk(x: &mut Extractor<'_>, list: Node<'_>, container: Option<&str>, in_record: bool) {
    let mut cursor = list.walk();
    for node in list.named_children(&mut cursor) {
        match node.kind() {
            "function_definition" => function(x, node, container, in_record),
            "struct_specifier" | "union_specifier" | "enum_specifier" | "class_specifier" => {
                record(x, node, node, container, None);
            }
            "declaration" | "type_definition" => {
                let Some(spec) = node.child_by_field_name("type") else {
                    continue;
                };
                if !is_record(spec) {
                    continue;
                }
                let alias = (node.kind() == "type_definition")
                    .then(|| node.child_by_field_name("declarator"))
                    .flatten()
                    .map(|d| x.text(d));
                record(x, spec, node, container, alias);
            }
            "namespace_definition" => namespace(x, node, container),
            "preproc_def" => {
                let Some(name) = x.field_text(node, "name") else {
                    continue;
                };
                let found = Found {
                    kind: SymbolKind::Constant,
                    name,
                    container,
                    detail: x.declaration(node, None),
                    body: None,
                };
                x.push(found, node);
            }
            kind if TRANSPARENT.contains(&kind) => walk(x, node, container, in_record),
            _ => {}
        }
    }
}

fn is_record(node: Node<'_>) -> bool {
    matches!(
        node.kind(),
        "struct_specifier" | "union_specifier" | "enum_specifier" | "class_specifier"
    )
}

fn function(x: &mut Extractor<'_>, node: Node<'_>, container: Option<&str>, in_record: bool) {
    let Some(declarator) = node
        .child_by_field_name("declarator")
        .and_then(function_declarator)
    else {
        return;
    };
    let Some(name_node) = declarator.child_by_field_name("declarator") else {
        return;
    };
    let full = x.text(name_node);
    let (owner, name) = match full.rsplit_once("::") {
        Some((owner, name)) => (Some(owner.replace("::", ".")), name),
        None => (None, full),
    };
    let kind = if owner.is_some() || in_record {
        SymbolKind::Method
    } else {
        SymbolKind::Function
    };
    let owner = owner.map(|owner| qualify(container, &owner));
    let body = node.child_by_field_name("body");
    let found = Found {
        kind,
        name,
        container: owner.as_deref().or(container),
        detail: x.declaration(node, body),
        body: x.fingerprint(body),
    };
    x.push(found, node);
}

/// The `function_declarator` under pointer and reference wrappers.
fn function_declarator(mut node: Node<'_>) -> Option<Node<'_>> {
    loop {
        if node.kind() == "function_declarator" {
            return Some(node);
        }
        if !WRAPPERS.contains(&node.kind()) {
            return None;
        }
        node = match node.child_by_field_name("declarator") {
            Some(inner) => inner,
            None => last_named_child(node)?,
        };
    }
}

fn last_named_child(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    let last = node.named_children(&mut cursor).last();
    last
}

/// Push a struct, union, enum or class definition. Forward declarations have
/// no body and are skipped.
fn record(
    x: &mut Extractor<'_>,
    spec: Node<'_>,
    outer: Node<'_>,
    container: Option<&str>,
    alias: Option<&str>,
) {
    let Some(body) = spec.child_by_field_name("body") else {
        return;
    };
    let Some(name) = x.field_text(spec, "name").or(alias) else {
        return;
    };
    let kind = match spec.kind() {
        "enum_specifier" => SymbolKind::Enum,
        "class_specifier" => SymbolKind::Class,
        _ => SymbolKind::Struct,
    };
    let found = Found {
        kind,
        name,
        container,
        detail: x.declaration(outer, Some(body)),
        body: if kind == SymbolKind::Class {
            None
        } else {
            x.fingerprint(Some(body))
        },
    };
    x.push(found, outer);

    if kind != SymbolKind::Enum {
        let qualified = qualify(container, name);
        walk(x, body, Some(&qualified), true);
    }
}

fn namespace(x: &mut Extractor<'_>, node: Node<'_>, container: Option<&str>) {
    let Some(body) = node.child_by_field_name("body") else {
        return;
    };
    let Some(name) = x.field_text(node, "name") else {
        // Anonymous namespace.
        walk(x, body, container, false);
        return;
    };
    let found = Found {
        kind: SymbolKind::Module,
        name,
        container,
        detail: x.declaration(node, Some(body)),
        body: None,
    };
    x.push(found, node);
    let qualified = qualify(container, name);
    walk(x, body, Some(&qualified), false);
}

#[cfg(test)]
mod tests {
    use docsync_core::SymbolKind;

    use crate::{extract_symbols, Language};

    #[test]
    fn cpp_classes_namespaces_and_out_of_line_methods() {
        let source = "\
#include <string>

namespace text {

class Parser {
public:
    explicit Parser(std::string source);
    int size() const { return static_cast<int>(source_.size()); }
private:
    std::string source_;
};

std::string Parser::name(int x) {
    return source_.substr(0, x);
}

}  // namespace text
";
        let symbols = extract_symbols(Language::Cpp, source).expect("parse");
        let names: Vec<&str> = symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            ["text", "text.Parser", "text.Parser.size", "text.Parser.name"]
        );
        assert_eq!(symbols[1].kind, SymbolKind::Class);
        assert_eq!(symbols[3].kind, SymbolKind::Method);
        assert_eq!(
            symbols[3].detail.as_deref(),
            Some("std::string Parser::name(int x)")
        );
    }

    #[test]
    fn typedef_structs_and_include_guards() {
        let source = "\
#ifndef POINT_H
#define POINT_H

typedef struct {
    int x;
    int y;
} Point;

static char *label(Point *p) {
    return \"point\";
}

#endif
";
        let symbols = extract_symbols(Language::C, source).expect("parse");
        let names: Vec<&str> = symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["POINT_H", "Point", "label"]);
        assert_eq!(symbols[2].detail.as_deref(), Some("static char *label(Point *p)"));
    }
}
