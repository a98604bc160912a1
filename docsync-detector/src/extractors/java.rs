//! Java: classes, interfaces, enums and records with their methods and
//! constructors. Nested types are qualified by their enclosing type.

use tree_sitter::Node;

use docsync_core::SymbolKind;

use super::{qualify, Extractor, Found};

pub(crate) fn extract(x: &mut Extractor<'_>, root: Node<'_>) {
    walk(x, root, None);
}

fn walk(x: &mut Extractor<'_>, list: Node<'_>, container: Option<&str>) {
    let mut cursor = list.walk();
    for node in list.named_children(&mut cursor) {
        let kind = match node.kind() {
            "class_declaration" | "record_declaration" => SymbolKind::Class,
            "interface_declaration" | "annotation_type_declaration" => SymbolKind::Interface,
            "enum_declaration" => SymbolKind::Enum,
            "method_declaration" | "constructor_declaration" if container.is_some() => {
                method(x, node, container);
                continue;
            }
            // Members of an enum follow its constants.
            "enum_body_declarations" => {
                walk(x, node, container);
                continue;
            }
            _ => continue,
        };
        let Some(name) = x.field_text(node, "name") else {
            continue;
        };
        let body = node.child_by_field_name("body");
        let found = Found {
            kind,
            name,
            container,
            detail: x.declaration(node, body),
            body: None,
        };
        x.push(found, node);

        if let Some(body) = body {
            let qualified = qualify(container, name);
            walk(x, body, Some(&qualified));
        }
    }
}

fn method(x: &mut Extractor<'_>, node: Node<'_>, container: Option<&str>) {
    let Some(name) = x.field_text(node, "name") else {
        return;
    };
    let body = node.child_by_field_name("body");
    let found = Found {
        kind: SymbolKind::Method,
        name,
        container,
        detail: x.declaration(node, body),
        body: x.fingerprint(body),
    };
    x.push(found, node);
}

#[cfg(test)]
mod tests {
    use crate::{extract_symbols, Language};

    #[test]
    fn enums_records_and_nested_types() {
        let source = "\
public enum Level {
    LOW, HIGH;

    public boolean atLeast(Level other) {
        return compareTo(other) >= 0;
    }
}

interface Shape {
    double area();

    record Circle(double r) implements Shape {
        public double area() { return Math.PI * r * r; }
    }
}
";
        let symbols = extract_symbols(Language::Java, source).expect("parse");
        let names: Vec<&str> = symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            ["Level", "Level.atLeast", "Shape", "Shape.area", "Shape.Circle", "Shape.Circle.area"]
        );
        assert_eq!(symbols[3].detail.as_deref(), Some("double area()"));
        assert!(symbols[3].body_fingerprint.is_none());
        assert_eq!(symbols[5].container.as_deref(), Some("Shape.Circle"));
    }
}
