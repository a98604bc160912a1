//! Python: functions, classes with their methods, module-level constants.

use tree_sitter::Node;

use docsync_core::SymbolKind;

use super::{is_constant_name, qualify, Extractor, Found};

pub(crate) fn extract(x: &mut Extractor<'_>, root: Node<'_>) {
    walk(x, root, None);
}

fn walk(x: &mut Extractor<'_>, block: Node<'_>, container: Option<&str>) {
    let mut cursor = block.walk();
    for child in block.named_children(&mut cursor) {
        // Decorators stay out of the declaration text.
        let child = if child.kind() == "decorated_definition" {
            match child.child_by_field_name("definition") {
                Some(definition) => definition,
                None => continue,
            }
        } else {
            child
        };
        match child.kind() {
            "function_definition" => function(x, child, container),
            "class_definition" => class(x, child, container),
            "expression_statement" if container.is_none() => constant(x, child),
            _ => {}
        }
    }
}

fn function(x: &mut Extractor<'_>, node: Node<'_>, container: Option<&str>) {
    let Some(name) = x.field_text(node, "name") else {
        return;
    };
    let body = node.child_by_field_name("body");
    let kind = if container.is_some() {
        SymbolKind::Method
    } else {
        SymbolKind::Function
    };
    let found = Found {
        kind,
        name,
        container,
        detail: x.declaration(node, body),
        body: x.fingerprint(body),
    };
    x.push(found, node);
}

fn class(x: &mut Extractor<'_>, node: Node<'_>, container: Option<&str>) {
    let Some(name) = x.field_text(node, "name") else {
        return;
    };
    let body = node.child_by_field_name("body");
    let found = Found {
        kind: SymbolKind::Class,
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

fn constant(x: &mut Extractor<'_>, statement: Node<'_>) {
    let Some(assignment) = statement.named_child(0).filter(|n| n.kind() == "assignment") else {
        return;
    };
    let Some(left) = assignment.child_by_field_name("left") else {
        return;
    };
    let name = x.text(left);
    if left.kind() != "identifier" || !is_constant_name(name) {
        return;
    }
    let found = Found {
        kind: SymbolKind::Constant,
        name,
        container: None,
        detail: x.declaration(statement, None),
        body: None,
    };
    x.push(found, statement);
}

#[cfg(test)]
mod tests {
    use crate::{extract_symbols, Language};

    #[test]
    fn methods_are_qualified_and_nested_functions_hidden() {
        let source = "\
import os

MAX_RETRIES = 3
default_name = 'x'

@dataclass
class Greeter(Base):
    PREFIX = 'hi'

    def __init__(self, name):
        self.name = name

    async def greet(self, punctuation: str = '!') -> str:
        def inner():
            return 1
        return self.name + punctuation

def main():
    return 0
";
        let symbols = extract_symbols(Language::Python, source).expect("parse");
        let names: Vec<&str> = symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            ["MAX_RETRIES", "Greeter", "Greeter.__init__", "Greeter.greet", "main"]
        );
        assert_eq!(symbols[1].detail.as_deref(), Some("class Greeter(Base)"));
        assert_eq!(
            symbols[3].detail.as_deref(),
            Some("async def greet(self, punctuation: str = '!') -> str")
        );
        assert_eq!(symbols[3].container.as_deref(), Some("Greeter"));
        assert_eq!(symbols[4].location.line, 17);
    }

    #[test]
    fn body_edit_changes_only_the_body_fingerprint() {
        let before = extract_symbols(Language::Python, "def f(a):\n    return a\n").expect("parse");
        let after = extract_symbols(Language::Python, "def f(a):\n    return a + 1\n").expect("parse");
        assert_eq!(before[0].detail, after[0].detail);
        assert_ne!(before[0].body_fingerprint, after[0].body_fingerprint);
    }
}
