//! Per-language symbol detection tests for `docsync-detector`.
//!
//! Each fixture is a small but realistic file; assertions list the qualified
//! symbol names and kinds in declaration order.

use std::fs;

use docsync_core::{ProviderError, SymbolKind, SymbolProvider};
use docsync_detector::{detect_file, extract_symbols, DetectError, Language, TreeSitterProvider};
use rstest::rstest;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helper
// ---------------------------------------------------------------------------

fn names(language: Language, source: &str) -> Vec<(String, SymbolKind)> {
    extract_symbols(language, source)
        .expect("scan")
        .into_iter()
        .map(|s| (s.name.to_string(), s.kind))
        .collect()
}

fn owned(expected: &[(&str, SymbolKind)]) -> Vec<(String, SymbolKind)> {
    expected
        .iter()
        .map(|(name, kind)| (name.to_string(), *kind))
        .collect()
}

// ---------------------------------------------------------------------------
// Languages
// ---------------------------------------------------------------------------

#[test]
fn rust_items_impls_and_traits() {
    let source = r#"
use std::fmt;

pub const LIMIT: usize = 8;

/// A stack.
#[derive(Debug)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T: Clone> Stack<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: T) {
        let label = "}";
        self.items.push(item);
    }
}

pub trait Shape {
    fn area(&self) -> f64;
}

impl<T> fmt::Display for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stack")
    }
}

mod tests {
    fn helper() {}
}
"#;
    assert_eq!(
        names(Language::Rust, source),
        owned(&[
            ("LIMIT", SymbolKind::Constant),
            ("Stack", SymbolKind::Struct),
            ("Stack.new", SymbolKind::Method),
            ("Stack.push", SymbolKind::Method),
            ("Shape", SymbolKind::Trait),
            ("Shape.area", SymbolKind::Method),
            ("Stack.fmt", SymbolKind::Method),
            ("tests", SymbolKind::Module),
            ("tests.helper", SymbolKind::Function),
        ])
    );
}

#[test]
fn go_functions_methods_and_types() {
    let source = "\
package server

const DefaultPort = 8080

type Handler func(req string) string

type Server struct {
\tport int
}

func (s *Server) Start() error {
\treturn nil
}

func main() {
\ts := Server{port: DefaultPort}
\t_ = s.Start()
}
";
    assert_eq!(
        names(Language::Go, source),
        owned(&[
            ("DefaultPort", SymbolKind::Constant),
            ("Handler", SymbolKind::TypeAlias),
            ("Server", SymbolKind::Struct),
            ("Server.Start", SymbolKind::Method),
            ("main", SymbolKind::Function),
        ])
    );
}

#[test]
fn typescript_classes_interfaces_and_arrows() {
    let source = "\
export interface Greeter {
  greet(name: string): string;
}

export type Id = string | number;

export class Calculator {
  private total = 0;

  constructor(start: number) {
    this.total = start;
  }

  async add(value: number): Promise<number> {
    if (value < 0) {
      throw new Error(`negative: ${value}`);
    }
    return this.total + value;
  }
}

export const double = (x: number) => x * 2;

export function helloWorld(name = 'World') {
  return `Hello, ${name}!`;
}
";
    assert_eq!(
        names(Language::TypeScript, source),
        owned(&[
            ("Greeter", SymbolKind::Interface),
            ("Greeter.greet", SymbolKind::Method),
            ("Id", SymbolKind::TypeAlias),
            ("Calculator", SymbolKind::Class),
            ("Calculator.constructor", SymbolKind::Method),
            ("Calculator.add", SymbolKind::Method),
            ("double", SymbolKind::Function),
            ("helloWorld", SymbolKind::Function),
        ])
    );
}

#[test]
fn java_classes_and_methods() {
    let source = "\
package com.example;

public class Calculator {
    private final int base;

    public Calculator(int base) {
        this.base = base;
    }

    @Override
    public String toString() {
        return \"Calculator(\" + base + \")\";
    }

    public static int add(int a, int b) {
        return a + b;
    }
}
";
    assert_eq!(
        names(Language::Java, source),
        owned(&[
            ("Calculator", SymbolKind::Class),
            ("Calculator.Calculator", SymbolKind::Method),
            ("Calculator.toString", SymbolKind::Method),
            ("Calculator.add", SymbolKind::Method),
        ])
    );
}

#[test]
fn c_definitions_skip_prototypes() {
    let source = "\
#include <stdio.h>
#define MAX_ITEMS 16

struct point {
    int x;
    int y;
};

static int clamp(int v);

/* int commented_out(void) { } */
static int clamp(int v) {
    return v > MAX_ITEMS ? MAX_ITEMS : v;
}

int main(void) {
    printf(\"%d\\n\", clamp(3));
    return 0;
}
";
    assert_eq!(
        names(Language::C, source),
        owned(&[
            ("MAX_ITEMS", SymbolKind::Constant),
            ("point", SymbolKind::Struct),
            ("clamp", SymbolKind::Function),
            ("main", SymbolKind::Function),
        ])
    );
}

// ---------------------------------------------------------------------------
// Signature shape
// ---------------------------------------------------------------------------

#[test]
fn moving_a_function_changes_only_its_position() {
    let before = extract_symbols(Language::Rust, "fn a() {\n    1\n}\n").expect("scan");
    let after = extract_symbols(Language::Rust, "\n\nfn a() {\n    1\n}\n").expect("scan");
    let (old, new) = (before[0].signature(), after[0].signature());
    assert_eq!(old.shape, new.shape);
    assert_eq!(old.body, new.body);
    assert_ne!(old.position(), new.position());
}

#[test]
fn changing_parameters_changes_the_shape() {
    let before = extract_symbols(Language::Go, "func f(a int) int {\n\treturn a\n}\n").expect("scan");
    let after =
        extract_symbols(Language::Go, "func f(a int, b int) int {\n\treturn a\n}\n").expect("scan");
    assert_ne!(before[0].signature().shape, after[0].signature().shape);
    assert_eq!(before[0].detail.as_deref(), Some("func f(a int) int"));
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[rstest]
#[case(Language::Rust, "fn a() {\n    if x {\n}\n")]
#[case(Language::Python, "def f(a,\n      b:\n    return a\n")]
#[case(Language::JavaScript, "function f() {\n  return `unterminated;\n}\n")]
#[case(Language::Java, "class A {\n  void m() { ) }\n}\n")]
fn malformed_sources_are_syntax_errors(#[case] language: Language, #[case] source: &str) {
    let err = extract_symbols(language, source).unwrap_err();
    assert!(err.is_syntax(), "unexpected error: {err}");
    assert!(matches!(err, DetectError::Syntax { line, .. } if line >= 1));
}

#[rstest]
#[case(Language::Rust, "const DIR: &str = r\"C:\\\";\n\nfn after() {}\n", &["DIR", "after"])]
#[case(Language::Rust, "fn quote() -> char {\n    '\"'\n}\n\nfn next() {}\n", &["quote", "next"])]
#[case(Language::Python, "PATH = 'C:\\\\'\n\ndef after():\n    return '''}'''\n", &["PATH", "after"])]
#[case(Language::Go, "package p\n\nvar re = `\\d+\\`\n\nfunc After() {}\n", &["After"])]
#[case(Language::JavaScript, "const re = /[}{]/g;\nfunction after() {}\n", &["after"])]
fn valid_sources_with_tricky_literals_parse(
    #[case] language: Language,
    #[case] source: &str,
    #[case] expected: &[&str],
) {
    let symbols = extract_symbols(language, source).expect("valid source");
    let found: Vec<&str> = symbols.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(found, expected);
}

#[test]
fn unknown_extension_is_unsupported() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("notes.md");
    fs::write(&path, "# notes").expect("write");
    assert!(matches!(
        detect_file(&path),
        Err(DetectError::Unsupported { .. })
    ));
}

#[tokio::test]
async fn provider_reports_parse_failures_as_such() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("broken.py");
    fs::write(&path, "def f(:\n").expect("write");

    let err = TreeSitterProvider::new().symbols(&path).await.unwrap_err();
    assert!(err.is_parse_failure(), "got {err}");
    match err {
        ProviderError::Parse { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected a parse error, got {other}"),
    }
}

#[tokio::test]
async fn provider_reads_files_from_disk() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("app.py");
    fs::write(&path, "def main():\n    return 0\n").expect("write");

    let symbols = TreeSitterProvider::new().symbols(&path).await.expect("symbols");
    assert_eq!(symbols.len(), 1);
    assert_eq!(symbols[0].name.as_str(), "main");
    assert_eq!(symbols[0].location.line, 0);
    assert!(symbols[0].body_fingerprint.is_some());

    let missing = TreeSitterProvider::new()
        .symbols(&dir.path().join("gone.py"))
        .await
        .unwrap_err();
    assert!(matches!(missing, ProviderError::Io { .. }));
}
