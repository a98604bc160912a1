use std::fs;
use std::path::Path;

use docsync_core::{
    DocumentationGenerator, DocumentationLevel, ProviderError, Symbol, SymbolKind,
};
use docsync_renderer::{template_name, TemplateContext, TemplateEngine, TemplateGenerator};
use tempfile::TempDir;

fn function(detail: &str) -> Symbol {
    Symbol::new("hello_world", SymbolKind::Function, 0, 0).with_detail(detail)
}

#[test]
fn python_function_at_standard_level() {
    let generator = TemplateGenerator::new().unwrap();
    let doc = generator
        .render(
            &function("def hello_world(name=\"World\", *args)"),
            Path::new("/code/app/greet.py"),
            DocumentationLevel::Standard,
        )
        .unwrap();

    let names: Vec<&str> = doc.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["name", "args"]);
    assert!(doc.returns.is_none());
    assert!(doc.description.contains("Takes 2 parameters."), "{}", doc.description);
    assert!(doc.to_text().starts_with("def hello_world"));
}

#[test]
fn go_method_at_comprehensive_level() {
    let symbol = Symbol::new("Server.Start", SymbolKind::Method, 9, 0)
        .with_container("Server")
        .with_detail("func (s *Server) Start(port int) error");
    let doc = TemplateGenerator::new()
        .unwrap()
        .render(&symbol, Path::new("server.go"), DocumentationLevel::Comprehensive)
        .unwrap();

    assert_eq!(doc.parameters.len(), 1);
    assert_eq!(doc.parameters[0].name, "port");
    assert_eq!(doc.returns.as_deref(), Some("error"));
    assert_eq!(doc.examples, vec!["server.Start(port)".to_string()]);
    assert!(doc.description.contains("Related: the other members of `Server`."));
}

#[test]
fn no_parameters_and_void_return() {
    let symbol = Symbol::new("Runner.run", SymbolKind::Method, 3, 4)
        .with_container("Runner")
        .with_detail("public void run()");
    let doc = TemplateGenerator::new()
        .unwrap()
        .render(&symbol, Path::new("Runner.java"), DocumentationLevel::Standard)
        .unwrap();
    assert!(doc.parameters.is_empty());
    assert!(doc.returns.is_none());
    assert!(doc.description.ends_with("Takes no parameters."));
}

#[test]
fn user_templates_override_embedded_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("minimal.tera"),
        "{{ name }} ({{ kind }}) at {{ file_name }}:{{ line }}\r\n",
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let generator = TemplateGenerator::with_template_dir(dir.path()).unwrap();
    let doc = generator
        .render(&function("fn hello_world()"), Path::new("src/main.rs"), DocumentationLevel::Minimal)
        .unwrap();
    assert_eq!(doc.description, "hello_world (function) at main.rs:1");

    // Levels that were not overridden keep the embedded template.
    let doc = generator
        .render(&function("fn hello_world()"), Path::new("src/main.rs"), DocumentationLevel::Standard)
        .unwrap();
    assert!(doc.description.starts_with("Function `hello_world`, declared in"));
}

#[test]
fn missing_template_dir_falls_back_to_embedded() {
    let dir = TempDir::new().unwrap();
    let generator = TemplateGenerator::with_template_dir(&dir.path().join("absent")).unwrap();
    generator
        .render(&function("fn hello_world()"), Path::new("a.rs"), DocumentationLevel::Minimal)
        .unwrap();
}

#[tokio::test]
async fn broken_template_is_a_generation_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("standard.tera"), "{{ missing_variable }}").unwrap();
    let generator = TemplateGenerator::with_template_dir(dir.path()).unwrap();

    let err = generator
        .generate(&function("fn hello_world()"), Path::new("a.rs"), DocumentationLevel::Standard)
        .await
        .unwrap_err();
    match err {
        ProviderError::Generation { symbol, message } => {
            assert_eq!(symbol, "hello_world");
            assert!(message.contains("missing_variable"), "{message}");
        }
        other => panic!("expected a generation error, got {other}"),
    }
}

#[test]
fn no_crlf_in_rendered_output() {
    let engine = TemplateEngine::new(None).unwrap();
    let ctx = TemplateContext::from_symbol(
        &function("fn hello_world(a: u8,\r\n b: u8)"),
        Path::new("a.rs"),
        DocumentationLevel::Comprehensive,
    )
    .to_tera_context()
    .unwrap();
    let text = engine
        .render(template_name(DocumentationLevel::Comprehensive), &ctx)
        .unwrap();
    assert!(!text.contains('\r'));
}
