//! Tera rendering engine and the [`TemplateGenerator`].
//!
//! # Output per level
//!
//! | Level         | description | signature, parameters, returns | examples |
//! |---------------|-------------|--------------------------------|----------|
//! | minimal       | one line    |                                |          |
//! | standard      | with arity  | yes                            |          |
//! | comprehensive | with source | yes                            | yes      |

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tera::Tera;

use docsync_core::{
    DocParameter, DocumentationContent, DocumentationGenerator, DocumentationLevel, ProviderError,
    Symbol,
};

use crate::context::TemplateContext;
use crate::error::RenderError;

// ---------------------------------------------------------------------------
// Embedded templates, baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("_partials/summary.tera", include_str!("templates/_partials/summary.tera")),
    ("_partials/arity.tera", include_str!("templates/_partials/arity.tera")),
    ("minimal.tera", include_str!("templates/minimal.tera")),
    ("standard.tera", include_str!("templates/standard.tera")),
    ("comprehensive.tera", include_str!("templates/comprehensive.tera")),
    ("parameter.tera", include_str!("templates/parameter.tera")),
    ("example.tera", include_str!("templates/example.tera")),
];

const PARAMETER_TEMPLATE: &str = "parameter.tera";
const EXAMPLE_TEMPLATE: &str = "example.tera";

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}

fn normalize_template_name(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/").to_lowercase()
}

fn collect_template_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), RenderError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            collect_template_files(&path, out)?;
        } else if meta.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

fn load_user_templates(dir: &Path) -> Result<Vec<(String, String)>, RenderError> {
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut files = Vec::new();
    collect_template_files(dir, &mut files)?;
    let mut templates = Vec::new();
    for path in files {
        if path.extension().and_then(|s| s.to_str()) != Some("tera") {
            continue;
        }
        let rel = path.strip_prefix(dir).unwrap_or(path.as_path());
        let name = normalize_template_name(rel);
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        templates.push((name, contents));
    }
    Ok(templates)
}

fn build_tera(user_template_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let mut templates: HashMap<String, String> = HashMap::new();
    for (name, content) in TPLS {
        templates.insert(normalize_template_name(Path::new(name)), (*content).to_string());
    }
    if let Some(dir) = user_template_dir {
        for (name, content) in load_user_templates(dir)? {
            templates.insert(name, content);
        }
    }

    let mut tera = Tera::default();
    let items: Vec<(String, String)> = templates.into_iter().collect();
    tera.add_raw_templates(items)?;
    Ok(tera)
}

/// Description template for a documentation level.
pub fn template_name(level: DocumentationLevel) -> &'static str {
    match level {
        DocumentationLevel::Minimal => "minimal.tera",
        DocumentationLevel::Standard => "standard.tera",
        DocumentationLevel::Comprehensive => "comprehensive.tera",
    }
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Tera-based engine for rendering templates with optional user overrides.
///
/// `user_template_dir` may contain `.tera` files that override embedded
/// defaults under the same relative name (`standard.tera`,
/// `_partials/summary.tera`, ...).
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    pub fn new(user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        let tera = build_tera(user_template_dir)?;
        Ok(TemplateEngine { tera })
    }

    /// Render `name` against `ctx`, trimmed and with `\n` line endings.
    pub fn render(&self, name: &str, ctx: &tera::Context) -> Result<String, RenderError> {
        let rendered = self.tera.render(name, ctx)?;
        Ok(rendered.replace("\r\n", "\n").trim().to_string())
    }
}

// ---------------------------------------------------------------------------
// TemplateGenerator
// ---------------------------------------------------------------------------

/// [`DocumentationGenerator`] that renders documentation from templates.
///
/// Create once and share; rendering takes `&self`.
pub struct TemplateGenerator {
    engine: TemplateEngine,
}

impl TemplateGenerator {
    /// Generator with the embedded templates only.
    pub fn new() -> Result<Self, RenderError> {
        Ok(TemplateGenerator {
            engine: TemplateEngine::new(None)?,
        })
    }

    /// Generator whose templates can be overridden from `dir`.
    pub fn with_template_dir(dir: &Path) -> Result<Self, RenderError> {
        Ok(TemplateGenerator {
            engine: TemplateEngine::new(Some(dir))?,
        })
    }

    /// Render the documentation of `symbol` at `level`.
    pub fn render(
        &self,
        symbol: &Symbol,
        file: &Path,
        level: DocumentationLevel,
    ) -> Result<DocumentationContent, RenderError> {
        let ctx = TemplateContext::from_symbol(symbol, file, level);
        let tera_ctx = ctx.to_tera_context()?;
        let mut content =
            DocumentationContent::new(self.engine.render(template_name(level), &tera_ctx)?);
        if level == DocumentationLevel::Minimal {
            return Ok(content);
        }

        content.signature = ctx.declaration.clone();
        content.returns = ctx.returns.clone();
        for param in &ctx.parameters {
            let mut param_ctx = tera_ctx.clone();
            param_ctx.insert("param", param);
            content.parameters.push(DocParameter {
                name: param.name.clone(),
                type_hint: param.type_hint.clone(),
                description: self.engine.render(PARAMETER_TEMPLATE, &param_ctx)?,
            });
        }

        if level == DocumentationLevel::Comprehensive && ctx.callable {
            content
                .examples
                .push(self.engine.render(EXAMPLE_TEMPLATE, &tera_ctx)?);
        }
        Ok(content)
    }
}

#[async_trait]
impl DocumentationGenerator for TemplateGenerator {
    async fn generate(
        &self,
        symbol: &Symbol,
        file: &Path,
        level: DocumentationLevel,
    ) -> Result<DocumentationContent, ProviderError> {
        self.render(symbol, file, level)
            .map_err(|err| err.into_provider_error(symbol.name.as_str()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
