//! # docsync-renderer
//!
//! Tera-based [`DocumentationGenerator`](docsync_core::DocumentationGenerator)
//! that renders symbol documentation at the configured verbosity level.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use docsync_core::{DocumentationLevel, Symbol, SymbolKind};
//! use docsync_renderer::TemplateGenerator;
//!
//! fn describe(symbol: &Symbol) {
//!     if let Ok(generator) = TemplateGenerator::new() {
//!         if let Ok(doc) = generator.render(symbol, Path::new("src/lib.rs"), DocumentationLevel::Standard) {
//!             println!("{}", doc.to_text());
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::{ParamCtx, TemplateContext};
pub use engine::{template_name, TemplateEngine, TemplateGenerator};
pub use error::RenderError;
