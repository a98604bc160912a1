//! `docsync watch`: run the synchronizer in the foreground.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use docsync_core::{config, DocumentationGenerator, DocumentationLevel, WatchBackend};
use docsync_daemon::start_blocking;
use docsync_detector::TreeSitterProvider;
use docsync_renderer::TemplateGenerator;

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Directories or files to watch.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Documentation verbosity (overrides the config file).
    #[arg(long)]
    pub level: Option<DocumentationLevel>,

    /// Change-source backend (overrides the config file).
    #[arg(long)]
    pub backend: Option<WatchBackend>,

    /// Directory of `.tera` files overriding the built-in templates.
    #[arg(long)]
    pub templates: Option<PathBuf>,

    /// Document every tracked file once at startup.
    #[arg(long)]
    pub initial_scan: bool,
}

impl WatchArgs {
    pub fn run(self) -> Result<()> {
        let home = super::home()?;
        let mut config = config::load_at(&home).with_context(|| {
            format!(
                "failed to load {}",
                config::config_path_at(&home).display()
            )
        })?;
        if let Some(level) = self.level {
            config.documentation_level = level;
        }
        if let Some(backend) = self.backend {
            config.watch_backend = backend;
        }
        if self.initial_scan {
            config.initial_scan = true;
        }

        let generator: Arc<dyn DocumentationGenerator> = match &self.templates {
            Some(dir) => Arc::new(
                TemplateGenerator::with_template_dir(dir)
                    .with_context(|| format!("failed to load templates from {}", dir.display()))?,
            ),
            None => Arc::new(TemplateGenerator::new().context("failed to load templates")?),
        };

        println!(
            "docsync watching {} path(s) at {} level (ctrl-c to stop)",
            self.paths.len(),
            config.documentation_level
        );
        start_blocking(
            &home,
            self.paths,
            config,
            Arc::new(TreeSitterProvider::new()),
            generator,
        )
        .context("docsync exited with error")
    }
}
