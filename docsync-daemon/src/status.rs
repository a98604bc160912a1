//! Read-only status views.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use docsync_core::DocumentationLevel;
use docsync_sync::{Pipeline, PipelineCounts};

/// Counters read from the pipeline by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineView {
    pub cached_files: usize,
    pub cached_symbols: usize,
    pub documented_symbols: usize,
    pub rollback_slots: usize,
    pub logged_changes: usize,
    pub documentation_level: DocumentationLevel,
    pub counts: PipelineCounts,
}

impl PipelineView {
    pub fn of(pipeline: &Pipeline) -> Self {
        Self {
            cached_files: pipeline.cached_files(),
            cached_symbols: pipeline.cached_symbols(),
            documented_symbols: pipeline.documented_symbols(),
            rollback_slots: pipeline.rollback_slots(),
            logged_changes: pipeline.logged_changes(),
            documentation_level: pipeline.level(),
            counts: pipeline.counts(),
        }
    }
}

/// Snapshot returned by `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub running: bool,
    /// Name of the active change source, `None` when stopped.
    pub backend: Option<String>,
    pub watched_paths: Vec<PathBuf>,
    pub queue_depth: usize,
    /// `None` before the first `start`.
    pub pipeline: Option<PipelineView>,
}

impl StatusSnapshot {
    pub fn idle() -> Self {
        Self {
            running: false,
            backend: None,
            watched_paths: Vec::new(),
            queue_depth: 0,
            pipeline: None,
        }
    }
}
