//! The synchronization pipeline: one event in, semantic changes applied.
//!
//! A [`Pipeline`] owns the signature cache, the stores and the change log.
//! It is driven by exactly one task at a time, which makes it the sole
//! mutator of all of them.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Duration, Utc};

use docsync_core::{
    ChangeEvent, ChangeLogEntry, DocKey, DocumentationGenerator, DocumentationLevel,
    DocumentationRecord, EventKind, SemanticChange, Symbol, SymbolName, SymbolProvider, SyncConfig,
};

use crate::activity::{self, ActivitySummary, PipelineCounts};
use crate::cache::{FileSignatures, SignatureCache};
use crate::change_log::{window_start, LogQuery};
use crate::diff;
use crate::error::SyncError;
use crate::export;
use crate::manager::UpdateManager;

pub struct Pipeline {
    provider: Arc<dyn SymbolProvider>,
    cache: SignatureCache,
    manager: UpdateManager,
    /// Fingerprint of the last successfully processed event, per path.
    fingerprints: HashMap<PathBuf, String>,
    counts: PipelineCounts,
    activity_top_files: usize,
    activity_latest: usize,
}

impl Pipeline {
    pub fn new(
        provider: Arc<dyn SymbolProvider>,
        generator: Arc<dyn DocumentationGenerator>,
        config: &SyncConfig,
    ) -> Self {
        Self {
            provider,
            cache: SignatureCache::new(),
            manager: UpdateManager::new(
                generator,
                config.documentation_level,
                config.max_log_entries,
            ),
            fingerprints: HashMap::new(),
            counts: PipelineCounts::default(),
            activity_top_files: config.activity_top_files,
            activity_latest: config.activity_latest,
        }
    }

    /// Process one event to completion and return the changes it produced.
    ///
    /// Never fails: provider errors are logged and the file is skipped with
    /// its cache slot untouched.
    pub async fn handle(&mut self, event: &ChangeEvent) -> Vec<SemanticChange> {
        self.counts.events_processed += 1;
        let path = event.path.as_path();

        if event.kind == EventKind::Deleted {
            return self.handle_deleted(event).await;
        }

        if let Some(fingerprint) = &event.fingerprint {
            if self.fingerprints.get(path) == Some(fingerprint) {
                tracing::debug!("unchanged content, skipping {}", path.display());
                self.counts.duplicates_skipped += 1;
                return Vec::new();
            }
        }

        let symbols = match self.provider.symbols(path).await {
            Ok(symbols) => symbols,
            Err(err) => {
                if err.is_parse_failure() {
                    tracing::warn!("parse failure, skipping {}: {err}", path.display());
                } else {
                    tracing::warn!("symbol lookup failed for {}: {err}", path.display());
                }
                self.counts.provider_failures += 1;
                return Vec::new();
            }
        };

        let current = diff::index_symbols(&symbols);
        let changes = diff::diff_symbols(path, &current, self.cache.get(path));
        self.cache.replace(path, diff::signatures_of(&current));
        match &event.fingerprint {
            Some(fingerprint) => {
                self.fingerprints
                    .insert(path.to_path_buf(), fingerprint.clone());
            }
            None => {
                self.fingerprints.remove(path);
            }
        }

        self.apply(&changes, &current, event).await;
        changes
    }

    async fn handle_deleted(&mut self, event: &ChangeEvent) -> Vec<SemanticChange> {
        let path = event.path.as_path();
        self.fingerprints.remove(path);
        let Some(cached) = self.cache.remove(path) else {
            tracing::debug!("deleted file was never cached: {}", path.display());
            return Vec::new();
        };
        let changes = diff::deletion_cascade(path, &cached);
        self.apply(&changes, &BTreeMap::new(), event).await;
        changes
    }

    async fn apply(
        &mut self,
        changes: &[SemanticChange],
        current: &BTreeMap<SymbolName, Symbol>,
        event: &ChangeEvent,
    ) {
        if changes.is_empty() {
            return;
        }
        tracing::info!(
            "{} semantic change(s) in {}",
            changes.len(),
            event.path.display()
        );
        let summary = self.manager.apply(changes, current, event).await;
        self.counts.changes_detected += changes.len() as u64;
        self.counts.updates_applied += summary.applied as u64;
        self.counts.updates_failed += summary.failed as u64;
    }

    // -----------------------------------------------------------------------
    // Views and control
    // -----------------------------------------------------------------------

    /// Restore the last displaced documentation for `key`.
    pub fn rollback(&mut self, key: &DocKey) -> Result<DocumentationRecord, SyncError> {
        self.manager.rollback(key)
    }

    /// Change-log entries matching `query`, newest first.
    pub fn history(&self, query: &LogQuery) -> Vec<ChangeLogEntry> {
        self.manager.log().query(query).into_iter().cloned().collect()
    }

    /// Activity in the trailing `window`.
    pub fn activity(&self, window: Duration) -> ActivitySummary {
        activity::summarize(
            self.manager.log(),
            window_start(Utc::now(), window),
            self.activity_top_files,
            self.activity_latest,
        )
    }

    /// Write the change log as versioned JSON to `path`.
    pub fn export(&self, path: &Path) -> Result<usize, SyncError> {
        export::export_to(self.manager.log(), path)
    }

    pub fn documentation(&self, key: &DocKey) -> Option<&DocumentationRecord> {
        self.manager.docs().get(key)
    }

    pub fn cached_files(&self) -> usize {
        self.cache.file_count()
    }

    pub fn cached_symbols(&self) -> usize {
        self.cache.symbol_count()
    }

    pub fn cached_signatures(&self, file: &Path) -> Option<&FileSignatures> {
        self.cache.get(file)
    }

    pub fn documented_symbols(&self) -> usize {
        self.manager.docs().len()
    }

    pub fn rollback_slots(&self) -> usize {
        self.manager.rollback_slots().len()
    }

    pub fn logged_changes(&self) -> usize {
        self.manager.log().len()
    }

    pub fn level(&self) -> DocumentationLevel {
        self.manager.level()
    }

    pub fn counts(&self) -> PipelineCounts {
        self.counts
    }
}
