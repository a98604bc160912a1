//! Update manager: applies semantic changes to the documentation store.
//!
//! Per change kind:
//!
//! | kind                           | store                         | rollback slot | log |
//! |--------------------------------|-------------------------------|---------------|-----|
//! | `added`                        | insert generated record       | no            | yes |
//! | `deleted`                      | remove                        | snapshot      | yes |
//! | `modified`/`signature_changed` | replace with generated record | snapshot      | yes |
//! | `moved`                        | refresh `last_updated`        | no            | yes |
//!
//! Generation always happens before any mutation, so a generator failure
//! leaves the store untouched. Each change is isolated: a failure is logged,
//! counted, and the next change is applied.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;

use docsync_core::{
    ChangeEvent, ChangeKind, ChangeLogEntry, DocKey, DocumentationGenerator, DocumentationLevel,
    DocumentationRecord, SemanticChange, Symbol, SymbolName,
};

use crate::change_log::ChangeLog;
use crate::error::SyncError;
use crate::store::{DocumentationStore, RollbackStore};

/// Outcome of one [`UpdateManager::apply`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub applied: usize,
    pub failed: usize,
}

pub struct UpdateManager {
    generator: Arc<dyn DocumentationGenerator>,
    level: DocumentationLevel,
    docs: DocumentationStore,
    rollback: RollbackStore,
    log: ChangeLog,
}

impl UpdateManager {
    pub fn new(
        generator: Arc<dyn DocumentationGenerator>,
        level: DocumentationLevel,
        max_log_entries: usize,
    ) -> Self {
        Self {
            generator,
            level,
            docs: DocumentationStore::new(),
            rollback: RollbackStore::new(),
            log: ChangeLog::new(max_log_entries),
        }
    }

    /// Apply `changes` in order. `current` holds the provider symbols the
    /// changes were derived from; it may be empty for a deletion cascade.
    pub async fn apply(
        &mut self,
        changes: &[SemanticChange],
        current: &BTreeMap<SymbolName, Symbol>,
        event: &ChangeEvent,
    ) -> ApplySummary {
        let mut summary = ApplySummary::default();
        for change in changes {
            match self.apply_one(change, current, event).await {
                Ok(()) => summary.applied += 1,
                Err(err) => {
                    tracing::warn!(
                        "failed to apply {} for {}: {err}",
                        change.kind,
                        change.key()
                    );
                    summary.failed += 1;
                }
            }
        }
        summary
    }

    async fn apply_one(
        &mut self,
        change: &SemanticChange,
        current: &BTreeMap<SymbolName, Symbol>,
        event: &ChangeEvent,
    ) -> Result<(), SyncError> {
        let key = change.key();
        let (old_content, new_content) = match change.kind {
            // An `added` entry never carries old content. A record still
            // present here was restored by a rollback after its symbol was
            // deleted; it goes to the rollback slot instead.
            ChangeKind::Added => {
                let record = self.generate(change, current).await?;
                let new_content = record.content.clone();
                if let Some(displaced) = self.docs.insert(record) {
                    tracing::debug!("added {key} displaced an existing record");
                    self.rollback.snapshot(displaced);
                }
                (None, Some(new_content))
            }
            ChangeKind::Modified | ChangeKind::SignatureChanged => {
                let record = self.generate(change, current).await?;
                let new_content = record.content.clone();
                let old = self.docs.insert(record);
                if let Some(old) = &old {
                    self.rollback.snapshot(old.clone());
                }
                (old.map(|r| r.content), Some(new_content))
            }
            ChangeKind::Deleted => {
                let old = self.docs.remove(&key);
                if let Some(old) = &old {
                    self.rollback.snapshot(old.clone());
                }
                (old.map(|r| r.content), None)
            }
            ChangeKind::Moved => {
                if !self.docs.touch(&key, Utc::now()) {
                    tracing::debug!("moved symbol {key} has no documentation record");
                }
                (None, None)
            }
        };

        self.log.append(ChangeLogEntry {
            symbol: change.symbol.clone(),
            file: change.file.clone(),
            timestamp: Utc::now(),
            kind: change.kind,
            old_content,
            new_content,
            triggered_by: event.clone(),
            semantic_change: change.clone(),
        });
        tracing::debug!("applied {} for {key}", change.kind);
        Ok(())
    }

    async fn generate(
        &self,
        change: &SemanticChange,
        current: &BTreeMap<SymbolName, Symbol>,
    ) -> Result<DocumentationRecord, SyncError> {
        let symbol = current
            .get(&change.symbol)
            .ok_or_else(|| SyncError::SymbolMissing {
                file: change.file.clone(),
                symbol: change.symbol.clone(),
            })?;
        let content = self
            .generator
            .generate(symbol, &change.file, self.level)
            .await?;
        Ok(DocumentationRecord::new(change.key(), content))
    }

    /// Restore the last displaced record for `key`.
    ///
    /// The slot is kept, and no snapshot or log entry is written.
    pub fn rollback(&mut self, key: &DocKey) -> Result<DocumentationRecord, SyncError> {
        let record = self
            .rollback
            .get(key)
            .cloned()
            .ok_or_else(|| SyncError::RollbackNotFound { key: key.clone() })?;
        self.docs.insert(record.clone());
        tracing::info!("rolled back documentation for {key}");
        Ok(record)
    }

    pub fn docs(&self) -> &DocumentationStore {
        &self.docs
    }

    pub fn rollback_slots(&self) -> &RollbackStore {
        &self.rollback
    }

    pub fn log(&self) -> &ChangeLog {
        &self.log
    }

    pub fn level(&self) -> DocumentationLevel {
        self.level
    }
}
