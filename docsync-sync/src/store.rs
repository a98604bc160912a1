//! In-memory documentation store and single-level rollback slots.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};

use docsync_core::{DocKey, DocumentationRecord};

/// Generated documentation keyed by `(file, symbol)`.
#[derive(Debug, Default, Clone)]
pub struct DocumentationStore {
    records: HashMap<DocKey, DocumentationRecord>,
}

impl DocumentationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &DocKey) -> Option<&DocumentationRecord> {
        self.records.get(key)
    }

    /// Insert or replace, returning the displaced record.
    pub fn insert(&mut self, record: DocumentationRecord) -> Option<DocumentationRecord> {
        self.records.insert(record.key.clone(), record)
    }

    pub fn remove(&mut self, key: &DocKey) -> Option<DocumentationRecord> {
        self.records.remove(key)
    }

    /// Refresh `last_updated` without touching content. `false` if absent.
    pub fn touch(&mut self, key: &DocKey, at: DateTime<Utc>) -> bool {
        match self.records.get_mut(key) {
            Some(record) => {
                record.last_updated = at;
                true
            }
            None => false,
        }
    }

    /// Records belonging to `file`, sorted by symbol name.
    pub fn for_file(&self, file: &Path) -> Vec<&DocumentationRecord> {
        let mut records: Vec<_> = self
            .records
            .values()
            .filter(|record| record.file() == file)
            .collect();
        records.sort_by(|a, b| a.key.symbol.cmp(&b.key.symbol));
        records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The most recently displaced record per key. One level of undo.
#[derive(Debug, Default, Clone)]
pub struct RollbackStore {
    slots: HashMap<DocKey, DocumentationRecord>,
}

impl RollbackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the slot for the record's key.
    pub fn snapshot(&mut self, record: DocumentationRecord) {
        self.slots.insert(record.key.clone(), record);
    }

    pub fn get(&self, key: &DocKey) -> Option<&DocumentationRecord> {
        self.slots.get(key)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
