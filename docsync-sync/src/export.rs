//! Versioned JSON export of the change log.
//!
//! One object per entry, oldest first. Written with the atomic `.tmp` +
//! rename pattern.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docsync_core::{
    ChangeEvent, ChangeKind, ChangeLogEntry, DocumentationContent, SemanticChange, SymbolName,
};

use crate::change_log::ChangeLog;
use crate::error::{export_err, io_err, SyncError};

/// Bumped on any incompatible change to [`ExportedEntry`].
pub const EXPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedEntry {
    pub schema_version: u32,
    pub symbol: SymbolName,
    pub file: PathBuf,
    pub timestamp: DateTime<Utc>,
    pub kind: ChangeKind,
    pub old_content: Option<DocumentationContent>,
    pub new_content: Option<DocumentationContent>,
    pub triggered_by: ChangeEvent,
    pub semantic_change: SemanticChange,
}

impl From<&ChangeLogEntry> for ExportedEntry {
    fn from(entry: &ChangeLogEntry) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION,
            symbol: entry.symbol.clone(),
            file: entry.file.clone(),
            timestamp: entry.timestamp,
            kind: entry.kind,
            old_content: entry.old_content.clone(),
            new_content: entry.new_content.clone(),
            triggered_by: entry.triggered_by.clone(),
            semantic_change: entry.semantic_change.clone(),
        }
    }
}

/// Serialize the whole log, oldest first, as a pretty JSON array.
pub fn to_json(log: &ChangeLog) -> Result<String, SyncError> {
    let entries: Vec<ExportedEntry> = log.iter().map(ExportedEntry::from).collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

/// Write the export to `path` atomically. Returns the number of entries.
pub fn export_to(log: &ChangeLog, path: &Path) -> Result<usize, SyncError> {
    let json = to_json(log)?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| export_err(dir, e))?;
    }
    let tmp = tmp_path(path);
    std::fs::write(&tmp, json).map_err(|e| export_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(export_err(path, e));
    }
    tracing::info!("exported {} change log entries to {}", log.len(), path.display());
    Ok(log.len())
}

/// Read an export file back.
pub fn load_export(path: &Path) -> Result<Vec<ExportedEntry>, SyncError> {
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    Ok(serde_json::from_str(&contents)?)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
