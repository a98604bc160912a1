//! Read-only summaries over the change log.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docsync_core::{ChangeKind, ChangeLogEntry};

use crate::change_log::{ChangeLog, LogQuery};

/// Number of log entries touching one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileActivity {
    pub file: PathBuf,
    pub changes: usize,
}

/// Recent activity in a trailing window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub since: DateTime<Utc>,
    pub total: usize,
    pub by_kind: BTreeMap<ChangeKind, usize>,
    /// Most-changed files: count descending, then path ascending.
    pub top_files: Vec<FileActivity>,
    /// Most recent entries, newest first.
    pub latest: Vec<ChangeLogEntry>,
}

pub fn summarize(
    log: &ChangeLog,
    since: DateTime<Utc>,
    top_files: usize,
    latest: usize,
) -> ActivitySummary {
    let entries = log.query(&LogQuery::all().since(since));

    let mut by_kind = BTreeMap::new();
    let mut per_file: HashMap<&PathBuf, usize> = HashMap::new();
    for entry in &entries {
        *by_kind.entry(entry.kind).or_insert(0) += 1;
        *per_file.entry(&entry.file).or_insert(0) += 1;
    }

    let mut files: Vec<FileActivity> = per_file
        .into_iter()
        .map(|(file, changes)| FileActivity {
            file: file.clone(),
            changes,
        })
        .collect();
    files.sort_by(|a, b| b.changes.cmp(&a.changes).then_with(|| a.file.cmp(&b.file)));
    files.truncate(top_files);

    ActivitySummary {
        since,
        total: entries.len(),
        by_kind,
        top_files: files,
        latest: entries.iter().take(latest).map(|e| (*e).clone()).collect(),
    }
}

/// Running counters of the pipeline since start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineCounts {
    pub events_processed: u64,
    pub duplicates_skipped: u64,
    pub provider_failures: u64,
    pub changes_detected: u64,
    pub updates_applied: u64,
    pub updates_failed: u64,
}
