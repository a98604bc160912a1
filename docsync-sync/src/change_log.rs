//! Bounded, time-ordered audit trail of applied documentation changes.
//!
//! Backed by a ring buffer: appending past capacity silently evicts the
//! oldest entry. Queries return newest first.

use std::collections::VecDeque;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use similar::TextDiff;

use docsync_core::{ChangeLogEntry, SymbolName};

/// Default capacity of the change log.
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

#[derive(Debug, Clone)]
pub struct ChangeLog {
    entries: VecDeque<ChangeLogEntry>,
    capacity: usize,
}

impl Default for ChangeLog {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl ChangeLog {
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_MAX_ENTRIES)),
            capacity,
        }
    }

    /// Append `entry`, returning the evicted oldest entry when full.
    pub fn append(&mut self, entry: ChangeLogEntry) -> Option<ChangeLogEntry> {
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    /// Entries matching `query`, newest first.
    pub fn query(&self, query: &LogQuery) -> Vec<&ChangeLogEntry> {
        let matching = self.entries.iter().rev().filter(|entry| query.matches(entry));
        match query.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        }
    }

    /// Oldest-first iteration.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ChangeLogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Filter for [`ChangeLog::query`]. All criteria are optional and combined
/// with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    pub symbol: Option<SymbolName>,
    pub file: Option<PathBuf>,
    /// Inclusive lower bound on the entry timestamp.
    pub since: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl LogQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_symbol(mut self, symbol: impl Into<SymbolName>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn for_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Keep only entries from the trailing `window` ending now.
    pub fn within(mut self, window: Duration) -> Self {
        self.since = Some(window_start(Utc::now(), window));
        self
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, entry: &ChangeLogEntry) -> bool {
        if let Some(symbol) = &self.symbol {
            if &entry.symbol != symbol {
                return false;
            }
        }
        if let Some(file) = &self.file {
            if &entry.file != file {
                return false;
            }
        }
        if let Some(since) = self.since {
            if entry.timestamp < since {
                return false;
            }
        }
        true
    }
}

/// Start of the trailing `window` ending at `now`. Windows reaching past
/// the representable range start at [`DateTime::<Utc>::MIN_UTC`].
pub fn window_start(now: DateTime<Utc>, window: Duration) -> DateTime<Utc> {
    now.checked_sub_signed(window)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Unified diff between the old and new documentation text of `entry`.
///
/// Empty when the entry carries no content delta (e.g. a move).
pub fn content_diff(entry: &ChangeLogEntry) -> String {
    let old = entry
        .old_content
        .as_ref()
        .map(|c| c.to_text())
        .unwrap_or_default();
    let new = entry
        .new_content
        .as_ref()
        .map(|c| c.to_text())
        .unwrap_or_default();
    if old == new {
        return String::new();
    }
    let old_header = format!("a/{}", entry.symbol);
    let new_header = format!("b/{}", entry.symbol);
    TextDiff::from_lines(&old, &new)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string()
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use docsync_core::{
        ChangeEvent, ChangeKind, DocumentationContent, EventKind, SemanticChange,
    };

    pub fn entry_at(
        symbol: &str,
        file: &str,
        kind: ChangeKind,
        timestamp: DateTime<Utc>,
    ) -> ChangeLogEntry {
        ChangeLogEntry {
            symbol: SymbolName::from(symbol),
            file: PathBuf::from(file),
            timestamp,
            kind,
            old_content: None,
            new_content: Some(DocumentationContent::new(format!("{symbol} docs"))),
            triggered_by: ChangeEvent::new(file, EventKind::Modified).with_timestamp(timestamp),
            semantic_change: SemanticChange {
                symbol: SymbolName::from(symbol),
                kind,
                old_signature: None,
                new_signature: None,
                file: PathBuf::from(file),
                line: 0,
                impact: kind.impact(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::entry_at;
    use super::*;
    use docsync_core::{ChangeKind, DocumentationContent};

    fn entry(symbol: &str) -> ChangeLogEntry {
        entry_at(symbol, "/a.py", ChangeKind::Added, Utc::now())
    }

    #[test]
    fn append_past_capacity_evicts_oldest() {
        let mut log = ChangeLog::new(3);
        for name in ["a", "b", "c"] {
            assert!(log.append(entry(name)).is_none());
        }
        let evicted = log.append(entry("d")).expect("evicted");
        assert_eq!(evicted.symbol.as_str(), "a");
        assert_eq!(log.len(), 3);
        let oldest = log.iter().next().expect("oldest");
        assert_eq!(oldest.symbol.as_str(), "b");
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut log = ChangeLog::new(0);
        log.append(entry("a"));
        log.append(entry("b"));
        assert_eq!(log.len(), 1);
        assert_eq!(log.capacity(), 1);
    }

    #[test]
    fn query_is_newest_first_and_filtered() {
        let mut log = ChangeLog::default();
        let now = Utc::now();
        log.append(entry_at("f", "/a.py", ChangeKind::Added, now - Duration::hours(3)));
        log.append(entry_at("g", "/a.py", ChangeKind::Added, now - Duration::minutes(30)));
        log.append(entry_at("f", "/b.py", ChangeKind::Modified, now - Duration::minutes(5)));

        let all: Vec<_> = log.query(&LogQuery::all()).iter().map(|e| e.symbol.to_string()).collect();
        assert_eq!(all, vec!["f", "g", "f"]);
        assert_eq!(log.query(&LogQuery::all())[0].file, PathBuf::from("/b.py"));

        assert_eq!(log.query(&LogQuery::all().for_symbol("f")).len(), 2);
        assert_eq!(log.query(&LogQuery::all().within(Duration::hours(1))).len(), 2);
        assert_eq!(
            log.query(&LogQuery::all().for_symbol("f").within(Duration::hours(1))).len(),
            1
        );
        assert_eq!(log.query(&LogQuery::all().for_file("/a.py")).len(), 2);
        assert_eq!(log.query(&LogQuery::all().limit(1)).len(), 1);
    }

    #[test]
    fn oversized_window_covers_everything() {
        let now = Utc::now();
        assert_eq!(window_start(now, Duration::MAX), DateTime::<Utc>::MIN_UTC);
        assert_eq!(window_start(now, Duration::hours(1)), now - Duration::hours(1));

        let mut log = ChangeLog::default();
        log.append(entry_at("f", "/a.py", ChangeKind::Added, now - Duration::days(400)));
        let huge = Duration::try_seconds(10_000_000_000_000).expect("in range");
        assert_eq!(log.query(&LogQuery::all().within(huge)).len(), 1);
    }

    #[test]
    fn content_diff_shows_changed_lines() {
        let mut e = entry("parse");
        e.old_content = Some(DocumentationContent::new("Parses text."));
        e.new_content = Some(DocumentationContent::new("Parses text strictly."));
        let diff = content_diff(&e);
        assert!(diff.contains("--- a/parse"));
        assert!(diff.contains("-Parses text."));
        assert!(diff.contains("+Parses text strictly."));
    }

    #[test]
    fn content_diff_empty_without_delta() {
        let mut e = entry("moved");
        e.new_content = None;
        assert!(content_diff(&e).is_empty());
    }
}
