//! Serialisation tests for `docsync-core` types.
//!
//! Each `#[case]` is isolated; no shared state.

use chrono::{TimeZone, Utc};
use docsync_core::{
    ChangeEvent, ChangeKind, ChangeLogEntry, DocumentationContent, EventKind, SemanticChange,
    Symbol, SymbolKind, SymbolName,
};
use rstest::rstest;
use std::path::PathBuf;

fn entry(kind: ChangeKind, old: Option<&str>, new: Option<&str>) -> ChangeLogEntry {
    let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().expect("timestamp");
    let sig = Symbol::new("parse", SymbolKind::Function, 4, 0)
        .with_detail("def parse(text)")
        .signature();
    ChangeLogEntry {
        symbol: SymbolName::from("parse"),
        file: PathBuf::from("/code/app/parser.py"),
        timestamp: ts,
        kind,
        old_content: old.map(DocumentationContent::new),
        new_content: new.map(DocumentationContent::new),
        triggered_by: ChangeEvent::new("/code/app/parser.py", EventKind::Modified)
            .with_timestamp(ts)
            .with_fingerprint("ab12"),
        semantic_change: SemanticChange {
            symbol: SymbolName::from("parse"),
            kind,
            old_signature: Some(sig.clone()),
            new_signature: Some(sig),
            file: PathBuf::from("/code/app/parser.py"),
            line: 4,
            impact: kind.impact(),
        },
    }
}

#[rstest]
#[case::added(entry(ChangeKind::Added, None, Some("Parses text.")))]
#[case::deleted(entry(ChangeKind::Deleted, Some("Parses text."), None))]
#[case::modified(entry(ChangeKind::Modified, Some("old"), Some("new")))]
#[case::moved(entry(ChangeKind::Moved, None, None))]
#[case::unicode(entry(ChangeKind::SignatureChanged, Some("анализ"), Some("解析 ✓")))]
fn change_log_entry_yaml_roundtrip(#[case] original: ChangeLogEntry) {
    let yaml = serde_yaml::to_string(&original).expect("serialize");
    let restored: ChangeLogEntry = serde_yaml::from_str(&yaml).expect("deserialize");
    assert_eq!(original, restored);
}

#[rstest]
#[case(EventKind::Created, "created")]
#[case(EventKind::Modified, "modified")]
#[case(EventKind::Deleted, "deleted")]
#[case(EventKind::Moved, "moved")]
fn event_kind_wire_names(#[case] kind: EventKind, #[case] expected: &str) {
    let yaml = serde_yaml::to_string(&kind).expect("serialize");
    assert_eq!(yaml.trim(), expected);
}

#[rstest]
#[case(SymbolKind::TypeAlias, "type_alias")]
#[case(SymbolKind::Method, "method")]
#[case(SymbolKind::Class, "class")]
fn symbol_kind_display_matches_serde(#[case] kind: SymbolKind, #[case] expected: &str) {
    let yaml = serde_yaml::to_string(&kind).expect("serialize");
    assert_eq!(yaml.trim(), expected);
    assert_eq!(kind.to_string(), expected);
}

#[test]
fn event_without_fingerprint_deserializes() {
    let yaml = "path: /a/b.rs\nkind: deleted\ntimestamp: 2024-05-01T12:00:00Z\n";
    let event: ChangeEvent = serde_yaml::from_str(yaml).expect("deserialize");
    assert_eq!(event.kind, EventKind::Deleted);
    assert_eq!(event.fingerprint, None);
}
