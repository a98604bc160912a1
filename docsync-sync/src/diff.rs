//! Semantic diff: the minimal symbol-level change set between the cached
//! signatures of a file and its current symbols.
//!
//! Pure functions; output is always sorted by symbol name.

use std::collections::BTreeMap;
use std::path::Path;

use docsync_core::{ChangeKind, SemanticChange, Symbol, SymbolName, SymbolSignature};

use crate::cache::FileSignatures;

/// Index the provider output by name. A repeated name keeps its last symbol.
pub fn index_symbols(current: &[Symbol]) -> BTreeMap<SymbolName, Symbol> {
    current
        .iter()
        .map(|symbol| (symbol.name.clone(), symbol.clone()))
        .collect()
}

/// Signatures of the indexed symbols, ready to be stored in the cache.
pub fn signatures_of(current: &BTreeMap<SymbolName, Symbol>) -> FileSignatures {
    current
        .iter()
        .map(|(name, symbol)| (name.clone(), symbol.signature()))
        .collect()
}

/// Compare `current` against `cached`. A missing cache slot is treated as empty,
/// so every current symbol is `added`.
pub fn diff_symbols(
    file: &Path,
    current: &BTreeMap<SymbolName, Symbol>,
    cached: Option<&FileSignatures>,
) -> Vec<SemanticChange> {
    let empty = FileSignatures::new();
    let cached = cached.unwrap_or(&empty);
    let mut changes = Vec::new();

    let mut names: Vec<&SymbolName> = current.keys().chain(cached.keys()).collect();
    names.sort();
    names.dedup();

    for name in names {
        let new_signature = current.get(name).map(Symbol::signature);
        let old_signature = cached.get(name);
        let item = match (old_signature, new_signature) {
            (None, Some(new)) => Some(change(file, name, ChangeKind::Added, None, Some(new))),
            (Some(old), None) => Some(change(
                file,
                name,
                ChangeKind::Deleted,
                Some(old.clone()),
                None,
            )),
            (Some(old), Some(new)) => old
                .classify(&new)
                .map(|kind| change(file, name, kind, Some(old.clone()), Some(new))),
            (None, None) => None,
        };
        changes.extend(item);
    }
    changes
}

/// Every cached symbol of a deleted file becomes a `deleted` change.
pub fn deletion_cascade(file: &Path, cached: &FileSignatures) -> Vec<SemanticChange> {
    cached
        .iter()
        .map(|(name, old)| change(file, name, ChangeKind::Deleted, Some(old.clone()), None))
        .collect()
}

fn change(
    file: &Path,
    name: &SymbolName,
    kind: ChangeKind,
    old_signature: Option<SymbolSignature>,
    new_signature: Option<SymbolSignature>,
) -> SemanticChange {
    let line = new_signature
        .as_ref()
        .or(old_signature.as_ref())
        .map(|sig| sig.line)
        .unwrap_or_default();
    SemanticChange {
        symbol: name.clone(),
        kind,
        old_signature,
        new_signature,
        file: file.to_path_buf(),
        line,
        impact: kind.impact(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsync_core::{Impact, SymbolKind};

    fn func(name: &str, line: u32, detail: &str) -> Symbol {
        Symbol::new(name, SymbolKind::Function, line, 0).with_detail(detail)
    }

    fn cached(symbols: &[Symbol]) -> FileSignatures {
        signatures_of(&index_symbols(symbols))
    }

    fn kinds(changes: &[SemanticChange]) -> Vec<(&str, ChangeKind)> {
        changes
            .iter()
            .map(|c| (c.symbol.as_str(), c.kind))
            .collect()
    }

    #[test]
    fn added_and_deleted_sets() {
        let file = Path::new("/src/m.py");
        let before = cached(&[func("a", 1, "def a()"), func("b", 2, "def b()"), func("c", 3, "def c()")]);
        let now = index_symbols(&[func("b", 2, "def b()"), func("c", 3, "def c()"), func("d", 4, "def d()")]);

        let changes = diff_symbols(file, &now, Some(&before));
        assert_eq!(
            kinds(&changes),
            vec![("a", ChangeKind::Deleted), ("d", ChangeKind::Added)]
        );
        assert_eq!(changes[0].impact, Impact::High);
        assert_eq!(changes[1].impact, Impact::Medium);
    }

    #[test]
    fn no_cache_slot_means_everything_added() {
        let now = index_symbols(&[func("z", 9, "def z()"), func("m", 1, "def m()")]);
        let changes = diff_symbols(Path::new("/x.py"), &now, None);
        assert_eq!(
            kinds(&changes),
            vec![("m", ChangeKind::Added), ("z", ChangeKind::Added)]
        );
        assert_eq!(changes[1].line, 9);
    }

    #[test]
    fn unchanged_symbols_produce_nothing() {
        let symbols = [func("a", 1, "def a()")];
        let changes = diff_symbols(Path::new("/x.py"), &index_symbols(&symbols), Some(&cached(&symbols)));
        assert!(changes.is_empty());
    }

    #[test]
    fn cascade_covers_every_cached_symbol() {
        let before = cached(&[func("a", 1, "def a()"), func("b", 5, "def b()"), func("c", 9, "def c()")]);
        let changes = deletion_cascade(Path::new("/gone.py"), &before);
        assert_eq!(changes.len(), 3);
        assert!(changes.iter().all(|c| c.kind == ChangeKind::Deleted && c.new_signature.is_none()));
        assert_eq!(changes[1].line, 5);
    }

    #[test]
    fn repeated_name_keeps_last_symbol() {
        let index = index_symbols(&[func("dup", 1, "def dup()"), func("dup", 7, "def dup(x)")]);
        assert_eq!(index.len(), 1);
        assert_eq!(index[&SymbolName::from("dup")].location.line, 7);
    }
}
