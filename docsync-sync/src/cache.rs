//! Per-file symbol signature cache.
//!
//! The cache for a file reflects exactly the symbols seen on the last
//! successfully processed event for that file.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use docsync_core::{SymbolName, SymbolSignature};

/// Signatures of every symbol in one file, ordered by name.
pub type FileSignatures = BTreeMap<SymbolName, SymbolSignature>;

#[derive(Debug, Default, Clone)]
pub struct SignatureCache {
    files: HashMap<PathBuf, FileSignatures>,
}

impl SignatureCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, file: &Path) -> Option<&FileSignatures> {
        self.files.get(file)
    }

    /// Replace the slot for `file`, returning the previous signatures.
    pub fn replace(&mut self, file: &Path, signatures: FileSignatures) -> Option<FileSignatures> {
        self.files.insert(file.to_path_buf(), signatures)
    }

    /// Clear the slot for `file`.
    pub fn remove(&mut self, file: &Path) -> Option<FileSignatures> {
        self.files.remove(file)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn symbol_count(&self) -> usize {
        self.files.values().map(BTreeMap::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsync_core::{Symbol, SymbolKind};

    fn sigs(names: &[&str]) -> FileSignatures {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let sym = Symbol::new(*n, SymbolKind::Function, i as u32, 0);
                (sym.name.clone(), sym.signature())
            })
            .collect()
    }

    #[test]
    fn counts_track_replace_and_remove() {
        let mut cache = SignatureCache::new();
        cache.replace(Path::new("/a.py"), sigs(&["x", "y"]));
        cache.replace(Path::new("/b.py"), sigs(&["z"]));
        assert_eq!(cache.file_count(), 2);
        assert_eq!(cache.symbol_count(), 3);

        let old = cache.replace(Path::new("/a.py"), sigs(&["x"])).expect("previous");
        assert_eq!(old.len(), 2);
        assert_eq!(cache.symbol_count(), 2);

        cache.remove(Path::new("/b.py"));
        assert!(cache.get(Path::new("/b.py")).is_none());
        assert_eq!(cache.file_count(), 1);
    }
}
