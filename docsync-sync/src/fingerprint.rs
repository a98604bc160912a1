//! SHA-256 content fingerprints used to gate duplicate events.

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{io_err, SyncError};

/// Hex-encoded SHA-256 of `bytes`.
pub fn fingerprint_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Hex-encoded SHA-256 of the file at `path`.
///
/// Blocking; callers on an async runtime run it under `spawn_blocking`.
pub fn fingerprint_file(path: &Path) -> Result<String, SyncError> {
    let bytes = std::fs::read(path).map_err(|e| io_err(path, e))?;
    Ok(fingerprint_bytes(&bytes))
}
