use std::path::{Path, PathBuf};

pub use docsync_core::config::docsync_root;

pub const DAEMON_SOCKET: &str = "docsync.sock";
pub const DEFAULT_EXPORT: &str = "change-log.json";

pub fn socket_path(home: &Path) -> PathBuf {
    docsync_root(home).join(DAEMON_SOCKET)
}

/// Where `export` writes when the caller gives no path.
pub fn default_export_path(home: &Path) -> PathBuf {
    docsync_root(home).join(DEFAULT_EXPORT)
}
