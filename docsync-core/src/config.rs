//! YAML configuration for docsync.
//!
//! # Storage layout
//!
//! ```text
//! ~/.docsync/
//!   config.yaml   (mode 0600, optional, defaults apply when absent)
//! ```
//!
//! # API pattern
//!
//! Every filesystem function has two forms:
//! - `fn_at(home: &Path, …)`: explicit home; used in tests with `TempDir`
//! - `fn(…)`: derives home from `dirs::home_dir()`, delegates to `_at`

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::DocumentationLevel;

/// Which change-source backend to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WatchBackend {
    /// Probe the OS notification backend, fall back to polling.
    #[default]
    Auto,
    Notify,
    Poll,
}

impl fmt::Display for WatchBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchBackend::Auto => write!(f, "auto"),
            WatchBackend::Notify => write!(f, "notify"),
            WatchBackend::Poll => write!(f, "poll"),
        }
    }
}

impl FromStr for WatchBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "notify" => Ok(Self::Notify),
            "poll" => Ok(Self::Poll),
            other => Err(format!(
                "unknown watch backend '{other}'; expected: auto, notify, poll"
            )),
        }
    }
}

/// Runtime configuration of the synchronization pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub documentation_level: DocumentationLevel,
    /// Change-log capacity; the oldest entry is evicted past this.
    pub max_log_entries: usize,
    pub watch_backend: WatchBackend,
    pub poll_interval_ms: u64,
    /// Bounded wait of the dispatcher between stop-flag checks.
    pub dispatch_wait_ms: u64,
    /// Concurrent content-hashing jobs for the push source.
    pub hash_workers: usize,
    /// Enqueue every tracked file as `created` when the pipeline starts.
    pub initial_scan: bool,
    /// File extensions (without the dot) that are tracked.
    pub tracked_extensions: Vec<String>,
    /// Path components that exclude a file (VCS and build artifacts).
    pub ignored_dirs: Vec<String>,
    pub activity_top_files: usize,
    pub activity_latest: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            documentation_level: DocumentationLevel::Standard,
            max_log_entries: 1000,
            watch_backend: WatchBackend::Auto,
            poll_interval_ms: 2000,
            dispatch_wait_ms: 1000,
            hash_workers: 4,
            initial_scan: false,
            tracked_extensions: ["py", "js", "ts", "java", "rs", "go", "cpp", "c", "h"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ignored_dirs: [
                ".git",
                "__pycache__",
                "target",
                "node_modules",
                ".venv",
                "venv",
                "dist",
                "build",
                ".mypy_cache",
                ".pytest_cache",
                ".DS_Store",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            activity_top_files: 5,
            activity_latest: 10,
        }
    }
}

impl SyncConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn dispatch_wait(&self) -> Duration {
        Duration::from_millis(self.dispatch_wait_ms.max(1))
    }
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// `<home>/.docsync/`
pub fn docsync_root(home: &Path) -> PathBuf {
    home.join(".docsync")
}

/// `<home>/.docsync/config.yaml`: pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    docsync_root(home).join("config.yaml")
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

/// Load the configuration from `<home>/.docsync/config.yaml`.
///
/// Returns defaults if the file does not exist, `ConfigError::Parse` (with
/// path + line context) if it is malformed. Missing keys take their defaults.
pub fn load_at(home: &Path) -> Result<SyncConfig, ConfigError> {
    let path = config_path_at(home);
    if !path.exists() {
        return Ok(SyncConfig::default());
    }
    let contents = std::fs::read_to_string(&path)?;
    if contents.trim().is_empty() {
        return Ok(SyncConfig::default());
    }
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse { path, source: e })
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<SyncConfig, ConfigError> {
    load_at(&home()?)
}

/// Atomically save the configuration.
///
/// Write flow: serialize → `config.yaml.tmp` sibling → `chmod 0600` → `rename`.
pub fn save_at(home: &Path, config: &SyncConfig) -> Result<PathBuf, ConfigError> {
    let root = docsync_root(home);
    if !root.exists() {
        std::fs::create_dir_all(&root)?;
        set_dir_permissions(&root)?;
    }
    let path = config_path_at(home);
    let tmp_path = path.with_file_name("config.yaml.tmp");

    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(&tmp_path, yaml)?;
    set_file_permissions(&tmp_path)?;
    std::fs::rename(&tmp_path, &path)?;
    Ok(path)
}

/// `save_at` convenience wrapper.
pub fn save(config: &SyncConfig) -> Result<PathBuf, ConfigError> {
    save_at(&home()?, config)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
