//! Change sources: push (OS notifications) and poll (periodic re-scan).
//!
//! Both strategies emit identical [`ChangeEvent`](docsync_core::ChangeEvent)
//! shapes into an [`EventSink`] and filter out untracked files first.

mod poll;
mod push;

pub use self::push::{translate, NotifySource};
pub use self::poll::{diff_snapshots, snapshot, PollSource, Snapshot};

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use docsync_core::{SyncConfig, WatchBackend};

use crate::error::{io_err, DaemonError};
use crate::queue::EventSink;

/// A strategy that reports file changes under a set of roots.
///
/// `start` must be called from within a tokio runtime.
pub trait ChangeSource: Send {
    fn name(&self) -> &'static str;

    fn start(&mut self, roots: &[PathBuf], sink: EventSink) -> Result<(), DaemonError>;

    /// Stop emitting. Idempotent.
    fn stop(&mut self);
}

/// Decides which paths are tracked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFilter {
    extensions: HashSet<String>,
    ignored_dirs: HashSet<String>,
}

impl SourceFilter {
    pub fn new<E, I>(extensions: E, ignored_dirs: I) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            ignored_dirs: ignored_dirs
                .into_iter()
                .map(|d| d.as_ref().to_string())
                .collect(),
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(&config.tracked_extensions, &config.ignored_dirs)
    }

    /// `true` if no component of `path` is ignored.
    pub fn is_visible(&self, path: &Path) -> bool {
        !path.components().any(|component| {
            component
                .as_os_str()
                .to_str()
                .map(|name| self.ignored_dirs.contains(name))
                .unwrap_or(false)
        })
    }

    /// `true` for visible files with a tracked extension.
    pub fn is_tracked(&self, path: &Path) -> bool {
        let tracked_ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.contains(&ext.to_ascii_lowercase()))
            .unwrap_or(false);
        tracked_ext && self.is_visible(path)
    }
}

/// `path` relative to the first root containing it, or `path` itself.
///
/// Filters are applied to this relative form; a root under an ignored name
/// (e.g. `~/build/project`) is still watched.
pub fn relative_to_roots<'a>(roots: &[PathBuf], path: &'a Path) -> &'a Path {
    roots
        .iter()
        .find_map(|root| path.strip_prefix(root).ok())
        .unwrap_or(path)
}

/// Every tracked file under `roots`, sorted. Ignored directories are not
/// descended into. A root that is itself a file is included if tracked.
pub fn scan_tracked(roots: &[PathBuf], filter: &SourceFilter) -> Result<Vec<PathBuf>, DaemonError> {
    let mut files = Vec::new();
    let mut dirs = Vec::new();
    for root in roots {
        if root.is_file() {
            if filter.is_tracked(root) {
                files.push(root.clone());
            }
        } else {
            dirs.push(root.clone());
        }
    }

    let mut cursor = 0;
    while cursor < dirs.len() {
        let current = dirs[cursor].clone();
        cursor += 1;
        let entries = match fs::read_dir(&current) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
            Err(err) => return Err(io_err(&current, err)),
        };
        for entry in entries {
            let entry = entry.map_err(|e| io_err(&current, e))?;
            let path = entry.path();
            let ty = entry.file_type().map_err(|e| io_err(&path, e))?;
            // Ancestors up to the root were already accepted; judge the entry name alone.
            let name = PathBuf::from(entry.file_name());
            if ty.is_dir() {
                if filter.is_visible(&name) {
                    dirs.push(path);
                }
            } else if ty.is_file() && filter.is_tracked(&name) {
                files.push(path);
            }
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// Start the change source configured by `config.watch_backend`.
///
/// `Auto` tries the push backend and falls back to polling when it cannot
/// start. Only a failure of every candidate is returned as
/// [`DaemonError::NoChangeSource`].
pub fn select_source(
    config: &SyncConfig,
    roots: &[PathBuf],
    sink: EventSink,
) -> Result<Box<dyn ChangeSource>, DaemonError> {
    let filter = SourceFilter::from_config(config);
    let candidates: Vec<Box<dyn ChangeSource>> = match config.watch_backend {
        WatchBackend::Notify => vec![Box::new(NotifySource::new(filter, config.hash_workers))],
        WatchBackend::Poll => vec![Box::new(PollSource::new(filter, config.poll_interval()))],
        WatchBackend::Auto => vec![
            Box::new(NotifySource::new(filter.clone(), config.hash_workers)),
            Box::new(PollSource::new(filter, config.poll_interval())),
        ],
    };

    start_first(candidates, roots, sink)
}

/// Start the first candidate that comes up, in order.
pub(crate) fn start_first(
    candidates: Vec<Box<dyn ChangeSource>>,
    roots: &[PathBuf],
    sink: EventSink,
) -> Result<Box<dyn ChangeSource>, DaemonError> {
    let mut failures = Vec::new();
    for mut source in candidates {
        match source.start(roots, sink.clone()) {
            Ok(()) => {
                tracing::info!(backend = source.name(), "change source started");
                return Ok(source);
            }
            Err(err) => {
                tracing::warn!(backend = source.name(), error = %err, "change source failed to start");
                failures.push(format!("{}: {err}", source.name()));
            }
        }
    }
    Err(DaemonError::NoChangeSource(failures.join("; ")))
}
