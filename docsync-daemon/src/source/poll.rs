use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use docsync_core::{ChangeEvent, EventKind};
use docsync_sync::fingerprint_file;

use super::{scan_tracked, ChangeSource, SourceFilter};
use crate::error::DaemonError;
use crate::queue::EventSink;

/// Content fingerprint per tracked file, ordered by path.
pub type Snapshot = BTreeMap<PathBuf, String>;

/// Poll source: re-scans the roots every `interval` and compares SHA-256
/// fingerprints against the previous scan.
///
/// The first scan is a silent baseline.
pub struct PollSource {
    filter: SourceFilter,
    interval: Duration,
    stop_tx: Option<broadcast::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl PollSource {
    pub fn new(filter: SourceFilter, interval: Duration) -> Self {
        Self {
            filter,
            interval,
            stop_tx: None,
            task: None,
        }
    }
}

impl ChangeSource for PollSource {
    fn name(&self) -> &'static str {
        "poll"
    }

    fn start(&mut self, roots: &[PathBuf], sink: EventSink) -> Result<(), DaemonError> {
        if self.task.is_some() {
            return Ok(());
        }
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|err| DaemonError::WatchUnavailable(format!("no async runtime: {err}")))?;

        let (stop_tx, stop_rx) = broadcast::channel(1);
        let task = runtime.spawn(poll_loop(
            roots.to_vec(),
            self.filter.clone(),
            self.interval,
            sink,
            stop_rx,
        ));
        self.stop_tx = Some(stop_tx);
        self.task = Some(task);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for PollSource {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll_loop(
    roots: Vec<PathBuf>,
    filter: SourceFilter,
    interval: Duration,
    sink: EventSink,
    mut stop_rx: broadcast::Receiver<()>,
) {
    let mut previous = take_snapshot(roots.clone(), filter.clone())
        .await
        .unwrap_or_default();
    tracing::debug!(files = previous.len(), "poll baseline established");

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = stop_rx.recv() => break,
            _ = ticker.tick() => {
                let Some(current) = take_snapshot(roots.clone(), filter.clone()).await else {
                    continue;
                };
                for event in diff_snapshots(&previous, &current) {
                    if sink.push(event).is_err() {
                        return;
                    }
                }
                previous = current;
            }
        }
    }
}

async fn take_snapshot(roots: Vec<PathBuf>, filter: SourceFilter) -> Option<Snapshot> {
    match tokio::task::spawn_blocking(move || snapshot(&roots, &filter)).await {
        Ok(Ok(snapshot)) => Some(snapshot),
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "poll scan failed");
            None
        }
        Err(err) => {
            tracing::warn!(error = %err, "poll scan join failure");
            None
        }
    }
}

/// Scan and fingerprint every tracked file under `roots`. Blocking.
///
/// Files that disappear between listing and hashing are left out.
pub fn snapshot(roots: &[PathBuf], filter: &SourceFilter) -> Result<Snapshot, DaemonError> {
    let mut snapshot = Snapshot::new();
    for path in scan_tracked(roots, filter)? {
        match fingerprint_file(&path) {
            Ok(fingerprint) => {
                snapshot.insert(path, fingerprint);
            }
            Err(err) => tracing::debug!(path = %path.display(), error = %err, "skipping file"),
        }
    }
    Ok(snapshot)
}

/// Events that turn `previous` into `current`, sorted by path.
pub fn diff_snapshots(previous: &Snapshot, current: &Snapshot) -> Vec<ChangeEvent> {
    let mut events = Vec::new();
    for (path, fingerprint) in current {
        match previous.get(path) {
            None => events.push(
                ChangeEvent::new(path.clone(), EventKind::Created).with_fingerprint(fingerprint),
            ),
            Some(old) if old != fingerprint => events.push(
                ChangeEvent::new(path.clone(), EventKind::Modified).with_fingerprint(fingerprint),
            ),
            Some(_) => {}
        }
    }
    for path in previous.keys() {
        if !current.contains_key(path) {
            events.push(ChangeEvent::new(path.clone(), EventKind::Deleted));
        }
    }
    events.sort_by(|a, b| a.path.cmp(&b.path));
    events
}
