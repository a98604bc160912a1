use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::event::{ModifyKind, RenameMode};
use notify::{
    recommended_watcher, Event, EventKind as NotifyKind, RecommendedWatcher, RecursiveMode,
    Watcher,
};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinHandle;

use docsync_core::{ChangeEvent, EventKind};
use docsync_sync::fingerprint_file;

use super::{relative_to_roots, ChangeSource, SourceFilter};
use crate::error::DaemonError;
use crate::queue::EventSink;

/// Push source backed by the platform's recommended `notify` watcher.
///
/// The notification thread only forwards raw events. Translation, filtering
/// and content hashing happen on the runtime, with at most `hash_workers`
/// files hashed concurrently on the blocking pool.
pub struct NotifySource {
    filter: SourceFilter,
    hash_workers: usize,
    watcher: Option<RecommendedWatcher>,
    forwarder: Option<JoinHandle<()>>,
}

impl NotifySource {
    pub fn new(filter: SourceFilter, hash_workers: usize) -> Self {
        Self {
            filter,
            hash_workers: hash_workers.max(1),
            watcher: None,
            forwarder: None,
        }
    }
}

impl ChangeSource for NotifySource {
    fn name(&self) -> &'static str {
        "notify"
    }

    fn start(&mut self, roots: &[PathBuf], sink: EventSink) -> Result<(), DaemonError> {
        if self.watcher.is_some() {
            return Ok(());
        }
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|err| DaemonError::WatchUnavailable(format!("no async runtime: {err}")))?;

        let (raw_tx, raw_rx) = mpsc::unbounded_channel::<notify::Result<Event>>();
        let mut watcher = recommended_watcher(move |event| {
            let _ = raw_tx.send(event);
        })
        .map_err(|err| DaemonError::WatchUnavailable(err.to_string()))?;

        for root in roots {
            watcher
                .watch(root, RecursiveMode::Recursive)
                .map_err(|err| {
                    DaemonError::WatchUnavailable(format!("{}: {err}", root.display()))
                })?;
            tracing::debug!(path = %root.display(), "watching directory tree");
        }

        let forwarder = runtime.spawn(forward_events(
            raw_rx,
            roots.to_vec(),
            self.filter.clone(),
            Arc::new(Semaphore::new(self.hash_workers)),
            sink,
        ));
        self.watcher = Some(watcher);
        self.forwarder = Some(forwarder);
        Ok(())
    }

    fn stop(&mut self) {
        // Dropping the watcher closes the raw channel and ends the forwarder.
        self.watcher = None;
        if let Some(forwarder) = self.forwarder.take() {
            forwarder.abort();
        }
    }
}

impl Drop for NotifySource {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn forward_events(
    mut raw_rx: mpsc::UnboundedReceiver<notify::Result<Event>>,
    roots: Vec<PathBuf>,
    filter: SourceFilter,
    hashers: Arc<Semaphore>,
    sink: EventSink,
) {
    while let Some(event) = raw_rx.recv().await {
        let event = match event {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(error = %err, "watcher event error");
                continue;
            }
        };
        for (path, kind) in translate(&event) {
            if !filter.is_tracked(relative_to_roots(&roots, &path)) {
                continue;
            }
            if kind == EventKind::Deleted {
                if sink.push(ChangeEvent::new(path, kind)).is_err() {
                    return;
                }
                continue;
            }
            let sink = sink.clone();
            let hashers = hashers.clone();
            tokio::spawn(async move {
                let Ok(_permit) = hashers.acquire_owned().await else {
                    return;
                };
                if let Some(event) = hashed_event(path, kind).await {
                    let _ = sink.push(event);
                }
            });
        }
    }
}

/// Hash `path` on the blocking pool. `None` if the file vanished meanwhile;
/// a later `deleted` event covers it.
async fn hashed_event(path: PathBuf, kind: EventKind) -> Option<ChangeEvent> {
    let hash_path = path.clone();
    let hashed = tokio::task::spawn_blocking(move || fingerprint_file(&hash_path)).await;
    match hashed {
        Ok(Ok(fingerprint)) => Some(ChangeEvent::new(path, kind).with_fingerprint(fingerprint)),
        Ok(Err(err)) => {
            tracing::debug!(path = %path.display(), error = %err, "skipping unreadable file");
            None
        }
        Err(err) => {
            tracing::warn!(error = %err, "hash task join failure");
            None
        }
    }
}

/// Map one `notify` event to `(path, kind)` pairs.
///
/// Renames become `deleted` for the source and `moved` for the destination.
/// Access events and unclassified events are dropped.
pub fn translate(event: &Event) -> Vec<(PathBuf, EventKind)> {
    let all = |kind: EventKind| -> Vec<(PathBuf, EventKind)> {
        event.paths.iter().map(|p| (p.clone(), kind)).collect()
    };
    match &event.kind {
        NotifyKind::Create(_) => all(EventKind::Created),
        NotifyKind::Remove(_) => all(EventKind::Deleted),
        NotifyKind::Modify(ModifyKind::Name(mode)) => match mode {
            RenameMode::From => all(EventKind::Deleted),
            RenameMode::To => all(EventKind::Moved),
            RenameMode::Both => {
                let mut out = Vec::new();
                if let Some(from) = event.paths.first() {
                    out.push((from.clone(), EventKind::Deleted));
                }
                if let Some(to) = event.paths.get(1) {
                    out.push((to.clone(), EventKind::Moved));
                }
                out
            }
            RenameMode::Any | RenameMode::Other => event
                .paths
                .iter()
                .map(|p| (p.clone(), rename_side(p)))
                .collect(),
        },
        NotifyKind::Modify(_) => all(EventKind::Modified),
        NotifyKind::Access(_) | NotifyKind::Any | NotifyKind::Other => Vec::new(),
    }
}

fn rename_side(path: &Path) -> EventKind {
    if path.exists() {
        EventKind::Moved
    } else {
        EventKind::Deleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, RemoveKind};
    use std::time::Duration;
    use tempfile::TempDir;

    use crate::queue::{event_queue, Pop};

    fn event(kind: NotifyKind, paths: &[&str]) -> Event {
        let mut event = Event::new(kind);
        for p in paths {
            event = event.add_path(PathBuf::from(p));
        }
        event
    }

    #[test]
    fn create_modify_remove_map_directly() {
        assert_eq!(
            translate(&event(NotifyKind::Create(CreateKind::File), &["/a.rs"])),
            vec![(PathBuf::from("/a.rs"), EventKind::Created)]
        );
        assert_eq!(
            translate(&event(
                NotifyKind::Modify(ModifyKind::Data(DataChange::Content)),
                &["/a.rs"]
            )),
            vec![(PathBuf::from("/a.rs"), EventKind::Modified)]
        );
        assert_eq!(
            translate(&event(NotifyKind::Remove(RemoveKind::File), &["/a.rs"])),
            vec![(PathBuf::from("/a.rs"), EventKind::Deleted)]
        );
    }

    #[test]
    fn rename_both_splits_into_deleted_and_moved() {
        let out = translate(&event(
            NotifyKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &["/old.py", "/new.py"],
        ));
        assert_eq!(
            out,
            vec![
                (PathBuf::from("/old.py"), EventKind::Deleted),
                (PathBuf::from("/new.py"), EventKind::Moved)
            ]
        );
    }

    #[test]
    fn access_events_are_ignored() {
        assert!(translate(&event(
            NotifyKind::Access(notify::event::AccessKind::Any),
            &["/a.rs"]
        ))
        .is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn forwarder_hashes_and_filters() {
        let tmp = TempDir::new().expect("tempdir");
        let tracked = tmp.path().join("lib.rs");
        std::fs::write(&tracked, "fn a() {}\n").expect("write");
        let untracked = tmp.path().join("notes.md");

        let (raw_tx, raw_rx) = mpsc::unbounded_channel();
        let (sink, mut rx) = event_queue();
        let filter = SourceFilter::new(["rs"], [".git"]);
        let task = tokio::spawn(forward_events(
            raw_rx,
            vec![tmp.path().to_path_buf()],
            filter,
            Arc::new(Semaphore::new(2)),
            sink,
        ));

        let modify = NotifyKind::Modify(ModifyKind::Data(DataChange::Content));
        raw_tx
            .send(Ok(Event::new(modify).add_path(untracked)))
            .expect("send");
        raw_tx
            .send(Ok(Event::new(modify).add_path(tracked.clone())))
            .expect("send");

        let Pop::Event(received) = rx.pop(Duration::from_secs(5)).await else {
            panic!("expected a forwarded event");
        };
        assert_eq!(received.path, tracked);
        assert_eq!(received.kind, EventKind::Modified);
        assert_eq!(
            received.fingerprint.as_deref(),
            Some(docsync_sync::fingerprint_bytes(b"fn a() {}\n").as_str())
        );

        drop(raw_tx);
        task.await.expect("forwarder exits when the watcher is gone");
        assert_eq!(
            rx.pop(Duration::from_secs(1)).await,
            Pop::Closed,
            "untracked file must never be forwarded"
        );
    }
}
