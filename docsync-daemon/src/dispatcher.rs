//! The dispatcher task: sole owner of the [`Pipeline`] while running.
//!
//! Events are processed one at a time, in queue order. Control requests are
//! answered between events. The stop flag is checked between items; an
//! in-flight event always completes first.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Duration as ChronoDuration;
use tokio::sync::{mpsc, oneshot, watch};

use docsync_core::{ChangeLogEntry, DocKey, DocumentationRecord};
use docsync_sync::{ActivitySummary, LogQuery, Pipeline, SyncError};

use crate::queue::{EventReceiver, Pop};
use crate::status::PipelineView;

/// A request answered by the dispatcher between events.
pub enum Control {
    Status {
        respond_to: oneshot::Sender<PipelineView>,
    },
    Activity {
        window: ChronoDuration,
        respond_to: oneshot::Sender<ActivitySummary>,
    },
    History {
        query: LogQuery,
        respond_to: oneshot::Sender<Vec<ChangeLogEntry>>,
    },
    Rollback {
        key: DocKey,
        respond_to: oneshot::Sender<Result<DocumentationRecord, SyncError>>,
    },
    Export {
        path: PathBuf,
        respond_to: oneshot::Sender<Result<usize, SyncError>>,
    },
}

/// Answer `request` against `pipeline`.
pub fn answer(pipeline: &mut Pipeline, request: Control) {
    match request {
        Control::Status { respond_to } => {
            let _ = respond_to.send(PipelineView::of(pipeline));
        }
        Control::Activity { window, respond_to } => {
            let _ = respond_to.send(pipeline.activity(window));
        }
        Control::History { query, respond_to } => {
            let _ = respond_to.send(pipeline.history(&query));
        }
        Control::Rollback { key, respond_to } => {
            let _ = respond_to.send(pipeline.rollback(&key));
        }
        Control::Export { path, respond_to } => {
            let _ = respond_to.send(pipeline.export(&path));
        }
    }
}

/// Drive `pipeline` until `stop` flips to `true` or its sender is dropped.
/// Returns the pipeline so its final state outlives the task.
pub async fn run_dispatcher(
    mut pipeline: Pipeline,
    mut events: EventReceiver,
    mut control: mpsc::Receiver<Control>,
    mut stop: watch::Receiver<bool>,
    wait: Duration,
) -> Pipeline {
    let mut events_open = true;
    let mut control_open = true;

    loop {
        if *stop.borrow() {
            break;
        }
        tokio::select! {
            biased;
            changed = stop.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            request = control.recv(), if control_open => match request {
                Some(request) => answer(&mut pipeline, request),
                None => control_open = false,
            },
            popped = events.pop(wait), if events_open => match popped {
                Pop::Event(event) => {
                    tracing::debug!(path = %event.path.display(), kind = %event.kind, "dispatching event");
                    pipeline.handle(&event).await;
                }
                Pop::Timeout => {}
                Pop::Closed => {
                    tracing::debug!("event queue closed");
                    events_open = false;
                }
            },
            else => break,
        }
    }

    tracing::info!(
        remaining = events.depth(),
        "dispatcher stopped"
    );
    pipeline
}
