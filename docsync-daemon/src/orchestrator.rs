//! Synchronization orchestrator: owns the lifecycle of the change source,
//! the event queue and the dispatcher, and serves read-only views.
//!
//! While running, every view is a control request answered by the
//! dispatcher. After `stop`, views read the final pipeline directly.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Duration as ChronoDuration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use docsync_core::{
    ChangeEvent, ChangeLogEntry, DocKey, DocumentationGenerator, DocumentationRecord, EventKind,
    SymbolProvider, SyncConfig,
};
use docsync_sync::{fingerprint_file, ActivitySummary, LogQuery, Pipeline};

use crate::dispatcher::{run_dispatcher, Control};
use crate::error::{io_err, DaemonError};
use crate::queue::{event_queue, EventSink};
use crate::source::{scan_tracked, select_source, ChangeSource, SourceFilter};
use crate::status::{PipelineView, StatusSnapshot};

const CONTROL_CAPACITY: usize = 64;

struct Running {
    /// Sources are only `Send`; the mutex lets views borrow `Running` across
    /// await points.
    source: Mutex<Box<dyn ChangeSource>>,
    backend: &'static str,
    paths: Vec<PathBuf>,
    sink: EventSink,
    control: mpsc::Sender<Control>,
    stop: watch::Sender<bool>,
    dispatcher: JoinHandle<Pipeline>,
    initial_scan: Option<JoinHandle<()>>,
}

pub struct Orchestrator {
    config: SyncConfig,
    provider: Arc<dyn SymbolProvider>,
    generator: Arc<dyn DocumentationGenerator>,
    running: Option<Running>,
    /// Final pipeline of the last run, kept for post-stop views.
    last: Option<Pipeline>,
}

impl Orchestrator {
    pub fn new(
        config: SyncConfig,
        provider: Arc<dyn SymbolProvider>,
        generator: Arc<dyn DocumentationGenerator>,
    ) -> Self {
        Self {
            config,
            provider,
            generator,
            running: None,
            last: None,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Start watching `paths` with a fresh pipeline.
    ///
    /// Fails only if a path cannot be resolved or no change source starts.
    pub fn start(&mut self, paths: &[PathBuf]) -> Result<(), DaemonError> {
        if self.running.is_some() {
            return Err(DaemonError::AlreadyRunning);
        }
        let roots = paths
            .iter()
            .map(|p| std::fs::canonicalize(p).map_err(|e| io_err(p, e)))
            .collect::<Result<Vec<_>, _>>()?;

        let (sink, events) = event_queue();
        let source = select_source(&self.config, &roots, sink.clone())?;

        let pipeline = Pipeline::new(self.provider.clone(), self.generator.clone(), &self.config);
        let (control_tx, control_rx) = mpsc::channel(CONTROL_CAPACITY);
        let (stop_tx, stop_rx) = watch::channel(false);
        let dispatcher = tokio::spawn(run_dispatcher(
            pipeline,
            events,
            control_rx,
            stop_rx,
            self.config.dispatch_wait(),
        ));

        let initial_scan = self.config.initial_scan.then(|| {
            tokio::spawn(enqueue_initial_scan(
                roots.clone(),
                SourceFilter::from_config(&self.config),
                sink.clone(),
            ))
        });

        tracing::info!(
            backend = source.name(),
            paths = roots.len(),
            level = %self.config.documentation_level,
            "synchronization started"
        );
        self.running = Some(Running {
            backend: source.name(),
            source: Mutex::new(source),
            paths: roots,
            sink,
            control: control_tx,
            stop: stop_tx,
            dispatcher,
            initial_scan,
        });
        Ok(())
    }

    /// Stop the source, let the dispatcher finish its current item, and keep
    /// the final pipeline. Idempotent.
    pub async fn stop(&mut self) -> Result<(), DaemonError> {
        let Some(mut running) = self.running.take() else {
            return Ok(());
        };
        running
            .source
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .stop();
        if let Some(scan) = running.initial_scan.take() {
            scan.abort();
        }
        let _ = running.stop.send(true);
        let pipeline = running
            .dispatcher
            .await
            .map_err(|err| DaemonError::Protocol(format!("dispatcher join failure: {err}")))?;
        tracing::info!(
            logged_changes = pipeline.logged_changes(),
            "synchronization stopped"
        );
        self.last = Some(pipeline);
        Ok(())
    }

    /// Push an event directly into the running queue.
    pub fn enqueue(&self, event: ChangeEvent) -> Result<(), DaemonError> {
        match &self.running {
            Some(running) => running.sink.push(event),
            None => Err(DaemonError::ChannelClosed("event queue")),
        }
    }

    pub async fn status(&self) -> Result<StatusSnapshot, DaemonError> {
        let Some(running) = &self.running else {
            return Ok(StatusSnapshot {
                pipeline: self.last.as_ref().map(PipelineView::of),
                ..StatusSnapshot::idle()
            });
        };
        let view = self
            .request(running, |respond_to| Control::Status { respond_to })
            .await?;
        Ok(StatusSnapshot {
            running: true,
            backend: Some(running.backend.to_string()),
            watched_paths: running.paths.clone(),
            queue_depth: running.sink.depth(),
            pipeline: Some(view),
        })
    }

    pub async fn activity(&self, window: ChronoDuration) -> Result<ActivitySummary, DaemonError> {
        match (&self.running, &self.last) {
            (Some(running), _) => {
                self.request(running, |respond_to| Control::Activity { window, respond_to })
                    .await
            }
            (None, Some(pipeline)) => Ok(pipeline.activity(window)),
            (None, None) => Err(not_started()),
        }
    }

    pub async fn history(&self, query: LogQuery) -> Result<Vec<ChangeLogEntry>, DaemonError> {
        match (&self.running, &self.last) {
            (Some(running), _) => {
                self.request(running, |respond_to| Control::History { query, respond_to })
                    .await
            }
            (None, Some(pipeline)) => Ok(pipeline.history(&query)),
            (None, None) => Err(not_started()),
        }
    }

    pub async fn rollback(&mut self, key: DocKey) -> Result<DocumentationRecord, DaemonError> {
        if let Some(running) = &self.running {
            return self
                .request(running, |respond_to| Control::Rollback { key, respond_to })
                .await?
                .map_err(DaemonError::from);
        }
        match &mut self.last {
            Some(pipeline) => Ok(pipeline.rollback(&key)?),
            None => Err(not_started()),
        }
    }

    pub async fn export(&self, path: &Path) -> Result<usize, DaemonError> {
        let path = path.to_path_buf();
        match (&self.running, &self.last) {
            (Some(running), _) => self
                .request(running, |respond_to| Control::Export { path, respond_to })
                .await?
                .map_err(DaemonError::from),
            (None, Some(pipeline)) => Ok(pipeline.export(&path)?),
            (None, None) => Err(not_started()),
        }
    }

    async fn request<T>(
        &self,
        running: &Running,
        build: impl FnOnce(oneshot::Sender<T>) -> Control,
    ) -> Result<T, DaemonError> {
        let (tx, rx) = oneshot::channel();
        running
            .control
            .send(build(tx))
            .await
            .map_err(|_| DaemonError::ChannelClosed("dispatcher control"))?;
        rx.await
            .map_err(|_| DaemonError::ChannelClosed("dispatcher response"))
    }
}

fn not_started() -> DaemonError {
    DaemonError::Protocol("synchronization has not been started".to_string())
}

async fn enqueue_initial_scan(roots: Vec<PathBuf>, filter: SourceFilter, sink: EventSink) {
    let scanned = tokio::task::spawn_blocking(move || {
        let files = scan_tracked(&roots, &filter)?;
        Ok::<_, DaemonError>(
            files
                .into_iter()
                .filter_map(|path| {
                    let fingerprint = fingerprint_file(&path).ok()?;
                    Some(ChangeEvent::new(path, EventKind::Created).with_fingerprint(fingerprint))
                })
                .collect::<Vec<_>>(),
        )
    })
    .await;

    let events = match scanned {
        Ok(Ok(events)) => events,
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "initial scan failed");
            return;
        }
        Err(err) => {
            tracing::warn!(error = %err, "initial scan join failure");
            return;
        }
    };
    tracing::info!(files = events.len(), "initial scan enqueued");
    for event in events {
        if sink.push(event).is_err() {
            return;
        }
    }
}
