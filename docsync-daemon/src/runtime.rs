use std::fs;
use std::io::ErrorKind;
use std::os::unix::net::UnixStream as StdUnixStream;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::TimeDelta;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::unix::OwnedWriteHalf;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{broadcast, Mutex};

use docsync_core::{DocKey, DocumentationGenerator, SymbolProvider, SyncConfig};
use docsync_sync::LogQuery;

use crate::error::{io_err, DaemonError};
use crate::orchestrator::Orchestrator;
use crate::paths::{default_export_path, docsync_root, socket_path};
use crate::protocol::{DaemonRequest, DaemonResponse};

/// Default trailing window for `activity` requests.
const DEFAULT_ACTIVITY_WINDOW_SECS: u64 = 3600;

pub type SharedOrchestrator = Arc<Mutex<Orchestrator>>;

/// Start the daemon runtime and block the current thread until it exits.
pub fn start_blocking(
    home: &Path,
    paths: Vec<PathBuf>,
    config: SyncConfig,
    provider: Arc<dyn SymbolProvider>,
    generator: Arc<dyn DocumentationGenerator>,
) -> Result<(), DaemonError> {
    init_tracing();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| io_err("tokio-runtime", e))?;
    runtime.block_on(run(home.to_path_buf(), paths, config, provider, generator))
}

/// Run the daemon: start synchronization over `paths`, serve the control
/// socket, and stop cleanly on `stop` or ctrl-c.
pub async fn run(
    home: PathBuf,
    paths: Vec<PathBuf>,
    config: SyncConfig,
    provider: Arc<dyn SymbolProvider>,
    generator: Arc<dyn DocumentationGenerator>,
) -> Result<(), DaemonError> {
    ensure_runtime_dirs(&home)?;

    let mut orchestrator = Orchestrator::new(config, provider, generator);
    orchestrator.start(&paths)?;
    let orchestrator: SharedOrchestrator = Arc::new(Mutex::new(orchestrator));

    let (shutdown_tx, _) = broadcast::channel::<()>(16);

    let socket_handle = {
        let shutdown = shutdown_tx.clone();
        let home = home.clone();
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move {
            let result =
                socket_server_task(home, orchestrator, shutdown.clone(), shutdown.subscribe())
                    .await;
            let _ = shutdown.send(());
            result
        })
    };

    let signal_handle = {
        let shutdown = shutdown_tx.clone();
        tokio::spawn(async move {
            let mut shutdown_rx = shutdown.subscribe();
            tokio::select! {
                _ = shutdown_rx.recv() => Ok(()),
                signal = tokio::signal::ctrl_c() => {
                    match signal {
                        Ok(()) => {
                            tracing::info!("received ctrl-c, shutting down daemon");
                            let _ = shutdown.send(());
                            Ok(())
                        }
                        Err(err) => Err(DaemonError::Protocol(format!("ctrl-c handler failed: {err}"))),
                    }
                }
            }
        })
    };

    let (socket_result, signal_result) = tokio::join!(socket_handle, signal_handle);

    let stopped = orchestrator.lock().await.stop().await;
    handle_join("socket_server", socket_result)?;
    handle_join("signal_handler", signal_result)?;
    stopped
}

async fn socket_server_task(
    home: PathBuf,
    orchestrator: SharedOrchestrator,
    shutdown_tx: broadcast::Sender<()>,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), DaemonError> {
    let socket = socket_path(&home);
    prepare_socket_for_bind(&socket)?;

    let listener = UnixListener::bind(&socket).map_err(|e| io_err(&socket, e))?;
    set_socket_permissions(&socket)?;
    tracing::info!(socket = %socket.display(), "control socket listening");

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            accepted = listener.accept() => {
                let (stream, _) = accepted.map_err(|e| io_err(&socket, e))?;
                let home = home.clone();
                let orchestrator = orchestrator.clone();
                let shutdown_tx = shutdown_tx.clone();
                tokio::spawn(async move {
                    if let Err(err) = handle_socket_client(stream, home, orchestrator, shutdown_tx).await {
                        tracing::error!(error = %err, "socket client error");
                    }
                });
            }
        }
    }

    if socket.exists() {
        let _ = fs::remove_file(&socket);
    }
    Ok(())
}

async fn handle_socket_client(
    stream: UnixStream,
    home: PathBuf,
    orchestrator: SharedOrchestrator,
    shutdown_tx: broadcast::Sender<()>,
) -> Result<(), DaemonError> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| io_err("daemon socket read", e))?
    {
        if line.trim().is_empty() {
            continue;
        }

        let request = match serde_json::from_str::<DaemonRequest>(&line) {
            Ok(request) => request,
            Err(err) => {
                write_response(
                    &mut writer,
                    &DaemonResponse::error(format!("invalid request: {err}")),
                )
                .await?;
                continue;
            }
        };

        let is_stop = request == DaemonRequest::Stop;
        let response = handle_request(&home, &orchestrator, &shutdown_tx, request).await;
        write_response(&mut writer, &response).await?;
        if is_stop {
            break;
        }
    }

    Ok(())
}

/// Answer one decoded request. Failures become error responses.
pub async fn handle_request(
    home: &Path,
    orchestrator: &SharedOrchestrator,
    shutdown_tx: &broadcast::Sender<()>,
    request: DaemonRequest,
) -> DaemonResponse {
    tracing::debug!(cmd = request.name(), "handling control request");
    let result = match request {
        DaemonRequest::Status => to_data(orchestrator.lock().await.status().await),
        DaemonRequest::Activity { window_secs } => {
            let window = seconds(window_secs.unwrap_or(DEFAULT_ACTIVITY_WINDOW_SECS));
            to_data(orchestrator.lock().await.activity(window).await)
        }
        DaemonRequest::History {
            symbol,
            file,
            since_secs,
            limit,
        } => {
            let mut query = LogQuery::all();
            if let Some(symbol) = symbol {
                query = query.for_symbol(symbol);
            }
            if let Some(file) = file {
                query = query.for_file(file);
            }
            if let Some(secs) = since_secs {
                query = query.within(seconds(secs));
            }
            if let Some(limit) = limit {
                query = query.limit(limit);
            }
            to_data(orchestrator.lock().await.history(query).await)
        }
        DaemonRequest::Rollback { file, symbol } => {
            let key = DocKey::new(file, symbol);
            to_data(orchestrator.lock().await.rollback(key).await)
        }
        DaemonRequest::Export { path } => {
            let path = path.unwrap_or_else(|| default_export_path(home));
            orchestrator
                .lock()
                .await
                .export(&path)
                .await
                .map(|entries| json!({ "path": path, "entries": entries }))
        }
        DaemonRequest::Stop => {
            let _ = shutdown_tx.send(());
            Ok(json!({ "stopping": true }))
        }
    };

    match result {
        Ok(data) => DaemonResponse::ok(data),
        Err(err) => DaemonResponse::error(err.to_string()),
    }
}

fn to_data<T: Serialize>(result: Result<T, DaemonError>) -> Result<Value, DaemonError> {
    Ok(serde_json::to_value(result?)?)
}

/// Client-supplied window; anything past the representable range saturates.
fn seconds(secs: u64) -> TimeDelta {
    i64::try_from(secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .unwrap_or(TimeDelta::MAX)
}

fn ensure_runtime_dirs(home: &Path) -> Result<(), DaemonError> {
    let root = docsync_root(home);
    if !root.exists() {
        fs::create_dir_all(&root).map_err(|e| io_err(&root, e))?;
    }
    Ok(())
}

async fn write_response(
    writer: &mut OwnedWriteHalf,
    response: &DaemonResponse,
) -> Result<(), DaemonError> {
    let payload = serde_json::to_string(response)?;
    writer
        .write_all(payload.as_bytes())
        .await
        .map_err(|e| io_err("daemon socket write", e))?;
    writer
        .write_all(b"\n")
        .await
        .map_err(|e| io_err("daemon socket write", e))?;
    writer
        .flush()
        .await
        .map_err(|e| io_err("daemon socket flush", e))?;
    Ok(())
}

fn handle_join(
    task: &str,
    result: Result<Result<(), DaemonError>, tokio::task::JoinError>,
) -> Result<(), DaemonError> {
    match result {
        Ok(inner) => inner,
        Err(err) => Err(DaemonError::Protocol(format!(
            "{task} task join failure: {err}"
        ))),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

#[cfg(unix)]
fn set_socket_permissions(path: &Path) -> Result<(), DaemonError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(|e| io_err(path, e))
}

#[cfg(not(unix))]
fn set_socket_permissions(_path: &Path) -> Result<(), DaemonError> {
    Ok(())
}

fn prepare_socket_for_bind(socket: &Path) -> Result<(), DaemonError> {
    if !socket.exists() {
        return Ok(());
    }

    match StdUnixStream::connect(socket) {
        Ok(_) => {
            return Err(DaemonError::Protocol(format!(
                "daemon socket already in use: {}",
                socket.display()
            )));
        }
        Err(err) => {
            tracing::warn!(
                socket = %socket.display(),
                error = %err,
                "removing stale daemon socket before bind",
            );
        }
    }

    match fs::remove_file(socket) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(io_err(socket, err)),
    }
}
