//! docsync daemon: change sources, event queue, dispatcher, orchestrator and
//! the Unix-socket control protocol.

pub mod dispatcher;
mod error;
pub mod orchestrator;
pub mod paths;
pub mod protocol;
pub mod queue;
mod runtime;
pub mod source;
pub mod status;

pub use error::DaemonError;
pub use orchestrator::Orchestrator;
pub use protocol::{
    request_activity, request_export, request_history, request_rollback, request_status,
    request_stop, send_request, DaemonRequest, DaemonResponse,
};
pub use queue::{event_queue, EventReceiver, EventSink, Pop};
pub use runtime::{handle_request, run, start_blocking, SharedOrchestrator};
pub use source::{select_source, ChangeSource, NotifySource, PollSource, SourceFilter};
pub use status::{PipelineView, StatusSnapshot};
