//! # docsync-sync
//!
//! Semantic change detection and documentation synchronization.
//!
//! Feed [`ChangeEvent`](docsync_core::ChangeEvent)s to a [`Pipeline`]; it
//! diffs each file's symbols against the [`SignatureCache`], applies the
//! resulting changes through the [`UpdateManager`], and records them in the
//! bounded [`ChangeLog`].

pub mod activity;
pub mod cache;
pub mod change_log;
pub mod diff;
pub mod error;
pub mod export;
pub mod fingerprint;
pub mod manager;
pub mod pipeline;
pub mod store;

pub use activity::{ActivitySummary, FileActivity, PipelineCounts};
pub use cache::{FileSignatures, SignatureCache};
pub use change_log::{content_diff, window_start, ChangeLog, LogQuery};
pub use error::SyncError;
pub use export::{ExportedEntry, EXPORT_SCHEMA_VERSION};
pub use fingerprint::{fingerprint_bytes, fingerprint_file};
pub use manager::{ApplySummary, UpdateManager};
pub use pipeline::Pipeline;
pub use store::{DocumentationStore, RollbackStore};
