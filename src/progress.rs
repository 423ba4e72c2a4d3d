//! Progress-callback trait for per-stage pipeline events.
//!
//! Inject an [`Arc<dyn PipelineProgressCallback>`] via
//! [`crate::config::PipelineConfigBuilder::progress_callback`] to receive
//! events as the pipeline unpacks, extracts and renders. The library itself
//! never prints; the CLI turns these events into stdout messages and a
//! progress bar.
//!
//! # Example
//!
//! ```rust
//! use bitacora_games::{GameRecord, PipelineConfig, PipelineProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     records: AtomicUsize,
//! }
//!
//! impl PipelineProgressCallback for CountingCallback {
//!     fn on_record(&self, index: usize, record: &GameRecord) {
//!         self.records.fetch_add(1, Ordering::SeqCst);
//!         println!("#{index}: {}", record.title);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { records: AtomicUsize::new(0) });
//!
//! let config = PipelineConfig::builder()
//!     .progress_callback(counter as Arc<dyn PipelineProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::error::RecordIssue;
use crate::output::{GameRecord, RunStats};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// The pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Unpack,
    Extract,
    Write,
    Thumbnails,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Unpack => "Unpacking archive",
            Stage::Extract => "Extracting games",
            Stage::Write => "Writing game data",
            Stage::Thumbnails => "Rendering thumbnails",
        })
    }
}

/// Called by the pipeline as it runs.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. The pipeline is single-threaded; `Send + Sync` is
/// required only so configs can be shared across threads by callers.
pub trait PipelineProgressCallback: Send + Sync {
    /// Called when a stage begins.
    fn on_stage_start(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called for each record extracted, in document order.
    ///
    /// # Arguments
    /// * `index`: 0-indexed position in the output array
    /// * `record`: the cleaned record
    fn on_record(&self, index: usize, record: &GameRecord) {
        let _ = (index, record);
    }

    /// Called for every non-fatal problem found during extraction or validation.
    fn on_issue(&self, issue: &RecordIssue) {
        let _ = issue;
    }

    /// Called once the number of source images is known.
    fn on_thumbnails_start(&self, total: usize) {
        let _ = total;
    }

    /// Called after each thumbnail is written.
    ///
    /// # Arguments
    /// * `done`: thumbnails written so far, including this one
    /// * `total`: thumbnails to render
    /// * `output`: path of the file just written
    fn on_thumbnail(&self, done: usize, total: usize, output: &Path) {
        let _ = (done, total, output);
    }

    /// Called once after every stage succeeded.
    fn on_run_complete(&self, stats: &RunStats) {
        let _ = stats;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl PipelineProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::PipelineConfig`].
pub type ProgressCallback = Arc<dyn PipelineProgressCallback>;
