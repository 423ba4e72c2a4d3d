//! Result types produced by the pipeline.

use crate::error::{RecordField, RecordIssue};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One game card, as consumed by the front-end.
///
/// Field order is part of the data-file format: `image`, `title`,
/// `objective`, `description`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Thumbnail file name: the document's image source plus the configured extension.
    pub image: String,
    pub title: String,
    pub objective: String,
    pub description: String,
}

impl GameRecord {
    /// The cleaned text of one field.
    pub fn field(&self, field: RecordField) -> &str {
        match field {
            RecordField::Title => &self.title,
            RecordField::Objective => &self.objective,
            RecordField::Description => &self.description,
        }
    }
}

/// Records extracted from one document, plus everything worth reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    /// Records in document order.
    pub records: Vec<GameRecord>,
    /// Non-fatal problems, in the order they were found.
    pub issues: Vec<RecordIssue>,
}

/// Everything a successful run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutput {
    pub records: Vec<GameRecord>,
    pub issues: Vec<RecordIssue>,
    /// Thumbnail paths, in the order they were rendered.
    pub thumbnails: Vec<PathBuf>,
    pub stats: RunStats,
}

/// Counters and timings for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Files written into the working directory.
    pub unpacked_entries: usize,
    pub records: usize,
    pub issues: usize,
    pub thumbnails: usize,
    pub unpack_duration_ms: u64,
    pub extract_duration_ms: u64,
    pub thumbnail_duration_ms: u64,
    pub total_duration_ms: u64,
    /// Whether the input archive was deleted at the end of the run.
    pub archive_removed: bool,
}
