//! Error types for the bitacora-games library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`GameDataError`]: **Fatal**: the run cannot proceed (unreadable
//!   archive, malformed document structure in strict mode, corrupt image).
//!   Returned as `Err(GameDataError)` from [`crate::run`] and friends.
//!
//! * [`RecordIssue`]: **Non-fatal**: a single record has a problem (an empty
//!   field after cleanup, or a malformed window in lenient mode) but the run
//!   continues. Collected into [`crate::output::Extraction::issues`] and
//!   reported through the progress callback.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// One of the three text fields that follow every image marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordField {
    Title,
    Objective,
    Description,
}

impl RecordField {
    /// Fields in the order they appear after an image marker.
    pub const ORDER: [RecordField; 3] = [
        RecordField::Title,
        RecordField::Objective,
        RecordField::Description,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RecordField::Title => "title",
            RecordField::Objective => "objective",
            RecordField::Description => "description",
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All fatal errors returned by the bitacora-games library.
#[derive(Debug, Error)]
pub enum GameDataError {
    // ── Archive errors ────────────────────────────────────────────────────
    /// The archive could not be opened, is corrupt, or an entry failed to extract.
    #[error("Cannot unpack archive '{path}': {detail}")]
    Archive { path: PathBuf, detail: String },

    /// The working directory could not be cleared or recreated.
    #[error("Cannot reset working directory '{path}': {source}")]
    WorkDirReset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The processed archive could not be deleted after a successful run.
    #[error("Failed to remove processed archive '{path}': {source}")]
    ArchiveRemoveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Document errors ───────────────────────────────────────────────────
    /// The extracted archive has no document under the expected name.
    #[error("Document not found: '{path}'\nThe archive must contain the exported HTML at its root.")]
    DocumentNotFound { path: PathBuf },

    /// The document exists but could not be read as UTF-8 text.
    #[error("Cannot read document '{path}': {source}")]
    DocumentUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The extracted archive has no image directory.
    #[error("Image directory not found: '{path}'")]
    ImagesDirNotFound { path: PathBuf },

    /// An image marker is followed by fewer text segments than required.
    #[error("Image '{image}' is missing its {field}")]
    MissingField { image: String, field: RecordField },

    /// An image marker is followed by more text segments than required.
    #[error("Image '{image}' has unexpected extra text: {text:?}")]
    UnexpectedExtraText { image: String, text: String },

    // ── Image errors ──────────────────────────────────────────────────────
    /// A source image could not be decoded, resized, or encoded.
    #[error("Failed to process image '{path}': {detail}")]
    ImageProcessing { path: PathBuf, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A non-fatal problem with a single record.
///
/// The run continues; issues are logged, surfaced through
/// [`crate::progress::PipelineProgressCallback::on_issue`] and returned
/// alongside the records.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RecordIssue {
    /// A field is empty after cleanup.
    #[error("Record {index} ('{image}'): {field} is empty")]
    EmptyField {
        index: usize,
        image: String,
        field: RecordField,
    },

    /// Lenient mode: the image was skipped because a field is missing.
    #[error("Image '{image}' skipped: missing {field}")]
    MissingField { image: String, field: RecordField },

    /// Lenient mode: trailing text after the description was ignored.
    #[error("Image '{image}': ignored extra text {text:?}")]
    UnexpectedExtraText { image: String, text: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_display_names_field() {
        let e = GameDataError::MissingField {
            image: "images/image3.png".into(),
            field: RecordField::Objective,
        };
        let msg = e.to_string();
        assert!(msg.contains("image3.png"), "got: {msg}");
        assert!(msg.contains("objective"), "got: {msg}");
    }

    #[test]
    fn extra_text_display_quotes_text() {
        let e = GameDataError::UnexpectedExtraText {
            image: "images/image1.png".into(),
            text: "Stray note".into(),
        };
        assert!(e.to_string().contains("\"Stray note\""));
    }

    #[test]
    fn empty_field_issue_display() {
        let issue = RecordIssue::EmptyField {
            index: 4,
            image: "images/image5.png.jpg".into(),
            field: RecordField::Description,
        };
        let msg = issue.to_string();
        assert!(msg.contains("Record 4"));
        assert!(msg.contains("description"));
    }

    #[test]
    fn record_field_serialises_lowercase() {
        let json = serde_json::to_string(&RecordField::Title).unwrap();
        assert_eq!(json, "\"title\"");
    }
}
