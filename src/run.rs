//! Pipeline entry points.
//!
//! [`run`] drives the whole batch: unpack, extract, write, render, and
//! finally consume the archive. [`extract_games`] is the pure core of the
//! extraction stage and works on any HTML string.

use crate::config::{PipelineConfig, ValidationMode};
use crate::error::{GameDataError, RecordField, RecordIssue};
use crate::output::{Extraction, GameRecord, RunOutput, RunStats};
use crate::pipeline::extract::{split_window, MarkerWindows, RawFields, WindowError};
use crate::pipeline::{clean, emit, thumbnail, unpack};
use crate::progress::Stage;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Process one exported-document archive end to end.
///
/// # Steps
/// 1. Unpack `archive` into `config.work_dir` (previous contents are removed)
/// 2. Extract records from `config.document_name`
/// 3. Write `config.data_file`
/// 4. Render every file in the image directory into `config.thumbnails_dir`
/// 5. Delete `archive` when `config.consume_archive` is set
///
/// # Errors
/// Any fatal error stops the run at that step. Side effects of earlier steps
/// (the reset working directory, thumbnails already written) stay in place.
/// A strict-mode extraction failure happens before the data file is written.
pub fn run(archive: impl AsRef<Path>, config: &PipelineConfig) -> Result<RunOutput, GameDataError> {
    let total_start = Instant::now();
    let archive = archive.as_ref();
    let progress = config.progress_callback.as_deref();
    info!("Starting run: {}", archive.display());

    // ── Step 1: Unpack ───────────────────────────────────────────────────
    if let Some(cb) = progress {
        cb.on_stage_start(Stage::Unpack);
    }
    let unpack_start = Instant::now();
    let unpacked = unpack::unpack_archive(archive, &config.work_dir)?;
    let unpack_duration_ms = unpack_start.elapsed().as_millis() as u64;

    // ── Step 2: Extract ──────────────────────────────────────────────────
    if let Some(cb) = progress {
        cb.on_stage_start(Stage::Extract);
    }
    let extract_start = Instant::now();
    let extraction = extract_document(&config.document_path(), config)?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;

    // ── Step 3: Write data file ──────────────────────────────────────────
    if let Some(cb) = progress {
        cb.on_stage_start(Stage::Write);
    }
    emit::write_game_data(&config.data_file, &config.data_prefix, &extraction.records)?;

    // ── Step 4: Thumbnails ───────────────────────────────────────────────
    if let Some(cb) = progress {
        cb.on_stage_start(Stage::Thumbnails);
    }
    let thumb_start = Instant::now();
    let thumbnails = thumbnail::render_thumbnails(
        &config.images_dir(),
        &config.thumbnails_dir,
        &config.thumbnail,
        &config.image_extension,
        progress,
    )?;
    let thumbnail_duration_ms = thumb_start.elapsed().as_millis() as u64;

    // ── Step 5: Consume archive ──────────────────────────────────────────
    let archive_removed = if config.consume_archive {
        std::fs::remove_file(archive).map_err(|source| GameDataError::ArchiveRemoveFailed {
            path: archive.to_path_buf(),
            source,
        })?;
        debug!("Removed processed archive {}", archive.display());
        true
    } else {
        false
    };

    let stats = RunStats {
        unpacked_entries: unpacked.files,
        records: extraction.records.len(),
        issues: extraction.issues.len(),
        thumbnails: thumbnails.len(),
        unpack_duration_ms,
        extract_duration_ms,
        thumbnail_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        archive_removed,
    };

    info!(
        "Run complete: {} records, {} issues, {} thumbnails, {}ms total",
        stats.records, stats.issues, stats.thumbnails, stats.total_duration_ms
    );
    if let Some(cb) = progress {
        cb.on_run_complete(&stats);
    }

    Ok(RunOutput {
        records: extraction.records,
        issues: extraction.issues,
        thumbnails,
        stats,
    })
}

/// Read an HTML document from disk and extract its records.
pub fn extract_document(path: &Path, config: &PipelineConfig) -> Result<Extraction, GameDataError> {
    let html = std::fs::read_to_string(path).map_err(|source| {
        debug!("Cannot read {}: {}", path.display(), source);
        match source.kind() {
            std::io::ErrorKind::NotFound => GameDataError::DocumentNotFound {
                path: path.to_path_buf(),
            },
            _ => GameDataError::DocumentUnreadable {
                path: path.to_path_buf(),
                source,
            },
        }
    })?;
    extract_games(&html, config)
}

/// Extract game records from the text of one HTML document.
///
/// Each image marker must be followed by exactly three text segments
/// (title, objective, description). What happens otherwise depends on
/// `config.validation`:
///
/// - [`ValidationMode::Strict`]: the first malformed window aborts with
///   [`GameDataError::MissingField`] or [`GameDataError::UnexpectedExtraText`].
/// - [`ValidationMode::Lenient`]: a window with missing fields is skipped and
///   extra text is ignored; both are recorded as [`RecordIssue`]s.
///
/// Empty fields after cleanup are always reported, never fatal.
pub fn extract_games(html: &str, config: &PipelineConfig) -> Result<Extraction, GameDataError> {
    let progress = config.progress_callback.as_deref();
    let mut out = Extraction::default();

    for window in MarkerWindows::new(html) {
        let fields = match split_window(&window) {
            Ok(fields) => fields,
            Err(WindowError::Missing(field)) => match config.validation {
                ValidationMode::Strict => {
                    return Err(GameDataError::MissingField {
                        image: window.src.to_string(),
                        field,
                    })
                }
                ValidationMode::Lenient => {
                    out.issues.push(RecordIssue::MissingField {
                        image: window.src.to_string(),
                        field,
                    });
                    continue;
                }
            },
            Err(WindowError::Extra { fields, text }) => match config.validation {
                ValidationMode::Strict => {
                    return Err(GameDataError::UnexpectedExtraText {
                        image: window.src.to_string(),
                        text: text.trim().to_string(),
                    })
                }
                ValidationMode::Lenient => {
                    out.issues.push(RecordIssue::UnexpectedExtraText {
                        image: window.src.to_string(),
                        text: text.trim().to_string(),
                    });
                    fields
                }
            },
        };

        let record = build_record(window.src, fields, config);
        if let Some(cb) = progress {
            cb.on_record(out.records.len(), &record);
        }
        debug!("Extracted '{}' ({})", record.title, record.image);
        out.records.push(record);
    }

    out.issues.extend(validate_records(&out.records));

    for issue in &out.issues {
        warn!("{}", issue);
        if let Some(cb) = progress {
            cb.on_issue(issue);
        }
    }

    info!(
        "Extracted {} records ({} issues)",
        out.records.len(),
        out.issues.len()
    );
    Ok(out)
}

/// Report every empty field in `records`.
pub fn validate_records(records: &[GameRecord]) -> Vec<RecordIssue> {
    let mut issues = Vec::new();
    for (index, record) in records.iter().enumerate() {
        for field in RecordField::ORDER {
            if record.field(field).is_empty() {
                issues.push(RecordIssue::EmptyField {
                    index,
                    image: record.image.clone(),
                    field,
                });
            }
        }
    }
    issues
}

fn build_record(src: &str, fields: RawFields<'_>, config: &PipelineConfig) -> GameRecord {
    GameRecord {
        image: config.with_extension(src),
        title: clean::clean_field(fields.title, config.title_rule),
        objective: clean::clean_field(fields.objective, config.objective_rule),
        description: clean::clean_field(fields.description, config.description_rule),
    }
}
