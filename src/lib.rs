//! # bitacora-games
//!
//! Turn an exported game log (an HTML document plus its images, zipped)
//! into the two artefacts the card-matching front-end loads: a `games.js`
//! data file and a folder of uniformly sized JPEG thumbnails.
//!
//! ## Pipeline Overview
//!
//! ```text
//! archive.zip
//!  │
//!  ├─ 1. Unpack     reset src_doc/ and extract the archive
//!  ├─ 2. Extract    image marker → title, objective, description
//!  ├─ 3. Clean      unescape, trim, capitalise, trailing period
//!  ├─ 4. Write      rawGameData=[…]  (atomic)
//!  ├─ 5. Render     crop to 110×120, flatten on white, JPEG q80
//!  └─ 6. Consume    delete the processed archive
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bitacora_games::{run, PipelineConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::default();
//!     let output = run("Bitacora.zip", &config)?;
//!     println!("{} games, {} thumbnails", output.records.len(), output.thumbnails.len());
//!     for issue in &output.issues {
//!         eprintln!("warning: {issue}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Extraction alone works on any string:
//!
//! ```rust
//! use bitacora_games::{extract_games, PipelineConfig};
//!
//! let html = r#"<img src="images/image1.png">
//!     <span class="c2">tag</span><span class="c2">catch everyone.</span>
//!     <span class="c2">one player chases the rest</span>"#;
//! let out = extract_games(html, &PipelineConfig::default()).unwrap();
//! assert_eq!(out.records[0].title, "Tag");
//! assert_eq!(out.records[0].objective, "Catch everyone");
//! assert_eq!(out.records[0].description, "One player chases the rest.");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `extractgames` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod run;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    PipelineConfig, PipelineConfigBuilder, TextRule, ThumbnailSpec, TrailingPeriod, ValidationMode,
};
pub use error::{GameDataError, RecordField, RecordIssue};
pub use output::{Extraction, GameRecord, RunOutput, RunStats};
pub use progress::{NoopProgressCallback, PipelineProgressCallback, ProgressCallback, Stage};
pub use run::{extract_document, extract_games, run, validate_records};
