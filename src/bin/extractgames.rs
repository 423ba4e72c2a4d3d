//! CLI binary for bitacora-games.
//!
//! A thin shim over the library crate: takes the archive path, runs the
//! pipeline with the default configuration, and prints progress to stdout.

use anyhow::{Context, Result};
use bitacora_games::{
    run, GameRecord, PipelineConfig, PipelineProgressCallback, ProgressCallback, RecordIssue,
    RunStats, Stage,
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback ────────────────────────────────────────────────────

/// Prints one block per extracted game and drives a progress bar while
/// thumbnails render. Everything goes to stdout; logs go to stderr.
struct CliProgressCallback {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            bar: Mutex::new(None),
        })
    }

    fn println(&self, line: String) {
        match self.bar.lock().ok().and_then(|b| b.clone()) {
            Some(bar) => bar.println(line),
            None => println!("{line}"),
        }
    }
}

impl PipelineProgressCallback for CliProgressCallback {
    fn on_stage_start(&self, stage: Stage) {
        self.println(format!("{} {}", cyan("◆"), bold(&format!("{stage}…"))));
    }

    fn on_record(&self, _index: usize, record: &GameRecord) {
        self.println(format!(
            "  {} {}\n      {} {}\n      {} {}\n      {} {}",
            green("✓"),
            bold(&record.title),
            dim("image:      "),
            record.image,
            dim("objective:  "),
            record.objective,
            dim("description:"),
            record.description,
        ));
    }

    fn on_issue(&self, issue: &RecordIssue) {
        self.println(format!("  {} {}", yellow("⚠"), issue));
    }

    fn on_thumbnails_start(&self, total: usize) {
        let bar = ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::stdout());
        let style = ProgressStyle::with_template(
            "  {spinner:.cyan} [{bar:42.green/238}] {pos:>3}/{len} images  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");
        bar.set_style(style);
        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(bar);
        }
    }

    fn on_thumbnail(&self, _done: usize, _total: usize, output: &Path) {
        if let Some(bar) = self.bar.lock().ok().and_then(|b| b.clone()) {
            let name = output
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            bar.set_message(name);
            bar.inc(1);
        }
    }

    fn on_run_complete(&self, stats: &RunStats) {
        if let Some(bar) = self.bar.lock().ok().and_then(|mut b| b.take()) {
            bar.finish_and_clear();
        }
        println!(
            "{} {} games, {} thumbnails{}  {}",
            green("✔"),
            bold(&stats.records.to_string()),
            bold(&stats.thumbnails.to_string()),
            if stats.issues > 0 {
                format!("  ({} warnings)", yellow(&stats.issues.to_string()))
            } else {
                String::new()
            },
            dim(&format!("{}ms", stats.total_duration_ms)),
        );
    }
}

const AFTER_HELP: &str = r#"INPUT:
  A zip archive of the exported document. It must contain Bitacora.html at
  its root and an images/ directory with every image the document references.

OUTPUT (relative to the current directory):
  src_doc/    the unpacked archive (replaced on every run)
  games.js    rawGameData=[{"image","title","objective","description"}, …]
  images/     one 110×120 JPEG per source image, named <source>.jpg

The archive is deleted after a successful run.

ENVIRONMENT VARIABLES:
  RUST_LOG    Log filter for stderr diagnostics (default: warn)
"#;

/// Extract game cards and thumbnails from an exported document archive.
#[derive(Parser, Debug)]
#[command(
    name = "extractgames",
    version,
    about = "Extract game cards and thumbnails from an exported document archive",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the zip archive to process.
    archive: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let progress: ProgressCallback = CliProgressCallback::new();
    let config = PipelineConfig::builder()
        .progress_callback(progress)
        .build()
        .context("Invalid configuration")?;

    run(&cli.archive, &config)
        .with_context(|| format!("Failed to process '{}'", cli.archive.display()))?;

    Ok(())
}
