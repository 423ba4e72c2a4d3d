//! Configuration types for the extraction pipeline.
//!
//! All pipeline behaviour is controlled through [`PipelineConfig`], built via
//! its [`PipelineConfigBuilder`]. Every path, naming convention, text rule and
//! validation policy lives in this one struct; the stages themselves carry no
//! hard-coded constants.

use crate::error::GameDataError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Configuration for one pipeline run.
///
/// Built via [`PipelineConfig::builder()`] or using
/// [`PipelineConfig::default()`].
///
/// # Example
/// ```rust
/// use bitacora_games::{PipelineConfig, ValidationMode};
///
/// let config = PipelineConfig::builder()
///     .work_dir("/tmp/bitacora")
///     .validation(ValidationMode::Lenient)
///     .consume_archive(false)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct PipelineConfig {
    /// Directory the archive is unpacked into. Cleared on every run. Default: `src_doc`.
    pub work_dir: PathBuf,

    /// File name of the HTML document inside the archive. Default: `Bitacora.html`.
    pub document_name: String,

    /// Subdirectory of `work_dir` holding the source images. Default: `images`.
    pub images_subdir: String,

    /// Data file consumed by the front-end. Default: `games.js`.
    pub data_file: PathBuf,

    /// Text written before the JSON array in the data file. Default: `rawGameData=`.
    pub data_prefix: String,

    /// Output directory for rendered thumbnails. Default: `images`.
    pub thumbnails_dir: PathBuf,

    /// Extension appended to image names, both in records and thumbnail
    /// file names. Without the leading dot. Default: `jpg`.
    pub image_extension: String,

    /// Thumbnail canvas and encoding settings.
    pub thumbnail: ThumbnailSpec,

    /// Cleanup applied to the title. Default: unescape, strip trailing periods.
    pub title_rule: TextRule,

    /// Cleanup applied to the objective. Default: no unescape, strip trailing periods.
    pub objective_rule: TextRule,

    /// Cleanup applied to the description. Default: unescape, exactly one trailing period.
    pub description_rule: TextRule,

    /// Whether malformed marker windows abort the run. Default: [`ValidationMode::Strict`].
    pub validation: ValidationMode,

    /// Delete the input archive after a successful run. Default: true.
    pub consume_archive: bool,

    /// Optional per-stage progress callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("src_doc"),
            document_name: "Bitacora.html".to_string(),
            images_subdir: "images".to_string(),
            data_file: PathBuf::from("games.js"),
            data_prefix: "rawGameData=".to_string(),
            thumbnails_dir: PathBuf::from("images"),
            image_extension: "jpg".to_string(),
            thumbnail: ThumbnailSpec::default(),
            title_rule: TextRule::title(),
            objective_rule: TextRule::objective(),
            description_rule: TextRule::description(),
            validation: ValidationMode::default(),
            consume_archive: true,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("work_dir", &self.work_dir)
            .field("document_name", &self.document_name)
            .field("images_subdir", &self.images_subdir)
            .field("data_file", &self.data_file)
            .field("data_prefix", &self.data_prefix)
            .field("thumbnails_dir", &self.thumbnails_dir)
            .field("image_extension", &self.image_extension)
            .field("thumbnail", &self.thumbnail)
            .field("title_rule", &self.title_rule)
            .field("objective_rule", &self.objective_rule)
            .field("description_rule", &self.description_rule)
            .field("validation", &self.validation)
            .field("consume_archive", &self.consume_archive)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn PipelineProgressCallback>"),
            )
            .finish()
    }
}

impl PipelineConfig {
    /// Create a new builder for `PipelineConfig`.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder {
            config: Self::default(),
        }
    }

    /// Path of the HTML document after unpacking.
    pub fn document_path(&self) -> PathBuf {
        self.work_dir.join(&self.document_name)
    }

    /// Path of the source image directory after unpacking.
    pub fn images_dir(&self) -> PathBuf {
        self.work_dir.join(&self.images_subdir)
    }

    /// Append the configured extension to a source name: `images/a.png` → `images/a.png.jpg`.
    pub fn with_extension(&self, name: &str) -> String {
        format!("{}.{}", name, self.image_extension)
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Debug)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.work_dir = dir.into();
        self
    }

    pub fn document_name(mut self, name: impl Into<String>) -> Self {
        self.config.document_name = name.into();
        self
    }

    pub fn images_subdir(mut self, name: impl Into<String>) -> Self {
        self.config.images_subdir = name.into();
        self
    }

    pub fn data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_file = path.into();
        self
    }

    pub fn data_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.data_prefix = prefix.into();
        self
    }

    pub fn thumbnails_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.thumbnails_dir = dir.into();
        self
    }

    pub fn image_extension(mut self, ext: impl Into<String>) -> Self {
        let ext: String = ext.into();
        self.config.image_extension = ext.trim_start_matches('.').to_string();
        self
    }

    pub fn thumbnail(mut self, spec: ThumbnailSpec) -> Self {
        self.config.thumbnail = spec;
        self
    }

    pub fn title_rule(mut self, rule: TextRule) -> Self {
        self.config.title_rule = rule;
        self
    }

    pub fn objective_rule(mut self, rule: TextRule) -> Self {
        self.config.objective_rule = rule;
        self
    }

    pub fn description_rule(mut self, rule: TextRule) -> Self {
        self.config.description_rule = rule;
        self
    }

    pub fn validation(mut self, mode: ValidationMode) -> Self {
        self.config.validation = mode;
        self
    }

    pub fn consume_archive(mut self, v: bool) -> Self {
        self.config.consume_archive = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PipelineConfig, GameDataError> {
        let c = &self.config;
        if c.thumbnail.width == 0 || c.thumbnail.height == 0 {
            return Err(GameDataError::InvalidConfig(format!(
                "Thumbnail size must be at least 1×1, got {}×{}",
                c.thumbnail.width, c.thumbnail.height
            )));
        }
        if !(1..=100).contains(&c.thumbnail.quality) {
            return Err(GameDataError::InvalidConfig(format!(
                "JPEG quality must be 1–100, got {}",
                c.thumbnail.quality
            )));
        }
        if c.document_name.trim().is_empty() {
            return Err(GameDataError::InvalidConfig(
                "Document name must not be empty".into(),
            ));
        }
        if c.image_extension.is_empty() {
            return Err(GameDataError::InvalidConfig(
                "Image extension must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Thumbnail settings ───────────────────────────────────────────────────

/// Fixed canvas every thumbnail is rendered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailSpec {
    /// Canvas width in pixels. Default: 110.
    pub width: u32,
    /// Canvas height in pixels. Default: 120.
    pub height: u32,
    /// JPEG quality, 1–100. Default: 80.
    pub quality: u8,
}

impl Default for ThumbnailSpec {
    fn default() -> Self {
        Self {
            width: 110,
            height: 120,
            quality: 80,
        }
    }
}

// ── Text rules ───────────────────────────────────────────────────────────

/// What to do with periods at the end of a cleaned field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrailingPeriod {
    /// Leave the text as written.
    #[default]
    Keep,
    /// Remove every trailing `.`.
    Strip,
    /// Guarantee exactly one trailing `.`.
    Enforce,
}

/// Cleanup applied to one text field.
///
/// Steps run in this order: entity unescape (optional), trim, capitalise the
/// first character, apply the [`TrailingPeriod`] policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextRule {
    pub unescape_entities: bool,
    pub trailing_period: TrailingPeriod,
}

impl TextRule {
    pub const fn new(unescape_entities: bool, trailing_period: TrailingPeriod) -> Self {
        Self {
            unescape_entities,
            trailing_period,
        }
    }

    /// Default title rule: unescape, no trailing period.
    pub const fn title() -> Self {
        Self::new(true, TrailingPeriod::Strip)
    }

    /// Default objective rule: raw text, no trailing period.
    pub const fn objective() -> Self {
        Self::new(false, TrailingPeriod::Strip)
    }

    /// Default description rule: unescape, exactly one trailing period.
    pub const fn description() -> Self {
        Self::new(true, TrailingPeriod::Enforce)
    }
}

// ── Validation ───────────────────────────────────────────────────────────

/// How structural problems in a marker window are treated.
///
/// | Mode | Missing field | Extra text | Empty field |
/// |------|---------------|------------|-------------|
/// | `Strict` | abort | abort | report |
/// | `Lenient` | skip image, report | ignore text, report | report |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValidationMode {
    /// Abort on the first malformed window. (default)
    #[default]
    Strict,
    /// Record an issue, skip or trim the offending window, and continue.
    Lenient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_export_layout() {
        let c = PipelineConfig::default();
        assert_eq!(c.document_path(), PathBuf::from("src_doc/Bitacora.html"));
        assert_eq!(c.images_dir(), PathBuf::from("src_doc/images"));
        assert_eq!(c.thumbnail, ThumbnailSpec { width: 110, height: 120, quality: 80 });
        assert_eq!(c.validation, ValidationMode::Strict);
        assert!(c.consume_archive);
    }

    #[test]
    fn with_extension_appends() {
        let c = PipelineConfig::default();
        assert_eq!(c.with_extension("images/image1.png"), "images/image1.png.jpg");
    }

    #[test]
    fn builder_strips_leading_dot_from_extension() {
        let c = PipelineConfig::builder().image_extension(".webp").build().unwrap();
        assert_eq!(c.image_extension, "webp");
    }

    #[test]
    fn builder_rejects_zero_size() {
        let err = PipelineConfig::builder()
            .thumbnail(ThumbnailSpec { width: 0, height: 120, quality: 80 })
            .build()
            .unwrap_err();
        assert!(matches!(err, GameDataError::InvalidConfig(_)));
    }

    #[test]
    fn builder_rejects_bad_quality() {
        let err = PipelineConfig::builder()
            .thumbnail(ThumbnailSpec { width: 10, height: 10, quality: 0 })
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("quality"));
    }

    #[test]
    fn debug_hides_callback() {
        let s = format!("{:?}", PipelineConfig::default());
        assert!(s.contains("progress_callback: None"));
    }
}
