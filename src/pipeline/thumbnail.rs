//! Thumbnail rendering: crop, resize and flatten every source image to a fixed canvas.
//!
//! Every thumbnail has exactly the configured `width × height`, whatever the
//! source aspect ratio. The source is scaled so it *covers* the canvas, the
//! overflow on the long side is cropped away symmetrically, and transparent
//! pixels are flattened onto white before JPEG encoding (JPEG has no alpha).

use crate::config::ThumbnailSpec;
use crate::error::GameDataError;
use crate::progress::PipelineProgressCallback;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageReader, Rgba, RgbaImage};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Region of the source image that ends up on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Compute the centred crop that fills a `dst_w × dst_h` canvas from a
/// `src_w × src_h` source.
///
/// `scale = max(dst_w / src_w, dst_h / src_h)`; the box is
/// `round(dst / scale)` on each axis, clamped to the source. The result is
/// always inside the source and at least 1×1. Zero dimensions on either
/// side are treated as 1.
pub fn crop_box(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> CropBox {
    let src_w = src_w.max(1);
    let src_h = src_h.max(1);
    let dst_w = dst_w.max(1);
    let dst_h = dst_h.max(1);
    let scale = f64::max(
        f64::from(dst_w) / f64::from(src_w),
        f64::from(dst_h) / f64::from(src_h),
    );

    let width = ((f64::from(dst_w) / scale).round() as u32).clamp(1, src_w);
    let height = ((f64::from(dst_h) / scale).round() as u32).clamp(1, src_h);

    CropBox {
        x: (src_w - width) / 2,
        y: (src_h - height) / 2,
        width,
        height,
    }
}

/// Render one decoded image onto the thumbnail canvas.
///
/// The result is fully opaque RGB of exactly `spec.width × spec.height`.
pub fn render_thumbnail(img: &DynamicImage, spec: &ThumbnailSpec) -> image::RgbImage {
    let rgba = img.to_rgba8();
    let b = crop_box(rgba.width(), rgba.height(), spec.width, spec.height);
    let cropped = imageops::crop_imm(&rgba, b.x, b.y, b.width, b.height).to_image();
    let resized = imageops::resize(&cropped, spec.width, spec.height, FilterType::CatmullRom);

    let mut canvas = RgbaImage::from_pixel(spec.width, spec.height, Rgba([255, 255, 255, 255]));
    imageops::overlay(&mut canvas, &resized, 0, 0);

    DynamicImage::ImageRgba8(canvas).to_rgb8()
}

/// Output file name for a source file: `image1.png` → `image1.png.jpg`.
pub fn thumbnail_name(source: &Path, extension: &str) -> Option<String> {
    let name = source.file_name()?.to_string_lossy();
    Some(format!("{name}.{extension}"))
}

/// Render every regular file in `src_dir` into `out_dir`.
///
/// Files are processed in name order. The first unreadable or corrupt file
/// aborts the stage; thumbnails already written are left in place.
///
/// # Returns
/// The written paths, in processing order.
pub fn render_thumbnails(
    src_dir: &Path,
    out_dir: &Path,
    spec: &ThumbnailSpec,
    extension: &str,
    progress: Option<&dyn PipelineProgressCallback>,
) -> Result<Vec<PathBuf>, GameDataError> {
    if !src_dir.is_dir() {
        return Err(GameDataError::ImagesDirNotFound {
            path: src_dir.to_path_buf(),
        });
    }

    let sources = list_sources(src_dir)?;
    let total = sources.len();
    info!(
        "Rendering {} thumbnails at {}×{} into {}",
        total,
        spec.width,
        spec.height,
        out_dir.display()
    );
    if let Some(cb) = progress {
        cb.on_thumbnails_start(total);
    }

    fs::create_dir_all(out_dir).map_err(|source| GameDataError::OutputWriteFailed {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(total);
    for (i, source) in sources.iter().enumerate() {
        let name = thumbnail_name(source, extension).ok_or_else(|| {
            image_error(source, "file has no name")
        })?;
        let target = out_dir.join(name);
        process_file(source, &target, spec)?;

        if let Some(cb) = progress {
            cb.on_thumbnail(i + 1, total, &target);
        }
        written.push(target);
    }

    Ok(written)
}

/// Decode, render and encode a single file.
fn process_file(source: &Path, target: &Path, spec: &ThumbnailSpec) -> Result<(), GameDataError> {
    let img = ImageReader::open(source)
        .map_err(|e| image_error(source, e))?
        .with_guessed_format()
        .map_err(|e| image_error(source, e))?
        .decode()
        .map_err(|e| image_error(source, e))?;

    if img.width() == 0 || img.height() == 0 {
        return Err(image_error(source, "image has no pixels"));
    }

    let thumb = render_thumbnail(&img, spec);

    let file = File::create(target).map_err(|e| GameDataError::OutputWriteFailed {
        path: target.to_path_buf(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);
    JpegEncoder::new_with_quality(&mut writer, spec.quality)
        .encode_image(&thumb)
        .map_err(|e| image_error(source, e))?;
    writer.flush().map_err(|e| GameDataError::OutputWriteFailed {
        path: target.to_path_buf(),
        source: e,
    })?;

    debug!(
        "Thumbnail {} ({}×{}) → {}",
        source.display(),
        img.width(),
        img.height(),
        target.display()
    );
    Ok(())
}

/// Regular files directly inside `dir`, sorted by name.
fn list_sources(dir: &Path) -> Result<Vec<PathBuf>, GameDataError> {
    let entries = fs::read_dir(dir).map_err(|e| image_error(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| image_error(dir, e))?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn image_error(path: &Path, e: impl std::fmt::Display) -> GameDataError {
    GameDataError::ImageProcessing {
        path: path.to_path_buf(),
        detail: e.to_string(),
    }
}
