//! Build-time image optimization.
//!
//! For every original in a project folder the optimizer writes a full-size
//! WebP, JPEG + WebP copies at each fixed size the source is wide enough for,
//! and the original itself (re-encoded when it is too heavy). A failure on one
//! image degrades to a plain copy of that image and never stops the batch.
//!
//! Codec work is CPU-bound and runs inside `tokio::task::spawn_blocking`.
//! Folders are processed `FOLDER_BATCH_SIZE` at a time to bound the number of
//! decoded images held in memory.

use std::future::Future;
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use futures::future::join_all;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::assets::discovery::{extension_of, read_image_dir};
use crate::assets::variants::{variant_filename, webp_filename, VariantSize, VARIANT_SIZES};

/// Formats the codec pipeline handles; everything else is copied through.
pub const OPTIMIZABLE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

pub const JPEG_QUALITY: u8 = 90;

pub const WEBP_QUALITY: f32 = 85.0;

/// Originals at or above this size are re-encoded instead of copied.
pub const MAX_PRESERVED_ORIGINAL_BYTES: u64 = 2 * 1024 * 1024;

pub const FOLDER_BATCH_SIZE: usize = 3;

#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("WebP encoding failed: {0}")]
    WebP(String),

    #[error("Optimization task failed: {0}")]
    Task(String),
}

/// What happened to one source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOutcome {
    /// Variants were generated; `variants` counts the files written besides the original.
    Optimized { variants: usize },
    /// Not a codec format (svg, webp, ...); copied verbatim.
    Copied,
    /// Codec work failed; the original was copied verbatim instead.
    FellBack,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderReport {
    pub folder: String,
    pub optimized: usize,
    pub copied: usize,
    pub fell_back: usize,
    /// Files that could not even be copied.
    pub failed: usize,
    pub variants: usize,
}

impl FolderReport {
    fn new(folder: &str) -> Self {
        Self {
            folder: folder.to_string(),
            ..Default::default()
        }
    }

    fn record(&mut self, outcome: ImageOutcome) {
        match outcome {
            ImageOutcome::Optimized { variants } => {
                self.optimized += 1;
                self.variants += variants;
            }
            ImageOutcome::Copied => self.copied += 1,
            ImageOutcome::FellBack => self.fell_back += 1,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OptimizationReport {
    pub folders: Vec<FolderReport>,
    /// Files present in the output tree once the run finished.
    pub output_files: usize,
    pub elapsed: Duration,
}

impl OptimizationReport {
    pub fn optimized(&self) -> usize {
        self.folders.iter().map(|f| f.optimized).sum()
    }

    pub fn copied(&self) -> usize {
        self.folders.iter().map(|f| f.copied).sum()
    }

    pub fn fell_back(&self) -> usize {
        self.folders.iter().map(|f| f.fell_back).sum()
    }

    pub fn failed(&self) -> usize {
        self.folders.iter().map(|f| f.failed).sum()
    }
}

pub fn is_optimizable(filename: &str) -> bool {
    extension_of(filename).is_some_and(|ext| OPTIMIZABLE_EXTENSIONS.contains(&ext.as_str()))
}

/// Sizes generated for a source of the given width: those not wider than it.
pub fn planned_sizes(source_width: u32) -> impl Iterator<Item = VariantSize> {
    VARIANT_SIZES
        .into_iter()
        .filter(move |size| source_width >= size.width)
}

pub fn keeps_original_bytes(len: u64) -> bool {
    len < MAX_PRESERVED_ORIGINAL_BYTES
}

/// Optimizes `input` into `output_dir`, naming outputs after `filename`.
///
/// Only failing to create the output directory or to copy a file is an error;
/// codec failures fall back to copying the original.
pub async fn optimize_image(
    input: &Path,
    output_dir: &Path,
    filename: &str,
) -> Result<ImageOutcome, OptimizeError> {
    tokio::fs::create_dir_all(output_dir).await?;
    let destination = output_dir.join(filename);

    if !is_optimizable(filename) {
        tokio::fs::copy(input, &destination).await?;
        return Ok(ImageOutcome::Copied);
    }

    let (src, dir, name) = (
        input.to_path_buf(),
        output_dir.to_path_buf(),
        filename.to_string(),
    );
    let encoded = tokio::task::spawn_blocking(move || encode_variants(&src, &dir, &name))
        .await
        .map_err(|e| OptimizeError::Task(e.to_string()))
        .and_then(|result| result);

    match encoded {
        Ok(variants) => {
            info!("Optimized {filename} ({variants} variants)");
            Ok(ImageOutcome::Optimized { variants })
        }
        Err(e) => {
            error!("Failed to optimize {filename}: {e}");
            tokio::fs::copy(input, &destination).await?;
            Ok(ImageOutcome::FellBack)
        }
    }
}

/// Optimizes every image of `<source_root>/<folder>` into `<output_root>/<folder>`.
pub async fn optimize_folder(
    source_root: &Path,
    output_root: &Path,
    folder: &str,
) -> FolderReport {
    let mut report = FolderReport::new(folder);
    let source = source_root.join(folder);
    if !source.is_dir() {
        warn!("Source folder {} does not exist", source.display());
        return report;
    }

    let files = match read_image_dir(source_root, folder).await {
        Ok(files) => files,
        Err(e) => {
            error!("Failed to optimize project {folder}: {e}");
            return report;
        }
    };

    info!("Optimizing {} images in {folder}...", files.len());
    let output = output_root.join(folder);
    for file in &files {
        match optimize_image(&source.join(file), &output, file).await {
            Ok(outcome) => report.record(outcome),
            Err(e) => {
                error!("Could not write {file} into {}: {e}", output.display());
                report.failed += 1;
            }
        }
    }
    report
}

/// Optimizes every project folder under `source_root`, three folders at a time.
pub async fn optimize_all(
    source_root: &Path,
    output_root: &Path,
) -> Result<OptimizationReport, OptimizeError> {
    let started = Instant::now();
    if !source_root.is_dir() {
        warn!("Source directory {} does not exist", source_root.display());
        return Ok(OptimizationReport::default());
    }

    let folders = list_subdirectories(source_root).await?;
    info!("Starting image optimization for {} projects...", folders.len());

    let reports = in_batches(&folders, FOLDER_BATCH_SIZE, |folder| {
        optimize_folder(source_root, output_root, folder)
    })
    .await;

    let report = OptimizationReport {
        folders: reports,
        output_files: count_output_files(output_root).await?,
        elapsed: started.elapsed(),
    };

    info!(
        "Image optimization completed in {:.2}s: {} optimized, {} copied, {} fell back, {} failed; {} files across {} projects",
        report.elapsed.as_secs_f64(),
        report.optimized(),
        report.copied(),
        report.fell_back(),
        report.failed(),
        report.output_files,
        report.folders.len(),
    );
    Ok(report)
}

/// Runs `task` over `items`, at most `batch_size` at a time. Each batch is
/// awaited in full before the next starts; results keep the input order.
async fn in_batches<'a, T, F, Fut>(
    items: &'a [T],
    batch_size: usize,
    task: F,
) -> Vec<Fut::Output>
where
    F: Fn(&'a T) -> Fut,
    Fut: Future,
{
    let mut results = Vec::with_capacity(items.len());
    for batch in items.chunks(batch_size.max(1)) {
        results.extend(join_all(batch.iter().map(&task)).await);
    }
    results
}

async fn list_subdirectories(root: &Path) -> io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(root).await?;
    let mut folders = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                folders.push(name.to_string());
            }
        }
    }
    folders.sort();
    Ok(folders)
}

async fn count_output_files(output_root: &Path) -> io::Result<usize> {
    if !output_root.is_dir() {
        return Ok(0);
    }
    let mut total = 0;
    for folder in list_subdirectories(output_root).await? {
        let mut entries = tokio::fs::read_dir(output_root.join(folder)).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                total += 1;
            }
        }
    }
    Ok(total)
}

// ────────────────────────────────────────────────────────────────────────────
// Blocking codec work
// ────────────────────────────────────────────────────────────────────────────

fn encode_variants(
    input: &Path,
    output_dir: &Path,
    filename: &str,
) -> Result<usize, OptimizeError> {
    let image = ImageReader::open(input)?.with_guessed_format()?.decode()?;
    let mut written = 0;

    write_webp(&image, &output_dir.join(webp_filename(filename)))?;
    written += 1;

    for size in planned_sizes(image.width()) {
        let resized = fit_within(&image, &size);
        write_jpeg(&resized, &output_dir.join(variant_filename(filename, &size, "jpg")))?;
        write_webp(&resized, &output_dir.join(variant_filename(filename, &size, "webp")))?;
        written += 2;
    }

    preserve_original(input, &image, &output_dir.join(filename))?;
    Ok(written)
}

/// Scales down to fit inside the size's box, keeping aspect ratio.
/// Images already inside the box are returned unchanged.
fn fit_within(image: &DynamicImage, size: &VariantSize) -> DynamicImage {
    if image.width() <= size.width && image.height() <= size.height {
        return image.clone();
    }
    image.resize(size.width, size.height, FilterType::Lanczos3)
}

/// Writes the original into the output folder. Light originals are copied;
/// heavy JPEG and PNG originals are re-encoded and the result kept only when
/// it is smaller than the source.
fn preserve_original(
    input: &Path,
    image: &DynamicImage,
    destination: &Path,
) -> Result<(), OptimizeError> {
    let len = std::fs::metadata(input)?.len();
    if keeps_original_bytes(len) {
        std::fs::copy(input, destination)?;
        return Ok(());
    }

    let reencoded = match extension_of(&destination.to_string_lossy()).as_deref() {
        Some("jpg" | "jpeg") => Some(encode_jpeg(image)?),
        Some("png") => Some(encode_png(image)?),
        // Re-encoding would drop animation frames.
        _ => None,
    };

    match reencoded {
        Some(bytes) if (bytes.len() as u64) < len => {
            debug!(
                "Re-encoded {} from {len} to {} bytes",
                destination.display(),
                bytes.len()
            );
            std::fs::write(destination, bytes)?;
        }
        _ => {
            std::fs::copy(input, destination)?;
        }
    }
    Ok(())
}

fn encode_jpeg(image: &DynamicImage) -> Result<Vec<u8>, OptimizeError> {
    let mut buffer = Vec::new();
    DynamicImage::ImageRgb8(image.to_rgb8())
        .write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY))?;
    Ok(buffer)
}

fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, OptimizeError> {
    let mut buffer = Vec::new();
    image.write_with_encoder(PngEncoder::new_with_quality(
        &mut buffer,
        CompressionType::Best,
        PngFilter::Adaptive,
    ))?;
    Ok(buffer)
}

/// Lossy WebP at `WEBP_QUALITY`, keeping the alpha channel when there is one.
fn encode_webp(image: &DynamicImage) -> Result<Vec<u8>, OptimizeError> {
    let (width, height) = (image.width(), image.height());
    let encoded = if image.color().has_alpha() {
        let rgba = image.to_rgba8();
        let encoder = webp::Encoder::from_rgba(rgba.as_raw(), width, height);
        encoder.encode_simple(false, WEBP_QUALITY)
    } else {
        let rgb = image.to_rgb8();
        let encoder = webp::Encoder::from_rgb(rgb.as_raw(), width, height);
        encoder.encode_simple(false, WEBP_QUALITY)
    };
    let encoded = encoded.map_err(|e| OptimizeError::WebP(format!("{e:?}")))?;
    Ok(encoded.to_vec())
}

fn write_jpeg(image: &DynamicImage, path: &Path) -> Result<(), OptimizeError> {
    std::fs::write(path, encode_jpeg(image)?)?;
    Ok(())
}

fn write_webp(image: &DynamicImage, path: &Path) -> Result<(), OptimizeError> {
    std::fs::write(path, encode_webp(image)?)?;
    Ok(())
}
