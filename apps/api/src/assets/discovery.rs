//! Image discovery and the original-image filter.
//!
//! The directory listing is the source of truth for which images a project
//! has. Generated variants live next to their originals and are told apart by
//! filename alone: `name_<size>.<ext>` for resized copies and `name.webp` for
//! the WebP re-encode of a raster original.

use std::collections::HashSet;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::warn;

/// Extensions returned by discovery, compared case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg"];

/// Size names that mark a generated variant when they appear as `_<size>.`.
pub const VARIANT_SUFFIXES: &[&str] = &["small", "medium", "large", "thumbnail", "xlarge"];

/// Raster originals that a same-named `.webp` is assumed to derive from.
const RASTER_SIBLING_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Lower-cased extension of a filename, if it has one.
pub fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

pub fn is_image_file(filename: &str) -> bool {
    extension_of(filename).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Resolves a folder identifier under `root`, refusing anything that could
/// step outside it (empty, absolute, `..`, nested separators).
pub fn resolve_folder(root: &Path, folder: &str) -> Option<PathBuf> {
    let relative = Path::new(folder);
    let mut components = relative.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Some(root.join(relative)),
        _ => None,
    }
}

/// Lists the image files of `<root>/<folder>`, sorted lexicographically.
/// Errors are returned as-is; see `discover_images` for the lenient form.
pub async fn read_image_dir(root: &Path, folder: &str) -> io::Result<Vec<String>> {
    let path = resolve_folder(root, folder).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid image folder name '{folder}'"),
        )
    })?;

    let metadata = tokio::fs::metadata(&path).await?;
    if !metadata.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} is not a directory", path.display()),
        ));
    }

    let mut entries = tokio::fs::read_dir(&path).await?;
    let mut images = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if let Some(name) = entry.file_name().to_str() {
            if is_image_file(name) {
                images.push(name.to_string());
            }
        }
    }
    images.sort();
    Ok(images)
}

/// Lists the image files of a project folder. A missing or unreadable folder
/// yields no images rather than an error.
pub async fn discover_images(root: &Path, folder: &str) -> Vec<String> {
    match read_image_dir(root, folder).await {
        Ok(images) => images,
        Err(e) => {
            warn!("Failed to read images from folder {folder}: {e}");
            Vec::new()
        }
    }
}

/// True when the filename carries one of the generated size suffixes.
pub fn has_variant_suffix(filename: &str) -> bool {
    let lower = filename.to_ascii_lowercase();
    VARIANT_SUFFIXES
        .iter()
        .any(|size| lower.contains(&format!("_{size}.")))
}

/// Keeps only original images: drops sized variants, and drops `x.webp` when a
/// raster `x.png`/`x.jpg`/`x.jpeg` is also present. Result is sorted.
pub fn filter_originals(images: &[String]) -> Vec<String> {
    let present: HashSet<&str> = images.iter().map(String::as_str).collect();

    let mut originals: Vec<String> = images
        .iter()
        .filter(|image| !has_variant_suffix(image))
        .filter(|image| match image.strip_suffix(".webp") {
            Some(stem) => !RASTER_SIBLING_EXTENSIONS
                .iter()
                .any(|ext| present.contains(format!("{stem}.{ext}").as_str())),
            None => true,
        })
        .cloned()
        .collect();

    originals.sort();
    originals
}
