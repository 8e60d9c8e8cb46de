use std::collections::HashSet;

use serde::Serialize;

use crate::assets::variants::{variant_filename, ORIGINAL_SRCSET_WIDTH, SRCSET_SIZES};

/// URL prefix the static server mounts project asset folders under.
pub const PROJECT_ASSETS_URL: &str = "/project_assets";

/// One original image of a folder, ready for an `<img srcset>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponsiveImage {
    pub filename: String,
    pub srcset: String,
    pub path: String,
}

pub fn asset_url(folder: &str, filename: &str) -> String {
    format!("{PROJECT_ASSETS_URL}/{folder}/{filename}")
}

/// Builds the responsive description of `original` from the folder listing:
/// the WebP size variants actually present, then the original itself.
pub fn responsive_image(folder: &str, original: &str, listing: &HashSet<&str>) -> ResponsiveImage {
    let mut candidates: Vec<String> = SRCSET_SIZES
        .iter()
        .filter_map(|size| {
            let name = variant_filename(original, size, "webp");
            listing
                .contains(name.as_str())
                .then(|| format!("{} {}w", asset_url(folder, &name), size.width))
        })
        .collect();

    let path = asset_url(folder, original);
    candidates.push(format!("{path} {ORIGINAL_SRCSET_WIDTH}w"));

    ResponsiveImage {
        filename: original.to_string(),
        srcset: candidates.join(", "),
        path,
    }
}

/// Responsive entries for every original in `originals`, given the full listing.
pub fn responsive_images(
    folder: &str,
    originals: &[String],
    listing: &[String],
) -> Vec<ResponsiveImage> {
    let present: HashSet<&str> = listing.iter().map(String::as_str).collect();
    originals
        .iter()
        .map(|original| responsive_image(folder, original, &present))
        .collect()
}
