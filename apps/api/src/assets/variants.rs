//! Fixed size table and the naming convention for generated variants.

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantSize {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
}

pub const THUMBNAIL: VariantSize = VariantSize {
    name: "thumbnail",
    width: 150,
    height: 150,
};
pub const SMALL: VariantSize = VariantSize {
    name: "small",
    width: 480,
    height: 320,
};
pub const MEDIUM: VariantSize = VariantSize {
    name: "medium",
    width: 768,
    height: 512,
};
pub const LARGE: VariantSize = VariantSize {
    name: "large",
    width: 1024,
    height: 683,
};
pub const XLARGE: VariantSize = VariantSize {
    name: "xlarge",
    width: 1920,
    height: 1280,
};

/// Every size the optimizer emits, smallest first.
pub const VARIANT_SIZES: [VariantSize; 5] = [THUMBNAIL, SMALL, MEDIUM, LARGE, XLARGE];

/// Sizes advertised in a `srcset`, with the width descriptor for each.
pub const SRCSET_SIZES: [VariantSize; 3] = [SMALL, MEDIUM, LARGE];

/// Width descriptor given to the original image in a `srcset`.
pub const ORIGINAL_SRCSET_WIDTH: u32 = 1920;

/// Filename without its final extension.
pub fn stem_of(filename: &str) -> &str {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
}

/// `hero.png` + small + `jpg` → `hero_small.jpg`.
pub fn variant_filename(original: &str, size: &VariantSize, ext: &str) -> String {
    format!("{}_{}.{ext}", stem_of(original), size.name)
}

/// `hero.png` → `hero.webp`.
pub fn webp_filename(original: &str) -> String {
    format!("{}.webp", stem_of(original))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::discovery::{has_variant_suffix, VARIANT_SUFFIXES};

    #[test]
    fn test_naming() {
        assert_eq!(variant_filename("hero.png", &SMALL, "jpg"), "hero_small.jpg");
        assert_eq!(variant_filename("my.shot.jpeg", &XLARGE, "webp"), "my.shot_xlarge.webp");
        assert_eq!(webp_filename("hero.png"), "hero.webp");
        assert_eq!(stem_of("noext"), "noext");
    }

    #[test]
    fn test_every_size_is_a_recognised_suffix() {
        for size in VARIANT_SIZES {
            assert!(VARIANT_SUFFIXES.contains(&size.name));
            assert!(has_variant_suffix(&variant_filename("a.png", &size, "jpg")));
        }
    }
}
