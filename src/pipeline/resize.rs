use image::{DynamicImage, imageops::FilterType};
use tracing::warn;

/// Interpolation filters a client can ask for by name.
///
/// The set and spelling are part of the public API. An unrecognized name
/// falls back to Lanczos3 instead of failing; existing clients depend on
/// that leniency, so it is kept and logged rather than tightened into a
/// validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeAlgorithm {
    NearestNeighbor,
    Bilinear,
    Bicubic,
    MitchellNetravali,
    Lanczos2,
    #[default]
    Lanczos3,
}

impl ResizeAlgorithm {
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            None | Some("") => ResizeAlgorithm::Lanczos3,
            Some("NearestNeighbor") => ResizeAlgorithm::NearestNeighbor,
            Some("Bilinear") => ResizeAlgorithm::Bilinear,
            Some("Bicubic") => ResizeAlgorithm::Bicubic,
            Some("MitchellNetravali") => ResizeAlgorithm::MitchellNetravali,
            Some("Lanczos2") => ResizeAlgorithm::Lanczos2,
            Some("Lanczos3") => ResizeAlgorithm::Lanczos3,
            Some(other) => {
                warn!(
                    "unrecognized resize algorithm {:?}, falling back to Lanczos3",
                    other
                );
                ResizeAlgorithm::Lanczos3
            }
        }
    }

    /// Closest filter the image crate offers. Mitchell-Netravali and
    /// Lanczos2 have no exact kernel there and map to CatmullRom and
    /// Lanczos3 respectively.
    fn filter(&self) -> FilterType {
        match self {
            ResizeAlgorithm::NearestNeighbor => FilterType::Nearest,
            ResizeAlgorithm::Bilinear => FilterType::Triangle,
            ResizeAlgorithm::Bicubic | ResizeAlgorithm::MitchellNetravali => FilterType::CatmullRom,
            ResizeAlgorithm::Lanczos2 | ResizeAlgorithm::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Resize to the requested dimensions.
///
/// A zero width or height is derived from the other dimension so the
/// source aspect ratio is preserved; both non-zero resizes to exactly that
/// size without preserving aspect. Both-zero is rejected before this point.
pub fn resize_image(
    image: &DynamicImage,
    width: u32,
    height: u32,
    algorithm: ResizeAlgorithm,
) -> DynamicImage {
    let (target_width, target_height) =
        target_dimensions(image.width(), image.height(), width, height);
    image.resize_exact(target_width, target_height, algorithm.filter())
}

fn target_dimensions(src_width: u32, src_height: u32, width: u32, height: u32) -> (u32, u32) {
    match (width, height) {
        (0, h) => (scaled(src_width, src_height, h), h),
        (w, 0) => (w, scaled(src_height, src_width, w)),
        (w, h) => (w, h),
    }
}

/// Scale one source dimension by the ratio the other dimension is being
/// scaled by, rounding to the nearest pixel (never below one).
fn scaled(unknown_src: u32, known_src: u32, known_target: u32) -> u32 {
    let ratio = known_target as f64 / known_src as f64;
    ((unknown_src as f64 * ratio).round() as u32).max(1)
}
