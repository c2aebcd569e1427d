//! Cover-fit placement of a source image inside the viewport.
//!
//! Cover fit scales the image so its shorter dimension (relative to the
//! viewport aspect) exactly fills the corresponding viewport dimension,
//! centering the overflow on the longer dimension. The live CSS preview
//! gets this behavior from `object-fit: cover`; the commit compositor uses
//! this module to reproduce the same proportions exactly.

use crate::decode::DecodedImage;
use crate::{Vec2, Viewport};

/// The rectangle, in viewport coordinates, the source image is drawn into.
///
/// The origin can be negative: a wide image in a square viewport hangs off
/// both horizontal edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverRect {
    /// Top-left corner of the draw rectangle.
    pub origin: Vec2,
    /// Draw width in viewport pixels.
    pub width: f64,
    /// Draw height in viewport pixels.
    pub height: f64,
}

/// Compute the cover-fit draw rectangle for a source image.
pub fn cover_rect(image: &DecodedImage, viewport: Viewport) -> CoverRect {
    let image_ratio = image.aspect_ratio();

    if image_ratio > viewport.aspect_ratio() {
        // Image is wider than the viewport: height fills, width overflows.
        let height = viewport.height;
        let width = height * image_ratio;
        CoverRect {
            origin: Vec2::new((viewport.width - width) / 2.0, 0.0),
            width,
            height,
        }
    } else {
        // Image is taller (or same aspect): width fills, height overflows.
        let width = viewport.width;
        let height = width / image_ratio;
        CoverRect {
            origin: Vec2::new(0.0, (viewport.height - height) / 2.0),
            width,
            height,
        }
    }
}
