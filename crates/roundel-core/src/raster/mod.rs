//! The commit raster pipeline.
//!
//! Converts the live interactive transform into the final avatar: an
//! offscreen RGB surface, circularly clipped, background filled, with the
//! source image drawn through the accumulated affine transform in cover
//! fit, then encoded.
//!
//! The pipeline is a sequence of stages, each a pure function of the
//! previous stage's output: plan the surface, compose (clip mask, affine
//! transform and cover-fit draw resolved per output pixel via inverse
//! mapping), encode. The composition uses inverse mapping: for each output
//! pixel we compute which source location lands there and sample it with
//! bilinear interpolation.
//!
//! All operations are synchronous and single-threaded within WASM.

mod cover;

pub use cover::{cover_rect, CoverRect};

use thiserror::Error;

use crate::capability::CommitProfile;
use crate::decode::DecodedImage;
use crate::encode::{encode_image, EncodeError, EncodedImage};
use crate::transform::TransformState;
use crate::Viewport;

/// Hard cap on either raster surface dimension.
pub const MAX_SURFACE_DIM: u32 = 8192;

/// Errors raised while rasterizing or encoding a commit.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// The planned surface exceeds the dimension cap.
    #[error("Raster surface {width}x{height} exceeds the {MAX_SURFACE_DIM} pixel limit")]
    SurfaceTooLarge { width: u32, height: u32 },

    /// The session image has no pixels.
    #[error("Source image is empty")]
    EmptySource,

    /// Encoding the composed surface failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// The offscreen surface geometry for one commit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePlan {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Device pixels per viewport pixel (the profile's quality factor).
    pub pixel_scale: f64,
}

/// Stage 1: size the offscreen surface from the viewport and the
/// device-resolved quality factor.
pub fn plan_surface(
    viewport: Viewport,
    profile: &CommitProfile,
) -> Result<SurfacePlan, ProcessingError> {
    let pixel_scale = profile.quality_factor.max(1.0);
    let width = (viewport.width * pixel_scale).round().max(1.0) as u32;
    let height = (viewport.height * pixel_scale).round().max(1.0) as u32;

    if width > MAX_SURFACE_DIM || height > MAX_SURFACE_DIM {
        return Err(ProcessingError::SurfaceTooLarge { width, height });
    }

    Ok(SurfacePlan {
        width,
        height,
        pixel_scale,
    })
}

/// Stage 2: compose the circularly-masked, transformed image.
///
/// For every surface pixel, working in viewport coordinates:
///
/// 1. Outside the clip circle: background.
/// 2. Invert the edit transform (translate to center, scale, translate by
///    `-center + offset/scale`) to find the untransformed point.
/// 3. Map through the cover-fit rectangle into source pixel space and
///    sample bilinearly; points off the rectangle get the background.
///
/// At scale 1 with zero offset the result matches the live preview: the
/// cover-fit crop of the source, clipped to the circle.
pub fn compose(
    image: &DecodedImage,
    transform: TransformState,
    viewport: Viewport,
    plan: SurfacePlan,
    background: [u8; 3],
) -> Result<DecodedImage, ProcessingError> {
    if image.is_empty() {
        return Err(ProcessingError::EmptySource);
    }

    let rect = cover_rect(image, viewport);
    let center = viewport.center();
    let radius_sq = viewport.clip_radius() * viewport.clip_radius();
    let scale = transform.scale;
    let offset = transform.offset;

    let (out_w, out_h) = (plan.width, plan.height);
    let mut pixels = vec![0u8; (out_w as usize) * (out_h as usize) * 3];

    for oy in 0..out_h {
        for ox in 0..out_w {
            // Surface pixel center in viewport coordinates.
            let x = (f64::from(ox) + 0.5) / plan.pixel_scale;
            let y = (f64::from(oy) + 0.5) / plan.pixel_scale;

            let idx = ((oy * out_w + ox) * 3) as usize;

            // Circular clip, centered on the viewport.
            let dx = x - center.x;
            let dy = y - center.y;
            if dx * dx + dy * dy > radius_sq {
                pixels[idx..idx + 3].copy_from_slice(&background);
                continue;
            }

            // Invert the forward transform
            //   p = scale * u - scale * center + offset + center
            // to recover the untransformed viewport point u.
            let ux = (x - center.x - offset.x) / scale + center.x;
            let uy = (y - center.y - offset.y) / scale + center.y;

            // Position within the cover-fit draw rectangle, normalized.
            let nx = (ux - rect.origin.x) / rect.width;
            let ny = (uy - rect.origin.y) / rect.height;
            if !(0.0..=1.0).contains(&nx) || !(0.0..=1.0).contains(&ny) {
                pixels[idx..idx + 3].copy_from_slice(&background);
                continue;
            }

            let sx = nx * f64::from(image.width) - 0.5;
            let sy = ny * f64::from(image.height) - 0.5;

            let sample = sample_bilinear(image, sx, sy);
            pixels[idx..idx + 3].copy_from_slice(&sample);
        }
    }

    Ok(DecodedImage::new(out_w, out_h, pixels))
}

/// Run the whole pipeline: plan, compose, encode.
pub fn commit_pipeline(
    image: &DecodedImage,
    transform: TransformState,
    viewport: Viewport,
    profile: &CommitProfile,
) -> Result<EncodedImage, ProcessingError> {
    let plan = plan_surface(viewport, profile)?;
    let composed = compose(image, transform, viewport, plan, profile.background)?;
    let encoded = encode_image(&composed, profile.format, profile.jpeg_quality)?;
    Ok(encoded)
}

/// Get a pixel as [f64; 3] from an image at the given coordinates.
#[inline]
fn get_pixel_f64(image: &DecodedImage, px: usize, py: usize) -> [f64; 3] {
    let idx = (py * image.width as usize + px) * 3;
    [
        f64::from(image.pixels[idx]),
        f64::from(image.pixels[idx + 1]),
        f64::from(image.pixels[idx + 2]),
    ]
}

/// Sample a pixel using bilinear interpolation with clamp-to-edge.
///
/// The compositor only calls this for points inside the cover-fit
/// rectangle, so coordinates at most half a pixel outside the source are
/// clamped onto the edge row/column rather than treated as misses.
fn sample_bilinear(image: &DecodedImage, x: f64, y: f64) -> [u8; 3] {
    let max_x = f64::from(image.width - 1);
    let max_y = f64::from(image.height - 1);
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(image.width as usize - 1);
    let y1 = (y0 + 1).min(image.height as usize - 1);

    // Fractional distances
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_pixel_f64(image, x0, y0);
    let p10 = get_pixel_f64(image, x1, y0);
    let p01 = get_pixel_f64(image, x0, y1);
    let p11 = get_pixel_f64(image, x1, y1);

    // Bilinear interpolation formula
    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::capability::CommitProfile;
    use crate::Vec2;
    use proptest::prelude::*;

    fn checker_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = if (x + y) % 2 == 0 { 30 } else { 220 };
                pixels.extend_from_slice(&[v, v, v]);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    proptest! {
        /// Property: every pixel outside the clip circle is background,
        /// whatever the transform.
        #[test]
        fn prop_outside_circle_is_background(
            size in 16.0f64..=64.0,
            scale in 1.0f64..=3.0,
            ox in -200.0f64..=200.0,
            oy in -200.0f64..=200.0,
            (img_w, img_h) in (8u32..=64, 8u32..=64),
        ) {
            let vp = Viewport::square(size);
            let img = checker_image(img_w, img_h);

            let mut t = TransformState::identity();
            t.set_scale(scale, vp);
            t.set_offset(Vec2::new(ox, oy), vp);

            let plan = plan_surface(vp, &CommitProfile::desktop(1.0)).unwrap();
            let out = compose(&img, t, vp, plan, [255, 0, 255]).unwrap();

            let center = vp.center();
            let radius = vp.clip_radius();
            for py in 0..out.height {
                for px in 0..out.width {
                    let dx = (f64::from(px) + 0.5) - center.x;
                    let dy = (f64::from(py) + 0.5) - center.y;
                    if dx * dx + dy * dy > radius * radius {
                        let idx = ((py * out.width + px) * 3) as usize;
                        prop_assert_eq!(
                            &out.pixels[idx..idx + 3],
                            &[255u8, 0, 255][..],
                            "pixel ({}, {}) leaked through the clip", px, py
                        );
                    }
                }
            }
        }

        /// Property: surface dimensions follow viewport times quality
        /// factor for any in-range factor.
        #[test]
        fn prop_plan_dimensions(
            w in 10.0f64..=300.0,
            h in 10.0f64..=300.0,
            q in 1.0f64..=3.0,
        ) {
            let profile = CommitProfile { quality_factor: q, ..CommitProfile::desktop(q) };
            let plan = plan_surface(Viewport::new(w, h), &profile).unwrap();

            prop_assert_eq!(plan.width, (w.max(1.0) * q).round() as u32);
            prop_assert_eq!(plan.height, (h.max(1.0) * q).round() as u32);
        }
    }
}
