//! The normalized edit transform: zoom scale plus pan offset.
//!
//! The live preview is a cheap affine transform of the on-page element; no
//! raster work happens until commit. The same state drives the commit
//! compositor, so the two paths always agree on what is visible.
//!
//! # Invariants
//!
//! - `scale` stays in `[MIN_SCALE, MAX_SCALE]`.
//! - `|offset.x| <= (scale - 1) * half_viewport.x` (same for y), so the
//!   crop window never exposes empty space outside the image's covering
//!   rectangle. At scale 1 the offset is pinned to zero.
//!
//! The bound uses the actual measured viewport half-extent per axis, not a
//! fixed constant.

use crate::{Vec2, Viewport};

/// Minimum zoom. 1.0 means the image exactly covers the viewport.
pub const MIN_SCALE: f64 = 1.0;

/// Maximum zoom.
pub const MAX_SCALE: f64 = 3.0;

/// Zoom delta applied by the discrete +/- controls.
pub const ZOOM_STEP: f64 = 0.1;

/// Current scale and pan of the edit session.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransformState {
    /// Zoom factor in `[MIN_SCALE, MAX_SCALE]`.
    pub scale: f64,
    /// Pan offset in viewport pixels, clamped to the covering bound.
    pub offset: Vec2,
}

impl Default for TransformState {
    fn default() -> Self {
        Self::identity()
    }
}

impl TransformState {
    /// No zoom, no pan.
    pub fn identity() -> Self {
        Self {
            scale: MIN_SCALE,
            offset: Vec2::ZERO,
        }
    }

    /// Largest offset magnitude allowed per axis at the given scale.
    pub fn max_offset(scale: f64, viewport: Viewport) -> Vec2 {
        let half = viewport.half_extent();
        Vec2::new((scale - 1.0) * half.x, (scale - 1.0) * half.y)
    }

    /// Set the offset, clamping it to the covering bound for the current
    /// scale.
    pub fn set_offset(&mut self, offset: Vec2, viewport: Viewport) {
        let max = Self::max_offset(self.scale, viewport);
        self.offset = Vec2::new(offset.x.clamp(-max.x, max.x), offset.y.clamp(-max.y, max.y));
    }

    /// Set the scale, clamping it to `[MIN_SCALE, MAX_SCALE]` and re-clamping
    /// the offset to the possibly tightened bound.
    pub fn set_scale(&mut self, scale: f64, viewport: Viewport) {
        self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
        self.set_offset(self.offset, viewport);
    }

    /// Saturating zoom by a signed delta.
    pub fn zoom_by(&mut self, delta: f64, viewport: Viewport) {
        self.set_scale(self.scale + delta, viewport);
    }

    /// Back to identity.
    pub fn reset(&mut self) {
        *self = Self::identity();
    }

    /// True when at identity (scale 1, zero offset).
    pub fn is_identity(&self) -> bool {
        self.scale == MIN_SCALE && self.offset == Vec2::ZERO
    }

    /// The CSS-equivalent transform written to the preview element:
    /// `scale(<s>) translate(<x/s>px, <y/s>px)`.
    ///
    /// The translate is divided by scale because the CSS `translate` runs in
    /// the already-scaled coordinate space.
    pub fn css_string(&self) -> String {
        format!(
            "scale({}) translate({}px, {}px)",
            self.scale,
            self.offset.x / self.scale,
            self.offset.y / self.scale
        )
    }

    /// Check the offset invariant. Used by tests after every mutation.
    pub fn satisfies_bounds(&self, viewport: Viewport) -> bool {
        let max = Self::max_offset(self.scale, viewport);
        // Tiny epsilon absorbs f64 rounding from repeated clamps.
        const EPS: f64 = 1e-9;
        (MIN_SCALE..=MAX_SCALE).contains(&self.scale)
            && self.offset.x.abs() <= max.x + EPS
            && self.offset.y.abs() <= max.y + EPS
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
