//! Roundel Core - circular avatar crop engine
//!
//! This crate implements one image edit session end-to-end: file validation,
//! decoding, the interactive scale/translate transform with drag and pinch
//! gestures, and the committed raster pipeline that produces the final
//! circularly-masked, encoded avatar.
//!
//! The engine never touches a UI tree directly. All visual side effects go
//! through the [`surface::RenderSurface`] trait so the session logic can be
//! driven and tested without a real page.

pub mod capability;
pub mod decode;
pub mod encode;
pub mod gesture;
pub mod raster;
pub mod session;
pub mod surface;
pub mod transform;
pub mod validate;

pub use capability::{CapabilityProbe, CommitProfile, DeviceClass};
pub use encode::{EncodedImage, OutputFormat};
pub use session::{EditorError, EditorPhase, ImageEditor};
pub use surface::RenderSurface;
pub use transform::{TransformState, MAX_SCALE, MIN_SCALE};
pub use validate::{SelectedFile, ValidationError};

/// A 2D vector in viewport pixels.
///
/// Used for pointer positions, drag anchors and the session offset. The
/// coordinate system matches the hosting page: x grows right, y grows down.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Vec2) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// The fixed display area the edited image is composed into.
///
/// Dimensions are CSS pixels as measured on the page. The circular clip used
/// at commit time is centered on the viewport with radius half the shorter
/// dimension.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Create a viewport. Dimensions are floored at one pixel.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    /// Square viewport, the common case for a circular avatar.
    pub fn square(size: f64) -> Self {
        Self::new(size, size)
    }

    /// Center point of the viewport.
    pub fn center(self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Half-extent per axis. This is the authoritative bound used when
    /// clamping the session offset.
    pub fn half_extent(self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Radius of the circular clip applied at commit time.
    pub fn clip_radius(self) -> f64 {
        self.width.min(self.height) / 2.0
    }

    /// Width over height.
    pub fn aspect_ratio(self) -> f64 {
        self.width / self.height
    }
}
