//! Device-capability configuration for the commit raster pass.
//!
//! The raster algorithm itself is capability-agnostic. Everything that
//! varies by device (how much supersampling the surface gets, which output
//! format, what JPEG quality) lives in a [`CommitProfile`] resolved once at
//! commit time by a pluggable probe function. The wasm crate supplies a
//! probe that inspects the browser; native callers and tests use
//! [`default_probe`] or build profiles directly.

use serde::{Deserialize, Serialize};

use crate::encode::OutputFormat;
use crate::Viewport;

/// Coarse device classification driving the commit profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeviceClass {
    /// Desktop-class device: plenty of memory, PNG output.
    #[default]
    Desktop,
    /// Constrained/mobile device: capped raster surface, JPEG output to
    /// bound payload size.
    Mobile,
}

/// Resolves the commit profile for a viewport. Called once per commit.
pub type CapabilityProbe = fn(Viewport) -> CommitProfile;

/// Raster and encode settings for one commit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommitProfile {
    /// Supersampling factor applied to the viewport dimensions when sizing
    /// the raster surface.
    pub quality_factor: f64,
    /// Output encoding for the committed image.
    pub format: OutputFormat,
    /// JPEG quality (1-100). Ignored for PNG output.
    pub jpeg_quality: u8,
    /// RGB background filled behind the image and outside the circular
    /// clip, so the output has no transparent fringing.
    pub background: [u8; 3],
}

impl Default for CommitProfile {
    fn default() -> Self {
        Self::desktop(1.0)
    }
}

impl CommitProfile {
    /// Desktop profile: PNG at full quality, supersampled up to 3x for
    /// high-density displays.
    pub fn desktop(device_pixel_ratio: f64) -> Self {
        Self {
            quality_factor: device_pixel_ratio.clamp(1.0, 3.0),
            format: OutputFormat::Png,
            jpeg_quality: 92,
            background: [255, 255, 255],
        }
    }

    /// Mobile profile: JPEG at reduced quality, supersampling capped at 2x
    /// to bound memory and encode time.
    pub fn mobile(device_pixel_ratio: f64) -> Self {
        Self {
            quality_factor: device_pixel_ratio.clamp(1.0, 2.0),
            format: OutputFormat::Jpeg,
            jpeg_quality: 85,
            background: [255, 255, 255],
        }
    }

    /// Profile for a device class and pixel ratio.
    pub fn for_class(class: DeviceClass, device_pixel_ratio: f64) -> Self {
        match class {
            DeviceClass::Desktop => Self::desktop(device_pixel_ratio),
            DeviceClass::Mobile => Self::mobile(device_pixel_ratio),
        }
    }
}

/// Probe used when no platform detection is wired up: a plain desktop
/// profile at 1x.
pub fn default_probe(_viewport: Viewport) -> CommitProfile {
    CommitProfile::desktop(1.0)
}
