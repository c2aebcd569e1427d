//! Committed-image encoding.
//!
//! The commit pipeline hands its composed RGB surface here to be encoded as
//! PNG (desktop profile, lossless) or JPEG (mobile profile, bounded payload
//! size). The result carries the raw bytes and can render itself as a
//! base64 data URL for the hosting page to put straight into an `img` src.
//!
//! All operations are synchronous and single-threaded within WASM.

mod jpeg;
mod png;

pub use jpeg::encode_jpeg;
pub use png::encode_png;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::DecodedImage;

/// Errors that can occur while encoding the committed image.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("Image encoding failed: {0}")]
    EncodingFailed(String),
}

/// Output format of a committed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Lossless PNG, the desktop default.
    #[default]
    Png,
    /// JPEG with configurable quality, used on constrained devices.
    Jpeg,
}

impl OutputFormat {
    /// MIME type used in the data URL.
    pub fn mime(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
        }
    }
}

/// The encoded artifact produced by a successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// Encoding of `bytes`.
    pub format: OutputFormat,
    /// Pixel width of the encoded surface.
    pub width: u32,
    /// Pixel height of the encoded surface.
    pub height: u32,
    /// The encoded file bytes.
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    /// Render as a `data:<mime>;base64,<payload>` URL, the form the
    /// hosting page assigns to the preview element's image source.
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime(),
            STANDARD.encode(&self.bytes)
        )
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Encode a composed surface in the requested format.
///
/// `jpeg_quality` is only consulted for JPEG output and is clamped to
/// 1-100 by the encoder.
pub fn encode_image(
    image: &DecodedImage,
    format: OutputFormat,
    jpeg_quality: u8,
) -> Result<EncodedImage, EncodeError> {
    validate_buffer(image)?;

    let bytes = match format {
        OutputFormat::Png => encode_png(&image.pixels, image.width, image.height)?,
        OutputFormat::Jpeg => encode_jpeg(&image.pixels, image.width, image.height, jpeg_quality)?,
    };

    Ok(EncodedImage {
        format,
        width: image.width,
        height: image.height,
        bytes,
    })
}

/// Shared dimension and buffer-length validation for both encoders.
fn validate_buffer(image: &DecodedImage) -> Result<(), EncodeError> {
    if image.width == 0 || image.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }

    let expected = (image.width as usize) * (image.height as usize) * 3;
    if image.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: image.pixels.len(),
        });
    }

    Ok(())
}
