//! JPEG encoding for the mobile commit profile.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::EncodeError;

/// Encode an RGB buffer as JPEG.
///
/// Quality runs 1-100 and is clamped; the mobile commit profile uses 85 to
/// keep the payload small on constrained devices. Buffer and dimension
/// validation happens in [`super::encode_image`] before this is called, so
/// this function only deals with the encoder itself.
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    let quality = quality.clamp(1, 100);

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);

    encoder
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}
