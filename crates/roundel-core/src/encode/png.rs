//! PNG encoding for the desktop commit profile.

use std::io::Cursor;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::EncodeError;

/// Encode RGB pixel data to PNG bytes.
///
/// PNG is lossless, so there is no quality knob; the desktop commit profile
/// always uses it. Buffer and dimension validation happens in
/// [`super::encode_image`] before this is called.
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    let mut buffer = Cursor::new(Vec::new());
    let encoder = PngEncoder::new(&mut buffer);

    encoder
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}
