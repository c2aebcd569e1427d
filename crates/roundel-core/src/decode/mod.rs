//! Image decoding for the avatar editor.
//!
//! Accepts the formats the file picker allows (JPEG, PNG, GIF, WEBP) and
//! normalizes everything to RGB pixel data. EXIF orientation is applied
//! during decode so phone photos come out upright; the hosting page never
//! has to think about it.
//!
//! All operations are synchronous and single-threaded within WASM.

mod types;

pub use types::{DecodeError, DecodedImage, Orientation};

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

/// Decode image bytes into RGB pixel data, applying EXIF orientation.
///
/// The format is sniffed from the bytes themselves rather than trusted from
/// the file's declared MIME type. Animated inputs (GIF, animated WEBP)
/// decode to their first frame.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the bytes are not a recognized
/// image format, `DecodeError::CorruptedFile` if decoding fails partway.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let orientation = extract_orientation(bytes);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let oriented = apply_orientation(img, orientation);
    let rgb = oriented.into_rgb8();

    let decoded = DecodedImage::from_rgb_image(rgb);
    if decoded.is_empty() {
        return Err(DecodeError::EmptyImage);
    }

    Ok(decoded)
}

/// Extract EXIF orientation from image bytes.
///
/// Returns `Orientation::Normal` if the container carries no EXIF data or
/// the orientation tag cannot be read (GIF never has one).
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

/// Apply an EXIF orientation transformation to a decoded image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
