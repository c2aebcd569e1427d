//! Types produced by the decoder.

use thiserror::Error;

/// Ways a selected file can fail to decode. All of these surface as a
/// transient notice; no session is created.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes don't sniff as any image format the editor accepts.
    #[error("The selected file is not a readable image")]
    InvalidFormat,

    /// Decoding started but failed partway, usually a truncated upload.
    #[error("The image could not be read: {0}")]
    CorruptedFile(String),

    /// Decoding succeeded but produced zero pixels.
    #[error("The image has no pixels")]
    EmptyImage,
}

/// EXIF orientation tag, values 1 through 8.
///
/// Phone cameras store the sensor data unrotated and record how the device
/// was held here. The decoder bakes the correction into the pixel data so
/// nothing downstream has to care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Orientation {
    /// Upright, nothing to do.
    #[default]
    Normal = 1,
    /// Mirrored left-right.
    FlipHorizontal = 2,
    /// Upside down.
    Rotate180 = 3,
    /// Mirrored top-bottom.
    FlipVertical = 4,
    /// Mirrored across the main diagonal.
    Transpose = 5,
    /// Quarter turn clockwise.
    Rotate90CW = 6,
    /// Mirrored across the anti-diagonal.
    Transverse = 7,
    /// Quarter turn counterclockwise.
    Rotate270CW = 8,
}

impl From<u32> for Orientation {
    /// Tag values outside 1-8 are treated as upright rather than rejected;
    /// a bad orientation should never block a load.
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// A decoded, orientation-corrected source image.
///
/// Pixels are tightly packed RGB, row-major, three bytes each. This is the
/// form the session holds for its whole lifetime and the form the commit
/// compositor samples from.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Wrap a raw RGB buffer. The buffer length must be
    /// `width * height * 3`.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width as usize) * (height as usize) * 3,
            "RGB buffer length does not match dimensions"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Take ownership of an `image` crate RGB buffer.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Width over height, the quantity cover fit is computed from.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Length of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// True when either dimension is zero or the buffer is missing.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_tag_mapping() {
        assert_eq!(Orientation::from(1), Orientation::Normal);
        assert_eq!(Orientation::from(3), Orientation::Rotate180);
        assert_eq!(Orientation::from(8), Orientation::Rotate270CW);
    }

    #[test]
    fn test_out_of_range_tag_is_upright() {
        assert_eq!(Orientation::from(0), Orientation::Normal);
        assert_eq!(Orientation::from(9), Orientation::Normal);
        assert_eq!(Orientation::from(4096), Orientation::Normal);
    }

    #[test]
    fn test_decoded_image_accessors() {
        let img = DecodedImage::new(40, 30, vec![7u8; 40 * 30 * 3]);

        assert_eq!(img.byte_size(), 40 * 30 * 3);
        assert!(!img.is_empty());
        assert!((img.aspect_ratio() - 40.0 / 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_sized_image_is_empty() {
        assert!(DecodedImage::new(0, 0, vec![]).is_empty());
    }

    #[test]
    fn test_from_rgb_image_keeps_layout() {
        let src = image::RgbImage::from_fn(3, 2, |x, y| image::Rgb([x as u8, y as u8, 9]));
        let img = DecodedImage::from_rgb_image(src);

        assert_eq!(img.width, 3);
        assert_eq!(img.height, 2);
        // Second pixel of the first row.
        assert_eq!(&img.pixels[3..6], &[1, 0, 9]);
    }

    #[test]
    fn test_error_messages_read_as_notices() {
        assert_eq!(
            DecodeError::InvalidFormat.to_string(),
            "The selected file is not a readable image"
        );
        assert_eq!(
            DecodeError::CorruptedFile("unexpected EOF".into()).to_string(),
            "The image could not be read: unexpected EOF"
        );
    }
}
