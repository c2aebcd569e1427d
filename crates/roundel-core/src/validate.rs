//! Client-side file validation for uploaded avatar images.
//!
//! Validation is advisory only: it checks the declared MIME type and the
//! byte size before any decode work is attempted. A file that passes here
//! can still fail to decode.

use thiserror::Error;

/// Maximum accepted file size, 5 MiB.
pub const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

/// MIME types accepted by the editor.
pub const ACCEPTED_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Errors reported for files rejected before decoding.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The declared MIME type is not an accepted image format.
    #[error("Please select a valid image (JPEG, PNG, GIF, WEBP)")]
    UnsupportedType(String),

    /// The file exceeds the 5 MiB limit.
    #[error("The image must be smaller than 5MB")]
    TooLarge { size: usize },

    /// No file content was provided.
    #[error("No file was selected")]
    Empty,
}

/// A file picked by the user, as delivered by the hosting page's
/// file-selection control.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    /// Declared MIME type, e.g. `image/jpeg`.
    pub mime_type: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// File size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Check a selected file against the accepted types and size limit.
///
/// Returns `Ok(())` when the file may be handed to the decoder. No state is
/// touched on failure; the caller reports the error and keeps whatever
/// session it already has.
pub fn validate_file(file: &SelectedFile) -> Result<(), ValidationError> {
    if file.bytes.is_empty() {
        return Err(ValidationError::Empty);
    }

    if !ACCEPTED_TYPES.contains(&file.mime_type.as_str()) {
        return Err(ValidationError::UnsupportedType(file.mime_type.clone()));
    }

    if file.size() > MAX_FILE_BYTES {
        return Err(ValidationError::TooLarge { size: file.size() });
    }

    Ok(())
}
