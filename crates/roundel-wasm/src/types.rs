//! JS-friendly wrapper types for the editor binding.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use roundel_core::{EditorPhase, EncodedImage};

/// A committed avatar, exposed to JavaScript.
///
/// The data URL is what the page assigns to the preview element's `src`;
/// the raw bytes are available separately for upload paths that want the
/// binary instead of re-parsing the URL.
#[wasm_bindgen]
pub struct JsEncodedResult {
    mime: String,
    width: u32,
    height: u32,
    bytes: Vec<u8>,
    data_url: String,
}

#[wasm_bindgen]
impl JsEncodedResult {
    /// MIME type of the encoded bytes (`image/png` or `image/jpeg`).
    #[wasm_bindgen(getter)]
    pub fn mime(&self) -> String {
        self.mime.clone()
    }

    /// Pixel width of the committed surface.
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Pixel height of the committed surface.
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Encoded file bytes as a Uint8Array copy.
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// The `data:<mime>;base64,` URL of the committed image.
    #[wasm_bindgen(getter)]
    pub fn data_url(&self) -> String {
        self.data_url.clone()
    }
}

impl JsEncodedResult {
    pub(crate) fn from_encoded(encoded: &EncodedImage) -> Self {
        Self {
            mime: encoded.format.mime().to_string(),
            width: encoded.width,
            height: encoded.height,
            bytes: encoded.bytes.clone(),
            data_url: encoded.data_url(),
        }
    }
}

/// A serializable snapshot of the editor state, handed to JS as a plain
/// object for debugging overlays and tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorSnapshot {
    /// Phase name, e.g. `"editing"`.
    pub phase: String,
    /// Current zoom scale; identity when no session exists.
    pub scale: f64,
    /// Current pan offset.
    pub offset_x: f64,
    pub offset_y: f64,
    /// True once the session has been sealed by commit.
    pub committed: bool,
}

/// Stable lowercase name for a phase, used in snapshots and by the page's
/// CSS state classes.
pub(crate) fn phase_name(phase: EditorPhase) -> &'static str {
    match phase {
        EditorPhase::Empty => "empty",
        EditorPhase::Loading => "loading",
        EditorPhase::Editing => "editing",
        EditorPhase::Dragging => "dragging",
        EditorPhase::Pinching => "pinching",
        EditorPhase::Committing => "committing",
        EditorPhase::Committed => "committed",
    }
}
