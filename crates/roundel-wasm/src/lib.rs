//! Roundel WASM - WebAssembly bindings for the Roundel avatar editor
//!
//! This crate exposes the roundel-core edit session to JavaScript. The
//! hosting page keeps ownership of the DOM: it forwards file selections and
//! pointer/touch events into the editor and receives UI effects back
//! through registered callbacks (preview transform strings, indicator
//! show/hide, the committed data URL).
//!
//! # Module Structure
//!
//! - `session` - The stateful editor binding driven by page events
//! - `surface` - Callback bridge implementing the core render surface
//! - `capability` - Browser device probe for the commit profile
//! - `types` - JS-friendly wrapper and snapshot types
//!
//! # Usage
//!
//! ```typescript
//! import init, { AvatarEditor } from '@roundel/wasm';
//!
//! await init();
//!
//! const editor = new AvatarEditor(circle.clientWidth, circle.clientHeight);
//! editor.set_on_transform((t) => { img.style.transform = t; });
//! editor.set_on_result((url) => { img.src = url; });
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! editor.load_file(bytes, file.type);
//! ```

use wasm_bindgen::prelude::*;

mod capability;
mod session;
mod surface;
mod types;

// Re-export public types
pub use capability::detect_commit_profile;
pub use session::AvatarEditor;
pub use surface::CallbackSurface;
pub use types::{EditorSnapshot, JsEncodedResult};

/// Module entry point, run automatically when the WASM loads.
#[wasm_bindgen(start)]
pub fn init() {
    // TODO: install console_error_panic_hook once the dependency is added,
    // so panics show up readably in the browser console.
}

/// Crate version, for the page's debug overlay.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
