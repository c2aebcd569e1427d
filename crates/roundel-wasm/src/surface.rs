//! Callback bridge between the core render surface and the hosting page.
//!
//! The page registers plain JavaScript functions for each UI effect it
//! wants to handle. Unregistered effects are skipped entirely, so a page
//! that only cares about the transform string and the final data URL can
//! register exactly those two. Callback exceptions are logged to the
//! console and otherwise ignored; a broken notice handler must not break
//! the edit session.

use js_sys::Function;
use wasm_bindgen::JsValue;

use roundel_core::decode::DecodedImage;
use roundel_core::{EncodedImage, RenderSurface, TransformState};

/// A [`RenderSurface`] that forwards every operation to optional JS
/// callbacks.
#[derive(Default)]
pub struct CallbackSurface {
    on_preview: Option<Function>,
    on_transform: Option<Function>,
    on_controls: Option<Function>,
    on_indicator: Option<Function>,
    on_indicator_cleared: Option<Function>,
    on_result: Option<Function>,
    on_notice: Option<Function>,
}

fn warn_failure(error: JsValue) {
    web_sys::console::warn_2(&JsValue::from_str("surface callback failed:"), &error);
}

impl CallbackSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_on_preview(&mut self, callback: Function) {
        self.on_preview = Some(callback);
    }

    pub fn set_on_transform(&mut self, callback: Function) {
        self.on_transform = Some(callback);
    }

    pub fn set_on_controls(&mut self, callback: Function) {
        self.on_controls = Some(callback);
    }

    pub fn set_on_indicator(&mut self, callback: Function) {
        self.on_indicator = Some(callback);
    }

    pub fn set_on_indicator_cleared(&mut self, callback: Function) {
        self.on_indicator_cleared = Some(callback);
    }

    pub fn set_on_result(&mut self, callback: Function) {
        self.on_result = Some(callback);
    }

    pub fn set_on_notice(&mut self, callback: Function) {
        self.on_notice = Some(callback);
    }

    /// Clone of the indicator-cleared callback, used by the commit safety
    /// timeout.
    pub(crate) fn indicator_cleared_fn(&self) -> Option<Function> {
        self.on_indicator_cleared.clone()
    }
}

impl RenderSurface for CallbackSurface {
    fn present_preview(&mut self, image: &DecodedImage) {
        if let Some(f) = &self.on_preview {
            let width = JsValue::from_f64(f64::from(image.width));
            let height = JsValue::from_f64(f64::from(image.height));
            if let Err(e) = f.call2(&JsValue::NULL, &width, &height) {
                warn_failure(e);
            }
        }
    }

    fn set_preview_transform(&mut self, transform: &TransformState) {
        if let Some(f) = &self.on_transform {
            let arg = JsValue::from_str(&transform.css_string());
            if let Err(e) = f.call1(&JsValue::NULL, &arg) {
                warn_failure(e);
            }
        }
    }

    fn set_controls_visible(&mut self, visible: bool) {
        if let Some(f) = &self.on_controls {
            if let Err(e) = f.call1(&JsValue::NULL, &JsValue::from_bool(visible)) {
                warn_failure(e);
            }
        }
    }

    fn show_indicator(&mut self, text: &str) {
        if let Some(f) = &self.on_indicator {
            if let Err(e) = f.call1(&JsValue::NULL, &JsValue::from_str(text)) {
                warn_failure(e);
            }
        }
    }

    fn clear_indicator(&mut self) {
        if let Some(f) = &self.on_indicator_cleared {
            if let Err(e) = f.call0(&JsValue::NULL) {
                warn_failure(e);
            }
        }
    }

    fn replace_preview_with_result(&mut self, result: &EncodedImage) {
        if let Some(f) = &self.on_result {
            let arg = JsValue::from_str(&result.data_url());
            if let Err(e) = f.call1(&JsValue::NULL, &arg) {
                warn_failure(e);
            }
        }
    }

    fn show_notice(&mut self, text: &str) {
        if let Some(f) = &self.on_notice {
            if let Err(e) = f.call1(&JsValue::NULL, &JsValue::from_str(text)) {
                warn_failure(e);
            }
        }
    }
}
