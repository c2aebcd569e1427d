//! The stateful editor binding driven by page events.
//!
//! The page forwards raw input (file bytes, pointer and touch positions)
//! and the editor pushes UI effects back through the registered callbacks.
//! Coordinates are expected relative to the viewport element, in CSS
//! pixels, exactly as the page reads them off its event objects.

use gloo_timers::callback::Timeout;
use js_sys::Function;
use wasm_bindgen::prelude::*;

use roundel_core::{transform::ZOOM_STEP, ImageEditor, SelectedFile, Vec2, Viewport};

use crate::capability::detect_commit_profile;
use crate::surface::CallbackSurface;
use crate::types::{phase_name, EditorSnapshot, JsEncodedResult};

/// Backstop that force-clears the processing indicator if the commit
/// pipeline stalls. Does not abort the underlying raster work and never
/// touches the committed state.
const INDICATOR_TIMEOUT_MS: u32 = 10_000;

/// One circular avatar editor, bound to a viewport element on the page.
#[wasm_bindgen]
pub struct AvatarEditor {
    inner: ImageEditor<CallbackSurface>,
    indicator_timeout: Option<Timeout>,
}

#[wasm_bindgen]
impl AvatarEditor {
    /// Create an editor for a viewport of the given CSS pixel size.
    #[wasm_bindgen(constructor)]
    pub fn new(viewport_width: f64, viewport_height: f64) -> AvatarEditor {
        let viewport = Viewport::new(viewport_width, viewport_height);
        AvatarEditor {
            inner: ImageEditor::with_probe(CallbackSurface::new(), viewport, detect_commit_profile),
            indicator_timeout: None,
        }
    }

    /// Called with `(width, height)` when a new image is decoded.
    pub fn set_on_preview(&mut self, callback: Function) {
        self.inner.surface_mut().set_on_preview(callback);
    }

    /// Called with the CSS transform string on every scale/offset change.
    pub fn set_on_transform(&mut self, callback: Function) {
        self.inner.surface_mut().set_on_transform(callback);
    }

    /// Called with a boolean when the edit controls should show or hide.
    pub fn set_on_controls(&mut self, callback: Function) {
        self.inner.surface_mut().set_on_controls(callback);
    }

    /// Called with the indicator label when commit processing starts.
    pub fn set_on_indicator(&mut self, callback: Function) {
        self.inner.surface_mut().set_on_indicator(callback);
    }

    /// Called with no arguments when the indicator should be removed.
    pub fn set_on_indicator_cleared(&mut self, callback: Function) {
        self.inner.surface_mut().set_on_indicator_cleared(callback);
    }

    /// Called with the committed data URL after a successful commit.
    pub fn set_on_result(&mut self, callback: Function) {
        self.inner.surface_mut().set_on_result(callback);
    }

    /// Called with a message for each transient notification.
    pub fn set_on_notice(&mut self, callback: Function) {
        self.inner.surface_mut().set_on_notice(callback);
    }

    /// Load a selected file. Validation and decode failures surface a
    /// notice and return an error message; existing state is untouched.
    pub fn load_file(&mut self, bytes: &[u8], mime_type: &str) -> Result<(), JsValue> {
        let file = SelectedFile::new(mime_type, bytes.to_vec());
        self.inner
            .load_file(&file)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Mouse down or single-finger touch start.
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.inner.begin_drag(Vec2::new(x, y));
    }

    /// Mouse move or single-finger touch move.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.inner.continue_drag(Vec2::new(x, y));
    }

    /// Mouse up.
    pub fn pointer_up(&mut self) {
        self.inner.end_drag();
    }

    /// Two-finger touch move.
    pub fn pinch(&mut self, ax: f64, ay: f64, bx: f64, by: f64) {
        self.inner.pinch_zoom(Vec2::new(ax, ay), Vec2::new(bx, by));
    }

    /// Touch end; `remaining` is the number of touches still down.
    pub fn touches_ended(&mut self, remaining: u32) {
        self.inner.touches_ended(remaining as usize);
    }

    /// Touch cancel.
    pub fn touches_cancelled(&mut self) {
        self.inner.touches_cancelled();
    }

    /// The `+` control.
    pub fn zoom_in(&mut self) {
        self.inner.zoom_by(ZOOM_STEP);
    }

    /// The `-` control.
    pub fn zoom_out(&mut self) {
        self.inner.zoom_by(-ZOOM_STEP);
    }

    /// Zoom by an arbitrary delta.
    pub fn zoom_by(&mut self, delta: f64) {
        self.inner.zoom_by(delta);
    }

    /// The reset control.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Rasterize and seal the session. Returns true when a result was
    /// produced. A commit with no editable image is a non-event and
    /// returns false; processing failures also return false after
    /// surfacing their notice, and the session stays retryable.
    pub fn commit(&mut self) -> bool {
        // Arm the backstop before any raster work so a stalled pipeline
        // still clears the page's indicator.
        if let Some(clear) = self.inner.surface().indicator_cleared_fn() {
            self.indicator_timeout = Some(Timeout::new(INDICATOR_TIMEOUT_MS, move || {
                let _ = clear.call0(&JsValue::NULL);
            }));
        }

        let outcome = self.inner.commit();

        if let Some(timeout) = self.indicator_timeout.take() {
            timeout.cancel();
        }

        outcome.is_ok()
    }

    /// Current phase name: `empty`, `editing`, `dragging`, `pinching`,
    /// `committing` or `committed`.
    pub fn phase(&self) -> String {
        phase_name(self.inner.phase()).to_string()
    }

    /// Current CSS transform string, if a session exists.
    pub fn transform_string(&self) -> Option<String> {
        self.inner.transform().map(|t| t.css_string())
    }

    /// Data URL of the committed image, present only after commit.
    pub fn committed_data_url(&self) -> Option<String> {
        self.inner.encoded_result().map(|r| r.data_url())
    }

    /// Full committed result with bytes and metadata.
    pub fn committed_result(&self) -> Option<JsEncodedResult> {
        self.inner.encoded_result().map(JsEncodedResult::from_encoded)
    }

    /// Plain-object snapshot of the editor state.
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        let transform = self.inner.transform().unwrap_or_default();
        let snapshot = EditorSnapshot {
            phase: self.phase(),
            scale: transform.scale,
            offset_x: transform.offset.x,
            offset_y: transform.offset.y,
            committed: self.committed_data_url().is_some(),
        };
        serde_wasm_bindgen::to_value(&snapshot).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_editor_is_empty() {
        let editor = AvatarEditor::new(100.0, 100.0);
        assert_eq!(editor.phase(), "empty");
        assert!(editor.transform_string().is_none());
        assert!(editor.committed_data_url().is_none());
    }

    #[test]
    fn test_inputs_without_session_are_noops() {
        let mut editor = AvatarEditor::new(100.0, 100.0);
        editor.pointer_down(10.0, 10.0);
        editor.pointer_move(20.0, 20.0);
        editor.pointer_up();
        editor.pinch(0.0, 0.0, 50.0, 0.0);
        editor.zoom_in();
        editor.reset();

        assert_eq!(editor.phase(), "empty");
    }

    #[test]
    fn test_commit_without_session_is_false() {
        let mut editor = AvatarEditor::new(100.0, 100.0);
        assert!(!editor.commit());
        assert_eq!(editor.phase(), "empty");
    }
}
