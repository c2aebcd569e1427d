//! The seam between the engine and the hosting page.
//!
//! The editor never reaches into a UI tree. Every visual side effect is an
//! operation on [`RenderSurface`], so a real page, a JS callback bridge or
//! a test recorder can all sit behind the same session logic.

use crate::decode::DecodedImage;
use crate::encode::EncodedImage;
use crate::transform::TransformState;

/// Visual operations the editor needs from its host.
///
/// Implementations are expected to be cheap and non-blocking; the editor
/// calls [`set_preview_transform`](RenderSurface::set_preview_transform) on
/// every pointer move. Notices shown via
/// [`show_notice`](RenderSurface::show_notice) are transient and
/// auto-dismiss after a couple of seconds; their lifetime is the surface's
/// concern, not the editor's.
pub trait RenderSurface {
    /// Show a freshly decoded image in the editable preview element.
    fn present_preview(&mut self, image: &DecodedImage);

    /// Write the current transform to the preview element. The CSS form is
    /// available via [`TransformState::css_string`].
    fn set_preview_transform(&mut self, transform: &TransformState);

    /// Show or remove the edit controls (zoom in/out, reset, save).
    fn set_controls_visible(&mut self, visible: bool);

    /// Show the processing indicator with the given label.
    fn show_indicator(&mut self, text: &str);

    /// Remove the processing indicator.
    fn clear_indicator(&mut self);

    /// Swap the preview element's image source for the committed result.
    fn replace_preview_with_result(&mut self, result: &EncodedImage);

    /// Show a transient, auto-dismissing notification.
    fn show_notice(&mut self, text: &str);
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Preview { width: u32, height: u32 },
    Transform(String),
    Controls(bool),
    Indicator(String),
    IndicatorCleared,
    Result { data_url: String },
    Notice(String),
}

/// A surface that records every call, for driving the editor in tests.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub events: Vec<SurfaceEvent>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last transform string written, if any.
    pub fn last_transform(&self) -> Option<&str> {
        self.events.iter().rev().find_map(|e| match e {
            SurfaceEvent::Transform(t) => Some(t.as_str()),
            _ => None,
        })
    }

    /// True if an indicator was shown and later cleared.
    pub fn indicator_balanced(&self) -> bool {
        let shown = self
            .events
            .iter()
            .filter(|e| matches!(e, SurfaceEvent::Indicator(_)))
            .count();
        let cleared = self
            .events
            .iter()
            .filter(|e| matches!(e, SurfaceEvent::IndicatorCleared))
            .count();
        shown == cleared
    }
}

impl RenderSurface for RecordingSurface {
    fn present_preview(&mut self, image: &DecodedImage) {
        self.events.push(SurfaceEvent::Preview {
            width: image.width,
            height: image.height,
        });
    }

    fn set_preview_transform(&mut self, transform: &TransformState) {
        self.events
            .push(SurfaceEvent::Transform(transform.css_string()));
    }

    fn set_controls_visible(&mut self, visible: bool) {
        self.events.push(SurfaceEvent::Controls(visible));
    }

    fn show_indicator(&mut self, text: &str) {
        self.events.push(SurfaceEvent::Indicator(text.to_string()));
    }

    fn clear_indicator(&mut self) {
        self.events.push(SurfaceEvent::IndicatorCleared);
    }

    fn replace_preview_with_result(&mut self, result: &EncodedImage) {
        self.events.push(SurfaceEvent::Result {
            data_url: result.data_url(),
        });
    }

    fn show_notice(&mut self, text: &str) {
        self.events.push(SurfaceEvent::Notice(text.to_string()));
    }
}
