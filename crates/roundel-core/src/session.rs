//! The edit session and its state machine.
//!
//! One [`ImageEditor`] owns at most one session at a time. A session is
//! created by a successful file load, mutated by gestures and the zoom
//! controls, and sealed by commit. Loading a new file replaces the session
//! wholesale; there is no partial reuse and no way back from committed to
//! editable.
//!
//! ```text
//! Empty -> Loading -> Editing <-> (Dragging | Pinching)
//!                        |
//!                   Committing -> Committed -> (new load) -> Loading
//! ```
//!
//! Edit operations on a committed or committing session are silent no-ops,
//! matching how the surrounding UI treats them.

use thiserror::Error;

use crate::capability::{default_probe, CapabilityProbe};
use crate::decode::{decode_image, DecodeError, DecodedImage};
use crate::encode::EncodedImage;
use crate::gesture::GestureTracker;
use crate::raster::{self, ProcessingError};
use crate::surface::RenderSurface;
use crate::transform::TransformState;
use crate::validate::{validate_file, SelectedFile, ValidationError};
use crate::{Vec2, Viewport};

/// Top-level error taxonomy for editor operations.
///
/// Every failure is handled at the point of occurrence and surfaced as a
/// transient notice; none are fatal. The editor is always left in a usable
/// `Editing` or `Empty` state.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The selected file failed type or size validation. No state change.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The file could not be decoded. No session is created.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Rasterizing or encoding the commit failed. The session stays
    /// uncommitted and commit may be retried.
    #[error(transparent)]
    Processing(#[from] ProcessingError),

    /// The operation needs an active, uncommitted session.
    #[error("No editable image")]
    NoImage,

    /// A commit is already in flight for this session.
    #[error("Save already in progress")]
    CommitInFlight,
}

/// Observable editor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EditorPhase {
    /// No session; waiting for a file.
    Empty,
    /// A file is being validated and decoded.
    Loading,
    /// Session active, no gesture in progress.
    Editing,
    /// Single-pointer drag in progress.
    Dragging,
    /// Two-finger pinch in progress.
    Pinching,
    /// A commit is in flight; edits are rejected.
    Committing,
    /// Session sealed; only a new load leaves this state.
    Committed,
}

/// One image edit session. Created per file load, discarded on the next.
#[derive(Debug)]
struct EditSession {
    image: DecodedImage,
    transform: TransformState,
    gesture: GestureTracker,
    committing: bool,
    committed: bool,
    encoded: Option<EncodedImage>,
}

impl EditSession {
    fn new(image: DecodedImage) -> Self {
        Self {
            image,
            transform: TransformState::identity(),
            gesture: GestureTracker::new(),
            committing: false,
            committed: false,
            encoded: None,
        }
    }

    fn editable(&self) -> bool {
        !self.committed && !self.committing
    }
}

/// Manages one avatar edit session end-to-end: ingestion, interactive
/// transform, committed raster production.
pub struct ImageEditor<S: RenderSurface> {
    surface: S,
    viewport: Viewport,
    probe: CapabilityProbe,
    session: Option<EditSession>,
}

impl<S: RenderSurface> ImageEditor<S> {
    /// Editor with the default (desktop, 1x) commit profile.
    pub fn new(surface: S, viewport: Viewport) -> Self {
        Self::with_probe(surface, viewport, default_probe)
    }

    /// Editor with a platform capability probe, consulted once per commit.
    pub fn with_probe(surface: S, viewport: Viewport, probe: CapabilityProbe) -> Self {
        Self {
            surface,
            viewport,
            probe,
            session: None,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Current phase of the state machine.
    pub fn phase(&self) -> EditorPhase {
        match &self.session {
            None => EditorPhase::Empty,
            Some(s) if s.committed => EditorPhase::Committed,
            Some(s) if s.committing => EditorPhase::Committing,
            Some(s) if s.gesture.is_pinching() => EditorPhase::Pinching,
            Some(s) if s.gesture.is_dragging() => EditorPhase::Dragging,
            Some(_) => EditorPhase::Editing,
        }
    }

    /// Current transform, if a session exists.
    pub fn transform(&self) -> Option<TransformState> {
        self.session.as_ref().map(|s| s.transform)
    }

    /// Committed output, present only after a successful commit.
    pub fn encoded_result(&self) -> Option<&EncodedImage> {
        self.session.as_ref().and_then(|s| s.encoded.as_ref())
    }

    /// Load a user-selected file, replacing any prior session.
    ///
    /// Validation failures leave existing state untouched; decode failures
    /// likewise. On success the new session starts at identity and any
    /// previously committed result is discarded.
    pub fn load_file(&mut self, file: &SelectedFile) -> Result<(), EditorError> {
        if let Err(e) = validate_file(file) {
            self.surface.show_notice(&e.to_string());
            return Err(e.into());
        }

        let image = match decode_image(&file.bytes) {
            Ok(image) => image,
            Err(e) => {
                self.surface.show_notice(&e.to_string());
                return Err(e.into());
            }
        };

        let session = EditSession::new(image);
        self.surface.present_preview(&session.image);
        self.surface.set_preview_transform(&session.transform);
        self.surface.set_controls_visible(true);
        self.session = Some(session);

        Ok(())
    }

    /// Start a single-pointer drag at `pointer`.
    pub fn begin_drag(&mut self, pointer: Vec2) {
        if let Some(s) = self.session.as_mut() {
            if s.editable() {
                s.gesture.begin_drag(pointer, s.transform.offset);
            }
        }
    }

    /// Apply a pointer move to the active drag. No-op when no drag is
    /// active or the session is not editable.
    pub fn continue_drag(&mut self, pointer: Vec2) {
        let viewport = self.viewport;
        if let Some(s) = self.session.as_mut() {
            if !s.editable() {
                return;
            }
            if let Some(target) = s.gesture.drag_target(pointer) {
                s.transform.set_offset(target, viewport);
                self.surface.set_preview_transform(&s.transform);
            }
        }
    }

    /// End the drag. Idempotent.
    pub fn end_drag(&mut self) {
        if let Some(s) = self.session.as_mut() {
            s.gesture.end_drag();
        }
    }

    /// Feed a two-finger pinch update. The first event of a gesture only
    /// records the baseline; later events rescale around it.
    pub fn pinch_zoom(&mut self, touch_a: Vec2, touch_b: Vec2) {
        let viewport = self.viewport;
        if let Some(s) = self.session.as_mut() {
            if !s.editable() {
                return;
            }
            let current = s.transform.scale;
            if let Some(new_scale) = s.gesture.pinch_update(touch_a, touch_b, current) {
                s.transform.set_scale(new_scale, viewport);
                self.surface.set_preview_transform(&s.transform);
            }
        }
    }

    /// Report touches lifting; `remaining` is the touch count still down.
    pub fn touches_ended(&mut self, remaining: usize) {
        if let Some(s) = self.session.as_mut() {
            s.gesture.touches_ended(remaining);
        }
    }

    /// Platform cancelled the gesture stream.
    pub fn touches_cancelled(&mut self) {
        if let Some(s) = self.session.as_mut() {
            s.gesture.cancel();
        }
    }

    /// Discrete zoom control. Saturates at the scale domain.
    pub fn zoom_by(&mut self, delta: f64) {
        let viewport = self.viewport;
        if let Some(s) = self.session.as_mut() {
            if s.editable() {
                s.transform.zoom_by(delta, viewport);
                self.surface.set_preview_transform(&s.transform);
            }
        }
    }

    /// Back to scale 1, centered.
    pub fn reset(&mut self) {
        if let Some(s) = self.session.as_mut() {
            if s.editable() {
                s.transform.reset();
                self.surface.set_preview_transform(&s.transform);
            }
        }
    }

    /// Rasterize and encode the current view, sealing the session.
    ///
    /// The processing indicator is visible for the duration and cleared on
    /// both success and failure. On success the preview is replaced with
    /// the encoded result, the controls are removed and the transform is
    /// reset (cosmetic; the committed buffer is unaffected). On failure
    /// the session stays editable and commit may be retried.
    pub fn commit(&mut self) -> Result<(), EditorError> {
        let session = self.session.as_mut().ok_or(EditorError::NoImage)?;
        if session.committed {
            return Err(EditorError::NoImage);
        }
        if session.committing {
            return Err(EditorError::CommitInFlight);
        }

        session.committing = true;
        self.surface.show_indicator("Processing image");

        let profile = (self.probe)(self.viewport);
        let result =
            raster::commit_pipeline(&session.image, session.transform, self.viewport, &profile);

        session.committing = false;
        self.surface.clear_indicator();

        match result {
            Ok(encoded) => {
                self.surface.replace_preview_with_result(&encoded);
                self.surface.set_controls_visible(false);
                session.gesture.cancel();
                session.transform.reset();
                session.committed = true;
                session.encoded = Some(encoded);
                self.surface.set_preview_transform(&session.transform);
                self.surface.show_notice("Image saved");
                Ok(())
            }
            Err(e) => {
                self.surface.show_notice(&e.to_string());
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::CommitProfile;
    use crate::encode::OutputFormat;
    use crate::surface::{RecordingSurface, SurfaceEvent};
    use image::codecs::png::PngEncoder;
    use image::{ExtendedColorType, ImageEncoder, RgbImage};

    const VP: Viewport = Viewport {
        width: 100.0,
        height: 100.0,
    };

    fn png_file(width: u32, height: u32) -> SelectedFile {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 77])
        });
        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes)
            .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
            .expect("png encode");
        SelectedFile::new("image/png", bytes)
    }

    fn jpeg_file(width: u32, height: u32) -> SelectedFile {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, 99, (y % 256) as u8])
        });
        let mut bytes = Vec::new();
        image::codecs::jpeg::JpegEncoder::new(&mut bytes)
            .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
            .expect("jpeg encode");
        SelectedFile::new("image/jpeg", bytes)
    }

    fn editor() -> ImageEditor<RecordingSurface> {
        ImageEditor::new(RecordingSurface::new(), VP)
    }

    fn loaded_editor() -> ImageEditor<RecordingSurface> {
        let mut ed = editor();
        ed.load_file(&png_file(120, 120)).expect("load");
        ed
    }

    fn assert_invariant(ed: &ImageEditor<RecordingSurface>) {
        if let Some(t) = ed.transform() {
            assert!(t.satisfies_bounds(ed.viewport()), "bounds violated: {t:?}");
        }
    }

    #[test]
    fn test_starts_empty() {
        let ed = editor();
        assert_eq!(ed.phase(), EditorPhase::Empty);
        assert!(ed.transform().is_none());
        assert!(ed.encoded_result().is_none());
    }

    #[test]
    fn test_load_enters_editing_at_identity() {
        let ed = loaded_editor();
        assert_eq!(ed.phase(), EditorPhase::Editing);
        assert!(ed.transform().unwrap().is_identity());
        assert_eq!(
            ed.surface().last_transform(),
            Some("scale(1) translate(0px, 0px)")
        );
    }

    #[test]
    fn test_load_accepts_jpeg() {
        let mut ed = editor();
        ed.load_file(&jpeg_file(90, 140)).expect("load jpeg");

        assert_eq!(ed.phase(), EditorPhase::Editing);
        assert!(ed.transform().unwrap().is_identity());
    }

    #[test]
    fn test_load_rejects_bad_type_without_state_change() {
        let mut ed = loaded_editor();
        ed.zoom_by(0.5);
        let before = ed.transform();

        let result = ed.load_file(&SelectedFile::new("text/plain", vec![1, 2, 3]));
        assert!(matches!(result, Err(EditorError::Validation(_))));

        // Prior session untouched.
        assert_eq!(ed.phase(), EditorPhase::Editing);
        assert_eq!(ed.transform(), before);
    }

    #[test]
    fn test_load_rejects_oversized_file() {
        let mut ed = editor();
        let result = ed.load_file(&SelectedFile::new("image/png", vec![0u8; 6 * 1024 * 1024]));
        assert!(matches!(result, Err(EditorError::Validation(_))));
        assert_eq!(ed.phase(), EditorPhase::Empty);
    }

    #[test]
    fn test_load_rejects_undecodable_bytes() {
        let mut ed = editor();
        let result = ed.load_file(&SelectedFile::new("image/png", vec![0u8; 64]));
        assert!(matches!(result, Err(EditorError::Decode(_))));
        assert_eq!(ed.phase(), EditorPhase::Empty);
    }

    #[test]
    fn test_drag_updates_offset_in_order() {
        let mut ed = loaded_editor();
        ed.zoom_by(1.0); // scale 2, offset bound 50

        ed.begin_drag(Vec2::new(10.0, 10.0));
        assert_eq!(ed.phase(), EditorPhase::Dragging);

        ed.continue_drag(Vec2::new(25.0, 18.0));
        assert_eq!(ed.transform().unwrap().offset, Vec2::new(15.0, 8.0));

        ed.continue_drag(Vec2::new(200.0, 10.0));
        assert_eq!(ed.transform().unwrap().offset, Vec2::new(50.0, 0.0));
        assert_invariant(&ed);

        ed.end_drag();
        assert_eq!(ed.phase(), EditorPhase::Editing);
    }

    #[test]
    fn test_continue_drag_without_begin_is_noop() {
        let mut ed = loaded_editor();
        ed.continue_drag(Vec2::new(40.0, 40.0));
        assert!(ed.transform().unwrap().is_identity());
    }

    #[test]
    fn test_pinch_baselines_then_scales() {
        let mut ed = loaded_editor();

        ed.pinch_zoom(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0));
        assert_eq!(ed.phase(), EditorPhase::Pinching);
        assert_eq!(ed.transform().unwrap().scale, 1.0);

        ed.pinch_zoom(Vec2::new(0.0, 0.0), Vec2::new(150.0, 0.0));
        assert_eq!(ed.transform().unwrap().scale, 1.5);
        assert_invariant(&ed);
    }

    #[test]
    fn test_pinch_clamps_at_max_scale() {
        let mut ed = loaded_editor();
        ed.pinch_zoom(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
        ed.pinch_zoom(Vec2::new(0.0, 0.0), Vec2::new(500.0, 0.0));
        assert_eq!(ed.transform().unwrap().scale, 3.0);
    }

    #[test]
    fn test_pinch_cancels_active_drag() {
        let mut ed = loaded_editor();
        ed.zoom_by(1.0);
        ed.begin_drag(Vec2::new(0.0, 0.0));

        ed.pinch_zoom(Vec2::new(0.0, 0.0), Vec2::new(80.0, 0.0));
        assert_eq!(ed.phase(), EditorPhase::Pinching);

        // The old drag anchor is gone; moves do nothing.
        let before = ed.transform().unwrap().offset;
        ed.continue_drag(Vec2::new(60.0, 60.0));
        assert_eq!(ed.transform().unwrap().offset, before);
    }

    #[test]
    fn test_lifting_finger_ends_pinch_until_new_gesture() {
        let mut ed = loaded_editor();
        ed.pinch_zoom(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0));
        ed.pinch_zoom(Vec2::new(0.0, 0.0), Vec2::new(200.0, 0.0));
        let scale_after_pinch = ed.transform().unwrap().scale;

        ed.touches_ended(1);
        assert_eq!(ed.phase(), EditorPhase::Editing);

        // A fresh pinch re-baselines: its first event changes nothing.
        ed.pinch_zoom(Vec2::new(0.0, 0.0), Vec2::new(50.0, 0.0));
        assert_eq!(ed.transform().unwrap().scale, scale_after_pinch);
    }

    #[test]
    fn test_zoom_saturates_through_editor() {
        let mut ed = loaded_editor();
        for _ in 0..40 {
            ed.zoom_by(0.1);
            assert_invariant(&ed);
        }
        assert_eq!(ed.transform().unwrap().scale, 3.0);

        for _ in 0..40 {
            ed.zoom_by(-0.1);
            assert_invariant(&ed);
        }
        assert_eq!(ed.transform().unwrap().scale, 1.0);
    }

    #[test]
    fn test_reset_restores_identity() {
        let mut ed = loaded_editor();
        ed.zoom_by(1.5);
        ed.begin_drag(Vec2::ZERO);
        ed.continue_drag(Vec2::new(30.0, -20.0));
        ed.end_drag();

        ed.reset();
        assert!(ed.transform().unwrap().is_identity());
    }

    #[test]
    fn test_commit_on_empty_is_no_image_and_idempotent() {
        let mut ed = editor();
        assert!(matches!(ed.commit(), Err(EditorError::NoImage)));
        assert!(matches!(ed.commit(), Err(EditorError::NoImage)));
        assert_eq!(ed.phase(), EditorPhase::Empty);
        assert!(ed.surface().events.iter().all(|e| !matches!(
            e,
            SurfaceEvent::Indicator(_) | SurfaceEvent::Result { .. }
        )));
    }

    #[test]
    fn test_end_to_end_edit_and_commit() {
        let mut ed = loaded_editor();

        ed.zoom_by(0.5);
        assert_eq!(ed.transform().unwrap().scale, 1.5);

        ed.begin_drag(Vec2::ZERO);
        ed.continue_drag(Vec2::new(10.0, 10.0));
        ed.end_drag();
        assert_eq!(ed.transform().unwrap().offset, Vec2::new(10.0, 10.0));
        assert_invariant(&ed);

        ed.commit().expect("commit");
        assert_eq!(ed.phase(), EditorPhase::Committed);

        let result = ed.encoded_result().expect("result");
        assert!(!result.is_empty());
        assert!(result.data_url().starts_with("data:image/png;base64,"));

        // Sealed: every edit path is a silent no-op now.
        ed.zoom_by(0.5);
        ed.begin_drag(Vec2::ZERO);
        ed.continue_drag(Vec2::new(40.0, 40.0));
        ed.pinch_zoom(Vec2::ZERO, Vec2::new(90.0, 0.0));
        ed.reset();
        assert!(ed.transform().unwrap().is_identity());
        assert_eq!(ed.phase(), EditorPhase::Committed);
    }

    #[test]
    fn test_commit_surface_choreography() {
        let mut ed = loaded_editor();
        ed.commit().expect("commit");

        let events = &ed.surface().events;
        assert!(ed.surface().indicator_balanced());

        let indicator_pos = events
            .iter()
            .position(|e| matches!(e, SurfaceEvent::Indicator(_)))
            .unwrap();
        let cleared_pos = events
            .iter()
            .position(|e| matches!(e, SurfaceEvent::IndicatorCleared))
            .unwrap();
        let result_pos = events
            .iter()
            .position(|e| matches!(e, SurfaceEvent::Result { .. }))
            .unwrap();

        assert!(indicator_pos < cleared_pos);
        assert!(cleared_pos < result_pos);

        // Controls removed and a confirmation notice shown.
        assert!(events.contains(&SurfaceEvent::Controls(false)));
        assert!(events
            .iter()
            .any(|e| matches!(e, SurfaceEvent::Notice(n) if n == "Image saved")));
    }

    #[test]
    fn test_second_commit_rejected() {
        let mut ed = loaded_editor();
        ed.commit().expect("commit");
        assert!(matches!(ed.commit(), Err(EditorError::NoImage)));
        assert_eq!(ed.phase(), EditorPhase::Committed);
    }

    #[test]
    fn test_new_load_replaces_committed_session() {
        let mut ed = loaded_editor();
        ed.commit().expect("commit");
        assert!(ed.encoded_result().is_some());

        ed.load_file(&png_file(60, 60)).expect("reload");
        assert_eq!(ed.phase(), EditorPhase::Editing);
        assert!(ed.encoded_result().is_none());
        assert!(ed.transform().unwrap().is_identity());
    }

    #[test]
    fn test_probe_selects_output_format() {
        fn mobile_probe(_vp: Viewport) -> CommitProfile {
            CommitProfile::mobile(1.0)
        }

        let mut ed = ImageEditor::with_probe(RecordingSurface::new(), VP, mobile_probe);
        ed.load_file(&png_file(100, 100)).expect("load");
        ed.commit().expect("commit");

        assert_eq!(
            ed.encoded_result().expect("result").format,
            OutputFormat::Jpeg
        );
        assert!(ed
            .encoded_result()
            .unwrap()
            .data_url()
            .starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_validation_failure_shows_notice() {
        let mut ed = editor();
        let _ = ed.load_file(&SelectedFile::new("text/plain", vec![1]));

        assert!(ed
            .surface()
            .events
            .iter()
            .any(|e| matches!(e, SurfaceEvent::Notice(_))));
    }

    #[test]
    fn test_transform_pushed_on_every_mutation() {
        let mut ed = loaded_editor();
        let count_before = ed
            .surface()
            .events
            .iter()
            .filter(|e| matches!(e, SurfaceEvent::Transform(_)))
            .count();

        ed.zoom_by(0.1);
        ed.begin_drag(Vec2::ZERO);
        ed.continue_drag(Vec2::new(3.0, 3.0));
        ed.reset();

        let count_after = ed
            .surface()
            .events
            .iter()
            .filter(|e| matches!(e, SurfaceEvent::Transform(_)))
            .count();
        assert_eq!(count_after - count_before, 3);
    }
}
