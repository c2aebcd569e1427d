//! Pointer and touch gesture tracking.
//!
//! Two gesture tracks exist and are mutually exclusive: a single-pointer
//! drag (mouse or one finger) and a two-finger pinch. Entering two-touch
//! input cancels any active drag; dropping below two touches clears the
//! pinch baseline so the next pinch re-baselines instead of reusing stale
//! distances.
//!
//! Pinch scale is always re-derived from the ratio to the distance recorded
//! at gesture start rather than accumulated from per-event deltas, so many
//! small move events cannot drift the scale.

use crate::Vec2;

/// Reference record captured on the first two-touch event of a pinch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchBaseline {
    /// Distance between the two touches at gesture start.
    pub distance: f64,
    /// Session scale at gesture start.
    pub scale_at_start: f64,
}

/// Tracks the transient state of the active gesture, if any.
///
/// The tracker owns no transform state. Drag produces target offsets and
/// pinch produces target scales; clamping is the caller's job.
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    drag_anchor: Option<Vec2>,
    pinch_baseline: Option<PinchBaseline>,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a single-pointer drag.
    ///
    /// Records the anchor as pointer minus current offset, so later moves
    /// yield the new offset directly. Starting a drag is an explicit
    /// one-finger gesture and ends any pinch tracking.
    pub fn begin_drag(&mut self, pointer: Vec2, current_offset: Vec2) {
        self.pinch_baseline = None;
        self.drag_anchor = Some(pointer - current_offset);
    }

    /// Target offset for a pointer move, or `None` when no drag is active.
    pub fn drag_target(&self, pointer: Vec2) -> Option<Vec2> {
        self.drag_anchor.map(|anchor| pointer - anchor)
    }

    /// End the drag. Idempotent when no drag is active.
    pub fn end_drag(&mut self) {
        self.drag_anchor = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    pub fn is_pinching(&self) -> bool {
        self.pinch_baseline.is_some()
    }

    /// Feed a two-touch update.
    ///
    /// The first call of a gesture records the baseline and returns `None`
    /// (no scale change). Subsequent calls return the target scale derived
    /// from the distance ratio to the baseline. Always cancels any active
    /// drag.
    pub fn pinch_update(&mut self, touch_a: Vec2, touch_b: Vec2, current_scale: f64) -> Option<f64> {
        self.drag_anchor = None;

        let distance = touch_a.distance(touch_b);

        match self.pinch_baseline {
            None => {
                // Two touches on the same point give no usable ratio; wait
                // for them to separate before baselining.
                if distance > f64::EPSILON {
                    self.pinch_baseline = Some(PinchBaseline {
                        distance,
                        scale_at_start: current_scale,
                    });
                }
                None
            }
            Some(baseline) => Some(distance / baseline.distance * baseline.scale_at_start),
        }
    }

    /// Handle touches lifting. Ends the drag; clears the pinch baseline
    /// when fewer than two touches remain.
    pub fn touches_ended(&mut self, remaining: usize) {
        self.drag_anchor = None;
        if remaining < 2 {
            self.pinch_baseline = None;
        }
    }

    /// Handle gesture cancellation (e.g. the platform stole the touches).
    pub fn cancel(&mut self) {
        self.drag_anchor = None;
        self.pinch_baseline = None;
    }
}
