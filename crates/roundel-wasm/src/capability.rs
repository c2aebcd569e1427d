//! Browser device probe for the commit profile.
//!
//! Resolved once per commit, never cached: a window dragged to another
//! monitor between commits picks up the new pixel ratio.

use roundel_core::{CommitProfile, DeviceClass, Viewport};

/// Viewport width at or below which a touch device is treated as mobile.
const MOBILE_MAX_WIDTH: f64 = 768.0;

/// Classify the current browser environment and build the commit profile.
///
/// Touch support plus a narrow window means the mobile profile (JPEG,
/// capped supersampling); everything else, including headless contexts
/// with no window at all, gets the desktop profile.
pub fn detect_commit_profile(_viewport: Viewport) -> CommitProfile {
    let Some(window) = web_sys::window() else {
        return CommitProfile::desktop(1.0);
    };

    let pixel_ratio = window.device_pixel_ratio();

    let has_touch = window.navigator().max_touch_points() > 0;
    let narrow = window
        .inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .is_some_and(|w| w <= MOBILE_MAX_WIDTH);

    let class = if has_touch && narrow {
        DeviceClass::Mobile
    } else {
        DeviceClass::Desktop
    };

    CommitProfile::for_class(class, pixel_ratio)
}
