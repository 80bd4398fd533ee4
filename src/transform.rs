//! Transform operators applied to the grabbed object.
//!
//! All three operators are pure functions over plain values; the state
//! machine decides when to call them and writes the results back into the
//! scene graph.

use cgmath::{Deg, InnerSpace, Rotation3};
use instant::Duration;
use winit::dpi::PhysicalPosition;

/// Smallest per-axis scale a pinch can reach.
pub const SCALE_MIN: f32 = 0.005;
/// Largest per-axis scale a pinch can reach.
pub const SCALE_MAX: f32 = 3.0;
/// Screen-distance-to-scale factor for pinch gestures.
pub const SCALE_SENSITIVITY: f32 = 0.02;

/// Translation that preserves the finger-to-object contact point established
/// at grab time, instead of snapping the object's origin to the finger.
pub fn translate_with_offset(
    plane_hit: cgmath::Vector3<f32>,
    offset: cgmath::Vector3<f32>,
) -> cgmath::Vector3<f32> {
    plane_hit + offset
}

/// Signed pinch amount for one frame of a two-finger gesture.
///
/// Positive when the fingers moved together (shrink), negative when they
/// spread (grow). Scaled by the elapsed frame time so the gesture is
/// frame-rate independent.
pub fn pinch_amount(
    first_previous: PhysicalPosition<f64>,
    second_previous: PhysicalPosition<f64>,
    first_current: PhysicalPosition<f64>,
    second_current: PhysicalPosition<f64>,
    dt: Duration,
) -> f32 {
    let previous_distance = cgmath::vec2(
        (first_previous.x - second_previous.x) as f32,
        (first_previous.y - second_previous.y) as f32,
    )
    .magnitude();
    let current_distance = cgmath::vec2(
        (first_current.x - second_current.x) as f32,
        (first_current.y - second_current.y) as f32,
    )
    .magnitude();
    (previous_distance - current_distance) * SCALE_SENSITIVITY * dt.as_secs_f32()
}

/// Apply a pinch amount uniformly and clamp each axis independently so a
/// runaway gesture can neither invert nor explode the object.
pub fn apply_pinch(scale: cgmath::Vector3<f32>, amount: f32) -> cgmath::Vector3<f32> {
    cgmath::vec3(
        (scale.x - amount).clamp(SCALE_MIN, SCALE_MAX),
        (scale.y - amount).clamp(SCALE_MIN, SCALE_MAX),
        (scale.z - amount).clamp(SCALE_MIN, SCALE_MAX),
    )
}

/// Rotate `rotation` about the up axis by `delta` degrees.
///
/// The caller derives `delta` from consecutive control values; the control's
/// absolute value means something different each time the grabbed object
/// changes, so only differences are ever applied.
pub fn rotate_about_up(rotation: cgmath::Quaternion<f32>, delta: f32) -> cgmath::Quaternion<f32> {
    cgmath::Quaternion::from_angle_y(Deg(delta)) * rotation
}
