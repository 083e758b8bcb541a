//! Attitude error from Euler angles in degrees.
//!
//! Orientation is read as `x` = pitch, `y` = yaw and `z` = roll.

use nalgebra::Vector3;

/// Wrap an angle of any magnitude into `[0, 360)` degrees.
pub fn wrap_degrees(angle: f32) -> f32 {
    ((angle % 360.) + 360.) % 360.
}

/// Convert an angle in degrees into a signed error in `(-180, 180]`.
///
/// Angles past 180 degrees are treated as approaching zero from the other side,
/// so `181` becomes `-179` while `180` itself is kept as is.
pub fn signed_error(angle: f32) -> f32 {
    let angle = wrap_degrees(angle);
    if angle > 180. && angle < 360. {
        -(360. - angle)
    } else {
        angle
    }
}

/// Pitch error in degrees, positive when pitching forward.
pub fn pitch_error(orientation: &Vector3<f32>) -> f32 {
    signed_error(orientation.x)
}

/// Roll error in degrees, positive when rolling right.
pub fn roll_error(orientation: &Vector3<f32>) -> f32 {
    -signed_error(orientation.z)
}
