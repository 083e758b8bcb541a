use nalgebra::{Rotation3, Vector3};

/// Constant wind acting on the vehicle's center of mass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Wind {
    /// Force magnitude.
    pub magnitude: f32,
    /// Heading in degrees (0 ~ 360) about the vertical axis.
    pub heading: f32,
}

impl Wind {
    pub fn new(magnitude: f32, heading: f32) -> Self {
        Self { magnitude, heading }
    }

    /// A still environment.
    pub fn calm() -> Self {
        Self::default()
    }

    /// Calculate the world-frame force of this wind.
    ///
    /// At a heading of zero the wind blows backwards along `-z`.
    /// This does not depend on the vehicle's attitude.
    pub fn force(&self) -> Vector3<f32> {
        let backward = -Vector3::z();
        let rotation = Rotation3::from_axis_angle(&Vector3::y_axis(), self.heading.to_radians());

        rotation * backward * self.magnitude
    }
}
