use crate::pid::{PidGains, PidLoop};
use nalgebra::Vector3;

/// The two torque contributions about the vehicle's vertical axis.
///
/// These are applied to the body one after the other and are never saturated.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct YawTorque {
    /// Pilot commanded spin.
    pub command: Vector3<f32>,
    /// Damping of the current yaw rate.
    pub correction: Vector3<f32>,
}

impl YawTorque {
    pub fn total(&self) -> Vector3<f32> {
        self.command + self.correction
    }
}

/// Yaw-rate regulator.
///
/// Unlike pitch and roll this controls angular velocity towards zero rather than an angle.
#[derive(Clone, Debug, Default)]
pub struct YawController {
    pub pid: PidLoop<f32>,
}

impl YawController {
    pub fn new(pid: PidLoop<f32>) -> Self {
        Self { pid }
    }

    /// Calculate the commanded and corrective torque about `up`.
    ///
    /// `yaw_axis` is the pilot's yaw command in -1 ~ +1 and `yaw_rate` is the current
    /// angular velocity about the vertical axis.
    pub fn torque(
        &mut self,
        up: Vector3<f32>,
        yaw_axis: f32,
        throttle: f32,
        yaw_rate: f32,
        gains: &PidGains<f32>,
        max_torque: f32,
        dt: f32,
    ) -> YawTorque {
        let output = self.pid.update(gains, yaw_rate, dt);

        YawTorque {
            command: up * (yaw_axis * max_torque * throttle),
            correction: up * (throttle * output * -1.),
        }
    }
}
