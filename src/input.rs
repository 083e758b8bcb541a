//! Discrete pilot commands and their mapping to throttle and steering axes.

/// Throttle while climbing.
pub const THROTTLE_RAISED: f32 = 300.;
/// Throttle while descending.
pub const THROTTLE_LOWERED: f32 = 0.;
/// Throttle with no vertical command.
pub const THROTTLE_IDLE: f32 = 50.;
/// Upper bound of the throttle before steering boosts.
pub const THROTTLE_MAX: f32 = 300.;
/// Extra throttle for every active steering command.
pub const STEERING_BOOST: f32 = 50.;

/// Snapshot of the pilot's commands for a single step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlInputs {
    pub throttle_up: bool,
    pub throttle_down: bool,
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub yaw_left: bool,
    pub yaw_right: bool,
}

/// Throttle and steering axes (each in -1 ~ +1) derived from [`ControlInputs`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PilotCommand {
    pub throttle: f32,
    pub forward_back: f32,
    pub left_right: f32,
    pub yaw: f32,
}

impl ControlInputs {
    /// Collapse the discrete commands into a [`PilotCommand`].
    ///
    /// When both directions of an axis are held the later check wins:
    /// `back` over `forward`, `right` over `left` and `yaw_right` over `yaw_left`.
    /// Raising the throttle wins over lowering it.
    /// Every active steering command adds [`STEERING_BOOST`] after the throttle is clamped,
    /// so a steering vehicle can run above [`THROTTLE_MAX`].
    pub fn command(&self) -> PilotCommand {
        let mut throttle = if self.throttle_up {
            THROTTLE_RAISED
        } else if self.throttle_down {
            THROTTLE_LOWERED
        } else {
            THROTTLE_IDLE
        };
        throttle = throttle.max(0.).min(THROTTLE_MAX);

        let mut forward_back = 0.;
        if self.forward {
            forward_back = 1.;
            throttle += STEERING_BOOST;
        }
        if self.back {
            forward_back = -1.;
            throttle += STEERING_BOOST;
        }

        let mut left_right = 0.;
        if self.left {
            left_right = -1.;
            throttle += STEERING_BOOST;
        }
        if self.right {
            left_right = 1.;
            throttle += STEERING_BOOST;
        }

        let mut yaw = 0.;
        if self.yaw_left {
            yaw = -1.;
        }
        if self.yaw_right {
            yaw = 1.;
        }

        PilotCommand {
            throttle,
            forward_back,
            left_right,
            yaw,
        }
    }
}
