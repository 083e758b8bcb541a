use core::ops::Index;

/// Propeller position on a quad-copter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Quadrant {
    FrontRight,
    FrontLeft,
    BackRight,
    BackLeft,
}

impl Quadrant {
    /// Every quadrant in mixing order.
    pub const ALL: [Self; 4] = [
        Self::FrontRight,
        Self::FrontLeft,
        Self::BackRight,
        Self::BackLeft,
    ];

    /// Signs applied to this propeller's share of each control input.
    pub fn factor(self) -> MixFactor {
        match self {
            Self::FrontRight => MixFactor::new(1., 1., -1., -1.),
            Self::FrontLeft => MixFactor::new(1., -1., -1., 1.),
            Self::BackRight => MixFactor::new(-1., 1., 1., -1.),
            Self::BackLeft => MixFactor::new(-1., -1., 1., 1.),
        }
    }

    pub(crate) fn as_index(self) -> usize {
        self as usize
    }
}

/// Contribution of each input to a single propeller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MixFactor {
    pub pitch: f32,
    pub roll: f32,
    pub forward: f32,
    pub lateral: f32,
}

impl MixFactor {
    pub const fn new(pitch: f32, roll: f32, forward: f32, lateral: f32) -> Self {
        Self {
            pitch,
            roll,
            forward,
            lateral,
        }
    }
}

/// Thrust command for each propeller, indexed by [`Quadrant`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Thrusts([f32; 4]);

impl Thrusts {
    pub fn new(front_right: f32, front_left: f32, back_right: f32, back_left: f32) -> Self {
        Self([front_right, front_left, back_right, back_left])
    }

    pub fn front_right(&self) -> f32 {
        self[Quadrant::FrontRight]
    }

    pub fn front_left(&self) -> f32 {
        self[Quadrant::FrontLeft]
    }

    pub fn back_right(&self) -> f32 {
        self[Quadrant::BackRight]
    }

    pub fn back_left(&self) -> f32 {
        self[Quadrant::BackLeft]
    }

    /// Iterate over each quadrant and its thrust in mixing order.
    pub fn iter(&self) -> impl Iterator<Item = (Quadrant, f32)> + '_ {
        Quadrant::ALL.iter().map(move |&quadrant| (quadrant, self[quadrant]))
    }
}

impl Index<Quadrant> for Thrusts {
    type Output = f32;

    fn index(&self, quadrant: Quadrant) -> &f32 {
        &self.0[quadrant.as_index()]
    }
}

/// Mixes pitch and roll corrections with throttle and steering into four propeller thrusts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotorMixer {
    /// Scale of the forward/back steering overlay relative to throttle.
    pub move_factor: f32,
    /// Upper bound of every propeller thrust.
    pub max_propeller_force: f32,
}

impl MotorMixer {
    pub fn new(move_factor: f32, max_propeller_force: f32) -> Self {
        Self {
            move_factor,
            max_propeller_force,
        }
    }

    /// Calculate the clamped thrust of each propeller.
    ///
    /// `forward_back` and `left_right` are steering axes in -1 ~ +1.
    /// Forward/back steering is scaled by `move_factor`, left/right steering uses the raw throttle.
    pub fn mix(
        &self,
        throttle: f32,
        pitch_output: f32,
        roll_output: f32,
        forward_back: f32,
        left_right: f32,
    ) -> Thrusts {
        let forward_thrust = forward_back * throttle * self.move_factor;
        let lateral_thrust = left_right * throttle;

        let mut thrusts = [0.; 4];
        for (thrust, quadrant) in thrusts.iter_mut().zip(Quadrant::ALL) {
            let factor = quadrant.factor();

            // 1. Stabilize around the pilot's throttle
            let stabilized = throttle + (factor.pitch * pitch_output + factor.roll * roll_output);

            // 2. Bias front against back and left against right to steer
            let steered =
                stabilized + factor.forward * forward_thrust + factor.lateral * lateral_thrust;

            // 3. Rotors can't reverse
            *thrust = self.clamp(steered);
        }

        Thrusts(thrusts)
    }

    fn clamp(&self, thrust: f32) -> f32 {
        thrust.max(0.).min(self.max_propeller_force)
    }
}
