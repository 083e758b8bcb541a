use crate::{pid::PidGains, Error, FlightController, PidLoop, Wind};
use embedded_time::{
    duration::Microseconds,
    rate::{Hertz, Rate},
};

/// Pitch gains are doubled above this throttle.
pub const PITCH_GAIN_THROTTLE: f32 = 100.;

/// Static configuration of a vehicle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleParameters {
    /// Upper bound of the thrust of a single propeller.
    pub max_propeller_force: f32,
    /// Yaw torque per unit of throttle at a full yaw command.
    pub max_torque: f32,
    /// Scale of the forward/back steering overlay.
    pub move_factor: f32,
    pub pitch_gains: PidGains<f32>,
    pub roll_gains: PidGains<f32>,
    pub yaw_gains: PidGains<f32>,
}

impl Default for VehicleParameters {
    fn default() -> Self {
        Self {
            max_propeller_force: 100.,
            max_torque: 1.,
            move_factor: 5.,
            pitch_gains: PidGains::new(2., 3., 2.),
            roll_gains: PidGains::new(2., 0.2, 0.5),
            yaw_gains: PidGains::new(1., 0., 0.),
        }
    }
}

impl VehicleParameters {
    /// Pitch gains scheduled for `throttle`: twice the base gains above [`PITCH_GAIN_THROTTLE`].
    pub fn pitch_gains_for(&self, throttle: f32) -> PidGains<f32> {
        if throttle > PITCH_GAIN_THROTTLE {
            self.pitch_gains.scaled(2.)
        } else {
            self.pitch_gains
        }
    }

    /// Check that every field is finite and the propeller force is not negative.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.max_propeller_force.is_finite() || self.max_propeller_force < 0. {
            return Err(Error::InvalidPropellerForce(self.max_propeller_force));
        }
        if !self.max_torque.is_finite() {
            return Err(Error::InvalidTorque(self.max_torque));
        }
        if !self.move_factor.is_finite() {
            return Err(Error::InvalidMoveFactor(self.move_factor));
        }

        let gains = [self.pitch_gains, self.roll_gains, self.yaw_gains];
        if !gains.iter().all(PidGains::is_finite) {
            return Err(Error::InvalidGains);
        }

        Ok(())
    }
}

/// Builder for a [`FlightController`].
///
/// ```
/// use embedded_time::rate::Hertz;
/// use quad_stabilizer::{Builder, Wind};
///
/// let controller = Builder::default()
///     .loop_rate(Hertz(50))
///     .wind(Wind::new(2., 90.))
///     .build()
///     .unwrap();
///
/// assert_eq!(controller.dt(), 0.02);
/// ```
pub struct Builder {
    parameters: VehicleParameters,
    wind: Wind,
    dt: Result<f32, Error>,
    integral_limit: Option<f32>,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            parameters: VehicleParameters::default(),
            wind: Wind::calm(),
            // 50 hz
            dt: Ok(0.02),
            integral_limit: None,
        }
    }
}

impl Builder {
    pub fn parameters(mut self, parameters: VehicleParameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn wind(mut self, wind: Wind) -> Self {
        self.wind = wind;
        self
    }

    /// Set the fixed step in seconds.
    pub fn dt(mut self, dt: f32) -> Self {
        self.dt = Ok(dt);
        self
    }

    /// Set the fixed step from the rate the physics steps at.
    pub fn loop_rate(mut self, rate: Hertz) -> Self {
        self.dt = rate
            .to_duration::<Microseconds>()
            .map(|period| period.0 as f32 / 1e6)
            .map_err(Error::from);
        self
    }

    /// Clamp the integral of every PID loop to `[-limit, limit]`.
    ///
    /// Without a limit the integrals are unbounded.
    pub fn integral_limit(mut self, limit: f32) -> Self {
        self.integral_limit = Some(limit);
        self
    }

    pub fn build(self) -> Result<FlightController, Error> {
        let dt = self.dt?;
        if !dt.is_finite() || dt <= 0. {
            return Err(Error::InvalidTimestep(dt));
        }
        self.parameters.validate()?;
        if let Some(limit) = self.integral_limit {
            if !limit.is_finite() {
                return Err(Error::InvalidIntegralLimit(limit));
            }
        }

        let pid = || match self.integral_limit {
            Some(limit) => PidLoop::with_integral_limit(limit),
            None => PidLoop::new(),
        };

        Ok(FlightController::from_parts(
            self.parameters,
            self.wind,
            dt,
            [pid(), pid(), pid()],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::{Builder, VehicleParameters};
    use crate::{pid::PidGains, Error};
    use embedded_time::rate::Hertz;

    #[test]
    fn pitch_gains_double_above_threshold() {
        let parameters = VehicleParameters::default();
        let base = parameters.pitch_gains;

        assert_eq!(parameters.pitch_gains_for(99.), base);
        assert_eq!(parameters.pitch_gains_for(100.), base);
        assert_eq!(parameters.pitch_gains_for(101.), PidGains::new(4., 6., 4.));
    }

    #[test]
    fn loop_rate_sets_timestep() {
        let controller = Builder::default().loop_rate(Hertz(100)).build().unwrap();
        assert_eq!(controller.dt(), 0.01);
    }

    #[test]
    fn rejects_zero_rate() {
        let result = Builder::default().loop_rate(Hertz(0)).build();
        assert!(matches!(result, Err(Error::Time(_))));
    }

    #[test]
    fn rejects_invalid_timestep() {
        for dt in [0., -0.02, f32::NAN, f32::INFINITY] {
            let result = Builder::default().dt(dt).build();
            assert!(matches!(result, Err(Error::InvalidTimestep(_))));
        }
    }

    #[test]
    fn rejects_negative_propeller_force() {
        let parameters = VehicleParameters {
            max_propeller_force: -1.,
            ..Default::default()
        };
        let result = Builder::default().parameters(parameters).build();
        assert!(matches!(result, Err(Error::InvalidPropellerForce(_))));
    }

    #[test]
    fn rejects_non_finite_parameters() {
        let torque = VehicleParameters {
            max_torque: f32::NAN,
            ..Default::default()
        };
        let result = Builder::default().parameters(torque).build();
        assert!(matches!(result, Err(Error::InvalidTorque(_))));

        let move_factor = VehicleParameters {
            move_factor: f32::INFINITY,
            ..Default::default()
        };
        let result = Builder::default().parameters(move_factor).build();
        assert!(matches!(result, Err(Error::InvalidMoveFactor(_))));

        for gains in [
            PidGains::new(f32::NAN, 0., 0.),
            PidGains::new(0., f32::INFINITY, 0.),
            PidGains::new(0., 0., f32::NEG_INFINITY),
        ] {
            let parameters = VehicleParameters {
                yaw_gains: gains,
                ..Default::default()
            };
            assert!(matches!(parameters.validate(), Err(Error::InvalidGains)));

            let parameters = VehicleParameters {
                roll_gains: gains,
                ..Default::default()
            };
            assert!(matches!(parameters.validate(), Err(Error::InvalidGains)));
        }

        let pitch = VehicleParameters {
            pitch_gains: PidGains::new(2., f32::NAN, 2.),
            ..Default::default()
        };
        let result = Builder::default().parameters(pitch).build();
        assert!(matches!(result, Err(Error::InvalidGains)));
    }

    #[test]
    fn rejects_non_finite_integral_limit() {
        for limit in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let result = Builder::default().integral_limit(limit).build();
            assert!(matches!(result, Err(Error::InvalidIntegralLimit(_))));
        }
    }

    #[test]
    fn integral_limit_applies_to_every_axis() {
        let controller = Builder::default().integral_limit(5.).build().unwrap();
        for pid in controller.pid_loops() {
            assert_eq!(pid.integral_limit(), Some(5.));
        }
    }
}
