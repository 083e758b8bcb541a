use crate::{
    angle,
    hal::{propeller_mounts, PropellerMount, RigidBody, VehicleState},
    ControlInputs, Error, MotorMixer, PidLoop, PilotCommand, Quadrant, Thrusts,
    VehicleParameters, Wind, YawController, YawTorque,
};
use nalgebra::Vector3;

/// A propeller's thrust as a force applied at its mount.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropellerForce {
    pub quadrant: Quadrant,
    pub force: Vector3<f32>,
    pub position: Vector3<f32>,
}

impl PropellerForce {
    pub fn new(quadrant: Quadrant, mount: &PropellerMount, thrust: f32) -> Self {
        Self {
            quadrant,
            force: mount.up * thrust,
            position: mount.position,
        }
    }
}

/// Intermediate values of a single step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepReport {
    pub command: PilotCommand,
    /// Signed pitch error in degrees.
    pub pitch_error: f32,
    /// Signed roll error in degrees.
    pub roll_error: f32,
    pub pitch_output: f32,
    pub roll_output: f32,
    pub yaw_rate: f32,
    pub thrusts: Thrusts,
}

/// Everything the controller applies to the vehicle in a single step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepCommands {
    pub propellers: [PropellerForce; 4],
    pub yaw_torque: YawTorque,
    pub wind_force: Vector3<f32>,
    pub report: StepReport,
}

impl StepCommands {
    /// Apply the propeller forces, then both yaw torques, then the wind.
    pub fn apply<B: RigidBody + ?Sized>(&self, body: &mut B) {
        for propeller in &self.propellers {
            body.add_force_at_position(propeller.force, propeller.position);
        }

        body.add_torque(self.yaw_torque.command);
        body.add_torque(self.yaw_torque.correction);

        body.add_force(self.wind_force);
    }
}

/// Attitude stabilization for a quad-copter.
///
/// Every fixed step the controller turns the pilot's [`ControlInputs`] and the
/// vehicle's attitude into four propeller forces, a yaw torque and the wind force.
/// Apart from the three PID loops it owns, nothing carries over between steps.
///
/// ```
/// use quad_stabilizer::{hal::VehicleState, Builder, ControlInputs, PropellerMount};
/// use nalgebra::Vector3;
///
/// let mut controller = Builder::default().build().unwrap();
/// let mount = PropellerMount::new(Vector3::zeros(), Vector3::y());
///
/// let inputs = ControlInputs { throttle_up: true, ..Default::default() };
/// let commands = controller.compute(&inputs, &VehicleState::level(), &[mount; 4]);
///
/// for (_, thrust) in commands.report.thrusts.iter() {
///     assert_eq!(thrust, 100.);
/// }
/// ```
#[derive(Clone, Debug)]
pub struct FlightController {
    parameters: VehicleParameters,
    wind: Wind,
    dt: f32,
    pitch: PidLoop<f32>,
    roll: PidLoop<f32>,
    yaw: YawController,
}

impl FlightController {
    pub(crate) fn from_parts(
        parameters: VehicleParameters,
        wind: Wind,
        dt: f32,
        [pitch, roll, yaw]: [PidLoop<f32>; 3],
    ) -> Self {
        Self {
            parameters,
            wind,
            dt,
            pitch,
            roll,
            yaw: YawController::new(yaw),
        }
    }

    pub fn parameters(&self) -> &VehicleParameters {
        &self.parameters
    }

    /// Replace the vehicle parameters, taking effect on the next step.
    ///
    /// Invalid parameters are rejected and the current ones are kept.
    pub fn set_parameters(&mut self, parameters: VehicleParameters) -> Result<(), Error> {
        parameters.validate()?;

        #[cfg(feature = "defmt")]
        defmt::debug!("vehicle parameters set: {}", parameters);

        self.parameters = parameters;
        Ok(())
    }

    pub fn wind(&self) -> &Wind {
        &self.wind
    }

    /// Change the wind, taking effect on the next step.
    pub fn set_wind(&mut self, wind: Wind) {
        #[cfg(feature = "defmt")]
        defmt::debug!("wind set: {}", wind);

        self.wind = wind;
    }

    /// The fixed step in seconds.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// The pitch, roll and yaw-rate PID loops.
    pub fn pid_loops(&self) -> [&PidLoop<f32>; 3] {
        [&self.pitch, &self.roll, &self.yaw.pid]
    }

    /// Clear the integral and previous error of every PID loop.
    pub fn reset(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::debug!("resetting PID loops");

        self.pitch.reset();
        self.roll.reset();
        self.yaw.pid.reset();
    }

    fn mixer(&self) -> MotorMixer {
        MotorMixer::new(
            self.parameters.move_factor,
            self.parameters.max_propeller_force,
        )
    }

    /// Calculate this step's commands without touching the vehicle.
    ///
    /// `mounts` are the propeller mounts in [`Quadrant::ALL`] order.
    pub fn compute(
        &mut self,
        inputs: &ControlInputs,
        state: &VehicleState,
        mounts: &[PropellerMount; 4],
    ) -> StepCommands {
        // 1. Collapse the pilot's commands into throttle and steering axes
        let command = inputs.command();

        // 2. Calculate the signed attitude errors
        let pitch_error = angle::pitch_error(&state.orientation);
        let roll_error = angle::roll_error(&state.orientation);

        // 3. Stabilize pitch and roll, with stiffer pitch at high throttle
        let pitch_gains = self.parameters.pitch_gains_for(command.throttle);
        let pitch_output = self.pitch.update(&pitch_gains, pitch_error, self.dt);
        let roll_output = self
            .roll
            .update(&self.parameters.roll_gains, roll_error, self.dt);

        // 4. Mix into clamped thrusts pushing along each propeller's up
        let thrusts = self.mixer().mix(
            command.throttle,
            pitch_output,
            roll_output,
            command.forward_back,
            command.left_right,
        );
        let propellers = Quadrant::ALL.map(|quadrant| {
            PropellerForce::new(quadrant, &mounts[quadrant.as_index()], thrusts[quadrant])
        });

        // 5. Spin on command and damp the yaw rate
        let yaw_torque = self.yaw.torque(
            state.up,
            command.yaw,
            command.throttle,
            state.yaw_rate(),
            &self.parameters.yaw_gains,
            self.parameters.max_torque,
            self.dt,
        );

        let report = StepReport {
            command,
            pitch_error,
            roll_error,
            pitch_output,
            roll_output,
            yaw_rate: state.yaw_rate(),
            thrusts,
        };

        #[cfg(feature = "defmt")]
        defmt::trace!("{}", report);

        StepCommands {
            propellers,
            yaw_torque,
            wind_force: self.wind.force(),
            report,
        }
    }

    /// Run a single fixed step against `body`.
    pub fn step<B: RigidBody + ?Sized>(
        &mut self,
        inputs: &ControlInputs,
        body: &mut B,
    ) -> StepReport {
        let state = VehicleState::read(body);
        let mounts = propeller_mounts(body);

        let commands = self.compute(inputs, &state, &mounts);
        commands.apply(body);

        commands.report
    }
}

#[cfg(test)]
mod tests {
    use super::FlightController;
    use crate::{
        hal::VehicleState, Builder, ControlInputs, Error, PidGains, PropellerMount, Quadrant,
        VehicleParameters, Wind,
    };
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn mounts() -> [PropellerMount; 4] {
        [
            PropellerMount::new(Vector3::new(1., 0., 1.), Vector3::y()),
            PropellerMount::new(Vector3::new(-1., 0., 1.), Vector3::y()),
            PropellerMount::new(Vector3::new(1., 0., -1.), Vector3::y()),
            PropellerMount::new(Vector3::new(-1., 0., -1.), Vector3::y()),
        ]
    }

    fn proportional(max_propeller_force: f32) -> FlightController {
        let gains = PidGains::new(1., 0., 0.);
        let parameters = VehicleParameters {
            max_propeller_force,
            pitch_gains: gains,
            roll_gains: gains,
            yaw_gains: gains,
            ..Default::default()
        };
        Builder::default().parameters(parameters).build().unwrap()
    }

    fn pitched(degrees: f32) -> VehicleState {
        VehicleState {
            orientation: Vector3::new(degrees, 0., 0.),
            ..VehicleState::level()
        }
    }

    #[test]
    fn level_climb_is_even() {
        let inputs = ControlInputs {
            throttle_up: true,
            ..Default::default()
        };

        let mut controller = Builder::default().build().unwrap();
        let commands = controller.compute(&inputs, &VehicleState::level(), &mounts());
        for (_, thrust) in commands.report.thrusts.iter() {
            assert_eq!(thrust, 100.);
        }
        assert_relative_eq!(commands.yaw_torque.total(), Vector3::zeros());

        let mut controller = proportional(1000.);
        let commands = controller.compute(&inputs, &VehicleState::level(), &mounts());
        for propeller in &commands.propellers {
            assert_relative_eq!(propeller.force, Vector3::new(0., 300., 0.));
        }
    }

    #[test]
    fn propellers_follow_their_mounts() {
        let mut controller = proportional(1000.);
        let commands = controller.compute(&ControlInputs::default(), &pitched(10.), &mounts());

        for (propeller, mount) in commands.propellers.iter().zip(mounts()) {
            assert_eq!(propeller.position, mount.position);
        }
        assert_eq!(commands.propellers[0].quadrant, Quadrant::FrontRight);
        assert_relative_eq!(commands.propellers[0].force.y, 60.);
        assert_relative_eq!(commands.propellers[3].force.y, 40.);
    }

    #[test]
    fn pitch_gains_double_with_throttle() {
        let left = ControlInputs {
            left: true,
            ..Default::default()
        };
        let mut controller = proportional(1000.);
        let report = controller.compute(&left, &pitched(10.), &mounts()).report;
        assert_eq!(report.command.throttle, 100.);
        assert_relative_eq!(report.pitch_output, 10.);

        let left_and_right = ControlInputs {
            left: true,
            right: true,
            ..Default::default()
        };
        let mut controller = proportional(1000.);
        let report = controller
            .compute(&left_and_right, &pitched(10.), &mounts())
            .report;
        assert_eq!(report.command.throttle, 150.);
        assert_relative_eq!(report.pitch_output, 20.);
    }

    #[test]
    fn integral_persists_until_reset() {
        let parameters = VehicleParameters {
            pitch_gains: PidGains::new(0., 1., 0.),
            ..Default::default()
        };
        let mut controller = Builder::default()
            .parameters(parameters)
            .dt(0.5)
            .build()
            .unwrap();

        for _ in 0..4 {
            controller.compute(&ControlInputs::default(), &pitched(10.), &mounts());
        }
        assert_relative_eq!(controller.pid_loops()[0].integral(), 20.);

        controller.reset();
        for pid in controller.pid_loops() {
            assert_eq!(pid.integral(), 0.);
            assert_eq!(pid.previous_error(), 0.);
        }
    }

    #[test]
    fn wind_changes_on_next_step() {
        let mut controller = Builder::default().build().unwrap();
        let state = VehicleState::level();

        let commands = controller.compute(&ControlInputs::default(), &state, &mounts());
        assert_eq!(commands.wind_force, Vector3::zeros());

        controller.set_wind(Wind::new(4., 0.));
        let commands = controller.compute(&ControlInputs::default(), &state, &mounts());
        assert_relative_eq!(commands.wind_force, Vector3::new(0., 0., -4.));
    }

    #[test]
    fn yaw_rate_is_damped() {
        let mut controller = proportional(1000.);
        let state = VehicleState {
            angular_velocity: Vector3::new(0., 0.2, 0.),
            ..VehicleState::level()
        };
        let commands = controller.compute(&ControlInputs::default(), &state, &mounts());

        assert_eq!(commands.yaw_torque.command, Vector3::zeros());
        assert_relative_eq!(commands.yaw_torque.correction, Vector3::new(0., -10., 0.));
    }

    #[test]
    fn invalid_parameters_are_rejected_in_flight() {
        let climb = ControlInputs {
            throttle_up: true,
            ..Default::default()
        };
        let mut controller = Builder::default().build().unwrap();

        let result = controller.set_parameters(VehicleParameters {
            max_propeller_force: -10.,
            ..Default::default()
        });
        assert!(matches!(result, Err(Error::InvalidPropellerForce(_))));

        let result = controller.set_parameters(VehicleParameters {
            move_factor: f32::NAN,
            ..Default::default()
        });
        assert!(matches!(result, Err(Error::InvalidMoveFactor(_))));

        assert_eq!(*controller.parameters(), VehicleParameters::default());
        let commands = controller.compute(&climb, &VehicleState::level(), &mounts());
        for (_, thrust) in commands.report.thrusts.iter() {
            assert_eq!(thrust, 100.);
        }

        let parameters = VehicleParameters {
            max_propeller_force: 50.,
            ..Default::default()
        };
        controller.set_parameters(parameters).unwrap();
        assert_eq!(*controller.parameters(), parameters);
        let commands = controller.compute(&climb, &VehicleState::level(), &mounts());
        for (_, thrust) in commands.report.thrusts.iter() {
            assert_eq!(thrust, 50.);
        }
    }
}
