use crate::Quadrant;
use nalgebra::Vector3;

/// Where a propeller is mounted and the direction it pushes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropellerMount {
    /// World-frame position of the propeller hub.
    pub position: Vector3<f32>,
    /// Thrust direction (the propeller's local up).
    pub up: Vector3<f32>,
}

impl PropellerMount {
    pub fn new(position: Vector3<f32>, up: Vector3<f32>) -> Self {
        Self { position, up }
    }
}

/// The simulated (or real) rigid body of the vehicle.
///
/// The body owns position and orientation and integrates the forces and torques
/// applied to it once per fixed step.
pub trait RigidBody {
    /// Euler angles in degrees (`x` pitch, `y` yaw, `z` roll).
    fn orientation(&mut self) -> Vector3<f32>;

    /// Angular velocity, in the same frame torques are applied in.
    fn angular_velocity(&mut self) -> Vector3<f32>;

    /// The vehicle's local up.
    fn up(&mut self) -> Vector3<f32>;

    fn propeller(&mut self, quadrant: Quadrant) -> PropellerMount;

    fn add_force_at_position(&mut self, force: Vector3<f32>, position: Vector3<f32>);

    fn add_torque(&mut self, torque: Vector3<f32>);

    /// Apply a force at the center of mass.
    fn add_force(&mut self, force: Vector3<f32>);
}

impl<T: RigidBody + ?Sized> RigidBody for &mut T {
    fn orientation(&mut self) -> Vector3<f32> {
        (**self).orientation()
    }

    fn angular_velocity(&mut self) -> Vector3<f32> {
        (**self).angular_velocity()
    }

    fn up(&mut self) -> Vector3<f32> {
        (**self).up()
    }

    fn propeller(&mut self, quadrant: Quadrant) -> PropellerMount {
        (**self).propeller(quadrant)
    }

    fn add_force_at_position(&mut self, force: Vector3<f32>, position: Vector3<f32>) {
        (**self).add_force_at_position(force, position)
    }

    fn add_torque(&mut self, torque: Vector3<f32>) {
        (**self).add_torque(torque)
    }

    fn add_force(&mut self, force: Vector3<f32>) {
        (**self).add_force(force)
    }
}

/// State of the vehicle read once at the start of a step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VehicleState {
    /// Euler angles in degrees.
    pub orientation: Vector3<f32>,
    pub angular_velocity: Vector3<f32>,
    pub up: Vector3<f32>,
}

impl Default for VehicleState {
    fn default() -> Self {
        Self::level()
    }
}

impl VehicleState {
    /// A level vehicle at rest.
    pub fn level() -> Self {
        Self {
            orientation: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
            up: Vector3::y(),
        }
    }

    pub fn read<B: RigidBody + ?Sized>(body: &mut B) -> Self {
        Self {
            orientation: body.orientation(),
            angular_velocity: body.angular_velocity(),
            up: body.up(),
        }
    }

    /// Angular velocity about the vertical axis.
    pub fn yaw_rate(&self) -> f32 {
        self.angular_velocity.y
    }
}

/// Read the mount of every propeller in quadrant order.
pub fn propeller_mounts<B: RigidBody + ?Sized>(body: &mut B) -> [PropellerMount; 4] {
    Quadrant::ALL.map(|quadrant| body.propeller(quadrant))
}
