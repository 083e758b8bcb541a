use nalgebra::Vector3;
use quad_stabilizer::{Builder, ControlInputs, PropellerMount, Quadrant, RigidBody, Wind};

/// A point mass that stays level and only spins about its vertical axis.
struct PointMass {
    mass: f32,
    inertia: f32,
    gravity: f32,
    position: Vector3<f32>,
    velocity: Vector3<f32>,
    yaw: f32,
    yaw_rate: f32,
    force: Vector3<f32>,
    torque: Vector3<f32>,
}

impl PointMass {
    fn new(mass: f32) -> Self {
        Self {
            mass,
            inertia: 10.,
            gravity: 9.81,
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            yaw: 0.,
            yaw_rate: 0.,
            force: Vector3::zeros(),
            torque: Vector3::zeros(),
        }
    }

    fn integrate(&mut self, dt: f32) {
        let acceleration = self.force / self.mass - Vector3::new(0., self.gravity, 0.);
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
        if self.position.y < 0. {
            self.position.y = 0.;
            self.velocity.y = 0.;
        }

        self.yaw_rate += self.torque.y / self.inertia * dt;
        self.yaw += self.yaw_rate.to_degrees() * dt;

        self.force = Vector3::zeros();
        self.torque = Vector3::zeros();
    }
}

impl RigidBody for PointMass {
    fn orientation(&mut self) -> Vector3<f32> {
        Vector3::new(0., self.yaw, 0.)
    }

    fn angular_velocity(&mut self) -> Vector3<f32> {
        Vector3::new(0., self.yaw_rate, 0.)
    }

    fn up(&mut self) -> Vector3<f32> {
        Vector3::y()
    }

    fn propeller(&mut self, quadrant: Quadrant) -> PropellerMount {
        let (x, z) = match quadrant {
            Quadrant::FrontRight => (0.3, 0.3),
            Quadrant::FrontLeft => (-0.3, 0.3),
            Quadrant::BackRight => (0.3, -0.3),
            Quadrant::BackLeft => (-0.3, -0.3),
        };
        PropellerMount::new(self.position + Vector3::new(x, 0., z), Vector3::y())
    }

    fn add_force_at_position(&mut self, force: Vector3<f32>, _position: Vector3<f32>) {
        self.force += force;
    }

    fn add_torque(&mut self, torque: Vector3<f32>) {
        self.torque += torque;
    }

    fn add_force(&mut self, force: Vector3<f32>) {
        self.force += force;
    }
}

fn main() {
    let mut controller = Builder::default()
        .wind(Wind::new(2., 45.))
        .build()
        .unwrap();
    let mut body = PointMass::new(20.);

    for step in 0..250 {
        // Climb for two seconds, then yaw while idling
        let inputs = if step < 100 {
            ControlInputs {
                throttle_up: true,
                ..Default::default()
            }
        } else {
            ControlInputs {
                yaw_right: true,
                ..Default::default()
            }
        };

        let report = controller.step(&inputs, &mut body);
        body.integrate(controller.dt());

        if step % 25 == 0 {
            println!(
                "t={:.2}s throttle={} thrusts={:?} altitude={:.2} yaw={:.1}",
                step as f32 * controller.dt(),
                report.command.throttle,
                report.thrusts,
                body.position.y,
                body.yaw,
            );
        }
    }
}
