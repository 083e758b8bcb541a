//! # quad-stabilizer
//! A `#![no_std]` attitude stabilization controller for quad-copters.
//!
//! # Components
//! [`PidLoop`] is a single-axis PID regulator with externally scheduled [`PidGains`].
//!
//! [`angle`] converts Euler angles in degrees into signed attitude errors.
//!
//! [`MotorMixer`] maps throttle, pitch and roll corrections and steering into the thrust of each
//! [`Quadrant`]'s propeller.
//!
//! [`YawController`] regulates the yaw rate and produces a [`YawTorque`].
//!
//! [`Wind`] is a constant environmental force.
//!
//! # Flight control
//! [`FlightController`] (see [`Builder`]) runs all of the above once per fixed step,
//! driven by [`ControlInputs`] from the pilot, against a [`RigidBody`](hal::RigidBody)
//! owned by the physics simulation.
//!
//! # Features
//! `defmt` logs every step and reconfiguration with [defmt](https://docs.rs/defmt).
//!
//! `serde` derives serialization for the configuration types.

#![no_std]

pub mod angle;

mod config;
pub use config::{Builder, VehicleParameters, PITCH_GAIN_THROTTLE};

mod controller;
pub use controller::{FlightController, PropellerForce, StepCommands, StepReport};

mod error;
pub use error::Error;

pub mod hal;
pub use hal::{PropellerMount, RigidBody};

pub mod input;
pub use input::{ControlInputs, PilotCommand};

mod mixer;
pub use mixer::{MixFactor, MotorMixer, Quadrant, Thrusts};

mod pid;
pub use pid::{PidGains, PidLoop};

mod wind;
pub use wind::Wind;

mod yaw;
pub use yaw::{YawController, YawTorque};
