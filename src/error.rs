use core::fmt;
use embedded_time::ConversionError;

/// A configuration error raised while building or reconfiguring a controller.
#[derive(Debug)]
pub enum Error {
    /// The fixed step must be a finite number of seconds above zero.
    InvalidTimestep(f32),
    /// The maximum propeller force must be finite and not negative.
    InvalidPropellerForce(f32),
    /// The maximum yaw torque must be finite.
    InvalidTorque(f32),
    /// The steering move factor must be finite.
    InvalidMoveFactor(f32),
    /// Every PID gain must be finite.
    InvalidGains,
    /// The integral limit must be finite.
    InvalidIntegralLimit(f32),
    Time(ConversionError),
}

impl From<ConversionError> for Error {
    fn from(time_error: ConversionError) -> Self {
        Error::Time(time_error)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidTimestep(dt) => write!(f, "invalid timestep: {} s", dt),
            Error::InvalidPropellerForce(force) => {
                write!(f, "invalid maximum propeller force: {}", force)
            }
            Error::InvalidTorque(torque) => write!(f, "invalid maximum torque: {}", torque),
            Error::InvalidMoveFactor(factor) => write!(f, "invalid move factor: {}", factor),
            Error::InvalidGains => f.write_str("PID gains must be finite"),
            Error::InvalidIntegralLimit(limit) => write!(f, "invalid integral limit: {}", limit),
            Error::Time(error) => write!(f, "loop rate conversion failed: {:?}", error),
        }
    }
}
