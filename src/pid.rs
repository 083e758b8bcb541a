use num_traits::Float;

/// Proportional, integral and derivative gains for a single axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PidGains<T> {
    pub kp: T,
    pub ki: T,
    pub kd: T,
}

impl<T: Float> PidGains<T> {
    pub const fn new(kp: T, ki: T, kd: T) -> Self {
        Self { kp, ki, kd }
    }

    /// Multiply every gain by `factor`.
    pub fn scaled(&self, factor: T) -> Self {
        Self {
            kp: self.kp * factor,
            ki: self.ki * factor,
            kd: self.kd * factor,
        }
    }

    /// Returns `true` if no gain is infinite or NaN.
    pub fn is_finite(&self) -> bool {
        self.kp.is_finite() && self.ki.is_finite() && self.kd.is_finite()
    }
}

/// Single-axis PID regulator.
///
/// The gains are passed to every [`update`](PidLoop::update) so a caller can schedule them
/// per step, while the loop keeps only the accumulated integral and the previous error.
///
/// The integral is unbounded by default: under a sustained error it keeps growing for as
/// long as the loop runs. Use [`with_integral_limit`](PidLoop::with_integral_limit) to
/// clamp it, or [`reset`](PidLoop::reset) to start over.
#[derive(Clone, Debug, Default)]
pub struct PidLoop<T> {
    integral: T,
    previous_error: T,
    integral_limit: Option<T>,
}

impl<T: Float> PidLoop<T> {
    pub fn new() -> Self {
        Self {
            integral: T::zero(),
            previous_error: T::zero(),
            integral_limit: None,
        }
    }

    /// Create a loop whose integral is clamped to `[-limit, limit]`.
    pub fn with_integral_limit(limit: T) -> Self {
        Self {
            integral_limit: Some(limit.abs()),
            ..Self::new()
        }
    }

    pub fn integral(&self) -> T {
        self.integral
    }

    pub fn previous_error(&self) -> T {
        self.previous_error
    }

    pub fn integral_limit(&self) -> Option<T> {
        self.integral_limit
    }

    /// Clear the integral and previous error, keeping the integral limit.
    pub fn reset(&mut self) {
        self.integral = T::zero();
        self.previous_error = T::zero();
    }

    /// Feed `error` for a step of `dt` seconds and return the controller output.
    ///
    /// A non-positive `dt` contributes no integral and a zero derivative.
    pub fn update(&mut self, gains: &PidGains<T>, error: T, dt: T) -> T {
        let derivative = if dt > T::zero() {
            self.integral = self.integral + error * dt;
            if let Some(limit) = self.integral_limit {
                self.integral = self.integral.max(-limit).min(limit);
            }
            (error - self.previous_error) / dt
        } else {
            T::zero()
        };
        self.previous_error = error;

        gains.kp * error + gains.ki * self.integral + gains.kd * derivative
    }
}
