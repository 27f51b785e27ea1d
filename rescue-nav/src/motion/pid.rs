//! Discrete PID controller with a fixed loop period.

use crate::config::PidGains;

/// PID controller.
///
/// `update` is called once per control tick with the measured value and
/// returns the clamped command. The integral term is clamped so that on its
/// own it can never exceed the output limits.
#[derive(Clone, Debug)]
pub struct Pid {
    gains: PidGains,
    setpoint: f32,
    dt: f32,
    limits: Option<(f32, f32)>,
    integral: f32,
    previous_error: Option<f32>,
}

impl Pid {
    pub fn new(gains: PidGains, setpoint: f32, dt: f32) -> Self {
        Self {
            gains,
            setpoint,
            dt,
            limits: None,
            integral: 0.0,
            previous_error: None,
        }
    }

    /// Clamp every output into `[low, high]`
    pub fn with_limits(mut self, low: f32, high: f32) -> Self {
        self.limits = Some((low.min(high), low.max(high)));
        self
    }

    /// Advance one tick
    pub fn update(&mut self, measured: f32) -> f32 {
        let error = self.setpoint - measured;

        self.integral += error * self.dt;
        if let Some((low, high)) = self.limits {
            if self.gains.ki != 0.0 {
                let i_max = low.abs().max(high.abs()) / self.gains.ki.abs();
                self.integral = self.integral.clamp(-i_max, i_max);
            }
        }

        // No derivative kick on the first tick
        let derivative = match self.previous_error {
            Some(prev) => (error - prev) / self.dt,
            None => 0.0,
        };
        self.previous_error = Some(error);

        let output =
            self.gains.kp * error + self.gains.ki * self.integral + self.gains.kd * derivative;

        match self.limits {
            Some((low, high)) => output.clamp(low, high),
            None => output,
        }
    }
}
