//! Gripper motor driver trait

use crate::error::Result;

/// Single motor driving the gripper jaws
pub trait GripperMotor: Send {
    /// Run until the motor stalls, then hold. Returns the stall angle in degrees.
    ///
    /// # Arguments
    /// * `speed` - Speed in deg/s (negative closes)
    /// * `duty_limit` - Maximum duty cycle in percent
    fn run_until_stalled(&mut self, speed: f32, duty_limit: u8) -> Result<f32>;

    /// Run to an absolute angle, blocking until reached, then coast
    fn run_target(&mut self, speed: f32, angle: f32) -> Result<()>;

    /// Actively hold the current angle
    fn hold(&mut self) -> Result<()>;

    /// Redefine the current angle
    fn reset_angle(&mut self, angle: f32) -> Result<()>;
}
