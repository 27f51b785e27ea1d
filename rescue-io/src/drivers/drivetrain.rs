//! Differential drivetrain driver trait

use crate::error::Result;

/// Command for one side of the drivetrain
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelCommand {
    /// Run at a speed in mm/s (negative for backward)
    Run(f32),
    /// Stop this side
    Stop,
    /// Leave the side doing whatever it was doing
    Keep,
}

/// Two-motor differential drivetrain
///
/// Every `drive`/`run_wheels` call is one control tick: implementations apply
/// the command and return immediately.
pub trait Drivetrain: Send {
    /// Drive both sides together
    ///
    /// # Arguments
    /// * `speed` - Forward speed in mm/s
    /// * `turn_rate` - Turn rate in deg/s, positive clockwise
    fn drive(&mut self, speed: f32, turn_rate: f32) -> Result<()>;

    /// Command each side independently
    fn run_wheels(&mut self, left: WheelCommand, right: WheelCommand) -> Result<()>;

    /// Stop both sides (coast)
    fn stop(&mut self) -> Result<()>;

    /// Actively hold the current wheel positions
    fn hold(&mut self) -> Result<()>;

    /// Signed distance travelled in mm since the last [`reset_distance`](Self::reset_distance)
    fn distance(&mut self) -> Result<f32>;

    /// Zero the travelled distance
    fn reset_distance(&mut self) -> Result<()>;
}
