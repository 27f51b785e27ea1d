//! Heading sensor (gyroscope) driver trait

use crate::error::Result;

/// Absolute heading sensor
///
/// Angles are in degrees, positive clockwise, and are NOT wrapped: two full
/// clockwise turns read as 720.
pub trait HeadingSensor: Send {
    /// Current accumulated angle in degrees
    fn angle(&mut self) -> Result<f32>;

    /// Redefine the current physical heading as `angle`
    fn reset(&mut self, angle: f32) -> Result<()>;
}
