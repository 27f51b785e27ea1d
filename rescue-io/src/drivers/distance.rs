//! Distance sensor driver trait

use crate::error::Result;

/// Ultrasonic distance sensor
pub trait DistanceSensor: Send {
    /// Distance to the nearest echo in mm
    fn distance(&mut self) -> Result<f32>;
}
