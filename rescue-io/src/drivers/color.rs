//! Colour sensor driver trait

use crate::error::Result;
use crate::types::Rgb;

/// Reflected-light RGB sensor
pub trait ColorSensor: Send {
    /// Read one RGB sample
    fn rgb(&mut self) -> Result<Rgb>;
}
