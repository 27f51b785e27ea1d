//! RescueIO - Device abstraction and sensor relay for the rescue robot
//!
//! This library provides the hardware-facing half of the rescue robot:
//!
//! - [`drivers`]: Traits for the gyro, drivetrain, colour sensors, distance
//!   sensors and gripper motor consumed by the navigation layer
//! - [`relay`]: The remote sensor relay that streams three readings from the
//!   secondary robot to the primary one
//! - [`devices::sim`]: A deterministic arena simulator implementing every
//!   driver trait, for hardware-free testing
//! - [`types`]: Colour classification shared by both robots

pub mod config;
pub mod devices;
pub mod drivers;
pub mod error;
pub mod relay;
pub mod types;

// Re-export commonly used types
pub use config::RelayConfig;
pub use error::{Error, Result};
pub use relay::{RelayChannel, RelaySlots, SensorRelay};
pub use types::{FloorColor, Rgb, ZoneColor};
