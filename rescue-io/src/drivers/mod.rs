//! Device driver traits
//!
//! The navigation layer only ever sees these traits; concrete hardware (or
//! the [`sim`](crate::devices::sim) arena) is injected at construction.

pub mod color;
pub mod distance;
pub mod drivetrain;
pub mod gripper;
pub mod heading;

pub use color::ColorSensor;
pub use distance::DistanceSensor;
pub use drivetrain::{Drivetrain, WheelCommand};
pub use gripper::GripperMotor;
pub use heading::HeadingSensor;
