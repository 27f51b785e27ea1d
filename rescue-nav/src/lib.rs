//! RescueNav - Grid navigation and mission control for the rescue robot
//!
//! Layers, lowest first:
//!
//! - [`position`]: confirmed grid cell and cardinal heading
//! - [`planning`]: breadth-first planner with waypoint reduction
//! - [`motion`]: closed-loop motion primitives over the device traits
//! - [`navigation`]: plan/execute/replan loop toward a target pose
//! - [`mission`]: corner search, pickup and delivery sequences
//!
//! Devices, the sensor relay and the arena simulator live in `rescue_io`.

pub mod config;
pub mod error;
pub mod gripper;
pub mod mission;
pub mod motion;
pub mod navigation;
pub mod planning;
pub mod position;

pub use config::NavConfig;
pub use error::{NavError, Result};
pub use gripper::{Claw, Gripper};
pub use mission::{DeliveryOutcome, Destination, Mission};
pub use motion::{Drive, DriveDevices, Motion};
pub use navigation::{Arrival, Navigator};
pub use position::{Cell, Position, Side};
