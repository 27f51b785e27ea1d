//! Gripper interface and the motor-backed claw.

use crate::error::Result;
use rescue_io::drivers::GripperMotor;
use rescue_io::{RelayChannel, SensorRelay, ZoneColor};
use std::sync::Arc;
use tracing::{debug, warn};

/// Closing speed in deg/s
const GRAB_SPEED: f32 = -200.0;
/// Duty cycle limit while closing, in percent
const GRAB_DUTY_LIMIT: u8 = 97;
/// Stalling beyond this angle means the jaws closed on nothing
const EMPTY_GRIP_ANGLE: f32 = -280.0;
/// Opening speed in deg/s
const OPEN_SPEED: f32 = 200.0;

/// Gripper as seen by the mission layer
pub trait Gripper {
    /// Close on whatever is in the gripper zone. `true` if something was caught.
    fn grab(&mut self) -> Result<bool>;

    /// Release and return to the open position
    fn open(&mut self) -> Result<()>;

    /// Keep the current grip
    fn hold(&mut self) -> Result<()>;

    /// Colour of the person in the gripper zone (relay reading; absent reads as none)
    fn zone_color(&self) -> ZoneColor;
}

/// Single-motor claw with its colour sensor on the relay robot
pub struct Claw {
    motor: Box<dyn GripperMotor>,
    relay: Arc<dyn SensorRelay>,
}

impl Claw {
    /// Take the current jaw position as open and hold it
    pub fn new(mut motor: Box<dyn GripperMotor>, relay: Arc<dyn SensorRelay>) -> Result<Self> {
        motor.reset_angle(0.0)?;
        motor.hold()?;
        Ok(Self { motor, relay })
    }
}

impl Gripper for Claw {
    fn grab(&mut self) -> Result<bool> {
        let angle = self.motor.run_until_stalled(GRAB_SPEED, GRAB_DUTY_LIMIT)?;
        let caught = angle > EMPTY_GRIP_ANGLE;
        if caught {
            debug!("claw stalled at {:.0}°", angle);
        } else {
            warn!("claw closed on nothing (stalled at {:.0}°)", angle);
        }
        Ok(caught)
    }

    fn open(&mut self) -> Result<()> {
        self.motor.run_target(OPEN_SPEED, 0.0)?;
        Ok(())
    }

    fn hold(&mut self) -> Result<()> {
        self.motor.hold()?;
        Ok(())
    }

    fn zone_color(&self) -> ZoneColor {
        self.relay
            .read(RelayChannel::ZoneColor)
            .map(|code| ZoneColor::from_code(code.round() as u8))
            .unwrap_or(ZoneColor::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rescue_io::devices::sim::SimArena;

    fn claw_on(sim: &SimArena) -> Claw {
        Claw::new(Box::new(sim.gripper_motor()), Arc::new(sim.relay())).unwrap()
    }

    #[test]
    fn test_grab_success_threshold() {
        let sim = SimArena::with_defaults();
        let mut claw = claw_on(&sim);

        sim.script_stall(-150.0);
        assert!(claw.grab().unwrap());

        sim.script_stall(-280.0);
        assert!(!claw.grab().unwrap());

        sim.script_stall(-279.0);
        assert!(claw.grab().unwrap());
    }

    #[test]
    fn test_open_runs_to_zero() {
        let sim = SimArena::with_defaults();
        let mut claw = claw_on(&sim);
        claw.open().unwrap();
        assert_eq!(sim.gripper_counts(), (0, 1));
    }

    #[test]
    fn test_zone_color_from_relay() {
        let sim = SimArena::with_defaults();
        let claw = claw_on(&sim);
        assert_eq!(claw.zone_color(), ZoneColor::None);

        sim.set_zone(Some(ZoneColor::Brown));
        assert_eq!(claw.zone_color(), ZoneColor::Brown);
    }
}
