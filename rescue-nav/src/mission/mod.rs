//! Mission state machines.
//!
//! A run is `find_reference_corner` once, then `take_person` /
//! `deliver_person` pairs. [`Mission`] owns everything those steps share:
//! the navigator (and through it the motion layer and obstacle set), the
//! gripper and the delivery counter. All of it runs on the caller's thread.

mod corner;
mod delivery;
mod pickup;
mod places;

pub use corner::{transition, CornerState, Observation};
pub use delivery::DeliveryOutcome;
pub use places::{classify, DeliveryCounter, Destination};

use crate::config::{MissionConfig, NavConfig};
use crate::error::Result;
use crate::gripper::Gripper;
use crate::motion::{Motion, Pause};
use crate::navigation::Navigator;
use crate::position::{Position, Side};
use rescue_io::FloorColor;

/// Mission sequencer
pub struct Mission<M, G> {
    navigator: Navigator<M>,
    gripper: G,
    deliveries: DeliveryCounter,
    config: MissionConfig,
}

impl<M: Motion, G: Gripper> Mission<M, G> {
    pub fn new(motion: M, gripper: G, config: &NavConfig) -> Self {
        Self {
            navigator: Navigator::new(motion, config),
            gripper,
            deliveries: DeliveryCounter::new(),
            config: config.mission.clone(),
        }
    }

    pub fn navigator(&self) -> &Navigator<M> {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator<M> {
        &mut self.navigator
    }

    pub fn gripper(&self) -> &G {
        &self.gripper
    }

    pub fn deliveries(&self) -> &DeliveryCounter {
        &self.deliveries
    }

    pub fn position(&self) -> Position {
        self.navigator.position()
    }

    fn motion(&mut self) -> &mut M {
        self.navigator.motion_mut()
    }

    /// Square up on the red zone beside the reference corner and pin the
    /// position there
    fn square_up_at_origin(&mut self) -> Result<()> {
        self.motion().align_on_color(&[FloorColor::Red], None)?;
        self.motion().pause(Pause::Short);
        self.motion().reset_heading(Side::Left.degrees())?;
        self.motion().set_position(Position::origin());
        Ok(())
    }
}
