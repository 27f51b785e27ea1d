//! Person delivery.

use super::{Destination, Mission};
use crate::error::Result;
use crate::gripper::Gripper;
use crate::motion::{DriveRequest, Motion, Pause, StopCondition};
use crate::position::{Position, Side};
use rescue_io::FloorColor;
use tracing::{info, warn};

const UNLOAD_SPEED: f32 = 100.0;
/// The forward run after release stops this much short of the unload reverse
const UNLOAD_RETURN_SHORTFALL_MM: f32 = 40.0;
const HOME_BACKOFF_MM: f32 = 40.0;
const HOME_SPEED: f32 = 150.0;
/// Below this many completed deliveries the robot also squares up on the red
/// zone before the next pickup
const REALIGN_BELOW_DELIVERIES: u32 = 2;

/// Cell in front of the blue zone, facing it
const HOME_APPROACH: Position = Position::new(1, 0, Side::Front);

/// Result of [`Mission::deliver_person`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Released at this entrance and back on the pickup row
    Delivered { entrance: Position },
    /// Released at this entrance, but the way home is blocked. The position
    /// keeps the last cell reached on the way.
    Stranded { entrance: Position },
    /// No entrance could be reached; the person is still held
    Unreachable,
}

impl<M: Motion, G: Gripper> Mission<M, G> {
    /// Deliver the held person to `place`, then head back toward the
    /// reference corner.
    pub fn deliver_person(&mut self, place: Destination) -> Result<DeliveryOutcome> {
        let delivered_here = self.deliveries.count(place);
        let clearance = place.unload_clearance(delivered_here, &self.config);
        let entrances = place.entrances(self.deliveries.count(Destination::Park));

        let mut reached = None;
        for entrance in entrances {
            if self.navigator.go_to_position(entrance)?.is_arrived() {
                reached = Some(entrance);
                break;
            }
            info!("{} entrance {} unreachable, trying the next", place, entrance);
        }
        let Some(entrance) = reached else {
            warn!("no entrance of the {} is reachable", place);
            return Ok(DeliveryOutcome::Unreachable);
        };

        self.motion().align_on_color(
            &[FloorColor::Blue, FloorColor::Black, FloorColor::Yellow],
            None,
        )?;
        self.motion().pause(Pause::Short);
        self.motion()
            .drive(DriveRequest::distance(UNLOAD_SPEED, -clearance))?;
        self.gripper.open()?;
        self.motion().drive(DriveRequest::distance(
            UNLOAD_SPEED,
            clearance - UNLOAD_RETURN_SHORTFALL_MM,
        ))?;

        let count = self.deliveries.record(place);
        info!("delivered to the {} at {} ({} there so far)", place, entrance, count);

        if self.return_home()? {
            Ok(DeliveryOutcome::Delivered { entrance })
        } else {
            Ok(DeliveryOutcome::Stranded { entrance })
        }
    }

    /// Re-zero the heading on the blue zone and face the pickup row.
    ///
    /// Ends at the origin facing LEFT while fewer than two people have been
    /// delivered, otherwise at (1, 0) facing LEFT. Returns `false` without
    /// aligning when the blue zone cannot be reached.
    fn return_home(&mut self) -> Result<bool> {
        if !self.navigator.go_to_position(HOME_APPROACH)?.is_arrived() {
            warn!("cannot reach {} on the way home", HOME_APPROACH);
            return Ok(false);
        }
        self.motion().align_on_color(&[FloorColor::Blue], None)?;
        self.motion().pause(Pause::Short);
        self.motion().reset_heading(Side::Front.degrees())?;
        self.motion().pause(Pause::Short);
        self.motion()
            .drive(DriveRequest::distance(HOME_SPEED, -HOME_BACKOFF_MM))?;
        self.motion().pause(Pause::Short);
        self.motion().turn_to_side(Side::Left)?;

        if self.deliveries.total() < REALIGN_BELOW_DELIVERIES {
            self.motion().pause(Pause::Long);
            self.motion().drive(
                DriveRequest::until(UNLOAD_SPEED, StopCondition::FloorMarker).facing(Side::Left),
            )?;
            self.square_up_at_origin()?;
        }
        Ok(true)
    }
}
