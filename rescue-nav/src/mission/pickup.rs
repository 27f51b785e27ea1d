//! Person pickup: find a person along the pickup row, measure, grab, classify.

use super::{classify, Destination, Mission};
use crate::error::Result;
use crate::gripper::Gripper;
use crate::motion::{DriveRequest, Motion, Pause, StopCondition};
use crate::position::{Position, Side};
use rescue_io::FloorColor;
use tracing::{info, warn};

const SEARCH_SPEED: f32 = 150.0;
/// Red marker at the far end of the row: come forward this far before
/// searching back
const RED_END_RETURN_MM: f32 = 300.0;
/// Added to the measured underside distance to get the docking distance
const DOCK_MARGIN_MM: f32 = 20.0;
/// Drive forward past the person before turning to dock
const DOCK_OFFSET_MM: f32 = 55.0;
const DOCK_SPEED: f32 = 50.0;
const RETURN_SPEED: f32 = 175.0;
/// Final reverse from the red marker onto the reference cell
const CORNER_SETBACK_MM: f32 = 35.0;

impl<M: Motion, G: Gripper> Mission<M, G> {
    /// Pick up the next person and return where they go.
    ///
    /// Starts and ends at the reference corner facing LEFT. Returns `None`
    /// (with the gripper opened) when the grasp failed or the person's
    /// colour and size map to no destination; the caller retries.
    pub fn take_person(&mut self) -> Result<Option<Destination>> {
        self.search_for_person()?;

        let measurement = self.motion().measure_person()?;
        let dock_mm = measurement.distance_mm + DOCK_MARGIN_MM;
        info!(
            "person found: {:.0}mm below, adult={}",
            measurement.distance_mm, measurement.is_adult
        );

        self.motion()
            .drive(DriveRequest::distance(100.0, DOCK_OFFSET_MM).facing(Side::Left))?;
        self.motion().pause(Pause::Short);
        self.motion().turn_to_side(Side::Back)?;
        self.motion().pause(Pause::Short);
        self.motion()
            .drive(DriveRequest::distance(DOCK_SPEED, -dock_mm).facing(Side::Back))?;

        let caught = self.gripper.grab()?;
        if caught {
            self.gripper.hold()?;
        }

        self.motion().drive(
            DriveRequest::distance(SEARCH_SPEED, dock_mm + DOCK_MARGIN_MM).facing(Side::Back),
        )?;
        self.motion().pause(Pause::Short);
        self.motion().turn_to_side(Side::Left)?;
        self.motion().pause(Pause::Short);
        self.motion().drive(
            DriveRequest::until(RETURN_SPEED, StopCondition::FloorMarker).facing(Side::Left),
        )?;
        self.motion().align_on_color(&[FloorColor::Red], None)?;
        self.square_up_at_origin()?;
        self.motion().pause(Pause::Short);
        self.motion().drive(
            DriveRequest::distance(SEARCH_SPEED, -CORNER_SETBACK_MM).facing(Side::Left),
        )?;
        self.motion().set_position(Position::origin());

        if !caught {
            warn!("grasp failed, releasing");
            self.gripper.open()?;
            return Ok(None);
        }

        let color = self.gripper.zone_color();
        match classify(measurement.is_adult, color) {
            Some(place) => {
                info!(
                    "picked up {} {:?} person for the {}",
                    if measurement.is_adult { "adult" } else { "child" },
                    color,
                    place
                );
                Ok(Some(place))
            }
            None => {
                warn!(
                    "no destination for adult={} colour={:?}, releasing",
                    measurement.is_adult, color
                );
                self.gripper.open()?;
                Ok(None)
            }
        }
    }

    /// Repeat [`take_person`](Self::take_person) until it yields a
    /// destination or `attempts` runs out
    pub fn take_person_retrying(&mut self, attempts: usize) -> Result<Option<Destination>> {
        for attempt in 1..=attempts {
            if let Some(place) = self.take_person()? {
                return Ok(Some(place));
            }
            info!("pickup attempt {}/{} produced no destination", attempt, attempts);
        }
        Ok(None)
    }

    /// Reverse along the pickup row until a person is underneath.
    ///
    /// Marker stops are handled in place: the red marker at the far end sends
    /// the robot back up the row, any other marker is a junction stripe to
    /// reverse past.
    fn search_for_person(&mut self) -> Result<()> {
        loop {
            self.motion().pause(Pause::Long);
            self.motion().drive(
                DriveRequest::until(-SEARCH_SPEED, StopCondition::PersonBelow)
                    .or_until(StopCondition::FloorMarker)
                    .facing(Side::Left),
            )?;

            if self.motion().person_below()? {
                return Ok(());
            }

            if self.motion().sees_any(&[FloorColor::Red])? {
                info!("reached the end of the row without a person, turning back");
                self.motion()
                    .drive(DriveRequest::distance(SEARCH_SPEED, RED_END_RETURN_MM))?;
                self.motion().drive(DriveRequest::until(
                    SEARCH_SPEED,
                    StopCondition::FloorMarker,
                ))?;
            } else {
                let clearance = self.config.junction_clearance_mm;
                info!("stopped on a junction stripe, reversing {:.0}mm past it", clearance);
                self.motion().drive(
                    DriveRequest::distance(SEARCH_SPEED, -clearance).facing(Side::Left),
                )?;
            }
        }
    }
}
