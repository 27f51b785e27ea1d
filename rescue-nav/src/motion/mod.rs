//! Motion primitives.
//!
//! [`Motion`] is the interface the navigation loop and the mission state
//! machines are written against; [`Drive`] implements it on top of the
//! device driver traits. Every primitive blocks until its own termination
//! condition fires.
//!
//! | Primitive | Terminates when |
//! |-----------|-----------------|
//! | [`Motion::turn_angle`] | heading error within tolerance |
//! | [`Motion::drive`] | target distance reached or a [`StopCondition`] holds |
//! | [`Motion::align_on_color`] | both sides back on white, or heading drift exceeds the limit |
//! | [`Motion::measure_person`] | measuring excursion complete |

mod drive;
mod pid;

pub use drive::{Drive, DriveDevices};
pub use pid::Pid;

use crate::config::SensingConfig;
use crate::error::Result;
use crate::position::{Position, Side};
use rescue_io::FloorColor;

/// Predicate that ends a [`DriveRequest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopCondition {
    /// Either floor sensor reads anything but white
    FloorMarker,
    /// Underside sensor sees a person
    PersonBelow,
    /// Relay obstacle sensor reads very close
    ObstacleVeryClose,
}

/// Straight drive with heading hold.
///
/// At least one of `distance` and `stop_on` must be set; a request with
/// neither is rejected with [`NavError::UnboundedDrive`](crate::NavError::UnboundedDrive).
#[derive(Debug, Clone, PartialEq)]
pub struct DriveRequest {
    /// Commanded speed in mm/s. With a distance only the magnitude is used.
    pub speed: f32,
    /// Signed distance in mm (negative drives backward)
    pub distance: Option<f32>,
    /// Any of these ends the drive
    pub stop_on: Vec<StopCondition>,
    /// Absolute side to hold; defaults to the heading at the start
    pub direction: Option<Side>,
}

impl DriveRequest {
    /// Drive a signed distance
    pub fn distance(speed: f32, distance_mm: f32) -> Self {
        Self {
            speed,
            distance: Some(distance_mm),
            stop_on: Vec::new(),
            direction: None,
        }
    }

    /// Drive at constant speed until `condition` holds
    pub fn until(speed: f32, condition: StopCondition) -> Self {
        Self {
            speed,
            distance: None,
            stop_on: vec![condition],
            direction: None,
        }
    }

    /// Also stop when `condition` holds
    pub fn or_until(mut self, condition: StopCondition) -> Self {
        self.stop_on.push(condition);
        self
    }

    /// Hold an absolute side instead of the starting heading
    pub fn facing(mut self, side: Side) -> Self {
        self.direction = Some(side);
        self
    }

    pub fn is_bounded(&self) -> bool {
        self.distance.is_some() || !self.stop_on.is_empty()
    }
}

/// Result of [`Motion::align_on_color`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlignOutcome {
    /// The yellow stripe was crossed during the manoeuvre
    pub saw_yellow: bool,
    /// Stopped because heading drift exceeded the limit, not by converging
    pub aborted: bool,
}

/// Person size estimate from [`Motion::measure_person`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersonMeasurement {
    /// Mean underside distance in mm
    pub distance_mm: f32,
    pub is_adult: bool,
}

/// Pause between scripted steps so mechanisms settle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    Short,
    Long,
}

/// Motion primitives plus the sensor queries the upper layers branch on.
pub trait Motion {
    /// Last confirmed position
    fn position(&self) -> Position;

    /// Overwrite the confirmed position (calibration and arrival only)
    fn set_position(&mut self, position: Position);

    /// Turn in place by `delta` degrees (positive clockwise)
    fn turn_angle(&mut self, delta: f32) -> Result<()>;

    /// Turn the short way to `side` and confirm it as the heading
    fn turn_to_side(&mut self, side: Side) -> Result<()>;

    /// Drive straight until the request terminates
    fn drive(&mut self, request: DriveRequest) -> Result<()>;

    /// Drive whole squares and advance the position accordingly.
    ///
    /// Holds `direction` (or the confirmed heading) and confirms it as the
    /// heading before advancing.
    fn drive_squares(&mut self, squares: i32, direction: Option<Side>) -> Result<()>;

    /// Square up on a floor marker with both colour sensors
    fn align_on_color(
        &mut self,
        targets: &[FloorColor],
        limit_angle: Option<f32>,
    ) -> Result<AlignOutcome>;

    /// Redefine the current physical heading as `angle` degrees
    fn reset_heading(&mut self, angle: f32) -> Result<()>;

    /// Current (left, right) floor colours
    fn floor_colors(&mut self) -> Result<(FloorColor, FloorColor)>;

    /// Relay obstacle reading says the square ahead is blocked
    fn obstacle_far(&mut self) -> bool;

    /// Relay obstacle reading says something is about to be hit
    fn obstacle_very_close(&mut self) -> bool;

    /// Underside sensor sees a person
    fn person_below(&mut self) -> Result<bool>;

    /// Reverse over a person while sampling its size
    fn measure_person(&mut self) -> Result<PersonMeasurement>;

    /// Wait for mechanisms to settle
    fn pause(&mut self, pause: Pause);

    /// Either floor sensor reads anything but white
    fn sees_marker(&mut self) -> Result<bool> {
        let (left, right) = self.floor_colors()?;
        Ok(left.is_marker() || right.is_marker())
    }

    /// Either floor sensor reads one of `colors`
    fn sees_any(&mut self, colors: &[FloorColor]) -> Result<bool> {
        let (left, right) = self.floor_colors()?;
        Ok(colors.contains(&left) || colors.contains(&right))
    }
}

/// Reduce measurement samples to a [`PersonMeasurement`].
///
/// Underside samples at or above `person_below_mm` saw past the person and
/// are dropped; with none left the distance falls back to
/// `fallback_person_distance_mm`. The person is an adult when more overhead
/// samples are at or below `adult_overhead_mm` than above it.
pub fn summarize_person(
    underside: &[f32],
    overhead: &[f32],
    sensing: &SensingConfig,
) -> PersonMeasurement {
    let valid: Vec<f32> = underside
        .iter()
        .copied()
        .filter(|&d| d < sensing.person_below_mm)
        .collect();

    let distance_mm = if valid.is_empty() {
        sensing.fallback_person_distance_mm
    } else {
        valid.iter().sum::<f32>() / valid.len() as f32
    };

    let tall = overhead
        .iter()
        .filter(|&&d| d <= sensing.adult_overhead_mm)
        .count();
    let short = overhead.len() - tall;

    PersonMeasurement {
        distance_mm,
        is_adult: tall > short,
    }
}
