//! Reference-corner search.
//!
//! At power-on the robot knows neither its cell nor its heading. It probes
//! forward until it meets a floor marker or an obstacle, then follows a
//! short scripted sequence per marker until it reaches the blue zone next to
//! the reference corner, where heading and position are pinned to
//! `(0, 0)` facing LEFT.
//!
//! Each state runs one scripted action and reports an [`Observation`];
//! [`transition`] maps the pair to the next state.
//!
//! | State | Action | Next |
//! |-------|--------|------|
//! | `Probe` | drive until marker or obstacle | by what was seen |
//! | `JunctionStripe` | align, back off, turn right | `Probe` |
//! | `ObstacleAhead` | back off, turn right | `Probe` |
//! | `RedZone` | align, back off, turn right, drive to marker | `BlueZone` / `RedFirstJunction` |
//! | `RedFirstJunction` | align, back off, turn around, drive to marker | `BlueZone` / `RedSecondJunction` |
//! | `RedSecondJunction` | align | `FarCorner` if yellow on both sides, else `EastSide` |
//! | `FarCorner` | pin (0,4) BACK, navigate to (1,0) | `BlueZone` |
//! | `EastSide` | pin (4,2) LEFT, navigate to (3,0) | `EastProbe` / `TurnAroundToBlue` |
//! | `EastProbe` | drive until marker or obstacle | `BlueZone` / `BlackStripe` / `ObstacleAtTop` |
//! | `BlackStripe` | pin (1,4) BACK, navigate to (1,0) | `BlueZone` |
//! | `ObstacleAtTop` | record obstacle, navigate to (1,0) | `BlueZone` |
//! | `TurnAroundToBlue` | turn around, drive to marker | `BlueZone` |
//! | `BlueZone` | align on blue, drive to red, pin origin | `Done` |

use super::Mission;
use crate::error::Result;
use crate::gripper::Gripper;
use crate::motion::{DriveRequest, Motion, Pause, StopCondition};
use crate::position::{Position, Side};
use rescue_io::FloorColor;
use tracing::info;

const PROBE_SPEED: f32 = 150.0;
const EAST_PROBE_SPEED: f32 = 100.0;
const OBSTACLE_BACKOFF_MM: f32 = 180.0;
const JUNCTION_BACKOFF_MM: f32 = 50.0;
const RED_BACKOFF_MM: f32 = 30.0;
const MARKER_BACKOFF_MM: f32 = 40.0;

const JUNCTION_COLORS: [FloorColor; 2] = [FloorColor::Black, FloorColor::Yellow];

/// Search state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CornerState {
    Probe,
    JunctionStripe,
    ObstacleAhead,
    RedZone,
    RedFirstJunction,
    RedSecondJunction { yellow_at_right: bool },
    FarCorner,
    EastSide,
    EastProbe,
    BlackStripe,
    ObstacleAtTop,
    TurnAroundToBlue,
    BlueZone,
    Done,
}

/// What a state's action reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// The action has a single outcome
    Nothing,
    /// Floor colours (and the obstacle check) after a probing drive
    Floor {
        left: FloorColor,
        right: FloorColor,
        obstacle_close: bool,
    },
    /// Junction alignment result, and whether blue was found beyond it
    Junction { saw_yellow: bool, blue_ahead: bool },
    /// Whether a navigation target was reached
    Reachable(bool),
}

impl Observation {
    fn floor_has(&self, colors: &[FloorColor]) -> bool {
        match *self {
            Observation::Floor { left, right, .. } => {
                colors.contains(&left) || colors.contains(&right)
            }
            _ => false,
        }
    }
}

/// Next search state
pub fn transition(state: CornerState, observation: Observation) -> CornerState {
    use CornerState::*;

    match state {
        Probe => {
            if observation.floor_has(&JUNCTION_COLORS) {
                JunctionStripe
            } else if observation.floor_has(&[FloorColor::Red]) {
                RedZone
            } else if observation.floor_has(&[FloorColor::Blue]) {
                BlueZone
            } else if matches!(
                observation,
                Observation::Floor {
                    obstacle_close: true,
                    ..
                }
            ) {
                ObstacleAhead
            } else {
                Probe
            }
        }
        JunctionStripe | ObstacleAhead => Probe,
        RedZone => {
            if observation.floor_has(&[FloorColor::Blue]) {
                BlueZone
            } else {
                RedFirstJunction
            }
        }
        RedFirstJunction => match observation {
            Observation::Junction {
                blue_ahead: true, ..
            } => BlueZone,
            Observation::Junction { saw_yellow, .. } => RedSecondJunction {
                yellow_at_right: saw_yellow,
            },
            _ => RedSecondJunction {
                yellow_at_right: false,
            },
        },
        RedSecondJunction { yellow_at_right } => match observation {
            Observation::Junction {
                saw_yellow: true, ..
            } if yellow_at_right => FarCorner,
            _ => EastSide,
        },
        EastSide => match observation {
            Observation::Reachable(true) => EastProbe,
            _ => TurnAroundToBlue,
        },
        EastProbe => {
            if observation.floor_has(&[FloorColor::Blue]) {
                BlueZone
            } else if observation.floor_has(&[FloorColor::Black]) {
                BlackStripe
            } else {
                ObstacleAtTop
            }
        }
        FarCorner | BlackStripe | ObstacleAtTop | TurnAroundToBlue => BlueZone,
        BlueZone | Done => Done,
    }
}

impl<M: Motion, G: Gripper> Mission<M, G> {
    /// Find the reference corner and pin the position to `(0, 0)` facing LEFT.
    pub fn find_reference_corner(&mut self) -> Result<()> {
        let mut state = CornerState::Probe;
        while state != CornerState::Done {
            let observation = self.corner_action(state)?;
            let next = transition(state, observation);
            info!("corner search: {:?} -> {:?}", state, next);
            state = next;
        }
        Ok(())
    }

    fn corner_action(&mut self, state: CornerState) -> Result<Observation> {
        use CornerState::*;

        match state {
            Probe => {
                self.motion().drive(
                    DriveRequest::until(PROBE_SPEED, StopCondition::FloorMarker)
                        .or_until(StopCondition::ObstacleVeryClose),
                )?;
                self.observe_floor()
            }
            JunctionStripe => {
                self.motion().align_on_color(&JUNCTION_COLORS, None)?;
                self.back_off(JUNCTION_BACKOFF_MM)?;
                self.motion().pause(Pause::Long);
                self.motion().turn_angle(90.0)?;
                Ok(Observation::Nothing)
            }
            ObstacleAhead => {
                self.back_off(OBSTACLE_BACKOFF_MM)?;
                self.motion().pause(Pause::Long);
                self.motion().turn_angle(90.0)?;
                Ok(Observation::Nothing)
            }
            RedZone => {
                self.motion().align_on_color(&[FloorColor::Red], None)?;
                self.back_off(RED_BACKOFF_MM)?;
                self.motion().pause(Pause::Long);
                self.motion().turn_angle(90.0)?;
                self.drive_to_marker()?;
                self.observe_floor()
            }
            RedFirstJunction => {
                let aligned = self.motion().align_on_color(&JUNCTION_COLORS, None)?;
                self.back_off(MARKER_BACKOFF_MM)?;
                self.motion().pause(Pause::Long);
                self.motion().turn_angle(-180.0)?;
                self.drive_to_marker()?;
                let blue_ahead = self.motion().sees_any(&[FloorColor::Blue])?;
                Ok(Observation::Junction {
                    saw_yellow: aligned.saw_yellow,
                    blue_ahead,
                })
            }
            RedSecondJunction { .. } => {
                let aligned = self.motion().align_on_color(&JUNCTION_COLORS, None)?;
                Ok(Observation::Junction {
                    saw_yellow: aligned.saw_yellow,
                    blue_ahead: false,
                })
            }
            FarCorner => {
                self.back_off(MARKER_BACKOFF_MM)?;
                self.motion().set_position(Position::new(0, 4, Side::Back));
                self.motion().reset_heading(Side::Back.degrees())?;
                self.return_to_blue_row()?;
                Ok(Observation::Nothing)
            }
            EastSide => {
                self.motion().align_on_color(&JUNCTION_COLORS, None)?;
                self.back_off(MARKER_BACKOFF_MM)?;
                self.motion().pause(Pause::Long);
                self.motion().turn_angle(-90.0)?;
                self.motion().set_position(Position::new(4, 2, Side::Left));
                self.motion().reset_heading(Side::Left.degrees())?;
                let arrival = self
                    .navigator
                    .go_to_position(Position::new(3, 0, Side::Front))?;
                Ok(Observation::Reachable(arrival.is_arrived()))
            }
            EastProbe => {
                self.motion().drive(
                    DriveRequest::until(EAST_PROBE_SPEED, StopCondition::FloorMarker)
                        .or_until(StopCondition::ObstacleVeryClose),
                )?;
                self.observe_floor()
            }
            BlackStripe => {
                self.motion().align_on_color(&[FloorColor::Black], None)?;
                self.motion().pause(Pause::Short);
                self.motion().reset_heading(Side::Back.degrees())?;
                self.motion().pause(Pause::Short);
                self.motion()
                    .drive(DriveRequest::distance(PROBE_SPEED, -JUNCTION_BACKOFF_MM))?;
                self.motion().set_position(Position::new(1, 4, Side::Back));
                self.return_to_blue_row()?;
                Ok(Observation::Nothing)
            }
            ObstacleAtTop => {
                self.motion().pause(Pause::Long);
                self.motion()
                    .drive(DriveRequest::distance(PROBE_SPEED, -OBSTACLE_BACKOFF_MM))?;
                self.motion().set_position(Position::new(3, 2, Side::Front));
                let ahead = self.motion().position().square_ahead();
                self.navigator.add_obstacle(ahead);
                self.return_to_blue_row()?;
                Ok(Observation::Nothing)
            }
            TurnAroundToBlue => {
                self.motion().pause(Pause::Long);
                self.motion().turn_angle(180.0)?;
                self.drive_to_marker()?;
                Ok(Observation::Nothing)
            }
            BlueZone => {
                self.motion().align_on_color(&[FloorColor::Blue], None)?;
                self.motion().pause(Pause::Short);
                self.motion().reset_heading(Side::Front.degrees())?;
                self.back_off(MARKER_BACKOFF_MM)?;
                self.motion().pause(Pause::Long);
                self.motion().turn_angle(-90.0)?;
                self.motion().pause(Pause::Long);
                self.motion().drive(
                    DriveRequest::until(PROBE_SPEED, StopCondition::FloorMarker)
                        .facing(Side::Left),
                )?;
                self.square_up_at_origin()?;
                Ok(Observation::Nothing)
            }
            Done => Ok(Observation::Nothing),
        }
    }

    fn observe_floor(&mut self) -> Result<Observation> {
        let (left, right) = self.motion().floor_colors()?;
        let obstacle_close = self.motion().obstacle_very_close();
        Ok(Observation::Floor {
            left,
            right,
            obstacle_close,
        })
    }

    /// Pause, then reverse `mm`
    fn back_off(&mut self, mm: f32) -> Result<()> {
        self.motion().pause(Pause::Long);
        self.motion()
            .drive(DriveRequest::distance(PROBE_SPEED, -mm))
    }

    fn drive_to_marker(&mut self) -> Result<()> {
        self.motion().pause(Pause::Long);
        self.motion()
            .drive(DriveRequest::until(PROBE_SPEED, StopCondition::FloorMarker))
    }

    /// From a pinned position, head for the cell in front of the blue zone
    fn return_to_blue_row(&mut self) -> Result<()> {
        self.navigator
            .go_to_position(Position::new(1, 0, Side::Front))?;
        self.motion()
            .drive(DriveRequest::until(PROBE_SPEED, StopCondition::FloorMarker))
    }
}
