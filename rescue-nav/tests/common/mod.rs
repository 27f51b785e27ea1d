//! Scripted motion and gripper fakes for driving the navigation and mission
//! layers without devices.

#![allow(dead_code)]

use rescue_io::{FloorColor, ZoneColor};
use rescue_nav::gripper::Gripper;
use rescue_nav::motion::{AlignOutcome, DriveRequest, Motion, Pause, PersonMeasurement};
use rescue_nav::{Cell, NavConfig, NavError, Position, Result, Side};
use std::collections::VecDeque;

/// What the sensors report after a condition-bounded drive stops
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sensed {
    pub left: FloorColor,
    pub right: FloorColor,
    pub person: bool,
    pub obstacle_close: bool,
}

impl Sensed {
    pub fn floor(left: FloorColor, right: FloorColor) -> Self {
        Self {
            left,
            right,
            person: false,
            obstacle_close: false,
        }
    }

    pub fn both(color: FloorColor) -> Self {
        Self::floor(color, color)
    }

    pub fn person() -> Self {
        Self {
            person: true,
            ..Self::both(FloorColor::White)
        }
    }

    pub fn obstacle() -> Self {
        Self {
            obstacle_close: true,
            ..Self::both(FloorColor::White)
        }
    }
}

/// Every primitive call, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    TurnAngle(f32),
    TurnToSide(Side),
    Drive(DriveRequest),
    Squares(i32, Side),
    Align(Vec<FloorColor>),
    ResetHeading(f32),
    SetPosition(Position),
    Measure,
}

/// Grid-level stand-in for the drive.
///
/// Whole-square legs move the position exactly. Physical obstacles are
/// hidden cells that only show up through `obstacle_far` when the robot
/// faces them. Each drive bounded by stop conditions consumes one scripted
/// [`Sensed`] entry; running out is an error so a looping sequence fails the
/// test instead of hanging it.
pub struct FakeMotion {
    pub position: Position,
    pub hidden: Vec<Cell>,
    pub sensed: VecDeque<Sensed>,
    pub aligns: VecDeque<AlignOutcome>,
    pub measurements: VecDeque<PersonMeasurement>,
    pub calls: Vec<Call>,
    /// Landing cell of every whole-square leg
    pub route: Vec<Cell>,
    current: Sensed,
}

impl FakeMotion {
    pub fn at(position: Position) -> Self {
        Self {
            position,
            hidden: Vec::new(),
            sensed: VecDeque::new(),
            aligns: VecDeque::new(),
            measurements: VecDeque::new(),
            calls: Vec::new(),
            route: Vec::new(),
            current: Sensed::both(FloorColor::White),
        }
    }

    pub fn with_hidden(mut self, cells: &[Cell]) -> Self {
        self.hidden.extend_from_slice(cells);
        self
    }

    pub fn script(mut self, sensed: &[Sensed]) -> Self {
        self.sensed.extend(sensed.iter().copied());
        self
    }

    pub fn count<F: Fn(&Call) -> bool>(&self, pred: F) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }
}

impl Motion for FakeMotion {
    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.calls.push(Call::SetPosition(position));
        self.position = position;
    }

    fn turn_angle(&mut self, delta: f32) -> Result<()> {
        self.calls.push(Call::TurnAngle(delta));
        Ok(())
    }

    fn turn_to_side(&mut self, side: Side) -> Result<()> {
        self.calls.push(Call::TurnToSide(side));
        self.position.heading = side;
        Ok(())
    }

    fn drive(&mut self, request: DriveRequest) -> Result<()> {
        if !request.is_bounded() {
            return Err(NavError::UnboundedDrive);
        }
        let bounded_by_condition = !request.stop_on.is_empty();
        self.calls.push(Call::Drive(request));

        if bounded_by_condition {
            self.current = self.sensed.pop_front().ok_or_else(|| {
                NavError::Io(rescue_io::Error::Other("sensor script exhausted".to_string()))
            })?;
        } else {
            self.current = Sensed::both(FloorColor::White);
        }
        Ok(())
    }

    fn drive_squares(&mut self, squares: i32, direction: Option<Side>) -> Result<()> {
        let side = direction.unwrap_or(self.position.heading);
        self.calls.push(Call::Squares(squares, side));
        self.position.heading = side;
        self.position.advance(squares);
        self.route.push(self.position.cell);
        Ok(())
    }

    fn align_on_color(
        &mut self,
        targets: &[FloorColor],
        _limit_angle: Option<f32>,
    ) -> Result<AlignOutcome> {
        self.calls.push(Call::Align(targets.to_vec()));
        self.current = Sensed::both(FloorColor::White);
        Ok(self.aligns.pop_front().unwrap_or_default())
    }

    fn reset_heading(&mut self, angle: f32) -> Result<()> {
        self.calls.push(Call::ResetHeading(angle));
        Ok(())
    }

    fn floor_colors(&mut self) -> Result<(FloorColor, FloorColor)> {
        Ok((self.current.left, self.current.right))
    }

    fn obstacle_far(&mut self) -> bool {
        self.hidden.contains(&self.position.square_ahead())
    }

    fn obstacle_very_close(&mut self) -> bool {
        self.current.obstacle_close
    }

    fn person_below(&mut self) -> Result<bool> {
        Ok(self.current.person)
    }

    fn measure_person(&mut self) -> Result<PersonMeasurement> {
        self.calls.push(Call::Measure);
        Ok(self.measurements.pop_front().unwrap_or(PersonMeasurement {
            distance_mm: 60.0,
            is_adult: false,
        }))
    }

    fn pause(&mut self, _pause: Pause) {}
}

/// Gripper with scripted grab results
#[derive(Default)]
pub struct ScriptedGripper {
    pub grabs: VecDeque<bool>,
    pub zone: Option<ZoneColor>,
    pub opens: u32,
    pub grab_calls: u32,
    pub holds: u32,
}

impl ScriptedGripper {
    pub fn new(grabs: &[bool], zone: ZoneColor) -> Self {
        Self {
            grabs: grabs.iter().copied().collect(),
            zone: Some(zone),
            ..Default::default()
        }
    }
}

impl Gripper for ScriptedGripper {
    fn grab(&mut self) -> Result<bool> {
        self.grab_calls += 1;
        Ok(self.grabs.pop_front().unwrap_or(true))
    }

    fn open(&mut self) -> Result<()> {
        self.opens += 1;
        Ok(())
    }

    fn hold(&mut self) -> Result<()> {
        self.holds += 1;
        Ok(())
    }

    fn zone_color(&self) -> ZoneColor {
        self.zone.unwrap_or(ZoneColor::None)
    }
}

/// Competition configuration with real-time pacing off
pub fn test_config() -> NavConfig {
    let mut config = NavConfig::default();
    config.motion.realtime = false;
    config
}
