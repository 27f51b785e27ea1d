//! Arena simulator for hardware-free testing
//!
//! Simulates the primary robot on the 5x5 grid arena closely enough to run
//! every motion primitive end to end:
//!
//! | Component | Simulation Method |
//! |-----------|-------------------|
//! | Drivetrain | Differential drive kinematics, one fixed step per command |
//! | Gyro | Integrated heading plus a resettable offset |
//! | Floor colour sensors | Lookup in a [`FloorMap`] at each sensor's position |
//! | Obstacle ultrasonic (relay) | Ray march against obstacle grid cells |
//! | Overhead / underside ultrasonic | Scripted values |
//! | Gripper motor | Scripted stall angles |
//!
//! # Time Model
//!
//! Nothing runs in the background. Each [`Drivetrain::drive`] or
//! [`Drivetrain::run_wheels`] call advances simulated time by one step
//! (`dt`); sensors report the state after the latest step. A control loop
//! that never terminates hits the step budget and gets
//! [`Error::SimulationBudget`] instead of hanging.
//!
//! # Arena Frame
//!
//! World millimetres with the origin at the outer corner of cell (0, 0),
//! +x toward RIGHT and +y toward BACK. Cell (x, y) spans
//! `[x * square, (x + 1) * square)` on each axis.

mod floor;
mod physics;

pub use floor::{FloorMap, FloorRegion};
pub use physics::{BodyGeometry, SimPose};

use crate::drivers::{
    ColorSensor, DistanceSensor, Drivetrain, GripperMotor, HeadingSensor, WheelCommand,
};
use crate::error::{Error, Result};
use crate::relay::{RelayChannel, SensorRelay};
use crate::types::{FloorColor, Rgb, ZoneColor};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Reading reported by an ultrasonic sensor that sees nothing
pub const NO_ECHO_MM: f32 = 2550.0;

/// Ray march resolution for the obstacle sensor
const RAY_STEP_MM: f32 = 5.0;

/// Simulation parameters
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Simulated seconds per drivetrain command
    pub dt: f32,
    /// Grid square edge in mm
    pub square_mm: f32,
    /// Abort after this many steps
    pub max_steps: u64,
    /// Robot dimensions
    pub body: BodyGeometry,
    /// Stall angle reported by the gripper when nothing is scripted
    pub default_stall_angle: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,
            square_mm: 300.0,
            max_steps: 2_000_000,
            body: BodyGeometry::default(),
            default_stall_angle: -200.0,
        }
    }
}

/// Which drive colour sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorSide {
    Left,
    Right,
}

/// Shared simulator state
#[derive(Debug)]
struct SimState {
    config: SimConfig,
    pose: SimPose,
    gyro_offset: f32,
    left_speed: f32,
    right_speed: f32,
    distance: f32,
    steps: u64,
    floor: FloorMap,
    obstacles: Vec<(i32, i32)>,
    underside_mm: f32,
    overhead_mm: Option<f32>,
    zone: Option<ZoneColor>,
    stall_script: VecDeque<f32>,
    gripper_angle: f32,
    gripper_grabs: u32,
    gripper_opens: u32,
}

impl SimState {
    fn step(&mut self) -> Result<()> {
        self.steps += 1;
        if self.steps > self.config.max_steps {
            return Err(Error::SimulationBudget(self.config.max_steps));
        }
        let ds = self.pose.integrate(
            self.left_speed,
            self.right_speed,
            self.config.body.half_track,
            self.config.dt,
        );
        self.distance += ds;
        Ok(())
    }

    fn sensor_color(&self, side: SensorSide) -> FloorColor {
        let body = &self.config.body;
        let lateral = match side {
            SensorSide::Left => -body.sensor_lateral,
            SensorSide::Right => body.sensor_lateral,
        };
        let (x, y) = self.pose.offset(body.sensor_forward, lateral);
        self.floor.color_at(x, y)
    }

    fn obstacle_distance(&self) -> f32 {
        let square = self.config.square_mm;
        let (fx, fy) = self.pose.forward();
        let mut travelled = 0.0;

        while travelled < NO_ECHO_MM {
            let px = self.pose.x + fx * travelled;
            let py = self.pose.y + fy * travelled;
            let cell = ((px / square).floor() as i32, (py / square).floor() as i32);
            if self.obstacles.contains(&cell) {
                return travelled;
            }
            travelled += RAY_STEP_MM;
        }
        NO_ECHO_MM
    }
}

/// Handle to a simulated arena. Cheap to clone; every clone and every
/// device handle shares the same state.
#[derive(Debug, Clone)]
pub struct SimArena {
    state: Arc<Mutex<SimState>>,
}

impl SimArena {
    /// Create an empty white arena with the robot at the origin corner
    pub fn new(config: SimConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                config,
                pose: SimPose::default(),
                gyro_offset: 0.0,
                left_speed: 0.0,
                right_speed: 0.0,
                distance: 0.0,
                steps: 0,
                floor: FloorMap::new(),
                obstacles: Vec::new(),
                underside_mm: NO_ECHO_MM,
                overhead_mm: None,
                zone: None,
                stall_script: VecDeque::new(),
                gripper_angle: 0.0,
                gripper_grabs: 0,
                gripper_opens: 0,
            })),
        }
    }

    /// Create an arena with default parameters
    pub fn with_defaults() -> Self {
        Self::new(SimConfig::default())
    }

    /// World coordinates of a cell centre
    pub fn cell_center(&self, x: i32, y: i32) -> (f32, f32) {
        let square = self.state.lock().config.square_mm;
        (
            x as f32 * square + square / 2.0,
            y as f32 * square + square / 2.0,
        )
    }

    /// Put the robot at a cell centre facing `theta` and align the gyro to it
    pub fn place_in_cell(&self, x: i32, y: i32, theta: f32) {
        let (wx, wy) = self.cell_center(x, y);
        self.place(SimPose::new(wx, wy, theta));
    }

    /// Put the robot at an exact pose and align the gyro to it
    pub fn place(&self, pose: SimPose) {
        let mut state = self.state.lock();
        state.pose = pose;
        state.gyro_offset = 0.0;
        state.left_speed = 0.0;
        state.right_speed = 0.0;
    }

    /// Current true pose
    pub fn pose(&self) -> SimPose {
        self.state.lock().pose
    }

    /// Cell containing the robot's axle centre
    pub fn cell(&self) -> (i32, i32) {
        let state = self.state.lock();
        let square = state.config.square_mm;
        (
            (state.pose.x / square).floor() as i32,
            (state.pose.y / square).floor() as i32,
        )
    }

    /// Steps simulated so far
    pub fn steps(&self) -> u64 {
        self.state.lock().steps
    }

    /// Add a floor region (lower priority than earlier ones)
    pub fn add_region(&self, region: FloorRegion) {
        self.state.lock().floor.push(region);
    }

    /// Put a physical obstacle in a grid cell
    pub fn add_obstacle(&self, x: i32, y: i32) {
        self.state.lock().obstacles.push((x, y));
    }

    /// Reading of the underside ultrasonic sensor
    pub fn set_underside(&self, mm: f32) {
        self.state.lock().underside_mm = mm;
    }

    /// Relay overhead reading (`None` = nothing received yet)
    pub fn set_overhead(&self, mm: Option<f32>) {
        self.state.lock().overhead_mm = mm;
    }

    /// Relay gripper-zone colour (`None` = nothing received yet)
    pub fn set_zone(&self, zone: Option<ZoneColor>) {
        self.state.lock().zone = zone;
    }

    /// Queue the stall angle for the next grab
    pub fn script_stall(&self, angle: f32) {
        self.state.lock().stall_script.push_back(angle);
    }

    /// (grabs, opens) performed by the gripper motor
    pub fn gripper_counts(&self) -> (u32, u32) {
        let state = self.state.lock();
        (state.gripper_grabs, state.gripper_opens)
    }

    pub fn heading_sensor(&self) -> SimHeading {
        SimHeading {
            state: Arc::clone(&self.state),
        }
    }

    pub fn drivetrain(&self) -> SimDrivetrain {
        SimDrivetrain {
            state: Arc::clone(&self.state),
        }
    }

    pub fn color_sensor(&self, side: SensorSide) -> SimColorSensor {
        SimColorSensor {
            state: Arc::clone(&self.state),
            side,
        }
    }

    pub fn range_sensor(&self, kind: RangeKind) -> SimRangeSensor {
        SimRangeSensor {
            state: Arc::clone(&self.state),
            kind,
        }
    }

    pub fn zone_sensor(&self) -> SimZoneSensor {
        SimZoneSensor {
            state: Arc::clone(&self.state),
        }
    }

    pub fn relay(&self) -> SimRelay {
        SimRelay {
            state: Arc::clone(&self.state),
        }
    }

    pub fn gripper_motor(&self) -> SimGripperMotor {
        SimGripperMotor {
            state: Arc::clone(&self.state),
        }
    }
}

/// Simulated gyro
#[derive(Debug)]
pub struct SimHeading {
    state: Arc<Mutex<SimState>>,
}

impl HeadingSensor for SimHeading {
    fn angle(&mut self) -> Result<f32> {
        let state = self.state.lock();
        Ok(state.pose.theta + state.gyro_offset)
    }

    fn reset(&mut self, angle: f32) -> Result<()> {
        let mut state = self.state.lock();
        state.gyro_offset = angle - state.pose.theta;
        Ok(())
    }
}

/// Simulated drivetrain
#[derive(Debug)]
pub struct SimDrivetrain {
    state: Arc<Mutex<SimState>>,
}

impl Drivetrain for SimDrivetrain {
    fn drive(&mut self, speed: f32, turn_rate: f32) -> Result<()> {
        let mut state = self.state.lock();
        let differential = turn_rate.to_radians() * state.config.body.half_track;
        state.left_speed = speed + differential;
        state.right_speed = speed - differential;
        state.step()
    }

    fn run_wheels(&mut self, left: WheelCommand, right: WheelCommand) -> Result<()> {
        let mut state = self.state.lock();
        match left {
            WheelCommand::Run(v) => state.left_speed = v,
            WheelCommand::Stop => state.left_speed = 0.0,
            WheelCommand::Keep => {}
        }
        match right {
            WheelCommand::Run(v) => state.right_speed = v,
            WheelCommand::Stop => state.right_speed = 0.0,
            WheelCommand::Keep => {}
        }
        state.step()
    }

    fn stop(&mut self) -> Result<()> {
        let mut state = self.state.lock();
        state.left_speed = 0.0;
        state.right_speed = 0.0;
        Ok(())
    }

    fn hold(&mut self) -> Result<()> {
        self.stop()
    }

    fn distance(&mut self) -> Result<f32> {
        Ok(self.state.lock().distance)
    }

    fn reset_distance(&mut self) -> Result<()> {
        self.state.lock().distance = 0.0;
        Ok(())
    }
}

/// Simulated floor colour sensor
#[derive(Debug)]
pub struct SimColorSensor {
    state: Arc<Mutex<SimState>>,
    side: SensorSide,
}

impl ColorSensor for SimColorSensor {
    fn rgb(&mut self) -> Result<Rgb> {
        Ok(self.state.lock().sensor_color(self.side).reference_rgb())
    }
}

/// Which ultrasonic sensor a [`SimRangeSensor`] stands in for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeKind {
    /// Forward obstacle sensor on the relay robot
    Obstacle,
    /// Overhead sensor on the relay robot
    Overhead,
    /// Underside sensor on the primary robot
    Underside,
}

/// Simulated ultrasonic sensor
#[derive(Debug)]
pub struct SimRangeSensor {
    state: Arc<Mutex<SimState>>,
    kind: RangeKind,
}

impl DistanceSensor for SimRangeSensor {
    fn distance(&mut self) -> Result<f32> {
        let state = self.state.lock();
        Ok(match self.kind {
            RangeKind::Obstacle => state.obstacle_distance(),
            RangeKind::Overhead => state.overhead_mm.unwrap_or(NO_ECHO_MM),
            RangeKind::Underside => state.underside_mm,
        })
    }
}

/// Simulated gripper-zone colour sensor
#[derive(Debug)]
pub struct SimZoneSensor {
    state: Arc<Mutex<SimState>>,
}

impl ColorSensor for SimZoneSensor {
    fn rgb(&mut self) -> Result<Rgb> {
        let zone = self.state.lock().zone.unwrap_or(ZoneColor::None);
        Ok(match zone {
            ZoneColor::None => Rgb::new(40, 40, 40),
            ZoneColor::Red => Rgb::new(60, 20, 20),
            ZoneColor::Blue => Rgb::new(20, 20, 60),
            ZoneColor::Brown => Rgb::new(10, 10, 10),
            ZoneColor::Green => Rgb::new(20, 60, 20),
        })
    }
}

/// Relay view of the simulated arena, with no transport delay
#[derive(Debug)]
pub struct SimRelay {
    state: Arc<Mutex<SimState>>,
}

impl SensorRelay for SimRelay {
    fn read(&self, channel: RelayChannel) -> Option<f32> {
        let state = self.state.lock();
        match channel {
            RelayChannel::ObstacleDistance => Some(state.obstacle_distance()),
            RelayChannel::OverheadDistance => state.overhead_mm,
            RelayChannel::ZoneColor => state.zone.map(|z| z.code() as f32),
        }
    }
}

/// Simulated gripper motor
#[derive(Debug)]
pub struct SimGripperMotor {
    state: Arc<Mutex<SimState>>,
}

impl GripperMotor for SimGripperMotor {
    fn run_until_stalled(&mut self, _speed: f32, _duty_limit: u8) -> Result<f32> {
        let mut state = self.state.lock();
        let default = state.config.default_stall_angle;
        let angle = state.stall_script.pop_front().unwrap_or(default);
        state.gripper_angle = angle;
        state.gripper_grabs += 1;
        Ok(angle)
    }

    fn run_target(&mut self, _speed: f32, angle: f32) -> Result<()> {
        let mut state = self.state.lock();
        state.gripper_angle = angle;
        state.gripper_opens += 1;
        Ok(())
    }

    fn hold(&mut self) -> Result<()> {
        Ok(())
    }

    fn reset_angle(&mut self, angle: f32) -> Result<()> {
        self.state.lock().gripper_angle = angle;
        Ok(())
    }
}
