//! Configuration loading for RescueNav
//!
//! Every section and field has a default, so an empty file yields the
//! competition tuning.

use crate::error::{NavError, Result};
use crate::position::Cell;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NavConfig {
    #[serde(default)]
    pub arena: ArenaConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub sensing: SensingConfig,
    #[serde(default)]
    pub mission: MissionConfig,
}

/// Arena geometry
#[derive(Clone, Debug, Deserialize)]
pub struct ArenaConfig {
    /// Grid edge length in cells (default: 5)
    #[serde(default = "default_size")]
    pub size: i32,

    /// Grid square edge in mm (default: 300)
    #[serde(default = "default_square_mm")]
    pub square_mm: f32,

    /// Cells known to hold an obstacle before the run starts
    #[serde(default = "default_static_obstacles")]
    pub static_obstacles: Vec<Cell>,

    /// Cells that may hold an obstacle; the planner stops before entering them
    #[serde(default = "default_candidate_obstacles")]
    pub candidate_obstacles: Vec<Cell>,
}

/// Motion primitive tuning
#[derive(Clone, Debug, Deserialize)]
pub struct MotionConfig {
    /// Turn rate while far from the target heading in deg/s (default: 150)
    #[serde(default = "default_turn_full_speed")]
    pub turn_full_speed: f32,

    /// Heading error above which the turn runs at full speed (default: 50°)
    #[serde(default = "default_turn_full_speed_above")]
    pub turn_full_speed_above: f32,

    /// Turn rate per degree of remaining error (default: 3)
    #[serde(default = "default_turn_gain")]
    pub turn_gain: f32,

    /// Slowest turn rate in deg/s (default: 20)
    #[serde(default = "default_turn_min_speed")]
    pub turn_min_speed: f32,

    /// Turn completes once the error is within this many degrees (default: 1)
    #[serde(default = "default_turn_tolerance")]
    pub turn_tolerance: f32,

    /// Heading-hold PID gains (output in deg/s of turn rate)
    #[serde(default = "default_heading_pid")]
    pub heading_pid: PidGains,

    /// Distance PID gains (output in mm/s of forward speed)
    #[serde(default = "default_distance_pid")]
    pub distance_pid: PidGains,

    /// Slowest speed the distance PID may command in mm/s (default: 45)
    #[serde(default = "default_min_drive_speed")]
    pub min_drive_speed: f32,

    /// Speed for whole-square legs in mm/s (default: 250)
    #[serde(default = "default_square_speed")]
    pub square_speed: f32,

    /// Forward speed while hunting for a marker (default: 100)
    #[serde(default = "default_align_forward_speed")]
    pub align_forward_speed: f32,

    /// Reverse speed once a side has crossed the marker (default: 75)
    #[serde(default = "default_align_reverse_speed")]
    pub align_reverse_speed: f32,

    /// Control loop period in milliseconds (default: 10)
    #[serde(default = "default_control_period_ms")]
    pub control_period_ms: u64,

    /// Sleep out each control period and settle delay (default: true).
    /// Disabled for simulation, where time only advances per command.
    #[serde(default = "default_realtime")]
    pub realtime: bool,

    /// Pause between scripted steps in milliseconds (default: 250)
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Longer pause used before larger manoeuvres (default: 500)
    #[serde(default = "default_long_settle_ms")]
    pub long_settle_ms: u64,
}

/// PID gains
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct PidGains {
    pub kp: f32,
    #[serde(default)]
    pub ki: f32,
    #[serde(default)]
    pub kd: f32,
}

/// Sensor thresholds
#[derive(Clone, Debug, Deserialize)]
pub struct SensingConfig {
    /// Relay obstacle reading below which the square ahead is blocked (default: 450mm)
    #[serde(default = "default_obstacle_far_mm")]
    pub obstacle_far_mm: f32,

    /// Relay obstacle reading that stops a probe drive (default: 85mm)
    #[serde(default = "default_obstacle_very_close_mm")]
    pub obstacle_very_close_mm: f32,

    /// Underside reading below which a person is under the robot (default: 130mm)
    #[serde(default = "default_person_below_mm")]
    pub person_below_mm: f32,

    /// Overhead readings at or below this vote "adult" (default: 130mm)
    #[serde(default = "default_adult_overhead_mm")]
    pub adult_overhead_mm: f32,

    /// Length of the measuring excursion (default: 50mm)
    #[serde(default = "default_measure_distance_mm")]
    pub measure_distance_mm: f32,

    /// Reverse speed during measurement (default: 25mm/s)
    #[serde(default = "default_measure_speed")]
    pub measure_speed: f32,

    /// Person distance used when no underside sample was valid (default: 60mm)
    #[serde(default = "default_fallback_person_distance_mm")]
    pub fallback_person_distance_mm: f32,

    /// More yellow readings than this during an alignment mean the yellow
    /// stripe was crossed (default: 2)
    #[serde(default = "default_yellow_readings_threshold")]
    pub yellow_readings_threshold: usize,
}

/// Mission tuning
#[derive(Clone, Debug, Deserialize)]
pub struct MissionConfig {
    /// Unload clearance for the first delivery to a place (default: 300mm)
    #[serde(default = "default_unload_first_mm")]
    pub unload_first_mm: f32,

    /// Unload clearance for the second delivery to a place (default: 250mm)
    #[serde(default = "default_unload_second_mm")]
    pub unload_second_mm: f32,

    /// Unload clearance for later deliveries (default: 175mm)
    #[serde(default = "default_unload_later_mm")]
    pub unload_later_mm: f32,

    /// Unload clearance at the park, every time (default: 175mm)
    #[serde(default = "default_unload_park_mm")]
    pub unload_park_mm: f32,

    /// Reverse past a junction stripe after a false stop (default: 60mm)
    #[serde(default = "default_junction_clearance_mm")]
    pub junction_clearance_mm: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            square_mm: default_square_mm(),
            static_obstacles: default_static_obstacles(),
            candidate_obstacles: default_candidate_obstacles(),
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            turn_full_speed: default_turn_full_speed(),
            turn_full_speed_above: default_turn_full_speed_above(),
            turn_gain: default_turn_gain(),
            turn_min_speed: default_turn_min_speed(),
            turn_tolerance: default_turn_tolerance(),
            heading_pid: default_heading_pid(),
            distance_pid: default_distance_pid(),
            min_drive_speed: default_min_drive_speed(),
            square_speed: default_square_speed(),
            align_forward_speed: default_align_forward_speed(),
            align_reverse_speed: default_align_reverse_speed(),
            control_period_ms: default_control_period_ms(),
            realtime: default_realtime(),
            settle_ms: default_settle_ms(),
            long_settle_ms: default_long_settle_ms(),
        }
    }
}

impl Default for SensingConfig {
    fn default() -> Self {
        Self {
            obstacle_far_mm: default_obstacle_far_mm(),
            obstacle_very_close_mm: default_obstacle_very_close_mm(),
            person_below_mm: default_person_below_mm(),
            adult_overhead_mm: default_adult_overhead_mm(),
            measure_distance_mm: default_measure_distance_mm(),
            measure_speed: default_measure_speed(),
            fallback_person_distance_mm: default_fallback_person_distance_mm(),
            yellow_readings_threshold: default_yellow_readings_threshold(),
        }
    }
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            unload_first_mm: default_unload_first_mm(),
            unload_second_mm: default_unload_second_mm(),
            unload_later_mm: default_unload_later_mm(),
            unload_park_mm: default_unload_park_mm(),
            junction_clearance_mm: default_junction_clearance_mm(),
        }
    }
}

// Arena defaults
fn default_size() -> i32 {
    5
}
fn default_square_mm() -> f32 {
    300.0
}
fn default_static_obstacles() -> Vec<Cell> {
    [(0, 1), (2, 1), (4, 1), (0, 3), (2, 3), (4, 3)]
        .into_iter()
        .map(|(x, y)| Cell::new(x, y))
        .collect()
}
fn default_candidate_obstacles() -> Vec<Cell> {
    [(1, 1), (3, 1), (1, 3), (3, 3), (2, 2)]
        .into_iter()
        .map(|(x, y)| Cell::new(x, y))
        .collect()
}

// Motion defaults
fn default_turn_full_speed() -> f32 {
    150.0
}
fn default_turn_full_speed_above() -> f32 {
    50.0
}
fn default_turn_gain() -> f32 {
    3.0
}
fn default_turn_min_speed() -> f32 {
    20.0
}
fn default_turn_tolerance() -> f32 {
    1.0
}
fn default_heading_pid() -> PidGains {
    PidGains {
        kp: 6.0,
        ki: 0.0,
        kd: 0.2,
    }
}
fn default_distance_pid() -> PidGains {
    PidGains {
        kp: 3.0,
        ki: 0.0,
        kd: 0.0,
    }
}
fn default_min_drive_speed() -> f32 {
    45.0
}
fn default_square_speed() -> f32 {
    250.0
}
fn default_align_forward_speed() -> f32 {
    100.0
}
fn default_align_reverse_speed() -> f32 {
    75.0
}
fn default_control_period_ms() -> u64 {
    10
}
fn default_realtime() -> bool {
    true
}
fn default_settle_ms() -> u64 {
    250
}
fn default_long_settle_ms() -> u64 {
    500
}

// Sensing defaults
fn default_obstacle_far_mm() -> f32 {
    450.0
}
fn default_obstacle_very_close_mm() -> f32 {
    85.0
}
fn default_person_below_mm() -> f32 {
    130.0
}
fn default_adult_overhead_mm() -> f32 {
    130.0
}
fn default_measure_distance_mm() -> f32 {
    50.0
}
fn default_measure_speed() -> f32 {
    25.0
}
fn default_fallback_person_distance_mm() -> f32 {
    60.0
}
fn default_yellow_readings_threshold() -> usize {
    2
}

// Mission defaults
fn default_unload_first_mm() -> f32 {
    300.0
}
fn default_unload_second_mm() -> f32 {
    250.0
}
fn default_unload_later_mm() -> f32 {
    175.0
}
fn default_unload_park_mm() -> f32 {
    175.0
}
fn default_junction_clearance_mm() -> f32 {
    60.0
}

impl NavConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NavError::Config(format!("Failed to read config file: {}", e)))?;
        let config: NavConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the planner cannot work with
    pub fn validate(&self) -> Result<()> {
        let size = self.arena.size;
        if size <= 0 {
            return Err(NavError::Config(format!("arena size must be positive, got {}", size)));
        }
        for cell in self
            .arena
            .static_obstacles
            .iter()
            .chain(self.arena.candidate_obstacles.iter())
        {
            if !cell.in_bounds(size) {
                return Err(NavError::InvalidCell(cell.x, cell.y));
            }
        }
        if self.motion.control_period_ms == 0 {
            return Err(NavError::Config("control_period_ms must be non-zero".to_string()));
        }
        Ok(())
    }
}

impl MotionConfig {
    /// Control loop period
    pub fn control_period(&self) -> Duration {
        Duration::from_millis(self.control_period_ms)
    }

    /// Control loop period in seconds
    pub fn control_dt(&self) -> f32 {
        self.control_period_ms as f32 / 1000.0
    }
}
