//! Device-backed motion primitives.

use super::{
    summarize_person, AlignOutcome, DriveRequest, Motion, Pause, PersonMeasurement, Pid,
    StopCondition,
};
use crate::config::{MotionConfig, NavConfig, SensingConfig};
use crate::error::{NavError, Result};
use crate::position::{Position, Side};
use rescue_io::drivers::{ColorSensor, DistanceSensor, Drivetrain, HeadingSensor, WheelCommand};
use rescue_io::{FloorColor, RelayChannel, SensorRelay};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Devices mounted on the primary robot
pub struct DriveDevices {
    pub heading: Box<dyn HeadingSensor>,
    pub drivetrain: Box<dyn Drivetrain>,
    pub left_color: Box<dyn ColorSensor>,
    pub right_color: Box<dyn ColorSensor>,
    /// Ultrasonic sensor looking down under the chassis
    pub underside: Box<dyn DistanceSensor>,
}

/// [`Motion`] over real (or simulated) devices.
///
/// Owns the confirmed [`Position`]. Relay readings are pulled once per use and
/// a missing reading counts as "nothing seen".
pub struct Drive {
    devices: DriveDevices,
    relay: Arc<dyn SensorRelay>,
    motion: MotionConfig,
    sensing: SensingConfig,
    square_mm: f32,
    position: Position,
}

impl Drive {
    pub fn new(devices: DriveDevices, relay: Arc<dyn SensorRelay>, config: &NavConfig) -> Self {
        Self {
            devices,
            relay,
            motion: config.motion.clone(),
            sensing: config.sensing.clone(),
            square_mm: config.arena.square_mm,
            position: Position::origin(),
        }
    }

    fn gyro(&mut self) -> Result<f32> {
        Ok(self.devices.heading.angle()?)
    }

    /// End of one control iteration
    fn tick(&self) {
        if self.motion.realtime {
            std::thread::sleep(self.motion.control_period());
        }
    }

    fn stop_and_hold(&mut self) -> Result<()> {
        self.devices.drivetrain.stop()?;
        self.devices.drivetrain.hold()?;
        Ok(())
    }

    fn relay_below(&self, threshold: f32) -> bool {
        self.relay
            .read(RelayChannel::ObstacleDistance)
            .is_some_and(|mm| mm < threshold)
    }

    fn condition_holds(&mut self, condition: StopCondition) -> Result<bool> {
        match condition {
            StopCondition::FloorMarker => self.sees_marker(),
            StopCondition::PersonBelow => self.person_below(),
            StopCondition::ObstacleVeryClose => Ok(self.obstacle_very_close()),
        }
    }

    /// Turn rate for the remaining heading error
    fn turn_rate(&self, error: f32) -> f32 {
        let m = &self.motion;
        let magnitude = if error.abs() > m.turn_full_speed_above {
            m.turn_full_speed
        } else {
            (error.abs() * m.turn_gain).max(m.turn_min_speed)
        };
        magnitude.copysign(error)
    }
}

impl Motion for Drive {
    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    fn turn_angle(&mut self, delta: f32) -> Result<()> {
        let target = self.gyro()? + delta;
        debug!("turn {:+.1}° to {:.1}°", delta, target);

        loop {
            let error = target - self.gyro()?;
            if error.abs() <= self.motion.turn_tolerance {
                break;
            }
            let rate = self.turn_rate(error);
            self.devices.drivetrain.drive(0.0, rate)?;
            self.tick();
        }

        self.stop_and_hold()?;
        let reached = self.gyro()?;
        debug!("turn done at {:.1}°", reached);
        Ok(())
    }

    fn turn_to_side(&mut self, side: Side) -> Result<()> {
        let delta = side.turn_from(self.gyro()?);
        self.turn_angle(delta)?;
        self.position.heading = side;
        Ok(())
    }

    fn drive(&mut self, request: DriveRequest) -> Result<()> {
        if !request.is_bounded() {
            return Err(NavError::UnboundedDrive);
        }

        let speed = match request.distance {
            Some(d) => request.speed.abs().copysign(d),
            None => request.speed,
        };

        let gyro = self.gyro()?;
        let direction = match request.direction {
            Some(side) => gyro + side.turn_from(gyro),
            None => gyro,
        };
        debug!(
            "drive {:.0}mm/s distance={:?} stop_on={:?} holding {:.1}°",
            speed, request.distance, request.stop_on, direction
        );

        let dt = self.motion.control_dt();
        let full_turn = self.motion.turn_full_speed;
        let mut heading_pid = Pid::new(self.motion.heading_pid, direction, dt)
            .with_limits(-full_turn, full_turn);
        let min_speed = self.motion.min_drive_speed;
        let mut distance_pid = request.distance.map(|d| {
            let pid = Pid::new(self.motion.distance_pid, d, dt);
            if speed > 0.0 {
                pid.with_limits(min_speed.min(speed), speed)
            } else {
                pid.with_limits(speed, (-min_speed).max(speed))
            }
        });

        self.devices.drivetrain.reset_distance()?;
        loop {
            for &condition in &request.stop_on {
                if self.condition_holds(condition)? {
                    self.stop_and_hold()?;
                    debug!("drive stopped on {:?}", condition);
                    return Ok(());
                }
            }

            let drive_speed = match (request.distance, distance_pid.as_mut()) {
                (Some(target), Some(pid)) => {
                    let travelled = self.devices.drivetrain.distance()?;
                    if travelled.abs() >= target.abs() {
                        self.stop_and_hold()?;
                        debug!("drive reached {:.0}mm", travelled);
                        return Ok(());
                    }
                    pid.update(travelled)
                }
                _ => speed,
            };

            let turn = heading_pid.update(self.gyro()?);
            self.devices.drivetrain.drive(drive_speed, turn)?;
            self.tick();
        }
    }

    fn drive_squares(&mut self, squares: i32, direction: Option<Side>) -> Result<()> {
        let side = direction.unwrap_or(self.position.heading);
        let distance = squares as f32 * self.square_mm;
        self.drive(DriveRequest::distance(self.motion.square_speed, distance).facing(side))?;

        self.position.heading = side;
        self.position.advance(squares);
        debug!("now at {}", self.position);
        Ok(())
    }

    fn align_on_color(
        &mut self,
        targets: &[FloorColor],
        limit_angle: Option<f32>,
    ) -> Result<AlignOutcome> {
        let forward = self.motion.align_forward_speed;
        let reverse = -self.motion.align_reverse_speed.abs();
        let initial = self.gyro()?;
        debug!("align on {:?} (limit {:?})", targets, limit_angle);

        let mut left_back = false;
        let mut right_back = false;
        let mut yellow = 0usize;
        let mut aborted = false;

        loop {
            let (left, right) = self.floor_colors()?;
            yellow += [left, right]
                .iter()
                .filter(|&&c| c == FloorColor::Yellow)
                .count();

            let left_cmd = side_command(left, targets, &mut left_back, forward, reverse);
            let right_cmd = side_command(right, targets, &mut right_back, forward, reverse);

            if left_back && right_back && left == FloorColor::White && right == FloorColor::White
            {
                self.devices.drivetrain.stop()?;
                break;
            }

            if let Some(limit) = limit_angle {
                if (initial - self.gyro()?).abs() > limit {
                    self.devices.drivetrain.stop()?;
                    aborted = true;
                    break;
                }
            }

            self.devices.drivetrain.run_wheels(left_cmd, right_cmd)?;
            self.tick();
        }

        let outcome = AlignOutcome {
            saw_yellow: yellow > self.sensing.yellow_readings_threshold,
            aborted,
        };
        debug!("align done: {:?}", outcome);
        Ok(outcome)
    }

    fn reset_heading(&mut self, angle: f32) -> Result<()> {
        self.devices.heading.reset(angle)?;
        Ok(())
    }

    fn floor_colors(&mut self) -> Result<(FloorColor, FloorColor)> {
        let left = FloorColor::classify(self.devices.left_color.rgb()?);
        let right = FloorColor::classify(self.devices.right_color.rgb()?);
        Ok((left, right))
    }

    fn obstacle_far(&mut self) -> bool {
        self.relay_below(self.sensing.obstacle_far_mm)
    }

    fn obstacle_very_close(&mut self) -> bool {
        self.relay_below(self.sensing.obstacle_very_close_mm)
    }

    fn person_below(&mut self) -> Result<bool> {
        Ok(self.devices.underside.distance()? < self.sensing.person_below_mm)
    }

    fn measure_person(&mut self) -> Result<PersonMeasurement> {
        let speed = -self.sensing.measure_speed.abs();
        let distance = self.sensing.measure_distance_mm.abs();
        let mut underside = Vec::new();
        let mut overhead = Vec::new();

        self.devices.drivetrain.reset_distance()?;
        loop {
            underside.push(self.devices.underside.distance()?);
            if let Some(mm) = self.relay.read(RelayChannel::OverheadDistance) {
                overhead.push(mm);
            }

            if self.devices.drivetrain.distance()? <= -distance {
                self.stop_and_hold()?;
                break;
            }
            self.devices.drivetrain.drive(speed, 0.0)?;
            self.tick();
        }

        let measurement = summarize_person(&underside, &overhead, &self.sensing);
        debug!(
            "measured person: {:.0}mm, adult={} ({} underside, {} overhead samples)",
            measurement.distance_mm,
            measurement.is_adult,
            underside.len(),
            overhead.len()
        );
        Ok(measurement)
    }

    fn pause(&mut self, pause: Pause) {
        if !self.motion.realtime {
            return;
        }
        let ms = match pause {
            Pause::Short => self.motion.settle_ms,
            Pause::Long => self.motion.long_settle_ms,
        };
        std::thread::sleep(Duration::from_millis(ms));
    }
}

/// Wheel command for one side during alignment.
///
/// A side runs forward until its sensor hits a target colour, then reverses
/// until it reads white again and stops there.
fn side_command(
    color: FloorColor,
    targets: &[FloorColor],
    backwards: &mut bool,
    forward: f32,
    reverse: f32,
) -> WheelCommand {
    if targets.contains(&color) {
        *backwards = true;
        WheelCommand::Run(reverse)
    } else if !*backwards {
        WheelCommand::Run(forward)
    } else if color == FloorColor::White {
        WheelCommand::Stop
    } else {
        WheelCommand::Keep
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rescue_io::devices::sim::{FloorRegion, RangeKind, SensorSide, SimArena};

    fn sim_config() -> NavConfig {
        let mut config = NavConfig::default();
        config.motion.realtime = false;
        config
    }

    fn drive_on(sim: &SimArena) -> Drive {
        let devices = DriveDevices {
            heading: Box::new(sim.heading_sensor()),
            drivetrain: Box::new(sim.drivetrain()),
            left_color: Box::new(sim.color_sensor(SensorSide::Left)),
            right_color: Box::new(sim.color_sensor(SensorSide::Right)),
            underside: Box::new(sim.range_sensor(RangeKind::Underside)),
        };
        Drive::new(devices, Arc::new(sim.relay()), &sim_config())
    }

    #[test]
    fn test_side_command_sequence() {
        let targets = [FloorColor::Red];
        let mut back = false;
        assert_eq!(
            side_command(FloorColor::White, &targets, &mut back, 100.0, -75.0),
            WheelCommand::Run(100.0)
        );
        assert_eq!(
            side_command(FloorColor::Red, &targets, &mut back, 100.0, -75.0),
            WheelCommand::Run(-75.0)
        );
        assert!(back);
        assert_eq!(
            side_command(FloorColor::Black, &targets, &mut back, 100.0, -75.0),
            WheelCommand::Keep
        );
        assert_eq!(
            side_command(FloorColor::White, &targets, &mut back, 100.0, -75.0),
            WheelCommand::Stop
        );
    }

    #[test]
    fn test_turn_rate_law() {
        let sim = SimArena::with_defaults();
        let drive = drive_on(&sim);
        assert_eq!(drive.turn_rate(120.0), 150.0);
        assert_eq!(drive.turn_rate(-51.0), -150.0);
        assert_eq!(drive.turn_rate(10.0), 30.0);
        assert_eq!(drive.turn_rate(-2.0), -20.0);
    }

    #[test]
    fn test_turn_to_side_converges() {
        let sim = SimArena::with_defaults();
        sim.place_in_cell(0, 0, 270.0);
        let mut drive = drive_on(&sim);
        drive.reset_heading(270.0).unwrap();

        drive.turn_to_side(Side::Front).unwrap();
        assert_eq!(drive.position().heading, Side::Front);
        // Short way round: +90 from 270 to 360
        assert_abs_diff_eq!(sim.pose().theta, 360.0, epsilon = 1.5);
    }

    #[test]
    fn test_drive_squares_moves_one_cell() {
        let sim = SimArena::with_defaults();
        sim.place_in_cell(0, 0, 270.0);
        let mut drive = drive_on(&sim);
        drive.reset_heading(270.0).unwrap();

        // Reverse while facing LEFT: toward +x
        drive.drive_squares(-2, None).unwrap();
        assert_eq!(drive.position(), Position::new(2, 0, Side::Left));
        assert_eq!(sim.cell(), (2, 0));
        assert_abs_diff_eq!(sim.pose().x, 750.0, epsilon = 5.0);
    }

    #[test]
    fn test_unbounded_drive_rejected() {
        let sim = SimArena::with_defaults();
        let mut drive = drive_on(&sim);
        let mut request = DriveRequest::distance(100.0, 10.0);
        request.distance = None;
        assert!(matches!(drive.drive(request), Err(NavError::UnboundedDrive)));
        assert_eq!(sim.steps(), 0);
    }

    #[test]
    fn test_drive_until_marker() {
        let sim = SimArena::with_defaults();
        // Black stripe across the arena at y = 200..220
        sim.add_region(FloorRegion::new(0.0, 200.0, 1500.0, 220.0, FloorColor::Black));
        sim.place_in_cell(1, 2, 0.0);
        let mut drive = drive_on(&sim);

        drive
            .drive(DriveRequest::until(150.0, StopCondition::FloorMarker))
            .unwrap();
        // Sensors sit 60mm ahead of the axle
        assert_abs_diff_eq!(sim.pose().y, 280.0, epsilon = 3.0);
        assert!(drive.sees_any(&[FloorColor::Black]).unwrap());
    }

    #[test]
    fn test_align_squares_up_on_skewed_stripe() {
        let sim = SimArena::with_defaults();
        sim.add_region(FloorRegion::new(0.0, 200.0, 1500.0, 220.0, FloorColor::Red));
        sim.place(rescue_io::devices::sim::SimPose::new(450.0, 400.0, 8.0));
        let mut drive = drive_on(&sim);

        let outcome = drive.align_on_color(&[FloorColor::Red], None).unwrap();
        assert!(!outcome.aborted);
        assert!(!outcome.saw_yellow);
        // Both sensors end just behind the stripe, so the robot faces FRONT
        assert_abs_diff_eq!(sim.pose().theta, 0.0, epsilon = 3.0);
        assert_eq!(drive.floor_colors().unwrap(), (FloorColor::White, FloorColor::White));
    }

    #[test]
    fn test_align_abort_on_limit() {
        let sim = SimArena::with_defaults();
        // Stripe only under the left sensor's path
        sim.add_region(FloorRegion::new(0.0, 200.0, 440.0, 220.0, FloorColor::Blue));
        sim.place_in_cell(1, 1, 0.0);
        let mut drive = drive_on(&sim);

        let outcome = drive.align_on_color(&[FloorColor::Blue], Some(20.0)).unwrap();
        assert!(outcome.aborted);
    }

    #[test]
    fn test_measure_person() {
        let sim = SimArena::with_defaults();
        sim.place_in_cell(0, 0, 270.0);
        sim.set_underside(70.0);
        sim.set_overhead(Some(110.0));
        let mut drive = drive_on(&sim);

        let m = drive.measure_person().unwrap();
        assert_abs_diff_eq!(m.distance_mm, 70.0, epsilon = 1e-3);
        assert!(m.is_adult);
        assert!(sim.pose().x > 195.0);
    }
}
