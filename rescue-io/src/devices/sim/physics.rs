//! Kinematics for the simulated differential drive robot
//!
//! Heading convention matches the gyro: degrees, positive clockwise, with 0
//! pointing toward -y (the FRONT side of the arena).

/// Robot body dimensions in millimetres
#[derive(Debug, Clone, Copy)]
pub struct BodyGeometry {
    /// Half the distance between the wheels
    pub half_track: f32,
    /// Colour sensors' distance ahead of the axle
    pub sensor_forward: f32,
    /// Colour sensors' distance either side of the centreline
    pub sensor_lateral: f32,
}

impl Default for BodyGeometry {
    fn default() -> Self {
        Self {
            half_track: 60.0,
            sensor_forward: 60.0,
            sensor_lateral: 50.0,
        }
    }
}

/// Pose in world millimetres and gyro-convention degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimPose {
    pub x: f32,
    pub y: f32,
    pub theta: f32,
}

impl SimPose {
    pub fn new(x: f32, y: f32, theta: f32) -> Self {
        Self { x, y, theta }
    }

    /// Unit vector the robot is facing
    #[inline]
    pub fn forward(&self) -> (f32, f32) {
        let t = self.theta.to_radians();
        (t.sin(), -t.cos())
    }

    /// Unit vector to the robot's right
    #[inline]
    pub fn right(&self) -> (f32, f32) {
        let t = self.theta.to_radians();
        (t.cos(), t.sin())
    }

    /// World point at `forward` ahead and `lateral` to the right of the axle centre
    pub fn offset(&self, forward: f32, lateral: f32) -> (f32, f32) {
        let (fx, fy) = self.forward();
        let (rx, ry) = self.right();
        (
            self.x + forward * fx + lateral * rx,
            self.y + forward * fy + lateral * ry,
        )
    }

    /// Integrate wheel speeds (mm/s) over `dt` seconds.
    ///
    /// Returns the signed distance travelled by the axle centre.
    pub fn integrate(&mut self, left: f32, right: f32, half_track: f32, dt: f32) -> f32 {
        let v = (left + right) / 2.0;
        let omega = ((left - right) / (2.0 * half_track)).to_degrees();

        let dtheta = omega * dt;
        let mid = (self.theta + dtheta / 2.0).to_radians();
        let ds = v * dt;

        self.x += ds * mid.sin();
        self.y -= ds * mid.cos();
        self.theta += dtheta;
        ds
    }
}
