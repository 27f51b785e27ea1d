//! Remote sensor relay
//!
//! The relay robot carries three sensors the primary robot cannot mount
//! itself and streams their readings over UDP:
//!
//! | Channel | Sensor | Value |
//! |---------|--------|-------|
//! | [`RelayChannel::ObstacleDistance`] | Forward ultrasonic | mm |
//! | [`RelayChannel::OverheadDistance`] | Downward ultrasonic above the gripper | mm |
//! | [`RelayChannel::ZoneColor`] | Gripper-zone colour sensor | [`ZoneColor`](crate::ZoneColor) code |
//!
//! # Delivery Model
//!
//! The producer ([`RelayPublisher`]) sends every channel at a fixed cadence
//! with no flow control and no acknowledgement. The consumer
//! ([`RelayReceiver`]) writes each frame into [`RelaySlots`], which keep only
//! the latest value per channel. Reads never block and return `None` until
//! the first frame for that channel arrives. Every value may be stale.

pub mod publisher;
pub mod receiver;
pub mod slots;
pub mod wire;

pub use publisher::{RelayPublisher, RelaySources};
pub use receiver::RelayReceiver;
pub use slots::RelaySlots;
pub use wire::RelayFrame;

use serde::{Deserialize, Serialize};

/// One of the three relay channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelayChannel {
    ObstacleDistance,
    OverheadDistance,
    ZoneColor,
}

impl RelayChannel {
    /// All channels in publish order
    pub const ALL: [RelayChannel; 3] = [
        RelayChannel::ObstacleDistance,
        RelayChannel::OverheadDistance,
        RelayChannel::ZoneColor,
    ];

    /// Slot index
    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            RelayChannel::ObstacleDistance => 0,
            RelayChannel::OverheadDistance => 1,
            RelayChannel::ZoneColor => 2,
        }
    }
}

/// Consumer side of the relay
///
/// Implementations must be non-blocking. A missing value means "no
/// detection" to every caller.
pub trait SensorRelay: Send + Sync {
    /// Latest known value for `channel`, or `None` if nothing arrived yet
    fn read(&self, channel: RelayChannel) -> Option<f32>;
}

impl<T: SensorRelay + ?Sized> SensorRelay for std::sync::Arc<T> {
    fn read(&self, channel: RelayChannel) -> Option<f32> {
        (**self).read(channel)
    }
}
