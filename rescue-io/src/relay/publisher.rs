//! Relay producer running on the relay robot
//!
//! Samples the three relay sensors and sends one frame per channel every
//! period, regardless of what the primary robot is doing. There is no flow
//! control: a lost datagram is simply superseded by the next one.

use super::{RelayChannel, RelayFrame};
use crate::drivers::{ColorSensor, DistanceSensor};
use crate::error::Result;
use crate::types::ZoneColor;
use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Sensors sampled by the publisher
pub struct RelaySources {
    /// Forward-facing ultrasonic sensor
    pub obstacle: Box<dyn DistanceSensor>,
    /// Ultrasonic sensor looking down on the gripper zone
    pub overhead: Box<dyn DistanceSensor>,
    /// Colour sensor in the gripper zone
    pub zone: Box<dyn ColorSensor>,
}

/// UDP relay publisher
pub struct RelayPublisher {
    socket: UdpSocket,
    peer: SocketAddr,
    sources: RelaySources,
    period: Duration,
    sequence: u64,
    running: Arc<AtomicBool>,
    send_buffer: Vec<u8>,
}

impl RelayPublisher {
    /// Create a new publisher sending to `peer`
    pub fn new(
        socket: UdpSocket,
        peer: SocketAddr,
        sources: RelaySources,
        period: Duration,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            socket,
            peer,
            sources,
            period,
            sequence: 0,
            running,
            send_buffer: Vec::with_capacity(64),
        }
    }

    /// Read one channel from its sensor
    fn sample(&mut self, channel: RelayChannel) -> Result<f32> {
        match channel {
            RelayChannel::ObstacleDistance => self.sources.obstacle.distance(),
            RelayChannel::OverheadDistance => self.sources.overhead.distance(),
            RelayChannel::ZoneColor => {
                let rgb = self.sources.zone.rgb()?;
                Ok(ZoneColor::classify(rgb).code() as f32)
            }
        }
    }

    /// Sample and send every channel once. Returns the number of frames sent.
    ///
    /// A failing sensor skips its channel for this round; the others still go out.
    pub fn publish_once(&mut self) -> Result<usize> {
        let mut sent = 0;

        for channel in RelayChannel::ALL {
            let value = match self.sample(channel) {
                Ok(v) => v,
                Err(e) => {
                    log::warn!("Relay: failed to sample {:?}: {}", channel, e);
                    continue;
                }
            };

            self.sequence += 1;
            let frame = RelayFrame {
                channel,
                value,
                sequence: self.sequence,
            };
            frame.encode_into(&mut self.send_buffer)?;
            self.socket.send_to(&self.send_buffer, self.peer)?;

            log::trace!("Relay: sent {:?}={} (seq {})", channel, value, self.sequence);
            sent += 1;
        }

        Ok(sent)
    }

    /// Run the publish loop until the running flag is cleared
    pub fn run(&mut self) -> Result<()> {
        log::info!(
            "Relay publisher started: {} every {}ms",
            self.peer,
            self.period.as_millis()
        );

        while self.running.load(Ordering::Relaxed) {
            // Send errors are not fatal - the next round supersedes this one
            if let Err(e) = self.publish_once() {
                log::warn!("Relay: publish failed: {}", e);
            }
            std::thread::sleep(self.period);
        }

        log::info!("Relay publisher stopped after {} frames", self.sequence);
        Ok(())
    }
}
