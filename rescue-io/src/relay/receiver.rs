//! Relay consumer running on the primary robot
//!
//! A background thread drains the UDP socket and writes each valid frame
//! into shared [`RelaySlots`]. The control loop reads the slots without
//! ever touching the socket.

use super::{RelayFrame, RelaySlots};
use crate::error::{Error, Result};
use std::io::ErrorKind;
use std::net::UdpSocket;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// How long a blocking receive waits before rechecking the running flag
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Largest datagram we accept (prefix + payload)
const MAX_DATAGRAM: usize = 4 + super::wire::MAX_FRAME_SIZE;

/// UDP relay receiver
pub struct RelayReceiver {
    socket: UdpSocket,
    slots: Arc<RelaySlots>,
    running: Arc<AtomicBool>,
    buffer: Vec<u8>,
    received: u64,
    rejected: u64,
}

impl RelayReceiver {
    /// Create a receiver writing into `slots`
    pub fn new(socket: UdpSocket, slots: Arc<RelaySlots>, running: Arc<AtomicBool>) -> Self {
        Self {
            socket,
            slots,
            running,
            buffer: vec![0u8; MAX_DATAGRAM],
            received: 0,
            rejected: 0,
        }
    }

    /// Receive and apply a single datagram (blocking per the socket's timeout)
    ///
    /// Returns the decoded frame. Invalid frames are returned as errors and
    /// leave the slots untouched.
    pub fn receive_once(&mut self) -> Result<RelayFrame> {
        let (len, from) = self.socket.recv_from(&mut self.buffer)?;

        let frame = match RelayFrame::decode(&self.buffer[..len]) {
            Ok(f) => f,
            Err(e) => {
                self.rejected += 1;
                log::warn!("Relay: discarded frame from {}: {}", from, e);
                return Err(e);
            }
        };

        self.received += 1;
        if !self
            .slots
            .update(frame.channel, frame.value, frame.sequence)
        {
            log::debug!(
                "Relay: ignored out-of-order {:?} (seq {})",
                frame.channel,
                frame.sequence
            );
        }
        Ok(frame)
    }

    /// Receive until the running flag is cleared
    pub fn run(&mut self) -> Result<()> {
        self.socket.set_read_timeout(Some(POLL_TIMEOUT))?;
        log::info!("Relay receiver listening on {}", self.socket.local_addr()?);

        while self.running.load(Ordering::Relaxed) {
            match self.receive_once() {
                Ok(_) => {}
                Err(Error::Io(e))
                    if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut => {}
                Err(Error::Io(e)) => return Err(Error::Io(e)),
                // Bad frames were already logged
                Err(_) => {}
            }
        }

        log::info!(
            "Relay receiver stopped: {} frames applied, {} rejected",
            self.received,
            self.rejected
        );
        Ok(())
    }

    /// Move the receiver onto its own thread
    pub fn spawn(mut self) -> Result<JoinHandle<()>> {
        let handle = thread::Builder::new()
            .name("relay-receiver".to_string())
            .spawn(move || {
                if let Err(e) = self.run() {
                    log::error!("Relay receiver error: {}", e);
                }
            })?;
        Ok(handle)
    }
}
