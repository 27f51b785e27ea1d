//! Relay wire format
//!
//! Each UDP datagram carries exactly one frame:
//!
//! ```text
//! ┌──────────────────┬──────────────────────────┐
//! │ Length (4 bytes) │ Payload (variable)       │
//! │ Big-endian u32   │ JSON RelayFrame          │
//! └──────────────────┴──────────────────────────┘
//! ```
//!
//! A datagram whose length prefix disagrees with its payload, or whose
//! payload exceeds [`MAX_FRAME_SIZE`], is rejected as [`Error::InvalidFrame`].

use super::RelayChannel;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Largest accepted payload in bytes
pub const MAX_FRAME_SIZE: usize = 1024;

/// One channel reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelayFrame {
    pub channel: RelayChannel,
    pub value: f32,
    /// Per-publisher counter, starting at 1
    pub sequence: u64,
}

impl RelayFrame {
    /// Encode into `buffer` (cleared first)
    pub fn encode_into(&self, buffer: &mut Vec<u8>) -> Result<()> {
        let payload = serde_json::to_vec(self)?;
        if payload.len() > MAX_FRAME_SIZE {
            return Err(Error::InvalidFrame(format!(
                "payload too large: {} bytes",
                payload.len()
            )));
        }

        buffer.clear();
        buffer.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        buffer.extend_from_slice(&payload);
        Ok(())
    }

    /// Encode into a fresh buffer
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(64);
        self.encode_into(&mut buffer)?;
        Ok(buffer)
    }

    /// Decode one datagram
    pub fn decode(datagram: &[u8]) -> Result<Self> {
        if datagram.len() < 4 {
            return Err(Error::InvalidFrame(format!(
                "datagram too short: {} bytes",
                datagram.len()
            )));
        }

        let (prefix, payload) = datagram.split_at(4);
        let declared = u32::from_be_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;

        if declared > MAX_FRAME_SIZE {
            return Err(Error::InvalidFrame(format!(
                "declared length {} exceeds {}",
                declared, MAX_FRAME_SIZE
            )));
        }
        if declared != payload.len() {
            return Err(Error::InvalidFrame(format!(
                "declared length {} but payload is {} bytes",
                declared,
                payload.len()
            )));
        }

        let frame: RelayFrame = serde_json::from_slice(payload)?;
        if !frame.value.is_finite() {
            return Err(Error::InvalidFrame("non-finite value".to_string()));
        }
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_layout() {
        let frame = RelayFrame {
            channel: RelayChannel::ZoneColor,
            value: 3.0,
            sequence: 7,
        };
        let bytes = frame.encode().unwrap();
        let declared = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
        assert_eq!(declared, bytes.len() - 4);
        assert_eq!(RelayFrame::decode(&bytes).unwrap(), frame);
    }

    #[test]
    fn test_rejects_truncated() {
        let frame = RelayFrame {
            channel: RelayChannel::ObstacleDistance,
            value: 300.0,
            sequence: 1,
        };
        let bytes = frame.encode().unwrap();
        assert!(matches!(
            RelayFrame::decode(&bytes[..bytes.len() - 1]),
            Err(Error::InvalidFrame(_))
        ));
        assert!(matches!(RelayFrame::decode(&[0, 0]), Err(Error::InvalidFrame(_))));
    }

    #[test]
    fn test_rejects_oversized_prefix() {
        let mut bytes = vec![0xFF, 0xFF, 0xFF, 0xFF];
        bytes.extend_from_slice(b"{}");
        assert!(matches!(
            RelayFrame::decode(&bytes),
            Err(Error::InvalidFrame(_))
        ));
    }

    #[test]
    fn test_rejects_garbage_payload() {
        let payload = b"not json";
        let mut bytes = (payload.len() as u32).to_be_bytes().to_vec();
        bytes.extend_from_slice(payload);
        assert!(matches!(
            RelayFrame::decode(&bytes),
            Err(Error::Serialization(_))
        ));
    }
}
