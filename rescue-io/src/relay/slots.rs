//! Latest-value storage for relay channels.

use super::{RelayChannel, SensorRelay};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// Atomic wrapper for f32 values.
/// Uses AtomicU32 with bit reinterpretation.
#[derive(Debug)]
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub fn new(val: f32) -> Self {
        Self(AtomicU32::new(val.to_bits()))
    }

    pub fn load(&self, order: Ordering) -> f32 {
        f32::from_bits(self.0.load(order))
    }

    pub fn store(&self, val: f32, order: Ordering) {
        self.0.store(val.to_bits(), order);
    }
}

/// Lock-free latest value per channel.
///
/// NaN marks an empty slot. Frames carrying a sequence number older than the
/// newest one already applied to that channel are ignored.
#[derive(Debug)]
pub struct RelaySlots {
    values: [AtomicF32; 3],
    sequences: [AtomicU64; 3],
}

impl RelaySlots {
    /// Create slots with every channel absent
    pub fn new() -> Self {
        Self {
            values: [
                AtomicF32::new(f32::NAN),
                AtomicF32::new(f32::NAN),
                AtomicF32::new(f32::NAN),
            ],
            sequences: [AtomicU64::new(0), AtomicU64::new(0), AtomicU64::new(0)],
        }
    }

    /// Store a value. Returns false if the frame was older than the slot.
    ///
    /// Sequence numbers start at 1; 0 always applies.
    pub fn update(&self, channel: RelayChannel, value: f32, sequence: u64) -> bool {
        let idx = channel.index();
        if sequence != 0 {
            let previous = self.sequences[idx].fetch_max(sequence, Ordering::AcqRel);
            if previous >= sequence {
                return false;
            }
        }
        self.values[idx].store(value, Ordering::Release);
        true
    }
}

impl Default for RelaySlots {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorRelay for RelaySlots {
    fn read(&self, channel: RelayChannel) -> Option<f32> {
        let value = self.values[channel.index()].load(Ordering::Acquire);
        if value.is_nan() { None } else { Some(value) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_before_first_frame() {
        let slots = RelaySlots::new();
        for channel in RelayChannel::ALL {
            assert_eq!(slots.read(channel), None);
        }
    }

    #[test]
    fn test_channels_are_independent() {
        let slots = RelaySlots::new();
        assert!(slots.update(RelayChannel::ObstacleDistance, 420.0, 1));
        assert_eq!(slots.read(RelayChannel::ObstacleDistance), Some(420.0));
        assert_eq!(slots.read(RelayChannel::OverheadDistance), None);
        assert_eq!(slots.read(RelayChannel::ZoneColor), None);
    }

    #[test]
    fn test_stale_sequence_ignored() {
        let slots = RelaySlots::new();
        assert!(slots.update(RelayChannel::OverheadDistance, 100.0, 5));
        assert!(!slots.update(RelayChannel::OverheadDistance, 250.0, 4));
        assert!(!slots.update(RelayChannel::OverheadDistance, 250.0, 5));
        assert_eq!(slots.read(RelayChannel::OverheadDistance), Some(100.0));
        assert!(slots.update(RelayChannel::OverheadDistance, 250.0, 6));
        assert_eq!(slots.read(RelayChannel::OverheadDistance), Some(250.0));
    }
}
