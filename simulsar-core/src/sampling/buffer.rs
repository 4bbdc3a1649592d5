//! Per-channel result buffer

use simulsar_hal::adc::CHANNEL_COUNT;
use simulsar_hal::{ChannelId, FifoEntry};

/// Latest value for each of the 16 hardware channels
///
/// Indexed by [`ChannelId`], which is range-checked at construction, so a
/// store can never land outside the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultBuffer {
    values: [u16; CHANNEL_COUNT],
}

impl Default for ResultBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultBuffer {
    /// Create a buffer with every slot at zero
    pub const fn new() -> Self {
        Self {
            values: [0; CHANNEL_COUNT],
        }
    }

    /// Record a FIFO entry under its channel
    pub fn store(&mut self, entry: &FifoEntry) {
        self.values[entry.channel.index()] = entry.value;
    }

    /// Latest value for a channel
    pub fn get(&self, channel: ChannelId) -> u16 {
        self.values[channel.index()]
    }

    /// All slots, indexed by channel id
    pub fn as_slice(&self) -> &[u16] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_starts_zeroed() {
        let buffer = ResultBuffer::new();
        assert!(buffer.as_slice().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_latest_value_wins() {
        let mut buffer = ResultBuffer::new();
        let channel = ChannelId::new(7).unwrap();
        buffer.store(&FifoEntry { channel, value: 0x123 });
        buffer.store(&FifoEntry { channel, value: 0x456 });
        assert_eq!(buffer.get(channel), 0x456);
    }

    proptest! {
        #[test]
        fn prop_store_touches_only_its_channel(raw in 0u8..16, value: u16) {
            let mut buffer = ResultBuffer::new();
            let channel = ChannelId::new(raw).unwrap();
            buffer.store(&FifoEntry { channel, value });

            for (index, &slot) in buffer.as_slice().iter().enumerate() {
                if index == raw as usize {
                    prop_assert_eq!(slot, value);
                } else {
                    prop_assert_eq!(slot, 0);
                }
            }
        }
    }
}
