//! ADC sequencer and result FIFO abstractions
//!
//! The sampling hardware is modelled as two cooperating pieces:
//!
//! - a [`Sequencer`] that owns the conversion schedule and runs it without
//!   per-sample CPU involvement once started, and
//! - a [`SampleFifo`] that buffers finished conversions until software pops
//!   them. Each pop reports which channel produced the value.

use core::fmt;

/// Number of channel ids the result buffer can address
pub const CHANNEL_COUNT: usize = 16;

/// Hardware ADC channel id (0-15)
///
/// A `ChannelId` is always in range, so it can index a
/// `[_; CHANNEL_COUNT]` table without further checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelId(u8);

impl ChannelId {
    /// Channel 0
    pub const ZERO: Self = Self(0);

    /// Create a channel id, rejecting values outside 0-15
    pub const fn new(raw: u8) -> Option<Self> {
        if (raw as usize) < CHANNEL_COUNT {
            Some(Self(raw))
        } else {
            None
        }
    }

    /// Raw channel number
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Table index for this channel
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One conversion popped from the result FIFO
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoEntry {
    /// Channel that produced the value
    pub channel: ChannelId,
    /// Raw conversion result
    pub value: u16,
}

/// Errors reported by a FIFO pop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FifoError {
    /// Pop attempted on an empty FIFO
    Underrun,
    /// Conversions were lost because the FIFO was full
    Overrun,
    /// The ADC flagged the conversion as bad
    Conversion,
    /// Hardware reported a channel id outside 0-15
    InvalidChannel(u8),
}

impl fmt::Display for FifoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FifoError::Underrun => f.write_str("FIFO underrun"),
            FifoError::Overrun => f.write_str("FIFO overrun"),
            FifoError::Conversion => f.write_str("conversion error"),
            FifoError::InvalidChannel(raw) => write!(f, "invalid channel id {}", raw),
        }
    }
}

/// Autonomous ADC sequencer
///
/// Runs a preprogrammed sampling sequence. Chips with a hardware trigger
/// line from the timer never need [`Sequencer::trigger`]; chips without
/// one issue it from the timer interrupt.
pub trait Sequencer {
    /// Error type for starting the sequencer
    type Error;

    /// Start the sequencer from `state`, waiting up to `timeout_us` for it
    /// to report ready
    fn start(&mut self, state: u8, timeout_us: u32) -> Result<(), Self::Error>;

    /// Run one pass of the sequence, landing one conversion per
    /// configured channel in the FIFO
    fn trigger(&mut self);
}

/// Hardware result FIFO
pub trait SampleFifo {
    /// Pop the oldest conversion
    fn pop(&mut self) -> Result<FifoEntry, FifoError>;

    /// Number of conversions waiting
    fn level(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_id_range() {
        assert_eq!(ChannelId::new(0).map(ChannelId::get), Some(0));
        assert_eq!(ChannelId::new(15).map(ChannelId::index), Some(15));
        assert_eq!(ChannelId::new(16), None);
        assert_eq!(ChannelId::new(u8::MAX), None);
    }

    #[test]
    fn test_default_is_channel_zero() {
        assert_eq!(ChannelId::default(), ChannelId::ZERO);
    }
}
