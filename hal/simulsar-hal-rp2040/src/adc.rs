//! ADC sequencer and result FIFO
//!
//! RP2040 has a single SAR ADC with 5 inputs:
//! - ADC0: GPIO26
//! - ADC1: GPIO27
//! - ADC2: GPIO28
//! - ADC3: GPIO29 (VSYS/3 on the Pico)
//! - ADC4: Internal temperature sensor
//!
//! The round-robin mask plays the role of the autonomous sequencer: each
//! conversion advances AINSEL to the next enabled input. Results land in
//! the 4-deep FIFO, which does not record the input that produced them,
//! so the sequencer tags every conversion it starts and pairs the tags
//! with FIFO reads.

use embassy_rp::adc::{Adc, Blocking, Channel};
use embassy_rp::pac;
use embassy_time::{Duration, Instant};
use heapless::Vec;

use simulsar_hal::{
    ChannelId, ChannelTags, FifoEntry, FifoError, FifoStatus, RawSample, SampleFifo, Sequencer,
};

/// Depth of the RP2040 ADC FIFO
pub const FIFO_DEPTH: usize = 4;

/// Maximum inputs in one sequence
pub const MAX_SEQUENCE_LEN: usize = 5;

/// Busy-wait bound for one conversion (~2 µs at 48 MHz ADC clock)
const CONVERSION_SPIN_LIMIT: u32 = 10_000;

/// ADC channel identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcChannel {
    /// ADC0 on GPIO26
    Adc0,
    /// ADC1 on GPIO27
    Adc1,
    /// ADC2 on GPIO28
    Adc2,
    /// ADC3 on GPIO29
    Adc3,
    /// Internal temperature sensor
    Temperature,
}

impl AdcChannel {
    /// Get the GPIO pin for this ADC channel
    pub fn gpio(&self) -> Option<u8> {
        match self {
            AdcChannel::Adc0 => Some(26),
            AdcChannel::Adc1 => Some(27),
            AdcChannel::Adc2 => Some(28),
            AdcChannel::Adc3 => Some(29),
            AdcChannel::Temperature => None,
        }
    }

    /// AINSEL value for this channel
    pub fn ainsel(&self) -> u8 {
        *self as u8
    }

    /// Map a hardware-agnostic channel id onto an RP2040 input
    pub fn from_id(id: ChannelId) -> Option<Self> {
        match id.get() {
            0 => Some(AdcChannel::Adc0),
            1 => Some(AdcChannel::Adc1),
            2 => Some(AdcChannel::Adc2),
            3 => Some(AdcChannel::Adc3),
            4 => Some(AdcChannel::Temperature),
            _ => None,
        }
    }
}

/// Sequencer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequencerError {
    /// No channels programmed
    EmptySequence,
    /// More channels than the round-robin mask can hold
    SequenceTooLong,
    /// Channel listed twice
    DuplicateChannel(u8),
    /// Start state outside the programmed sequence
    InvalidState(u8),
    /// ADC did not report ready in time
    Timeout,
}

/// Round-robin ADC sequencer with tagged FIFO reads
pub struct AdcSequencer<'d> {
    /// Keeps the ADC powered and out of reset
    _adc: Adc<'d, Blocking>,
    /// Keeps the analog pads configured
    _inputs: Vec<Channel<'d>, MAX_SEQUENCE_LEN>,
    /// Inputs in conversion order
    sequence: Vec<AdcChannel, MAX_SEQUENCE_LEN>,
    /// Channel of each conversion still in the FIFO
    tags: ChannelTags<FIFO_DEPTH>,
}

impl<'d> AdcSequencer<'d> {
    /// Create a sequencer over an initialized ADC and its input pads
    pub fn new(adc: Adc<'d, Blocking>, inputs: Vec<Channel<'d>, MAX_SEQUENCE_LEN>) -> Self {
        Self {
            _adc: adc,
            _inputs: inputs,
            sequence: Vec::new(),
            tags: ChannelTags::new(),
        }
    }

    /// Program the conversion order
    ///
    /// The round-robin mask only knows ascending order, so `channels`
    /// must be ascending once rotated to the start state.
    pub fn program(&mut self, channels: &[AdcChannel]) -> Result<(), SequencerError> {
        if channels.is_empty() {
            return Err(SequencerError::EmptySequence);
        }
        let mut sequence = Vec::new();
        for &channel in channels {
            if sequence.contains(&channel) {
                return Err(SequencerError::DuplicateChannel(channel.ainsel()));
            }
            sequence
                .push(channel)
                .map_err(|_| SequencerError::SequenceTooLong)?;
        }
        self.sequence = sequence;
        Ok(())
    }

    /// Round-robin mask with one bit per programmed input
    fn rrobin_mask(&self) -> u8 {
        self.sequence
            .iter()
            .fold(0u8, |mask, channel| mask | (1 << channel.ainsel()))
    }

    /// Drop anything left in the FIFO and clear sticky flags
    fn flush_fifo(&mut self) {
        while pac::ADC.fcs().read().level() > 0 {
            let _ = pac::ADC.fifo().read();
        }
        pac::ADC.fcs().modify(|w| {
            w.set_under(true);
            w.set_over(true);
        });
        self.tags.clear();
    }

    fn wait_ready(spin_limit: u32) -> bool {
        for _ in 0..spin_limit {
            if pac::ADC.cs().read().ready() {
                return true;
            }
        }
        false
    }
}

impl Sequencer for AdcSequencer<'_> {
    type Error = SequencerError;

    fn start(&mut self, state: u8, timeout_us: u32) -> Result<(), SequencerError> {
        let first = *self
            .sequence
            .get(state as usize)
            .ok_or(SequencerError::InvalidState(state))?;
        let uses_sensor = self.sequence.contains(&AdcChannel::Temperature);
        let mask = self.rrobin_mask();

        pac::ADC.cs().modify(|w| {
            w.set_en(true);
            w.set_ts_en(uses_sensor);
            w.set_start_many(false);
            w.set_ainsel(first.ainsel());
            w.set_rrobin(mask);
        });
        pac::ADC.fcs().modify(|w| {
            w.set_en(true);
            w.set_err(true);
            w.set_shift(false);
            w.set_dreq_en(false);
        });

        let deadline = Instant::now() + Duration::from_micros(timeout_us as u64);
        while !pac::ADC.cs().read().ready() {
            if Instant::now() >= deadline {
                return Err(SequencerError::Timeout);
            }
        }

        self.flush_fifo();
        Ok(())
    }

    fn trigger(&mut self) {
        // Leftovers from an incomplete pass would be paired with this one
        if !self.tags.in_step(self.level()) {
            self.flush_fifo();
        }
        for _ in 0..self.sequence.len() {
            let channel = pac::ADC.cs().read().ainsel();
            if !self.tags.record(channel) {
                // FIFO would overflow; the next pop reports the overrun
                break;
            }
            pac::ADC.cs().modify(|w| w.set_start_once(true));
            if !Self::wait_ready(CONVERSION_SPIN_LIMIT) {
                break;
            }
        }
    }
}

impl SampleFifo for AdcSequencer<'_> {
    fn pop(&mut self) -> Result<FifoEntry, FifoError> {
        let fcs = pac::ADC.fcs().read();
        let status = FifoStatus {
            level: fcs.level() as usize,
            overrun: fcs.over(),
        };
        let result = self.tags.pop(status, || {
            let word = pac::ADC.fifo().read();
            RawSample {
                value: word.val(),
                error: word.err(),
            }
        });
        if result == Err(FifoError::Overrun) {
            self.flush_fifo();
        }
        result
    }

    fn level(&self) -> usize {
        pac::ADC.fcs().read().level() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_mapping() {
        let id = |raw| ChannelId::new(raw).unwrap();
        assert_eq!(AdcChannel::from_id(id(0)), Some(AdcChannel::Adc0));
        assert_eq!(AdcChannel::from_id(id(3)).and_then(|c| c.gpio()), Some(29));
        assert_eq!(AdcChannel::from_id(id(4)), Some(AdcChannel::Temperature));
        assert_eq!(AdcChannel::from_id(id(7)), None);
        assert_eq!(AdcChannel::Temperature.ainsel(), 4);
    }
}
