//! Channel tags for FIFOs that do not record their source
//!
//! Some ADCs push bare results into their FIFO. The driver then notes
//! the input of every conversion it starts and pairs those notes with
//! FIFO reads in order. Once a conversion goes missing the pairing is
//! off for good, so every fault drops all outstanding tags.

use heapless::Deque;

use crate::adc::{ChannelId, FifoEntry, FifoError};

/// Channel reported for a result that has no tag
pub const UNTAGGED: u8 = u8::MAX;

/// FIFO state read just before a pop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoStatus {
    /// Results waiting
    pub level: usize,
    /// Results were lost since the last clear
    pub overrun: bool,
}

/// One raw FIFO word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    /// Conversion result
    pub value: u16,
    /// The ADC flagged the conversion
    pub error: bool,
}

/// Channels of the conversions still in the FIFO, oldest first
#[derive(Debug, Default)]
pub struct ChannelTags<const N: usize> {
    pending: Deque<u8, N>,
}

impl<const N: usize> ChannelTags<N> {
    pub fn new() -> Self {
        Self {
            pending: Deque::new(),
        }
    }

    /// Note the channel of a conversion about to start
    ///
    /// Returns `false` when the FIFO would overflow.
    pub fn record(&mut self, channel: u8) -> bool {
        self.pending.push_back(channel).is_ok()
    }

    /// Check that one tag is outstanding per waiting result
    pub fn in_step(&self, level: usize) -> bool {
        self.pending.len() == level
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Forget every outstanding tag
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Pop one result and pair it with its tag
    ///
    /// `read` is only called when the FIFO holds a result. Overrun and
    /// underrun drop all tags; the caller flushes the hardware FIFO on
    /// overrun.
    pub fn pop<F>(&mut self, status: FifoStatus, read: F) -> Result<FifoEntry, FifoError>
    where
        F: FnOnce() -> RawSample,
    {
        if status.overrun {
            self.clear();
            return Err(FifoError::Overrun);
        }
        if status.level == 0 {
            self.clear();
            return Err(FifoError::Underrun);
        }

        let sample = read();
        let tag = self.pending.pop_front().unwrap_or(UNTAGGED);
        if sample.error {
            return Err(FifoError::Conversion);
        }
        let channel = ChannelId::new(tag).ok_or(FifoError::InvalidChannel(tag))?;

        Ok(FifoEntry {
            channel,
            value: sample.value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const READY: FifoStatus = FifoStatus {
        level: 1,
        overrun: false,
    };
    const EMPTY: FifoStatus = FifoStatus {
        level: 0,
        overrun: false,
    };

    fn sample(value: u16) -> impl FnOnce() -> RawSample {
        move || RawSample {
            value,
            error: false,
        }
    }

    fn pass(tags: &mut ChannelTags<4>, channels: &[u8]) {
        for &channel in channels {
            assert!(tags.record(channel));
        }
    }

    #[test]
    fn test_results_pair_with_tags_in_order() {
        let mut tags = ChannelTags::<4>::new();
        pass(&mut tags, &[0, 1, 3]);
        assert!(tags.in_step(3));

        let channels: heapless::Vec<u8, 3> = (0..3u16)
            .map(|value| tags.pop(READY, sample(value)).unwrap().channel.get())
            .collect();
        assert_eq!(channels.as_slice(), &[0, 1, 3]);
        assert!(tags.is_empty());
    }

    #[test]
    fn test_missing_conversion_does_not_shift_later_passes() {
        let mut tags = ChannelTags::<4>::new();

        // Third conversion never landed
        pass(&mut tags, &[0, 1, 3]);
        assert_eq!(tags.pop(READY, sample(10)).unwrap().channel.get(), 0);
        assert_eq!(tags.pop(READY, sample(11)).unwrap().channel.get(), 1);
        assert_eq!(
            tags.pop(EMPTY, || unreachable!()),
            Err(FifoError::Underrun)
        );
        assert!(tags.is_empty());

        pass(&mut tags, &[0, 1, 3]);
        let entry = tags.pop(READY, sample(20)).unwrap();
        assert_eq!((entry.channel.get(), entry.value), (0, 20));
    }

    #[test]
    fn test_out_of_step_is_detected() {
        let mut tags = ChannelTags::<4>::new();
        pass(&mut tags, &[3]);
        assert!(!tags.in_step(0));
        assert!(!tags.in_step(2));
    }

    #[test]
    fn test_overrun_drops_tags() {
        let mut tags = ChannelTags::<4>::new();
        pass(&mut tags, &[0, 1]);
        let status = FifoStatus {
            level: 4,
            overrun: true,
        };
        assert_eq!(tags.pop(status, || unreachable!()), Err(FifoError::Overrun));
        assert!(tags.is_empty());
    }

    #[test]
    fn test_flagged_conversion_consumes_its_tag() {
        let mut tags = ChannelTags::<4>::new();
        pass(&mut tags, &[0, 1]);
        let flagged = || RawSample {
            value: 0,
            error: true,
        };
        assert_eq!(tags.pop(READY, flagged), Err(FifoError::Conversion));
        assert_eq!(tags.pop(READY, sample(5)).unwrap().channel.get(), 1);
    }

    #[test]
    fn test_result_without_tag_is_invalid() {
        let mut tags = ChannelTags::<4>::new();
        assert_eq!(
            tags.pop(READY, sample(1)),
            Err(FifoError::InvalidChannel(UNTAGGED))
        );
    }

    #[test]
    fn test_record_refuses_past_capacity() {
        let mut tags = ChannelTags::<2>::new();
        assert!(tags.record(0));
        assert!(tags.record(1));
        assert!(!tags.record(2));
        assert_eq!(tags.len(), 2);
    }
}
