//! Result tracking on the foreground side

use simulsar_hal::ChannelId;

use crate::sampling::{ConversionFrame, FrameConsumer, ResultBuffer, FRAME_SLOTS};

use super::report::{write_report, ReportLine};

/// What one drain pass pulled out of the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DrainSummary {
    /// Frames dequeued
    pub frames: usize,
    /// Faulted slots across those frames
    pub faults: usize,
    /// Frames the producer numbered but never delivered
    pub missed: u32,
}

impl DrainSummary {
    /// Check if anything new arrived
    pub fn has_news(&self) -> bool {
        self.frames > 0
    }
}

/// Outcome of one wake-up of the monitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorPoll {
    /// What the drain pulled out of the queue
    pub summary: DrainSummary,
    /// Line to print, present only when frames arrived
    pub report: Option<ReportLine>,
}

/// Foreground view of the sampled channels
#[derive(Debug, Clone)]
pub struct Monitor {
    /// Latest value per hardware channel
    buffer: ResultBuffer,
    /// Channel last reported by each FIFO slot
    slot_channels: [ChannelId; FRAME_SLOTS],
    /// Sequence number of the last absorbed frame
    last_sequence: Option<u32>,
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new()
    }
}

impl Monitor {
    /// Create a monitor; every slot starts on channel 0 with value 0
    pub const fn new() -> Self {
        Self {
            buffer: ResultBuffer::new(),
            slot_channels: [ChannelId::ZERO; FRAME_SLOTS],
            last_sequence: None,
        }
    }

    /// Apply one frame
    ///
    /// Faulted slots keep their previous channel and value. Returns the
    /// number of frames skipped since the previous one.
    pub fn absorb(&mut self, frame: &ConversionFrame) -> u32 {
        for (slot, entry) in frame.entries() {
            self.slot_channels[slot] = entry.channel;
            self.buffer.store(entry);
        }

        let missed = match self.last_sequence {
            Some(last) => frame.sequence.wrapping_sub(last).wrapping_sub(1),
            None => 0,
        };
        self.last_sequence = Some(frame.sequence);
        missed
    }

    /// Dequeue and apply every waiting frame
    pub fn drain(&mut self, consumer: &mut FrameConsumer<'_>) -> DrainSummary {
        let mut summary = DrainSummary::default();
        while let Some(frame) = consumer.dequeue() {
            summary.frames += 1;
            summary.faults += frame.fault_count();
            summary.missed = summary.missed.saturating_add(self.absorb(&frame));
        }
        summary
    }

    /// Drain the queue and render at most one report line
    pub fn poll(
        &mut self,
        consumer: &mut FrameConsumer<'_>,
    ) -> Result<MonitorPoll, core::fmt::Error> {
        let summary = self.drain(consumer);
        let report = if summary.has_news() {
            Some(self.report()?)
        } else {
            None
        };
        Ok(MonitorPoll { summary, report })
    }

    /// Channel and latest value for each slot
    pub fn readings(&self) -> [(ChannelId, u16); FRAME_SLOTS] {
        self.slot_channels
            .map(|channel| (channel, self.buffer.get(channel)))
    }

    /// Render the current report line
    pub fn report(&self) -> Result<ReportLine, core::fmt::Error> {
        let mut line = ReportLine::new();
        write_report(&mut line, &self.readings())?;
        Ok(line)
    }

    /// Per-channel results
    pub fn buffer(&self) -> &ResultBuffer {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simulsar_hal::{FifoEntry, FifoError};

    use crate::sampling::{FrameQueue, SlotResult};

    fn entry(channel: u8, value: u16) -> SlotResult {
        Ok(FifoEntry {
            channel: ChannelId::new(channel).unwrap(),
            value,
        })
    }

    #[test]
    fn test_initial_report_reads_channel_zero() {
        let monitor = Monitor::new();
        assert_eq!(
            monitor.report().unwrap().as_str(),
            "ADC Result - AN_A0: 0x0, AN_A0: 0x0, AN_A0: 0x0\r\n\r\n"
        );
    }

    #[test]
    fn test_report_shows_most_recent_sample_per_channel() {
        let mut queue = FrameQueue::new();
        let (mut producer, mut consumer) = queue.split();
        let mut monitor = Monitor::new();

        producer
            .enqueue(ConversionFrame::new(0, [entry(0, 0x100), entry(1, 0x200), entry(7, 0x300)]))
            .unwrap();
        producer
            .enqueue(ConversionFrame::new(1, [entry(0, 0x101), entry(1, 0x201), entry(7, 0x301)]))
            .unwrap();

        let summary = monitor.drain(&mut consumer);
        assert_eq!(summary.frames, 2);
        assert_eq!(summary.missed, 0);
        assert_eq!(
            monitor.report().unwrap().as_str(),
            "ADC Result - AN_A0: 0x101, AN_A1: 0x201, AN_A7: 0x301\r\n\r\n"
        );
    }

    #[test]
    fn test_empty_drain_has_no_news() {
        let mut queue = FrameQueue::new();
        let (_producer, mut consumer) = queue.split();
        let mut monitor = Monitor::new();

        let summary = monitor.drain(&mut consumer);
        assert!(!summary.has_news());
    }

    #[test]
    fn test_poll_without_frames_reports_nothing() {
        let mut queue = FrameQueue::new();
        let (_producer, mut consumer) = queue.split();
        let mut monitor = Monitor::new();

        let poll = monitor.poll(&mut consumer).unwrap();
        assert_eq!(poll.summary, DrainSummary::default());
        assert_eq!(poll.report, None);
    }

    #[test]
    fn test_poll_reports_once_for_several_frames() {
        let mut queue = FrameQueue::new();
        let (mut producer, mut consumer) = queue.split();
        let mut monitor = Monitor::new();

        for sequence in 0..3 {
            let slots = [entry(0, sequence as u16), entry(1, 2), entry(3, 4)];
            producer
                .enqueue(ConversionFrame::new(sequence, slots))
                .unwrap();
        }

        let poll = monitor.poll(&mut consumer).unwrap();
        assert_eq!(poll.summary.frames, 3);
        assert_eq!(
            poll.report.unwrap().as_str(),
            "ADC Result - AN_A0: 0x2, AN_A1: 0x2, AN_A3: 0x4\r\n\r\n"
        );

        // Queue is empty again
        assert_eq!(monitor.poll(&mut consumer).unwrap().report, None);
    }

    #[test]
    fn test_faulted_slot_keeps_previous_reading() {
        let mut monitor = Monitor::new();
        monitor.absorb(&ConversionFrame::new(0, [entry(0, 1), entry(1, 2), entry(7, 3)]));
        monitor.absorb(&ConversionFrame::new(
            1,
            [entry(0, 4), Err(FifoError::Overrun), Err(FifoError::InvalidChannel(99))],
        ));

        let readings = monitor.readings();
        assert_eq!(readings[0].1, 4);
        assert_eq!(readings[1], (ChannelId::new(1).unwrap(), 2));
        assert_eq!(readings[2], (ChannelId::new(7).unwrap(), 3));
    }

    #[test]
    fn test_sequence_gap_counts_missed_frames() {
        let mut monitor = Monitor::new();
        let clean = [entry(0, 1), entry(1, 2), entry(7, 3)];

        assert_eq!(monitor.absorb(&ConversionFrame::new(5, clean)), 0);
        assert_eq!(monitor.absorb(&ConversionFrame::new(6, clean)), 0);
        assert_eq!(monitor.absorb(&ConversionFrame::new(9, clean)), 2);
        assert_eq!(monitor.absorb(&ConversionFrame::new(0, clean)), u32::MAX - 9);
    }

    #[test]
    fn test_slots_follow_reported_channel() {
        // Slot order follows whatever the FIFO reports, not the config
        let mut monitor = Monitor::new();
        monitor.absorb(&ConversionFrame::new(0, [entry(7, 9), entry(0, 8), entry(1, 7)]));
        assert_eq!(
            monitor.readings().map(|(channel, _)| channel.get()),
            [7, 0, 1]
        );
        assert_eq!(monitor.buffer().get(ChannelId::new(7).unwrap()), 9);
    }
}
