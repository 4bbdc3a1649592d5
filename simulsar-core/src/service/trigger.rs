//! Trigger interrupt service implementation

use simulsar_hal::{OutputPin, SampleFifo, Sequencer, TriggerTimer};

use crate::sampling::{ConversionFrame, ExchangeStats, FrameProducer, SlotResult, FRAME_SLOTS};

/// What one interrupt did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServiceOutcome {
    /// No status bit was set
    Spurious,
    /// Counter wrapped but the postscaler has not expired
    Idle,
    /// Frame queued for the foreground
    Published {
        /// FIFO pops that failed
        faults: usize,
    },
    /// Frame lost because the queue was full
    Dropped,
}

impl ServiceOutcome {
    /// Check if a new frame is waiting for the foreground
    pub fn frame_ready(self) -> bool {
        matches!(self, ServiceOutcome::Published { .. })
    }
}

/// Interrupt-side state: postscaler and frame sequence
#[derive(Debug, Clone)]
pub struct TriggerService {
    /// Wraps per trigger event
    wraps_per_trigger: u16,
    /// Wraps seen since the last trigger event
    wraps: u16,
    /// Sequence number of the next frame
    sequence: u32,
}

impl TriggerService {
    /// Create a service that fires every `wraps_per_trigger` wraps
    pub const fn new(wraps_per_trigger: u16) -> Self {
        Self {
            wraps_per_trigger: if wraps_per_trigger == 0 {
                1
            } else {
                wraps_per_trigger
            },
            wraps: 0,
            sequence: 0,
        }
    }

    /// Sequence number the next frame will carry
    pub fn next_sequence(&self) -> u32 {
        self.sequence
    }

    /// Service one timer interrupt
    ///
    /// Clears the pending status, and on a trigger event runs one
    /// sequencer pass, drains one FIFO entry per slot, toggles the LED
    /// once and queues the frame.
    pub fn service<T, A, L>(
        &mut self,
        timer: &mut T,
        adc: &mut A,
        led: &mut L,
        producer: &mut FrameProducer<'_>,
        stats: &ExchangeStats,
    ) -> ServiceOutcome
    where
        T: TriggerTimer,
        A: Sequencer + SampleFifo,
        L: OutputPin,
    {
        let status = timer.interrupt_status();
        timer.clear_interrupt(status);

        if !status.is_pending() {
            return ServiceOutcome::Spurious;
        }

        self.wraps += 1;
        if self.wraps < self.wraps_per_trigger {
            return ServiceOutcome::Idle;
        }
        self.wraps = 0;
        stats.record_trigger();

        adc.trigger();
        let slots: [SlotResult; FRAME_SLOTS] = core::array::from_fn(|_| adc.pop());

        led.toggle();

        let frame = ConversionFrame::new(self.sequence, slots);
        self.sequence = self.sequence.wrapping_add(1);

        let faults = frame.fault_count();
        stats.record_faults(faults as u32);

        match producer.enqueue(frame) {
            Ok(()) => {
                stats.record_published();
                ServiceOutcome::Published { faults }
            }
            Err(_) => {
                stats.record_dropped();
                ServiceOutcome::Dropped
            }
        }
    }
}
