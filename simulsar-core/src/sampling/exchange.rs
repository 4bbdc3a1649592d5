//! Interrupt-to-foreground frame exchange
//!
//! A `heapless::spsc` queue carries frames from the trigger interrupt
//! (producer) to the foreground loop (consumer). Neither side blocks: a
//! full queue rejects the newest frame and the interrupt counts the drop.

use heapless::spsc::{Consumer, Producer, Queue};
use portable_atomic::{AtomicU32, Ordering};

use super::frame::ConversionFrame;

/// Queue storage size; holds `QUEUE_DEPTH - 1` frames
pub const QUEUE_DEPTH: usize = 8;

/// Frame queue storage
pub type FrameQueue = Queue<ConversionFrame, QUEUE_DEPTH>;

/// Interrupt side of the queue
pub type FrameProducer<'a> = Producer<'a, ConversionFrame, QUEUE_DEPTH>;

/// Foreground side of the queue
pub type FrameConsumer<'a> = Consumer<'a, ConversionFrame, QUEUE_DEPTH>;

/// Counters shared between the interrupt and the foreground
///
/// Only the interrupt increments; the foreground reads snapshots.
#[derive(Debug, Default)]
pub struct ExchangeStats {
    triggers: AtomicU32,
    published: AtomicU32,
    dropped: AtomicU32,
    fifo_faults: AtomicU32,
}

/// Point-in-time copy of [`ExchangeStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatsSnapshot {
    /// Trigger events serviced
    pub triggers: u32,
    /// Frames pushed into the queue
    pub published: u32,
    /// Frames lost to a full queue
    pub dropped: u32,
    /// FIFO pops that returned an error
    pub fifo_faults: u32,
}

impl ExchangeStats {
    /// Create zeroed counters
    pub const fn new() -> Self {
        Self {
            triggers: AtomicU32::new(0),
            published: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
            fifo_faults: AtomicU32::new(0),
        }
    }

    pub(crate) fn record_trigger(&self) {
        self.triggers.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_published(&self) {
        self.published.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_faults(&self, count: u32) {
        if count > 0 {
            self.fifo_faults.fetch_add(count, Ordering::Relaxed);
        }
    }

    /// Read all counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            triggers: self.triggers.load(Ordering::Relaxed),
            published: self.published.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            fifo_faults: self.fifo_faults.load(Ordering::Relaxed),
        }
    }
}
