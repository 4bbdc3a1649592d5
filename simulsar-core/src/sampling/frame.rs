//! Conversion frames

use simulsar_hal::{FifoEntry, FifoError};

/// FIFO pops per trigger (channels sampled together)
pub const FRAME_SLOTS: usize = 3;

/// Outcome of one FIFO pop
pub type SlotResult = Result<FifoEntry, FifoError>;

/// Results of one trigger, in FIFO order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConversionFrame {
    /// Trigger sequence number (wraps)
    pub sequence: u32,
    /// One result per FIFO pop
    pub slots: [SlotResult; FRAME_SLOTS],
}

impl ConversionFrame {
    /// Create a frame
    pub const fn new(sequence: u32, slots: [SlotResult; FRAME_SLOTS]) -> Self {
        Self { sequence, slots }
    }

    /// Number of slots that carry a FIFO error
    pub fn fault_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_err()).count()
    }

    /// Check if every pop succeeded
    pub fn is_clean(&self) -> bool {
        self.fault_count() == 0
    }

    /// Successful entries with their slot index
    pub fn entries(&self) -> impl Iterator<Item = (usize, &FifoEntry)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, result)| result.as_ref().ok().map(|entry| (slot, entry)))
    }
}
