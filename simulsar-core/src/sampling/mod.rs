//! Sampled data and its path from interrupt to foreground
//!
//! The interrupt packs the three FIFO pops of one trigger into a
//! [`ConversionFrame`] and pushes it through a single-producer /
//! single-consumer queue. The foreground owns the [`ResultBuffer`] and is
//! the only context that writes it.

pub mod buffer;
pub mod exchange;
pub mod frame;

pub use buffer::ResultBuffer;
pub use exchange::{
    ExchangeStats, FrameConsumer, FrameProducer, FrameQueue, StatsSnapshot, QUEUE_DEPTH,
};
pub use frame::{ConversionFrame, SlotResult, FRAME_SLOTS};
