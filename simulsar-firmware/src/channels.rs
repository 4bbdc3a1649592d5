//! Interrupt-to-foreground signalling
//!
//! Frames themselves travel through the SPSC queue; these statics only
//! wake the foreground and count what happened.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use simulsar_core::sampling::ExchangeStats;

/// Raised by the trigger interrupt after it touched the frame queue
pub static FRAME_READY: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Trigger, publish, drop and FIFO fault counters
pub static STATS: ExchangeStats = ExchangeStats::new();
