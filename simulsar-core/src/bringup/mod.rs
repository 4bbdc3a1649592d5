//! Ordered bring-up sequence
//!
//! Hardware setup runs as a fixed list of steps. The first failing step
//! ends the sequence; nothing after it touches hardware.

pub mod sequence;

pub use sequence::{bring_up, InitError, InitStep, Platform};
