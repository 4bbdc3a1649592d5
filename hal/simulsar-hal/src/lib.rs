//! Simulsar Hardware Abstraction Layer
//!
//! This crate defines the peripheral seams the sampling demo relies on.
//! Chip-specific crates implement them, and `simulsar-core` drives them
//! without knowing which chip sits underneath.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  simulsar-firmware (board wiring, IRQ)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  simulsar-core (service, bring-up)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  simulsar-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ simulsar-hal- │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital output (user LED)
//! - [`uart::UartTx`] - Debug console output
//! - [`adc::Sequencer`], [`adc::SampleFifo`] - Autonomous ADC sequencing and result FIFO
//! - [`tags::ChannelTags`] - Source tracking for FIFOs without channel ids
//! - [`timer::TriggerTimer`] - Periodic trigger source with interrupt status

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod gpio;
pub mod tags;
pub mod timer;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use adc::{ChannelId, FifoEntry, FifoError, SampleFifo, Sequencer};
pub use gpio::OutputPin;
pub use tags::{ChannelTags, FifoStatus, RawSample};
pub use timer::{InterruptStatus, TriggerTimer};
pub use uart::{UartConfig, UartTx};
