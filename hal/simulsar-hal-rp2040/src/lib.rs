//! RP2040 implementations of the Simulsar HAL traits
//!
//! - ADC round-robin sequencer with tagged FIFO reads
//! - PWM slice wrap as the trigger timer
//! - GPIO output for the user LED
//! - Transmit-only debug console

#![no_std]

pub mod adc;
pub mod gpio;
pub mod pwm;
pub mod uart;

pub use adc::{AdcChannel, AdcSequencer, SequencerError};
pub use gpio::LedPin;
pub use pwm::{PwmTrigger, TimerError};
pub use uart::{ConsoleError, ConsoleUart};
