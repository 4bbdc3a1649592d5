//! Board-agnostic sampling logic for the Simulsar ADC demo
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Sampler configuration and trigger timing math
//! - Conversion frames, the per-channel result buffer and the
//!   interrupt-to-foreground frame queue
//! - Trigger interrupt service logic
//! - Foreground monitor and serial report formatting
//! - Ordered bring-up sequence with fail-stop semantics

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod bringup;
pub mod config;
pub mod monitor;
pub mod sampling;
pub mod service;
