//! Trigger interrupt service
//!
//! Everything the timer interrupt does, expressed against the HAL traits
//! so it can run on the host under test.

pub mod trigger;

pub use trigger::{ServiceOutcome, TriggerService};
