//! GPIO pin abstractions
//!
//! Only digital outputs are needed: the user LED that blinks once per
//! trigger.

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Invert the pin state
    fn toggle(&mut self);
}
