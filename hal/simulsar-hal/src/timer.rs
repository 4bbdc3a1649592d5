//! Trigger timer abstractions
//!
//! A periodic counter whose wrap (terminal count) event both paces the
//! ADC and raises the service interrupt.

/// Counter setting for one trigger period
///
/// The counter runs at `clock / divider` and wraps every `top + 1`
/// counts. Periods longer than one wrap are reached by counting
/// `wraps_per_trigger` wraps in software.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerSettings {
    /// Integer clock divider (1-255)
    pub divider: u8,
    /// Counter top value; the period is `top + 1` counts
    pub top: u16,
    /// Number of wraps per trigger (postscaler)
    pub wraps_per_trigger: u16,
}

/// Masked interrupt status bits read from the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptStatus(pub u32);

impl InterruptStatus {
    /// No interrupt pending
    pub const NONE: Self = Self(0);

    /// Check if any status bit is set
    pub fn is_pending(self) -> bool {
        self.0 != 0
    }
}

/// Periodic trigger timer
pub trait TriggerTimer {
    /// Error type for configuring the timer
    type Error;

    /// Apply the counter setting; the timer stays stopped
    fn init(&mut self, settings: &TimerSettings) -> Result<(), Self::Error>;

    /// Enable the counter block so it can be started
    fn enable(&mut self);

    /// Start counting
    fn start(&mut self);

    /// Read the masked interrupt status
    fn interrupt_status(&self) -> InterruptStatus;

    /// Clear the given interrupt status bits
    fn clear_interrupt(&mut self, status: InterruptStatus);
}
