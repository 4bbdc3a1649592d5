//! PWM slice as the periodic trigger timer
//!
//! A free-running PWM slice wraps every `top + 1` counts of
//! `clk_sys / divider` and raises `PWM_IRQ_WRAP`. RP2040 has no route from
//! a PWM wrap to the ADC start bit, so the wrap interrupt starts the
//! conversions itself.

use embassy_rp::pac;
use embassy_rp::pwm::{Config, Pwm};
use fixed::traits::ToFixed;

use simulsar_hal::timer::TimerSettings;
use simulsar_hal::{InterruptStatus, TriggerTimer};

/// Number of PWM slices on RP2040
pub const SLICE_COUNT: u8 = 8;

/// Timer configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// Divider of zero
    InvalidDivider,
    /// Slice index outside 0-7
    InvalidSlice(u8),
}

/// PWM slice driven as a wrap-interrupt timer
pub struct PwmTrigger<'d> {
    pwm: Pwm<'d>,
    slice: u8,
    config: Config,
}

impl<'d> PwmTrigger<'d> {
    /// Wrap a free-running slice
    ///
    /// `slice` must be the index of the slice `pwm` was created from; it
    /// selects the bit in the shared interrupt registers.
    pub fn new(pwm: Pwm<'d>, slice: u8) -> Result<Self, TimerError> {
        if slice >= SLICE_COUNT {
            return Err(TimerError::InvalidSlice(slice));
        }
        let mut config = Config::default();
        config.enable = false;
        Ok(Self { pwm, slice, config })
    }

    /// Interrupt bit of this slice
    fn mask(&self) -> u32 {
        1 << self.slice
    }
}

impl TriggerTimer for PwmTrigger<'_> {
    type Error = TimerError;

    fn init(&mut self, settings: &TimerSettings) -> Result<(), TimerError> {
        if settings.divider == 0 {
            return Err(TimerError::InvalidDivider);
        }
        self.config.divider = settings.divider.to_fixed();
        self.config.top = settings.top;
        self.config.enable = false;
        self.pwm.set_config(&self.config);
        self.pwm.set_counter(0);
        self.pwm.clear_wrapped();
        Ok(())
    }

    fn enable(&mut self) {
        let mask = self.mask();
        pac::PWM.inte().modify(|w| w.0 |= mask);
    }

    fn start(&mut self) {
        self.config.enable = true;
        self.pwm.set_config(&self.config);
    }

    fn interrupt_status(&self) -> InterruptStatus {
        InterruptStatus(pac::PWM.ints().read().0 & self.mask())
    }

    fn clear_interrupt(&mut self, status: InterruptStatus) {
        if status.0 & self.mask() != 0 {
            self.pwm.clear_wrapped();
        }
    }
}
