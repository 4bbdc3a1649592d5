//! GPIO outputs

use embassy_rp::gpio::Output;

use simulsar_hal::OutputPin;

/// On-board LED of the Raspberry Pi Pico
pub const PICO_LED_PIN: u8 = 25;

/// Push-pull output driving an LED
pub struct LedPin<'d> {
    pin: Output<'d>,
}

impl<'d> LedPin<'d> {
    pub fn new(pin: Output<'d>) -> Self {
        Self { pin }
    }
}

impl OutputPin for LedPin<'_> {
    fn toggle(&mut self) {
        self.pin.toggle();
    }
}
