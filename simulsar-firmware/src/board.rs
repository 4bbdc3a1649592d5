//! Raspberry Pi Pico board wiring
//!
//! Owns the peripherals the sampler needs and walks them through the
//! bring-up steps. Once the interrupt is registered the ADC, timer, LED
//! and queue producer belong to the interrupt handler; only the console
//! stays with the foreground.

use defmt::*;
use embassy_rp::adc::{self, Adc, Blocking, Channel};
use embassy_rp::gpio::{Level, Output, Pull};
use embassy_rp::interrupt::{self, InterruptExt, Priority};
use embassy_rp::peripherals::{
    ADC, ADC_TEMP_SENSOR, PIN_0, PIN_25, PIN_26, PIN_27, PIN_28, PIN_29, PWM_SLICE0, UART0,
};
use embassy_rp::pwm::{self, Pwm};
use embassy_rp::uart;
use embassy_rp::Peri;
use heapless::Vec;

use simulsar_core::bringup::Platform;
use simulsar_core::sampling::{FrameProducer, FRAME_SLOTS};
use simulsar_core::service::TriggerService;
use simulsar_hal::timer::TimerSettings;
use simulsar_hal::{ChannelId, Sequencer, TriggerTimer, UartConfig};
use simulsar_hal_rp2040::adc::MAX_SEQUENCE_LEN;
use simulsar_hal_rp2040::gpio::PICO_LED_PIN;
use simulsar_hal_rp2040::uart::embassy_config;
use simulsar_hal_rp2040::{
    AdcChannel, AdcSequencer, ConsoleUart, LedPin, PwmTrigger, SequencerError, TimerError,
};

use crate::irq::{IsrContext, ISR_CONTEXT};

/// PWM slice used as the trigger timer
const TRIGGER_SLICE: u8 = 0;

/// Debug console on UART0 TX (GPIO0)
pub type Console = ConsoleUart<uart::UartTx<'static, uart::Blocking>>;

/// Board bring-up errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardError {
    /// Peripheral already handed out (step ran twice or out of order)
    AlreadyTaken,
    /// LED wired to a pin other than the on-board one
    UnsupportedLedPin(u8),
    /// Channel id without an ADC input on this chip
    UnsupportedChannel(u8),
    /// Priority outside the NVIC's four levels
    InvalidPriority(u8),
    /// Console baud rate of zero
    InvalidBaudrate(u32),
    /// ADC sequencer rejected the setup
    Sequencer(SequencerError),
    /// PWM slice rejected the setup
    Timer(TimerError),
}

impl From<SequencerError> for BoardError {
    fn from(e: SequencerError) -> Self {
        BoardError::Sequencer(e)
    }
}

impl From<TimerError> for BoardError {
    fn from(e: TimerError) -> Self {
        BoardError::Timer(e)
    }
}

/// Peripherals taken from `embassy_rp::init`
pub struct BoardResources {
    pub adc: Peri<'static, ADC>,
    pub temp_sensor: Peri<'static, ADC_TEMP_SENSOR>,
    pub pin_26: Peri<'static, PIN_26>,
    pub pin_27: Peri<'static, PIN_27>,
    pub pin_28: Peri<'static, PIN_28>,
    pub pin_29: Peri<'static, PIN_29>,
    pub pwm_slice: Peri<'static, PWM_SLICE0>,
    pub uart: Peri<'static, UART0>,
    pub uart_tx: Peri<'static, PIN_0>,
    pub led: Peri<'static, PIN_25>,
}

/// ADC input pads not yet claimed by the sequencer
struct AnalogInputs {
    temp_sensor: Option<Peri<'static, ADC_TEMP_SENSOR>>,
    pin_26: Option<Peri<'static, PIN_26>>,
    pin_27: Option<Peri<'static, PIN_27>>,
    pin_28: Option<Peri<'static, PIN_28>>,
    pin_29: Option<Peri<'static, PIN_29>>,
}

impl AnalogInputs {
    fn take(&mut self, channel: AdcChannel) -> Result<Channel<'static>, BoardError> {
        let input = match channel {
            AdcChannel::Adc0 => self.pin_26.take().map(|p| Channel::new_pin(p, Pull::None)),
            AdcChannel::Adc1 => self.pin_27.take().map(|p| Channel::new_pin(p, Pull::None)),
            AdcChannel::Adc2 => self.pin_28.take().map(|p| Channel::new_pin(p, Pull::None)),
            AdcChannel::Adc3 => self.pin_29.take().map(|p| Channel::new_pin(p, Pull::None)),
            AdcChannel::Temperature => self.temp_sensor.take().map(Channel::new_temp_sensor),
        };
        input.ok_or(BoardError::AlreadyTaken)
    }
}

/// Pico board in the middle of bring-up
pub struct Board {
    led_pin: u8,
    inputs: AnalogInputs,
    adc_peripheral: Option<Peri<'static, ADC>>,
    pwm_slice: Option<Peri<'static, PWM_SLICE0>>,
    uart_parts: Option<(Peri<'static, UART0>, Peri<'static, PIN_0>)>,
    led_peripheral: Option<Peri<'static, PIN_25>>,
    producer: Option<FrameProducer<'static>>,
    led: Option<LedPin<'static>>,
    adc: Option<Adc<'static, Blocking>>,
    sequencer: Option<AdcSequencer<'static>>,
    timer: Option<PwmTrigger<'static>>,
    console: Option<Console>,
}

impl Board {
    pub fn new(resources: BoardResources, producer: FrameProducer<'static>, led_pin: u8) -> Self {
        Self {
            led_pin,
            inputs: AnalogInputs {
                temp_sensor: Some(resources.temp_sensor),
                pin_26: Some(resources.pin_26),
                pin_27: Some(resources.pin_27),
                pin_28: Some(resources.pin_28),
                pin_29: Some(resources.pin_29),
            },
            adc_peripheral: Some(resources.adc),
            pwm_slice: Some(resources.pwm_slice),
            uart_parts: Some((resources.uart, resources.uart_tx)),
            led_peripheral: Some(resources.led),
            producer: Some(producer),
            led: None,
            adc: None,
            sequencer: None,
            timer: None,
            console: None,
        }
    }

    /// Hand the console to the foreground loop
    pub fn take_console(&mut self) -> Option<Console> {
        self.console.take()
    }
}

/// Map a 0-3 priority onto the RP2040's NVIC levels
fn nvic_priority(priority: u8) -> Result<Priority, BoardError> {
    match priority {
        0 => Ok(Priority::P0),
        1 => Ok(Priority::P1),
        2 => Ok(Priority::P2),
        3 => Ok(Priority::P3),
        _ => Err(BoardError::InvalidPriority(priority)),
    }
}

impl Platform for Board {
    type Error = BoardError;

    fn clock_hz(&self) -> u32 {
        embassy_rp::clocks::clk_sys_freq()
    }

    fn init_board(&mut self) -> Result<(), BoardError> {
        if self.led_pin != PICO_LED_PIN {
            return Err(BoardError::UnsupportedLedPin(self.led_pin));
        }
        let led = self.led_peripheral.take().ok_or(BoardError::AlreadyTaken)?;
        self.led = Some(LedPin::new(Output::new(led, Level::Low)));

        let adc = self.adc_peripheral.take().ok_or(BoardError::AlreadyTaken)?;
        self.adc = Some(Adc::new_blocking(adc, adc::Config::default()));

        debug!("clk_sys = {} Hz", embassy_rp::clocks::clk_sys_freq());
        Ok(())
    }

    fn start_sequencer(
        &mut self,
        channels: &[ChannelId; FRAME_SLOTS],
        state: u8,
        timeout_us: u32,
    ) -> Result<(), BoardError> {
        let mut order: Vec<AdcChannel, MAX_SEQUENCE_LEN> = Vec::new();
        let mut pads: Vec<Channel<'static>, MAX_SEQUENCE_LEN> = Vec::new();
        for &id in channels {
            let channel =
                AdcChannel::from_id(id).ok_or(BoardError::UnsupportedChannel(id.get()))?;
            let pad = self.inputs.take(channel)?;
            order
                .push(channel)
                .map_err(|_| BoardError::Sequencer(SequencerError::SequenceTooLong))?;
            pads.push(pad)
                .map_err(|_| BoardError::Sequencer(SequencerError::SequenceTooLong))?;
        }

        let adc = self.adc.take().ok_or(BoardError::AlreadyTaken)?;
        let mut sequencer = AdcSequencer::new(adc, pads);
        sequencer.program(&order)?;
        sequencer.start(state, timeout_us)?;
        self.sequencer = Some(sequencer);
        Ok(())
    }

    fn init_console(&mut self, config: &UartConfig) -> Result<(), BoardError> {
        if config.baudrate == 0 {
            return Err(BoardError::InvalidBaudrate(config.baudrate));
        }
        let (peripheral, tx_pin) = self.uart_parts.take().ok_or(BoardError::AlreadyTaken)?;
        let tx = uart::UartTx::new_blocking(peripheral, tx_pin, embassy_config(config));
        self.console = Some(ConsoleUart::new(tx));
        Ok(())
    }

    fn enable_console(&mut self) {
        if let Some(console) = self.console.as_mut() {
            console.enable();
        }
    }

    fn init_trigger_timer(&mut self, settings: &TimerSettings) -> Result<(), BoardError> {
        let slice = self.pwm_slice.take().ok_or(BoardError::AlreadyTaken)?;
        let pwm = Pwm::new_free(slice, pwm::Config::default());
        let mut timer = PwmTrigger::new(pwm, TRIGGER_SLICE)?;
        timer.init(settings)?;
        self.timer = Some(timer);
        Ok(())
    }

    fn enable_trigger_timer(&mut self) {
        if let Some(timer) = self.timer.as_mut() {
            timer.enable();
        }
    }

    fn register_interrupt(&mut self, priority: u8, wraps_per_trigger: u16) -> Result<(), BoardError> {
        let priority = nvic_priority(priority)?;
        let timer = self.timer.take().ok_or(BoardError::AlreadyTaken)?;
        let adc = self.sequencer.take().ok_or(BoardError::AlreadyTaken)?;
        let led = self.led.take().ok_or(BoardError::AlreadyTaken)?;
        let producer = self.producer.take().ok_or(BoardError::AlreadyTaken)?;

        ISR_CONTEXT.lock(|cell| {
            cell.replace(Some(IsrContext {
                service: TriggerService::new(wraps_per_trigger),
                timer,
                adc,
                led,
                producer,
            }));
        });

        interrupt::PWM_IRQ_WRAP.set_priority(priority);
        interrupt::PWM_IRQ_WRAP.unpend();
        unsafe { cortex_m::peripheral::NVIC::unmask(interrupt::PWM_IRQ_WRAP) };
        Ok(())
    }

    fn enable_interrupts(&mut self) {
        unsafe { cortex_m::interrupt::enable() };
    }

    fn start_trigger_timer(&mut self) {
        // The timer now lives with the interrupt handler
        ISR_CONTEXT.lock(|cell| {
            if let Some(ctx) = cell.borrow_mut().as_mut() {
                ctx.timer.start();
            }
        });
    }
}
