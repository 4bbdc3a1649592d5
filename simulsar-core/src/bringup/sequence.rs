//! Bring-up sequence implementation

use simulsar_hal::timer::TimerSettings;
use simulsar_hal::{ChannelId, UartConfig};

use crate::config::{ConfigError, SamplerConfig, SamplingPlan};
use crate::sampling::FRAME_SLOTS;

/// Bring-up steps, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitStep {
    /// Validate the sampler configuration
    Config,
    /// Board and clock bring-up
    Board,
    /// Start the autonomous ADC sequencer
    Sequencer,
    /// Configure the debug UART
    ConsoleInit,
    /// Enable the debug UART
    ConsoleEnable,
    /// Configure the trigger timer
    TimerInit,
    /// Enable the trigger timer block
    TimerEnable,
    /// Hand peripherals to the interrupt and unmask it
    InterruptRegister,
    /// Enable interrupts globally
    InterruptEnable,
    /// Start the trigger timer
    TimerStart,
}

/// Bring-up failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError<E> {
    /// Configuration rejected before any hardware was touched
    Config(ConfigError),
    /// A hardware step failed
    Step {
        /// Step that failed
        step: InitStep,
        /// Platform error
        cause: E,
    },
}

impl<E> InitError<E> {
    /// Step at which bring-up stopped
    pub fn step(&self) -> InitStep {
        match self {
            InitError::Config(_) => InitStep::Config,
            InitError::Step { step, .. } => *step,
        }
    }
}

/// Board operations used by [`bring_up`], one per step
///
/// Infallible steps return `()`; everything else reports a
/// platform-specific error.
pub trait Platform {
    /// Error type for fallible steps
    type Error;

    /// System clock feeding the trigger timer
    fn clock_hz(&self) -> u32;

    /// Board and clock bring-up
    fn init_board(&mut self) -> Result<(), Self::Error>;

    /// Program the channel sequence and start the sequencer
    fn start_sequencer(
        &mut self,
        channels: &[ChannelId; FRAME_SLOTS],
        state: u8,
        timeout_us: u32,
    ) -> Result<(), Self::Error>;

    /// Configure the debug UART
    fn init_console(&mut self, config: &UartConfig) -> Result<(), Self::Error>;

    /// Enable the debug UART
    fn enable_console(&mut self);

    /// Configure the trigger timer
    fn init_trigger_timer(&mut self, settings: &TimerSettings) -> Result<(), Self::Error>;

    /// Enable the trigger timer block
    fn enable_trigger_timer(&mut self);

    /// Hand peripherals to the interrupt handler and unmask it
    fn register_interrupt(&mut self, priority: u8, wraps_per_trigger: u16)
        -> Result<(), Self::Error>;

    /// Enable interrupts globally
    fn enable_interrupts(&mut self);

    /// Start the trigger timer
    fn start_trigger_timer(&mut self);
}

/// Run every bring-up step in order
///
/// `on_step` is called before each step starts. After an error no
/// further step runs. Returns the plan the hardware was set up with.
pub fn bring_up<P, F>(
    platform: &mut P,
    config: &SamplerConfig,
    mut on_step: F,
) -> Result<SamplingPlan, InitError<P::Error>>
where
    P: Platform,
    F: FnMut(InitStep),
{
    on_step(InitStep::Config);
    let plan = config.validate(platform.clock_hz()).map_err(InitError::Config)?;

    let fail = |step: InitStep| move |cause: P::Error| InitError::Step { step, cause };

    on_step(InitStep::Board);
    platform.init_board().map_err(fail(InitStep::Board))?;

    on_step(InitStep::Sequencer);
    platform
        .start_sequencer(&plan.channels, config.start_state, config.sequencer_timeout_us)
        .map_err(fail(InitStep::Sequencer))?;

    on_step(InitStep::ConsoleInit);
    platform
        .init_console(&config.console)
        .map_err(fail(InitStep::ConsoleInit))?;

    on_step(InitStep::ConsoleEnable);
    platform.enable_console();

    on_step(InitStep::TimerInit);
    platform
        .init_trigger_timer(&plan.timer)
        .map_err(fail(InitStep::TimerInit))?;

    on_step(InitStep::TimerEnable);
    platform.enable_trigger_timer();

    on_step(InitStep::InterruptRegister);
    platform
        .register_interrupt(config.interrupt_priority, plan.timer.wraps_per_trigger)
        .map_err(fail(InitStep::InterruptRegister))?;

    on_step(InitStep::InterruptEnable);
    platform.enable_interrupts();

    on_step(InitStep::TimerStart);
    platform.start_trigger_timer();

    Ok(plan)
}
