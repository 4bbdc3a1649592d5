//! Configuration type definitions

use simulsar_hal::timer::TimerSettings;
use simulsar_hal::{ChannelId, UartConfig};

use crate::sampling::FRAME_SLOTS;

use super::timing::{timer_settings, TimingError};

/// Default sampled channels: ADC0 (GPIO26), ADC1 (GPIO27), ADC3 (GPIO29, VSYS/3)
pub const DEFAULT_CHANNELS: [u8; FRAME_SLOTS] = [0, 1, 3];

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Trigger period of zero
    ZeroPeriod,
    /// Trigger period cannot be reached with the counter and postscaler
    PeriodTooLong,
    /// Channel id outside 0-15
    ChannelOutOfRange(u8),
    /// Same channel listed twice
    DuplicateChannel(u8),
}

impl From<TimingError> for ConfigError {
    fn from(e: TimingError) -> Self {
        match e {
            TimingError::ZeroPeriod => ConfigError::ZeroPeriod,
            TimingError::PeriodTooLong => ConfigError::PeriodTooLong,
        }
    }
}

/// Hardware setting derived from a valid [`SamplerConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SamplingPlan {
    /// Sampled channels, in FIFO order
    pub channels: [ChannelId; FRAME_SLOTS],
    /// Trigger timer setting
    pub timer: TimerSettings,
}

/// Sampler configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SamplerConfig {
    /// Channels sampled together on every trigger, in FIFO order
    pub channels: [u8; FRAME_SLOTS],
    /// Trigger period in milliseconds
    pub period_ms: u32,
    /// Sequencer state to start from
    pub start_state: u8,
    /// How long to wait for the sequencer to report ready (µs)
    pub sequencer_timeout_us: u32,
    /// NVIC priority of the trigger interrupt (0 = highest)
    pub interrupt_priority: u8,
    /// Debug console settings
    pub console: UartConfig,
    /// User LED GPIO
    pub led_pin: u8,
}

impl SamplerConfig {
    /// Default configuration: three channels, 1 s period, 115200 8N1
    pub const fn new() -> Self {
        Self {
            channels: DEFAULT_CHANNELS,
            period_ms: 1000,
            start_state: 0,
            sequencer_timeout_us: 1000,
            interrupt_priority: 0,
            console: UartConfig::new(115200),
            led_pin: 25,
        }
    }

    /// Check channel ids and that the period is reachable at `clock_hz`
    pub fn validate(&self, clock_hz: u32) -> Result<SamplingPlan, ConfigError> {
        let channels = self.channel_ids()?;
        let timer = timer_settings(clock_hz, self.period_ms)?;
        Ok(SamplingPlan { channels, timer })
    }

    /// Time without a trigger after which sampling counts as stalled
    pub const fn stall_window_ms(&self) -> u32 {
        self.period_ms.saturating_mul(2)
    }

    fn channel_ids(&self) -> Result<[ChannelId; FRAME_SLOTS], ConfigError> {
        let mut ids = [ChannelId::ZERO; FRAME_SLOTS];
        for (slot, &raw) in self.channels.iter().enumerate() {
            let id = ChannelId::new(raw).ok_or(ConfigError::ChannelOutOfRange(raw))?;
            if ids[..slot].contains(&id) {
                return Err(ConfigError::DuplicateChannel(raw));
            }
            ids[slot] = id;
        }
        Ok(ids)
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLOCK_HZ: u32 = 125_000_000;

    #[test]
    fn test_default_config_is_valid() {
        let config = SamplerConfig::default();
        let plan = config.validate(CLOCK_HZ).unwrap();
        assert_eq!(plan.channels.map(ChannelId::get), [0, 1, 3]);
        assert_eq!(plan.timer.wraps_per_trigger, 8);
        assert_eq!(config.period_ms, 1000);
        assert_eq!(config.console.baudrate, 115200);
    }

    #[test]
    fn test_channel_out_of_range() {
        let config = SamplerConfig {
            channels: [0, 16, 3],
            ..SamplerConfig::new()
        };
        assert_eq!(
            config.validate(CLOCK_HZ),
            Err(ConfigError::ChannelOutOfRange(16))
        );
    }

    #[test]
    fn test_duplicate_channel() {
        let config = SamplerConfig {
            channels: [7, 1, 7],
            ..SamplerConfig::new()
        };
        assert_eq!(
            config.validate(CLOCK_HZ),
            Err(ConfigError::DuplicateChannel(7))
        );
    }

    #[test]
    fn test_zero_period() {
        let config = SamplerConfig {
            period_ms: 0,
            ..SamplerConfig::new()
        };
        assert_eq!(config.validate(CLOCK_HZ), Err(ConfigError::ZeroPeriod));
    }

    #[test]
    fn test_channel_ids_keep_order() {
        let config = SamplerConfig {
            channels: [7, 0, 1],
            ..SamplerConfig::new()
        };
        let plan = config.validate(CLOCK_HZ).unwrap();
        assert_eq!(plan.channels.map(ChannelId::get), [7, 0, 1]);
    }

    #[test]
    fn test_period_beyond_timer_reach() {
        let config = SamplerConfig {
            period_ms: 10_000_000,
            ..SamplerConfig::new()
        };
        assert_eq!(config.validate(CLOCK_HZ), Err(ConfigError::PeriodTooLong));
    }

    #[test]
    fn test_stall_window_follows_period() {
        let slow = SamplerConfig {
            period_ms: 7_000,
            ..SamplerConfig::new()
        };
        assert_eq!(SamplerConfig::new().stall_window_ms(), 2_000);
        assert_eq!(slow.stall_window_ms(), 14_000);

        let longest = SamplerConfig {
            period_ms: u32::MAX,
            ..SamplerConfig::new()
        };
        assert_eq!(longest.stall_window_ms(), u32::MAX);
    }
}
