//! Trigger timing math
//!
//! Converts a trigger period into a counter setting for a 16-bit
//! counter behind an 8-bit integer clock divider. At 125 MHz one wrap
//! lasts at most ~134 ms, so longer periods count several wraps per
//! trigger.

use simulsar_hal::timer::TimerSettings;

/// Largest integer clock divider
pub const MAX_DIVIDER: u8 = 255;

/// Counts per wrap at `top = u16::MAX`
const MAX_COUNTS: u64 = u16::MAX as u64 + 1;

/// Longest wrap in input clock ticks
const MAX_TICKS_PER_WRAP: u64 = MAX_DIVIDER as u64 * MAX_COUNTS;

/// Timing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimingError {
    /// Period (or the tick count it maps to) is zero
    ZeroPeriod,
    /// Postscaler would exceed `u16::MAX`
    PeriodTooLong,
}

/// Compute the counter setting for `period_ms` at `clock_hz`
pub fn timer_settings(clock_hz: u32, period_ms: u32) -> Result<TimerSettings, TimingError> {
    let ticks = clock_hz as u64 * period_ms as u64 / 1000;
    if ticks == 0 {
        return Err(TimingError::ZeroPeriod);
    }

    let wraps = ticks.div_ceil(MAX_TICKS_PER_WRAP);
    let wraps_per_trigger = u16::try_from(wraps).map_err(|_| TimingError::PeriodTooLong)?;

    // Spread the ticks evenly over the wraps, then over the divider
    let ticks_per_wrap = (ticks + wraps / 2) / wraps;
    let divider = ticks_per_wrap.div_ceil(MAX_COUNTS).max(1);
    let counts = ((ticks_per_wrap + divider / 2) / divider).clamp(1, MAX_COUNTS);

    Ok(TimerSettings {
        divider: divider as u8,
        top: (counts - 1) as u16,
        wraps_per_trigger,
    })
}

/// Period actually produced by `settings` at `clock_hz`, in nanoseconds
///
/// Saturates at `u64::MAX`.
pub fn actual_period_ns(settings: &TimerSettings, clock_hz: u32) -> u64 {
    let ticks = settings.divider as u128
        * (settings.top as u128 + 1)
        * settings.wraps_per_trigger as u128;
    let ns = ticks * 1_000_000_000 / clock_hz.max(1) as u128;
    u64::try_from(ns).unwrap_or(u64::MAX)
}

/// Longest period `timer_settings` accepts at `clock_hz`, in milliseconds
pub fn longest_period_ms(clock_hz: u32) -> u32 {
    let ticks = MAX_TICKS_PER_WRAP * u16::MAX as u64;
    let ms = ticks * 1000 / clock_hz.max(1) as u64;
    u32::try_from(ms).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_one_second_at_125mhz() {
        let settings = timer_settings(125_000_000, 1000).unwrap();
        assert_eq!(settings.wraps_per_trigger, 8);
        assert_eq!(settings.divider, 239);
        assert_eq!(settings.top, 65_376);

        let ns = actual_period_ns(&settings, 125_000_000);
        assert!(ns.abs_diff(1_000_000_000) < 100_000);
    }

    #[test]
    fn test_short_period_needs_no_postscaler() {
        // 1 ms = 125_000 ticks = divider 2 x 62_500 counts
        let settings = timer_settings(125_000_000, 1).unwrap();
        assert_eq!(
            settings,
            TimerSettings {
                divider: 2,
                top: 62_499,
                wraps_per_trigger: 1,
            }
        );
        assert_eq!(actual_period_ns(&settings, 125_000_000), 1_000_000);
    }

    #[test]
    fn test_zero_period() {
        assert_eq!(timer_settings(125_000_000, 0), Err(TimingError::ZeroPeriod));
        assert_eq!(timer_settings(0, 1000), Err(TimingError::ZeroPeriod));
    }

    #[test]
    fn test_minutes_long_period() {
        // 200 s at 125 MHz counts 1496 wraps per trigger
        let settings = timer_settings(125_000_000, 200_000).unwrap();
        assert_eq!(settings.wraps_per_trigger, 1496);
        let ns = actual_period_ns(&settings, 125_000_000);
        assert!(ns.abs_diff(200_000_000_000) < 200_000_000);
    }

    #[test]
    fn test_longest_period_is_accepted() {
        let longest = longest_period_ms(125_000_000);
        let settings = timer_settings(125_000_000, longest).unwrap();
        assert_eq!(settings.wraps_per_trigger, u16::MAX);
        assert_eq!(
            timer_settings(125_000_000, longest + 1),
            Err(TimingError::PeriodTooLong)
        );
    }

    #[test]
    fn test_actual_period_saturates() {
        let slowest = TimerSettings {
            divider: MAX_DIVIDER,
            top: u16::MAX,
            wraps_per_trigger: u16::MAX,
        };
        assert_eq!(actual_period_ns(&slowest, 1), u64::MAX);
        assert_eq!(actual_period_ns(&slowest, 0), u64::MAX);
    }

    #[test]
    fn test_period_too_long() {
        assert_eq!(
            timer_settings(125_000_000, u32::MAX),
            Err(TimingError::PeriodTooLong)
        );
    }

    proptest! {
        #[test]
        fn prop_settings_within_bounds(
            clock_hz in 1_000_000u32..=200_000_000,
            period_ms in 1u32..=60_000,
        ) {
            let settings = timer_settings(clock_hz, period_ms).unwrap();
            prop_assert!(settings.divider >= 1);
            prop_assert!(settings.wraps_per_trigger >= 1);

            let requested = clock_hz as u64 * period_ms as u64 / 1000;
            let produced = settings.divider as u64
                * (settings.top as u64 + 1)
                * settings.wraps_per_trigger as u64;
            // Within 0.1 % of the request
            prop_assert!(produced.abs_diff(requested) * 1000 <= requested);
        }

        #[test]
        fn prop_actual_period_over_accepted_range(
            (clock_hz, period_ms) in (1_000_000u32..=200_000_000)
                .prop_flat_map(|clock_hz| (Just(clock_hz), 1..=longest_period_ms(clock_hz))),
        ) {
            let settings = timer_settings(clock_hz, period_ms).unwrap();
            let ns = actual_period_ns(&settings, clock_hz);
            let requested = period_ms as u64 * 1_000_000;
            prop_assert!(ns.abs_diff(requested) * 200 <= requested);
        }
    }
}
