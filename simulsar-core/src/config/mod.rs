//! Sampler configuration
//!
//! The demo has no configuration files. The firmware builds a `const`
//! [`SamplerConfig`] and bring-up validates it before touching hardware.

pub mod timing;
pub mod types;

pub use timing::{actual_period_ns, longest_period_ms, timer_settings, TimingError, MAX_DIVIDER};
pub use types::{ConfigError, SamplerConfig, SamplingPlan, DEFAULT_CHANNELS};
