//! Embassy async tasks
//!
//! The sampling itself runs in the PWM wrap interrupt; tasks only
//! observe it.

pub mod heartbeat;

pub use heartbeat::heartbeat_task;
