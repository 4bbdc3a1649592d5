//! Foreground monitor
//!
//! Drains conversion frames, keeps the per-channel results and renders
//! the serial report line.

pub mod report;
pub mod tracker;

pub use report::{print_report, write_report, ReportLine, CLEAR_SCREEN, REPORT_CAPACITY};
pub use tracker::{DrainSummary, Monitor, MonitorPoll};
