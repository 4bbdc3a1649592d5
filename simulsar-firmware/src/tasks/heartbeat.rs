//! Heartbeat task
//!
//! Periodically logs the exchange counters so a stalled trigger or a
//! backed-up queue shows up in the RTT log.

use defmt::*;
use embassy_time::{Duration, Instant, Ticker};

use simulsar_core::sampling::StatsSnapshot;

use crate::channels::STATS;

/// Heartbeat interval in milliseconds
pub const HEARTBEAT_INTERVAL_MS: u32 = 5000;

/// Heartbeat task - traces the counters and flags a stalled trigger
///
/// The trigger counts as stalled once it has not advanced for
/// `stall_window_ms`.
#[embassy_executor::task]
pub async fn heartbeat_task(stall_window_ms: u32) {
    info!("Heartbeat task started (stall window {} ms)", stall_window_ms);

    let stall_window = Duration::from_millis(stall_window_ms as u64);
    let mut ticker = Ticker::every(Duration::from_millis(HEARTBEAT_INTERVAL_MS as u64));
    let mut last = StatsSnapshot::default();
    let mut last_trigger_at = Instant::now();

    loop {
        ticker.next().await;

        let now = STATS.snapshot();
        trace!(
            "heartbeat: triggers={} published={} dropped={} fifo_faults={}",
            now.triggers,
            now.published,
            now.dropped,
            now.fifo_faults
        );

        if now.triggers != last.triggers {
            last_trigger_at = Instant::now();
        } else if last_trigger_at.elapsed() > stall_window {
            warn!(
                "No trigger in the last {} ms",
                last_trigger_at.elapsed().as_millis()
            );
        }
        last = now;
    }
}
