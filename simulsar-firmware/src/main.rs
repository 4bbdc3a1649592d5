//! Simulsar - simultaneous SAR ADC sampling demo
//!
//! Firmware binary for the Raspberry Pi Pico. A PWM slice paces the
//! sampler: on every trigger the wrap interrupt converts three ADC
//! channels, pulls the results out of the ADC FIFO, blinks the user LED
//! and queues the frame. The main task prints the latest values on the
//! debug UART each time a frame arrives.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use simulsar_core::bringup::bring_up;
use simulsar_core::config::{actual_period_ns, SamplerConfig};
use simulsar_core::monitor::{print_report, Monitor, MonitorPoll};
use simulsar_core::sampling::FrameQueue;

use crate::board::{Board, BoardResources};
use crate::channels::{FRAME_READY, STATS};

mod board;
mod channels;
mod irq;
mod tasks;

/// Sampler setup: ADC0, ADC1 and ADC3 every second, console at 115200 8N1
const SAMPLER_CONFIG: SamplerConfig = SamplerConfig::new();

// Frame queue between the wrap interrupt and this task
static FRAME_QUEUE: StaticCell<FrameQueue> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Simulsar firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let queue = FRAME_QUEUE.init(FrameQueue::new());
    let (producer, mut consumer) = queue.split();

    let resources = BoardResources {
        adc: p.ADC,
        temp_sensor: p.ADC_TEMP_SENSOR,
        pin_26: p.PIN_26,
        pin_27: p.PIN_27,
        pin_28: p.PIN_28,
        pin_29: p.PIN_29,
        pwm_slice: p.PWM_SLICE0,
        uart: p.UART0,
        uart_tx: p.PIN_0,
        led: p.PIN_25,
    };
    let mut board = Board::new(resources, producer, SAMPLER_CONFIG.led_pin);

    let setup = match bring_up(&mut board, &SAMPLER_CONFIG, |step| {
        info!("Bring-up: {:?}", step)
    }) {
        Ok(setup) => setup,
        Err(e) => {
            error!("Bring-up failed at {:?}: {:?}", e.step(), e);
            defmt::panic!("bring-up failed");
        }
    };

    info!(
        "Sampling {:?} every {} ns (divider {}, top {}, {} wraps)",
        setup.channels,
        actual_period_ns(&setup.timer, embassy_rp::clocks::clk_sys_freq()),
        setup.timer.divider,
        setup.timer.top,
        setup.timer.wraps_per_trigger
    );

    let Some(mut console) = board.take_console() else {
        error!("Console missing after bring-up");
        defmt::panic!("console missing");
    };

    spawner
        .spawn(tasks::heartbeat_task(SAMPLER_CONFIG.stall_window_ms()))
        .unwrap();

    let mut monitor = Monitor::new();

    loop {
        FRAME_READY.wait().await;

        let MonitorPoll { summary, report } = match monitor.poll(&mut consumer) {
            Ok(poll) => poll,
            Err(_) => {
                warn!("Report line overflow");
                continue;
            }
        };
        if summary.faults > 0 {
            warn!("{} FIFO faults in {} frames", summary.faults, summary.frames);
        }
        if summary.missed > 0 {
            warn!(
                "{} frames dropped (total {})",
                summary.missed,
                STATS.snapshot().dropped
            );
        }
        let Some(line) = report else {
            continue;
        };
        if let Err(e) = print_report(&mut console, &line) {
            warn!("Console write failed: {:?}", e);
        }
    }
}
