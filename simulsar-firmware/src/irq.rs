//! PWM wrap interrupt
//!
//! Everything the handler touches is moved into [`ISR_CONTEXT`] by the
//! interrupt registration step, before the interrupt is unmasked.

use core::cell::RefCell;

use embassy_rp::interrupt;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use simulsar_core::sampling::FrameProducer;
use simulsar_core::service::{ServiceOutcome, TriggerService};
use simulsar_hal_rp2040::{AdcSequencer, LedPin, PwmTrigger};

use crate::channels::{FRAME_READY, STATS};

/// Peripherals and state owned by the trigger interrupt
pub struct IsrContext {
    pub service: TriggerService,
    pub timer: PwmTrigger<'static>,
    pub adc: AdcSequencer<'static>,
    pub led: LedPin<'static>,
    pub producer: FrameProducer<'static>,
}

pub static ISR_CONTEXT: Mutex<CriticalSectionRawMutex, RefCell<Option<IsrContext>>> =
    Mutex::new(RefCell::new(None));

#[interrupt]
fn PWM_IRQ_WRAP() {
    let outcome = ISR_CONTEXT.lock(|cell| {
        let mut guard = cell.borrow_mut();
        let ctx = guard.as_mut()?;
        Some(ctx.service.service(
            &mut ctx.timer,
            &mut ctx.adc,
            &mut ctx.led,
            &mut ctx.producer,
            &STATS,
        ))
    });

    match outcome {
        Some(ServiceOutcome::Published { .. }) | Some(ServiceOutcome::Dropped) => {
            FRAME_READY.signal(());
        }
        Some(ServiceOutcome::Idle) | Some(ServiceOutcome::Spurious) => {}
        None => {
            // Unmasked before registration; nothing can clear the wrap flag
            cortex_m::peripheral::NVIC::mask(interrupt::PWM_IRQ_WRAP);
        }
    }
}
