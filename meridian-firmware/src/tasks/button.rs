//! Tap button task
//!
//! Active-low push button with a pull-up. Each press restarts the
//! stopwatch.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::Timer;

use crate::channels::{WatchEvent, WATCH_EVENTS};

/// Contact bounce settles well within this
const DEBOUNCE_MS: u64 = 30;

#[embassy_executor::task]
pub async fn button_task(mut button: Input<'static>) {
    info!("Button task started");

    loop {
        button.wait_for_falling_edge().await;
        Timer::after_millis(DEBOUNCE_MS).await;

        if button.is_low() {
            debug!("Tap");
            if WATCH_EVENTS.try_send(WatchEvent::Tap).is_err() {
                warn!("Event channel full, dropping tap");
            }
        }

        button.wait_for_high().await;
    }
}
