//! Tick task
//!
//! Wakes the controller once a second with the current Unix time.

use defmt::*;
use embassy_time::{Duration, Ticker};

use crate::channels::TICK_SIGNAL;
use crate::clock::unix_now;

/// Tick interval in milliseconds
pub const TICK_INTERVAL_MS: u64 = 1000;

#[embassy_executor::task]
pub async fn tick_task() {
    info!("Tick task started");

    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS));

    loop {
        ticker.next().await;
        TICK_SIGNAL.signal(unix_now());
    }
}
