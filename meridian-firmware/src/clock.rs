//! Wall clock
//!
//! The board has no RTC. Time starts at the build timestamp and advances
//! with the embassy time driver.

use embassy_time::Instant;

include!(concat!(env!("OUT_DIR"), "/utc.rs"));

/// Current Unix time in seconds
pub fn unix_now() -> i64 {
    BUILD_UTC.saturating_add(Instant::now().as_secs() as i64)
}
