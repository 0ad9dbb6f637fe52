//! Label formatting
//!
//! Every label is a bounded string sized for its longest possible value.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use heapless::String;

use crate::ephemeris::SunEvent;
use crate::location::DEG_SCALE;
use crate::peripheral::{BatteryStatus, PeripheralStatus};

pub type TimeLabel = String<8>;
pub type DateLabel = String<16>;
pub type LocationLabel = String<24>;
pub type StopwatchLabel = String<24>;
pub type ShortLabel = String<12>;

/// Shown instead of a time when the sun does not cross that day
pub const NO_EVENT: &str = "--:--";

/// `HH:MM`
pub fn time_label(local: &NaiveDateTime) -> TimeLabel {
    let mut s = String::new();
    let _ = write_label(&mut s, format_args!("{:02}:{:02}", local.hour(), local.minute()));
    s
}

/// `Www-YYYY-MM-DD`
pub fn date_label(local: &NaiveDateTime) -> DateLabel {
    let mut s = String::new();
    let _ = write_label(
        &mut s,
        format_args!(
            "{}-{:04}-{:02}-{:02}",
            weekday_abbrev(local.weekday()),
            local.year(),
            local.month(),
            local.day()
        ),
    );
    s
}

/// `+DD.dddd +DDD.dddd`
pub fn location_label(lat_x10000: i32, lon_x10000: i32) -> LocationLabel {
    let mut s = String::new();
    let (lat_sign, lat_int, lat_frac) = split_fixed(lat_x10000);
    let (lon_sign, lon_int, lon_frac) = split_fixed(lon_x10000);
    let _ = write_label(
        &mut s,
        format_args!(
            "{}{:02}.{:04} {}{:03}.{:04}",
            lat_sign, lat_int, lat_frac, lon_sign, lon_int, lon_frac
        ),
    );
    s
}

/// `HH:MM` of a local sun event, truncated to the minute
pub fn sun_label(event: SunEvent) -> TimeLabel {
    let mut s = String::new();
    match event.hour() {
        Some(hour) => {
            let minutes = (libm::floor(hour * 60.0) as u32) % (24 * 60);
            let _ = write_label(&mut s, format_args!("{:02}:{:02}", minutes / 60, minutes % 60));
        }
        None => {
            let _ = s.push_str(NO_EVENT);
        }
    }
    s
}

/// `NNm`, or `--m` without twilight
pub fn twilight_label(minutes: Option<u16>) -> TimeLabel {
    let mut s = String::new();
    let _ = match minutes {
        Some(m) => write_label(&mut s, format_args!("{}m", m)),
        None => write_label(&mut s, format_args!("--m")),
    };
    s
}

/// `HH:MM:SS`; hours keep counting past 99
pub fn stopwatch_label(elapsed_s: u64) -> StopwatchLabel {
    let mut s = String::new();
    let _ = write_label(
        &mut s,
        format_args!(
            "{:02}:{:02}:{:02}",
            elapsed_s / 3600,
            (elapsed_s / 60) % 60,
            elapsed_s % 60
        ),
    );
    s
}

/// `bat: NN%`, `bat: chrg` or `bat: --%`
pub fn battery_label(status: &PeripheralStatus) -> ShortLabel {
    let mut s = String::new();
    let _ = match status.battery {
        Some(BatteryStatus { charging: true, .. }) => write_label(&mut s, format_args!("bat: chrg")),
        Some(BatteryStatus { percent, .. }) => write_label(&mut s, format_args!("bat: {}%", percent)),
        None => write_label(&mut s, format_args!("bat: --%")),
    };
    s
}

/// `blu: yes`, `blu: no` or `blu: n.a.`
pub fn connection_label(status: &PeripheralStatus) -> ShortLabel {
    let text = match status.connected {
        Some(true) => "blu: yes",
        Some(false) => "blu: no",
        None => "blu: n.a.",
    };
    let mut s = String::new();
    let _ = s.push_str(text);
    s
}

fn weekday_abbrev(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Sign, integer degrees and four fraction digits of a ×10⁴ value
fn split_fixed(value: i32) -> (char, u32, u32) {
    let sign = if value < 0 { '-' } else { '+' };
    let abs = value.unsigned_abs();
    (sign, abs / DEG_SCALE as u32, abs % DEG_SCALE as u32)
}

fn write_label<const N: usize>(
    s: &mut String<N>,
    args: core::fmt::Arguments<'_>,
) -> core::fmt::Result {
    use core::fmt::Write;
    s.write_fmt(args)
}
