//! The formatted face handed to the presenter

use chrono::NaiveDateTime;
use heapless::String;

use super::format::{
    battery_label, connection_label, date_label, location_label, stopwatch_label, sun_label,
    time_label, twilight_label, DateLabel, LocationLabel, ShortLabel, StopwatchLabel, TimeLabel,
};
use crate::ephemeris::EphemerisResult;
use crate::location::LocationFix;
use crate::peripheral::PeripheralStatus;

pub type StatusLabel = String<32>;

/// How prominently the location is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Emphasis {
    /// Fix is fresh
    Strong,
    /// Fix is stale or was never confirmed
    Weak,
}

/// One frame of the watch face
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceView {
    pub time: TimeLabel,
    pub date: DateLabel,
    pub location: LocationLabel,
    pub location_emphasis: Emphasis,
    pub sunrise: TimeLabel,
    pub sunset: TimeLabel,
    pub twilight: TimeLabel,
    pub moon: &'static str,
    pub stopwatch: StopwatchLabel,
    /// Error label of the last refresh, or the companion's status text
    pub status: StatusLabel,
    pub battery: ShortLabel,
    pub connection: ShortLabel,
}

/// Inputs for one frame
pub struct FaceInputs<'a> {
    /// Wall time in the fix's timezone
    pub local: NaiveDateTime,
    pub fix: &'a LocationFix,
    pub stale: bool,
    pub ephemeris: &'a EphemerisResult,
    pub stopwatch_elapsed_s: u64,
    pub status: Option<&'a str>,
    pub peripherals: &'a PeripheralStatus,
}

impl FaceView {
    pub fn compose(inputs: &FaceInputs<'_>) -> Self {
        let mut status = String::new();
        if let Some(text) = inputs.status {
            for c in text.chars() {
                if status.push(c).is_err() {
                    break;
                }
            }
        }

        Self {
            time: time_label(&inputs.local),
            date: date_label(&inputs.local),
            location: location_label(inputs.fix.lat_x10000, inputs.fix.lon_x10000),
            location_emphasis: if inputs.stale {
                Emphasis::Weak
            } else {
                Emphasis::Strong
            },
            sunrise: sun_label(inputs.ephemeris.sunrise),
            sunset: sun_label(inputs.ephemeris.sunset),
            twilight: twilight_label(inputs.ephemeris.twilight_minutes),
            moon: inputs.ephemeris.moon_phase.label(),
            stopwatch: stopwatch_label(inputs.stopwatch_elapsed_s),
            status,
            battery: battery_label(inputs.peripherals),
            connection: connection_label(inputs.peripherals),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FaceView {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "{} {} | {} ({}) | sun {}-{} tw {} | {} | sw {} | {} | {} {}",
            self.time.as_str(),
            self.date.as_str(),
            self.location.as_str(),
            self.location_emphasis,
            self.sunrise.as_str(),
            self.sunset.as_str(),
            self.twilight.as_str(),
            self.moon,
            self.stopwatch.as_str(),
            self.status.as_str(),
            self.battery.as_str(),
            self.connection.as_str()
        )
    }
}
