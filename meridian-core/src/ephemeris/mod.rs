//! Astronomical computations
//!
//! Pure functions of the date and the fix. Results are recomputed every
//! tick and never persisted.

pub mod lunar;
pub mod solar;

use chrono::NaiveDate;

use crate::config::ClockConfig;
use crate::location::LocationFix;

pub use lunar::{julian_day_number, phase_fraction, MoonPhase};
pub use solar::{adjust_timezone, minutes_between, sun_event_utc, Crossing, SunEvent};

/// Everything the face shows about the sky for one day
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EphemerisResult {
    /// Local sunrise
    pub sunrise: SunEvent,
    /// Local sunset
    pub sunset: SunEvent,
    /// Length of evening civil twilight, if both crossings happen
    pub twilight_minutes: Option<u16>,
    pub moon_phase: MoonPhase,
}

impl EphemerisResult {
    /// Compute for a local calendar date at the given fix
    pub fn compute(date: NaiveDate, fix: &LocationFix, config: &ClockConfig) -> Self {
        let lat = fix.latitude_deg();
        let lon = fix.longitude_deg();

        let sunrise = sun_event_utc(date, lat, lon, config.official_zenith_deg, Crossing::Rising);
        let sunset = sun_event_utc(date, lat, lon, config.official_zenith_deg, Crossing::Setting);
        let dusk = sun_event_utc(date, lat, lon, config.civil_zenith_deg, Crossing::Setting);

        let twilight_minutes =
            minutes_between(sunset, dusk).map(|minutes| libm::floor(minutes) as u16);

        Self {
            sunrise: sunrise.to_local(fix.utc_offset_minutes),
            sunset: sunset.to_local(fix.utc_offset_minutes),
            twilight_minutes,
            moon_phase: MoonPhase::for_date(date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sf_fix() -> LocationFix {
        LocationFix {
            lat_x10000: 377_749,
            lon_x10000: -1_224_194,
            utc_offset_minutes: -420,
            ..LocationFix::default()
        }
    }

    #[test]
    fn test_san_francisco_summer() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let result = EphemerisResult::compute(date, &sf_fix(), &ClockConfig::default());

        let rise = result.sunrise.hour().unwrap();
        let set = result.sunset.hour().unwrap();
        assert!(libm::fabs(rise - 5.80) < 0.03, "sunrise {rise}");
        assert!(libm::fabs(set - 20.585) < 0.03, "sunset {set}");
        assert_eq!(result.twilight_minutes, Some(31));
        assert_eq!(result.moon_phase, MoonPhase::WaxingGibbous);
    }

    #[test]
    fn test_zero_fix_still_computes() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let result =
            EphemerisResult::compute(date, &LocationFix::default(), &ClockConfig::default());

        assert!(result.sunrise.hour().is_some());
        assert_eq!(result.twilight_minutes, Some(22));
    }

    #[test]
    fn test_polar_night_has_no_twilight() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 21).unwrap();
        let fix = LocationFix {
            lat_x10000: 782_200,
            lon_x10000: 156_500,
            utc_offset_minutes: 60,
            ..LocationFix::default()
        };
        let result = EphemerisResult::compute(date, &fix, &ClockConfig::default());

        assert_eq!(result.sunrise, SunEvent::AlwaysDown);
        assert_eq!(result.sunset, SunEvent::AlwaysDown);
        assert_eq!(result.twilight_minutes, None);
    }
}
