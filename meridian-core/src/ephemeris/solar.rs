//! Sunrise and sunset
//!
//! Day-of-year sunrise equation from the Almanac for Computers, accurate
//! to about a minute for latitudes below the polar circles.

use chrono::{Datelike, NaiveDate};

/// When the sun crosses a zenith angle on a given day
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SunEvent {
    /// Crossing at this fractional hour, in [0, 24)
    At(f64),
    /// Sun stays above the zenith angle all day
    AlwaysUp,
    /// Sun stays below the zenith angle all day
    AlwaysDown,
}

impl SunEvent {
    pub fn hour(&self) -> Option<f64> {
        match self {
            SunEvent::At(hour) => Some(*hour),
            _ => None,
        }
    }

    /// Same event shifted from UTC into local time
    pub fn to_local(self, utc_offset_minutes: i32) -> Self {
        match self {
            SunEvent::At(hour) => SunEvent::At(adjust_timezone(hour, utc_offset_minutes)),
            other => other,
        }
    }
}

/// Which crossing of the zenith angle to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Crossing {
    Rising,
    Setting,
}

/// Shift a UTC hour into local time
///
/// `utc_offset_minutes` is local time minus UTC. The result is in [0, 24)
/// for any hour in [0, 24) and offset in [-720, 840].
pub fn adjust_timezone(hour: f64, utc_offset_minutes: i32) -> f64 {
    wrap(hour + utc_offset_minutes as f64 / 60.0, 24.0)
}

/// Fractional UTC hour at which the sun crosses `zenith_deg`
pub fn sun_event_utc(
    date: NaiveDate,
    lat_deg: f64,
    lon_deg: f64,
    zenith_deg: f64,
    crossing: Crossing,
) -> SunEvent {
    let day_of_year = date.ordinal() as f64;
    let lng_hour = lon_deg / 15.0;

    let approx = match crossing {
        Crossing::Rising => 6.0,
        Crossing::Setting => 18.0,
    };
    let t = day_of_year + (approx - lng_hour) / 24.0;

    // Mean anomaly, then true longitude
    let m = 0.9856 * t - 3.289;
    let l = wrap(
        m + 1.916 * sin_deg(m) + 0.020 * sin_deg(2.0 * m) + 282.634,
        360.0,
    );

    // Right ascension, moved into the quadrant of L
    let mut ra = wrap(atan_deg(0.91764 * tan_deg(l)), 360.0);
    ra += libm::floor(l / 90.0) * 90.0 - libm::floor(ra / 90.0) * 90.0;
    let ra_hours = ra / 15.0;

    let sin_dec = 0.39782 * sin_deg(l);
    let cos_dec = libm::cos(libm::asin(sin_dec));

    let cos_h = (cos_deg(zenith_deg) - sin_dec * sin_deg(lat_deg)) / (cos_dec * cos_deg(lat_deg));
    if cos_h.is_nan() || cos_h > 1.0 {
        return SunEvent::AlwaysDown;
    }
    if cos_h < -1.0 {
        return SunEvent::AlwaysUp;
    }

    let h = match crossing {
        Crossing::Rising => 360.0 - acos_deg(cos_h),
        Crossing::Setting => acos_deg(cos_h),
    } / 15.0;

    let local_mean = h + ra_hours - 0.06571 * t - 6.622;
    SunEvent::At(wrap(local_mean - lng_hour, 24.0))
}

/// Minutes between two events, wrapped past midnight
pub fn minutes_between(from: SunEvent, to: SunEvent) -> Option<f64> {
    Some(wrap(to.hour()? - from.hour()?, 24.0) * 60.0)
}

/// Reduce `value` into [0, modulus)
pub(crate) fn wrap(value: f64, modulus: f64) -> f64 {
    let r = libm::fmod(value, modulus);
    let r = if r < 0.0 { r + modulus } else { r };
    // A tiny negative remainder rounds up to the modulus itself
    if r >= modulus {
        0.0
    } else {
        r
    }
}

fn sin_deg(deg: f64) -> f64 {
    libm::sin(deg.to_radians())
}

fn cos_deg(deg: f64) -> f64 {
    libm::cos(deg.to_radians())
}

fn tan_deg(deg: f64) -> f64 {
    libm::tan(deg.to_radians())
}

fn atan_deg(x: f64) -> f64 {
    libm::atan(x).to_degrees()
}

fn acos_deg(x: f64) -> f64 {
    libm::acos(x).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CIVIL_ZENITH_DEG, OFFICIAL_ZENITH_DEG};
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn utc_hour(event: SunEvent) -> f64 {
        event.hour().expect("sun event")
    }

    fn assert_close(actual: f64, expected: f64) {
        // About one minute
        assert!(
            libm::fabs(actual - expected) < 0.02,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_san_francisco_solstice() {
        let d = date(2024, 6, 21);
        let rise = sun_event_utc(d, 37.7749, -122.4194, OFFICIAL_ZENITH_DEG, Crossing::Rising);
        let set = sun_event_utc(d, 37.7749, -122.4194, OFFICIAL_ZENITH_DEG, Crossing::Setting);

        assert_close(utc_hour(rise), 12.8026);
        assert_close(utc_hour(set), 3.5852);

        // 05:48 and 20:35 local (UTC-7)
        assert_close(utc_hour(rise.to_local(-420)), 5.8026);
        assert_close(utc_hour(set.to_local(-420)), 20.5852);
    }

    #[test]
    fn test_london_winter() {
        let d = date(2024, 12, 21);
        let rise = sun_event_utc(d, 51.5074, -0.1278, OFFICIAL_ZENITH_DEG, Crossing::Rising);
        let set = sun_event_utc(d, 51.5074, -0.1278, OFFICIAL_ZENITH_DEG, Crossing::Setting);

        assert_close(utc_hour(rise), 8.0691);
        assert_close(utc_hour(set), 15.8975);
    }

    #[test]
    fn test_sydney_equinox() {
        let d = date(2024, 3, 20);
        let rise = sun_event_utc(d, -33.8688, 151.2093, OFFICIAL_ZENITH_DEG, Crossing::Rising);
        let set = sun_event_utc(d, -33.8688, 151.2093, OFFICIAL_ZENITH_DEG, Crossing::Setting);

        assert_close(utc_hour(rise), 19.976);
        assert_close(utc_hour(set), 8.1025);
        assert_close(utc_hour(rise.to_local(660)), 6.976);
    }

    #[test]
    fn test_null_island() {
        let d = date(2024, 6, 21);
        let rise = sun_event_utc(d, 0.0, 0.0, OFFICIAL_ZENITH_DEG, Crossing::Rising);
        let set = sun_event_utc(d, 0.0, 0.0, OFFICIAL_ZENITH_DEG, Crossing::Setting);

        assert_close(utc_hour(rise), 5.970);
        assert_close(utc_hour(set), 18.093);
    }

    #[test]
    fn test_civil_twilight_length() {
        let d = date(2024, 12, 21);
        let set = sun_event_utc(d, 51.5074, -0.1278, OFFICIAL_ZENITH_DEG, Crossing::Setting);
        let dusk = sun_event_utc(d, 51.5074, -0.1278, CIVIL_ZENITH_DEG, Crossing::Setting);

        let minutes = minutes_between(set, dusk).unwrap();
        assert!(libm::fabs(minutes - 40.3) < 1.0, "got {minutes}");
    }

    #[test]
    fn test_polar_day_and_night() {
        let summer = date(2024, 6, 21);
        let winter = date(2024, 12, 21);

        for crossing in [Crossing::Rising, Crossing::Setting] {
            assert_eq!(
                sun_event_utc(summer, 78.22, 15.65, OFFICIAL_ZENITH_DEG, crossing),
                SunEvent::AlwaysUp
            );
            assert_eq!(
                sun_event_utc(winter, 78.22, 15.65, OFFICIAL_ZENITH_DEG, crossing),
                SunEvent::AlwaysDown
            );
        }
        assert_eq!(
            minutes_between(SunEvent::AlwaysUp, SunEvent::At(1.0)),
            None
        );
    }

    #[test]
    fn test_adjust_timezone_wraps_once() {
        assert_close(adjust_timezone(3.5, -420), 20.5);
        assert_close(adjust_timezone(20.0, 660), 7.0);
        assert_close(adjust_timezone(12.0, 0), 12.0);
        assert_eq!(adjust_timezone(0.0, 0), 0.0);
    }

    proptest! {
        #[test]
        fn prop_adjust_timezone_in_day(hour in 0.0f64..24.0, offset in -720i32..=840) {
            let local = adjust_timezone(hour, offset);
            prop_assert!((0.0..24.0).contains(&local));
        }

        #[test]
        fn prop_events_in_day(
            lat in -89.0f64..89.0,
            lon in -180.0f64..180.0,
            day in 1u32..=365,
        ) {
            let d = NaiveDate::from_yo_opt(2023, day).unwrap();
            for crossing in [Crossing::Rising, Crossing::Setting] {
                match sun_event_utc(d, lat, lon, OFFICIAL_ZENITH_DEG, crossing) {
                    SunEvent::At(hour) => prop_assert!((0.0..24.0).contains(&hour)),
                    SunEvent::AlwaysUp | SunEvent::AlwaysDown => {}
                }
            }
        }
    }
}
