//! Moon phase from the civil date

use chrono::{Datelike, NaiveDate};

/// Mean synodic month in days
pub const SYNODIC_MONTH_DAYS: f64 = 29.530588853;

/// Julian day of a reference new moon (2000-01-06)
pub const REFERENCE_NEW_MOON_JD: f64 = 2451550.1;

/// Eight equal phase buckets, starting at new moon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MoonPhase {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    const ALL: [MoonPhase; 8] = [
        MoonPhase::New,
        MoonPhase::WaxingCrescent,
        MoonPhase::FirstQuarter,
        MoonPhase::WaxingGibbous,
        MoonPhase::Full,
        MoonPhase::WaningGibbous,
        MoonPhase::LastQuarter,
        MoonPhase::WaningCrescent,
    ];

    /// Bucket a phase fraction in [0, 1)
    pub fn from_fraction(fraction: f64) -> Self {
        let bucket = libm::floor(fraction * 8.0) as i64;
        Self::ALL[bucket.rem_euclid(8) as usize]
    }

    /// Phase on a civil date
    pub fn for_date(date: NaiveDate) -> Self {
        Self::from_fraction(phase_fraction(julian_day_number(date)))
    }

    pub fn label(&self) -> &'static str {
        match self {
            MoonPhase::New => "new moon",
            MoonPhase::WaxingCrescent => "waxing crescent",
            MoonPhase::FirstQuarter => "first quarter",
            MoonPhase::WaxingGibbous => "waxing gibbous",
            MoonPhase::Full => "full moon",
            MoonPhase::WaningGibbous => "waning gibbous",
            MoonPhase::LastQuarter => "last quarter",
            MoonPhase::WaningCrescent => "waning crescent",
        }
    }
}

/// Integer Julian Day Number of a Gregorian date
pub fn julian_day_number(date: NaiveDate) -> i64 {
    let (y, m, d) = (date.year() as i64, date.month() as i64, date.day() as i64);
    let a = (14 - m) / 12;
    let y = y + 4800 - a;
    let m = m + 12 * a - 3;
    d + (153 * m + 2) / 5 + 365 * y + y / 4 - y / 100 + y / 400 - 32045
}

/// Position in the synodic month, in [0, 1)
pub fn phase_fraction(jdn: i64) -> f64 {
    let cycles = (jdn as f64 - REFERENCE_NEW_MOON_JD) / SYNODIC_MONTH_DAYS;
    let fraction = cycles - libm::floor(cycles);
    if fraction >= 1.0 {
        0.0
    } else {
        fraction
    }
}
