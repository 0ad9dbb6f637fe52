//! Time units changed between two ticks

use chrono::{Datelike, NaiveDateTime, Timelike};

/// Bitmask of calendar units that changed since the previous tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeUnits(u8);

impl TimeUnits {
    pub const NONE: Self = Self(0);
    pub const SECOND: Self = Self(1);
    pub const MINUTE: Self = Self(2);
    pub const HOUR: Self = Self(4);
    pub const DAY: Self = Self(8);
    pub const MONTH: Self = Self(16);
    pub const YEAR: Self = Self(32);
    pub const ALL: Self = Self(63);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Units whose value differs between `prev` and `now`
    pub fn changed_between(prev: NaiveDateTime, now: NaiveDateTime) -> Self {
        let mut units = Self::NONE;
        if prev.second() != now.second() {
            units = units | Self::SECOND;
        }
        if prev.minute() != now.minute() || prev.date() != now.date() || prev.hour() != now.hour() {
            units = units | Self::MINUTE;
        }
        if prev.hour() != now.hour() || prev.date() != now.date() {
            units = units | Self::HOUR;
        }
        if prev.date() != now.date() {
            units = units | Self::DAY;
        }
        if prev.month() != now.month() || prev.year() != now.year() {
            units = units | Self::MONTH;
        }
        if prev.year() != now.year() {
            units = units | Self::YEAR;
        }
        units
    }
}

impl core::ops::BitOr for TimeUnits {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl core::ops::BitOrAssign for TimeUnits {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}
