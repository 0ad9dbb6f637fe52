//! Refresh cadence

use super::units::TimeUnits;

/// Counts minute boundaries and asks for a refresh every `every` of them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RefreshPolicy {
    every: u16,
    counter: u16,
}

impl RefreshPolicy {
    /// `every_minutes` below one is treated as one
    pub fn new(every_minutes: u16) -> Self {
        Self {
            every: every_minutes.max(1),
            counter: 0,
        }
    }

    pub fn every_minutes(&self) -> u16 {
        self.every
    }

    /// Minute boundaries seen since the last refresh
    pub fn counter(&self) -> u16 {
        self.counter
    }

    /// Advance on a tick; true when a refresh is due
    pub fn on_tick(&mut self, units: TimeUnits) -> bool {
        if !units.contains(TimeUnits::MINUTE) {
            return false;
        }
        self.counter += 1;
        if self.counter >= self.every {
            self.counter = 0;
            true
        } else {
            false
        }
    }
}
