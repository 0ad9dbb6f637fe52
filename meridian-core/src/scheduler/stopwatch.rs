//! Elapsed-time stopwatch

/// Counts seconds since the last reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stopwatch {
    start: i64,
}

impl Stopwatch {
    pub fn new(now: i64) -> Self {
        Self { start: now }
    }

    pub fn reset(&mut self, now: i64) {
        self.start = now;
    }

    /// Seconds since the last reset
    ///
    /// Zero if the clock has been stepped back past the reset.
    pub fn elapsed(&self, now: i64) -> u64 {
        now.saturating_sub(self.start).max(0) as u64
    }
}
