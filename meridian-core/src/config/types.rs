//! Configuration type definitions
//!
//! Stored in flash as postcard-serialized binary data under
//! `RecordKey::ClockConfig`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Zenith angle for sunrise and sunset, including refraction and the
/// solar disc radius
pub const OFFICIAL_ZENITH_DEG: f64 = 90.833;

/// Zenith angle at the end of civil twilight
pub const CIVIL_ZENITH_DEG: f64 = 96.0;

/// Limits accepted by [`ClockConfig::validate`]
pub const MAX_REFRESH_MINUTES: u16 = 24 * 60;
pub const MAX_STALE_AFTER_S: u32 = 7 * 24 * 3600;
pub const ACK_TIMEOUT_RANGE_MS: core::ops::RangeInclusive<u32> = 100..=60_000;
pub const ZENITH_RANGE_DEG: core::ops::RangeInclusive<f64> = 85.0..=110.0;

/// Watch face configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClockConfig {
    /// Ask the companion for a fresh fix every N minute boundaries
    pub refresh_every_minutes: u16,
    /// Age after which the fix is shown de-emphasised
    pub stale_after_s: u32,
    /// Zenith for sunrise/sunset (degrees)
    pub official_zenith_deg: f64,
    /// Zenith for the end of civil twilight (degrees)
    pub civil_zenith_deg: f64,
    /// How long the link waits for the companion's ACK
    pub link_ack_timeout_ms: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            refresh_every_minutes: 5,
            stale_after_s: 300,
            official_zenith_deg: OFFICIAL_ZENITH_DEG,
            civil_zenith_deg: CIVIL_ZENITH_DEG,
            link_ack_timeout_ms: 5000,
        }
    }
}

impl ClockConfig {
    /// Check every field against its accepted range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_every_minutes == 0 || self.refresh_every_minutes > MAX_REFRESH_MINUTES {
            return Err(ConfigError::OutOfRange);
        }
        if self.stale_after_s > MAX_STALE_AFTER_S {
            return Err(ConfigError::OutOfRange);
        }
        if !ZENITH_RANGE_DEG.contains(&self.official_zenith_deg)
            || !ZENITH_RANGE_DEG.contains(&self.civil_zenith_deg)
        {
            return Err(ConfigError::OutOfRange);
        }
        // Twilight ends after sunset
        if self.civil_zenith_deg <= self.official_zenith_deg {
            return Err(ConfigError::OutOfRange);
        }
        if !ACK_TIMEOUT_RANGE_MS.contains(&self.link_ack_timeout_ms) {
            return Err(ConfigError::OutOfRange);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ClockConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.refresh_every_minutes, 5);
        assert_eq!(config.stale_after_s, 300);
    }

    #[test]
    fn test_zero_refresh_rejected() {
        let config = ClockConfig {
            refresh_every_minutes: 0,
            ..ClockConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::OutOfRange));
    }

    #[test]
    fn test_swapped_zeniths_rejected() {
        let config = ClockConfig {
            official_zenith_deg: 96.0,
            civil_zenith_deg: 90.833,
            ..ClockConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::OutOfRange));
    }

    #[test]
    fn test_ack_timeout_bounds() {
        let short = ClockConfig {
            link_ack_timeout_ms: 10,
            ..ClockConfig::default()
        };
        assert_eq!(short.validate(), Err(ConfigError::OutOfRange));

        let long = ClockConfig {
            link_ack_timeout_ms: 60_000,
            ..ClockConfig::default()
        };
        assert_eq!(long.validate(), Ok(()));
    }
}
