//! Last known position fix

use meridian_protocol::FixUpdate;

use crate::error::ErrorCode;

/// Fixed-point scale of latitude and longitude
pub const DEG_SCALE: i32 = 10_000;

/// Valid ranges (degrees × 10⁴ and minutes)
pub const LAT_RANGE: core::ops::RangeInclusive<i32> = -900_000..=900_000;
pub const LON_RANGE: core::ops::RangeInclusive<i32> = -1_800_000..=1_800_000;
pub const UTC_OFFSET_RANGE: core::ops::RangeInclusive<i32> = -720..=840;

/// Position and timezone as last reported by the companion
///
/// The zero fix (equator, prime meridian, UTC) is used until the first
/// successful refresh or a persisted fix is loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LocationFix {
    /// Degrees × 10⁴
    pub lat_x10000: i32,
    /// Degrees × 10⁴
    pub lon_x10000: i32,
    /// Local time minus UTC
    pub utc_offset_minutes: i32,
    /// Unix seconds of the last successful refresh
    pub last_updated: i64,
    /// False until a refresh succeeds in this process
    pub has_ever_succeeded: bool,
}

impl LocationFix {
    pub fn latitude_deg(&self) -> f64 {
        self.lat_x10000 as f64 / DEG_SCALE as f64
    }

    pub fn longitude_deg(&self) -> f64 {
        self.lon_x10000 as f64 / DEG_SCALE as f64
    }

    /// Whether the fix is older than `stale_after_s`
    ///
    /// Exactly `stale_after_s` old is still fresh. A fix that never came
    /// from a successful refresh is always stale.
    pub fn is_stale(&self, now: i64, stale_after_s: u32) -> bool {
        !self.has_ever_succeeded || now.saturating_sub(self.last_updated) > stale_after_s as i64
    }

    /// Apply the fields of a successful reply
    ///
    /// All present fields are range-checked first; on error nothing
    /// changes.
    pub fn apply(&mut self, update: &FixUpdate, now: i64) -> Result<(), ErrorCode> {
        let lat_ok = update.latitude.map_or(true, |v| LAT_RANGE.contains(&v));
        let lon_ok = update.longitude.map_or(true, |v| LON_RANGE.contains(&v));
        let offset_ok = update
            .utc_offset_minutes
            .map_or(true, |v| UTC_OFFSET_RANGE.contains(&v));
        if !(lat_ok && lon_ok && offset_ok) {
            return Err(ErrorCode::InvalidFix);
        }

        if let Some(lat) = update.latitude {
            self.lat_x10000 = lat;
        }
        if let Some(lon) = update.longitude {
            self.lon_x10000 = lon;
        }
        if let Some(offset) = update.utc_offset_minutes {
            self.utc_offset_minutes = offset;
        }
        self.last_updated = now;
        self.has_ever_succeeded = true;
        Ok(())
    }
}
