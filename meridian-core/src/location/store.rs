//! Write-through persistence of the location fix
//!
//! Latitude, longitude and UTC offset each live in their own integer
//! record. The update timestamp is not persisted, so a fix loaded after a
//! restart is stale until the companion confirms it.

use meridian_hal::{RecordKey, RecordStore, StoreError};

use super::fix::{LocationFix, LAT_RANGE, LON_RANGE, UTC_OFFSET_RANGE};

/// Location cache on top of a [`RecordStore`]
pub struct LocationStore<S> {
    store: S,
}

impl<S: RecordStore> LocationStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store, e.g. for the configuration record
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Load the persisted fix
    ///
    /// Each field falls back to zero when its record is absent, unreadable
    /// or out of range.
    pub async fn load(&mut self) -> LocationFix {
        let lat_x10000 = self.load_field(RecordKey::Latitude, &LAT_RANGE).await;
        let lon_x10000 = self.load_field(RecordKey::Longitude, &LON_RANGE).await;
        let utc_offset_minutes = self
            .load_field(RecordKey::UtcOffset, &UTC_OFFSET_RANGE)
            .await;

        LocationFix {
            lat_x10000,
            lon_x10000,
            utc_offset_minutes,
            ..LocationFix::default()
        }
    }

    /// Persist latitude, longitude and offset, in that order
    ///
    /// Stops at the first failing write.
    pub async fn persist(&mut self, fix: &LocationFix) -> Result<(), StoreError> {
        self.store
            .write_int(RecordKey::Latitude, fix.lat_x10000)
            .await?;
        self.store
            .write_int(RecordKey::Longitude, fix.lon_x10000)
            .await?;
        self.store
            .write_int(RecordKey::UtcOffset, fix.utc_offset_minutes)
            .await
    }

    async fn load_field(&mut self, key: RecordKey, range: &core::ops::RangeInclusive<i32>) -> i32 {
        if !self.store.exists(key).await {
            return 0;
        }
        match self.store.read_int(key).await {
            Ok(value) if range.contains(&value) => value,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use meridian_hal::MemoryStore;
    use proptest::prelude::*;

    #[test]
    fn test_empty_store_loads_zero_fix() {
        let mut store = LocationStore::new(MemoryStore::new());
        let fix = block_on(store.load());
        assert_eq!(fix, LocationFix::default());
        assert!(!fix.has_ever_succeeded);
    }

    #[test]
    fn test_persist_then_load() {
        let mut store = LocationStore::new(MemoryStore::new());
        let fix = LocationFix {
            lat_x10000: -338_688,
            lon_x10000: 1_512_093,
            utc_offset_minutes: 660,
            last_updated: 1_700_000_000,
            has_ever_succeeded: true,
        };

        let loaded = block_on(async {
            store.persist(&fix).await.unwrap();
            store.load().await
        });

        assert_eq!(loaded.lat_x10000, fix.lat_x10000);
        assert_eq!(loaded.lon_x10000, fix.lon_x10000);
        assert_eq!(loaded.utc_offset_minutes, fix.utc_offset_minutes);
        assert_eq!(loaded.last_updated, 0);
        assert!(!loaded.has_ever_succeeded);
    }

    #[test]
    fn test_partial_store() {
        let mut inner = MemoryStore::new();
        block_on(inner.write_int(RecordKey::Longitude, 123_456)).unwrap();

        let mut store = LocationStore::new(inner);
        let fix = block_on(store.load());
        assert_eq!(fix.lat_x10000, 0);
        assert_eq!(fix.lon_x10000, 123_456);
        assert_eq!(fix.utc_offset_minutes, 0);
    }

    #[test]
    fn test_out_of_range_record_falls_back_to_zero() {
        let mut inner = MemoryStore::new();
        block_on(async {
            inner.write_int(RecordKey::Latitude, 950_000).await.unwrap();
            inner.write_int(RecordKey::UtcOffset, 2_000).await.unwrap();
        });

        let mut store = LocationStore::new(inner);
        let fix = block_on(store.load());
        assert_eq!(fix.lat_x10000, 0);
        assert_eq!(fix.utc_offset_minutes, 0);
    }

    #[test]
    fn test_corrupted_record_falls_back_to_zero() {
        let mut inner = MemoryStore::new();
        block_on(inner.write(RecordKey::Latitude, &[1, 2, 3])).unwrap();

        let mut store = LocationStore::new(inner);
        assert_eq!(block_on(store.load()).lat_x10000, 0);
    }

    #[test]
    fn test_persist_failure_reported() {
        let mut inner = MemoryStore::new();
        inner.set_fail_writes(true);
        let mut store = LocationStore::new(inner);

        let result = block_on(store.persist(&LocationFix::default()));
        assert_eq!(result, Err(StoreError::Flash));
    }

    proptest! {
        #[test]
        fn prop_persist_roundtrip(
            lat in LAT_RANGE,
            lon in LON_RANGE,
            offset in UTC_OFFSET_RANGE,
        ) {
            let mut store = LocationStore::new(MemoryStore::new());
            let fix = LocationFix {
                lat_x10000: lat,
                lon_x10000: lon,
                utc_offset_minutes: offset,
                ..LocationFix::default()
            };

            let loaded = block_on(async {
                store.persist(&fix).await.unwrap();
                store.load().await
            });
            prop_assert_eq!(loaded, fix);
        }
    }
}
