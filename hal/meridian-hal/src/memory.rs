//! RAM-backed record store
//!
//! Holds records in a fixed-capacity table. Used on the host for tests and
//! on boards without a spare flash partition, where the cache simply does
//! not survive a power cycle.

use heapless::Vec;

use crate::flash::{RecordKey, RecordStore, StoreError};

/// Maximum number of distinct records
pub const MAX_RECORDS: usize = 4;

/// Maximum size of a single record in bytes
pub const MAX_RECORD_SIZE: usize = 64;

/// In-memory implementation of [`RecordStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<(RecordKey, Vec<u8, MAX_RECORD_SIZE>), MAX_RECORDS>,
    fail_writes: bool,
    writes: u32,
}

impl MemoryStore {
    /// Create an empty store
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
            fail_writes: false,
            writes: 0,
        }
    }

    /// Make every subsequent write fail with [`StoreError::Flash`]
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Number of successful writes since creation
    pub fn write_count(&self) -> u32 {
        self.writes
    }

    fn find(&self, key: RecordKey) -> Option<usize> {
        self.records.iter().position(|(k, _)| *k == key)
    }
}

impl RecordStore for MemoryStore {
    async fn read(&mut self, key: RecordKey, buffer: &mut [u8]) -> Result<usize, StoreError> {
        let index = self.find(key).ok_or(StoreError::NotFound)?;
        let data = &self.records[index].1;
        if buffer.len() < data.len() {
            return Err(StoreError::BufferTooSmall);
        }
        buffer[..data.len()].copy_from_slice(data);
        Ok(data.len())
    }

    async fn write(&mut self, key: RecordKey, data: &[u8]) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Flash);
        }

        let mut value = Vec::new();
        value
            .extend_from_slice(data)
            .map_err(|_| StoreError::BufferTooSmall)?;

        match self.find(key) {
            Some(index) => self.records[index].1 = value,
            None => self
                .records
                .push((key, value))
                .map_err(|_| StoreError::Full)?,
        }

        self.writes = self.writes.wrapping_add(1);
        Ok(())
    }

    async fn exists(&mut self, key: RecordKey) -> bool {
        self.find(key).is_some()
    }

    async fn erase_all(&mut self) -> Result<(), StoreError> {
        self.records.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    #[test]
    fn test_int_roundtrip() {
        let mut store = MemoryStore::new();
        block_on(async {
            store.write_int(RecordKey::Latitude, 377_749).await.unwrap();
            store.write_int(RecordKey::Longitude, -1_224_194).await.unwrap();

            assert_eq!(store.read_int(RecordKey::Latitude).await, Ok(377_749));
            assert_eq!(store.read_int(RecordKey::Longitude).await, Ok(-1_224_194));
        });
    }

    #[test]
    fn test_missing_key() {
        let mut store = MemoryStore::new();
        block_on(async {
            assert!(!store.exists(RecordKey::UtcOffset).await);
            assert_eq!(
                store.read_int(RecordKey::UtcOffset).await,
                Err(StoreError::NotFound)
            );
        });
    }

    #[test]
    fn test_overwrite_keeps_single_record() {
        let mut store = MemoryStore::new();
        block_on(async {
            store.write_int(RecordKey::UtcOffset, 60).await.unwrap();
            store.write_int(RecordKey::UtcOffset, -420).await.unwrap();
            assert_eq!(store.read_int(RecordKey::UtcOffset).await, Ok(-420));
        });
        assert_eq!(store.records.len(), 1);
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn test_wrong_size_int_is_corrupted() {
        let mut store = MemoryStore::new();
        block_on(async {
            store.write(RecordKey::Latitude, &[1, 2]).await.unwrap();
            assert_eq!(
                store.read_int(RecordKey::Latitude).await,
                Err(StoreError::Corrupted)
            );
        });
    }

    #[test]
    fn test_failed_writes() {
        let mut store = MemoryStore::new();
        store.set_fail_writes(true);
        block_on(async {
            assert_eq!(
                store.write_int(RecordKey::Latitude, 1).await,
                Err(StoreError::Flash)
            );
            assert!(!store.exists(RecordKey::Latitude).await);
        });
    }

    #[test]
    fn test_erase_all() {
        let mut store = MemoryStore::new();
        block_on(async {
            store.write_int(RecordKey::Latitude, 1).await.unwrap();
            store.erase_all().await.unwrap();
            assert!(!store.exists(RecordKey::Latitude).await);
        });
    }
}
