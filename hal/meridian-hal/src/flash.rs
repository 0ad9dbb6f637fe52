//! Persistent record storage abstractions
//!
//! Provides the key-value contract the watch face persists its location
//! cache through. Chip HALs back it with wear-leveled flash.

use core::future::Future;

/// Size of an integer record on storage
pub const INT_RECORD_SIZE: usize = 4;

/// Storage keys for persisted records
///
/// The integer keys match the record numbers the watch face has always
/// used, so an existing store keeps its cached fix across upgrades.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum RecordKey {
    /// Latitude in degrees × 10⁴
    Latitude = 0,
    /// Longitude in degrees × 10⁴
    Longitude = 1,
    /// Offset of local time from UTC in minutes
    UtcOffset = 2,
    /// Clock configuration (binary postcard format)
    ClockConfig = 3,
}

impl RecordKey {
    /// Get the key as a byte value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create a key from a byte value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(RecordKey::Latitude),
            1 => Some(RecordKey::Longitude),
            2 => Some(RecordKey::UtcOffset),
            3 => Some(RecordKey::ClockConfig),
            _ => None,
        }
    }
}

/// Errors from record storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Flash operation failed
    Flash,
    /// Storage operation failed
    Storage,
    /// Key not found
    NotFound,
    /// Buffer too small for the data
    BufferTooSmall,
    /// Data corrupted or of unexpected size
    Corrupted,
    /// Storage is full
    Full,
}

/// Record storage trait
///
/// Every write is durable once the returned future resolves. Callers are
/// single-threaded and await each operation before issuing the next, so
/// implementations need no internal locking.
pub trait RecordStore {
    /// Read a record into the provided buffer
    ///
    /// Returns the number of bytes read, or an error.
    fn read(
        &mut self,
        key: RecordKey,
        buffer: &mut [u8],
    ) -> impl Future<Output = Result<usize, StoreError>>;

    /// Write a record, replacing any previous value
    fn write(&mut self, key: RecordKey, data: &[u8])
        -> impl Future<Output = Result<(), StoreError>>;

    /// Check if a record exists in storage
    fn exists(&mut self, key: RecordKey) -> impl Future<Output = bool>;

    /// Erase all stored records
    fn erase_all(&mut self) -> impl Future<Output = Result<(), StoreError>>;

    /// Read a 32-bit integer record
    fn read_int(&mut self, key: RecordKey) -> impl Future<Output = Result<i32, StoreError>> {
        async move {
            let mut buffer = [0u8; INT_RECORD_SIZE];
            let len = self.read(key, &mut buffer).await?;
            if len != INT_RECORD_SIZE {
                return Err(StoreError::Corrupted);
            }
            Ok(i32::from_le_bytes(buffer))
        }
    }

    /// Write a 32-bit integer record
    fn write_int(
        &mut self,
        key: RecordKey,
        value: i32,
    ) -> impl Future<Output = Result<(), StoreError>> {
        async move { self.write(key, &value.to_le_bytes()).await }
    }
}

// Implement the sequential-storage Key trait when the feature is enabled
#[cfg(feature = "sequential-storage")]
impl sequential_storage::map::Key for RecordKey {
    fn serialize_into(
        &self,
        buffer: &mut [u8],
    ) -> Result<usize, sequential_storage::map::SerializationError> {
        if buffer.is_empty() {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        buffer[0] = self.as_u8();
        Ok(1)
    }

    fn deserialize_from(
        buffer: &[u8],
    ) -> Result<(Self, usize), sequential_storage::map::SerializationError> {
        if buffer.is_empty() {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        match RecordKey::from_u8(buffer[0]) {
            Some(key) => Ok((key, 1)),
            None => Err(sequential_storage::map::SerializationError::InvalidFormat),
        }
    }
}
